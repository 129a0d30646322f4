use crate::error::MotionError;
use crate::pipeline::{geo, motion};
use crate::types::metrics::{ActivityMetrics, MetricsSummary, MotionSample};
use crate::types::track::{Track, TrackPoint};

const MPS_TO_KMH: f64 = 3.6;

/// Derives [`ActivityMetrics`] from a parsed track.
///
/// Tracks with fewer than two points produce zeroed metrics rather than an error.
/// The only failure is a timestamp that goes backwards.
pub fn process(track: &Track, min_moving_speed_mps: f64) -> Result<ActivityMetrics, MotionError> {
    let points = &track.points;
    let started_at = points.iter().find_map(|p| p.time);

    if points.len() < 2 {
        return Ok(ActivityMetrics::empty(points.len(), started_at));
    }

    let samples = motion::segment(points, min_moving_speed_mps)?;
    let (elevation_gain_m, elevation_loss_m) = elevation_deltas(points);

    let total_duration_s = match (points.first().and_then(|p| p.time), points.last().and_then(|p| p.time)) {
        (Some(first), Some(last)) => Some(motion::seconds_between(first, last)),
        _ => None,
    };

    let metrics = compute_metrics(&samples);

    Ok(ActivityMetrics {
        point_count: points.len(),
        started_at,
        total_distance_m: finite_or_zero(geo::total_distance(points)),
        total_duration_s: total_duration_s.map(finite_or_zero),
        elevation_gain_m: finite_or_zero(elevation_gain_m),
        elevation_loss_m: finite_or_zero(elevation_loss_m),
        ..metrics
    })
}

fn compute_metrics(samples: &[MotionSample]) -> ActivityMetrics {
    let mut moving_distance_m = 0.0;
    let mut moving_duration_s = 0.0;
    let mut max_speed: f64 = 0.0;

    for sample in samples {
        if let Some(speed) = sample.speed_mps {
            max_speed = max_speed.max(speed);
        }
        if sample.is_moving {
            moving_distance_m += sample.distance_m;
            moving_duration_s += sample.duration_s.unwrap_or(0.0);
        }
    }

    let average_speed = if moving_duration_s > 0.0 {
        moving_distance_m / moving_duration_s
    } else {
        0.0
    };

    ActivityMetrics {
        moving_distance_m: finite_or_zero(moving_distance_m),
        moving_duration_s: finite_or_zero(moving_duration_s),
        average_speed: finite_or_zero(average_speed),
        max_speed: finite_or_zero(max_speed),
        ..ActivityMetrics::empty(0, None)
    }
}

fn elevation_deltas(points: &[TrackPoint]) -> (f64, f64) {
    let mut gain = 0.0;
    let mut loss = 0.0;

    for pair in points.windows(2) {
        if let (Some(prev_ele), Some(curr_ele)) = (pair[0].elevation, pair[1].elevation) {
            let delta = curr_ele - prev_ele;
            if delta > 0.0 {
                gain += delta;
            } else {
                loss -= delta;
            }
        }
    }

    (gain, loss)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn summarize(track: &Track, metrics: &ActivityMetrics) -> MetricsSummary {
    MetricsSummary {
        name: track.name.clone(),
        kind: track.kind.clone(),
        total_distance_km: metrics.total_distance_m / 1000.0,
        moving_distance_km: metrics.moving_distance_m / 1000.0,
        total_duration_min: metrics.total_duration_s.map(|s| s / 60.0),
        moving_duration_min: metrics.moving_duration_s / 60.0,
        average_speed_kmh: metrics.average_speed * MPS_TO_KMH,
        max_speed_kmh: metrics.max_speed * MPS_TO_KMH,
    }
}
