use chrono::{DateTime, Utc};

use crate::error::MotionError;
use crate::pipeline::geo;
use crate::types::metrics::MotionSample;
use crate::types::track::TrackPoint;

/// Splits a track into one [`MotionSample`] per consecutive point pair.
///
/// A pair is moving when its speed is strictly above `min_moving_speed_mps`.
/// Pairs where either side lacks a timestamp keep their distance but carry no
/// duration or speed. Timestamps are checked against the latest one seen so far,
/// so a backwards jump is reported even across untimed points.
pub fn segment(points: &[TrackPoint], min_moving_speed_mps: f64) -> Result<Vec<MotionSample>, MotionError> {
    let mut samples = Vec::with_capacity(points.len().saturating_sub(1));
    let mut latest: Option<DateTime<Utc>> = None;

    for (index, point) in points.iter().enumerate() {
        if let Some(current) = point.time {
            if let Some(previous) = latest {
                if current < previous {
                    return Err(MotionError::NonMonotonicTime {
                        index,
                        previous,
                        current,
                    });
                }
            }
            latest = Some(current);
        }

        if index == 0 {
            continue;
        }
        let prev = &points[index - 1];
        samples.push(sample(prev, point, min_moving_speed_mps));
    }

    Ok(samples)
}

fn sample(prev: &TrackPoint, curr: &TrackPoint, min_moving_speed_mps: f64) -> MotionSample {
    let distance_m = geo::distance(prev, curr);

    let duration_s = match (prev.time, curr.time) {
        (Some(start), Some(end)) => Some(seconds_between(start, end)),
        _ => None,
    };

    let speed_mps = duration_s
        .filter(|d| *d > 0.0)
        .map(|d| distance_m / d)
        .filter(|s| s.is_finite());

    MotionSample {
        distance_m,
        duration_s,
        speed_mps,
        is_moving: speed_mps.is_some_and(|s| s > min_moving_speed_mps),
    }
}

pub(crate) fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}
