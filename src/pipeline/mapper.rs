use chrono::Utc;
use uuid::Uuid;

use crate::error::ActivityError;
use crate::types::activity::{Activity, ActivityInput, ActivityPatch, Speed, SpeedUnit, Sport, SportDetail};
use crate::types::metrics::ActivityMetrics;

/// Builds an [`Activity`] from user input and, when a track was uploaded, its metrics.
///
/// A valid explicit distance or duration (> 0) wins over the track-derived one.
pub fn map_activity(
    owner_id: i64,
    input: ActivityInput,
    metrics: Option<&ActivityMetrics>,
) -> Result<Activity, ActivityError> {
    let sport: Sport = input.sport.parse()?;

    let title = non_empty(Some(input.title)).ok_or(ActivityError::MissingRequiredField("title"))?;

    let distance_km = input
        .distance_km
        .filter(|v| is_positive(*v))
        .or_else(|| metrics.map(|m| m.total_distance_m / 1000.0).filter(|v| is_positive(*v)))
        .ok_or(ActivityError::MissingRequiredField("distance"))?;

    let duration_hours = input
        .duration_hours
        .filter(|v| is_positive(*v))
        .or_else(|| metrics.and_then(derived_duration_hours));

    let date = input
        .date
        .or_else(|| metrics.and_then(|m| m.started_at).map(|t| t.date_naive()))
        .ok_or(ActivityError::MissingRequiredField("date"))?;

    let sport_detail = detail_for(sport, input.sport_detail);

    Ok(Activity {
        id: Uuid::new_v4(),
        owner_id,
        title,
        description: non_empty(input.description),
        sport,
        date,
        location: non_empty(input.location),
        distance_km,
        duration_hours,
        sport_detail,
        speed: compute_speed(sport, distance_km, duration_hours),
        metrics: metrics.cloned(),
        created_at: Utc::now(),
    })
}

/// Applies an edit to a copy of `activity`, re-validating every changed field.
pub fn apply_patch(activity: &Activity, patch: ActivityPatch) -> Result<Activity, ActivityError> {
    let mut updated = activity.clone();

    if let Some(sport) = patch.sport {
        let sport: Sport = sport.parse()?;
        if sport != updated.sport {
            updated.sport_detail = None;
        }
        updated.sport = sport;
    }

    if let Some(title) = patch.title {
        updated.title = non_empty(Some(title)).ok_or(ActivityError::MissingRequiredField("title"))?;
    }

    if let Some(distance_km) = patch.distance_km {
        if !is_positive(distance_km) {
            return Err(ActivityError::InvalidValue {
                field: "distance_km",
                reason: format!("must be greater than 0, got {}", distance_km),
            });
        }
        updated.distance_km = distance_km;
    }

    if let Some(duration_hours) = patch.duration_hours {
        if !is_positive(duration_hours) {
            return Err(ActivityError::InvalidValue {
                field: "duration_hours",
                reason: format!("must be greater than 0, got {}", duration_hours),
            });
        }
        updated.duration_hours = Some(duration_hours);
    }

    if let Some(date) = patch.date {
        updated.date = date;
    }
    if patch.location.is_some() {
        updated.location = non_empty(patch.location);
    }
    if patch.description.is_some() {
        updated.description = non_empty(patch.description);
    }
    if patch.sport_detail.is_some() {
        updated.sport_detail = detail_for(updated.sport, patch.sport_detail);
    }

    updated.speed = compute_speed(updated.sport, updated.distance_km, updated.duration_hours);
    Ok(updated)
}

/// Average speed in the sport's display unit. Zero when the duration is missing or zero.
pub fn compute_speed(sport: Sport, distance_km: f64, duration_hours: Option<f64>) -> Speed {
    let unit = sport.speed_unit();
    let duration_min = duration_hours.unwrap_or(0.0) * 60.0;

    let value = if duration_min > 0.0 {
        match unit {
            SpeedUnit::KilometersPerHour => (distance_km / duration_min) * 60.0,
            SpeedUnit::MetersPerSecond => (distance_km * 1000.0) / (duration_min * 60.0),
        }
    } else {
        0.0
    };

    Speed {
        value: if value.is_finite() { value } else { 0.0 },
        unit,
    }
}

fn derived_duration_hours(metrics: &ActivityMetrics) -> Option<f64> {
    metrics
        .total_duration_s
        .filter(|s| is_positive(*s))
        .or_else(|| Some(metrics.moving_duration_s).filter(|s| is_positive(*s)))
        .map(|s| s / 3600.0)
}

fn detail_for(sport: Sport, raw: Option<String>) -> Option<SportDetail> {
    let value = non_empty(raw)?;
    let detail = sport.detail(value);
    if detail.is_none() {
        tracing::warn!("Ignoring sport detail for {}, which has none", sport);
    }
    detail
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
