use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived record for one pair of consecutive points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub distance_m: f64,
    /// Absent when either point has no timestamp.
    pub duration_s: Option<f64>,
    /// Absent when the duration is absent or zero.
    pub speed_mps: Option<f64>,
    pub is_moving: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    pub point_count: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub total_distance_m: f64,
    pub total_duration_s: Option<f64>,
    pub moving_distance_m: f64,
    pub moving_duration_s: f64,
    /// m/s over moving time.
    pub average_speed: f64,
    /// m/s.
    pub max_speed: f64,
    pub elevation_gain_m: f64,
    pub elevation_loss_m: f64,
}

impl ActivityMetrics {
    pub fn empty(point_count: usize, started_at: Option<DateTime<Utc>>) -> Self {
        Self {
            point_count,
            started_at,
            total_distance_m: 0.0,
            total_duration_s: None,
            moving_distance_m: 0.0,
            moving_duration_s: 0.0,
            average_speed: 0.0,
            max_speed: 0.0,
            elevation_gain_m: 0.0,
            elevation_loss_m: 0.0,
        }
    }
}

/// Display-oriented view of [`ActivityMetrics`] in km, minutes and km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub total_distance_km: f64,
    pub moving_distance_km: f64,
    pub total_duration_min: Option<f64>,
    pub moving_duration_min: f64,
    pub average_speed_kmh: f64,
    pub max_speed_kmh: f64,
}
