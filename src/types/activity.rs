use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ActivityError;
use crate::types::metrics::ActivityMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Course,
    Cyclisme,
    Natation,
    Randonnee,
}

impl Sport {
    pub const ALL: [Sport; 4] = [Sport::Course, Sport::Cyclisme, Sport::Natation, Sport::Randonnee];

    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Course => "course",
            Sport::Cyclisme => "cyclisme",
            Sport::Natation => "natation",
            Sport::Randonnee => "randonnee",
        }
    }

    pub fn speed_unit(self) -> SpeedUnit {
        match self {
            Sport::Natation => SpeedUnit::MetersPerSecond,
            Sport::Course | Sport::Cyclisme | Sport::Randonnee => SpeedUnit::KilometersPerHour,
        }
    }

    /// Wraps a free-text detail in the payload this sport carries, if any.
    pub fn detail(self, value: String) -> Option<SportDetail> {
        match self {
            Sport::Cyclisme => Some(SportDetail::BikeType(value)),
            Sport::Natation => Some(SportDetail::StrokeType(value)),
            Sport::Randonnee => Some(SportDetail::TerrainType(value)),
            Sport::Course => None,
        }
    }
}

impl FromStr for Sport {
    type Err = ActivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Sport::ALL
            .into_iter()
            .find(|sport| sport.as_str() == normalized)
            .ok_or_else(|| ActivityError::InvalidSportType(s.to_string()))
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SportDetail {
    BikeType(String),
    StrokeType(String),
    TerrainType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[serde(rename = "km/h")]
    KilometersPerHour,
    #[serde(rename = "m/s")]
    MetersPerSecond,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    pub value: f64,
    pub unit: SpeedUnit,
}

#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub id: Uuid,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub sport: Sport,
    pub date: NaiveDate,
    pub location: Option<String>,
    pub distance_km: f64,
    pub duration_hours: Option<f64>,
    pub sport_detail: Option<SportDetail>,
    pub speed: Speed,
    /// Present when the activity was built from a track file.
    pub metrics: Option<ActivityMetrics>,
    pub created_at: DateTime<Utc>,
}

/// User-supplied fields for a new activity. `sport` stays a raw string so an
/// unknown value surfaces as [`ActivityError::InvalidSportType`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityInput {
    #[serde(default)]
    pub title: String,
    pub sport: String,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub distance_km: Option<f64>,
    pub duration_hours: Option<f64>,
    pub sport_detail: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityPatch {
    pub title: Option<String>,
    pub sport: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub distance_km: Option<f64>,
    pub duration_hours: Option<f64>,
    pub sport_detail: Option<String>,
}
