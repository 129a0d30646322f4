use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::activity::{Activity, Sport};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SportTotals {
    pub count: usize,
    pub distance_km: f64,
    pub duration_hours: f64,
}

impl SportTotals {
    fn add(&mut self, activity: &Activity) {
        self.count += 1;
        self.distance_km += activity.distance_km;
        self.duration_hours += activity.duration_hours.unwrap_or(0.0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerStats {
    pub owner_id: i64,
    pub totals: SportTotals,
    pub by_sport: BTreeMap<Sport, SportTotals>,
}

impl OwnerStats {
    pub fn from_activities<'a>(owner_id: i64, activities: impl IntoIterator<Item = &'a Activity>) -> Self {
        let mut totals = SportTotals::default();
        let mut by_sport: BTreeMap<Sport, SportTotals> = BTreeMap::new();

        for activity in activities {
            totals.add(activity);
            by_sport.entry(activity.sport).or_default().add(activity);
        }

        Self {
            owner_id,
            totals,
            by_sport,
        }
    }
}
