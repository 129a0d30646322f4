use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::types::activity::Activity;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: ActivityStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            store: ActivityStore::new(),
        }
    }
}

/// In-memory activity storage shared across requests.
#[derive(Clone, Default)]
pub struct ActivityStore {
    activities: Arc<DashMap<Uuid, Activity>>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, activity: Activity) {
        self.activities.insert(activity.id, activity);
    }

    pub fn get(&self, id: Uuid) -> Option<Activity> {
        self.activities.get(&id).map(|entry| entry.value().clone())
    }

    /// The owner's activities, newest date first.
    pub fn list_for_owner(&self, owner_id: i64) -> Vec<Activity> {
        let mut activities: Vec<Activity> = self
            .activities
            .iter()
            .filter(|entry| entry.owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();
        activities.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        activities
    }

    /// Replaces an activity with the result of `edit`, holding the entry lock
    /// for the duration so concurrent edits cannot interleave.
    pub fn update<F>(&self, id: Uuid, owner_id: i64, edit: F) -> Result<Activity, AppError>
    where
        F: FnOnce(&Activity) -> Result<Activity, AppError>,
    {
        let mut entry = self
            .activities
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        ensure_owner(entry.value(), owner_id)?;

        let updated = edit(entry.value())?;
        *entry = updated.clone();
        Ok(updated)
    }

    pub fn remove(&self, id: Uuid, owner_id: i64) -> Result<Activity, AppError> {
        let removed = self
            .activities
            .remove_if(&id, |_, activity| activity.owner_id == owner_id);

        match removed {
            Some((_, activity)) => Ok(activity),
            None if self.activities.contains_key(&id) => {
                Err(AppError::Forbidden(format!("activity {} belongs to another user", id)))
            }
            None => Err(AppError::NotFound(id.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

fn ensure_owner(activity: &Activity, owner_id: i64) -> Result<(), AppError> {
    if activity.owner_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "activity {} belongs to another user",
            activity.id
        )))
    }
}
