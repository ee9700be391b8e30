use super::model::Meeting;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Meeting {0} not found")]
    NotFound(String),

    #[error("Meeting {id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict { id: String, expected: u64, found: u64 },

    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Document collection holding meetings with their embedded submissions
/// and analysis results.
///
/// Every write bumps `version`. `update` applies a change to the stored
/// copy as one atomic step, so concurrent updates are serialized and none
/// is lost. `replace` is the optimistic path for callers holding a copy:
/// it only succeeds when that copy carries the version currently stored.
#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Persist a new meeting; the stored copy starts at version 1
    async fn insert(&self, meeting: Meeting) -> StoreResult<Meeting>;

    async fn get(&self, id: &str) -> StoreResult<Option<Meeting>>;

    /// Meetings newest first, optionally restricted to one owner
    async fn list(&self, user_id: Option<&str>) -> StoreResult<Vec<Meeting>>;

    /// Apply `apply` to the stored meeting and persist the result atomically;
    /// returns the stored copy with its bumped version
    async fn update(
        &self,
        id: &str,
        apply: &mut (dyn for<'m> FnMut(&'m mut Meeting) + Send),
    ) -> StoreResult<Meeting>;

    /// Compare-and-swap on `meeting.version`; returns the stored copy with
    /// its bumped version
    async fn replace(&self, meeting: Meeting) -> StoreResult<Meeting>;

    /// Returns false when nothing was stored under `id`
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Apply `apply` to a meeting through `MeetingStore::update`
pub async fn update_meeting<F>(
    store: &dyn MeetingStore,
    id: &str,
    mut apply: F,
) -> StoreResult<Meeting>
where
    F: FnMut(&mut Meeting) + Send,
{
    store.update(id, &mut apply).await
}

pub(super) fn newest_first(meetings: &mut [Meeting]) {
    meetings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Process-local store, the default backend
#[derive(Default)]
pub struct MemoryStore {
    meetings: RwLock<HashMap<String, Meeting>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MeetingStore for MemoryStore {
    async fn insert(&self, mut meeting: Meeting) -> StoreResult<Meeting> {
        meeting.version = 1;
        let mut meetings = self.meetings.write().await;
        meetings.insert(meeting.id.clone(), meeting.clone());
        Ok(meeting)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Meeting>> {
        let meetings = self.meetings.read().await;
        Ok(meetings.get(id).cloned())
    }

    async fn list(&self, user_id: Option<&str>) -> StoreResult<Vec<Meeting>> {
        let meetings = self.meetings.read().await;
        let mut found: Vec<Meeting> = meetings
            .values()
            .filter(|m| user_id.map_or(true, |u| m.user_id == u))
            .cloned()
            .collect();
        newest_first(&mut found);
        Ok(found)
    }

    async fn update(
        &self,
        id: &str,
        apply: &mut (dyn for<'m> FnMut(&'m mut Meeting) + Send),
    ) -> StoreResult<Meeting> {
        let mut meetings = self.meetings.write().await;
        let stored = meetings
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let version = stored.version;
        apply(stored);
        stored.id = id.to_string();
        stored.version = version + 1;
        Ok(stored.clone())
    }

    async fn replace(&self, mut meeting: Meeting) -> StoreResult<Meeting> {
        let mut meetings = self.meetings.write().await;
        let current = meetings
            .get(&meeting.id)
            .ok_or_else(|| StoreError::NotFound(meeting.id.clone()))?;

        if current.version != meeting.version {
            return Err(StoreError::Conflict {
                id: meeting.id.clone(),
                expected: meeting.version,
                found: current.version,
            });
        }

        meeting.version += 1;
        meetings.insert(meeting.id.clone(), meeting.clone());
        Ok(meeting)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut meetings = self.meetings.write().await;
        Ok(meetings.remove(id).is_some())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
