use super::model::Meeting;
use super::store::{newest_first, MeetingStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Meetings persisted as JSON documents in an embedded sled database,
/// keyed by meeting id. Versioned writes map onto sled's compare-and-swap.
///
/// Writes to existing meetings are serialized through `writes`; the swap
/// still checks the stored bytes so a concurrent delete is noticed.
pub struct SledStore {
    db: sled::Db,
    writes: Mutex<()>,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        info!("Opening meeting database at {}", path.display());
        let db = sled::open(path)?;
        Ok(Self {
            db,
            writes: Mutex::new(()),
        })
    }

    fn decode(bytes: &[u8]) -> StoreResult<Meeting> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[async_trait]
impl MeetingStore for SledStore {
    async fn insert(&self, mut meeting: Meeting) -> StoreResult<Meeting> {
        meeting.version = 1;
        let bytes = serde_json::to_vec(&meeting)?;

        if let Err(e) = self
            .db
            .compare_and_swap(meeting.id.as_bytes(), None as Option<&[u8]>, Some(bytes))?
        {
            let found = match e.current {
                Some(current) => Self::decode(&current)?.version,
                None => 0,
            };
            return Err(StoreError::Conflict {
                id: meeting.id,
                expected: 0,
                found,
            });
        }

        self.db.flush_async().await?;
        Ok(meeting)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Meeting>> {
        match self.db.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, user_id: Option<&str>) -> StoreResult<Vec<Meeting>> {
        let mut found = Vec::new();
        for entry in self.db.iter() {
            let (_, bytes) = entry?;
            let meeting = Self::decode(&bytes)?;
            if user_id.map_or(true, |u| meeting.user_id == u) {
                found.push(meeting);
            }
        }
        newest_first(&mut found);
        Ok(found)
    }

    async fn update(
        &self,
        id: &str,
        apply: &mut (dyn for<'m> FnMut(&'m mut Meeting) + Send),
    ) -> StoreResult<Meeting> {
        let _guard = self.writes.lock().await;

        loop {
            let current_bytes = self
                .db
                .get(id.as_bytes())?
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            let mut meeting = Self::decode(&current_bytes)?;
            let version = meeting.version;

            apply(&mut meeting);
            meeting.id = id.to_string();
            meeting.version = version + 1;
            let bytes = serde_json::to_vec(&meeting)?;

            match self
                .db
                .compare_and_swap(id.as_bytes(), Some(current_bytes), Some(bytes))?
            {
                Ok(()) => {
                    self.db.flush_async().await?;
                    return Ok(meeting);
                }
                Err(e) if e.current.is_none() => {
                    return Err(StoreError::NotFound(id.to_string()));
                }
                Err(_) => debug!("Meeting {} changed underneath an update, reapplying", id),
            }
        }
    }

    async fn replace(&self, mut meeting: Meeting) -> StoreResult<Meeting> {
        let _guard = self.writes.lock().await;
        let current_bytes = self
            .db
            .get(meeting.id.as_bytes())?
            .ok_or_else(|| StoreError::NotFound(meeting.id.clone()))?;
        let current = Self::decode(&current_bytes)?;

        if current.version != meeting.version {
            return Err(StoreError::Conflict {
                id: meeting.id.clone(),
                expected: meeting.version,
                found: current.version,
            });
        }

        meeting.version += 1;
        let bytes = serde_json::to_vec(&meeting)?;

        // Another writer may have landed between the read and the swap
        if let Err(e) =
            self.db
                .compare_and_swap(meeting.id.as_bytes(), Some(current_bytes), Some(bytes))?
        {
            let found = match e.current {
                Some(bytes) => Self::decode(&bytes)?.version,
                None => return Err(StoreError::NotFound(meeting.id.clone())),
            };
            return Err(StoreError::Conflict {
                id: meeting.id.clone(),
                expected: meeting.version - 1,
                found,
            });
        }

        self.db.flush_async().await?;
        Ok(meeting)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.writes.lock().await;
        let removed = self.db.remove(id.as_bytes())?.is_some();
        self.db.flush_async().await?;
        Ok(removed)
    }

    fn name(&self) -> &str {
        "sled"
    }
}
