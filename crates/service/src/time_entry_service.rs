use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use models::time_entry::{NewTimeEntry, TimeEntry, TimeEntryPatch};

use crate::errors::{ServiceError, ValidationCode};
use crate::storage::{
    from_document, to_document, Document, IndexDef, KeyCondition, Storage, TableSpec,
};
use crate::validation::{ensure_stop_duration_paired, parse_start_millis, require_non_empty};

pub const TIME_ENTRIES_TABLE: &str = "time-entries";
pub const USER_START_TIME_INDEX: &str = "user_id-start_time-index";

/// Table layout the storage backend must provide for time entries.
pub fn table_spec() -> TableSpec {
    TableSpec {
        name: TIME_ENTRIES_TABLE.to_string(),
        indexes: vec![IndexDef {
            name: USER_START_TIME_INDEX.to_string(),
            key_attr: "user_id".to_string(),
            sort_attr: Some("start_time".to_string()),
        }],
    }
}

/// Application service encapsulating time entry business rules: conditional
/// field requirements, the derived sort key, and per-user lookups.
pub struct TimeEntryService<S: Storage> {
    storage: Arc<S>,
}

impl<S: Storage> TimeEntryService<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// All time entries, most recent first.
    pub async fn list_all(&self) -> Result<Vec<TimeEntry>, ServiceError> {
        let docs = self
            .storage
            .scan(TIME_ENTRIES_TABLE, Some(USER_START_TIME_INDEX), true)
            .await?;
        collect_entries(docs)
    }

    /// The given user's time entries, most recent first.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<TimeEntry>, ServiceError> {
        let user_id = require_non_empty(
            Some(user_id),
            ValidationCode::UserIdRequired,
            "a user id must be specified",
        )?;
        let docs = self
            .storage
            .query(
                TIME_ENTRIES_TABLE,
                USER_START_TIME_INDEX,
                KeyCondition::eq("user_id", user_id),
                true,
            )
            .await?;
        collect_entries(docs)
    }

    /// Validate and persist a new time entry. `start_time` is derived from
    /// `start` here, once, so listings never re-parse timestamps.
    pub async fn create(&self, input: NewTimeEntry) -> Result<TimeEntry, ServiceError> {
        let start = require_non_empty(
            input.start.as_deref(),
            ValidationCode::StartRequired,
            "a start date must be specified",
        )?;
        let user_id = require_non_empty(
            input.user_id.as_deref(),
            ValidationCode::UserIdRequired,
            "a user id must be specified",
        )?;
        ensure_stop_duration_paired(input.stop.as_deref(), input.duration)?;
        let start_time = parse_start_millis(&start)?;

        let entry = TimeEntry {
            id: Uuid::new_v4(),
            user_id,
            description: input.description,
            start,
            start_time,
            stop: input.stop,
            duration: input.duration,
            task_id: input.task_id,
            project_id: input.project_id,
        };
        self.storage.put(TIME_ENTRIES_TABLE, to_document(&entry)?).await?;
        info!(id = %entry.id, user_id = %entry.user_id, "created time entry");
        Ok(entry)
    }

    /// Apply a partial update to the mutable fields of the entry at `id`:
    /// description, stop, duration, task_id and project_id. `start`,
    /// `start_time` and `user_id` are never touched. An unknown id is a
    /// silent no-op.
    pub async fn update_by_id(&self, id: &str, patch: TimeEntryPatch) -> Result<(), ServiceError> {
        let id = require_non_empty(
            Some(id),
            ValidationCode::IdRequired,
            "a time entry id must be specified",
        )?;
        ensure_stop_duration_paired(patch.stop.as_deref(), patch.duration)?;

        let assignments = to_document(&patch)?;
        self.storage.update(TIME_ENTRIES_TABLE, &id, assignments).await?;
        info!(%id, "updated time entry");
        Ok(())
    }
}

fn collect_entries(docs: Vec<Document>) -> Result<Vec<TimeEntry>, ServiceError> {
    docs.into_iter()
        .map(|d| from_document(d).map_err(ServiceError::from))
        .collect()
}
