use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unit of tracked work. `start_time` is the epoch-millis projection of
/// `start` computed once at creation so listings can order by recency
/// without re-parsing timestamps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    pub user_id: String,
    pub description: Option<String>,
    pub start: String,
    pub start_time: i64,
    pub stop: Option<String>,
    pub duration: Option<f64>,
    pub task_id: Option<String>,
    pub project_id: Option<String>,
}

/// Request body for creating a time entry. Required fields stay `Option`
/// here so their absence surfaces as a validation error rather than a
/// deserialization failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewTimeEntry {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub stop: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Request body for updating a time entry. Covers exactly the mutable
/// fields; `start`, `start_time` and `user_id` are immutable after create.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimeEntryPatch {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stop: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}
