use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named grouping of work, owned by the user who created it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub description: String,
    pub user_id: String,
}

/// Request body for creating a project.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewProject {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}
