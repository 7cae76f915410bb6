//! Storage abstractions for the record services.
//!
//! The services consume a narrow document-store contract: insert by key,
//! full-table scan, secondary-index equality query, and partial update by
//! key. Implementations declare their tables and secondary indexes up
//! front; the trait is injected into each service at construction time.

pub mod json_document_store;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A stored record: a flat JSON object keyed by attribute name.
pub type Document = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("unknown index {index} on table {table}")]
    UnknownIndex { table: String, index: String },
    #[error("record is missing a string `id` attribute")]
    MissingId,
    #[error("record did not serialize to an object")]
    NotAnObject,
}

/// Secondary index over one attribute, optionally ordered by a numeric
/// sort attribute maintained on the records themselves.
#[derive(Debug, Clone)]
pub struct IndexDef {
    pub name: String,
    pub key_attr: String,
    pub sort_attr: Option<String>,
}

/// A table and the secondary indexes the backend must maintain for it.
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub name: String,
    pub indexes: Vec<IndexDef>,
}

/// Equality condition on an indexed attribute.
#[derive(Debug, Clone)]
pub struct KeyCondition {
    pub attribute: String,
    pub value: Value,
}

impl KeyCondition {
    pub fn eq(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { attribute: attribute.into(), value: value.into() }
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist a new record. The record must carry a string `id` attribute.
    async fn put(&self, table: &str, record: Document) -> Result<(), StorageError>;

    /// All records of a table. When `index` is named, results are ordered
    /// by that index's sort attribute in the requested direction.
    async fn scan(
        &self,
        table: &str,
        index: Option<&str>,
        descending: bool,
    ) -> Result<Vec<Document>, StorageError>;

    /// Records matching an equality condition on an indexed attribute,
    /// ordered by the index's sort attribute.
    async fn query(
        &self,
        table: &str,
        index: &str,
        key: KeyCondition,
        descending: bool,
    ) -> Result<Vec<Document>, StorageError>;

    /// Assign the given attributes on the record at `key`. An unknown key
    /// is a silent no-op, not an error.
    async fn update(&self, table: &str, key: &str, assignments: Document) -> Result<(), StorageError>;
}

/// Serialize a typed record into a storage document.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StorageError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StorageError::NotAnObject),
    }
}

/// Deserialize a storage document back into a typed record.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, StorageError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}
