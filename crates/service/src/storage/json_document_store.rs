use std::{collections::HashMap, path::PathBuf, sync::Arc};

use tokio::{fs, sync::RwLock};

use super::{Document, IndexDef, KeyCondition, Storage, StorageError, TableSpec};

type Table = HashMap<String, Document>;

/// JSON file-backed document store.
///
/// Keeps every table in memory behind an `RwLock` and persists the whole
/// map to a single JSON file after each mutation. Intended for a
/// single-process deployment where a database is overkill.
pub struct JsonDocumentStore {
    tables: RwLock<HashMap<String, Table>>,
    specs: HashMap<String, TableSpec>,
    file_path: PathBuf,
}

impl JsonDocumentStore {
    /// Initialize the store from a path. Missing files start every declared
    /// table empty; existing files are loaded as-is.
    pub async fn new<P: Into<PathBuf>>(
        path: P,
        specs: Vec<TableSpec>,
    ) -> Result<Arc<Self>, StorageError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let mut tables: HashMap<String, Table> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => HashMap::new(),
        };
        for spec in &specs {
            tables.entry(spec.name.clone()).or_default();
        }
        let specs = specs.into_iter().map(|s| (s.name.clone(), s)).collect();

        let store = Arc::new(Self { tables: RwLock::new(tables), specs, file_path });
        store.save().await?;
        Ok(store)
    }

    async fn save(&self) -> Result<(), StorageError> {
        let tables = self.tables.read().await;
        let data = serde_json::to_vec(&*tables)?;
        fs::write(&self.file_path, data).await?;
        Ok(())
    }

    fn index_def(&self, table: &str, index: &str) -> Result<&IndexDef, StorageError> {
        let spec = self
            .specs
            .get(table)
            .ok_or_else(|| StorageError::UnknownTable(table.to_string()))?;
        spec.indexes.iter().find(|i| i.name == index).ok_or_else(|| {
            StorageError::UnknownIndex { table: table.to_string(), index: index.to_string() }
        })
    }
}

/// Order documents by a numeric attribute; records missing the attribute
/// sort first in ascending order.
fn sort_by_attr(docs: &mut [Document], attr: &str, descending: bool) {
    docs.sort_by(|a, b| {
        let av = a.get(attr).and_then(serde_json::Value::as_f64).unwrap_or(f64::MIN);
        let bv = b.get(attr).and_then(serde_json::Value::as_f64).unwrap_or(f64::MIN);
        av.partial_cmp(&bv).unwrap_or(std::cmp::Ordering::Equal)
    });
    if descending {
        docs.reverse();
    }
}

#[async_trait::async_trait]
impl Storage for JsonDocumentStore {
    async fn put(&self, table: &str, record: Document) -> Result<(), StorageError> {
        let id = record
            .get("id")
            .and_then(serde_json::Value::as_str)
            .ok_or(StorageError::MissingId)?
            .to_string();

        let mut tables = self.tables.write().await;
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StorageError::UnknownTable(table.to_string()))?;
        t.insert(id, record);
        drop(tables);
        self.save().await
    }

    async fn scan(
        &self,
        table: &str,
        index: Option<&str>,
        descending: bool,
    ) -> Result<Vec<Document>, StorageError> {
        let sort_attr = match index {
            Some(name) => self.index_def(table, name)?.sort_attr.clone(),
            None => None,
        };

        let tables = self.tables.read().await;
        let t = tables
            .get(table)
            .ok_or_else(|| StorageError::UnknownTable(table.to_string()))?;
        let mut docs: Vec<Document> = t.values().cloned().collect();
        drop(tables);

        if let Some(attr) = sort_attr {
            sort_by_attr(&mut docs, &attr, descending);
        }
        Ok(docs)
    }

    async fn query(
        &self,
        table: &str,
        index: &str,
        key: KeyCondition,
        descending: bool,
    ) -> Result<Vec<Document>, StorageError> {
        let sort_attr = self.index_def(table, index)?.sort_attr.clone();

        let tables = self.tables.read().await;
        let t = tables
            .get(table)
            .ok_or_else(|| StorageError::UnknownTable(table.to_string()))?;
        let mut docs: Vec<Document> = t
            .values()
            .filter(|doc| doc.get(&key.attribute) == Some(&key.value))
            .cloned()
            .collect();
        drop(tables);

        if let Some(attr) = sort_attr {
            sort_by_attr(&mut docs, &attr, descending);
        }
        Ok(docs)
    }

    async fn update(&self, table: &str, key: &str, assignments: Document) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StorageError::UnknownTable(table.to_string()))?;
        let Some(doc) = t.get_mut(key) else {
            // last-write-wins semantics: updating a missing record is a no-op
            return Ok(());
        };
        for (attr, value) in assignments {
            doc.insert(attr, value);
        }
        drop(tables);
        self.save().await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn spec() -> TableSpec {
        TableSpec {
            name: "records".into(),
            indexes: vec![IndexDef {
                name: "owner-rank-index".into(),
                key_attr: "owner".into(),
                sort_attr: Some("rank".into()),
            }],
        }
    }

    fn doc(id: &str, owner: &str, rank: i64) -> Document {
        match json!({"id": id, "owner": owner, "rank": rank}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_document_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn put_scan_query_update_persist() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonDocumentStore::new(&tmp, vec![spec()]).await?;

        assert_eq!(store.scan("records", None, false).await?.len(), 0);

        store.put("records", doc("a", "u1", 3)).await?;
        store.put("records", doc("b", "u1", 1)).await?;
        store.put("records", doc("c", "u2", 2)).await?;

        // index scan orders by the sort attribute
        let all = store.scan("records", Some("owner-rank-index"), true).await?;
        let ranks: Vec<i64> = all.iter().map(|d| d["rank"].as_i64().unwrap()).collect();
        assert_eq!(ranks, vec![3, 2, 1]);

        // query filters on the key attribute
        let owned = store
            .query("records", "owner-rank-index", KeyCondition::eq("owner", "u1"), true)
            .await?;
        let ids: Vec<&str> = owned.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        // partial update touches only the assigned attribute
        let mut assignments = Document::new();
        assignments.insert("rank".into(), json!(9));
        store.update("records", "b", assignments).await?;
        let owned = store
            .query("records", "owner-rank-index", KeyCondition::eq("owner", "u1"), true)
            .await?;
        assert_eq!(owned[0]["id"], "b");
        assert_eq!(owned[0]["owner"], "u1");

        // unknown key is a no-op
        let mut assignments = Document::new();
        assignments.insert("rank".into(), json!(0));
        store.update("records", "nope", assignments).await?;
        assert_eq!(store.scan("records", None, false).await?.len(), 3);

        // a reloaded store sees prior writes
        let reloaded = JsonDocumentStore::new(&tmp, vec![spec()]).await?;
        assert_eq!(reloaded.scan("records", None, false).await?.len(), 3);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn rejects_unknown_table_and_index() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonDocumentStore::new(&tmp, vec![spec()]).await?;

        assert!(matches!(
            store.scan("missing", None, false).await,
            Err(StorageError::UnknownTable(_))
        ));
        assert!(matches!(
            store.scan("records", Some("missing-index"), false).await,
            Err(StorageError::UnknownIndex { .. })
        ));

        let mut no_id = Document::new();
        no_id.insert("owner".into(), json!("u1"));
        assert!(matches!(store.put("records", no_id).await, Err(StorageError::MissingId)));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
