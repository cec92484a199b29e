/// Document store abstraction
///
/// Collections of schemaless JSON documents addressed by `(collection, id)`,
/// mutated through a small set of primitives: whole-document set, shallow
/// field update, and array union/remove on a named top-level field. Array
/// element comparison is full structural equality of the JSON value.
///
/// None of the primitives span more than one document; callers that need
/// several writes sequence them and accept the gap between steps.
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

/// A stored document together with its id
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Equality filter on a top-level field
pub type Filter<'a> = (&'a str, Value);

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    /// Create or replace a document
    async fn set(&self, collection: &str, id: &str, data: Value) -> AppResult<()>;

    /// Merge top-level fields into an existing document
    ///
    /// Fails with `NotFound` when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Value) -> AppResult<()>;

    /// Append `value` to the array `field` unless an equal element is already present
    ///
    /// A missing field is treated as an empty array. Fails with `NotFound` when
    /// the document does not exist.
    async fn array_union(&self, collection: &str, id: &str, field: &str, value: Value)
        -> AppResult<()>;

    /// Remove every element equal to `value` from the array `field`
    ///
    /// A missing document, missing field or absent element is a no-op.
    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: &Value,
    ) -> AppResult<()>;

    /// Documents whose top-level fields equal every filter, ordered by id
    async fn query(&self, collection: &str, filters: &[Filter<'_>]) -> AppResult<Vec<Document>>;

    /// Delete a document; deleting a missing document is a no-op
    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;
}

pub(crate) fn not_found(collection: &str, id: &str) -> AppError {
    AppError::NotFound(format!("Document {}/{} does not exist", collection, id))
}

fn as_object_mut<'a>(
    data: &'a mut Value,
    collection: &str,
    id: &str,
) -> AppResult<&'a mut Map<String, Value>> {
    data.as_object_mut().ok_or_else(|| {
        AppError::Internal(format!("Document {}/{} is not an object", collection, id))
    })
}

/// In-process document store used when no database is configured and in tests
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> AppResult<()> {
        if !data.is_object() {
            return Err(AppError::InvalidInput(
                "Documents must be JSON objects".to_string(),
            ));
        }
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> AppResult<()> {
        let Value::Object(fields) = fields else {
            return Err(AppError::InvalidInput(
                "Update fields must be a JSON object".to_string(),
            ));
        };

        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| not_found(collection, id))?;
        let object = as_object_mut(doc, collection, id)?;
        for (key, value) in fields {
            object.insert(key, value);
        }
        Ok(())
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| not_found(collection, id))?;
        let object = as_object_mut(doc, collection, id)?;

        let entry = object
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Value::Array(items) = entry {
            if !items.contains(&value) {
                items.push(value);
            }
        }
        Ok(())
    }

    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: &Value,
    ) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        else {
            return Ok(());
        };

        if let Some(Value::Array(items)) = doc.get_mut(field) {
            items.retain(|item| item != value);
        }
        Ok(())
    }

    async fn query(&self, collection: &str, filters: &[Filter<'_>]) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|(_, data)| {
                filters
                    .iter()
                    .all(|(field, expected)| data.get(*field) == Some(expected))
            })
            .map(|(id, data)| Document {
                id: id.clone(),
                data: data.clone(),
            })
            .collect())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}
