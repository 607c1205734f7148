//! In-memory resource collection.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{HandlerError, ResourceHandler};

#[derive(Debug, Default)]
struct Store {
    next_id: u64,
    items: BTreeMap<u64, Map<String, Value>>,
}

/// A resource whose members live in process memory.
///
/// Members are JSON objects. Identifiers are assigned sequentially from 1
/// and written into the `id` field; clients cannot override them.
#[derive(Debug, Default)]
pub struct MemoryResource {
    store: RwLock<Store>,
}

impl MemoryResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn parse_id(id: &str) -> Result<u64, HandlerError> {
    id.parse().map_err(|_| HandlerError::not_found(id))
}

fn into_object(body: Value) -> Result<Map<String, Value>, HandlerError> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(HandlerError::invalid(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn with_id(id: u64, mut fields: Map<String, Value>) -> Map<String, Value> {
    fields.insert("id".to_string(), Value::from(id));
    fields
}

#[async_trait]
impl ResourceHandler for MemoryResource {
    async fn list(&self) -> Result<Vec<Value>, HandlerError> {
        let store = self.store.read().await;
        Ok(store
            .items
            .values()
            .cloned()
            .map(Value::Object)
            .collect())
    }

    async fn create(&self, body: Value) -> Result<Value, HandlerError> {
        let fields = into_object(body)?;
        let mut store = self.store.write().await;
        store.next_id += 1;
        let id = store.next_id;
        let item = with_id(id, fields);
        store.items.insert(id, item.clone());
        Ok(Value::Object(item))
    }

    async fn retrieve(&self, id: &str) -> Result<Value, HandlerError> {
        let key = parse_id(id)?;
        let store = self.store.read().await;
        store
            .items
            .get(&key)
            .cloned()
            .map(Value::Object)
            .ok_or_else(|| HandlerError::not_found(id))
    }

    async fn update(&self, id: &str, body: Value) -> Result<Value, HandlerError> {
        let key = parse_id(id)?;
        let fields = into_object(body)?;
        let mut store = self.store.write().await;
        let slot = store
            .items
            .get_mut(&key)
            .ok_or_else(|| HandlerError::not_found(id))?;
        *slot = with_id(key, fields);
        Ok(Value::Object(slot.clone()))
    }

    async fn partial_update(&self, id: &str, body: Value) -> Result<Value, HandlerError> {
        let key = parse_id(id)?;
        let fields = into_object(body)?;
        let mut store = self.store.write().await;
        let slot = store
            .items
            .get_mut(&key)
            .ok_or_else(|| HandlerError::not_found(id))?;
        for (field, value) in fields {
            if field != "id" {
                slot.insert(field, value);
            }
        }
        Ok(Value::Object(slot.clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), HandlerError> {
        let key = parse_id(id)?;
        let mut store = self.store.write().await;
        store
            .items
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| HandlerError::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let resource = MemoryResource::new();

        let first = resource.create(json!({"title": "a", "id": 99})).await.unwrap();
        let second = resource.create(json!({"title": "b"})).await.unwrap();

        assert_eq!(first, json!({"id": 1, "title": "a"}));
        assert_eq!(second["id"], 2);
        assert_eq!(resource.len().await, 2);
    }

    #[tokio::test]
    async fn test_create_rejects_non_object() {
        let resource = MemoryResource::new();
        let err = resource.create(json!([1, 2])).await.unwrap_err();

        assert!(matches!(err, HandlerError::Invalid(_)));
        assert!(resource.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_replaces_and_patch_merges() {
        let resource = MemoryResource::new();
        resource
            .create(json!({"title": "a", "code": "print(1)"}))
            .await
            .unwrap();

        let patched = resource
            .partial_update("1", json!({"title": "b", "id": 5}))
            .await
            .unwrap();
        assert_eq!(patched, json!({"id": 1, "title": "b", "code": "print(1)"}));

        let replaced = resource.update("1", json!({"title": "c"})).await.unwrap();
        assert_eq!(replaced, json!({"id": 1, "title": "c"}));
        assert_eq!(resource.retrieve("1").await.unwrap(), replaced);
    }

    #[tokio::test]
    async fn test_missing_members() {
        let resource = MemoryResource::new();

        assert!(matches!(resource.retrieve("1").await, Err(HandlerError::NotFound(_))));
        assert!(matches!(resource.retrieve("abc").await, Err(HandlerError::NotFound(_))));
        assert!(matches!(resource.delete("3").await, Err(HandlerError::NotFound(_))));
        assert!(matches!(
            resource.update("3", json!({})).await,
            Err(HandlerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_then_list() {
        let resource = MemoryResource::new();
        resource.create(json!({"n": 1})).await.unwrap();
        resource.create(json!({"n": 2})).await.unwrap();

        resource.delete("1").await.unwrap();
        let items = resource.list().await.unwrap();

        assert_eq!(items, vec![json!({"id": 2, "n": 2})]);
    }
}
