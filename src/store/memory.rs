use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{EntityStore, StoreError};

/// [`EntityStore`] kept entirely in process memory. Documents live in
/// insertion order per collection. The lock guards one operation at a time,
/// mirroring the single-document atomicity the Mongo store provides; there is
/// still no atomicity across operations.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

fn doc_id(document: &Document) -> Option<ObjectId> {
    document.get_object_id("_id").ok()
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, value)| document.get(key) == Some(value))
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get(&self, collection: &str, id: ObjectId) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        let found = collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| doc_id(d) == Some(id)).cloned());
        Ok(found)
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn create(&self, collection: &str, fields: Document) -> Result<Document, StoreError> {
        let mut document = fields;
        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        match docs.iter_mut().find(|d| doc_id(d) == Some(id)) {
            Some(document) => {
                for (key, value) in fields {
                    document.insert(key, value);
                }
                Ok(Some(document.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        match docs.iter().position(|d| doc_id(d) == Some(id)) {
            Some(index) => Ok(Some(docs.remove(index))),
            None => Ok(None),
        }
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| !matches(d, &filter));
        Ok((before - docs.len()) as u64)
    }

    async fn add_to_set(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| doc_id(d) == Some(id)))
            .ok_or(StoreError::NotFound)?;
        if !matches!(document.get(field), Some(Bson::Array(_))) {
            document.insert(field, Bson::Array(Vec::new()));
        }
        if let Some(Bson::Array(array)) = document.get_mut(field) {
            if !array.contains(&value) {
                array.push(value);
            }
        }
        Ok(())
    }

    async fn push(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| doc_id(d) == Some(id)))
            .ok_or(StoreError::NotFound)?;
        match document.get_mut(field) {
            Some(Bson::Array(array)) => array.push(value),
            _ => {
                document.insert(field, Bson::Array(vec![value]));
            }
        }
        Ok(())
    }

    async fn pull(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| doc_id(d) == Some(id)))
            .ok_or(StoreError::NotFound)?;
        if let Some(Bson::Array(array)) = document.get_mut(field) {
            array.retain(|element| element != &value);
        }
        Ok(())
    }

    async fn unset_field(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| doc_id(d) == Some(id)))
            .ok_or(StoreError::NotFound)?;
        document.remove(field);
        Ok(())
    }
}
