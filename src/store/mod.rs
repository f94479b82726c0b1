pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::sync::Arc;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

pub const CINES: &str = "cines";
pub const SALAS: &str = "salas";
pub const PELICULAS: &str = "peliculas";
pub const HORARIOS: &str = "horarios";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("documento no encontrado")]
    NotFound,
    #[error("error de base de datos: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Document store reachable by id. Every operation is scoped to a single
/// document; there is no cross-document atomicity.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get(&self, collection: &str, id: ObjectId) -> Result<Option<Document>, StoreError>;

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Inserts the document, assigning a fresh `_id` when none is present,
    /// and returns the stored document.
    async fn create(&self, collection: &str, fields: Document) -> Result<Document, StoreError>;

    /// `$set`s the given fields and returns the updated document, or `None`
    /// if the id does not resolve.
    async fn update_fields(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Deletes and returns the document, or `None` if the id does not resolve.
    async fn delete(&self, collection: &str, id: ObjectId)
        -> Result<Option<Document>, StoreError>;

    /// Deletes every document matching the flat equality filter, returning
    /// the number removed.
    async fn delete_many(&self, collection: &str, filter: Document) -> Result<u64, StoreError>;

    /// Idempotent append: adds `value` to the array field unless already
    /// present. Fails with `NotFound` if the id does not resolve.
    async fn add_to_set(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<(), StoreError>;

    /// Non-idempotent append to an array field.
    async fn push(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<(), StoreError>;

    /// Removes every occurrence of `value` from the array field.
    async fn pull(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<(), StoreError>;

    /// Removes the field from the document entirely.
    async fn unset_field(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
    ) -> Result<(), StoreError>;
}

pub type DynStore = Arc<dyn EntityStore>;
