use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Client,
};

use super::{EntityStore, StoreError};

/// [`EntityStore`] backed by a MongoDB database.
pub struct MongoStore {
    client: Client,
    database: String,
}

impl MongoStore {
    pub fn new(client: Client, database: impl Into<String>) -> Self {
        MongoStore {
            client,
            database: database.into(),
        }
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.client.database(&self.database).collection(name)
    }
}

#[async_trait]
impl EntityStore for MongoStore {
    async fn get(&self, collection: &str, id: ObjectId) -> Result<Option<Document>, StoreError> {
        let found = self
            .collection(collection)
            .find_one(doc! {"_id": id}, None)
            .await?;
        Ok(found)
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let mut cursor = self.collection(collection).find(None, None).await?;
        let mut result = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            result.push(document);
        }
        Ok(result)
    }

    async fn create(&self, collection: &str, fields: Document) -> Result<Document, StoreError> {
        let mut document = fields;
        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }
        self.collection(collection)
            .insert_one(document.clone(), None)
            .await?;
        Ok(document)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<Option<Document>, StoreError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .collection(collection)
            .find_one_and_update(doc! {"_id": id}, doc! {"$set": fields}, options)
            .await?;
        Ok(updated)
    }

    async fn delete(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let deleted = self
            .collection(collection)
            .find_one_and_delete(doc! {"_id": id}, None)
            .await?;
        Ok(deleted)
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let result = self.collection(collection).delete_many(filter, None).await?;
        Ok(result.deleted_count)
    }

    async fn add_to_set(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        value: Bson,
    ) -> Result<(), StoreError> {
        let mut entry = Document::new();
        entry.insert(field, value);
        let result = self
            .collection(collection)
            .update_one(doc! {"_id": id}, doc! {"$addToSet": entry}, None)
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
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
        let mut entry = Document::new();
        entry.insert(field, value);
        let result = self
            .collection(collection)
            .update_one(doc! {"_id": id}, doc! {"$push": entry}, None)
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
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
        let mut entry = Document::new();
        entry.insert(field, value);
        let result = self
            .collection(collection)
            .update_one(doc! {"_id": id}, doc! {"$pull": entry}, None)
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn unset_field(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
    ) -> Result<(), StoreError> {
        let mut entry = Document::new();
        entry.insert(field, "");
        let result = self
            .collection(collection)
            .update_one(doc! {"_id": id}, doc! {"$unset": entry}, None)
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
