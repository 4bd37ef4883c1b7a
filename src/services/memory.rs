use crate::models::Document;
use crate::services::store::{Collection, RecordStore, StoreError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// Process-local store; contents are lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    donations: RwLock<Vec<Document>>,
    ngo_requests: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, collection: Collection) -> &RwLock<Vec<Document>> {
        match collection {
            Collection::Donations => &self.donations,
            Collection::NgoRequests => &self.ngo_requests,
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        Ok(self.collection(collection).read().await.clone())
    }

    async fn insert(&self, collection: Collection, fields: Map<String, Value>) -> Result<String, StoreError> {
        let id = collection.new_id();
        self.collection(collection)
            .write()
            .await
            .push(Document::new(id.clone(), fields));

        tracing::info!("Added {} record: {}", collection, id);
        Ok(id)
    }

    fn name(&self) -> &'static str {
        "In-Memory"
    }
}
