use crate::models::Document;
use crate::services::store::{Collection, RecordStore, StoreError};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

/// Read-only store serving a fixed New York dataset
#[derive(Debug, Clone)]
pub struct SampleStore {
    donations: Vec<Document>,
    ngo_requests: Vec<Document>,
}

impl SampleStore {
    pub fn new() -> Self {
        let donations = vec![
            document("donor_1", json!({
                "foodType": "Rice",
                "quantity": "10 kg",
                "expiryTime": 48,
                "location": "New York, NY",
                "timestamp": "2023-12-01T10:30:00Z"
            })),
            document("donor_2", json!({
                "foodType": "Bread",
                "quantity": "20 loaves",
                "expiryTime": 24,
                "location": "Brooklyn, NY",
                "timestamp": "2023-12-01T11:15:00Z"
            })),
            document("donor_3", json!({
                "foodType": "Vegetables",
                "quantity": "5 kg",
                "expiryTime": 72,
                "location": "Queens, NY",
                "timestamp": "2023-12-01T09:45:00Z"
            })),
        ];

        let ngo_requests = vec![
            document("ngo_1", json!({
                "ngoName": "Food Bank NYC",
                "foodNeeded": "Rice, Bread, Vegetables",
                "location": "Manhattan, NY",
                "timestamp": "2023-12-01T08:30:00Z"
            })),
            document("ngo_2", json!({
                "ngoName": "Community Kitchen",
                "foodNeeded": "Bread, Vegetables",
                "location": "Bronx, NY",
                "timestamp": "2023-12-01T09:00:00Z"
            })),
            document("ngo_3", json!({
                "ngoName": "Homeless Shelter",
                "foodNeeded": "Rice, Bread",
                "location": "Staten Island, NY",
                "timestamp": "2023-12-01T07:45:00Z"
            })),
        ];

        Self {
            donations,
            ngo_requests,
        }
    }
}

impl Default for SampleStore {
    fn default() -> Self {
        Self::new()
    }
}

fn document(id: &str, fields: Value) -> Document {
    let fields = match fields {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Document::new(id, fields)
}

#[async_trait]
impl RecordStore for SampleStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        Ok(match collection {
            Collection::Donations => self.donations.clone(),
            Collection::NgoRequests => self.ngo_requests.clone(),
        })
    }

    async fn insert(&self, _collection: Collection, _fields: Map<String, Value>) -> Result<String, StoreError> {
        Err(StoreError::ReadOnly("Sample dataset"))
    }

    fn name(&self) -> &'static str {
        "Sample Dataset"
    }
}
