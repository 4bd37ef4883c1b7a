use crate::config::FirestoreSettings;
use crate::models::Document;
use crate::services::store::{Collection, RecordStore, StoreError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Firestore REST API client
///
/// Handles all communication with the document database:
/// - Listing a collection, following page tokens
/// - Creating documents with server-assigned ids
/// - Converting between Firestore typed values and plain JSON
pub struct FirestoreStore {
    base_url: String,
    project_id: String,
    database_id: String,
    access_token: Option<String>,
    api_key: Option<String>,
    page_size: u32,
    client: Client,
}

impl FirestoreStore {
    /// Create a new Firestore client
    pub fn new(
        base_url: String,
        project_id: String,
        database_id: String,
        access_token: Option<String>,
        api_key: Option<String>,
        page_size: u32,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            project_id,
            database_id,
            access_token,
            api_key,
            page_size,
            client,
        })
    }

    pub fn from_settings(settings: &FirestoreSettings) -> Result<Self, StoreError> {
        if settings.project_id.is_empty() {
            return Err(StoreError::NotConfigured("firestore project_id is empty".into()));
        }

        tracing::info!("Using Firestore project {} ({})", settings.project_id, settings.database_id);

        Self::new(
            settings.endpoint.clone(),
            settings.project_id.clone(),
            settings.database_id.clone(),
            settings.access_token.clone(),
            settings.api_key.clone(),
            settings.page_size,
        )
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents/{}",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.database_id,
            collection.name()
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    async fn check(response: Response, action: &str) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Firestore {} failed: {} - {}", action, status, body);
        Err(StoreError::ApiError(format!("Failed to {}: {}", action, status)))
    }
}

#[async_trait]
impl RecordStore for FirestoreStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", self.page_size.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            tracing::debug!("Listing {} from: {}", collection, url);

            let response = Self::check(self.authorize(request).send().await?, "list documents").await?;
            let json: Value = response.json().await?;

            // An empty collection comes back as `{}`
            if let Some(page) = json.get("documents") {
                let page = page
                    .as_array()
                    .ok_or_else(|| StoreError::InvalidResponse("documents is not an array".into()))?;
                for doc in page {
                    documents.push(decode_document(doc)?);
                }
            }

            page_token = json
                .get("nextPageToken")
                .and_then(|t| t.as_str())
                .filter(|t| !t.is_empty())
                .map(str::to_string);

            if page_token.is_none() {
                break;
            }
        }

        tracing::debug!("Fetched {} documents from {}", documents.len(), collection);

        Ok(documents)
    }

    async fn insert(&self, collection: Collection, fields: Map<String, Value>) -> Result<String, StoreError> {
        let url = self.collection_url(collection);
        let payload = json!({ "fields": encode_fields(&fields) });

        let request = self.client.post(&url).json(&payload);
        let response = Self::check(self.authorize(request).send().await?, "create document").await?;
        let json: Value = response.json().await?;

        let created = decode_document(&json)?;
        tracing::info!("Added {} record: {}", collection, created.id);

        Ok(created.id)
    }

    fn name(&self) -> &'static str {
        "Firestore"
    }
}

/// Turn a Firestore document resource into a plain document
///
/// The id is the last segment of the resource name.
fn decode_document(doc: &Value) -> Result<Document, StoreError> {
    let name = doc
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| StoreError::InvalidResponse("document without name".into()))?;
    let id = name.rsplit('/').next().unwrap_or(name).to_string();

    let fields = doc
        .get("fields")
        .and_then(|f| f.as_object())
        .map(decode_fields)
        .unwrap_or_default();

    Ok(Document::new(id, fields))
}

fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "booleanValue" | "doubleValue" => inner.clone(),
        // int64 travels as a decimal string
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or_else(|| inner.clone()),
        "mapValue" => inner
            .get("fields")
            .and_then(|f| f.as_object())
            .map(|f| Value::Object(decode_fields(f)))
            .unwrap_or_else(|| Value::Object(Map::new())),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(|v| v.as_array())
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "geoPointValue" => json!([inner.get("latitude"), inner.get("longitude")]),
        _ => Value::Null,
    }
}

fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(values) => json!({
            "arrayValue": { "values": values.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}
