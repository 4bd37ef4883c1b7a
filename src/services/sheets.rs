use crate::config::SheetsSettings;
use crate::models::Document;
use crate::services::store::{Collection, RecordStore, StoreError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Header row and field key for each column, in sheet order
const DONATION_COLUMNS: &[(&str, &str)] = &[
    ("ID", "id"),
    ("Food Type", "foodType"),
    ("Quantity", "quantity"),
    ("Expiry Time (hours)", "expiryTime"),
    ("Location", "location"),
    ("Timestamp", "timestamp"),
];

const NGO_COLUMNS: &[(&str, &str)] = &[
    ("ID", "id"),
    ("NGO Name", "ngoName"),
    ("Food Needed", "foodNeeded"),
    ("Location", "location"),
    ("Timestamp", "timestamp"),
];

const MISSING_SHEET_MESSAGE: &str = "Unable to parse range";

fn columns(collection: Collection) -> &'static [(&'static str, &'static str)] {
    match collection {
        Collection::Donations => DONATION_COLUMNS,
        Collection::NgoRequests => NGO_COLUMNS,
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Google Sheets store: one worksheet per collection, first row is the header
pub struct SheetsStore {
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
    donors_sheet: String,
    ngos_sheet: String,
    client: Client,
}

impl SheetsStore {
    pub fn new(
        base_url: String,
        spreadsheet_id: String,
        access_token: String,
        donors_sheet: String,
        ngos_sheet: String,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            spreadsheet_id,
            access_token,
            donors_sheet,
            ngos_sheet,
            client,
        })
    }

    pub fn from_settings(settings: &SheetsSettings) -> Result<Self, StoreError> {
        if settings.spreadsheet_id.is_empty() {
            return Err(StoreError::NotConfigured("sheets spreadsheet_id is empty".into()));
        }

        tracing::info!(
            "Using spreadsheet {} (sheets: {}, {})",
            settings.spreadsheet_id,
            settings.donors_sheet,
            settings.ngos_sheet
        );

        Self::new(
            settings.endpoint.clone(),
            settings.spreadsheet_id.clone(),
            settings.access_token.clone(),
            settings.donors_sheet.clone(),
            settings.ngos_sheet.clone(),
        )
    }

    fn sheet_name(&self, collection: Collection) -> &str {
        match collection {
            Collection::Donations => &self.donors_sheet,
            Collection::NgoRequests => &self.ngos_sheet,
        }
    }

    fn spreadsheet_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}",
            self.base_url.trim_end_matches('/'),
            self.spreadsheet_id
        )
    }

    fn values_url(&self, collection: Collection) -> String {
        format!(
            "{}/values/{}",
            self.spreadsheet_url(),
            urlencoding::encode(self.sheet_name(collection))
        )
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
        tracing::error!("Sheets {} failed: {} - {}", action, status, body);
        Err(StoreError::ApiError(format!("Failed to {}: {}", action, status)))
    }

    /// All rows of a worksheet, or `None` when the worksheet does not exist yet
    async fn read_rows(&self, collection: Collection) -> Result<Option<Vec<Vec<Value>>>, StoreError> {
        let response = self
            .client
            .get(self.values_url(collection))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        // Sheets answers 400 "Unable to parse range" for a missing worksheet
        if response.status() == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            if body.contains(MISSING_SHEET_MESSAGE) {
                tracing::debug!("Worksheet {} not found", self.sheet_name(collection));
                return Ok(None);
            }

            tracing::error!("Sheets read sheet failed: 400 - {}", body);
            return Err(StoreError::ApiError(format!(
                "Failed to read sheet: {}",
                StatusCode::BAD_REQUEST
            )));
        }

        let range: ValueRange = Self::check(response, "read sheet").await?.json().await?;
        Ok(Some(range.values))
    }

    async fn create_sheet(&self, collection: Collection) -> Result<(), StoreError> {
        let payload = json!({
            "requests": [{ "addSheet": { "properties": { "title": self.sheet_name(collection) } } }]
        });

        let response = self
            .client
            .post(format!("{}:batchUpdate", self.spreadsheet_url()))
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await?;
        Self::check(response, "create sheet").await?;

        tracing::info!("Created new sheet: {}", self.sheet_name(collection));
        Ok(())
    }

    async fn append_row(&self, collection: Collection, row: Vec<Value>) -> Result<(), StoreError> {
        let url = format!(
            "{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            self.values_url(collection)
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        Self::check(response, "append row").await?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for SheetsStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let rows = self.read_rows(collection).await?.unwrap_or_default();
        let documents = rows_to_documents(collection, &rows);

        tracing::debug!("Read {} rows from {}", documents.len(), self.sheet_name(collection));

        Ok(documents)
    }

    async fn insert(&self, collection: Collection, fields: Map<String, Value>) -> Result<String, StoreError> {
        let existing = match self.read_rows(collection).await? {
            Some(rows) => rows,
            None => {
                self.create_sheet(collection).await?;
                Vec::new()
            }
        };

        if existing.is_empty() {
            let header = columns(collection)
                .iter()
                .map(|(title, _)| Value::from(*title))
                .collect();
            self.append_row(collection, header).await?;
        }

        let id = collection.new_id();
        let row = columns(collection)
            .iter()
            .map(|(_, key)| match *key {
                "id" => Value::from(id.as_str()),
                key => fields.get(key).cloned().unwrap_or_else(|| Value::from("")),
            })
            .collect();
        self.append_row(collection, row).await?;

        tracing::info!("Added {} record: {}", collection, id);
        Ok(id)
    }

    fn name(&self) -> &'static str {
        "Google Sheets"
    }

    fn sheet_names(&self) -> Option<(&str, &str)> {
        Some((&self.donors_sheet, &self.ngos_sheet))
    }
}

/// Map data rows onto field keys using the header row
///
/// Rows without an ID are skipped. Unknown headers are kept under their own
/// text; short rows simply lack the trailing fields.
fn rows_to_documents(collection: Collection, rows: &[Vec<Value>]) -> Vec<Document> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };

    let keys: Vec<String> = header
        .iter()
        .map(|cell| {
            let title = cell.as_str().unwrap_or_default().trim();
            columns(collection)
                .iter()
                .find(|(column, _)| *column == title)
                .map(|(_, key)| key.to_string())
                .unwrap_or_else(|| title.to_string())
        })
        .collect();

    data.iter()
        .filter_map(|row| {
            let mut fields: Map<String, Value> = keys.iter().cloned().zip(row.iter().cloned()).collect();
            let id = match fields.remove("id") {
                Some(Value::String(s)) if !s.trim().is_empty() => s,
                Some(Value::Number(n)) => n.to_string(),
                _ => return None,
            };
            Some(Document::new(id, fields))
        })
        .collect()
}
