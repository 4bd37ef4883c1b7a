use crate::config::{StoreBackend, StoreSettings};
use crate::models::Document;
use crate::services::{FirestoreStore, MemoryStore, SampleStore, SheetsStore};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by any record store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid or expired credentials")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("{0} store is read-only")]
    ReadOnly(&'static str),

    #[error("Store not configured: {0}")]
    NotConfigured(String),
}

/// The two record collections the service works with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Donations,
    NgoRequests,
}

impl Collection {
    /// Collection name in the document database
    pub fn name(self) -> &'static str {
        match self {
            Collection::Donations => "donations",
            Collection::NgoRequests => "ngoRequests",
        }
    }

    /// Prefix for ids the service assigns itself
    pub fn id_prefix(self) -> &'static str {
        match self {
            Collection::Donations => "donor",
            Collection::NgoRequests => "ngo",
        }
    }

    /// `donor_20240101_093000_1a2b3c4d`
    pub fn new_id(self) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!(
            "{}_{}_{}",
            self.id_prefix(),
            chrono::Utc::now().format("%Y%m%d_%H%M%S"),
            &suffix[..8]
        )
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key-value record store holding donations and NGO requests
///
/// `list` returns records in the backend's own order; matching tie-breaks
/// inherit that order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError>;

    /// Store a new record, returning its id
    async fn insert(&self, collection: Collection, fields: Map<String, Value>) -> Result<String, StoreError>;

    /// Human-readable backend name for health and index responses
    fn name(&self) -> &'static str;

    /// `(donors, ngos)` worksheet names for spreadsheet-backed stores
    fn sheet_names(&self) -> Option<(&str, &str)> {
        None
    }
}

/// Build the configured record store
pub fn build_store(settings: &StoreSettings) -> Result<Arc<dyn RecordStore>, StoreError> {
    Ok(match settings.backend {
        StoreBackend::Firestore => {
            let firestore = settings
                .firestore
                .as_ref()
                .ok_or_else(|| StoreError::NotConfigured("[store.firestore] section missing".into()))?;
            Arc::new(FirestoreStore::from_settings(firestore)?)
        }
        StoreBackend::Sheets => {
            let sheets = settings
                .sheets
                .as_ref()
                .ok_or_else(|| StoreError::NotConfigured("[store.sheets] section missing".into()))?;
            Arc::new(SheetsStore::from_settings(sheets)?)
        }
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Sample => Arc::new(SampleStore::new()),
    })
}
