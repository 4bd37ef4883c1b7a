// Route exports
pub mod matches;
pub mod records;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::config::Settings;
use crate::core::Matcher;
use crate::services::{build_geocoder, build_store, GeocodeError, Geocoder, RecordStore, StoreError};

/// Application state shared across all handlers
///
/// Built once at startup; handlers only read from it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub geocoder: Arc<dyn Geocoder>,
    pub matcher: Matcher,
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Record store: {0}")]
    Store(#[from] StoreError),

    #[error("Geocoder: {0}")]
    Geocoder(#[from] GeocodeError),
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, geocoder: Arc<dyn Geocoder>, matcher: Matcher) -> Self {
        Self {
            store,
            geocoder,
            matcher,
        }
    }

    /// Wire up the configured store, geocoder and matcher
    pub fn from_settings(settings: &Settings) -> Result<Self, StateError> {
        let store = build_store(&settings.store)?;
        let geocoder = build_geocoder(&settings.geocoder)?;
        let matcher = Matcher::new(&settings.matching);

        tracing::info!("Record store: {}, geocoder: {}", store.name(), geocoder.name());

        Ok(Self::new(store, geocoder, matcher))
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index)).service(
        web::scope("/api")
            .configure(matches::configure)
            .configure(records::configure),
    );
}

/// API documentation
///
/// GET /
async fn index(state: web::Data<AppState>) -> impl Responder {
    let mut doc = serde_json::json!({
        "message": "Food Donation Matching API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": state.store.name(),
        "endpoints": {
            "GET /api/matches": "Get donor-NGO matches based on location",
            "GET /api/donors": "Get all donors",
            "POST /api/donors": "Add new donor",
            "GET /api/ngos": "Get all NGOs",
            "POST /api/ngos": "Add new NGO",
            "GET /api/health": "Health check",
            "GET /": "This help message",
        },
    });

    if let Some((donors_sheet, ngos_sheet)) = state.store.sheet_names() {
        doc["sheets"] = serde_json::json!({
            "donors_sheet": donors_sheet,
            "ngos_sheet": ngos_sheet,
        });
    }

    HttpResponse::Ok().json(doc)
}
