use actix_web::{web, HttpResponse, Responder};

use crate::error::ApiError;
use crate::models::{DonationOffer, HealthResponse, MatchesResponse, NgoRequest};
use crate::routes::AppState;
use crate::services::Collection;

/// Configure health and matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches", web::get().to(find_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "Food Donation Matching Service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: state.store.name().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Match every donor with its nearest NGO
///
/// GET /api/matches
///
/// Fetches both collections, geocodes each distinct location once and pairs
/// every donor that geocodes with the closest NGO that geocodes.
async fn find_matches(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let donors: Vec<DonationOffer> = state
        .store
        .list(Collection::Donations)
        .await
        .inspect_err(|e| tracing::error!("Failed to fetch donors for matching: {}", e))?
        .iter()
        .map(DonationOffer::from_document)
        .collect();

    let ngos: Vec<NgoRequest> = state
        .store
        .list(Collection::NgoRequests)
        .await
        .inspect_err(|e| tracing::error!("Failed to fetch NGOs for matching: {}", e))?
        .iter()
        .map(NgoRequest::from_document)
        .collect();

    tracing::debug!("Matching {} donors against {} NGOs", donors.len(), ngos.len());

    let report = state.matcher.run(donors, ngos, state.geocoder.as_ref()).await;

    Ok(HttpResponse::Ok().json(MatchesResponse {
        success: true,
        total_donors: report.total_donors,
        total_ngos: report.total_ngos,
        successful_matches: report.matches.len(),
        unresolved_donors: report.unresolved_donors,
        unresolved_ngos: report.unresolved_ngos,
        matches: report.matches,
    }))
}
