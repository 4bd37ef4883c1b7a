use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::{
    CreateDonationRequest, CreateNgoRequest, CreatedResponse, DonationOffer, DonorsResponse, NgoRequest,
    NgosResponse, RequiredFields,
};
use crate::routes::AppState;
use crate::services::Collection;

/// Configure donor and NGO record routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/donors")
            .route(web::get().to(list_donors))
            .route(web::post().to(create_donor)),
    )
    .service(
        web::resource("/ngos")
            .route(web::get().to(list_ngos))
            .route(web::post().to(create_ngo)),
    );
}

/// GET /api/donors
async fn list_donors(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let donors: Vec<DonationOffer> = state
        .store
        .list(Collection::Donations)
        .await
        .inspect_err(|e| tracing::error!("Failed to list donors: {}", e))?
        .iter()
        .map(DonationOffer::from_document)
        .collect();

    Ok(HttpResponse::Ok().json(DonorsResponse {
        success: true,
        count: donors.len(),
        donors,
    }))
}

/// GET /api/ngos
async fn list_ngos(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let ngos: Vec<NgoRequest> = state
        .store
        .list(Collection::NgoRequests)
        .await
        .inspect_err(|e| tracing::error!("Failed to list NGOs: {}", e))?
        .iter()
        .map(NgoRequest::from_document)
        .collect();

    Ok(HttpResponse::Ok().json(NgosResponse {
        success: true,
        count: ngos.len(),
        ngos,
    }))
}

/// Register a donation
///
/// POST /api/donors
///
/// Request body:
/// ```json
/// {
///   "foodType": "Rice",
///   "quantity": "10 kg",
///   "expiryTime": 48,
///   "location": "New York, NY"
/// }
/// ```
async fn create_donor(
    state: web::Data<AppState>,
    req: web::Json<CreateDonationRequest>,
) -> Result<HttpResponse, ApiError> {
    if let Err(problem) = req.check() {
        tracing::info!("Rejected donor submission: {:?}", problem);
        return Err(problem.into());
    }

    let timestamp = chrono::Utc::now().to_rfc3339();
    let fields = req.into_inner().into_fields(&timestamp);

    let id = state
        .store
        .insert(Collection::Donations, fields)
        .await
        .inspect_err(|e| tracing::error!("Failed to add donor: {}", e))?;

    Ok(HttpResponse::Ok().json(CreatedResponse {
        success: true,
        message: "Donor added successfully".to_string(),
        id,
    }))
}

/// Register an NGO's food need
///
/// POST /api/ngos
///
/// Request body:
/// ```json
/// {
///   "ngoName": "Food Bank NYC",
///   "foodNeeded": "Rice, Bread",
///   "location": "Manhattan, NY"
/// }
/// ```
async fn create_ngo(
    state: web::Data<AppState>,
    req: web::Json<CreateNgoRequest>,
) -> Result<HttpResponse, ApiError> {
    if let Err(problem) = req.check() {
        tracing::info!("Rejected NGO submission: {:?}", problem);
        return Err(problem.into());
    }

    let timestamp = chrono::Utc::now().to_rfc3339();
    let fields = req.into_inner().into_fields(&timestamp);

    let id = state
        .store
        .insert(Collection::NgoRequests, fields)
        .await
        .inspect_err(|e| tracing::error!("Failed to add NGO: {}", e))?;

    Ok(HttpResponse::Ok().json(CreatedResponse {
        success: true,
        message: "NGO added successfully".to_string(),
        id,
    }))
}
