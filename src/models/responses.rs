use serde::{Deserialize, Serialize};
use crate::models::domain::{DonationOffer, Match, NgoRequest};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Response for the donor listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorsResponse {
    pub success: bool,
    pub count: usize,
    pub donors: Vec<DonationOffer>,
}

/// Response for the NGO listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NgosResponse {
    pub success: bool,
    pub count: usize,
    pub ngos: Vec<NgoRequest>,
}

/// Response for create endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
}

/// Response for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub success: bool,
    pub total_donors: usize,
    pub total_ngos: usize,
    pub successful_matches: usize,
    pub unresolved_donors: usize,
    pub unresolved_ngos: usize,
    pub matches: Vec<Match>,
}

/// Error envelope shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
