//! Food Match - location-based matching of food donors to NGOs
//!
//! Donation offers and NGO requests live in a pluggable record store. A match
//! pass geocodes every location and pairs each donor with the geodesically
//! nearest NGO.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{distance_km, find_closest, Matcher, MatchReport};
pub use error::ApiError;
pub use models::{Coordinates, DonationOffer, Match, NgoRequest};
pub use routes::AppState;
pub use services::{Geocoder, RecordStore};
