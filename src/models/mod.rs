// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Coordinates, Document, DonationOffer, Match, MatchedDonor, MatchedNgo, NgoRequest};
pub use requests::{CreateDonationRequest, CreateNgoRequest, FieldProblem, RequiredFields};
pub use responses::{CreatedResponse, DonorsResponse, ErrorResponse, HealthResponse, MatchesResponse, NgosResponse};
