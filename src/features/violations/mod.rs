pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use handlers::ViolationState;
pub use services::{
    DisabledGeocoder, NominatimGeocoder, PgViolationRepository, ReverseGeocoder,
    StatusLogService, SubmissionService, ViolationRepository, ViolationService,
};
