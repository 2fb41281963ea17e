use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReverseGeocodeQuery {
    /// Latitude in degrees (-90..=90)
    pub lat: f64,
    /// Longitude in degrees (-180..=180)
    pub lng: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReverseGeocodeDto {
    pub lat: f64,
    pub lng: f64,
    /// `null` when no place is known or the lookup failed
    pub address: Option<String>,
}
