use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::GeocodingConfig;
use crate::core::error::{AppError, Result};

/// Coordinates → human-readable place name
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// `Ok(None)` when the provider knows no place at these coordinates
    async fn reverse(&self, lat: f64, lng: f64) -> Result<Option<String>>;
}

/// Nominatim `/reverse` response; errors come back as `{"error": "..."}`
#[derive(Debug, Deserialize)]
struct NominatimReverseResponse {
    display_name: Option<String>,
    error: Option<String>,
}

/// Reverse geocoding against a Nominatim instance
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, lat: f64, lng: f64) -> Result<Option<String>> {
        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url, lat, lng
        );
        tracing::debug!("Reverse geocoding ({}, {}) -> {}", lat, lng, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Nominatim request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Nominatim returned status {}",
                response.status()
            )));
        }

        let body: NominatimReverseResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse Nominatim response: {}", e))
        })?;

        Ok(place_name(body))
    }
}

fn place_name(body: NominatimReverseResponse) -> Option<String> {
    if let Some(error) = body.error {
        tracing::debug!("Nominatim has no place: {}", error);
        return None;
    }
    body.display_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Used when `GEOCODING_ENABLED=false`: every lookup finds nothing
pub struct DisabledGeocoder;

#[async_trait]
impl ReverseGeocoder for DisabledGeocoder {
    async fn reverse(&self, _lat: f64, _lng: f64) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Best-effort lookup: provider failures are logged and read as "no place"
pub async fn lookup_place_name(
    geocoder: &dyn ReverseGeocoder,
    lat: f64,
    lng: f64,
) -> Option<String> {
    match geocoder.reverse(lat, lng).await {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Reverse geocoding ({}, {}) failed: {}", lat, lng, e);
            None
        }
    }
}

/// `"lat, lng"` with six decimals
pub fn format_coordinates(lat: f64, lng: f64) -> String {
    format!("{:.6}, {:.6}", lat, lng)
}
