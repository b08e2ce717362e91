//! Reverse-geocoding collaborator backed by a Nominatim-compatible service

use async_trait::async_trait;
use ember_common::GeocoderConfig;
use ember_core::traits::{GeocodedPlace, Geocoder};
use ember_core::DomainError;
use serde::Deserialize;
use tracing::warn;

/// HTTP reverse geocoder (Nominatim `/reverse` API shape)
pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl HttpGeocoder {
    /// Build a geocoder from configuration
    #[must_use]
    pub fn new(config: &GeocoderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GeocodedPlace, DomainError> {
        let url = format!("{}/reverse", self.base_url);

        let mut request = self
            .client
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .header("User-Agent", "ember-api");

        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Geocoder unreachable");
            DomainError::ExternalServiceError(format!("geocoder unreachable: {e}"))
        })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Geocoder returned an error status");
            return Err(DomainError::ExternalServiceError(format!(
                "geocoder returned {}",
                response.status()
            )));
        }

        let parsed: ReverseResponse = response.json().await.map_err(|e| {
            DomainError::ExternalServiceError(format!("geocoder response unparseable: {e}"))
        })?;

        let Some(address) = parsed.address else {
            return Ok(GeocodedPlace::default());
        };

        Ok(GeocodedPlace {
            city: address.city.or(address.town).or(address.village),
            state: address.state,
            country: address.country,
        })
    }
}

impl std::fmt::Debug for HttpGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGeocoder")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
