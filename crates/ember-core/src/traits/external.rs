//! External collaborator traits
//!
//! Narrow interfaces for the I/O services the application consumes but does
//! not implement as part of its core: reverse geocoding for location updates
//! and object storage for uploaded media.

use async_trait::async_trait;

use crate::error::DomainError;

/// A reverse-geocoded place
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeocodedPlace {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Reverse-geocoding collaborator
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve coordinates to city/state/country
    async fn reverse_geocode(&self, latitude: f64, longitude: f64)
        -> Result<GeocodedPlace, DomainError>;
}

/// Object-storage collaborator for uploaded bytes
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store a blob and return its public URL
    async fn upload(
        &self,
        bytes: &[u8],
        folder: &str,
        filename: &str,
        content_type: &str,
    ) -> Result<String, DomainError>;
}
