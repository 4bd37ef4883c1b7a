use crate::config::{GeocoderProvider, GeocoderSettings};
use crate::models::Coordinates;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors from a geocoding lookup
///
/// These never leave the geocoder: `Geocoder::resolve` turns every one of them
/// into a miss.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Provider returned status {0}")]
    ApiError(reqwest::StatusCode),

    #[error("Invalid coordinates in response: {0}")]
    InvalidResponse(String),

    #[error("Invalid coordinates for place '{0}'")]
    InvalidPlace(String),
}

/// Turns a free-text location into coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `None` for empty input, unknown places and any lookup failure
    async fn resolve(&self, location: &str) -> Option<Coordinates>;

    fn name(&self) -> &'static str;
}

/// Build the configured geocoder
pub fn build_geocoder(settings: &GeocoderSettings) -> Result<Arc<dyn Geocoder>, GeocodeError> {
    Ok(match settings.provider {
        GeocoderProvider::Nominatim => Arc::new(NominatimGeocoder::new(
            settings.endpoint.clone(),
            settings.user_agent.clone(),
            Duration::from_secs(settings.timeout_secs),
        )?),
        GeocoderProvider::Fixed => {
            let mut geocoder = FixedGeocoder::with_sample_places();
            for (place, [latitude, longitude]) in &settings.places {
                let coordinates = Coordinates::new(*latitude, *longitude);
                if !coordinates.is_valid() {
                    return Err(GeocodeError::InvalidPlace(place.clone()));
                }
                geocoder.insert(place, coordinates);
            }
            Arc::new(geocoder)
        }
    })
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Client for an OpenStreetMap Nominatim `/search` endpoint
pub struct NominatimGeocoder {
    base_url: String,
    client: Client,
}

impl NominatimGeocoder {
    pub fn new(base_url: String, user_agent: String, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { base_url, client })
    }

    /// Look up the best match for a location
    pub async fn lookup(&self, location: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(location)
        );

        tracing::debug!("Geocoding '{}' via {}", location, url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(GeocodeError::ApiError(response.status()));
        }

        let places: Vec<NominatimPlace> = response.json().await?;

        let Some(place) = places.first() else {
            return Ok(None);
        };

        let latitude = place
            .lat
            .parse::<f64>()
            .map_err(|_| GeocodeError::InvalidResponse(place.lat.clone()))?;
        let longitude = place
            .lon
            .parse::<f64>()
            .map_err(|_| GeocodeError::InvalidResponse(place.lon.clone()))?;

        let coordinates = Coordinates::new(latitude, longitude);
        if !coordinates.is_valid() {
            return Err(GeocodeError::InvalidResponse(format!("{},{}", place.lat, place.lon)));
        }

        Ok(Some(coordinates))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, location: &str) -> Option<Coordinates> {
        let location = location.trim();
        if location.is_empty() {
            return None;
        }

        match self.lookup(location).await {
            Ok(Some(coordinates)) => Some(coordinates),
            Ok(None) => {
                tracing::debug!("No geocoding result for '{}'", location);
                None
            }
            Err(e) => {
                tracing::warn!("Error geocoding location '{}': {}", location, e);
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "nominatim"
    }
}

/// In-process gazetteer keyed by location text
///
/// Matching ignores case and surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct FixedGeocoder {
    places: HashMap<String, Coordinates>,
}

impl FixedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gazetteer covering the locations used by the sample dataset
    pub fn with_sample_places() -> Self {
        let mut geocoder = Self::new();
        geocoder.insert("New York, NY", Coordinates::new(40.7127281, -74.0060152));
        geocoder.insert("Manhattan, NY", Coordinates::new(40.7896239, -73.9598939));
        geocoder.insert("Brooklyn, NY", Coordinates::new(40.6526006, -73.9497211));
        geocoder.insert("Queens, NY", Coordinates::new(40.7135078, -73.8283132));
        geocoder.insert("Bronx, NY", Coordinates::new(40.8466508, -73.8785937));
        geocoder.insert("Staten Island, NY", Coordinates::new(40.5834557, -74.1496048));
        geocoder
    }

    pub fn insert(&mut self, location: &str, coordinates: Coordinates) {
        self.places.insert(normalize(location), coordinates);
    }

    pub fn with_place(mut self, location: &str, coordinates: Coordinates) -> Self {
        self.insert(location, coordinates);
        self
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn resolve(&self, location: &str) -> Option<Coordinates> {
        let found = self.places.get(&normalize(location)).copied();
        if found.is_none() && !location.trim().is_empty() {
            tracing::debug!("No gazetteer entry for '{}'", location);
        }
        found
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

fn normalize(location: &str) -> String {
    location.trim().to_lowercase()
}

/// Memo of lookups made while serving one match request
///
/// Each distinct location is sent to the geocoder at most once. Dropped with
/// the request; nothing is shared across requests.
pub struct LocationCache<'a> {
    geocoder: &'a dyn Geocoder,
    resolved: HashMap<String, Option<Coordinates>>,
}

impl<'a> LocationCache<'a> {
    pub fn new(geocoder: &'a dyn Geocoder) -> Self {
        Self {
            geocoder,
            resolved: HashMap::new(),
        }
    }

    pub async fn resolve(&mut self, location: &str) -> Option<Coordinates> {
        let key = location.trim();
        if key.is_empty() {
            return None;
        }

        if let Some(hit) = self.resolved.get(key) {
            return *hit;
        }

        let coordinates = self.geocoder.resolve(key).await;
        self.resolved.insert(key.to_string(), coordinates);
        coordinates
    }

    /// Number of distinct locations sent to the geocoder
    pub fn lookups(&self) -> usize {
        self.resolved.len()
    }
}
