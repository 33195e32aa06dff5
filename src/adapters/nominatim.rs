use crate::adapters::http::{build_client, join_url, read_json};
use crate::config::toml_config::GeocodingConfig;
use crate::domain::model::Coordinates;
use crate::domain::ports::Geocoder;
use crate::utils::error::{Result, TravelError};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "Nominatim";

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// OpenStreetMap Nominatim search; only the first hit is used.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: String, user_agent: String, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            user_agent,
        })
    }

    pub fn from_config(config: &GeocodingConfig, timeout: Option<Duration>) -> Result<Self> {
        Self::new(config.base_url.clone(), config.user_agent.clone(), timeout)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>> {
        let url = join_url(&self.base_url, "search");
        tracing::debug!("Geocoding '{}' via {}", place, url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let places: Vec<Place> = read_json(SERVICE, response).await?;
        let Some(first) = places.first() else {
            return Ok(None);
        };

        let latitude = first
            .lat
            .trim()
            .parse::<f64>()
            .map_err(|_| TravelError::malformed(SERVICE, format!("bad latitude '{}'", first.lat)))?;
        let longitude = first
            .lon
            .trim()
            .parse::<f64>()
            .map_err(|_| TravelError::malformed(SERVICE, format!("bad longitude '{}'", first.lon)))?;

        Ok(Some(Coordinates::new(latitude, longitude)))
    }
}
