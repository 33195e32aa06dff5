use crate::adapters::http::{build_client, join_url, read_json};
use crate::config::toml_config::WeatherConfig;
use crate::domain::model::{Coordinates, WeatherConditions};
use crate::domain::ports::WeatherProvider;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "OpenWeather";

#[derive(Debug, Deserialize)]
struct GeoHit {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainReadings,
    #[serde(default)]
    weather: Vec<WeatherSummary>,
    #[serde(default)]
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherSummary {
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    #[serde(default)]
    speed: f64,
}

impl From<CurrentWeather> for WeatherConditions {
    fn from(raw: CurrentWeather) -> Self {
        WeatherConditions {
            temperature_c: raw.main.temp,
            feels_like_c: raw.main.feels_like,
            description: raw
                .weather
                .into_iter()
                .next()
                .map(|w| w.description)
                .unwrap_or_else(|| "unknown".to_string()),
            humidity_pct: raw.main.humidity,
            wind_speed_ms: raw.wind.speed,
        }
    }
}

/// OpenWeatherMap direct geocoding and current conditions (metric units).
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: String, api_key: String, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &WeatherConfig, timeout: Option<Duration>) -> Result<Self> {
        let api_key = validate_required_field("weather.api_key", &config.api_key)?;
        Self::new(config.base_url.clone(), api_key.clone(), timeout)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn locate(&self, city: &str) -> Result<Option<Coordinates>> {
        let response = self
            .client
            .get(join_url(&self.base_url, "geo/1.0/direct"))
            .query(&[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let hits: Vec<GeoHit> = read_json(SERVICE, response).await?;
        Ok(hits
            .first()
            .map(|hit| Coordinates::new(hit.lat, hit.lon)))
    }

    async fn current_conditions(&self, point: Coordinates) -> Result<WeatherConditions> {
        let response = self
            .client
            .get(join_url(&self.base_url, "data/2.5/weather"))
            .query(&[
                ("lat", point.latitude.to_string()),
                ("lon", point.longitude.to_string()),
                ("units", "metric".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let raw: CurrentWeather = read_json(SERVICE, response).await?;
        Ok(raw.into())
    }
}
