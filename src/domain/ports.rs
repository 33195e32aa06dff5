use crate::domain::model::{
    AirportRecord, Coordinates, FlightOffer, OfferQuery, WeatherConditions,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Free-text place name to coordinates. `Ok(None)` means the service knows no such place.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>>;
}

#[async_trait]
pub trait AirportDirectory: Send + Sync {
    async fn airports_by_keyword(&self, keyword: &str) -> Result<Vec<AirportRecord>>;
    async fn airports_near(&self, point: Coordinates, radius_km: u32) -> Result<Vec<AirportRecord>>;
}

#[async_trait]
pub trait OfferSearch: Send + Sync {
    async fn search_offers(&self, query: &OfferQuery) -> Result<Vec<FlightOffer>>;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

impl Prompt {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            system: None,
            user: text.into(),
        }
    }

    pub fn with_system(mut self, text: impl Into<String>) -> Self {
        self.system = Some(text.into());
        self
    }
}

/// Prompt in, unstructured text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn locate(&self, city: &str) -> Result<Option<Coordinates>>;
    async fn current_conditions(&self, point: Coordinates) -> Result<WeatherConditions>;
}
