use crate::adapters::http::{build_client, join_url, read_json};
use crate::config::toml_config::AmadeusConfig;
use crate::domain::model::{AirportRecord, Coordinates, FlightOffer, OfferQuery};
use crate::domain::ports::{AirportDirectory, OfferSearch};
use crate::utils::error::{Result, TravelError};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const SERVICE: &str = "Amadeus";
const TOKEN_PATH: &str = "v1/security/oauth2/token";
const LOCATIONS_PATH: &str = "v1/reference-data/locations";
const NEARBY_AIRPORTS_PATH: &str = "v1/reference-data/locations/airports";
const FLIGHT_OFFERS_PATH: &str = "v2/shopping/flight-offers";
/// Refresh a little before the server-side expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct DataEnvelope<T> {
    #[serde(default)]
    data: Vec<T>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Amadeus self-service API: airport directory and flight-offer search.
/// Clones share one access token.
#[derive(Clone)]
pub struct AmadeusClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    token: Arc<Mutex<Option<CachedToken>>>,
}

impl AmadeusClient {
    pub fn new(
        base_url: String,
        client_id: String,
        client_secret: String,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            client_id,
            client_secret,
            token: Arc::new(Mutex::new(None)),
        })
    }

    pub fn from_config(config: &AmadeusConfig, timeout: Option<Duration>) -> Result<Self> {
        let client_id = validate_required_field("amadeus.client_id", &config.client_id)?;
        let client_secret = validate_required_field("amadeus.client_secret", &config.client_secret)?;
        Self::new(
            config.base_url.clone(),
            client_id.clone(),
            client_secret.clone(),
            timeout,
        )
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + TOKEN_EXPIRY_MARGIN < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!("Requesting Amadeus access token");
        let response = self
            .client
            .post(join_url(&self.base_url, TOKEN_PATH))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let token: TokenResponse = read_json(SERVICE, response).await?;
        if token.access_token.is_empty() {
            return Err(TravelError::malformed(SERVICE, "empty access token"));
        }

        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(value)
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>> {
        let token = self.access_token().await?;
        let response = self
            .client
            .get(join_url(&self.base_url, path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // 權杖可能已被撤銷，下次呼叫重新取得
            *self.token.lock().await = None;
        }

        let envelope: DataEnvelope<T> = read_json(SERVICE, response).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl AirportDirectory for AmadeusClient {
    async fn airports_by_keyword(&self, keyword: &str) -> Result<Vec<AirportRecord>> {
        self.get_data(
            LOCATIONS_PATH,
            &[
                ("subType", "AIRPORT".to_string()),
                ("keyword", keyword.to_string()),
                ("view", "LIGHT".to_string()),
            ],
        )
        .await
    }

    async fn airports_near(&self, point: Coordinates, radius_km: u32) -> Result<Vec<AirportRecord>> {
        self.get_data(
            NEARBY_AIRPORTS_PATH,
            &[
                ("latitude", point.latitude.to_string()),
                ("longitude", point.longitude.to_string()),
                ("radius", radius_km.to_string()),
            ],
        )
        .await
    }
}

#[async_trait]
impl OfferSearch for AmadeusClient {
    async fn search_offers(&self, query: &OfferQuery) -> Result<Vec<FlightOffer>> {
        self.get_data(
            FLIGHT_OFFERS_PATH,
            &[
                ("originLocationCode", query.route.origin.to_string()),
                ("destinationLocationCode", query.route.destination.to_string()),
                ("departureDate", query.departure_date.format("%Y-%m-%d").to_string()),
                ("returnDate", query.return_date.format("%Y-%m-%d").to_string()),
                ("adults", query.adults.to_string()),
                ("currencyCode", query.currency_code.clone()),
                ("max", query.max_results.to_string()),
            ],
        )
        .await
    }
}
