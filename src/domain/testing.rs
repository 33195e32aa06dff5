//! In-memory fakes of the ports. Every fake records its calls so tests can
//! assert on exactly which requests were issued.

use crate::domain::model::{
    AirportRecord, Coordinates, Distance, FlightOffer, Itinerary, OfferPrice, OfferQuery,
    RoutePair, Segment, SegmentEndpoint, WeatherConditions,
};
use crate::domain::ports::{
    AirportDirectory, Geocoder, OfferSearch, Prompt, Storage, TextGenerator, WeatherProvider,
};
use crate::utils::error::{Result, TravelError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn airport(code: &str, distance_km: f64) -> AirportRecord {
    AirportRecord {
        iata_code: Some(code.to_string()),
        name: None,
        distance: Some(Distance {
            value: distance_km,
            unit: Some("KM".to_string()),
        }),
    }
}

pub fn keyword_airport(code: &str) -> AirportRecord {
    AirportRecord {
        iata_code: Some(code.to_string()),
        name: None,
        distance: None,
    }
}

pub fn segment(carrier: &str, number: &str, from: &str, at: &str, to: &str, arrive: &str) -> Segment {
    Segment {
        carrier_code: carrier.to_string(),
        number: number.to_string(),
        departure: SegmentEndpoint {
            iata_code: Some(from.to_string()),
            at: at.to_string(),
        },
        arrival: SegmentEndpoint {
            iata_code: Some(to.to_string()),
            at: arrive.to_string(),
        },
    }
}

pub fn offer(total: &str) -> FlightOffer {
    FlightOffer {
        id: None,
        price: OfferPrice {
            total: total.to_string(),
            currency: Some("INR".to_string()),
        },
        itineraries: vec![Itinerary {
            duration: Some("PT1H5M".to_string()),
            segments: vec![segment(
                "6E",
                "5321",
                "BOM",
                "2026-11-02T06:10:00",
                "PNQ",
                "2026-11-02T07:15:00",
            )],
        }],
        extra: serde_json::Map::new(),
    }
}

pub fn offers(totals: &[&str]) -> Vec<FlightOffer> {
    totals.iter().map(|t| offer(t)).collect()
}

#[derive(Clone, Default)]
pub struct FakeGeocoder {
    places: HashMap<String, Coordinates>,
    failing: bool,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, name: &str, point: Coordinates) -> Self {
        self.places.insert(name.to_lowercase(), point);
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>> {
        self.calls.lock().unwrap().push(place.to_string());
        if self.failing {
            return Err(TravelError::service("Nominatim", 503, "unavailable"));
        }
        Ok(self.places.get(&place.trim().to_lowercase()).copied())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryCall {
    Keyword(String),
    Near(Coordinates, u32),
}

#[derive(Clone, Default)]
pub struct FakeDirectory {
    by_keyword: HashMap<String, Vec<AirportRecord>>,
    nearby: Vec<(Coordinates, Vec<AirportRecord>)>,
    keyword_fails: bool,
    nearby_fails: bool,
    pub calls: Arc<Mutex<Vec<DirectoryCall>>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: &str, records: Vec<AirportRecord>) -> Self {
        self.by_keyword.insert(keyword.to_lowercase(), records);
        self
    }

    pub fn with_nearby(mut self, point: Coordinates, records: Vec<AirportRecord>) -> Self {
        self.nearby.push((point, records));
        self
    }

    pub fn keyword_fails(mut self) -> Self {
        self.keyword_fails = true;
        self
    }

    pub fn nearby_fails(mut self) -> Self {
        self.nearby_fails = true;
        self
    }

    pub fn recorded(&self) -> Vec<DirectoryCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AirportDirectory for FakeDirectory {
    async fn airports_by_keyword(&self, keyword: &str) -> Result<Vec<AirportRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push(DirectoryCall::Keyword(keyword.to_string()));
        if self.keyword_fails {
            return Err(TravelError::service("Amadeus", 500, "keyword search down"));
        }
        Ok(self
            .by_keyword
            .get(&keyword.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    async fn airports_near(&self, point: Coordinates, radius_km: u32) -> Result<Vec<AirportRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push(DirectoryCall::Near(point, radius_km));
        if self.nearby_fails {
            return Err(TravelError::service("Amadeus", 500, "radius search down"));
        }
        Ok(self
            .nearby
            .iter()
            .find(|(p, _)| *p == point)
            .map(|(_, records)| records.clone())
            .unwrap_or_default())
    }
}

#[derive(Clone, Default)]
pub struct FakeOfferSearch {
    responses: HashMap<(String, String), Vec<FlightOffer>>,
    failing_routes: Vec<(String, String)>,
    pub queries: Arc<Mutex<Vec<OfferQuery>>>,
}

impl FakeOfferSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, origin: &str, destination: &str, offers: Vec<FlightOffer>) -> Self {
        self.responses
            .insert((origin.to_string(), destination.to_string()), offers);
        self
    }

    pub fn failing_route(mut self, origin: &str, destination: &str) -> Self {
        self.failing_routes
            .push((origin.to_string(), destination.to_string()));
        self
    }

    pub fn routes_queried(&self) -> Vec<RoutePair> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.route.clone())
            .collect()
    }
}

#[async_trait]
impl OfferSearch for FakeOfferSearch {
    async fn search_offers(&self, query: &OfferQuery) -> Result<Vec<FlightOffer>> {
        self.queries.lock().unwrap().push(query.clone());
        let key = (
            query.route.origin.to_string(),
            query.route.destination.to_string(),
        );
        if self.failing_routes.contains(&key) {
            return Err(TravelError::service("Amadeus", 500, "search failed"));
        }
        let mut found = self.responses.get(&key).cloned().unwrap_or_default();
        found.truncate(query.max_results);
        Ok(found)
    }
}

#[derive(Clone, Default)]
pub struct FakeTextGenerator {
    reply: Option<String>,
    pub prompts: Arc<Mutex<Vec<Prompt>>>,
}

impl FakeTextGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            prompts: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.reply
            .clone()
            .ok_or_else(|| TravelError::language_model("model unavailable"))
    }
}

#[derive(Clone, Default)]
pub struct FakeWeather {
    pub point: Option<Coordinates>,
    pub conditions: Option<WeatherConditions>,
    pub status: Option<u16>,
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn locate(&self, _city: &str) -> Result<Option<Coordinates>> {
        Ok(self.point)
    }

    async fn current_conditions(&self, _point: Coordinates) -> Result<WeatherConditions> {
        if let Some(status) = self.status {
            return Err(TravelError::service("OpenWeather", status, ""));
        }
        self.conditions
            .clone()
            .ok_or_else(|| TravelError::malformed("OpenWeather", "no conditions"))
    }
}

#[derive(Clone, Default)]
pub struct MockStorage {
    pub files: Arc<tokio::sync::Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockStorage {
    pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().await.get(path).cloned()
    }
}

impl Storage for MockStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned().ok_or_else(|| {
            TravelError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }
}
