use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Three-letter airport identifier, always stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IataCode(String);

impl IataCode {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Self(trimmed.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IataCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for IataCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        IataCode::parse(&value).ok_or_else(|| format!("invalid IATA code: {}", value))
    }
}

impl From<IataCode> for String {
    fn from(code: IataCode) -> Self {
        code.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// One entry of an airport-directory response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportRecord {
    #[serde(default)]
    pub iata_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub distance: Option<Distance>,
}

impl AirportRecord {
    pub fn code(&self) -> Option<IataCode> {
        self.iata_code.as_deref().and_then(IataCode::parse)
    }

    /// Records without a reported distance sort after every measured one.
    pub fn distance_km(&self) -> f64 {
        self.distance
            .as_ref()
            .map(|d| d.value)
            .filter(|v| v.is_finite())
            .unwrap_or(f64::INFINITY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoutePair {
    pub origin: IataCode,
    pub destination: IataCode,
}

impl RoutePair {
    pub fn new(origin: IataCode, destination: IataCode) -> Self {
        Self { origin, destination }
    }
}

impl fmt::Display for RoutePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.origin, self.destination)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEndpoint {
    #[serde(default)]
    pub iata_code: Option<String>,
    pub at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub carrier_code: String,
    pub number: String,
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferPrice {
    pub total: String,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Flight offer as returned by the search service. Fields this crate does not
/// read are kept in `extra` so the record can be written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    #[serde(default)]
    pub id: Option<String>,
    pub price: OfferPrice,
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FlightOffer {
    pub fn total_price(&self) -> Option<f64> {
        self.price
            .total
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
    }

    pub fn outbound(&self) -> Option<&Itinerary> {
        self.itineraries.first()
    }

    pub fn inbound(&self) -> Option<&Itinerary> {
        self.itineraries.get(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInfo {
    pub origin_airport: IataCode,
    pub destination_airport: IataCode,
    pub is_primary: bool,
}

/// An offer tagged with the route it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedOffer {
    pub offer: FlightOffer,
    pub search_info: SearchInfo,
    pub total_price: f64,
}

impl AnnotatedOffer {
    pub fn is_primary(&self) -> bool {
        self.search_info.is_primary
    }

    pub fn route(&self) -> RoutePair {
        RoutePair::new(
            self.search_info.origin_airport.clone(),
            self.search_info.destination_airport.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OfferQuery {
    pub route: RoutePair,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub adults: u32,
    pub currency_code: String,
    pub max_results: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub description: String,
    pub humidity_pct: f64,
    pub wind_speed_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iata_code_normalizes_case() {
        let code = IataCode::parse(" pnq ").unwrap();
        assert_eq!(code.as_str(), "PNQ");
        assert!(IataCode::parse("").is_none());
        assert!(IataCode::parse("PN").is_none());
        assert!(IataCode::parse("P1Q").is_none());
    }

    #[test]
    fn test_airport_record_from_directory_json() {
        let record: AirportRecord = serde_json::from_value(serde_json::json!({
            "type": "location",
            "subType": "AIRPORT",
            "name": "PUNE",
            "iataCode": "PNQ",
            "distance": {"value": 64, "unit": "KM"}
        }))
        .unwrap();

        assert_eq!(record.code().unwrap().as_str(), "PNQ");
        assert_eq!(record.distance_km(), 64.0);
        assert_eq!(AirportRecord::default().distance_km(), f64::INFINITY);
    }

    #[test]
    fn test_flight_offer_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "id": "1",
            "source": "GDS",
            "price": {"currency": "INR", "total": "4523.50"},
            "itineraries": [{
                "duration": "PT1H5M",
                "segments": [{
                    "carrierCode": "6E",
                    "number": "5321",
                    "departure": {"iataCode": "BOM", "at": "2026-11-02T06:10:00"},
                    "arrival": {"iataCode": "PNQ", "at": "2026-11-02T07:15:00"}
                }]
            }]
        });

        let offer: FlightOffer = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(offer.total_price(), Some(4523.5));
        assert_eq!(offer.extra.get("source").unwrap(), "GDS");
        assert!(offer.inbound().is_none());
        assert_eq!(serde_json::to_value(&offer).unwrap(), raw);
    }

    #[test]
    fn test_unparseable_price() {
        let offer = FlightOffer {
            id: None,
            price: OfferPrice {
                total: "n/a".to_string(),
                currency: None,
            },
            itineraries: vec![],
            extra: serde_json::Map::new(),
        };
        assert_eq!(offer.total_price(), None);
    }
}
