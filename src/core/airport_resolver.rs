use crate::config::toml_config::SearchSettings;
use crate::domain::model::{AirportRecord, IataCode};
use crate::domain::ports::{AirportDirectory, Geocoder};

/// Major cities with a well-known airport, checked when both lookup services come up empty.
pub const MAJOR_CITY_AIRPORTS: &[(&str, &str)] = &[
    ("delhi", "DEL"),
    ("mumbai", "BOM"),
    ("bangalore", "BLR"),
    ("chennai", "MAA"),
    ("kolkata", "CCU"),
    ("hyderabad", "HYD"),
    ("pune", "PNQ"),
    ("ahmedabad", "AMD"),
    ("jaipur", "JAI"),
];

/// Maps place names to airports using a geocoder and an airport directory.
pub struct AirportLocator<G: Geocoder, D: AirportDirectory> {
    pub(crate) geocoder: G,
    pub(crate) directory: D,
    pub(crate) radius_km: u32,
    default_airport: IataCode,
}

impl<G: Geocoder, D: AirportDirectory> AirportLocator<G, D> {
    pub fn new(geocoder: G, directory: D, radius_km: u32, default_airport: IataCode) -> Self {
        Self {
            geocoder,
            directory,
            radius_km,
            default_airport,
        }
    }

    pub fn from_settings(geocoder: G, directory: D, settings: &SearchSettings) -> Self {
        Self::new(
            geocoder,
            directory,
            settings.radius_km,
            settings.default_airport_code(),
        )
    }

    /// Best-match airport for a city. Never fails: the chain ends at the default airport.
    ///
    /// Order: directory keyword search, geocode + nearest airport in radius,
    /// major-city table, default.
    pub async fn resolve(&self, city_name: &str) -> IataCode {
        let city = city_name.trim().to_lowercase();

        if let Some(code) = self.keyword_lookup(&city).await {
            tracing::debug!("📍 {}: keyword lookup matched {}", city, code);
            return code;
        }

        if let Some(code) = self.nearest_by_radius(&city).await {
            tracing::debug!("📍 {}: nearest airport within {} km is {}", city, self.radius_km, code);
            return code;
        }

        if let Some(code) = major_city_airport(&city) {
            tracing::info!("📍 {}: using major-city table entry {}", city, code);
            return code;
        }

        tracing::warn!(
            "⚠️ No airport found near '{}', falling back to {}",
            city_name,
            self.default_airport
        );
        self.default_airport.clone()
    }

    async fn keyword_lookup(&self, city: &str) -> Option<IataCode> {
        if city.is_empty() {
            return None;
        }
        match self.directory.airports_by_keyword(city).await {
            Ok(records) => records.iter().find_map(AirportRecord::code),
            Err(e) => {
                tracing::warn!("Direct airport lookup failed for {}: {}", city, e);
                None
            }
        }
    }

    async fn nearest_by_radius(&self, city: &str) -> Option<IataCode> {
        let records = self.airports_around(city).await?;
        nearest_codes(records, &[], 1).into_iter().next()
    }

    /// Airports inside the search radius of a geocoded place, `None` when the
    /// place or the directory gave nothing usable.
    pub(crate) async fn airports_around(&self, city: &str) -> Option<Vec<AirportRecord>> {
        let point = match self.geocoder.geocode(city).await {
            Ok(Some(point)) => point,
            Ok(None) => {
                tracing::debug!("Geocoder has no match for {}", city);
                return None;
            }
            Err(e) => {
                tracing::warn!("Geocoding error for {}: {}", city, e);
                return None;
            }
        };

        match self.directory.airports_near(point, self.radius_km).await {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!("Nearby airport search failed for {}: {}", city, e);
                None
            }
        }
    }
}

/// Exact key match first, then the first key contained in the name.
pub fn major_city_airport(city: &str) -> Option<IataCode> {
    let city = city.trim().to_lowercase();
    MAJOR_CITY_AIRPORTS
        .iter()
        .find(|(name, _)| *name == city)
        .or_else(|| MAJOR_CITY_AIRPORTS.iter().find(|(name, _)| city.contains(name)))
        .and_then(|(_, code)| IataCode::parse(code))
}

/// Codes of records with a valid IATA identifier, not excluded, nearest first.
/// The sort is stable so equal distances keep the directory's order.
pub fn nearest_codes(records: Vec<AirportRecord>, exclude: &[IataCode], limit: usize) -> Vec<IataCode> {
    let mut candidates: Vec<(f64, IataCode)> = records
        .iter()
        .filter_map(|r| r.code().map(|code| (r.distance_km(), code)))
        .filter(|(_, code)| !exclude.contains(code))
        .collect();

    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut codes: Vec<IataCode> = Vec::with_capacity(limit);
    for (_, code) in candidates {
        if codes.len() == limit {
            break;
        }
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Coordinates;
    use crate::domain::testing::{airport, keyword_airport, DirectoryCall, FakeDirectory, FakeGeocoder};

    fn code(raw: &str) -> IataCode {
        IataCode::parse(raw).unwrap()
    }

    fn locator(geocoder: FakeGeocoder, directory: FakeDirectory) -> AirportLocator<FakeGeocoder, FakeDirectory> {
        AirportLocator::new(geocoder, directory, 300, code("DEL"))
    }

    #[tokio::test]
    async fn test_keyword_lookup_wins() {
        let directory = FakeDirectory::new().with_keyword(
            "mumbai",
            vec![AirportRecord::default(), keyword_airport("BOM"), keyword_airport("BDQ")],
        );
        let geocoder = FakeGeocoder::new();
        let locator = locator(geocoder.clone(), directory);

        assert_eq!(locator.resolve("  Mumbai ").await, code("BOM"));
        assert_eq!(geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_radius_search_picks_nearest_airport() {
        let lonavala = Coordinates::new(18.75, 73.41);
        let directory = FakeDirectory::new().with_nearby(
            lonavala,
            vec![airport("BOM", 82.0), airport("PNQ", 64.0), keyword_airport("XXX")],
        );
        let geocoder = FakeGeocoder::new().with_place("lonavala", lonavala);
        let locator = locator(geocoder, directory.clone());

        assert_eq!(locator.resolve("Lonavala").await, code("PNQ"));
        assert_eq!(
            directory.recorded(),
            vec![
                DirectoryCall::Keyword("lonavala".to_string()),
                DirectoryCall::Near(lonavala, 300),
            ]
        );
    }

    #[tokio::test]
    async fn test_service_errors_fall_through_to_table() {
        let directory = FakeDirectory::new().keyword_fails();
        let locator = locator(FakeGeocoder::failing(), directory);

        assert_eq!(locator.resolve("Pune").await, code("PNQ"));
        assert_eq!(locator.resolve("navi mumbai").await, code("BOM"));
    }

    #[tokio::test]
    async fn test_unknown_place_gets_default() {
        let locator = locator(FakeGeocoder::new(), FakeDirectory::new().nearby_fails());

        assert_eq!(locator.resolve("Atlantis").await, code("DEL"));
        assert_eq!(locator.resolve("").await, code("DEL"));
    }

    #[test]
    fn test_major_city_exact_before_substring() {
        assert_eq!(major_city_airport("Delhi"), Some(code("DEL")));
        assert_eq!(major_city_airport("new delhi"), Some(code("DEL")));
        assert_eq!(major_city_airport("shimla"), None);
    }

    #[test]
    fn test_nearest_codes_is_stable_and_limited() {
        let records = vec![
            airport("AAA", 50.0),
            airport("BBB", 10.0),
            airport("CCC", 50.0),
            airport("DDD", 5.0),
            keyword_airport("EEE"),
        ];

        let codes = nearest_codes(records, &[code("DDD")], 3);
        assert_eq!(codes, vec![code("BBB"), code("AAA"), code("CCC")]);
    }
}
