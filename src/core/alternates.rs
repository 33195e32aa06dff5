use crate::core::airport_resolver::{nearest_codes, AirportLocator};
use crate::domain::model::IataCode;
use crate::domain::ports::{AirportDirectory, Geocoder};

impl<G: Geocoder, D: AirportDirectory> AirportLocator<G, D> {
    /// Up to `limit` airports within the search radius of `city_name`, nearest
    /// first, never including a code from `exclude`. Lookup failures yield an
    /// empty list.
    pub async fn find_alternates(
        &self,
        city_name: &str,
        exclude: &[IataCode],
        limit: usize,
    ) -> Vec<IataCode> {
        let city = city_name.trim();
        let Some(records) = self.airports_around(city).await else {
            return Vec::new();
        };

        let alternates = nearest_codes(records, exclude, limit);
        tracing::debug!(
            "🧭 {} alternate airports near {}: {:?}",
            alternates.len(),
            city,
            alternates.iter().map(IataCode::as_str).collect::<Vec<_>>()
        );
        alternates
    }
}

#[cfg(test)]
mod tests {
    use crate::core::airport_resolver::AirportLocator;
    use crate::domain::model::{Coordinates, IataCode};
    use crate::domain::testing::{airport, keyword_airport, FakeDirectory, FakeGeocoder};

    fn code(raw: &str) -> IataCode {
        IataCode::parse(raw).unwrap()
    }

    fn goa() -> Coordinates {
        Coordinates::new(15.49, 73.82)
    }

    #[tokio::test]
    async fn test_alternates_sorted_filtered_and_limited() {
        let directory = FakeDirectory::new().with_nearby(
            goa(),
            vec![
                airport("IXG", 140.0),
                airport("GOI", 25.0),
                airport("GOX", 40.0),
                keyword_airport(""),
                airport("HBX", 160.0),
                airport("IXE", 290.0),
                airport("MYQ", 299.0),
                airport("GAU", 12.0),
            ],
        );
        let geocoder = FakeGeocoder::new().with_place("goa", goa());
        let locator = AirportLocator::new(geocoder, directory, 300, code("DEL"));

        let alternates = locator.find_alternates("Goa", &[code("GOI")], 5).await;
        assert_eq!(
            alternates,
            vec![code("GAU"), code("GOX"), code("IXG"), code("HBX"), code("IXE")]
        );
        assert!(!alternates.contains(&code("GOI")));
    }

    #[tokio::test]
    async fn test_geocoding_miss_returns_empty() {
        let directory = FakeDirectory::new().with_nearby(goa(), vec![airport("GOI", 25.0)]);
        let locator = AirportLocator::new(FakeGeocoder::new(), directory.clone(), 300, code("DEL"));

        assert!(locator.find_alternates("Goa", &[], 5).await.is_empty());
        assert!(directory.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_directory_failure_returns_empty() {
        let geocoder = FakeGeocoder::new().with_place("goa", goa());
        let locator = AirportLocator::new(
            geocoder,
            FakeDirectory::new().nearby_fails(),
            300,
            code("DEL"),
        );

        assert!(locator.find_alternates("Goa", &[], 5).await.is_empty());
    }
}
