use crate::config::toml_config::SearchSettings;
use crate::core::airport_resolver::AirportLocator;
use crate::core::ranking::rank;
use crate::core::search_request::{InvalidInput, SearchRequest, ValidSearch};
use crate::domain::model::{AnnotatedOffer, FlightOffer, IataCode, OfferQuery, RoutePair, SearchInfo};
use crate::domain::ports::{AirportDirectory, Geocoder, OfferSearch};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Outcome of one flight search. Each variant is a distinct result the caller must handle.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Offers(SearchReport),
    NoResults(NoResults),
    InvalidInput(InvalidInput),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub origin: IataCode,
    pub destination: IataCode,
    /// Ranked: primary destination first, then cheapest.
    pub offers: Vec<AnnotatedOffer>,
    /// Routes queried, in the order they were tried.
    pub attempted: Vec<RoutePair>,
    /// Non-fatal problems met along the way.
    pub warnings: Vec<String>,
}

impl SearchReport {
    pub fn primary_count(&self) -> usize {
        self.offers.iter().filter(|o| o.is_primary()).count()
    }

    pub fn alternate_count(&self) -> usize {
        self.offers.len() - self.primary_count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoResults {
    pub origin: IataCode,
    pub destination: IataCode,
    pub attempted: Vec<RoutePair>,
    pub warnings: Vec<String>,
}

impl NoResults {
    /// Alternate destination airports that were searched without success.
    pub fn alternates_tried(&self) -> Vec<IataCode> {
        self.attempted
            .iter()
            .filter(|route| route.destination != self.destination)
            .map(|route| route.destination.clone())
            .collect()
    }
}

/// Searches a primary route and, when it yields too little, routes to
/// alternate destination airports. The origin airport is never varied.
pub struct FlightSearch<G: Geocoder, D: AirportDirectory, O: OfferSearch> {
    locator: AirportLocator<G, D>,
    offer_search: O,
    settings: SearchSettings,
}

impl<G: Geocoder, D: AirportDirectory, O: OfferSearch> FlightSearch<G, D, O> {
    pub fn new(locator: AirportLocator<G, D>, offer_search: O, settings: SearchSettings) -> Self {
        Self {
            locator,
            offer_search,
            settings,
        }
    }

    pub fn locator(&self) -> &AirportLocator<G, D> {
        &self.locator
    }

    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        self.search_on(request, chrono::Local::now().date_naive()).await
    }

    /// Same as [`search`](Self::search) with an explicit current date.
    pub async fn search_on(&self, request: &SearchRequest, today: NaiveDate) -> SearchOutcome {
        let search = match request.validate(today) {
            Ok(search) => search,
            Err(reason) => {
                tracing::warn!("❌ Invalid search input: {}", reason);
                return SearchOutcome::InvalidInput(reason);
            }
        };

        tracing::info!("📍 Finding nearest airports...");
        let origin = self.locator.resolve(&search.origin_city).await;
        let destination = self.locator.resolve(&search.destination_city).await;
        tracing::info!("Departure from: {} (nearest to {})", origin, search.origin_city);
        tracing::info!("Arrival at: {} (nearest to {})", destination, search.destination_city);

        // 只排除主要目的地；出發機場若在半徑內也會被當成替代目的地
        let alternates = self
            .locator
            .find_alternates(
                &search.destination_city,
                std::slice::from_ref(&destination),
                self.settings.alternate_limit,
            )
            .await;

        let candidates: Vec<IataCode> = std::iter::once(destination.clone())
            .chain(alternates.into_iter().take(self.settings.alternates_to_try))
            .collect();

        let mut tried: HashSet<RoutePair> = HashSet::new();
        let mut attempted = Vec::new();
        let mut collected: Vec<AnnotatedOffer> = Vec::new();
        let mut warnings = Vec::new();

        for candidate in candidates {
            let route = RoutePair::new(origin.clone(), candidate);
            if !tried.insert(route.clone()) {
                continue;
            }
            attempted.push(route.clone());

            let is_primary = route.destination == destination;
            let query = self.query_for(&search, route.clone());

            tracing::info!("🔍 Searching {}...", route);
            match self.offer_search.search_offers(&query).await {
                Ok(found) => {
                    let returned = found.len();
                    tracing::debug!("{} returned {} offers", route, returned);
                    collected.extend(tag_offers(found, &route, is_primary, &mut warnings));

                    if is_primary && returned >= self.settings.enough_primary_offers {
                        tracing::debug!("Primary route has enough offers, skipping alternates");
                        break;
                    }
                }
                Err(e) => {
                    let message = format!("Search failed for {}: {}", route, e);
                    tracing::warn!("⚠️ {}", message);
                    warnings.push(message);
                }
            }

            let primary_count = collected.iter().filter(|o| o.is_primary()).count();
            if primary_count >= self.settings.enough_primary_offers {
                break;
            }
        }

        if collected.is_empty() {
            tracing::info!(
                "🛫 No flights found for {} → {} after {} routes",
                search.origin_city,
                search.destination_city,
                attempted.len()
            );
            return SearchOutcome::NoResults(NoResults {
                origin,
                destination,
                attempted,
                warnings,
            });
        }

        let report = SearchReport {
            origin,
            destination,
            offers: rank(collected),
            attempted,
            warnings,
        };
        tracing::info!(
            "✨ Found {} options to {}, {} to alternative airports",
            report.primary_count(),
            report.destination,
            report.alternate_count()
        );
        SearchOutcome::Offers(report)
    }

    fn query_for(&self, search: &ValidSearch, route: RoutePair) -> OfferQuery {
        OfferQuery {
            route,
            departure_date: search.departure_date,
            return_date: search.return_date,
            adults: search.adults,
            currency_code: self.settings.currency_code.clone(),
            max_results: self.settings.max_offers_per_query,
        }
    }
}

fn tag_offers(
    offers: Vec<FlightOffer>,
    route: &RoutePair,
    is_primary: bool,
    warnings: &mut Vec<String>,
) -> Vec<AnnotatedOffer> {
    let mut tagged = Vec::with_capacity(offers.len());
    for offer in offers {
        let Some(total_price) = offer.total_price() else {
            let message = format!(
                "Skipping offer on {} with unreadable price '{}'",
                route, offer.price.total
            );
            tracing::warn!("{}", message);
            warnings.push(message);
            continue;
        };
        tagged.push(AnnotatedOffer {
            offer,
            search_info: SearchInfo {
                origin_airport: route.origin.clone(),
                destination_airport: route.destination.clone(),
                is_primary,
            },
            total_price,
        });
    }
    tagged
}
