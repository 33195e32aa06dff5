pub mod airport_resolver;
pub mod alternates;
pub mod export;
pub mod flight_search;
pub mod ranking;
pub mod search_request;
pub mod selection;

pub use crate::domain::model::{AnnotatedOffer, FlightOffer, IataCode, RoutePair};
pub use crate::domain::ports::{AirportDirectory, Geocoder, OfferSearch, Storage};
pub use crate::utils::error::Result;
pub use airport_resolver::AirportLocator;
pub use flight_search::{FlightSearch, NoResults, SearchOutcome, SearchReport};
pub use search_request::{InvalidInput, SearchRequest};
pub use selection::{select_offer, FlightLeg, SelectedFlight};
