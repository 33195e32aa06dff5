pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod planner;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use config::AppConfig;
pub use core::{FlightSearch, SearchOutcome, SearchRequest};
pub use planner::{TripPlanner, TripState};
pub use utils::error::{Result, TravelError};
