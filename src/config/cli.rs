use crate::core::SearchRequest;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "travel-buddy")]
#[command(about = "Plan a trip: destinations, flights, budget, itinerary and weather")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = "travel-buddy.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Search flights between two cities, falling back to nearby destination airports
    Flights(FlightArgs),
    /// Run every planning step for a trip
    Plan(PlanArgs),
}

#[derive(Debug, Clone, Args)]
pub struct FlightArgs {
    /// Departure city
    #[arg(long)]
    pub from: String,

    /// Destination city
    #[arg(long)]
    pub to: String,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub depart: String,

    /// Return date (YYYY-MM-DD)
    #[arg(long = "return")]
    pub return_date: String,

    #[arg(long, default_value = "1")]
    pub adults: u32,

    /// Pick the offer with this rank (1 = best)
    #[arg(long)]
    pub select: Option<usize>,

    /// Write ranked offers to the configured output path
    #[arg(long)]
    pub export: bool,
}

impl FlightArgs {
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest::new(&self.from, &self.to, &self.depart, &self.return_date)
            .with_adults(self.adults)
    }
}

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    /// Preferred region(s), e.g. "Beaches, Mountains"
    #[arg(long)]
    pub preferences: String,

    /// Interests and activities, e.g. "Food, Adventure"
    #[arg(long)]
    pub interests: String,

    /// Departure city
    #[arg(long, default_value = "Mumbai")]
    pub from: String,

    /// Trip start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// Trip end date (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,

    /// Which suggested destination to pick (1-based)
    #[arg(long, default_value = "1")]
    pub destination: usize,

    /// Which flight offer to pick (1-based); omit to plan without a flight
    #[arg(long)]
    pub flight: Option<usize>,

    #[arg(long, default_value = "Hotel")]
    pub accommodation: String,

    /// Skip the weather step
    #[arg(long)]
    pub no_weather: bool,
}
