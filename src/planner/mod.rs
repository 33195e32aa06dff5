// Planner layer: the trip wizard built on top of the flight search.

pub mod budget;
pub mod destinations;
pub mod itinerary;
pub mod trip_state;
pub mod weather;

pub use trip_state::{TripState, WizardStep};
pub use weather::WeatherReport;

use crate::core::search_request::{SearchRequest, DATE_FORMAT};
use crate::domain::ports::{TextGenerator, WeatherProvider};
use crate::utils::error::{Result, TravelError};
use budget::BudgetRequest;
use itinerary::ItineraryRequest;

/// Runs the language-model backed wizard steps against a `TripState`.
/// Without a weather provider the weather step is unavailable.
pub struct TripPlanner<T, W> {
    generator: T,
    weather: Option<W>,
}

impl<T, W> TripPlanner<T, W>
where
    T: TextGenerator,
    W: WeatherProvider,
{
    pub fn new(generator: T, weather: Option<W>) -> Self {
        Self { generator, weather }
    }

    pub async fn suggest_destinations(&self, state: &TripState) -> Result<TripState> {
        let choices = destinations::suggest_destinations(
            &self.generator,
            state.preferences(),
            state.interests(),
            destinations::SUGGESTION_BUDGET,
        )
        .await?;
        state.with_destination_choices(choices)
    }

    /// Round-trip search request from the departure city to the chosen destination.
    pub fn flight_request(&self, state: &TripState) -> Result<SearchRequest> {
        let (Some(destination), Some(start), Some(end)) =
            (state.destination(), state.start_date(), state.end_date())
        else {
            return Err(TravelError::wizard(
                WizardStep::Flights.name(),
                "choose a destination first",
            ));
        };
        Ok(SearchRequest::new(
            state.departure_city(),
            destination,
            start.format(DATE_FORMAT).to_string(),
            end.format(DATE_FORMAT).to_string(),
        ))
    }

    pub async fn estimate_budget(&self, state: &TripState, accommodation: &str) -> Result<TripState> {
        let destination = required_destination(state, WizardStep::Budget)?;
        let date_range = state.date_range_label().unwrap_or_default();
        let request = BudgetRequest {
            destination,
            date_range: &date_range,
            accommodation,
            departure_city: state.departure_city(),
            interests: state.interests(),
            flight_cost: state.flight_cost(),
        };

        let amount = budget::estimate_budget(&self.generator, &request).await;
        tracing::info!("💰 Estimated budget for {}: ₹{}", destination, budget::format_amount(amount));
        state.with_budget(amount)
    }

    pub async fn plan_itinerary(&self, state: &TripState) -> Result<TripState> {
        let destination = required_destination(state, WizardStep::Itinerary)?;
        let budget = state.budget().ok_or_else(|| {
            TravelError::wizard(WizardStep::Itinerary.name(), "estimate the budget first")
        })?;
        let request = ItineraryRequest {
            destination,
            days: state.trip_days().unwrap_or_default(),
            budget,
            interests: state.interests(),
            flight: state.flight(),
        };

        let text = itinerary::generate_itinerary(&self.generator, &request).await?;
        state.with_itinerary(text)
    }

    pub async fn check_weather(&self, state: &TripState) -> Result<TripState> {
        let destination = required_destination(state, WizardStep::Weather)?;
        let provider = self.weather.as_ref().ok_or_else(|| {
            TravelError::wizard(WizardStep::Weather.name(), "no weather service configured")
        })?;
        let report = weather::weather_summary(provider, &self.generator, destination).await?;
        state.with_weather(report.to_string())
    }
}

fn required_destination(state: &TripState, step: WizardStep) -> Result<&str> {
    state
        .destination()
        .ok_or_else(|| TravelError::wizard(step.name(), "choose a destination first"))
}
