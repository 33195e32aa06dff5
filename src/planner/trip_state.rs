use crate::core::selection::SelectedFlight;
use crate::domain::ports::Storage;
use crate::utils::error::{Result, TravelError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The step the trip is waiting on. Ordered: a state at `Budget` has
/// finished every step before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Preferences,
    Destination,
    Flights,
    Budget,
    Itinerary,
    Weather,
    Complete,
}

impl WizardStep {
    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::Preferences => "preferences",
            WizardStep::Destination => "destination",
            WizardStep::Flights => "flights",
            WizardStep::Budget => "budget",
            WizardStep::Itinerary => "itinerary",
            WizardStep::Weather => "weather",
            WizardStep::Complete => "complete",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything gathered so far for one trip.
///
/// Transitions never mutate: each returns a new state with the step's data set
/// and the data of every later step cleared, so redoing an early step cannot
/// leave a stale budget or itinerary behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripState {
    step: WizardStep,
    preferences: String,
    interests: String,
    departure_city: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    destination_choices: Vec<String>,
    destination: Option<String>,
    flight: Option<SelectedFlight>,
    flight_cost: Option<u64>,
    budget: Option<u64>,
    itinerary: Option<String>,
    weather: Option<String>,
}

impl Default for TripState {
    fn default() -> Self {
        Self::new()
    }
}

impl TripState {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Preferences,
            preferences: String::new(),
            interests: String::new(),
            departure_city: String::new(),
            start_date: None,
            end_date: None,
            destination_choices: Vec::new(),
            destination: None,
            flight: None,
            flight_cost: None,
            budget: None,
            itinerary: None,
            weather: None,
        }
    }

    pub fn with_preferences(
        &self,
        preferences: &str,
        interests: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        departure_city: &str,
    ) -> Result<Self> {
        let step = WizardStep::Preferences.name();
        for (field, value) in [
            ("preferences", preferences),
            ("interests", interests),
            ("departure city", departure_city),
        ] {
            if value.trim().is_empty() {
                return Err(TravelError::wizard(step, format!("{} cannot be empty", field)));
            }
        }
        if end_date < start_date {
            return Err(TravelError::wizard(step, "end date cannot be before start date"));
        }

        let mut next = self.cleared_from(WizardStep::Preferences);
        next.preferences = preferences.trim().to_string();
        next.interests = interests.trim().to_string();
        next.departure_city = departure_city.trim().to_string();
        next.start_date = Some(start_date);
        next.end_date = Some(end_date);
        next.step = WizardStep::Destination;
        Ok(next)
    }

    pub fn with_destination_choices(&self, choices: Vec<String>) -> Result<Self> {
        self.require(WizardStep::Destination)?;
        if choices.is_empty() {
            return Err(TravelError::wizard(
                WizardStep::Destination.name(),
                "no destinations to choose from",
            ));
        }

        let mut next = self.cleared_from(WizardStep::Destination);
        next.destination_choices = choices;
        next.step = WizardStep::Destination;
        Ok(next)
    }

    /// `index` is 1-based, as shown to the traveller.
    pub fn choose_destination(&self, index: usize) -> Result<Self> {
        self.require(WizardStep::Destination)?;
        let chosen = index
            .checked_sub(1)
            .and_then(|i| self.destination_choices.get(i))
            .ok_or_else(|| {
                TravelError::wizard(
                    WizardStep::Destination.name(),
                    format!(
                        "destination {} does not exist ({} suggested)",
                        index,
                        self.destination_choices.len()
                    ),
                )
            })?
            .clone();

        let mut next = self.cleared_from(WizardStep::Flights);
        next.destination = Some(chosen);
        next.step = WizardStep::Flights;
        Ok(next)
    }

    pub fn with_flight(&self, flight: SelectedFlight) -> Result<Self> {
        self.require(WizardStep::Flights)?;
        let mut next = self.cleared_from(WizardStep::Flights);
        next.flight_cost = Some(flight.price);
        next.flight = Some(flight);
        next.step = WizardStep::Budget;
        Ok(next)
    }

    pub fn skip_flight(&self) -> Result<Self> {
        self.require(WizardStep::Flights)?;
        let mut next = self.cleared_from(WizardStep::Flights);
        next.step = WizardStep::Budget;
        Ok(next)
    }

    pub fn with_budget(&self, amount: u64) -> Result<Self> {
        self.require(WizardStep::Budget)?;
        let mut next = self.cleared_from(WizardStep::Budget);
        next.budget = Some(amount);
        next.step = WizardStep::Itinerary;
        Ok(next)
    }

    pub fn with_itinerary(&self, itinerary: String) -> Result<Self> {
        self.require(WizardStep::Itinerary)?;
        let mut next = self.cleared_from(WizardStep::Itinerary);
        next.itinerary = Some(itinerary);
        next.step = WizardStep::Weather;
        Ok(next)
    }

    pub fn with_weather(&self, weather: String) -> Result<Self> {
        self.require(WizardStep::Weather)?;
        let mut next = self.clone();
        next.weather = Some(weather);
        next.step = WizardStep::Complete;
        Ok(next)
    }

    /// Inclusive day count; `None` before preferences are set.
    pub fn trip_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((end - start).num_days() + 1),
            _ => None,
        }
    }

    /// e.g. "November 02 to November 06".
    pub fn date_range_label(&self) -> Option<String> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(format!(
                "{} to {}",
                start.format("%B %d"),
                end.format("%B %d")
            )),
            _ => None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn preferences(&self) -> &str {
        &self.preferences
    }

    pub fn interests(&self) -> &str {
        &self.interests
    }

    pub fn departure_city(&self) -> &str {
        &self.departure_city
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn destination_choices(&self) -> &[String] {
        &self.destination_choices
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn flight(&self) -> Option<&SelectedFlight> {
        self.flight.as_ref()
    }

    pub fn flight_cost(&self) -> Option<u64> {
        self.flight_cost
    }

    pub fn budget(&self) -> Option<u64> {
        self.budget
    }

    pub fn itinerary(&self) -> Option<&str> {
        self.itinerary.as_deref()
    }

    pub fn weather(&self) -> Option<&str> {
        self.weather.as_deref()
    }

    /// Persists the state as pretty JSON through any `Storage`.
    pub async fn save<S: Storage>(&self, storage: &S, path: &str) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        storage.write_file(path, &json).await
    }

    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        let bytes = storage.read_file(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn require(&self, step: WizardStep) -> Result<()> {
        if self.step < step {
            return Err(TravelError::wizard(
                step.name(),
                format!("finish the '{}' step first", self.step),
            ));
        }
        Ok(())
    }

    fn cleared_from(&self, step: WizardStep) -> Self {
        let mut next = self.clone();
        if step <= WizardStep::Preferences {
            next.preferences.clear();
            next.interests.clear();
            next.departure_city.clear();
            next.start_date = None;
            next.end_date = None;
        }
        if step <= WizardStep::Destination {
            next.destination_choices.clear();
            next.destination = None;
        }
        if step <= WizardStep::Flights {
            next.flight = None;
            next.flight_cost = None;
        }
        if step <= WizardStep::Budget {
            next.budget = None;
        }
        if step <= WizardStep::Itinerary {
            next.itinerary = None;
        }
        next.weather = None;
        next
    }
}
