use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const MIN_ADULTS: u32 = 1;
pub const MAX_ADULTS: u32 = 9;

/// Raw search input as typed by the traveller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub origin_city: String,
    pub destination_city: String,
    pub departure_date: String,
    pub return_date: String,
    pub adults: u32,
}

impl SearchRequest {
    pub fn new(
        origin_city: impl Into<String>,
        destination_city: impl Into<String>,
        departure_date: impl Into<String>,
        return_date: impl Into<String>,
    ) -> Self {
        Self {
            origin_city: origin_city.into(),
            destination_city: destination_city.into(),
            departure_date: departure_date.into(),
            return_date: return_date.into(),
            adults: 1,
        }
    }

    pub fn with_adults(mut self, adults: u32) -> Self {
        self.adults = adults;
        self
    }

    /// Checks every field before any service is contacted.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidSearch, InvalidInput> {
        let required = [
            ("origin city", &self.origin_city),
            ("destination city", &self.destination_city),
            ("departure date", &self.departure_date),
            ("return date", &self.return_date),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(InvalidInput::MissingField(field));
            }
        }

        let departure = parse_date(&self.departure_date)?;
        let return_date = parse_date(&self.return_date)?;

        if departure >= return_date {
            return Err(InvalidInput::ReturnNotAfterDeparture);
        }
        if departure < today {
            return Err(InvalidInput::DepartureInPast);
        }
        if !(MIN_ADULTS..=MAX_ADULTS).contains(&self.adults) {
            return Err(InvalidInput::AdultsOutOfRange(self.adults));
        }

        Ok(ValidSearch {
            origin_city: self.origin_city.trim().to_string(),
            destination_city: self.destination_city.trim().to_string(),
            departure_date: departure,
            return_date,
            adults: self.adults,
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, InvalidInput> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| InvalidInput::InvalidDateFormat(raw.to_string()))
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSearch {
    pub origin_city: String,
    pub destination_city: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub adults: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("please fill all search fields ({0} is missing)")]
    MissingField(&'static str),

    #[error("invalid date format '{0}' (use YYYY-MM-DD)")]
    InvalidDateFormat(String),

    #[error("return date must be after departure date")]
    ReturnNotAfterDeparture,

    #[error("departure date cannot be in the past")]
    DepartureInPast,

    #[error("adults must be between 1 and 9 (got {0})")]
    AdultsOutOfRange(u32),
}
