use crate::core::flight_search::SearchReport;
use crate::domain::model::{AnnotatedOffer, IataCode, Itinerary};
use crate::utils::error::{Result, TravelError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One direction of a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightLeg {
    pub airline: String,
    pub flight_number: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_at: NaiveDateTime,
    pub arrival_at: NaiveDateTime,
    pub duration: String,
    pub stops: usize,
}

impl FlightLeg {
    pub fn from_itinerary(itinerary: &Itinerary, from: &IataCode, to: &IataCode) -> Result<Self> {
        let first = itinerary
            .segments
            .first()
            .ok_or_else(|| TravelError::malformed("Amadeus", "itinerary has no segments"))?;
        let last = itinerary.segments.last().unwrap_or(first);

        Ok(Self {
            airline: first.carrier_code.clone(),
            flight_number: format!("{}{}", first.carrier_code, first.number),
            departure_airport: first
                .departure
                .iata_code
                .clone()
                .unwrap_or_else(|| from.to_string()),
            arrival_airport: last
                .arrival
                .iata_code
                .clone()
                .unwrap_or_else(|| to.to_string()),
            departure_at: parse_timestamp(&first.departure.at)?,
            arrival_at: parse_timestamp(&last.arrival.at)?,
            duration: itinerary
                .duration
                .as_deref()
                .map(humanize_duration)
                .unwrap_or_default(),
            stops: itinerary.segments.len().saturating_sub(1),
        })
    }

    pub fn departure_label(&self) -> String {
        self.departure_at.format("%a, %b %d %H:%M").to_string()
    }

    pub fn arrival_label(&self) -> String {
        self.arrival_at.format("%a, %b %d %H:%M").to_string()
    }
}

/// The offer the traveller picked, flattened for the later planning steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedFlight {
    pub rank: usize,
    /// Whole currency units, the trip's flight cost.
    pub price: u64,
    pub currency: String,
    pub outbound: FlightLeg,
    pub return_flight: Option<FlightLeg>,
    pub is_primary: bool,
    pub offer: AnnotatedOffer,
}

impl SelectedFlight {
    pub fn airline(&self) -> &str {
        &self.outbound.airline
    }

    pub fn flight_number(&self) -> &str {
        &self.outbound.flight_number
    }
}

/// Picks the offer at 1-based `rank` from a search report.
pub fn select_offer(report: &SearchReport, rank: usize) -> Result<SelectedFlight> {
    let offer = rank
        .checked_sub(1)
        .and_then(|i| report.offers.get(i))
        .ok_or_else(|| {
            TravelError::validation(format!(
                "flight option {} does not exist (choose 1-{})",
                rank,
                report.offers.len()
            ))
        })?;
    selected_from(offer, rank)
}

pub fn selected_from(offer: &AnnotatedOffer, rank: usize) -> Result<SelectedFlight> {
    let info = &offer.search_info;
    let outbound = offer
        .offer
        .outbound()
        .ok_or_else(|| TravelError::malformed("Amadeus", "offer has no itineraries"))?;

    // 回程方向與去程相反
    let return_flight = offer
        .offer
        .inbound()
        .map(|it| FlightLeg::from_itinerary(it, &info.destination_airport, &info.origin_airport))
        .transpose()?;

    Ok(SelectedFlight {
        rank,
        price: offer.total_price.max(0.0).trunc() as u64,
        currency: offer.offer.price.currency.clone().unwrap_or_default(),
        outbound: FlightLeg::from_itinerary(outbound, &info.origin_airport, &info.destination_airport)?,
        return_flight,
        is_primary: info.is_primary,
        offer: offer.clone(),
    })
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|e| TravelError::malformed("Amadeus", format!("bad timestamp '{}': {}", raw, e)))
}

/// `PT2H15M` → `2h 15m`.
pub fn humanize_duration(iso: &str) -> String {
    iso.replace("PT", "")
        .replace('H', "h ")
        .replace('M', "m")
        .trim()
        .to_string()
}
