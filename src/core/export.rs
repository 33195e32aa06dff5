use crate::core::flight_search::SearchReport;
use crate::core::selection::humanize_duration;
use crate::domain::model::AnnotatedOffer;
use crate::domain::ports::Storage;
use crate::utils::error::{Result, TravelError};
use serde::Serialize;

pub const OFFERS_CSV: &str = "offers.csv";
pub const OFFERS_JSON: &str = "offers.json";

#[derive(Debug, Serialize)]
struct OfferRow<'a> {
    rank: usize,
    origin: &'a str,
    destination: &'a str,
    primary: bool,
    price: f64,
    currency: &'a str,
    carrier: &'a str,
    flight: String,
    departure: &'a str,
    arrival: &'a str,
    duration: String,
    stops: usize,
}

fn row(rank: usize, offer: &AnnotatedOffer) -> OfferRow<'_> {
    let outbound = offer.offer.outbound();
    let first = outbound.and_then(|it| it.segments.first());
    let last = outbound.and_then(|it| it.segments.last());

    OfferRow {
        rank,
        origin: offer.search_info.origin_airport.as_str(),
        destination: offer.search_info.destination_airport.as_str(),
        primary: offer.is_primary(),
        price: offer.total_price,
        currency: offer.offer.price.currency.as_deref().unwrap_or(""),
        carrier: first.map(|s| s.carrier_code.as_str()).unwrap_or(""),
        flight: first
            .map(|s| format!("{}{}", s.carrier_code, s.number))
            .unwrap_or_default(),
        departure: first.map(|s| s.departure.at.as_str()).unwrap_or(""),
        arrival: last.map(|s| s.arrival.at.as_str()).unwrap_or(""),
        duration: outbound
            .and_then(|it| it.duration.as_deref())
            .map(humanize_duration)
            .unwrap_or_default(),
        stops: outbound.map(|it| it.segments.len().saturating_sub(1)).unwrap_or(0),
    }
}

pub fn offers_to_csv(offers: &[AnnotatedOffer]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (i, offer) in offers.iter().enumerate() {
        writer.serialize(row(i + 1, offer))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TravelError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| TravelError::validation(e.to_string()))
}

/// Writes the ranked offers in every requested format and returns the file names written.
pub async fn export_offers<S: Storage>(
    storage: &S,
    report: &SearchReport,
    formats: &[String],
) -> Result<Vec<String>> {
    let mut written = Vec::new();
    for format in formats {
        match format.as_str() {
            "csv" => {
                let csv = offers_to_csv(&report.offers)?;
                storage.write_file(OFFERS_CSV, csv.as_bytes()).await?;
                written.push(OFFERS_CSV.to_string());
            }
            "json" => {
                let json = serde_json::to_string_pretty(&report.offers)?;
                storage.write_file(OFFERS_JSON, json.as_bytes()).await?;
                written.push(OFFERS_JSON.to_string());
            }
            other => {
                return Err(TravelError::validation(format!(
                    "unsupported output format: {}",
                    other
                )))
            }
        }
    }
    tracing::debug!("Exported {} offers to {:?}", report.offers.len(), written);
    Ok(written)
}
