use crate::core::selection::{FlightLeg, SelectedFlight};
use crate::domain::ports::{Prompt, TextGenerator};
use crate::planner::budget::format_amount;
use crate::utils::error::{Result, TravelError};
use std::fmt::Write as _;

pub const MIN_BUDGET: u64 = 20_000;
const MIN_DURATION: u64 = 2;

const DESIGNER_INSTRUCTIONS: &str = "You're a professional travel designer. \
Create detailed itineraries with:\n\
- Creative day titles with emojis\n\
- Well-timed morning/afternoon/evening activities\n\
- Local restaurant and attraction recommendations\n\
- Transportation notes\n\
- Budget estimates\n\
- Insider tips";

#[derive(Debug, Clone)]
pub struct ItineraryRequest<'a> {
    pub destination: &'a str,
    pub days: i64,
    pub budget: u64,
    pub interests: &'a str,
    pub flight: Option<&'a SelectedFlight>,
}

/// Budget and duration after applying the floors, plus the per-day share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBudget {
    pub budget: u64,
    pub duration: u64,
    pub daily: u64,
}

impl DayBudget {
    pub fn new(budget: u64, days: i64) -> Self {
        let budget = budget.max(MIN_BUDGET);
        let duration = if days < 1 { MIN_DURATION } else { days.unsigned_abs() };
        Self {
            budget,
            duration,
            daily: budget / duration,
        }
    }
}

pub fn arrival_section(destination: &str, flight: Option<&SelectedFlight>, daily: u64) -> String {
    let daily = format_amount(daily);
    match flight {
        Some(flight) => {
            let leg = &flight.outbound;
            format!(
                "\n### ✈️ **Day 1: Arrival in {destination}**\n\
                 **🏨 *Settling In***\n\n\
                 **Flight Details:**\n\
                 🛬 {} - {} {}\n\
                 📍 {}\n\n\
                 **Upon Arrival:**\n\
                 ⏰ 1-2 hours - Baggage claim & transfers\n\
                 🚕 Transfer to accommodation\n\
                 🏨 Check-in and freshen up\n\n\
                 **Evening:**\n\
                 🌆 Explore nearby area\n\
                 🍽️ Dinner at local restaurant\n\
                 💤 Rest for next day\n\n\
                 **💰 Budget:** ₹{daily}\n",
                leg.arrival_at.format("%H:%M"),
                leg.airline,
                leg.flight_number,
                leg.arrival_airport,
            )
        }
        None => format!(
            "\n### 🏨 **Day 1: Welcome to {destination}**\n\
             **🌟 *First Impressions***\n\n\
             **Afternoon/Evening:**\n\
             🏨 Hotel check-in\n\
             🚶 Neighborhood walk\n\
             🍜 Local cuisine dinner\n\n\
             **💰 Budget:** ₹{daily}\n"
        ),
    }
}

/// Days 2..=duration.
pub fn activity_days(destination: &str, duration: u64, interests: &str, daily: u64) -> String {
    let daily = format_amount(daily);
    let mut out = String::new();
    for day in 2..=duration {
        let _ = write!(
            out,
            "\n### 🌟 **Day {day}: Exploring {destination}**\n\
             **🌅 Morning**\n\
             ☕ 8:00 AM - Breakfast\n\
             🏛️ 9:30 AM - {interests}-focused activity\n\
             ⏰ 12:00 PM - Lunch\n\n\
             **🌞 Afternoon**\n\
             🚤 2:00 PM - Local experience\n\
             🏞️ 4:30 PM - Landmark visit\n\n\
             **🌃 Evening**\n\
             🌇 6:00 PM - Sunset viewing\n\
             🍸 8:00 PM - Dinner\n\n\
             **💰 Budget:** ₹{daily}\n"
        );
    }
    out
}

/// Only produced for round trips; the day costs half the daily share.
pub fn departure_section(duration: u64, flight: Option<&SelectedFlight>, daily: u64) -> String {
    let Some(leg) = flight.and_then(|f| f.return_flight.as_ref()) else {
        return String::new();
    };
    format!(
        "\n### ✈️ **Day {duration}: Departure**\n\
         **🛫 *Final Day***\n\n\
         **Morning:**\n\
         🧳 Check-out by 11 AM\n\
         🚕 Airport transfer\n\
         ☕ Airport breakfast\n\n\
         **Flight:**\n\
         🛫 {} - {} {}\n\
         📍 {}\n\n\
         **💰 Budget:** ₹{}\n",
        leg.departure_at.format("%H:%M"),
        leg.airline,
        leg.flight_number,
        leg.departure_airport,
        format_amount(daily / 2),
    )
}

pub fn framework(request: &ItineraryRequest<'_>) -> String {
    let plan = DayBudget::new(request.budget, request.days);
    let mut text = arrival_section(request.destination, request.flight, plan.daily);
    text.push_str(&activity_days(
        request.destination,
        plan.duration,
        request.interests,
        plan.daily,
    ));
    text.push_str(&departure_section(plan.duration, request.flight, plan.daily));
    text
}

fn leg_details(title: &str, leg: &FlightLeg) -> String {
    format!(
        "{title}:\n\
         - Airline: {}\n\
         - Flight Number: {}\n\
         - Departure: {}\n\
         - Arrival: {}\n\
         - Duration: {}\n",
        leg.airline,
        leg.flight_number,
        leg.departure_label(),
        leg.arrival_label(),
        if leg.duration.is_empty() { "Not specified" } else { leg.duration.as_str() },
    )
}

pub fn flight_info(flight: Option<&SelectedFlight>) -> String {
    let Some(flight) = flight else {
        return "No flight booked".to_string();
    };
    let mut info = leg_details("Flight Details", &flight.outbound);
    if let Some(back) = &flight.return_flight {
        info.push('\n');
        info.push_str(&leg_details("Return Flight", back));
    }
    info
}

pub fn itinerary_prompt(request: &ItineraryRequest<'_>) -> Prompt {
    let plan = DayBudget::new(request.budget, request.days);
    Prompt::user(format!(
        "Create a {}-day itinerary for {} with ₹{} budget.\n\n\
         **Traveler Interests:** {}\n\
         **Flight Information:** {}\n\n\
         **Output Requirements:**\n\
         1. Each day gets a creative title (emoji + catchy phrase)\n\
         2. Group activities into Morning/Afternoon/Evening\n\
         3. Include specific timings, venue names, and costs\n\
         4. Add local tips and transportation notes\n\
         5. Use consistent markdown formatting\n\n\
         **Itinerary Framework:**\n{}",
        plan.duration,
        request.destination,
        format_amount(plan.budget),
        request.interests,
        flight_info(request.flight),
        framework(request)
    ))
    .with_system(DESIGNER_INSTRUCTIONS)
}

pub fn format_final_itinerary(
    destination: &str,
    duration: u64,
    budget: u64,
    interests: &str,
    content: &str,
) -> String {
    format!(
        "# ✈️ {destination} Itinerary ({duration} Days)\n\
         **💰 Budget:** ₹{} | **🌍 Interests:** {interests}\n\n\
         ---\n\n\
         {}\n\n\
         ---\n\
         ## 📌 Travel Tips:\n\
         💡 *Local Insight:* Ask locals for hidden gems!\n\
         ⚠️ *Note:* Check weather forecasts before outdoor activities\n\
         📱 *Helpful Apps:* Google Maps, local transit apps\n\n\
         Enjoy your trip! 🎉\n",
        format_amount(budget),
        content.trim()
    )
}

pub async fn generate_itinerary<T: TextGenerator>(
    generator: &T,
    request: &ItineraryRequest<'_>,
) -> Result<String> {
    if request.destination.trim().is_empty() {
        return Err(TravelError::validation("itinerary needs a destination"));
    }
    let plan = DayBudget::new(request.budget, request.days);
    tracing::info!(
        "📝 Generating {}-day itinerary for {} (₹{}/day)",
        plan.duration,
        request.destination,
        plan.daily
    );

    let content = generator.generate(&itinerary_prompt(request)).await?;
    Ok(format_final_itinerary(
        request.destination,
        plan.duration,
        plan.budget,
        request.interests,
        &content,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::selection::selected_from;
    use crate::domain::model::{AnnotatedOffer, IataCode, Itinerary, SearchInfo};
    use crate::domain::testing::{offer, segment, FakeTextGenerator};

    fn round_trip() -> SelectedFlight {
        let mut raw = offer("5200");
        raw.itineraries.push(Itinerary {
            duration: Some("PT1H10M".to_string()),
            segments: vec![segment(
                "AI",
                "662",
                "GOI",
                "2026-11-06T18:40:00",
                "BOM",
                "2026-11-06T19:50:00",
            )],
        });
        let annotated = AnnotatedOffer {
            offer: raw,
            search_info: SearchInfo {
                origin_airport: IataCode::parse("BOM").unwrap(),
                destination_airport: IataCode::parse("GOI").unwrap(),
                is_primary: true,
            },
            total_price: 5200.0,
        };
        selected_from(&annotated, 1).unwrap()
    }

    fn request<'a>(days: i64, budget: u64, flight: Option<&'a SelectedFlight>) -> ItineraryRequest<'a> {
        ItineraryRequest {
            destination: "Goa",
            days,
            budget,
            interests: "Beaches",
            flight,
        }
    }

    #[test]
    fn test_day_budget_floors() {
        assert_eq!(
            DayBudget::new(10_000, 4),
            DayBudget { budget: 20_000, duration: 4, daily: 5_000 }
        );
        assert_eq!(DayBudget::new(45_000, 0).duration, 2);
        assert_eq!(DayBudget::new(45_000, 3).daily, 15_000);
    }

    #[test]
    fn test_framework_without_flight() {
        let text = framework(&request(3, 30_000, None));
        assert!(text.contains("Day 1: Welcome to Goa"));
        assert!(text.contains("Day 2: Exploring Goa"));
        assert!(text.contains("Day 3: Exploring Goa"));
        assert!(!text.contains("Departure**"));
        assert!(text.contains("Beaches-focused activity"));
        assert!(text.contains("₹10,000"));
    }

    #[test]
    fn test_framework_with_round_trip() {
        let flight = round_trip();
        let text = framework(&request(4, 40_000, Some(&flight)));
        assert!(text.contains("Day 1: Arrival in Goa"));
        assert!(text.contains("🛬 07:15 - 6E 6E5321"));
        assert!(text.contains("Day 4: Departure"));
        assert!(text.contains("🛫 18:40 - AI AI662"));
        assert!(text.contains("📍 GOI"));
        // 出發日只算半天預算
        assert!(text.contains("₹5,000"));
    }

    #[test]
    fn test_flight_info_lists_both_legs() {
        let flight = round_trip();
        let info = flight_info(Some(&flight));
        assert!(info.contains("Flight Number: 6E5321"));
        assert!(info.contains("Return Flight:"));
        assert!(info.contains("Duration: 1h 10m"));
        assert_eq!(flight_info(None), "No flight booked");
    }

    #[tokio::test]
    async fn test_generate_wraps_answer() {
        let generator = FakeTextGenerator::replying("Day 1: beach time");
        let text = generate_itinerary(&generator, &request(3, 12_000, None))
            .await
            .unwrap();

        assert!(text.starts_with("# ✈️ Goa Itinerary (3 Days)"));
        assert!(text.contains("**💰 Budget:** ₹20,000 | **🌍 Interests:** Beaches"));
        assert!(text.contains("Day 1: beach time"));
        assert!(text.contains("## 📌 Travel Tips:"));

        let prompt = generator.last_prompt().unwrap();
        assert!(prompt.system.unwrap().contains("professional travel designer"));
        assert!(prompt.user.contains("Create a 3-day itinerary for Goa with ₹20,000 budget."));
    }

    #[tokio::test]
    async fn test_generate_propagates_model_failure() {
        let generator = FakeTextGenerator::failing();
        assert!(generate_itinerary(&generator, &request(3, 30_000, None))
            .await
            .is_err());
    }
}
