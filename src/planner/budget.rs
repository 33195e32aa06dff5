use crate::domain::ports::{Prompt, TextGenerator};
use regex::Regex;
use std::sync::OnceLock;

pub const FALLBACK_BUDGET: u64 = 50_000;

/// Inputs of a budget estimate.
#[derive(Debug, Clone)]
pub struct BudgetRequest<'a> {
    pub destination: &'a str,
    pub date_range: &'a str,
    pub accommodation: &'a str,
    pub departure_city: &'a str,
    pub interests: &'a str,
    pub flight_cost: Option<u64>,
}

pub fn budget_prompt(request: &BudgetRequest<'_>) -> Prompt {
    let flight_cost = request
        .flight_cost
        .filter(|cost| *cost > 0)
        .map(|cost| format!("- Flight Cost: ₹{}\n", format_amount(cost)))
        .unwrap_or_default();

    Prompt::user(format!(
        "You are a smart travel budget calculator for Indian destinations. \
         Calculate a realistic budget based on these inputs:\n\n\
         Trip Details:\n\
         - Destination: {}\n\
         - Travel dates: {} (calculate duration)\n\
         - Accommodation: {}\n\
         - Departure: {}\n\
         - Interests: {}\n\
         {}\n\
         Return ONLY the total budget amount as a plain integer with no text or symbols, \
         for example 45000 for ₹45,000.",
        request.destination,
        request.date_range,
        request.accommodation,
        request.departure_city,
        request.interests,
        flight_cost
    ))
}

/// First run of ASCII digits in `text`.
pub fn parse_budget(text: &str) -> Option<u64> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let re = DIGITS.get_or_init(|| {
        Regex::new(r"[0-9]+").unwrap_or_else(|e| unreachable!("static regex: {}", e))
    });
    re.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Never fails: a broken model call or an answer without a number yields the fallback.
pub async fn estimate_budget<T: TextGenerator>(generator: &T, request: &BudgetRequest<'_>) -> u64 {
    let answer = match generator.generate(&budget_prompt(request)).await {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!("⚠️ Budget calculation failed, using ₹{}: {}", FALLBACK_BUDGET, e);
            return FALLBACK_BUDGET;
        }
    };

    match parse_budget(&answer) {
        Some(amount) => amount,
        None => {
            tracing::warn!("⚠️ No amount in budget answer '{}', using ₹{}", answer, FALLBACK_BUDGET);
            FALLBACK_BUDGET
        }
    }
}

/// Thousands separators: `45000` → `45,000`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
