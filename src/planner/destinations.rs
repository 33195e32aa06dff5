use crate::domain::ports::{Prompt, TextGenerator};
use crate::utils::error::{Result, TravelError};

/// Budget used for the first round of suggestions, before any estimate exists.
pub const SUGGESTION_BUDGET: u64 = 50_000;

pub fn destination_prompt(preferences: &str, interests: &str, budget: u64) -> Prompt {
    Prompt::user(format!(
        "You are a travel assistant. Based on the following user inputs:\n\
         - Preferred region(s): {preferences}\n\
         - Interests/activities: {interests}\n\
         - Total budget in INR: {budget}\n\n\
         Suggest 3 to 5 tourist destinations within India that match the given preferences \
         and interests. The destinations must be budget-friendly and suitable for the \
         specified interests.\n\n\
         Only return the names of the destinations as bullet points, one per line. \
         Do not add descriptions, explanations or any introduction."
    ))
}

/// One destination per non-blank line, bullets and surrounding whitespace removed.
pub fn parse_destination_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.trim_matches(|c: char| c == '-' || c == '*' || c == '•' || c.is_whitespace())
        })
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn suggest_destinations<T: TextGenerator>(
    generator: &T,
    preferences: &str,
    interests: &str,
    budget: u64,
) -> Result<Vec<String>> {
    let prompt = destination_prompt(preferences, interests, budget);
    let answer = generator.generate(&prompt).await?;

    let destinations = parse_destination_list(&answer);
    if destinations.is_empty() {
        return Err(TravelError::language_model(
            "no destinations could be read from the model's answer",
        ));
    }
    tracing::info!("🗺️  {} destinations suggested", destinations.len());
    Ok(destinations)
}
