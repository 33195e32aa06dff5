use crate::domain::model::WeatherConditions;
use crate::domain::ports::{Prompt, TextGenerator, WeatherProvider};
use crate::utils::error::{Result, TravelError};
use std::fmt;

/// What the weather step can tell the traveller.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherReport {
    Summary(String),
    UnknownCity(String),
    RateLimited,
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherReport::Summary(text) => f.write_str(text),
            WeatherReport::UnknownCity(city) => {
                write!(f, "❌ Could not find coordinates for city: {}", city)
            }
            WeatherReport::RateLimited => {
                f.write_str("⚠️ Weather API limit reached. Please try again later.")
            }
        }
    }
}

/// Bullet list handed to the summariser.
pub fn format_conditions(conditions: &WeatherConditions) -> String {
    format!(
        "- Temperature: {}°C\n\
         - Feels Like: {}°C\n\
         - Condition: {}\n\
         - Humidity: {}%\n\
         - Wind Speed: {} m/s",
        conditions.temperature_c,
        conditions.feels_like_c,
        capitalize(&conditions.description),
        conditions.humidity_pct,
        conditions.wind_speed_ms
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn weather_prompt(city: &str, conditions: &str) -> Prompt {
    Prompt::user(format!(
        "You are a travel assistant. Summarize the current weather conditions in {city} \
         and give brief travel advice if necessary.\n\
         Give the answer in bullet points like a weather application.\n\n\
         Current weather data:\n{conditions}\n"
    ))
}

pub async fn weather_summary<W, T>(weather: &W, generator: &T, city: &str) -> Result<WeatherReport>
where
    W: WeatherProvider,
    T: TextGenerator,
{
    let Some(point) = weather.locate(city).await? else {
        tracing::warn!("⚠️ No coordinates for {}", city);
        return Ok(WeatherReport::UnknownCity(city.to_string()));
    };

    let conditions = match weather.current_conditions(point).await {
        Ok(conditions) => conditions,
        Err(TravelError::ServiceError { status: 429, .. }) => {
            tracing::warn!("⚠️ Weather API rate limit reached");
            return Ok(WeatherReport::RateLimited);
        }
        Err(e) => return Err(e),
    };

    let bullets = format_conditions(&conditions);
    let summary = generator.generate(&weather_prompt(city, &bullets)).await?;
    Ok(WeatherReport::Summary(summary))
}
