use crate::domain::model::IataCode;
use crate::utils::error::{Result, TravelError};
use crate::utils::validation::{
    validate_allowed_values, validate_iata_code, validate_non_empty_string, validate_path,
    validate_positive_number, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const OUTPUT_FORMATS: [&str; 2] = ["csv", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub amadeus: AmadeusConfig,
    pub geocoding: GeocodingConfig,
    pub search: SearchSettings,
    pub llm: LlmConfig,
    pub weather: WeatherConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmadeusConfig {
    pub base_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            base_url: "https://test.api.amadeus.com".to_string(),
            client_id: None,
            client_secret: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "TravelBuddy/1.0".to_string(),
        }
    }
}

/// Knobs of the flight search loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub currency_code: String,
    pub radius_km: u32,
    pub max_offers_per_query: usize,
    pub alternate_limit: usize,
    pub alternates_to_try: usize,
    pub enough_primary_offers: usize,
    pub default_airport: String,
    pub request_timeout_seconds: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            currency_code: "INR".to_string(),
            radius_km: 300,
            max_offers_per_query: 5,
            alternate_limit: 5,
            alternates_to_try: 3,
            enough_primary_offers: 3,
            default_airport: "DEL".to_string(),
            request_timeout_seconds: None,
        }
    }
}

impl SearchSettings {
    /// Falls back to DEL when the configured value is not a valid code;
    /// `validate` rejects such configs before this is reached.
    pub fn default_airport_code(&self) -> IataCode {
        IataCode::parse(&self.default_airport)
            .or_else(|| IataCode::parse("DEL"))
            .unwrap_or_else(|| unreachable!("DEL is a valid IATA code"))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: None,
            model: "gemma2-9b-it".to_string(),
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            output_formats: vec!["csv".to_string()],
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TravelError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TravelError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${AMADEUS_API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").unwrap_or_else(|e| unreachable!("static regex: {}", e))
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("amadeus.base_url", &self.amadeus.base_url)?;
        validate_url("geocoding.base_url", &self.geocoding.base_url)?;
        validate_non_empty_string("geocoding.user_agent", &self.geocoding.user_agent)?;
        validate_url("llm.base_url", &self.llm.base_url)?;
        validate_url("weather.base_url", &self.weather.base_url)?;

        let search = &self.search;
        validate_non_empty_string("search.currency_code", &search.currency_code)?;
        validate_range("search.radius_km", search.radius_km, 1, 500)?;
        validate_positive_number("search.max_offers_per_query", search.max_offers_per_query, 1)?;
        validate_positive_number("search.alternate_limit", search.alternate_limit, 1)?;
        validate_positive_number("search.enough_primary_offers", search.enough_primary_offers, 1)?;
        validate_iata_code("search.default_airport", &search.default_airport)?;

        validate_path("output.output_path", &self.output.output_path)?;
        validate_allowed_values("output.output_formats", &self.output.output_formats, &OUTPUT_FORMATS)?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
