use crate::domain::model::IataCode;
use crate::utils::error::{Result, TravelError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TravelError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_allowed_values(field_name: &str, values: &[String], allowed: &[&str]) -> Result<()> {
    for value in values {
        if !allowed.contains(&value.as_str()) {
            return Err(TravelError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: format!("Unsupported value. Allowed values: {}", allowed.join(", ")),
            });
        }
    }
    Ok(())
}

pub fn validate_iata_code(field_name: &str, value: &str) -> Result<()> {
    IataCode::parse(value)
        .map(|_| ())
        .ok_or_else(|| TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected a three-letter IATA airport code".to_string(),
        })
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| TravelError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("amadeus.base_url", "https://test.api.amadeus.com").is_ok());
        assert!(validate_url("amadeus.base_url", "http://localhost:8080").is_ok());
        assert!(validate_url("amadeus.base_url", "").is_err());
        assert!(validate_url("amadeus.base_url", "invalid-url").is_err());
        assert!(validate_url("amadeus.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("search.radius_km", 300, 1).is_ok());
        assert!(validate_positive_number("search.radius_km", 0, 1).is_err());
    }

    #[test]
    fn test_validate_iata_code() {
        assert!(validate_iata_code("search.default_airport", "DEL").is_ok());
        assert!(validate_iata_code("search.default_airport", "del").is_ok());
        assert!(validate_iata_code("search.default_airport", "DELHI").is_err());
        assert!(validate_iata_code("search.default_airport", "D3L").is_err());
    }

    #[test]
    fn test_validate_allowed_values() {
        let formats = vec!["csv".to_string(), "json".to_string()];
        assert!(validate_allowed_values("output.output_formats", &formats, &["csv", "json"]).is_ok());

        let invalid = vec!["xlsx".to_string()];
        assert!(validate_allowed_values("output.output_formats", &invalid, &["csv", "json"]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("key".to_string());
        assert_eq!(validate_required_field("llm.api_key", &present).unwrap(), "key");

        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("llm.api_key", &missing),
            Err(TravelError::MissingConfigError { .. })
        ));
    }
}
