use crate::config::types::{ApiConfig, CodeRange, Config, ShopConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_shop_config(&config.shop)?;
    validate_ranges("ranges", &config.harvest.ranges)?;
    validate_ranges("check-ranges", &config.harvest.check_ranges)?;
    Ok(())
}

/// Validates the API endpoint and identity headers
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_shop_config(config: &ShopConfig) -> Result<(), ConfigError> {
    if config.code.trim().is_empty() {
        return Err(ConfigError::Validation(
            "shop code cannot be empty (set [shop] code or SHOP_CODE)".to_string(),
        ));
    }
    Ok(())
}

/// Every range must contain at least one code
fn validate_ranges(field: &str, ranges: &[CodeRange]) -> Result<(), ConfigError> {
    for range in ranges {
        if range.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{} entry '{}' is empty: start must be below end",
                field, range
            )));
        }
    }
    Ok(())
}
