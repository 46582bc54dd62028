use crate::config::types::{CodeRange, Config};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::env::VarError;
use std::path::Path;

/// Loads configuration from an optional TOML file and the process environment
///
/// The file is read first (all sections are optional), then the environment
/// variables `SHOP_CODE`, `COUPON_RANGES`, `CHECK_RANGES` and `EXCLUDE_NAMES`
/// override the matching fields. The result is validated before it is returned.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use kcouper::config::load_config;
///
/// let config = load_config(Some(Path::new("kcouper.toml"))).unwrap();
/// println!("Shop: {}", config.shop.code);
/// ```
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(path) => parse_config(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    let config = apply_env_overrides(config, |key| std::env::var(key))?;
    validate(&config)?;
    Ok(config)
}

/// Parses TOML content without touching the environment or validating
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Applies environment overrides using the provided lookup function
///
/// Decoupled from `std::env` so tests can feed a plain map.
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    if let Ok(code) = lookup("SHOP_CODE") {
        config.shop.code = code.trim().to_string();
    }
    if let Ok(raw) = lookup("COUPON_RANGES") {
        config.harvest.ranges = CodeRange::parse_list(&raw)?;
    }
    if let Ok(raw) = lookup("CHECK_RANGES") {
        config.harvest.check_ranges = CodeRange::parse_list(&raw)?;
    }
    if let Ok(raw) = lookup("EXCLUDE_NAMES") {
        config.harvest.exclude_names = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be told apart by their configuration.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and the file hash
///
/// Without a file the hash is `None`.
pub fn load_config_with_hash(path: Option<&Path>) -> Result<(Config, Option<String>), ConfigError> {
    let config = load_config(path)?;
    let hash = path.map(compute_config_hash).transpose()?;
    Ok((config, hash))
}
