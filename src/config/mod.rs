//! Configuration module for kcouper
//!
//! Configuration comes from an optional TOML file, then the environment
//! (`SHOP_CODE`, `COUPON_RANGES`, `CHECK_RANGES`, `EXCLUDE_NAMES`).
//!
//! # Example
//!
//! ```no_run
//! use kcouper::config::load_config;
//!
//! let config = load_config(None).unwrap();
//! for range in &config.harvest.ranges {
//!     println!("will probe {}", range);
//! }
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, CodeRange, Config, HarvestConfig, LoggingConfig, OutputConfig, PacingConfig,
    RetryConfig, ShopConfig, DEFAULT_BASE_URL, DEFAULT_ORIGIN, DEFAULT_REFERER,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_with_hash, parse_config,
};
pub use validation::validate;
