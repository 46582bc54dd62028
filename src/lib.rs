//! kcouper: coupon discovery for a restaurant ordering API
//!
//! This crate probes the numeric voucher code space of the ordering API,
//! validates every candidate against the voucher, meal-period and food-detail
//! endpoints, and normalizes the surviving payloads into a price-sorted catalog.

pub mod api;
pub mod clock;
pub mod config;
pub mod coupon;
pub mod harvest;
pub mod menu;
pub mod output;

use thiserror::Error;

/// Main error type for kcouper operations
#[derive(Debug, Error)]
pub enum KcouperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] api::ApiError),

    #[error("Session bootstrap failed at {stage}: {message}")]
    Bootstrap { stage: String, message: String },

    #[error("Voucher lookup for coupon {code} failed: {message}")]
    Validation { code: u32, message: String },

    #[error("Food detail fetch for coupon {code} failed: {message}")]
    DetailFetch { code: u32, message: String },

    #[error("Unexpected payload shape: {0}")]
    Shape(#[from] coupon::ShapeError),

    /// A run-level failure stopped the harvest; `partial` holds every coupon
    /// merged before it
    #[error("Harvest aborted with {} coupon(s) merged: {source}", .partial.count())]
    Aborted {
        partial: Box<output::Catalog>,
        source: Box<KcouperError>,
    },

    #[error("Menu query failed: {0}")]
    Menu(String),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KcouperError {
    /// Returns true for errors scoped to a single candidate
    ///
    /// The harvester and the checker log these and move on to the next code.
    /// Everything else (retry exhaustion, undecodable responses, bootstrap
    /// failure, IO) terminates the run.
    pub fn is_candidate_local(&self) -> bool {
        match self {
            Self::Api(e) => e.is_candidate_local(),
            Self::Validation { .. } | Self::DetailFetch { .. } | Self::Shape(_) => true,
            _ => false,
        }
    }

    /// Takes the partially merged catalog out of an aborted harvest
    pub fn into_partial_catalog(self) -> (Option<output::Catalog>, KcouperError) {
        match self {
            Self::Aborted { partial, source } => (Some(*partial), *source),
            other => (None, other),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid code range '{0}', expected 'start-end'")]
    InvalidRange(String),
}

/// Result type alias for kcouper operations
pub type Result<T> = std::result::Result<T, KcouperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{CodeRange, Config};
pub use coupon::{normalize, normalize_name, CouponRecord, FoodItem};
pub use output::Catalog;
