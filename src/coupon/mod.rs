//! Coupon validation and normalization
//!
//! - `validator`: the per-candidate state machine over the remote endpoints
//! - `normalize`: raw food-detail payload to [`CouponRecord`]
//! - `record`: the persisted record types

mod normalize;
mod record;
mod validator;

pub use normalize::{normalize, normalize_name, normalize_with_exclusions};
pub use record::{CouponRecord, Flavor, FoodItem};
pub use validator::{
    CandidateOutcome, DiscardReason, ValidCandidate, Validator, VoucherLookup,
    INVALID_VOUCHER_MESSAGE, MEAL_PERIODS,
};

use thiserror::Error;

/// A food-detail payload that does not have the one supported shape
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("food detail not found in data")]
    MissingFoodDetail,

    #[error("food detail is not an array")]
    FoodDetailNotArray,

    #[error("unknown food detail format: expected 1 group, found {0}")]
    UnexpectedGroupCount(usize),

    #[error("food line {0} has no items")]
    EmptyFoodLine(usize),

    #[error("price of food line {0} overflows")]
    PriceOverflow(usize),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("malformed food detail: {0}")]
    Malformed(#[from] serde_json::Error),
}
