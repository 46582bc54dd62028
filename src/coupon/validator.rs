//! Candidate validation against the voucher, meal-period and food-detail endpoints
//!
//! A candidate moves through at most three stages, cheapest first:
//!
//! ```text
//! VoucherLookup ──invalid / no product──▶ Discarded
//!       │
//!       ▼
//! PeriodProbe (periods 1..=4) ──none accepted──▶ Discarded
//!       │
//!       ▼
//! DetailFetch ──▶ Valid(detail payload)
//! ```
//!
//! Almost every probed code stops at the first stage.

use crate::api::{endpoints, ApiClient};
use crate::clock;
use crate::KcouperError;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::fmt;
use std::ops::RangeInclusive;

/// Message the voucher endpoint answers with for unknown codes
pub const INVALID_VOUCHER_MESSAGE: &str = "無效的票劵";

/// Meal periods probed, in order
pub const MEAL_PERIODS: RangeInclusive<u8> = 1..=4;

/// Meal period sent with the voucher lookup
const LOOKUP_MEAL_PERIOD: &str = "3";

/// Delivery order type used for every query
const ORDER_TYPE: &str = "2";

/// Outcome of the voucher lookup stage
#[derive(Debug, Clone, PartialEq)]
pub enum VoucherLookup {
    /// The API reported the code as an invalid voucher
    Invalid,

    /// Any other non-"OK" answer
    Rejected { message: String },

    /// The voucher exists; the product code may be missing from the payload
    Found {
        product_code: Option<String>,
        data: Value,
    },
}

/// Why a candidate was dropped without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    InvalidVoucher,
    MissingProductCode,
    NoMealPeriod,
}

impl DiscardReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidVoucher => "invalid_voucher",
            Self::MissingProductCode => "missing_product_code",
            Self::NoMealPeriod => "no_meal_period",
        }
    }
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate that passed every stage
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCandidate {
    pub coupon_code: u32,
    pub product_code: String,
    pub meal_period: u8,
    /// `Data` of the food-detail response, input of the normalizer
    pub detail: Value,
}

/// Result of validating one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Valid(ValidCandidate),
    Discarded(DiscardReason),
}

impl CandidateOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Drives candidates through the validation stages for one shop and day
pub struct Validator<'a> {
    client: &'a ApiClient,
    shop_code: &'a str,
    order_date: String,
}

impl<'a> Validator<'a> {
    /// Creates a validator issuing queries for `shop_code` on `today`
    pub fn new(client: &'a ApiClient, shop_code: &'a str, today: NaiveDate) -> Self {
        Self {
            client,
            shop_code,
            order_date: clock::order_date(today),
        }
    }

    /// Runs the full state machine for `code`
    ///
    /// # Errors
    ///
    /// * `KcouperError::Validation` - the voucher lookup answered with an
    ///   unexpected message
    /// * `KcouperError::DetailFetch` - the detail endpoint rejected the pairing
    /// * `KcouperError::Api` - transport failure in any stage
    pub async fn validate(&self, code: u32) -> Result<CandidateOutcome, KcouperError> {
        let product_code = match self.lookup_voucher(code).await? {
            VoucherLookup::Invalid => {
                tracing::debug!("coupon code({}) is invalid", code);
                return Ok(CandidateOutcome::Discarded(DiscardReason::InvalidVoucher));
            }
            VoucherLookup::Rejected { message } => {
                return Err(KcouperError::Validation { code, message });
            }
            VoucherLookup::Found {
                product_code: None,
                data,
            } => {
                tracing::error!(
                    "get product code error: coupon code: {}, json: {}",
                    code,
                    data
                );
                return Ok(CandidateOutcome::Discarded(
                    DiscardReason::MissingProductCode,
                ));
            }
            VoucherLookup::Found {
                product_code: Some(product_code),
                ..
            } => product_code,
        };

        let Some(meal_period) = self.probe_meal_period(code).await? else {
            tracing::debug!("coupon code({}) is invalid in all periods", code);
            return Ok(CandidateOutcome::Discarded(DiscardReason::NoMealPeriod));
        };

        let detail = self.fetch_detail(code, &product_code, meal_period).await?;

        Ok(CandidateOutcome::Valid(ValidCandidate {
            coupon_code: code,
            product_code,
            meal_period,
            detail,
        }))
    }

    /// Stage 1: asks the voucher endpoint whether `code` exists
    pub async fn lookup_voucher(&self, code: u32) -> Result<VoucherLookup, KcouperError> {
        let resp = self
            .client
            .call(
                "get voucher info",
                endpoints::GET_EVOUCHER,
                &json!({
                    "voucherNo": code,
                    "phone": "",
                    "memberId": "",
                    "orderType": ORDER_TYPE,
                    "mealPeriod": LOOKUP_MEAL_PERIOD,
                    "shopCode": self.shop_code,
                }),
            )
            .await?;

        if resp.message() == INVALID_VOUCHER_MESSAGE {
            return Ok(VoucherLookup::Invalid);
        }
        if !resp.is_ok() {
            return Ok(VoucherLookup::Rejected {
                message: resp.describe(),
            });
        }

        let product_code = resp
            .data
            .get("productCode")
            .and_then(Value::as_str)
            .map(String::from);
        Ok(VoucherLookup::Found {
            product_code,
            data: resp.data,
        })
    }

    /// Stage 2: finds the first meal period accepting the coupon
    ///
    /// Stops at the first acceptance; `None` when all periods refuse.
    pub async fn probe_meal_period(&self, code: u32) -> Result<Option<u8>, KcouperError> {
        for period in MEAL_PERIODS {
            let resp = self
                .client
                .call(
                    "check voucher valid",
                    endpoints::CHECK_COUPON_PRODUCT,
                    &json!({
                        "orderDate": self.order_date,
                        "orderType": ORDER_TYPE,
                        "mealPeriod": period.to_string(),
                        "shopCode": self.shop_code,
                        "couponCode": code,
                        "memberId": "",
                    }),
                )
                .await?;
            if resp.is_ok() {
                tracing::debug!("coupon code({}) accepted in meal period {}", code, period);
                return Ok(Some(period));
            }
        }
        Ok(None)
    }

    /// Stage 3: fetches the food-detail payload for the product
    pub async fn fetch_detail(
        &self,
        code: u32,
        product_code: &str,
        meal_period: u8,
    ) -> Result<Value, KcouperError> {
        let resp = self
            .client
            .call(
                "get voucher food",
                endpoints::GET_FOOD_DETAIL,
                &json!({
                    "shopcode": self.shop_code,
                    "fcode": product_code,
                    "menuid": "",
                    "mealperiod": meal_period.to_string(),
                    "ordertype": ORDER_TYPE,
                    "orderdate": self.order_date,
                }),
            )
            .await?;

        if !resp.is_ok() {
            tracing::error!("get voucher food response error, json: {}", resp.describe());
            return Err(KcouperError::DetailFetch {
                code,
                message: resp.describe(),
            });
        }
        Ok(resp.data)
    }
}
