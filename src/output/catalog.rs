//! The persisted coupon catalog

use crate::clock;
use crate::coupon::CouponRecord;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Price-sorted collection of validated coupons
///
/// Built only through [`Catalog::from_records`], which derives `coupon_list`,
/// `count` and `last_update` from the record map so the views never drift
/// from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    coupon_by_code: BTreeMap<u32, CouponRecord>,
    coupon_list: Vec<CouponRecord>,
    count: usize,
    last_update: String,
}

impl Catalog {
    /// Builds a catalog stamped with `updated_at`
    ///
    /// Coupons with equal prices keep ascending code order.
    pub fn from_records(
        coupon_by_code: BTreeMap<u32, CouponRecord>,
        updated_at: DateTime<FixedOffset>,
    ) -> Self {
        let mut coupon_list: Vec<CouponRecord> = coupon_by_code.values().cloned().collect();
        coupon_list.sort_by_key(|record| record.price);

        Self {
            count: coupon_list.len(),
            coupon_by_code,
            coupon_list,
            last_update: clock::timestamp(updated_at),
        }
    }

    pub fn coupon_by_code(&self) -> &BTreeMap<u32, CouponRecord> {
        &self.coupon_by_code
    }

    pub fn coupon_list(&self) -> &[CouponRecord] {
        &self.coupon_list
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn last_update(&self) -> &str {
        &self.last_update
    }

    pub fn get(&self, code: u32) -> Option<&CouponRecord> {
        self.coupon_by_code.get(&code)
    }

    pub fn is_empty(&self) -> bool {
        self.coupon_by_code.is_empty()
    }

    /// Gives up the derived views and returns the record map
    pub fn into_records(self) -> BTreeMap<u32, CouponRecord> {
        self.coupon_by_code
    }
}
