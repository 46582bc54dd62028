//! Canonical coupon records and the raw detail payload they are built from

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One validated coupon as persisted in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponRecord {
    pub name: String,
    pub product_code: String,
    pub coupon_code: u32,
    /// Base price plus the add-on price of every default item
    pub price: i64,
    pub items: Vec<FoodItem>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CouponRecord {
    /// True when the coupon's last valid day is before `today`
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }
}

/// A default item of a coupon with its swappable flavors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub count: i64,
    pub addition_price: i64,
    pub flavors: Vec<Flavor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    pub name: String,
    pub addition_price: i64,
}

/// One entry of the `FoodDetail` array of a food-detail response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawFoodDetail {
    #[serde(rename = "Original_Price")]
    pub original_price: i64,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Fcode")]
    pub product_code: String,

    #[serde(rename = "StartDate")]
    pub start_date: String,

    #[serde(rename = "EndDate")]
    pub end_date: String,

    #[serde(rename = "Details", default)]
    pub lines: Vec<RawFoodLine>,
}

/// A food line: how many of the item are included and which items qualify
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawFoodLine {
    #[serde(rename = "MinCount")]
    pub min_count: i64,

    /// First entry is the default item, the rest are flavor alternatives
    #[serde(rename = "MList", default)]
    pub items: Vec<RawListItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawListItem {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "AddPrice", default)]
    pub add_price: i64,
}
