//! Conversion of raw food-detail payloads into [`CouponRecord`]s

use crate::coupon::record::{CouponRecord, Flavor, FoodItem, RawFoodDetail};
use crate::coupon::ShapeError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

/// Timestamp format of `StartDate`/`EndDate` in detail payloads
const SOURCE_DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Normalizes a food-detail `Data` payload into a coupon record
///
/// See [`normalize_with_exclusions`]; no flavor names are excluded.
pub fn normalize(data: &Value, coupon_code: u32) -> Result<CouponRecord, ShapeError> {
    normalize_with_exclusions(data, coupon_code, &[])
}

/// Normalizes a food-detail `Data` payload, dropping excluded flavor names
///
/// The payload must carry exactly one `FoodDetail` group. The record price is
/// the group's `Original_Price` plus, for each food line, the default item's
/// add-on price times the line's minimum count. Flavor alternatives are
/// recorded with their own add-on price but never added to the total.
///
/// `excluded` filters flavor alternatives by normalized name; default items
/// and the price are unaffected.
pub fn normalize_with_exclusions(
    data: &Value,
    coupon_code: u32,
    excluded: &[String],
) -> Result<CouponRecord, ShapeError> {
    let groups = match data.get("FoodDetail") {
        None | Some(Value::Null) => return Err(ShapeError::MissingFoodDetail),
        Some(groups) => groups.as_array().ok_or(ShapeError::FoodDetailNotArray)?,
    };
    if groups.len() != 1 {
        tracing::error!("unknown food detail format, detail={}", serde_json::Value::Array(groups.clone()));
        return Err(ShapeError::UnexpectedGroupCount(groups.len()));
    }
    let detail = RawFoodDetail::deserialize(&groups[0])?;

    let mut price = detail.original_price;
    let mut items = Vec::with_capacity(detail.lines.len());
    for (index, line) in detail.lines.iter().enumerate() {
        let (primary, alternatives) = line
            .items
            .split_first()
            .ok_or(ShapeError::EmptyFoodLine(index))?;

        price = primary
            .add_price
            .checked_mul(line.min_count)
            .and_then(|line_price| price.checked_add(line_price))
            .ok_or(ShapeError::PriceOverflow(index))?;

        let flavors = alternatives
            .iter()
            .map(|flavor| Flavor {
                name: normalize_name(&flavor.name),
                addition_price: flavor.add_price,
            })
            .filter(|flavor| !excluded.contains(&flavor.name))
            .collect();

        items.push(FoodItem {
            name: normalize_name(&primary.name),
            count: line.min_count,
            addition_price: primary.add_price,
            flavors,
        });
    }

    Ok(CouponRecord {
        name: detail.name,
        product_code: detail.product_code,
        coupon_code,
        price,
        items,
        start_date: parse_source_date(&detail.start_date)?,
        end_date: parse_source_date(&detail.end_date)?,
    })
}

/// Strips parentheses that wrap the whole name, then trims
///
/// `"(原味)"` becomes `"原味"`. Names that are not fully wrapped, such as
/// `"(辣)雞腿堡"` or `"(a)(b)"`, are returned unchanged. Unwrapping repeats
/// until the name is no longer wrapped, so the function is idempotent.
pub fn normalize_name(name: &str) -> String {
    let mut current = name;
    while let Some(inner) = unwrap_parentheses(current) {
        current = inner.trim();
    }
    current.to_string()
}

/// Returns the text inside a leading `(` whose matching `)` ends the string
fn unwrap_parentheses(name: &str) -> Option<&str> {
    let inner = name.strip_prefix('(')?.strip_suffix(')')?;
    let mut depth = 0i32;
    for ch in inner.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    (depth == 0).then_some(inner)
}

/// `"2025/01/12 00:00:00"` -> 2025-01-12
fn parse_source_date(raw: &str) -> Result<NaiveDate, ShapeError> {
    NaiveDateTime::parse_from_str(raw.trim(), SOURCE_DATETIME_FORMAT)
        .map(|dt| dt.date())
        .map_err(|_| ShapeError::InvalidDate(raw.to_string()))
}
