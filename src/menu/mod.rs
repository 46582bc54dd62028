//! Single-item (à la carte) menu query
//!
//! Looks up the regular menus, collects every non-combo food from them and
//! writes a name-keyed price list next to the coupon catalog.

use crate::api::{endpoints, ApiClient};
use crate::output::{write_artifacts, ArtifactPaths, OutputResult};
use crate::KcouperError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Menu titles whose foods are sold individually
pub const SINGLE_MENU_TITLES: [&str; 5] = ["炸雞/紙包雞", "漢堡", "蛋撻", "點心/飲料", "早餐"];

/// Food titles containing this marker are combos and skipped
const COMBO_MARKER: &str = "套餐";

pub const SINGLE_STEM: &str = "single";
pub const SINGLE_CONSTANT: &str = "SINGLE_DICT";

/// One individually sold item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleItem {
    pub code: String,
    pub name: String,
    pub price: i64,
    pub nutrition: String,
}

#[derive(Debug, Deserialize)]
struct MenuData {
    #[serde(rename = "Menu", default)]
    menu: Vec<MenuEntry>,
}

#[derive(Debug, Deserialize)]
struct MenuEntry {
    #[serde(rename = "Title", default)]
    title: String,

    #[serde(rename = "MenuID", default)]
    menu_id: Value,
}

#[derive(Debug, Deserialize)]
struct FoodData {
    #[serde(rename = "Foods", default)]
    foods: Vec<FoodGroup>,
}

#[derive(Debug, Deserialize)]
struct FoodGroup {
    #[serde(rename = "Title", default)]
    title: String,

    #[serde(rename = "Details", default)]
    details: Vec<RawSingleItem>,
}

#[derive(Debug, Deserialize)]
struct RawSingleItem {
    #[serde(rename = "Name")]
    name: String,

    #[serde(rename = "Fcode")]
    code: String,

    #[serde(rename = "Upa_Group")]
    price: PriceRepr,

    #[serde(rename = "Nutrition", default)]
    nutrition: String,
}

/// Prices arrive either as numbers or as text like `"1,099"`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Number(i64),
    Text(String),
}

impl PriceRepr {
    fn to_price(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().replace(',', "").parse().ok(),
        }
    }
}

/// Fetches every single item from the individually sold menus
///
/// # Errors
///
/// * `KcouperError::Menu` - a menu call was rejected, no matching menu or no
///   item was found, or a payload did not have the expected shape
pub async fn query_single_items(
    client: &ApiClient,
) -> Result<BTreeMap<String, SingleItem>, KcouperError> {
    let menu_ids = fetch_menu_ids(client).await?;
    tracing::info!("Found {} single-item menu(s)", menu_ids.len());

    let mut details = Vec::new();
    for menu_id in menu_ids {
        details.extend(fetch_menu_details(client, &menu_id).await?);
    }
    if details.is_empty() {
        return Err(KcouperError::Menu("single produce not found".to_string()));
    }
    Ok(convert_single_items(details))
}

/// Writes `single.json` and `single.js`
pub fn write_single_items(
    items: &BTreeMap<String, SingleItem>,
    dir: &Path,
) -> OutputResult<ArtifactPaths> {
    write_artifacts(items, dir, SINGLE_STEM, SINGLE_CONSTANT)
}

async fn fetch_menu_ids(client: &ApiClient) -> Result<Vec<Value>, KcouperError> {
    let label = "get single menu info";
    let resp = client
        .call(
            label,
            endpoints::GET_MENU,
            &json!({
                "ismember": "0",
                "mealperiod": "0",
                "orderdate": "",
                "ordertype": "0",
                "parentid": "0",
                "shopcode": "",
            }),
        )
        .await?;
    if !resp.is_ok() {
        return Err(menu_error(label, &resp.describe()));
    }

    let data: MenuData =
        serde_json::from_value(resp.data).map_err(|e| menu_error(label, &e.to_string()))?;
    let ids: Vec<Value> = data
        .menu
        .into_iter()
        .filter(|entry| SINGLE_MENU_TITLES.contains(&entry.title.as_str()))
        .map(|entry| entry.menu_id)
        .filter(|id| !id.is_null())
        .collect();

    if ids.is_empty() {
        return Err(KcouperError::Menu("dinner menu not found".to_string()));
    }
    Ok(ids)
}

async fn fetch_menu_details(
    client: &ApiClient,
    menu_id: &Value,
) -> Result<Vec<RawSingleItem>, KcouperError> {
    let label = "get food info";
    let resp = client
        .call(
            label,
            endpoints::GET_FOOD,
            &json!({
                "IsPKAPP": "0",
                "ismember": "0",
                "mealperiod": "0",
                "menuid": menu_id,
                "orderdate": "",
                "ordertype": "0",
                "parentid": "0",
                "shopcode": "",
            }),
        )
        .await?;
    if !resp.is_ok() {
        return Err(menu_error(label, &resp.describe()));
    }

    let data: FoodData =
        serde_json::from_value(resp.data).map_err(|e| menu_error(label, &e.to_string()))?;
    Ok(data
        .foods
        .into_iter()
        .filter(|food| !food.title.contains(COMBO_MARKER))
        .flat_map(|food| food.details)
        .collect())
}

/// Keys items by trimmed name; a later item with the same name wins
///
/// Items whose price cannot be read are logged and left out.
fn convert_single_items(details: Vec<RawSingleItem>) -> BTreeMap<String, SingleItem> {
    let mut items = BTreeMap::new();
    for raw in details {
        let name = raw.name.trim().to_string();
        let Some(price) = raw.price.to_price() else {
            tracing::warn!("skipping {} ({}): invalid price {:?}", name, raw.code, raw.price);
            continue;
        };
        items.insert(
            name.clone(),
            SingleItem {
                code: raw.code,
                name,
                price,
                nutrition: raw.nutrition.trim().to_string(),
            },
        );
    }
    items
}

fn menu_error(label: &str, detail: &str) -> KcouperError {
    tracing::error!("{} response error, {}", label, detail);
    KcouperError::Menu(format!("{} response error, {}", label, detail))
}
