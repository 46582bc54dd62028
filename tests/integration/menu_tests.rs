//! Integration tests for the single-item menu query

mod common;

use common::*;
use kcouper::api::endpoints;
use kcouper::menu::{query_single_items, write_single_items};
use kcouper::KcouperError;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer};

async fn mount_menu(server: &MockServer, menus: Value) {
    Mock::given(method("POST"))
        .and(path(endpoint_path(endpoints::GET_MENU)))
        .respond_with(ok(json!({ "Menu": menus })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_foods(server: &MockServer, menu_id: i64, foods: Value, times: u64) {
    Mock::given(method("POST"))
        .and(path(endpoint_path(endpoints::GET_FOOD)))
        .and(body_partial_json(json!({ "menuid": menu_id })))
        .respond_with(ok(json!({ "Foods": foods })))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_items_from_matching_menus() {
    let server = MockServer::start().await;
    mount_menu(
        &server,
        json!([
            {"Title": "漢堡", "MenuID": 11},
            {"Title": "超值套餐", "MenuID": 12},
            {"Title": "蛋撻", "MenuID": 13},
        ]),
    )
    .await;
    mount_foods(
        &server,
        11,
        json!([
            {"Title": "漢堡", "Details": [
                {"Name": "咔啦雞腿堡", "Fcode": "TA0101", "Upa_Group": 79, "Nutrition": "熱量 520"}
            ]},
            {"Title": "漢堡套餐", "Details": [
                {"Name": "咔啦雞腿堡套餐", "Fcode": "TA0102", "Upa_Group": 159}
            ]},
        ]),
        1,
    )
    .await;
    mount_foods(&server, 12, json!([]), 0).await;
    mount_foods(
        &server,
        13,
        json!([
            {"Title": "蛋撻", "Details": [
                {"Name": " 原味蛋撻 ", "Fcode": "TA0201", "Upa_Group": "1,038"},
                {"Name": "季節蛋撻", "Fcode": "TA0202", "Upa_Group": "時價"}
            ]},
        ]),
        1,
    )
    .await;

    let client = client_for(&server);
    let items = query_single_items(&client).await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items["咔啦雞腿堡"].price, 79);
    assert_eq!(items["咔啦雞腿堡"].code, "TA0101");
    assert_eq!(items["咔啦雞腿堡"].nutrition, "熱量 520");
    assert_eq!(items["原味蛋撻"].price, 1038);
    assert!(!items.contains_key("咔啦雞腿堡套餐"));
    // unreadable price is skipped, not fatal
    assert!(!items.contains_key("季節蛋撻"));

    let dir = TempDir::new().unwrap();
    let paths = write_single_items(&items, dir.path()).unwrap();
    let script = std::fs::read_to_string(&paths.script).unwrap();
    assert!(script.starts_with("const SINGLE_DICT="));
    let json: Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
    assert_eq!(json["原味蛋撻"]["code"], "TA0201");
}

#[tokio::test]
async fn test_no_matching_menu() {
    let server = MockServer::start().await;
    mount_menu(&server, json!([{"Title": "超值套餐", "MenuID": 12}])).await;

    let client = client_for(&server);
    let err = query_single_items(&client).await.unwrap_err();

    match err {
        KcouperError::Menu(message) => assert_eq!(message, "dinner menu not found"),
        other => panic!("expected Menu error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_only_combos_found() {
    let server = MockServer::start().await;
    mount_menu(&server, json!([{"Title": "早餐", "MenuID": 21}])).await;
    mount_foods(
        &server,
        21,
        json!([{"Title": "早餐套餐", "Details": [
            {"Name": "早安套餐", "Fcode": "TA0301", "Upa_Group": 99}
        ]}]),
        1,
    )
    .await;

    let client = client_for(&server);
    let err = query_single_items(&client).await.unwrap_err();
    assert!(matches!(err, KcouperError::Menu(ref m) if m == "single produce not found"));
}

#[tokio::test]
async fn test_menu_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoint_path(endpoints::GET_MENU)))
        .respond_with(rejected("查無菜單"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = query_single_items(&client).await.unwrap_err();
    assert!(matches!(err, KcouperError::Menu(_)));
    assert!(!err.is_candidate_local());
}
