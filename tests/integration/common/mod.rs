//! Mock ordering API shared by the integration tests

#![allow(dead_code)]

use kcouper::api::{endpoints, ApiClient};
use kcouper::config::{ApiConfig, RetryConfig};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SHOP_CODE: &str = "TWI104";

/// Client for `server` with the given retry policy
pub fn client_with_retry(server: &MockServer, retry: RetryConfig) -> ApiClient {
    let config = ApiConfig {
        base_url: server.uri(),
        ..ApiConfig::default()
    };
    ApiClient::new(&config, retry).expect("Failed to build client")
}

/// Client for `server` that retries 502 ten times without sleeping
pub fn client_for(server: &MockServer) -> ApiClient {
    client_with_retry(
        server,
        RetryConfig {
            max_retries: 10,
            delay_ms: 0,
        },
    )
}

pub fn endpoint_path(endpoint: &str) -> String {
    format!("/{}", endpoint)
}

/// HTTP 200 with an OK envelope around `data`
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "Success": true,
        "Message": "OK",
        "Data": data,
    }))
}

/// HTTP 200 with a rejecting envelope
pub fn rejected(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "Success": false,
        "Message": message,
        "Data": null,
    }))
}

pub fn invalid_voucher() -> ResponseTemplate {
    rejected(kcouper::coupon::INVALID_VOUCHER_MESSAGE)
}

pub fn voucher_found(code: u32, product_code: &str) -> ResponseTemplate {
    ok(json!({
        "itemType": "I",
        "productCode": product_code,
        "voucherType": "C",
        "voucherCode": code.to_string(),
        "productName": format!("{}-test", code),
    }))
}

/// Mounts both bootstrap endpoints answering OK
pub async fn mount_bootstrap(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(endpoint_path(endpoints::QUERY_DELIVERY_SHOPS)))
        .respond_with(ok(json!({"ShopCode": SHOP_CODE})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(endpoint_path(endpoints::QUERY_DELIVERY_TIME)))
        .respond_with(ok(json!({"sHour": "8", "eHour": "22"})))
        .mount(server)
        .await;
}

/// Voucher lookup for `code`, expected `times` times
pub async fn mount_voucher(server: &MockServer, code: u32, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path(endpoint_path(endpoints::GET_EVOUCHER)))
        .and(body_partial_json(json!({"voucherNo": code})))
        .respond_with(response)
        .expect(times)
        .named(format!("voucher {}", code))
        .mount(server)
        .await;
}

/// Meal-period check for `code` in `period`, expected `times` times
pub async fn mount_period(
    server: &MockServer,
    code: u32,
    period: u8,
    response: ResponseTemplate,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(path(endpoint_path(endpoints::CHECK_COUPON_PRODUCT)))
        .and(body_partial_json(
            json!({"couponCode": code, "mealPeriod": period.to_string()}),
        ))
        .respond_with(response)
        .expect(times)
        .named(format!("period {} for {}", period, code))
        .mount(server)
        .await;
}

/// Food detail for `product_code` in `period`, expected `times` times
pub async fn mount_detail(
    server: &MockServer,
    product_code: &str,
    period: u8,
    response: ResponseTemplate,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(path(endpoint_path(endpoints::GET_FOOD_DETAIL)))
        .and(body_partial_json(
            json!({"fcode": product_code, "mealperiod": period.to_string()}),
        ))
        .respond_with(response)
        .expect(times)
        .named(format!("detail {}", product_code))
        .mount(server)
        .await;
}

/// A food-detail `Data` payload with one group
pub fn detail_data(product_code: &str, base_price: i64, end_date: &str, lines: Value) -> Value {
    json!({
        "FoodDetail": [{
            "Original_Price": base_price,
            "Name": format!("{} 優惠", product_code),
            "Fcode": product_code,
            "StartDate": "2025/01/01 00:00:00",
            "EndDate": format!("{} 23:59:59", end_date),
            "Details": lines,
        }]
    })
}

/// One line: `count` of a default item plus one flavor alternative
pub fn line(count: i64, primary_add: i64, flavor_add: i64) -> Value {
    json!({
        "MinCount": count,
        "MList": [
            {"Name": "咔啦脆雞", "AddPrice": primary_add},
            {"Name": "(青花椒香麻脆雞)", "AddPrice": flavor_add},
        ]
    })
}
