//! Integration tests for the lookup-only range checker

mod common;

use common::*;
use kcouper::clock;
use kcouper::config::{CodeRange, PacingConfig};
use kcouper::harvest::Checker;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_detection_stops_its_range_only() {
    let server = MockServer::start().await;
    mount_voucher(&server, 30000, invalid_voucher(), 1).await;
    mount_voucher(&server, 30001, voucher_found(30001, "TA3001"), 1).await;
    // rest of the first range is skipped
    mount_voucher(&server, 30002, invalid_voucher(), 0).await;
    // second range is still scanned in full
    mount_voucher(&server, 40000, invalid_voucher(), 1).await;
    mount_voucher(&server, 40001, invalid_voucher(), 1).await;

    // the checker never validates further
    Mock::given(method("POST"))
        .and(path(endpoint_path(kcouper::api::endpoints::CHECK_COUPON_PRODUCT)))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let checker = Checker::new(&client, SHOP_CODE, clock::today(), PacingConfig::none());
    let report = checker
        .run(&[CodeRange::new(30000, 30003), CodeRange::new(40000, 40002)])
        .await
        .unwrap();

    assert!(report.has_detections());
    assert_eq!(report.detections.len(), 1);
    assert_eq!(report.detections[0].code, 30001);
    assert_eq!(report.detections[0].range, CodeRange::new(30000, 30003));
    assert_eq!(report.detections[0].data["productCode"], "TA3001");
    assert_eq!(report.probed, 4);
}

#[tokio::test]
async fn test_no_detection() {
    let server = MockServer::start().await;
    mount_voucher(&server, 50, invalid_voucher(), 1).await;
    mount_voucher(&server, 51, rejected("系統忙碌中"), 1).await;
    mount_voucher(&server, 52, invalid_voucher(), 1).await;

    let client = client_for(&server);
    let checker = Checker::new(&client, SHOP_CODE, clock::today(), PacingConfig::none());
    let report = checker.run(&[CodeRange::new(50, 53)]).await.unwrap();

    assert!(!report.has_detections());
    assert_eq!(report.probed, 3);
}

#[tokio::test]
async fn test_lookup_failure_is_skipped() {
    let server = MockServer::start().await;
    mount_voucher(&server, 60, ResponseTemplate::new(503), 1).await;
    mount_voucher(&server, 61, voucher_found(61, "TA0061"), 1).await;

    let client = client_for(&server);
    let checker = Checker::new(&client, SHOP_CODE, clock::today(), PacingConfig::none());
    let report = checker.run(&[CodeRange::new(60, 62)]).await.unwrap();

    assert_eq!(report.detections.len(), 1);
    assert_eq!(report.detections[0].code, 61);
}

#[tokio::test]
async fn test_undecodable_lookup_aborts_check() {
    let server = MockServer::start().await;
    mount_voucher(
        &server,
        70,
        ResponseTemplate::new(200).set_body_string("not json"),
        1,
    )
    .await;
    mount_voucher(&server, 71, invalid_voucher(), 0).await;

    let client = client_for(&server);
    let checker = Checker::new(&client, SHOP_CODE, clock::today(), PacingConfig::none());
    let result = checker.run(&[CodeRange::new(70, 72)]).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_empty_ranges() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let checker = Checker::new(&client, SHOP_CODE, clock::today(), PacingConfig::none());

    let report = checker.run(&[]).await.unwrap();
    assert!(!report.has_detections());
    assert_eq!(report.probed, 0);
}
