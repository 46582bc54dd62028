use crate::api::{endpoints, ApiClient};
use crate::clock;
use crate::KcouperError;
use chrono::NaiveDate;
use serde_json::json;

/// Performs the shop/time handshake required before any voucher query
///
/// The API keeps the selected shop and order window in server-side session
/// state bound to the client's cookies; neither response is otherwise used.
///
/// # Errors
///
/// * `KcouperError::Bootstrap` - either call answered with a non-"OK" message
///   or a false success flag
/// * `KcouperError::Api` - the transport failed
pub async fn bootstrap(
    client: &ApiClient,
    shop_code: &str,
    today: NaiveDate,
) -> Result<(), KcouperError> {
    let stage = "get shop info";
    let resp = client
        .call(
            stage,
            endpoints::QUERY_DELIVERY_SHOPS,
            &json!({
                "shopCode": shop_code,
                "orderType": "2",
                "platform": "1",
            }),
        )
        .await?;
    if !resp.is_ok() {
        tracing::error!("{} response error, json: {}", stage, resp.describe());
        return Err(KcouperError::Bootstrap {
            stage: stage.to_string(),
            message: resp.message().to_string(),
        });
    }

    let stage = "get time info";
    let resp = client
        .call(
            stage,
            endpoints::QUERY_DELIVERY_TIME,
            &json!({
                "shopCode": shop_code,
                "orderType": "2",
                "orderDate": clock::order_date(today),
                "addQt": "0",
                "sdeQt": "0",
            }),
        )
        .await?;
    if !resp.is_ok() {
        tracing::error!("{} response error, json: {}", stage, resp.describe());
        return Err(KcouperError::Bootstrap {
            stage: stage.to_string(),
            message: resp.message().to_string(),
        });
    }

    tracing::info!("Session bootstrapped for shop {}", shop_code);
    Ok(())
}
