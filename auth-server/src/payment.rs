use crate::{auth::jwt::Session, errors::ApiError, server::AppState};
use axum::{routing::post, Json, Router};
use common::{
    address::decode_classic_address,
    models::{PaymentResponse, PaymentTransaction},
    requests::PaymentRequest,
};

/// 100 billion XRP expressed in drops.
pub const MAX_DROPS: u64 = 100_000_000_000 * 1_000_000;

pub fn router(app_state: &AppState) -> Router {
    Router::new()
        .route("/payment", post(payment))
        .with_state(app_state.clone())
}

pub fn parse_drops(amount: &str) -> Result<u64, ApiError> {
    let amount = amount.trim();
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::InvalidAmount(
            "expected a whole number of drops".to_string(),
        ));
    }
    let drops: u64 = amount
        .parse()
        .map_err(|_| ApiError::InvalidAmount("too large".to_string()))?;
    if drops == 0 {
        return Err(ApiError::InvalidAmount("must be positive".to_string()));
    }
    if drops > MAX_DROPS {
        return Err(ApiError::InvalidAmount("exceeds total supply".to_string()));
    }
    Ok(drops)
}

/// Builds the unsigned payment a wallet will sign and submit on behalf of
/// `account`.
pub fn prepare_payment(
    account: &str,
    request: &PaymentRequest,
) -> Result<PaymentTransaction, ApiError> {
    let destination = request.destination.trim();
    if destination.is_empty() {
        return Err(ApiError::EmptyField("Destination"));
    }
    decode_classic_address(destination)?;
    if destination == account {
        return Err(ApiError::SelfPayment);
    }
    let drops = parse_drops(&request.amount)?;
    Ok(PaymentTransaction::new(
        account.to_string(),
        destination.to_string(),
        drops.to_string(),
    ))
}

pub async fn payment(
    Session(claims): Session,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let txjson = prepare_payment(&claims.xrp_address, &request)?;
    tracing::info!(
        "Prepared payment of {} drops from {} to {}",
        txjson.amount,
        txjson.account,
        txjson.destination
    );
    Ok(Json(PaymentResponse { txjson }))
}
