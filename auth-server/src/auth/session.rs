use super::jwt::{decode_jwt, encode_jwt, Keys, SessionClaims, SESSION_AUDIENCE};
use crate::{
    errors::ApiError,
    server::{AppState, CookieConfig},
};
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::CookieJar;
use common::{models::ResolvedSession, requests::ResolveSessionRequest};

/// Mints a session token binding `address`. Callers must only reach this
/// after a successful signature verification.
pub fn mint_session(
    keys: &Keys,
    address: &str,
    ttl_seconds: i64,
) -> Result<(String, SessionClaims), ApiError> {
    let now = chrono::Utc::now();
    let expiration = now + chrono::Duration::seconds(ttl_seconds);
    let claims = SessionClaims {
        xrp_address: address.to_string(),
        aud: SESSION_AUDIENCE.to_string(),
        iat: now.timestamp().max(0) as u64,
        exp: expiration.timestamp().max(0) as u64,
    };
    let token = encode_jwt(&claims, keys)?;
    Ok((token, claims))
}

/// Returns the address bound by `token`, or `None` when there is no usable
/// session. Never fails.
pub fn resolve_session(keys: &Keys, token: Option<&str>) -> Option<String> {
    let token = token.map(str::trim).filter(|token| !token.is_empty())?;
    match decode_jwt::<SessionClaims>(token, SESSION_AUDIENCE, keys) {
        Ok(claims) => Some(claims.xrp_address),
        Err(e) => {
            tracing::debug!("No session: {}", e);
            None
        }
    }
}

pub fn session_cookie(config: &CookieConfig, token: &str, max_age: usize) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        config.name, token, max_age
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub async fn resolve(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Option<Json<ResolveSessionRequest>>,
) -> Json<ResolvedSession> {
    let body_token = payload
        .and_then(|Json(request)| request.token)
        .filter(|token| !token.trim().is_empty());
    let token = body_token.or_else(|| {
        jar.get(&state.cookie.name)
            .map(|cookie| cookie.value().to_string())
    });
    let xrp_address = resolve_session(&state.keys, token.as_deref());
    if xrp_address.is_none() {
        tracing::info!("No address found for session");
    }
    Json(ResolvedSession { xrp_address })
}

pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let cookie_value = session_cookie(&state.cookie, "", 0);
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie_value).map_err(|_| ApiError::InvalidCookie)?,
    );
    Ok((StatusCode::NO_CONTENT, headers))
}
