use crate::{errors::ApiError, server::AppState};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use common::PublicKey;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

pub const NONCE_AUDIENCE: &str = "xrpl-auth:nonce";
pub const SESSION_AUDIENCE: &str = "xrpl-auth:session";

/// Clock skew tolerance in seconds.
pub const CLOCK_SKEW_LEEWAY: u64 = 60;

#[derive(Clone)]
pub struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Claims of the token a wallet is asked to sign.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonceClaims {
    #[serde_as(as = "DisplayFromStr")]
    pub public_key: PublicKey,
    pub address: String,
    pub nonce: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
}

/// Claims of a session token. Only the verified address is carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "xrpAddress")]
    pub xrp_address: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
}

pub fn encode_jwt<T: Serialize>(claims: &T, keys: &Keys) -> Result<String, ApiError> {
    Ok(encode(&Header::new(Algorithm::HS256), claims, &keys.encoding)?)
}

/// Decodes `token`, checking its signature, expiry and audience.
pub fn decode_jwt<T: DeserializeOwned>(
    token: &str,
    audience: &str,
    keys: &Keys,
) -> Result<T, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[audience]);
    validation.leeway = CLOCK_SKEW_LEEWAY;
    decode::<T>(token, &keys.decoding, &validation).map(|data| data.claims)
}

/// Extractor for routes that need an authenticated session. The token is
/// read from the bearer header first, then from the session cookie.
pub struct Session(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
            Ok(TypedHeader(Authorization(bearer))) => bearer.token().to_string(),
            Err(_) => CookieJar::from_headers(&parts.headers)
                .get(&state.cookie.name)
                .map(|cookie| cookie.value().to_string())
                .ok_or(ApiError::Unauthorized)?,
        };
        let claims = decode_jwt::<SessionClaims>(&token, SESSION_AUDIENCE, &state.keys)
            .map_err(|e| {
                tracing::debug!("Rejected session token: {}", e);
                ApiError::MalformedSession
            })?;
        Ok(Session(claims))
    }
}
