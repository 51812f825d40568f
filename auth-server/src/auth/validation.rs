use super::{
    jwt::{decode_jwt, Keys, NonceClaims, NONCE_AUDIENCE},
    nonce::check_address_binding,
    session::{mint_session, session_cookie},
};
use crate::{errors::ApiError, server::AppState};
use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::IntoResponse,
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use common::{models::JWTResponse, requests::ValidateSignatureRequest, signing_payload};

/// Checks a wallet signature over a previously issued nonce token.
///
/// The token must decode under the server secret; otherwise the caller is
/// `Unauthorized`. The wallet is expected to have signed the bytes denoted by
/// the hex encoding of the raw token string, under the public key embedded in
/// the token. On success the decoded claims are returned.
pub fn verify_signature(keys: &Keys, token: &str, signature: &str) -> Result<NonceClaims, ApiError> {
    let claims: NonceClaims = decode_jwt(token, NONCE_AUDIENCE, keys).map_err(|e| {
        tracing::debug!("Rejected nonce token: {}", e);
        ApiError::Unauthorized
    })?;
    check_address_binding(&claims.public_key, &claims.address)
        .map_err(|_| ApiError::Unauthorized)?;

    let payload = signing_payload(token);
    if !claims.public_key.verify_hex(&payload, signature) {
        return Err(ApiError::SignatureMismatch);
    }
    Ok(claims)
}

pub async fn validate_signature(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Query(params): Query<ValidateSignatureRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Validating signature");
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(ApiError::Unauthorized);
    };
    let claims = verify_signature(&state.keys, bearer.token(), &params.signature)?;
    tracing::info!("Signature is valid for {}", claims.address);

    if let Some(spent_nonces) = &state.spent_nonces {
        if !spent_nonces.consume(&claims.nonce, claims.exp).await {
            tracing::warn!("Nonce token replayed for {}", claims.address);
            return Err(ApiError::NonceReplayed);
        }
    }

    let (token, session) = mint_session(
        &state.keys,
        &claims.address,
        state.session_expiration_time as i64,
    )?;
    tracing::info!("Session token generated");

    let cookie_value = session_cookie(&state.cookie, &token, state.session_expiration_time);
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie_value).map_err(|_| ApiError::InvalidCookie)?,
    );
    Ok((
        headers,
        Json(JWTResponse {
            token,
            address: claims.address,
            expiration: session.exp,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{nonce::issue_nonce_token, session::resolve_session},
        server::tests::test_state,
    };
    use axum::http::StatusCode;
    use common::{KeyType, Keypair};

    fn bearer(token: &str) -> Option<TypedHeader<Authorization<Bearer>>> {
        Some(TypedHeader(Authorization::bearer(token).unwrap()))
    }

    fn signed_challenge(state: &AppState, signer: &Keypair, claimed: &Keypair) -> (String, String) {
        let (token, _) = issue_nonce_token(
            &state.keys,
            &claimed.public_key(),
            &claimed.address(),
            300,
        )
        .unwrap();
        let signature = signer.sign_hex(&signing_payload(&token)).unwrap();
        (token, signature)
    }

    #[test]
    fn test_verify_valid_signature_both_key_types() {
        let state = test_state();
        for key_type in [KeyType::Ed25519, KeyType::Secp256k1] {
            let keypair = Keypair::generate(key_type);
            let (token, signature) = signed_challenge(&state, &keypair, &keypair);
            let claims = verify_signature(&state.keys, &token, &signature).unwrap();
            assert_eq!(claims.address, keypair.address());
        }
    }

    #[test]
    fn test_altered_signature_is_declined() {
        let state = test_state();
        for key_type in [KeyType::Ed25519, KeyType::Secp256k1] {
            let keypair = Keypair::generate(key_type);
            let (token, signature) = signed_challenge(&state, &keypair, &keypair);
            let bytes = hex::decode(&signature).unwrap();
            for index in 0..bytes.len() {
                let mut altered = bytes.clone();
                altered[index] ^= 0x01;
                let result = verify_signature(&state.keys, &token, &hex::encode(&altered));
                assert!(
                    matches!(result, Err(ApiError::SignatureMismatch)),
                    "byte {index} of a {key_type} signature was accepted"
                );
            }
        }
    }

    #[test]
    fn test_forged_token_is_unauthorized() {
        let state = test_state();
        let keypair = Keypair::generate(KeyType::Ed25519);
        let other_keys = Keys::new(b"another secret");
        let (token, _) = issue_nonce_token(
            &other_keys,
            &keypair.public_key(),
            &keypair.address(),
            300,
        )
        .unwrap();
        let signature = keypair.sign_hex(&signing_payload(&token)).unwrap();
        let result = verify_signature(&state.keys, &token, &signature);
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let state = test_state();
        let keypair = Keypair::generate(KeyType::Ed25519);
        let (token, _) = issue_nonce_token(
            &state.keys,
            &keypair.public_key(),
            &keypair.address(),
            -600,
        )
        .unwrap();
        let signature = keypair.sign_hex(&signing_payload(&token)).unwrap();
        let result = verify_signature(&state.keys, &token, &signature);
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_session_token_is_not_a_nonce() {
        let state = test_state();
        let keypair = Keypair::generate(KeyType::Ed25519);
        let (session, _) = mint_session(&state.keys, &keypair.address(), 3600).unwrap();
        let signature = keypair.sign_hex(&signing_payload(&session)).unwrap();
        let result = verify_signature(&state.keys, &session, &signature);
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_valid_signature() {
        let state = test_state();
        let keypair = Keypair::generate(KeyType::Ed25519);
        let (token, signature) = signed_challenge(&state, &keypair, &keypair);

        let response = validate_signature(
            State(state.clone()),
            bearer(&token),
            Query(ValidateSignatureRequest { signature }),
        )
        .await
        .unwrap()
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("jwt="));
        assert!(cookie.contains("HttpOnly"));

        let session = cookie
            .trim_start_matches("jwt=")
            .split(';')
            .next()
            .unwrap();
        assert_eq!(
            resolve_session(&state.keys, Some(session)),
            Some(keypair.address())
        );
    }

    #[tokio::test]
    async fn test_invalid_signature() {
        let state = test_state();
        let claimed = Keypair::generate(KeyType::Secp256k1);
        let unrelated = Keypair::generate(KeyType::Secp256k1);
        let (token, signature) = signed_challenge(&state, &unrelated, &claimed);

        let result = validate_signature(
            State(state),
            bearer(&token),
            Query(ValidateSignatureRequest { signature }),
        )
        .await;
        match result {
            Err(error) => {
                assert!(matches!(error, ApiError::SignatureMismatch));
                assert_eq!(error.status(), StatusCode::BAD_REQUEST);
                assert_eq!(error.to_string(), "Signature not verified");
            }
            Ok(_) => panic!("Unexpected session for an unrelated key"),
        }
    }

    #[tokio::test]
    async fn test_missing_bearer() {
        let result = validate_signature(
            State(test_state()),
            None,
            Query(ValidateSignatureRequest {
                signature: "00".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_missing_signature() {
        let state = test_state();
        let keypair = Keypair::generate(KeyType::Ed25519);
        let (token, _) = signed_challenge(&state, &keypair, &keypair);
        let result = validate_signature(
            State(state),
            bearer(&token),
            Query(ValidateSignatureRequest {
                signature: String::new(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::SignatureMismatch)));
    }

    #[tokio::test]
    async fn test_replayed_nonce_token() {
        let state = test_state();
        let keypair = Keypair::generate(KeyType::Ed25519);
        let (token, signature) = signed_challenge(&state, &keypair, &keypair);

        let first = validate_signature(
            State(state.clone()),
            bearer(&token),
            Query(ValidateSignatureRequest {
                signature: signature.clone(),
            }),
        )
        .await;
        assert!(first.is_ok());

        let second = validate_signature(
            State(state),
            bearer(&token),
            Query(ValidateSignatureRequest { signature }),
        )
        .await;
        assert!(matches!(second, Err(ApiError::NonceReplayed)));
    }

    #[tokio::test]
    async fn test_replay_allowed_when_ledger_disabled() {
        let mut state = test_state();
        state.spent_nonces = None;
        let keypair = Keypair::generate(KeyType::Ed25519);
        let (token, signature) = signed_challenge(&state, &keypair, &keypair);

        for _ in 0..2 {
            let result = validate_signature(
                State(state.clone()),
                bearer(&token),
                Query(ValidateSignatureRequest {
                    signature: signature.clone(),
                }),
            )
            .await;
            assert!(result.is_ok());
        }
    }
}
