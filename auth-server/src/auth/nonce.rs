use super::jwt::{encode_jwt, Keys, NonceClaims, NONCE_AUDIENCE};
use crate::{errors::ApiError, server::AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use bytes::{Bytes, BytesMut};
use common::{
    address::decode_classic_address,
    models::GenerateNonceResponse,
    requests::GenerateNonceRequest,
    PublicKey,
};
use rand::RngCore;
use std::{io, ops::Deref, str::FromStr};

pub const NONCE_SIZE: usize = 32;

#[derive(Debug, Clone)]
pub struct Nonce(Bytes);

impl Nonce {
    pub fn new(size: usize) -> Self {
        let mut bytes = BytesMut::zeroed(size);
        rand::thread_rng().fill_bytes(bytes.as_mut());
        Self(bytes.into())
    }
}

impl FromStr for Nonce {
    type Err = io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            prefix_hex::decode::<Vec<u8>>(s)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?
                .into(),
        ))
    }
}

impl std::fmt::Display for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", prefix_hex::encode(self.0.to_vec()))
    }
}

impl Deref for Nonce {
    type Target = Bytes;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Checks that `address` is a well formed classic address owned by
/// `public_key`.
pub fn check_address_binding(public_key: &PublicKey, address: &str) -> Result<(), ApiError> {
    decode_classic_address(address)?;
    if public_key.address() != address {
        return Err(ApiError::AddressMismatch);
    }
    Ok(())
}

/// Signs a fresh nonce token for `(public_key, address)`, valid for
/// `ttl_seconds`.
pub fn issue_nonce_token(
    keys: &Keys,
    public_key: &PublicKey,
    address: &str,
    ttl_seconds: i64,
) -> Result<(String, NonceClaims), ApiError> {
    let now = chrono::Utc::now();
    let expiration = now + chrono::Duration::seconds(ttl_seconds);
    let claims = NonceClaims {
        public_key: public_key.clone(),
        address: address.to_string(),
        nonce: Nonce::new(NONCE_SIZE).to_string(),
        aud: NONCE_AUDIENCE.to_string(),
        iat: now.timestamp().max(0) as u64,
        exp: expiration.timestamp().max(0) as u64,
    };
    let token = encode_jwt(&claims, keys)?;
    Ok((token, claims))
}

pub async fn generate_nonce(
    State(state): State<AppState>,
    Query(params): Query<GenerateNonceRequest>,
) -> Result<Json<GenerateNonceResponse>, ApiError> {
    let public_key = params.public_key.trim();
    let address = params.address.trim();
    if public_key.is_empty() {
        return Err(ApiError::EmptyField("Public key"));
    }
    if address.is_empty() {
        return Err(ApiError::EmptyField("Address"));
    }
    let public_key: PublicKey = public_key.parse()?;
    check_address_binding(&public_key, address)?;

    let (token, claims) = issue_nonce_token(
        &state.keys,
        &public_key,
        address,
        state.message_expiration_time as i64,
    )?;
    tracing::info!("Issued nonce token for {}", address);
    Ok(Json(GenerateNonceResponse {
        token,
        expiration: claims.exp,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::jwt::decode_jwt, server::tests::test_state};
    use common::{KeyType, Keypair};

    #[test]
    fn test_nonce_hex_roundtrip() {
        let nonce = Nonce::new(NONCE_SIZE);
        let encoded = nonce.to_string();
        assert!(encoded.starts_with("0x"));
        let decoded: Nonce = encoded.parse().unwrap();
        assert_eq!(decoded.len(), NONCE_SIZE);
        assert_eq!(*decoded, *nonce);
    }

    #[test]
    fn test_issued_token_embeds_key_and_address() {
        let keys = Keys::new(b"secret");
        let keypair = Keypair::generate(KeyType::Ed25519);
        let address = keypair.address();
        let (token, claims) =
            issue_nonce_token(&keys, &keypair.public_key(), &address, 300).unwrap();

        let decoded: NonceClaims = decode_jwt(&token, NONCE_AUDIENCE, &keys).unwrap();
        assert_eq!(decoded.public_key, keypair.public_key());
        assert_eq!(decoded.address, address);
        assert_eq!(decoded.nonce, claims.nonce);
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn test_each_token_carries_a_fresh_nonce() {
        let keys = Keys::new(b"secret");
        let keypair = Keypair::generate(KeyType::Secp256k1);
        let address = keypair.address();
        let (_, first) = issue_nonce_token(&keys, &keypair.public_key(), &address, 300).unwrap();
        let (_, second) = issue_nonce_token(&keys, &keypair.public_key(), &address, 300).unwrap();
        assert_ne!(first.nonce, second.nonce);
    }

    #[tokio::test]
    async fn test_generate_nonce() {
        let keypair = Keypair::generate(KeyType::Secp256k1);
        let params = GenerateNonceRequest {
            public_key: keypair.public_key().to_string(),
            address: keypair.address(),
        };
        let Json(response) = generate_nonce(State(test_state()), Query(params))
            .await
            .unwrap();
        assert!(!response.token.is_empty());
        assert!(response.expiration > 0);
    }

    #[tokio::test]
    async fn test_generate_nonce_empty_public_key() {
        let params = GenerateNonceRequest {
            public_key: "  ".to_string(),
            address: "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".to_string(),
        };
        let result = generate_nonce(State(test_state()), Query(params)).await;
        assert!(matches!(result, Err(ApiError::EmptyField(_))));
    }

    #[tokio::test]
    async fn test_generate_nonce_invalid_public_key() {
        let params = GenerateNonceRequest {
            public_key: "not-hex".to_string(),
            address: "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".to_string(),
        };
        let result = generate_nonce(State(test_state()), Query(params)).await;
        assert!(matches!(result, Err(ApiError::InvalidPublicKey(_))));
    }

    #[tokio::test]
    async fn test_generate_nonce_foreign_address() {
        let keypair = Keypair::generate(KeyType::Ed25519);
        let other = Keypair::generate(KeyType::Ed25519);
        let params = GenerateNonceRequest {
            public_key: keypair.public_key().to_string(),
            address: other.address(),
        };
        let result = generate_nonce(State(test_state()), Query(params)).await;
        assert!(matches!(result, Err(ApiError::AddressMismatch)));
    }

    #[tokio::test]
    async fn test_generate_nonce_malformed_address() {
        let keypair = Keypair::generate(KeyType::Ed25519);
        let params = GenerateNonceRequest {
            public_key: keypair.public_key().to_string(),
            address: "rNotAnAddress".to_string(),
        };
        let result = generate_nonce(State(test_state()), Query(params)).await;
        assert!(matches!(result, Err(ApiError::InvalidAddress(_))));
    }
}
