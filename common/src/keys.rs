//! Ledger-native keypairs.
//!
//! Public keys are always 33 bytes: Ed25519 keys carry an `0xED` prefix in
//! front of the 32 byte point, secp256k1 keys use the compressed SEC1 form.
//! Ed25519 signs the message bytes directly. secp256k1 signs
//! SHA-512Half(message) and the signature travels DER encoded.

use crate::address::derive_address;
use ed25519_dalek::{Signer, Verifier};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::{fmt, str::FromStr};
use thiserror::Error;

const ED25519_PREFIX: u8 = 0xED;
const SECP256K1_PRIVATE_PREFIX: u8 = 0x00;
pub const PUBLIC_KEY_LEN: usize = 33;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("public key must be {PUBLIC_KEY_LEN} bytes, got {0}")]
    PublicKeyLength(usize),
    #[error("private key has unexpected length {0}")]
    PrivateKeyLength(usize),
    #[error("unsupported key prefix {0:#04x}")]
    UnknownPrefix(u8),
    #[error("invalid {0} key material")]
    Invalid(KeyType),
    #[error("signing failed")]
    Signing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Ed25519,
    Secp256k1,
}

impl FromStr for KeyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ed25519" => Ok(KeyType::Ed25519),
            "secp256k1" => Ok(KeyType::Secp256k1),
            other => Err(format!("unknown key type: {other}")),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Ed25519 => write!(f, "ed25519"),
            KeyType::Secp256k1 => write!(f, "secp256k1"),
        }
    }
}

/// First half of a SHA-512 digest, the ledger's standard 256-bit hash.
pub fn sha512_half(data: &[u8]) -> [u8; 32] {
    let digest = Sha512::digest(data);
    let mut half = [0u8; 32];
    half.copy_from_slice(&digest[..32]);
    half
}

/// Hex encoding of the UTF-8 bytes of `message`, the form wallets are asked
/// to sign.
pub fn signing_payload(message: &str) -> String {
    hex::encode(message.as_bytes())
}

#[derive(Clone, PartialEq, Eq)]
pub enum PublicKey {
    Ed25519(ed25519_dalek::VerifyingKey),
    Secp256k1(k256::ecdsa::VerifyingKey),
}

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PUBLIC_KEY_LEN {
            return Err(KeyError::PublicKeyLength(bytes.len()));
        }
        match bytes[0] {
            ED25519_PREFIX => {
                let mut point = [0u8; 32];
                point.copy_from_slice(&bytes[1..]);
                ed25519_dalek::VerifyingKey::from_bytes(&point)
                    .map(PublicKey::Ed25519)
                    .map_err(|_| KeyError::Invalid(KeyType::Ed25519))
            }
            0x02 | 0x03 => k256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                .map(PublicKey::Secp256k1)
                .map_err(|_| KeyError::Invalid(KeyType::Secp256k1)),
            other => Err(KeyError::UnknownPrefix(other)),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            PublicKey::Ed25519(key) => {
                let mut bytes = Vec::with_capacity(PUBLIC_KEY_LEN);
                bytes.push(ED25519_PREFIX);
                bytes.extend_from_slice(key.as_bytes());
                bytes
            }
            PublicKey::Secp256k1(key) => key.to_encoded_point(true).as_bytes().to_vec(),
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            PublicKey::Ed25519(_) => KeyType::Ed25519,
            PublicKey::Secp256k1(_) => KeyType::Secp256k1,
        }
    }

    pub fn address(&self) -> String {
        derive_address(&self.to_bytes())
    }

    /// Checks `signature` over `message`. Malformed signatures are reported
    /// as not verified rather than as errors.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match self {
            PublicKey::Ed25519(key) => match ed25519_dalek::Signature::from_slice(signature) {
                Ok(signature) => key.verify(message, &signature).is_ok(),
                Err(_) => false,
            },
            PublicKey::Secp256k1(key) => match k256::ecdsa::Signature::from_der(signature) {
                // k256 rejects high-S signatures on verification
                Ok(signature) => key
                    .verify_prehash(&sha512_half(message), &signature)
                    .is_ok(),
                Err(_) => false,
            },
        }
    }

    pub fn verify_hex(&self, message_hex: &str, signature_hex: &str) -> bool {
        let (Ok(message), Ok(signature)) =
            (hex::decode(message_hex), hex::decode(signature_hex.trim()))
        else {
            return false;
        };
        self.verify(&message, &signature)
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(&hex::decode(s.trim())?)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.to_bytes()))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_string()).finish()
    }
}

/// A ledger keypair able to sign challenges the way wallets do.
#[derive(Clone)]
pub enum Keypair {
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
}

impl Keypair {
    pub fn generate(key_type: KeyType) -> Self {
        match key_type {
            KeyType::Ed25519 => Keypair::Ed25519(ed25519_dalek::SigningKey::generate(&mut OsRng)),
            KeyType::Secp256k1 => Keypair::Secp256k1(k256::ecdsa::SigningKey::random(&mut OsRng)),
        }
    }

    /// Parses the ledger private key format: `ED` followed by 32 bytes for
    /// Ed25519, `00` followed by 32 bytes (or bare 32 bytes) for secp256k1.
    pub fn from_private_hex(private_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(private_key.trim())?;
        match bytes.len() {
            33 if bytes[0] == ED25519_PREFIX => {
                let mut secret = [0u8; 32];
                secret.copy_from_slice(&bytes[1..]);
                Ok(Keypair::Ed25519(ed25519_dalek::SigningKey::from_bytes(
                    &secret,
                )))
            }
            33 if bytes[0] == SECP256K1_PRIVATE_PREFIX => secp256k1_signing_key(&bytes[1..]),
            33 => Err(KeyError::UnknownPrefix(bytes[0])),
            32 => secp256k1_signing_key(&bytes),
            other => Err(KeyError::PrivateKeyLength(other)),
        }
    }

    pub fn to_private_hex(&self) -> String {
        match self {
            Keypair::Ed25519(key) => {
                format!("{:02X}{}", ED25519_PREFIX, hex::encode_upper(key.to_bytes()))
            }
            Keypair::Secp256k1(key) => format!(
                "{:02X}{}",
                SECP256K1_PRIVATE_PREFIX,
                hex::encode_upper(key.to_bytes())
            ),
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            Keypair::Ed25519(_) => KeyType::Ed25519,
            Keypair::Secp256k1(_) => KeyType::Secp256k1,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            Keypair::Ed25519(key) => PublicKey::Ed25519(key.verifying_key()),
            Keypair::Secp256k1(key) => PublicKey::Secp256k1(key.verifying_key().clone()),
        }
    }

    pub fn address(&self) -> String {
        self.public_key().address()
    }

    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, KeyError> {
        match self {
            Keypair::Ed25519(key) => Ok(key.sign(message).to_bytes().to_vec()),
            Keypair::Secp256k1(key) => {
                let signature: k256::ecdsa::Signature = key
                    .sign_prehash(&sha512_half(message))
                    .map_err(|_| KeyError::Signing)?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
        }
    }

    /// Signs the bytes denoted by `message_hex` and returns upper-case hex.
    pub fn sign_hex(&self, message_hex: &str) -> Result<String, KeyError> {
        let message = hex::decode(message_hex)?;
        Ok(hex::encode_upper(self.sign(&message)?))
    }
}

fn secp256k1_signing_key(secret: &[u8]) -> Result<Keypair, KeyError> {
    k256::ecdsa::SigningKey::from_slice(secret)
        .map(Keypair::Secp256k1)
        .map_err(|_| KeyError::Invalid(KeyType::Secp256k1))
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("key_type", &self.key_type())
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
