//! Classic XRPL account addresses.
//!
//! An address is the base58check encoding (ripple alphabet) of a one byte
//! type prefix followed by the 20 byte account id, where the account id is
//! `RIPEMD160(SHA256(public_key))`.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use thiserror::Error;

const ACCOUNT_ID_PREFIX: u8 = 0x00;
const ACCOUNT_ID_LEN: usize = 20;

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("address is not valid base58check: {0}")]
    Encoding(#[from] bs58::decode::Error),
    #[error("address has unexpected length {0}")]
    Length(usize),
    #[error("address has unexpected type prefix {0:#04x}")]
    Prefix(u8),
}

pub type AccountId = [u8; ACCOUNT_ID_LEN];

pub fn account_id(public_key: &[u8]) -> AccountId {
    let sha = Sha256::digest(public_key);
    Ripemd160::digest(sha).into()
}

pub fn encode_classic_address(account_id: &AccountId) -> String {
    let mut payload = Vec::with_capacity(ACCOUNT_ID_LEN + 1);
    payload.push(ACCOUNT_ID_PREFIX);
    payload.extend_from_slice(account_id);
    bs58::encode(payload)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check()
        .into_string()
}

/// Decodes a classic address back into its account id, validating the
/// checksum and the type prefix.
pub fn decode_classic_address(address: &str) -> Result<AccountId, AddressError> {
    let decoded = bs58::decode(address.trim())
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check(None)
        .into_vec()?;
    if decoded.len() != ACCOUNT_ID_LEN + 1 {
        return Err(AddressError::Length(decoded.len()));
    }
    if decoded[0] != ACCOUNT_ID_PREFIX {
        return Err(AddressError::Prefix(decoded[0]));
    }
    let mut id = [0u8; ACCOUNT_ID_LEN];
    id.copy_from_slice(&decoded[1..]);
    Ok(id)
}

pub fn is_valid_classic_address(address: &str) -> bool {
    decode_classic_address(address).is_ok()
}

pub fn derive_address(public_key: &[u8]) -> String {
    encode_classic_address(&account_id(public_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Genesis account of the ledger, derived from the "masterpassphrase" seed.
    const GENESIS_PUBLIC_KEY: &str =
        "0330E7FC9D56BB25D6893BA3F317AE5BCF33B3291BD63DB32654A313222F7FD020";
    const GENESIS_ADDRESS: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    #[test]
    fn test_derive_genesis_address() {
        let public_key = hex::decode(GENESIS_PUBLIC_KEY).unwrap();
        assert_eq!(derive_address(&public_key), GENESIS_ADDRESS);
    }

    #[test]
    fn test_decode_matches_account_id() {
        let public_key = hex::decode(GENESIS_PUBLIC_KEY).unwrap();
        let id = decode_classic_address(GENESIS_ADDRESS).unwrap();
        assert_eq!(id, account_id(&public_key));
    }

    #[test]
    fn test_rejects_bad_checksum() {
        // last character changed
        assert!(!is_valid_classic_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTj"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(!is_valid_classic_address(""));
        assert!(!is_valid_classic_address("not an address"));
        assert!(!is_valid_classic_address("0x1234"));
    }
}
