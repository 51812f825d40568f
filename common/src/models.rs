use crate::keys::PublicKey;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// What a wallet reports when asked for its account.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletIdentity {
    pub address: String,
    #[serde_as(as = "DisplayFromStr")]
    pub public_key: PublicKey,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateNonceResponse {
    pub token: String,
    pub expiration: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JWTResponse {
    pub token: String,
    pub address: String,
    pub expiration: u64,
}

/// Serializes to `{}` when no session could be resolved.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSession {
    #[serde(
        rename = "xrpAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub xrp_address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentTransaction {
    pub transaction_type: String,
    pub account: String,
    pub destination: String,
    pub amount: String,
}

impl PaymentTransaction {
    pub fn new(account: String, destination: String, amount: String) -> Self {
        Self {
            transaction_type: "Payment".to_string(),
            account,
            destination,
            amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub txjson: PaymentTransaction,
}
