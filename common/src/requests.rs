use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateNonceRequest {
    #[serde(default, alias = "pubkey")]
    pub public_key: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateSignatureRequest {
    #[serde(default)]
    pub signature: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ResolveSessionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(alias = "destinationAddress")]
    pub destination: String,
    /// Amount in drops, as a decimal string.
    pub amount: String,
}
