use crate::wallet::WalletFamily;
use common::KeyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkErrors {
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("Nonce request failed: {0}")]
    NonceRequestFailed(String),
    #[error("Signature rejected: {0}")]
    SignatureRejected(String),
    #[error("Session request failed: {0}")]
    SessionRequestFailed(String),
    #[error("Payment request failed: {0}")]
    PaymentRequestFailed(String),
    #[error("{0} is not installed")]
    NotInstalled(WalletFamily),
    #[error("{0} does not sign ledger challenges")]
    ChallengeUnsupported(WalletFamily),
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error("{0} cannot be backed by a ledger keypair")]
    UnsupportedFamily(WalletFamily),
    #[error("{family} does not support {operation}")]
    Unsupported {
        family: WalletFamily,
        operation: &'static str,
    },
}
