//! Wallet families and the capabilities every family exposes.
//!
//! Each family is reached differently (browser extension, in-page SDK,
//! QR code with push approval, hardware device, EVM aggregator), but once a
//! family has produced an address, a public key and a signature over a
//! server challenge, the authentication flow treats them all alike.

use crate::errors::WalletError;
use common::{models::PaymentTransaction, WalletIdentity};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletFamily {
    Gem,
    Crossmark,
    Xumm,
    Ledger,
    Bifrost,
}

impl WalletFamily {
    pub const ALL: [WalletFamily; 5] = [
        WalletFamily::Gem,
        WalletFamily::Crossmark,
        WalletFamily::Xumm,
        WalletFamily::Ledger,
        WalletFamily::Bifrost,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            WalletFamily::Gem => "GEM WALLET",
            WalletFamily::Crossmark => "CROSS MARK WALLET",
            WalletFamily::Xumm => "XUMUN WALLET",
            WalletFamily::Ledger => "LEDGER WALLET",
            WalletFamily::Bifrost => "BIFROST WALLET",
        }
    }

    /// Bifrost connects through an EVM aggregator and never signs a ledger
    /// challenge, so it has no server-side verification step.
    pub fn signs_challenges(&self) -> bool {
        !matches!(self, WalletFamily::Bifrost)
    }
}

impl fmt::Display for WalletFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for WalletFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        let short = normalized.trim_end_matches(" WALLET").replace(' ', "");
        match short.as_str() {
            "GEM" | "GEMWALLET" => Ok(WalletFamily::Gem),
            "CROSSMARK" => Ok(WalletFamily::Crossmark),
            "XUMM" | "XUMUN" | "XAMAN" => Ok(WalletFamily::Xumm),
            "LEDGER" => Ok(WalletFamily::Ledger),
            "BIFROST" => Ok(WalletFamily::Bifrost),
            _ => Err(format!("unknown wallet family: {s}")),
        }
    }
}

/// Capability set shared by all wallet families.
#[allow(async_fn_in_trait)]
pub trait WalletProvider {
    fn family(&self) -> WalletFamily;

    async fn is_installed(&self) -> Result<bool, WalletError>;

    async fn get_public_key(&self) -> Result<WalletIdentity, WalletError>;

    /// Signs the UTF-8 bytes of `message` and returns the signature as hex.
    async fn sign_message(&self, message: &str) -> Result<String, WalletError>;

    /// Hands a prepared payment to the wallet for signing and submission,
    /// returning the wallet's reference for it.
    async fn send_payment(&self, _payment: &PaymentTransaction) -> Result<String, WalletError> {
        Err(WalletError::Unsupported {
            family: self.family(),
            operation: "payments",
        })
    }
}
