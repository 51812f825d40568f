use crate::{
    errors::WalletError,
    wallet::{WalletFamily, WalletProvider},
};
use common::{signing_payload, KeyType, Keypair, WalletIdentity};

/// A wallet whose ledger keypair lives in this process.
#[derive(Debug, Clone)]
pub struct LocalWallet {
    family: WalletFamily,
    keypair: Keypair,
}

impl LocalWallet {
    pub fn new(family: WalletFamily, keypair: Keypair) -> Result<Self, WalletError> {
        if !family.signs_challenges() {
            return Err(WalletError::UnsupportedFamily(family));
        }
        Ok(Self { family, keypair })
    }

    pub fn generate(family: WalletFamily, key_type: KeyType) -> Result<Self, WalletError> {
        Self::new(family, Keypair::generate(key_type))
    }

    pub fn from_private_hex(family: WalletFamily, private_key: &str) -> Result<Self, WalletError> {
        Self::new(family, Keypair::from_private_hex(private_key)?)
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn address(&self) -> String {
        self.keypair.address()
    }
}

impl WalletProvider for LocalWallet {
    fn family(&self) -> WalletFamily {
        self.family
    }

    async fn is_installed(&self) -> Result<bool, WalletError> {
        Ok(true)
    }

    async fn get_public_key(&self) -> Result<WalletIdentity, WalletError> {
        Ok(WalletIdentity {
            address: self.keypair.address(),
            public_key: self.keypair.public_key(),
        })
    }

    async fn sign_message(&self, message: &str) -> Result<String, WalletError> {
        Ok(self.keypair.sign_hex(&signing_payload(message))?)
    }
}
