pub mod address;
pub mod keys;
pub mod models;
pub mod requests;

pub use address::{derive_address, is_valid_classic_address, AddressError};
pub use keys::{signing_payload, KeyError, KeyType, Keypair, PublicKey};
pub use models::WalletIdentity;
