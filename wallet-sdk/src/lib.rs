pub mod errors;
pub mod local;
pub mod sdk;
pub mod sdk_builder;
pub mod wallet;

pub use common::{
    models::{JWTResponse, PaymentTransaction},
    requests::PaymentRequest,
    KeyType, Keypair, PublicKey, WalletIdentity,
};
pub use errors::{SdkErrors, WalletError};
pub use local::LocalWallet;
pub use sdk::AuthSdk;
pub use sdk_builder::AuthSdkBuilder;
pub use wallet::{WalletFamily, WalletProvider};
