use clap::Parser;
use url::Url;
use wallet_sdk::{AuthSdk, LocalWallet, WalletFamily};

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Login {
    #[arg(long, env)]
    pub server_url: Url,
    /// Ledger private key: `ED` + 32 bytes hex, or `00` + 32 bytes hex
    #[arg(long, env)]
    pub private_key: String,
    #[arg(long, short, env, default_value = "gem")]
    pub wallet: WalletFamily,
}

impl Login {
    pub async fn run(self) -> anyhow::Result<()> {
        let wallet = LocalWallet::from_private_hex(self.wallet, &self.private_key)?;
        let sdk = AuthSdk::new(self.server_url)?;
        let session = sdk.login(&wallet).await?;
        println!("{}", serde_json::to_string_pretty(&session)?);
        Ok(())
    }
}
