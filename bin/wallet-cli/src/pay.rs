use clap::Parser;
use url::Url;
use wallet_sdk::{AuthSdk, PaymentRequest};

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Pay {
    #[arg(long, env)]
    pub server_url: Url,
    #[arg(long, env)]
    pub session_token: String,
    #[arg(long, short, env)]
    pub destination: String,
    /// Amount in drops
    #[arg(long, short, env)]
    pub amount: String,
}

impl Pay {
    pub async fn run(self) -> anyhow::Result<()> {
        let sdk = AuthSdk::new(self.server_url)?;
        let txjson = sdk
            .prepare_payment(
                Some(&self.session_token),
                &PaymentRequest {
                    destination: self.destination,
                    amount: self.amount,
                },
            )
            .await?;
        println!("{}", serde_json::to_string_pretty(&txjson)?);
        Ok(())
    }
}
