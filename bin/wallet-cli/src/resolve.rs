use clap::Parser;
use url::Url;
use wallet_sdk::AuthSdk;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Resolve {
    #[arg(long, env)]
    pub server_url: Url,
    #[arg(long, env)]
    pub session_token: String,
}

impl Resolve {
    pub async fn run(self) -> anyhow::Result<()> {
        let sdk = AuthSdk::new(self.server_url)?;
        match sdk.resolve_session(Some(&self.session_token)).await? {
            Some(address) => println!("{address}"),
            None => anyhow::bail!("No address found"),
        }
        Ok(())
    }
}
