use clap::{Parser, Subcommand};

pub mod login;
use login::Login;

pub mod pay;
use pay::Pay;

pub mod resolve;
use resolve::Resolve;

#[derive(Debug, Parser)]
#[clap(about, version)]
struct Cli {
    #[clap(subcommand)]
    command: Subcommands,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    #[clap(about = "Authenticate a wallet key and print the session")]
    Login(Login),
    #[clap(about = "Resolve a session token to its address")]
    Resolve(Resolve),
    #[clap(about = "Prepare a payment from the session's account")]
    Pay(Pay),
}

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match cli.command {
        Subcommands::Login(login) => login.run().await,
        Subcommands::Resolve(resolve) => resolve.run().await,
        Subcommands::Pay(pay) => pay.run().await,
    }
}
