use auth_server::{errors::ServerError, server::start, Args};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let args = Args::parse();
    start(args).await?;
    Ok(())
}
