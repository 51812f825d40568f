use clap::Parser;
use common::{KeyType, Keypair};
use serde::Serialize;

/// Generates a ledger keypair and prints it together with its classic address.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[arg(long, short, env, default_value = "ed25519")]
    key_type: KeyType,
}

#[derive(Serialize)]
struct GeneratedKey {
    key_type: KeyType,
    private_key: String,
    public_key: String,
    address: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let keypair = Keypair::generate(args.key_type);
    let generated = GeneratedKey {
        key_type: keypair.key_type(),
        private_key: keypair.to_private_hex(),
        public_key: keypair.public_key().to_string(),
        address: keypair.address(),
    };
    println!("{}", serde_json::to_string_pretty(&generated)?);
    Ok(())
}
