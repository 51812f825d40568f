pub mod auth;
pub mod errors;
pub mod payment;
pub mod server;
pub mod utils;

use clap::{ArgAction, Parser};

/// Command line arguments for the server
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[arg(long, env, default_value = "0.0.0.0")]
    pub host: String,
    #[arg(long, short, env, default_value = "3000")]
    pub port: u16,
    #[arg(long, short, env)]
    pub jwt_secret_key: String,
    /// Lifetime of a nonce token, in seconds
    #[arg(long, short, env, default_value = "300")]
    pub message_expiration_time: u32,
    /// Lifetime of a session token and its cookie, in seconds
    #[arg(long, short, env, default_value = "3600")]
    pub session_expiration_time: u32,
    #[arg(long, env, default_value = "jwt")]
    pub cookie_name: String,
    #[arg(long, env, default_value_t = true, action = ArgAction::Set)]
    pub secure_cookie: bool,
    /// Reject a second verification of the same nonce token
    #[arg(long, env, default_value_t = true, action = ArgAction::Set)]
    pub single_use_nonces: bool,
}
