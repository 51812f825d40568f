pub mod jwt;
pub mod nonce;
pub mod replay;
pub mod session;
pub mod validation;
use crate::server::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use nonce::generate_nonce;
use session::{logout, resolve};
use validation::validate_signature;

pub fn auth(app_state: &AppState) -> Router {
    Router::new()
        .route("/auth", get(generate_nonce).post(validate_signature))
        .route("/session", post(resolve))
        .route("/logout", post(logout))
        .with_state(app_state.clone())
}
