use crate::auth::{auth, jwt::Keys, replay::SpentNonces};
use crate::utils::shutdown::shutdown_signal;
use crate::{errors::ServerError, payment, Args};
use axum::{serve, Router};
use core::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::trace;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub keys: Keys,
    pub message_expiration_time: usize,
    pub session_expiration_time: usize,
    pub cookie: CookieConfig,
    pub spent_nonces: Option<SpentNonces>,
}

impl AppState {
    /// Builds the state from the command line. A missing signing secret is a
    /// configuration error, never a per-request one.
    pub fn from_args(args: &Args) -> Result<Self, ServerError> {
        if args.jwt_secret_key.trim().is_empty() {
            return Err(ServerError::Config(
                "jwt secret key must not be empty".to_string(),
            ));
        }
        if args.cookie_name.trim().is_empty() {
            return Err(ServerError::Config(
                "cookie name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            keys: Keys::new(args.jwt_secret_key.as_bytes()),
            message_expiration_time: args.message_expiration_time as usize,
            session_expiration_time: args.session_expiration_time as usize,
            cookie: CookieConfig {
                name: args.cookie_name.clone(),
                secure: args.secure_cookie,
            },
            spent_nonces: args.single_use_nonces.then(SpentNonces::default),
        })
    }
}

pub fn router(app_state: &AppState) -> Router {
    Router::new()
        .merge(auth(app_state))
        .merge(payment::router(app_state))
        .layer(TraceLayer::new_for_http())
}

pub async fn start(args: Args) -> Result<(), ServerError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app_state = AppState::from_args(&args)?;
    if app_state.spent_nonces.is_some() {
        tracing::info!("Nonce tokens are single use");
    }
    let app = router(&app_state);

    let address: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(ServerError::AddressParse)?;

    let listener = TcpListener::bind(address).await?;

    trace!("Listening on {}", address);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
