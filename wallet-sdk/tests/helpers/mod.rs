use auth_server::{
    server::{router, AppState},
    Args,
};
use clap::Parser;
use tokio::net::TcpListener;
use url::Url;

pub async fn spawn_server(single_use_nonces: bool) -> Url {
    let args = Args::parse_from([
        "auth-server",
        "--jwt-secret-key",
        "integration-secret",
        "--secure-cookie",
        "false",
        "--single-use-nonces",
        if single_use_nonces { "true" } else { "false" },
    ]);
    let state = AppState::from_args(&args).unwrap();
    let app = router(&state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{address}/")).unwrap()
}
