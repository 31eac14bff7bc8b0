use sea_orm::Database;
use tracing::info;

use lectio_api::config::ApiConfig;
use lectio_api::router::build_router;
use lectio_api::state::AppState;
use lectio_auth::{PasswordHasher, TokenSigner};
use lectio_core::config::Config;
use lectio_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let hasher =
        PasswordHasher::new(config.work_factor()).expect("invalid password work factor");
    let signer = TokenSigner::new(config.jwt_secret.as_str());
    let state = AppState::new(db, signer, hasher);

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
