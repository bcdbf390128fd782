use sea_orm::Database;
use tracing::info;

use roombook_api::config::ApiConfig;
use roombook_api::infra::mail::TracingMailer;
use roombook_api::router::build_router;
use roombook_api::state::AppState;
use roombook_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    // Aborts on missing DATABASE_URL / JWT_SECRET / BASE_URL. A service
    // without a signing secret must not come up.
    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        base_url: config.base_url,
        cookie_secure: config.cookie_secure,
        mailer: TracingMailer::default(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
