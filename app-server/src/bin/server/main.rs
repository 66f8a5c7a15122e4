use std::sync::Arc;

use app_server::config::Config;
use app_server::domain::user::service::UserService;
use app_server::inbound::http::router::create_router;
use app_server::observability::user::ObservedUserRepository;
use app_server::observability::user::ObservedUserService;
use app_server::outbound::repositories::PostgresUserRepository;
use auth::Authenticator;
use auth::SigningKey;
use auth::TokenProvider;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "app-server",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        jwt = ?config.jwt,
        "Configuration loaded"
    );

    let signing_key = SigningKey::from_base64(&config.jwt.secret, &config.jwt.algorithm)?;
    let fingerprint = auth::jwt::hash_secret(config.jwt.secret.as_bytes(), &config.jwt.algorithm)?;
    tracing::info!(
        algorithm = ?signing_key.algorithm(),
        key_fingerprint = %fingerprint,
        "Signing key derived"
    );

    let token_provider = TokenProvider::new(signing_key, config.jwt.token_config());
    let authenticator = Arc::new(Authenticator::new(token_provider));

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(ObservedUserRepository::new(PostgresUserRepository::new(
        pg_pool,
    )));
    let user_service = Arc::new(ObservedUserService::new(UserService::new(
        user_repository,
        Arc::clone(&authenticator),
    )));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authenticator);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
