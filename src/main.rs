use anyhow::Context;
use axum::http::HeaderValue;
use redis::aio::ConnectionManager;
use tracing_subscriber::EnvFilter;

use chirp::{
    auth::SessionIssuer,
    http::{router, AppState},
    media::LocalMediaSink,
    store::RedisStore,
    validators, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load();
    anyhow::ensure!(
        validators::is_valid_url(&config.media_base_url),
        "invalid media base URL: {}",
        config.media_base_url
    );

    let client = redis::Client::open(config.redis_url.as_str()).context("invalid redis URL")?;
    let conn = ConnectionManager::new(client)
        .await
        .context("failed to connect to redis")?;
    let store = RedisStore::new(conn, "chirp");

    let sink = LocalMediaSink::new(config.media_dir.clone(), config.media_base_url.clone());
    let sessions = SessionIssuer::new(&config.jwt_secret, config.production);
    let state = AppState::new(store, sessions, sink, config.bcrypt_cost);

    let origin: HeaderValue = config
        .cors_origin
        .parse()
        .context("invalid CORS origin")?;
    let app = router(state, origin);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
