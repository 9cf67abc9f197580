//! Steeple API server

use steeple_api::{routes, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steeple_api=debug,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let pool =
        steeple_shared::create_pool(&config.database_url, config.database_max_connections).await?;

    let bind_address = config.bind_address.clone();
    let state = AppState::new(config, pool).await?;
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("listening on {}", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
