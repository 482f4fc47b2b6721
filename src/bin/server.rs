//! HTTP server: loads settings, connects and migrates the database, serves the API.

use rpg_hero_api::{app, apply_migrations, connect, AppState, Settings};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rpg_hero_api=info".parse()?))
        .init();

    let settings = Settings::from_env()?;
    let addr = settings.bind_addr()?;
    let pool = connect(&settings).await?;
    apply_migrations(&pool).await?;

    let state = AppState::new(pool, settings);
    let app = app(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
