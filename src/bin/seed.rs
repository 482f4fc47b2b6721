//! Reset the configured database to the sample heroes, items and quests.

use rpg_hero_api::{apply_migrations, connect, seed::seed, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rpg_hero_api=info".parse()?))
        .init();

    let settings = Settings::from_env()?;
    let pool = connect(&settings).await?;
    apply_migrations(&pool).await?;
    let report = seed(&pool).await?;
    tracing::info!(
        heroes = report.heroes,
        items = report.items,
        quests = report.quests,
        "database seeded"
    );
    pool.close().await;
    Ok(())
}
