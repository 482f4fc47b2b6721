//! Schema DDL for heroes, quests and items. Every statement is idempotent.

use crate::error::AppError;
use sqlx::SqlitePool;

const HEROES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS heroes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    class TEXT NOT NULL CHECK (class IN ('warrior', 'mage', 'rogue', 'healer')),
    level INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1 AND level <= 100),
    health INTEGER NOT NULL CHECK (health > 0),
    mana INTEGER NOT NULL CHECK (mana >= 0),
    strength INTEGER NOT NULL CHECK (strength >= 0),
    intelligence INTEGER NOT NULL CHECK (intelligence >= 0),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

const QUESTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS quests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    difficulty TEXT NOT NULL CHECK (difficulty IN ('easy', 'medium', 'hard', 'legendary')),
    reward_gold INTEGER NOT NULL CHECK (reward_gold >= 0),
    reward_xp INTEGER NOT NULL CHECK (reward_xp >= 0),
    min_level INTEGER NOT NULL DEFAULT 1 CHECK (min_level >= 1 AND min_level <= 100),
    start_date TEXT,
    end_date TEXT,
    is_active BOOLEAN NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    CHECK (start_date IS NULL OR end_date IS NULL OR end_date > start_date)
)
"#;

const ITEMS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    damage INTEGER NOT NULL DEFAULT 0 CHECK (damage >= 0),
    weight INTEGER NOT NULL CHECK (weight >= 0),
    rarity TEXT,
    hero_id INTEGER REFERENCES heroes (id) ON DELETE SET NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

const ITEMS_HERO_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_items_hero_id ON items (hero_id)";

/// Create the tables (heroes before items, which references it) and indexes.
pub async fn apply_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    for (name, ddl) in [
        ("heroes", HEROES_DDL),
        ("quests", QUESTS_DDL),
        ("items", ITEMS_DDL),
        ("idx_items_hero_id", ITEMS_HERO_INDEX),
    ] {
        tracing::debug!(object = name, "migrate");
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::connect_in_memory;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        apply_migrations(&pool).await.unwrap();
        apply_migrations(&pool).await.unwrap();
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('heroes', 'quests', 'items') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, ["heroes", "items", "quests"]);
    }

    #[tokio::test]
    async fn storage_rejects_out_of_range_level() {
        let pool = connect_in_memory().await.unwrap();
        apply_migrations(&pool).await.unwrap();
        let res = sqlx::query(
            "INSERT INTO heroes (name, class, level, health, mana, strength, intelligence, created_at, updated_at) \
             VALUES ('X', 'mage', 101, 1, 0, 0, 0, 'a', 'a')",
        )
        .execute(&pool)
        .await;
        assert!(res.is_err());
    }
}
