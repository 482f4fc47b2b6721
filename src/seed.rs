//! Sample data: five heroes, five items and five quests.

use crate::error::AppError;
use crate::models::{Difficulty, HeroClass, NewHero, NewItem, NewQuest};
use crate::service::{HeroRepository, ItemRepository, QuestRepository};
use sqlx::SqlitePool;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub heroes: usize,
    pub items: usize,
    pub quests: usize,
}

fn hero(name: &str, class: HeroClass, stats: [i64; 5]) -> NewHero {
    let [level, health, mana, strength, intelligence] = stats;
    NewHero {
        name: name.to_string(),
        class,
        level,
        health,
        mana,
        strength,
        intelligence,
    }
}

fn item(name: &str, item_type: &str, damage: i64, weight: i64, rarity: &str, hero_id: Option<i64>) -> NewItem {
    NewItem {
        name: name.to_string(),
        item_type: item_type.to_string(),
        damage,
        weight,
        rarity: Some(rarity.to_string()),
        hero_id,
    }
}

fn quest(
    title: &str,
    description: &str,
    difficulty: Difficulty,
    reward_gold: i64,
    reward_xp: i64,
    min_level: i64,
    is_active: bool,
) -> NewQuest {
    NewQuest {
        title: title.to_string(),
        description: description.to_string(),
        difficulty,
        reward_gold,
        reward_xp,
        min_level,
        start_date: None,
        end_date: None,
        is_active,
    }
}

pub fn heroes() -> Vec<NewHero> {
    vec![
        hero("Aragorn", HeroClass::Warrior, [87, 500, 100, 95, 70]),
        hero("Gandalf", HeroClass::Mage, [100, 300, 1000, 40, 100]),
        hero("Legolas", HeroClass::Rogue, [75, 350, 150, 70, 60]),
        hero("Elrond", HeroClass::Healer, [90, 400, 800, 50, 95]),
        hero("Gimli", HeroClass::Warrior, [70, 550, 50, 90, 40]),
    ]
}

/// Items with owners given by 1-based position in `heroes()`.
pub fn items() -> Vec<NewItem> {
    vec![
        item("Iron Sword", "weapon", 15, 5, "common", Some(1)),
        item("Healing Potion", "consumable", 0, 1, "common", Some(1)),
        item("Staff of Light", "weapon", 40, 8, "epic", Some(2)),
        item("Elven Bow", "weapon", 25, 3, "rare", Some(3)),
        item("Mithril Mail", "armor", 0, 2, "legendary", None),
    ]
}

pub fn quests() -> Vec<NewQuest> {
    vec![
        quest(
            "Destroy the Ring",
            "Take the One Ring to Mordor and cast it into the fires of Mount Doom.",
            Difficulty::Legendary,
            10000,
            50000,
            50,
            true,
        ),
        quest(
            "Defend Minas Tirith",
            "Protect the white city from the armies of Mordor.",
            Difficulty::Hard,
            5000,
            25000,
            40,
            true,
        ),
        quest(
            "Escort Hobbits to Bree",
            "Guide the Hobbits safely to the Prancing Pony inn.",
            Difficulty::Medium,
            500,
            1000,
            10,
            false,
        ),
        quest(
            "Clear Rats from Cellar",
            "The innkeeper needs help clearing giant rats from his cellar.",
            Difficulty::Easy,
            50,
            100,
            1,
            true,
        ),
        quest(
            "Find the Lost Palantir",
            "Recover the seeing stone lost in the Anduin river.",
            Difficulty::Hard,
            2000,
            8000,
            30,
            true,
        ),
    ]
}

/// Clear all tables, reset id sequences and insert the sample data.
pub async fn seed(pool: &SqlitePool) -> Result<SeedReport, AppError> {
    let mut tx = pool.begin().await?;
    for stmt in [
        "DELETE FROM items",
        "DELETE FROM heroes",
        "DELETE FROM quests",
        "DELETE FROM sqlite_sequence WHERE name IN ('heroes', 'quests', 'items')",
    ] {
        sqlx::query(stmt).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!("cleared existing data");

    let hero_repo = HeroRepository::new(pool.clone());
    let mut hero_ids = Vec::new();
    for new in heroes() {
        hero_ids.push(hero_repo.create(&new).await?.id);
    }

    let item_repo = ItemRepository::new(pool.clone());
    let mut report = SeedReport {
        heroes: hero_ids.len(),
        ..SeedReport::default()
    };
    for mut new in items() {
        new.hero_id = new
            .hero_id
            .and_then(|pos| usize::try_from(pos - 1).ok())
            .and_then(|i| hero_ids.get(i).copied());
        item_repo.create(&new).await?;
        report.items += 1;
    }

    let quest_repo = QuestRepository::new(pool.clone());
    for new in quests() {
        quest_repo.create(&new).await?;
        report.quests += 1;
    }

    tracing::info!(
        heroes = report.heroes,
        items = report.items,
        quests = report.quests,
        "seeding completed"
    );
    Ok(report)
}
