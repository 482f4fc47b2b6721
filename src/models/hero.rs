use crate::models::UnknownVariant;
use crate::sql::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroClass {
    Warrior,
    Mage,
    Rogue,
    Healer,
}

impl HeroClass {
    pub const NAMES: &'static [&'static str] = &["warrior", "mage", "rogue", "healer"];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeroClass::Warrior => "warrior",
            HeroClass::Mage => "mage",
            HeroClass::Rogue => "rogue",
            HeroClass::Healer => "healer",
        }
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeroClass {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warrior" => Ok(HeroClass::Warrior),
            "mage" => Ok(HeroClass::Mage),
            "rogue" => Ok(HeroClass::Rogue),
            "healer" => Ok(HeroClass::Healer),
            _ => Err(UnknownVariant {
                kind: "hero class",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hero {
    pub id: i64,
    pub name: String,
    pub class: HeroClass,
    pub level: i64,
    pub health: i64,
    pub mana: i64,
    pub strength: i64,
    pub intelligence: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for Hero {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let class: String = row.try_get("class")?;
        let class = class.parse().map_err(|e| sqlx::Error::ColumnDecode {
            index: "class".into(),
            source: Box::new(e),
        })?;
        Ok(Hero {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            class,
            level: row.try_get("level")?,
            health: row.try_get("health")?,
            mana: row.try_get("mana")?,
            strength: row.try_get("strength")?,
            intelligence: row.try_get("intelligence")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn default_level() -> i64 {
    1
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewHero {
    pub name: String,
    pub class: HeroClass,
    #[serde(default = "default_level")]
    pub level: i64,
    pub health: i64,
    pub mana: i64,
    pub strength: i64,
    pub intelligence: i64,
}

/// Partial hero update. `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct HeroPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub class: Option<HeroClass>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub health: Option<i64>,
    #[serde(default)]
    pub mana: Option<i64>,
    #[serde(default)]
    pub strength: Option<i64>,
    #[serde(default)]
    pub intelligence: Option<i64>,
}

impl HeroPatch {
    /// Merge onto `existing`; absent fields keep their stored value.
    pub fn apply(self, existing: &Hero, updated_at: DateTime<Utc>) -> Hero {
        Hero {
            id: existing.id,
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            class: self.class.unwrap_or(existing.class),
            level: self.level.unwrap_or(existing.level),
            health: self.health.unwrap_or(existing.health),
            mana: self.mana.unwrap_or(existing.mana),
            strength: self.strength.unwrap_or(existing.strength),
            intelligence: self.intelligence.unwrap_or(existing.intelligence),
            created_at: existing.created_at,
            updated_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeroSearch {
    pub name: Option<String>,
    /// Kept as text: an unknown class simply matches nothing.
    pub class: Option<String>,
    pub min_level: Option<i64>,
    pub max_level: Option<i64>,
    pub page: Page,
}
