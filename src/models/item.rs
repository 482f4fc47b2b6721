use crate::models::nullable;
use crate::sql::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub damage: i64,
    pub weight: i64,
    pub rarity: Option<String>,
    /// Owning hero; `None` when unassigned.
    pub hero_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for Item {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Item {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            item_type: row.try_get("type")?,
            damage: row.try_get("damage")?,
            weight: row.try_get("weight")?,
            rarity: row.try_get("rarity")?,
            hero_id: row.try_get("hero_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub damage: i64,
    pub weight: i64,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub hero_id: Option<i64>,
}

/// Partial item update. `rarity` and `hero_id` distinguish absent from `null`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub damage: Option<i64>,
    #[serde(default)]
    pub weight: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub rarity: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub hero_id: Option<Option<i64>>,
}

impl ItemPatch {
    pub fn assign_to(hero_id: i64) -> Self {
        ItemPatch {
            hero_id: Some(Some(hero_id)),
            ..ItemPatch::default()
        }
    }

    /// Whether applying this patch can change the weight carried by any hero.
    pub fn touches_load(&self) -> bool {
        self.weight.is_some() || self.hero_id.is_some()
    }

    pub fn apply(self, existing: &Item, updated_at: DateTime<Utc>) -> Item {
        Item {
            id: existing.id,
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            item_type: self
                .item_type
                .unwrap_or_else(|| existing.item_type.clone()),
            damage: self.damage.unwrap_or(existing.damage),
            weight: self.weight.unwrap_or(existing.weight),
            rarity: self.rarity.unwrap_or_else(|| existing.rarity.clone()),
            hero_id: self.hero_id.unwrap_or(existing.hero_id),
            created_at: existing.created_at,
            updated_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemSearch {
    pub item_type: Option<String>,
    pub page: Page,
}
