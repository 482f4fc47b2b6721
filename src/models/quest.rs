use crate::error::FieldError;
use crate::models::{nullable, UnknownVariant};
use crate::sql::Page;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;

pub const END_AFTER_START: &str = "End date must be after start date";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Legendary,
}

impl Difficulty {
    pub const NAMES: &'static [&'static str] = &["easy", "medium", "hard", "legendary"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "legendary" => Ok(Difficulty::Legendary),
            _ => Err(UnknownVariant {
                kind: "difficulty",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Quest {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub reward_gold: i64,
    pub reward_xp: i64,
    pub min_level: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quest {
    /// The end-after-start rule, checked on a whole record.
    pub fn date_violation(&self) -> Option<FieldError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end <= start => {
                Some(FieldError::new("end_date", END_AFTER_START))
            }
            _ => None,
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Quest {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let difficulty: String = row.try_get("difficulty")?;
        let difficulty = difficulty.parse().map_err(|e| sqlx::Error::ColumnDecode {
            index: "difficulty".into(),
            source: Box::new(e),
        })?;
        Ok(Quest {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            difficulty,
            reward_gold: row.try_get("reward_gold")?,
            reward_xp: row.try_get("reward_xp")?,
            min_level: row.try_get("min_level")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Accepts `true`/`false` as well as the legacy `1`/`0`.
fn flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }
    match Flag::deserialize(de)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(n) => Err(serde::de::Error::custom(format!("expected 0 or 1, got {}", n))),
    }
}

fn optional_flag<'de, D>(de: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "flag")] bool);
    Option::<Wrapped>::deserialize(de).map(|w| w.map(|Wrapped(b)| b))
}

fn default_min_level() -> i64 {
    1
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewQuest {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub reward_gold: i64,
    pub reward_xp: i64,
    #[serde(default = "default_min_level")]
    pub min_level: i64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_active", deserialize_with = "flag")]
    pub is_active: bool,
}

/// Partial quest update. Dates distinguish absent from `null` (which clears them).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QuestPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub reward_gold: Option<i64>,
    #[serde(default)]
    pub reward_xp: Option<i64>,
    #[serde(default)]
    pub min_level: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub is_active: Option<bool>,
}

impl QuestPatch {
    pub fn apply(self, existing: &Quest, updated_at: DateTime<Utc>) -> Quest {
        Quest {
            id: existing.id,
            title: self.title.unwrap_or_else(|| existing.title.clone()),
            description: self
                .description
                .unwrap_or_else(|| existing.description.clone()),
            difficulty: self.difficulty.unwrap_or(existing.difficulty),
            reward_gold: self.reward_gold.unwrap_or(existing.reward_gold),
            reward_xp: self.reward_xp.unwrap_or(existing.reward_xp),
            min_level: self.min_level.unwrap_or(existing.min_level),
            start_date: self.start_date.unwrap_or(existing.start_date),
            end_date: self.end_date.unwrap_or(existing.end_date),
            is_active: self.is_active.unwrap_or(existing.is_active),
            created_at: existing.created_at,
            updated_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuestSearch {
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub min_reward: Option<i64>,
    pub active_only: bool,
    pub page: Page,
}
