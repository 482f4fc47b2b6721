//! Request validation from declarative field rules.
//!
//! Every field of a rule set is checked and the first failing check per field is
//! reported, so one response lists all problems. Checks also normalize the body in
//! place: marked strings are trimmed and numeric strings become numbers, so the
//! typed payload deserialized afterwards sees what was validated.

use crate::error::{AppError, FieldError};
use crate::models::{Difficulty, HeroClass, END_AFTER_START};
use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Letters, spaces, hyphens and apostrophes.
pub const NAME_PATTERN: &str = r"^[a-zA-Z\s\-']+$";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_PATTERN).expect("valid name pattern"));

fn name_regex() -> &'static Regex {
    &NAME_RE
}

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug)]
pub enum Presence {
    /// Missing or `null` fails with this message.
    Required(&'static str),
    /// Missing or `null` skips the field.
    Optional,
}

#[derive(Clone, Copy, Debug)]
pub enum Check {
    /// String must be non-empty (after trimming, when the rule trims).
    NotEmpty(&'static str),
    /// String must match the compiled pattern returned by the function.
    Pattern(fn() -> &'static Regex, &'static str),
    OneOf(&'static [&'static str], &'static str),
    /// Integer within inclusive bounds. Numeric strings are accepted and normalized.
    Int {
        min: Option<i64>,
        max: Option<i64>,
        message: &'static str,
    },
    /// Calendar date as `YYYY-MM-DD`.
    IsoDate(&'static str),
    /// Boolean, or the integers 0 and 1.
    Flag(&'static str),
    Text(&'static str),
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub field: &'static str,
    pub trim: bool,
    pub presence: Presence,
    pub checks: &'static [Check],
}

/// Rules for one request body, plus the optional end-after-start date pair.
#[derive(Clone, Copy, Debug)]
pub struct RuleSet {
    pub fields: &'static [FieldRule],
    pub date_order: Option<(&'static str, &'static str)>,
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate and normalize `body` against `rules`.
    pub fn validate(body: &mut Map<String, Value>, rules: &RuleSet) -> Result<(), AppError> {
        let mut errors = Vec::new();
        for rule in rules.fields {
            if let Some(message) = check_field(body, rule) {
                errors.push(FieldError::new(rule.field, message));
            }
        }
        if let Some((start, end)) = rules.date_order {
            let already_failed = errors.iter().any(|e| e.field == start || e.field == end);
            if !already_failed {
                if let (Some(s), Some(e)) = (date_of(body.get(start)), date_of(body.get(end))) {
                    if e <= s {
                        errors.push(FieldError::new(end, END_AFTER_START));
                    }
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn check_field(body: &mut Map<String, Value>, rule: &FieldRule) -> Option<&'static str> {
    let value = match body.get_mut(rule.field) {
        None | Some(Value::Null) => {
            return match rule.presence {
                Presence::Required(message) => Some(message),
                Presence::Optional => None,
            };
        }
        Some(v) => v,
    };
    if rule.trim {
        if let Value::String(s) = value {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
    }
    rule.checks.iter().find_map(|check| apply(check, value))
}

fn apply(check: &Check, value: &mut Value) -> Option<&'static str> {
    let passed = match *check {
        Check::NotEmpty(_) => match value {
            Value::String(s) => !s.is_empty(),
            _ => true,
        },
        Check::Pattern(regex, _) => value.as_str().is_some_and(|s| regex().is_match(s)),
        Check::OneOf(allowed, _) => value.as_str().is_some_and(|s| allowed.contains(&s)),
        Check::Int { min, max, .. } => match integer(value) {
            Some(n) => {
                *value = Value::from(n);
                min.map_or(true, |m| n >= m) && max.map_or(true, |m| n <= m)
            }
            None => false,
        },
        Check::IsoDate(_) => date_of(Some(value)).is_some(),
        Check::Flag(_) => match value {
            Value::Bool(_) => true,
            other => match integer(other) {
                Some(n @ (0 | 1)) => {
                    *other = Value::from(n);
                    true
                }
                _ => false,
            },
        },
        Check::Text(_) => value.is_string(),
    };
    if passed {
        None
    } else {
        Some(message(check))
    }
}

fn message(check: &Check) -> &'static str {
    match *check {
        Check::NotEmpty(m)
        | Check::Pattern(_, m)
        | Check::OneOf(_, m)
        | Check::IsoDate(m)
        | Check::Flag(m)
        | Check::Text(m) => m,
        Check::Int { message, .. } => message,
    }
}

/// Integer value of a JSON number or numeric string.
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn date_of(value: Option<&Value>) -> Option<NaiveDate> {
    value
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
}

const fn int(min: Option<i64>, max: Option<i64>, message: &'static str) -> Check {
    Check::Int { min, max, message }
}

const NAME_CHARS: Check = Check::Pattern(
    name_regex,
    "Name cannot contain numbers or special characters",
);
const CLASS: Check = Check::OneOf(
    HeroClass::NAMES,
    "Class must be one of: warrior, mage, rogue, healer",
);
const LEVEL: Check = int(Some(1), Some(100), "Level must be between 1 and 100");
const HEALTH: Check = int(Some(1), None, "Health must be a positive number");
const MANA: Check = int(Some(0), None, "Mana must be a non-negative number");
const STRENGTH: Check = int(Some(0), None, "Strength must be a non-negative number");
const INTELLIGENCE: Check = int(Some(0), None, "Intelligence must be a non-negative number");

const fn optional(field: &'static str, trim: bool, checks: &'static [Check]) -> FieldRule {
    FieldRule {
        field,
        trim,
        presence: Presence::Optional,
        checks,
    }
}

const fn required(
    field: &'static str,
    trim: bool,
    message: &'static str,
    checks: &'static [Check],
) -> FieldRule {
    FieldRule {
        field,
        trim,
        presence: Presence::Required(message),
        checks,
    }
}

pub const HERO_CREATE: RuleSet = RuleSet {
    fields: &[
        required(
            "name",
            true,
            "Name is required",
            &[Check::Text("Name is required"), Check::NotEmpty("Name is required"), NAME_CHARS],
        ),
        required(
            "class",
            true,
            "Class is required",
            &[Check::NotEmpty("Class is required"), CLASS],
        ),
        optional("level", false, &[LEVEL]),
        required("health", false, "Health is required", &[HEALTH]),
        required("mana", false, "Mana is required", &[MANA]),
        required("strength", false, "Strength is required", &[STRENGTH]),
        required("intelligence", false, "Intelligence is required", &[INTELLIGENCE]),
    ],
    date_order: None,
};

pub const HERO_UPDATE: RuleSet = RuleSet {
    fields: &[
        optional(
            "name",
            true,
            &[Check::Text("Name cannot be empty"), Check::NotEmpty("Name cannot be empty"), NAME_CHARS],
        ),
        optional("class", true, &[CLASS]),
        optional("level", false, &[LEVEL]),
        optional("health", false, &[HEALTH]),
        optional("mana", false, &[MANA]),
        optional("strength", false, &[STRENGTH]),
        optional("intelligence", false, &[INTELLIGENCE]),
    ],
    date_order: None,
};

const DIFFICULTY: Check = Check::OneOf(
    Difficulty::NAMES,
    "Difficulty must be one of: easy, medium, hard, legendary",
);
const REWARD_GOLD: Check = int(Some(0), None, "Reward gold must be a non-negative number");
const REWARD_XP: Check = int(Some(0), None, "Reward XP must be a non-negative number");
const MIN_LEVEL: Check = int(Some(1), Some(100), "Minimum level must be between 1 and 100");
const START_DATE: Check = Check::IsoDate("Start date must be a valid date (YYYY-MM-DD)");
const END_DATE: Check = Check::IsoDate("End date must be a valid date (YYYY-MM-DD)");
const IS_ACTIVE: Check = Check::Flag("is_active must be true, false, 0 or 1");

pub const QUEST_CREATE: RuleSet = RuleSet {
    fields: &[
        required(
            "title",
            true,
            "Title is required",
            &[Check::Text("Title is required"), Check::NotEmpty("Title is required")],
        ),
        required(
            "description",
            true,
            "Description is required",
            &[Check::Text("Description is required"), Check::NotEmpty("Description is required")],
        ),
        required(
            "difficulty",
            true,
            "Difficulty is required",
            &[Check::NotEmpty("Difficulty is required"), DIFFICULTY],
        ),
        required("reward_gold", false, "Reward gold is required", &[REWARD_GOLD]),
        required("reward_xp", false, "Reward XP is required", &[REWARD_XP]),
        optional("min_level", false, &[MIN_LEVEL]),
        optional("start_date", true, &[START_DATE]),
        optional("end_date", true, &[END_DATE]),
        optional("is_active", false, &[IS_ACTIVE]),
    ],
    date_order: Some(("start_date", "end_date")),
};

pub const QUEST_UPDATE: RuleSet = RuleSet {
    fields: &[
        optional(
            "title",
            true,
            &[Check::Text("Title cannot be empty"), Check::NotEmpty("Title cannot be empty")],
        ),
        optional(
            "description",
            true,
            &[Check::Text("Description cannot be empty"), Check::NotEmpty("Description cannot be empty")],
        ),
        optional("difficulty", true, &[DIFFICULTY]),
        optional("reward_gold", false, &[REWARD_GOLD]),
        optional("reward_xp", false, &[REWARD_XP]),
        optional("min_level", false, &[MIN_LEVEL]),
        optional("start_date", true, &[START_DATE]),
        optional("end_date", true, &[END_DATE]),
        optional("is_active", false, &[IS_ACTIVE]),
    ],
    date_order: Some(("start_date", "end_date")),
};

const DAMAGE: Check = int(Some(0), None, "Damage must be a non-negative number");
const WEIGHT: Check = int(Some(0), None, "Weight must be a non-negative number");
const RARITY: Check = Check::Text("Rarity must be a string");
const HERO_ID: Check = int(Some(1), None, "Hero id must be a positive integer");

pub const ITEM_CREATE: RuleSet = RuleSet {
    fields: &[
        required(
            "name",
            true,
            "Name is required",
            &[Check::Text("Name is required"), Check::NotEmpty("Name is required")],
        ),
        required(
            "type",
            true,
            "Type is required",
            &[Check::Text("Type is required"), Check::NotEmpty("Type is required")],
        ),
        optional("damage", false, &[DAMAGE]),
        required("weight", false, "Weight is required", &[WEIGHT]),
        optional("rarity", true, &[RARITY]),
        optional("hero_id", false, &[HERO_ID]),
    ],
    date_order: None,
};

pub const ITEM_UPDATE: RuleSet = RuleSet {
    fields: &[
        optional(
            "name",
            true,
            &[Check::Text("Name cannot be empty"), Check::NotEmpty("Name cannot be empty")],
        ),
        optional(
            "type",
            true,
            &[Check::Text("Type cannot be empty"), Check::NotEmpty("Type cannot be empty")],
        ),
        optional("damage", false, &[DAMAGE]),
        optional("weight", false, &[WEIGHT]),
        optional("rarity", true, &[RARITY]),
        optional("hero_id", false, &[HERO_ID]),
    ],
    date_order: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    fn details(result: Result<(), AppError>) -> Vec<FieldError> {
        match result {
            Err(AppError::Validation(d)) => d,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn frodo() -> Map<String, Value> {
        body(json!({
            "name": "  Frodo Baggins ",
            "class": "rogue",
            "health": 50,
            "mana": 0,
            "strength": 5,
            "intelligence": "30"
        }))
    }

    #[test]
    fn valid_hero_is_normalized() {
        let mut b = frodo();
        RequestValidator::validate(&mut b, &HERO_CREATE).unwrap();
        assert_eq!(b["name"], "Frodo Baggins");
        assert_eq!(b["intelligence"], 30);
    }

    #[test]
    fn name_with_digits_is_rejected() {
        let mut b = frodo();
        b.insert("name".into(), json!("Bob3"));
        let d = details(RequestValidator::validate(&mut b, &HERO_CREATE));
        assert_eq!(
            d,
            vec![FieldError::new("name", "Name cannot contain numbers or special characters")]
        );
    }

    #[test]
    fn name_regex_is_compiled_once() {
        assert!(std::ptr::eq(name_regex(), name_regex()));
        assert!(name_regex().is_match("Mary-Jane O'Neil"));
        assert!(!name_regex().is_match("R2D2"));
    }

    #[test]
    fn all_violations_are_collected() {
        let mut b = body(json!({ "name": "", "class": "paladin", "level": 0, "health": 0 }));
        let d = details(RequestValidator::validate(&mut b, &HERO_CREATE));
        let fields: Vec<&str> = d.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            ["name", "class", "level", "health", "mana", "strength", "intelligence"]
        );
        assert_eq!(d[0].message, "Name is required");
        assert_eq!(d[1].message, "Class must be one of: warrior, mage, rogue, healer");
        assert_eq!(d[2].message, "Level must be between 1 and 100");
        assert_eq!(d[4].message, "Mana is required");
    }

    #[test]
    fn update_accepts_empty_body() {
        let mut b = Map::new();
        assert!(RequestValidator::validate(&mut b, &HERO_UPDATE).is_ok());
        let mut b = body(json!({ "name": "   " }));
        let d = details(RequestValidator::validate(&mut b, &HERO_UPDATE));
        assert_eq!(d[0].message, "Name cannot be empty");
    }

    #[test]
    fn end_must_follow_start() {
        let mut b = body(json!({
            "title": "Escort", "description": "Walk", "difficulty": "easy",
            "reward_gold": 10, "reward_xp": 5,
            "start_date": "2024-01-10", "end_date": "2024-01-01"
        }));
        let d = details(RequestValidator::validate(&mut b, &QUEST_CREATE));
        assert_eq!(d, vec![FieldError::new("end_date", END_AFTER_START)]);

        b.insert("end_date".into(), json!("2024-01-10"));
        assert!(RequestValidator::validate(&mut b, &QUEST_CREATE).is_err());
        b.insert("end_date".into(), json!("2024-01-11"));
        assert!(RequestValidator::validate(&mut b, &QUEST_CREATE).is_ok());
    }

    #[test]
    fn malformed_dates_and_flags() {
        let mut b = body(json!({ "start_date": "2024-13-01", "is_active": 2 }));
        let d = details(RequestValidator::validate(&mut b, &QUEST_UPDATE));
        assert_eq!(d[0].field, "start_date");
        assert_eq!(d[1].field, "is_active");

        let mut b = body(json!({ "start_date": null, "is_active": false }));
        assert!(RequestValidator::validate(&mut b, &QUEST_UPDATE).is_ok());
    }

    #[test]
    fn item_requires_weight_and_allows_null_owner() {
        let mut b = body(json!({ "name": "Rope", "type": "tool" }));
        let d = details(RequestValidator::validate(&mut b, &ITEM_CREATE));
        assert_eq!(d, vec![FieldError::new("weight", "Weight is required")]);

        let mut b = body(json!({ "hero_id": null, "weight": "3" }));
        RequestValidator::validate(&mut b, &ITEM_UPDATE).unwrap();
        assert_eq!(b["weight"], 3);
    }
}
