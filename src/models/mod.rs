//! Entity records, creation payloads, patches and search criteria.

pub mod hero;
pub mod item;
pub mod quest;

pub use hero::*;
pub use item::*;
pub use quest::*;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// A stored enum column held a value outside its variant set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Current time at the precision timestamps are stored with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Next `updated_at` for a record last touched at `previous`. Always strictly later.
pub fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
/// Use with `#[serde(default, deserialize_with = "nullable")]`.
pub(crate) fn nullable<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_is_strictly_increasing() {
        let future = now() + Duration::seconds(30);
        assert_eq!(touch(future), future + Duration::microseconds(1));
        let past = now() - Duration::seconds(30);
        assert!(touch(past) > past);
    }
}
