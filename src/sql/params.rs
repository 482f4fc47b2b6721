//! Values bound to SQLite statements.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::encode::{Encode, IsNull};
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::Database;

/// Fixed-width UTC timestamp text. Lexical order equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// A value that can be bound to a SQLite query.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Int(n)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        SqlValue::Bool(b)
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(d: NaiveDate) -> Self {
        SqlValue::Date(d)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(t: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(t)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

impl<'q> Encode<'q, Sqlite> for SqlValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Int(n) => <i64 as Encode<'q, Sqlite>>::encode_by_ref(n, buf),
            SqlValue::Bool(b) => <bool as Encode<'q, Sqlite>>::encode_by_ref(b, buf),
            SqlValue::Text(s) => <String as Encode<'q, Sqlite>>::encode_by_ref(s, buf),
            SqlValue::Date(d) => <NaiveDate as Encode<'q, Sqlite>>::encode_by_ref(d, buf),
            SqlValue::Timestamp(t) => {
                <String as Encode<'q, Sqlite>>::encode(format_timestamp(t), buf)
            }
        }
    }
}

impl sqlx::Type<Sqlite> for SqlValue {
    fn type_info() -> SqliteTypeInfo {
        <str as sqlx::Type<Sqlite>>::type_info()
    }

    fn compatible(_ty: &SqliteTypeInfo) -> bool {
        true
    }
}
