//! Builds parameterized SELECT, COUNT, SUM, INSERT, UPDATE, DELETE from a table definition.
//! Column and table names only ever come from `TableDef`; user input is bound as `?N` parameters.

use crate::sql::SqlValue;

/// Primary key column shared by every table.
pub const PRIMARY_KEY: &str = "id";

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Static description of one table: its columns (in row order) and the columns a client may sort by.
#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub sortable: &'static [&'static str],
}

impl TableDef {
    fn has_column(&self, col: &str) -> bool {
        self.columns.contains(&col)
    }
}

/// Quote identifier for SQLite (safe: only from table definitions).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_list(table: &TableDef) -> String {
    table
        .columns
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Ascending unless the value is exactly "desc", ignoring case.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some(s) if s.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sort {
    pub field: &'static str,
    pub order: SortOrder,
}

impl Sort {
    /// Resolve a requested sort against the table's allow-list. Unknown fields fall back to the primary key.
    pub fn resolve(table: &TableDef, field: Option<&str>, order: Option<&str>) -> Self {
        let field = field
            .and_then(|f| table.sortable.iter().copied().find(|s| *s == f))
            .unwrap_or(PRIMARY_KEY);
        Sort {
            field,
            order: SortOrder::parse(order),
        }
    }

    pub fn by_id() -> Self {
        Sort {
            field: PRIMARY_KEY,
            order: SortOrder::Asc,
        }
    }

    fn clause(&self) -> String {
        let mut out = format!(" ORDER BY {} {}", quoted(self.field), self.order.keyword());
        if self.field != PRIMARY_KEY {
            out.push_str(&format!(", {} ASC", quoted(PRIMARY_KEY)));
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    /// Non-positive limits use the default, limits above `MAX_LIMIT` are capped, negative offsets become 0.
    pub fn new(limit: i64, offset: i64) -> Self {
        let limit = if limit <= 0 {
            DEFAULT_LIMIT
        } else {
            limit.min(MAX_LIMIT)
        };
        Page {
            limit,
            offset: offset.max(0),
        }
    }

    /// Lenient parse of raw query values; anything that is not an integer uses the default.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = limit.and_then(|s| s.trim().parse().ok()).unwrap_or(DEFAULT_LIMIT);
        let offset = offset.and_then(|s| s.trim().parse().ok()).unwrap_or(0);
        Page::new(limit, offset)
    }
}

/// One WHERE condition. Columns are static; values are bound.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Case-insensitive substring match.
    Contains(&'static str, String),
    Equals(&'static str, SqlValue),
    NotEquals(&'static str, SqlValue),
    AtLeast(&'static str, SqlValue),
    AtMost(&'static str, SqlValue),
    IsTrue(&'static str),
}

impl Filter {
    fn column(&self) -> &'static str {
        match self {
            Filter::Contains(c, _)
            | Filter::Equals(c, _)
            | Filter::NotEquals(c, _)
            | Filter::AtLeast(c, _)
            | Filter::AtMost(c, _)
            | Filter::IsTrue(c) => c,
        }
    }
}

/// Escape LIKE wildcards so user text matches literally.
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn where_clause(table: &TableDef, filters: &[Filter], q: &mut QueryBuf) -> String {
    let mut parts = Vec::new();
    for f in filters {
        if !table.has_column(f.column()) {
            continue;
        }
        let col = quoted(f.column());
        let part = match f {
            Filter::Contains(_, text) => {
                let n = q.push_param(SqlValue::Text(format!("%{}%", escape_like(text))));
                format!("{} LIKE ?{} ESCAPE '\\'", col, n)
            }
            Filter::Equals(_, v) => format!("{} = ?{}", col, q.push_param(v.clone())),
            Filter::NotEquals(_, v) => format!("{} <> ?{}", col, q.push_param(v.clone())),
            Filter::AtLeast(_, v) => format!("{} >= ?{}", col, q.push_param(v.clone())),
            Filter::AtMost(_, v) => format!("{} <= ?{}", col, q.push_param(v.clone())),
            Filter::IsTrue(_) => format!("{} = 1", col),
        };
        parts.push(part);
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// SELECT by primary key.
pub fn select_by_id(table: &TableDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(SqlValue::Int(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ?{}",
        column_list(table),
        quoted(table.name),
        quoted(PRIMARY_KEY),
        n
    );
    q
}

/// SELECT with AND-combined filters, allow-listed ORDER BY, LIMIT/OFFSET.
pub fn select_page(table: &TableDef, filters: &[Filter], sort: Sort, page: Page) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(table, filters, &mut q);
    let limit = q.push_param(SqlValue::Int(page.limit));
    let offset = q.push_param(SqlValue::Int(page.offset));
    q.sql = format!(
        "SELECT {} FROM {}{}{} LIMIT ?{} OFFSET ?{}",
        column_list(table),
        quoted(table.name),
        where_sql,
        sort.clause(),
        limit,
        offset
    );
    q
}

/// SELECT without pagination, ordered by primary key.
pub fn select_all(table: &TableDef, filters: &[Filter]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(table, filters, &mut q);
    q.sql = format!(
        "SELECT {} FROM {}{}{}",
        column_list(table),
        quoted(table.name),
        where_sql,
        Sort::by_id().clause()
    );
    q
}

pub fn count(table: &TableDef, filters: &[Filter]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(table, filters, &mut q);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", quoted(table.name), where_sql);
    q
}

/// SUM of an integer column, 0 when no rows match.
pub fn sum(table: &TableDef, column: &'static str, filters: &[Filter]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(table, filters, &mut q);
    q.sql = format!(
        "SELECT COALESCE(SUM({}), 0) FROM {}{}",
        quoted(column),
        quoted(table.name),
        where_sql
    );
    q
}

/// INSERT the given columns; unknown columns and the primary key are skipped. Returns the full row.
pub fn insert(table: &TableDef, values: &[(&'static str, SqlValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (col, v) in values {
        if *col == PRIMARY_KEY || !table.has_column(col) {
            continue;
        }
        let n = q.push_param(v.clone());
        cols.push(quoted(col));
        placeholders.push(format!("?{}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", "),
        column_list(table)
    );
    q
}

/// UPDATE by id: SET only the given columns. Returns the full row, or no row when the id is absent.
pub fn update(table: &TableDef, id: i64, values: &[(&'static str, SqlValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (col, v) in values {
        if *col == PRIMARY_KEY || !table.has_column(col) {
            continue;
        }
        let n = q.push_param(v.clone());
        sets.push(format!("{} = ?{}", quoted(col), n));
    }
    if sets.is_empty() {
        return select_by_id(table, id);
    }
    let id_param = q.push_param(SqlValue::Int(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ?{} RETURNING {}",
        quoted(table.name),
        sets.join(", "),
        quoted(PRIMARY_KEY),
        id_param,
        column_list(table)
    );
    q
}

/// DELETE by id.
pub fn delete(table: &TableDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(SqlValue::Int(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ?{}",
        quoted(table.name),
        quoted(PRIMARY_KEY),
        n
    );
    q
}
