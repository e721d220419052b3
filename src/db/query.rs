//! Parameterized SQL construction.
//!
//! Every query the application reads with is assembled here as a [`BuiltQuery`]: a SQL
//! template with positional `?` placeholders plus the values bound to them, in order.
//! Request values only ever travel as bound parameters. The only text spliced into a
//! template is an identifier chosen from a fixed allow-list (see [`WorkoutSort`]).

use sea_orm::{ConnectionTrait, DbBackend, DbErr, FromQueryResult, Statement, Value};

use crate::domain::Intensity;

/// A SQL template and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltQuery {
    /// A query with no bound parameters.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn into_statement(self, backend: DbBackend) -> Statement {
        Statement::from_sql_and_values(backend, self.sql, self.params)
    }

    /// The `WHERE` condition of the template, if any.
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        let (_, rest) = self.sql.split_once(" WHERE ")?;
        Some(
            rest.split_once(" ORDER BY ")
                .map_or(rest, |(condition, _)| condition),
        )
    }

    pub async fn fetch_all<T, C>(self, db: &C) -> Result<Vec<T>, DbErr>
    where
        T: FromQueryResult,
        C: ConnectionTrait,
    {
        let stmt = self.into_statement(db.get_database_backend());
        T::find_by_statement(stmt).all(db).await
    }

    pub async fn fetch_one<T, C>(self, db: &C) -> Result<Option<T>, DbErr>
    where
        T: FromQueryResult,
        C: ConnectionTrait,
    {
        let stmt = self.into_statement(db.get_database_backend());
        T::find_by_statement(stmt).one(db).await
    }
}

/// Accumulates `AND`-joined conditions for a single-table `SELECT`.
#[derive(Debug)]
struct SelectBuilder {
    base: String,
    conditions: Vec<String>,
    params: Vec<Value>,
    order_by: Option<String>,
    limit: Option<i64>,
}

impl SelectBuilder {
    fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            conditions: Vec::new(),
            params: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    fn and_where(&mut self, clause: impl Into<String>, params: impl IntoIterator<Item = Value>) {
        self.conditions.push(clause.into());
        self.params.extend(params);
    }

    fn order_by(&mut self, clause: impl Into<String>) {
        self.order_by = Some(clause.into());
    }

    fn limit(&mut self, limit: i64) {
        self.limit = Some(limit);
    }

    fn build(self) -> BuiltQuery {
        let mut sql = self.base;
        let mut params = self.params;

        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        if let Some(order) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order);
        }
        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(Value::from(limit));
        }

        BuiltQuery { sql, params }
    }
}

/// Columns a workout listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutSort {
    Title,
    DurationMinutes,
    PerformedAt,
}

impl WorkoutSort {
    /// Maps a request value onto the allow-list. Anything else yields `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "title" => Some(Self::Title),
            "duration_minutes" => Some(Self::DurationMinutes),
            "performed_at" => Some(Self::PerformedAt),
            _ => None,
        }
    }

    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::DurationMinutes => "duration_minutes",
            Self::PerformedAt => "performed_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Optional filters for a workout listing. Absent filters contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutFilter {
    pub search: Option<String>,
    pub min_duration: Option<i32>,
    pub max_duration: Option<i32>,
    /// Exclusive upper bound, used by the short-workouts view
    pub shorter_than: Option<i32>,
    pub intensity: Option<Intensity>,
    pub sort: Option<(WorkoutSort, SortDirection)>,
}

impl WorkoutFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    #[must_use]
    pub const fn min_duration(mut self, minutes: i32) -> Self {
        self.min_duration = Some(minutes);
        self
    }

    #[must_use]
    pub const fn max_duration(mut self, minutes: i32) -> Self {
        self.max_duration = Some(minutes);
        self
    }

    #[must_use]
    pub const fn shorter_than(mut self, minutes: i32) -> Self {
        self.shorter_than = Some(minutes);
        self
    }

    #[must_use]
    pub const fn intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = Some(intensity);
        self
    }

    #[must_use]
    pub const fn sort(mut self, key: WorkoutSort, direction: SortDirection) -> Self {
        self.sort = Some((key, direction));
        self
    }

    /// Newest first, the default for browsing pages.
    #[must_use]
    pub const fn newest_first(self) -> Self {
        self.sort(WorkoutSort::PerformedAt, SortDirection::Desc)
    }

    #[must_use]
    pub fn to_query(&self) -> BuiltQuery {
        let mut select = SelectBuilder::new("SELECT * FROM workouts");

        if let Some(text) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = like_pattern(text);
            select.and_where(
                "(LOWER(title) LIKE LOWER(?) ESCAPE '\\' OR LOWER(activity_type) LIKE LOWER(?) ESCAPE '\\')",
                [Value::from(pattern.clone()), Value::from(pattern)],
            );
        }

        if let Some(min) = self.min_duration {
            select.and_where("duration_minutes >= ?", [Value::from(min)]);
        }

        if let Some(max) = self.max_duration {
            select.and_where("duration_minutes <= ?", [Value::from(max)]);
        }

        if let Some(bound) = self.shorter_than {
            select.and_where("duration_minutes < ?", [Value::from(bound)]);
        }

        if let Some(intensity) = self.intensity {
            select.and_where("intensity = ?", [Value::from(intensity.as_str())]);
        }

        if let Some((key, direction)) = self.sort {
            match direction {
                SortDirection::Asc => select.order_by(key.column()),
                SortDirection::Desc => select.order_by(format!("{} DESC", key.column())),
            }
        }

        select.build()
    }
}

/// Wraps `text` for a substring `LIKE` match, escaping the wildcards it contains.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ============================================================================
// Aggregates
// ============================================================================

/// Workouts per calendar month, oldest month first. Rows without a parseable date are skipped.
#[must_use]
pub fn workouts_by_month() -> BuiltQuery {
    BuiltQuery::raw(
        "SELECT strftime('%Y-%m', performed_at) AS month, COUNT(*) AS total \
         FROM workouts \
         WHERE strftime('%Y-%m', performed_at) IS NOT NULL \
         GROUP BY strftime('%Y-%m', performed_at) \
         ORDER BY month ASC",
    )
}

#[must_use]
pub fn workouts_by_type() -> BuiltQuery {
    BuiltQuery::raw(
        "SELECT COALESCE(NULLIF(TRIM(activity_type), ''), 'Unknown') AS activity_type, COUNT(*) AS total \
         FROM workouts \
         GROUP BY COALESCE(NULLIF(TRIM(activity_type), ''), 'Unknown') \
         ORDER BY total DESC, activity_type ASC",
    )
}

#[must_use]
pub fn workouts_by_intensity() -> BuiltQuery {
    BuiltQuery::raw(
        "SELECT COALESCE(NULLIF(TRIM(intensity), ''), 'unspecified') AS intensity, COUNT(*) AS total \
         FROM workouts \
         GROUP BY COALESCE(NULLIF(TRIM(intensity), ''), 'unspecified') \
         ORDER BY total DESC, intensity ASC",
    )
}

#[must_use]
pub fn achievements_newest_first() -> BuiltQuery {
    let mut select = SelectBuilder::new("SELECT * FROM achievements");
    select.order_by("achieved_at DESC, id DESC");
    select.build()
}

#[must_use]
pub fn recent_achievements(limit: i64) -> BuiltQuery {
    let mut select = SelectBuilder::new("SELECT * FROM achievements");
    select.order_by("achieved_at DESC, id DESC");
    select.limit(limit);
    select.build()
}

#[must_use]
pub fn achievement_count() -> BuiltQuery {
    BuiltQuery::raw("SELECT COUNT(*) AS total_count FROM achievements")
}

#[must_use]
pub fn achievements_by_category() -> BuiltQuery {
    BuiltQuery::raw(
        "SELECT COALESCE(NULLIF(TRIM(category), ''), 'Uncategorized') AS category, COUNT(*) AS count \
         FROM achievements \
         GROUP BY COALESCE(NULLIF(TRIM(category), ''), 'Uncategorized') \
         ORDER BY count DESC, category ASC",
    )
}

/// Highest metric per category and unit, for achievements that carry a metric.
#[must_use]
pub fn best_achievement_metrics() -> BuiltQuery {
    BuiltQuery::raw(
        "SELECT COALESCE(NULLIF(TRIM(category), ''), 'Uncategorized') AS category, \
                MAX(metric_value) AS best_value, metric_unit \
         FROM achievements \
         WHERE metric_value IS NOT NULL \
         GROUP BY COALESCE(NULLIF(TRIM(category), ''), 'Uncategorized'), metric_unit \
         ORDER BY category ASC, metric_unit ASC",
    )
}

#[must_use]
pub fn user_directory() -> BuiltQuery {
    BuiltQuery::raw("SELECT id, username, first, last, email FROM users ORDER BY id ASC")
}

#[must_use]
pub fn login_audit_newest_first() -> BuiltQuery {
    let mut select = SelectBuilder::new("SELECT * FROM login_audit");
    select.order_by("created_at DESC, id DESC");
    select.build()
}
