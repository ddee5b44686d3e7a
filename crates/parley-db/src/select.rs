use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqliteConnection, SqliteRow};
use sqlx::{FromRow, Sqlite};

use crate::error::Result;

/// Page size and zero based page index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub page: u32,
}

impl Page {
    pub fn new(limit: u32, page: u32) -> Self {
        Self { limit, page }
    }

    pub fn first(limit: u32) -> Self {
        Self { limit, page: 0 }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.limit).saturating_mul(i64::from(self.page))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { limit: 20, page: 0 }
    }
}

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Bind {
    Text(String),
    Int(i64),
}

impl Bind {
    pub fn text(value: impl Into<String>) -> Self {
        Bind::Text(value.into())
    }

    fn apply<'q, O>(
        self,
        query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    ) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
        match self {
            Bind::Text(value) => query.bind(value),
            Bind::Int(value) => query.bind(value),
        }
    }
}

/// A SELECT assembled from a fixed base statement and a list of predicate
/// clauses. Caller data only ever reaches SQLite through `?` placeholders.
#[derive(Debug, Clone)]
pub(crate) struct Select {
    base: &'static str,
    clauses: Vec<String>,
    binds: Vec<Bind>,
    order_by: Option<&'static str>,
    page: Option<Page>,
}

impl Select {
    pub fn new(base: &'static str) -> Self {
        Self {
            base,
            clauses: Vec::new(),
            binds: Vec::new(),
            order_by: None,
            page: None,
        }
    }

    /// Add a predicate ANDed with the others. `binds` fill its placeholders
    /// left to right.
    pub fn filter(mut self, clause: &str, binds: impl IntoIterator<Item = Bind>) -> Self {
        let start = self.binds.len();
        self.binds.extend(binds);
        debug_assert_eq!(
            clause.matches('?').count(),
            self.binds.len() - start,
            "placeholder count mismatch in `{clause}`"
        );
        self.clauses.push(clause.to_string());
        self
    }

    /// Add a predicate that takes no parameters.
    pub fn require(self, clause: &'static str) -> Self {
        self.filter(clause, Vec::new())
    }

    pub fn order_by(mut self, ordering: &'static str) -> Self {
        self.order_by = Some(ordering);
        self
    }

    pub fn paginate(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(self, limit: u32) -> Self {
        self.paginate(Page::first(limit))
    }

    pub fn build(&self) -> (String, Vec<Bind>) {
        let mut sql = self.base.trim().to_string();
        let mut binds = self.binds.clone();

        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        if let Some(ordering) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(ordering);
        }
        if let Some(page) = self.page {
            sql.push_str(" LIMIT ? OFFSET ?");
            binds.push(Bind::Int(i64::from(page.limit)));
            binds.push(Bind::Int(page.offset()));
        }

        (sql, binds)
    }

    pub async fn fetch_all<O>(&self, conn: &mut SqliteConnection) -> Result<Vec<O>>
    where
        O: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let (sql, binds) = self.build();
        tracing::trace!(%sql, "fetch_all");
        let query = binds
            .into_iter()
            .fold(sqlx::query_as::<_, O>(&sql), |query, bind| bind.apply(query));
        Ok(query.fetch_all(conn).await?)
    }

    pub async fn fetch_optional<O>(&self, conn: &mut SqliteConnection) -> Result<Option<O>>
    where
        O: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let (sql, binds) = self.build();
        tracing::trace!(%sql, "fetch_optional");
        let query = binds
            .into_iter()
            .fold(sqlx::query_as::<_, O>(&sql), |query, bind| bind.apply(query));
        Ok(query.fetch_optional(conn).await?)
    }
}
