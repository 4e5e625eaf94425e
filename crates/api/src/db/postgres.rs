//! `PostgreSQL` record store backend.
//!
//! Each collection is a `(id TEXT PRIMARY KEY, doc JSONB NOT NULL)` table
//! created by `store-hub-cli migrate`. Filters translate to `WHERE`
//! clauses over jsonb path extractions; partial updates become nested
//! `jsonb_set` calls so only the named fields are rewritten.
//!
//! All queries are built at runtime with bind parameters; table names are
//! the compile-time collection constants from [`Record`] implementations,
//! never caller input.

use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{FieldPatch, Filter, Record, RecordStore, Sort, SortDirection, StoreError};

/// Record store backed by `PostgreSQL` JSONB tables.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool (readiness checks, migrations).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Split a dotted field path into a `text[]` jsonb path.
fn pg_path(path: &str) -> Vec<String> {
    path.split('.').map(str::to_owned).collect()
}

/// Escape `LIKE` metacharacters in a user-supplied needle.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append the SQL condition for a filter to the query.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::All => {
            qb.push("TRUE");
        }
        Filter::Eq(path, value) => {
            qb.push("doc #> ");
            qb.push_bind(pg_path(path));
            qb.push(" = ");
            qb.push_bind(value.clone());
        }
        Filter::Contains(path, needle) => {
            qb.push("doc #>> ");
            qb.push_bind(pg_path(path));
            qb.push(" ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(needle)));
            qb.push(" ESCAPE '\\'");
        }
        Filter::Gte(path, bound) => {
            qb.push("(doc #>> ");
            qb.push_bind(pg_path(path));
            qb.push(")::float8 >= ");
            qb.push_bind(*bound);
        }
        Filter::Lte(path, bound) => {
            qb.push("(doc #>> ");
            qb.push_bind(pg_path(path));
            qb.push(")::float8 <= ");
            qb.push_bind(*bound);
        }
        Filter::And(filters) => {
            if filters.is_empty() {
                qb.push("TRUE");
                return;
            }
            for (i, inner) in filters.iter().enumerate() {
                if i > 0 {
                    qb.push(" AND ");
                }
                qb.push("(");
                push_filter(qb, inner);
                qb.push(")");
            }
        }
    }
}

/// Append an `ORDER BY` clause for a sort directive.
///
/// Documents missing the sort field extract to SQL `NULL`; the explicit
/// `NULLS` placement treats a missing field as smaller than any value,
/// matching the in-memory comparator (Postgres defaults to `NULLS LAST`
/// on `ASC`).
fn push_sort(qb: &mut QueryBuilder<'_, Postgres>, sort: &Sort) {
    qb.push(" ORDER BY doc #> ");
    qb.push_bind(pg_path(&sort.path));
    qb.push(match sort.direction {
        SortDirection::Ascending => " ASC NULLS FIRST",
        SortDirection::Descending => " DESC NULLS LAST",
    });
}

fn decode<R: Record>(rows: Vec<(Value,)>) -> Result<Vec<R>, StoreError> {
    rows.into_iter()
        .map(|(doc,)| {
            serde_json::from_value(doc).map_err(|e| StoreError::corrupt(R::COLLECTION, &e))
        })
        .collect()
}

impl RecordStore for PgStore {
    async fn find_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let sql = format!("SELECT doc FROM {}", R::COLLECTION);
        let rows: Vec<(Value,)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        decode::<R>(rows)
    }

    async fn find_by_id<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", R::COLLECTION);
        let row: Option<(Value,)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(doc,)| {
            serde_json::from_value(doc).map_err(|e| StoreError::corrupt(R::COLLECTION, &e))
        })
        .transpose()
    }

    async fn find_one<R: Record>(&self, filter: &Filter) -> Result<Option<R>, StoreError> {
        let mut qb =
            QueryBuilder::new(format!("SELECT doc FROM {} WHERE ", R::COLLECTION));
        push_filter(&mut qb, filter);
        qb.push(" LIMIT 1");

        let row: Option<(Value,)> = qb.build_query_as().fetch_optional(&self.pool).await?;
        row.map(|(doc,)| {
            serde_json::from_value(doc).map_err(|e| StoreError::corrupt(R::COLLECTION, &e))
        })
        .transpose()
    }

    async fn find_many<R: Record>(
        &self,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<R>, StoreError> {
        let mut qb =
            QueryBuilder::new(format!("SELECT doc FROM {} WHERE ", R::COLLECTION));
        push_filter(&mut qb, filter);
        if let Some(sort) = sort {
            push_sort(&mut qb, sort);
        }

        let rows: Vec<(Value,)> = qb.build_query_as().fetch_all(&self.pool).await?;
        decode::<R>(rows)
    }

    async fn insert<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        let doc =
            serde_json::to_value(record).map_err(|e| StoreError::corrupt(R::COLLECTION, &e))?;
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", R::COLLECTION);

        sqlx::query(&sql)
            .bind(record.record_id())
            .bind(doc)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return StoreError::DuplicateId(record.record_id().to_owned());
                }
                StoreError::Database(e)
            })?;

        Ok(())
    }

    async fn update_fields<R: Record>(
        &self,
        id: &str,
        patch: &FieldPatch,
    ) -> Result<u64, StoreError> {
        if patch.is_empty() {
            return Ok(0);
        }

        // Nest one jsonb_set per field, innermost applied first.
        let mut qb = QueryBuilder::new(format!("UPDATE {} SET doc = ", R::COLLECTION));
        for _ in 0..patch.len() {
            qb.push("jsonb_set(");
        }
        qb.push("doc");
        for (path, value) in patch.iter() {
            qb.push(", ");
            qb.push_bind(pg_path(path));
            qb.push(", ");
            qb.push_bind(value.clone());
            qb.push(", true)");
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_id<R: Record>(&self, id: &str) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", R::COLLECTION);
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
