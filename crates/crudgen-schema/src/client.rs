//! Database client trait for crudgen-schema
//!
//! This module defines a minimal trait for catalog queries, keeping the
//! resolution and loading logic independent of a concrete connection type.

use crate::error::{SchemaError, SchemaResult};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A trait for types that can execute PostgreSQL catalog queries.
///
/// This is implemented for `tokio_postgres::Client` and
/// `tokio_postgres::Transaction`.
#[async_trait::async_trait]
pub trait CatalogClient: Sync {
    /// Execute a query and return all rows.
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SchemaResult<Vec<Row>>;

    /// Execute a query and return exactly one row.
    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SchemaResult<Row>;
}

#[async_trait::async_trait]
impl CatalogClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SchemaResult<Vec<Row>> {
        self.query(sql, params).await.map_err(SchemaError::from)
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SchemaResult<Row> {
        self.query_one(sql, params).await.map_err(SchemaError::from)
    }
}

#[async_trait::async_trait]
impl<'a> CatalogClient for tokio_postgres::Transaction<'a> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SchemaResult<Vec<Row>> {
        self.query(sql, params).await.map_err(SchemaError::from)
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> SchemaResult<Row> {
        self.query_one(sql, params).await.map_err(SchemaError::from)
    }
}

/// Extension trait for accessing row columns with better error handling.
pub trait RowExt {
    /// Get a column value by name, returning a SchemaError on failure.
    fn try_get_column<'a, T>(&'a self, column: &str) -> SchemaResult<T>
    where
        T: tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<'a, T>(&'a self, column: &str) -> SchemaResult<T>
    where
        T: tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| SchemaError::decode(column, e.to_string()))
    }
}
