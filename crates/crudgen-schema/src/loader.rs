//! Per-table primary-key and column metadata loading.
//!
//! Every function here degrades gracefully: a query failure or an empty
//! result for an individual table is warned and reduced to absent/empty
//! metadata, never propagated. Only the inventory load (see
//! [`crate::inventory`]) is allowed to abort a run.

use crate::client::{CatalogClient, RowExt};
use crate::error::SchemaResult;
use crate::ident::to_identifier;
use crate::inventory::TableRef;
use crate::report::Reporter;
use crate::type_map::{NativeColumn, map_clr_type};

/// One column of a resolved table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Physical column name.
    pub name: String,
    /// Mapped CLR type name (nullable variants included).
    pub clr_type: String,
    /// Whether the database column accepts null.
    pub is_nullable: bool,
    /// Sanitized identifier safe for generated code.
    pub cs_name: String,
}

/// One resolved physical table or view, ready for projection.
///
/// Constructed once per resolved entity and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// Logical/singular name used for generated type names.
    pub entity_name: String,
    /// Physical table/view name.
    pub name: String,
    /// Owning schema.
    pub schema: String,
    /// Single primary-key column, or `None` for keyless tables.
    /// Composite keys collapse to the first key column (documented
    /// limitation).
    pub key_column: Option<String>,
    /// Columns in physical ordinal order.
    pub columns: Vec<ColumnInfo>,
    /// Views are excluded from CRUD generation downstream.
    pub is_view: bool,
}

/// Load the first primary-key column of `schema.table`.
///
/// Returns `None` for keyless tables and for query failures (warned).
pub async fn load_primary_key<C: CatalogClient>(
    client: &C,
    reporter: &dyn Reporter,
    schema: &str,
    table: &str,
) -> Option<String> {
    match query_primary_key(client, schema, table).await {
        Ok(key) => key,
        Err(e) => {
            reporter.warn(&format!(
                "primary key lookup failed for {schema}.{table}: {e} (treating as keyless)"
            ));
            None
        }
    }
}

async fn query_primary_key<C: CatalogClient>(
    client: &C,
    schema: &str,
    table: &str,
) -> SchemaResult<Option<String>> {
    let rows = client
        .query(
            r#"
SELECT kcu.column_name
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON kcu.constraint_name = tc.constraint_name
 AND kcu.constraint_schema = tc.constraint_schema
WHERE tc.constraint_type = 'PRIMARY KEY'
  AND tc.table_schema = $1
  AND tc.table_name = $2
ORDER BY kcu.ordinal_position
"#,
            &[&schema, &table],
        )
        .await?;

    match rows.first() {
        Some(row) => Ok(Some(row.try_get_column::<String>("column_name")?)),
        None => Ok(None),
    }
}

/// Load the columns of `schema.table` in ordinal order.
///
/// Primary source is `information_schema.columns`; if that yields zero
/// rows (some permission setups hide it), the engine-native
/// `pg_catalog` path is tried. Both empty is warned and returns an empty
/// sequence rather than failing the entity.
pub async fn load_columns<C: CatalogClient>(
    client: &C,
    reporter: &dyn Reporter,
    schema: &str,
    table: &str,
) -> Vec<ColumnInfo> {
    let standard = query_columns_standard(client, schema, table).await;
    let native = match &standard {
        Ok(rows) if rows.is_empty() => Some(query_columns_native(client, schema, table).await),
        _ => None,
    };
    select_columns(reporter, schema, table, standard, native)
}

/// Pick the column source: standard rows when present, otherwise the
/// native-catalog rows attempted in their stead. Query failures and a
/// doubly-empty outcome are warned and reduced to an empty column set.
fn select_columns(
    reporter: &dyn Reporter,
    schema: &str,
    table: &str,
    standard: SchemaResult<Vec<(String, NativeColumn)>>,
    native: Option<SchemaResult<Vec<(String, NativeColumn)>>>,
) -> Vec<ColumnInfo> {
    let rows = match (standard, native) {
        (Ok(rows), None) => rows,
        (Ok(_), Some(Ok(rows))) => rows,
        (Ok(_), Some(Err(e))) => {
            reporter.warn(&format!(
                "native catalog column query failed for {schema}.{table}: {e}"
            ));
            Vec::new()
        }
        (Err(e), _) => {
            reporter.warn(&format!(
                "column query failed for {schema}.{table}: {e}"
            ));
            Vec::new()
        }
    };

    if rows.is_empty() {
        reporter.warn(&format!("no column metadata for {schema}.{table}"));
    }

    rows.into_iter()
        .map(|(name, col)| ColumnInfo {
            clr_type: map_clr_type(&col),
            is_nullable: col.is_nullable,
            cs_name: to_identifier(&name),
            name,
        })
        .collect()
}

async fn query_columns_standard<C: CatalogClient>(
    client: &C,
    schema: &str,
    table: &str,
) -> SchemaResult<Vec<(String, NativeColumn)>> {
    let rows = client
        .query(
            r#"
SELECT column_name, data_type, is_nullable,
       character_maximum_length, numeric_precision, numeric_scale
FROM information_schema.columns
WHERE table_schema = $1
  AND table_name = $2
ORDER BY ordinal_position
"#,
            &[&schema, &table],
        )
        .await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.try_get_column("column_name")?;
        let data_type: String = row.try_get_column("data_type")?;
        let is_nullable: String = row.try_get_column("is_nullable")?;
        let max_length: Option<i32> = row.try_get_column("character_maximum_length")?;
        let precision: Option<i32> = row.try_get_column("numeric_precision")?;
        let scale: Option<i32> = row.try_get_column("numeric_scale")?;

        out.push((
            name,
            NativeColumn {
                type_name: data_type,
                is_nullable: is_nullable.eq_ignore_ascii_case("YES"),
                max_length,
                precision,
                scale,
            },
        ));
    }
    Ok(out)
}

async fn query_columns_native<C: CatalogClient>(
    client: &C,
    schema: &str,
    table: &str,
) -> SchemaResult<Vec<(String, NativeColumn)>> {
    let rows = client
        .query(
            r#"
SELECT
  a.attname AS column_name,
  pg_catalog.format_type(a.atttypid, a.atttypmod) AS data_type,
  NOT a.attnotnull AS is_nullable
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid
WHERE n.nspname = $1
  AND c.relname = $2
  AND a.attnum > 0
  AND NOT a.attisdropped
ORDER BY a.attnum
"#,
            &[&schema, &table],
        )
        .await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.try_get_column("column_name")?;
        let data_type: String = row.try_get_column("data_type")?;
        let is_nullable: bool = row.try_get_column("is_nullable")?;

        // format_type carries the typmod inline, e.g. `character(1)`.
        let max_length = parse_char_length(&data_type);
        out.push((
            name,
            NativeColumn {
                type_name: data_type,
                is_nullable,
                max_length,
                precision: None,
                scale: None,
            },
        ));
    }
    Ok(out)
}

/// Extract the declared length from character typmods such as
/// `character(1)` or `character varying(255)`.
fn parse_char_length(data_type: &str) -> Option<i32> {
    let lower = data_type.trim().to_lowercase();
    if !lower.starts_with("char") {
        return None;
    }
    let start = lower.find('(')?;
    let end = lower[start..].find(')')? + start;
    lower[start + 1..end].trim().parse().ok()
}

/// Assemble the immutable [`TableInfo`] for a resolved inventory entry.
pub async fn load_table<C: CatalogClient>(
    client: &C,
    reporter: &dyn Reporter,
    entity_name: &str,
    table: &TableRef,
) -> TableInfo {
    let key_column = load_primary_key(client, reporter, &table.schema, &table.name).await;
    let columns = load_columns(client, reporter, &table.schema, &table.name).await;

    TableInfo {
        entity_name: entity_name.to_string(),
        name: table.name.clone(),
        schema: table.schema.clone(),
        key_column,
        columns,
        is_view: table.is_view,
    }
}
