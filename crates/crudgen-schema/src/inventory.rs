//! Full table/view inventory for the selected schemas.
//!
//! Loaded once per run and cached for all resolution lookups, so resolving
//! N entities costs one enumeration query instead of N catalog probes.

use crate::client::{CatalogClient, RowExt};
use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};

/// One physical table or view known to the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
    pub is_view: bool,
}

/// The cached enumeration of tables/views, in stable catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInventory {
    pub tables: Vec<TableRef>,
}

impl TableInventory {
    pub fn new(tables: Vec<TableRef>) -> Self {
        Self { tables }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

/// Enumerate every base table and view in `schemas`.
///
/// The ORDER BY fixes inventory order, which the resolver's final
/// tie-break depends on.
pub async fn load_inventory<C: CatalogClient>(
    client: &C,
    schemas: &[String],
) -> SchemaResult<TableInventory> {
    let rows = client
        .query(
            r#"
SELECT table_schema, table_name, table_type
FROM information_schema.tables
WHERE table_type IN ('BASE TABLE', 'VIEW')
  AND table_schema = ANY($1::text[])
ORDER BY table_schema, table_name
"#,
            &[&schemas],
        )
        .await?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in rows {
        let schema: String = row.try_get_column("table_schema")?;
        let name: String = row.try_get_column("table_name")?;
        let table_type: String = row.try_get_column("table_type")?;
        tables.push(TableRef {
            schema,
            name,
            is_view: table_type == "VIEW",
        });
    }

    if tables.is_empty() {
        return Err(SchemaError::Other(
            "No tables found in the selected schemas".to_string(),
        ));
    }

    Ok(TableInventory { tables })
}

/// Fingerprint of the relation set in `schemas`, used to decide whether a
/// cached inventory is still current.
pub async fn inventory_fingerprint<C: CatalogClient>(
    client: &C,
    schemas: &[String],
) -> SchemaResult<String> {
    let row = client
        .query_one(
            r#"
SELECT
  md5(
    COALESCE(
      string_agg(
        concat_ws('|', n.nspname, c.relname, c.relkind::text),
        E'\n' ORDER BY n.nspname, c.relname
      ),
      ''
    )
  ) AS fingerprint
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE c.relkind IN ('r', 'p', 'v')
  AND n.nspname = ANY($1::text[])
"#,
            &[&schemas],
        )
        .await?;

    row.try_get_column::<String>("fingerprint")
}
