//! crudgen-schema
//!
//! Schema discovery and name reconciliation for crudgen.
//!
//! Given a live PostgreSQL connection, this crate enumerates the physical
//! tables and views of the selected schemas ("the inventory"), matches
//! logical entity names against that inventory (coping with pluralization
//! and schema ambiguity), and loads per-table primary-key and column
//! metadata mapped to CLR type names.
//!
//! The inventory can be cached into a local directory (default:
//! `./.crudgen/`) so subsequent runs skip the enumeration query when the
//! catalog fingerprint is unchanged.
//!
//! # Example
//!
//! ```ignore
//! use crudgen_schema::{resolve, variations, TableInventory, TableRef};
//!
//! let inventory = TableInventory::new(vec![
//!     TableRef { schema: "public".into(), name: "products".into(), is_view: false },
//! ]);
//!
//! // "Product" resolves to "products" through a pluralization variation.
//! let hit = resolve(&inventory, "", "Product").unwrap();
//! assert_eq!(hit.name, "products");
//! assert!(variations("Category").contains(&"Categories".to_string()));
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod ident;
pub mod inventory;
pub mod loader;
pub mod pluralize;
pub mod provider;
pub mod report;
pub mod resolve;
pub mod type_map;

pub use cache::{InventoryCache, InventoryCacheConfig, InventoryCacheLoad};
pub use client::{CatalogClient, RowExt};
pub use error::{SchemaError, SchemaResult};
pub use ident::to_identifier;
pub use inventory::{TableInventory, TableRef, load_inventory};
pub use loader::{ColumnInfo, TableInfo, load_columns, load_primary_key, load_table};
pub use pluralize::variations;
pub use provider::{ProviderFamily, detect_provider, require_postgres};
pub use report::{NullReporter, Reporter};
pub use resolve::resolve;
pub use type_map::{NativeColumn, map_clr_type};
