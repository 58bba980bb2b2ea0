//! Provider-family detection and dispatch.
//!
//! The provider identifier is whatever the reverse-engineering step was
//! invoked with (for example `Npgsql.EntityFrameworkCore.PostgreSQL` or
//! `Microsoft.EntityFrameworkCore.SqlServer`). Detection happens once, up
//! front, so an unsupported identifier fails before any connection is
//! opened. Only the Postgres family is implemented; the other recognized
//! families fail at this boundary with a clear not-implemented error
//! instead of stubbing deep query paths.

use crate::error::{SchemaError, SchemaResult};

/// Known provider families, detected by substring match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFamily {
    Postgres,
    SqlServer,
    MySql,
    Sqlite,
}

impl ProviderFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "PostgreSQL",
            Self::SqlServer => "SQL Server",
            Self::MySql => "MySQL",
            Self::Sqlite => "SQLite",
        }
    }
}

/// Detect the provider family from an identifier string.
///
/// Matching is case-insensitive and by substring, so both package-style
/// identifiers (`Npgsql.EntityFrameworkCore.PostgreSQL`) and short names
/// (`postgres`) work.
pub fn detect_provider(identifier: &str) -> SchemaResult<ProviderFamily> {
    let lowered = identifier.to_lowercase();

    if lowered.contains("npgsql") || lowered.contains("postgres") {
        Ok(ProviderFamily::Postgres)
    } else if lowered.contains("sqlserver") || lowered.contains("sqlclient") {
        Ok(ProviderFamily::SqlServer)
    } else if lowered.contains("mysql") {
        Ok(ProviderFamily::MySql)
    } else if lowered.contains("sqlite") {
        Ok(ProviderFamily::Sqlite)
    } else {
        Err(SchemaError::UnsupportedProvider(identifier.to_string()))
    }
}

/// Fail fast unless the detected family is the implemented one.
pub fn require_postgres(family: ProviderFamily) -> SchemaResult<()> {
    match family {
        ProviderFamily::Postgres => Ok(()),
        other => Err(SchemaError::NotImplemented(other.as_str().to_string())),
    }
}
