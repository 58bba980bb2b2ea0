//! Native PostgreSQL type name to CLR type name mapping.

/// Raw column facts as reported by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeColumn {
    pub type_name: String,
    pub is_nullable: bool,
    pub max_length: Option<i32>,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
}

/// Map a native column to a CLR type name.
///
/// Total and pure: unrecognized native types fall back to `string`, which
/// is lossy but never fails. Nullable columns get a `?` suffix unless the
/// mapped type is `string` or `byte[]` (reference/array types are already
/// nullable and are never decorated).
pub fn map_clr_type(column: &NativeColumn) -> String {
    let normalized = normalize_native_type(&column.type_name);

    let base = match normalized.as_str() {
        "bool" | "boolean" => "bool",

        "int2" | "smallint" | "smallserial" => "short",
        "int4" | "integer" | "serial" => "int",
        "int8" | "bigint" | "bigserial" => "long",

        "float4" | "real" => "float",
        "float8" | "double precision" => "double",
        "numeric" | "decimal" | "money" => "decimal",

        "char" | "character" if column.max_length == Some(1) => "char",
        "text" | "varchar" | "char" | "character" | "citext" | "name" => "string",

        "uuid" => "Guid",
        "json" | "jsonb" | "xml" => "string",

        "timestamptz" => "DateTimeOffset",
        "timestamp" => "DateTime",
        "date" => "DateOnly",
        "time" | "timetz" => "TimeOnly",
        "interval" => "TimeSpan",

        "bytea" => "byte[]",

        // Conservative default: compiles everywhere, caller can override
        // the generated DTO by hand if it matters.
        _ => "string",
    };

    if column.is_nullable && base != "string" && base != "byte[]" {
        format!("{base}?")
    } else {
        base.to_string()
    }
}

/// Lowercase, remove `(...)` typmods, compress spaces, normalize synonyms.
pub fn normalize_native_type(native: &str) -> String {
    let mut s = native.trim().to_lowercase();

    // Remove typmods: `varchar(255)`, `timestamp(3) with time zone`, `numeric(10,2)`, ...
    while let Some(start) = s.find('(') {
        let Some(end) = s[start..].find(')') else {
            break;
        };
        s.replace_range(start..start + end + 1, "");
    }

    let s = s
        .split_whitespace()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    match s.as_str() {
        "character varying" => "varchar".to_string(),
        "timestamp with time zone" => "timestamptz".to_string(),
        "timestamp without time zone" => "timestamp".to_string(),
        "time with time zone" => "timetz".to_string(),
        "time without time zone" => "time".to_string(),
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(ty: &str, nullable: bool) -> NativeColumn {
        NativeColumn {
            type_name: ty.to_string(),
            is_nullable: nullable,
            ..Default::default()
        }
    }

    #[test]
    fn normalize_strips_typmods() {
        assert_eq!(normalize_native_type("character varying(255)"), "varchar");
        assert_eq!(
            normalize_native_type("timestamp(3) with time zone"),
            "timestamptz"
        );
        assert_eq!(normalize_native_type("NUMERIC(10,2)"), "numeric");
    }

    #[test]
    fn map_builtin_types() {
        assert_eq!(map_clr_type(&col("integer", false)), "int");
        assert_eq!(map_clr_type(&col("bigint", false)), "long");
        assert_eq!(map_clr_type(&col("uuid", false)), "Guid");
        assert_eq!(map_clr_type(&col("double precision", false)), "double");
        assert_eq!(map_clr_type(&col("numeric(10,2)", false)), "decimal");
        assert_eq!(map_clr_type(&col("timestamp with time zone", false)), "DateTimeOffset");
    }

    #[test]
    fn nullable_value_types_get_suffix() {
        assert_eq!(map_clr_type(&col("integer", true)), "int?");
        assert_eq!(map_clr_type(&col("boolean", true)), "bool?");
        assert_eq!(map_clr_type(&col("uuid", true)), "Guid?");
    }

    #[test]
    fn string_and_bytes_never_decorated() {
        assert_eq!(map_clr_type(&col("text", true)), "string");
        assert_eq!(map_clr_type(&col("bytea", true)), "byte[]");
    }

    #[test]
    fn unrecognized_defaults_to_string() {
        assert_eq!(map_clr_type(&col("tsvector", false)), "string");
        assert_eq!(map_clr_type(&col("some_enum", true)), "string");
    }

    #[test]
    fn char_of_length_one() {
        let c = NativeColumn {
            type_name: "character".to_string(),
            is_nullable: false,
            max_length: Some(1),
            ..Default::default()
        };
        assert_eq!(map_clr_type(&c), "char");
        assert_eq!(map_clr_type(&col("character(8)", false)), "string");
    }

    #[test]
    fn same_input_same_output() {
        let c = col("Timestamp Without Time Zone", true);
        assert_eq!(map_clr_type(&c), map_clr_type(&c));
        assert_eq!(map_clr_type(&c), "DateTime?");
    }
}
