//! Column name to C# identifier sanitizing.

/// Convert an arbitrary column name into a safe C# identifier.
///
/// Total and idempotent: every character outside `[A-Za-z0-9_]` becomes
/// `_`, an empty or digit-leading result gets a `_` prefix, and keyword
/// collisions get a `_` suffix.
pub fn to_identifier(raw: &str) -> String {
    let mut s = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect::<String>();

    if s.is_empty() {
        s.push('_');
    }
    if s.chars().next().unwrap().is_ascii_digit() {
        s.insert(0, '_');
    }
    if is_csharp_keyword(&s) {
        s.push('_');
    }
    s
}

fn is_csharp_keyword(s: &str) -> bool {
    matches!(
        s,
        "abstract" | "as" | "base" | "bool" | "break" | "byte" | "case" | "catch" | "char"
            | "checked"
            | "class"
            | "const"
            | "continue"
            | "decimal"
            | "default"
            | "delegate"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "event"
            | "explicit"
            | "extern"
            | "false"
            | "finally"
            | "fixed"
            | "float"
            | "for"
            | "foreach"
            | "goto"
            | "if"
            | "implicit"
            | "in"
            | "int"
            | "interface"
            | "internal"
            | "is"
            | "lock"
            | "long"
            | "namespace"
            | "new"
            | "null"
            | "object"
            | "operator"
            | "out"
            | "override"
            | "params"
            | "private"
            | "protected"
            | "public"
            | "readonly"
            | "ref"
            | "return"
            | "sbyte"
            | "sealed"
            | "short"
            | "sizeof"
            | "stackalloc"
            | "static"
            | "string"
            | "struct"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "uint"
            | "ulong"
            | "unchecked"
            | "unsafe"
            | "ushort"
            | "using"
            | "virtual"
            | "void"
            | "volatile"
            | "while"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_unsafe_characters() {
        assert_eq!(to_identifier("order-date"), "order_date");
        assert_eq!(to_identifier("unit price ($)"), "unit_price____");
    }

    #[test]
    fn prefixes_digit_and_empty() {
        assert_eq!(to_identifier("1st_place"), "_1st_place");
        assert_eq!(to_identifier(""), "_");
        assert_eq!(to_identifier("!!"), "__");
    }

    #[test]
    fn escapes_keywords() {
        assert_eq!(to_identifier("class"), "class_");
        assert_eq!(to_identifier("namespace"), "namespace_");
        // Case-sensitive: C# keywords are all lowercase.
        assert_eq!(to_identifier("Class"), "Class");
    }

    #[test]
    fn idempotent() {
        for raw in ["class", "1st", "order-date", "", "ok_name"] {
            let once = to_identifier(raw);
            assert_eq!(to_identifier(&once), once);
        }
    }
}
