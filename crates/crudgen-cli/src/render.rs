//! Strict template rendering.
//!
//! `{{Field}}` substitutes a string value; `{{#List}}...{{/List}}` repeats
//! the enclosed block for each item. Field lookup is exact and
//! case-preserving, and referencing an undefined field is a hard error:
//! silent empty-string substitution would let template/model drift produce
//! subtly broken generated code.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    List(Vec<Context>),
}

pub type Context = BTreeMap<String, Value>;

pub fn str_value(s: impl Into<String>) -> Value {
    Value::Str(s.into())
}

/// Render `template` against `ctx`. Fails loudly on undefined fields,
/// unclosed sections, and type mismatches.
pub fn render(template: &str, ctx: &Context) -> anyhow::Result<String> {
    render_scoped(template, &[ctx])
}

fn render_scoped(template: &str, scopes: &[&Context]) -> anyhow::Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];

        let Some(close) = after.find("}}") else {
            anyhow::bail!("unterminated template tag");
        };
        let tag = after[..close].trim();
        let following = &after[close + 2..];

        if let Some(name) = tag.strip_prefix('#') {
            let name = name.trim();
            let (body, remainder) = split_section(following, name)?;
            let items = lookup_list(scopes, name)?;
            for item in items {
                let mut inner: Vec<&Context> = scopes.to_vec();
                inner.push(item);
                out.push_str(&render_scoped(body, &inner)?);
            }
            rest = remainder;
        } else if let Some(name) = tag.strip_prefix('/') {
            anyhow::bail!("unexpected section close: {}", name.trim());
        } else {
            out.push_str(lookup_str(scopes, tag)?);
            rest = following;
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Split `input` into the section body and the text after its matching
/// `{{/name}}`, honoring nested sections of the same name.
fn split_section<'a>(input: &'a str, name: &str) -> anyhow::Result<(&'a str, &'a str)> {
    let open_tag = format!("{{{{#{name}}}}}");
    let close_tag = format!("{{{{/{name}}}}}");

    let mut depth = 1usize;
    let mut offset = 0usize;

    while depth > 0 {
        let next_open = input[offset..].find(&open_tag);
        let next_close = input[offset..].find(&close_tag);

        match (next_open, next_close) {
            (_, None) => anyhow::bail!("unclosed template section: {name}"),
            (Some(o), Some(c)) if o < c => {
                depth += 1;
                offset += o + open_tag.len();
            }
            (_, Some(c)) => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[..offset + c], &input[offset + c + close_tag.len()..]));
                }
                offset += c + close_tag.len();
            }
        }
    }

    unreachable!("loop exits via return or bail");
}

fn lookup_str<'a>(scopes: &[&'a Context], name: &str) -> anyhow::Result<&'a str> {
    for scope in scopes.iter().rev() {
        match scope.get(name) {
            Some(Value::Str(s)) => return Ok(s),
            Some(Value::List(_)) => {
                anyhow::bail!("template field {name} is a list; use {{{{#{name}}}}}")
            }
            None => {}
        }
    }
    anyhow::bail!("undefined template field: {name}")
}

fn lookup_list<'a>(scopes: &[&'a Context], name: &str) -> anyhow::Result<&'a [Context]> {
    for scope in scopes.iter().rev() {
        match scope.get(name) {
            Some(Value::List(items)) => return Ok(items),
            Some(Value::Str(_)) => {
                anyhow::bail!("template section {name} is not a list")
            }
            None => {}
        }
    }
    anyhow::bail!("undefined template section: {name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, &str)]) -> Context {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), str_value(*v)))
            .collect()
    }

    #[test]
    fn substitutes_fields() {
        let c = ctx(&[("EntityName", "Product"), ("KeyType", "int")]);
        let out = render("class {{EntityName}} keyed by {{KeyType}}", &c).unwrap();
        assert_eq!(out, "class Product keyed by int");
    }

    #[test]
    fn undefined_field_fails_loudly() {
        let c = ctx(&[("EntityName", "Product")]);
        let err = render("{{EntityName}} {{Missing}}", &c).unwrap_err();
        assert!(err.to_string().contains("undefined template field: Missing"));
    }

    #[test]
    fn field_lookup_is_case_sensitive() {
        let c = ctx(&[("EntityName", "Product")]);
        assert!(render("{{entityname}}", &c).is_err());
    }

    #[test]
    fn sections_iterate_items() {
        let mut c = Context::new();
        c.insert(
            "Columns".to_string(),
            Value::List(vec![
                ctx(&[("Name", "Sku")]),
                ctx(&[("Name", "Title")]),
            ]),
        );
        let out = render("{{#Columns}}[{{Name}}]{{/Columns}}", &c).unwrap();
        assert_eq!(out, "[Sku][Title]");
    }

    #[test]
    fn items_see_outer_scope() {
        let mut c = ctx(&[("EntityName", "Product")]);
        c.insert(
            "Columns".to_string(),
            Value::List(vec![ctx(&[("Name", "Sku")])]),
        );
        let out = render("{{#Columns}}{{EntityName}}.{{Name}}{{/Columns}}", &c).unwrap();
        assert_eq!(out, "Product.Sku");
    }

    #[test]
    fn unclosed_section_fails() {
        let mut c = Context::new();
        c.insert("Columns".to_string(), Value::List(Vec::new()));
        assert!(render("{{#Columns}}body", &c).is_err());
    }

    #[test]
    fn empty_list_renders_nothing() {
        let mut c = Context::new();
        c.insert("Columns".to_string(), Value::List(Vec::new()));
        let out = render("a{{#Columns}}x{{/Columns}}b", &c).unwrap();
        assert_eq!(out, "ab");
    }
}
