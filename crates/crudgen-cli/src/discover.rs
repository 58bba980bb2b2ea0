//! Entity discovery from reverse-engineered model source.
//!
//! The generated DbContext declares one `DbSet<Entity>` property per
//! entity and, for explicitly mapped relations, a `ToTable("...")` or
//! `ToView("...")` directive (optionally with a schema argument) inside
//! the matching `Entity<T>(...)` builder block.

use regex::Regex;
use std::sync::OnceLock;

/// A (entity hint, schema hint, table hint) triple awaiting reconciliation
/// against the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTarget {
    pub entity: String,
    pub schema_hint: String,
    pub table_hint: String,
    /// Hint came from a `ToView` directive.
    pub view_hint: bool,
}

fn dbset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"DbSet<\s*([A-Za-z_][A-Za-z0-9_.]*)\s*>").unwrap())
}

fn entity_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.Entity<\s*([A-Za-z_][A-Za-z0-9_.]*)\s*>").unwrap())
}

fn mapping_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\.(ToTable|ToView)\(\s*"([^"]+)"\s*(?:,\s*"([^"]+)"\s*)?\)"#).unwrap()
    })
}

fn context_class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"class\s+([A-Za-z_][A-Za-z0-9_]*)\s*:\s*DbContext\b").unwrap()
    })
}

/// Name of the DbContext class declared in the model source, if any.
/// Used by the generated services to reference the context type.
pub fn extract_context_class(source: &str) -> Option<String> {
    context_class_re()
        .captures(source)
        .map(|cap| cap[1].to_string())
}

/// Extract distinct entity names from `DbSet<...>` declarations,
/// namespace qualifiers stripped, in first-seen order.
pub fn extract_entity_names(source: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for cap in dbset_re().captures_iter(source) {
        let name = strip_namespace(&cap[1]).to_string();
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Build a resolution target for each entity name.
///
/// A mapping directive is bound to the nearest preceding `Entity<T>`
/// builder call; entities without one default to (entity name, empty
/// schema), deferring the real work to the table resolver's heuristics.
pub fn resolve_targets(source: &str, entity_names: &[String]) -> Vec<ResolutionTarget> {
    let entity_blocks: Vec<(usize, String)> = entity_block_re()
        .captures_iter(source)
        .map(|cap| {
            let m = cap.get(0).unwrap();
            (m.start(), strip_namespace(&cap[1]).to_string())
        })
        .collect();

    let mut mappings: Vec<(String, ResolutionTarget)> = Vec::new();
    for cap in mapping_re().captures_iter(source) {
        let pos = cap.get(0).unwrap().start();
        let Some((_, owner)) = entity_blocks
            .iter()
            .rev()
            .find(|(start, _)| *start < pos)
        else {
            continue;
        };

        mappings.push((
            owner.clone(),
            ResolutionTarget {
                entity: owner.clone(),
                schema_hint: cap.get(3).map(|m| m.as_str().to_string()).unwrap_or_default(),
                table_hint: cap[2].to_string(),
                view_hint: &cap[1] == "ToView",
            },
        ));
    }

    entity_names
        .iter()
        .map(|name| {
            mappings
                .iter()
                .find(|(owner, _)| owner == name)
                .map(|(_, target)| target.clone())
                .unwrap_or_else(|| ResolutionTarget {
                    entity: name.clone(),
                    schema_hint: String::new(),
                    table_hint: name.clone(),
                    view_hint: false,
                })
        })
        .collect()
}

fn strip_namespace(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
