//! Entity-to-table resolution against the cached inventory.

use crate::inventory::{TableInventory, TableRef};
use crate::pluralize::variations;

/// Find the best-matching physical table/view for a (schema, table) hint.
///
/// Match tiers, returning at the first tier producing exactly one
/// candidate:
///
/// 1. exact name (ordinal), exact schema if `schema_hint` is non-empty
/// 2. the same, case-insensitive
/// 3. each pluralization variation of `table_hint`, case-insensitive
/// 4. schema-relaxed collection of every name/variation match (only when
///    no schema was hinted), tie-broken by exact-name match, then
///    non-view over view, then inventory order
///
/// `None` means the entity cannot be reconciled; callers warn and skip.
pub fn resolve<'a>(
    inventory: &'a TableInventory,
    schema_hint: &str,
    table_hint: &str,
) -> Option<&'a TableRef> {
    // Tier 1: exact.
    if let Some(t) = single(inventory, |t| {
        t.name == table_hint && schema_ok(t, schema_hint, false)
    }) {
        return Some(t);
    }

    // Tier 2: case-insensitive.
    if let Some(t) = single(inventory, |t| {
        t.name.eq_ignore_ascii_case(table_hint) && schema_ok(t, schema_hint, true)
    }) {
        return Some(t);
    }

    // Tier 3: pluralization variations, in generation order.
    let vars = variations(table_hint);
    for v in &vars {
        if let Some(t) = single(inventory, |t| {
            t.name.eq_ignore_ascii_case(v) && schema_ok(t, schema_hint, true)
        }) {
            return Some(t);
        }
    }

    // Tier 4: schema-relaxed multi-candidate (only without a schema hint).
    if !schema_hint.is_empty() {
        return None;
    }

    let candidates: Vec<&TableRef> = inventory
        .tables
        .iter()
        .filter(|t| {
            t.name.eq_ignore_ascii_case(table_hint)
                || vars.iter().any(|v| t.name.eq_ignore_ascii_case(v))
        })
        .collect();

    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        _ => {
            // Exact-name matches outrank variation matches; only within the
            // winning pool does the non-view preference apply.
            let exact: Vec<&TableRef> = candidates
                .iter()
                .copied()
                .filter(|t| t.name.eq_ignore_ascii_case(table_hint))
                .collect();
            let pool = if exact.is_empty() { &candidates } else { &exact };

            if let Some(t) = pool.iter().copied().find(|t| !t.is_view) {
                return Some(t);
            }
            Some(pool[0])
        }
    }
}

fn schema_ok(t: &TableRef, schema_hint: &str, case_insensitive: bool) -> bool {
    if schema_hint.is_empty() {
        return true;
    }
    if case_insensitive {
        t.schema.eq_ignore_ascii_case(schema_hint)
    } else {
        t.schema == schema_hint
    }
}

fn single<'a>(
    inventory: &'a TableInventory,
    pred: impl Fn(&TableRef) -> bool,
) -> Option<&'a TableRef> {
    let mut it = inventory.tables.iter().filter(|t| pred(t));
    let first = it.next()?;
    if it.next().is_some() {
        return None;
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(schema: &str, name: &str) -> TableRef {
        TableRef {
            schema: schema.to_string(),
            name: name.to_string(),
            is_view: false,
        }
    }

    fn view(schema: &str, name: &str) -> TableRef {
        TableRef {
            schema: schema.to_string(),
            name: name.to_string(),
            is_view: true,
        }
    }

    #[test]
    fn exact_match_respects_schema_hint() {
        let inv = TableInventory::new(vec![
            table("dbo", "Products"),
            table("sales", "Products"),
        ]);
        assert_eq!(resolve(&inv, "sales", "Products").unwrap().schema, "sales");
        assert!(resolve(&inv, "audit", "Products").is_none());
    }

    #[test]
    fn case_insensitive_beats_variation() {
        let inv = TableInventory::new(vec![table("dbo", "categories")]);
        let hit = resolve(&inv, "", "Categories").unwrap();
        assert_eq!(hit.name, "categories");
    }

    #[test]
    fn variation_match_picks_plural() {
        let inv = TableInventory::new(vec![
            table("dbo", "Products"),
            table("dbo", "ProductCategories"),
        ]);
        let hit = resolve(&inv, "dbo", "Product").unwrap();
        assert_eq!(hit.name, "Products");
    }

    #[test]
    fn exact_wins_over_variation_when_both_exist() {
        let inv = TableInventory::new(vec![
            table("dbo", "Category"),
            table("dbo", "Categories"),
        ]);
        let hit = resolve(&inv, "", "Categories").unwrap();
        assert_eq!(hit.name, "Categories");
    }

    #[test]
    fn schema_relaxed_prefers_non_view() {
        let inv = TableInventory::new(vec![
            view("reporting", "Orders"),
            table("sales", "Order"),
        ]);
        // Unique case-insensitive match wins before relaxation kicks in.
        let hit = resolve(&inv, "", "order").unwrap();
        assert_eq!(hit.schema, "sales");

        let inv = TableInventory::new(vec![
            view("reporting", "Customers"),
            table("sales", "Customers"),
        ]);
        let hit = resolve(&inv, "", "Customer").unwrap();
        assert_eq!(hit.schema, "sales");
        assert!(!hit.is_view);
    }

    #[test]
    fn exact_name_ties_prefer_base_table_over_view() {
        // Both relations carry the exact hinted name; the one listed first
        // is a view. The base table must still win.
        let inv = TableInventory::new(vec![
            view("reporting", "Products"),
            table("sales", "Products"),
        ]);
        let hit = resolve(&inv, "", "products").unwrap();
        assert_eq!(hit.schema, "sales");
        assert!(!hit.is_view);
    }

    #[test]
    fn schema_relaxed_falls_back_to_inventory_order() {
        let inv = TableInventory::new(vec![
            view("a", "Invoices"),
            view("b", "Invoices"),
        ]);
        let hit = resolve(&inv, "", "Invoice").unwrap();
        assert_eq!(hit.schema, "a");
    }

    #[test]
    fn miss_returns_none() {
        let inv = TableInventory::new(vec![table("public", "people")]);
        // "Person"/"people" is the irregular case the heuristic cannot cover.
        assert!(resolve(&inv, "", "Person").is_none());
    }
}
