//! Generation-model projection: resolved table metadata to the per-entity
//! data model the templates consume.

use crate::render::{Context, Value, str_value};
use crudgen_schema::{TableInfo, to_identifier};
use heck::ToKebabCase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnModel {
    pub name: String,
    pub cs_name: String,
    pub clr_type: String,
    pub is_nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityModel {
    pub entity: String,
    pub key_column: String,
    pub key_type: String,
    pub columns: Vec<ColumnModel>,
}

/// Project a resolved table into its generation model.
///
/// Keyless tables default the key to the first column, or to the literal
/// `Id` when there are no columns at all; the key type falls back to `int`
/// when no column matches the key name.
pub fn project_entity(table: &TableInfo) -> EntityModel {
    let key_column = table
        .key_column
        .clone()
        .or_else(|| table.columns.first().map(|c| c.name.clone()))
        .unwrap_or_else(|| "Id".to_string());

    let key_type = table
        .columns
        .iter()
        .find(|c| c.name == key_column)
        .map(|c| c.clr_type.clone())
        .unwrap_or_else(|| "int".to_string());

    EntityModel {
        entity: table.entity_name.clone(),
        key_column,
        key_type,
        columns: table
            .columns
            .iter()
            .map(|c| ColumnModel {
                name: c.name.clone(),
                cs_name: c.cs_name.clone(),
                clr_type: c.clr_type.clone(),
                is_nullable: c.is_nullable,
            })
            .collect(),
    }
}

/// Template context for one entity's artifacts.
pub fn entity_context(model: &EntityModel, namespace: &str, context_class: &str) -> Context {
    let key_property = model
        .columns
        .iter()
        .find(|c| c.name == model.key_column)
        .map(|c| c.cs_name.clone())
        .unwrap_or_else(|| to_identifier(&model.key_column));

    let mut ctx = Context::new();
    ctx.insert("Namespace".to_string(), str_value(namespace));
    ctx.insert("ContextClass".to_string(), str_value(context_class));
    ctx.insert("EntityName".to_string(), str_value(&model.entity));
    ctx.insert(
        "EntityRoute".to_string(),
        str_value(model.entity.to_kebab_case()),
    );
    ctx.insert("KeyColumn".to_string(), str_value(&model.key_column));
    ctx.insert("KeyProperty".to_string(), str_value(key_property));
    ctx.insert("KeyType".to_string(), str_value(&model.key_type));
    ctx.insert("Columns".to_string(), column_list(&model.columns));
    ctx.insert(
        "NonKeyColumns".to_string(),
        column_list(
            &model
                .columns
                .iter()
                .filter(|c| c.name != model.key_column)
                .cloned()
                .collect::<Vec<_>>(),
        ),
    );
    ctx
}

/// Template context for the shared registration artifact.
pub fn registration_context(entities: &[String], namespace: &str) -> Context {
    let mut ctx = Context::new();
    ctx.insert("Namespace".to_string(), str_value(namespace));
    ctx.insert(
        "Entities".to_string(),
        Value::List(
            entities
                .iter()
                .map(|e| {
                    let mut item = Context::new();
                    item.insert("EntityName".to_string(), str_value(e));
                    item
                })
                .collect(),
        ),
    );
    ctx
}

fn column_list(columns: &[ColumnModel]) -> Value {
    Value::List(
        columns
            .iter()
            .map(|c| {
                let mut item = Context::new();
                item.insert("Name".to_string(), str_value(&c.name));
                item.insert("CsName".to_string(), str_value(&c.cs_name));
                item.insert("ClrType".to_string(), str_value(&c.clr_type));
                item.insert(
                    "IsNullable".to_string(),
                    str_value(if c.is_nullable { "true" } else { "false" }),
                );
                item
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudgen_schema::{ColumnInfo, TableInfo};

    fn column(name: &str, clr: &str) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            clr_type: clr.to_string(),
            is_nullable: false,
            cs_name: name.to_string(),
        }
    }

    fn table(key: Option<&str>, columns: Vec<ColumnInfo>) -> TableInfo {
        TableInfo {
            entity_name: "Product".to_string(),
            name: "Products".to_string(),
            schema: "public".to_string(),
            key_column: key.map(|s| s.to_string()),
            columns,
            is_view: false,
        }
    }

    #[test]
    fn key_type_comes_from_matching_column() {
        let t = table(Some("Sku"), vec![column("Sku", "long"), column("Name", "string")]);
        let m = project_entity(&t);
        assert_eq!(m.key_column, "Sku");
        assert_eq!(m.key_type, "long");
    }

    #[test]
    fn missing_key_defaults_to_first_column() {
        let t = table(None, vec![column("Sku", "string"), column("Name", "string")]);
        let m = project_entity(&t);
        assert_eq!(m.key_column, "Sku");
        assert_eq!(m.key_type, "string");
    }

    #[test]
    fn zero_columns_default_to_id_int() {
        let t = table(None, Vec::new());
        let m = project_entity(&t);
        assert_eq!(m.key_column, "Id");
        assert_eq!(m.key_type, "int");
    }

    #[test]
    fn key_without_matching_column_defaults_to_int() {
        let t = table(Some("LegacyKey"), vec![column("Name", "string")]);
        let m = project_entity(&t);
        assert_eq!(m.key_column, "LegacyKey");
        assert_eq!(m.key_type, "int");
    }

    #[test]
    fn non_key_columns_exclude_the_key() {
        let t = table(Some("Sku"), vec![column("Sku", "long"), column("Name", "string")]);
        let ctx = entity_context(&project_entity(&t), "App.Generated", "AppDbContext");
        let Some(Value::List(items)) = ctx.get("NonKeyColumns") else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get("Name"), Some(&str_value("Name")));
    }

    #[test]
    fn route_is_kebab_case() {
        let t = table(Some("Id"), vec![column("Id", "int")]);
        let mut t = t;
        t.entity_name = "ProductCategory".to_string();
        let ctx = entity_context(&project_entity(&t), "App.Generated", "AppDbContext");
        assert_eq!(ctx.get("EntityRoute"), Some(&str_value("product-category")));
    }
}
