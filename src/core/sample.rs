//! Bundled sample database used for demos and tests

use crate::core::schema::{FieldMap, Relation, RelationKind, Schema, SchemaMetadata, Table};

fn field_map(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(name, ty)| (name.to_string(), ty.to_string()))
        .collect()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn sample_table(name: &str, fields: &[(&str, &str)]) -> Table {
    Table::new(name, field_map(fields))
        .with_display_name(capitalize(name))
        .with_description(format!("Table for {} data", name))
}

fn sample_relation(source: &str, target: &str, source_field: &str) -> Relation {
    Relation::new(source, target, RelationKind::BelongsTo, source_field, "id")
        .with_display_name(format!("{} → {}", source, target))
}

/// Small e-commerce schema: users, roles, products, orders and order items
pub fn sample_schema() -> Schema {
    Schema {
        metadata: SchemaMetadata::new("Sample Database")
            .with_description("Example database schema for demonstration")
            .with_version("1.0"),
        tables: vec![
            sample_table(
                "users",
                &[
                    ("id", "UUID"),
                    ("name", "string"),
                    ("email", "string"),
                    ("created_at", "datetime"),
                    ("role_id", "int"),
                ],
            ),
            sample_table(
                "roles",
                &[("id", "int"), ("name", "string"), ("permissions", "json")],
            ),
            sample_table(
                "products",
                &[
                    ("id", "UUID"),
                    ("name", "string"),
                    ("price", "float"),
                    ("category_id", "int"),
                    ("stock", "int"),
                ],
            ),
            sample_table(
                "orders",
                &[
                    ("id", "UUID"),
                    ("user_id", "UUID"),
                    ("created_at", "datetime"),
                    ("status", "string"),
                    ("total", "float"),
                ],
            ),
            sample_table(
                "order_items",
                &[
                    ("id", "UUID"),
                    ("order_id", "UUID"),
                    ("product_id", "UUID"),
                    ("quantity", "int"),
                    ("price", "float"),
                ],
            ),
        ],
        relations: vec![
            sample_relation("users", "roles", "role_id"),
            sample_relation("orders", "users", "user_id"),
            sample_relation("order_items", "orders", "order_id"),
            sample_relation("order_items", "products", "product_id"),
        ],
    }
}
