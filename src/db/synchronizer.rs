//! Table synchronization.
//!
//! Runs exactly once during construction: partitions the registered schemas
//! by data-source id, renders one `CREATE TABLE IF NOT EXISTS` statement per
//! schema and executes it against the owning pool. Schemas bound to an id
//! with no registry entry are never synchronized; they are reported in a
//! single aggregated warning.

use crate::error::{Error, Result};
use crate::models::TableSchema;
use sqlx::MySqlPool;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Synchronize all `schemas` against `pools`.
///
/// Returns the fully-qualified type names of schemas that matched no data
/// source. The first statement failure aborts with the offending text.
pub(crate) async fn synchronize(
    pools: &HashMap<String, MySqlPool>,
    schemas: &[TableSchema],
) -> Result<Vec<String>> {
    let mut handled: HashSet<usize> = HashSet::new();

    for (id, pool) in pools {
        for (index, schema) in schemas.iter().enumerate() {
            if !is_bound_to(schema, id) {
                continue;
            }
            let statement = create_table_statement(schema);
            debug!(
                data_source_id = %id,
                table = %schema.effective_table_name(),
                "Creating table"
            );
            sqlx::query(&statement)
                .execute(pool)
                .await
                .map_err(|e| Error::execution(statement.clone(), e))?;
            handled.insert(index);
        }
    }

    let unhandled: Vec<String> = schemas
        .iter()
        .enumerate()
        .filter(|(index, _)| !handled.contains(index))
        .map(|(_, schema)| schema.type_name.clone())
        .collect();

    if !unhandled.is_empty() {
        warn!(
            "The following types were not handled by any data source: {}",
            unhandled.join(", ")
        );
    }
    Ok(unhandled)
}

/// Data-source binding is matched case-insensitively.
fn is_bound_to(schema: &TableSchema, data_source_id: &str) -> bool {
    schema.data_source_id.eq_ignore_ascii_case(data_source_id)
}

/// Render the `CREATE TABLE IF NOT EXISTS` statement for one schema.
///
/// Exactly one statement per schema: one column clause per non-transient
/// field in declaration order, plus zero or one type-level primary-key
/// clause, plus zero or one type-level unique clause. Punctuation matters
/// for compatibility with deployments expecting this shape.
pub fn create_table_statement(schema: &TableSchema) -> String {
    let mut clauses: Vec<String> = Vec::with_capacity(schema.fields.len() + 2);

    for field in schema.fields.iter().filter(|f| !f.transient) {
        let mut clause = format!(
            "  {} {}",
            field.effective_column_name(schema.snake_case),
            field.field_type.sql_type(field.length)
        );
        if field.primary_key {
            clause.push_str(" PRIMARY KEY");
            if field.auto_increment {
                clause.push_str(" AUTO_INCREMENT");
            }
        }
        clause.push_str(if field.nullable { " NULL" } else { " NOT NULL" });
        if field.unique {
            clause.push_str(" UNIQUE");
        }
        if let Some(value) = &field.default_value {
            clause.push_str(" DEFAULT ");
            clause.push_str(value);
        }
        if let Some(on_update) = &field.on_update {
            clause.push_str(" ON UPDATE ");
            clause.push_str(on_update);
        }
        clauses.push(clause);
    }

    if let Some(columns) = schema.primary_key.as_deref().filter(|c| !c.is_empty()) {
        clauses.push(format!("  PRIMARY KEY ({})", columns.join(", ")));
    }
    if let Some(columns) = schema.unique.as_deref().filter(|c| !c.is_empty()) {
        clauses.push(format!("  UNIQUE ({})", columns.join(", ")));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n);",
        schema.effective_table_name(),
        clauses.join(",\n")
    )
}
