//! Pool registry builder.
//!
//! [`RegistryBuilder`] accumulates per-data-source configuration keyed by id,
//! merges global default properties, and at [`RegistryBuilder::build`] turns
//! every entry into one live pool, runs table synchronization for all
//! registered schemas, and returns the finished [`Registry`].
//!
//! Mutators follow get-or-create-then-mutate, so declaration order across
//! calls is irrelevant; repeated writes to the same field are last-write-wins.

use crate::db::pool::create_pool;
use crate::db::registry::Registry;
use crate::db::synchronizer;
use crate::error::{Error, Result};
use crate::models::{DEFAULT_PORT, DatabaseCredentials, TableSchema};
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

/// Accumulated configuration for one data source. Finalized exactly once,
/// when the pool is created; immutable afterward.
#[derive(Debug, Clone, Default)]
pub struct DataSourceConfig {
    pub server_name: Option<String>,
    pub database_name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
    pub data_source_class_name: Option<String>,
    /// Pool-level property bag (string key -> opaque value).
    pub properties: HashMap<String, Value>,
}

impl DataSourceConfig {
    /// Overwrite connection fields from a credential record.
    fn apply_credentials(&mut self, credentials: &DatabaseCredentials) {
        self.server_name = Some(credentials.host.clone());
        self.database_name = Some(credentials.database_name.clone());
        self.user = Some(credentials.user.clone());
        self.password = Some(credentials.password.clone());
        self.port = Some(credentials.port);
    }

    /// Merge global defaults under the entry's own properties. Properties
    /// already present are never overwritten.
    fn apply_default_properties(&mut self, defaults: &HashMap<String, Value>) {
        for (key, value) in defaults {
            self.properties
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Effective port: unset or 0 falls back to the default.
    pub fn effective_port(&self) -> u16 {
        match self.port {
            Some(0) | None => DEFAULT_PORT,
            Some(port) => port,
        }
    }

    pub(crate) fn property_u64(&self, key: &str) -> Option<u64> {
        self.properties.get(key).and_then(Value::as_u64)
    }

    pub(crate) fn property_bool(&self, key: &str) -> Option<bool> {
        self.properties.get(key).and_then(Value::as_bool)
    }

    pub(crate) fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// Builder for a [`Registry`].
///
/// # Example
///
/// ```no_run
/// use tabsync::{DatabaseCredentials, FieldSchema, FieldType, RegistryBuilder, TableSchema};
///
/// # async fn demo() -> tabsync::Result<()> {
/// let registry = RegistryBuilder::new()
///     .credentials(DatabaseCredentials::new("main", "db1", "shop", "u", "p"))?
///     .register_schema(
///         TableSchema::new("shop::models::User", "main")
///             .snake_case()
///             .field(FieldSchema::new("userId", FieldType::Int).primary_key().auto_increment())
///             .field(FieldSchema::new("email", FieldType::Text).length(120).unique()),
///     )
///     .build()
///     .await?;
/// let conn = registry.connection("main").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    configs: HashMap<String, DataSourceConfig>,
    default_properties: HashMap<String, Value>,
    schemas: Vec<TableSchema>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the global property bag applied to every data source at
    /// build time. Overwritten wholesale on repeated calls, not merged.
    pub fn default_properties(mut self, properties: HashMap<String, Value>) -> Self {
        self.default_properties = properties;
        self
    }

    /// Create-or-update the configuration entry named by the credential's id,
    /// overwriting host, database name, user, password and port.
    pub fn credentials(mut self, credentials: DatabaseCredentials) -> Result<Self> {
        if credentials.id.is_empty() {
            return Err(Error::invalid_argument(
                "Credentials ID cannot be null or empty",
            ));
        }
        self.entry(&credentials.id).apply_credentials(&credentials);
        Ok(self)
    }

    /// Apply [`Self::credentials`] for each record.
    pub fn credentials_list<I>(mut self, credentials: I) -> Result<Self>
    where
        I: IntoIterator<Item = DatabaseCredentials>,
    {
        for record in credentials {
            self = self.credentials(record)?;
        }
        Ok(self)
    }

    /// Ingest credentials from a generic structured document: an object with
    /// the credential field names, or an array of such objects.
    pub fn credentials_value(mut self, value: Value) -> Result<Self> {
        match value {
            Value::Object(ref object) => {
                if !object.contains_key("id") {
                    return Err(Error::invalid_argument(
                        "Provided object has no id provided",
                    ));
                }
                let credentials: DatabaseCredentials = serde_json::from_value(value)
                    .map_err(|e| Error::invalid_argument(format!("Malformed credentials: {e}")))?;
                self.credentials(credentials)
            }
            Value::Array(elements) => {
                for element in elements {
                    if !element.is_object() {
                        return Err(Error::invalid_argument(
                            "Element in provided array is not an object",
                        ));
                    }
                    self = self.credentials_value(element)?;
                }
                Ok(self)
            }
            _ => Err(Error::invalid_argument(
                "Credentials document must be an object or an array of objects",
            )),
        }
    }

    /// Set the server host for one data source, created if absent.
    pub fn server_name(mut self, data_source_id: &str, server_name: impl Into<String>) -> Self {
        self.entry(data_source_id).server_name = Some(server_name.into());
        self
    }

    /// Set the database name for one data source, created if absent.
    pub fn database_name(mut self, data_source_id: &str, database_name: impl Into<String>) -> Self {
        self.entry(data_source_id).database_name = Some(database_name.into());
        self
    }

    /// Set the user for one data source, created if absent.
    pub fn user(mut self, data_source_id: &str, user: impl Into<String>) -> Self {
        self.entry(data_source_id).user = Some(user.into());
        self
    }

    /// Set the password for one data source, created if absent.
    pub fn password(mut self, data_source_id: &str, password: impl Into<String>) -> Self {
        self.entry(data_source_id).password = Some(password.into());
        self
    }

    /// Set the port for one data source, created if absent.
    pub fn port(mut self, data_source_id: &str, port: u16) -> Self {
        self.entry(data_source_id).port = Some(port);
        self
    }

    /// Set the data source class name on every currently-known entry.
    /// Entries added later do not receive it retroactively.
    pub fn data_source_class_name(mut self, class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        for config in self.configs.values_mut() {
            config.data_source_class_name = Some(class_name.clone());
        }
        self
    }

    /// Set the data source class name for one data source, created if absent.
    pub fn data_source_class_name_for(
        mut self,
        data_source_id: &str,
        class_name: impl Into<String>,
    ) -> Self {
        self.entry(data_source_id).data_source_class_name = Some(class_name.into());
        self
    }

    /// Add a pool-level property on every currently-known entry.
    /// Entries added later do not receive it retroactively.
    pub fn property(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        for config in self.configs.values_mut() {
            config.properties.insert(name.clone(), value.clone());
        }
        self
    }

    /// Add a pool-level property for one data source, created if absent.
    pub fn property_for(
        mut self,
        data_source_id: &str,
        name: impl Into<String>,
        value: Value,
    ) -> Self {
        self.entry(data_source_id)
            .properties
            .insert(name.into(), value);
        self
    }

    /// Register one table schema for synchronization at build time.
    pub fn register_schema(mut self, schema: TableSchema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Register several table schemas.
    pub fn register_schemas<I>(mut self, schemas: I) -> Self
    where
        I: IntoIterator<Item = TableSchema>,
    {
        self.schemas.extend(schemas);
        self
    }

    /// Finalize every entry, create one pool per data source, synchronize
    /// all registered schemas, and return the registry.
    ///
    /// Fail-fast: the first pool creation or DDL failure propagates
    /// immediately; pools already created are not rolled back.
    pub async fn build(mut self) -> Result<Registry> {
        let mut pools = HashMap::with_capacity(self.configs.len());
        for (id, config) in &mut self.configs {
            config.apply_default_properties(&self.default_properties);
            let pool = create_pool(id, config).await?;
            info!("Connection established for data source with ID: {}", id);
            pools.insert(id.clone(), pool);
        }

        let unhandled = synchronizer::synchronize(&pools, &self.schemas).await?;
        Ok(Registry::new(pools, unhandled))
    }

    fn entry(&mut self, data_source_id: &str) -> &mut DataSourceConfig {
        self.configs
            .entry(data_source_id.to_string())
            .or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_credentials_creates_entry() {
        let builder = RegistryBuilder::new()
            .credentials(DatabaseCredentials::new("main", "db1", "shop", "u", "p"))
            .unwrap();
        let config = &builder.configs["main"];
        assert_eq!(config.server_name.as_deref(), Some("db1"));
        assert_eq!(config.database_name.as_deref(), Some("shop"));
        assert_eq!(config.user.as_deref(), Some("u"));
        assert_eq!(config.password.as_deref(), Some("p"));
        assert_eq!(config.effective_port(), 3306);
    }

    #[test]
    fn test_credentials_empty_id_rejected() {
        let result =
            RegistryBuilder::new().credentials(DatabaseCredentials::new("", "db1", "shop", "u", "p"));
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_credentials_last_write_wins() {
        let builder = RegistryBuilder::new()
            .credentials(DatabaseCredentials::new("main", "db1", "shop", "u", "p"))
            .unwrap()
            .credentials(DatabaseCredentials::new("main", "db2", "shop2", "u2", "p2"))
            .unwrap();
        assert_eq!(builder.configs.len(), 1);
        let config = &builder.configs["main"];
        assert_eq!(config.server_name.as_deref(), Some("db2"));
        assert_eq!(config.database_name.as_deref(), Some("shop2"));
    }

    #[test]
    fn test_credentials_list_creates_one_entry_per_id() {
        let builder = RegistryBuilder::new()
            .credentials_list([
                DatabaseCredentials::new("main", "db1", "shop", "u", "p"),
                DatabaseCredentials::new("reporting", "db2", "stats", "u", "p"),
            ])
            .unwrap();
        assert_eq!(builder.configs.len(), 2);
        assert!(builder.configs.contains_key("main"));
        assert!(builder.configs.contains_key("reporting"));
    }

    #[test]
    fn test_credentials_value_object() {
        let builder = RegistryBuilder::new()
            .credentials_value(json!({
                "id": "main",
                "host": "db1",
                "database_name": "shop",
                "user": "u",
                "password": "p"
            }))
            .unwrap();
        let config = &builder.configs["main"];
        assert_eq!(config.database_name.as_deref(), Some("shop"));
        assert_eq!(config.effective_port(), 3306);
    }

    #[test]
    fn test_credentials_value_object_missing_id() {
        let result = RegistryBuilder::new().credentials_value(json!({
            "host": "db1",
            "database_name": "shop",
            "user": "u",
            "password": "p"
        }));
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_credentials_value_array() {
        let builder = RegistryBuilder::new()
            .credentials_value(json!([
                {"id": "main", "host": "db1", "databaseName": "shop", "user": "u", "password": "p"},
                {"id": "reporting", "host": "db2", "database_name": "stats", "user": "u", "password": "p", "port": 3307}
            ]))
            .unwrap();
        assert_eq!(builder.configs.len(), 2);
        assert_eq!(builder.configs["reporting"].effective_port(), 3307);
    }

    #[test]
    fn test_credentials_value_array_with_non_object_element() {
        let result = RegistryBuilder::new()
            .credentials_value(json!([{"id": "main", "host": "h", "database_name": "d", "user": "u", "password": "p"}, 42]));
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_credentials_value_scalar_rejected() {
        let result = RegistryBuilder::new().credentials_value(json!("mysql://db1"));
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_credentials_value_port_zero_falls_back_to_default() {
        let builder = RegistryBuilder::new()
            .credentials_value(json!({
                "id": "main",
                "host": "db1",
                "database_name": "shop",
                "user": "u",
                "password": "p",
                "port": 0
            }))
            .unwrap();
        assert_eq!(builder.configs["main"].effective_port(), 3306);
    }

    #[test]
    fn test_per_field_setters_create_entry() {
        let builder = RegistryBuilder::new()
            .server_name("main", "db1")
            .database_name("main", "shop")
            .user("main", "u")
            .password("main", "p")
            .port("main", 3310);
        let config = &builder.configs["main"];
        assert_eq!(config.server_name.as_deref(), Some("db1"));
        assert_eq!(config.effective_port(), 3310);
    }

    #[test]
    fn test_setter_order_is_irrelevant() {
        let a = RegistryBuilder::new().port("main", 3310).server_name("main", "db1");
        let b = RegistryBuilder::new().server_name("main", "db1").port("main", 3310);
        assert_eq!(
            a.configs["main"].server_name,
            b.configs["main"].server_name
        );
        assert_eq!(a.configs["main"].port, b.configs["main"].port);
    }

    #[test]
    fn test_broadcast_property_touches_only_existing_entries() {
        let builder = RegistryBuilder::new()
            .server_name("main", "db1")
            .property("max_connections", json!(5))
            .server_name("late", "db2");
        assert_eq!(builder.configs["main"].property_u64("max_connections"), Some(5));
        assert_eq!(builder.configs["late"].property_u64("max_connections"), None);
    }

    #[test]
    fn test_broadcast_class_name_touches_only_existing_entries() {
        let builder = RegistryBuilder::new()
            .server_name("main", "db1")
            .data_source_class_name("legacy.Driver")
            .server_name("late", "db2");
        assert_eq!(
            builder.configs["main"].data_source_class_name.as_deref(),
            Some("legacy.Driver")
        );
        assert!(builder.configs["late"].data_source_class_name.is_none());
    }

    #[test]
    fn test_targeted_property_creates_entry() {
        let builder = RegistryBuilder::new().property_for("main", "charset", json!("latin1"));
        assert_eq!(builder.configs["main"].property_str("charset"), Some("latin1"));
    }

    #[test]
    fn test_default_properties_never_overwrite_entry_properties() {
        let mut defaults = HashMap::new();
        defaults.insert("max_connections".to_string(), json!(50));
        defaults.insert("charset".to_string(), json!("utf8mb4"));

        // Entry property set *before* defaults are declared still wins.
        let mut builder = RegistryBuilder::new()
            .property_for("main", "max_connections", json!(5))
            .default_properties(defaults);

        let config = builder.configs.get_mut("main").unwrap();
        config.apply_default_properties(&builder.default_properties);
        assert_eq!(config.property_u64("max_connections"), Some(5));
        assert_eq!(config.property_str("charset"), Some("utf8mb4"));
    }

    #[test]
    fn test_default_properties_replaced_wholesale() {
        let mut first = HashMap::new();
        first.insert("a".to_string(), json!(1));
        let mut second = HashMap::new();
        second.insert("b".to_string(), json!(2));

        let builder = RegistryBuilder::new()
            .default_properties(first)
            .default_properties(second);
        assert!(!builder.default_properties.contains_key("a"));
        assert_eq!(builder.default_properties["b"], json!(2));
    }

    #[test]
    fn test_register_schemas_accumulates() {
        let builder = RegistryBuilder::new()
            .register_schema(TableSchema::new("a::A", "main"))
            .register_schemas([TableSchema::new("b::B", "main"), TableSchema::new("c::C", "x")]);
        assert_eq!(builder.schemas.len(), 3);
    }
}
