//! Schema descriptor model.
//!
//! A [`TableSchema`] is the full declarative description of one table: the
//! owning data-source id, the table name, the naming convention, and one
//! [`FieldSchema`] per field of the host type. Descriptors are registered
//! explicitly on the builder; nothing is discovered by reflection.

use serde::{Deserialize, Serialize};

/// Default length for variable-length text columns.
pub const DEFAULT_TEXT_LENGTH: u32 = 255;

/// Semantic column type of a host-language field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// 32-bit integer
    Int,
    /// 64-bit integer
    BigInt,
    /// 16-bit integer
    SmallInt,
    /// 8-bit integer
    TinyInt,
    Double,
    Float,
    Bool,
    /// Timezone-agnostic instant
    Timestamp,
    /// Local date-time
    DateTime,
    Date,
    Time,
    Uuid,
    /// Raw byte sequence
    Bytes,
    /// Enumeration, stored as VARCHAR(50)
    Enum,
    /// Variable-length text, stored as VARCHAR(length)
    Text,
    /// Catch-all, stored as LONGTEXT; never an error
    Other,
}

/// Fixed type-to-SQL mapping, first match wins. Process-wide read-only state.
const SQL_TYPES: &[(FieldType, &str)] = &[
    (FieldType::Int, "INT"),
    (FieldType::BigInt, "BIGINT"),
    (FieldType::SmallInt, "SMALLINT"),
    (FieldType::TinyInt, "TINYINT"),
    (FieldType::Double, "DOUBLE"),
    (FieldType::Float, "FLOAT"),
    (FieldType::Bool, "BOOLEAN"),
    (FieldType::Timestamp, "TIMESTAMP"),
    (FieldType::DateTime, "DATETIME"),
    (FieldType::Date, "DATE"),
    (FieldType::Time, "TIME"),
    (FieldType::Uuid, "CHAR(36)"),
    (FieldType::Bytes, "BLOB"),
];

impl FieldType {
    /// Semantic column type of a host type, e.g. `FieldType::of::<i32>()`.
    pub fn of<T: SqlRepr>() -> Self {
        T::FIELD_TYPE
    }

    /// SQL column type for this field type. `length` applies to `Text` only.
    pub fn sql_type(&self, length: u32) -> String {
        for (field_type, sql) in SQL_TYPES {
            if field_type == self {
                return (*sql).to_string();
            }
        }
        match self {
            Self::Enum => "VARCHAR(50)".to_string(),
            Self::Text => format!("VARCHAR({})", length),
            _ => "LONGTEXT".to_string(),
        }
    }
}

/// Maps a host type onto its semantic column type.
pub trait SqlRepr {
    const FIELD_TYPE: FieldType;
}

macro_rules! sql_repr {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(impl SqlRepr for $ty {
            const FIELD_TYPE: FieldType = FieldType::$variant;
        })+
    };
}

sql_repr! {
    i32 => Int,
    u32 => Int,
    i64 => BigInt,
    u64 => BigInt,
    i16 => SmallInt,
    u16 => SmallInt,
    i8 => TinyInt,
    u8 => TinyInt,
    f64 => Double,
    f32 => Float,
    bool => Bool,
    chrono::DateTime<chrono::Utc> => Timestamp,
    chrono::NaiveDateTime => DateTime,
    chrono::NaiveDate => Date,
    chrono::NaiveTime => Time,
    uuid::Uuid => Uuid,
    Vec<u8> => Bytes,
    String => Text,
    &str => Text,
}

/// Column rules for one declared field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name as declared on the host type.
    pub name: String,
    /// Explicit column name; derived from `name` when absent.
    #[serde(default)]
    pub column_name: Option<String>,
    pub field_type: FieldType,
    /// Default: false (columns are NOT NULL unless opted out)
    #[serde(default)]
    pub nullable: bool,
    /// Used only for variable-length text.
    #[serde(default = "default_length")]
    pub length: u32,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub unique: bool,
    /// Excluded entirely from the table.
    #[serde(default)]
    pub transient: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub on_update: Option<String>,
}

fn default_length() -> u32 {
    DEFAULT_TEXT_LENGTH
}

impl FieldSchema {
    /// Create a field with defaults: not null, length 255, no constraints.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            column_name: None,
            field_type,
            nullable: false,
            length: DEFAULT_TEXT_LENGTH,
            primary_key: false,
            auto_increment: false,
            unique: false,
            transient: false,
            default_value: None,
            on_update: None,
        }
    }

    /// Set an explicit column name, bypassing derivation.
    pub fn column_name(mut self, name: impl Into<String>) -> Self {
        self.column_name = Some(name.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn on_update(mut self, clause: impl Into<String>) -> Self {
        self.on_update = Some(clause.into());
        self
    }

    /// Effective column name. With `snake_case`, an underscore is inserted
    /// before each upper-case letter that follows a lower-case one and the
    /// whole name is lower-cased; otherwise the field name is used as-is.
    pub fn effective_column_name(&self, snake_case: bool) -> String {
        if let Some(name) = &self.column_name {
            return name.clone();
        }
        if !snake_case {
            return self.name.clone();
        }
        let mut out = String::with_capacity(self.name.len() + 4);
        let mut prev_lower = false;
        for c in self.name.chars() {
            if c.is_uppercase() && prev_lower {
                out.push('_');
            }
            prev_lower = c.is_lowercase();
            out.extend(c.to_lowercase());
        }
        out
    }
}

/// Full declarative metadata for one host type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Fully-qualified name of the host type, used when reporting schemas
    /// that matched no data source.
    pub type_name: String,
    /// Owning data-source id; matched against the registry case-insensitively.
    pub data_source_id: String,
    /// Defaults to the host type's simple name, lower-cased.
    #[serde(default)]
    pub table_name: Option<String>,
    /// Governs default column-name derivation.
    #[serde(default)]
    pub snake_case: bool,
    pub fields: Vec<FieldSchema>,
    /// Type-level composite primary key, rendered as one extra clause.
    #[serde(default)]
    pub primary_key: Option<Vec<String>>,
    /// Type-level composite unique constraint, rendered as one extra clause.
    #[serde(default)]
    pub unique: Option<Vec<String>>,
}

impl TableSchema {
    /// Create a descriptor for `type_name` bound to `data_source_id`.
    pub fn new(type_name: impl Into<String>, data_source_id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            data_source_id: data_source_id.into(),
            table_name: None,
            snake_case: false,
            fields: Vec::new(),
            primary_key: None,
            unique: None,
        }
    }

    /// Set an explicit table name.
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    /// Derive default column names in snake_case.
    pub fn snake_case(mut self) -> Self {
        self.snake_case = true;
        self
    }

    /// Append a field, in declaration order.
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare a type-level composite primary key.
    pub fn composite_primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Declare a type-level composite unique constraint.
    pub fn composite_unique<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Effective table name: explicit name, or the host type's simple name
    /// (final path segment) lower-cased.
    pub fn effective_table_name(&self) -> String {
        match &self.table_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self
                .type_name
                .rsplit("::")
                .next()
                .unwrap_or(&self.type_name)
                .to_lowercase(),
        }
    }
}
