//! Schema metadata types for tables, columns and constraints.
//!
//! These types are the database-agnostic representation produced by the
//! aggregator and handed to formatters. All of them serialize losslessly so
//! structural formatters can re-encode a [`Hierarchy`] and decode it back.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kind of a catalog relation, spelled the way `information_schema` spells it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    #[serde(rename = "BASE TABLE")]
    BaseTable,
    #[serde(rename = "VIEW")]
    View,
    #[serde(rename = "SYSTEM VIEW")]
    SystemView,
    #[serde(rename = "LOCAL TEMPORARY")]
    Temporary,
    #[serde(rename = "FOREIGN")]
    Foreign,
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl TableKind {
    /// Parse a `TABLE_TYPE` value.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "BASE TABLE" => TableKind::BaseTable,
            "VIEW" => TableKind::View,
            "SYSTEM VIEW" => TableKind::SystemView,
            "LOCAL TEMPORARY" | "TEMPORARY" => TableKind::Temporary,
            "FOREIGN" | "FOREIGN TABLE" => TableKind::Foreign,
            _ => TableKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::BaseTable => "BASE TABLE",
            TableKind::View => "VIEW",
            TableKind::SystemView => "SYSTEM VIEW",
            TableKind::Temporary => "LOCAL TEMPORARY",
            TableKind::Foreign => "FOREIGN",
            TableKind::Unknown => "",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a column plays in the keys of its table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    Primary,
    Unique,
    Foreign,
    /// Part of a non-unique index (MySQL `MUL`).
    Indexed,
    #[default]
    None,
}

impl KeyRole {
    /// Parse a catalog key marker.
    ///
    /// Accepts MySQL `COLUMN_KEY` values (`PRI`, `UNI`, `MUL`) and the long
    /// forms the PostgreSQL column query emits.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "PRI" | "PRIMARY" => KeyRole::Primary,
            "UNI" | "UNIQUE" => KeyRole::Unique,
            "FOR" | "FOREIGN" => KeyRole::Foreign,
            "MUL" => KeyRole::Indexed,
            _ => KeyRole::None,
        }
    }
}

/// Kind of a table constraint, resolved from `TABLE_CONSTRAINTS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    #[serde(rename = "PRIMARY KEY")]
    PrimaryKey,
    #[serde(rename = "UNIQUE")]
    Unique,
    #[serde(rename = "FOREIGN KEY")]
    ForeignKey,
    #[serde(rename = "CHECK")]
    Check,
    /// Membership was seen but no type row matched it.
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl ConstraintKind {
    /// Parse a `CONSTRAINT_TYPE` value.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "PRIMARY KEY" => ConstraintKind::PrimaryKey,
            "UNIQUE" => ConstraintKind::Unique,
            "FOREIGN KEY" => ConstraintKind::ForeignKey,
            "CHECK" => ConstraintKind::Check,
            _ => ConstraintKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::PrimaryKey => "PRIMARY KEY",
            ConstraintKind::Unique => "UNIQUE",
            ConstraintKind::ForeignKey => "FOREIGN KEY",
            ConstraintKind::Check => "CHECK",
            ConstraintKind::Unknown => "",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Catalog name (MySQL reports `def`).
    pub catalog: Option<String>,

    /// Schema (MySQL database) name.
    pub schema: String,

    /// Owning table name.
    pub table: String,

    /// Column name.
    pub name: String,

    /// 1-based ordinal position; defines display order.
    pub ordinal_position: u32,

    /// Whether the column accepts NULL.
    pub nullable: bool,

    /// Default expression. `None` means no default, `Some("")` an empty-string default.
    pub default: Option<String>,

    /// Normalized type name (e.g. `varchar`).
    pub data_type: String,

    /// Declared type as written (e.g. `varchar(255)`).
    pub column_type: String,

    /// Key role of the column.
    pub key_role: KeyRole,

    /// Vendor-specific attribute (e.g. `auto_increment`, `identity`).
    pub extra: String,

    /// Column comment, trimmed.
    pub comment: String,
}

/// Table constraint with its member columns in definition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub kind: ConstraintKind,
    /// Member columns, in the order they appear in the constraint definition.
    pub members: Vec<String>,
}

impl Constraint {
    /// Create a constraint with no members and an unknown kind.
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            name: name.into(),
            kind: ConstraintKind::Unknown,
            members: Vec::new(),
        }
    }
}

/// Table metadata with its owned columns and constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Catalog name, when the engine reports one.
    pub catalog: Option<String>,

    /// Schema (MySQL database) name.
    pub schema: String,

    /// Table name.
    pub name: String,

    /// Base table, view, ...
    pub kind: TableKind,

    /// Table comment, trimmed.
    pub comment: String,

    /// Columns in ascending ordinal order.
    pub columns: Vec<Column>,

    /// Constraints in first-seen order.
    pub constraints: Vec<Constraint>,
}

impl Table {
    /// Create a table with no columns or constraints.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: schema.into(),
            name: name.into(),
            kind: TableKind::BaseTable,
            comment: String::new(),
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Get the fully qualified table name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Find a constraint by name.
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Primary key constraint, if one was resolved.
    pub fn primary_key(&self) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|c| c.kind == ConstraintKind::PrimaryKey)
    }
}

/// One `(constraint, table, column)` membership row from key column usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintMember {
    pub schema: String,
    pub table: String,
    pub constraint: String,
    pub column: String,
}

/// One constraint type row from `TABLE_CONSTRAINTS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintType {
    pub schema: String,
    pub table: String,
    pub constraint: String,
    pub kind: ConstraintKind,
}

/// Schema name → tables, in first-seen order at both levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hierarchy {
    schemas: IndexMap<String, Vec<Table>>,
}

impl Hierarchy {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table under its schema, creating the schema entry on first use.
    pub fn push(&mut self, table: Table) {
        self.schemas
            .entry(table.schema.clone())
            .or_default()
            .push(table);
    }

    /// Tables of one schema.
    pub fn tables(&self, schema: &str) -> Option<&[Table]> {
        self.schemas.get(schema).map(Vec::as_slice)
    }

    /// Look up a table by schema and name.
    pub fn table(&self, schema: &str, name: &str) -> Option<&Table> {
        self.tables(schema)?.iter().find(|t| t.name == name)
    }

    /// Iterate schemas in order with their tables.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Table])> {
        self.schemas
            .iter()
            .map(|(name, tables)| (name.as_str(), tables.as_slice()))
    }

    /// Schema names in order.
    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    pub fn table_count(&self) -> usize {
        self.schemas.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl From<IndexMap<String, Vec<Table>>> for Hierarchy {
    fn from(schemas: IndexMap<String, Vec<Table>>) -> Self {
        Self { schemas }
    }
}

impl FromIterator<Table> for Hierarchy {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        let mut hierarchy = Hierarchy::new();
        for table in iter {
            hierarchy.push(table);
        }
        hierarchy
    }
}
