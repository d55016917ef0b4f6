//! Catalog query descriptors.
//!
//! A dialect turns a [`CatalogFilter`] into [`CatalogQuery`] values: SQL text,
//! positional parameters and the [`RowShape`] the rows must decode into.
//! Drivers execute them and hand back [`CatalogRow`]s of [`CatalogValue`]s.

/// Scoping for a dump run. Absent filters impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Database (PostgreSQL catalog, MySQL schema) to restrict to.
    pub database: Option<String>,

    /// Schema to restrict to.
    pub schema: Option<String>,

    /// Explicit table allow-list; empty means all tables.
    pub tables: Vec<String>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }
}

/// Kind of value expected in one result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    NullableText,
    Int,
}

/// Expected layout of the rows returned by a catalog query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowShape {
    /// catalog, schema, name, type, comment
    Tables,
    /// catalog, schema, table, name, ordinal, default, nullable, data type,
    /// column type, key, extra, comment
    Columns,
    /// constraint, schema, table, column
    ConstraintMembers,
    /// schema, table, constraint, type
    ConstraintTypes,
}

impl RowShape {
    /// Value kind of every result column, in select-list order.
    pub fn kinds(&self) -> &'static [ValueKind] {
        use ValueKind::*;
        match self {
            RowShape::Tables => &[NullableText, Text, Text, Text, NullableText],
            RowShape::Columns => &[
                NullableText,
                Text,
                Text,
                Text,
                Int,
                NullableText,
                Text,
                Text,
                Text,
                NullableText,
                NullableText,
                NullableText,
            ],
            RowShape::ConstraintMembers => &[Text, Text, Text, Text],
            RowShape::ConstraintTypes => &[Text, Text, Text, Text],
        }
    }

    pub fn width(&self) -> usize {
        self.kinds().len()
    }

    /// Short name used in error contexts ("query tables info failed").
    pub fn label(&self) -> &'static str {
        match self {
            RowShape::Tables => "tables",
            RowShape::Columns => "columns",
            RowShape::ConstraintMembers => "constraints",
            RowShape::ConstraintTypes => "constraint defines",
        }
    }
}

/// A decoded catalog value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogValue {
    Null,
    Text(String),
    Int(i64),
}

impl From<&str> for CatalogValue {
    fn from(s: &str) -> Self {
        CatalogValue::Text(s.to_string())
    }
}

impl From<String> for CatalogValue {
    fn from(s: String) -> Self {
        CatalogValue::Text(s)
    }
}

impl From<i64> for CatalogValue {
    fn from(v: i64) -> Self {
        CatalogValue::Int(v)
    }
}

impl<T: Into<CatalogValue>> From<Option<T>> for CatalogValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CatalogValue::Null, Into::into)
    }
}

/// One decoded result row.
pub type CatalogRow = Vec<CatalogValue>;

/// A query ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub sql: String,
    pub params: Vec<String>,
    pub shape: RowShape,
}

/// WHERE clause builder that numbers placeholders as parameters are added.
pub(crate) struct Conditions<F> {
    placeholder: F,
    clauses: Vec<String>,
    params: Vec<String>,
}

impl<F: Fn(usize) -> String> Conditions<F> {
    pub(crate) fn new(placeholder: F) -> Self {
        Self {
            placeholder,
            clauses: Vec::new(),
            params: Vec::new(),
        }
    }

    fn bind(&mut self, value: &str) -> String {
        self.params.push(value.to_string());
        (self.placeholder)(self.params.len())
    }

    /// `column = ?`
    pub(crate) fn equals(&mut self, column: &str, value: &str) -> &mut Self {
        let p = self.bind(value);
        self.clauses.push(format!("{} = {}", column, p));
        self
    }

    /// `column IN (?, ?, ...)`; an empty list adds nothing.
    pub(crate) fn in_list(&mut self, column: &str, values: &[String]) -> &mut Self {
        if values.is_empty() {
            return self;
        }
        let placeholders = values
            .iter()
            .map(|v| self.bind(v))
            .collect::<Vec<_>>()
            .join(", ");
        self.clauses.push(format!("{} IN ({})", column, placeholders));
        self
    }

    /// Literal condition without parameters.
    pub(crate) fn raw(&mut self, clause: impl Into<String>) -> &mut Self {
        self.clauses.push(clause.into());
        self
    }

    /// Append ` WHERE ...` (if any) and ` ORDER BY ...` to `select`.
    pub(crate) fn finish(self, select: &str, order_by: &str, shape: RowShape) -> CatalogQuery {
        let mut sql = select.trim_end().to_string();
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        if !order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        CatalogQuery {
            sql,
            params: self.params,
            shape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_number_placeholders_in_order() {
        let mut cond = Conditions::new(|i| format!("${}", i));
        cond.equals("table_schema", "shop")
            .in_list("table_name", &["orders".to_string(), "items".to_string()]);
        let query = cond.finish("SELECT 1 FROM t", "table_name", RowShape::Tables);

        assert_eq!(
            query.sql,
            "SELECT 1 FROM t WHERE table_schema = $1 AND table_name IN ($2, $3) ORDER BY table_name"
        );
        assert_eq!(query.params, vec!["shop", "orders", "items"]);
    }

    #[test]
    fn test_conditions_without_filters_scan_everything() {
        let mut cond = Conditions::new(|_| "?".to_string());
        cond.in_list("TABLE_NAME", &[]);
        let query = cond.finish("SELECT 1 FROM t", "", RowShape::Tables);
        assert_eq!(query.sql, "SELECT 1 FROM t");
        assert!(query.params.is_empty());
    }

    #[test]
    fn test_row_shape_widths() {
        assert_eq!(RowShape::Tables.width(), 5);
        assert_eq!(RowShape::Columns.width(), 12);
        assert_eq!(RowShape::ConstraintMembers.width(), 4);
        assert_eq!(RowShape::ConstraintTypes.width(), 4);
    }
}
