//! MySQL/MariaDB catalog dialect (Strategy pattern).
//!
//! Reads `INFORMATION_SCHEMA` with `?` placeholders. Columns come back in a
//! single bulk query ordered by schema, table and ordinal position.

use crate::core::query::{CatalogFilter, CatalogQuery, Conditions, RowShape};
use crate::core::schema::Table;
use crate::core::traits::CatalogDialect;

// information_schema may report VARBINARY under some collations, so every
// text column is cast to CHAR and every number to SIGNED.
const TABLES_SELECT: &str = r#"
SELECT
    CAST(TABLE_CATALOG AS CHAR(255)) AS TABLE_CATALOG,
    CAST(TABLE_SCHEMA AS CHAR(255)) AS TABLE_SCHEMA,
    CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME,
    CAST(TABLE_TYPE AS CHAR(255)) AS TABLE_TYPE,
    CAST(TABLE_COMMENT AS CHAR(2048)) AS TABLE_COMMENT
FROM INFORMATION_SCHEMA.TABLES
"#;

const COLUMNS_SELECT: &str = r#"
SELECT
    CAST(TABLE_CATALOG AS CHAR(255)) AS TABLE_CATALOG,
    CAST(TABLE_SCHEMA AS CHAR(255)) AS TABLE_SCHEMA,
    CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME,
    CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
    CAST(ORDINAL_POSITION AS SIGNED) AS ORDINAL_POSITION,
    CAST(COLUMN_DEFAULT AS CHAR) AS COLUMN_DEFAULT,
    CAST(IS_NULLABLE AS CHAR(3)) AS IS_NULLABLE,
    CAST(DATA_TYPE AS CHAR(255)) AS DATA_TYPE,
    CAST(COLUMN_TYPE AS CHAR) AS COLUMN_TYPE,
    CAST(COLUMN_KEY AS CHAR(3)) AS COLUMN_KEY,
    CAST(EXTRA AS CHAR(255)) AS EXTRA,
    CAST(COLUMN_COMMENT AS CHAR(1024)) AS COLUMN_COMMENT
FROM INFORMATION_SCHEMA.COLUMNS
"#;

const MEMBERS_SELECT: &str = r#"
SELECT
    CAST(CONSTRAINT_NAME AS CHAR(255)) AS CONSTRAINT_NAME,
    CAST(TABLE_SCHEMA AS CHAR(255)) AS TABLE_SCHEMA,
    CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME,
    CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME
FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE
"#;

const TYPES_SELECT: &str = r#"
SELECT
    CAST(TABLE_SCHEMA AS CHAR(255)) AS TABLE_SCHEMA,
    CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME,
    CAST(CONSTRAINT_NAME AS CHAR(255)) AS CONSTRAINT_NAME,
    CAST(CONSTRAINT_TYPE AS CHAR(255)) AS CONSTRAINT_TYPE
FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS
"#;

/// MySQL/MariaDB dialect implementation.
///
/// A MySQL database is a schema, so the schema filter (or, failing that,
/// the database filter) constrains `TABLE_SCHEMA`.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self
    }

    fn scoped(&self, filter: &CatalogFilter) -> Conditions<impl Fn(usize) -> String + '_> {
        let mut cond = Conditions::new(move |i| self.param_placeholder(i));
        if let Some(scope) = filter.schema.as_ref().or(filter.database.as_ref()) {
            cond.equals("TABLE_SCHEMA", scope);
        }
        cond.in_list("TABLE_NAME", &filter.tables);
        cond
    }
}

impl CatalogDialect for MysqlDialect {
    fn name(&self) -> &str {
        "mysql"
    }

    fn param_placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn tables_query(&self, filter: &CatalogFilter) -> CatalogQuery {
        self.scoped(filter)
            .finish(TABLES_SELECT, "TABLE_SCHEMA, TABLE_NAME", RowShape::Tables)
    }

    fn columns_queries(&self, filter: &CatalogFilter, _tables: &[Table]) -> Vec<CatalogQuery> {
        vec![self.scoped(filter).finish(
            COLUMNS_SELECT,
            "TABLE_SCHEMA, TABLE_NAME, ORDINAL_POSITION",
            RowShape::Columns,
        )]
    }

    fn constraint_members_query(&self, filter: &CatalogFilter) -> CatalogQuery {
        self.scoped(filter).finish(
            MEMBERS_SELECT,
            "TABLE_SCHEMA, TABLE_NAME, CONSTRAINT_NAME, ORDINAL_POSITION",
            RowShape::ConstraintMembers,
        )
    }

    fn constraint_types_query(&self, filter: &CatalogFilter) -> CatalogQuery {
        self.scoped(filter).finish(
            TYPES_SELECT,
            "TABLE_SCHEMA, TABLE_NAME, CONSTRAINT_NAME",
            RowShape::ConstraintTypes,
        )
    }
}
