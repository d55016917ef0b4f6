//! PostgreSQL catalog dialect (Strategy pattern).
//!
//! Tables and constraints come from `information_schema`; columns are read
//! per table from `pg_catalog` so the key role and comments are available.

use crate::core::query::{CatalogFilter, CatalogQuery, Conditions, RowShape};
use crate::core::schema::Table;
use crate::core::traits::CatalogDialect;

/// Schemas hidden when no schema filter is given.
pub const SYSTEM_SCHEMAS: [&str; 3] = ["pg_catalog", "information_schema", "pg_toast"];

const TABLES_SELECT: &str = r#"
SELECT
    t.table_catalog::text,
    t.table_schema::text,
    t.table_name::text,
    t.table_type::text,
    obj_description(format('%I.%I', t.table_schema, t.table_name)::regclass, 'pg_class')
FROM information_schema.tables t
"#;

const COLUMNS_SELECT: &str = r#"
SELECT
    current_database()::text,
    n.nspname::text,
    c.relname::text,
    a.attname::text,
    a.attnum::int8,
    pg_get_expr(d.adbin, d.adrelid),
    CASE WHEN a.attnotnull THEN 'NO' ELSE 'YES' END,
    t.typname::text,
    format_type(a.atttypid, a.atttypmod),
    CASE
        WHEN EXISTS (SELECT 1 FROM pg_constraint k
                     WHERE k.conrelid = c.oid AND k.contype = 'p' AND a.attnum = ANY(k.conkey))
            THEN 'PRIMARY'
        WHEN EXISTS (SELECT 1 FROM pg_constraint k
                     WHERE k.conrelid = c.oid AND k.contype = 'u' AND a.attnum = ANY(k.conkey))
            THEN 'UNIQUE'
        WHEN EXISTS (SELECT 1 FROM pg_constraint k
                     WHERE k.conrelid = c.oid AND k.contype = 'f' AND a.attnum = ANY(k.conkey))
            THEN 'FOREIGN'
        ELSE ''
    END,
    CASE
        WHEN a.attidentity = 'a' THEN 'identity always'
        WHEN a.attidentity = 'd' THEN 'identity by default'
        WHEN a.attgenerated = 's' THEN 'stored generated'
        ELSE ''
    END,
    col_description(c.oid, a.attnum)
FROM pg_attribute a
JOIN pg_class c ON c.oid = a.attrelid
JOIN pg_namespace n ON n.oid = c.relnamespace
JOIN pg_type t ON t.oid = a.atttypid
LEFT JOIN pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
"#;

const MEMBERS_SELECT: &str = r#"
SELECT
    constraint_name::text,
    table_schema::text,
    table_name::text,
    column_name::text
FROM information_schema.key_column_usage
"#;

const TYPES_SELECT: &str = r#"
SELECT
    table_schema::text,
    table_name::text,
    constraint_name::text,
    constraint_type::text
FROM information_schema.table_constraints
"#;

/// PostgreSQL dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Create a new PostgreSQL dialect instance.
    pub fn new() -> Self {
        Self
    }

    // information_schema columns are domains over `name`; compare as text so
    // string parameters bind.
    fn scoped(
        &self,
        filter: &CatalogFilter,
        prefix: &str,
    ) -> Conditions<impl Fn(usize) -> String + '_> {
        let mut cond = Conditions::new(move |i| self.param_placeholder(i));
        if let Some(database) = &filter.database {
            cond.equals(&format!("{}table_catalog::text", prefix), database);
        }
        match &filter.schema {
            Some(schema) => {
                cond.equals(&format!("{}table_schema::text", prefix), schema);
            }
            None => {
                let hidden = SYSTEM_SCHEMAS
                    .iter()
                    .map(|s| format!("'{}'", s))
                    .collect::<Vec<_>>()
                    .join(", ");
                cond.raw(format!("{}table_schema::text NOT IN ({})", prefix, hidden));
            }
        }
        cond.in_list(&format!("{}table_name::text", prefix), &filter.tables);
        cond
    }
}

impl CatalogDialect for PostgresDialect {
    fn name(&self) -> &str {
        "postgres"
    }

    fn param_placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn tables_query(&self, filter: &CatalogFilter) -> CatalogQuery {
        self.scoped(filter, "t.")
            .finish(TABLES_SELECT, "t.table_schema, t.table_name", RowShape::Tables)
    }

    fn columns_queries(&self, _filter: &CatalogFilter, tables: &[Table]) -> Vec<CatalogQuery> {
        tables
            .iter()
            .map(|table| {
                let mut cond = Conditions::new(|i| self.param_placeholder(i));
                cond.equals("n.nspname", &table.schema)
                    .equals("c.relname", &table.name)
                    .raw("a.attnum > 0")
                    .raw("NOT a.attisdropped");
                cond.finish(COLUMNS_SELECT, "a.attnum", RowShape::Columns)
            })
            .collect()
    }

    fn constraint_members_query(&self, filter: &CatalogFilter) -> CatalogQuery {
        self.scoped(filter, "").finish(
            MEMBERS_SELECT,
            "table_schema, table_name, constraint_name, ordinal_position",
            RowShape::ConstraintMembers,
        )
    }

    fn constraint_types_query(&self, filter: &CatalogFilter) -> CatalogQuery {
        self.scoped(filter, "").finish(
            TYPES_SELECT,
            "table_schema, table_name, constraint_name",
            RowShape::ConstraintTypes,
        )
    }
}
