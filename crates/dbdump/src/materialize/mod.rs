//! Row materializer.
//!
//! Runs a dialect's catalog queries over one connection, strictly in order
//! (tables → columns → constraint membership → constraint types), and decodes
//! every row into a typed record. Any failure aborts the run: there is no
//! retry and no partial result.

use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::core::query::{CatalogFilter, CatalogQuery, CatalogRow, CatalogValue, RowShape};
use crate::core::schema::{
    Column, ConstraintKind, ConstraintMember, ConstraintType, Hierarchy, KeyRole, Table, TableKind,
};
use crate::core::traits::{CatalogConnection, CatalogDialect, RowError};
use crate::error::{DumpError, Result};

/// The four record sets read from the catalog, in query order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRows {
    pub tables: Vec<Table>,
    pub columns: Vec<Column>,
    pub constraint_members: Vec<ConstraintMember>,
    pub constraint_types: Vec<ConstraintType>,
}

impl CatalogRows {
    /// Fold the record sets into a [`Hierarchy`].
    pub fn into_hierarchy(self) -> Hierarchy {
        aggregate(
            self.tables,
            self.columns,
            self.constraint_members,
            self.constraint_types,
        )
    }
}

/// Executes catalog queries and decodes their rows.
pub struct Materializer<'a, C: ?Sized, D: ?Sized> {
    conn: &'a C,
    dialect: &'a D,
}

impl<'a, C, D> Materializer<'a, C, D>
where
    C: CatalogConnection + ?Sized,
    D: CatalogDialect + ?Sized,
{
    pub fn new(conn: &'a C, dialect: &'a D) -> Self {
        Self { conn, dialect }
    }

    /// Read all four record sets.
    pub async fn run(&self, filter: &CatalogFilter) -> Result<CatalogRows> {
        let tables = self.load_tables(filter).await?;
        let columns = self.load_columns(filter, &tables).await?;
        let constraint_members = self.load_constraint_members(filter).await?;
        let constraint_types = self.load_constraint_types(filter).await?;

        info!(
            "Read {} tables, {} columns, {} constraint members, {} constraint types",
            tables.len(),
            columns.len(),
            constraint_members.len(),
            constraint_types.len()
        );

        Ok(CatalogRows {
            tables,
            columns,
            constraint_members,
            constraint_types,
        })
    }

    pub async fn load_tables(&self, filter: &CatalogFilter) -> Result<Vec<Table>> {
        let query = self.dialect.tables_query(filter);
        self.fetch(&query, decode_table).await
    }

    /// Columns of `tables`, ordered by ordinal position within each table.
    pub async fn load_columns(
        &self,
        filter: &CatalogFilter,
        tables: &[Table],
    ) -> Result<Vec<Column>> {
        let mut columns = Vec::new();
        for query in self.dialect.columns_queries(filter, tables) {
            columns.extend(self.fetch(&query, decode_column).await?);
        }
        Ok(columns)
    }

    pub async fn load_constraint_members(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Vec<ConstraintMember>> {
        let query = self.dialect.constraint_members_query(filter);
        self.fetch(&query, decode_member).await
    }

    pub async fn load_constraint_types(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Vec<ConstraintType>> {
        let query = self.dialect.constraint_types_query(filter);
        self.fetch(&query, decode_type).await
    }

    async fn fetch<T>(
        &self,
        query: &CatalogQuery,
        decode: fn(&mut Fields<'_>) -> std::result::Result<T, String>,
    ) -> Result<Vec<T>> {
        let label = query.shape.label();
        debug!("Loading {} ({} params)", label, query.params.len());

        let rows = self.conn.query(query).await.map_err(|e| match e {
            RowError::Query(msg) => DumpError::query(format!("query {} info", label), msg),
            RowError::Scan(msg) => DumpError::scan(format!("scan {}", label), msg),
        })?;

        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let mut fields = Fields::new(row, query.shape)?;
                decode(&mut fields)
                    .map_err(|msg| format!("row {}: {}", i + 1, msg))
            })
            .collect::<std::result::Result<Vec<_>, String>>()
            .map_err(|msg| DumpError::scan(format!("scan {}", label), msg))
    }
}

/// Sequential reader over one row, checked against its [`RowShape`].
struct Fields<'r> {
    row: &'r CatalogRow,
    next: usize,
}

impl<'r> Fields<'r> {
    fn new(row: &'r CatalogRow, shape: RowShape) -> std::result::Result<Self, String> {
        if row.len() != shape.width() {
            return Err(format!(
                "expected {} columns, got {}",
                shape.width(),
                row.len()
            ));
        }
        Ok(Self { row, next: 0 })
    }

    fn advance(&mut self) -> (usize, &'r CatalogValue) {
        let row: &'r CatalogRow = self.row;
        let i = self.next;
        self.next += 1;
        (i, &row[i])
    }

    fn text(&mut self) -> std::result::Result<String, String> {
        match self.advance() {
            (_, CatalogValue::Text(s)) => Ok(s.clone()),
            (i, other) => Err(format!("column {}: expected text, got {:?}", i, other)),
        }
    }

    fn nullable_text(&mut self) -> std::result::Result<Option<String>, String> {
        match self.advance() {
            (_, CatalogValue::Text(s)) => Ok(Some(s.clone())),
            (_, CatalogValue::Null) => Ok(None),
            (i, other) => Err(format!("column {}: expected text, got {:?}", i, other)),
        }
    }

    fn int(&mut self) -> std::result::Result<i64, String> {
        match self.advance() {
            (_, CatalogValue::Int(v)) => Ok(*v),
            (i, other) => Err(format!("column {}: expected integer, got {:?}", i, other)),
        }
    }
}

fn decode_table(f: &mut Fields<'_>) -> std::result::Result<Table, String> {
    let catalog = f.nullable_text()?;
    let schema = f.text()?;
    let name = f.text()?;
    let kind = TableKind::parse(&f.text()?);
    let comment = f.nullable_text()?.unwrap_or_default().trim().to_string();

    Ok(Table {
        catalog,
        kind,
        comment,
        ..Table::new(schema, name)
    })
}

fn decode_column(f: &mut Fields<'_>) -> std::result::Result<Column, String> {
    let catalog = f.nullable_text()?;
    let schema = f.text()?;
    let table = f.text()?;
    let name = f.text()?;
    let ordinal = f.int()?;
    let ordinal_position = u32::try_from(ordinal)
        .ok()
        .filter(|&p| p > 0)
        .ok_or_else(|| format!("invalid ordinal position {} for column {}", ordinal, name))?;
    let default = f.nullable_text()?;
    let nullable = f.text()?.trim().eq_ignore_ascii_case("YES");
    let data_type = f.text()?;
    let column_type = f.text()?;
    let key_role = f
        .nullable_text()?
        .map_or(KeyRole::None, |k| KeyRole::parse(&k));
    let extra = f.nullable_text()?.unwrap_or_default();
    let comment = f.nullable_text()?.unwrap_or_default().trim().to_string();

    Ok(Column {
        catalog,
        schema,
        table,
        name,
        ordinal_position,
        nullable,
        default,
        data_type,
        column_type,
        key_role,
        extra,
        comment,
    })
}

fn decode_member(f: &mut Fields<'_>) -> std::result::Result<ConstraintMember, String> {
    let constraint = f.text()?;
    let schema = f.text()?;
    let table = f.text()?;
    let column = f.text()?;
    Ok(ConstraintMember {
        schema,
        table,
        constraint,
        column,
    })
}

fn decode_type(f: &mut Fields<'_>) -> std::result::Result<ConstraintType, String> {
    Ok(ConstraintType {
        schema: f.text()?,
        table: f.text()?,
        constraint: f.text()?,
        kind: ConstraintKind::parse(&f.text()?),
    })
}
