//! In-memory catalog connection for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::query::{CatalogQuery, CatalogRow, CatalogValue, RowShape};
use crate::core::traits::{CatalogConnection, RowError};

/// Answers every query of a given [`RowShape`] with the same canned rows.
#[derive(Default)]
pub struct MemoryConnection {
    rows: HashMap<RowShape, Vec<CatalogRow>>,
    failures: HashMap<RowShape, RowError>,
    executed: Mutex<Vec<CatalogQuery>>,
    closed: AtomicBool,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, shape: RowShape, rows: Vec<CatalogRow>) -> Self {
        self.rows.insert(shape, rows);
        self
    }

    pub fn failing(mut self, shape: RowShape, error: RowError) -> Self {
        self.failures.insert(shape, error);
        self
    }

    pub fn query_count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }

    pub fn executed_shapes(&self) -> Vec<RowShape> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.shape)
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn table_row(schema: &str, name: &str) -> CatalogRow {
        vec![
            "def".into(),
            schema.into(),
            name.into(),
            "BASE TABLE".into(),
            "".into(),
        ]
    }

    /// A nullable integer column without default, key or comment.
    pub fn column_row(schema: &str, table: &str, name: &str, ordinal: i64) -> CatalogRow {
        vec![
            "def".into(),
            schema.into(),
            table.into(),
            name.into(),
            ordinal.into(),
            CatalogValue::Null,
            "YES".into(),
            "int".into(),
            "int(11)".into(),
            "".into(),
            "".into(),
            "".into(),
        ]
    }

    pub fn member_row(schema: &str, table: &str, constraint: &str, column: &str) -> CatalogRow {
        vec![
            constraint.into(),
            schema.into(),
            table.into(),
            column.into(),
        ]
    }

    pub fn type_row(schema: &str, table: &str, constraint: &str, kind: &str) -> CatalogRow {
        vec![schema.into(), table.into(), constraint.into(), kind.into()]
    }
}

#[async_trait]
impl CatalogConnection for MemoryConnection {
    async fn query(&self, query: &CatalogQuery) -> Result<Vec<CatalogRow>, RowError> {
        self.executed.lock().unwrap().push(query.clone());
        if let Some(err) = self.failures.get(&query.shape) {
            return Err(err.clone());
        }
        Ok(self.rows.get(&query.shape).cloned().unwrap_or_default())
    }

    fn db_type(&self) -> &str {
        "memory"
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// `shop.orders(id PK, total)` with primary key `orders_pkey`.
pub fn shop_rows() -> MemoryConnection {
    let mut orders = MemoryConnection::table_row("shop", "orders");
    orders[4] = "  customer orders ".into();

    let mut id = MemoryConnection::column_row("shop", "orders", "id", 1);
    id[6] = "NO".into();
    id[9] = "PRI".into();
    id[10] = "auto_increment".into();

    let mut total = MemoryConnection::column_row("shop", "orders", "total", 2);
    total[5] = "".into();
    total[7] = "decimal".into();
    total[8] = "decimal(10,2)".into();

    MemoryConnection::new()
        .with_rows(RowShape::Tables, vec![orders])
        .with_rows(RowShape::Columns, vec![id, total])
        .with_rows(
            RowShape::ConstraintMembers,
            vec![MemoryConnection::member_row(
                "shop",
                "orders",
                "orders_pkey",
                "id",
            )],
        )
        .with_rows(
            RowShape::ConstraintTypes,
            vec![MemoryConnection::type_row(
                "shop",
                "orders",
                "orders_pkey",
                "PRIMARY KEY",
            )],
        )
}
