//! In-memory join of the catalog record sets into a [`Hierarchy`].
//!
//! The four record sets are joined by `(schema, table[, constraint])` keys
//! using insertion-ordered maps, so the output order is exactly the
//! first-seen order of the input rows. Aggregation performs no I/O and
//! cannot fail: rows that reference unknown tables or constraints are
//! dropped.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::schema::{
    Column, Constraint, ConstraintMember, ConstraintType, Hierarchy, Table,
};

type TableKey = (String, String);

/// Fold table, column, constraint membership and constraint type rows into a
/// schema → table → {columns, constraints} hierarchy.
///
/// - Schemas and tables keep the order of `tables`; a repeated table keeps
///   its first occurrence.
/// - Columns attach to their table in input order (the queries return them
///   by ordinal position). A column whose table is unknown, or whose ordinal
///   repeats one already attached, is dropped.
/// - The first membership row of a constraint creates it; later rows append
///   the column. Member order is membership row order.
/// - A type row sets the kind of an existing constraint; otherwise it is
///   dropped. Membership-only constraints keep the unknown kind.
pub fn aggregate(
    tables: Vec<Table>,
    columns: Vec<Column>,
    members: Vec<ConstraintMember>,
    types: Vec<ConstraintType>,
) -> Hierarchy {
    let mut index: IndexMap<String, IndexMap<String, Table>> = IndexMap::new();
    for mut table in tables {
        let by_name = index.entry(table.schema.clone()).or_default();
        if by_name.contains_key(&table.name) {
            debug!("Duplicate table row for {}, keeping the first", table.full_name());
            continue;
        }
        table.columns.clear();
        table.constraints.clear();
        by_name.insert(table.name.clone(), table);
    }

    attach_columns(&mut index, columns);

    let constraints = index_constraints(members, types);
    let mut orphaned = 0usize;
    for ((schema, table_name), by_name) in constraints {
        match index
            .get_mut(&schema)
            .and_then(|tables| tables.get_mut(&table_name))
        {
            Some(table) => table.constraints.extend(by_name.into_values()),
            None => orphaned += by_name.len(),
        }
    }
    if orphaned > 0 {
        debug!("Dropped {} constraints of tables outside the table set", orphaned);
    }

    index
        .into_iter()
        .map(|(schema, by_name)| (schema, by_name.into_values().collect()))
        .collect::<IndexMap<_, Vec<_>>>()
        .into()
}

fn attach_columns(index: &mut IndexMap<String, IndexMap<String, Table>>, columns: Vec<Column>) {
    let mut seen: HashSet<(String, String, u32)> = HashSet::new();
    let mut orphaned = 0usize;

    for column in columns {
        let Some(table) = index
            .get_mut(&column.schema)
            .and_then(|tables| tables.get_mut(&column.table))
        else {
            orphaned += 1;
            continue;
        };

        let key = (
            column.schema.clone(),
            column.table.clone(),
            column.ordinal_position,
        );
        if !seen.insert(key) {
            warn!(
                "Dropping column {} of {}: ordinal {} already taken",
                column.name,
                table.full_name(),
                column.ordinal_position
            );
            continue;
        }
        table.columns.push(column);
    }

    if orphaned > 0 {
        debug!("Dropped {} columns of tables outside the table set", orphaned);
    }
}

/// `(schema, table)` → constraint name → constraint, in first-seen order.
fn index_constraints(
    members: Vec<ConstraintMember>,
    types: Vec<ConstraintType>,
) -> IndexMap<TableKey, IndexMap<String, Constraint>> {
    let mut index: IndexMap<TableKey, IndexMap<String, Constraint>> = IndexMap::new();

    for member in members {
        index
            .entry((member.schema.clone(), member.table.clone()))
            .or_default()
            .entry(member.constraint.clone())
            .or_insert_with(|| Constraint::new(member.schema, member.table, member.constraint))
            .members
            .push(member.column);
    }

    for row in types {
        match index
            .get_mut(&(row.schema, row.table))
            .and_then(|by_name| by_name.get_mut(&row.constraint))
        {
            Some(constraint) => constraint.kind = row.kind,
            None => debug!(
                "No membership rows for constraint {}, dropping its type",
                row.constraint
            ),
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{ConstraintKind, KeyRole};

    fn column(schema: &str, table: &str, name: &str, ordinal: u32) -> Column {
        Column {
            catalog: None,
            schema: schema.into(),
            table: table.into(),
            name: name.into(),
            ordinal_position: ordinal,
            nullable: true,
            default: None,
            data_type: "int".into(),
            column_type: "int".into(),
            key_role: KeyRole::None,
            extra: String::new(),
            comment: String::new(),
        }
    }

    fn member(schema: &str, table: &str, constraint: &str, col: &str) -> ConstraintMember {
        ConstraintMember {
            schema: schema.into(),
            table: table.into(),
            constraint: constraint.into(),
            column: col.into(),
        }
    }

    fn kind(schema: &str, table: &str, constraint: &str, kind: ConstraintKind) -> ConstraintType {
        ConstraintType {
            schema: schema.into(),
            table: table.into(),
            constraint: constraint.into(),
            kind,
        }
    }

    #[test]
    fn test_shop_orders_scenario() {
        let mut id = column("shop", "orders", "id", 1);
        id.nullable = false;
        id.key_role = KeyRole::Primary;
        let total = column("shop", "orders", "total", 2);

        let hierarchy = aggregate(
            vec![Table::new("shop", "orders")],
            vec![id, total],
            vec![member("shop", "orders", "orders_pkey", "id")],
            vec![kind("shop", "orders", "orders_pkey", ConstraintKind::PrimaryKey)],
        );

        assert_eq!(hierarchy.schema_names().collect::<Vec<_>>(), vec!["shop"]);
        let orders = hierarchy.table("shop", "orders").unwrap();
        let names: Vec<_> = orders.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "total"]);
        assert!(!orders.columns[0].nullable);
        assert!(orders.columns[1].nullable);

        assert_eq!(orders.constraints.len(), 1);
        let pk = orders.primary_key().unwrap();
        assert_eq!(pk.name, "orders_pkey");
        assert_eq!(pk.members, vec!["id"]);
    }

    #[test]
    fn test_order_follows_table_rows() {
        let hierarchy = aggregate(
            vec![
                Table::new("b", "z"),
                Table::new("a", "y"),
                Table::new("b", "x"),
                Table::new("a", "w"),
            ],
            vec![],
            vec![],
            vec![],
        );

        let layout: Vec<(String, Vec<String>)> = hierarchy
            .iter()
            .map(|(s, tables)| (s.to_string(), tables.iter().map(|t| t.name.clone()).collect()))
            .collect();
        assert_eq!(
            layout,
            vec![
                ("b".to_string(), vec!["z".to_string(), "x".to_string()]),
                ("a".to_string(), vec!["y".to_string(), "w".to_string()]),
            ]
        );
    }

    #[test]
    fn test_determinism() {
        let build = || {
            aggregate(
                vec![Table::new("s", "t1"), Table::new("s", "t2")],
                vec![column("s", "t2", "a", 1), column("s", "t1", "b", 1)],
                vec![
                    member("s", "t1", "u", "b"),
                    member("s", "t2", "p", "a"),
                ],
                vec![kind("s", "t2", "p", ConstraintKind::PrimaryKey)],
            )
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_ordinal_gaps_are_preserved() {
        let hierarchy = aggregate(
            vec![Table::new("s", "t")],
            vec![column("s", "t", "a", 1), column("s", "t", "c", 3)],
            vec![],
            vec![],
        );
        let ordinals: Vec<u32> = hierarchy
            .table("s", "t")
            .unwrap()
            .columns
            .iter()
            .map(|c| c.ordinal_position)
            .collect();
        assert_eq!(ordinals, vec![1, 3]);
    }

    #[test]
    fn test_duplicate_ordinal_is_dropped() {
        let hierarchy = aggregate(
            vec![Table::new("s", "t")],
            vec![column("s", "t", "a", 1), column("s", "t", "a_again", 1)],
            vec![],
            vec![],
        );
        let table = hierarchy.table("s", "t").unwrap();
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].name, "a");
    }

    #[test]
    fn test_member_order_is_first_seen_not_alphabetical() {
        let hierarchy = aggregate(
            vec![Table::new("s", "t")],
            vec![],
            vec![
                member("s", "t", "uk", "zeta"),
                member("s", "t", "uk", "alpha"),
                member("s", "t", "uk", "mid"),
            ],
            vec![kind("s", "t", "uk", ConstraintKind::Unique)],
        );
        let uk = hierarchy.table("s", "t").unwrap().constraint("uk").unwrap();
        assert_eq!(uk.members, vec!["zeta", "alpha", "mid"]);
        assert_eq!(uk.kind, ConstraintKind::Unique);
    }

    #[test]
    fn test_orphan_rows_are_dropped() {
        let hierarchy = aggregate(
            vec![Table::new("s", "t")],
            vec![column("s", "missing", "a", 1), column("other", "t", "b", 1)],
            vec![
                member("s", "t", "pk", "id"),
                member("s", "missing", "fk", "x"),
            ],
            vec![
                kind("s", "t", "pk", ConstraintKind::PrimaryKey),
                kind("s", "t", "chk", ConstraintKind::Check),
                kind("nowhere", "t", "pk", ConstraintKind::PrimaryKey),
            ],
        );

        assert_eq!(hierarchy.schema_count(), 1);
        assert_eq!(hierarchy.table_count(), 1);
        let table = hierarchy.table("s", "t").unwrap();
        assert!(table.columns.is_empty());
        assert_eq!(table.constraints.len(), 1);
        assert_eq!(table.constraints[0].name, "pk");
        assert!(table.constraint("chk").is_none());
    }

    #[test]
    fn test_membership_only_constraint_has_unknown_kind() {
        let hierarchy = aggregate(
            vec![Table::new("s", "t")],
            vec![],
            vec![member("s", "t", "fk_t_u", "u_id")],
            vec![],
        );
        let fk = hierarchy.table("s", "t").unwrap().constraint("fk_t_u").unwrap();
        assert_eq!(fk.kind, ConstraintKind::Unknown);
        assert_eq!(fk.members, vec!["u_id"]);
    }

    #[test]
    fn test_same_constraint_name_in_two_tables_does_not_leak() {
        let hierarchy = aggregate(
            vec![Table::new("s", "a"), Table::new("s", "b")],
            vec![],
            vec![member("s", "a", "PRIMARY", "id"), member("s", "b", "PRIMARY", "code")],
            vec![
                kind("s", "a", "PRIMARY", ConstraintKind::PrimaryKey),
                kind("s", "b", "PRIMARY", ConstraintKind::PrimaryKey),
            ],
        );

        for (table, col) in [("a", "id"), ("b", "code")] {
            let t = hierarchy.table("s", table).unwrap();
            assert_eq!(t.constraints.len(), 1);
            let pk = &t.constraints[0];
            assert_eq!((pk.schema.as_str(), pk.table.as_str()), ("s", table));
            assert_eq!(pk.members, vec![col]);
        }
    }

    #[test]
    fn test_duplicate_table_row_keeps_first() {
        let mut first = Table::new("s", "t");
        first.comment = "first".into();
        let mut second = Table::new("s", "t");
        second.comment = "second".into();

        let hierarchy = aggregate(vec![first, second], vec![], vec![], vec![]);
        assert_eq!(hierarchy.table_count(), 1);
        assert_eq!(hierarchy.table("s", "t").unwrap().comment, "first");
    }

    #[test]
    fn test_empty_input_is_empty_hierarchy() {
        assert!(aggregate(vec![], vec![], vec![], vec![]).is_empty());
    }
}
