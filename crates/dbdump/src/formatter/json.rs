//! Structural JSON formatter.

use serde::Deserialize;

use super::{config_text, Formatter};
use crate::core::schema::Hierarchy;
use crate::error::{DumpError, Result};

/// Options accepted by the `json` formatter, given as YAML or JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonOptions {
    /// Indent the output.
    #[serde(default)]
    pub pretty: bool,
}

/// Lossless JSON rendering of the hierarchy, preserving schema and table order.
#[derive(Debug, Default)]
pub struct JsonFormatter {
    options: JsonOptions,
}

impl JsonFormatter {
    pub const NAME: &'static str = "json";

    pub fn new() -> Self {
        Self::default()
    }
}

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn initialize(&mut self, config: &[u8]) -> Result<()> {
        if let Some(text) = config_text(Self::NAME, config)? {
            self.options = serde_yaml::from_str(text)
                .map_err(|e| DumpError::formatter_config(Self::NAME, e))?;
        }
        Ok(())
    }

    fn format(&self, hierarchy: &Hierarchy) -> Result<Vec<u8>> {
        let encoded = if self.options.pretty {
            serde_json::to_vec_pretty(hierarchy)
        } else {
            serde_json::to_vec(hierarchy)
        };
        encoded.map_err(|e| DumpError::format(Self::NAME, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::core::schema::{
        Column, ConstraintKind, ConstraintMember, ConstraintType, KeyRole, Table,
    };

    fn column(schema: &str, table: &str, name: &str, ordinal: u32) -> Column {
        Column {
            catalog: Some("def".into()),
            schema: schema.into(),
            table: table.into(),
            name: name.into(),
            ordinal_position: ordinal,
            nullable: ordinal > 1,
            default: (ordinal == 3).then(String::new),
            data_type: "varchar".into(),
            column_type: "varchar(32)".into(),
            key_role: if ordinal == 1 { KeyRole::Primary } else { KeyRole::None },
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

    /// Two schemas, three tables, one composite key.
    fn sample() -> Hierarchy {
        aggregate(
            vec![
                Table::new("shop", "orders"),
                Table::new("shop", "order_items"),
                Table::new("audit", "events"),
            ],
            vec![
                column("shop", "orders", "id", 1),
                column("shop", "orders", "total", 2),
                column("shop", "order_items", "order_id", 1),
                column("shop", "order_items", "line_no", 2),
                column("shop", "order_items", "sku", 3),
                column("audit", "events", "id", 1),
                column("audit", "events", "payload", 4),
            ],
            vec![
                member("shop", "orders", "orders_pkey", "id"),
                member("shop", "order_items", "order_items_pkey", "order_id"),
                member("shop", "order_items", "order_items_pkey", "line_no"),
                member("shop", "order_items", "order_items_order_fk", "order_id"),
                member("audit", "events", "events_pkey", "id"),
            ],
            vec![
                ConstraintType {
                    schema: "shop".into(),
                    table: "order_items".into(),
                    constraint: "order_items_pkey".into(),
                    kind: ConstraintKind::PrimaryKey,
                },
                ConstraintType {
                    schema: "shop".into(),
                    table: "order_items".into(),
                    constraint: "order_items_order_fk".into(),
                    kind: ConstraintKind::ForeignKey,
                },
            ],
        )
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let hierarchy = sample();
        let formatter = JsonFormatter::new();
        let bytes = formatter.format(&hierarchy).unwrap();

        let decoded: Hierarchy = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, hierarchy);

        let items = decoded.table("shop", "order_items").unwrap();
        assert_eq!(
            items.constraint("order_items_pkey").unwrap().members,
            vec!["order_id", "line_no"]
        );
        let ordinals: Vec<u32> = decoded
            .table("audit", "events")
            .unwrap()
            .columns
            .iter()
            .map(|c| c.ordinal_position)
            .collect();
        assert_eq!(ordinals, vec![1, 4]);
        assert_eq!(decoded.schema_names().collect::<Vec<_>>(), vec!["shop", "audit"]);
    }

    #[test]
    fn test_output_is_stable_and_ordered() {
        let formatter = JsonFormatter::new();
        let first = formatter.format(&sample()).unwrap();
        let second = formatter.format(&sample()).unwrap();
        assert_eq!(first, second);

        let text = String::from_utf8(first).unwrap();
        let shop = text.find("\"shop\"").unwrap();
        let audit = text.find("\"audit\"").unwrap();
        assert!(shop < audit);
        assert!(text.find("\"orders\"").unwrap() < text.find("\"order_items\"").unwrap());
    }

    #[test]
    fn test_unknown_kind_serializes_as_empty_string() {
        let text = String::from_utf8(JsonFormatter::new().format(&sample()).unwrap()).unwrap();
        assert!(text.contains(r#""name":"orders_pkey","kind":"""#));
    }

    #[test]
    fn test_pretty_option() {
        let mut formatter = JsonFormatter::new();
        formatter.initialize(b"pretty: true").unwrap();
        let text = String::from_utf8(formatter.format(&sample()).unwrap()).unwrap();
        assert!(text.contains("\n  \"shop\""));

        let mut formatter = JsonFormatter::new();
        formatter.initialize(br#"{"pretty": false}"#).unwrap();
        let text = String::from_utf8(formatter.format(&sample()).unwrap()).unwrap();
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_blank_config_is_default() {
        let mut formatter = JsonFormatter::new();
        formatter.initialize(b"  \n").unwrap();
        formatter.initialize(b"").unwrap();
    }

    #[test]
    fn test_bad_config_is_config_error() {
        let mut formatter = JsonFormatter::new();
        let err = formatter.initialize(b"indent: 4").unwrap_err();
        assert!(matches!(err, DumpError::FormatterConfig { .. }));
        assert!(err.to_string().starts_with("initialize formatter json failed"));

        assert!(formatter.initialize(&[0xff, 0xfe]).is_err());
    }
}
