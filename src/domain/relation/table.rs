//! Materialized, in-memory tabular data

use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::schema::Schema;
use super::value::Value;
use crate::domain::DomainError;

/// Rows pulled into memory; serializes as a list of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalTable {
    schema: Schema,
    rows: Vec<Vec<Value>>,
}

impl LocalTable {
    /// Create a table, checking that every row matches the schema width
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Result<Self, DomainError> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != schema.len())
        {
            return Err(DomainError::validation(format!(
                "Row {} has {} values, expected {}",
                index,
                row.len(),
                schema.len()
            )));
        }

        Ok(Self { schema, rows })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// All values of one column
    pub fn column(&self, name: &str) -> Result<Vec<&Value>, DomainError> {
        let index = self.schema.require(name)?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_records(&self) -> Vec<Map<String, JsonValue>> {
        self.rows
            .iter()
            .map(|row| {
                self.schema
                    .columns()
                    .iter()
                    .zip(row)
                    .map(|(column, value)| {
                        (
                            column.clone(),
                            serde_json::to_value(value).unwrap_or(JsonValue::Null),
                        )
                    })
                    .collect()
            })
            .collect()
    }
}

impl Serialize for LocalTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;

        for record in self.to_records() {
            seq.serialize_element(&record)?;
        }

        seq.end()
    }
}

/// Column-oriented wire form used when tables are stored on disk
#[derive(Debug, Clone, Deserialize)]
pub struct TableData {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl TryFrom<TableData> for LocalTable {
    type Error = DomainError;

    fn try_from(data: TableData) -> Result<Self, Self::Error> {
        LocalTable::new(Schema::new(data.columns)?, data.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LocalTable {
        LocalTable::new(
            Schema::new(["SITE", "VALUE"]).unwrap(),
            vec![
                vec![Value::from("S1"), Value::Float(1.5)],
                vec![Value::from("S2"), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let result = LocalTable::new(
            Schema::new(["A", "B"]).unwrap(),
            vec![vec![Value::Int(1)]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_as_records() {
        let json = serde_json::to_value(table()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"SITE": "S1", "VALUE": 1.5},
                {"SITE": "S2", "VALUE": null}
            ])
        );
    }

    #[test]
    fn test_column_access() {
        let table = table();
        let sites = table.column("site").unwrap();
        assert_eq!(sites, vec![&Value::from("S1"), &Value::from("S2")]);
        assert!(table.column("TYPE").is_err());
    }

    #[test]
    fn test_from_table_data() {
        let data: TableData = serde_json::from_str(
            r#"{"columns": ["date", "SITE"], "rows": [["2024-01-02", "S1"]]}"#,
        )
        .unwrap();
        let table = LocalTable::try_from(data).unwrap();
        assert_eq!(table.num_rows(), 1);
        assert!(matches!(table.rows()[0][0], Value::Date(_)));
    }
}
