//! Relation domain - lazily evaluated datasets and their materialized form

mod expr;
mod schema;
mod table;
mod value;

pub use expr::{col, lit, month, Expr, Predicate, ScalarFunction};
pub use schema::Schema;
pub use table::{LocalTable, TableData};
pub use value::Value;

use std::sync::Arc;

use crate::domain::DomainError;

/// Pending operation on a relation
#[derive(Debug, Clone)]
enum Operation {
    Filter(Predicate),
    WithColumn { name: String, expr: Expr },
}

/// Lazily evaluated dataset handle
///
/// Operations are recorded and checked against the schema when added;
/// rows are only touched by [`Relation::to_local_table`].
#[derive(Debug, Clone)]
pub struct Relation {
    name: String,
    source: Arc<LocalTable>,
    operations: Vec<Operation>,
    schema: Schema,
}

impl Relation {
    pub fn new(name: impl Into<String>, source: Arc<LocalTable>) -> Self {
        let schema = source.schema().clone();
        Self {
            name: name.into(),
            source,
            operations: Vec::new(),
            schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema after all pending operations
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn pending_operations(&self) -> usize {
        self.operations.len()
    }

    /// Keep rows matching `predicate`
    ///
    /// Fails immediately if the predicate reads a column this relation lacks.
    pub fn filter(&self, predicate: Predicate) -> Result<Relation, DomainError> {
        predicate.validate(&self.schema)?;

        let mut next = self.clone();
        next.operations.push(Operation::Filter(predicate));
        Ok(next)
    }

    /// Append a computed column
    pub fn with_column(
        &self,
        name: impl Into<String>,
        expr: Expr,
    ) -> Result<Relation, DomainError> {
        let name = name.into();
        expr.validate(&self.schema)?;

        let mut next = self.clone();
        next.schema.push(name.clone())?;
        next.operations.push(Operation::WithColumn { name, expr });
        Ok(next)
    }

    /// Evaluate pending operations and pull the rows into memory
    pub fn to_local_table(&self) -> Result<LocalTable, DomainError> {
        let mut schema = self.source.schema().clone();
        let mut rows: Vec<Vec<Value>> = self.source.rows().to_vec();

        for operation in &self.operations {
            match operation {
                Operation::Filter(predicate) => {
                    let mut kept = Vec::with_capacity(rows.len());

                    for row in rows {
                        if predicate.matches(&schema, &row)? {
                            kept.push(row);
                        }
                    }
                    rows = kept;
                }
                Operation::WithColumn { name, expr } => {
                    for row in rows.iter_mut() {
                        let value = expr.evaluate(&schema, row)?;
                        row.push(value);
                    }
                    schema.push(name.clone())?;
                }
            }
        }

        LocalTable::new(schema, rows)
    }
}
