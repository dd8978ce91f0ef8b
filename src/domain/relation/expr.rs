//! Column expressions and row predicates

use std::fmt;
use std::sync::Arc;

use super::schema::Schema;
use super::value::Value;
use crate::domain::DomainError;

/// A row-wise function that can be applied inside an expression
///
/// Models expose their scoring logic through this trait so that inference
/// stays lazy until the relation is materialized.
pub trait ScalarFunction: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn invoke(&self, args: &[Value]) -> Result<Value, DomainError>;
}

/// Column expression evaluated against a single row
#[derive(Debug, Clone)]
pub enum Expr {
    Column(String),
    Literal(Value),
    Month(Box<Expr>),
    Call {
        function: Arc<dyn ScalarFunction>,
        args: Vec<Expr>,
    },
}

/// Reference a column by name
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

/// Literal value
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

/// Month (1-12) of a date-valued expression
pub fn month(expr: Expr) -> Expr {
    Expr::Month(Box::new(expr))
}

impl Expr {
    pub fn call(function: Arc<dyn ScalarFunction>, args: Vec<Expr>) -> Self {
        Self::Call { function, args }
    }

    /// Predicate comparing this expression with another for equality
    pub fn equals(self, other: impl Into<Expr>) -> Predicate {
        Predicate::Eq(self, other.into())
    }

    /// Names of every column the expression reads
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut columns = Vec::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Column(name) => out.push(name),
            Self::Literal(_) => {}
            Self::Month(inner) => inner.collect_columns(out),
            Self::Call { args, .. } => {
                for arg in args {
                    arg.collect_columns(out);
                }
            }
        }
    }

    /// Fail with `MissingColumn` if any referenced column is absent
    pub fn validate(&self, schema: &Schema) -> Result<(), DomainError> {
        for column in self.referenced_columns() {
            schema.require(column)?;
        }
        Ok(())
    }

    pub fn evaluate(&self, schema: &Schema, row: &[Value]) -> Result<Value, DomainError> {
        match self {
            Self::Column(name) => {
                let index = schema.require(name)?;
                Ok(row.get(index).cloned().unwrap_or(Value::Null))
            }
            Self::Literal(value) => Ok(value.clone()),
            Self::Month(inner) => inner.evaluate(schema, row)?.month(),
            Self::Call { function, args } => {
                let values = args
                    .iter()
                    .map(|arg| arg.evaluate(schema, row))
                    .collect::<Result<Vec<_>, _>>()?;
                function.invoke(&values)
            }
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Literal(Value::Int(value))
    }
}

impl From<u32> for Expr {
    fn from(value: u32) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => write!(f, "col({})", name),
            Self::Literal(value) => write!(f, "{}", value),
            Self::Month(inner) => write!(f, "month({})", inner),
            Self::Call { function, args } => {
                let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                write!(f, "{}({})", function.name(), args.join(", "))
            }
        }
    }
}

/// Boolean row predicate
#[derive(Debug, Clone)]
pub enum Predicate {
    Eq(Expr, Expr),
}

impl Predicate {
    pub fn validate(&self, schema: &Schema) -> Result<(), DomainError> {
        match self {
            Self::Eq(left, right) => {
                left.validate(schema)?;
                right.validate(schema)
            }
        }
    }

    /// Whether the row satisfies the predicate; unknown (null) counts as false
    pub fn matches(&self, schema: &Schema, row: &[Value]) -> Result<bool, DomainError> {
        match self {
            Self::Eq(left, right) => {
                let left = left.evaluate(schema, row)?;
                let right = right.evaluate(schema, row)?;
                Ok(left.sql_eq(&right).unwrap_or(false))
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq(left, right) => write!(f, "{} == {}", left, right),
        }
    }
}
