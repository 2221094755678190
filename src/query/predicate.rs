//! Typed filter conditions.
//!
//! A [`Predicate`] is evaluated directly against a [`Record`]; operands are typed [`Value`]s, so
//! no operand text is ever spliced into a query string.

use std::fmt;

use crate::error::{QueryError, QueryResult};
use crate::types::{Column, DataType, Record, Value};

/// Comparison operator of a [`Predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// No constraint; dropped before composition.
    None,
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
    /// Case-sensitive, unanchored substring match on the value's textual form.
    Contains,
}

impl Operator {
    /// Parse an operator from its name (`eq`, `contains`, ...) or symbol (`==`, `like`, ...).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "" | "none" => Some(Operator::None),
            "eq" | "==" | "=" => Some(Operator::Eq),
            "ne" | "!=" | "<>" => Some(Operator::Ne),
            "ge" | ">=" => Some(Operator::Ge),
            "le" | "<=" => Some(Operator::Le),
            "gt" | ">" => Some(Operator::Gt),
            "lt" | "<" => Some(Operator::Lt),
            "contains" | "like" => Some(Operator::Contains),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::None => "none",
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Ge => "ge",
            Operator::Le => "le",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Contains => "contains",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One filter condition: `column operator operand`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    column: Column,
    operator: Operator,
    operand: Value,
}

impl Predicate {
    /// Build a predicate, checking that `operand` fits `column` and `operator`.
    ///
    /// - `contains` needs a text operand (it matches any column's textual form).
    /// - Text columns compare against text; numeric columns against integers or floats.
    /// - Null operands are rejected for every operator except `none`.
    pub fn new(column: Column, operator: Operator, operand: Value) -> QueryResult<Self> {
        let fits = match (operator, column.data_type(), &operand) {
            (Operator::None, _, _) => true,
            (_, _, Value::Null) => false,
            (Operator::Contains, _, Value::Utf8(_)) => true,
            (Operator::Contains, _, _) => false,
            (_, DataType::Utf8, Value::Utf8(_)) => true,
            (_, DataType::Int64 | DataType::Float64, Value::Int64(_) | Value::Float64(_)) => true,
            _ => false,
        };
        if !fits {
            return Err(QueryError::InvalidOperand {
                column,
                raw: operand.to_string(),
                message: format!("operand does not fit {operator} on a {:?} column", column.data_type()),
            });
        }
        Ok(Self {
            column,
            operator,
            operand,
        })
    }

    /// A placeholder predicate that constrains nothing.
    pub fn unconstrained(column: Column) -> Self {
        Self {
            column,
            operator: Operator::None,
            operand: Value::Null,
        }
    }

    /// Case-sensitive substring match on `column`.
    pub fn contains(column: Column, needle: impl Into<String>) -> Self {
        Self {
            column,
            operator: Operator::Contains,
            operand: Value::Utf8(needle.into()),
        }
    }

    /// Parse a predicate from untrusted text.
    ///
    /// The column must name a schema column, and the operand must coerce to the column's type
    /// (`contains` takes any text).
    pub fn parse(column: &str, operator: &str, operand: &str) -> QueryResult<Self> {
        let column = Column::from_name(column.trim())
            .ok_or_else(|| QueryError::UnknownColumn(column.to_string()))?;
        let operator = Operator::from_symbol(operator)
            .ok_or_else(|| QueryError::UnknownOperator(operator.to_string()))?;

        let operand = match operator {
            Operator::None => Value::Null,
            Operator::Contains => Value::Utf8(operand.to_string()),
            _ => parse_operand(column, operand)?,
        };
        Self::new(column, operator, operand)
    }

    pub fn column(&self) -> Column {
        self.column
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> &Value {
        &self.operand
    }

    /// Whether this predicate constrains anything.
    pub fn is_active(&self) -> bool {
        self.operator != Operator::None
    }

    /// Test `record` against this predicate.
    ///
    /// Comparisons against a null field are false for every operator, `ne` included.
    pub fn matches(&self, record: &Record) -> bool {
        if self.operator == Operator::None {
            return true;
        }
        let value = record.value(self.column);
        if value.is_null() {
            return false;
        }

        let ord = || value.sort_cmp(&self.operand);
        match self.operator {
            Operator::None => true,
            Operator::Eq => ord().is_eq(),
            Operator::Ne => ord().is_ne(),
            Operator::Ge => ord().is_ge(),
            Operator::Le => ord().is_le(),
            Operator::Gt => ord().is_gt(),
            Operator::Lt => ord().is_lt(),
            Operator::Contains => match &self.operand {
                Value::Utf8(needle) => value.to_string().contains(needle.as_str()),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.column, self.operator, self.operand)
    }
}

fn parse_operand(column: Column, raw: &str) -> QueryResult<Value> {
    let trimmed = raw.trim();
    let invalid = |message: &str| QueryError::InvalidOperand {
        column,
        raw: raw.to_string(),
        message: message.to_string(),
    };

    match column.data_type() {
        DataType::Utf8 => Ok(Value::Utf8(raw.to_string())),
        DataType::Int64 => match trimmed.parse::<i64>() {
            Ok(v) => Ok(Value::Int64(v)),
            Err(_) => parse_finite(trimmed)
                .map(Value::Float64)
                .ok_or_else(|| invalid("expected a number")),
        },
        DataType::Float64 => parse_finite(trimmed)
            .map(Value::Float64)
            .ok_or_else(|| invalid("expected a number")),
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Conjunction of the active predicates of a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    /// Compose predicates with logical AND, dropping `none` predicates.
    pub fn compose<'a, I>(predicates: I) -> Self
    where
        I: IntoIterator<Item = &'a Predicate>,
    {
        Self {
            predicates: predicates.into_iter().filter(|p| p.is_active()).cloned().collect(),
        }
    }

    /// Active predicates, in request order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// True when every predicate matches (and for an empty filter).
    pub fn matches(&self, record: &Record) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }
}
