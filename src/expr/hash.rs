use std::fmt::Write;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::{
    bind::{IntoValue, Value},
    scalar::{IntoOperand, Operand},
    select::SelectQuery,
    writer::{FormatContext, FormatWriter},
};

use super::{Expr, cond::{self, Conjunction}, r#in};

/// Value side of one hash entry.
#[derive(Debug, Clone)]
pub enum HashValue {
    Value(Value),
    List(Vec<Operand>),
    Expr(Expr),
}

pub trait IntoHashValue {
    fn into_hash_value(self) -> HashValue;
}

impl<T> IntoHashValue for T
where
    T: IntoValue,
{
    fn into_hash_value(self) -> HashValue {
        HashValue::Value(self.into_value())
    }
}

impl<T> IntoHashValue for Vec<T>
where
    T: IntoOperand,
{
    fn into_hash_value(self) -> HashValue {
        HashValue::List(self.into_iter().map(IntoOperand::into_operand).collect())
    }
}

impl<T, const N: usize> IntoHashValue for [T; N]
where
    T: IntoOperand,
{
    fn into_hash_value(self) -> HashValue {
        HashValue::List(self.into_iter().map(IntoOperand::into_operand).collect())
    }
}

impl IntoHashValue for Expr {
    fn into_hash_value(self) -> HashValue {
        HashValue::Expr(self)
    }
}

impl IntoHashValue for SelectQuery {
    fn into_hash_value(self) -> HashValue {
        HashValue::Expr(Expr::Select(Box::new(self)))
    }
}

impl IntoHashValue for HashValue {
    fn into_hash_value(self) -> HashValue {
        self
    }
}

/// Conjunctive equality over a column map, rendered in insertion order.
#[derive(Debug, Default, Clone)]
pub struct HashExpr(IndexMap<SmolStr, HashValue>);

impl HashExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<C, V>(mut self, column: C, value: V) -> Self
    where
        C: Into<SmolStr>,
        V: IntoHashValue,
    {
        self.insert(column, value);
        self
    }

    pub fn insert<C, V>(&mut self, column: C, value: V) -> &mut Self
    where
        C: Into<SmolStr>,
        V: IntoHashValue,
    {
        self.0.insert(column.into(), value.into_hash_value());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<C, V> FromIterator<(C, V)> for HashExpr
where
    C: Into<SmolStr>,
    V: IntoHashValue,
{
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, value)| (column.into(), value.into_hash_value()))
                .collect(),
        )
    }
}

impl FormatWriter for HashExpr {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
        let mut parts = Vec::with_capacity(self.0.len());
        for (column, value) in &self.0 {
            let mut part = String::new();
            match value {
                HashValue::Value(Value::Null) => {
                    part.push_str(&context.dialect.quote_column_name(column));
                    part.push_str(" IS NULL");
                }
                HashValue::Value(value) => {
                    part.push_str(&context.dialect.quote_column_name(column));
                    part.push('=');
                    let name = context.params.push(value.clone());
                    write!(part, "{{:{name}}}")?;
                }
                HashValue::List(values) => {
                    let mut sub = FormatContext::new(&mut part, context.dialect, &mut *context.params);
                    r#in::write_in(column, values, false, &mut sub)?;
                }
                HashValue::Expr(expr) => {
                    let sql = context.render(expr)?;
                    if sql.is_empty() {
                        continue;
                    }
                    part.push_str(&context.dialect.quote_column_name(column));
                    write!(part, "=({sql})")?;
                }
            }
            if !part.is_empty() {
                parts.push(part);
            }
        }
        cond::write_parts(Conjunction::And, &parts, context)
    }
}
