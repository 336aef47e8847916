use std::fmt::Write;

use crate::{
    bind::{IntoValue, Value},
    expr::Expr,
    raw::Raw,
    select::SelectQuery,
    writer::{FormatContext, FormatWriter},
};

/// Right hand side of a comparison: a bound value or an inline expression.
#[derive(Debug, Clone)]
pub enum Operand {
    Value(Value),
    Expr(Box<Expr>),
}

impl Operand {
    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Value(Value::Null))
    }
}

pub trait IntoOperand {
    fn into_operand(self) -> Operand;
}

impl<T> IntoOperand for T
where
    T: IntoValue,
{
    fn into_operand(self) -> Operand {
        Operand::Value(self.into_value())
    }
}

impl IntoOperand for Operand {
    #[inline(always)]
    fn into_operand(self) -> Operand {
        self
    }
}

impl IntoOperand for Expr {
    fn into_operand(self) -> Operand {
        Operand::Expr(Box::new(self))
    }
}

impl IntoOperand for Raw {
    fn into_operand(self) -> Operand {
        Operand::Expr(Box::new(Expr::Raw(self)))
    }
}

impl IntoOperand for SelectQuery {
    fn into_operand(self) -> Operand {
        Operand::Expr(Box::new(Expr::Select(Box::new(self))))
    }
}

/// A list of operands, as taken by `IN` and list valued hash entries.
pub trait IntoOperands {
    fn into_operands(self) -> Vec<Operand>;
}

impl<T> IntoOperands for Vec<T>
where
    T: IntoOperand,
{
    fn into_operands(self) -> Vec<Operand> {
        self.into_iter().map(IntoOperand::into_operand).collect()
    }
}

impl<T, const N: usize> IntoOperands for [T; N]
where
    T: IntoOperand,
{
    fn into_operands(self) -> Vec<Operand> {
        self.into_iter().map(IntoOperand::into_operand).collect()
    }
}

impl<T> IntoOperands for &[T]
where
    T: IntoOperand + Clone,
{
    fn into_operands(self) -> Vec<Operand> {
        self.iter().cloned().map(IntoOperand::into_operand).collect()
    }
}

impl IntoOperands for SelectQuery {
    fn into_operands(self) -> Vec<Operand> {
        vec![self.into_operand()]
    }
}

impl FormatWriter for Operand {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
        match self {
            Operand::Value(value) => context.write_param(value.clone()),
            Operand::Expr(expr) => match expr.as_ref() {
                Expr::Select(query) => {
                    context.writer.write_char('(')?;
                    query.format_writer(context)?;
                    context.writer.write_char(')')
                }
                expr => expr.format_writer(context),
            },
        }
    }
}
