use std::fmt::Write;

use smol_str::SmolStr;

use crate::{
    scalar::{IntoOperand, Operand},
    writer::{FormatContext, FormatWriter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetweenOperator {
    Between,
    NotBetween,
}

#[derive(Debug, Clone)]
pub struct BetweenExpr {
    pub(crate) column: SmolStr,
    pub(crate) low: Operand,
    pub(crate) high: Operand,
    pub(crate) operator: BetweenOperator,
}

impl BetweenExpr {
    pub fn new<C, L, H>(operator: BetweenOperator, column: C, low: L, high: H) -> Self
    where
        C: Into<SmolStr>,
        L: IntoOperand,
        H: IntoOperand,
    {
        Self {
            column: column.into(),
            low: low.into_operand(),
            high: high.into_operand(),
            operator,
        }
    }
}

impl FormatWriter for BetweenOperator {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
        match self {
            BetweenOperator::Between => context.writer.write_str("BETWEEN"),
            BetweenOperator::NotBetween => context.writer.write_str("NOT BETWEEN"),
        }
    }
}

impl FormatWriter for BetweenExpr {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
        context.write_column(&self.column)?;
        context.writer.write_char(' ')?;
        self.operator.format_writer(context)?;
        context.writer.write_char(' ')?;
        self.low.format_writer(context)?;
        context.writer.write_str(" AND ")?;
        self.high.format_writer(context)
    }
}
