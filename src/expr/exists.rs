use std::fmt::Write;

use crate::writer::{FormatContext, FormatWriter};

use super::Expr;

#[derive(Debug, Clone)]
pub struct ExistsExpr {
    pub(crate) operator: ExistsOperator,
    pub(crate) inner: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistsOperator {
    Exists,
    NotExists,
}

impl ExistsExpr {
    pub fn new<E: Into<Expr>>(operator: ExistsOperator, inner: E) -> Self {
        Self {
            operator,
            inner: Box::new(inner.into()),
        }
    }
}

impl FormatWriter for ExistsExpr {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
        let sql = context.render(&self.inner)?;
        match (self.operator, sql.is_empty()) {
            (ExistsOperator::Exists, true) => context.writer.write_str("0=1"),
            (ExistsOperator::NotExists, true) => Ok(()),
            (ExistsOperator::Exists, false) => write!(context.writer, "EXISTS ({sql})"),
            (ExistsOperator::NotExists, false) => write!(context.writer, "NOT EXISTS ({sql})"),
        }
    }
}
