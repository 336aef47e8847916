use std::fmt::Write;

use smol_str::SmolStr;

use crate::{
    scalar::{IntoOperands, Operand},
    writer::{FormatContext, FormatWriter},
};

#[derive(Debug, Clone)]
pub struct InExpr {
    pub(crate) column: SmolStr,
    pub(crate) values: Vec<Operand>,
    pub(crate) not: bool,
}

impl InExpr {
    pub fn new<C, V>(column: C, values: V) -> Self
    where
        C: Into<SmolStr>,
        V: IntoOperands,
    {
        Self {
            column: column.into(),
            values: values.into_operands(),
            not: false,
        }
    }

    pub fn not_in<C, V>(column: C, values: V) -> Self
    where
        C: Into<SmolStr>,
        V: IntoOperands,
    {
        Self {
            not: true,
            ..Self::new(column, values)
        }
    }
}

/// `col IN (..)` with the empty and single value shortcuts.
pub(crate) fn write_in<W: Write>(
    column: &str,
    values: &[Operand],
    not: bool,
    context: &mut FormatContext<'_, W>,
) -> std::fmt::Result {
    let [first, rest @ ..] = values else {
        // nothing is in an empty set
        return if not { Ok(()) } else { context.writer.write_str("0=1") };
    };

    context.write_column(column)?;
    if rest.is_empty() {
        match first {
            Operand::Value(value) if value.is_null() => {
                return context
                    .writer
                    .write_str(if not { " IS NOT NULL" } else { " IS NULL" });
            }
            Operand::Value(_) => {
                context.writer.write_str(if not { "<>" } else { "=" })?;
                return first.format_writer(context);
            }
            Operand::Expr(_) => {}
        }
    }

    context.writer.write_str(if not { " NOT IN (" } else { " IN (" })?;
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            context.writer.write_str(", ")?;
        }
        match value {
            Operand::Value(value) if value.is_null() => context.writer.write_str("NULL")?,
            Operand::Expr(expr) => expr.format_writer(context)?,
            value => value.format_writer(context)?,
        }
    }
    context.writer.write_char(')')
}

impl FormatWriter for InExpr {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
        write_in(&self.column, &self.values, self.not, context)
    }
}
