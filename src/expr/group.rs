use std::fmt::Write;

use crate::writer::FormatContext;

use super::Expr;

/// Parenthesizes `inner`, writing nothing when it renders empty.
pub(crate) fn write_enclosed<W: Write>(inner: &Expr, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
    let sql = context.render(inner)?;
    if sql.is_empty() {
        return Ok(());
    }
    write!(context.writer, "({sql})")
}
