use std::fmt::Write;

use crate::writer::FormatContext;

use super::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    pub(crate) fn separator(self) -> &'static str {
        match self {
            Conjunction::And => ") AND (",
            Conjunction::Or => ") OR (",
        }
    }
}

/// Writes non empty `parts` joined by `conjunction`.
///
/// A single part is written as is, several are each wrapped in parentheses.
pub(crate) fn write_parts<W: Write>(
    conjunction: Conjunction,
    parts: &[String],
    context: &mut FormatContext<'_, W>,
) -> std::fmt::Result {
    match parts {
        [] => Ok(()),
        [single] => context.writer.write_str(single),
        many => {
            context.writer.write_char('(')?;
            for (index, part) in many.iter().enumerate() {
                if index > 0 {
                    context.writer.write_str(conjunction.separator())?;
                }
                context.writer.write_str(part)?;
            }
            context.writer.write_char(')')
        }
    }
}

pub(crate) fn write_conditions<W: Write>(
    conjunction: Conjunction,
    items: &[Expr],
    context: &mut FormatContext<'_, W>,
) -> std::fmt::Result {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        let part = context.render(item)?;
        if !part.is_empty() {
            parts.push(part);
        }
    }
    write_parts(conjunction, &parts, context)
}

pub(crate) fn write_not<W: Write>(inner: &Expr, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
    let sql = context.render(inner)?;
    if sql.is_empty() {
        return Ok(());
    }
    write!(context.writer, "NOT ({sql})")
}

#[cfg(test)]
mod tests {
    use crate::{Dialect, Expr, and, hash, is_in, not, or, tests::format_writer};

    #[test]
    fn test_and_empty() {
        assert_eq!("", format_writer(and(Vec::<Expr>::new()), Dialect::Pgsql));
        assert_eq!("", format_writer(or(Vec::<Expr>::new()), Dialect::Pgsql));
    }

    #[test]
    fn test_and_single_is_unwrapped() {
        let inner = format_writer(hash! { "id" => 1 }, Dialect::Pgsql);
        let outer = format_writer(and([hash! { "id" => 1 }]), Dialect::Pgsql);
        assert_eq!(inner, outer);
        assert_eq!("\"id\"={:p0}", outer);
    }

    #[test]
    fn test_or_wraps_each_branch() {
        let expr = or([hash! { "a" => 1 }, is_in("b", [2, 3])]);
        assert_eq!(
            "(\"a\"={:p0}) OR (\"b\" IN ({:p1}, {:p2}))",
            format_writer(expr, Dialect::Pgsql)
        );
    }

    #[test]
    fn test_and_skips_empty_children() {
        let expr = and([hash! {}, hash! { "a" => 1 }, and(Vec::<Expr>::new())]);
        assert_eq!("\"a\"={:p0}", format_writer(expr, Dialect::Pgsql));
    }

    #[test]
    fn test_not() {
        assert_eq!("NOT (\"a\"={:p0})", format_writer(not(hash! { "a" => 1 }), Dialect::Pgsql));
        assert_eq!("", format_writer(not(hash! {}), Dialect::Pgsql));
    }
}
