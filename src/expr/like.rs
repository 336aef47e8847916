use std::fmt::Write;

use smol_str::SmolStr;

use crate::{
    bind::Value,
    dialect::Dialect,
    writer::{FormatContext, FormatWriter},
};

use super::Conjunction;

const DEFAULT_ESCAPE: [(&str, &str); 3] = [("\\", "\\\\"), ("%", "\\%"), ("_", "\\_")];

/// SQL Server also treats `[` as the start of a character class.
const MSSQL_ESCAPE: [(&str, &str); 4] = [("\\", "\\\\"), ("%", "\\%"), ("_", "\\_"), ("[", "\\[")];

fn default_escape(dialect: Dialect) -> &'static [(&'static str, &'static str)] {
    match dialect {
        Dialect::Mssql => &MSSQL_ESCAPE,
        _ => &DEFAULT_ESCAPE,
    }
}

/// Values to match, one `LIKE` term each.
pub trait IntoLikeValues {
    fn into_like_values(self) -> Vec<String>;
}

impl IntoLikeValues for &str {
    fn into_like_values(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoLikeValues for String {
    fn into_like_values(self) -> Vec<String> {
        vec![self]
    }
}

impl<T> IntoLikeValues for Vec<T>
where
    T: Into<String>,
{
    fn into_like_values(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T, const N: usize> IntoLikeValues for [T; N]
where
    T: Into<String>,
{
    fn into_like_values(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

/// `LIKE` matching of one column against one or more values.
///
/// Every value is escaped so that `%`, `_` and the escape character match
/// literally, then wrapped in `%` on the sides enabled by [`match_sides`].
///
/// [`match_sides`]: LikeExpr::match_sides
#[derive(Debug, Clone)]
pub struct LikeExpr {
    column: SmolStr,
    values: Vec<String>,
    not: bool,
    conjunction: Conjunction,
    escape: Option<Vec<(String, String)>>,
    match_left: bool,
    match_right: bool,
}

impl LikeExpr {
    fn with_operator<C, V>(column: C, values: V, not: bool, conjunction: Conjunction) -> Self
    where
        C: Into<SmolStr>,
        V: IntoLikeValues,
    {
        Self {
            column: column.into(),
            values: values.into_like_values(),
            not,
            conjunction,
            escape: None,
            match_left: true,
            match_right: true,
        }
    }

    /// `col LIKE a AND col LIKE b`
    pub fn like<C: Into<SmolStr>, V: IntoLikeValues>(column: C, values: V) -> Self {
        Self::with_operator(column, values, false, Conjunction::And)
    }

    /// `col NOT LIKE a AND col NOT LIKE b`
    pub fn not_like<C: Into<SmolStr>, V: IntoLikeValues>(column: C, values: V) -> Self {
        Self::with_operator(column, values, true, Conjunction::And)
    }

    /// `col LIKE a OR col LIKE b`
    pub fn or_like<C: Into<SmolStr>, V: IntoLikeValues>(column: C, values: V) -> Self {
        Self::with_operator(column, values, false, Conjunction::Or)
    }

    /// `col NOT LIKE a OR col NOT LIKE b`
    pub fn or_not_like<C: Into<SmolStr>, V: IntoLikeValues>(column: C, values: V) -> Self {
        Self::with_operator(column, values, true, Conjunction::Or)
    }

    /// Replaces the default escaping with `pairs`, applied in order.
    ///
    /// A custom map turns off the `ESCAPE` clause, the caller owns the
    /// escape character in that case. An empty map disables escaping.
    pub fn escape<I, F, T>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, T)>,
        F: Into<String>,
        T: Into<String>,
    {
        self.escape = Some(
            pairs
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        );
        self
    }

    /// Whether `%` is added on the left and right of every value.
    pub fn match_sides(mut self, left: bool, right: bool) -> Self {
        self.match_left = left;
        self.match_right = right;
        self
    }

    pub(crate) fn escape_value(&self, value: &str, dialect: Dialect) -> String {
        let mut escaped = value.to_string();
        match self.escape {
            Some(ref pairs) => {
                for (from, to) in pairs {
                    escaped = escaped.replace(from.as_str(), to);
                }
            }
            None => {
                for &(from, to) in default_escape(dialect) {
                    escaped = escaped.replace(from, to);
                }
            }
        }
        escaped
    }

    fn pattern(&self, value: &str, dialect: Dialect) -> String {
        let escaped = self.escape_value(value, dialect);
        let mut pattern = String::with_capacity(escaped.len() + 2);
        if self.match_left {
            pattern.push('%');
        }
        pattern.push_str(&escaped);
        if self.match_right {
            pattern.push('%');
        }
        pattern
    }
}

impl FormatWriter for LikeExpr {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
        let escape_clause = self.escape.is_none() && context.dialect.like_needs_escape_clause();
        let operator = if self.not { " NOT LIKE " } else { " LIKE " };
        let separator = match self.conjunction {
            Conjunction::And => " AND ",
            Conjunction::Or => " OR ",
        };

        for (index, value) in self.values.iter().enumerate() {
            if index > 0 {
                context.writer.write_str(separator)?;
            }
            context.write_column(&self.column)?;
            context.writer.write_str(operator)?;
            let pattern = self.pattern(value, context.dialect);
            context.write_param(Value::Text(pattern))?;
            if escape_clause {
                context.writer.write_str(" ESCAPE '\\'")?;
            }
        }
        Ok(())
    }
}
