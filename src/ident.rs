use crate::dialect::Dialect;

/// Splits `"expr as alias"` on the first case insensitive ` as `.
pub fn split_alias(s: &str) -> (&str, Option<&str>) {
    if let Some(idx) = find_as(s.as_bytes()) {
        let left = s[..idx].trim();
        let right = s[idx + 4..].trim();
        (left, Some(right))
    } else {
        (s.trim(), None)
    }
}

/// Splits `"users u"` into the name and its trailing word.
///
/// Expressions (anything holding a parenthesis) are never split.
fn split_trailing_word(s: &str) -> (&str, Option<&str>) {
    let s = s.trim();
    if s.contains('(') {
        return (s, None);
    }
    match s.rfind(char::is_whitespace) {
        Some(idx) => (s[..idx].trim_end(), Some(&s[idx + 1..])),
        None => (s, None),
    }
}

/// Return the index of " as " in bytes case insensitive with no allocations.
fn find_as(h: &[u8]) -> Option<usize> {
    if h.len() < 4 {
        return None;
    }
    for (i, w) in h.windows(4).enumerate() {
        if w[0] == b' ' && w[3] == b' ' && (w[1] | 0x20) == b'a' && (w[2] | 0x20) == b's' {
            return Some(i);
        }
    }
    None
}

/// `id`, `u.name AS n`, `u.name n` and `count(*) AS total` for the select list.
pub(crate) fn write_select_column(out: &mut String, dialect: Dialect, column: &str) {
    let (expr, alias) = match split_alias(column) {
        (expr, Some(alias)) => (expr, Some(alias)),
        (expr, None) => split_trailing_word(expr),
    };
    dialect.write_column_name(out, expr);
    if let Some(alias) = alias {
        out.push_str(" AS ");
        dialect.write_simple_name(out, alias);
    }
}

/// `users`, `public.users u` and `users AS u` for the from list and joins.
pub(crate) fn write_table_ref(out: &mut String, dialect: Dialect, table: &str) {
    let (name, alias) = match split_alias(table) {
        (name, Some(alias)) => (name, Some(alias)),
        (name, None) => split_trailing_word(name),
    };
    dialect.write_table_name(out, name);
    if let Some(alias) = alias {
        out.push(' ');
        dialect.write_simple_name(out, alias);
    }
}

/// `name`, `name DESC` for the order by list.
pub(crate) fn write_order_column(out: &mut String, dialect: Dialect, column: &str) {
    let (name, direction) = split_trailing_word(column);
    match direction {
        Some(dir) if dir.eq_ignore_ascii_case("asc") || dir.eq_ignore_ascii_case("desc") => {
            dialect.write_column_name(out, name);
            out.push(' ');
            out.push_str(&dir.to_ascii_uppercase());
        }
        _ => dialect.write_column_name(out, column.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(dialect: Dialect, column: &str) -> String {
        let mut out = String::new();
        write_select_column(&mut out, dialect, column);
        out
    }

    fn table(dialect: Dialect, name: &str) -> String {
        let mut out = String::new();
        write_table_ref(&mut out, dialect, name);
        out
    }

    fn order(dialect: Dialect, column: &str) -> String {
        let mut out = String::new();
        write_order_column(&mut out, dialect, column);
        out
    }

    #[test]
    fn test_find_as() {
        let matches = "users as u";
        let index = find_as(matches.as_bytes());
        assert_eq!(index, Some(5));
        let no_match = "users";
        let index = find_as(no_match.as_bytes());
        assert_eq!(index, None);
        let first_match = "users AS u as bob";
        let index = find_as(first_match.as_bytes());
        assert_eq!(index, Some(5));
    }

    #[test]
    fn test_split_alias() {
        assert_eq!(("count(*)", Some("total")), split_alias("count(*) AS total"));
        assert_eq!(("id", None), split_alias(" id "));
    }

    #[test]
    fn test_select_column_alias() {
        assert_eq!("\"u\".\"name\" AS \"n\"", select(Dialect::Pgsql, "u.name as n"));
        assert_eq!("`u`.`name` AS `n`", select(Dialect::MySql, "u.name n"));
        assert_eq!("count(*) AS [total]", select(Dialect::Mssql, "count(*) AS total"));
        assert_eq!("count(*)", select(Dialect::Mssql, "count(*)"));
        assert_eq!("*", select(Dialect::Pgsql, "*"));
    }

    #[test]
    fn test_select_column_spaces_in_alias() {
        assert_eq!(
            "\"some space\".\"x\" AS \"some.table\"",
            select(Dialect::Pgsql, "some space.x as some.table")
        );
    }

    #[test]
    fn test_table_ref() {
        assert_eq!("\"users\"", table(Dialect::Pgsql, "users"));
        assert_eq!("\"public\".\"users\" \"u\"", table(Dialect::Pgsql, "public.users u"));
        assert_eq!("`users` `u`", table(Dialect::MySql, "users AS u"));
        assert_eq!("(select 1) x", table(Dialect::MySql, "(select 1) x"));
    }

    #[test]
    fn test_order_column() {
        assert_eq!("\"name\" DESC", order(Dialect::Pgsql, "name desc"));
        assert_eq!("\"name\"", order(Dialect::Pgsql, "name"));
        assert_eq!("[u].[name] ASC", order(Dialect::Mssql, "u.name ASC"));
        assert_eq!("length(name) desc", order(Dialect::Pgsql, "length(name) desc"));
    }
}
