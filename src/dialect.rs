use std::{fmt, str::FromStr};

use crate::{
    error::Error,
    query_builder::{
        MSSQL_QUERY_BUILDER, MYSQL_QUERY_BUILDER, OCI_QUERY_BUILDER, PGSQL_QUERY_BUILDER,
        QueryBuilder, SQLITE_QUERY_BUILDER, STANDARD_QUERY_BUILDER,
    },
    statement::{
        MSSQL_STATEMENTS, MYSQL_STATEMENTS, OCI_STATEMENTS, PGSQL_STATEMENTS, SQLITE_STATEMENTS,
        STANDARD_STATEMENTS, StatementBuilder,
    },
};

/// A SQL engine variant.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
pub enum Dialect {
    #[default]
    Standard,
    Sqlite,
    MySql,
    Pgsql,
    Mssql,
    Oci,
}

/// `name` is wrapped in `open`/`close` and every inner `close` is doubled.
fn is_quoted(name: &str, open: char, close: char) -> bool {
    let Some(inner) = name.strip_prefix(open).and_then(|rest| rest.strip_suffix(close)) else {
        return false;
    };
    let mut chars = inner.chars();
    while let Some(char) = chars.next() {
        if char == close && chars.next() != Some(close) {
            return false;
        }
    }
    true
}

impl Dialect {
    pub const ALL: [Dialect; 6] = [
        Dialect::Standard,
        Dialect::Sqlite,
        Dialect::MySql,
        Dialect::Pgsql,
        Dialect::Mssql,
        Dialect::Oci,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Standard => "standard",
            Dialect::Sqlite => "sqlite",
            Dialect::MySql => "mysql",
            Dialect::Pgsql => "pgsql",
            Dialect::Mssql => "mssql",
            Dialect::Oci => "oci",
        }
    }

    pub fn query_builder(self) -> &'static dyn QueryBuilder {
        match self {
            Dialect::Standard => &STANDARD_QUERY_BUILDER,
            Dialect::MySql => &MYSQL_QUERY_BUILDER,
            Dialect::Pgsql => &PGSQL_QUERY_BUILDER,
            Dialect::Sqlite => &SQLITE_QUERY_BUILDER,
            Dialect::Mssql => &MSSQL_QUERY_BUILDER,
            Dialect::Oci => &OCI_QUERY_BUILDER,
        }
    }

    pub fn statement_builder(self) -> &'static dyn StatementBuilder {
        match self {
            Dialect::Standard => &STANDARD_STATEMENTS,
            Dialect::Sqlite => &SQLITE_STATEMENTS,
            Dialect::MySql => &MYSQL_STATEMENTS,
            Dialect::Pgsql => &PGSQL_STATEMENTS,
            Dialect::Mssql => &MSSQL_STATEMENTS,
            Dialect::Oci => &OCI_STATEMENTS,
        }
    }

    /// Opening and closing identifier quote characters.
    pub(crate) fn quotes(self) -> (char, char) {
        match self {
            Dialect::Standard | Dialect::Pgsql | Dialect::Oci => ('"', '"'),
            Dialect::Sqlite | Dialect::MySql => ('`', '`'),
            Dialect::Mssql => ('[', ']'),
        }
    }

    /// Positional token for the 1-based `index`-th bound value.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Standard | Dialect::Sqlite | Dialect::MySql => "?".to_string(),
            Dialect::Pgsql => format!("${index}"),
            Dialect::Mssql => format!("@p{index}"),
            Dialect::Oci => format!(":p{index}"),
        }
    }

    /// Engines whose `LIKE` has no default escape character.
    pub(crate) fn like_needs_escape_clause(self) -> bool {
        matches!(
            self,
            Dialect::Standard | Dialect::Sqlite | Dialect::Mssql | Dialect::Oci
        )
    }

    /// Quotes a single name part. `*` and properly quoted names pass through.
    pub fn quote_simple_name(self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        self.write_simple_name(&mut out, name);
        out
    }

    pub(crate) fn write_simple_name(self, out: &mut String, name: &str) {
        let (open, close) = self.quotes();
        if name == "*" || is_quoted(name, open, close) {
            out.push_str(name);
            return;
        }
        out.push(open);
        // duplicate the closing quote if present
        for char in name.chars() {
            if char == close {
                out.push(close);
            }
            out.push(char);
        }
        out.push(close);
    }

    /// Quotes a possibly schema-prefixed table name, part by part.
    pub fn quote_table_name(self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        self.write_table_name(&mut out, name);
        out
    }

    pub(crate) fn write_table_name(self, out: &mut String, name: &str) {
        if name.contains('(') || name.contains("{{") {
            out.push_str(name);
            return;
        }
        for (i, part) in name.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            self.write_simple_name(out, part);
        }
    }

    /// Quotes a column name, including its table prefix when present.
    pub fn quote_column_name(self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        self.write_column_name(&mut out, name);
        out
    }

    pub(crate) fn write_column_name(self, out: &mut String, name: &str) {
        if name.contains('(') || name.contains("{{") || name.contains("[[") {
            out.push_str(name);
            return;
        }
        match name.rfind('.') {
            Some(index) => {
                self.write_table_name(out, &name[..index]);
                out.push('.');
                self.write_simple_name(out, &name[index + 1..]);
            }
            None => self.write_simple_name(out, name),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dialect = match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "default" => Dialect::Standard,
            "sqlite" | "sqlite3" => Dialect::Sqlite,
            "mysql" | "mariadb" => Dialect::MySql,
            "pgsql" | "postgres" | "postgresql" => Dialect::Pgsql,
            "mssql" | "sqlserver" => Dialect::Mssql,
            "oci" | "oci8" | "oracle" => Dialect::Oci,
            _ => return Err(Error::UnknownDialect(s.to_string())),
        };
        Ok(dialect)
    }
}

impl TryFrom<String> for Dialect {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Selects a dialect at compile time, `Builder::of::<Pgsql>()`.
pub trait HasDialect {
    const DIALECT: Dialect;
}

pub struct Standard;

impl HasDialect for Standard {
    const DIALECT: Dialect = Dialect::Standard;
}

pub struct Sqlite;

impl HasDialect for Sqlite {
    const DIALECT: Dialect = Dialect::Sqlite;
}

pub struct MySql;

impl HasDialect for MySql {
    const DIALECT: Dialect = Dialect::MySql;
}

pub struct Pgsql;

impl HasDialect for Pgsql {
    const DIALECT: Dialect = Dialect::Pgsql;
}

pub struct Mssql;

impl HasDialect for Mssql {
    const DIALECT: Dialect = Dialect::Mssql;
}

pub struct Oci;

impl HasDialect for Oci {
    const DIALECT: Dialect = Dialect::Oci;
}

#[cfg(feature = "postgres")]
impl HasDialect for sqlx::Postgres {
    const DIALECT: Dialect = Dialect::Pgsql;
}

#[cfg(feature = "mysql")]
impl HasDialect for sqlx::MySql {
    const DIALECT: Dialect = Dialect::MySql;
}

#[cfg(feature = "sqlite")]
impl HasDialect for sqlx::Sqlite {
    const DIALECT: Dialect = Dialect::Sqlite;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Dialect::Pgsql, "postgres".parse().unwrap());
        assert_eq!(Dialect::Pgsql, "PostgreSQL".parse().unwrap());
        assert_eq!(Dialect::Sqlite, "sqlite3".parse().unwrap());
        assert_eq!(Dialect::MySql, "mariadb".parse().unwrap());
        assert_eq!(Dialect::Mssql, "sqlserver".parse().unwrap());
        assert_eq!(Dialect::Oci, "oracle".parse().unwrap());
        assert_eq!(Dialect::Standard, " standard ".parse().unwrap());
    }

    #[test]
    fn test_parse_unknown() {
        let err = "db2".parse::<Dialect>().unwrap_err();
        assert_eq!(Error::UnknownDialect("db2".to_string()), err);
    }

    #[test]
    fn test_display_round_trip() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect, dialect.to_string().parse().unwrap());
        }
    }

    #[test]
    fn test_quote_simple() {
        assert_eq!("\"users\"", Dialect::Standard.quote_simple_name("users"));
        assert_eq!("`users`", Dialect::MySql.quote_simple_name("users"));
        assert_eq!("`users`", Dialect::Sqlite.quote_simple_name("users"));
        assert_eq!("[users]", Dialect::Mssql.quote_simple_name("users"));
        assert_eq!("*", Dialect::Pgsql.quote_simple_name("*"));
        assert_eq!("\"users\"", Dialect::Pgsql.quote_simple_name("\"users\""));
    }

    #[test]
    fn test_quote_doubles_quote_char() {
        assert_eq!("\"us\"\"ers\"", Dialect::Pgsql.quote_simple_name("us\"ers"));
        assert_eq!("\"us`ers\"", Dialect::Pgsql.quote_simple_name("us`ers"));
        assert_eq!("`us``ers`", Dialect::MySql.quote_simple_name("us`ers"));
        assert_eq!("[us]]ers]", Dialect::Mssql.quote_simple_name("us]ers"));
    }

    #[test]
    fn test_quote_rejects_broken_quoting() {
        assert_eq!(
            "\"\"\"a\"\"; DROP TABLE x; --\"\"\"",
            Dialect::Pgsql.quote_simple_name("\"a\"; DROP TABLE x; --\"")
        );
        assert_eq!("\"a\"\"b\"", Dialect::Pgsql.quote_simple_name("\"a\"\"b\""));
        assert_eq!("[a]", Dialect::Mssql.quote_simple_name("[a]"));
        assert_eq!("[a]]]", Dialect::Mssql.quote_simple_name("[a]]]"));
        assert_eq!("[[a]]b]]]", Dialect::Mssql.quote_simple_name("[a]b]"));
        assert_eq!("\"\"\"\"", Dialect::Pgsql.quote_simple_name("\""));
    }

    #[test]
    fn test_quote_table_name() {
        assert_eq!("\"public\".\"users\"", Dialect::Pgsql.quote_table_name("public.users"));
        assert_eq!("(select 1)", Dialect::Pgsql.quote_table_name("(select 1)"));
        assert_eq!("{{users}}", Dialect::Pgsql.quote_table_name("{{users}}"));
    }

    #[test]
    fn test_quote_column_name() {
        assert_eq!("`u`.`id`", Dialect::MySql.quote_column_name("u.id"));
        assert_eq!("\"s\".\"u\".\"id\"", Dialect::Oci.quote_column_name("s.u.id"));
        assert_eq!("\"u\".*", Dialect::Pgsql.quote_column_name("u.*"));
        assert_eq!("count(*)", Dialect::Pgsql.quote_column_name("count(*)"));
        assert_eq!("[[id]]", Dialect::Pgsql.quote_column_name("[[id]]"));
    }

    #[test]
    fn test_placeholders() {
        assert_eq!("?", Dialect::Sqlite.placeholder(3));
        assert_eq!("$3", Dialect::Pgsql.placeholder(3));
        assert_eq!("@p3", Dialect::Mssql.placeholder(3));
        assert_eq!(":p3", Dialect::Oci.placeholder(3));
    }
}
