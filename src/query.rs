use std::{error::Error as StdError, sync::Arc, time::Instant};

use smol_str::SmolStr;

use crate::{
    bind::{IntoValue, Params, Value},
    dialect::Dialect,
    error::{Error, ExecError, Result},
    hook::{Hooks, QueryHook},
    raw::{Segment, segments},
};

/// A statement ready for the transport: dialect specific SQL and the
/// positional arguments in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Runs prepared statements. Implemented by the transport.
pub trait Executor {
    type Row;
    type Error: StdError + 'static;

    /// Runs a statement that returns no rows, returns the affected row count.
    fn execute(&mut self, statement: &Statement) -> std::result::Result<u64, Self::Error>;

    fn query(&mut self, statement: &Statement) -> std::result::Result<Vec<Self::Row>, Self::Error>;
}

/// SQL text with `{:name}` placeholders and the values bound to them.
#[derive(Debug, Clone)]
pub struct Query {
    dialect: Dialect,
    sql: String,
    params: Params,
    hooks: Hooks,
}

impl Query {
    pub fn new<S: Into<String>>(dialect: Dialect, sql: S, params: Params) -> Self {
        Self {
            dialect,
            sql: sql.into(),
            params,
            hooks: Hooks::default(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Merges `params` into the bound values, last write wins.
    pub fn bind(&mut self, params: Params) -> &mut Self {
        self.params.merge(params);
        self
    }

    pub fn bind_value<K, V>(&mut self, name: K, value: V) -> &mut Self
    where
        K: Into<SmolStr>,
        V: IntoValue,
    {
        self.params.insert(name, value);
        self
    }

    pub fn with_hook(mut self, hook: Arc<dyn QueryHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub(crate) fn with_hooks(mut self, hooks: &Hooks) -> Self {
        self.hooks.extend(hooks);
        self
    }

    /// Translates the named placeholders into the dialect's tokens.
    ///
    /// Walks the SQL once: every `{:name}` becomes the next positional token
    /// and appends its value to the arguments, `{{table}}` and `[[column]]`
    /// are quoted. Fails before anything is sent when a name is unbound.
    pub fn prepare(&self) -> Result<Statement> {
        let mut sql = String::with_capacity(self.sql.len());
        let mut args = Vec::with_capacity(self.params.len());
        for segment in segments(&self.sql) {
            match segment {
                Segment::Text(text) => sql.push_str(text),
                Segment::Param(name) => {
                    let value = self
                        .params
                        .get(name)
                        .ok_or_else(|| Error::MissingParam(name.to_string()))?;
                    args.push(value.clone());
                    sql.push_str(&self.dialect.placeholder(args.len()));
                }
                Segment::Table(name) => self.dialect.write_table_name(&mut sql, name),
                Segment::Column(name) => self.dialect.write_column_name(&mut sql, name),
            }
        }
        Ok(Statement { sql, args })
    }

    /// The SQL with every bound value inlined as a literal, for logs only.
    ///
    /// Unbound placeholders are left as they are.
    pub fn debug_sql(&self) -> String {
        let mut sql = String::with_capacity(self.sql.len());
        for segment in segments(&self.sql) {
            match segment {
                Segment::Text(text) => sql.push_str(text),
                Segment::Param(name) => match self.params.get(name) {
                    Some(value) => sql.push_str(&value.to_literal()),
                    None => {
                        sql.push_str("{:");
                        sql.push_str(name);
                        sql.push('}');
                    }
                },
                Segment::Table(name) => self.dialect.write_table_name(&mut sql, name),
                Segment::Column(name) => self.dialect.write_column_name(&mut sql, name),
            }
        }
        sql
    }

    pub fn execute<E: Executor>(&self, executor: &mut E) -> std::result::Result<u64, ExecError<E::Error>> {
        self.run(executor, |executor, statement| executor.execute(statement))
    }

    pub fn all<E: Executor>(&self, executor: &mut E) -> std::result::Result<Vec<E::Row>, ExecError<E::Error>> {
        self.run(executor, |executor, statement| executor.query(statement))
    }

    /// First row of the result, if any.
    pub fn one<E: Executor>(&self, executor: &mut E) -> std::result::Result<Option<E::Row>, ExecError<E::Error>> {
        let rows = self.all(executor)?;
        Ok(rows.into_iter().next())
    }

    fn run<E, T, F>(&self, executor: &mut E, mut call: F) -> std::result::Result<T, ExecError<E::Error>>
    where
        E: Executor,
        F: FnMut(&mut E, &Statement) -> std::result::Result<T, E::Error>,
    {
        let statement = self.prepare()?;
        let mut attempt = 0;
        loop {
            attempt += 1;
            tracing::debug!(
                target: "sqlcraft::query",
                dialect = %self.dialect,
                sql = %statement.sql,
                args = statement.args.len(),
                attempt,
                "executing statement",
            );
            self.hooks.before(&statement);
            let start = Instant::now();
            let result = call(executor, &statement);
            let elapsed = start.elapsed();
            match result {
                Ok(value) => {
                    self.hooks.after(&statement, elapsed, None);
                    return Ok(value);
                }
                Err(err) => {
                    let source: &(dyn StdError + 'static) = &err;
                    self.hooks.after(&statement, elapsed, Some(source));
                    if self.hooks.should_retry(&statement, attempt, source) {
                        tracing::warn!(
                            target: "sqlcraft::query",
                            attempt,
                            error = %source,
                            "retrying statement",
                        );
                        continue;
                    }
                    return Err(ExecError::Transport(err));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::params;

    use super::*;

    #[test]
    fn test_prepare_placeholders() {
        let sql = "SELECT * FROM t WHERE a={:a} AND b={:b} OR a={:a}";
        let params = params! { "a" => 1, "b" => "x" };
        let cases = [
            (Dialect::Sqlite, "SELECT * FROM t WHERE a=? AND b=? OR a=?"),
            (Dialect::Pgsql, "SELECT * FROM t WHERE a=$1 AND b=$2 OR a=$3"),
            (Dialect::Mssql, "SELECT * FROM t WHERE a=@p1 AND b=@p2 OR a=@p3"),
            (Dialect::Oci, "SELECT * FROM t WHERE a=:p1 AND b=:p2 OR a=:p3"),
        ];
        for (dialect, expected) in cases {
            let statement = Query::new(dialect, sql, params.clone()).prepare().unwrap();
            assert_eq!(expected, statement.sql);
            assert_eq!(
                vec![Value::Int(1), Value::Text("x".into()), Value::Int(1)],
                statement.args
            );
        }
    }

    #[test]
    fn test_prepare_missing_param() {
        let query = Query::new(Dialect::Pgsql, "SELECT {:a}, {:b}", params! { "a" => 1 });
        assert_eq!(Error::MissingParam("b".into()), query.prepare().unwrap_err());
    }

    #[test]
    fn test_prepare_quotes_markers() {
        let query = Query::new(Dialect::Mssql, "SELECT [[u.id]] FROM {{dbo.users}}", Params::new());
        assert_eq!("SELECT [u].[id] FROM [dbo].[users]", query.prepare().unwrap().sql);
    }

    #[test]
    fn test_prepare_skips_literals() {
        let query = Query::new(Dialect::Pgsql, "SELECT '{:a}' || {:a}", params! { "a" => 1 });
        let statement = query.prepare().unwrap();
        assert_eq!("SELECT '{:a}' || $1", statement.sql);
        assert_eq!(1, statement.args.len());
    }

    #[test]
    fn test_bind_last_write_wins() {
        let mut query = Query::new(Dialect::Pgsql, "SELECT {:a}", params! { "a" => 1 });
        query.bind(params! { "a" => 2 }).bind_value("a", 3);
        assert_eq!(vec![Value::Int(3)], query.prepare().unwrap().args);
    }

    #[test]
    fn test_debug_sql() {
        let query = Query::new(
            Dialect::Pgsql,
            "SELECT * FROM {{users}} WHERE name={:n} AND x={:missing}",
            params! { "n" => "o'brien" },
        );
        assert_eq!(
            "SELECT * FROM \"users\" WHERE name='o''brien' AND x={:missing}",
            query.debug_sql()
        );
    }
}
