//! sqlx transport for prepared queries.
//!
//! One module per enabled database. The functions prepare the query, bind
//! the positional arguments with their native sqlx types and run it through
//! a reusable sqlx executor such as `&Pool`. Every attempt is reported to
//! the query hooks, which may ask for the statement to be submitted again.

use std::{error::Error as StdError, future::Future, time::Instant};

use crate::{
    bind::Value,
    error::ExecError,
    query::{Query, Statement},
};

/// A NULL sent without a declared type, the server infers it from the statement.
#[cfg(feature = "postgres")]
struct UntypedNull;

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for UntypedNull {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_oid(sqlx::postgres::types::Oid(0))
    }

    fn compatible(_: &sqlx::postgres::PgTypeInfo) -> bool {
        true
    }
}

#[cfg(feature = "postgres")]
impl<'q> sqlx::Encode<'q, sqlx::Postgres> for UntypedNull {
    fn encode_by_ref(
        &self,
        _: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        Ok(sqlx::encode::IsNull::Yes)
    }
}

/// Runs `call` until it succeeds or no hook asks for another attempt.
///
/// Every attempt gets fresh arguments, the executor must therefore be
/// reusable (`&Pool`, or a reborrowed connection per call).
async fn run<T, F, Fut>(
    query: &Query,
    statement: &Statement,
    mut call: F,
) -> Result<T, ExecError<sqlx::Error>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        tracing::debug!(
            target: "sqlcraft::query",
            dialect = %query.dialect(),
            sql = %statement.sql,
            args = statement.args.len(),
            attempt,
            "executing statement",
        );
        query.hooks().before(statement);
        let start = Instant::now();
        let result = call().await;
        let elapsed = start.elapsed();
        match result {
            Ok(value) => {
                query.hooks().after(statement, elapsed, None);
                return Ok(value);
            }
            Err(err) => {
                let source: &(dyn StdError + 'static) = &err;
                query.hooks().after(statement, elapsed, Some(source));
                if query.hooks().should_retry(statement, attempt, source) {
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

macro_rules! sqlx_driver {
    ($feature:literal, $module:ident, $db:ty, $null:expr) => {
        #[cfg(feature = $feature)]
        pub mod $module {
            use sqlx::{Arguments, Database};

            use super::*;

            /// Positional arguments for `statement`, in placeholder order.
            pub fn arguments(
                statement: &Statement,
            ) -> Result<<$db as Database>::Arguments<'_>, sqlx::Error> {
                let mut arguments: <$db as Database>::Arguments<'_> = Default::default();
                arguments.reserve(statement.args.len(), 0);
                for value in &statement.args {
                    let added = match value {
                        Value::Null => arguments.add($null),
                        Value::Bool(value) => arguments.add(*value),
                        Value::Int(value) => arguments.add(*value),
                        Value::Float(value) => arguments.add(*value),
                        Value::Text(value) => arguments.add(value.clone()),
                        Value::Bytes(value) => arguments.add(value.clone()),
                        #[cfg(feature = "chrono")]
                        Value::DateTime(value) => arguments.add(*value),
                        #[cfg(feature = "chrono")]
                        Value::NaiveDateTime(value) => arguments.add(*value),
                        #[cfg(feature = "chrono")]
                        Value::NaiveDate(value) => arguments.add(*value),
                        #[cfg(feature = "time")]
                        Value::OffsetDateTime(value) => arguments.add(*value),
                        #[cfg(feature = "time")]
                        Value::Date(value) => arguments.add(*value),
                        #[cfg(feature = "uuid")]
                        Value::Uuid(value) => arguments.add(*value),
                        #[cfg(feature = "json")]
                        Value::Json(value) => arguments.add(value.clone()),
                    };
                    added.map_err(sqlx::Error::Encode)?;
                }
                Ok(arguments)
            }

            /// Runs a statement without result rows, returns the affected row count.
            pub async fn execute<'c, E>(query: &Query, executor: E) -> Result<u64, ExecError<sqlx::Error>>
            where
                E: sqlx::Executor<'c, Database = $db> + Copy,
            {
                let statement = query.prepare()?;
                let statement = &statement;
                run(query, statement, || async move {
                    let done = sqlx::query_with(&statement.sql, arguments(statement)?)
                        .execute(executor)
                        .await?;
                    Ok(done.rows_affected())
                })
                .await
            }

            pub async fn fetch_all<'c, E>(
                query: &Query,
                executor: E,
            ) -> Result<Vec<<$db as Database>::Row>, ExecError<sqlx::Error>>
            where
                E: sqlx::Executor<'c, Database = $db> + Copy,
            {
                let statement = query.prepare()?;
                let statement = &statement;
                run(query, statement, || async move {
                    sqlx::query_with(&statement.sql, arguments(statement)?)
                        .fetch_all(executor)
                        .await
                })
                .await
            }

            pub async fn fetch_optional<'c, E>(
                query: &Query,
                executor: E,
            ) -> Result<Option<<$db as Database>::Row>, ExecError<sqlx::Error>>
            where
                E: sqlx::Executor<'c, Database = $db> + Copy,
            {
                let statement = query.prepare()?;
                let statement = &statement;
                run(query, statement, || async move {
                    sqlx::query_with(&statement.sql, arguments(statement)?)
                        .fetch_optional(executor)
                        .await
                })
                .await
            }
        }
    };
}

sqlx_driver!("postgres", postgres, sqlx::Postgres, UntypedNull);
sqlx_driver!("mysql", mysql, sqlx::MySql, None::<String>);
sqlx_driver!("sqlite", sqlite, sqlx::Sqlite, None::<String>);

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use sqlx::Arguments;

    use crate::{Builder, hash, is_in};

    #[test]
    fn test_sqlite_arguments() {
        let mut select = Builder::sqlite().select("id");
        select
            .from("users")
            .where_expr(hash! { "active" => true, "role" => ["admin", "owner"] });
        let statement = select.build().prepare().unwrap();
        let arguments = super::sqlite::arguments(&statement).unwrap();
        assert_eq!(3, arguments.len());

        let statement = Builder::sqlite()
            .delete("users", is_in("id", [1, 2]))
            .unwrap()
            .prepare()
            .unwrap();
        assert_eq!(2, super::sqlite::arguments(&statement).unwrap().len());
    }
}
