use crate::{
    bind::Params,
    dialect::Dialect,
    error::{Error, Result},
    query::Query,
    row::Record,
};

use super::{ConflictTarget, StatementBuilder, insert_sql, join_quoted};

#[derive(Debug, Clone, Copy)]
pub struct PgsqlStatements;

/// `ON CONFLICT` tail shared by PostgreSQL and SQLite, `excluded` names the
/// row proposed for insertion.
pub(crate) fn on_conflict(
    dialect: Dialect,
    record: &Record,
    target: &ConflictTarget,
    excluded: &str,
) -> String {
    let conflict = match target {
        ConflictTarget::Ignore => return " ON CONFLICT DO NOTHING".to_string(),
        ConflictTarget::Columns(columns) => format!(" ON CONFLICT ({})", join_quoted(dialect, columns)),
        ConflictTarget::Constraint(name) => {
            format!(" ON CONFLICT ON CONSTRAINT {}", dialect.quote_simple_name(name))
        }
    };
    let updates: Vec<String> = target
        .update_columns(record)
        .into_iter()
        .map(|column| {
            let quoted = dialect.quote_column_name(column);
            format!("{quoted}={excluded}.{quoted}")
        })
        .collect();
    if updates.is_empty() {
        return format!("{conflict} DO NOTHING");
    }
    format!("{conflict} DO UPDATE SET {}", updates.join(", "))
}

impl StatementBuilder for PgsqlStatements {
    fn dialect(&self) -> Dialect {
        Dialect::Pgsql
    }

    fn upsert(&self, table: &str, record: &Record, target: &ConflictTarget) -> Result<Query> {
        if record.is_empty() {
            return Err(Error::empty_record("UPSERT", table));
        }
        let mut params = Params::new();
        let mut sql = insert_sql(Dialect::Pgsql, table, record, &mut params);
        sql.push_str(&on_conflict(Dialect::Pgsql, record, target, "EXCLUDED"));
        Ok(self.query(sql, params))
    }

    fn rename_table(&self, old_name: &str, new_name: &str) -> Result<Query> {
        Ok(self.query(
            format!("ALTER TABLE {} RENAME TO {}", self.quote_table(old_name), self.quote_table(new_name)),
            Params::new(),
        ))
    }

    fn alter_column(&self, table: &str, column: &str, ty: &str) -> Result<Query> {
        Ok(self.query(
            format!(
                "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
                self.quote_table(table),
                self.quote_column(column),
                ty
            ),
            Params::new(),
        ))
    }
}
