use crate::{
    bind::Params,
    dialect::Dialect,
    error::{Error, Result},
    query::Query,
    row::Record,
};

use super::{ConflictTarget, StatementBuilder, insert_sql};

#[derive(Debug, Clone, Copy)]
pub struct MySqlStatements;

impl StatementBuilder for MySqlStatements {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn insert_default_values(&self, table: &str) -> Result<Query> {
        Ok(self.query(format!("INSERT INTO {} () VALUES ()", self.quote_table(table)), Params::new()))
    }

    /// MySQL always collides on the primary key or any unique index, the
    /// target only narrows which columns are overwritten.
    fn upsert(&self, table: &str, record: &Record, target: &ConflictTarget) -> Result<Query> {
        if record.is_empty() {
            return Err(Error::empty_record("UPSERT", table));
        }
        let mut params = Params::new();
        let mut sql = insert_sql(Dialect::MySql, table, record, &mut params);
        let columns = match target {
            ConflictTarget::Ignore => Vec::new(),
            target => target.update_columns(record),
        };
        let updates: Vec<String> = if columns.is_empty() {
            // no-op assignment keeps the existing row
            let first = record.columns().next().map(|c| self.quote_column(c)).unwrap_or_default();
            vec![format!("{first}={first}")]
        } else {
            columns
                .into_iter()
                .map(|column| {
                    let quoted = self.quote_column(column);
                    format!("{quoted}=VALUES({quoted})")
                })
                .collect()
        };
        sql.push_str(" ON DUPLICATE KEY UPDATE ");
        sql.push_str(&updates.join(", "));
        Ok(self.query(sql, params))
    }

    fn alter_column(&self, table: &str, column: &str, ty: &str) -> Result<Query> {
        let column = self.quote_column(column);
        Ok(self.query(
            format!("ALTER TABLE {} CHANGE {column} {column} {ty}", self.quote_table(table)),
            Params::new(),
        ))
    }

    fn drop_primary_key(&self, _name: &str, table: &str) -> Result<Query> {
        Ok(self.query(format!("ALTER TABLE {} DROP PRIMARY KEY", self.quote_table(table)), Params::new()))
    }

    fn drop_foreign_key(&self, name: &str, table: &str) -> Result<Query> {
        Ok(self.query(
            format!("ALTER TABLE {} DROP FOREIGN KEY {}", self.quote_table(table), self.quote_name(name)),
            Params::new(),
        ))
    }

    fn drop_index(&self, name: &str, table: &str) -> Result<Query> {
        Ok(self.query(
            format!("DROP INDEX {} ON {}", self.quote_name(name), self.quote_table(table)),
            Params::new(),
        ))
    }
}
