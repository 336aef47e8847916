use crate::{bind::Params, dialect::Dialect, error::Result, query::Query};

use super::StatementBuilder;

#[derive(Debug, Clone, Copy)]
pub struct MssqlStatements;

fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl StatementBuilder for MssqlStatements {
    fn dialect(&self) -> Dialect {
        Dialect::Mssql
    }

    fn rename_table(&self, old_name: &str, new_name: &str) -> Result<Query> {
        Ok(self.query(
            format!("sp_rename {}, {}", string_literal(old_name), string_literal(new_name)),
            Params::new(),
        ))
    }

    fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> Result<Query> {
        Ok(self.query(
            format!(
                "sp_rename {}, {}, 'COLUMN'",
                string_literal(&format!("{table}.{old_name}")),
                string_literal(new_name)
            ),
            Params::new(),
        ))
    }

    fn alter_column(&self, table: &str, column: &str, ty: &str) -> Result<Query> {
        Ok(self.query(
            format!(
                "ALTER TABLE {} ALTER COLUMN {} {}",
                self.quote_table(table),
                self.quote_column(column),
                ty
            ),
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
