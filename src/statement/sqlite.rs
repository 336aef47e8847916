use crate::{
    bind::Params,
    dialect::Dialect,
    error::{Error, Result},
    query::Query,
    row::Record,
};
use smol_str::SmolStr;

use super::{ConflictTarget, StatementBuilder, insert_sql, pgsql::on_conflict};

/// SQLite can not add or drop constraints through `ALTER TABLE`.
#[derive(Debug, Clone, Copy)]
pub struct SqliteStatements;

impl StatementBuilder for SqliteStatements {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn upsert(&self, table: &str, record: &Record, target: &ConflictTarget) -> Result<Query> {
        if record.is_empty() {
            return Err(Error::empty_record("UPSERT", table));
        }
        if matches!(target, ConflictTarget::Constraint(_)) {
            return Err(self.unsupported("UPSERT ON CONSTRAINT"));
        }
        let mut params = Params::new();
        let mut sql = insert_sql(Dialect::Sqlite, table, record, &mut params);
        sql.push_str(&on_conflict(Dialect::Sqlite, record, target, "excluded"));
        Ok(self.query(sql, params))
    }

    fn rename_table(&self, old_name: &str, new_name: &str) -> Result<Query> {
        Ok(self.query(
            format!("ALTER TABLE {} RENAME TO {}", self.quote_table(old_name), self.quote_table(new_name)),
            Params::new(),
        ))
    }

    fn truncate_table(&self, table: &str) -> Result<Query> {
        Ok(self.query(format!("DELETE FROM {}", self.quote_table(table)), Params::new()))
    }

    fn add_column(&self, table: &str, column: &str, ty: &str) -> Result<Query> {
        Ok(self.query(
            format!("ALTER TABLE {} ADD COLUMN {} {}", self.quote_table(table), self.quote_column(column), ty),
            Params::new(),
        ))
    }

    fn alter_column(&self, _table: &str, _column: &str, _ty: &str) -> Result<Query> {
        Err(self.unsupported("ALTER COLUMN"))
    }

    fn add_primary_key(&self, _name: &str, _table: &str, _columns: &[SmolStr]) -> Result<Query> {
        Err(self.unsupported("ADD PRIMARY KEY"))
    }

    fn drop_primary_key(&self, _name: &str, _table: &str) -> Result<Query> {
        Err(self.unsupported("DROP PRIMARY KEY"))
    }

    fn add_foreign_key(
        &self,
        _name: &str,
        _table: &str,
        _columns: &[SmolStr],
        _ref_table: &str,
        _ref_columns: &[SmolStr],
        _options: Option<&str>,
    ) -> Result<Query> {
        Err(self.unsupported("ADD FOREIGN KEY"))
    }

    fn drop_foreign_key(&self, _name: &str, _table: &str) -> Result<Query> {
        Err(self.unsupported("DROP FOREIGN KEY"))
    }
}

#[cfg(test)]
mod tests {
    use crate::record;

    use super::*;

    #[test]
    fn test_upsert_lowercase_excluded() {
        let record = record! { "id" => 1, "name" => "bob" };
        let query = SqliteStatements
            .upsert("users", &record, &ConflictTarget::columns("id"))
            .unwrap();
        assert_eq!(
            "INSERT INTO `users` (`id`, `name`) VALUES ({:p0}, {:p1}) \
             ON CONFLICT (`id`) DO UPDATE SET `name`=excluded.`name`",
            query.sql()
        );
    }

    #[test]
    fn test_upsert_constraint_unsupported() {
        let record = record! { "id" => 1 };
        let err = SqliteStatements
            .upsert("users", &record, &ConflictTarget::constraint("pk"))
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported { dialect: Dialect::Sqlite, .. }));
    }

    #[test]
    fn test_ddl_overrides() {
        assert_eq!("DELETE FROM `a`", SqliteStatements.truncate_table("a").unwrap().sql());
        assert_eq!(
            "ALTER TABLE `a` ADD COLUMN `c` TEXT",
            SqliteStatements.add_column("a", "c", "TEXT").unwrap().sql()
        );
        assert_eq!(
            "ALTER TABLE `a` RENAME TO `b`",
            SqliteStatements.rename_table("a", "b").unwrap().sql()
        );
        assert!(SqliteStatements.alter_column("a", "c", "TEXT").is_err());
        assert!(SqliteStatements.drop_foreign_key("fk", "a").is_err());
    }
}
