use crate::{bind::Params, dialect::Dialect, error::Result, query::Query};

use super::StatementBuilder;

#[derive(Debug, Clone, Copy)]
pub struct OciStatements;

impl StatementBuilder for OciStatements {
    fn dialect(&self) -> Dialect {
        Dialect::Oci
    }

    fn insert_default_values(&self, _table: &str) -> Result<Query> {
        Err(self.unsupported("INSERT DEFAULT VALUES"))
    }

    fn rename_table(&self, old_name: &str, new_name: &str) -> Result<Query> {
        Ok(self.query(
            format!("ALTER TABLE {} RENAME TO {}", self.quote_table(old_name), self.quote_table(new_name)),
            Params::new(),
        ))
    }

    fn alter_column(&self, table: &str, column: &str, ty: &str) -> Result<Query> {
        Ok(self.query(
            format!("ALTER TABLE {} MODIFY {} {}", self.quote_table(table), self.quote_column(column), ty),
            Params::new(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, Record};

    use super::*;

    #[test]
    fn test_insert_empty_unsupported() {
        let err = OciStatements.insert("users", &Record::new()).unwrap_err();
        assert_eq!(Error::unsupported(Dialect::Oci, "INSERT DEFAULT VALUES"), err);
    }

    #[test]
    fn test_ddl_overrides() {
        assert_eq!(
            "ALTER TABLE \"a\" MODIFY \"c\" NUMBER(10)",
            OciStatements.alter_column("a", "c", "NUMBER(10)").unwrap().sql()
        );
        assert_eq!(
            "ALTER TABLE \"a\" RENAME TO \"b\"",
            OciStatements.rename_table("a", "b").unwrap().sql()
        );
    }
}
