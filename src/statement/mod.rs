use smol_str::SmolStr;

use crate::{
    bind::Params,
    col::{ColumnDefs, Columns, IntoColumns},
    dialect::Dialect,
    error::{Error, Result},
    expr::{BetweenExpr, ExistsExpr, Expr, HashExpr, InExpr, LikeExpr},
    query::Query,
    raw::Raw,
    row::Record,
    writer,
};

mod mssql;
mod mysql;
mod oci;
mod pgsql;
mod sqlite;

pub use mssql::MssqlStatements;
pub use mysql::MySqlStatements;
pub use oci::OciStatements;
pub use pgsql::PgsqlStatements;
pub use sqlite::SqliteStatements;

/// Rows an `UPDATE` or `DELETE` applies to.
///
/// There is no implicit "no filter": either an expression that renders to a
/// non empty condition, or the explicit [`unsafe_all_rows`] marker.
#[derive(Debug, Clone)]
pub enum WriteFilter {
    Where(Expr),
    AllRows(AllRows),
}

/// Proof that the caller asked for an unfiltered write.
#[derive(Debug, Clone, Copy)]
pub struct AllRows(());

/// Targets every row of the table in `UPDATE` and `DELETE`.
pub fn unsafe_all_rows() -> WriteFilter {
    WriteFilter::AllRows(AllRows(()))
}

impl From<Expr> for WriteFilter {
    fn from(value: Expr) -> Self {
        WriteFilter::Where(value)
    }
}

impl From<HashExpr> for WriteFilter {
    fn from(value: HashExpr) -> Self {
        WriteFilter::Where(value.into())
    }
}

impl From<InExpr> for WriteFilter {
    fn from(value: InExpr) -> Self {
        WriteFilter::Where(value.into())
    }
}

impl From<LikeExpr> for WriteFilter {
    fn from(value: LikeExpr) -> Self {
        WriteFilter::Where(value.into())
    }
}

impl From<BetweenExpr> for WriteFilter {
    fn from(value: BetweenExpr) -> Self {
        WriteFilter::Where(value.into())
    }
}

impl From<ExistsExpr> for WriteFilter {
    fn from(value: ExistsExpr) -> Self {
        WriteFilter::Where(value.into())
    }
}

impl From<Raw> for WriteFilter {
    fn from(value: Raw) -> Self {
        WriteFilter::Where(value.into())
    }
}

/// What an upsert collides on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictTarget {
    /// Keep the existing row.
    Ignore,
    /// Unique columns, their values are not overwritten.
    Columns(Columns),
    /// A named unique constraint.
    Constraint(SmolStr),
}

impl ConflictTarget {
    pub fn columns<C: IntoColumns>(columns: C) -> Self {
        ConflictTarget::Columns(columns.into_columns())
    }

    pub fn constraint<N: Into<SmolStr>>(name: N) -> Self {
        ConflictTarget::Constraint(name.into())
    }

    /// Record columns that an update on conflict should overwrite.
    pub(crate) fn update_columns<'a>(&self, record: &'a Record) -> Vec<&'a str> {
        match self {
            ConflictTarget::Columns(keys) => record
                .columns()
                .filter(|column| !keys.iter().any(|key| key == column))
                .collect(),
            _ => record.columns().collect(),
        }
    }
}

fn join_quoted(dialect: Dialect, columns: &[SmolStr]) -> String {
    columns
        .iter()
        .map(|column| dialect.quote_column_name(column))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `INSERT INTO t (a, b) VALUES (.., ..)` for a non empty record.
pub(crate) fn insert_sql(dialect: Dialect, table: &str, record: &Record, params: &mut Params) -> String {
    let mut columns = Vec::with_capacity(record.len());
    let mut values = Vec::with_capacity(record.len());
    for (column, value) in record.iter() {
        columns.push(dialect.quote_column_name(column));
        values.push(writer::render_string(value, dialect, params));
    }
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.quote_table_name(table),
        columns.join(", "),
        values.join(", ")
    )
}

/// Writes whole statements: DML with bound values, and DDL.
///
/// The default methods produce the standard syntax. Each dialect overrides
/// only the statements it spells differently, or rejects with
/// [`Error::Unsupported`].
pub trait StatementBuilder: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn query(&self, sql: String, params: Params) -> Query {
        Query::new(self.dialect(), sql, params)
    }

    fn unsupported(&self, operation: &'static str) -> Error {
        Error::unsupported(self.dialect(), operation)
    }

    fn quote_table(&self, table: &str) -> String {
        self.dialect().quote_table_name(table)
    }

    fn quote_column(&self, column: &str) -> String {
        self.dialect().quote_column_name(column)
    }

    fn quote_name(&self, name: &str) -> String {
        self.dialect().quote_simple_name(name)
    }

    /// Condition text for `filter`, `None` when every row is targeted.
    fn build_filter(
        &self,
        statement: &'static str,
        table: &str,
        filter: &WriteFilter,
        params: &mut Params,
    ) -> Result<Option<String>> {
        match filter {
            WriteFilter::AllRows(_) => Ok(None),
            WriteFilter::Where(expr) => {
                let condition = expr.build(self.dialect(), params);
                if condition.is_empty() {
                    return Err(Error::unfiltered(statement, table));
                }
                Ok(Some(condition))
            }
        }
    }

    fn insert_default_values(&self, table: &str) -> Result<Query> {
        Ok(self.query(
            format!("INSERT INTO {} DEFAULT VALUES", self.quote_table(table)),
            Params::new(),
        ))
    }

    fn insert(&self, table: &str, record: &Record) -> Result<Query> {
        if record.is_empty() {
            return self.insert_default_values(table);
        }
        let mut params = Params::new();
        let sql = insert_sql(self.dialect(), table, record, &mut params);
        Ok(self.query(sql, params))
    }

    fn upsert(&self, _table: &str, _record: &Record, _target: &ConflictTarget) -> Result<Query> {
        Err(self.unsupported("UPSERT"))
    }

    fn update(&self, table: &str, record: &Record, filter: &WriteFilter) -> Result<Query> {
        if record.is_empty() {
            return Err(Error::empty_record("UPDATE", table));
        }
        let dialect = self.dialect();
        let mut params = Params::new();
        let sets: Vec<String> = record
            .iter()
            .map(|(column, value)| {
                format!(
                    "{}={}",
                    dialect.quote_column_name(column),
                    writer::render_string(value, dialect, &mut params)
                )
            })
            .collect();
        let mut sql = format!("UPDATE {} SET {}", self.quote_table(table), sets.join(", "));
        if let Some(condition) = self.build_filter("UPDATE", table, filter, &mut params)? {
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
        }
        Ok(self.query(sql, params))
    }

    fn delete(&self, table: &str, filter: &WriteFilter) -> Result<Query> {
        let mut params = Params::new();
        let mut sql = format!("DELETE FROM {}", self.quote_table(table));
        if let Some(condition) = self.build_filter("DELETE", table, filter, &mut params)? {
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
        }
        Ok(self.query(sql, params))
    }

    fn create_table(&self, table: &str, columns: &ColumnDefs, options: Option<&str>) -> Result<Query> {
        if columns.is_empty() {
            return Err(Error::empty_record("CREATE TABLE", table));
        }
        let defs: Vec<String> = columns
            .iter()
            .map(|(name, ty)| format!("{} {}", self.quote_column(name), ty))
            .collect();
        let mut sql = format!("CREATE TABLE {} ({})", self.quote_table(table), defs.join(", "));
        if let Some(options) = options.filter(|o| !o.is_empty()) {
            sql.push(' ');
            sql.push_str(options);
        }
        Ok(self.query(sql, Params::new()))
    }

    fn rename_table(&self, old_name: &str, new_name: &str) -> Result<Query> {
        Ok(self.query(
            format!("RENAME TABLE {} TO {}", self.quote_table(old_name), self.quote_table(new_name)),
            Params::new(),
        ))
    }

    fn drop_table(&self, table: &str) -> Result<Query> {
        Ok(self.query(format!("DROP TABLE {}", self.quote_table(table)), Params::new()))
    }

    fn truncate_table(&self, table: &str) -> Result<Query> {
        Ok(self.query(format!("TRUNCATE TABLE {}", self.quote_table(table)), Params::new()))
    }

    fn add_column(&self, table: &str, column: &str, ty: &str) -> Result<Query> {
        Ok(self.query(
            format!("ALTER TABLE {} ADD {} {}", self.quote_table(table), self.quote_column(column), ty),
            Params::new(),
        ))
    }

    fn drop_column(&self, table: &str, column: &str) -> Result<Query> {
        Ok(self.query(
            format!("ALTER TABLE {} DROP COLUMN {}", self.quote_table(table), self.quote_column(column)),
            Params::new(),
        ))
    }

    fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> Result<Query> {
        Ok(self.query(
            format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                self.quote_table(table),
                self.quote_column(old_name),
                self.quote_column(new_name)
            ),
            Params::new(),
        ))
    }

    fn alter_column(&self, table: &str, column: &str, ty: &str) -> Result<Query> {
        Ok(self.query(
            format!(
                "ALTER TABLE {} ALTER COLUMN {} SET DATA TYPE {}",
                self.quote_table(table),
                self.quote_column(column),
                ty
            ),
            Params::new(),
        ))
    }

    fn add_primary_key(&self, name: &str, table: &str, columns: &[SmolStr]) -> Result<Query> {
        Ok(self.query(
            format!(
                "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY ({})",
                self.quote_table(table),
                self.quote_name(name),
                join_quoted(self.dialect(), columns)
            ),
            Params::new(),
        ))
    }

    fn drop_primary_key(&self, name: &str, table: &str) -> Result<Query> {
        Ok(self.query(
            format!("ALTER TABLE {} DROP CONSTRAINT {}", self.quote_table(table), self.quote_name(name)),
            Params::new(),
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn add_foreign_key(
        &self,
        name: &str,
        table: &str,
        columns: &[SmolStr],
        ref_table: &str,
        ref_columns: &[SmolStr],
        options: Option<&str>,
    ) -> Result<Query> {
        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote_table(table),
            self.quote_name(name),
            join_quoted(self.dialect(), columns),
            self.quote_table(ref_table),
            join_quoted(self.dialect(), ref_columns)
        );
        if let Some(options) = options.filter(|o| !o.is_empty()) {
            sql.push(' ');
            sql.push_str(options);
        }
        Ok(self.query(sql, Params::new()))
    }

    fn drop_foreign_key(&self, name: &str, table: &str) -> Result<Query> {
        Ok(self.query(
            format!("ALTER TABLE {} DROP CONSTRAINT {}", self.quote_table(table), self.quote_name(name)),
            Params::new(),
        ))
    }

    fn create_index(&self, name: &str, table: &str, columns: &[SmolStr]) -> Result<Query> {
        Ok(self.query(
            format!(
                "CREATE INDEX {} ON {} ({})",
                self.quote_name(name),
                self.quote_table(table),
                join_quoted(self.dialect(), columns)
            ),
            Params::new(),
        ))
    }

    fn create_unique_index(&self, name: &str, table: &str, columns: &[SmolStr]) -> Result<Query> {
        Ok(self.query(
            format!(
                "CREATE UNIQUE INDEX {} ON {} ({})",
                self.quote_name(name),
                self.quote_table(table),
                join_quoted(self.dialect(), columns)
            ),
            Params::new(),
        ))
    }

    fn drop_index(&self, name: &str, _table: &str) -> Result<Query> {
        Ok(self.query(format!("DROP INDEX {}", self.quote_name(name)), Params::new()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StandardStatements;

impl StatementBuilder for StandardStatements {
    fn dialect(&self) -> Dialect {
        Dialect::Standard
    }
}

pub(crate) static STANDARD_STATEMENTS: StandardStatements = StandardStatements;
pub(crate) static SQLITE_STATEMENTS: SqliteStatements = SqliteStatements;
pub(crate) static MYSQL_STATEMENTS: MySqlStatements = MySqlStatements;
pub(crate) static PGSQL_STATEMENTS: PgsqlStatements = PgsqlStatements;
pub(crate) static MSSQL_STATEMENTS: MssqlStatements = MssqlStatements;
pub(crate) static OCI_STATEMENTS: OciStatements = OciStatements;

#[cfg(test)]
mod tests {
    use crate::{Value, hash, is_in, record};

    use super::*;

    #[test]
    fn test_insert() {
        let record = record! { "name" => "bob", "age" => 3 };
        let query = STANDARD_STATEMENTS.insert("users", &record).unwrap();
        assert_eq!("INSERT INTO \"users\" (\"name\", \"age\") VALUES ({:p0}, {:p1})", query.sql());
        assert_eq!(Some(&Value::Text("bob".into())), query.params().get("p0"));
    }

    #[test]
    fn test_insert_inline_expression() {
        let record = record! { "name" => "bob", "created_at" => Raw::new_static("now()").unwrap() };
        let query = STANDARD_STATEMENTS.insert("users", &record).unwrap();
        assert_eq!("INSERT INTO \"users\" (\"name\", \"created_at\") VALUES ({:p0}, now())", query.sql());
        assert_eq!(1, query.params().len());
    }

    #[test]
    fn test_insert_empty_record() {
        let query = STANDARD_STATEMENTS.insert("users", &Record::new()).unwrap();
        assert_eq!("INSERT INTO \"users\" DEFAULT VALUES", query.sql());
    }

    #[test]
    fn test_update_with_filter() {
        let record = record! { "status" => 1 };
        let query = STANDARD_STATEMENTS
            .update("users", &record, &hash! { "id" => 100 }.into())
            .unwrap();
        assert_eq!("UPDATE \"users\" SET \"status\"={:p0} WHERE \"id\"={:p1}", query.sql());
        assert_eq!(2, query.params().len());
    }

    #[test]
    fn test_update_empty_filter_is_rejected() {
        let record = record! { "status" => 1 };
        let err = STANDARD_STATEMENTS
            .update("users", &record, &Expr::and(Vec::<Expr>::new()).into())
            .unwrap_err();
        assert_eq!(Error::unfiltered("UPDATE", "users"), err);
    }

    #[test]
    fn test_update_all_rows() {
        let record = record! { "status" => 1 };
        let query = STANDARD_STATEMENTS.update("users", &record, &unsafe_all_rows()).unwrap();
        assert_eq!("UPDATE \"users\" SET \"status\"={:p0}", query.sql());
    }

    #[test]
    fn test_update_empty_record() {
        let err = STANDARD_STATEMENTS
            .update("users", &Record::new(), &unsafe_all_rows())
            .unwrap_err();
        assert_eq!(Error::empty_record("UPDATE", "users"), err);
    }

    #[test]
    fn test_delete() {
        let query = STANDARD_STATEMENTS
            .delete("users", &is_in("id", [1, 2]).into())
            .unwrap();
        assert_eq!("DELETE FROM \"users\" WHERE \"id\" IN ({:p0}, {:p1})", query.sql());

        let err = STANDARD_STATEMENTS.delete("users", &hash! {}.into()).unwrap_err();
        assert_eq!(Error::unfiltered("DELETE", "users"), err);

        let query = STANDARD_STATEMENTS.delete("users", &unsafe_all_rows()).unwrap();
        assert_eq!("DELETE FROM \"users\"", query.sql());
    }

    #[test]
    fn test_upsert_unsupported() {
        let record = record! { "id" => 1 };
        let err = STANDARD_STATEMENTS
            .upsert("users", &record, &ConflictTarget::Ignore)
            .unwrap_err();
        assert_eq!(Error::unsupported(Dialect::Standard, "UPSERT"), err);
    }

    #[test]
    fn test_create_table() {
        let columns = crate::col::IntoColumnDefs::into_column_defs([("id", "INTEGER PRIMARY KEY"), ("name", "TEXT")]);
        let query = STANDARD_STATEMENTS.create_table("users", &columns, Some("WITHOUT ROWID")).unwrap();
        assert_eq!(
            "CREATE TABLE \"users\" (\"id\" INTEGER PRIMARY KEY, \"name\" TEXT) WITHOUT ROWID",
            query.sql()
        );
        let err = STANDARD_STATEMENTS.create_table("users", &ColumnDefs::new(), None).unwrap_err();
        assert_eq!(Error::empty_record("CREATE TABLE", "users"), err);
    }

    #[test]
    fn test_standard_ddl() {
        let s = &STANDARD_STATEMENTS;
        assert_eq!("RENAME TABLE \"a\" TO \"b\"", s.rename_table("a", "b").unwrap().sql());
        assert_eq!("DROP TABLE \"a\"", s.drop_table("a").unwrap().sql());
        assert_eq!("TRUNCATE TABLE \"a\"", s.truncate_table("a").unwrap().sql());
        assert_eq!("ALTER TABLE \"a\" ADD \"c\" INT", s.add_column("a", "c", "INT").unwrap().sql());
        assert_eq!("ALTER TABLE \"a\" DROP COLUMN \"c\"", s.drop_column("a", "c").unwrap().sql());
        assert_eq!(
            "ALTER TABLE \"a\" RENAME COLUMN \"c\" TO \"d\"",
            s.rename_column("a", "c", "d").unwrap().sql()
        );
        assert_eq!(
            "ALTER TABLE \"a\" ALTER COLUMN \"c\" SET DATA TYPE TEXT",
            s.alter_column("a", "c", "TEXT").unwrap().sql()
        );
        assert_eq!(
            "ALTER TABLE \"a\" ADD CONSTRAINT \"pk\" PRIMARY KEY (\"x\", \"y\")",
            s.add_primary_key("pk", "a", &["x".into(), "y".into()]).unwrap().sql()
        );
        assert_eq!(
            "ALTER TABLE \"a\" DROP CONSTRAINT \"pk\"",
            s.drop_primary_key("pk", "a").unwrap().sql()
        );
        assert_eq!(
            "ALTER TABLE \"a\" ADD CONSTRAINT \"fk\" FOREIGN KEY (\"b_id\") REFERENCES \"b\" (\"id\") ON DELETE CASCADE",
            s.add_foreign_key("fk", "a", &["b_id".into()], "b", &["id".into()], Some("ON DELETE CASCADE"))
                .unwrap()
                .sql()
        );
        assert_eq!(
            "ALTER TABLE \"a\" DROP CONSTRAINT \"fk\"",
            s.drop_foreign_key("fk", "a").unwrap().sql()
        );
        assert_eq!(
            "CREATE INDEX \"idx\" ON \"a\" (\"x\")",
            s.create_index("idx", "a", &["x".into()]).unwrap().sql()
        );
        assert_eq!(
            "CREATE UNIQUE INDEX \"idx\" ON \"a\" (\"x\")",
            s.create_unique_index("idx", "a", &["x".into()]).unwrap().sql()
        );
        assert_eq!("DROP INDEX \"idx\"", s.drop_index("idx", "a").unwrap().sql());
    }
}
