use std::sync::Arc;

use smol_str::SmolStr;

use crate::{
    bind::Params,
    col::{IntoColumnDefs, IntoColumns},
    dialect::{Dialect, HasDialect},
    error::Result,
    hook::{Hooks, QueryHook},
    query::Query,
    query_builder::QueryBuilder,
    row::Record,
    select::SelectQuery,
    statement::{ConflictTarget, StatementBuilder, WriteFilter},
};

/// Entry point for one dialect.
///
/// Hands out [`SelectQuery`] builders and writes DML/DDL statements. Every
/// [`Query`] it produces carries the hooks registered here.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    dialect: Dialect,
    hooks: Hooks,
}

impl Builder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            hooks: Hooks::default(),
        }
    }

    /// Builder for a dialect given by name, e.g. `"postgres"` or `"sqlite3"`.
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn of<D: HasDialect>() -> Self {
        Self::new(D::DIALECT)
    }

    pub fn standard() -> Self {
        Self::new(Dialect::Standard)
    }

    pub fn sqlite() -> Self {
        Self::new(Dialect::Sqlite)
    }

    pub fn mysql() -> Self {
        Self::new(Dialect::MySql)
    }

    pub fn pgsql() -> Self {
        Self::new(Dialect::Pgsql)
    }

    pub fn mssql() -> Self {
        Self::new(Dialect::Mssql)
    }

    pub fn oci() -> Self {
        Self::new(Dialect::Oci)
    }

    pub fn with_hook(mut self, hook: Arc<dyn QueryHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn query_builder(&self) -> &'static dyn QueryBuilder {
        self.dialect.query_builder()
    }

    pub fn statement_builder(&self) -> &'static dyn StatementBuilder {
        self.dialect.statement_builder()
    }

    pub fn quote_table_name(&self, name: &str) -> String {
        self.dialect.quote_table_name(name)
    }

    pub fn quote_column_name(&self, name: &str) -> String {
        self.dialect.quote_column_name(name)
    }

    pub fn quote_simple_name(&self, name: &str) -> String {
        self.dialect.quote_simple_name(name)
    }

    /// A query from hand written SQL, bind values with [`Query::bind`].
    pub fn new_query<S: Into<String>>(&self, sql: S) -> Query {
        Query::new(self.dialect, sql, Params::new()).with_hooks(&self.hooks)
    }

    pub fn select<C: IntoColumns>(&self, columns: C) -> SelectQuery {
        let mut query = SelectQuery::new(self.clone());
        query.select(columns);
        query
    }

    fn finish(&self, query: Result<Query>) -> Result<Query> {
        let query = query?.with_hooks(&self.hooks);
        tracing::trace!(
            target: "sqlcraft::build",
            dialect = %self.dialect,
            sql = %query.sql(),
            params = query.params().len(),
            "built statement",
        );
        Ok(query)
    }

    // dml

    /// `INSERT`, or the dialect's default values form for an empty record.
    pub fn insert(&self, table: &str, record: &Record) -> Result<Query> {
        self.finish(self.statement_builder().insert(table, record))
    }

    pub fn upsert(&self, table: &str, record: &Record, target: &ConflictTarget) -> Result<Query> {
        self.finish(self.statement_builder().upsert(table, record, target))
    }

    pub fn update<F: Into<WriteFilter>>(&self, table: &str, record: &Record, filter: F) -> Result<Query> {
        self.finish(self.statement_builder().update(table, record, &filter.into()))
    }

    pub fn delete<F: Into<WriteFilter>>(&self, table: &str, filter: F) -> Result<Query> {
        self.finish(self.statement_builder().delete(table, &filter.into()))
    }

    // ddl

    pub fn create_table<C: IntoColumnDefs>(&self, table: &str, columns: C, options: Option<&str>) -> Result<Query> {
        let columns = columns.into_column_defs();
        self.finish(self.statement_builder().create_table(table, &columns, options))
    }

    pub fn rename_table(&self, old_name: &str, new_name: &str) -> Result<Query> {
        self.finish(self.statement_builder().rename_table(old_name, new_name))
    }

    pub fn drop_table(&self, table: &str) -> Result<Query> {
        self.finish(self.statement_builder().drop_table(table))
    }

    pub fn truncate_table(&self, table: &str) -> Result<Query> {
        self.finish(self.statement_builder().truncate_table(table))
    }

    pub fn add_column(&self, table: &str, column: &str, ty: &str) -> Result<Query> {
        self.finish(self.statement_builder().add_column(table, column, ty))
    }

    pub fn drop_column(&self, table: &str, column: &str) -> Result<Query> {
        self.finish(self.statement_builder().drop_column(table, column))
    }

    pub fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> Result<Query> {
        self.finish(self.statement_builder().rename_column(table, old_name, new_name))
    }

    pub fn alter_column(&self, table: &str, column: &str, ty: &str) -> Result<Query> {
        self.finish(self.statement_builder().alter_column(table, column, ty))
    }

    pub fn add_primary_key<C: IntoColumns>(&self, name: &str, table: &str, columns: C) -> Result<Query> {
        let columns = columns.into_columns();
        self.finish(self.statement_builder().add_primary_key(name, table, &columns))
    }

    pub fn drop_primary_key(&self, name: &str, table: &str) -> Result<Query> {
        self.finish(self.statement_builder().drop_primary_key(name, table))
    }

    /// `options` is appended as is, e.g. `ON DELETE CASCADE`.
    pub fn add_foreign_key<C, R>(
        &self,
        name: &str,
        table: &str,
        columns: C,
        ref_table: &str,
        ref_columns: R,
        options: Option<&str>,
    ) -> Result<Query>
    where
        C: IntoColumns,
        R: IntoColumns,
    {
        let columns = columns.into_columns();
        let ref_columns = ref_columns.into_columns();
        self.finish(self.statement_builder().add_foreign_key(
            name,
            table,
            &columns,
            ref_table,
            &ref_columns,
            options,
        ))
    }

    pub fn drop_foreign_key(&self, name: &str, table: &str) -> Result<Query> {
        self.finish(self.statement_builder().drop_foreign_key(name, table))
    }

    pub fn create_index<C: IntoColumns>(&self, name: &str, table: &str, columns: C) -> Result<Query> {
        let columns: Vec<SmolStr> = columns.into_columns();
        self.finish(self.statement_builder().create_index(name, table, &columns))
    }

    pub fn create_unique_index<C: IntoColumns>(&self, name: &str, table: &str, columns: C) -> Result<Query> {
        let columns: Vec<SmolStr> = columns.into_columns();
        self.finish(self.statement_builder().create_unique_index(name, table, &columns))
    }

    pub fn drop_index(&self, name: &str, table: &str) -> Result<Query> {
        self.finish(self.statement_builder().drop_index(name, table))
    }
}
