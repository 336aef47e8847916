use smol_str::SmolStr;

use crate::{
    bind::Params,
    dialect::Dialect,
    expr::Expr,
    ident,
    join::JoinInfo,
    union::UnionInfo,
};

/// Appends `clause` to `sql`, separated by a single space.
fn push_clause(sql: &mut String, clause: &str) {
    if clause.is_empty() {
        return;
    }
    if !sql.is_empty() {
        sql.push(' ');
    }
    sql.push_str(clause);
}

fn push_list<F>(out: &mut String, items: &[SmolStr], mut write: F)
where
    F: FnMut(&mut String, &str),
{
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        write(out, item);
    }
}

/// Renders the clauses of a `SELECT` statement.
///
/// Every method appends one clause to `sql`. The default methods produce the
/// standard syntax; a dialect overrides only the clauses where it differs.
pub trait QueryBuilder: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn build_select(&self, sql: &mut String, columns: &[SmolStr], distinct: bool, option: Option<&str>) {
        let mut clause = String::from("SELECT ");
        if distinct {
            clause.push_str("DISTINCT ");
        }
        if let Some(option) = option.filter(|o| !o.is_empty()) {
            clause.push_str(option);
            clause.push(' ');
        }
        if columns.is_empty() {
            clause.push('*');
        } else {
            let dialect = self.dialect();
            push_list(&mut clause, columns, |out, column| {
                ident::write_select_column(out, dialect, column)
            });
        }
        push_clause(sql, &clause);
    }

    fn build_from(&self, sql: &mut String, tables: &[SmolStr]) {
        if tables.is_empty() {
            return;
        }
        let dialect = self.dialect();
        let mut clause = String::from("FROM ");
        push_list(&mut clause, tables, |out, table| {
            ident::write_table_ref(out, dialect, table)
        });
        push_clause(sql, &clause);
    }

    fn build_join(&self, sql: &mut String, joins: &[JoinInfo], params: &mut Params) {
        let dialect = self.dialect();
        for join in joins {
            let mut clause = String::from(join.kind.keyword());
            clause.push(' ');
            ident::write_table_ref(&mut clause, dialect, &join.table);
            if let Some(ref on) = join.on {
                let condition = on.build(dialect, params);
                if !condition.is_empty() {
                    clause.push_str(" ON ");
                    clause.push_str(&condition);
                }
            }
            push_clause(sql, &clause);
        }
    }

    fn build_where(&self, sql: &mut String, filter: Option<&Expr>, params: &mut Params) {
        if let Some(filter) = filter {
            let condition = filter.build(self.dialect(), params);
            if !condition.is_empty() {
                push_clause(sql, &format!("WHERE {condition}"));
            }
        }
    }

    fn build_group_by(&self, sql: &mut String, columns: &[SmolStr]) {
        if columns.is_empty() {
            return;
        }
        let dialect = self.dialect();
        let mut clause = String::from("GROUP BY ");
        push_list(&mut clause, columns, |out, column| dialect.write_column_name(out, column));
        push_clause(sql, &clause);
    }

    fn build_having(&self, sql: &mut String, filter: Option<&Expr>, params: &mut Params) {
        if let Some(filter) = filter {
            let condition = filter.build(self.dialect(), params);
            if !condition.is_empty() {
                push_clause(sql, &format!("HAVING {condition}"));
            }
        }
    }

    fn build_order_by_and_limit(&self, sql: &mut String, columns: &[SmolStr], limit: i64, offset: i64) {
        self.build_order_by(sql, columns);
        self.build_limit(sql, limit, offset);
    }

    fn build_order_by(&self, sql: &mut String, columns: &[SmolStr]) {
        if columns.is_empty() {
            return;
        }
        let dialect = self.dialect();
        let mut clause = String::from("ORDER BY ");
        push_list(&mut clause, columns, |out, column| {
            ident::write_order_column(out, dialect, column)
        });
        push_clause(sql, &clause);
    }

    /// Negative values are unset. An offset alone still needs a `LIMIT`.
    fn build_limit(&self, sql: &mut String, limit: i64, offset: i64) {
        let limit = if limit < 0 && offset > 0 { i64::MAX } else { limit };
        if limit < 0 {
            return;
        }
        push_clause(sql, &format!("LIMIT {limit}"));
        if offset > 0 {
            push_clause(sql, &format!("OFFSET {offset}"));
        }
    }

    /// `ordered` tells whether `sql` already ends in `ORDER BY` or paging.
    fn build_union(&self, sql: &mut String, unions: &[UnionInfo], _ordered: bool, params: &mut Params) {
        if unions.is_empty() {
            return;
        }
        let mut out = format!("({sql})");
        for union in unions {
            out.push_str(if union.all { " UNION ALL (" } else { " UNION (" });
            out.push_str(&union.query.render_nested(self.dialect(), params));
            out.push(')');
        }
        *sql = out;
    }
}

/// Standard clause syntax, shared by the standard, MySQL and PostgreSQL dialects.
#[derive(Debug, Clone, Copy)]
pub struct BaseQueryBuilder {
    dialect: Dialect,
}

impl BaseQueryBuilder {
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }
}

impl QueryBuilder for BaseQueryBuilder {
    fn dialect(&self) -> Dialect {
        self.dialect
    }
}

/// SQLite rejects parenthesized compound select members.
///
/// A part that carries its own `ORDER BY`, paging or unions is moved into
/// `SELECT * FROM (..)` instead.
#[derive(Debug, Clone, Copy)]
pub struct SqliteQueryBuilder;

impl QueryBuilder for SqliteQueryBuilder {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn build_union(&self, sql: &mut String, unions: &[UnionInfo], ordered: bool, params: &mut Params) {
        if unions.is_empty() {
            return;
        }
        if ordered {
            *sql = format!("SELECT * FROM ({sql})");
        }
        for union in unions {
            sql.push_str(if union.all { " UNION ALL " } else { " UNION " });
            let member = union.query.render_nested(Dialect::Sqlite, params);
            if union.query.is_ordered_or_paged() || union.query.has_unions() {
                sql.push_str("SELECT * FROM (");
                sql.push_str(&member);
                sql.push(')');
            } else {
                sql.push_str(&member);
            }
        }
    }
}

/// SQL Server pages with `OFFSET .. FETCH`, which requires an `ORDER BY`.
#[derive(Debug, Clone, Copy)]
pub struct MssqlQueryBuilder;

impl QueryBuilder for MssqlQueryBuilder {
    fn dialect(&self) -> Dialect {
        Dialect::Mssql
    }

    fn build_order_by_and_limit(&self, sql: &mut String, columns: &[SmolStr], limit: i64, offset: i64) {
        self.build_order_by(sql, columns);
        if limit < 0 && offset < 0 {
            return;
        }
        if columns.is_empty() {
            push_clause(sql, "ORDER BY (SELECT NULL)");
        }
        push_clause(sql, &format!("OFFSET {} ROWS", offset.max(0)));
        if limit >= 0 {
            push_clause(sql, &format!("FETCH NEXT {limit} ROWS ONLY"));
        }
    }
}

/// Oracle 12c row limiting.
#[derive(Debug, Clone, Copy)]
pub struct OciQueryBuilder;

impl QueryBuilder for OciQueryBuilder {
    fn dialect(&self) -> Dialect {
        Dialect::Oci
    }

    fn build_limit(&self, sql: &mut String, limit: i64, offset: i64) {
        if offset > 0 {
            push_clause(sql, &format!("OFFSET {offset} ROWS"));
        }
        if limit >= 0 {
            push_clause(sql, &format!("FETCH NEXT {limit} ROWS ONLY"));
        }
    }
}

pub(crate) static STANDARD_QUERY_BUILDER: BaseQueryBuilder = BaseQueryBuilder::new(Dialect::Standard);
pub(crate) static MYSQL_QUERY_BUILDER: BaseQueryBuilder = BaseQueryBuilder::new(Dialect::MySql);
pub(crate) static PGSQL_QUERY_BUILDER: BaseQueryBuilder = BaseQueryBuilder::new(Dialect::Pgsql);
pub(crate) static SQLITE_QUERY_BUILDER: SqliteQueryBuilder = SqliteQueryBuilder;
pub(crate) static MSSQL_QUERY_BUILDER: MssqlQueryBuilder = MssqlQueryBuilder;
pub(crate) static OCI_QUERY_BUILDER: OciQueryBuilder = OciQueryBuilder;
