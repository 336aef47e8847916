mod bind;
mod builder;
mod col;
mod dialect;
mod error;
pub mod expr;
mod hook;
mod ident;
mod join;
mod query;
mod query_builder;
mod raw;
mod row;
mod scalar;
mod select;
pub mod statement;
mod union;
mod writer;

#[cfg(any(feature = "postgres", feature = "mysql", feature = "sqlite"))]
pub mod driver;

pub use bind::{IntoValue, Params, Value};
pub use builder::Builder;
pub use col::{ColumnDefs, Columns, IntoColumnDefs, IntoColumns};
pub use dialect::{Dialect, HasDialect, Mssql, MySql, Oci, Pgsql, Sqlite, Standard};
pub use error::{Error, ExecError, Result};
pub use expr::{
    BetweenExpr, BetweenOperator, Conjunction, ExistsExpr, ExistsOperator, Expr, HashExpr,
    HashValue, InExpr, IntoHashValue, IntoLikeValues, LikeExpr,
};
pub use hook::{Hooks, QueryHook, TracingHook};
pub use ident::split_alias;
pub use join::{JoinInfo, JoinKind};
pub use query::{Executor, Query, Statement};
pub use query_builder::QueryBuilder;
pub use raw::Raw;
pub use row::Record;
pub use scalar::{IntoOperand, IntoOperands, Operand};
pub use select::{BuildHook, SelectQuery};
pub use statement::{ConflictTarget, StatementBuilder, WriteFilter, unsafe_all_rows};
pub use union::UnionInfo;

/// A raw SQL fragment, `{:name}` placeholders must match `params` exactly.
pub fn raw<S: Into<smol_str::SmolStr>>(sql: S, params: Params) -> Result<Expr> {
    Ok(Expr::Raw(Raw::new(sql, params)?))
}

pub fn not<E: Into<Expr>>(inner: E) -> Expr {
    Expr::not(inner)
}

pub fn and<I, E>(items: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::and(items)
}

pub fn or<I, E>(items: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::or(items)
}

pub fn enclose<E: Into<Expr>>(inner: E) -> Expr {
    Expr::enclose(inner)
}

pub fn is_in<C: Into<smol_str::SmolStr>, V: IntoOperands>(column: C, values: V) -> Expr {
    Expr::In(InExpr::new(column, values))
}

pub fn not_in<C: Into<smol_str::SmolStr>, V: IntoOperands>(column: C, values: V) -> Expr {
    Expr::In(InExpr::not_in(column, values))
}

pub fn like<C: Into<smol_str::SmolStr>, V: IntoLikeValues>(column: C, values: V) -> LikeExpr {
    LikeExpr::like(column, values)
}

pub fn not_like<C: Into<smol_str::SmolStr>, V: IntoLikeValues>(column: C, values: V) -> LikeExpr {
    LikeExpr::not_like(column, values)
}

pub fn or_like<C: Into<smol_str::SmolStr>, V: IntoLikeValues>(column: C, values: V) -> LikeExpr {
    LikeExpr::or_like(column, values)
}

pub fn or_not_like<C: Into<smol_str::SmolStr>, V: IntoLikeValues>(column: C, values: V) -> LikeExpr {
    LikeExpr::or_not_like(column, values)
}

pub fn exists<E: Into<Expr>>(inner: E) -> Expr {
    Expr::Exists(ExistsExpr::new(ExistsOperator::Exists, inner))
}

pub fn not_exists<E: Into<Expr>>(inner: E) -> Expr {
    Expr::Exists(ExistsExpr::new(ExistsOperator::NotExists, inner))
}

pub fn between<C, L, H>(column: C, low: L, high: H) -> Expr
where
    C: Into<smol_str::SmolStr>,
    L: IntoOperand,
    H: IntoOperand,
{
    Expr::Between(BetweenExpr::new(BetweenOperator::Between, column, low, high))
}

pub fn not_between<C, L, H>(column: C, low: L, high: H) -> Expr
where
    C: Into<smol_str::SmolStr>,
    L: IntoOperand,
    H: IntoOperand,
{
    Expr::Between(BetweenExpr::new(BetweenOperator::NotBetween, column, low, high))
}

/// Column equality conditions joined by `AND`.
///
/// ```
/// let filter = sqlcraft::hash! { "active" => true, "role" => ["admin", "owner"] };
/// ```
#[macro_export]
macro_rules! hash {
    () => {
        $crate::Expr::Hash($crate::HashExpr::new())
    };
    ( $($col:expr => $value:expr),+ $(,)? ) => {
        $crate::Expr::Hash($crate::HashExpr::new()$(.with($col, $value))+)
    };
}

#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ( $($name:expr => $value:expr),+ $(,)? ) => {{
        let mut params = $crate::Params::new();
        $( params.insert($name, $value); )+
        params
    }};
}

#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ( $($col:expr => $value:expr),+ $(,)? ) => {{
        let mut record = $crate::Record::new();
        $( record.set($col, $value); )+
        record
    }};
}
