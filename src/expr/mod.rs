use std::fmt::Write;

use crate::{
    bind::Params,
    dialect::Dialect,
    raw::Raw,
    select::SelectQuery,
    writer::{self, FormatContext, FormatWriter},
};

pub mod between;
pub mod cond;
pub mod exists;
pub mod group;
pub mod hash;
pub mod r#in;
pub mod like;

pub use between::{BetweenExpr, BetweenOperator};
pub use cond::Conjunction;
pub use exists::{ExistsExpr, ExistsOperator};
pub use hash::{HashExpr, HashValue, IntoHashValue};
pub use r#in::InExpr;
pub use like::{IntoLikeValues, LikeExpr};

/// A renderable SQL predicate or fragment.
///
/// Rendering never fails. Values are registered in the caller's [`Params`]
/// and referenced from the SQL text as `{:name}` placeholders.
#[derive(Debug, Clone)]
pub enum Expr {
    Raw(Raw),
    Hash(HashExpr),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    In(InExpr),
    Like(LikeExpr),
    Exists(ExistsExpr),
    Between(BetweenExpr),
    Enclose(Box<Expr>),
    Select(Box<SelectQuery>),
}

impl Expr {
    /// Renders the expression, adding its values to `params`.
    ///
    /// An empty string means the expression places no constraint.
    pub fn build(&self, dialect: Dialect, params: &mut Params) -> String {
        writer::render_string(self, dialect, params)
    }

    pub fn and<I, E>(items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::And(items.into_iter().map(Into::into).collect())
    }

    pub fn or<I, E>(items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Or(items.into_iter().map(Into::into).collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not<E: Into<Expr>>(inner: E) -> Self {
        Expr::Not(Box::new(inner.into()))
    }

    pub fn enclose<E: Into<Expr>>(inner: E) -> Self {
        Expr::Enclose(Box::new(inner.into()))
    }

    /// Combines with `other` through `AND`, flattening nested conjunctions.
    pub(crate) fn and_with(self, other: Expr) -> Self {
        match self {
            Expr::And(mut items) => {
                items.push(other);
                Expr::And(items)
            }
            this => Expr::And(vec![this, other]),
        }
    }

    pub(crate) fn or_with(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut items) => {
                items.push(other);
                Expr::Or(items)
            }
            this => Expr::Or(vec![this, other]),
        }
    }
}

impl FormatWriter for Expr {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
        match self {
            Expr::Raw(raw) => raw.format_writer(context),
            Expr::Hash(hash) => hash.format_writer(context),
            Expr::Not(inner) => cond::write_not(inner, context),
            Expr::And(items) => cond::write_conditions(Conjunction::And, items, context),
            Expr::Or(items) => cond::write_conditions(Conjunction::Or, items, context),
            Expr::In(expr) => expr.format_writer(context),
            Expr::Like(expr) => expr.format_writer(context),
            Expr::Exists(expr) => expr.format_writer(context),
            Expr::Between(expr) => expr.format_writer(context),
            Expr::Enclose(inner) => group::write_enclosed(inner, context),
            Expr::Select(query) => query.format_writer(context),
        }
    }
}

impl From<Raw> for Expr {
    fn from(value: Raw) -> Self {
        Expr::Raw(value)
    }
}

impl From<HashExpr> for Expr {
    fn from(value: HashExpr) -> Self {
        Expr::Hash(value)
    }
}

impl From<InExpr> for Expr {
    fn from(value: InExpr) -> Self {
        Expr::In(value)
    }
}

impl From<LikeExpr> for Expr {
    fn from(value: LikeExpr) -> Self {
        Expr::Like(value)
    }
}

impl From<ExistsExpr> for Expr {
    fn from(value: ExistsExpr) -> Self {
        Expr::Exists(value)
    }
}

impl From<BetweenExpr> for Expr {
    fn from(value: BetweenExpr) -> Self {
        Expr::Between(value)
    }
}

impl From<SelectQuery> for Expr {
    fn from(value: SelectQuery) -> Self {
        Expr::Select(Box::new(value))
    }
}
