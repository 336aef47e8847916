use std::{
    fmt::{self, Write},
    sync::Arc,
};

use smol_str::SmolStr;

use crate::{
    Builder,
    bind::{IntoValue, Params},
    col::{Columns, IntoColumns},
    dialect::Dialect,
    expr::Expr,
    join::{JoinInfo, JoinKind, Joins},
    query::Query,
    raw,
    union::{UnionInfo, Unions},
    writer::{FormatContext, FormatWriter},
};

/// Callback run on every [`Query`] produced by [`SelectQuery::build`].
#[derive(Clone)]
pub struct BuildHook(Arc<dyn Fn(&mut Query) + Send + Sync>);

impl fmt::Debug for BuildHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BuildHook")
    }
}

/// Fluent `SELECT` builder.
///
/// Clauses are stored as given and only rendered by [`SelectQuery::build`],
/// so a query can be built any number of times with the same result.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    builder: Builder,
    selects: Columns,
    distinct: bool,
    select_option: Option<SmolStr>,
    from: Columns,
    joins: Joins,
    where_: Option<Expr>,
    group_by: Columns,
    having: Option<Expr>,
    order_by: Columns,
    unions: Unions,
    limit: i64,
    offset: i64,
    params: Params,
    build_hook: Option<BuildHook>,
}

impl SelectQuery {
    pub fn new(builder: Builder) -> Self {
        Self {
            builder,
            selects: Columns::new(),
            distinct: false,
            select_option: None,
            from: Columns::new(),
            joins: Joins::new(),
            where_: None,
            group_by: Columns::new(),
            having: None,
            order_by: Columns::new(),
            unions: Unions::new(),
            limit: -1,
            offset: -1,
            params: Params::new(),
            build_hook: None,
        }
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn select<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.selects = columns.into_columns();
        self
    }

    pub fn and_select<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.selects.extend(columns.into_columns());
        self
    }

    pub fn distinct(&mut self, distinct: bool) -> &mut Self {
        self.distinct = distinct;
        self
    }

    /// Text placed between `SELECT` and the columns, such as `SQL_CALC_FOUND_ROWS`.
    pub fn select_option<S: Into<SmolStr>>(&mut self, option: S) -> &mut Self {
        self.select_option = Some(option.into());
        self
    }

    pub fn from<T: IntoColumns>(&mut self, tables: T) -> &mut Self {
        self.from = tables.into_columns();
        self
    }

    // where stuff

    pub fn where_expr<E: Into<Expr>>(&mut self, filter: E) -> &mut Self {
        self.where_ = Some(filter.into());
        self
    }

    pub fn and_where<E: Into<Expr>>(&mut self, filter: E) -> &mut Self {
        let filter = filter.into();
        self.where_ = Some(match self.where_.take() {
            Some(existing) => existing.and_with(filter),
            None => filter,
        });
        self
    }

    pub fn or_where<E: Into<Expr>>(&mut self, filter: E) -> &mut Self {
        let filter = filter.into();
        self.where_ = Some(match self.where_.take() {
            Some(existing) => existing.or_with(filter),
            None => filter,
        });
        self
    }

    // joins, the kind specific shortcuts are derived on `JoinKind`

    pub fn join<T: Into<SmolStr>>(&mut self, kind: JoinKind, table: T, on: Option<Expr>) -> &mut Self {
        self.joins.push(JoinInfo {
            kind,
            table: table.into(),
            on,
        });
        self
    }

    pub fn cross_join<T: Into<SmolStr>>(&mut self, table: T) -> &mut Self {
        self.join(JoinKind::Cross, table, None)
    }

    pub fn group_by<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.group_by = columns.into_columns();
        self
    }

    pub fn and_group_by<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.group_by.extend(columns.into_columns());
        self
    }

    pub fn having<E: Into<Expr>>(&mut self, filter: E) -> &mut Self {
        self.having = Some(filter.into());
        self
    }

    pub fn and_having<E: Into<Expr>>(&mut self, filter: E) -> &mut Self {
        let filter = filter.into();
        self.having = Some(match self.having.take() {
            Some(existing) => existing.and_with(filter),
            None => filter,
        });
        self
    }

    pub fn or_having<E: Into<Expr>>(&mut self, filter: E) -> &mut Self {
        let filter = filter.into();
        self.having = Some(match self.having.take() {
            Some(existing) => existing.or_with(filter),
            None => filter,
        });
        self
    }

    /// Columns with an optional `ASC`/`DESC` suffix.
    pub fn order_by<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.order_by = columns.into_columns();
        self
    }

    pub fn and_order_by<C: IntoColumns>(&mut self, columns: C) -> &mut Self {
        self.order_by.extend(columns.into_columns());
        self
    }

    pub fn union(&mut self, query: SelectQuery) -> &mut Self {
        self.unions.push(UnionInfo { all: false, query });
        self
    }

    pub fn union_all(&mut self, query: SelectQuery) -> &mut Self {
        self.unions.push(UnionInfo { all: true, query });
        self
    }

    /// A negative value removes the limit.
    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.limit = limit;
        self
    }

    /// A negative value removes the offset.
    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.offset = offset;
        self
    }

    /// Replaces the parameters the query is seeded with.
    pub fn bind(&mut self, params: Params) -> &mut Self {
        self.params = params;
        self
    }

    pub fn and_bind(&mut self, params: Params) -> &mut Self {
        self.params.merge(params);
        self
    }

    pub fn bind_value<K: Into<SmolStr>, V: IntoValue>(&mut self, name: K, value: V) -> &mut Self {
        self.params.insert(name, value);
        self
    }

    pub fn with_build_hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut Query) + Send + Sync + 'static,
    {
        self.build_hook = Some(BuildHook(Arc::new(hook)));
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Whether an `ORDER BY`, `LIMIT` or `OFFSET` clause gets rendered.
    pub(crate) fn is_ordered_or_paged(&self) -> bool {
        !self.order_by.is_empty() || self.limit >= 0 || self.offset > 0
    }

    pub(crate) fn has_unions(&self) -> bool {
        !self.unions.is_empty()
    }

    pub fn build(&self) -> Query {
        let dialect = self.builder.dialect();
        let mut params = Params::new();
        let sql = self.render(dialect, &mut params);
        tracing::trace!(
            target: "sqlcraft::build",
            %dialect,
            %sql,
            params = params.len(),
            "built select",
        );
        let mut query = Query::new(dialect, sql, params).with_hooks(self.builder.hooks());
        if let Some(BuildHook(ref hook)) = self.build_hook {
            hook(&mut query);
        }
        query
    }

    pub fn to_sql(&self) -> String {
        self.build().sql().to_string()
    }

    /// Renders every clause in statement order into `params`.
    pub(crate) fn render(&self, dialect: Dialect, params: &mut Params) -> String {
        params.merge(self.params.clone());
        let builder = dialect.query_builder();
        let mut sql = String::with_capacity(128);
        builder.build_select(&mut sql, &self.selects, self.distinct, self.select_option.as_deref());
        builder.build_from(&mut sql, &self.from);
        builder.build_join(&mut sql, &self.joins, params);
        builder.build_where(&mut sql, self.where_.as_ref(), params);
        builder.build_group_by(&mut sql, &self.group_by);
        builder.build_having(&mut sql, self.having.as_ref(), params);
        builder.build_order_by_and_limit(&mut sql, &self.order_by, self.limit, self.offset);
        builder.build_union(&mut sql, &self.unions, self.is_ordered_or_paged(), params);
        sql
    }

    /// Renders as part of an enclosing statement.
    ///
    /// The query gets its own table first, then joins `params` through
    /// [`raw::absorb`], so its bound names never overwrite the outer ones.
    pub(crate) fn render_nested(&self, dialect: Dialect, params: &mut Params) -> String {
        let mut local = Params::new();
        let sql = self.render(dialect, &mut local);
        raw::absorb(params, local, &sql)
    }
}

impl FormatWriter for SelectQuery {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> fmt::Result {
        let sql = self.render_nested(context.dialect, context.params);
        context.writer.write_str(&sql)
    }
}
