use sqlcraft::{
    Builder, Dialect, Error, Value, and, hash, is_in, params, raw, record, unsafe_all_rows,
};

fn active_admins(builder: &Builder) -> sqlcraft::SelectQuery {
    let mut query = builder.select(["id", "name"]);
    query
        .from("users")
        .where_expr(and([
            hash! { "active" => true },
            is_in("role", ["admin", "owner"]),
        ]))
        .order_by("name")
        .limit(10);
    query
}

#[test]
fn sqlite_select_scenario() {
    let query = active_admins(&Builder::sqlite()).build();
    assert_eq!(
        "SELECT `id`, `name` FROM `users` WHERE (`active`={:p0}) AND (`role` IN ({:p1}, {:p2})) \
         ORDER BY `name` LIMIT 10",
        query.sql()
    );
    assert_eq!(3, query.params().len());

    let statement = query.prepare().unwrap();
    assert_eq!(
        "SELECT `id`, `name` FROM `users` WHERE (`active`=?) AND (`role` IN (?, ?)) \
         ORDER BY `name` LIMIT 10",
        statement.sql
    );
    assert_eq!(
        vec![
            Value::Bool(true),
            Value::Text("admin".into()),
            Value::Text("owner".into()),
        ],
        statement.args
    );
}

#[test]
fn clauses_keep_statement_order() {
    let sql = active_admins(&Builder::pgsql()).to_sql();
    let positions: Vec<usize> = ["SELECT", "FROM", "WHERE", "ORDER BY", "LIMIT"]
        .iter()
        .map(|keyword| sql.find(keyword).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{sql}");
}

#[test]
fn build_is_idempotent() {
    let query = active_admins(&Builder::mysql());
    let first = query.build();
    let second = query.build();
    assert_eq!(first.sql(), second.sql());
    assert_eq!(first.params(), second.params());
    assert_eq!(first.prepare().unwrap(), second.prepare().unwrap());
}

#[test]
fn raw_fragments_share_the_parameter_table() {
    let mut query = Builder::pgsql().select(());
    query
        .from("events")
        .where_expr(raw("created_at > {:since}", params! { "since" => "2024-01-01" }).unwrap())
        .and_where(hash! { "kind" => "login" });
    let statement = query.build().prepare().unwrap();
    assert_eq!(
        "SELECT * FROM \"events\" WHERE (created_at > $1) AND (\"kind\"=$2)",
        statement.sql
    );
    assert_eq!(2, statement.args.len());
}

#[test]
fn unfiltered_writes_need_the_explicit_marker() {
    let builder = Builder::sqlite();
    let record = record! { "active" => false };

    let err = builder.update("users", &record, and(Vec::<sqlcraft::Expr>::new())).unwrap_err();
    assert_eq!(
        Error::UnfilteredWrite {
            statement: "UPDATE",
            table: "users".into()
        },
        err
    );
    let err = builder.delete("users", hash! {}).unwrap_err();
    assert!(matches!(err, Error::UnfilteredWrite { statement: "DELETE", .. }));

    let query = builder.update("users", &record, unsafe_all_rows()).unwrap();
    assert_eq!("UPDATE `users` SET `active`={:p0}", query.sql());
    let query = builder.delete("users", unsafe_all_rows()).unwrap();
    assert_eq!("DELETE FROM `users`", query.sql());
}

#[test]
fn unknown_dialect_fails_at_construction() {
    assert_eq!(
        Error::UnknownDialect("informix".into()),
        Builder::from_name("informix").unwrap_err()
    );
    assert_eq!(Dialect::Sqlite, Builder::from_name(" SQLite3 ").unwrap().dialect());
}

#[test]
fn missing_param_fails_before_execution() {
    let mut query = Builder::pgsql().new_query("SELECT * FROM t WHERE id = {:id}");
    assert_eq!(Error::MissingParam("id".into()), query.prepare().unwrap_err());
    query.bind(params! { "id" => 7 });
    assert_eq!("SELECT * FROM t WHERE id = $1", query.prepare().unwrap().sql);
}
