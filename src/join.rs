use sqlcraft_derive::JoinMethods;
use smol_str::SmolStr;

use crate::expr::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, JoinMethods)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    #[join(ignore)]
    Cross,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct JoinInfo {
    pub kind: JoinKind,
    pub table: SmolStr,
    pub on: Option<Expr>,
}

pub type Joins = Vec<JoinInfo>;

#[cfg(test)]
mod tests {
    use crate::{Builder, hash, raw};

    #[test]
    fn test_generated_join_methods() {
        let mut query = Builder::pgsql().select("u.id");
        query
            .from("users u")
            .inner_join("profiles p", raw("p.user_id = u.id", Default::default()).unwrap())
            .left_join("teams t", hash! { "t.active" => true })
            .right_join("orgs o", raw("o.id = t.org_id", Default::default()).unwrap())
            .full_join("logs l", raw("l.user_id = u.id", Default::default()).unwrap())
            .cross_join("settings");
        let sql = query.to_sql();
        assert_eq!(
            "SELECT \"u\".\"id\" FROM \"users\" \"u\" \
             INNER JOIN \"profiles\" \"p\" ON p.user_id = u.id \
             LEFT JOIN \"teams\" \"t\" ON \"t\".\"active\"={:p0} \
             RIGHT JOIN \"orgs\" \"o\" ON o.id = t.org_id \
             FULL JOIN \"logs\" \"l\" ON l.user_id = u.id \
             CROSS JOIN \"settings\"",
            sql
        );
    }
}
