use crate::select::SelectQuery;

#[derive(Debug, Clone)]
pub struct UnionInfo {
    pub all: bool,
    pub query: SelectQuery,
}

pub type Unions = Vec<UnionInfo>;
