use indexmap::IndexMap;
use smol_str::SmolStr;

pub type Columns = Vec<SmolStr>;

pub trait IntoColumns {
    fn into_columns(self) -> Columns;
}

impl IntoColumns for () {
    fn into_columns(self) -> Columns {
        Columns::new()
    }
}

impl IntoColumns for &str {
    fn into_columns(self) -> Columns {
        vec![SmolStr::new(self)]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Columns {
        vec![SmolStr::from(self)]
    }
}

impl IntoColumns for SmolStr {
    fn into_columns(self) -> Columns {
        vec![self]
    }
}

impl<T, const N: usize> IntoColumns for [T; N]
where
    T: Into<SmolStr>,
{
    fn into_columns(self) -> Columns {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T> IntoColumns for Vec<T>
where
    T: Into<SmolStr>,
{
    fn into_columns(self) -> Columns {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T> IntoColumns for &[T]
where
    T: Into<SmolStr> + Clone,
{
    fn into_columns(self) -> Columns {
        self.iter().cloned().map(Into::into).collect()
    }
}

/// Column name to column type text, in declaration order, for `CREATE TABLE`.
pub type ColumnDefs = IndexMap<SmolStr, SmolStr>;

pub trait IntoColumnDefs {
    fn into_column_defs(self) -> ColumnDefs;
}

impl IntoColumnDefs for ColumnDefs {
    #[inline(always)]
    fn into_column_defs(self) -> ColumnDefs {
        self
    }
}

impl<C, T, const N: usize> IntoColumnDefs for [(C, T); N]
where
    C: Into<SmolStr>,
    T: Into<SmolStr>,
{
    fn into_column_defs(self) -> ColumnDefs {
        self.into_iter().map(|(c, t)| (c.into(), t.into())).collect()
    }
}

impl<C, T> IntoColumnDefs for Vec<(C, T)>
where
    C: Into<SmolStr>,
    T: Into<SmolStr>,
{
    fn into_column_defs(self) -> ColumnDefs {
        self.into_iter().map(|(c, t)| (c.into(), t.into())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select<T>(value: T) -> Columns
    where
        T: IntoColumns,
    {
        value.into_columns()
    }

    #[test]
    fn test_into_columns() {
        assert_eq!(vec!["hello"], select("hello"));
        assert_eq!(vec!["hello"], select(String::from("hello")));
        assert_eq!(vec!["a", "b"], select(["a", "b"]));
        assert_eq!(vec!["a", "b"], select(vec![String::from("a"), String::from("b")]));
        assert!(select(()).is_empty());
    }

    #[test]
    fn test_column_defs_keep_order() {
        let defs = [("id", "INTEGER"), ("name", "TEXT"), ("age", "INT")].into_column_defs();
        let names: Vec<_> = defs.keys().map(SmolStr::as_str).collect();
        assert_eq!(vec!["id", "name", "age"], names);
    }
}
