use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::scalar::{IntoOperand, Operand};

/// Column to value map consumed by `INSERT`, `UPSERT` and `UPDATE`.
///
/// Values are bound as parameters, expressions are written inline.
#[derive(Debug, Default, Clone)]
pub struct Record(IndexMap<SmolStr, Operand>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K, V>(mut self, column: K, value: V) -> Self
    where
        K: Into<SmolStr>,
        V: IntoOperand,
    {
        self.set(column, value);
        self
    }

    pub fn set<K, V>(&mut self, column: K, value: V) -> &mut Self
    where
        K: Into<SmolStr>,
        V: IntoOperand,
    {
        self.0.insert(column.into(), value.into_operand());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Operand> {
        self.0.get(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(SmolStr::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operand)> {
        self.0.iter().map(|(column, value)| (column.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<SmolStr>,
    V: IntoOperand,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, value)| (column.into(), value.into_operand()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{Value, record, scalar::Operand};

    #[test]
    fn test_record_last_write_wins() {
        let record = record! { "name" => "a", "age" => 3, "name" => "b" };
        let columns: Vec<_> = record.columns().collect();
        assert_eq!(vec!["name", "age"], columns);
        assert!(matches!(
            record.get("name"),
            Some(Operand::Value(Value::Text(text))) if text == "b"
        ));
    }
}
