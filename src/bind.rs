use std::borrow::Cow;

use indexmap::IndexMap;
use smol_str::{SmolStr, format_smolstr};

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    #[cfg(feature = "chrono")]
    DateTime(chrono::DateTime<chrono::Utc>),
    #[cfg(feature = "chrono")]
    NaiveDateTime(chrono::NaiveDateTime),
    #[cfg(feature = "chrono")]
    NaiveDate(chrono::NaiveDate),
    #[cfg(feature = "time")]
    OffsetDateTime(time::OffsetDateTime),
    #[cfg(feature = "time")]
    Date(time::Date),
    #[cfg(feature = "uuid")]
    Uuid(uuid::Uuid),
    #[cfg(feature = "json")]
    Json(serde_json::Value),
}

fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// SQL literal for this value, only ever used for logging.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::Text(value) => quote_literal(value),
            Value::Bytes(bytes) => {
                let mut out = String::with_capacity(bytes.len() * 2 + 3);
                out.push_str("X'");
                for byte in bytes {
                    out.push_str(&format!("{byte:02X}"));
                }
                out.push('\'');
                out
            }
            #[cfg(feature = "chrono")]
            Value::DateTime(value) => quote_literal(&value.to_rfc3339()),
            #[cfg(feature = "chrono")]
            Value::NaiveDateTime(value) => quote_literal(&value.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            #[cfg(feature = "chrono")]
            Value::NaiveDate(value) => quote_literal(&value.format("%Y-%m-%d").to_string()),
            #[cfg(feature = "time")]
            Value::OffsetDateTime(value) => {
                let text = value
                    .format(&time::format_description::well_known::Rfc3339)
                    .unwrap_or_else(|_| value.to_string());
                quote_literal(&text)
            }
            #[cfg(feature = "time")]
            Value::Date(value) => quote_literal(&value.to_string()),
            #[cfg(feature = "uuid")]
            Value::Uuid(value) => quote_literal(&value.hyphenated().to_string()),
            #[cfg(feature = "json")]
            Value::Json(value) => quote_literal(&value.to_string()),
        }
    }
}

pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    #[inline(always)]
    fn into_value(self) -> Value {
        self
    }
}

impl<T> IntoValue for Option<T>
where
    T: IntoValue,
{
    fn into_value(self) -> Value {
        if let Some(value) = self {
            value.into_value()
        } else {
            Value::Null
        }
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! into_int_value {
    ($($ty:ty),+) => {
        $(
            impl IntoValue for $ty {
                #[inline]
                fn into_value(self) -> Value {
                    Value::Int(i64::from(self))
                }
            }
        )+
    };
}

into_int_value!(i8, i16, i32, i64, u8, u16, u32);

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &String {
    fn into_value(self) -> Value {
        Value::Text(self.clone())
    }
}

impl IntoValue for SmolStr {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl<'a> IntoValue for Cow<'a, str> {
    fn into_value(self) -> Value {
        Value::Text(self.into_owned())
    }
}

impl IntoValue for char {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for &[u8] {
    fn into_value(self) -> Value {
        Value::Bytes(self.to_vec())
    }
}

#[cfg(feature = "chrono")]
impl<Tz: chrono::TimeZone> IntoValue for chrono::DateTime<Tz> {
    fn into_value(self) -> Value {
        Value::DateTime(self.with_timezone(&chrono::Utc))
    }
}

#[cfg(feature = "chrono")]
impl IntoValue for chrono::NaiveDateTime {
    fn into_value(self) -> Value {
        Value::NaiveDateTime(self)
    }
}

#[cfg(feature = "chrono")]
impl IntoValue for chrono::NaiveDate {
    fn into_value(self) -> Value {
        Value::NaiveDate(self)
    }
}

#[cfg(feature = "time")]
impl IntoValue for time::OffsetDateTime {
    fn into_value(self) -> Value {
        Value::OffsetDateTime(self)
    }
}

#[cfg(feature = "time")]
impl IntoValue for time::Date {
    fn into_value(self) -> Value {
        Value::Date(self)
    }
}

#[cfg(feature = "uuid")]
impl IntoValue for uuid::Uuid {
    fn into_value(self) -> Value {
        Value::Uuid(self)
    }
}

#[cfg(feature = "json")]
impl IntoValue for serde_json::Value {
    fn into_value(self) -> Value {
        Value::Json(self)
    }
}

/// Named parameters of one statement, in insertion order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params(IndexMap<SmolStr, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<SmolStr>,
        V: IntoValue,
    {
        self.insert(name, value);
        self
    }

    /// Last write wins, the original position of the name is kept.
    pub fn insert<K, V>(&mut self, name: K, value: V) -> &mut Self
    where
        K: Into<SmolStr>,
        V: IntoValue,
    {
        self.0.insert(name.into(), value.into_value());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(SmolStr::as_str)
    }

    pub fn merge(&mut self, other: Params) -> &mut Self {
        self.0.extend(other.0);
        self
    }

    /// Stores `value` under a generated `p{n}` name that is not taken yet.
    pub(crate) fn push(&mut self, value: Value) -> SmolStr {
        let name = self.fresh_name();
        self.0.insert(name.clone(), value);
        name
    }

    pub(crate) fn fresh_name(&self) -> SmolStr {
        let mut index = self.0.len();
        loop {
            let name = format_smolstr!("p{}", index);
            if !self.0.contains_key(&name) {
                return name;
            }
            index += 1;
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<SmolStr>,
    V: IntoValue,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into_value()))
                .collect(),
        )
    }
}

impl IntoIterator for Params {
    type Item = (SmolStr, Value);
    type IntoIter = indexmap::map::IntoIter<SmolStr, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a SmolStr, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, SmolStr, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::Null, None::<i32>.into_value());
        assert_eq!(Value::Int(3), Some(3u8).into_value());
    }

    #[test]
    fn test_push_skips_taken_names() {
        let mut params = Params::new().with("p1", 10);
        let first = params.push(Value::Int(1));
        let second = params.push(Value::Int(2));
        assert_eq!("p2", first);
        assert_eq!("p3", second);
        assert_eq!(3, params.len());
    }

    #[test]
    fn test_insert_last_write_wins() {
        let mut params = Params::new().with("a", 1).with("b", 2);
        params.insert("a", "x");
        let names: Vec<_> = params.names().collect();
        assert_eq!(vec!["a", "b"], names);
        assert_eq!(Some(&Value::Text("x".into())), params.get("a"));
    }

    #[test]
    fn test_merge() {
        let mut params = Params::new().with("a", 1);
        params.merge(Params::new().with("a", 2).with("b", true));
        assert_eq!(Some(&Value::Int(2)), params.get("a"));
        assert_eq!(Some(&Value::Bool(true)), params.get("b"));
    }

    #[test]
    fn test_literals() {
        assert_eq!("NULL", Value::Null.to_literal());
        assert_eq!("'it''s'", Value::Text("it's".into()).to_literal());
        assert_eq!("X'0AFF'", Value::Bytes(vec![10, 255]).to_literal());
        assert_eq!("TRUE", Value::Bool(true).to_literal());
        assert_eq!("-4", Value::Int(-4).to_literal());
    }

    #[cfg(feature = "uuid")]
    #[test]
    fn test_uuid_keeps_its_type() {
        let id = uuid::Uuid::nil();
        assert_eq!(Value::Uuid(id), id.into_value());
        assert_eq!("'00000000-0000-0000-0000-000000000000'", id.into_value().to_literal());
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_chrono_normalizes_to_utc() {
        use chrono::{FixedOffset, TimeZone, Utc};

        let offset = FixedOffset::east_opt(3600).unwrap();
        let local = offset.with_ymd_and_hms(2024, 1, 2, 13, 0, 0).unwrap();
        let utc = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        assert_eq!(Value::DateTime(utc), local.into_value());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_literal() {
        let value = serde_json::json!({ "name": "o'brien" });
        assert_eq!("'{\"name\":\"o''brien\"}'", value.into_value().to_literal());
    }
}
