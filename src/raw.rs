use std::{collections::HashSet, fmt::Write};

use smol_str::SmolStr;

use crate::{
    bind::{IntoValue, Params, Value},
    error::{Error, Result},
    writer::{FormatContext, FormatWriter},
};

/// One piece of SQL text as seen by the placeholder scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    /// `{:name}`
    Param(&'a str),
    /// `{{name}}`
    Table(&'a str),
    /// `[[name]]`
    Column(&'a str),
}

fn is_name_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn is_quoted_name_char(byte: u8) -> bool {
    is_name_char(byte) || matches!(byte, b'-' | b'.' | b' ')
}

/// Length of `{:name}` at the start of `rest`, if it is a valid placeholder.
fn param_len(rest: &[u8]) -> Option<usize> {
    if rest.len() < 4 || rest[0] != b'{' || rest[1] != b':' || !is_name_start(rest[2]) {
        return None;
    }
    let end = 3 + rest[3..].iter().take_while(|b| is_name_char(**b)).count();
    (rest.get(end) == Some(&b'}')).then_some(end + 1)
}

/// Length of `{{name}}` or `[[name]]` at the start of `rest`.
fn quoted_len(rest: &[u8], open: u8, close: u8) -> Option<usize> {
    if rest.len() < 5 || rest[0] != open || rest[1] != open {
        return None;
    }
    let inner = rest[2..].iter().take_while(|b| is_quoted_name_char(**b)).count();
    let end = 2 + inner;
    if inner == 0 || rest.get(end) != Some(&close) || rest.get(end + 1) != Some(&close) {
        return None;
    }
    Some(end + 2)
}

/// Splits `sql` into text and marker segments in a single left to right pass.
///
/// Single quoted literals are copied as text, `''` inside them included.
pub(crate) fn segments(sql: &str) -> Vec<Segment<'_>> {
    let bytes = sql.as_bytes();
    let mut out = Vec::new();
    let mut span_start = 0;
    let mut index = 0;
    let mut in_literal = false;

    while index < bytes.len() {
        let byte = bytes[index];
        if in_literal {
            if byte == b'\'' {
                if bytes.get(index + 1) == Some(&b'\'') {
                    index += 2;
                    continue;
                }
                in_literal = false;
            }
            index += 1;
            continue;
        }

        let rest = &bytes[index..];
        let marker = match byte {
            b'\'' => {
                in_literal = true;
                None
            }
            b'{' => param_len(rest)
                .map(|len| (len, Segment::Param(&sql[index + 2..index + len - 1])))
                .or_else(|| {
                    quoted_len(rest, b'{', b'}')
                        .map(|len| (len, Segment::Table(&sql[index + 2..index + len - 2])))
                }),
            b'[' => quoted_len(rest, b'[', b']')
                .map(|len| (len, Segment::Column(&sql[index + 2..index + len - 2]))),
            _ => None,
        };

        match marker {
            Some((len, segment)) => {
                if span_start < index {
                    out.push(Segment::Text(&sql[span_start..index]));
                }
                out.push(segment);
                index += len;
                span_start = index;
            }
            None => index += 1,
        }
    }

    if span_start < sql.len() {
        out.push(Segment::Text(&sql[span_start..]));
    }
    out
}

/// Names of every `{:name}` placeholder in `sql`, in order of appearance.
pub(crate) fn param_names(sql: &str) -> Vec<&str> {
    segments(sql)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Param(name) => Some(name),
            _ => None,
        })
        .collect()
}

/// Moves `local` into `params`, returning `sql` with clashing names renamed.
///
/// Names still free in `params` keep their spelling. A clash always gets a
/// fresh `p{n}` name, so a nested statement never changes a value the
/// enclosing one already references.
pub(crate) fn absorb(params: &mut Params, local: Params, sql: &str) -> String {
    let mut renamed: Vec<(SmolStr, SmolStr)> = Vec::new();
    for (name, value) in local {
        if params.contains(&name) {
            let target = params.push(value);
            renamed.push((name, target));
        } else {
            params.insert(name, value);
        }
    }
    if renamed.is_empty() {
        return sql.to_string();
    }

    let mut out = String::with_capacity(sql.len() + 8);
    for segment in segments(sql) {
        match segment {
            Segment::Param(name) => {
                let target = renamed
                    .iter()
                    .find(|(original, _)| original.as_str() == name)
                    .map(|(_, target)| target.as_str())
                    .unwrap_or(name);
                out.push_str("{:");
                out.push_str(target);
                out.push('}');
            }
            Segment::Text(text) => out.push_str(text),
            Segment::Table(name) => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
            Segment::Column(name) => {
                out.push_str("[[");
                out.push_str(name);
                out.push_str("]]");
            }
        }
    }
    out
}

/// An opaque SQL fragment with its own named parameters.
///
/// The fragment may reference values as `{:name}`, tables as `{{name}}` and
/// columns as `[[name]]`. Construction checks that every referenced name is
/// bound and every bound name is referenced.
#[derive(Debug, Clone, PartialEq)]
pub struct Raw {
    sql: SmolStr,
    params: Params,
}

impl Raw {
    pub fn new<T>(sql: T, params: Params) -> Result<Self>
    where
        T: Into<SmolStr>,
    {
        let sql = sql.into();
        let names = param_names(&sql);
        for name in &names {
            if !params.contains(name) {
                return Err(Error::MissingRawParam {
                    name: name.to_string(),
                });
            }
        }
        let referenced: HashSet<&str> = names.into_iter().collect();
        if let Some(name) = params.names().find(|name| !referenced.contains(name)) {
            return Err(Error::UnusedRawParam {
                name: name.to_string(),
            });
        }
        Ok(Self { sql, params })
    }

    /// A fragment without parameters, such as `"created_at > now()"`.
    pub fn new_static(sql: &'static str) -> Result<Self> {
        Self::new(SmolStr::new_static(sql), Params::new())
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Binds one more value, only valid for names the fragment references.
    pub fn bind<K, V>(mut self, name: K, value: V) -> Result<Self>
    where
        K: Into<SmolStr>,
        V: IntoValue,
    {
        let name = name.into();
        if !param_names(&self.sql).contains(&name.as_str()) {
            return Err(Error::UnusedRawParam {
                name: name.to_string(),
            });
        }
        self.params.insert(name, value);
        Ok(self)
    }

    /// Name under which `value` ends up in the shared table.
    ///
    /// A name that is free, or already holds the same value, is reused.
    /// Otherwise a fresh name is allocated so that two fragments that picked
    /// the same name never overwrite each other.
    fn claim(params: &mut Params, name: &str, value: &Value) -> SmolStr {
        match params.get(name) {
            None => {
                params.insert(name, value.clone());
                SmolStr::new(name)
            }
            Some(existing) if existing == value => SmolStr::new(name),
            Some(_) => params.push(value.clone()),
        }
    }
}

impl FormatWriter for Raw {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
        if self.params.is_empty() {
            return context.writer.write_str(&self.sql);
        }

        let mut renamed: Vec<(&str, SmolStr)> = Vec::with_capacity(self.params.len());
        for (name, value) in self.params.iter() {
            let claimed = Raw::claim(context.params, name, value);
            renamed.push((name, claimed));
        }

        for segment in segments(&self.sql) {
            match segment {
                Segment::Param(name) => {
                    let target = renamed
                        .iter()
                        .find(|(original, _)| *original == name)
                        .map(|(_, target)| target.as_str())
                        .unwrap_or(name);
                    write!(context.writer, "{{:{target}}}")?;
                }
                Segment::Text(text) => context.writer.write_str(text)?,
                Segment::Table(name) => write!(context.writer, "{{{{{name}}}}}")?,
                Segment::Column(name) => write!(context.writer, "[[{name}]]")?,
            }
        }
        Ok(())
    }
}
