use std::{
    fmt::{self, Write},
    ops::Deref,
};

use crate::{
    bind::{Params, Value},
    dialect::Dialect,
};

pub(crate) trait FormatWriter {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> fmt::Result;
}

pub(crate) struct FormatContext<'a, W: Write> {
    pub(crate) writer: &'a mut W,
    pub(crate) dialect: Dialect,
    pub(crate) params: &'a mut Params,
}

impl<'a, W: Write> FormatContext<'a, W> {
    pub fn new(writer: &'a mut W, dialect: Dialect, params: &'a mut Params) -> Self {
        Self {
            writer,
            dialect,
            params,
        }
    }

    pub(crate) fn write_column(&mut self, name: &str) -> fmt::Result {
        self.writer.write_str(&self.dialect.quote_column_name(name))
    }

    /// Registers `value` in the shared table and writes its placeholder.
    pub(crate) fn write_param(&mut self, value: Value) -> fmt::Result {
        let name = self.params.push(value);
        write!(self.writer, "{{:{name}}}")
    }

    /// Renders `node` into its own buffer, sharing this context's params.
    ///
    /// Used wherever an empty fragment must be dropped instead of wrapped.
    pub(crate) fn render<F: FormatWriter>(&mut self, node: &F) -> Result<String, fmt::Error> {
        let mut out = String::new();
        let mut context = FormatContext::new(&mut out, self.dialect, &mut *self.params);
        node.format_writer(&mut context)?;
        Ok(out)
    }
}

/// Renders a node to a fresh string.
pub(crate) fn render_string<F: FormatWriter>(node: &F, dialect: Dialect, params: &mut Params) -> String {
    let mut str = String::with_capacity(64);
    let mut context = FormatContext::new(&mut str, dialect, params);
    node.format_writer(&mut context)
        .expect("should not fail on a string writer");
    str
}

impl<D> FormatWriter for D
where
    D: Deref,
    D::Target: FormatWriter,
{
    fn format_writer<W: Write>(&self, ctx: &mut FormatContext<'_, W>) -> fmt::Result {
        self.deref().format_writer(ctx)
    }
}
