use proc_macro::TokenStream;

mod join;

/// Generates one `{kind}_join(table, on)` shortcut on `SelectQuery` per
/// variant of the join kind enum. Variants marked `#[join(ignore)]` are
/// skipped.
#[proc_macro_derive(JoinMethods, attributes(join))]
pub fn join_methods(input: TokenStream) -> TokenStream {
    join::join_methods_impl(input)
}
