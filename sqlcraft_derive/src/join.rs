use darling::{FromDeriveInput, FromVariant, ast};
use heck::{ToShoutySnakeCase, ToSnakeCase};
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, parse_macro_input};

#[derive(Debug, FromDeriveInput)]
#[darling(supports(enum_unit))]
struct JoinDeriveInput {
    ident: syn::Ident,
    data: ast::Data<JoinVariant, ()>,
}

#[derive(Debug, FromVariant)]
#[darling(attributes(join))]
struct JoinVariant {
    ident: syn::Ident,
    #[darling(default)]
    ignore: bool,
}

pub fn join_methods_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let enum_info = match JoinDeriveInput::from_derive_input(&input) {
        Ok(v) => v,
        Err(e) => return e.write_errors().into(),
    };

    let enum_name = &enum_info.ident;
    let variants = enum_info.data.take_enum().unwrap_or_default();

    let methods = variants.iter().filter(|var| !var.ignore).map(|var| {
        let var_name = &var.ident;
        let snake = var_name.to_string().to_snake_case();
        let join_fn = format_ident!("{}_join", snake);
        let doc = format!(
            "Adds a `{} JOIN` on `table` with the `on` condition.",
            var_name.to_string().to_shouty_snake_case()
        );

        quote! {
            #[doc = #doc]
            pub fn #join_fn<T, E>(&mut self, table: T, on: E) -> &mut Self
            where
                T: Into<::smol_str::SmolStr>,
                E: Into<crate::Expr>,
            {
                self.join(#enum_name::#var_name, table, Some(on.into()))
            }
        }
    });

    quote! {
        impl crate::SelectQuery {
            #(#methods)*
        }
    }
    .into()
}
