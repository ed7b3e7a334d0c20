//! daogen macros - derive support for row materialization
//!
//! `#[derive(Record)]` describes a struct's fields to the daogen runtime so
//! result columns can be bound to them by name.

use proc_macro::TokenStream;
use proc_macro2::{Literal, TokenStream as TokenStream2};
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derive `daogen::Record` for a struct with named fields
///
/// Field attributes:
/// - `#[column(name = "col")]` binds the field to column `col`
/// - `#[column(default = "v")]` records the column default
/// - `#[column(skip)]` or `#[column(name = "-")]` never binds the field
/// - `#[column(embed)]` binds the columns of a nested record through the field
///
/// Fields without a column name bind through their identifier. Column names
/// match case-insensitively.
///
/// # Usage
/// ```rust,ignore
/// use daogen::prelude::*;
///
/// #[derive(Debug, Default, Record)]
/// pub struct User {
///     #[column(name = "id")]
///     pub id: Option<i32>,
///     #[column(name = "status", default = "1")]
///     pub status: Option<i8>,
/// }
/// ```
#[proc_macro_derive(Record, attributes(column))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_record(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

enum Binding {
    Column {
        name: Option<String>,
        default: Option<String>,
    },
    Embedded,
    Excluded,
}

fn parse_binding(field: &syn::Field) -> syn::Result<Binding> {
    let mut name = None;
    let mut default = None;
    let mut skip = false;
    let mut embed = false;

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("column")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
            } else if meta.path.is_ident("default") {
                let lit: LitStr = meta.value()?.parse()?;
                default = Some(lit.value());
            } else if meta.path.is_ident("skip") {
                skip = true;
            } else if meta.path.is_ident("embed") {
                embed = true;
            } else {
                return Err(meta.error("expected one of `name`, `default`, `skip`, `embed`"));
            }
            Ok(())
        })?;
    }

    if embed && (skip || name.is_some() || default.is_some()) {
        return Err(syn::Error::new_spanned(
            field,
            "`embed` cannot be combined with other column options",
        ));
    }

    if skip || name.as_deref() == Some("-") {
        return Ok(Binding::Excluded);
    }
    if embed {
        return Ok(Binding::Embedded);
    }
    Ok(Binding::Column {
        name: name.filter(|n| !n.is_empty()),
        default,
    })
}

fn quote_option(value: &Option<String>) -> TokenStream2 {
    match value {
        Some(v) => quote! { ::std::option::Option::Some(#v) },
        None => quote! { ::std::option::Option::None },
    }
}

fn expand_record(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Record can only be derived for structs",
            ))
        }
    };

    let mut descriptors = Vec::new();
    let mut arms = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let ident_str = ident.unraw().to_string();
        let ty = &field.ty;
        let position = Literal::usize_unsuffixed(index);

        match parse_binding(field)? {
            Binding::Excluded => {
                descriptors.push(quote! { ::daogen::FieldDescriptor::excluded(#ident_str) });
            }
            Binding::Embedded => {
                descriptors.push(quote! {
                    ::daogen::FieldDescriptor::embedded(
                        #ident_str,
                        <#ty as ::daogen::Record>::fields,
                    )
                });
                arms.push(quote! {
                    [#position, rest @ ..] => ::daogen::Record::scan_field(&mut self.#ident, rest, value),
                });
            }
            Binding::Column { name, default } => {
                let column = quote_option(&name);
                let default = quote_option(&default);
                descriptors.push(quote! {
                    ::daogen::FieldDescriptor::column(#ident_str, #column, #default)
                });
                arms.push(quote! {
                    [#position] => {
                        self.#ident = <#ty as ::daogen::FromSqlValue>::from_sql_value(value)
                            .map_err(|e| ::daogen::Error::scan(#ident_str, e))?;
                        ::std::result::Result::Ok(())
                    }
                });
            }
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::daogen::Record for #name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::daogen::FieldDescriptor> {
                ::std::vec![#(#descriptors),*]
            }

            #[allow(unused_variables)]
            fn scan_field(
                &mut self,
                path: &[usize],
                value: &::daogen::SqlValue,
            ) -> ::daogen::Result<()> {
                match path {
                    #(#arms)*
                    _ => ::std::result::Result::Err(::daogen::Error::binding(::std::format!(
                        "{} has no bindable field at path {:?}",
                        ::std::stringify!(#name),
                        path
                    ))),
                }
            }
        }
    })
}
