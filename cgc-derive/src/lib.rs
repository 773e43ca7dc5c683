use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, LitStr, Meta, Type};

/// Derive macro describing the columns a record serializes to.
///
/// For each named field it records:
/// - the column name (the `#[serde(rename = "...")]` value, else the field name)
/// - whether the column always holds a value (the field is not an `Option<T>`)
/// - a description taken from the field's doc comments
///
/// Generates `csv_schema() -> &'static [crate::schema::CsvField]` and
/// `csv_columns() -> &'static [&'static str]`, both in declaration order.
#[proc_macro_derive(CsvSchema, attributes(serde))]
pub fn derive_csv_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "CsvSchema needs named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "CsvSchema only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let mut columns = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let column = match serde_rename(&field.attrs) {
            Ok(rename) => rename.unwrap_or_else(|| ident.to_string()),
            Err(err) => return err.to_compile_error().into(),
        };
        columns.push((column, !is_option_type(&field.ty), doc_comment(&field.attrs)));
    }

    let entries = columns.iter().map(|(column, always_present, description)| {
        quote! {
            crate::schema::CsvField {
                name: #column,
                always_present: #always_present,
                description: #description,
            }
        }
    });
    let names = columns.iter().map(|(column, _, _)| column);

    let expanded = quote! {
        impl #name {
            pub fn csv_schema() -> &'static [crate::schema::CsvField] {
                static SCHEMA: &[crate::schema::CsvField] = &[
                    #(#entries),*
                ];
                SCHEMA
            }

            pub fn csv_columns() -> &'static [&'static str] {
                static COLUMNS: &[&str] = &[#(#names),*];
                COLUMNS
            }
        }
    };

    TokenStream::from(expanded)
}

/// Finds `rename = "..."` inside any `#[serde(...)]` attribute.
fn serde_rename(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
            } else if meta.input.peek(syn::Token![=]) {
                // skip_serializing_if = "...", with = "...", etc.
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }
    Ok(rename)
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                syn::Expr::Lit(expr_lit) => match &expr_lit.lit {
                    Lit::Str(lit_str) => Some(lit_str.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
