//! The `#[derive(Record)]` macro: compile-time structural reflection.
//!
//! The derive walks the struct fields in declaration order and classifies
//! each one as a column field (any type implementing `Primitive`) or a
//! child collection field (`HasMany<T>`). Child fields never become
//! columns; everything else flows into the generated `table_schema`.

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, DeriveInput};

#[proc_macro_derive(Record, attributes(table, key, column))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(output) => output.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct ColumnField<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    column_name: String,
}

struct ChildField<'a> {
    ident: &'a syn::Ident,
    element: &'a syn::Type,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let syn::Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Record can only be derived for structs",
        ));
    };
    let syn::Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            input,
            "Record requires named fields",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "generic record types are not supported",
        ));
    }

    let ident = &input.ident;
    let vis = &input.vis;
    let name = ident.to_string();
    let table = table_attr(&input.attrs)?.unwrap_or_else(|| name.clone());

    let mut columns: Vec<ColumnField<'_>> = vec![];
    let mut children: Vec<ChildField<'_>> = vec![];
    let mut key_index: Option<usize> = None;

    for field in &fields.named {
        let field_ident = field.ident.as_ref().expect("named field");
        let key = field.attrs.iter().any(|attr| attr.path().is_ident("key"));
        let column_override = column_attr(&field.attrs)?;

        if let Some(element) = has_many_element(&field.ty) {
            if key {
                return Err(syn::Error::new_spanned(
                    field,
                    "a child collection field cannot be the primary key",
                ));
            }
            if column_override.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "`column` does not apply to child collection fields",
                ));
            }
            children.push(ChildField {
                ident: field_ident,
                element,
            });
            continue;
        }

        if key {
            if key_index.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "a record type has at most one primary key",
                ));
            }
            key_index = Some(columns.len());
        }

        columns.push(ColumnField {
            ident: field_ident,
            ty: &field.ty,
            column_name: column_override.unwrap_or_else(|| field_ident.to_string()),
        });
    }

    let record_impl = expand_record_impl(ident, &name, &table, &columns, &children, key_index);
    let fields_struct = expand_fields_struct(ident, vis, &columns, &children);

    Ok(quote! {
        #record_impl
        #fields_struct
    })
}

fn expand_record_impl(
    ident: &syn::Ident,
    name: &str,
    table: &str,
    columns: &[ColumnField<'_>],
    children: &[ChildField<'_>],
    key_index: Option<usize>,
) -> TokenStream2 {
    let column_idents: Vec<_> = columns.iter().map(|column| column.ident).collect();
    let column_tys: Vec<_> = columns.iter().map(|column| column.ty).collect();
    let column_names: Vec<_> = columns.iter().map(|column| column.column_name.as_str()).collect();
    let column_indices: Vec<_> = (0..columns.len()).collect();

    let child_idents: Vec<_> = children.iter().map(|child| child.ident).collect();
    let child_names: Vec<_> = children
        .iter()
        .map(|child| child.ident.to_string())
        .collect();
    let child_elements: Vec<_> = children.iter().map(|child| child.element).collect();

    let key_tokens = match key_index {
        Some(index) => quote!(::std::option::Option::Some(#index)),
        None => quote!(::std::option::Option::None),
    };

    quote! {
        impl ::griddle::Record for #ident {
            const NAME: &'static str = #name;

            const TABLE: &'static str = #table;

            fn table_schema() -> ::griddle::Result<::griddle::schema::Table> {
                ::griddle::schema::Table::new(
                    Self::NAME,
                    Self::TABLE,
                    ::std::vec![
                        #(
                            ::griddle::schema::Column::new(
                                #column_names,
                                <#column_tys as ::griddle::stmt::Primitive>::ty(),
                                <#column_tys as ::griddle::stmt::Primitive>::NULLABLE,
                            ),
                        )*
                    ],
                    #key_tokens,
                    ::std::vec![
                        #(
                            ::griddle::schema::ChildCollection {
                                field: #child_names,
                                element: <#child_elements as ::griddle::Record>::NAME,
                            },
                        )*
                    ],
                )
            }

            fn load(row: &mut ::griddle::Row<'_>) -> ::griddle::Result<Self> {
                ::std::result::Result::Ok(Self {
                    #( #column_idents: row.read::<#column_tys>()?, )*
                    #( #child_idents: ::std::default::Default::default(), )*
                })
            }

            fn values(&self) -> ::std::vec::Vec<::griddle::stmt::Value> {
                ::std::vec![
                    #( ::griddle::stmt::Primitive::to_value(&self.#column_idents), )*
                ]
            }

            fn value_at(&self, index: usize) -> ::griddle::stmt::Value {
                match index {
                    #( #column_indices => ::griddle::stmt::Primitive::to_value(&self.#column_idents), )*
                    _ => ::griddle::stmt::Value::Null,
                }
            }

            fn children() -> &'static [::griddle::ChildMeta] {
                const CHILDREN: &[::griddle::ChildMeta] = &[
                    #(
                        ::griddle::ChildMeta {
                            field: #child_names,
                            element: <#child_elements as ::griddle::Record>::NAME,
                            create: ::griddle::create_entry::<#child_elements>,
                        },
                    )*
                ];
                CHILDREN
            }
        }
    }
}

fn expand_fields_struct(
    ident: &syn::Ident,
    vis: &syn::Visibility,
    columns: &[ColumnField<'_>],
    children: &[ChildField<'_>],
) -> TokenStream2 {
    let fields_ident = format_ident!("{}Fields", ident);

    let column_accessors = columns.iter().map(|column| {
        let field_ident = column.ident;
        let ty = column.ty;
        let column_name = column.column_name.as_str();
        quote! {
            #vis fn #field_ident(&self) -> ::griddle::Col<#ident, #ty> {
                ::griddle::Col::new(#column_name)
            }
        }
    });

    let child_accessors = children.iter().map(|child| {
        let field_ident = child.ident;
        let element = child.element;
        let field_name = field_ident.to_string();
        quote! {
            #vis fn #field_ident(&self) -> ::griddle::HasManyField<#ident, #element> {
                ::griddle::HasManyField::new(#field_name, |record, rows| {
                    record.#field_ident = ::griddle::HasMany::loaded(rows);
                })
            }
        }
    });

    quote! {
        /// Typed field accessors for the record, one method per field.
        #vis struct #fields_ident;

        impl #fields_ident {
            #( #column_accessors )*
            #( #child_accessors )*
        }

        impl #ident {
            #vis fn fields() -> #fields_ident {
                #fields_ident
            }
        }
    }
}

/// `#[table("name")]` on the struct.
fn table_attr(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    for attr in attrs {
        if attr.path().is_ident("table") {
            let lit: syn::LitStr = attr.parse_args()?;
            return Ok(Some(lit.value()));
        }
    }
    Ok(None)
}

/// `#[column("name")]` on a field.
fn column_attr(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    for attr in attrs {
        if attr.path().is_ident("column") {
            let lit: syn::LitStr = attr.parse_args()?;
            return Ok(Some(lit.value()));
        }
    }
    Ok(None)
}

/// The element type of a `HasMany<T>` field, `None` for anything else.
fn has_many_element(ty: &syn::Type) -> Option<&syn::Type> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "HasMany" {
        return None;
    }

    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(syn::GenericArgument::Type(element)) if args.args.len() == 1 => Some(element),
        _ => None,
    }
}
