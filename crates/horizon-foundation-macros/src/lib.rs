//! Procedural macros for the Horizon Foundation meta-object system.
//!
//! This crate provides `#[derive(Reflect)]`, which generates the
//! `MetaObject` registration table for a struct and implements
//! `horizon_foundation_core::Reflect`.
//!
//! # Attributes
//!
//! ## `#[reflect(...)]` on the struct
//!
//! ```ignore
//! #[derive(Reflect)]
//! #[reflect(methods = "Person::register", name = "Person")]
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//! ```
//!
//! - `methods = "path"`: a function
//!   `fn(MetaObjectBuilder<Self>) -> MetaObjectBuilder<Self>` that adds the
//!   named methods (getters, setters, actions)
//! - `name = "..."`: the type name reported by the meta-object (defaults to
//!   the struct identifier)
//!
//! ## `#[reflect(...)]` on a field
//!
//! - `skip`: the field is not registered
//! - `rename = "..."`: register the field under another name
//!
//! Every registered field must be `Clone` and convert into a `Value`.
//! Fields whose name starts with `_` are skipped.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Expr, ExprLit, Field, Fields, Ident, Lit, Path, Type,
    parse_macro_input,
};

/// Derive `Reflect` and generate the meta-object for a struct.
///
/// This macro generates:
/// - A lazily built static `MetaObject` with one field entry per field
/// - An inherent `static_meta_object()` accessor
/// - The `Reflect` implementation
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_derive_reflect(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Parsed field information.
struct FieldInfo {
    ident: Ident,
    name: String,
    ty: Type,
}

/// Parsed struct-level attributes.
struct ReflectAttrs {
    methods: Option<Path>,
    name: Option<String>,
}

fn impl_derive_reflect(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Reflect derive does not support generic structs",
        ));
    }

    let attrs = parse_reflect_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Reflect derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Reflect derive only supports structs",
            ));
        }
    };

    let mut infos = Vec::new();
    for field in fields {
        if let Some(info) = parse_field(field)? {
            infos.push(info);
        }
    }

    let type_name = attrs.name.unwrap_or_else(|| struct_name.to_string());
    let field_entries = generate_field_entries(struct_name, &infos);
    let register_methods = match &attrs.methods {
        Some(path) => quote! { let builder = #path(builder); },
        None => quote! {},
    };

    let expanded = quote! {
        impl #struct_name {
            /// The meta-object for this type (generated by #[derive(Reflect)]).
            pub fn static_meta_object() -> &'static horizon_foundation_core::meta::MetaObject {
                static META: std::sync::LazyLock<horizon_foundation_core::meta::MetaObject> =
                    std::sync::LazyLock::new(|| {
                        let builder = horizon_foundation_core::meta::MetaObjectBuilder::<#struct_name>::new(#type_name)
                            #field_entries;
                        #register_methods
                        builder.build()
                    });
                &META
            }
        }

        impl horizon_foundation_core::meta::Reflect for #struct_name {
            fn meta_object(&self) -> &'static horizon_foundation_core::meta::MetaObject {
                Self::static_meta_object()
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }
    };

    Ok(expanded)
}

/// Parse struct-level #[reflect(...)] attributes.
fn parse_reflect_attrs(attrs: &[Attribute]) -> syn::Result<ReflectAttrs> {
    let mut result = ReflectAttrs {
        methods: None,
        name: None,
    };

    for attr in attrs {
        if !attr.path().is_ident("reflect") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("methods") {
                let lit = string_value(&meta.value()?.parse()?)?;
                result.methods = Some(syn::parse_str::<Path>(&lit)?);
                Ok(())
            } else if meta.path.is_ident("name") {
                result.name = Some(string_value(&meta.value()?.parse()?)?);
                Ok(())
            } else {
                Err(meta.error("expected `methods = \"path\"` or `name = \"...\"`"))
            }
        })?;
    }

    Ok(result)
}

/// Parse a field and its #[reflect(...)] attributes.
fn parse_field(field: &Field) -> syn::Result<Option<FieldInfo>> {
    let Some(ident) = field.ident.clone() else {
        return Ok(None);
    };

    let mut skip = false;
    let mut rename = None;

    for attr in &field.attrs {
        if !attr.path().is_ident("reflect") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                rename = Some(string_value(&meta.value()?.parse()?)?);
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `rename = \"...\"`"))
            }
        })?;
    }

    if skip || ident.to_string().starts_with('_') {
        return Ok(None);
    }

    let name = rename.unwrap_or_else(|| ident.to_string());
    Ok(Some(FieldInfo {
        ident,
        name,
        ty: field.ty.clone(),
    }))
}

/// Extract the string from a literal expression.
fn string_value(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(lit_str),
            ..
        }) => Ok(lit_str.value()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

/// Convert a type to a string representation.
fn type_to_string(ty: &Type) -> String {
    quote!(#ty).to_string().replace(' ', "")
}

/// Generate the chained `.field(...)` calls.
fn generate_field_entries(struct_name: &Ident, fields: &[FieldInfo]) -> TokenStream2 {
    let entries = fields.iter().map(|field| {
        let ident = &field.ident;
        let name = &field.name;
        let type_name = type_to_string(&field.ty);
        quote! {
            .field(#name, #type_name, |this: &#struct_name| {
                ::std::clone::Clone::clone(&this.#ident)
            })
        }
    });

    quote! { #(#entries)* }
}
