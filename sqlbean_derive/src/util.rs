/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

use std::collections::HashMap;

use proc_macro2::Span;
use proc_macro_error::abort;
use quote::ToTokens;
use syn::parse_quote;
use syn::spanned::Spanned;

use crate::comm::{FieldExtra, FieldInformation, ALLOW_TABLE_ID_TYPES};

/// collect the ast fields
pub fn collect_fields(ast: &syn::DeriveInput) -> Vec<syn::Field> {
    match ast.data {
        syn::Data::Struct(syn::DataStruct { ref fields, .. }) => {
            if fields.iter().any(|field| field.ident.is_none()) {
                abort!(
                    fields.span(),
                    "struct has unnamed fields";
                    help = "#[derive(Entity)] can only be used on structs with named fields";
                );
            }
            fields.iter().cloned().collect::<Vec<_>>()
        }
        _ => abort!(ast.span(), "#[derive(Entity)] can only be used with structs"),
    }
}

/// Find the types (as string) for each field of the struct
pub fn find_fields_type(fields: &[syn::Field]) -> HashMap<String, String> {
    let mut types = HashMap::new();

    for field in fields {
        let field_ident = field_name(field);
        let field_type = match field.ty {
            syn::Type::Path(syn::TypePath { ref path, .. }) => {
                let mut tokens = proc_macro2::TokenStream::new();
                path.to_tokens(&mut tokens);
                tokens.to_string().replace(' ', "")
            }
            syn::Type::Reference(syn::TypeReference { ref elem, .. }) => {
                let mut tokens = proc_macro2::TokenStream::new();
                elem.to_tokens(&mut tokens);
                format!("&{}", tokens.to_string().replace(' ', ""))
            }
            syn::Type::Group(syn::TypeGroup { ref elem, .. }) => {
                let mut tokens = proc_macro2::TokenStream::new();
                elem.to_tokens(&mut tokens);
                tokens.to_string().replace(' ', "")
            }
            _ => {
                let mut field_type = proc_macro2::TokenStream::new();
                field.ty.to_tokens(&mut field_type);
                abort!(
                    field.ty.span(),
                    "Type `{}` of field `{}` not supported",
                    field_type,
                    field_ident
                )
            }
        };
        types.insert(field_ident, field_type);
    }

    types
}

pub fn field_name(field: &syn::Field) -> String {
    field
        .ident
        .as_ref()
        .map(|ident| ident.to_string().replace("r#", ""))
        .unwrap_or_default()
}

pub fn collect_field_info(ast: &syn::DeriveInput) -> Vec<FieldInformation> {
    let fields = collect_fields(ast);
    let field_types = find_fields_type(&fields);
    fields.into_iter().fold(vec![], |mut acc, field| {
        let key = field_name(&field);
        let (name, extra) = find_extra_for_field(&field);
        let field_type = field_types.get(&key).cloned().unwrap_or_default();
        let has_table_id = extra.iter().any(|ext| matches!(ext, FieldExtra::TableId));
        if has_table_id && !ALLOW_TABLE_ID_TYPES.contains(&field_type.as_str()) {
            abort!(field.ty.span(), "#[id] can only be used with integer or String types.")
        }
        acc.push(FieldInformation::new(field, field_type, name, extra));
        acc
    })
}

/// Finds the `#[table(...)]` annotation of the struct
pub fn find_struct_annotations(struct_attrs: &[syn::Attribute]) -> Vec<FieldExtra> {
    let mut annotations = Vec::new();
    for attr in struct_attrs {
        if attr.path != parse_quote!(table) {
            continue;
        }
        match attr.parse_meta() {
            Ok(syn::Meta::NameValue(syn::MetaNameValue { ref lit, .. })) => match lit_to_string(lit) {
                Some(s) => annotations.push(FieldExtra::Table(s)),
                None => abort!(lit.span(), "invalid argument for `table` annotation: only strings are allowed"),
            },
            Ok(syn::Meta::List(syn::MetaList { ref nested, .. })) => {
                for meta_item in nested.iter() {
                    match meta_item {
                        syn::NestedMeta::Meta(syn::Meta::NameValue(syn::MetaNameValue { ref path, ref lit, .. })) => {
                            let value = match lit_to_string(lit) {
                                Some(s) => s,
                                None => abort!(lit.span(), "invalid argument for `table` annotation: only strings are allowed"),
                            };
                            if path.is_ident("name") {
                                annotations.push(FieldExtra::Table(value));
                            } else if path.is_ident("schema") {
                                annotations.push(FieldExtra::Schema(value));
                            } else {
                                abort!(path.span(), "unexpected table annotation, expected `name` or `schema`")
                            }
                        }
                        syn::NestedMeta::Lit(lit) => match lit_to_string(lit) {
                            Some(s) => annotations.push(FieldExtra::Table(s)),
                            None => abort!(lit.span(), "invalid argument for `table` annotation: only strings are allowed"),
                        },
                        other => abort!(other.span(), "expected `name = \"...\"`"),
                    }
                }
            }
            Ok(syn::Meta::Path(ref path)) => abort!(path.span(), "#[table] requires a name"),
            Err(e) => abort!(attr.span(), "Unable to parse the table attribute: {}", e),
        }
    }
    annotations
}

/// Find everything we need to know about a field: its column name and annotations
pub fn find_extra_for_field(field: &syn::Field) -> (String, Vec<FieldExtra>) {
    let field_ident = field_name(field);

    let error = |span: Span, msg: &str| -> ! {
        abort!(span, "Invalid attribute on field `{}`: {}", field_ident, msg);
    };

    let mut column = field_ident.clone();
    let mut extras = vec![];

    for attr in &field.attrs {
        let is_id = attr.path == parse_quote!(id);
        if attr.path != parse_quote!(field) && !is_id {
            continue;
        }
        extras.push(if is_id { FieldExtra::TableId } else { FieldExtra::Field });

        match attr.parse_meta() {
            Ok(syn::Meta::Path(_)) => {}
            Ok(syn::Meta::NameValue(syn::MetaNameValue { ref lit, .. })) => match lit_to_string(lit) {
                Some(s) => extras.push(FieldExtra::Name(s)),
                None => error(lit.span(), "only strings are allowed"),
            },
            Ok(syn::Meta::List(syn::MetaList { ref nested, .. })) => {
                for meta_item in nested.iter() {
                    match meta_item {
                        syn::NestedMeta::Meta(syn::Meta::NameValue(syn::MetaNameValue { ref path, ref lit, .. })) => {
                            let ident = path.get_ident().map(|i| i.to_string()).unwrap_or_default();
                            match ident.as_str() {
                                "name" => match lit_to_string(lit) {
                                    Some(s) => extras.push(FieldExtra::Name(s)),
                                    None => error(lit.span(), "invalid argument for `name` annotation: only strings are allowed"),
                                },
                                "exist" if !is_id => match lit_to_bool(lit) {
                                    Some(b) => extras.push(FieldExtra::Exist(b)),
                                    None => error(lit.span(), "invalid argument for `exist` annotation: only boolean are allowed"),
                                },
                                v => abort!(path.span(), "unexpected annotation: {}", v),
                            }
                        }
                        other => {
                            let mut ident = proc_macro2::TokenStream::new();
                            other.to_tokens(&mut ident);
                            abort!(other.span(), "Unexpected annotation: {}", ident)
                        }
                    }
                }
            }
            Err(e) => abort!(
                attr.span(),
                "Unable to parse this attribute for the field `{}` with the error: {:?}",
                field_ident, e
            ),
        }
    }

    for extra in extras.iter() {
        if let FieldExtra::Name(name) = extra {
            column = name.clone();
        }
    }

    (column, extras)
}

pub fn lit_to_string(lit: &syn::Lit) -> Option<String> {
    match *lit {
        syn::Lit::Str(ref s) => Some(s.value()),
        _ => None,
    }
}

pub fn lit_to_bool(lit: &syn::Lit) -> Option<bool> {
    match *lit {
        syn::Lit::Bool(ref s) => Some(s.value),
        syn::Lit::Str(ref s) => s.value().parse::<bool>().ok(),
        _ => None,
    }
}
