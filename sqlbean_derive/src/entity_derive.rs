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

use proc_macro::TokenStream;
use quote::quote;

use crate::comm::{FieldExtra, FieldInformation};
use crate::util::{collect_field_info, find_struct_annotations};

pub fn impl_entity(input: TokenStream) -> TokenStream {
    let ast: syn::DeriveInput = syn::parse(input).unwrap_or_else(|e| proc_macro_error::abort_call_site!("{}", e));
    let struct_ident = &ast.ident;
    let struct_name = struct_ident.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let fields = collect_field_info(&ast);
    let structs = find_struct_annotations(&ast.attrs);
    let table_name = structs.iter().find_map(|st| match st {
        FieldExtra::Table(name) => Some(name.clone()),
        _ => None,
    });
    let schema = structs.iter().find_map(|st| match st {
        FieldExtra::Schema(name) => Some(name.clone()),
        _ => None,
    });

    let table_expr = match table_name {
        Some(name) => quote!(sqlbean::core::TableName::from(#name)),
        None => quote!(sqlbean::core::TableName::from_struct_name(#struct_name)),
    };
    let schema_expr = match schema {
        Some(s) => quote!(table.schema = Some(#s.to_string());),
        None => quote!(),
    };

    let field_names: Vec<proc_macro2::TokenStream> = fields.iter().map(build_field_name).collect();
    let to_value = build_to_value(&fields);
    let from_value = build_from_value(&fields);

    quote!(
        impl #impl_generics sqlbean::core::GetTableName for #struct_ident #ty_generics #where_clause {
            fn table_name() -> sqlbean::core::TableName {
                #[allow(unused_mut)]
                let mut table = #table_expr;
                #schema_expr
                table
            }
        }

        impl #impl_generics sqlbean::core::GetFields for #struct_ident #ty_generics #where_clause {
            fn fields() -> Vec<sqlbean::core::FieldName> {
                vec![
                    #(#field_names)*
                ]
            }
        }

        impl #impl_generics sqlbean::core::IntoValue for #struct_ident #ty_generics #where_clause {
            fn into_value(&self) -> sqlbean::core::Value {
                let mut data = sqlbean::core::Value::new_object();
                #(#to_value)*
                data
            }
        }

        impl #impl_generics sqlbean::core::FromValue for #struct_ident #ty_generics #where_clause {
            fn from_value_opt(data: &sqlbean::core::Value) -> ::std::result::Result<Self, sqlbean::core::DataError> {
                if !data.is_object() {
                    return Err(sqlbean::core::DataError::type_mismatch_error("object", format!("{:?}", data)));
                }
                Ok(#struct_ident {
                    #(#from_value)*
                })
            }
        }
    )
    .into()
}

fn build_field_name(field: &FieldInformation) -> proc_macro2::TokenStream {
    let name = &field.name;
    let exist = field.exist();
    let alias = crate::util::field_name(&field.field);
    let field_type = if field.is_table_id() {
        quote!(sqlbean::core::FieldType::TableId)
    } else {
        quote!(sqlbean::core::FieldType::TableField)
    };
    quote!(
        sqlbean::core::FieldName {
            name: #name.to_string(),
            alias: Some(#alias.to_string()),
            exist: #exist,
            field_type: #field_type,
        },
    )
}

fn build_to_value(fields: &[FieldInformation]) -> Vec<proc_macro2::TokenStream> {
    fields
        .iter()
        .filter(|field| field.exist())
        .map(|field| {
            let ident = &field.field.ident;
            let name = &field.name;
            quote!(
                data.insert_obj(#name, &self.#ident);
            )
        })
        .collect()
}

fn build_from_value(fields: &[FieldInformation]) -> Vec<proc_macro2::TokenStream> {
    fields
        .iter()
        .map(|field| {
            let ident = &field.field.ident;
            let name = &field.name;
            if field.exist() {
                quote!(
                    #ident: match data.get_obj_value(#name) {
                        Some(v) if !v.is_null() => sqlbean::core::FromValue::from_value_opt(v)?,
                        _ => Default::default(),
                    },
                )
            } else {
                quote!(
                    #ident: Default::default(),
                )
            }
        })
        .collect()
}
