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

pub static ALLOW_TABLE_ID_TYPES: [&str; 20] = [
    "usize",
    "u8",
    "u16",
    "u32",
    "u64",
    "isize",
    "i8",
    "i16",
    "i32",
    "i64",
    "String",
    "Option<usize>",
    "Option<u32>",
    "Option<u64>",
    "Option<isize>",
    "Option<i32>",
    "Option<i64>",
    "Option<String>",
    "&str",
    "Option<&str>",
];

#[derive(Debug)]
pub struct FieldInformation {
    pub field: syn::Field,
    pub field_type: String,
    /// column name
    pub name: String,
    pub extra: Vec<FieldExtra>,
}

impl FieldInformation {
    pub fn new(field: syn::Field, field_type: String, name: String, extra: Vec<FieldExtra>) -> Self {
        FieldInformation { field, field_type, name, extra }
    }

    pub fn is_table_id(&self) -> bool {
        self.extra.iter().any(|ext| matches!(ext, FieldExtra::TableId))
    }

    pub fn exist(&self) -> bool {
        !self.extra.iter().any(|ext| matches!(ext, FieldExtra::Exist(false)))
    }
}

#[derive(Debug, Clone)]
pub enum FieldExtra {
    Field,
    TableId,
    Name(String),
    Exist(bool),
    Table(String),
    Schema(String),
}
