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

//! Column and table naming helpers.

use heck::{CamelCase, MixedCase, SnakeCase};

pub const TABLE_PREFIX: &str = "tbl";

/// Inserts `_` before every uppercase letter, then lowercases.
/// Input that already contains `_` is only lowercased.
///
/// `UserInfo` becomes `_user_info`.
pub fn hump_to_underline(para: &str) -> String {
    if para.contains('_') {
        return para.to_lowercase();
    }
    let mut out = String::with_capacity(para.len() + 4);
    for c in para.chars() {
        if c.is_uppercase() {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// `user_name` -> `userName`. Input without `_` is returned unchanged.
pub fn underline_to_hump(para: &str) -> String {
    if !para.contains('_') {
        return para.to_string();
    }
    let mut out = String::with_capacity(para.len());
    for part in para.split('_') {
        if out.is_empty() {
            out.push_str(&part.to_lowercase());
        } else {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
    }
    out
}

/// `user_name` -> `userName`
pub fn to_camel_case(s: &str) -> String {
    s.to_lowercase().to_mixed_case()
}

/// `HELLO_WORLD` -> `HelloWorld`; input without `_` only gets its first letter raised.
pub fn convert_to_camel_case(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    if !name.contains('_') {
        let mut chars = name.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    name.to_lowercase().to_camel_case()
}

/// `HTTPServer` -> `http_server`, `userName` -> `user_name`
pub fn to_underscore_case(s: &str) -> String {
    s.to_snake_case()
}

/// Default table for a struct name: the `tbl` prefix plus the hump conversion.
pub fn default_table_name(struct_name: &str) -> String {
    format!("{}{}", TABLE_PREFIX, hump_to_underline(struct_name))
}

pub fn is_blank_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}' || c == '\u{202a}'
}

pub fn is_blank(s: &str) -> bool {
    s.chars().all(is_blank_char)
}
