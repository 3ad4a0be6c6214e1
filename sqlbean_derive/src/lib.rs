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

//!
//! Derive table metadata and value conversions for entity structs.
//!
use proc_macro::TokenStream;
use proc_macro_error::proc_macro_error;

mod comm;
mod entity_derive;
mod util;

/// Generate table info, `IntoValue` and `FromValue`.
/// ```rust,ignore
/// /// Annotation Support: table, id, field (name, exist)
/// #[derive(Debug, Entity, Clone, Default)]
/// #[table(name = "t_system_user")]
/// struct SystemUser {
///     #[id]
///     id: Option<String>,
///     #[field(name = "user_name")]
///     username: String,
///     #[field(exist = false)]
///     age: i32,
/// }
/// ```
/// Every field type must implement `Default`; absent or null columns fall back to it.
#[proc_macro_derive(Entity, attributes(table, id, field))]
#[proc_macro_error]
pub fn entity(input: TokenStream) -> TokenStream {
    entity_derive::impl_entity(input)
}
