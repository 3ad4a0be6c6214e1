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
//! Identifier helpers: dashless uuids and `prefix_kind_uuid` style ids.
//!
use rand::Rng;
use uuid::Uuid;

/// 32 lowercase hex chars, no dashes.
pub fn generate_uuid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// `nation_city_kind_uuid`
pub fn generate_id(nation: &str, city: &str, kind: &str) -> String {
    format!("{}_{}_{}_{}", nation, city, kind, generate_uuid())
}

/// Third part of a four part id.
pub fn type_from_id(id: &str) -> Option<&str> {
    let parts: Vec<&str> = id.split('_').collect();
    if parts.len() != 4 {
        return None;
    }
    Some(parts[2])
}

/// `CN_` plus six random digits.
pub fn generate_server_id() -> String {
    let n: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    format!("CN_{}", n)
}

/// `server_kind_uuid`
pub fn generate_user_id(server_id: &str, kind: &str) -> String {
    format!("{}_{}_{}", server_id, kind, generate_uuid())
}

/// First two parts of a four part user id.
pub fn server_id_from_user_id(user_id: &str) -> Option<String> {
    let parts: Vec<&str> = user_id.split('_').collect();
    if parts.len() != 4 {
        return None;
    }
    Some(format!("{}_{}", parts[0], parts[1]))
}

/// Text after the last `_`, or the whole id.
pub fn user_id_postfix(user_id: &str) -> &str {
    match user_id.rfind('_') {
        Some(idx) => &user_id[idx + 1..],
        None => user_id,
    }
}

pub fn is_user_id_right(user_id: &str, server_id: &str) -> bool {
    user_id.len() == 47 && user_id.contains(&format!("{}_USER", server_id))
}
