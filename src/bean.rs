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
//! Conversions between entities, column maps, rows and JSON text.
//!
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlbean_core::{FromValue, IntoValue, Rows, Value};
use crate::errors::{Result, SqlbeanError};
use crate::sql::ColumnMap;

/// Column name to value, in field order.
pub fn object_to_map<T: IntoValue>(entity: &T) -> Result<ColumnMap> {
    entity
        .into_value()
        .into_object()
        .ok_or_else(|| SqlbeanError::InvalidField("value is not an object".to_string()))
}

/// Builds `T` from a column map. Keys match case-insensitively.
pub fn map_to_object<T: FromValue>(map: &ColumnMap) -> Result<T> {
    Ok(T::from_value_opt(&Value::Object(map.clone()))?)
}

pub fn rows_to_list<T: FromValue>(rows: &Rows) -> Result<Vec<T>> {
    Ok(rows.to_list::<T>()?)
}

/// Serializes with `None` fields kept as `null`.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn json_to_object<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

pub fn json_to_list<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    Ok(serde_json::from_str(json)?)
}

/// Serde adapter storing `bool` as `"Y"` / `"N"`.
///
/// ```ignore
/// #[serde(with = "sqlbean::bean::yes_no")]
/// enabled: bool,
/// ```
pub mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn to_flag(value: bool) -> &'static str {
        if value {
            "Y"
        } else {
            "N"
        }
    }

    pub fn from_flag(flag: &str) -> bool {
        flag.trim().eq_ignore_ascii_case("Y")
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(to_flag(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let flag = String::deserialize(deserializer)?;
        Ok(from_flag(&flag))
    }
}
