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

use crate::{DataError, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::any::type_name;
use std::collections::HashMap;
use uuid::Uuid;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y%m%d%H%M%S"];

pub trait FromValue: Sized {
    fn from_value_opt(value: &Value) -> Result<Self, DataError>;
    fn from_value(value: &Value) -> Self {
        match Self::from_value_opt(value) {
            Ok(x) => x,
            Err(_err) => panic!(
                "Couldn't from {:?} to type {}. (see FromValue documentation)",
                value,
                type_name::<Self>(),
            ),
        }
    }
}

impl FromValue for Value {
    fn from_value_opt(v: &Value) -> Result<Self, DataError> {
        Ok(v.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value_opt(other).map(Some),
        }
    }
}

macro_rules! impl_from_value_integer {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value_opt(v: &Value) -> Result<Self, DataError> {
                    let overflow = || DataError::numeric_overflow_error(stringify!($ty));
                    match *v {
                        Value::Bool(b) => Ok(b as $ty),
                        Value::Tinyint(n) => <$ty>::try_from(n).map_err(|_| overflow()),
                        Value::Smallint(n) => <$ty>::try_from(n).map_err(|_| overflow()),
                        Value::Int(n) => <$ty>::try_from(n).map_err(|_| overflow()),
                        Value::Bigint(n) => <$ty>::try_from(n).map_err(|_| overflow()),
                        Value::Float(n) => Ok(n as $ty),
                        Value::Double(n) => Ok(n as $ty),
                        Value::Text(ref s) => s.trim().parse::<$ty>().map_err(|e| DataError::parse_error(format!("'{}' as {}: {}", s, stringify!($ty), e))),
                        Value::Json(ref j) => j.as_i64()
                            .ok_or_else(|| DataError::type_mismatch_error(stringify!($ty), format!("{:?}", v)))
                            .and_then(|n| <$ty>::try_from(n).map_err(|_| overflow())),
                        Value::Null => Err(DataError::null_value_error(stringify!($ty))),
                        _ => Err(DataError::type_mismatch_error(stringify!($ty), format!("{:?}", v))),
                    }
                }
            }
        )*
    };
}

impl_from_value_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_from_value_float {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value_opt(v: &Value) -> Result<Self, DataError> {
                    match *v {
                        Value::Tinyint(n) => Ok(n as $ty),
                        Value::Smallint(n) => Ok(n as $ty),
                        Value::Int(n) => Ok(n as $ty),
                        Value::Bigint(n) => Ok(n as $ty),
                        Value::Float(n) => Ok(n as $ty),
                        Value::Double(n) => Ok(n as $ty),
                        Value::Text(ref s) => s.trim().parse::<$ty>().map_err(|e| DataError::parse_error(format!("'{}' as {}: {}", s, stringify!($ty), e))),
                        Value::Json(ref j) => j.as_f64()
                            .map(|n| n as $ty)
                            .ok_or_else(|| DataError::type_mismatch_error(stringify!($ty), format!("{:?}", v))),
                        Value::Null => Err(DataError::null_value_error(stringify!($ty))),
                        _ => Err(DataError::type_mismatch_error(stringify!($ty), format!("{:?}", v))),
                    }
                }
            }
        )*
    };
}

impl_from_value_float!(f32, f64);

impl FromValue for bool {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Tinyint(v) => Ok(*v != 0),
            Value::Smallint(v) => Ok(*v != 0),
            Value::Int(v) => Ok(*v != 0),
            Value::Bigint(v) => Ok(*v != 0),
            Value::Char(c) => Ok(matches!(c, 'Y' | 'y' | '1')),
            Value::Text(ref s) => match s.to_lowercase().as_str() {
                "true" | "1" | "yes" | "y" | "on" => Ok(true),
                "false" | "0" | "no" | "n" | "off" => Ok(false),
                _ => Err(DataError::parse_error(format!("Failed to parse '{}' as bool", s))),
            },
            Value::Json(JsonValue::Bool(b)) => Ok(*b),
            Value::Null => Err(DataError::null_value_error("bool")),
            _ => Err(DataError::type_mismatch_error("bool", format!("{:?}", value))),
        }
    }
}

impl FromValue for String {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Text(s) => Ok(s.to_string()),
            Value::Char(c) => Ok(c.to_string()),
            Value::Tinyint(v) => Ok(v.to_string()),
            Value::Smallint(v) => Ok(v.to_string()),
            Value::Int(v) => Ok(v.to_string()),
            Value::Bigint(v) => Ok(v.to_string()),
            Value::Float(v) => Ok(v.to_string()),
            Value::Double(v) => Ok(v.to_string()),
            Value::Bool(v) => Ok(v.to_string()),
            Value::Uuid(v) => Ok(v.to_string()),
            Value::Date(v) => Ok(v.format("%Y-%m-%d").to_string()),
            Value::Time(v) => Ok(v.format("%H:%M:%S").to_string()),
            Value::DateTime(v) => Ok(v.format("%Y-%m-%d %H:%M:%S").to_string()),
            Value::Timestamp(v) => Ok(v.to_rfc3339()),
            Value::Json(JsonValue::String(s)) => Ok(s.clone()),
            Value::Json(v) => Ok(v.to_string()),
            Value::Blob(v) => String::from_utf8(v.clone()).map_err(|e| DataError::parse_error(e.to_string())),
            Value::Object(_) | Value::List(_) => Ok(value.to_json().to_string()),
            Value::Null => Err(DataError::null_value_error("String")),
        }
    }
}

impl FromValue for char {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Char(c) => Ok(*c),
            Value::Text(s) if s.chars().count() == 1 => s.chars().next().ok_or_else(|| DataError::parse_error("empty text")),
            _ => Err(DataError::type_mismatch_error("char", format!("{:?}", value))),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Blob(v) => Ok(v.clone()),
            Value::Text(s) => Ok(s.as_bytes().to_vec()),
            _ => Err(DataError::type_mismatch_error("Vec<u8>", format!("{:?}", value))),
        }
    }
}

impl FromValue for Vec<String> {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::List(v) => v.iter().map(String::from_value_opt).collect(),
            Value::Json(JsonValue::Array(v)) => v
                .iter()
                .map(|j| String::from_value_opt(&Value::from_json(j.clone())))
                .collect(),
            Value::Text(s) => {
                let json: JsonValue = serde_json::from_str(s)?;
                Vec::<String>::from_value_opt(&Value::from_json(json))
            }
            _ => Err(DataError::type_mismatch_error("Vec<String>", format!("{:?}", value))),
        }
    }
}

impl FromValue for Uuid {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Uuid(v) => Ok(*v),
            Value::Text(s) => Uuid::parse_str(s).map_err(|e| DataError::parse_error(e.to_string())),
            Value::Blob(v) => Uuid::from_slice(v).map_err(|e| DataError::parse_error(e.to_string())),
            _ => Err(DataError::type_mismatch_error("Uuid", format!("{:?}", value))),
        }
    }
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, DataError> {
    for fmt in DATETIME_FORMATS {
        if let Ok(v) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(v);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|e| DataError::parse_error(format!("'{}' as datetime: {}", s, e)))
}

impl FromValue for NaiveDateTime {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::DateTime(v) => Ok(*v),
            Value::Timestamp(v) => Ok(v.naive_utc()),
            Value::Date(v) => Ok(v.and_time(NaiveTime::MIN)),
            Value::Text(s) => parse_datetime(s.trim()),
            Value::Bigint(millis) => DateTime::from_timestamp_millis(*millis)
                .map(|v| v.naive_utc())
                .ok_or_else(|| DataError::numeric_overflow_error("NaiveDateTime")),
            Value::Null => Err(DataError::null_value_error("NaiveDateTime")),
            _ => Err(DataError::type_mismatch_error("NaiveDateTime", format!("{:?}", value))),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Date(v) => Ok(*v),
            Value::DateTime(v) => Ok(v.date()),
            Value::Timestamp(v) => Ok(v.date_naive()),
            Value::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .or_else(|_| parse_datetime(s.trim()).map(|v| v.date()))
                .map_err(|e| DataError::parse_error(e.to_string())),
            Value::Null => Err(DataError::null_value_error("NaiveDate")),
            _ => Err(DataError::type_mismatch_error("NaiveDate", format!("{:?}", value))),
        }
    }
}

impl FromValue for NaiveTime {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Time(v) => Ok(*v),
            Value::DateTime(v) => Ok(v.time()),
            Value::Text(s) => NaiveTime::parse_from_str(s.trim(), "%H:%M:%S%.f")
                .map_err(|e| DataError::parse_error(e.to_string())),
            Value::Null => Err(DataError::null_value_error("NaiveTime")),
            _ => Err(DataError::type_mismatch_error("NaiveTime", format!("{:?}", value))),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Timestamp(v) => Ok(*v),
            Value::DateTime(v) => Ok(Utc.from_utc_datetime(v)),
            Value::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|v| v.with_timezone(&Utc))
                .or_else(|_| parse_datetime(s.trim()).map(|v| Utc.from_utc_datetime(&v))),
            Value::Bigint(millis) => DateTime::from_timestamp_millis(*millis)
                .ok_or_else(|| DataError::numeric_overflow_error("DateTime<Utc>")),
            Value::Null => Err(DataError::null_value_error("DateTime<Utc>")),
            _ => Err(DataError::type_mismatch_error("DateTime<Utc>", format!("{:?}", value))),
        }
    }
}

impl FromValue for JsonValue {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Json(v) => Ok(v.clone()),
            Value::Text(s) => Ok(serde_json::from_str(s).unwrap_or_else(|_| JsonValue::String(s.clone()))),
            other => Ok(other.to_json()),
        }
    }
}

impl FromValue for IndexMap<String, Value> {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        match value {
            Value::Object(v) => Ok(v.clone()),
            Value::Json(JsonValue::Object(_)) => FromValue::from_value_opt(&Value::from_json(value.to_json())),
            _ => Err(DataError::type_mismatch_error("object", format!("{:?}", value))),
        }
    }
}

impl FromValue for HashMap<String, Value> {
    fn from_value_opt(value: &Value) -> Result<Self, DataError> {
        let map = IndexMap::<String, Value>::from_value_opt(value)?;
        Ok(map.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widening_and_overflow() {
        assert_eq!(i64::from_value(&Value::Int(5)), 5);
        assert_eq!(i32::from_value(&Value::Text("42".to_string())), 42);
        assert!(i8::from_value_opt(&Value::Bigint(1000)).is_err());
        assert!(u32::from_value_opt(&Value::Int(-1)).is_err());
    }

    #[test]
    fn test_option_maps_null() {
        assert_eq!(Option::<String>::from_value(&Value::Null), None);
        assert_eq!(Option::<i32>::from_value(&Value::Int(1)), Some(1));
    }

    #[test]
    fn test_datetime_from_text() {
        let v = NaiveDateTime::from_value(&Value::Text("2024-05-01 10:20:30".to_string()));
        assert_eq!(v.format("%Y%m%d%H%M%S").to_string(), "20240501102030");
        let d = NaiveDate::from_value(&Value::Text("2024-05-01".to_string()));
        assert_eq!(d.format("%Y%m%d").to_string(), "20240501");
    }

    #[test]
    fn test_bool_from_flag() {
        assert!(bool::from_value(&Value::Text("Y".to_string())));
        assert!(!bool::from_value(&Value::Int(0)));
    }
}
