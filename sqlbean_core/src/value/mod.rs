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

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::{fmt, mem};
use uuid::Uuid;

mod to_value;
mod from_value;

use crate::DataError;
pub use from_value::*;
pub use to_value::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Tinyint(i8),
    Smallint(i16),
    Int(i32),
    Bigint(i64),
    Float(f32),
    Double(f64),
    Blob(Vec<u8>),
    Char(char),
    Text(String),
    Json(JsonValue),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    Object(IndexMap<String, Value>),
    List(Vec<Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl<'a> From<&'a Value> for Value {
    fn from(v: &'a Value) -> Self {
        v.clone()
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = JsonValue::deserialize(deserializer)?;
        Ok(Value::from_json(json))
    }
}

impl Value {

    pub fn is_string(&self) -> bool {
        matches!(self, Value::Text(_) | Value::Char(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Value::Tinyint(_)
                | Value::Smallint(_)
                | Value::Int(_)
                | Value::Bigint(_)
                | Value::Float(_)
                | Value::Double(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `Null`, or a text value with no characters.
    pub fn is_empty_value(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<IndexMap<String, Value>> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Tinyint(v) => Some(v as i64),
            Value::Smallint(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Bigint(v) => Some(v),
            _ => None,
        }
    }

    pub fn take(&mut self) -> Value {
        mem::replace(self, Value::Null)
    }

    pub fn new_object() -> Self {
        Value::Object(IndexMap::new())
    }

    pub fn insert_obj<K, V>(&mut self, k: K, v: V)
    where
        K: ToString,
        V: IntoValue,
    {
        if let Value::Object(data) = self {
            data.insert(k.to_string().replace("r#", ""), v.into_value());
        }
    }

    pub fn insert_obj_value<K>(&mut self, k: K, value: &Value)
    where
        K: ToString,
    {
        if let Value::Object(v) = self {
            v.insert(k.to_string(), value.clone());
        }
    }

    pub fn get_obj<T>(&self, s: &str) -> Result<T, DataError>
    where
        T: FromValue,
    {
        match self {
            Value::Object(_) => match self.get_obj_value(s) {
                Some(v) => T::from_value_opt(v),
                None => Err(DataError::NoSuchFieldError(s.to_string())),
            },
            _ => Err(DataError::type_mismatch_error("object", format!("{:?}", self))),
        }
    }

    pub fn get_obj_opt<T>(&self, s: &str) -> Result<Option<T>, DataError>
    where
        T: FromValue,
    {
        match self.get_obj_value(s) {
            Some(Value::Null) | None => Ok(None),
            Some(v) => Ok(Some(T::from_value_opt(v)?)),
        }
    }

    /// Looks a key up exactly first, then ignoring ASCII case.
    pub fn get_obj_value(&self, s: &str) -> Option<&Value> {
        match self {
            Value::Object(data) => {
                let key = s.replace("r#", "");
                data.get(&key).or_else(|| {
                    data.iter()
                        .find(|(k, _)| k.eq_ignore_ascii_case(&key))
                        .map(|(_, v)| v)
                })
            }
            _ => None,
        }
    }

    pub fn get_obj_len(&self) -> usize {
        match self {
            Value::Object(data) => data.len(),
            _ => 0,
        }
    }

    pub fn remove_obj(&mut self, s: &str) -> Option<Value> {
        match self {
            Value::Object(v) => v.shift_remove(s),
            _ => None,
        }
    }

    pub fn new_list() -> Self {
        Value::List(Vec::new())
    }

    pub fn push_list<V: IntoValue>(&mut self, value: V) {
        if let Value::List(vec) = self {
            vec.push(value.into_value());
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(v) => JsonValue::Bool(*v),
            Value::Tinyint(v) => JsonValue::from(*v),
            Value::Smallint(v) => JsonValue::from(*v),
            Value::Int(v) => JsonValue::from(*v),
            Value::Bigint(v) => JsonValue::from(*v),
            Value::Float(v) => JsonValue::from(*v),
            Value::Double(v) => JsonValue::from(*v),
            Value::Blob(v) => JsonValue::Array(v.iter().map(|b| JsonValue::from(*b)).collect()),
            Value::Char(v) => JsonValue::String(v.to_string()),
            Value::Text(v) => JsonValue::String(v.clone()),
            Value::Json(v) => v.clone(),
            Value::Uuid(v) => JsonValue::String(v.to_string()),
            Value::Date(v) => JsonValue::String(v.format("%Y-%m-%d").to_string()),
            Value::Time(v) => JsonValue::String(v.format("%H:%M:%S").to_string()),
            Value::DateTime(v) => JsonValue::String(v.format("%Y-%m-%d %H:%M:%S").to_string()),
            Value::Timestamp(v) => JsonValue::String(v.to_rfc3339()),
            Value::Object(v) => JsonValue::Object(
                v.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::List(v) => JsonValue::Array(v.iter().map(|v| v.to_json()).collect()),
        }
    }

    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(v) => Value::Bool(v),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Bigint(i)
                } else {
                    Value::Double(n.as_f64().unwrap_or_default())
                }
            }
            JsonValue::String(s) => Value::Text(s),
            JsonValue::Array(v) => Value::List(v.into_iter().map(Value::from_json).collect()),
            JsonValue::Object(v) => {
                Value::Object(v.into_iter().map(|(k, v)| (k, Value::from_json(v))).collect())
            }
        }
    }

    /// Renders the value as an inline SQL literal. NaN and infinities render `NULL`.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(v) => if *v { "1".to_string() } else { "0".to_string() },
            Value::Tinyint(v) => v.to_string(),
            Value::Smallint(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Bigint(v) => v.to_string(),
            Value::Float(v) if !v.is_finite() => "NULL".to_string(),
            Value::Double(v) if !v.is_finite() => "NULL".to_string(),
            Value::Float(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::Blob(v) => {
                let hex: String = v.iter().map(|b| format!("{:02X}", b)).collect();
                format!("X'{}'", hex)
            }
            Value::Char(v) => quote_literal(&v.to_string()),
            Value::Text(v) => quote_literal(v),
            Value::Json(v) => quote_literal(&v.to_string()),
            Value::Uuid(v) => quote_literal(&v.to_string()),
            Value::Date(v) => quote_literal(&v.format("%Y-%m-%d").to_string()),
            Value::Time(v) => quote_literal(&v.format("%H:%M:%S").to_string()),
            Value::DateTime(v) => quote_literal(&v.format("%Y-%m-%d %H:%M:%S").to_string()),
            Value::Timestamp(v) => quote_literal(&v.format("%Y-%m-%d %H:%M:%S").to_string()),
            Value::Object(_) | Value::List(_) => quote_literal(&self.to_json().to_string()),
        }
    }

    pub fn coerce_to_string(&self) -> String {
        match self {
            Value::Null => "".to_string(),
            Value::Text(s) => s.clone(),
            Value::Char(c) => c.to_string(),
            Value::Json(v) => v.to_string(),
            Value::Timestamp(ts) => ts.to_rfc3339(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Blob(_) => "[BLOB]".to_string(),
            Value::Object(_) | Value::List(_) => self.to_json().to_string(),
            other => other.to_sql_literal(),
        }
    }
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Tinyint(v) => write!(f, "{}", v),
            Value::Smallint(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Bigint(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "'{}'", v),
            Value::Text(v) => write!(f, "'{}'", v),
            Value::Json(v) => {
                let json_str = v.to_string();
                if json_str.len() > 100 {
                    write!(f, "JSON(truncated)")
                } else {
                    write!(f, "{}", json_str)
                }
            }
            Value::Uuid(v) => write!(f, "'{}'", v),
            Value::Date(v) => write!(f, "'{}'", v),
            Value::Time(v) => write!(f, "'{}'", v.format("%H:%M:%S")),
            Value::DateTime(v) => write!(f, "'{}'", v.format("%Y-%m-%d %H:%M:%S")),
            Value::Timestamp(v) => write!(f, "'{}'", v.to_rfc3339()),
            Value::Blob(v) => write!(f, "BLOB({} bytes)", v.len()),
            Value::Object(v) => write!(f, "OBJECT({} fields)", v.len()),
            Value::List(v) => {
                if v.len() <= 5 {
                    let items: Vec<String> = v.iter().map(|item| item.to_string()).collect();
                    write!(f, "[{}]", items.join(", "))
                } else {
                    write!(f, "[{} items]", v.len())
                }
            }
        }
    }
}
