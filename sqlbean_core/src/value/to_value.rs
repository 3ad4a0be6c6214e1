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

use crate::{Params, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

pub trait IntoValue {
    fn into_value(&self) -> Value;
}

macro_rules! impl_into_value {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(&self) -> Value {
                    Value::$variant(self.to_owned())
                }
            }
        )*
    };
}

macro_rules! impl_unsigned_to_value {
    ($ty:ty, $variant:ident, $target:ident) => {
        impl IntoValue for $ty {
            fn into_value(&self) -> Value {
                Value::$variant(*self as $target)
            }
        }
    };
}

impl_unsigned_to_value!(u8, Smallint, i16);
impl_unsigned_to_value!(u16, Int, i32);
impl_unsigned_to_value!(u32, Bigint, i64);
impl_unsigned_to_value!(u64, Bigint, i64);
impl_unsigned_to_value!(usize, Bigint, i64);
impl_unsigned_to_value!(isize, Bigint, i64);

impl_into_value! {
    i8 => Tinyint,
    bool => Bool,
    Vec<u8> => Blob,
    i16 => Smallint,
    i32 => Int,
    i64 => Bigint,
    String => Text,
    f32 => Float,
    f64 => Double,
    char => Char,
    JsonValue => Json,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<Utc> => Timestamp
}

impl IntoValue for str {
    fn into_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for Value {
    fn into_value(&self) -> Value {
        self.clone()
    }
}

impl IntoValue for () {
    fn into_value(&self) -> Value {
        Value::Null
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(&self) -> Value {
        match self {
            Some(val) => val.into_value(),
            None => Value::Null,
        }
    }
}

impl<T: IntoValue + ?Sized> IntoValue for &T {
    fn into_value(&self) -> Value {
        T::into_value(*self)
    }
}

impl IntoValue for Vec<String> {
    fn into_value(&self) -> Value {
        Value::List(self.iter().map(|v| v.into_value()).collect())
    }
}

impl IntoValue for Vec<Value> {
    fn into_value(&self) -> Value {
        Value::List(self.clone())
    }
}

impl IntoValue for Vec<i64> {
    fn into_value(&self) -> Value {
        Value::List(self.iter().map(|v| v.into_value()).collect())
    }
}

impl IntoValue for Vec<i32> {
    fn into_value(&self) -> Value {
        Value::List(self.iter().map(|v| v.into_value()).collect())
    }
}

impl<K, V> IntoValue for IndexMap<K, V>
where
    K: ToString,
    V: IntoValue,
{
    fn into_value(&self) -> Value {
        Value::Object(self.iter().map(|(k, v)| (k.to_string(), v.into_value())).collect())
    }
}

impl<K, V> IntoValue for HashMap<K, V>
where
    K: ToString,
    V: IntoValue,
{
    fn into_value(&self) -> Value {
        Value::Object(self.iter().map(|(k, v)| (k.to_string(), v.into_value())).collect())
    }
}

impl<K, V> IntoValue for BTreeMap<K, V>
where
    K: ToString,
    V: IntoValue,
{
    fn into_value(&self) -> Value {
        Value::Object(self.iter().map(|(k, v)| (k.to_string(), v.into_value())).collect())
    }
}

impl IntoValue for Params {
    fn into_value(&self) -> Value {
        match self {
            Params::None => Value::Null,
            Params::Positional(v) => Value::List(v.clone()),
            Params::Named(v) => Value::Object(v.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_into_value() {
        assert_eq!(5i32.into_value(), Value::Int(5));
        assert_eq!("a".into_value(), Value::Text("a".to_string()));
        assert_eq!(Option::<i64>::None.into_value(), Value::Null);
        assert_eq!(Some(7u8).into_value(), Value::Smallint(7));
        assert_eq!(vec![1u8, 2].into_value(), Value::Blob(vec![1, 2]));
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let mut map = IndexMap::new();
        map.insert("b", 1);
        map.insert("a", 2);
        let value = map.into_value();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
