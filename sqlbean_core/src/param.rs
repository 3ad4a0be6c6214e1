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

use indexmap::IndexMap;
use crate::{IntoValue, Value};

/// Bind parameters for a single statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    #[default]
    None,
    Positional(Vec<Value>),
    Named(IndexMap<String, Value>),
}

fn display_param(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Null => "null".to_string(),
        Value::Json(json) => {
            let json_str = json.to_string();
            if json_str.len() > 50 {
                format!("JSON '{}...'", json_str.chars().take(47).collect::<String>())
            } else {
                format!("JSON '{}'", json_str)
            }
        }
        Value::Blob(blob) => format!("BLOB({} bytes)", blob.len()),
        other => other.to_string(),
    }
}

impl std::fmt::Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Params::None => write!(f, "==>  Parameters: "),
            Params::Positional(v) => {
                let params_str = v.iter()
                    .enumerate()
                    .map(|(i, value)| format!("{}: {}", i + 1, display_param(value)))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "==>  Parameters: {}", params_str)
            }
            Params::Named(v) => {
                let params_str = v.iter()
                    .map(|(key, value)| format!("{}: {}", key, display_param(value)))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "==>  Parameters: {}", params_str)
            }
        }
    }
}

impl Params {
    pub fn len(&self) -> usize {
        match self {
            Params::None => 0,
            Params::Positional(v) => v.len(),
            Params::Named(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keeps the first `len` parameters.
    pub fn truncate(&mut self, len: usize) {
        match self {
            Params::None => {}
            Params::Positional(v) => v.truncate(len),
            Params::Named(v) => v.truncate(len),
        }
    }

    pub fn push<V: IntoValue>(&mut self, value: V) {
        match self {
            Params::None => *self = Params::Positional(vec![value.into_value()]),
            Params::Positional(v) => v.push(value.into_value()),
            Params::Named(v) => {
                let key = (v.len() + 1).to_string();
                v.insert(key, value.into_value());
            }
        }
    }

    pub fn extend(&mut self, values: Vec<Value>) {
        for value in values {
            self.push(value);
        }
    }

    /// Positional view of the parameters, named ones in insertion order.
    pub fn values(&self) -> Vec<Value> {
        match self {
            Params::None => vec![],
            Params::Positional(v) => v.clone(),
            Params::Named(v) => v.values().cloned().collect(),
        }
    }
}

impl From<Vec<Value>> for Params {
    fn from(x: Vec<Value>) -> Params {
        if x.is_empty() {
            Params::None
        } else {
            Params::Positional(x)
        }
    }
}

impl From<IndexMap<String, Value>> for Params {
    fn from(x: IndexMap<String, Value>) -> Params {
        Params::Named(x)
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Params {
        Params::None
    }
}

macro_rules! into_params_impl {
    ($([$A:ident,$a:ident]),*) => (
        impl<$($A: IntoValue,)*> From<($($A,)*)> for Params {
            fn from(x: ($($A,)*)) -> Params {
                let ($($a,)*) = x;
                Params::Positional(vec![$($a.into_value(),)*])
            }
        }
    );
}

into_params_impl!([A, a]);
into_params_impl!([A, a], [B, b]);
into_params_impl!([A, a], [B, b], [C, c]);
into_params_impl!([A, a], [B, b], [C, c], [D, d]);
into_params_impl!([A, a], [B, b], [C, c], [D, d], [E, e]);
into_params_impl!([A, a], [B, b], [C, c], [D, d], [E, e], [F, f]);
into_params_impl!([A, a], [B, b], [C, c], [D, d], [E, e], [F, f], [G, g]);
into_params_impl!([A, a], [B, b], [C, c], [D, d], [E, e], [F, f], [G, g], [H, h]);

/// Builds `Params` from values or `name => value` pairs.
///
/// ```ignore
/// let p = params!["jack", 18];
/// let n = params!{"name" => "jack", "age" => 18};
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::None
    };
    ($($name:literal => $value:expr),+ $(,)?) => {{
        let mut map = $crate::indexmap::IndexMap::<String, $crate::Value>::new();
        $(map.insert(std::string::String::from($name), $crate::IntoValue::into_value(&$value));)+
        $crate::Params::Named(map)
    }};
    ($($value:expr),+ $(,)?) => {
        $crate::Params::Positional(vec![$($crate::IntoValue::into_value(&$value)),+])
    };
}
