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

use crate::{ColumnIndex, DataError, FromValue, Value};

#[derive(Debug, PartialEq, Clone)]
pub struct Row {
    pub columns: Vec<String>,
    pub data: Vec<Value>,
}

impl Row {

    pub fn new(columns: Vec<String>, data: Vec<Value>) -> Self {
        Self { columns, data }
    }

    /// Returns length of a row.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn columns_ref(&self) -> &[String] {
        &self.columns
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.columns.iter().zip(self.data.iter())
    }

    /// Converts the value at `index` to `T`, `None` when the column is absent
    /// or the value does not convert.
    pub fn get<T, I>(&self, index: I) -> Option<T>
    where
        T: FromValue,
        I: ColumnIndex,
    {
        self.get_opt(index).and_then(|v| v.ok())
    }

    /// Like `Row::get`, but lets the caller handle conversion errors.
    pub fn get_opt<T, I>(&self, index: I) -> Option<Result<T, DataError>>
    where
        T: FromValue,
        I: ColumnIndex,
    {
        index
            .idx(&self.columns)
            .and_then(|idx| self.data.get(idx))
            .map(T::from_value_opt)
    }

    pub fn get_by_column<T>(&self, column: &str) -> Option<T>
    where
        T: FromValue,
    {
        self.get(column)
    }

    pub fn get_value(&self, index: usize) -> Option<&Value> {
        self.data.get(index)
    }

    pub fn get_value_by_column(&self, column: &str) -> Option<&Value> {
        column.idx(&self.columns).and_then(|idx| self.data.get(idx))
    }

    pub fn take<T, I>(&mut self, index: I) -> Option<T>
    where
        T: FromValue,
        I: ColumnIndex,
    {
        index.idx(&self.columns).and_then(|idx| {
            self.data
                .get_mut(idx)
                .map(|x| x.take())
                .and_then(|v| T::from_value_opt(&v).ok())
        })
    }

    pub fn as_object(&self) -> Value {
        let mut object = Value::new_object();
        for (column, value) in self.iter() {
            object.insert_obj_value(column, value);
        }
        object
    }

    pub fn into_object(self) -> Value {
        Value::Object(self.columns.into_iter().zip(self.data).collect())
    }

    pub fn unwrap(self) -> Vec<Value> {
        self.data
    }
}
