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

use std::fmt::Formatter;
use std::slice;
use crate::{DataError, FromValue, Row, Value};

/// use this to store data retrieved from the database
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Rows {
    pub data: Vec<Row>,
    /// can be optionally set, indicates how many total rows are there in the table
    pub count: Option<usize>,
}

impl std::fmt::Display for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "<==    Columns: {}", self.data.first().map(|v| v.columns.join(", ")).unwrap_or_else(|| "[]".to_string()))?;
        for data in self.data.iter() {
            writeln!(f, "<==        Row: {}", data.data.iter().map(|v| v.to_string()).collect::<Vec<String>>().join(", "))?;
        }
        write!(f, "<==      Total: {}", self.count.unwrap_or(self.data.len()))
    }
}

impl Rows {
    pub fn new() -> Self {
        Rows {
            data: vec![],
            count: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn push(&mut self, row: Row) {
        self.data.push(row)
    }

    pub fn iter(&self) -> RowsIter<'_> {
        RowsIter {
            inner: self.data.iter(),
        }
    }

    pub fn first(&self) -> Option<&Row> {
        self.data.first()
    }

    pub fn first_as_object(&self) -> Option<Value> {
        self.first().map(|row| row.as_object())
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.data.get(index)
    }

    pub fn set_count(&mut self, count: usize) -> &mut Self {
        self.count = Some(count);
        self
    }

    pub fn to_objects(&self) -> Vec<Value> {
        self.iter().map(|row| row.as_object()).collect()
    }

    pub fn into_objects(self) -> Vec<Value> {
        self.data.into_iter().map(|row| row.into_object()).collect()
    }

    /// Converts every row into `T` through its object form.
    pub fn to_list<T: FromValue>(&self) -> Result<Vec<T>, DataError> {
        self.iter().map(|row| T::from_value_opt(&row.as_object())).collect()
    }

    pub fn into_inner(self) -> Vec<Row> {
        self.data
    }
}

/// An iterator over `Row`s.
pub struct RowsIter<'a> {
    inner: slice::Iter<'a, Row>,
}

impl<'a> Iterator for RowsIter<'a> {
    type Item = &'a Row;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> ExactSizeIterator for RowsIter<'a> {}

impl<'a> IntoIterator for &'a Rows {
    type Item = &'a Row;
    type IntoIter = RowsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Rows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
