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
//! Typed query model: conditions, ordering and paging.
//!
use std::fmt;
use serde::{Deserialize, Serialize};
use sqlbean_core::{IntoValue, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LikeType {
    /// `value%`
    StartWith,
    /// `%value`
    EndWith,
    /// `%value%`
    Contains,
}

/// Builds the bound value of a `LIKE` condition, optionally prefixed with `LIKE `.
pub fn build_like_value(value: &str, like_type: LikeType, with_keyword: bool) -> String {
    let mut like_value = String::with_capacity(value.len() + 7);
    if with_keyword {
        like_value.push_str("LIKE ");
    }
    match like_type {
        LikeType::StartWith => {
            like_value.push_str(value);
            like_value.push('%');
        }
        LikeType::EndWith => {
            like_value.push('%');
            like_value.push_str(value);
        }
        LikeType::Contains => {
            like_value.push('%');
            like_value.push_str(value);
            like_value.push('%');
        }
    }
    like_value
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare(String, Operator, Value),
    Like(String, String, LikeType),
    In(String, Vec<Value>),
    Between(String, Value, Value),
    IsNull(String),
    IsNotNull(String),
}

impl Condition {
    pub fn eq<F: Into<String>, V: IntoValue>(field: F, value: V) -> Self {
        Condition::Compare(field.into(), Operator::Eq, value.into_value())
    }

    pub fn ne<F: Into<String>, V: IntoValue>(field: F, value: V) -> Self {
        Condition::Compare(field.into(), Operator::Ne, value.into_value())
    }

    pub fn gt<F: Into<String>, V: IntoValue>(field: F, value: V) -> Self {
        Condition::Compare(field.into(), Operator::Gt, value.into_value())
    }

    pub fn ge<F: Into<String>, V: IntoValue>(field: F, value: V) -> Self {
        Condition::Compare(field.into(), Operator::Ge, value.into_value())
    }

    pub fn lt<F: Into<String>, V: IntoValue>(field: F, value: V) -> Self {
        Condition::Compare(field.into(), Operator::Lt, value.into_value())
    }

    pub fn le<F: Into<String>, V: IntoValue>(field: F, value: V) -> Self {
        Condition::Compare(field.into(), Operator::Le, value.into_value())
    }

    pub fn like<F: Into<String>, V: Into<String>>(field: F, value: V, like_type: LikeType) -> Self {
        Condition::Like(field.into(), value.into(), like_type)
    }

    pub fn in_list<F: Into<String>, V: IntoValue>(field: F, values: &[V]) -> Self {
        Condition::In(field.into(), values.iter().map(IntoValue::into_value).collect())
    }

    pub fn between<F: Into<String>, V: IntoValue>(field: F, low: V, high: V) -> Self {
        Condition::Between(field.into(), low.into_value(), high.into_value())
    }

    pub fn is_null<F: Into<String>>(field: F) -> Self {
        Condition::IsNull(field.into())
    }

    pub fn is_not_null<F: Into<String>>(field: F) -> Self {
        Condition::IsNotNull(field.into())
    }

    pub fn field(&self) -> &str {
        match self {
            Condition::Compare(field, _, _)
            | Condition::Like(field, _, _)
            | Condition::In(field, _)
            | Condition::Between(field, _, _)
            | Condition::IsNull(field)
            | Condition::IsNotNull(field) => field,
        }
    }

    /// SQL fragment with `?` placeholders.
    ///
    /// An empty `In` list renders `1 = 0` so it never matches.
    pub fn to_sql(&self) -> String {
        match self {
            Condition::Compare(field, _, Value::Null) => format!("{} is null", field),
            Condition::Compare(field, op, _) => format!("{} {} ?", field, op.as_sql()),
            Condition::Like(field, _, _) => format!("{} like ?", field),
            Condition::In(_, values) if values.is_empty() => "1 = 0".to_string(),
            Condition::In(field, values) => {
                format!("{} in ({})", field, vec!["?"; values.len()].join(","))
            }
            Condition::Between(field, _, _) => format!("{} between ? and ?", field),
            Condition::IsNull(field) => format!("{} is null", field),
            Condition::IsNotNull(field) => format!("{} is not null", field),
        }
    }

    /// Values bound by `to_sql`'s placeholders, in order.
    pub fn params(&self) -> Vec<Value> {
        match self {
            Condition::Compare(_, _, Value::Null) => vec![],
            Condition::Compare(_, _, value) => vec![value.clone()],
            Condition::Like(_, value, like_type) => {
                vec![Value::Text(build_like_value(value, *like_type, false))]
            }
            Condition::In(_, values) => values.clone(),
            Condition::Between(_, low, high) => vec![low.clone(), high.clone()],
            Condition::IsNull(_) | Condition::IsNotNull(_) => vec![],
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => write!(f, "asc"),
            Direction::Desc => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

impl Order {
    pub fn new<F: Into<String>>(field: F, direction: Direction) -> Self {
        Order { field: field.into(), direction }
    }

    pub fn asc<F: Into<String>>(field: F) -> Self {
        Self::new(field, Direction::Asc)
    }

    pub fn desc<F: Into<String>>(field: F) -> Self {
        Self::new(field, Direction::Desc)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

pub const PAGE_SIZE: u64 = 10;
pub const PAGE_NUMBER: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// `total_page` for a record count: `1` while the count is below one page,
/// otherwise the ceiling of `total / size`.
pub fn total_pages(total_record: u64, page_size: u64) -> u64 {
    if page_size == 0 || total_record / page_size == 0 {
        1
    } else {
        total_record.div_ceil(page_size)
    }
}

/// Page request.
///
/// `Page::new` keeps `start_items` as the zero based offset and `end_items` as
/// the page size. `Page::with_total` keeps them as one based row numbers of the
/// first and last row of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page_number: u64,
    pub page_size: u64,
    pub total_record: u64,
    pub total_page: u64,
    pub start_items: u64,
    pub end_items: u64,
}

impl Default for Page {
    fn default() -> Self {
        Page::new(PAGE_NUMBER, PAGE_SIZE)
    }
}

impl Page {
    pub fn new(page_number: u64, page_size: u64) -> Self {
        let page_number = page_number.max(1);
        Page {
            page_number,
            page_size,
            total_record: 0,
            total_page: 0,
            start_items: page_size.saturating_mul(page_number - 1),
            end_items: page_size,
        }
    }

    pub fn with_total(page_number: u64, page_size: u64, total_record: u64) -> Self {
        let page_number = page_number.max(1);
        Page {
            page_number,
            page_size,
            total_record,
            total_page: total_pages(total_record, page_size),
            start_items: page_size.saturating_mul(page_number - 1).saturating_add(1),
            end_items: page_size.saturating_mul(page_number),
        }
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        self.page_size.saturating_mul(self.page_number.max(1) - 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub page_number: u64,
    pub page_size: u64,
    pub total_record: u64,
    pub total_page: u64,
    pub data: Vec<T>,
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        PageResult::new(PAGE_NUMBER, DEFAULT_PAGE_SIZE, 0, Vec::new())
    }
}

impl<T> PageResult<T> {
    pub fn new(page_number: u64, page_size: u64, total_record: u64, data: Vec<T>) -> Self {
        PageResult {
            page_number,
            page_size,
            total_record,
            total_page: total_pages(total_record, page_size),
            data,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageResult<U> {
        PageResult {
            page_number: self.page_number,
            page_size: self.page_size,
            total_record: self.total_record,
            total_page: self.total_page,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

/// A select over one or more tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub fields: Vec<String>,
    pub tables: Vec<String>,
    pub wheres: Vec<Condition>,
    pub page: Option<Page>,
    pub orders: Vec<Order>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table<S: Into<String>>(mut self, table: S) -> Self {
        self.tables.push(table.into());
        self
    }

    pub fn tables<S: Into<String>>(mut self, tables: Vec<S>) -> Self {
        self.tables.extend(tables.into_iter().map(Into::into));
        self
    }

    pub fn field<S: Into<String>>(mut self, field: S) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn fields<S: Into<String>>(mut self, fields: Vec<S>) -> Self {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.wheres.push(condition);
        self
    }

    pub fn eq<F: Into<String>, V: IntoValue>(self, field: F, value: V) -> Self {
        self.condition(Condition::eq(field, value))
    }

    pub fn like<F: Into<String>, V: Into<String>>(self, field: F, value: V, like_type: LikeType) -> Self {
        self.condition(Condition::like(field, value, like_type))
    }

    pub fn order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    pub fn set_tables(&mut self, tables: Vec<String>) -> &mut Self {
        self.tables = tables;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_value() {
        assert_eq!(build_like_value("ab", LikeType::StartWith, false), "ab%");
        assert_eq!(build_like_value("ab", LikeType::EndWith, false), "%ab");
        assert_eq!(build_like_value("ab", LikeType::Contains, true), "LIKE %ab%");
    }

    #[test]
    fn test_condition_sql() {
        let c = Condition::in_list("id", &[1, 2, 3]);
        assert_eq!(c.to_sql(), "id in (?,?,?)");
        assert_eq!(c.params().len(), 3);
        assert_eq!(Condition::in_list::<_, i32>("id", &[]).to_sql(), "1 = 0");
        assert_eq!(Condition::between("age", 1, 9).to_sql(), "age between ? and ?");
        assert_eq!(Condition::eq("name", Value::Null).to_sql(), "name is null");
        assert!(Condition::eq("name", Value::Null).params().is_empty());
        assert_eq!(Condition::ge("age", 18).to_sql(), "age >= ?");
        let like = Condition::like("name", "jo", LikeType::Contains);
        assert_eq!(like.to_sql(), "name like ?");
        assert_eq!(like.params(), vec![Value::Text("%jo%".to_string())]);
    }

    #[test]
    fn test_page_constructors() {
        let page = Page::new(3, 10);
        assert_eq!((page.start_items, page.end_items), (20, 10));
        assert_eq!((page.offset(), page.limit()), (20, 10));
        let page = Page::with_total(3, 10, 95);
        assert_eq!((page.start_items, page.end_items), (21, 30));
        assert_eq!(page.total_page, 10);
        assert_eq!(Page::with_total(1, 10, 9).total_page, 1);
        assert_eq!(Page::with_total(1, 10, 20).total_page, 2);
        assert_eq!(Page::new(0, 10).page_number, 1);
        assert_eq!(Page::default().page_size, 10);
    }

    #[test]
    fn test_page_saturates() {
        let page = Page::new(u64::MAX / 2, 10);
        assert_eq!(page.start_items, u64::MAX);
        assert_eq!(page.offset(), u64::MAX);
        let page = Page::with_total(u64::MAX, 2, 5);
        assert_eq!((page.start_items, page.end_items), (u64::MAX, u64::MAX));
        assert_eq!(page.total_page, 3);
    }

    #[test]
    fn test_page_result() {
        let result: PageResult<i32> = PageResult::default();
        assert_eq!(result.page_size, 20);
        assert_eq!(result.total_page, 1);
        let result = PageResult::new(2, 20, 41, vec![1, 2]).map(|v| v * 10);
        assert_eq!(result.total_page, 3);
        assert_eq!(result.data, vec![10, 20]);
    }
}
