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
//! Parameterized SQL generation from entities and column maps.
//!
//! Column order always follows the entity's declaration order (or the map's
//! insertion order). Placeholders are `?`; values travel in `Params`.
//!
pub mod count;

use indexmap::IndexMap;
use sqlbean_core::{IntoValue, Params, Value};
use crate::errors::{Result, SqlbeanError};
use crate::query::{Page, Query};

pub use count::{count_params_range, count_sql};
pub use crate::query::build_like_value;

pub type ColumnMap = IndexMap<String, Value>;

/// Generated statement plus its bound parameters.
///
/// Batch statements leave `params` empty and carry one parameter set per row
/// in `batch_params`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlAndParams {
    pub sql: String,
    pub params: Params,
    pub batch_params: Vec<Params>,
}

impl SqlAndParams {
    pub fn new<S: Into<String>>(sql: S, params: Vec<Value>) -> Self {
        SqlAndParams {
            sql: sql.into(),
            params: Params::from(params),
            batch_params: Vec::new(),
        }
    }

    pub fn batch<S: Into<String>>(sql: S, batch_params: Vec<Params>) -> Self {
        SqlAndParams {
            sql: sql.into(),
            params: Params::None,
            batch_params,
        }
    }

    pub fn is_batch(&self) -> bool {
        !self.batch_params.is_empty()
    }
}

/// Ordered column -> value map of an entity. With `include_null = false`
/// null values are dropped.
pub fn all_fields<T: IntoValue + ?Sized>(entity: &T, include_null: bool) -> Result<ColumnMap> {
    let fields = match entity.into_value() {
        Value::Object(fields) => fields,
        other => {
            return Err(SqlbeanError::InvalidField(format!(
                "expected an object with column values, found `{}`",
                other
            )))
        }
    };
    Ok(fields.into_iter().filter(|(_, v)| include_null || !v.is_null()).collect())
}

/// Fields that are neither null nor empty text.
fn non_empty_fields<T: IntoValue + ?Sized>(entity: &T) -> Result<ColumnMap> {
    Ok(all_fields(entity, true)?.into_iter().filter(|(_, v)| !v.is_empty_value()).collect())
}

fn require_table(table: &str) -> Result<()> {
    if table.trim().is_empty() {
        return Err(SqlbeanError::MissingTable("table name is empty".to_string()));
    }
    Ok(())
}

/// `a = ? and b is null`, pushing the bound values into `params`.
fn where_clause(wheres: &ColumnMap, params: &mut Vec<Value>) -> String {
    wheres
        .iter()
        .map(|(column, value)| {
            if value.is_null() {
                format!("{} is null", column)
            } else {
                params.push(value.clone());
                format!("{} = ?", column)
            }
        })
        .collect::<Vec<String>>()
        .join(" and ")
}

fn placeholders(len: usize) -> String {
    vec!["?"; len].join(",")
}

/// `limit` and `offset` of `page` as bound values. Values past `i64::MAX`
/// are refused.
pub fn page_params(page: &Page) -> Result<[Value; 2]> {
    let bound = |n: u64| {
        i64::try_from(n)
            .map(Value::Bigint)
            .map_err(|_| SqlbeanError::InvalidSQL(format!("page bound {} is out of range", n)))
    };
    Ok([bound(page.limit())?, bound(page.offset())?])
}

fn paging(page: Option<&Page>, sql: &mut String, params: &mut Vec<Value>) -> Result<()> {
    if let Some(page) = page {
        if page.limit() > 0 {
            sql.push_str(" limit ? offset ?");
            params.extend(page_params(page)?);
        }
    }
    Ok(())
}

/// `insert into t(a,b) values (?,?)` over the given columns.
pub fn generate_insert_map(table: &str, data: &ColumnMap) -> Result<SqlAndParams> {
    require_table(table)?;
    if data.is_empty() {
        return Err(SqlbeanError::MissingField(format!("nothing to insert into {}", table)));
    }
    let columns: Vec<&str> = data.keys().map(String::as_str).collect();
    let sql = format!("insert into {}({}) values ({})", table, columns.join(","), placeholders(columns.len()));
    Ok(SqlAndParams::new(sql, data.values().cloned().collect()))
}

/// Insert of the entity's non-null fields.
pub fn generate_insert<T: IntoValue + ?Sized>(table: &str, entity: &T) -> Result<SqlAndParams> {
    generate_insert_map(table, &all_fields(entity, false)?)
}

/// One insert statement for many rows. Columns come from the first row's
/// non-null fields; every row binds a value for each of them.
pub fn generate_batch_insert<T: IntoValue>(table: &str, entities: &[T]) -> Result<SqlAndParams> {
    require_table(table)?;
    let first = entities
        .first()
        .ok_or_else(|| SqlbeanError::MissingField("batch insert needs at least one row".to_string()))?;
    let columns: Vec<String> = all_fields(first, false)?.into_keys().collect();
    if columns.is_empty() {
        return Err(SqlbeanError::MissingField(format!("nothing to insert into {}", table)));
    }
    let mut batch = Vec::with_capacity(entities.len());
    for entity in entities {
        let mut fields = all_fields(entity, true)?;
        let values: Vec<Value> = columns
            .iter()
            .map(|column| fields.swap_remove(column).unwrap_or_default())
            .collect();
        batch.push(Params::Positional(values));
    }
    let sql = format!("insert into {}({}) values ({})", table, columns.join(","), placeholders(columns.len()));
    Ok(SqlAndParams::batch(sql, batch))
}

/// `select {columns or *} from t where k = ? and ... order by x limit ? offset ?`
pub fn generate_query_base(
    table: &str,
    columns: &[String],
    wheres: &ColumnMap,
    order_by: Option<&str>,
    page: Option<&Page>,
) -> Result<SqlAndParams> {
    require_table(table)?;
    let fields = if columns.is_empty() { "*".to_string() } else { columns.join(",") };
    let mut params = Vec::new();
    let mut sql = format!("select {} from {}", fields, table);
    if !wheres.is_empty() {
        sql.push_str(" where ");
        sql.push_str(&where_clause(wheres, &mut params));
    }
    if let Some(order_by) = order_by.map(str::trim).filter(|o| !o.is_empty()) {
        sql.push_str(" order by ");
        sql.push_str(order_by);
    }
    paging(page, &mut sql, &mut params)?;
    Ok(SqlAndParams::new(sql, params))
}

/// `select count(1) from t where ...`
pub fn generate_count_base(table: &str, wheres: &ColumnMap) -> Result<SqlAndParams> {
    require_table(table)?;
    let mut params = Vec::new();
    let mut sql = format!("select count(1) from {}", table);
    if !wheres.is_empty() {
        sql.push_str(" where ");
        sql.push_str(&where_clause(wheres, &mut params));
    }
    Ok(SqlAndParams::new(sql, params))
}

/// `from t1,t2 where ...` shared by the select and count forms of a query.
fn query_body(query: &Query, params: &mut Vec<Value>) -> Result<String> {
    if query.tables.is_empty() {
        return Err(SqlbeanError::MissingTable("query has no table".to_string()));
    }
    let mut body = format!("from {}", query.tables.join(","));
    if !query.wheres.is_empty() {
        let conditions: Vec<String> = query
            .wheres
            .iter()
            .map(|condition| {
                params.extend(condition.params());
                condition.to_sql()
            })
            .collect();
        body.push_str(" where ");
        body.push_str(&conditions.join(" and "));
    }
    Ok(body)
}

pub fn generate_query(query: &Query) -> Result<SqlAndParams> {
    let mut params = Vec::new();
    let fields = if query.fields.is_empty() { "*".to_string() } else { query.fields.join(",") };
    let mut sql = format!("select {} {}", fields, query_body(query, &mut params)?);
    if !query.orders.is_empty() {
        let orders: Vec<String> = query.orders.iter().map(ToString::to_string).collect();
        sql.push_str(" order by ");
        sql.push_str(&orders.join(", "));
    }
    paging(query.page.as_ref(), &mut sql, &mut params)?;
    Ok(SqlAndParams::new(sql, params))
}

/// Count form of `generate_query`: never ordered or paged.
pub fn generate_query_count(query: &Query) -> Result<SqlAndParams> {
    let mut params = Vec::new();
    let sql = format!("select count(1) {}", query_body(query, &mut params)?);
    Ok(SqlAndParams::new(sql, params))
}

/// `delete from t where k = ? and ...`. An empty condition map is refused.
pub fn generate_delete(table: &str, wheres: &ColumnMap) -> Result<SqlAndParams> {
    require_table(table)?;
    if wheres.is_empty() {
        return Err(SqlbeanError::InvalidSQL(format!("refusing to delete from {} without conditions", table)));
    }
    let mut params = Vec::new();
    let sql = format!("delete from {} where {}", table, where_clause(wheres, &mut params));
    Ok(SqlAndParams::new(sql, params))
}

/// `delete from t where id in (?,?,?)`
pub fn generate_batch_delete<V: IntoValue>(table: &str, primary: &str, ids: &[V]) -> Result<SqlAndParams> {
    require_table(table)?;
    if ids.is_empty() {
        return Err(SqlbeanError::InvalidSQL(format!("no ids to delete from {}", table)));
    }
    let sql = format!("delete from {} where {} in ({})", table, primary, placeholders(ids.len()));
    Ok(SqlAndParams::new(sql, ids.iter().map(IntoValue::into_value).collect()))
}

/// `update t set a = ?, b = ? where id = ?`.
///
/// The primary column must be present and non-null. With `filter_null` the
/// null and empty values are left out of the `set` list.
pub fn generate_update(table: &str, data: &ColumnMap, primary: &str, filter_null: bool) -> Result<SqlAndParams> {
    require_table(table)?;
    let primary_value = data
        .get(primary)
        .filter(|v| !v.is_null())
        .ok_or_else(|| SqlbeanError::MissingIdent(format!("update of {} needs a value for `{}`", table, primary)))?;
    let mut sets = Vec::new();
    let mut params = Vec::new();
    for (column, value) in data {
        if column == primary || (filter_null && value.is_empty_value()) {
            continue;
        }
        sets.push(format!("{} = ?", column));
        params.push(value.clone());
    }
    if sets.is_empty() {
        return Err(SqlbeanError::MissingField(format!("nothing to update in {}", table)));
    }
    params.push(primary_value.clone());
    let sql = format!("update {} set {} where {} = ?", table, sets.join(", "), primary);
    Ok(SqlAndParams::new(sql, params))
}

/// Sets the entity's non-empty fields on the rows matching `wheres`.
pub fn generate_update_by_conditions<T: IntoValue + ?Sized>(table: &str, entity: &T, wheres: &ColumnMap) -> Result<SqlAndParams> {
    require_table(table)?;
    if wheres.is_empty() {
        return Err(SqlbeanError::InvalidSQL(format!("refusing to update {} without conditions", table)));
    }
    let fields = non_empty_fields(entity)?;
    if fields.is_empty() {
        return Err(SqlbeanError::MissingField(format!("nothing to update in {}", table)));
    }
    let mut params: Vec<Value> = fields.values().cloned().collect();
    let sets: Vec<String> = fields.keys().map(|column| format!("{} = ?", column)).collect();
    let sql = format!("update {} set {} where {}", table, sets.join(", "), where_clause(wheres, &mut params));
    Ok(SqlAndParams::new(sql, params))
}

/// One literal update per entity, values rendered inline. Null and empty
/// fields are skipped.
pub fn generate_batch_update_literals<T: IntoValue>(table: &str, entities: &[T], primary: &str) -> Result<Vec<String>> {
    require_table(table)?;
    let mut statements = Vec::with_capacity(entities.len());
    for entity in entities {
        let fields = non_empty_fields(entity)?;
        let primary_value = fields
            .get(primary)
            .ok_or_else(|| SqlbeanError::MissingIdent(format!("update of {} needs a value for `{}`", table, primary)))?;
        let sets: Vec<String> = fields
            .iter()
            .filter(|(column, _)| column.as_str() != primary)
            .map(|(column, value)| format!("{} = {}", column, value.to_sql_literal()))
            .collect();
        if sets.is_empty() {
            continue;
        }
        statements.push(format!(
            "update {} set {} where {} = {}",
            table,
            sets.join(", "),
            primary,
            primary_value.to_sql_literal()
        ));
    }
    Ok(statements)
}

/// Prepared updates grouped by identical SQL text, one param set per entity.
///
/// `all_fields = false` skips null and empty fields, so entities with
/// different filled columns land in different groups.
pub fn generate_batch_update<T: IntoValue>(table: &str, entities: &[T], primary: &str, all_fields_flag: bool) -> Result<Vec<SqlAndParams>> {
    let mut groups: IndexMap<String, Vec<Params>> = IndexMap::new();
    for entity in entities {
        let data = all_fields(entity, true)?;
        let update = generate_update(table, &data, primary, !all_fields_flag)?;
        groups.entry(update.sql).or_default().push(update.params);
    }
    Ok(groups
        .into_iter()
        .map(|(sql, batch)| SqlAndParams::batch(sql, batch))
        .collect())
}

/// `'a','b'` for an `in (...)` list; an empty slice renders `''`.
pub fn generate_in_condition(values: &[&str]) -> String {
    if values.is_empty() {
        return "''".to_string();
    }
    values
        .iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect::<Vec<String>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Condition, LikeType, Order};

    fn user(id: Option<&str>, name: Option<&str>, age: i32) -> Value {
        let mut value = Value::new_object();
        value.insert_obj("id", id);
        value.insert_obj("name", name);
        value.insert_obj("age", age);
        value
    }

    fn map(pairs: &[(&str, Value)]) -> ColumnMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_insert_skips_null() {
        let bean = generate_insert("tbl_user", &user(Some("u1"), None, 3)).unwrap();
        assert_eq!(bean.sql, "insert into tbl_user(id,age) values (?,?)");
        assert_eq!(bean.params.len(), 2);
    }

    #[test]
    fn test_batch_insert_uses_first_row_columns() {
        let rows = vec![user(Some("u1"), Some("a"), 1), user(Some("u2"), None, 2)];
        let bean = generate_batch_insert("tbl_user", &rows).unwrap();
        assert_eq!(bean.sql, "insert into tbl_user(id,name,age) values (?,?,?)");
        assert_eq!(bean.batch_params.len(), 2);
        assert_eq!(bean.batch_params[1].values()[1], Value::Null);
        assert!(generate_batch_insert::<Value>("tbl_user", &[]).is_err());
    }

    #[test]
    fn test_query_base() {
        let wheres = map(&[("name", "a".into_value()), ("deleted", Value::Null)]);
        let bean = generate_query_base("t", &[], &wheres, Some("id desc"), Some(&Page::new(2, 5))).unwrap();
        assert_eq!(bean.sql, "select * from t where name = ? and deleted is null order by id desc limit ? offset ?");
        assert_eq!(bean.params.values(), vec![Value::Text("a".to_string()), Value::Bigint(5), Value::Bigint(5)]);
        let count = generate_count_base("t", &wheres).unwrap();
        assert_eq!(count.sql, "select count(1) from t where name = ? and deleted is null");
    }

    #[test]
    fn test_page_bounds_must_fit() {
        assert_eq!(page_params(&Page::new(3, 10)).unwrap(), [Value::Bigint(10), Value::Bigint(20)]);
        let huge = Page::new(u64::MAX / 2, 10);
        assert!(matches!(page_params(&huge), Err(SqlbeanError::InvalidSQL(_))));
        let result = generate_query_base("t", &[], &IndexMap::new(), None, Some(&huge));
        assert!(matches!(result, Err(SqlbeanError::InvalidSQL(_))));
        let wide = Page::new(1, u64::MAX);
        assert!(generate_query(&Query::new().table("t").page(wide)).is_err());
    }

    #[test]
    fn test_query_model() {
        let query = Query::new()
            .fields(vec!["id", "name"])
            .tables(vec!["t1", "t2"])
            .eq("t1.id", 3)
            .like("name", "jo", LikeType::StartWith)
            .order(Order::asc("f1"))
            .order(Order::desc("f2"))
            .page(Page::new(1, 10));
        let bean = generate_query(&query).unwrap();
        assert_eq!(
            bean.sql,
            "select id,name from t1,t2 where t1.id = ? and name like ? order by f1 asc, f2 desc limit ? offset ?"
        );
        assert_eq!(bean.params.len(), 4);
        let count = generate_query_count(&query).unwrap();
        assert_eq!(count.sql, "select count(1) from t1,t2 where t1.id = ? and name like ?");
        assert_eq!(count.params.len(), 2);
        let all = Query::new().table("t").condition(Condition::is_not_null("x"));
        assert_eq!(generate_query(&all).unwrap().sql, "select * from t where x is not null");
        assert!(matches!(generate_query(&Query::new()), Err(SqlbeanError::MissingTable(_))));
    }

    #[test]
    fn test_delete() {
        let bean = generate_delete("t", &map(&[("id", 1.into_value())])).unwrap();
        assert_eq!(bean.sql, "delete from t where id = ?");
        assert!(generate_delete("t", &ColumnMap::new()).is_err());
        let bean = generate_batch_delete("t", "id", &["a", "b", "c"]).unwrap();
        assert_eq!(bean.sql, "delete from t where id in (?,?,?)");
        assert!(generate_batch_delete::<&str>("t", "id", &[]).is_err());
    }

    #[test]
    fn test_update() {
        let data = map(&[("id", "u1".into_value()), ("name", "".into_value()), ("age", 4.into_value())]);
        let bean = generate_update("t", &data, "id", true).unwrap();
        assert_eq!(bean.sql, "update t set age = ? where id = ?");
        assert_eq!(bean.params.values(), vec![Value::Int(4), Value::Text("u1".to_string())]);
        let bean = generate_update("t", &data, "id", false).unwrap();
        assert_eq!(bean.sql, "update t set name = ?, age = ? where id = ?");
        let missing = map(&[("id", Value::Null), ("age", 4.into_value())]);
        assert!(matches!(generate_update("t", &missing, "id", true), Err(SqlbeanError::MissingIdent(_))));
    }

    #[test]
    fn test_update_by_conditions() {
        let wheres = map(&[("name", "a".into_value())]);
        let bean = generate_update_by_conditions("t", &user(None, Some("b"), 9), &wheres).unwrap();
        assert_eq!(bean.sql, "update t set name = ?, age = ? where name = ?");
        assert_eq!(bean.params.len(), 3);
    }

    #[test]
    fn test_batch_updates() {
        let rows = vec![user(Some("u1"), Some("O'Neil"), 1), user(Some("u2"), None, 2), user(Some("u3"), Some("c"), 3)];
        let literals = generate_batch_update_literals("t", &rows, "id").unwrap();
        assert_eq!(literals[0], "update t set name = 'O''Neil', age = 1 where id = 'u1'");
        assert_eq!(literals[1], "update t set age = 2 where id = 'u2'");
        assert!(generate_batch_update_literals("t", &[user(None, Some("x"), 1)], "id").is_err());

        let groups = generate_batch_update("t", &rows, "id", false).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].sql, "update t set name = ?, age = ? where id = ?");
        assert_eq!(groups[0].batch_params.len(), 2);
        assert_eq!(groups[1].sql, "update t set age = ? where id = ?");
        let groups = generate_batch_update("t", &rows, "id", true).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].batch_params.len(), 3);
    }

    #[test]
    fn test_batch_update_literals_non_finite() {
        let row = Value::Object(map(&[("id", "r1".into_value()), ("ratio", Value::Double(f64::NAN)), ("rate", Value::Float(f32::INFINITY))]));
        let literals = generate_batch_update_literals("t", &[row], "id").unwrap();
        assert_eq!(literals, vec!["update t set ratio = NULL, rate = NULL where id = 'r1'".to_string()]);
    }

    #[test]
    fn test_in_condition() {
        assert_eq!(generate_in_condition(&["a", "b'c"]), "'a','b''c'");
        assert_eq!(generate_in_condition(&[]), "''");
    }

    #[test]
    fn test_all_fields_requires_object() {
        assert!(all_fields(&5, true).is_err());
        let fields = all_fields(&user(Some("u1"), None, 1), false).unwrap();
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["id", "age"]);
    }
}
