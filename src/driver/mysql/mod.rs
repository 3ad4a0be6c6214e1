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
//! MySQL modules.
//!

mod connection;

pub use connection::*;

use std::sync::{Arc, RwLock};
use mysql::{prelude::Queryable, Params as MysqlParams, Row as MysqlRow, Value as MysqlValue};
use sqlbean_core::{Params, Row, Rows, Value};
use crate::driver::{intercept, DbExecutor};
use crate::errors::{Result, SqlbeanError};
use crate::interceptor::{LoggingInterceptor, OperationType};

pub struct Mysql {
    conn: RwLock<MysqlConnection>,
    interceptor: Option<Arc<LoggingInterceptor>>,
}

fn lost_connection() -> SqlbeanError {
    SqlbeanError::DatabaseError("Can't get the connection.".to_string())
}

impl Mysql {
    pub fn new(conn: MysqlConnection) -> Self {
        Mysql {
            conn: RwLock::new(conn),
            interceptor: None,
        }
    }

    pub fn with_interceptor(mut self, interceptor: Arc<LoggingInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    fn query_drop(&self, sql: &str) -> Result<u64> {
        intercept(self.interceptor.as_deref(), sql, &Params::None, || {
            let mut conn = self.conn.write().map_err(|_| lost_connection())?;
            conn.query_drop(sql)?;
            Ok(0)
        }, |affected| *affected)
    }

    fn inner_query(&self, sql: &str, params: &Params) -> Result<Rows> {
        let mut conn = self.conn.write().map_err(|_| lost_connection())?;
        let stmt = conn.prep(sql)?;
        let result = conn.exec_map(&stmt, convert_to_mysql_params(params), convert_mysql_row)?;
        let rows: Vec<Row> = result.into_iter().collect::<Result<Vec<Row>>>()?;
        let mut records = Rows::new();
        for row in rows {
            records.push(row);
        }
        Ok(records)
    }

    fn inner_execute(&self, sql: &str, params: &Params) -> Result<u64> {
        if OperationType::detect(sql) == OperationType::Select {
            return self.inner_query(sql, params).map(|rows| rows.len() as u64);
        }
        let mut conn = self.conn.write().map_err(|_| lost_connection())?;
        let stmt = conn.prep(sql)?;
        conn.exec_drop(&stmt, convert_to_mysql_params(params))?;
        Ok(conn.affected_rows())
    }
}

impl DbExecutor for Mysql {
    fn start(&self) -> Result<()> {
        self.query_drop("START TRANSACTION").map(|_| ())
    }

    fn commit(&self) -> Result<()> {
        self.query_drop("COMMIT").map(|_| ())
    }

    fn rollback(&self) -> Result<()> {
        self.query_drop("ROLLBACK").map(|_| ())
    }

    fn query(&self, sql: &str, params: Params) -> Result<Rows> {
        intercept(self.interceptor.as_deref(), sql, &params, || self.inner_query(sql, &params), |rows| rows.len() as u64)
    }

    fn execute(&self, sql: &str, params: Params) -> Result<u64> {
        intercept(self.interceptor.as_deref(), sql, &params, || self.inner_execute(sql, &params), |affected| *affected)
    }

    fn last_insert_id(&self) -> u64 {
        self.conn.read().map(|conn| conn.last_insert_id()).unwrap_or_default()
    }
}

/// Convert parameters to MySQL format
fn convert_to_mysql_params(params: &Params) -> MysqlParams {
    match params {
        Params::None => MysqlParams::Empty,
        Params::Positional(values) if values.is_empty() => MysqlParams::Empty,
        Params::Positional(values) => {
            MysqlParams::Positional(values.iter().cloned().map(convert_value_to_mysql).collect())
        }
        Params::Named(named) => {
            let named = named
                .iter()
                .map(|(name, v)| (name.clone().into_bytes(), convert_value_to_mysql(v.clone())))
                .collect();
            MysqlParams::Named(named)
        }
    }
}

fn convert_value_to_mysql(value: Value) -> MysqlValue {
    match value {
        Value::Null => MysqlValue::NULL,
        Value::Bool(b) => MysqlValue::from(b),
        Value::Tinyint(i) => MysqlValue::from(i),
        Value::Smallint(i) => MysqlValue::from(i),
        Value::Int(i) => MysqlValue::from(i),
        Value::Bigint(i) => MysqlValue::from(i),
        Value::Float(f) => MysqlValue::from(f),
        Value::Double(d) => MysqlValue::from(d),
        Value::Blob(vec) => MysqlValue::from(vec),
        Value::Char(c) => MysqlValue::from(c.to_string()),
        Value::Text(s) => MysqlValue::from(s),
        Value::Json(j) => MysqlValue::from(j.to_string()),
        Value::Uuid(uuid) => MysqlValue::from(uuid.to_string()),
        Value::Date(date) => MysqlValue::from(date),
        Value::Time(time) => MysqlValue::from(time),
        Value::DateTime(dt) => MysqlValue::from(dt),
        Value::Timestamp(ts) => MysqlValue::from(ts.naive_utc()),
        Value::Object(_) | Value::List(_) => MysqlValue::from(value.to_json().to_string()),
    }
}

fn convert_mysql_row(mysql_row: MysqlRow) -> Result<Row> {
    let columns: Vec<String> = mysql_row
        .columns_ref()
        .iter()
        .map(|col| col.name_str().to_string())
        .collect();
    let column_types: Vec<mysql::consts::ColumnType> = mysql_row
        .columns_ref()
        .iter()
        .map(|col| col.column_type())
        .collect();
    let values = mysql_row
        .unwrap()
        .into_iter()
        .enumerate()
        .map(|(i, mysql_value)| {
            let column_type = column_types
                .get(i)
                .copied()
                .unwrap_or(mysql::consts::ColumnType::MYSQL_TYPE_STRING);
            convert_mysql_value(mysql_value, column_type)
        })
        .collect::<Result<Vec<Value>>>()?;
    Ok(Row::new(columns, values))
}

fn convert_mysql_value(mysql_value: MysqlValue, column_type: mysql::consts::ColumnType) -> Result<Value> {
    use mysql::consts::ColumnType;

    if mysql_value == MysqlValue::NULL {
        return Ok(Value::Null);
    }

    match column_type {
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
            let text: String = try_convert(mysql_value)?;
            text.trim()
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|e| SqlbeanError::DataError(format!("invalid decimal `{}`: {}", text, e)))
        }
        ColumnType::MYSQL_TYPE_TINY => Ok(Value::Tinyint(try_convert(mysql_value)?)),
        ColumnType::MYSQL_TYPE_SHORT | ColumnType::MYSQL_TYPE_YEAR => Ok(Value::Smallint(try_convert(mysql_value)?)),
        ColumnType::MYSQL_TYPE_LONG | ColumnType::MYSQL_TYPE_INT24 => Ok(Value::Int(try_convert(mysql_value)?)),
        ColumnType::MYSQL_TYPE_LONGLONG => Ok(Value::Bigint(try_convert(mysql_value)?)),
        ColumnType::MYSQL_TYPE_FLOAT => Ok(Value::Float(try_convert(mysql_value)?)),
        ColumnType::MYSQL_TYPE_DOUBLE => Ok(Value::Double(try_convert(mysql_value)?)),
        ColumnType::MYSQL_TYPE_TIMESTAMP => {
            let val: chrono::NaiveDateTime = try_convert(mysql_value)?;
            Ok(Value::Timestamp(chrono::DateTime::from_naive_utc_and_offset(val, chrono::Utc)))
        }
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => Ok(Value::Date(try_convert(mysql_value)?)),
        ColumnType::MYSQL_TYPE_TIME => Ok(Value::Time(try_convert(mysql_value)?)),
        ColumnType::MYSQL_TYPE_DATETIME => Ok(Value::DateTime(try_convert(mysql_value)?)),
        ColumnType::MYSQL_TYPE_VARCHAR | ColumnType::MYSQL_TYPE_VAR_STRING | ColumnType::MYSQL_TYPE_STRING => {
            Ok(Value::Text(try_convert(mysql_value)?))
        }
        ColumnType::MYSQL_TYPE_JSON => {
            let val: String = try_convert(mysql_value)?;
            Ok(Value::Json(serde_json::from_str(&val)?))
        }
        ColumnType::MYSQL_TYPE_TINY_BLOB | ColumnType::MYSQL_TYPE_MEDIUM_BLOB |
        ColumnType::MYSQL_TYPE_LONG_BLOB | ColumnType::MYSQL_TYPE_BLOB => {
            let bytes: Vec<u8> = try_convert(mysql_value)?;
            match String::from_utf8(bytes) {
                Ok(text) => Ok(Value::Text(text)),
                Err(e) => Ok(Value::Blob(e.into_bytes())),
            }
        }
        ColumnType::MYSQL_TYPE_BIT => {
            let bytes: Vec<u8> = try_convert(mysql_value)?;
            if bytes.len() == 1 {
                Ok(Value::Bool(bytes[0] != 0))
            } else {
                Ok(Value::Blob(bytes))
            }
        }
        _ => try_generic_conversion(mysql_value),
    }
}

/// Generic type conversion
fn try_generic_conversion(mysql_value: MysqlValue) -> Result<Value> {
    if let Ok(i) = mysql::from_value_opt::<i64>(mysql_value.clone()) {
        return Ok(Value::Bigint(i));
    }
    if let Ok(f) = mysql::from_value_opt::<f64>(mysql_value.clone()) {
        return Ok(Value::Double(f));
    }
    if let Ok(s) = mysql::from_value_opt::<String>(mysql_value.clone()) {
        return Ok(Value::Text(s));
    }
    if let Ok(bytes) = mysql::from_value_opt::<Vec<u8>>(mysql_value) {
        return Ok(Value::Blob(bytes));
    }
    Err(SqlbeanError::DataError("Unsupported MySQL value type".to_string()))
}

/// Type-safe conversion
fn try_convert<T>(value: MysqlValue) -> Result<T>
where
    T: mysql::prelude::FromValue,
{
    mysql::from_value_opt::<T>(value).map_err(|e| SqlbeanError::DataError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_params() {
        let params = Params::from(("a", 1, Option::<i32>::None));
        match convert_to_mysql_params(&params) {
            MysqlParams::Positional(values) => {
                assert_eq!(values, vec![MysqlValue::from("a"), MysqlValue::from(1i32), MysqlValue::NULL]);
            }
            _ => panic!("expected positional params"),
        }
        assert_eq!(convert_to_mysql_params(&Params::None), MysqlParams::Empty);
    }

    #[test]
    fn test_convert_values() {
        use mysql::consts::ColumnType;
        let v = convert_mysql_value(MysqlValue::from("12.50"), ColumnType::MYSQL_TYPE_NEWDECIMAL).unwrap();
        assert_eq!(v, Value::Double(12.5));
        let v = convert_mysql_value(MysqlValue::NULL, ColumnType::MYSQL_TYPE_LONG).unwrap();
        assert_eq!(v, Value::Null);
        let v = convert_mysql_value(MysqlValue::Int(7), ColumnType::MYSQL_TYPE_LONGLONG).unwrap();
        assert_eq!(v, Value::Bigint(7));
    }
}
