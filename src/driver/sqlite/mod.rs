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
//! SQLite modules.
//!

mod connection;

pub use connection::*;

use std::sync::Arc;
use chrono::{Datelike, Timelike};
use rusqlite::{params_from_iter, ToSql};
use sqlbean_core::{Params, Row, Rows, Value};
use crate::driver::{intercept, DbExecutor};
use crate::errors::Result;
use crate::interceptor::{LoggingInterceptor, OperationType};

pub struct Sqlite {
    conn: SqliteConnection,
    interceptor: Option<Arc<LoggingInterceptor>>,
}

impl Sqlite {
    pub fn new(conn: SqliteConnection) -> Self {
        Sqlite {
            conn,
            interceptor: None,
        }
    }

    pub fn with_interceptor(mut self, interceptor: Arc<LoggingInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    fn _execute(&self, sql: &str, params: Params) -> Result<u64> {
        intercept(self.interceptor.as_deref(), sql, &params, || self.inner_execute(sql, &params), |affected| *affected)
    }

    fn _query(&self, sql: &str, params: Params) -> Result<Rows> {
        intercept(self.interceptor.as_deref(), sql, &params, || self.inner_query(sql, &params), |rows| rows.len() as u64)
    }

    fn inner_execute(&self, sql: &str, params: &Params) -> Result<u64> {
        if OperationType::detect(sql) == OperationType::Select {
            return self.inner_query(sql, params).map(|rows| rows.len() as u64);
        }
        let mut stmt = self.conn.prepare(sql)?;
        let sqlite_params = convert_to_sqlite_params(params);
        let affected_rows = stmt.execute(params_from_iter(sqlite_params.iter()))?;
        Ok(affected_rows as u64)
    }

    fn inner_query(&self, sql: &str, params: &Params) -> Result<Rows> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_names: Vec<String> = stmt.column_names().iter().map(ToString::to_string).collect();
        let column_count = stmt.column_count();
        let sqlite_params = convert_to_sqlite_params(params);
        let mut records = Rows::new();
        let mut rows = stmt.query(params_from_iter(sqlite_params.iter()))?;
        while let Some(row) = rows.next()? {
            let mut record: Vec<Value> = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let raw: rusqlite::types::Value = row.get(i)?;
                record.push(convert_sqlite_value(raw));
            }
            records.push(Row::new(column_names.clone(), record));
        }
        Ok(records)
    }
}

/// SQLite data operations
impl DbExecutor for Sqlite {
    fn start(&self) -> Result<()> {
        self._execute("BEGIN TRANSACTION", Params::None).map(|_| ())
    }

    fn commit(&self) -> Result<()> {
        self._execute("COMMIT TRANSACTION", Params::None).map(|_| ())
    }

    fn rollback(&self) -> Result<()> {
        self._execute("ROLLBACK TRANSACTION", Params::None).map(|_| ())
    }

    fn query(&self, sql: &str, params: Params) -> Result<Rows> {
        self._query(sql, params)
    }

    fn execute(&self, sql: &str, params: Params) -> Result<u64> {
        self._execute(sql, params)
    }

    fn last_insert_id(&self) -> u64 {
        self.conn.last_insert_rowid() as u64
    }
}

fn convert_to_sqlite_params(params: &Params) -> Vec<Box<dyn ToSql + Sync + Send>> {
    params.values().into_iter().map(convert_value_to_to_sql).collect()
}

fn convert_value_to_to_sql(value: Value) -> Box<dyn ToSql + Sync + Send> {
    match value {
        Value::Text(v) => Box::new(v),
        Value::Bool(v) => Box::new(if v { 1i64 } else { 0i64 }),
        Value::Tinyint(v) => Box::new(i64::from(v)),
        Value::Smallint(v) => Box::new(i64::from(v)),
        Value::Int(v) => Box::new(i64::from(v)),
        Value::Bigint(v) => Box::new(v),
        Value::Float(v) => Box::new(f64::from(v)),
        Value::Double(v) => Box::new(v),
        Value::Blob(v) => Box::new(v),
        Value::Char(v) => Box::new(v.to_string()),
        Value::Json(v) => Box::new(v.to_string()),
        Value::Uuid(v) => Box::new(v.to_string()),
        Value::Date(v) => {
            let formatted = format!("{:04}-{:02}-{:02}", v.year(), v.month(), v.day());
            Box::new(formatted)
        },
        Value::DateTime(v) => {
            let formatted = format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                v.year(),
                v.month(),
                v.day(),
                v.hour(),
                v.minute(),
                v.second()
            );
            Box::new(formatted)
        },
        Value::Time(v) => {
            let formatted = format!("{:02}:{:02}:{:02}", v.hour(), v.minute(), v.second());
            Box::new(formatted)
        },
        Value::Timestamp(v) => Box::new(v.format("%Y-%m-%d %H:%M:%S").to_string()),
        Value::Null => Box::new(rusqlite::types::Null),
        Value::Object(_) | Value::List(_) => Box::new(value.to_json().to_string()),
    }
}

fn convert_sqlite_value(value: rusqlite::types::Value) -> Value {
    match value {
        rusqlite::types::Value::Null => Value::Null,
        rusqlite::types::Value::Integer(i) => Value::Bigint(i),
        rusqlite::types::Value::Real(f) => Value::Double(f),
        rusqlite::types::Value::Text(text) => Value::Text(text),
        rusqlite::types::Value::Blob(bytes) => Value::Blob(bytes),
    }
}
