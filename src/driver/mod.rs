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
//! Statement executors over pooled connections.
//!
use sqlbean_core::{Params, Rows};
use crate::errors::{Result, SqlbeanError};
use crate::interceptor::{ExecuteContext, LoggingInterceptor};

#[cfg(feature = "sqlite-sync")]
pub mod sqlite;
#[cfg(feature = "mysql-sync")]
pub mod mysql;

#[cfg(feature = "sqlite-sync")]
use crate::driver::sqlite::Sqlite;
#[cfg(feature = "mysql-sync")]
use crate::driver::mysql::Mysql;

pub trait DbExecutor {
    fn start(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    fn rollback(&self) -> Result<()>;

    fn query(&self, sql: &str, params: Params) -> Result<Rows>;

    /// Runs a statement and returns the affected rows.
    fn execute(&self, sql: &str, params: Params) -> Result<u64>;

    fn last_insert_id(&self) -> u64 { 0 }

    /// One statement, many parameter sets, all inside one transaction.
    fn execute_batch(&self, sql: &str, batch: &[Params]) -> Result<u64> {
        self.start()?;
        match execute_each(self, sql, batch) {
            Ok(affected) => {
                self.commit()?;
                Ok(affected)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback() {
                    tracing::error!("rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }

    /// Literal statements inside one transaction.
    fn execute_statements(&self, statements: &[String]) -> Result<u64> {
        self.start()?;
        match execute_literals(self, statements) {
            Ok(affected) => {
                self.commit()?;
                Ok(affected)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback() {
                    tracing::error!("rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }

    /// First column of the first row as a count, `0` when there is no row.
    fn query_count(&self, sql: &str, params: Params) -> Result<u64> {
        let rows = self.query(sql, params)?;
        match rows.first() {
            Some(row) => {
                let count = row
                    .get_opt::<i64, _>(0)
                    .ok_or_else(|| SqlbeanError::InvalidSQL(format!("count query returned no column: {}", sql)))??;
                Ok(count.max(0) as u64)
            }
            None => Ok(0),
        }
    }
}

pub(crate) fn execute_each<E: DbExecutor + ?Sized>(executor: &E, sql: &str, batch: &[Params]) -> Result<u64> {
    let mut affected = 0;
    for params in batch {
        affected += executor.execute(sql, params.clone())?;
    }
    Ok(affected)
}

pub(crate) fn execute_literals<E: DbExecutor + ?Sized>(executor: &E, statements: &[String]) -> Result<u64> {
    let mut affected = 0;
    for sql in statements {
        affected += executor.execute(sql, Params::None)?;
    }
    Ok(affected)
}

/// Runs `op` between the interceptor's before and after hooks.
pub(crate) fn intercept<T, F, C>(
    interceptor: Option<&LoggingInterceptor>,
    sql: &str,
    params: &Params,
    op: F,
    count: C,
) -> Result<T>
where
    F: FnOnce() -> Result<T>,
    C: Fn(&T) -> u64,
{
    let interceptor = match interceptor {
        Some(interceptor) => interceptor,
        None => return op(),
    };
    let ctx = ExecuteContext::new(sql, params);
    interceptor.before_execute(&ctx);
    let result = op();
    interceptor.after_execute(&ctx, result.as_ref().map(&count));
    result
}

pub enum DbDriver {
    #[cfg(feature = "sqlite-sync")]
    SqliteDriver(Box<Sqlite>),
    #[cfg(feature = "mysql-sync")]
    MysqlDriver(Box<Mysql>),
}

impl DbExecutor for DbDriver {
    fn start(&self) -> Result<()> {
        match self {
            #[cfg(feature = "sqlite-sync")]
            DbDriver::SqliteDriver(driver) => driver.start(),
            #[cfg(feature = "mysql-sync")]
            DbDriver::MysqlDriver(driver) => driver.start(),
        }
    }

    fn commit(&self) -> Result<()> {
        match self {
            #[cfg(feature = "sqlite-sync")]
            DbDriver::SqliteDriver(driver) => driver.commit(),
            #[cfg(feature = "mysql-sync")]
            DbDriver::MysqlDriver(driver) => driver.commit(),
        }
    }

    fn rollback(&self) -> Result<()> {
        match self {
            #[cfg(feature = "sqlite-sync")]
            DbDriver::SqliteDriver(driver) => driver.rollback(),
            #[cfg(feature = "mysql-sync")]
            DbDriver::MysqlDriver(driver) => driver.rollback(),
        }
    }

    fn query(&self, sql: &str, params: Params) -> Result<Rows> {
        match self {
            #[cfg(feature = "sqlite-sync")]
            DbDriver::SqliteDriver(driver) => driver.query(sql, params),
            #[cfg(feature = "mysql-sync")]
            DbDriver::MysqlDriver(driver) => driver.query(sql, params),
        }
    }

    fn execute(&self, sql: &str, params: Params) -> Result<u64> {
        match self {
            #[cfg(feature = "sqlite-sync")]
            DbDriver::SqliteDriver(driver) => driver.execute(sql, params),
            #[cfg(feature = "mysql-sync")]
            DbDriver::MysqlDriver(driver) => driver.execute(sql, params),
        }
    }

    fn last_insert_id(&self) -> u64 {
        match self {
            #[cfg(feature = "sqlite-sync")]
            DbDriver::SqliteDriver(driver) => driver.last_insert_id(),
            #[cfg(feature = "mysql-sync")]
            DbDriver::MysqlDriver(driver) => driver.last_insert_id(),
        }
    }
}
