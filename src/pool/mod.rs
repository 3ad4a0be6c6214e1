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
//! Connection pools and the process-wide data source.
//!
use std::sync::Arc;
use once_cell::sync::OnceCell;
use crate::config::{DataSourceConfig, DriverType};
use crate::driver::DbDriver;
use crate::errors::{Result, SqlbeanError};
use crate::interceptor::LoggingInterceptor;
use crate::transaction::Transaction;

#[cfg(feature = "sqlite-sync")]
use crate::driver::sqlite::{init_sqlite_pool, Sqlite, SqlitePool};
#[cfg(feature = "mysql-sync")]
use crate::driver::mysql::{init_mysql_pool, Mysql, MysqlPool};

static GLOBAL_DATASOURCE: OnceCell<DataSource> = OnceCell::new();

#[derive(Clone)]
pub enum DBPool {
    #[cfg(feature = "sqlite-sync")]
    SqlitePool(SqlitePool),
    #[cfg(feature = "mysql-sync")]
    MysqlPool(MysqlPool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Connections currently open.
    pub size: u32,
    /// Open connections not checked out.
    pub available: u32,
    pub max_size: u32,
}

/// A pooled data source. Connections go back to the pool when dropped.
#[derive(Clone)]
pub struct DataSource {
    pool: DBPool,
    cfg: DataSourceConfig,
    interceptor: Arc<LoggingInterceptor>,
}

impl DataSource {
    /// Builds the pool for the configured driver and checks it with `SELECT 1`.
    pub fn new(cfg: DataSourceConfig) -> Result<Self> {
        let pool = match cfg.driver_type()? {
            #[cfg(feature = "sqlite-sync")]
            DriverType::Sqlite(_) => DBPool::SqlitePool(init_sqlite_pool(&cfg)?),
            #[cfg(feature = "mysql-sync")]
            DriverType::Mysql => DBPool::MysqlPool(init_mysql_pool(&cfg)?),
            #[allow(unreachable_patterns)]
            driver => {
                return Err(SqlbeanError::ConfigError(format!(
                    "driver {:?} is not enabled in this build",
                    driver
                )))
            }
        };
        let interceptor = LoggingInterceptor::new()
            .with_log_level(cfg.log_level())
            .with_slow_query_threshold(cfg.slow_query_threshold_ms());
        tracing::info!("datasource ready: {}", cfg.url());
        Ok(DataSource {
            pool,
            cfg,
            interceptor: Arc::new(interceptor),
        })
    }

    /// A connection from the pool, wrapped in its executor.
    pub fn acquire(&self) -> Result<DbDriver> {
        match &self.pool {
            #[cfg(feature = "sqlite-sync")]
            DBPool::SqlitePool(pool) => {
                let conn = pool.get()?;
                Ok(DbDriver::SqliteDriver(Box::new(Sqlite::new(conn).with_interceptor(self.interceptor.clone()))))
            }
            #[cfg(feature = "mysql-sync")]
            DBPool::MysqlPool(pool) => {
                let conn = pool.get()?;
                Ok(DbDriver::MysqlDriver(Box::new(Mysql::new(conn).with_interceptor(self.interceptor.clone()))))
            }
        }
    }

    pub fn start_transaction(&self) -> Result<Transaction> {
        Transaction::begin(self.acquire()?)
    }

    pub fn status(&self) -> PoolStatus {
        let (state, max_size) = match &self.pool {
            #[cfg(feature = "sqlite-sync")]
            DBPool::SqlitePool(pool) => (pool.state(), pool.max_size()),
            #[cfg(feature = "mysql-sync")]
            DBPool::MysqlPool(pool) => (pool.state(), pool.max_size()),
        };
        PoolStatus {
            size: state.connections,
            available: state.idle_connections,
            max_size,
        }
    }

    pub fn config(&self) -> &DataSourceConfig {
        &self.cfg
    }

    /// Initializes the process-wide data source once. Later calls return the
    /// existing instance and ignore `cfg`.
    pub fn init_global(cfg: DataSourceConfig) -> Result<&'static DataSource> {
        GLOBAL_DATASOURCE.get_or_try_init(|| DataSource::new(cfg))
    }

    pub fn global() -> Result<&'static DataSource> {
        GLOBAL_DATASOURCE
            .get()
            .ok_or_else(|| SqlbeanError::ConfigError("global datasource is not initialized".to_string()))
    }
}

#[cfg(all(test, feature = "sqlite-sync"))]
mod tests {
    use super::*;
    use crate::driver::DbExecutor;
    use sqlbean_core::Params;

    #[test]
    fn test_datasource_status_and_transaction() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("pool.db").display());
        let ds = DataSource::new(DataSourceConfig::new(url).set_max_size(2)).unwrap();
        assert_eq!(ds.status().max_size, 2);
        ds.acquire().unwrap().execute("create table t (id integer)", Params::None).unwrap();
        {
            let tx = ds.start_transaction().unwrap();
            tx.execute("insert into t values (1)", Params::None).unwrap();
        }
        let conn = ds.acquire().unwrap();
        assert_eq!(conn.query_count("select count(1) from t", Params::None).unwrap(), 0);
        let tx = ds.start_transaction().unwrap();
        tx.execute("insert into t values (1)", Params::None).unwrap();
        tx.commit().unwrap();
        drop(tx);
        assert_eq!(conn.query_count("select count(1) from t", Params::None).unwrap(), 1);
    }

    #[test]
    fn test_global_keeps_first_config() {
        assert!(matches!(DataSource::global(), Err(SqlbeanError::ConfigError(_))));
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("global.db").display());
        let first = DataSource::init_global(DataSourceConfig::new(url.clone()).set_max_size(2)).unwrap();
        assert_eq!(first.config().url(), url);
        let again = DataSource::init_global(DataSourceConfig::new("ftp://ignored")).unwrap();
        assert!(std::ptr::eq(first, again));
        assert_eq!(again.config().max_size(), 2);
        assert!(std::ptr::eq(DataSource::global().unwrap(), first));
    }

    #[test]
    fn test_unsupported_url() {
        assert!(matches!(DataSource::new(DataSourceConfig::new("ftp://x")), Err(SqlbeanError::ConfigError(_))));
    }
}
