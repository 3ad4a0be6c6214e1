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

use std::fmt;
use std::path::{Path, PathBuf};
use r2d2::Pool;
use rusqlite::{Connection, Error, OpenFlags};
use crate::config::{DataSourceConfig, DriverType, MEMORY_SOURCE};
use crate::errors::SqlbeanError;

pub type SqlitePool = Pool<SqliteConnectionManager>;
pub type SqliteConnection = r2d2::PooledConnection<SqliteConnectionManager>;

#[derive(Debug)]
enum Source {
    File(PathBuf),
    Memory,
}

type InitFn = dyn Fn(&mut Connection) -> std::result::Result<(), rusqlite::Error> + Send + Sync + 'static;

pub struct SqliteConnectionManager {
    source: Source,
    flags: OpenFlags,
    init: Option<Box<InitFn>>,
}

impl fmt::Debug for SqliteConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut builder = f.debug_struct("SqliteConnectionManager");
        let _ = builder.field("source", &self.source);
        let _ = builder.field("flags", &self.flags);
        let _ = builder.field("init", &self.init.as_ref().map(|_| "InitFn"));
        builder.finish()
    }
}

impl SqliteConnectionManager {

    pub fn new(cfg: &DataSourceConfig) -> Result<Self, SqlbeanError> {
        match cfg.driver_type()? {
            DriverType::Sqlite(path) if path == MEMORY_SOURCE => Ok(Self::memory()),
            DriverType::Sqlite(path) => Ok(Self::file(path)),
            _ => Err(SqlbeanError::DatabaseError(
                "Database type mismatch: expected SQLite".to_string()
            )),
        }
    }

    /// Creates a new `SqliteConnectionManager` from file.
    ///
    /// See `rusqlite::Connection::open`
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source: Source::File(path.as_ref().to_path_buf()),
            flags: OpenFlags::default(),
            init: None,
        }
    }

    /// Creates a new `SqliteConnectionManager` from memory.
    ///
    /// Every pooled connection opens its own private database.
    pub fn memory() -> Self {
        Self {
            source: Source::Memory,
            flags: OpenFlags::default(),
            init: None,
        }
    }

    pub fn with_flags(self, flags: OpenFlags) -> Self {
        Self { flags, ..self }
    }

    /// Calls `init` on every new connection, e.g. to set PRAGMAs.
    pub fn with_init<F>(self, init: F) -> Self
    where
        F: Fn(&mut Connection) -> std::result::Result<(), rusqlite::Error> + Send + Sync + 'static,
    {
        let init: Option<Box<InitFn>> = Some(Box::new(init));
        Self { init, ..self }
    }
}

impl r2d2::ManageConnection for SqliteConnectionManager {
    type Connection = Connection;
    type Error = rusqlite::Error;

    fn connect(&self) -> std::result::Result<Connection, Error> {
        match self.source {
            Source::File(ref path) => Connection::open_with_flags(path, self.flags),
            Source::Memory => Connection::open_in_memory_with_flags(self.flags),
        }
            .and_then(|mut c| match self.init {
                None => Ok(c),
                Some(ref init) => init(&mut c).map(|_| c),
            })
    }

    fn is_valid(&self, conn: &mut Connection) -> std::result::Result<(), Error> {
        conn.execute_batch("")
    }

    fn has_broken(&self, conn: &mut Connection) -> bool {
        self.is_valid(conn).is_err()
    }
}

///
/// Create a connection pool
/// cfg Configuration information
///
pub fn init_sqlite_pool(cfg: &DataSourceConfig) -> Result<SqlitePool, SqlbeanError> {
    let manager = SqliteConnectionManager::new(cfg)?;

    let pool = r2d2::Pool::builder()
        .connection_timeout(cfg.connection_timeout())
        .min_idle(cfg.min_idle())
        .max_size(cfg.max_size())
        .idle_timeout(Some(cfg.idle_timeout()))
        .max_lifetime(Some(cfg.max_lifetime()))
        .test_on_check_out(cfg.test_on_check_out())
        .build(manager)
        .map_err(|e| {
            SqlbeanError::DatabaseError(format!("Failed to create SQLite connection pool: {}", e))
        })?;

    // Testing connections
    let conn = pool.get().map_err(|e| {
        SqlbeanError::DatabaseError(format!("Failed to get connection from pool: {}", e))
    })?;

    conn.execute_batch("SELECT 1").map_err(|e| {
        SqlbeanError::DatabaseError(format!("SQLite connection test failed: {}", e))
    })?;

    Ok(pool)
}
