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
//! Common Errors.
//!
use std::fmt;
use sqlbean_core::{ConversionError, DataError};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlbeanError {
    Unknown,
    InvalidSQL(String),
    InvalidField(String),
    MissingIdent(String),
    MissingTable(String),
    MissingField(String),
    DataError(String),
    ConfigError(String),
    DatabaseError(String),
    R2D2Error(String),
    SqliteError(String),
    MySQLError(String),
}

impl fmt::Display for SqlbeanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SqlbeanError::Unknown => write!(f, "Unknown Error"),
            SqlbeanError::InvalidSQL(ref err) => write!(f, "Invalid SQL: {}", err),
            SqlbeanError::InvalidField(ref err) => write!(f, "Invalid field: {}", err),
            SqlbeanError::MissingIdent(ref err) => write!(f, "Missing ident: {}", err),
            SqlbeanError::MissingTable(ref err) => write!(f, "Missing table: {}", err),
            SqlbeanError::MissingField(ref err) => write!(f, "Missing field: {}", err),
            SqlbeanError::DataError(ref err) => err.fmt(f),
            SqlbeanError::ConfigError(ref err) => write!(f, "Config error: {}", err),
            SqlbeanError::DatabaseError(ref err) => err.fmt(f),
            SqlbeanError::R2D2Error(ref err) => err.fmt(f),
            SqlbeanError::SqliteError(ref err) => err.fmt(f),
            SqlbeanError::MySQLError(ref err) => err.fmt(f),
        }
    }
}

impl std::error::Error for SqlbeanError {}

impl From<DataError> for SqlbeanError {
    fn from(err: DataError) -> Self {
        SqlbeanError::DataError(err.to_string())
    }
}

impl From<ConversionError> for SqlbeanError {
    fn from(err: ConversionError) -> Self {
        SqlbeanError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for SqlbeanError {
    fn from(err: serde_json::Error) -> Self {
        SqlbeanError::DataError(err.to_string())
    }
}

impl From<url::ParseError> for SqlbeanError {
    fn from(err: url::ParseError) -> Self {
        SqlbeanError::ConfigError(err.to_string())
    }
}

impl From<toml::de::Error> for SqlbeanError {
    fn from(err: toml::de::Error) -> Self {
        SqlbeanError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for SqlbeanError {
    fn from(err: std::io::Error) -> Self {
        SqlbeanError::ConfigError(err.to_string())
    }
}

impl From<r2d2::Error> for SqlbeanError {
    fn from(err: r2d2::Error) -> Self {
        SqlbeanError::R2D2Error(err.to_string())
    }
}

#[cfg(feature = "sqlite-sync")]
impl From<rusqlite::Error> for SqlbeanError {
    fn from(err: rusqlite::Error) -> Self {
        SqlbeanError::SqliteError(err.to_string())
    }
}

#[cfg(feature = "mysql-sync")]
impl From<mysql::Error> for SqlbeanError {
    fn from(err: mysql::Error) -> Self {
        SqlbeanError::MySQLError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SqlbeanError>;

/// Error surfaced to API callers: a stable code, a message and an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessError {
    pub code: String,
    pub message: String,
    pub status: u16,
}

impl BusinessError {
    pub const DEFAULT_CODE: &'static str = "ERROR";

    pub fn error<C: Into<String>, M: Into<String>>(code: C, message: M) -> Self {
        BusinessError { code: code.into(), message: message.into(), status: 500 }
    }

    pub fn message<M: Into<String>>(message: M) -> Self {
        Self::error(Self::DEFAULT_CODE, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn data_not_found() -> Self {
        Self::error("com-4001", "data not found").with_status(404)
    }

    pub fn internal() -> Self {
        Self::error("com-5001", "internal server error")
    }

    pub fn token_expired() -> Self {
        Self::error("iam-4001", "token expired").with_status(401)
    }

    pub fn token_invalid() -> Self {
        Self::error("iam-4002", "token invalid").with_status(401)
    }

    pub fn token_missing() -> Self {
        Self::error("iam-4003", "token missing").with_status(403)
    }

    pub fn role_denied() -> Self {
        Self::error("401", "role not allowed").with_status(401)
    }
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for BusinessError {}

impl From<SqlbeanError> for BusinessError {
    fn from(err: SqlbeanError) -> Self {
        BusinessError::error("com-5001", err.to_string())
    }
}
