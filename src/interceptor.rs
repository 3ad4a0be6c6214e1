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
//! SQL execution logging.
//!
use std::time::Instant;
use serde::Deserialize;
use tracing::{debug, error, info, trace, warn};
use sqlbean_core::Params;
use crate::errors::SqlbeanError;

/// Log level for statement logging. Lower levels log more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Tracking level (lowest priority)
    Trace = 1,
    Debug = 2,
    Info = 3,
    Warn = 4,
    /// Error Level (Highest Priority)
    Error = 5,
}

impl LogLevel {
    /// Parsing logs from the string level
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ERROR" | "ERR" => Some(LogLevel::Error),
            "WARN" | "WARNING" => Some(LogLevel::Warn),
            "INFO" => Some(LogLevel::Info),
            "DEBUG" => Some(LogLevel::Debug),
            "TRACE" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Check if a level is recorded
    pub fn should_log(&self, other: LogLevel) -> bool {
        *self <= other
    }
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Select,
    Insert,
    Update,
    Delete,
    Transaction,
    Other,
}

impl OperationType {
    /// Detects the statement kind from its first keyword.
    pub fn detect(sql: &str) -> Self {
        let keyword = sql
            .trim_start()
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match keyword.as_str() {
            "select" | "with" => OperationType::Select,
            "insert" | "replace" => OperationType::Insert,
            "update" => OperationType::Update,
            "delete" => OperationType::Delete,
            "begin" | "start" | "commit" | "rollback" => OperationType::Transaction,
            _ => OperationType::Other,
        }
    }
}

/// One statement on its way through an executor.
#[derive(Debug, Clone)]
pub struct ExecuteContext {
    sql: String,
    params: Params,
    operation_type: OperationType,
    start_time: Instant,
}

impl ExecuteContext {
    pub fn new(sql: &str, params: &Params) -> Self {
        ExecuteContext {
            sql: sql.to_string(),
            params: params.clone(),
            operation_type: OperationType::detect(sql),
            start_time: Instant::now(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }
}

/// Simplified log blocker - Focus on SQL execution logs
#[derive(Debug, Clone)]
pub struct LoggingInterceptor {
    pub log_level: LogLevel,
    pub slow_query_threshold_ms: u64,
}

impl LoggingInterceptor {
    pub fn new() -> Self {
        Self {
            log_level: LogLevel::Debug,
            slow_query_threshold_ms: 1000,
        }
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_slow_query_threshold(mut self, threshold_ms: u64) -> Self {
        self.slow_query_threshold_ms = threshold_ms;
        self
    }

    pub fn before_execute(&self, ctx: &ExecuteContext) {
        if self.log_level.should_log(LogLevel::Debug) {
            debug!("==>  Preparing: {}", ctx.sql());
            if ctx.params().is_empty() {
                debug!("==>  Parameters: None");
            } else {
                debug!("{}", ctx.params());
            }
        }
    }

    /// `rows` is the row count for selects and the affected count otherwise.
    pub fn after_execute(&self, ctx: &ExecuteContext, result: std::result::Result<u64, &SqlbeanError>) {
        let duration_ms = ctx.elapsed_ms();
        let rows = match result {
            Ok(rows) => rows,
            Err(err) => {
                if self.log_level.should_log(LogLevel::Error) {
                    error!("<==    ERROR: {}", err);
                    error!("<==    Failed SQL: {}", ctx.sql());
                    if self.log_level.should_log(LogLevel::Debug) && !ctx.params().is_empty() {
                        debug!("<==    Failed with params: {:?}", ctx.params());
                    }
                }
                return;
            }
        };
        if duration_ms > self.slow_query_threshold_ms as u128 && self.log_level.should_log(LogLevel::Warn) {
            warn!("<== Slow Query! Cost: {} ms, Rows: {}", duration_ms, rows);
        }
        if self.log_level.should_log(LogLevel::Info) {
            info!("<==      Total: {}, Cost: {} ms", rows, duration_ms);
        }
        if self.log_level.should_log(LogLevel::Trace) {
            trace!("<== {:?} finished in {} ms", ctx.operation_type(), duration_ms);
        }
    }
}

impl Default for LoggingInterceptor {
    fn default() -> Self {
        Self::new()
    }
}
