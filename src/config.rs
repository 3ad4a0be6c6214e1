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

use std::path::Path;
use std::time::Duration;
use serde::Deserialize;
use url::Url;
use crate::errors::{Result, SqlbeanError};
use crate::interceptor::LogLevel;

pub const MEMORY_SOURCE: &str = ":memory:";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriverType {
    /// File path, or `:memory:`.
    Sqlite(String),
    Mysql,
    Unsupported(String),
}

#[derive(Clone, Debug)]
pub struct DataSourceConfig {
    url: String,
    driver: DriverType,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
    idle_timeout: Duration,
    max_lifetime: Duration,
    test_on_check_out: bool,
    slow_query_threshold_ms: u64,
    log_level: LogLevel,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        DataSourceConfig {
            url: String::default(),
            driver: DriverType::Unsupported(String::default()),
            max_size: 16,
            min_idle: None,
            connection_timeout: Duration::from_secs(6),
            idle_timeout: Duration::from_secs(10 * 60),
            max_lifetime: Duration::from_secs(30 * 60),
            test_on_check_out: true,
            slow_query_threshold_ms: 1000,
            log_level: LogLevel::default(),
        }
    }
}

/// `[datasource]` table of a config file.
#[derive(Debug, Deserialize)]
struct DataSourceSection {
    url: String,
    max_size: Option<u32>,
    min_idle: Option<u32>,
    connection_timeout_secs: Option<u64>,
    idle_timeout_secs: Option<u64>,
    max_lifetime_secs: Option<u64>,
    test_on_check_out: Option<bool>,
    slow_query_threshold_ms: Option<u64>,
    log_level: Option<LogLevel>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    datasource: DataSourceSection,
}

impl DataSourceConfig {
    pub fn new<S: Into<String>>(url: S) -> Self {
        DataSourceConfig::default().set_url(url)
    }

    /// Reads the `[datasource]` table of a toml document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let section = file.datasource;
        let mut cfg = DataSourceConfig::new(section.url);
        if let Some(max_size) = section.max_size {
            cfg = cfg.set_max_size(max_size);
        }
        cfg = cfg.set_min_idle(section.min_idle);
        if let Some(secs) = section.connection_timeout_secs {
            cfg = cfg.set_connection_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = section.idle_timeout_secs {
            cfg = cfg.set_idle_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = section.max_lifetime_secs {
            cfg = cfg.set_max_lifetime(Duration::from_secs(secs));
        }
        if let Some(test) = section.test_on_check_out {
            cfg = cfg.set_test_on_check_out(test);
        }
        if let Some(ms) = section.slow_query_threshold_ms {
            cfg = cfg.set_slow_query_threshold_ms(ms);
        }
        if let Some(level) = section.log_level {
            cfg = cfg.set_log_level(level);
        }
        cfg.driver_type()?;
        Ok(cfg)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// parse the url into a driver type
    fn parse_url(url: &str) -> DriverType {
        let trimmed = url.trim();
        if trimmed == "sqlite::memory:" || trimmed == "sqlite://:memory:" {
            return DriverType::Sqlite(MEMORY_SOURCE.to_string());
        }
        match Url::parse(trimmed) {
            Ok(url) => match url.scheme() {
                "mysql" => DriverType::Mysql,
                "sqlite" => {
                    let host = url.host_str().unwrap_or_default();
                    let path = url.path();
                    let path = if path == "/" { "" } else { path };
                    DriverType::Sqlite(format!("{}{}", host, path))
                }
                scheme => DriverType::Unsupported(scheme.to_string()),
            },
            Err(_) => DriverType::Unsupported(trimmed.to_string()),
        }
    }

    pub fn set_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = url.into();
        self.driver = Self::parse_url(&self.url);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The driver for the configured url, `ConfigError` when unsupported.
    pub fn driver_type(&self) -> Result<&DriverType> {
        match &self.driver {
            DriverType::Unsupported(scheme) => Err(SqlbeanError::ConfigError(format!(
                "unsupported datasource url `{}` (scheme `{}`)",
                self.url, scheme
            ))),
            DriverType::Sqlite(path) if path.is_empty() => Err(SqlbeanError::ConfigError(
                "sqlite url needs a file path or :memory:".to_string(),
            )),
            driver => Ok(driver),
        }
    }

    pub fn set_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn set_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    pub fn min_idle(&self) -> Option<u32> {
        self.min_idle
    }

    pub fn set_connection_timeout(mut self, connection_timeout: Duration) -> Self {
        self.connection_timeout = connection_timeout;
        self
    }

    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    pub fn set_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn set_max_lifetime(mut self, max_lifetime: Duration) -> Self {
        self.max_lifetime = max_lifetime;
        self
    }

    pub fn max_lifetime(&self) -> Duration {
        self.max_lifetime
    }

    pub fn set_test_on_check_out(mut self, test_on_check_out: bool) -> Self {
        self.test_on_check_out = test_on_check_out;
        self
    }

    pub fn test_on_check_out(&self) -> bool {
        self.test_on_check_out
    }

    pub fn set_slow_query_threshold_ms(mut self, threshold_ms: u64) -> Self {
        self.slow_query_threshold_ms = threshold_ms;
        self
    }

    pub fn slow_query_threshold_ms(&self) -> u64 {
        self.slow_query_threshold_ms
    }

    pub fn set_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }
}
