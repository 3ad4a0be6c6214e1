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

//! Sqlbean is a small ORM layer: metadata driven SQL generation over an r2d2
//! connection pool, plus a handful of everyday helpers.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! sqlbean = "0.1.0"
//! ```
//!
//! ## Feature.
//!
//! * ```sqlite-sync``` - to use sqlite (default)
//! * ```mysql-sync``` - to use mysql
//! * ```auth``` - JWT identities and the access interceptor
//! * ```http``` - blocking http client
//!
//! ## Annotations.
//! * table - table name of the struct. default `tbl_` + snake case struct name.
//! * id - the primary key column.
//! * field - `name` to rename the column, `exist = false` to keep the field out of SQL.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlbean::prelude::*;
//!
//! #[derive(Entity, Clone, Default, Debug)]
//! #[table(name = "tbl_user")]
//! pub struct User {
//!     #[id]
//!     pub id: Option<String>,
//!     pub name: Option<String>,
//!     pub age: Option<i32>,
//!     #[field(exist = false)]
//!     pub checked: bool,
//! }
//!
//! fn main() -> sqlbean::Result<()> {
//!     let cfg = DataSourceConfig::new("sqlite://./app.db").set_max_size(4);
//!     let dao: BaseDao<User> = BaseDao::new(DataSource::new(cfg)?);
//!     dao.save(&User { id: Some(sqlbean::id::generate_uuid()), name: Some("Jack".into()), ..Default::default() })?;
//!     let page = dao.find_page(&Query::new().eq("name", "Jack").order(Order::desc("age")).page(Page::new(1, 10)))?;
//!     let total = dao.total_record("select * from tbl_user where age > ? order by age limit 5", vec![Value::Int(18)])?;
//!     Ok(())
//! }
//! ```
#[cfg(not(any(feature = "sqlite-sync", feature = "mysql-sync")))]
compile_error!("enable at least one driver feature: `sqlite-sync` or `mysql-sync`");

extern crate self as sqlbean;

mod errors;
pub mod config;
pub mod interceptor;
pub mod driver;
pub mod pool;
mod transaction;
pub mod sql;
pub mod query;
pub mod dao;
mod repository;
pub mod entity;
pub mod id;
pub mod date;
pub mod bean;
pub mod list;
#[cfg(feature = "auth")]
pub mod security;
#[cfg(feature = "http")]
pub mod http;
pub mod prelude;

#[doc(inline)]
pub use sqlbean_core as core;
#[doc(inline)]
pub use sqlbean_core::{
    column_names, naming, params, primary_key, ConversionError, DataError, FieldName, FieldType, FromValue,
    GetFields, GetTableName, IntoValue, Params, Row, Rows, TableName, Value,
};
#[doc(inline)]
pub use sqlbean_derive::Entity;
#[doc(inline)]
pub use errors::{BusinessError, Result, SqlbeanError};
#[doc(inline)]
pub use config::{DataSourceConfig, DriverType};
#[doc(inline)]
pub use interceptor::{LogLevel, LoggingInterceptor};
#[doc(inline)]
pub use driver::{DbDriver, DbExecutor};
#[doc(inline)]
pub use pool::{DataSource, PoolStatus};
#[doc(inline)]
pub use transaction::Transaction;
#[doc(inline)]
pub use sql::SqlAndParams;
#[doc(inline)]
pub use query::{Condition, Direction, LikeType, Operator, Order, Page, PageResult, Query};
#[doc(inline)]
pub use dao::{BaseDao, SaveOrUpdateResult};
#[doc(inline)]
pub use repository::Repository;
#[doc(inline)]
pub use entity::{Auditable, BaseEntity};
