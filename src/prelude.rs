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

//! Common imports: `use sqlbean::prelude::*;`
pub use sqlbean_core::{params, FromValue, GetFields, GetTableName, IntoValue, Params, Row, Rows, Value};
pub use sqlbean_derive::Entity;
pub use crate::config::{DataSourceConfig, DriverType};
pub use crate::dao::{BaseDao, SaveOrUpdateResult};
pub use crate::driver::DbExecutor;
pub use crate::entity::{Auditable, BaseEntity};
pub use crate::errors::{BusinessError, SqlbeanError};
pub use crate::interceptor::LogLevel;
pub use crate::list::{ArrayList, MyList};
pub use crate::pool::DataSource;
pub use crate::query::{Condition, LikeType, Order, Page, PageResult, Query};
pub use crate::repository::Repository;
pub use crate::sql::ColumnMap;
pub use crate::transaction::Transaction;
#[cfg(feature = "auth")]
pub use crate::security::{AccessInterceptor, Identity, SecurityProperties};
#[cfg(feature = "http")]
pub use crate::http::{HttpClient, HttpResult};
