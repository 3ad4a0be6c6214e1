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

use std::cell::Cell;
use sqlbean_core::{Params, Rows};
use crate::driver::{execute_each, execute_literals, DbDriver, DbExecutor};
use crate::errors::Result;

/// A started transaction on one pooled connection.
///
/// Commit explicitly; dropping an unfinished transaction rolls it back.
pub struct Transaction {
    conn: DbDriver,
    committed: Cell<bool>,
    rolled_back: Cell<bool>,
}

impl Transaction {
    pub(crate) fn begin(conn: DbDriver) -> Result<Self> {
        conn.start()?;
        Ok(Transaction {
            conn,
            committed: Cell::new(false),
            rolled_back: Cell::new(false),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.committed.get() || self.rolled_back.get()
    }
}

impl Drop for Transaction {
    /// Will rollback transaction.
    fn drop(&mut self) {
        if !self.is_finished() {
            if let Err(err) = self.conn.rollback() {
                tracing::error!("rollback on drop failed: {}", err);
            }
        }
    }
}

impl DbExecutor for Transaction {
    /// Already started by `begin`.
    fn start(&self) -> Result<()> {
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.conn.commit()?;
        self.committed.set(true);
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        self.conn.rollback()?;
        self.rolled_back.set(true);
        Ok(())
    }

    fn query(&self, sql: &str, params: Params) -> Result<Rows> {
        self.conn.query(sql, params)
    }

    fn execute(&self, sql: &str, params: Params) -> Result<u64> {
        self.conn.execute(sql, params)
    }

    fn last_insert_id(&self) -> u64 {
        self.conn.last_insert_id()
    }

    /// Runs inside the open transaction; the caller decides on commit.
    fn execute_batch(&self, sql: &str, batch: &[Params]) -> Result<u64> {
        execute_each(self, sql, batch)
    }

    fn execute_statements(&self, statements: &[String]) -> Result<u64> {
        execute_literals(self, statements)
    }
}
