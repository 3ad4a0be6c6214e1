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
//! Audited records: id, creator and timestamps.
//!
use serde::{Deserialize, Serialize};
use crate::Entity;

/// Records that `BaseDao::batch_save_or_update` can stamp.
pub trait Auditable {
    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    fn set_creater(&mut self, creater: Option<String>);

    fn set_create_time(&mut self, create_time: Option<String>);

    fn set_updater(&mut self, _updater: Option<String>) {}

    fn set_update_time(&mut self, update_time: Option<String>);

    /// No id yet, or a blank one.
    fn is_new(&self) -> bool {
        self.id().map(|id| id.trim().is_empty()).unwrap_or(true)
    }
}

/// Reusable audited record. Embed its fields in your own entity or use it
/// directly for tables that only carry the audit columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Entity, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEntity {
    #[id]
    pub id: Option<String>,
    pub creater: Option<String>,
    pub create_time: Option<String>,
    pub updater: Option<String>,
    pub update_time: Option<String>,
}

impl BaseEntity {
    pub fn new<S: Into<String>>(id: S) -> Self {
        BaseEntity { id: Some(id.into()), ..Default::default() }
    }
}

impl Auditable for BaseEntity {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn set_creater(&mut self, creater: Option<String>) {
        self.creater = creater;
    }

    fn set_create_time(&mut self, create_time: Option<String>) {
        self.create_time = create_time;
    }

    fn set_updater(&mut self, updater: Option<String>) {
        self.updater = updater;
    }

    fn set_update_time(&mut self, update_time: Option<String>) {
        self.update_time = update_time;
    }
}
