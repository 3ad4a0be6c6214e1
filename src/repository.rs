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

use sqlbean_core::{FromValue, GetFields, GetTableName, IntoValue, Value};
use crate::dao::BaseDao;
use crate::errors::{Result, SqlbeanError};
use crate::query::{PageResult, Query};
use crate::sql::ColumnMap;

/// Entity level operations, independent of how they are stored.
pub trait Repository<T> {
    /// Inserts the non-null fields of `entity`.
    fn save(&self, entity: &T) -> Result<u64>;

    /// Updates the non-empty fields by primary key.
    fn update_object(&self, entity: &T) -> Result<u64>;

    fn delete_hard(&self, id: Value) -> Result<u64>;

    fn find_one(&self, wheres: &ColumnMap) -> Result<Option<T>>;

    fn find_list(&self, query: &Query) -> Result<Vec<T>>;

    fn find_page(&self, query: &Query) -> Result<PageResult<T>>;

    /// Exactly one row of `query`.
    fn find_single(&self, query: &Query) -> Result<T> {
        let mut rows = self.find_list(query)?;
        match rows.len() {
            0 => Err(SqlbeanError::DataError("Empty record returned".to_string())),
            1 => Ok(rows.remove(0)),
            _ => Err(SqlbeanError::DataError("More than one record returned".to_string())),
        }
    }
}

impl<T> Repository<T> for BaseDao<T>
where
    T: GetTableName + GetFields + IntoValue + FromValue,
{
    fn save(&self, entity: &T) -> Result<u64> {
        BaseDao::save(self, entity)
    }

    fn update_object(&self, entity: &T) -> Result<u64> {
        BaseDao::update_object(self, entity)
    }

    fn delete_hard(&self, id: Value) -> Result<u64> {
        BaseDao::delete_hard(self, id)
    }

    fn find_one(&self, wheres: &ColumnMap) -> Result<Option<T>> {
        BaseDao::find_one(self, wheres)
    }

    fn find_list(&self, query: &Query) -> Result<Vec<T>> {
        BaseDao::find_list(self, query)
    }

    fn find_page(&self, query: &Query) -> Result<PageResult<T>> {
        BaseDao::find_page(self, query)
    }
}

#[cfg(all(test, feature = "sqlite-sync"))]
mod tests {
    use super::*;
    use crate::config::DataSourceConfig;
    use crate::pool::DataSource;
    use crate::driver::DbExecutor;
    use crate::Entity;
    use sqlbean_core::Params;

    #[derive(Debug, Clone, Default, PartialEq, Entity)]
    struct Tag {
        #[id]
        id: i64,
        label: String,
    }

    fn store(repo: &dyn Repository<Tag>) -> Result<u64> {
        repo.save(&Tag { id: 1, label: "rust".to_string() })?;
        repo.save(&Tag { id: 2, label: "sql".to_string() })
    }

    #[test]
    fn test_repository_through_trait_object() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("repo.db").display());
        let ds = DataSource::new(DataSourceConfig::new(url)).unwrap();
        ds.acquire()
            .unwrap()
            .execute("create table tbl_tag (id integer primary key, label text)", Params::None)
            .unwrap();
        let dao: BaseDao<Tag> = BaseDao::new(ds);
        assert_eq!(store(&dao).unwrap(), 1);

        let repo: &dyn Repository<Tag> = &dao;
        let tag = repo.find_single(&Query::new().eq("label", "sql")).unwrap();
        assert_eq!(tag.id, 2);
        assert!(repo.find_single(&Query::new()).is_err());
        assert_eq!(repo.update_object(&Tag { id: 2, label: "db".to_string() }).unwrap(), 1);
        assert_eq!(repo.find_page(&Query::new()).unwrap().total_record, 2);
        assert_eq!(repo.delete_hard(Value::Bigint(1)).unwrap(), 1);
        assert_eq!(repo.find_list(&Query::new()).unwrap(), vec![Tag { id: 2, label: "db".to_string() }]);
    }
}
