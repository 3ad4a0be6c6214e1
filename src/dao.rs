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
//! Table level data access built on the SQL generators.
//!
use std::marker::PhantomData;
use sqlbean_core::{column_names, primary_key, FromValue, GetFields, GetTableName, IntoValue, Params, Rows, Value};
use crate::date;
use crate::driver::DbExecutor;
use crate::entity::Auditable;
use crate::errors::Result;
use crate::id;
use crate::pool::DataSource;
use crate::query::{Page, PageResult, Query};
use crate::sql::{
    all_fields, count_params_range, count_sql, generate_batch_delete, generate_batch_insert, generate_batch_update,
    generate_batch_update_literals, generate_count_base, generate_delete, generate_insert, generate_query,
    generate_query_base, generate_query_count, generate_update, generate_update_by_conditions, page_params, ColumnMap,
    SqlAndParams,
};

/// Rows written by `BaseDao::batch_save_or_update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOrUpdateResult {
    pub saved: u64,
    pub updated: u64,
}

/// Data access for one entity type over a `DataSource`.
///
/// The table defaults to the entity's table name; the primary column is the
/// `#[id]` field.
pub struct BaseDao<T> {
    datasource: DataSource,
    table_name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for BaseDao<T> {
    fn clone(&self) -> Self {
        BaseDao {
            datasource: self.datasource.clone(),
            table_name: self.table_name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> BaseDao<T>
where
    T: GetTableName + GetFields,
{
    pub fn new(datasource: DataSource) -> Self {
        BaseDao {
            datasource,
            table_name: T::table_name().complete_name(),
            _marker: PhantomData,
        }
    }

    /// Bound to the process-wide data source.
    pub fn from_global() -> Result<Self> {
        Ok(Self::new(DataSource::global()?.clone()))
    }

    pub fn set_table_name<S: Into<String>>(mut self, table_name: S) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn datasource(&self) -> &DataSource {
        &self.datasource
    }

    pub fn primary(&self) -> String {
        primary_key::<T>()
    }
}

impl<T> BaseDao<T>
where
    T: GetTableName + GetFields + IntoValue + FromValue,
{
    fn execute(&self, statement: SqlAndParams) -> Result<u64> {
        self.datasource.acquire()?.execute(&statement.sql, statement.params)
    }

    fn select(&self, statement: SqlAndParams) -> Result<Rows> {
        self.datasource.acquire()?.query(&statement.sql, statement.params)
    }

    /// Runs prepared batches inside one transaction.
    fn execute_batches(&self, statements: Vec<SqlAndParams>) -> Result<u64> {
        if statements.is_empty() {
            return Ok(0);
        }
        let tx = self.datasource.start_transaction()?;
        let mut affected = 0;
        for statement in &statements {
            affected += tx.execute_batch(&statement.sql, &statement.batch_params)?;
        }
        tx.commit()?;
        tracing::debug!("batch on {}: {} statements, {} rows", self.table_name, statements.len(), affected);
        Ok(affected)
    }

    /// Inserts the non-null fields of `entity`.
    pub fn save(&self, entity: &T) -> Result<u64> {
        self.save_into(&self.table_name, entity)
    }

    pub fn save_into(&self, table_name: &str, entity: &T) -> Result<u64> {
        self.execute(generate_insert(table_name, entity)?)
    }

    /// Inserts all rows with the first row's columns, in one transaction.
    pub fn batch_save(&self, entities: &[T]) -> Result<u64> {
        if entities.is_empty() {
            return Ok(0);
        }
        self.execute_batches(vec![generate_batch_insert(&self.table_name, entities)?])
    }

    pub fn update_map(&self, data: &ColumnMap, primary: &str, filter_null: bool) -> Result<u64> {
        self.execute(generate_update(&self.table_name, data, primary, filter_null)?)
    }

    /// Sets the non-empty fields of `entity` on the rows matching `wheres`.
    pub fn update_by_conditions(&self, entity: &T, wheres: &ColumnMap) -> Result<u64> {
        self.execute(generate_update_by_conditions(&self.table_name, entity, wheres)?)
    }

    /// Any statement with positional params.
    pub fn execute_sql<P: Into<Params>>(&self, sql: &str, params: P) -> Result<u64> {
        self.datasource.acquire()?.execute(sql, params.into())
    }

    /// Updates the non-empty fields by primary key.
    pub fn update_object(&self, entity: &T) -> Result<u64> {
        let conn = self.datasource.acquire()?;
        self.update_object_with(&conn, entity)
    }

    /// `update_object` on a caller supplied executor, e.g. an open transaction.
    pub fn update_object_with<E: DbExecutor + ?Sized>(&self, conn: &E, entity: &T) -> Result<u64> {
        let update = generate_update(&self.table_name, &all_fields(entity, true)?, &self.primary(), true)?;
        conn.execute(&update.sql, update.params)
    }

    /// Updates every field, nulls included.
    pub fn update_object_all_fields(&self, entity: &T) -> Result<u64> {
        self.execute(generate_update(&self.table_name, &all_fields(entity, true)?, &self.primary(), false)?)
    }

    pub fn batch_update(&self, entities: &[T]) -> Result<u64> {
        self.execute_batches(generate_batch_update(&self.table_name, entities, &self.primary(), false)?)
    }

    pub fn batch_update_all_fields(&self, entities: &[T]) -> Result<u64> {
        self.execute_batches(generate_batch_update(&self.table_name, entities, &self.primary(), true)?)
    }

    /// One literal statement per entity, in one transaction.
    pub fn batch_update_literals(&self, entities: &[T]) -> Result<u64> {
        let statements = generate_batch_update_literals(&self.table_name, entities, &self.primary())?;
        if statements.is_empty() {
            return Ok(0);
        }
        self.datasource.acquire()?.execute_statements(&statements)
    }

    /// Inserts entities without an id and updates the rest, in one transaction.
    ///
    /// New entities get a fresh id and `create_time`. Existing ones lose
    /// `creater` and `create_time` so those columns are left untouched, and
    /// get a new `update_time`.
    pub fn batch_save_or_update(&self, entities: &mut [T]) -> Result<SaveOrUpdateResult>
    where
        T: Auditable,
    {
        let primary = self.primary();
        let now = date::now();
        let tx = self.datasource.start_transaction()?;
        let mut result = SaveOrUpdateResult::default();
        for entity in entities.iter_mut() {
            if entity.is_new() {
                entity.set_id(id::generate_uuid());
                entity.set_create_time(Some(now.clone()));
                let insert = generate_insert(&self.table_name, &*entity)?;
                tx.execute(&insert.sql, insert.params)?;
                result.saved += 1;
            } else {
                entity.set_creater(None);
                entity.set_create_time(None);
                entity.set_update_time(Some(now.clone()));
                self.update_object_with(&tx, &*entity)?;
                result.updated += 1;
            }
        }
        tx.commit()?;
        tracing::debug!("save or update on {}: {:?}", self.table_name, result);
        Ok(result)
    }

    /// Deletes the rows matching every entry of `wheres`.
    pub fn delete(&self, wheres: &ColumnMap) -> Result<u64> {
        self.execute(generate_delete(&self.table_name, wheres)?)
    }

    /// `delete ... where id in (...)`
    pub fn batch_delete<V: IntoValue>(&self, ids: &[V]) -> Result<u64> {
        self.execute(generate_batch_delete(&self.table_name, &self.primary(), ids)?)
    }

    pub fn delete_hard<V: IntoValue>(&self, id: V) -> Result<u64> {
        let mut wheres = ColumnMap::new();
        wheres.insert(self.primary(), id.into_value());
        self.delete(&wheres)
    }

    /// One `delete ... where id = ?` per id, in one transaction.
    pub fn delete_batch_hard<V: IntoValue>(&self, ids: &[V]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!("delete from {} where {} = ?", self.table_name, self.primary());
        let batch = ids.iter().map(|id| Params::Positional(vec![id.into_value()])).collect();
        self.execute_batches(vec![SqlAndParams::batch(sql, batch)])
    }

    pub fn delete_by_sql<P: Into<Params>>(&self, sql: &str, params: P) -> Result<u64> {
        self.execute_sql(sql, params)
    }

    /// Rows matching `wheres`, mapped to `T`.
    pub fn search(&self, wheres: &ColumnMap) -> Result<Vec<T>> {
        let rows = self.select(generate_query_base(&self.table_name, &column_names::<T>(), wheres, None, None)?)?;
        Ok(rows.to_list()?)
    }

    /// Rows matching `wheres` as column maps.
    pub fn search_maps(&self, wheres: &ColumnMap) -> Result<Vec<Value>> {
        let rows = self.select(generate_query_base(&self.table_name, &[], wheres, None, None)?)?;
        Ok(rows.into_objects())
    }

    pub fn search_by_sql<P: Into<Params>>(&self, sql: &str, params: P) -> Result<Vec<T>> {
        let rows = self.datasource.acquire()?.query(sql, params.into())?;
        Ok(rows.to_list()?)
    }

    /// Runs `sql` with ` limit ? offset ?` appended and counts the whole result.
    pub fn search_page_by_sql(&self, sql: &str, params: Vec<Value>, page_size: u64, page_number: u64) -> Result<PageResult<T>> {
        let page = Page::new(page_number, page_size);
        let total = self.total_record(sql, params.clone())?;
        if total == 0 {
            return Ok(PageResult::new(page.page_number, page.page_size, 0, Vec::new()));
        }
        let mut paged = params;
        paged.extend(page_params(&page)?);
        let data = self.search_by_sql(&format!("{} limit ? offset ?", sql.trim_end()), paged)?;
        Ok(PageResult::new(page.page_number, page.page_size, total, data))
    }

    pub fn find_one(&self, wheres: &ColumnMap) -> Result<Option<T>> {
        let rows = self.select(generate_query_base(&self.table_name, &column_names::<T>(), wheres, None, None)?)?;
        match rows.first() {
            Some(row) => Ok(Some(T::from_value_opt(&row.as_object())?)),
            None => Ok(None),
        }
    }

    /// Every row of the table.
    pub fn find_all(&self, order_by: Option<&str>) -> Result<Vec<T>> {
        let rows = self.select(generate_query_base(&self.table_name, &column_names::<T>(), &ColumnMap::new(), order_by, None)?)?;
        Ok(rows.to_list()?)
    }

    /// Rows matching the non-null fields of `example`.
    pub fn find_by_example(&self, example: &T, order_by: Option<&str>) -> Result<Vec<T>> {
        let wheres = all_fields(example, false)?;
        let rows = self.select(generate_query_base(&self.table_name, &column_names::<T>(), &wheres, order_by, None)?)?;
        Ok(rows.to_list()?)
    }

    fn with_default_table(&self, query: &Query) -> Query {
        let mut query = query.clone();
        if query.tables.is_empty() {
            query.set_tables(vec![self.table_name.clone()]);
        }
        query
    }

    /// One page of `query`; a query without a page uses the default one.
    pub fn find_page(&self, query: &Query) -> Result<PageResult<T>> {
        let mut query = self.with_default_table(query);
        let page = query.page.unwrap_or_default();
        let conn = self.datasource.acquire()?;
        let count = generate_query_count(&query)?;
        let total = conn.query_count(&count.sql, count.params)?;
        if total == 0 {
            return Ok(PageResult::new(page.page_number, page.page_size, 0, Vec::new()));
        }
        query.page = Some(Page::new(page.page_number, page.page_size));
        let select = generate_query(&query)?;
        let rows = conn.query(&select.sql, select.params)?;
        Ok(PageResult::new(page.page_number, page.page_size, total, rows.to_list()?))
    }

    pub fn find_list(&self, query: &Query) -> Result<Vec<T>> {
        let query = self.with_default_table(query);
        Ok(self.select(generate_query(&query)?)?.to_list()?)
    }

    /// Row count of an arbitrary select, ignoring its order and paging.
    pub fn total_record(&self, sql: &str, params: Vec<Value>) -> Result<u64> {
        let count = count_sql(sql)?;
        let range = count_params_range(sql)?;
        let bound: Vec<Value> = params.into_iter().skip(range.start).take(range.len()).collect();
        self.datasource.acquire()?.query_count(&count, Params::from(bound))
    }

    /// Rows matching `wheres`.
    pub fn count(&self, wheres: &ColumnMap) -> Result<u64> {
        let count = generate_count_base(&self.table_name, wheres)?;
        self.datasource.acquire()?.query_count(&count.sql, count.params)
    }
}

#[cfg(all(test, feature = "sqlite-sync"))]
mod tests {
    use super::*;
    use crate::config::DataSourceConfig;
    use crate::errors::SqlbeanError;
    use crate::query::{Condition, Order};
    use crate::Entity;

    #[derive(Debug, Clone, Default, PartialEq, Entity)]
    #[table(name = "tbl_note")]
    struct Note {
        #[id]
        id: Option<String>,
        title: Option<String>,
        score: Option<i64>,
        creater: Option<String>,
        create_time: Option<String>,
        update_time: Option<String>,
    }

    impl Auditable for Note {
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

        fn set_update_time(&mut self, update_time: Option<String>) {
            self.update_time = update_time;
        }
    }

    fn note(id: &str, title: &str, score: i64) -> Note {
        Note {
            id: Some(id.to_string()),
            title: Some(title.to_string()),
            score: Some(score),
            ..Default::default()
        }
    }

    fn dao(dir: &tempfile::TempDir) -> BaseDao<Note> {
        let url = format!("sqlite://{}", dir.path().join("dao.db").display());
        let ds = DataSource::new(DataSourceConfig::new(url).set_max_size(2)).unwrap();
        ds.acquire()
            .unwrap()
            .execute(
                "create table tbl_note (id text primary key, title text, score integer, creater text, create_time text, update_time text)",
                Params::None,
            )
            .unwrap();
        BaseDao::new(ds)
    }

    fn by_id(id: &str) -> ColumnMap {
        let mut wheres = ColumnMap::new();
        wheres.insert("id".to_string(), Value::Text(id.to_string()));
        wheres
    }

    #[test]
    fn test_save_find_update_delete() {
        let dir = tempfile::tempdir().unwrap();
        let dao = dao(&dir);
        assert_eq!(dao.table_name(), "tbl_note");
        assert_eq!(dao.primary(), "id");
        assert_eq!(dao.save(&note("n1", "first", 1)).unwrap(), 1);
        let found = dao.find_one(&by_id("n1")).unwrap().unwrap();
        assert_eq!(found.title.as_deref(), Some("first"));

        let patch = Note { id: Some("n1".to_string()), score: Some(7), ..Default::default() };
        assert_eq!(dao.update_object(&patch).unwrap(), 1);
        let found = dao.find_one(&by_id("n1")).unwrap().unwrap();
        assert_eq!(found.title.as_deref(), Some("first"));
        assert_eq!(found.score, Some(7));

        assert_eq!(dao.update_object_all_fields(&patch).unwrap(), 1);
        assert_eq!(dao.find_one(&by_id("n1")).unwrap().unwrap().title, None);

        assert_eq!(dao.delete_hard("n1").unwrap(), 1);
        assert_eq!(dao.find_one(&by_id("n1")).unwrap(), None);
        assert!(matches!(dao.delete(&ColumnMap::new()), Err(SqlbeanError::InvalidSQL(_))));
    }

    #[test]
    fn test_batches_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let dao = dao(&dir);
        let notes: Vec<Note> = (1..=5).map(|i| note(&format!("n{}", i), "t", i)).collect();
        assert_eq!(dao.batch_save(&notes).unwrap(), 5);
        assert_eq!(dao.count(&ColumnMap::new()).unwrap(), 5);

        let mut changed = notes.clone();
        changed[0].title = Some("changed".to_string());
        changed[1].score = None;
        assert_eq!(dao.batch_update(&changed[..2]).unwrap(), 2);
        assert_eq!(dao.find_one(&by_id("n2")).unwrap().unwrap().score, Some(2));
        assert_eq!(dao.batch_update_all_fields(&changed[1..2]).unwrap(), 1);
        assert_eq!(dao.find_one(&by_id("n2")).unwrap().unwrap().score, None);

        changed[2].title = Some("it's".to_string());
        assert_eq!(dao.batch_update_literals(&changed[2..3]).unwrap(), 1);
        assert_eq!(dao.find_one(&by_id("n3")).unwrap().unwrap().title.as_deref(), Some("it's"));

        assert_eq!(dao.batch_delete(&["n4", "n5"]).unwrap(), 2);
        assert_eq!(dao.delete_batch_hard(&["n3"]).unwrap(), 1);
        assert_eq!(dao.find_all(Some("id desc")).unwrap().len(), 2);
        let mut wheres = ColumnMap::new();
        wheres.insert("title".to_string(), Value::Text("changed".to_string()));
        assert_eq!(dao.search(&wheres).unwrap().len(), 1);
        assert_eq!(dao.search_maps(&wheres).unwrap()[0].get_obj::<String>("id").unwrap(), "n1");
    }

    #[test]
    fn test_batch_insert_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let dao = dao(&dir);
        dao.save(&note("dup", "t", 1)).unwrap();
        let notes = vec![note("a", "t", 1), note("dup", "t", 2)];
        assert!(dao.batch_save(&notes).is_err());
        assert_eq!(dao.count(&ColumnMap::new()).unwrap(), 1);
    }

    #[test]
    fn test_save_or_update() {
        let dir = tempfile::tempdir().unwrap();
        let dao = dao(&dir);
        let mut existing = note("n1", "old", 1);
        existing.creater = Some("alice".to_string());
        existing.create_time = Some("20200101000000000".to_string());
        dao.save(&existing).unwrap();

        existing.title = Some("new".to_string());
        let mut batch = vec![existing, Note { title: Some("fresh".to_string()), ..Default::default() }];
        let result = dao.batch_save_or_update(&mut batch).unwrap();
        assert_eq!(result, SaveOrUpdateResult { saved: 1, updated: 1 });
        assert_eq!(batch[1].id.as_ref().map(String::len), Some(32));
        assert_eq!(batch[1].create_time.as_ref().map(String::len), Some(17));

        let stored = dao.find_one(&by_id("n1")).unwrap().unwrap();
        assert_eq!(stored.title.as_deref(), Some("new"));
        assert_eq!(stored.creater.as_deref(), Some("alice"));
        assert_eq!(stored.create_time.as_deref(), Some("20200101000000000"));
        assert!(stored.update_time.is_some());
        assert_eq!(dao.count(&ColumnMap::new()).unwrap(), 2);
    }

    #[test]
    fn test_pages() {
        let dir = tempfile::tempdir().unwrap();
        let dao = dao(&dir);
        let notes: Vec<Note> = (1..=7).map(|i| note(&format!("n{}", i), if i % 2 == 0 { "even" } else { "odd" }, i)).collect();
        dao.batch_save(&notes).unwrap();

        let query = Query::new()
            .condition(Condition::ge("score", 2))
            .order(Order::desc("score"))
            .page(Page::new(2, 4));
        let page = dao.find_page(&query).unwrap();
        assert_eq!(page.total_record, 6);
        assert_eq!(page.total_page, 2);
        assert_eq!(page.data.iter().map(|n| n.score.unwrap_or_default()).collect::<Vec<_>>(), vec![3, 2]);

        let empty = dao.find_page(&Query::new().eq("title", "none")).unwrap();
        assert_eq!(empty.total_record, 0);
        assert!(empty.data.is_empty());

        assert_eq!(dao.find_list(&Query::new().eq("title", "even")).unwrap().len(), 3);

        let sql = "select * from tbl_note where title = ? order by score";
        let paged = dao.search_page_by_sql(sql, vec![Value::Text("odd".to_string())], 3, 1).unwrap();
        assert_eq!(paged.total_record, 4);
        assert_eq!(paged.data.len(), 3);
        assert_eq!(paged.data[0].score, Some(1));
        assert_eq!(dao.total_record("select id from tbl_note order by id limit 2", vec![]).unwrap(), 7);
        assert_eq!(dao.search_by_sql("select * from tbl_note where score > ?", (5,)).unwrap().len(), 2);
        assert_eq!(dao.execute_sql("update tbl_note set title = ? where score = ?", ("x", 1)).unwrap(), 1);
        assert_eq!(dao.delete_by_sql("delete from tbl_note where title = ?", ("x",)).unwrap(), 1);
        assert_eq!(dao.update_by_conditions(&Note { title: Some("y".to_string()), ..Default::default() }, &by_id("n2")).unwrap(), 1);
    }

    #[test]
    fn test_select_list_placeholders_are_not_counted() {
        let dir = tempfile::tempdir().unwrap();
        let dao = dao(&dir);
        let notes: Vec<Note> = (1..=4).map(|i| note(&format!("n{}", i), if i < 4 { "t" } else { "u" }, i)).collect();
        dao.batch_save(&notes).unwrap();

        let sql = "select case when score > ? then 1 else 0 end as hi, id, title, score, creater, create_time, update_time \
                   from tbl_note where title = ? order by id";
        let params = vec![Value::Bigint(1), Value::Text("t".to_string())];
        assert_eq!(dao.total_record(sql, params.clone()).unwrap(), 3);
        let page = dao.search_page_by_sql(sql, params, 2, 2).unwrap();
        assert_eq!(page.total_record, 3);
        assert_eq!(page.total_page, 2);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id.as_deref(), Some("n3"));
    }

    #[test]
    fn test_page_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let dao = dao(&dir);
        dao.save(&note("n1", "t", 1)).unwrap();
        let sql = "select * from tbl_note";
        let result = dao.search_page_by_sql(sql, vec![], 10, u64::MAX / 2);
        assert!(matches!(result, Err(SqlbeanError::InvalidSQL(_))));
        let query = Query::new().page(Page::new(u64::MAX / 2, 10));
        assert!(matches!(dao.find_page(&query), Err(SqlbeanError::InvalidSQL(_))));
    }

    #[test]
    fn test_literal_batch_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let dao = dao(&dir);
        dao.batch_save(&[note("n1", "a", 1), note("n2", "b", 2), note("n3", "taken", 3)]).unwrap();
        dao.datasource()
            .acquire()
            .unwrap()
            .execute("create unique index idx_note_title on tbl_note (title)", Params::None)
            .unwrap();

        let changed = vec![note("n1", "renamed", 1), note("n2", "taken", 2)];
        assert!(dao.batch_update_literals(&changed).is_err());
        assert_eq!(dao.find_one(&by_id("n1")).unwrap().unwrap().title.as_deref(), Some("a"));
        assert_eq!(dao.find_one(&by_id("n2")).unwrap().unwrap().title.as_deref(), Some("b"));
    }
}
