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
//! Tests.
//!
use sqlbean::prelude::*;
use sqlbean::PoolStatus;

#[derive(Entity, Clone, Default, Debug, PartialEq)]
#[table(name = "tbl_member")]
pub struct Member {
    #[id]
    pub id: Option<String>,
    #[field(name = "nick_name")]
    pub nick: Option<String>,
    /// 等级 0.普通会员 1.VIP会员
    pub level: Option<i64>,
    #[field(exist = false)]
    pub checked: bool,
}

fn member(id: &str, nick: &str, level: i64) -> Member {
    Member {
        id: Some(id.to_string()),
        nick: Some(nick.to_string()),
        level: Some(level),
        checked: true,
    }
}

fn setup(dir: &tempfile::TempDir) -> BaseDao<Member> {
    let url = format!("sqlite://{}", dir.path().join("member.db").display());
    let cfg = DataSourceConfig::new(url).set_max_size(3).set_log_level(LogLevel::Debug);
    let ds = DataSource::new(cfg).unwrap();
    ds.acquire()
        .unwrap()
        .execute("create table tbl_member (id text primary key, nick_name text, level integer)", Params::None)
        .unwrap();
    BaseDao::new(ds)
}

#[test]
fn test_entity_metadata() {
    assert_eq!(Member::table_name().name, "tbl_member");
    assert_eq!(sqlbean::primary_key::<Member>(), "id");
    assert_eq!(sqlbean::column_names::<Member>(), vec!["id", "nick_name", "level"]);
}

#[test]
fn test_crud_with_renamed_column() {
    let dir = tempfile::tempdir().unwrap();
    let dao = setup(&dir);
    assert_eq!(dao.save(&member("m1", "jack", 0)).unwrap(), 1);

    let mut wheres = ColumnMap::new();
    wheres.insert("nick_name".to_string(), Value::Text("jack".to_string()));
    let found = dao.find_one(&wheres).unwrap().unwrap();
    assert_eq!(found.id.as_deref(), Some("m1"));
    assert_eq!(found.nick.as_deref(), Some("jack"));
    assert!(!found.checked);

    let upgrade = Member { id: Some("m1".to_string()), level: Some(1), ..Default::default() };
    assert_eq!(dao.update_object(&upgrade).unwrap(), 1);
    let found = dao.find_list(&Query::new().eq("id", "m1")).unwrap();
    assert_eq!(found[0].nick.as_deref(), Some("jack"));
    assert_eq!(found[0].level, Some(1));

    let example = Member { level: Some(1), ..Default::default() };
    assert_eq!(dao.find_by_example(&example, None).unwrap().len(), 1);
    assert_eq!(dao.delete_hard("m1").unwrap(), 1);
    assert_eq!(dao.count(&ColumnMap::new()).unwrap(), 0);
}

#[test]
fn test_transaction_rolls_back_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let dao = setup(&dir);
    dao.save(&member("m1", "jack", 0)).unwrap();
    {
        let tx = dao.datasource().start_transaction().unwrap();
        dao.update_object_with(&tx, &member("m1", "rose", 2)).unwrap();
    }
    assert_eq!(dao.find_all(None).unwrap()[0].nick.as_deref(), Some("jack"));

    let tx = dao.datasource().start_transaction().unwrap();
    dao.update_object_with(&tx, &member("m1", "rose", 2)).unwrap();
    tx.commit().unwrap();
    assert!(tx.is_finished());
    drop(tx);
    assert_eq!(dao.find_all(None).unwrap()[0].nick.as_deref(), Some("rose"));
}

#[test]
fn test_paging_over_raw_sql() {
    let dir = tempfile::tempdir().unwrap();
    let dao = setup(&dir);
    let members: Vec<Member> = (1..=12).map(|i| member(&format!("m{:02}", i), "n", i % 3)).collect();
    assert_eq!(dao.batch_save(&members).unwrap(), 12);

    let sql = "select * from tbl_member where level > ? order by id desc";
    let page = dao.search_page_by_sql(sql, vec![Value::Bigint(0)], 5, 2).unwrap();
    assert_eq!(page.total_record, 8);
    assert_eq!(page.total_page, 2);
    assert_eq!(page.data.len(), 3);
    assert_eq!(page.data[0].id.as_deref(), Some("m04"));

    let query = Query::new().order(Order::asc("id")).page(Page::new(3, 5));
    let page = dao.find_page(&query).unwrap();
    assert_eq!(page.total_record, 12);
    assert_eq!(page.total_page, 3);
    assert_eq!(page.data.iter().filter_map(|m| m.id.clone()).collect::<Vec<_>>(), vec!["m11", "m12"]);
}

#[test]
fn test_config_file_and_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.toml");
    let content = format!(
        "[datasource]\nurl = \"sqlite://{}\"\nmax_size = 2\nlog_level = \"info\"\n",
        dir.path().join("cfg.db").display()
    );
    std::fs::write(&path, content).unwrap();
    let cfg = DataSourceConfig::from_file(&path).unwrap();
    assert_eq!(cfg.max_size(), 2);
    let ds = DataSource::new(cfg).unwrap();
    let status: PoolStatus = ds.status();
    assert_eq!(status.max_size, 2);
    assert!(status.available <= status.size);
}
