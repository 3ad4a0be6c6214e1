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
use sqlbean::query::Condition;
use sqlbean::sql::{self, count_params_range, count_sql};

#[derive(Entity, Clone, Default, Debug)]
pub struct UserInfo {
    #[id]
    pub id: Option<String>,
    #[field(name = "user_name")]
    pub name: Option<String>,
    pub age: Option<i32>,
    #[field(exist = false)]
    pub selected: bool,
}

fn user(id: &str, name: Option<&str>, age: Option<i32>) -> UserInfo {
    UserInfo {
        id: Some(id.to_string()),
        name: name.map(ToString::to_string),
        age,
        selected: true,
    }
}

#[test]
fn test_default_table_name() {
    assert_eq!(UserInfo::table_name().name, "tbl_user_info");
}

#[test]
fn test_entity_statements() {
    let table = UserInfo::table_name().name;
    let insert = sql::generate_insert(&table, &user("u1", Some("tom"), None)).unwrap();
    assert_eq!(insert.sql, "insert into tbl_user_info(id,user_name) values (?,?)");
    assert_eq!(insert.params.values(), vec![Value::Text("u1".to_string()), Value::Text("tom".to_string())]);

    let data = sql::all_fields(&user("u1", Some(""), Some(30)), true).unwrap();
    let update = sql::generate_update(&table, &data, "id", true).unwrap();
    assert_eq!(update.sql, "update tbl_user_info set age = ? where id = ?");
    let update = sql::generate_update(&table, &data, "id", false).unwrap();
    assert_eq!(update.sql, "update tbl_user_info set user_name = ?, age = ? where id = ?");
    assert_eq!(update.params.len(), 3);
}

#[test]
fn test_query_conditions() {
    let query = Query::new()
        .table("tbl_user_info")
        .condition(Condition::in_list("id", &["a", "b"]))
        .condition(Condition::between("age", 18, 30))
        .condition(Condition::is_not_null("user_name"))
        .like("user_name", "to", LikeType::Contains);
    let bean = sql::generate_query(&query).unwrap();
    assert_eq!(
        bean.sql,
        "select * from tbl_user_info where id in (?,?) and age between ? and ? and user_name is not null and user_name like ?"
    );
    assert_eq!(bean.params.len(), 5);
    assert_eq!(bean.params.values()[4], Value::Text("%to%".to_string()));

    let none = Query::new().table("t").condition(Condition::in_list::<_, &str>("id", &[]));
    let bean = sql::generate_query(&none).unwrap();
    assert_eq!(bean.sql, "select * from t where 1 = 0");
    assert_eq!(bean.params.len(), 0);
}

#[test]
fn test_count_rewrite() {
    let sql = "SELECT u.id, (select count(*) from tbl_order o where o.uid = u.id order by o.id) c \
               FROM tbl_user_info u WHERE u.user_name <> 'order by' AND u.age > ? ORDER BY u.id LIMIT ? OFFSET ?";
    assert_eq!(
        count_sql(sql).unwrap(),
        "select count(1) FROM tbl_user_info u WHERE u.user_name <> 'order by' AND u.age > ?"
    );
    assert_eq!(count_params_range(sql).unwrap(), 0..1);

    let plain = "select * from t";
    assert_eq!(count_sql(plain).unwrap(), "select count(1) from t");
    assert_eq!(count_params_range("select * from t where a = '?' and b = ?").unwrap(), 0..1);
    assert!(count_sql("update t set a = 1").is_err());
}

#[test]
fn test_like_values() {
    assert_eq!(sql::build_like_value("ab", LikeType::StartWith, false), "ab%");
    assert_eq!(sql::build_like_value("ab", LikeType::EndWith, true), "LIKE %ab");
}
