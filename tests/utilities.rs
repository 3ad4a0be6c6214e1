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
use sqlbean::bean::{self, yes_no};
use sqlbean::date::{self, DATE_TIME, YMDHMS, YMDHMS_SSS};
use sqlbean::id;
use sqlbean::prelude::*;
use sqlbean::DataError;

#[derive(Entity, Clone, Default, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[table(name = "tbl_goods")]
pub struct Goods {
    #[id]
    pub id: Option<String>,
    pub title: Option<String>,
    pub stock: i64,
    #[field(exist = false)]
    #[serde(with = "yes_no")]
    pub on_sale: bool,
}

fn fill<L: MyList<String>>(list: &mut L, n: usize) {
    for i in 0..n {
        list.add(format!("item{}", i));
    }
}

#[test]
fn test_list_through_trait() {
    let mut list = ArrayList::new();
    fill(&mut list, 3);
    assert_eq!(list.size(), 3);
    assert!(list.contains(&"item2".to_string()));
    let err = list.get(3).unwrap_err();
    assert_eq!(err, DataError::IndexOutOfBounds(3, 3));
    assert_eq!(err.to_string(), "IndexOutOfBoundsException: Index: 3, Size: 3");
    list.insert(3, "tail".to_string()).unwrap();
    assert_eq!(list.remove(3).unwrap(), "tail");
    assert_eq!(list.into_vec().len(), 3);
}

#[test]
fn test_entity_maps_and_json() {
    let goods = Goods { id: Some("g1".to_string()), title: None, stock: 5, on_sale: true };
    let map = bean::object_to_map(&goods).unwrap();
    assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec!["id", "title", "stock"]);
    assert_eq!(map.get("title"), Some(&Value::Null));

    let back: Goods = bean::map_to_object(&map).unwrap();
    assert_eq!(back, Goods { on_sale: false, ..goods.clone() });

    let json = bean::to_json(&goods).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["on_sale"], "Y");
    assert_eq!(parsed["title"], serde_json::Value::Null);
    let list: Vec<Goods> = bean::json_to_list(&format!("[{}]", json)).unwrap();
    assert_eq!(list, vec![goods]);
}

#[test]
fn test_ids() {
    let server = id::generate_server_id();
    assert!(server.starts_with("CN_"));
    assert_eq!(server.len(), 9);
    let user = id::generate_user_id(&server, "USER");
    assert!(id::is_user_id_right(&user, &server));
    assert_eq!(id::server_id_from_user_id(&user), Some(server));
    assert_eq!(id::user_id_postfix(&user).len(), 32);
    assert_eq!(id::type_from_id(&id::generate_id("CN", "SH", "ORDER")), Some("ORDER"));
}

#[test]
fn test_date_windows() {
    let start = date::date_to_timestamp("20200713080000000", YMDHMS_SSS).unwrap();
    let end = start + 10 * 60_000;
    let pieces = date::split_by_minute(start, end, 3).unwrap();
    assert_eq!(pieces.len(), 4);
    assert_eq!(pieces[3].end_date_time, end);
    assert_eq!(pieces[3].end_date_time - pieces[3].start_date_time, 60_000);
    assert!(pieces[0].is_between(start));
    assert!(!pieces[0].is_between(pieces[1].start_date_time));
    assert_eq!(pieces[1].start_str(YMDHMS).unwrap(), "20200713080300");
    assert!(date::split_by_second(end, start, 1).is_none());
    assert!(date::split_by_hour(start, end, 0).is_none());

    assert_eq!(date::time_str_to_date_str("20200713080000").unwrap(), "2020-07-13 08:00:00.000");
    let dt = date::parse("2020-07-13 08:00:00", DATE_TIME).unwrap();
    assert_eq!(date::format(&dt, YMDHMS), "20200713080000");
    assert!(date::parse("not a date", DATE_TIME).is_err());
}
