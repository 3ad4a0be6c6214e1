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

mod row;
mod rows;
mod column_index;

pub use row::*;
pub use rows::*;
pub use column_index::*;

#[cfg(test)]
mod tests {
    use crate::Value;
    use super::*;

    fn sample() -> Rows {
        let mut rows = Rows::new();
        rows.push(Row::new(
            vec!["id".to_string(), "name".to_string()],
            vec![Value::Int(1), Value::Text("Alice".to_string())],
        ));
        rows.push(Row::new(
            vec!["id".to_string(), "name".to_string()],
            vec![Value::Int(2), Value::Text("Bob".to_string())],
        ));
        rows
    }

    #[test]
    fn test_rows_creation() {
        let rows = Rows::new();
        assert!(rows.is_empty());
        assert_eq!(rows.len(), 0);
    }

    #[test]
    fn test_row_operations() {
        let row = Row::new(
            vec!["id".to_string(), "name".to_string()],
            vec![Value::Int(1), Value::Text("test".to_string())],
        );
        assert_eq!(row.len(), 2);
        assert!(row.contains_column("id"));
        assert!(!row.contains_column("nonexistent"));
        assert_eq!(row.get::<i32, _>(0), Some(1));
        assert_eq!(row.get::<i32, _>("ID"), Some(1));
        assert_eq!(row.get_by_column::<String>("name"), Some("test".to_string()));
    }

    #[test]
    fn test_rows_iteration() {
        let rows = sample();
        let mut count = 0;
        for row in &rows {
            assert_eq!(row.len(), 2);
            count += 1;
        }
        assert_eq!(count, 2);
        let objects = rows.to_objects();
        assert_eq!(objects[1].get_obj::<String>("name").unwrap(), "Bob");
    }

    #[test]
    fn test_rows_display() {
        let rows = sample();
        let text = rows.to_string();
        assert!(text.starts_with("<==    Columns: id, name"));
        assert!(text.ends_with("<==      Total: 2"));
    }
}
