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

use serde::{Deserialize, Serialize};

use crate::naming;

pub trait GetTableName {
    /// extract the table name from a struct
    fn table_name() -> TableName;
}

pub trait GetFields {
    /// extract the columns from struct
    fn fields() -> Vec<FieldName>;
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TableName {
    /// table name
    pub name: String,
    /// table of schema
    pub schema: Option<String>,
    /// table alias
    pub alias: Option<String>,
}

impl TableName {
    /// Parses `schema.table alias` / `table AS alias` forms.
    pub fn from(name: &str) -> Self {
        let (table_part, alias) = Self::split_table_and_alias(name.trim());
        let (schema, name) = Self::split_schema_and_table(&table_part);
        TableName { name, schema, alias }
    }

    /// Default table name for a struct, e.g. `UserInfo` -> `tbl_user_info`.
    pub fn from_struct_name(struct_name: &str) -> Self {
        TableName::from(&naming::default_table_name(struct_name))
    }

    pub fn name(&self) -> String {
        self.name.to_string()
    }

    pub fn is_empty(&self) -> bool {
        naming::is_blank(&self.name)
    }

    /// return the long name of the table using schema.table_name
    pub fn complete_name(&self) -> String {
        match self.schema {
            Some(ref schema) => format!("{}.{}", schema, self.name),
            None => self.name.to_owned(),
        }
    }

    pub fn sql_reference(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} {}", self.complete_name(), alias),
            None => self.complete_name(),
        }
    }

    fn split_table_and_alias(s: &str) -> (String, Option<String>) {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.len() >= 3 && parts[1].eq_ignore_ascii_case("as") {
            (parts[0].to_string(), Some(parts[2].to_string()))
        } else if parts.len() >= 2 {
            (parts[0].to_string(), Some(parts[1].to_string()))
        } else {
            (s.to_string(), None)
        }
    }

    fn split_schema_and_table(s: &str) -> (Option<String>, String) {
        match s.rsplit_once('.') {
            Some((schema, table)) => (Some(schema.to_string()), table.to_string()),
            None => (None, s.to_string()),
        }
    }
}

impl From<&str> for TableName {
    fn from(value: &str) -> Self {
        TableName::from(value)
    }
}

impl From<String> for TableName {
    fn from(value: String) -> Self {
        TableName::from(value.as_str())
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql_reference())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum FieldType {
    TableId,
    TableField,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct FieldName {
    /// column name
    pub name: String,
    pub alias: Option<String>,
    /// exist in actual table
    pub exist: bool,
    pub field_type: FieldType,
}

impl FieldName {
    pub fn from(arg: &str) -> Self {
        FieldName {
            name: arg.to_owned(),
            alias: None,
            exist: true,
            field_type: FieldType::TableField,
        }
    }

    pub fn id(arg: &str) -> Self {
        FieldName {
            field_type: FieldType::TableId,
            ..FieldName::from(arg)
        }
    }

    pub fn name(&self) -> String {
        self.name.to_owned()
    }

    pub fn is_table_id(&self) -> bool {
        self.field_type == FieldType::TableId
    }
}

/// Primary key column of `T`: the first `TableId` field, else `id`.
pub fn primary_key<T: GetFields>() -> String {
    T::fields()
        .into_iter()
        .find(|f| f.is_table_id())
        .map(|f| f.name)
        .unwrap_or_else(|| "id".to_string())
}

/// Column names of `T` that exist in the table, in declaration order.
pub fn column_names<T: GetFields>() -> Vec<String> {
    T::fields().into_iter().filter(|f| f.exist).map(|f| f.name).collect()
}
