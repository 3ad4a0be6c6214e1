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

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    TypeMismatch {
        expected: String,
        found: String,
    },
    MissingField {
        field: String,
        expected_type: String,
    },
    NullValue {
        target_type: String,
    },
    NumericOverflow {
        target_type: String,
    },
    ParseError {
        message: String,
    },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            ConversionError::MissingField { field, expected_type } => {
                write!(f, "Missing Field: field {}, expected_type {}", field, expected_type)
            }
            ConversionError::NullValue { target_type } => {
                write!(f, "Cannot convert null value to {}", target_type)
            }
            ConversionError::NumericOverflow { target_type } => {
                write!(f, "Numeric overflow when converting to {}", target_type)
            }
            ConversionError::ParseError { message } => write!(f, "Parse error: {}", message),
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<serde_json::Error> for ConversionError {
    fn from(err: serde_json::Error) -> Self {
        ConversionError::ParseError { message: err.to_string() }
    }
}

/// Errors raised while moving data between rows, values and structs.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    NoSuchValueError(String),
    NoSuchFieldError(String),
    ConversionError(ConversionError),
    TableNameEmpError,
    IndexOutOfBounds(usize, usize),
}

impl DataError {
    pub fn parse_error<T: Into<String>>(err: T) -> Self {
        Self::ConversionError(ConversionError::ParseError { message: err.into() })
    }

    pub fn type_mismatch_error<T: Into<String>, E: Into<String>>(expected: T, found: E) -> Self {
        Self::ConversionError(ConversionError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        })
    }

    pub fn missing_field_error<T: Into<String>, E: Into<String>>(field: T, expected_type: E) -> Self {
        Self::ConversionError(ConversionError::MissingField {
            field: field.into(),
            expected_type: expected_type.into(),
        })
    }

    pub fn null_value_error<T: Into<String>>(target_type: T) -> Self {
        Self::ConversionError(ConversionError::NullValue { target_type: target_type.into() })
    }

    pub fn numeric_overflow_error<T: Into<String>>(target_type: T) -> Self {
        Self::ConversionError(ConversionError::NumericOverflow { target_type: target_type.into() })
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::ConversionError(e) => write!(f, "Conversion Data Error: {e}"),
            DataError::NoSuchValueError(e) => write!(f, "No Such Value Error: {e}"),
            DataError::NoSuchFieldError(e) => write!(f, "No Such Field Error: {e}"),
            DataError::TableNameEmpError => write!(f, "table name is empty"),
            DataError::IndexOutOfBounds(i, u) => write!(f, "IndexOutOfBoundsException: Index: {i}, Size: {u}"),
        }
    }
}

impl std::error::Error for DataError {}

impl From<ConversionError> for DataError {
    fn from(err: ConversionError) -> Self {
        DataError::ConversionError(err)
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::ConversionError(err.into())
    }
}
