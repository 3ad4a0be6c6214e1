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
//! Derives a `select count(1)` statement from a select statement.
//!
use std::ops::Range;
use crate::errors::{Result, SqlbeanError};

/// A keyword found outside quotes and parentheses, with its byte offset.
#[derive(Debug)]
struct Keyword {
    word: String,
    start: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Quote state of a scan. Backslash escapes are honoured inside quotes.
#[derive(Debug, Default)]
struct Quotes {
    open: Option<char>,
    escaped: bool,
}

impl Quotes {
    /// Feeds `c` and returns `true` when it lies inside a quoted literal,
    /// including the closing quote itself.
    fn inside(&mut self, c: char) -> bool {
        match self.open {
            Some(q) => {
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == q {
                    self.open = None;
                }
                true
            }
            None => {
                if matches!(c, '\'' | '"' | '`') {
                    self.open = Some(c);
                    return true;
                }
                false
            }
        }
    }
}

/// Collects the unqualified words of `sql` at nesting depth zero, lowercased.
/// `t.limit` yields `t` only.
fn top_level_words(sql: &str) -> Vec<Keyword> {
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut quotes = Quotes::default();
    let mut current: Option<usize> = None;
    let push = |words: &mut Vec<Keyword>, start: usize, end: usize, depth: usize| {
        if depth == 0 && !sql[..start].ends_with('.') {
            words.push(Keyword { word: sql[start..end].to_lowercase(), start });
        }
    };
    for (i, c) in sql.char_indices() {
        if quotes.open.is_none() && is_word_char(c) {
            if current.is_none() {
                current = Some(i);
            }
            continue;
        }
        if let Some(start) = current.take() {
            push(&mut words, start, i, depth);
        }
        if quotes.inside(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    if let Some(start) = current {
        push(&mut words, start, sql.len(), depth);
    }
    words
}

/// Byte offsets of the top-level `from` and of the paging/ordering tail.
fn split_points(sql: &str) -> Result<(usize, usize)> {
    let words = top_level_words(sql);
    let from_idx = words
        .iter()
        .position(|w| w.word == "from")
        .ok_or_else(|| SqlbeanError::InvalidSQL(format!("no top-level from clause: {}", sql)))?;
    let from = words[from_idx].start;
    let tail = &words[from_idx + 1..];
    let last_order = tail
        .iter()
        .enumerate()
        .rev()
        .find(|(i, w)| w.word == "order" && tail.get(i + 1).map(|n| n.word == "by").unwrap_or(false))
        .map(|(_, w)| w.start);
    let last_limit = tail.iter().rev().find(|w| w.word == "limit").map(|w| w.start);
    let last_offset = tail.iter().rev().find(|w| w.word == "offset").map(|w| w.start);
    let cut = [last_order, last_limit, last_offset]
        .iter()
        .flatten()
        .copied()
        .min()
        .unwrap_or(sql.len());
    Ok((from, cut))
}

/// `?` placeholders outside quotes in `sql`.
fn placeholders(sql: &str) -> usize {
    let mut quotes = Quotes::default();
    sql.chars().filter(|&c| !quotes.inside(c) && c == '?').count()
}

/// `select a, b from t where x = ? order by a limit ? offset ?` becomes
/// `select count(1) from t where x = ?`.
pub fn count_sql(sql: &str) -> Result<String> {
    let (from, cut) = split_points(sql)?;
    Ok(format!("select count(1) {}", sql[from..cut].trim_end()))
}

/// Index range of the original params that `count_sql` still binds: the
/// placeholders between the top-level `from` and the ordering/paging tail.
pub fn count_params_range(sql: &str) -> Result<Range<usize>> {
    let (from, cut) = split_points(sql)?;
    let before_from = placeholders(&sql[..from]);
    Ok(before_from..before_from + placeholders(&sql[from..cut]))
}
