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
//! Date helpers over chrono. Wall clock values use the local time zone.
//!
//! Patterns are chrono `strftime` strings. Functions that parse return
//! `SqlbeanError::DataError` on malformed input.
//!
use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use crate::errors::{Result, SqlbeanError};

/// `yyyyMMddHHmmssSSS`
pub const YMDHMS_SSS: &str = "%Y%m%d%H%M%S%3f";
/// `yyyyMMddHHmmss`
pub const YMDHMS: &str = "%Y%m%d%H%M%S";
/// `yyyyMMddHHmm`
pub const YMDHM: &str = "%Y%m%d%H%M";
/// `yyyyMMdd`
pub const YMD: &str = "%Y%m%d";
/// `yyyy-MM-dd HH:mm:ss.SSS`
pub const DATE_TIME_MILLIS: &str = "%Y-%m-%d %H:%M:%S%.3f";
/// `yyyy-MM-dd HH:mm:ss`
pub const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";
/// `yyyy-MM-dd HH:mm`
pub const DATE_HOUR_MINUTE: &str = "%Y-%m-%d %H:%M";
/// `yyyy-MM-dd HH`
pub const DATE_HOUR: &str = "%Y-%m-%d %H";
/// `yyyy-MM-dd`
pub const DATE: &str = "%Y-%m-%d";
/// `yyyy-MM`
pub const YEAR_MONTH: &str = "%Y-%m";
pub const YEAR: &str = "%Y";
/// `HHmm`
pub const HM: &str = "%H%M";
/// `HHmmss`
pub const HMS: &str = "%H%M%S";
/// `yyyy年MM月dd日 HH:mm`
pub const CN_DATE_TIME: &str = "%Y年%m月%d日 %H:%M";

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

fn date_error<S: Into<String>>(msg: S) -> SqlbeanError {
    SqlbeanError::DataError(msg.into())
}

/// Current local time in `fmt`.
pub fn current(fmt: &str) -> String {
    Local::now().format(fmt).to_string()
}

/// `yyyyMMddHHmmssSSS`
pub fn now() -> String {
    current(YMDHMS_SSS)
}

/// `yyyyMMddHHmmss`
pub fn now_date() -> String {
    current(YMDHMS)
}

/// `yyyy-MM-dd HH:mm:ss.SSS`
pub fn now_date_time() -> String {
    current(DATE_TIME_MILLIS)
}

pub fn now_year() -> String {
    current(YEAR)
}

pub fn format(date: &NaiveDateTime, fmt: &str) -> String {
    date.format(fmt).to_string()
}

/// Parses `source` with `fmt`. Date-only patterns yield midnight, a bare
/// year yields January 1st.
pub fn parse(source: &str, fmt: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(source, fmt) {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(source, fmt) {
        return Ok(d.and_time(chrono::NaiveTime::MIN));
    }
    if fmt == YEAR {
        if let Some(d) = source.trim().parse::<i32>().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)) {
            return Ok(d.and_time(chrono::NaiveTime::MIN));
        }
    }
    Err(date_error(format!("cannot parse date '{}' with pattern '{}'", source, fmt)))
}

/// Validates an 8 char `yyyyMMdd` string. Empty input gives `None`.
pub fn transfer_date(source: &str) -> Result<Option<NaiveDate>> {
    if source.is_empty() {
        return Ok(None);
    }
    if source.len() != 8 || !source.bytes().all(|b| b.is_ascii_digit()) {
        return Err(date_error(format!("invalid date '{}'", source)));
    }
    let month: u32 = source[4..6].parse().map_err(|_| date_error(format!("invalid month in '{}'", source)))?;
    let day: u32 = source[6..8].parse().map_err(|_| date_error(format!("invalid day in '{}'", source)))?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(date_error(format!("invalid date '{}'", source)));
    }
    NaiveDate::parse_from_str(source, YMD)
        .map(Some)
        .map_err(|e| date_error(format!("invalid date '{}': {}", source, e)))
}

fn add_months(date: NaiveDateTime, months: i32) -> Option<NaiveDateTime> {
    if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

/// Shifts a `yyyy-MM-dd HH:mm:ss.SSS` string by years, then months, then days.
pub fn custom_time(date_str: &str, years: i32, months: i32, days: i64) -> Result<String> {
    let source = parse(date_str, DATE_TIME_MILLIS)?;
    let shifted = add_months(source, years.saturating_mul(12))
        .and_then(|d| add_months(d, months))
        .and_then(|d| d.checked_add_signed(Duration::days(days)))
        .ok_or_else(|| date_error(format!("date out of range: {} {}y {}m {}d", date_str, years, months, days)))?;
    Ok(format(&shifted, DATE_TIME_MILLIS))
}

/// Now minus one month, `yyyy-MM-dd HH:mm:ss.SSS`.
pub fn before_one_month() -> Result<String> {
    custom_time(&now_date_time(), 0, -1, 0)
}

/// `yyyyMMddHHmm...` digits to `yyyy年MM月dd日 HH:mm`. Empty input stays empty.
pub fn str_to_date_cn(dates: &str) -> Result<String> {
    if dates.is_empty() {
        return Ok(String::new());
    }
    if dates.len() < 12 || !dates.is_char_boundary(12) {
        return Err(date_error(format!("'{}' is shorter than yyyyMMddHHmm", dates)));
    }
    Ok(format!(
        "{}年{}月{}日 {}:{}",
        &dates[0..4],
        &dates[4..6],
        &dates[6..8],
        &dates[8..10],
        &dates[10..12]
    ))
}

fn prefix(date: &str, len: usize) -> &str {
    if date.len() >= len && date.is_char_boundary(len) {
        &date[..len]
    } else {
        date
    }
}

/// Parses the leading part of `source` matching `fmt`. Trailing text is ignored.
fn parse_leading(source: &str, fmt: &str) -> Result<NaiveDateTime> {
    if let Ok((dt, _)) = NaiveDateTime::parse_and_remainder(source, fmt) {
        return Ok(dt);
    }
    if let Ok((d, _)) = NaiveDate::parse_and_remainder(source, fmt) {
        return Ok(d.and_time(chrono::NaiveTime::MIN));
    }
    parse(source, fmt)
}

fn shift(date: &str, fmt: &str, delta: Duration) -> Result<String> {
    let source = parse_leading(date, fmt)?;
    let shifted = source
        .checked_add_signed(delta)
        .ok_or_else(|| date_error(format!("date out of range: {}", date)))?;
    Ok(format(&shifted, fmt))
}

/// Adds hours. Input longer than 14 chars is cut to `yyyyMMddHHmmss`.
pub fn hour_compute(date: &str, hours: i64, fmt: &str) -> Result<String> {
    shift(prefix(date, 14), fmt, Duration::hours(hours))
}

/// Adds days. Input longer than 12 chars is cut to `yyyyMMddHHmm`.
pub fn day_compute(date: &str, days: i64, fmt: &str) -> Result<String> {
    shift(prefix(date, 12), fmt, Duration::days(days))
}

pub fn minute_compute(date: &str, minutes: i64, fmt: &str) -> Result<String> {
    shift(date, fmt, Duration::minutes(minutes))
}

/// Midnight of the current UTC+8 day, epoch millis.
pub fn today_zero_point_timestamp() -> i64 {
    let now = Local::now().timestamp_millis();
    now - (now + 8 * HOUR_MS) % DAY_MS
}

/// Epoch millis to a local time string, `yyyy-MM-dd HH:mm:ss.SSS` by default.
pub fn timestamp_to_date(millis: i64, fmt: Option<&str>) -> Result<String> {
    let fmt = fmt.filter(|f| !f.is_empty()).unwrap_or(DATE_TIME_MILLIS);
    let date = Local
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| date_error(format!("invalid timestamp {}", millis)))?;
    Ok(date.format(fmt).to_string())
}

/// Local time string to epoch millis.
pub fn date_to_timestamp(date_str: &str, fmt: &str) -> Result<i64> {
    let naive = parse(date_str, fmt)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|d| d.timestamp_millis())
        .ok_or_else(|| date_error(format!("'{}' does not exist in the local time zone", date_str)))
}

/// Current epoch seconds.
pub fn timestamp_secs() -> i64 {
    Local::now().timestamp()
}

/// Epoch millis `minutes` ago.
pub fn ago_time(minutes: i64) -> i64 {
    (Local::now() - Duration::minutes(minutes)).timestamp_millis()
}

/// A closed-open range of epoch millis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSplit {
    pub start_date_time: i64,
    pub end_date_time: i64,
}

impl DateSplit {
    pub fn new(start_date_time: i64, end_date_time: i64) -> Self {
        DateSplit { start_date_time, end_date_time }
    }

    pub fn start_str(&self, fmt: &str) -> Result<String> {
        timestamp_to_date(self.start_date_time, Some(fmt))
    }

    pub fn end_str(&self, fmt: &str) -> Result<String> {
        timestamp_to_date(self.end_date_time, Some(fmt))
    }

    /// `start <= time < end`
    pub fn is_between(&self, time: i64) -> bool {
        time >= self.start_date_time && time < self.end_date_time
    }

    fn weekday(&self) -> Option<Weekday> {
        Local.timestamp_millis_opt(self.start_date_time).single().map(|d| d.weekday())
    }
}

/// Cuts `[start, end)` into steps; the last piece ends at `end`.
fn split_by<F>(start: i64, end: i64, interval: i64, step: F) -> Option<Vec<DateSplit>>
where
    F: Fn(i64, i64) -> i64,
{
    if end <= start || interval <= 0 {
        return None;
    }
    let mut splits = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let next = step(cursor, interval);
        splits.push(DateSplit::new(cursor, next.min(end)));
        if next <= cursor {
            break;
        }
        cursor = next;
    }
    Some(splits)
}

/// Calendar day steps in local time, so DST days stay whole.
fn add_days(millis: i64, days: i64) -> i64 {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .and_then(|d| d.naive_local().checked_add_signed(Duration::days(days)))
        .and_then(|n| Local.from_local_datetime(&n).earliest())
        .map(|d| d.timestamp_millis())
        .unwrap_or_else(|| millis.saturating_add(days.saturating_mul(DAY_MS)))
}

pub fn split_by_day(start: i64, end: i64, interval_days: i64) -> Option<Vec<DateSplit>> {
    split_by(start, end, interval_days, add_days)
}

pub fn split_by_hour(start: i64, end: i64, interval_hours: i64) -> Option<Vec<DateSplit>> {
    split_by(start, end, interval_hours, |t, n| t.saturating_add(n.saturating_mul(HOUR_MS)))
}

pub fn split_by_minute(start: i64, end: i64, interval_minutes: i64) -> Option<Vec<DateSplit>> {
    split_by(start, end, interval_minutes, |t, n| t.saturating_add(n.saturating_mul(60_000)))
}

pub fn split_by_second(start: i64, end: i64, interval_seconds: i64) -> Option<Vec<DateSplit>> {
    split_by(start, end, interval_seconds, |t, n| t.saturating_add(n.saturating_mul(1_000)))
}

fn rewrite(time: &str, keep: usize, tail: &str) -> Result<String> {
    if time.len() < keep || !time.is_char_boundary(keep) {
        return Err(date_error(format!("'{}' is shorter than {} chars", time, keep)));
    }
    Ok(format!("{}{}", &time[..keep], tail))
}

/// `yyyyMMdd000000000`
pub fn zero_hours(time: &str) -> Result<String> {
    rewrite(time, 8, "000000000")
}

/// `yyyyMMdd235959000`
pub fn last_hours(time: &str) -> Result<String> {
    rewrite(time, 8, "235959000")
}

/// `yyyyMMddHH0000000`
pub fn zero_minutes(time: &str) -> Result<String> {
    rewrite(time, 10, "0000000")
}

/// `yyyyMMddHH5959000`
pub fn last_minutes(time: &str) -> Result<String> {
    rewrite(time, 10, "5959000")
}

/// `day_type == 1` keeps weekdays, anything else keeps weekends.
pub fn filter_weekend(splits: Vec<DateSplit>, day_type: i32) -> Vec<DateSplit> {
    splits
        .into_iter()
        .filter(|split| {
            let weekend = matches!(split.weekday(), Some(Weekday::Sat) | Some(Weekday::Sun));
            if day_type == 1 {
                !weekend
            } else {
                weekend
            }
        })
        .collect()
}

/// `yyyyMMddHHmmss` to `yyyy-MM-dd HH:mm:ss.SSS`.
pub fn time_str_to_date_str(time: &str) -> Result<String> {
    Ok(format(&parse(time, YMDHMS)?, DATE_TIME_MILLIS))
}

/// ISO day of week of a `yyyyMMdd` date: `"1"` is Monday, `"7"` Sunday.
pub fn date_to_week(date: &str) -> Result<String> {
    let day = NaiveDate::parse_from_str(date, YMD).map_err(|e| date_error(format!("invalid date '{}': {}", date, e)))?;
    Ok(day.weekday().number_from_monday().to_string())
}

/// One `(start, end)` pair per day from `start_date` to `end_date` inclusive,
/// each shaped `yyyyMMdd` + time + `000`. Times are `HHmmss`.
pub fn generate_date_array(start_date: &str, start_time: &str, end_date: &str, end_time: &str) -> Result<Vec<(String, String)>> {
    let to_day = |s: &str| NaiveDate::parse_from_str(s, YMD).map_err(|e| date_error(format!("invalid date '{}': {}", s, e)));
    let mut day = to_day(start_date)?;
    let last = to_day(end_date)?;
    let mut days = Vec::new();
    while day <= last {
        let prefix = day.format(YMD).to_string();
        days.push((format!("{}{}000", prefix, start_time), format!("{}{}000", prefix, end_time)));
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    Ok(days)
}

/// Checks `"start,end"` numeric ranges pairwise. Returns `true` when no two
/// ranges touch or overlap.
pub fn is_overlapping(times: &[&str]) -> Result<bool> {
    let ranges = times
        .iter()
        .map(|item| -> Result<(i64, i64)> {
            let mut parts = item.split(',');
            let bound = |p: Option<&str>| {
                p.and_then(|v| v.trim().parse::<i64>().ok())
                    .ok_or_else(|| date_error(format!("invalid range '{}'", item)))
            };
            Ok((bound(parts.next())?, bound(parts.next())?))
        })
        .collect::<Result<Vec<(i64, i64)>>>()?;
    for (i, (start1, end1)) in ranges.iter().enumerate() {
        for (j, (start2, end2)) in ranges.iter().enumerate() {
            if i == j {
                continue;
            }
            if (start2 >= start1 && start2 <= end1) || (end2 <= end1 && end2 >= start1) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_shapes() {
        assert_eq!(now().len(), 17);
        assert_eq!(now_date().len(), 14);
        assert_eq!(now_date_time().len(), 23);
        assert_eq!(now_year().len(), 4);
        assert!(parse(&now(), YMDHMS_SSS).is_ok());
    }

    #[test]
    fn test_parse_and_format() {
        let dt = parse("20200711083015123", YMDHMS_SSS).unwrap();
        assert_eq!(format(&dt, DATE_TIME_MILLIS), "2020-07-11 08:30:15.123");
        assert_eq!(format(&parse("2020-07-11", DATE).unwrap(), YMDHMS), "20200711000000");
        assert_eq!(format(&parse("2021", YEAR).unwrap(), YMD), "20210101");
        assert!(parse("2020/07/11", DATE).is_err());
    }

    #[test]
    fn test_transfer_date() {
        assert_eq!(transfer_date("").unwrap(), None);
        assert_eq!(transfer_date("20200229").unwrap(), NaiveDate::from_ymd_opt(2020, 2, 29));
        assert!(transfer_date("2020021").is_err());
        assert!(transfer_date("20201301").is_err());
        assert!(transfer_date("20200132").is_err());
        assert!(transfer_date("20210229").is_err());
    }

    #[test]
    fn test_custom_time() {
        assert_eq!(custom_time("2020-03-31 10:00:00.000", 0, -1, 0).unwrap(), "2020-02-29 10:00:00.000");
        assert_eq!(custom_time("2020-01-01 00:00:00.000", 1, 1, 1).unwrap(), "2021-02-02 00:00:00.000");
        assert!(custom_time("bad", 0, 0, 0).is_err());
        assert_eq!(before_one_month().unwrap().len(), 23);
    }

    #[test]
    fn test_compute() {
        assert_eq!(hour_compute("20200711230000999", 2, YMDHMS).unwrap(), "20200712010000");
        assert_eq!(day_compute("2020071123009", -11, YMDHM).unwrap(), "202006302300");
        assert_eq!(minute_compute("2020-07-11 23:50", 15, DATE_HOUR_MINUTE).unwrap(), "2020-07-12 00:05");
        assert!(minute_compute("x", 1, YMDHM).is_err());
    }

    #[test]
    fn test_compute_ignores_trailing_digits() {
        assert_eq!(day_compute("20160704000000", 7, YMD).unwrap(), "20160711");
        assert_eq!(hour_compute("20160704000000", 1, YMDHM).unwrap(), "201607040100");
        assert_eq!(minute_compute("2016-07-04 23:59:30.5", 1, DATE_HOUR_MINUTE).unwrap(), "2016-07-05 00:00");
        assert!(day_compute("2016", 1, YMD).is_err());
    }

    #[test]
    fn test_str_to_date_cn() {
        assert_eq!(str_to_date_cn("202007110830").unwrap(), "2020年07月11日 08:30");
        assert_eq!(str_to_date_cn("").unwrap(), "");
        assert!(str_to_date_cn("2020").is_err());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let millis = date_to_timestamp("2020-07-11 08:30:15.123", DATE_TIME_MILLIS).unwrap();
        assert_eq!(timestamp_to_date(millis, None).unwrap(), "2020-07-11 08:30:15.123");
        assert_eq!(timestamp_to_date(millis, Some(YMD)).unwrap(), "20200711");
        let zero = today_zero_point_timestamp();
        assert_eq!((zero + 8 * HOUR_MS) % DAY_MS, 0);
        assert!(ago_time(10) < Local::now().timestamp_millis());
        assert!(timestamp_secs() > 1_500_000_000);
    }

    #[test]
    fn test_split_by_hour_clips_last() {
        let start = date_to_timestamp("20200711000000000", YMDHMS_SSS).unwrap();
        let end = start + 5 * HOUR_MS;
        let splits = split_by_hour(start, end, 2).unwrap();
        assert_eq!(splits.len(), 3);
        assert_eq!(splits[2], DateSplit::new(start + 4 * HOUR_MS, end));
        assert!(splits[0].is_between(start));
        assert!(!splits[0].is_between(start + 2 * HOUR_MS));
        assert_eq!(split_by_minute(end, start, 1), None);
        assert_eq!(split_by_second(start, start + 2500, 1).unwrap().len(), 3);
    }

    #[test]
    fn test_split_by_day_and_weekend_filter() {
        let start = date_to_timestamp("20200711000000000", YMDHMS_SSS).unwrap();
        let end = date_to_timestamp("20200716235959000", YMDHMS_SSS).unwrap();
        let splits = split_by_day(start, end, 1).unwrap();
        assert_eq!(splits.len(), 6);
        assert_eq!(splits[5].end_str(YMDHMS_SSS).unwrap(), "20200716235959000");
        assert_eq!(splits[1].start_str(YMD).unwrap(), "20200712");
        assert_eq!(filter_weekend(splits.clone(), 2).len(), 2);
        assert_eq!(filter_weekend(splits, 1).len(), 4);
    }

    #[test]
    fn test_rewrites() {
        assert_eq!(zero_hours("20200711083015123").unwrap(), "20200711000000000");
        assert_eq!(last_hours("20200711083015123").unwrap(), "20200711235959000");
        assert_eq!(zero_minutes("20200711083015123").unwrap(), "20200711080000000");
        assert_eq!(last_minutes("20200711083015123").unwrap(), "20200711085959000");
        assert!(zero_minutes("2020").is_err());
        assert_eq!(time_str_to_date_str("20200711083015").unwrap(), "2020-07-11 08:30:15.000");
    }

    #[test]
    fn test_date_to_week() {
        assert_eq!(date_to_week("20200711").unwrap(), "6");
        assert_eq!(date_to_week("20200712").unwrap(), "7");
        assert_eq!(date_to_week("20200713").unwrap(), "1");
        assert!(date_to_week("2020-07-13").is_err());
    }

    #[test]
    fn test_generate_date_array() {
        let days = generate_date_array("20200229", "080000", "20200302", "180000").unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0], ("20200229080000000".to_string(), "20200229180000000".to_string()));
        assert_eq!(days[2].0, "20200302080000000");
        assert!(generate_date_array("20200302", "0", "20200301", "0").unwrap().is_empty());
    }

    #[test]
    fn test_is_overlapping() {
        assert!(is_overlapping(&["1,5", "6,9"]).unwrap());
        assert!(!is_overlapping(&["1,5", "5,9"]).unwrap());
        assert!(!is_overlapping(&["1,10", "3,4"]).unwrap());
        assert!(is_overlapping(&["1"]).is_err());
    }
}
