use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::models::Period;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedDay {
    pub date: NaiveDate,
    pub forecast_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedWeek {
    pub key: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub working_days: u32,
    pub forecast_hours: f64,
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// All days of the month containing `month`.
pub fn month_days(month: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let first = month.with_day(1).unwrap_or(month);
    first.iter_days().take_while(move |d| d.month() == first.month())
}

/// One forecast per weekday of the month, from a link's allocation percentage.
pub fn daily_plan(percentage: f64, month: NaiveDate) -> Vec<PlannedDay> {
    let forecast_hours = round_tenth(Period::Day.capacity_hours(percentage));
    month_days(month)
        .filter(|d| !is_weekend(*d))
        .map(|date| PlannedDay {
            date,
            forecast_hours,
        })
        .collect()
}

/// One forecast per Monday-based week touching the month. Only the month's
/// own weekdays count towards a week's working days.
pub fn weekly_plan(percentage: f64, month: NaiveDate) -> Vec<PlannedWeek> {
    let daily = Period::Day.capacity_hours(percentage);
    let first = month.with_day(1).unwrap_or(month);
    let Some(last) = month_days(first).last() else {
        return Vec::new();
    };

    let mut start = first - Duration::days(i64::from(first.weekday().num_days_from_monday()));
    let mut weeks = Vec::new();
    while start <= last {
        let end = start + Duration::days(6);
        let working_days = start
            .iter_days()
            .take(7)
            .filter(|d| d.month() == first.month() && !is_weekend(*d))
            .count() as u32;
        let iso = start.iso_week();

        weeks.push(PlannedWeek {
            key: format!("{}-W{:02}", iso.year(), iso.week()),
            start,
            end,
            working_days,
            forecast_hours: round_tenth(f64::from(working_days) * daily),
        });
        start += Duration::days(7);
    }
    weeks
}
