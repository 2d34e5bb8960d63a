//! Long-range hydration views: month-by-month history and the year heatmap.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, TimeZone};
use serde::Serialize;

use super::hydration::percent_of_goal;
use crate::time::{days_in_month, weekday_index, DayContext};
use crate::types::{HydrationLogEntry, HydrationSettings};

/// Months shown on the year heatmap, including the current one.
pub const HEATMAP_MONTHS: u32 = 12;

/// One day of the history list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total: i64,
    /// Rounded percent of the daily goal, capped at 100
    pub percentage: u32,
    /// Drinks logged that day, in input order
    pub entries: Vec<HydrationLogEntry>,
}

/// One month of the history list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub total: i64,
    /// Daily goal times the number of days in the month
    pub goal: i64,
    /// Newest day first
    pub days: Vec<DaySummary>,
}

impl MonthSummary {
    /// Full month name, e.g. "March".
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }
}

/// Heatmap colour band for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityLevel {
    /// Nothing logged
    None,
    /// Under half the goal
    Low,
    /// At least half the goal
    Half,
    /// Goal met
    Full,
}

impl IntensityLevel {
    pub fn from_amount(amount: i64, daily_goal: u32) -> Self {
        if amount <= 0 {
            return IntensityLevel::None;
        }
        let pct = percent_of_goal(amount, daily_goal);
        if pct >= 100.0 {
            IntensityLevel::Full
        } else if pct >= 50.0 {
            IntensityLevel::Half
        } else {
            IntensityLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub amount: i64,
    pub level: IntensityLevel,
}

/// One calendar month of the year heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapMonth {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st in a Sunday-first grid
    pub leading_blanks: usize,
    pub days: Vec<HeatmapDay>,
}

/// Group finished drinks by day and month, newest month first.
pub fn monthly_history<Tz: TimeZone>(
    logs: &[HydrationLogEntry],
    settings: &HydrationSettings,
    ctx: &DayContext<Tz>,
) -> Vec<MonthSummary> {
    let mut by_day: BTreeMap<NaiveDate, Vec<HydrationLogEntry>> = BTreeMap::new();
    for entry in logs.iter().filter(|e| e.is_completed()) {
        by_day
            .entry(ctx.date_key(&entry.logged_at))
            .or_default()
            .push(entry.clone());
    }

    let goal = settings.daily_goal;
    let mut months: BTreeMap<(i32, u32), MonthSummary> = BTreeMap::new();

    // newest day first
    for (date, entries) in by_day.into_iter().rev() {
        let total: i64 = entries.iter().map(|e| e.amount as i64).sum();
        let percentage = percent_of_goal(total, goal).round().min(100.0) as u32;

        let month = months
            .entry((date.year(), date.month()))
            .or_insert_with(|| MonthSummary {
                year: date.year(),
                month: date.month(),
                total: 0,
                goal: goal as i64 * days_in_month(date.year(), date.month()) as i64,
                days: Vec::new(),
            });
        month.total += total;
        month.days.push(DaySummary {
            date,
            total,
            percentage,
            entries,
        });
    }

    tracing::debug!(months = months.len(), "Built monthly hydration history");
    months.into_values().rev().collect()
}

/// Per-day intensity for the last [`HEATMAP_MONTHS`] calendar months, oldest
/// month first. Every day of each month is present; days without drinks
/// (including future days of the current month) are [`IntensityLevel::None`].
pub fn year_heatmap<Tz: TimeZone>(
    logs: &[HydrationLogEntry],
    settings: &HydrationSettings,
    ctx: &DayContext<Tz>,
) -> Vec<HeatmapMonth> {
    let mut totals: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for entry in logs.iter().filter(|e| e.is_completed()) {
        *totals.entry(ctx.date_key(&entry.logged_at)).or_insert(0) += entry.amount as i64;
    }

    let today = ctx.today();
    (0..HEATMAP_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = months_before(today.year(), today.month(), back);
            let days: Vec<HeatmapDay> = (1..=days_in_month(year, month))
                .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
                .map(|date| {
                    let amount = totals.get(&date).copied().unwrap_or(0);
                    HeatmapDay {
                        date,
                        amount,
                        level: IntensityLevel::from_amount(amount, settings.daily_goal),
                    }
                })
                .collect();
            HeatmapMonth {
                year,
                month,
                leading_blanks: days.first().map(|d| weekday_index(d.date)).unwrap_or(0),
                days,
            }
        })
        .collect()
}

/// The (year, month) `back` months before the given one.
fn months_before(year: i32, month: u32, back: u32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn drink(date: NaiveDate, hour: u32, amount: u32) -> HydrationLogEntry {
        let logged_at = date.and_hms_opt(hour, 0, 0).unwrap().and_utc();
        HydrationLogEntry {
            id: format!("{}-{}", date, hour),
            amount,
            label: "Glass".to_string(),
            logged_at,
            completed_at: Some(logged_at),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_monthly_history_grouping() {
        let logs = vec![
            drink(d(2024, 2, 28), 9, 1000),
            drink(d(2024, 3, 1), 9, 1500),
            drink(d(2024, 3, 1), 14, 1500),
            drink(d(2024, 3, 9), 9, 500),
        ];
        let settings = HydrationSettings {
            daily_goal: 2000,
            ..Default::default()
        };
        let ctx = DayContext::new(Utc, today());
        let history = monthly_history(&logs, &settings, &ctx);

        assert_eq!(history.len(), 2);
        let march = &history[0];
        assert_eq!((march.year, march.month), (2024, 3));
        assert_eq!(march.month_name(), "March");
        assert_eq!(march.total, 3500);
        assert_eq!(march.goal, 2000 * 31);
        assert_eq!(march.days[0].date, d(2024, 3, 9));
        assert_eq!(march.days[0].percentage, 25);
        // 150% capped
        assert_eq!(march.days[1].percentage, 100);
        assert_eq!(march.days[1].entries.len(), 2);

        // 2024 is a leap year
        assert_eq!(history[1].goal, 2000 * 29);
    }

    #[test]
    fn test_history_skips_active_drinks() {
        let mut active = drink(today(), 9, 500);
        active.completed_at = None;
        let ctx = DayContext::new(Utc, today());
        let history = monthly_history(&[active], &HydrationSettings::default(), &ctx);
        assert!(history.is_empty());
    }

    #[test]
    fn test_intensity_levels() {
        assert_eq!(IntensityLevel::from_amount(0, 2000), IntensityLevel::None);
        assert_eq!(IntensityLevel::from_amount(999, 2000), IntensityLevel::Low);
        assert_eq!(IntensityLevel::from_amount(1000, 2000), IntensityLevel::Half);
        assert_eq!(IntensityLevel::from_amount(2000, 2000), IntensityLevel::Full);
    }

    #[test]
    fn test_year_heatmap_shape() {
        let logs = vec![drink(today(), 9, 2500), drink(d(2023, 4, 2), 9, 100)];
        let ctx = DayContext::new(Utc, today());
        let months = year_heatmap(&logs, &HydrationSettings::default(), &ctx);

        assert_eq!(months.len(), 12);
        assert_eq!((months[0].year, months[0].month), (2023, 4));
        assert_eq!((months[11].year, months[11].month), (2024, 3));
        assert_eq!(months[11].days.len(), 31);
        // 1 March 2024 was a Friday
        assert_eq!(months[11].leading_blanks, 5);
        assert_eq!(months[11].days[9].level, IntensityLevel::Full);
        assert_eq!(months[0].days[1].level, IntensityLevel::Low);
    }

    #[test]
    fn test_months_before_wraps_year() {
        assert_eq!(months_before(2024, 3, 0), (2024, 3));
        assert_eq!(months_before(2024, 3, 3), (2023, 12));
        assert_eq!(months_before(2024, 1, 13), (2022, 12));
    }
}
