//! Hydration analytics over a user's drink log.
//!
//! Entries split into **active** drinks (still in progress) and **history**
//! (finished). Every statistic here counts history entries only; an active
//! drink shows up nowhere until it is finished. Entries are attributed to
//! the calendar day of `logged_at`, so a drink started before midnight and
//! finished after counts toward the day it was started.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use super::buckets::{hourly_blocks, DayBlock};
use super::{mean, WeekdayWeekend};
use crate::time::{is_weekend, weekday_index, DateKey, DayContext, Period};
use crate::types::{HydrationLogEntry, HydrationSettings};

/// Days scanned backward from today when computing streaks.
pub const STREAK_WINDOW_DAYS: u32 = 365;

/// Trend percentages are capped here so overshoot stays visible on a chart.
pub const TREND_PERCENTAGE_CAP: f64 = 150.0;

/// Summary statistics for a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HydrationPeriodStats {
    /// Mean total over days that have at least one drink
    pub avg_intake: f64,
    /// Percentage of the window's days on which the goal was met
    pub consistency: f64,
    pub days_at_goal: usize,
    /// Days with at least one drink
    pub days_logged: usize,
    pub total_intake: i64,
}

/// Percentage of the day's volume per time-of-day period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodShares {
    /// 6am-12pm
    pub morning: f64,
    /// 12pm-6pm
    pub afternoon: f64,
    /// 6pm-12am
    pub evening: f64,
    /// 12am-6am
    pub night: f64,
}

impl PeriodShares {
    pub fn share(&self, block: DayBlock) -> f64 {
        match block {
            DayBlock::Night => self.night,
            DayBlock::Morning => self.morning,
            DayBlock::Afternoon => self.afternoon,
            DayBlock::Evening => self.evening,
        }
    }
}

/// Drinking pattern by hour of day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyDistribution {
    /// Volume per hour (0-23)
    pub hourly_totals: [i64; 24],
    /// Number of drinks per hour (0-23)
    pub hourly_counts: [u32; 24],
    /// Hour with the most volume; earliest hour wins ties
    pub peak_hour: u8,
    pub periods: PeriodShares,
}

/// One day of the intake trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrendPoint {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon"
    pub date_label: String,
    pub total: i64,
    /// Percent of goal, capped at [`TREND_PERCENTAGE_CAP`]
    pub percentage: f64,
}

/// Goal streaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakInfo {
    /// Consecutive goal days ending today
    pub current_streak: u32,
    /// Longest run of goal days in the streak window
    pub longest_streak: u32,
}

/// Average intake for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayAverage {
    /// 0 = Sunday, 6 = Saturday
    pub day: u8,
    pub average: f64,
}

impl DayAverage {
    pub fn day_name(&self) -> &'static str {
        day_name(self.day)
    }
}

/// Per-weekday averages with the best and worst weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayOfWeekStats {
    /// Weekdays that have at least one logged day, Sunday first
    pub averages: Vec<DayAverage>,
    pub best: Option<DayAverage>,
    pub worst: Option<DayAverage>,
}

/// Period analytics over a hydration log collection.
#[derive(Debug, Clone)]
pub struct HydrationAnalytics<'a, Tz: TimeZone> {
    logs: &'a [HydrationLogEntry],
    settings: &'a HydrationSettings,
    ctx: &'a DayContext<Tz>,
}

impl<'a, Tz: TimeZone> HydrationAnalytics<'a, Tz> {
    pub fn new(
        logs: &'a [HydrationLogEntry],
        settings: &'a HydrationSettings,
        ctx: &'a DayContext<Tz>,
    ) -> Self {
        Self {
            logs,
            settings,
            ctx,
        }
    }

    pub fn daily_goal(&self) -> u32 {
        self.settings.daily_goal
    }

    /// Drinks still in progress.
    pub fn active_entries(&self) -> impl Iterator<Item = &'a HydrationLogEntry> {
        self.logs.iter().filter(|e| e.is_active())
    }

    /// Finished drinks.
    pub fn history_entries(&self) -> impl Iterator<Item = &'a HydrationLogEntry> {
        self.logs.iter().filter(|e| e.is_completed())
    }

    fn intake_on(&self, day: NaiveDate) -> i64 {
        self.history_entries()
            .filter(|e| self.ctx.date_key(&e.logged_at) == day)
            .map(|e| e.amount as i64)
            .sum()
    }

    /// Finished volume logged today.
    pub fn today_intake(&self) -> i64 {
        self.intake_on(self.ctx.today())
    }

    /// Finished volume logged yesterday.
    pub fn yesterday_intake(&self) -> i64 {
        self.intake_on(self.ctx.days_ago(1))
    }

    /// Today's progress toward the goal, capped at 100%.
    pub fn today_progress(&self) -> f64 {
        percent_of_goal(self.today_intake(), self.settings.daily_goal).min(100.0)
    }

    /// Today's entries (active and finished), in input order.
    pub fn today_logs(&self) -> Vec<&'a HydrationLogEntry> {
        let today = self.ctx.today();
        self.logs
            .iter()
            .filter(|e| self.ctx.date_key(&e.logged_at) == today)
            .collect()
    }

    /// Finished volume per calendar day inside the period.
    ///
    /// Days without drinks are absent, not zero.
    pub fn daily_totals_map(&self, period: Period) -> BTreeMap<DateKey, i64> {
        let mut totals = BTreeMap::new();
        for entry in self.history_entries() {
            let key = self.ctx.date_key(&entry.logged_at);
            if period.contains(key, self.ctx.today()) {
                *totals.entry(key).or_insert(0) += entry.amount as i64;
            }
        }
        totals
    }

    /// Average intake and goal consistency for a period.
    ///
    /// `avg_intake` averages only days with drinks. `consistency` divides the
    /// goal days by the full window length, so unlogged days count against
    /// it. For [`Period::AllTime`] the window is the set of logged days.
    pub fn stats_for_period(&self, period: Period) -> HydrationPeriodStats {
        let totals = self.daily_totals_map(period);
        let goal = self.settings.daily_goal as i64;

        let values: Vec<f64> = totals.values().map(|&t| t as f64).collect();
        let days_at_goal = totals.values().filter(|&&t| t >= goal).count();
        let window_days = period.days().map(|d| d as usize).unwrap_or(totals.len());

        let consistency = if window_days > 0 {
            days_at_goal as f64 / window_days as f64 * 100.0
        } else {
            0.0
        };

        tracing::debug!(
            %period,
            days_logged = totals.len(),
            days_at_goal,
            "Computed hydration period stats"
        );

        HydrationPeriodStats {
            avg_intake: mean(&values),
            consistency,
            days_at_goal,
            days_logged: totals.len(),
            total_intake: totals.values().sum(),
        }
    }

    /// Volume and drink counts per hour of `logged_at` over the whole history.
    pub fn hourly_distribution(&self) -> HourlyDistribution {
        let mut hourly_totals = [0i64; 24];
        let mut hourly_counts = [0u32; 24];

        for entry in self.history_entries() {
            let hour = self.ctx.hour_of(&entry.logged_at) as usize;
            hourly_totals[hour] += entry.amount as i64;
            hourly_counts[hour] += 1;
        }

        let peak_hour = peak_index(&hourly_totals) as u8;

        let mut periods = PeriodShares::default();
        for share in hourly_blocks(&hourly_totals) {
            match share.block {
                DayBlock::Night => periods.night = share.percentage,
                DayBlock::Morning => periods.morning = share.percentage,
                DayBlock::Afternoon => periods.afternoon = share.percentage,
                DayBlock::Evening => periods.evening = share.percentage,
            }
        }

        HourlyDistribution {
            hourly_totals,
            hourly_counts,
            peak_hour,
            periods,
        }
    }

    /// Mean daily intake on weekend vs weekday days over the last 30 days.
    pub fn weekday_vs_weekend(&self) -> WeekdayWeekend {
        let mut weekday = Vec::new();
        let mut weekend = Vec::new();
        for (date, total) in self.daily_totals_map(Period::MONTH) {
            if is_weekend(date) {
                weekend.push(total as f64);
            } else {
                weekday.push(total as f64);
            }
        }
        WeekdayWeekend::from_groups(&weekday, &weekend)
    }

    /// Exactly `days` points ending today, oldest first. Missing days are 0.
    pub fn daily_trend_data(&self, days: u32) -> Vec<DailyTrendPoint> {
        let totals = self.daily_totals_map(Period::Days(days));
        let goal = self.settings.daily_goal;

        (0..days)
            .rev()
            .map(|offset| {
                let date = self.ctx.days_ago(offset);
                let total = totals.get(&date).copied().unwrap_or(0);
                DailyTrendPoint {
                    date,
                    date_label: date.format("%a").to_string(),
                    total,
                    percentage: percent_of_goal(total, goal).min(TREND_PERCENTAGE_CAP),
                }
            })
            .collect()
    }

    /// Current and longest runs of days meeting the goal.
    pub fn streak_info(&self) -> StreakInfo {
        let totals = self.daily_totals_map(Period::Days(STREAK_WINDOW_DAYS));
        let goal = self.settings.daily_goal as i64;

        // index 0 = today, walking backward
        let qualifying: Vec<bool> = (0..STREAK_WINDOW_DAYS)
            .map(|offset| {
                totals
                    .get(&self.ctx.days_ago(offset))
                    .is_some_and(|&total| total >= goal)
            })
            .collect();

        let (current_streak, longest_streak) = calculate_streaks(&qualifying);
        StreakInfo {
            current_streak,
            longest_streak,
        }
    }

    /// Average intake per weekday over the last 30 days, with best and worst.
    ///
    /// Only weekdays that have logged days are ranked. Ties keep Sunday-first
    /// order: the earliest tied weekday is best, the latest tied weekday is
    /// worst.
    pub fn day_of_week_stats(&self) -> DayOfWeekStats {
        let mut buckets: [Vec<f64>; 7] = Default::default();
        for (date, total) in self.daily_totals_map(Period::MONTH) {
            buckets[weekday_index(date)].push(total as f64);
        }

        let averages: Vec<DayAverage> = buckets
            .iter()
            .enumerate()
            .filter(|(_, totals)| !totals.is_empty())
            .map(|(day, totals)| DayAverage {
                day: day as u8,
                average: mean(totals),
            })
            .collect();

        let mut ranked = averages.clone();
        // sort_by is stable
        ranked.sort_by(|a, b| b.average.total_cmp(&a.average));

        DayOfWeekStats {
            best: ranked.first().copied(),
            worst: ranked.last().copied(),
            averages,
        }
    }
}

/// Current and longest streak from per-day flags, index 0 = today.
pub fn calculate_streaks(qualifying_newest_first: &[bool]) -> (u32, u32) {
    let current_streak = qualifying_newest_first
        .iter()
        .take_while(|&&q| q)
        .count() as u32;

    let mut longest_streak = 0u32;
    let mut streak = 0u32;
    for &q in qualifying_newest_first {
        if q {
            streak += 1;
            longest_streak = longest_streak.max(streak);
        } else {
            streak = 0;
        }
    }

    (current_streak, longest_streak)
}

/// Index of the largest value; the lowest index wins ties.
pub fn peak_index(values: &[i64]) -> usize {
    let mut peak = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[peak] {
            peak = i;
        }
    }
    peak
}

/// `total` as a percentage of `goal`; 0 for a zero goal.
pub fn percent_of_goal(total: i64, goal: u32) -> f64 {
    if goal == 0 {
        0.0
    } else {
        total as f64 / goal as f64 * 100.0
    }
}

/// Day name from a Sunday-first index.
pub fn day_name(day: u8) -> &'static str {
    match day {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "Unknown",
    }
}
