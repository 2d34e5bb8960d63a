//! Analytics for habitrack
//!
//! All analytics are pure functions of a log collection, the user's settings
//! and a reference day:
//! - [`sleep_metrics`]: per-night statistics and the quality score
//! - [`sleep`]: period aggregates and chart series over sleep logs
//! - [`hydration`]: period aggregates, streaks and trends over drink logs
//! - [`history`]: monthly history and the year heatmap
//! - [`buckets`]: bedtime heatmap buckets and hourly blocks
//!
//! Nothing here fails or mutates its input. Empty collections produce zeros
//! or empty series.

pub mod buckets;
pub mod history;
pub mod hydration;
pub mod sleep;
pub mod sleep_metrics;

use serde::Serialize;

pub use buckets::{BedtimeBucket, BlockShare, DayBlock, QualityRating};
pub use history::{DaySummary, HeatmapDay, HeatmapMonth, IntensityLevel, MonthSummary};
pub use hydration::{
    DailyTrendPoint, DayAverage, DayOfWeekStats, HourlyDistribution, HydrationAnalytics,
    HydrationPeriodStats, PeriodShares, StreakInfo,
};
pub use sleep::{
    ArchitectureBar, BedtimeQualityPoint, ConsistencyBar, ConsistencyScore, EfficiencyPoint,
    Grogginess, QualityDurationPoint, SleepAnalytics, SleepPeriodStats,
};
pub use sleep_metrics::{QualityComponents, SleepMetrics};

/// Weekday vs weekend comparison of a per-day value.
///
/// Each side is averaged independently; a side with no days averages 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeekdayWeekend {
    pub weekday_avg: f64,
    pub weekend_avg: f64,
    /// `weekend_avg - weekday_avg`
    pub difference: f64,
    pub weekday_count: usize,
    pub weekend_count: usize,
}

impl WeekdayWeekend {
    pub fn from_groups(weekday: &[f64], weekend: &[f64]) -> Self {
        let weekday_avg = mean(weekday);
        let weekend_avg = mean(weekend);
        Self {
            weekday_avg,
            weekend_avg,
            difference: weekend_avg - weekday_avg,
            weekday_count: weekday.len(),
            weekend_count: weekend.len(),
        }
    }
}

/// Arithmetic mean, 0 for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
