//! Sleep analytics over a user's full sleep log.
//!
//! [`SleepAnalytics`] borrows the log collection and settings and answers
//! period questions for the statistics page: averages, bedtime consistency,
//! grogginess, weekday/weekend habits and chart series. Each call filters the
//! collection afresh; nothing is cached and the input is never mutated.

use chrono::NaiveDate;
use serde::Serialize;

use super::buckets::{bedtime_heatmap, BedtimeBucket};
use super::sleep_metrics::SleepMetrics;
use super::{mean, WeekdayWeekend};
use crate::time::{is_weekend, ClockTime, Period, TimelineRole, MINUTES_PER_DAY};
use crate::types::{SleepLogEntry, SleepSettings};

/// Aggregate statistics for a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SleepPeriodStats {
    /// Mean quality score
    pub avg_quality: f64,
    /// Mean sleep time in minutes
    pub avg_duration: f64,
    /// Sum of nightly sleep debt in hours
    pub total_sleep_debt: f64,
    pub logs_count: usize,
}

/// Bedtime regularity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsistencyScore {
    /// 0-100, higher is more regular
    pub score: f64,
    /// Population variance of bedtimes (minutes squared)
    pub variance: f64,
    /// Standard deviation of bedtimes in minutes
    pub std_dev: f64,
    pub logs_count: usize,
}

/// Time spent in bed after waking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Grogginess {
    pub avg_minutes: f64,
    pub logs_count: usize,
}

/// Point on the efficiency trend line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyPoint {
    pub date: NaiveDate,
    pub efficiency: f64,
}

/// Stacked bar for the sleep architecture chart (minutes).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchitectureBar {
    pub date: NaiveDate,
    pub latency: u32,
    pub awake_duration: u32,
    pub total_sleep_time: i64,
    pub total_time_in_bed: i64,
}

/// Floating bar for the bedtime/wake consistency chart.
///
/// `sleep_start` and `wake_end` are on the overnight timeline, so a bar for
/// 23:00-07:00 spans 1380-1860.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyBar {
    pub date: NaiveDate,
    pub lights_out: ClockTime,
    pub wake_up: ClockTime,
    pub out_of_bed: ClockTime,
    pub sleep_start: i64,
    pub wake_end: i64,
    /// Lights out to wake up in minutes
    pub duration_minutes: i64,
}

/// Point on the quality-vs-duration scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityDurationPoint {
    pub date: NaiveDate,
    pub duration_hours: f64,
    pub quality: f64,
}

/// Raw input for the bedtime heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BedtimeQualityPoint {
    pub date: NaiveDate,
    pub lights_out: ClockTime,
    pub quality: f64,
}

/// Period analytics over a sleep log collection.
#[derive(Debug, Clone, Copy)]
pub struct SleepAnalytics<'a> {
    logs: &'a [SleepLogEntry],
    settings: &'a SleepSettings,
    today: NaiveDate,
}

impl<'a> SleepAnalytics<'a> {
    pub fn new(logs: &'a [SleepLogEntry], settings: &'a SleepSettings, today: NaiveDate) -> Self {
        Self {
            logs,
            settings,
            today,
        }
    }

    pub fn logs(&self) -> &'a [SleepLogEntry] {
        self.logs
    }

    pub fn settings(&self) -> &'a SleepSettings {
        self.settings
    }

    /// Derived statistics for one entry using the configured target.
    pub fn metrics(&self, entry: &SleepLogEntry) -> SleepMetrics {
        entry.metrics(self.settings.target_hours)
    }

    /// Entries inside the period, in input order.
    fn in_period(&self, period: Period) -> Vec<&'a SleepLogEntry> {
        self.logs
            .iter()
            .filter(|e| period.contains(e.date, self.today))
            .collect()
    }

    /// Entries inside the period, oldest date first.
    fn in_period_ascending(&self, period: Period) -> Vec<&'a SleepLogEntry> {
        let mut entries = self.in_period(period);
        entries.sort_by_key(|e| e.date);
        entries
    }

    /// The `n` most recent entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<&'a SleepLogEntry> {
        let mut entries: Vec<_> = self.logs.iter().collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(n);
        entries
    }

    /// Statistics for the most recent night.
    pub fn latest_stats(&self) -> Option<SleepMetrics> {
        self.recent(1).first().map(|e| self.metrics(e))
    }

    /// Statistics for the night before the most recent one.
    pub fn previous_night_stats(&self) -> Option<SleepMetrics> {
        self.recent(2).get(1).map(|e| self.metrics(e))
    }

    /// Mean quality score over every logged night.
    pub fn average_quality_score(&self) -> f64 {
        let scores: Vec<f64> = self
            .logs
            .iter()
            .map(|e| self.metrics(e).sleep_quality_score)
            .collect();
        mean(&scores)
    }

    /// Averages plus cumulative sleep debt for a period.
    pub fn stats_for_period(&self, period: Period) -> SleepPeriodStats {
        let entries = self.in_period(period);
        if entries.is_empty() {
            return SleepPeriodStats::default();
        }

        let mut total_quality = 0.0;
        let mut total_duration = 0.0;
        let mut total_sleep_debt = 0.0;
        for entry in &entries {
            let m = self.metrics(entry);
            total_quality += m.sleep_quality_score;
            total_duration += m.total_sleep_time as f64;
            total_sleep_debt += m.sleep_debt;
        }

        let n = entries.len() as f64;
        tracing::debug!(%period, logs = entries.len(), "Computed sleep period stats");

        SleepPeriodStats {
            avg_quality: total_quality / n,
            avg_duration: total_duration / n,
            total_sleep_debt,
            logs_count: entries.len(),
        }
    }

    /// Regularity of lights-out times.
    ///
    /// `score = clamp(100 - std_dev / 1.2, 0, 100)`: a 60 minute spread scores
    /// 50, two hours or more scores 0. With fewer than two nights there is
    /// no observed variability and the score is a perfect 100.
    pub fn consistency_score(&self, period: Period) -> ConsistencyScore {
        let bedtimes: Vec<f64> = self
            .in_period(period)
            .iter()
            .map(|e| consistency_bedtime_minutes(e.lights_out) as f64)
            .collect();

        if bedtimes.len() < 2 {
            return ConsistencyScore {
                score: 100.0,
                variance: 0.0,
                std_dev: 0.0,
                logs_count: bedtimes.len(),
            };
        }

        let avg = mean(&bedtimes);
        let variance =
            bedtimes.iter().map(|t| (t - avg).powi(2)).sum::<f64>() / bedtimes.len() as f64;
        let std_dev = variance.sqrt();
        let score = (100.0 - std_dev / 1.2).clamp(0.0, 100.0);

        ConsistencyScore {
            score,
            variance,
            std_dev,
            logs_count: bedtimes.len(),
        }
    }

    /// Mean minutes between waking and getting up.
    pub fn grogginess_factor(&self, period: Period) -> Grogginess {
        let spans: Vec<f64> = self
            .in_period(period)
            .iter()
            .map(|e| grogginess_span(e.wake_up, e.out_of_bed) as f64)
            .collect();

        Grogginess {
            avg_minutes: mean(&spans),
            logs_count: spans.len(),
        }
    }

    /// Mean sleep time on weekend vs weekday nights over the last 30 days.
    ///
    /// A night's side is decided by its stored calendar date.
    pub fn weekday_vs_weekend(&self) -> WeekdayWeekend {
        let (weekend, weekday): (Vec<_>, Vec<_>) = self
            .in_period(Period::MONTH)
            .into_iter()
            .partition(|e| is_weekend(e.date));

        let durations = |entries: &[&SleepLogEntry]| -> Vec<f64> {
            entries
                .iter()
                .map(|e| self.metrics(e).total_sleep_time as f64)
                .collect()
        };

        WeekdayWeekend::from_groups(&durations(&weekday), &durations(&weekend))
    }

    /// Efficiency per night, oldest first.
    pub fn efficiency_trend(&self, period: Period) -> Vec<EfficiencyPoint> {
        self.in_period_ascending(period)
            .into_iter()
            .map(|e| EfficiencyPoint {
                date: e.date,
                efficiency: self.metrics(e).sleep_efficiency,
            })
            .collect()
    }

    /// Latency / awake / asleep breakdown per night, oldest first.
    pub fn sleep_architecture_data(&self, period: Period) -> Vec<ArchitectureBar> {
        self.in_period_ascending(period)
            .into_iter()
            .map(|e| {
                let m = self.metrics(e);
                ArchitectureBar {
                    date: e.date,
                    latency: e.latency,
                    awake_duration: e.awake_duration,
                    total_sleep_time: m.total_sleep_time,
                    total_time_in_bed: m.total_time_in_bed,
                }
            })
            .collect()
    }

    /// Bedtime and wake bars, oldest first.
    pub fn consistency_chart_data(&self, period: Period) -> Vec<ConsistencyBar> {
        self.in_period_ascending(period)
            .into_iter()
            .map(|e| {
                let sleep_start = e.lights_out.on_overnight_timeline(TimelineRole::Sleep);
                let wake_end = e.wake_up.on_overnight_timeline(TimelineRole::Wake);
                ConsistencyBar {
                    date: e.date,
                    lights_out: e.lights_out,
                    wake_up: e.wake_up,
                    out_of_bed: e.out_of_bed,
                    sleep_start,
                    wake_end,
                    duration_minutes: wake_end - sleep_start,
                }
            })
            .collect()
    }

    /// Sleep hours against subjective quality. Unordered.
    pub fn quality_vs_duration_data(&self, period: Period) -> Vec<QualityDurationPoint> {
        self.in_period(period)
            .into_iter()
            .map(|e| QualityDurationPoint {
                date: e.date,
                duration_hours: self.metrics(e).total_sleep_time as f64 / 60.0,
                quality: e.subjective_quality,
            })
            .collect()
    }

    /// Lights-out and quality per night. Unordered.
    pub fn bedtime_quality_data(&self, period: Period) -> Vec<BedtimeQualityPoint> {
        self.in_period(period)
            .into_iter()
            .map(|e| BedtimeQualityPoint {
                date: e.date,
                lights_out: e.lights_out,
                quality: e.subjective_quality,
            })
            .collect()
    }

    /// Bedtime heatmap buckets for a period.
    pub fn bedtime_quality_heatmap(&self, period: Period) -> Vec<BedtimeBucket> {
        bedtime_heatmap(
            self.bedtime_quality_data(period)
                .into_iter()
                .map(|p| (p.lights_out, p.quality)),
        )
    }
}

/// Lights-out minute used for bedtime variance: small-hours bedtimes (before
/// 6am) count as the previous evening.
pub fn consistency_bedtime_minutes(lights_out: ClockTime) -> i64 {
    let minutes = lights_out.minutes();
    if lights_out.hour() < 6 {
        minutes + MINUTES_PER_DAY
    } else {
        minutes
    }
}

/// Minutes from wake-up to out-of-bed, wrapping past midnight when
/// out-of-bed is clock-before wake-up.
pub fn grogginess_span(wake_up: ClockTime, out_of_bed: ClockTime) -> i64 {
    let wake = wake_up.minutes();
    let mut out = out_of_bed.minutes();
    if out < wake {
        out += MINUTES_PER_DAY;
    }
    out - wake
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        // Sunday
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn t(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    fn night(days_ago: i64, lights_out: &str, wake_up: &str, out_of_bed: &str) -> SleepLogEntry {
        SleepLogEntry {
            id: format!("s{}", days_ago),
            date: today() - chrono::Duration::days(days_ago),
            lights_out: t(lights_out),
            wake_up: t(wake_up),
            out_of_bed: t(out_of_bed),
            latency: 15,
            awakenings: 0,
            awake_duration: 0,
            subjective_quality: 8.0,
        }
    }

    #[test]
    fn test_rollover_rules_are_distinct() {
        // Consistency bedtime: only hour < 6 rolls
        assert_eq!(consistency_bedtime_minutes(t("05:59")), 359 + 1440);
        assert_eq!(consistency_bedtime_minutes(t("06:00")), 360);
        assert_eq!(consistency_bedtime_minutes(t("23:30")), 1410);

        // Grogginess: only a negative span rolls
        assert_eq!(grogginess_span(t("07:00"), t("07:20")), 20);
        assert_eq!(grogginess_span(t("23:50"), t("00:10")), 20);
        assert_eq!(grogginess_span(t("07:00"), t("07:00")), 0);
    }

    #[test]
    fn test_empty_period_stats_are_zeroed() {
        let settings = SleepSettings::default();
        let analytics = SleepAnalytics::new(&[], &settings, today());
        assert_eq!(analytics.stats_for_period(Period::WEEK), SleepPeriodStats::default());
        assert_eq!(analytics.grogginess_factor(Period::WEEK), Grogginess::default());
        assert!(analytics.latest_stats().is_none());
        assert_eq!(analytics.average_quality_score(), 0.0);
    }

    #[test]
    fn test_stats_for_period_sums_debt() {
        let logs = vec![
            night(0, "23:00", "07:00", "07:00"),
            night(1, "23:00", "07:00", "07:00"),
            // Outside the week
            night(7, "21:00", "05:00", "05:00"),
        ];
        let settings = SleepSettings::default();
        let analytics = SleepAnalytics::new(&logs, &settings, today());

        let stats = analytics.stats_for_period(Period::WEEK);
        assert_eq!(stats.logs_count, 2);
        assert_eq!(stats.avg_duration, 465.0);
        assert!((stats.avg_quality - 90.75).abs() < 1e-9);
        // 2 × (8 - 7.75)
        assert!((stats.total_sleep_debt - 0.5).abs() < 1e-9);

        assert_eq!(analytics.stats_for_period(Period::AllTime).logs_count, 3);
    }

    #[test]
    fn test_consistency_defaults_below_two_points() {
        let settings = SleepSettings::default();
        let none = SleepAnalytics::new(&[], &settings, today()).consistency_score(Period::WEEK);
        assert_eq!((none.score, none.std_dev), (100.0, 0.0));

        let logs = vec![night(0, "01:30", "09:00", "09:00")];
        let one = SleepAnalytics::new(&logs, &settings, today()).consistency_score(Period::WEEK);
        assert_eq!((one.score, one.std_dev, one.logs_count), (100.0, 0.0, 1));
    }

    #[test]
    fn test_consistency_across_midnight() {
        // 23:00 and 01:00 are two hours apart, not 22
        let logs = vec![
            night(0, "23:00", "07:00", "07:00"),
            night(1, "01:00", "09:00", "09:00"),
        ];
        let settings = SleepSettings::default();
        let score = SleepAnalytics::new(&logs, &settings, today()).consistency_score(Period::WEEK);
        assert_eq!(score.std_dev, 60.0);
        assert_eq!(score.variance, 3600.0);
        assert!((score.score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_consistency_floor() {
        let logs = vec![
            night(0, "20:00", "07:00", "07:00"),
            night(1, "05:00", "09:00", "09:00"),
        ];
        let settings = SleepSettings::default();
        let score = SleepAnalytics::new(&logs, &settings, today()).consistency_score(Period::WEEK);
        assert_eq!(score.score, 0.0);
    }

    #[test]
    fn test_grogginess_average() {
        let logs = vec![
            night(0, "23:00", "07:00", "07:30"),
            night(1, "23:00", "07:00", "07:10"),
        ];
        let settings = SleepSettings::default();
        let g = SleepAnalytics::new(&logs, &settings, today()).grogginess_factor(Period::WEEK);
        assert_eq!(g.avg_minutes, 20.0);
        assert_eq!(g.logs_count, 2);
    }

    #[test]
    fn test_weekday_vs_weekend_all_weekdays() {
        // today is Sunday, so 2..=6 days ago are Fri..Mon
        let logs: Vec<_> = (2..=6).map(|d| night(d, "23:00", "07:00", "07:00")).collect();
        let settings = SleepSettings::default();
        let cmp = SleepAnalytics::new(&logs, &settings, today()).weekday_vs_weekend();
        assert_eq!(cmp.weekday_count, 5);
        assert_eq!(cmp.weekend_count, 0);
        assert_eq!(cmp.weekend_avg, 0.0);
        assert_eq!(cmp.weekday_avg, 465.0);
        assert_eq!(cmp.difference, -465.0);
    }

    #[test]
    fn test_weekday_vs_weekend_split() {
        let logs = vec![
            // Sunday
            night(0, "22:00", "08:00", "08:00"),
            // Saturday
            night(1, "23:00", "09:00", "09:00"),
            // Friday
            night(2, "23:00", "07:00", "07:00"),
        ];
        let settings = SleepSettings::default();
        let cmp = SleepAnalytics::new(&logs, &settings, today()).weekday_vs_weekend();
        assert_eq!(cmp.weekend_count, 2);
        assert_eq!(cmp.weekend_avg, 585.0);
        assert_eq!(cmp.weekday_avg, 465.0);
        assert_eq!(cmp.difference, 120.0);
    }

    #[test]
    fn test_trend_series_are_ascending() {
        let logs = vec![
            night(0, "23:00", "07:00", "07:00"),
            night(3, "23:00", "07:00", "07:00"),
            night(1, "23:00", "07:00", "07:00"),
        ];
        let settings = SleepSettings::default();
        let analytics = SleepAnalytics::new(&logs, &settings, today());

        let dates: Vec<_> = analytics
            .efficiency_trend(Period::WEEK)
            .iter()
            .map(|p| p.date)
            .collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);

        let bars = analytics.sleep_architecture_data(Period::WEEK);
        assert_eq!(bars.len(), 3);
        assert!(bars.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(bars[0].total_time_in_bed, 480);
        assert_eq!(bars[0].latency, 15);
    }

    #[test]
    fn test_consistency_chart_bar() {
        let logs = vec![night(0, "23:00", "07:00", "07:15")];
        let settings = SleepSettings::default();
        let bars = SleepAnalytics::new(&logs, &settings, today()).consistency_chart_data(Period::WEEK);
        assert_eq!(bars[0].sleep_start, 1380);
        assert_eq!(bars[0].wake_end, 1860);
        assert_eq!(bars[0].duration_minutes, 480);
    }

    #[test]
    fn test_quality_vs_duration_and_heatmap() {
        let mut late = night(2, "15:30", "23:00", "23:00");
        late.subjective_quality = 2.0;
        let logs = vec![night(0, "22:15", "06:15", "06:15"), late];
        let settings = SleepSettings::default();
        let analytics = SleepAnalytics::new(&logs, &settings, today());

        let scatter = analytics.quality_vs_duration_data(Period::MONTH);
        assert_eq!(scatter.len(), 2);
        assert!(scatter.iter().any(|p| (p.duration_hours - 7.75).abs() < 1e-9));

        let heatmap = analytics.bedtime_quality_heatmap(Period::MONTH);
        assert_eq!(heatmap[2].average_quality, Some(8.0));
        assert_eq!(heatmap.iter().map(|b| b.count).sum::<usize>(), 1);
    }

    #[test]
    fn test_latest_and_previous_night() {
        let mut older = night(1, "23:00", "07:00", "07:00");
        older.latency = 60;
        let logs = vec![older, night(0, "23:00", "07:00", "07:00")];
        let settings = SleepSettings::default();
        let analytics = SleepAnalytics::new(&logs, &settings, today());

        assert_eq!(analytics.latest_stats().unwrap().total_sleep_time, 465);
        assert_eq!(analytics.previous_night_stats().unwrap().total_sleep_time, 420);
    }
}
