//! habitrack-stats - hydration and sleep report CLI
//!
//! Reads a JSON snapshot exported from the data service and prints the
//! statistics page: hydration intake, streaks and patterns plus sleep
//! averages, consistency and bedtime habits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::Parser;
use habitrack_core::analytics::{
    BedtimeBucket, ConsistencyBar, ConsistencyScore, DailyTrendPoint, DayBlock, DayOfWeekStats,
    EfficiencyPoint, Grogginess, HourlyDistribution, HydrationPeriodStats, SleepPeriodStats,
    StreakInfo, WeekdayWeekend,
};
use habitrack_core::format::{
    format_clock_12h, format_debt, format_duration_minutes, format_hour, format_litres,
    format_percent, format_volume,
};
use habitrack_core::{
    Config, DayContext, HydrationAnalytics, Period, SleepAnalytics, SleepMetrics, Snapshot,
};
use serde::Serialize;

/// Trend length used for the all-time report.
const ALL_TIME_TREND_DAYS: u32 = 30;

#[derive(Parser, Debug)]
#[command(name = "habitrack-stats")]
#[command(about = "HabitTrack statistics - hydration and sleep report")]
#[command(version)]
struct Args {
    /// Snapshot JSON file with logs and settings
    snapshot: PathBuf,

    /// Report period: 7, 30 or all
    #[arg(long, default_value = "7", value_parser = parse_period)]
    period: Period,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Reference day (YYYY-MM-DD); timestamps are then bucketed in UTC
    #[arg(long)]
    today: Option<NaiveDate>,
}

fn parse_period(s: &str) -> std::result::Result<Period, String> {
    match s {
        "7" => Ok(Period::WEEK),
        "30" => Ok(Period::MONTH),
        "all" => Ok(Period::AllTime),
        other => Err(format!("unknown period '{}', use 7, 30 or all", other)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = habitrack_core::logging::init(&config.logging).ok();

    let json = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("failed to read snapshot {}", args.snapshot.display()))?;
    let snapshot = Snapshot::from_json(&json).context("failed to parse snapshot")?;

    let report = match args.today {
        Some(today) => build_report(&snapshot, &config, &DayContext::new(Utc, today), args.period),
        None => build_report(&snapshot, &config, &DayContext::local_now(), args.period),
    };

    tracing::info!(
        period = %args.period,
        hydration_logs = snapshot.hydration_logs.len(),
        sleep_logs = snapshot.sleep_logs.len(),
        "Generated report"
    );

    match args.export.as_deref() {
        Some("json") => print_json(&report)?,
        Some("md") => print_markdown(&report),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&report),
    }

    Ok(())
}

// ============================================
// Report model
// ============================================

#[derive(Debug, Serialize)]
struct Report {
    period: String,
    today: NaiveDate,
    hydration: HydrationReport,
    sleep: SleepReport,
}

#[derive(Debug, Serialize)]
struct HydrationReport {
    daily_goal: u32,
    today_intake: i64,
    yesterday_intake: i64,
    today_progress: f64,
    active_drinks: usize,
    stats: HydrationPeriodStats,
    streaks: StreakInfo,
    hourly: HourlyDistribution,
    weekday_vs_weekend: WeekdayWeekend,
    day_of_week: DayOfWeekStats,
    trend: Vec<DailyTrendPoint>,
}

#[derive(Debug, Serialize)]
struct SleepReport {
    target_hours: f64,
    nights_logged: usize,
    latest: Option<SleepMetrics>,
    previous: Option<SleepMetrics>,
    average_quality_score: f64,
    stats: SleepPeriodStats,
    consistency: ConsistencyScore,
    grogginess: Grogginess,
    weekday_vs_weekend: WeekdayWeekend,
    efficiency_trend: Vec<EfficiencyPoint>,
    consistency_bars: Vec<ConsistencyBar>,
    bedtime_heatmap: Vec<BedtimeBucket>,
}

fn build_report<Tz: TimeZone>(
    snapshot: &Snapshot,
    config: &Config,
    ctx: &DayContext<Tz>,
    period: Period,
) -> Report {
    let hydration_settings = snapshot
        .hydration_settings
        .clone()
        .unwrap_or_else(|| config.hydration_settings());
    let sleep_settings = snapshot
        .sleep_settings
        .clone()
        .unwrap_or_else(|| config.sleep_settings());

    let h = HydrationAnalytics::new(&snapshot.hydration_logs, &hydration_settings, ctx);
    let s = SleepAnalytics::new(&snapshot.sleep_logs, &sleep_settings, ctx.today());

    let hydration = HydrationReport {
        daily_goal: h.daily_goal(),
        today_intake: h.today_intake(),
        yesterday_intake: h.yesterday_intake(),
        today_progress: h.today_progress(),
        active_drinks: h.active_entries().count(),
        stats: h.stats_for_period(period),
        streaks: h.streak_info(),
        hourly: h.hourly_distribution(),
        weekday_vs_weekend: h.weekday_vs_weekend(),
        day_of_week: h.day_of_week_stats(),
        trend: h.daily_trend_data(period.days().unwrap_or(ALL_TIME_TREND_DAYS)),
    };

    let sleep = SleepReport {
        target_hours: sleep_settings.target_hours,
        nights_logged: snapshot.sleep_logs.len(),
        latest: s.latest_stats(),
        previous: s.previous_night_stats(),
        average_quality_score: s.average_quality_score(),
        stats: s.stats_for_period(period),
        consistency: s.consistency_score(period),
        grogginess: s.grogginess_factor(period),
        weekday_vs_weekend: s.weekday_vs_weekend(),
        efficiency_trend: s.efficiency_trend(period),
        consistency_bars: s.consistency_chart_data(period),
        bedtime_heatmap: s.bedtime_quality_heatmap(period),
    };

    Report {
        period: period.to_string(),
        today: ctx.today(),
        hydration,
        sleep,
    }
}

// ============================================
// Output
// ============================================

fn print_terminal(report: &Report) {
    let title = format!("HabitTrack Stats: {}", report.period);

    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    let hy = &report.hydration;
    println!("HYDRATION");
    println!(
        "   Today:    {:<12} Goal: {} ({})",
        format_litres(hy.today_intake),
        format_litres(hy.daily_goal as i64),
        format_percent(hy.today_progress)
    );
    println!(
        "   Yesterday: {:<11} In progress: {}",
        format_litres(hy.yesterday_intake),
        hy.active_drinks
    );

    if hy.stats.days_logged == 0 {
        println!("   No drinks logged for this period.");
    } else {
        println!(
            "   Average:  {:<12} Consistency: {}",
            format_volume(hy.stats.avg_intake.round() as i64),
            format_percent(hy.stats.consistency)
        );
        println!(
            "   Goal met: {} of {} logged day{}",
            hy.stats.days_at_goal,
            hy.stats.days_logged,
            plural(hy.stats.days_logged)
        );
    }
    println!(
        "   Streak:   {} day{} (longest {})",
        hy.streaks.current_streak,
        plural(hy.streaks.current_streak as usize),
        hy.streaks.longest_streak
    );
    println!("   Peak hour: {}", format_hour(hy.hourly.peak_hour));
    let parts: Vec<String> = [
        DayBlock::Morning,
        DayBlock::Afternoon,
        DayBlock::Evening,
        DayBlock::Night,
    ]
    .iter()
    .map(|block| {
        format!(
            "{} {}",
            block.label(),
            format_percent(hy.hourly.periods.share(*block))
        )
    })
    .collect();
    println!("   Day parts: {}", parts.join(" | "));
    if let (Some(best), Some(worst)) = (&hy.day_of_week.best, &hy.day_of_week.worst) {
        println!(
            "   Best day: {:<12} Worst day: {}",
            best.day_name(),
            worst.day_name()
        );
    }
    println!();

    println!("INTAKE TREND");
    for point in &hy.trend {
        let bar_len = (point.percentage / 10.0).round() as usize;
        println!(
            "   {} {:<6} {:<15} {}",
            point.date_label,
            format_volume(point.total),
            "█".repeat(bar_len),
            format_percent(point.percentage)
        );
    }
    println!();

    let sl = &report.sleep;
    println!("SLEEP");
    if let Some(latest) = &sl.latest {
        println!(
            "   Last night: {} asleep, score {:.0}, debt {}",
            format_duration_minutes(latest.total_sleep_time as f64),
            latest.sleep_quality_score,
            format_debt(latest.sleep_debt)
        );
    }
    if sl.stats.logs_count == 0 {
        println!("   No nights logged for this period.");
        println!();
        return;
    }
    println!(
        "   Average:  {:<12} Score: {:.0}",
        format_duration_minutes(sl.stats.avg_duration),
        sl.stats.avg_quality
    );
    println!(
        "   Sleep debt: {:<10} Consistency: {:.0}",
        format_debt(sl.stats.total_sleep_debt),
        sl.consistency.score
    );
    println!(
        "   Grogginess: {:.0} min   Weekend vs weekday: {}",
        sl.grogginess.avg_minutes,
        signed_minutes(sl.weekday_vs_weekend.difference)
    );
    println!();

    println!("BEDTIME VS QUALITY");
    for bucket in &sl.bedtime_heatmap {
        match (bucket.average_quality, bucket.rating()) {
            (Some(avg), Some(rating)) => println!(
                "   {:<6} {:>4.1}  {:<6} ({} night{})",
                bucket.label,
                avg,
                rating.label(),
                bucket.count,
                plural(bucket.count)
            ),
            _ => println!("   {:<6}  --   no data", bucket.label),
        }
    }
    println!();

    println!("RECENT NIGHTS");
    for bar in sl.consistency_bars.iter().rev().take(7) {
        println!(
            "   {}  {} - {}  ({})",
            bar.date.format("%a %b %d"),
            format_clock_12h(bar.lights_out),
            format_clock_12h(bar.wake_up),
            format_duration_minutes(bar.duration_minutes as f64)
        );
    }
    println!();
}

fn print_markdown(report: &Report) {
    println!("# HabitTrack Stats: {}", report.period);
    println!();

    let hy = &report.hydration;
    println!("## Hydration");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Today | {} |", format_litres(hy.today_intake));
    println!("| Yesterday | {} |", format_litres(hy.yesterday_intake));
    println!("| Daily goal | {} |", format_litres(hy.daily_goal as i64));
    println!(
        "| Average intake | {} |",
        format_volume(hy.stats.avg_intake.round() as i64)
    );
    println!("| Consistency | {} |", format_percent(hy.stats.consistency));
    println!("| Days at goal | {} |", hy.stats.days_at_goal);
    println!("| Current streak | {} days |", hy.streaks.current_streak);
    println!("| Longest streak | {} days |", hy.streaks.longest_streak);
    println!("| Peak hour | {} |", format_hour(hy.hourly.peak_hour));
    println!();

    println!("### Time of Day");
    println!();
    for block in DayBlock::ALL {
        println!(
            "- **{}** ({}): {}",
            block.label(),
            block.range_label(),
            format_percent(hy.hourly.periods.share(block))
        );
    }
    println!();

    println!("### Daily Trend");
    println!();
    println!("| Day | Date | Total | Goal |");
    println!("|-----|------|-------|------|");
    for point in &hy.trend {
        println!(
            "| {} | {} | {} | {} |",
            point.date_label,
            point.date,
            format_volume(point.total),
            format_percent(point.percentage)
        );
    }
    println!();

    let sl = &report.sleep;
    println!("## Sleep");
    println!();
    if sl.stats.logs_count == 0 {
        println!("*No nights logged for this period.*");
        println!();
    } else {
        println!("| Metric | Value |");
        println!("|--------|-------|");
        println!(
            "| Average sleep | {} |",
            format_duration_minutes(sl.stats.avg_duration)
        );
        println!("| Average score | {:.0} |", sl.stats.avg_quality);
        println!("| Sleep debt | {} |", format_debt(sl.stats.total_sleep_debt));
        println!("| Consistency | {:.0} |", sl.consistency.score);
        println!("| Grogginess | {:.0} min |", sl.grogginess.avg_minutes);
        println!(
            "| Weekend vs weekday | {} |",
            signed_minutes(sl.weekday_vs_weekend.difference)
        );
        println!();

        println!("### Bedtime vs Quality");
        println!();
        for bucket in &sl.bedtime_heatmap {
            match (bucket.average_quality, bucket.rating()) {
                (Some(avg), Some(rating)) => println!(
                    "- **{}:** {:.1} ({}, {} night{})",
                    bucket.label,
                    avg,
                    rating.label(),
                    bucket.count,
                    plural(bucket.count)
                ),
                _ => println!("- **{}:** no data", bucket.label),
            }
        }
        println!();
    }

    println!("---");
    println!("*Generated by habitrack-stats*");
}

fn print_json(report: &Report) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn signed_minutes(minutes: f64) -> String {
    let rounded = minutes.round() as i64;
    if rounded > 0 {
        format!("+{} min", rounded)
    } else {
        format!("{} min", rounded)
    }
}
