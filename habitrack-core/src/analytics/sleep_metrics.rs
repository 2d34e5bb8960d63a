//! Per-night sleep statistics.
//!
//! Everything here is derived from a single [`SleepLogEntry`] and the user's
//! nightly target. Values are recomputed on demand and never stored as the
//! primary truth.
//!
//! ## Sleep Quality Score
//!
//! A 100-point score made of four components, summed without an overall
//! clamp:
//!
//! | Component | Formula | Max |
//! |-----------|---------|-----|
//! | Efficiency | `min(efficiency, 100) * 0.4` | 40 |
//! | Feel | `subjective_quality * 4` | 40 |
//! | Latency | 10-25 min → 10, 25-45 → 5, under 10 → 7, over 45 → 0 | 10 |
//! | Awake | `max(0, 10 - 2*awakenings - awake_duration/10)` | 10 |

use serde::Serialize;

use crate::time::{ClockTime, MINUTES_PER_DAY};
use crate::types::SleepLogEntry;

/// Derived statistics for one night.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SleepMetrics {
    /// Minutes from lights out to getting out of bed
    pub total_time_in_bed: i64,
    /// Minutes actually asleep
    pub total_sleep_time: i64,
    /// Sleep time as a percentage of time in bed (0-100)
    pub sleep_efficiency: f64,
    /// Composite quality score (see module docs)
    pub sleep_quality_score: f64,
    /// Hours short of target (negative means surplus)
    pub sleep_debt: f64,
}

/// Breakdown of the quality score into its components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityComponents {
    pub efficiency: f64,
    pub feel: f64,
    pub latency: f64,
    pub awake: f64,
}

impl QualityComponents {
    pub fn total(&self) -> f64 {
        self.efficiency + self.feel + self.latency + self.awake
    }
}

/// Compute all derived statistics for one night.
pub fn calculate(entry: &SleepLogEntry, target_hours: f64) -> SleepMetrics {
    let total_time_in_bed = time_in_bed_span(entry.lights_out, entry.out_of_bed).max(0);
    let total_sleep_time = (total_time_in_bed
        - entry.latency as i64
        - entry.awake_duration as i64)
        .max(0);
    let sleep_efficiency = efficiency(total_sleep_time, total_time_in_bed);
    let sleep_quality_score = quality_components(entry, sleep_efficiency).total();
    let sleep_debt = target_hours - total_sleep_time as f64 / 60.0;

    SleepMetrics {
        total_time_in_bed,
        total_sleep_time,
        sleep_efficiency,
        sleep_quality_score,
        sleep_debt,
    }
}

/// Raw lights-out to out-of-bed span in minutes.
///
/// When lights out is past noon and later on the clock than out-of-bed, the
/// session crossed midnight and out-of-bed moves to the next day. A
/// morning lights-out that is clock-after out-of-bed stays negative; callers
/// clamp it to zero.
pub fn time_in_bed_span(lights_out: ClockTime, out_of_bed: ClockTime) -> i64 {
    let start = lights_out.minutes();
    let mut end = out_of_bed.minutes();

    if start > end && start > 12 * 60 {
        end += MINUTES_PER_DAY;
    }

    end - start
}

/// Sleep time as a percentage of time in bed; 0 when no time in bed.
pub fn efficiency(total_sleep_time: i64, total_time_in_bed: i64) -> f64 {
    if total_time_in_bed > 0 {
        total_sleep_time as f64 / total_time_in_bed as f64 * 100.0
    } else {
        0.0
    }
}

/// Score components for one night given its efficiency.
pub fn quality_components(entry: &SleepLogEntry, sleep_efficiency: f64) -> QualityComponents {
    QualityComponents {
        efficiency: sleep_efficiency.min(100.0) * 0.4,
        feel: entry.subjective_quality * 4.0,
        latency: latency_score(entry.latency),
        awake: awake_score(entry.awakenings, entry.awake_duration),
    }
}

/// Latency component. Falling asleep in 10-25 minutes scores best; very fast
/// sleep onset can mean deprivation and earns partial points.
pub fn latency_score(latency: u32) -> f64 {
    match latency {
        10..=25 => 10.0,
        26..=45 => 5.0,
        0..=9 => 7.0,
        _ => 0.0,
    }
}

/// Awake component: 10 points less 2 per awakening and 1 per 10 minutes awake,
/// floored at zero.
pub fn awake_score(awakenings: u32, awake_duration: u32) -> f64 {
    (10.0 - awakenings as f64 * 2.0 - awake_duration as f64 / 10.0).max(0.0)
}
