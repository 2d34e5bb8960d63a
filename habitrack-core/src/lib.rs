//! # habitrack-core
//!
//! Core library for habitrack - a personal hydration and sleep tracker.
//!
//! This library provides:
//! - Domain types for drinks, nights and per-user settings
//! - Hydration and sleep analytics (period stats, streaks, chart series)
//! - An in-memory journal for the entry lifecycle
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through two layers:
//! - **Records:** log entries and settings, as stored by the data service
//!   and loaded through a [`Snapshot`]
//! - **Derived:** per-night metrics and period analytics, recomputed on
//!   demand and never stored
//!
//! Every analytic takes its logs, settings and reference day explicitly.
//!
//! ## Example
//!
//! ```rust,no_run
//! use habitrack_core::{Config, DayContext, HydrationAnalytics, Period, Snapshot};
//!
//! let config = Config::load().expect("failed to load config");
//! let json = std::fs::read_to_string("snapshot.json").expect("failed to read snapshot");
//! let snapshot = Snapshot::from_json(&json).expect("invalid snapshot");
//!
//! let settings = snapshot
//!     .hydration_settings
//!     .clone()
//!     .unwrap_or_else(|| config.hydration_settings());
//! let ctx = DayContext::local_now();
//! let hydration = HydrationAnalytics::new(&snapshot.hydration_logs, &settings, &ctx);
//! println!("{:?}", hydration.stats_for_period(Period::WEEK));
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{HydrationAnalytics, SleepAnalytics, SleepMetrics};
pub use config::Config;
pub use error::{Error, Result};
pub use journal::Journal;
pub use time::{ClockTime, DayContext, Period};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod journal;
pub mod logging;
pub mod time;
pub mod types;
