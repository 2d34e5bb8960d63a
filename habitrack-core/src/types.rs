//! Core domain types for habitrack
//!
//! Two log streams are tracked per user:
//!
//! | Term | Definition |
//! |------|------------|
//! | **Hydration entry** | A drink, `amount` in millilitres |
//! | **Active entry** | A drink in progress (`completed_at` unset) |
//! | **History entry** | A finished drink (`completed_at` set) |
//! | **Sleep entry** | One night, attributed to a calendar `date` |
//! | **Date key** | The calendar day a record is bucketed into |
//!
//! Records arrive from the data service as JSON rows. Clock strings are
//! validated and legacy preset arrays are normalized while deserializing, so
//! the analytics never re-check them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::sleep_metrics::{self, SleepMetrics};
use crate::error::{Error, Result};
use crate::time::ClockTime;

// ============================================
// Hydration
// ============================================

/// A single drink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationLogEntry {
    /// Unique identifier assigned at creation
    pub id: String,
    /// Volume in millilitres
    pub amount: u32,
    /// Free-text description
    #[serde(default)]
    pub label: String,
    /// When the drink was logged or started
    pub logged_at: DateTime<Utc>,
    /// When the drink was finished (None while in progress)
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl HydrationLogEntry {
    /// Drink still in progress.
    pub fn is_active(&self) -> bool {
        self.completed_at.is_none()
    }

    /// Finished drink that counts toward totals.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Check field ranges.
    pub fn validate(&self) -> Result<()> {
        if self.amount == 0 {
            return Err(Error::InvalidEntry(format!(
                "hydration entry {} has zero amount",
                self.id
            )));
        }
        if let Some(done) = self.completed_at {
            if done < self.logged_at {
                return Err(Error::InvalidEntry(format!(
                    "hydration entry {} completed before it was logged",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// A quick-add button definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PresetRepr")]
pub struct Preset {
    /// Volume in millilitres
    pub amount: u32,
    /// Optional button label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Preset {
    pub fn new(amount: u32) -> Self {
        Self {
            amount,
            label: None,
        }
    }

    pub fn labeled(amount: u32, label: impl Into<String>) -> Self {
        Self {
            amount,
            label: Some(label.into()),
        }
    }
}

/// Stored preset shapes: older rows hold bare numbers, newer ones objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum PresetRepr {
    Legacy(u32),
    Full {
        amount: u32,
        #[serde(default)]
        label: Option<String>,
    },
}

impl From<PresetRepr> for Preset {
    fn from(repr: PresetRepr) -> Self {
        match repr {
            PresetRepr::Legacy(amount) => Preset::new(amount),
            PresetRepr::Full { amount, label } => Preset { amount, label },
        }
    }
}

/// Per-user hydration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationSettings {
    /// Target volume per day in millilitres
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    /// Ordered quick-add buttons
    #[serde(default = "default_presets")]
    pub presets: Vec<Preset>,
}

impl Default for HydrationSettings {
    fn default() -> Self {
        Self {
            daily_goal: default_daily_goal(),
            presets: default_presets(),
        }
    }
}

impl HydrationSettings {
    pub fn validate(&self) -> Result<()> {
        if self.daily_goal == 0 {
            return Err(Error::Config("daily_goal must be positive".to_string()));
        }
        if self.presets.iter().any(|p| p.amount == 0) {
            return Err(Error::Config("preset amounts must be positive".to_string()));
        }
        Ok(())
    }
}

pub(crate) fn default_daily_goal() -> u32 {
    2500
}

pub(crate) fn default_presets() -> Vec<Preset> {
    vec![Preset::new(250), Preset::new(500), Preset::new(750)]
}

// ============================================
// Sleep
// ============================================

/// One night of sleep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepLogEntry {
    /// Unique identifier
    pub id: String,
    /// Calendar day this session is attributed to
    pub date: NaiveDate,
    /// When the lights went out
    pub lights_out: ClockTime,
    /// Final awakening
    pub wake_up: ClockTime,
    /// When the user got out of bed
    pub out_of_bed: ClockTime,
    /// Minutes to fall asleep
    pub latency: u32,
    /// Number of night wake-ups
    pub awakenings: u32,
    /// Total minutes awake during the night
    pub awake_duration: u32,
    /// Self-rated quality, 1-10 in half steps
    pub subjective_quality: f64,
}

impl SleepLogEntry {
    /// Derived per-night statistics.
    pub fn metrics(&self, target_hours: f64) -> SleepMetrics {
        sleep_metrics::calculate(self, target_hours)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.subjective_quality.is_finite()
            || !(1.0..=10.0).contains(&self.subjective_quality)
        {
            return Err(Error::InvalidEntry(format!(
                "sleep entry {} has quality {} outside 1-10",
                self.id, self.subjective_quality
            )));
        }
        Ok(())
    }
}

/// Per-user sleep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSettings {
    /// Nightly sleep target in hours
    #[serde(default = "default_target_hours")]
    pub target_hours: f64,
    /// Intended lights-out time
    #[serde(default = "default_target_bedtime")]
    pub target_bedtime: ClockTime,
    /// Intended wake time
    #[serde(default = "default_target_wake_time")]
    pub target_wake_time: ClockTime,
}

impl Default for SleepSettings {
    fn default() -> Self {
        Self {
            target_hours: default_target_hours(),
            target_bedtime: default_target_bedtime(),
            target_wake_time: default_target_wake_time(),
        }
    }
}

impl SleepSettings {
    /// Target must be 4-12 hours in half-hour steps.
    pub fn validate(&self) -> Result<()> {
        let h = self.target_hours;
        if !h.is_finite() || !(4.0..=12.0).contains(&h) {
            return Err(Error::Config(format!(
                "target_hours must be between 4 and 12, got {}",
                h
            )));
        }
        if (h * 2.0).fract() != 0.0 {
            return Err(Error::Config(format!(
                "target_hours must be in half-hour steps, got {}",
                h
            )));
        }
        Ok(())
    }
}

pub(crate) fn default_target_hours() -> f64 {
    8.0
}

pub(crate) fn default_target_bedtime() -> ClockTime {
    ClockTime::DEFAULT_BEDTIME
}

pub(crate) fn default_target_wake_time() -> ClockTime {
    ClockTime::DEFAULT_WAKE_TIME
}

// ============================================
// Snapshot
// ============================================

/// A consistent view of one user's logs and settings as handed over by the
/// data service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub hydration_logs: Vec<HydrationLogEntry>,
    #[serde(default)]
    pub hydration_settings: Option<HydrationSettings>,
    #[serde(default)]
    pub sleep_logs: Vec<SleepLogEntry>,
    #[serde(default)]
    pub sleep_settings: Option<SleepSettings>,
}

impl Snapshot {
    /// Parse and validate a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        tracing::debug!(
            hydration_logs = snapshot.hydration_logs.len(),
            sleep_logs = snapshot.sleep_logs.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Validate every record and any embedded settings.
    pub fn validate(&self) -> Result<()> {
        for entry in &self.hydration_logs {
            entry.validate()?;
        }
        for entry in &self.sleep_logs {
            entry.validate()?;
        }
        if let Some(settings) = &self.hydration_settings {
            settings.validate()?;
        }
        if let Some(settings) = &self.sleep_settings {
            settings.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_presets_normalize() {
        let settings: HydrationSettings =
            serde_json::from_str(r#"{"daily_goal": 2000, "presets": [250, 500]}"#).unwrap();
        assert_eq!(settings.presets, vec![Preset::new(250), Preset::new(500)]);

        let json = serde_json::to_value(&settings.presets).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "amount": 250 }, { "amount": 500 }])
        );
    }

    #[test]
    fn test_mixed_presets() {
        let presets: Vec<Preset> =
            serde_json::from_str(r#"[330, {"amount": 500, "label": "Bottle"}, {"amount": 750}]"#)
                .unwrap();
        assert_eq!(
            presets,
            vec![
                Preset::new(330),
                Preset::labeled(500, "Bottle"),
                Preset::new(750)
            ]
        );
    }

    #[test]
    fn test_settings_defaults() {
        let settings: HydrationSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, HydrationSettings::default());
        assert_eq!(settings.daily_goal, 2500);

        let sleep: SleepSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(sleep.target_hours, 8.0);
        assert_eq!(sleep.target_bedtime.to_string(), "23:00");
        assert_eq!(sleep.target_wake_time.to_string(), "07:00");
    }

    #[test]
    fn test_sleep_settings_validation() {
        let mut settings = SleepSettings::default();
        assert!(settings.validate().is_ok());
        settings.target_hours = 7.5;
        assert!(settings.validate().is_ok());
        settings.target_hours = 7.25;
        assert!(settings.validate().is_err());
        settings.target_hours = 13.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_sleep_entry_from_row() {
        let entry: SleepLogEntry = serde_json::from_str(
            r#"{
                "id": "s1",
                "date": "2024-03-10",
                "lights_out": "23:15",
                "wake_up": "06:50",
                "out_of_bed": "07:05",
                "latency": 12,
                "awakenings": 1,
                "awake_duration": 5,
                "subjective_quality": 7.5
            }"#,
        )
        .unwrap();
        assert_eq!(entry.lights_out.minutes(), 23 * 60 + 15);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_snapshot_rejects_bad_clock() {
        let json = r#"{
            "sleep_logs": [{
                "id": "s1", "date": "2024-03-10",
                "lights_out": "25:00", "wake_up": "07:00", "out_of_bed": "07:10",
                "latency": 10, "awakenings": 0, "awake_duration": 0,
                "subjective_quality": 6
            }]
        }"#;
        assert!(Snapshot::from_json(json).is_err());
    }

    #[test]
    fn test_hydration_entry_state() {
        let now = Utc::now();
        let mut entry = HydrationLogEntry {
            id: "h1".to_string(),
            amount: 250,
            label: "Glass".to_string(),
            logged_at: now,
            completed_at: None,
        };
        assert!(entry.is_active());
        entry.completed_at = Some(now);
        assert!(entry.is_completed());
        assert!(entry.validate().is_ok());

        entry.amount = 0;
        assert!(entry.validate().is_err());
    }
}
