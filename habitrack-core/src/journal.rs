//! In-memory log journal.
//!
//! [`Journal`] holds one user's hydration and sleep logs in the order the
//! data service returns them: drinks newest `logged_at` first, nights newest
//! `date` first. It owns the lifecycle of an entry (start, finish, delete)
//! and hands out slices for the analytics to borrow.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::time::ClockTime;
use crate::types::{HydrationLogEntry, SleepLogEntry, Snapshot};

/// Label given to drinks logged without one.
pub const DEFAULT_DRINK_LABEL: &str = "Quick Add";

/// A night as entered by the user, before it is assigned an id and a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepInput {
    pub lights_out: ClockTime,
    pub wake_up: ClockTime,
    pub out_of_bed: ClockTime,
    pub latency: u32,
    pub awakenings: u32,
    pub awake_duration: u32,
    pub subjective_quality: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Journal {
    hydration: Vec<HydrationLogEntry>,
    sleep: Vec<SleepLogEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a journal from a snapshot, restoring newest-first order.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut journal = Self {
            hydration: snapshot.hydration_logs.clone(),
            sleep: snapshot.sleep_logs.clone(),
        };
        journal.hydration.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));
        journal.sleep.sort_by(|a, b| b.date.cmp(&a.date));
        journal
    }

    pub fn hydration_logs(&self) -> &[HydrationLogEntry] {
        &self.hydration
    }

    pub fn sleep_logs(&self) -> &[SleepLogEntry] {
        &self.sleep
    }

    /// Begin a drink that is finished later with [`Journal::finish_drink`].
    pub fn start_drink(
        &mut self,
        amount: u32,
        label: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<&HydrationLogEntry> {
        self.insert_drink(amount, label, now, None)
    }

    /// Log a drink that is already finished.
    pub fn add_drink(
        &mut self,
        amount: u32,
        label: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<&HydrationLogEntry> {
        self.insert_drink(amount, label, now, Some(now))
    }

    fn insert_drink(
        &mut self,
        amount: u32,
        label: Option<&str>,
        logged_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<&HydrationLogEntry> {
        let entry = HydrationLogEntry {
            id: Uuid::new_v4().to_string(),
            amount,
            label: label.unwrap_or(DEFAULT_DRINK_LABEL).to_string(),
            logged_at,
            completed_at,
        };
        entry.validate()?;

        tracing::debug!(
            id = %entry.id,
            amount,
            active = entry.is_active(),
            "Logged drink"
        );

        let pos = self
            .hydration
            .iter()
            .position(|e| e.logged_at <= logged_at)
            .unwrap_or(self.hydration.len());
        self.hydration.insert(pos, entry);
        Ok(&self.hydration[pos])
    }

    /// Mark an active drink as finished.
    pub fn finish_drink(&mut self, id: &str, now: DateTime<Utc>) -> Result<&HydrationLogEntry> {
        let entry = self
            .hydration
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))?;

        if entry.is_completed() {
            return Err(Error::AlreadyCompleted(id.to_string()));
        }
        if now < entry.logged_at {
            return Err(Error::InvalidEntry(format!(
                "drink {} cannot finish before it started",
                id
            )));
        }

        entry.completed_at = Some(now);
        tracing::debug!(id, "Finished drink");
        Ok(entry)
    }

    pub fn delete_hydration(&mut self, id: &str) -> Result<HydrationLogEntry> {
        let pos = self
            .hydration
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))?;
        Ok(self.hydration.remove(pos))
    }

    /// Record a night attributed to `date`.
    ///
    /// Subjective quality is rounded to a whole number as the data service
    /// stores it.
    pub fn add_sleep(&mut self, date: NaiveDate, input: SleepInput) -> Result<&SleepLogEntry> {
        let entry = SleepLogEntry {
            id: Uuid::new_v4().to_string(),
            date,
            lights_out: input.lights_out,
            wake_up: input.wake_up,
            out_of_bed: input.out_of_bed,
            latency: input.latency,
            awakenings: input.awakenings,
            awake_duration: input.awake_duration,
            subjective_quality: input.subjective_quality.round(),
        };
        entry.validate()?;

        tracing::debug!(id = %entry.id, %date, "Logged night");

        let pos = self
            .sleep
            .iter()
            .position(|e| e.date <= date)
            .unwrap_or(self.sleep.len());
        self.sleep.insert(pos, entry);
        Ok(&self.sleep[pos])
    }

    pub fn delete_sleep(&mut self, id: &str) -> Result<SleepLogEntry> {
        let pos = self
            .sleep
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))?;
        Ok(self.sleep.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, hour, 0, 0).unwrap()
    }

    fn night(quality: f64) -> SleepInput {
        SleepInput {
            lights_out: ClockTime::parse("23:00").unwrap(),
            wake_up: ClockTime::parse("06:45").unwrap(),
            out_of_bed: ClockTime::parse("07:00").unwrap(),
            latency: 15,
            awakenings: 1,
            awake_duration: 5,
            subjective_quality: quality,
        }
    }

    #[test]
    fn test_add_drink_defaults() {
        let mut journal = Journal::new();
        let entry = journal.add_drink(250, None, at(9)).unwrap();
        assert_eq!(entry.label, "Quick Add");
        assert!(entry.is_completed());
        assert_eq!(entry.completed_at, Some(at(9)));
    }

    #[test]
    fn test_drink_lifecycle() {
        let mut journal = Journal::new();
        let id = journal.start_drink(500, Some("Bottle"), at(9)).unwrap().id.clone();
        assert!(journal.hydration_logs()[0].is_active());

        let finished = journal.finish_drink(&id, at(10)).unwrap();
        assert_eq!(finished.completed_at, Some(at(10)));

        let err = journal.finish_drink(&id, at(11)).unwrap_err();
        assert!(matches!(err, Error::AlreadyCompleted(_)));

        let removed = journal.delete_hydration(&id).unwrap();
        assert_eq!(removed.amount, 500);
        assert!(journal.hydration_logs().is_empty());
    }

    #[test]
    fn test_finish_unknown_drink() {
        let mut journal = Journal::new();
        let err = journal.finish_drink("missing", at(9)).unwrap_err();
        assert!(matches!(err, Error::EntryNotFound(_)));
        assert!(journal.delete_hydration("missing").is_err());
    }

    #[test]
    fn test_finish_before_start_rejected() {
        let mut journal = Journal::new();
        let id = journal.start_drink(300, None, at(9)).unwrap().id.clone();
        let err = journal.finish_drink(&id, at(9) - Duration::minutes(5)).unwrap_err();
        assert!(matches!(err, Error::InvalidEntry(_)));
        assert!(journal.hydration_logs()[0].is_active());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut journal = Journal::new();
        assert!(journal.add_drink(0, None, at(9)).is_err());
        assert!(journal.hydration_logs().is_empty());
    }

    #[test]
    fn test_newest_first_ordering() {
        let mut journal = Journal::new();
        journal.add_drink(100, None, at(9)).unwrap();
        journal.add_drink(200, None, at(14)).unwrap();
        journal.add_drink(300, None, at(11)).unwrap();
        let amounts: Vec<u32> = journal.hydration_logs().iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![200, 300, 100]);
    }

    #[test]
    fn test_sleep_lifecycle() {
        let mut journal = Journal::new();
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        journal.add_sleep(d1, night(7.4)).unwrap();
        let id = journal.add_sleep(d2, night(8.0)).unwrap().id.clone();

        assert_eq!(journal.sleep_logs()[0].date, d2);
        assert_eq!(journal.sleep_logs()[1].subjective_quality, 7.0);

        journal.delete_sleep(&id).unwrap();
        assert_eq!(journal.sleep_logs().len(), 1);
        assert!(matches!(
            journal.delete_sleep(&id).unwrap_err(),
            Error::EntryNotFound(_)
        ));
    }

    #[test]
    fn test_sleep_quality_validated() {
        let mut journal = Journal::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(journal.add_sleep(date, night(11.0)).is_err());
        assert!(journal.sleep_logs().is_empty());
    }
}
