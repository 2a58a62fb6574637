//! Window calculator — the two due dates a run looks at.
//!
//! "Today" is the calendar date in the configured timezone (or the caller's
//! override), and the early window is `today + lead_days`.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

use duewise_common::error::AppError;

/// Default lead time for the early reminder.
pub const DEFAULT_LEAD_DAYS: u32 = 3;

/// The target due dates for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderWindow {
    pub today: NaiveDate,
    pub due_in_3: NaiveDate,
}

/// Pure date arithmetic for a fixed timezone.
#[derive(Debug, Clone)]
pub struct WindowCalculator {
    tz: Tz,
    lead_days: u32,
}

impl WindowCalculator {
    /// Build a calculator for an IANA timezone name (e.g. `"Europe/Berlin"`).
    pub fn new(timezone: &str, lead_days: u32) -> Result<Self, AppError> {
        let tz: Tz = timezone
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Unknown timezone '{}': {}", timezone, e)))?;
        Ok(Self { tz, lead_days })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Compute the window against the wall clock.
    pub fn compute(&self, override_date: Option<&str>) -> Result<ReminderWindow, AppError> {
        self.compute_at(Utc::now(), override_date)
    }

    /// Compute the window as if the current instant were `now`.
    ///
    /// A non-blank `override_date` (ISO `YYYY-MM-DD`) replaces "today" and
    /// makes the result independent of `now`.
    pub fn compute_at(
        &self,
        now: DateTime<Utc>,
        override_date: Option<&str>,
    ) -> Result<ReminderWindow, AppError> {
        let today = match override_date.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<NaiveDate>().map_err(|_| {
                AppError::Validation(format!(
                    "Invalid date override '{}': expected YYYY-MM-DD",
                    raw
                ))
            })?,
            None => now.with_timezone(&self.tz).date_naive(),
        };

        let due_in_3 = today
            .checked_add_days(Days::new(u64::from(self.lead_days)))
            .ok_or_else(|| AppError::Validation(format!("Date out of range: {}", today)))?;

        Ok(ReminderWindow { today, due_in_3 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_override_is_independent_of_clock() {
        let calc = WindowCalculator::new("UTC", DEFAULT_LEAD_DAYS).unwrap();
        let a = calc
            .compute_at(Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap(), Some("2025-01-01"))
            .unwrap();
        let b = calc.compute(Some("2025-01-01")).unwrap();

        assert_eq!(a.today, date("2025-01-01"));
        assert_eq!(a.due_in_3, date("2025-01-04"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_month_and_year_rollover() {
        let calc = WindowCalculator::new("UTC", DEFAULT_LEAD_DAYS).unwrap();
        let w = calc.compute(Some("2024-12-30")).unwrap();
        assert_eq!(w.due_in_3, date("2025-01-02"));

        let leap = calc.compute(Some("2024-02-27")).unwrap();
        assert_eq!(leap.due_in_3, date("2024-03-01"));
    }

    #[test]
    fn test_malformed_override_is_validation_error() {
        let calc = WindowCalculator::new("UTC", DEFAULT_LEAD_DAYS).unwrap();
        for bad in ["2025-13-01", "01/01/2025", "tomorrow", "2025-02-30"] {
            let err = calc.compute(Some(bad)).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_blank_override_uses_clock() {
        let calc = WindowCalculator::new("UTC", DEFAULT_LEAD_DAYS).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let w = calc.compute_at(now, Some("  ")).unwrap();
        assert_eq!(w.today, date("2025-03-10"));
    }

    #[test]
    fn test_today_follows_timezone() {
        // 23:30 UTC on Jan 1 is already Jan 2 in Tokyo.
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 23, 30, 0).unwrap();

        let utc = WindowCalculator::new("UTC", DEFAULT_LEAD_DAYS).unwrap();
        let tokyo = WindowCalculator::new("Asia/Tokyo", DEFAULT_LEAD_DAYS).unwrap();

        assert_eq!(utc.compute_at(now, None).unwrap().today, date("2025-01-01"));
        let w = tokyo.compute_at(now, None).unwrap();
        assert_eq!(w.today, date("2025-01-02"));
        assert_eq!(w.due_in_3, date("2025-01-05"));
    }

    #[test]
    fn test_custom_lead_days() {
        let calc = WindowCalculator::new("UTC", 7).unwrap();
        let w = calc.compute(Some("2025-01-01")).unwrap();
        assert_eq!(w.due_in_3, date("2025-01-08"));
    }

    #[test]
    fn test_unknown_timezone_is_config_error() {
        let err = WindowCalculator::new("Mars/Olympus_Mons", DEFAULT_LEAD_DAYS).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
