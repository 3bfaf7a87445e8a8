use super::types::SchedError;
use chrono::{Duration, NaiveDate};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Fenêtre de planification : `length` jours contigus à partir de `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterWindow {
    start: NaiveDate,
    length: u32,
}

impl RosterWindow {
    pub fn new(start: NaiveDate, length: u32) -> Result<Self, SchedError> {
        if length == 0 {
            return Err(SchedError::InvalidWindow(
                "window length must be positive".to_string(),
            ));
        }
        start
            .checked_add_signed(Duration::days(i64::from(length) - 1))
            .ok_or_else(|| SchedError::InvalidWindow("window end overflows the calendar".to_string()))?;
        Ok(Self { start, length })
    }

    /// Fenêtre par défaut (7 jours).
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            length: DEFAULT_WINDOW_DAYS,
        }
    }

    /// Parse `YYYY-MM-DD` ; toute longueur <= 0 est rejetée.
    pub fn parse(start: &str, length: i64) -> Result<Self, SchedError> {
        let start = NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d")
            .map_err(|e| SchedError::InvalidWindow(format!("unparsable start date {start:?}: {e}")))?;
        if length <= 0 {
            return Err(SchedError::InvalidWindow(format!(
                "window length must be positive, got {length}"
            )));
        }
        let length = u32::try_from(length)
            .map_err(|_| SchedError::InvalidWindow(format!("window length too large: {length}")))?;
        Self::new(start, length)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn len(&self) -> u32 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Dernier jour (inclus).
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(i64::from(self.length) - 1)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..i64::from(self.length)).map(move |offset| start + Duration::days(offset))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if !self.contains(date) {
            return None;
        }
        usize::try_from(date.signed_duration_since(self.start).num_days()).ok()
    }
}
