use chrono::NaiveDate;

use crate::error::ValidationError;

/// Inclusive calendar date range. Construction enforces `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::StartAfterEnd { start, end });
        }
        Ok(DateRange { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of dates in the range, end inclusive. Never zero: construction
    /// rejects `start > end`.
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Lazy iterator over every date in the range. Each call starts a fresh
    /// cursor, so the range can be walked any number of times, and each
    /// yielded date is an independent value (`NaiveDate` is `Copy`) -- no
    /// iteration shares state with another.
    pub fn iter(&self) -> DateRangeIter {
        DateRangeIter {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for &DateRange {
    type Item = NaiveDate;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct DateRangeIter {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateRangeIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = if current < self.end {
            current.succ_opt()
        } else {
            None
        };
        Some(current)
    }
}
