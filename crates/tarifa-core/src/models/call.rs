//! Call record model
//!
//! Represents a single completed call taken from the event log.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single call between two phone lines
///
/// Immutable once constructed: the record is built from one log event and
/// shared read-only by every history that lists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Caller number
    caller_number: String,

    /// Callee number
    callee_number: String,

    /// When the call was placed
    time: NaiveDateTime,

    /// Total call duration in seconds (never negative)
    duration_seconds: i32,

    /// Caller coordinates (longitude, latitude)
    caller_location: (f64, f64),

    /// Callee coordinates (longitude, latitude)
    callee_location: (f64, f64),
}

impl Call {
    /// Create a new call record
    ///
    /// `duration_seconds` must be non-negative; the dataset layer validates
    /// this before any `Call` is constructed.
    pub fn new(
        caller_number: impl Into<String>,
        callee_number: impl Into<String>,
        time: NaiveDateTime,
        duration_seconds: i32,
        caller_location: (f64, f64),
        callee_location: (f64, f64),
    ) -> Self {
        debug_assert!(duration_seconds >= 0, "call duration must be non-negative");
        Self {
            caller_number: caller_number.into(),
            callee_number: callee_number.into(),
            time,
            duration_seconds,
            caller_location,
            callee_location,
        }
    }

    /// Caller number
    #[inline]
    pub fn caller_number(&self) -> &str {
        &self.caller_number
    }

    /// Callee number
    #[inline]
    pub fn callee_number(&self) -> &str {
        &self.callee_number
    }

    /// When the call was placed
    #[inline]
    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    /// Total duration in seconds
    #[inline]
    pub fn duration_seconds(&self) -> i32 {
        self.duration_seconds
    }

    /// Caller coordinates (longitude, latitude)
    #[inline]
    pub fn caller_location(&self) -> (f64, f64) {
        self.caller_location
    }

    /// Callee coordinates (longitude, latitude)
    #[inline]
    pub fn callee_location(&self) -> (f64, f64) {
        self.callee_location
    }

    /// Duration converted to whole billable minutes
    ///
    /// Rounds up: any started minute counts in full, so a 1-second call
    /// bills one minute.
    #[inline]
    pub fn billable_minutes(&self) -> i32 {
        (self.duration_seconds + 59) / 60
    }

    /// Duration formatted for display as MM:SS
    pub fn display_duration(&self) -> String {
        let mins = self.duration_seconds / 60;
        let secs = self.duration_seconds % 60;
        format!("{:02}:{:02}", mins, secs)
    }
}
