//! Event log records
//!
//! One entry per communication event, tagged by type. Only call events are
//! billable; SMS events still carry a timestamp and therefore participate
//! in month-boundary detection.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tarifa_core::models::Call;

/// Timestamp format used by the event log: `2018-01-03 02:14:31`
pub(crate) mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A single event from the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TelecomEvent {
    /// A completed call
    Call(CallEvent),
    /// A text message (recorded, never billed)
    Sms(SmsEvent),
}

impl TelecomEvent {
    /// When the event happened
    pub fn time(&self) -> NaiveDateTime {
        match self {
            TelecomEvent::Call(call) => call.time,
            TelecomEvent::Sms(sms) => sms.time,
        }
    }

    /// Whether this event is a billable call
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, TelecomEvent::Call(_))
    }
}

/// A completed call event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallEvent {
    /// Source (caller) number
    pub src_number: String,

    /// Destination (callee) number
    pub dst_number: String,

    /// When the call was placed
    #[serde(with = "timestamp")]
    pub time: NaiveDateTime,

    /// Call duration in seconds
    pub duration: i32,

    /// Source coordinates (longitude, latitude)
    pub src_loc: (f64, f64),

    /// Destination coordinates (longitude, latitude)
    pub dst_loc: (f64, f64),
}

impl CallEvent {
    /// Build the immutable domain record for this event
    pub fn to_call(&self) -> Call {
        Call::new(
            self.src_number.clone(),
            self.dst_number.clone(),
            self.time,
            self.duration,
            self.src_loc,
            self.dst_loc,
        )
    }
}

/// A text message event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsEvent {
    /// Source number
    pub src_number: String,

    /// Destination number
    pub dst_number: String,

    /// When the message was sent
    #[serde(with = "timestamp")]
    pub time: NaiveDateTime,

    /// Source coordinates (longitude, latitude)
    pub src_loc: (f64, f64),

    /// Destination coordinates (longitude, latitude)
    pub dst_loc: (f64, f64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_call_event() {
        let raw = r#"{
            "type": "call",
            "src_number": "422-4785",
            "dst_number": "731-0105",
            "time": "2018-01-03 02:14:31",
            "duration": 117,
            "src_loc": [-79.42, 43.64],
            "dst_loc": [-79.52, 43.75]
        }"#;
        let event: TelecomEvent = serde_json::from_str(raw).unwrap();

        assert!(event.is_call());
        let expected = NaiveDate::from_ymd_opt(2018, 1, 3)
            .unwrap()
            .and_hms_opt(2, 14, 31)
            .unwrap();
        assert_eq!(event.time(), expected);

        let TelecomEvent::Call(call) = event else {
            panic!("expected a call event");
        };
        assert_eq!(call.duration, 117);
        assert_eq!(call.src_loc, (-79.42, 43.64));
    }

    #[test]
    fn test_parse_sms_event() {
        let raw = r#"{
            "type": "sms",
            "src_number": "422-4785",
            "dst_number": "731-0105",
            "time": "2018-01-03 02:15:00",
            "src_loc": [-79.42, 43.64],
            "dst_loc": [-79.52, 43.75]
        }"#;
        let event: TelecomEvent = serde_json::from_str(raw).unwrap();
        assert!(!event.is_call());
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let raw = r#"{"type": "fax", "src_number": "1", "dst_number": "2",
                      "time": "2018-01-03 02:15:00",
                      "src_loc": [0.0, 0.0], "dst_loc": [0.0, 0.0]}"#;
        assert!(serde_json::from_str::<TelecomEvent>(raw).is_err());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let raw = r#"{
            "type": "sms",
            "src_number": "a",
            "dst_number": "b",
            "time": "2018-03-31 23:59:59",
            "src_loc": [0.0, 0.0],
            "dst_loc": [0.0, 0.0]
        }"#;
        let event: TelecomEvent = serde_json::from_str(raw).unwrap();
        let encoded = serde_json::to_string(&event).unwrap();
        assert!(encoded.contains("2018-03-31 23:59:59"));
    }

    #[test]
    fn test_to_call_copies_every_field() {
        let event = CallEvent {
            src_number: "422-4785".to_string(),
            dst_number: "731-0105".to_string(),
            time: NaiveDate::from_ymd_opt(2018, 1, 3)
                .unwrap()
                .and_hms_opt(2, 14, 31)
                .unwrap(),
            duration: 117,
            src_loc: (-79.42, 43.64),
            dst_loc: (-79.52, 43.75),
        };
        let call = event.to_call();
        assert_eq!(call.caller_number(), "422-4785");
        assert_eq!(call.callee_number(), "731-0105");
        assert_eq!(call.duration_seconds(), 117);
        assert_eq!(call.caller_location(), (-79.42, 43.64));
        assert_eq!(call.billable_minutes(), 2);
    }
}
