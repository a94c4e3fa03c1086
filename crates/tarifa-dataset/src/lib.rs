//! Tarifa event-log ingestion
//!
//! This crate reads the JSON input dataset: the customer/line registry
//! snapshot plus the chronologically-ordered event log of calls and SMS
//! messages. It performs structural validation only; chronological
//! ordering is trusted, per the input contract.

pub mod dataset;
pub mod event;

pub use dataset::{CustomerRecord, Dataset, LineRecord};
pub use event::{CallEvent, SmsEvent, TelecomEvent};
