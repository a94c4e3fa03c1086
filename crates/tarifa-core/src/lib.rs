//! Tarifa Core Library
//!
//! This crate provides the foundational types and the billing state machine
//! for the Tarifa phone-line billing simulator. It includes:
//!
//! - Domain models (Call, Bill, the Contract trait and its variants)
//! - The injected tariff table and application configuration
//! - Unified error handling

pub mod config;
pub mod error;
pub mod models;

pub use config::{Tariff, TarifaConfig};
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
