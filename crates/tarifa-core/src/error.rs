//! Unified error handling for Tarifa
//!
//! This module provides a single error type covering every failure scenario
//! in the simulator. Billing outcomes are always returned values; errors are
//! reserved for broken preconditions and bad input.

use thiserror::Error;

/// Main application error type
///
/// All errors in the application should be converted to this type.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Billing Errors ====================
    #[error("no active billing period: new_month must run before billing")]
    NoActiveBill,

    #[error("unknown contract kind: {0}")]
    UnknownContractKind(String),

    #[error("invalid monetary amount: {0}")]
    InvalidAmount(String),

    // ==================== Input Errors ====================
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    // ==================== Internal Errors ====================
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    /// Returns the error code for structured log output
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NoActiveBill => "no_active_bill",
            AppError::UnknownContractKind(_) => "unknown_contract_kind",
            AppError::InvalidAmount(_) => "invalid_amount",
            AppError::Dataset(_) => "dataset_error",
            AppError::Serialization(_) => "serialization_error",
            AppError::Config(_) => "config_error",
            AppError::Io(_) => "io_error",
        }
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<rust_decimal::Error> for AppError {
    fn from(err: rust_decimal::Error) -> Self {
        AppError::InvalidAmount(err.to_string())
    }
}
