//! Application configuration
//!
//! This module provides centralized configuration management using the
//! `config` crate. Configuration can be loaded from environment variables
//! and config files, and is converted once into the [`Tariff`] table that
//! contract constructors receive.

use chrono::NaiveDate;
use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::env;

use crate::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TarifaConfig {
    pub billing: BillingConfig,
    pub contracts: ContractConfig,
    pub dataset: DatasetConfig,
}

/// Fees, rates, and allotments for the three contract variants
///
/// Amounts are plain floats at the configuration boundary; they are
/// converted to `Decimal` exactly once when building the [`Tariff`].
#[derive(Debug, Deserialize, Clone)]
pub struct BillingConfig {
    /// Flat monthly fee for month-to-month contracts
    #[serde(default = "default_mtm_monthly_fee")]
    pub mtm_monthly_fee: f64,

    /// Per-minute rate for month-to-month contracts
    #[serde(default = "default_mtm_rate")]
    pub mtm_rate_per_minute: f64,

    /// Flat monthly fee for fixed-term contracts
    #[serde(default = "default_term_monthly_fee")]
    pub term_monthly_fee: f64,

    /// One-time deposit charged in a fixed-term contract's first month
    #[serde(default = "default_term_deposit")]
    pub term_deposit: f64,

    /// Per-minute rate for fixed-term contracts
    #[serde(default = "default_term_rate")]
    pub term_rate_per_minute: f64,

    /// Free minutes granted to fixed-term contracts each month
    #[serde(default = "default_term_free_minutes")]
    pub term_free_minutes: i32,

    /// Per-minute rate for pay-as-you-go contracts
    #[serde(default = "default_prepaid_rate")]
    pub prepaid_rate_per_minute: f64,

    /// Remaining credit below which a prepaid balance is recharged
    #[serde(default = "default_prepaid_low_credit_floor")]
    pub prepaid_low_credit_floor: f64,

    /// Credit a prepaid balance is reset to when the automatic recharge fires
    #[serde(default = "default_prepaid_recharge_credit")]
    pub prepaid_recharge_credit: f64,
}

fn default_mtm_monthly_fee() -> f64 {
    50.00
}

fn default_mtm_rate() -> f64 {
    0.05
}

fn default_term_monthly_fee() -> f64 {
    20.00
}

fn default_term_deposit() -> f64 {
    300.00
}

fn default_term_rate() -> f64 {
    0.10
}

fn default_term_free_minutes() -> i32 {
    100
}

fn default_prepaid_rate() -> f64 {
    0.025
}

fn default_prepaid_low_credit_floor() -> f64 {
    10.00
}

fn default_prepaid_recharge_credit() -> f64 {
    25.00
}

/// Contract construction defaults
///
/// The event log names a contract kind per line but carries no dates or
/// opening credit; those come from configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ContractConfig {
    /// Start date assigned to every contract at registration
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    /// End date assigned to fixed-term contracts
    #[serde(default = "default_term_end_date")]
    pub term_end_date: NaiveDate,

    /// Opening credit for pay-as-you-go contracts
    #[serde(default = "default_prepaid_initial_credit")]
    pub prepaid_initial_credit: f64,
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 12, 25).expect("valid default start date")
}

fn default_term_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 6, 25).expect("valid default end date")
}

fn default_prepaid_initial_credit() -> f64 {
    100.00
}

impl ContractConfig {
    /// Opening prepaid credit as an exact decimal amount
    pub fn initial_credit(&self) -> AppResult<Decimal> {
        Decimal::try_from(self.prepaid_initial_credit).map_err(AppError::from)
    }
}

/// Dataset input configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    /// Path to the JSON event log
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

fn default_dataset_path() -> String {
    "dataset.json".to_string()
}

impl TarifaConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("billing.mtm_monthly_fee", 50.00)?
            .set_default("billing.mtm_rate_per_minute", 0.05)?
            .set_default("billing.term_monthly_fee", 20.00)?
            .set_default("billing.term_deposit", 300.00)?
            .set_default("billing.term_rate_per_minute", 0.10)?
            .set_default("billing.term_free_minutes", 100)?
            .set_default("billing.prepaid_rate_per_minute", 0.025)?
            .set_default("billing.prepaid_low_credit_floor", 10.00)?
            .set_default("billing.prepaid_recharge_credit", 25.00)?
            .set_default("contracts.start_date", "2017-12-25")?
            .set_default("contracts.term_end_date", "2019-06-25")?
            .set_default("contracts.prepaid_initial_credit", 100.00)?
            .set_default("dataset.path", "dataset.json")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with TARIFA_ prefix
            .add_source(
                Environment::with_prefix("TARIFA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("TARIFA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

/// The tariff table injected into contract constructors
///
/// Exact decimal amounts for every fee, rate, deposit, and allotment.
/// Built once from [`BillingConfig`]; contracts copy the values they need
/// at construction and never consult global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tariff {
    pub mtm_monthly_fee: Decimal,
    pub mtm_rate_per_minute: Decimal,
    pub term_monthly_fee: Decimal,
    pub term_deposit: Decimal,
    pub term_rate_per_minute: Decimal,
    pub term_free_minutes: i32,
    pub prepaid_rate_per_minute: Decimal,
    pub prepaid_low_credit_floor: Decimal,
    pub prepaid_recharge_credit: Decimal,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            mtm_monthly_fee: dec!(50.00),
            mtm_rate_per_minute: dec!(0.05),
            term_monthly_fee: dec!(20.00),
            term_deposit: dec!(300.00),
            term_rate_per_minute: dec!(0.10),
            term_free_minutes: 100,
            prepaid_rate_per_minute: dec!(0.025),
            prepaid_low_credit_floor: dec!(10.00),
            prepaid_recharge_credit: dec!(25.00),
        }
    }
}

impl TryFrom<&BillingConfig> for Tariff {
    type Error = AppError;

    fn try_from(cfg: &BillingConfig) -> AppResult<Self> {
        Ok(Self {
            mtm_monthly_fee: Decimal::try_from(cfg.mtm_monthly_fee)?,
            mtm_rate_per_minute: Decimal::try_from(cfg.mtm_rate_per_minute)?,
            term_monthly_fee: Decimal::try_from(cfg.term_monthly_fee)?,
            term_deposit: Decimal::try_from(cfg.term_deposit)?,
            term_rate_per_minute: Decimal::try_from(cfg.term_rate_per_minute)?,
            term_free_minutes: cfg.term_free_minutes,
            prepaid_rate_per_minute: Decimal::try_from(cfg.prepaid_rate_per_minute)?,
            prepaid_low_credit_floor: Decimal::try_from(cfg.prepaid_low_credit_floor)?,
            prepaid_recharge_credit: Decimal::try_from(cfg.prepaid_recharge_credit)?,
        })
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            mtm_monthly_fee: 50.00,
            mtm_rate_per_minute: 0.05,
            term_monthly_fee: 20.00,
            term_deposit: 300.00,
            term_rate_per_minute: 0.10,
            term_free_minutes: 100,
            prepaid_rate_per_minute: 0.025,
            prepaid_low_credit_floor: 10.00,
            prepaid_recharge_credit: 25.00,
        }
    }
}
