//! Tarifa Billing Simulator
//!
//! Replays a JSON event log of phone calls against per-line contracts and
//! reports monthly bills and final settlements.

use std::env;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tarifa_core::config::Tariff;
use tarifa_core::TarifaConfig;
use tarifa_dataset::Dataset;
use tarifa_services::{BillingDriver, CustomerRegistry};

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tarifa_billing={},tarifa_core={},tarifa_dataset={},tarifa_services={}",
            log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    info!(
        "Starting Tarifa Billing Simulator v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = TarifaConfig::load().context("loading configuration")?;
    let tariff = Tariff::try_from(&config.billing)?;

    // Dataset path: first CLI argument, falling back to configuration
    let dataset_path = env::args()
        .nth(1)
        .unwrap_or_else(|| config.dataset.path.clone());

    info!("Loading event log from {}", dataset_path);
    let dataset = Dataset::from_path(&dataset_path)
        .with_context(|| format!("loading dataset from {}", dataset_path))?;
    dataset.validate().context("validating dataset")?;

    let registry = CustomerRegistry::from_dataset(&dataset, &tariff, &config.contracts)?;
    info!(
        "Registered {} customers, {} events to replay",
        registry.len(),
        dataset.events.len()
    );

    let mut driver = BillingDriver::new(registry);
    let report = driver.process(&dataset.events)?;

    // Month-end totals per line
    for customer in driver.registry().customers() {
        for line in customer.lines() {
            match line.current_bill() {
                Some(bill) => info!(
                    customer = customer.id(),
                    line = line.number(),
                    kind = %bill.rate_kind().map(|k| k.to_string()).unwrap_or_default(),
                    free_minutes = bill.free_minutes(),
                    billed_minutes = bill.billed_minutes(),
                    "month-end cost: {}",
                    bill.cost()
                ),
                None => warn!(
                    customer = customer.id(),
                    line = line.number(),
                    "no bill produced for this line"
                ),
            }
        }
    }

    let settlements = driver.close_all();
    info!(
        "Final settlements:\n{}",
        serde_json::to_string_pretty(&settlements)?
    );

    Ok(())
}
