//! Chronological billing driver
//!
//! Replays the event log in order, opening a new billing period on every
//! (month, year) change and dispatching each call to the caller's and
//! receiver's lines. Strictly sequential: one event at a time, no
//! suspension, no shared bills.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use tarifa_core::models::Call;
use tarifa_core::AppResult;
use tarifa_dataset::TelecomEvent;

use crate::registry::CustomerRegistry;

/// Counters describing one simulation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    /// Billing periods opened (including the first)
    pub months_advanced: u32,

    /// Calls dispatched to a registered caller
    pub calls_processed: u32,

    /// Calls whose caller number matched no registered line
    pub calls_unmatched: u32,

    /// SMS events skipped (recorded in the log, never billed)
    pub sms_skipped: u32,
}

/// Final settlement for one closed line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSettlement {
    /// Owning customer
    pub customer_id: u32,

    /// Phone number of the closed line
    pub number: String,

    /// Amount owed to finalize the closure
    pub amount: Decimal,
}

/// Drives every contract through the event log's months
pub struct BillingDriver {
    registry: CustomerRegistry,
    period: Option<(i32, u32)>,
}

impl BillingDriver {
    /// Create a driver over `registry`
    pub fn new(registry: CustomerRegistry) -> Self {
        Self {
            registry,
            period: None,
        }
    }

    /// Replay `events` in log order
    ///
    /// Every (month, year) change — including the first event — advances
    /// all lines to a new billing period before the event is dispatched.
    /// The log's chronological ordering is trusted, not validated.
    pub fn process(&mut self, events: &[TelecomEvent]) -> AppResult<SimulationReport> {
        let mut report = SimulationReport::default();

        for event in events {
            let time = event.time();
            let key = (time.year(), time.month());
            if self.period != Some(key) {
                debug!(month = key.1, year = key.0, "opening new billing period");
                self.registry.new_month(key.1, key.0);
                self.period = Some(key);
                report.months_advanced += 1;
            }

            match event {
                TelecomEvent::Call(event) => {
                    let call = event.to_call();
                    self.dispatch_call(&call, &mut report)?;
                }
                TelecomEvent::Sms(_) => {
                    report.sms_skipped += 1;
                }
            }
        }

        info!(
            months = report.months_advanced,
            calls = report.calls_processed,
            unmatched = report.calls_unmatched,
            sms = report.sms_skipped,
            "event log replayed"
        );
        Ok(report)
    }

    fn dispatch_call(&mut self, call: &Call, report: &mut SimulationReport) -> AppResult<()> {
        if let Some(receiver) = self.registry.find_by_number(call.callee_number()) {
            receiver.receive_call(call);
        }
        match self.registry.find_by_number(call.caller_number()) {
            Some(caller) => {
                caller.make_call(call)?;
                report.calls_processed += 1;
            }
            None => {
                debug!(
                    caller = call.caller_number(),
                    "caller not registered; call not billed"
                );
                report.calls_unmatched += 1;
            }
        }
        Ok(())
    }

    /// Settle and close every line, collecting the final settlements
    ///
    /// A line that cannot settle (no billing period was ever opened for
    /// it) is reported and skipped rather than aborting the closure of the
    /// remaining lines.
    pub fn close_all(&mut self) -> Vec<LineSettlement> {
        let mut settlements = Vec::new();
        for customer in self.registry.customers_mut() {
            let customer_id = customer.id();
            for line in customer.lines_mut() {
                match line.cancel() {
                    Ok(amount) => settlements.push(LineSettlement {
                        customer_id,
                        number: line.number().to_string(),
                        amount,
                    }),
                    Err(err) => {
                        warn!(
                            code = err.error_code(),
                            customer = customer_id,
                            line = %line.number(),
                            "line could not be settled: {err}"
                        );
                    }
                }
            }
        }
        settlements
    }

    /// The registry being driven
    pub fn registry(&self) -> &CustomerRegistry {
        &self.registry
    }

    /// Consume the driver, returning the registry
    pub fn into_registry(self) -> CustomerRegistry {
        self.registry
    }
}
