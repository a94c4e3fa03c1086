//! Contract state machine
//!
//! A contract is the billing policy bound to one phone line for its
//! lifetime. Three variants exist, each with its own monthly setup and
//! per-call billing rules; the driver talks to all of them through the
//! [`Contract`] trait.
//!
//! Lifecycle: created once at line registration; `new_month` runs once per
//! distinct calendar month in chronological order; `cancel` settles the
//! line and marks the contract inactive. The caller guarantees ordering —
//! `new_month(m, y, ..)` before any call placed in month m/y.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::{Bill, Call};
use crate::AppResult;

pub mod mtm;
pub mod prepaid;
pub mod term;

pub use mtm::MtmContract;
pub use prepaid::PrepaidContract;
pub use term::TermContract;

/// Contract kind named by the event log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    /// Pay-as-you-go with an opening credit
    Prepaid,
    /// Month-to-month, flat fee, no commitment
    Mtm,
    /// Fixed term with deposit and free minutes
    Term,
}

impl FromStr for ContractKind {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "prepaid" => Ok(ContractKind::Prepaid),
            "mtm" => Ok(ContractKind::Mtm),
            "term" => Ok(ContractKind::Term),
            other => Err(AppError::UnknownContractKind(other.to_string())),
        }
    }
}

/// The billing policy for one phone line
///
/// Implementations keep no shared mutable state beyond the start date and
/// the current bill (see [`ContractState`]).
pub trait Contract {
    /// Advance the contract to a new billing period
    ///
    /// Takes ownership of the fresh `bill`, sets its rate and category,
    /// applies month-start fixed charges, and resets any per-month
    /// counters. Called once per distinct calendar month, in increasing
    /// (year, month) order.
    fn new_month(&mut self, month: u32, year: i32, bill: Bill);

    /// Add a call to the current bill
    ///
    /// Fails with [`AppError::NoActiveBill`] when no billing period is
    /// open for this contract.
    fn bill_call(&mut self, call: &Call) -> AppResult<()>;

    /// Settle and close the contract
    ///
    /// Returns the amount owed to finalize cancellation and marks the
    /// contract inactive. Cancelling an already-inactive contract is a
    /// no-op returning zero.
    fn cancel(&mut self) -> AppResult<Decimal>;

    /// The bill of the currently open billing period, if any
    fn current_bill(&self) -> Option<&Bill>;
}

/// State every contract variant carries
///
/// Both fields are genuinely optional: an absent start date means the
/// contract is inactive (cancelled), an absent bill means no billing
/// period has been opened yet.
#[derive(Debug, Clone, Default)]
pub struct ContractState {
    start: Option<NaiveDate>,
    bill: Option<Bill>,
}

impl ContractState {
    /// New state for a contract starting on `start`
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start: Some(start),
            bill: None,
        }
    }

    /// Whether the contract is still active
    #[inline]
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// The contract's start date, if still active
    #[inline]
    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Clear the start date, marking the contract inactive
    pub fn deactivate(&mut self) {
        self.start = None;
    }

    /// Bind the bill for a newly opened billing period
    pub fn bind(&mut self, bill: Bill) {
        self.bill = Some(bill);
    }

    /// The current bill, if a billing period is open
    #[inline]
    pub fn bill(&self) -> Option<&Bill> {
        self.bill.as_ref()
    }

    /// Mutable access to the current bill, failing fast when absent
    pub fn bill_mut(&mut self) -> AppResult<&mut Bill> {
        self.bill.as_mut().ok_or(AppError::NoActiveBill)
    }

    /// Default call billing: every started minute is billed at the rate
    ///
    /// Used by variants without free minutes.
    pub fn bill_standard_call(&mut self, call: &Call) -> AppResult<()> {
        let minutes = call.billable_minutes();
        self.bill_mut()?.add_billed_minutes(minutes);
        Ok(())
    }

    /// Cost of the current bill, failing fast when no period is open
    pub fn settlement_cost(&self) -> AppResult<Decimal> {
        self.bill
            .as_ref()
            .map(Bill::cost)
            .ok_or(AppError::NoActiveBill)
    }
}
