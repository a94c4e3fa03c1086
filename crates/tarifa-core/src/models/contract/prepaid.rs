//! Pay-as-you-go contract
//!
//! Carries a running balance instead of a monthly fee: negative means
//! prepaid credit remaining, non-negative means the customer owes money.
//! Each month the previous bill's cost becomes the new balance, and a low
//! balance triggers an automatic recharge.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::{Contract, ContractState};
use crate::config::Tariff;
use crate::models::{Bill, Call, RateKind};
use crate::AppResult;

/// A pay-as-you-go contract for a phone line
#[derive(Debug, Clone)]
pub struct PrepaidContract {
    state: ContractState,
    /// Negative = credit remaining, non-negative = amount owed
    balance: Decimal,
    rate_per_minute: Decimal,
    low_credit_floor: Decimal,
    recharge_credit: Decimal,
}

impl PrepaidContract {
    /// Create a contract starting on `start` with `credit` prepaid
    pub fn new(start: NaiveDate, credit: Decimal, tariff: &Tariff) -> Self {
        Self {
            state: ContractState::new(start),
            balance: -credit,
            rate_per_minute: tariff.prepaid_rate_per_minute,
            low_credit_floor: tariff.prepaid_low_credit_floor,
            recharge_credit: tariff.prepaid_recharge_credit,
        }
    }

    /// Whether the contract has not been cancelled
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Current balance (negative = credit remaining)
    #[inline]
    pub fn balance(&self) -> Decimal {
        self.balance
    }
}

impl Contract for PrepaidContract {
    fn new_month(&mut self, _month: u32, _year: i32, mut bill: Bill) {
        if !self.state.is_active() {
            return;
        }

        if let Some(prior) = self.state.bill() {
            self.balance = prior.cost();
            // Credit ran low (or the customer owes): automatic recharge
            if self.balance > -self.low_credit_floor {
                self.balance = -self.recharge_credit;
                debug!(balance = %self.balance, "prepaid balance recharged");
            }
        }

        bill.set_rate(RateKind::Payg, self.rate_per_minute);
        // Carry remaining credit (or debt) into the new period
        bill.add_fixed_cost(self.balance);
        self.state.bind(bill);
    }

    fn bill_call(&mut self, call: &Call) -> AppResult<()> {
        self.state.bill_standard_call(call)
    }

    fn cancel(&mut self) -> AppResult<Decimal> {
        let Some(bill) = self.state.bill() else {
            return Ok(Decimal::ZERO);
        };
        let cost = bill.cost();
        if cost <= Decimal::ZERO {
            // Unused credit remains; the line stays open
            return Ok(Decimal::ZERO);
        }
        self.state.deactivate();
        Ok(cost)
    }

    fn current_bill(&self) -> Option<&Bill> {
        self.state.bill()
    }
}
