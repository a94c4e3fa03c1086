//! Fixed-term contract
//!
//! Runs from a start date to an end date. Charges a refundable deposit on
//! the first month, grants a monthly free-minute allotment, and bills the
//! overflow at the term rate. The deposit is returned on cancellation only
//! once the term has expired.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use super::{Contract, ContractState};
use crate::config::Tariff;
use crate::models::{Bill, Call, RateKind};
use crate::AppResult;

/// A fixed-term contract for a phone line
#[derive(Debug, Clone)]
pub struct TermContract {
    state: ContractState,
    end: NaiveDate,
    monthly_fee: Decimal,
    deposit: Decimal,
    rate_per_minute: Decimal,
    free_allotment: i32,
    free_remaining: i32,
    expired: bool,
}

impl TermContract {
    /// Create a contract running from `start` to `end`, priced by `tariff`
    pub fn new(start: NaiveDate, end: NaiveDate, tariff: &Tariff) -> Self {
        Self {
            state: ContractState::new(start),
            end,
            monthly_fee: tariff.term_monthly_fee,
            deposit: tariff.term_deposit,
            rate_per_minute: tariff.term_rate_per_minute,
            free_allotment: tariff.term_free_minutes,
            free_remaining: tariff.term_free_minutes,
            expired: false,
        }
    }

    /// Whether the contract has not been cancelled
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Whether the term obligation has been served
    ///
    /// Once set, cancellation refunds the deposit.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Free minutes left in the current billing period
    #[inline]
    pub fn free_minutes_remaining(&self) -> i32 {
        self.free_remaining
    }
}

impl Contract for TermContract {
    fn new_month(&mut self, month: u32, year: i32, mut bill: Bill) {
        bill.set_rate(RateKind::Term, self.rate_per_minute);
        self.free_remaining = self.free_allotment;

        if let Some(start) = self.state.start() {
            if start.year() == year && start.month() == month {
                // First month carries the deposit on top of the fee
                bill.add_fixed_cost(self.deposit + self.monthly_fee);
            } else {
                bill.add_fixed_cost(self.monthly_fee);
            }
            // The expiry window only opens inside the end year while the
            // current month is still before the end month; it never fires
            // at or past the end month, nor across a year boundary.
            if self.end.month() > month && self.end.year() == year {
                self.expired = true;
            }
        }

        self.state.bind(bill);
    }

    fn bill_call(&mut self, call: &Call) -> AppResult<()> {
        let minutes = call.billable_minutes();
        let bill = self.state.bill_mut()?;

        if minutes <= self.free_remaining {
            self.free_remaining -= minutes;
            bill.add_free_minutes(minutes);
        } else {
            // Spend what is left of the allotment, bill the overflow
            bill.add_free_minutes(self.free_remaining);
            bill.add_billed_minutes(minutes - self.free_remaining);
            self.free_remaining = 0;
        }
        Ok(())
    }

    fn cancel(&mut self) -> AppResult<Decimal> {
        if !self.state.is_active() {
            return Ok(Decimal::ZERO);
        }
        let cost = self.state.settlement_cost()?;
        self.state.deactivate();
        if self.expired {
            Ok(cost - self.deposit)
        } else {
            Ok(cost)
        }
    }

    fn current_bill(&self) -> Option<&Bill> {
        self.state.bill()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn january_term() -> TermContract {
        TermContract::new(
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
            &Tariff::default(),
        )
    }

    fn call_of(duration_seconds: i32) -> Call {
        let time = NaiveDate::from_ymd_opt(2022, 1, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Call::new(
            "422-4785",
            "731-0105",
            time,
            duration_seconds,
            (-79.42, 43.64),
            (-79.52, 43.75),
        )
    }

    #[test]
    fn test_first_month_charges_deposit_and_fee() {
        let mut contract = january_term();
        contract.new_month(1, 2022, Bill::new());
        assert_eq!(contract.current_bill().unwrap().fixed_cost(), dec!(320.00));
    }

    #[test]
    fn test_later_months_charge_fee_only() {
        let mut contract = january_term();
        contract.new_month(1, 2022, Bill::new());
        contract.new_month(2, 2022, Bill::new());
        assert_eq!(contract.current_bill().unwrap().fixed_cost(), dec!(20.00));
    }

    #[test]
    fn test_calls_consume_free_minutes_first() {
        let mut contract = january_term();
        contract.new_month(1, 2022, Bill::new());
        contract.bill_call(&call_of(90)).unwrap();

        let bill = contract.current_bill().unwrap();
        assert_eq!(bill.free_minutes(), 2);
        assert_eq!(bill.billed_minutes(), 0);
        assert_eq!(bill.cost(), dec!(320.00));
        assert_eq!(contract.free_minutes_remaining(), 98);
    }

    #[test]
    fn test_overflow_past_allotment_is_billed() {
        let mut contract = january_term();
        contract.new_month(1, 2022, Bill::new());
        // 101 whole minutes against a 100-minute allotment
        contract.bill_call(&call_of(101 * 60)).unwrap();

        let bill = contract.current_bill().unwrap();
        assert_eq!(bill.free_minutes(), 100);
        assert_eq!(bill.billed_minutes(), 1);
        assert_eq!(contract.free_minutes_remaining(), 0);
        assert_eq!(bill.cost(), dec!(320.10));
    }

    #[test]
    fn test_free_minutes_reset_each_month() {
        let mut contract = january_term();
        contract.new_month(1, 2022, Bill::new());
        contract.bill_call(&call_of(101 * 60)).unwrap();
        assert_eq!(contract.free_minutes_remaining(), 0);

        contract.new_month(2, 2022, Bill::new());
        assert_eq!(contract.free_minutes_remaining(), 100);
        assert_eq!(contract.current_bill().unwrap().free_minutes(), 0);
    }

    #[test]
    fn test_cancel_before_expiry_forfeits_deposit() {
        let mut contract = TermContract::new(
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 25).unwrap(),
            &Tariff::default(),
        );
        contract.new_month(1, 2022, Bill::new());
        assert!(!contract.is_expired());
        // Deposit stays in the settlement
        assert_eq!(contract.cancel().unwrap(), dec!(320.00));
    }

    #[test]
    fn test_cancel_after_expiry_refunds_deposit() {
        let mut contract = january_term();
        contract.new_month(1, 2022, Bill::new());
        assert!(contract.is_expired());
        assert_eq!(contract.cancel().unwrap(), dec!(20.00));
        assert!(!contract.is_active());
    }

    #[test]
    fn test_repeated_cancel_is_zero() {
        let mut contract = january_term();
        contract.new_month(1, 2022, Bill::new());
        assert_eq!(contract.cancel().unwrap(), dec!(20.00));
        assert_eq!(contract.cancel().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn expiry_never_fires_at_or_past_end_month() {
        // December term: opening December itself leaves the flag unset,
        // and January of the following year is outside the end year.
        let mut contract = TermContract::new(
            NaiveDate::from_ymd_opt(2022, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
            &Tariff::default(),
        );
        contract.new_month(12, 2022, Bill::new());
        assert!(!contract.is_expired());
        contract.new_month(1, 2023, Bill::new());
        assert!(!contract.is_expired());
    }

    #[test]
    fn expiry_fires_only_within_end_year_before_end_month() {
        let mut contract = january_term();
        contract.new_month(1, 2022, Bill::new());
        assert!(contract.is_expired());
    }
}
