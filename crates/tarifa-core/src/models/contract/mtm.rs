//! Month-to-month contract
//!
//! Flat monthly fee, every call minute billed at the MTM rate. No free
//! minutes, no deposit, no cancellation penalty.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Contract, ContractState};
use crate::config::Tariff;
use crate::models::{Bill, Call, RateKind};
use crate::AppResult;

/// A month-to-month contract for a phone line
#[derive(Debug, Clone)]
pub struct MtmContract {
    state: ContractState,
    monthly_fee: Decimal,
    rate_per_minute: Decimal,
}

impl MtmContract {
    /// Create a contract starting on `start`, priced by `tariff`
    pub fn new(start: NaiveDate, tariff: &Tariff) -> Self {
        Self {
            state: ContractState::new(start),
            monthly_fee: tariff.mtm_monthly_fee,
            rate_per_minute: tariff.mtm_rate_per_minute,
        }
    }

    /// Whether the contract has not been cancelled
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

impl Contract for MtmContract {
    fn new_month(&mut self, _month: u32, _year: i32, mut bill: Bill) {
        bill.set_rate(RateKind::Mtm, self.rate_per_minute);
        bill.add_fixed_cost(self.monthly_fee);
        self.state.bind(bill);
    }

    fn bill_call(&mut self, call: &Call) -> AppResult<()> {
        self.state.bill_standard_call(call)
    }

    fn cancel(&mut self) -> AppResult<Decimal> {
        if !self.state.is_active() {
            return Ok(Decimal::ZERO);
        }
        let cost = self.state.settlement_cost()?;
        self.state.deactivate();
        Ok(cost)
    }

    fn current_bill(&self) -> Option<&Bill> {
        self.state.bill()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    fn call_of(duration_seconds: i32) -> Call {
        let time = NaiveDate::from_ymd_opt(2023, 2, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
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
    fn test_new_month_charges_flat_fee() {
        let mut contract = MtmContract::new(start_date(), &Tariff::default());
        contract.new_month(2, 2023, Bill::new());

        let bill = contract.current_bill().unwrap();
        assert_eq!(bill.fixed_cost(), dec!(50.00));
        assert_eq!(bill.rate_kind(), Some(RateKind::Mtm));
        assert_eq!(bill.rate_per_minute(), dec!(0.05));
    }

    #[test]
    fn test_settlement_is_fee_with_no_calls() {
        let mut contract = MtmContract::new(start_date(), &Tariff::default());
        contract.new_month(2, 2023, Bill::new());
        assert_eq!(contract.cancel().unwrap(), dec!(50.00));
        assert!(!contract.is_active());
    }

    #[test]
    fn test_all_minutes_are_billed() {
        let mut contract = MtmContract::new(start_date(), &Tariff::default());
        contract.new_month(2, 2023, Bill::new());
        contract.bill_call(&call_of(121)).unwrap();

        let bill = contract.current_bill().unwrap();
        assert_eq!(bill.billed_minutes(), 3);
        assert_eq!(bill.free_minutes(), 0);
        assert_eq!(bill.cost(), dec!(50.15));
    }

    #[test]
    fn test_repeated_cancel_is_zero() {
        let mut contract = MtmContract::new(start_date(), &Tariff::default());
        contract.new_month(2, 2023, Bill::new());
        assert_eq!(contract.cancel().unwrap(), dec!(50.00));
        assert_eq!(contract.cancel().unwrap(), Decimal::ZERO);
        assert_eq!(contract.cancel().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_bill_call_before_first_month_fails() {
        let mut contract = MtmContract::new(start_date(), &Tariff::default());
        assert!(contract.bill_call(&call_of(30)).is_err());
    }
}
