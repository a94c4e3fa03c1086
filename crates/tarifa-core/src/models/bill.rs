//! Bill model
//!
//! The per-line, per-month cost accumulator. A fresh `Bill` is created for
//! every billing period and handed to the line's contract, which owns it
//! until the next period begins.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rate category applied to a bill's billed minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateKind {
    /// Pay-as-you-go rate
    Payg,
    /// Month-to-month rate
    Mtm,
    /// Fixed-term rate
    Term,
}

impl fmt::Display for RateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateKind::Payg => write!(f, "PAYG"),
            RateKind::Mtm => write!(f, "MTM"),
            RateKind::Term => write!(f, "TERM"),
        }
    }
}

/// One month's cost accumulator for a single phone line
///
/// The rate and its kind are set exactly once per month, before any minute
/// is billed; the kind stays `None` only on a bill no contract has opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Bill {
    /// Fixed charges (fees, deposits, carried-over balances)
    fixed_cost: Decimal,

    /// Minutes consumed against a free allotment
    free_minutes: i32,

    /// Minutes billed at the per-minute rate
    billed_minutes: i32,

    /// Rate applied to billed minutes
    rate_per_minute: Decimal,

    /// Category of the applied rate
    rate_kind: Option<RateKind>,
}

impl Bill {
    /// Create an empty bill for a new billing period
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fixed charge
    ///
    /// The amount may be negative: prepaid contracts carry remaining credit
    /// forward as a negative fixed cost.
    pub fn add_fixed_cost(&mut self, amount: Decimal) {
        self.fixed_cost += amount;
    }

    /// Set the rate category and per-minute rate, replacing any prior value
    pub fn set_rate(&mut self, kind: RateKind, per_minute: Decimal) {
        self.rate_kind = Some(kind);
        self.rate_per_minute = per_minute;
    }

    /// Record minutes consumed from a free allotment; `n` must be >= 0
    pub fn add_free_minutes(&mut self, n: i32) {
        debug_assert!(n >= 0, "free minutes must be non-negative");
        self.free_minutes += n;
    }

    /// Record minutes billed at the per-minute rate; `n` must be >= 0
    pub fn add_billed_minutes(&mut self, n: i32) {
        debug_assert!(n >= 0, "billed minutes must be non-negative");
        self.billed_minutes += n;
    }

    /// Total cost: fixed charges plus billed minutes at the rate
    ///
    /// Free minutes never contribute. Pure; no side effects.
    #[inline]
    pub fn cost(&self) -> Decimal {
        self.fixed_cost + Decimal::from(self.billed_minutes) * self.rate_per_minute
    }

    /// Accumulated fixed charges
    #[inline]
    pub fn fixed_cost(&self) -> Decimal {
        self.fixed_cost
    }

    /// Minutes consumed against a free allotment
    #[inline]
    pub fn free_minutes(&self) -> i32 {
        self.free_minutes
    }

    /// Minutes billed at the per-minute rate
    #[inline]
    pub fn billed_minutes(&self) -> i32 {
        self.billed_minutes
    }

    /// The applied per-minute rate
    #[inline]
    pub fn rate_per_minute(&self) -> Decimal {
        self.rate_per_minute
    }

    /// The applied rate category, if a contract has opened this bill
    #[inline]
    pub fn rate_kind(&self) -> Option<RateKind> {
        self.rate_kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_bill_is_empty() {
        let bill = Bill::new();
        assert_eq!(bill.cost(), Decimal::ZERO);
        assert_eq!(bill.free_minutes(), 0);
        assert_eq!(bill.billed_minutes(), 0);
        assert_eq!(bill.rate_kind(), None);
    }

    #[test]
    fn test_cost_combines_fixed_and_minutes() {
        let mut bill = Bill::new();
        bill.set_rate(RateKind::Mtm, dec!(0.05));
        bill.add_fixed_cost(dec!(50.00));
        bill.add_billed_minutes(10);
        assert_eq!(bill.cost(), dec!(50.50));
    }

    #[test]
    fn test_free_minutes_do_not_cost() {
        let mut bill = Bill::new();
        bill.set_rate(RateKind::Term, dec!(0.10));
        bill.add_free_minutes(90);
        assert_eq!(bill.cost(), Decimal::ZERO);
    }

    #[test]
    fn test_negative_fixed_cost_is_credit() {
        let mut bill = Bill::new();
        bill.set_rate(RateKind::Payg, dec!(0.025));
        bill.add_fixed_cost(dec!(-100.00));
        bill.add_billed_minutes(40);
        assert_eq!(bill.cost(), dec!(-99.00));
    }

    #[test]
    fn test_set_rate_overwrites() {
        let mut bill = Bill::new();
        bill.set_rate(RateKind::Mtm, dec!(0.05));
        bill.set_rate(RateKind::Term, dec!(0.10));
        assert_eq!(bill.rate_kind(), Some(RateKind::Term));
        assert_eq!(bill.rate_per_minute(), dec!(0.10));
    }

    #[test]
    fn test_cost_is_pure() {
        let mut bill = Bill::new();
        bill.set_rate(RateKind::Mtm, dec!(0.05));
        bill.add_fixed_cost(dec!(50.00));
        bill.add_billed_minutes(7);
        assert_eq!(bill.cost(), bill.cost());
    }

    #[test]
    fn test_rate_kind_display() {
        assert_eq!(RateKind::Payg.to_string(), "PAYG");
        assert_eq!(RateKind::Mtm.to_string(), "MTM");
        assert_eq!(RateKind::Term.to_string(), "TERM");
    }

    proptest! {
        #[test]
        fn cost_matches_fixed_plus_billed_times_rate(
            fixed_cents in -100_000i64..=100_000,
            billed in 0i32..=10_000,
            free in 0i32..=10_000,
            rate_cents in 0i64..=1_000,
        ) {
            let fixed = Decimal::new(fixed_cents, 2);
            let rate = Decimal::new(rate_cents, 2);
            let mut bill = Bill::new();
            bill.set_rate(RateKind::Mtm, rate);
            bill.add_fixed_cost(fixed);
            bill.add_billed_minutes(billed);
            bill.add_free_minutes(free);
            prop_assert_eq!(bill.cost(), fixed + Decimal::from(billed) * rate);
        }
    }
}
