//! Customer and phone-line registry
//!
//! In-memory registry built from the dataset snapshot. Each phone line
//! carries its contract, its call history, and an archive of the bills
//! from closed billing periods.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use tarifa_core::config::{ContractConfig, Tariff};
use tarifa_core::models::{
    Bill, Call, Contract, ContractKind, MtmContract, PrepaidContract, TermContract,
};
use tarifa_core::AppResult;
use tarifa_dataset::Dataset;

/// A registered phone line
///
/// The contract is optional: a line registered with an unknown contract
/// kind stays usable (its calls are recorded) but is never billed.
pub struct PhoneLine {
    number: String,
    contract: Option<Box<dyn Contract>>,
    current_period: Option<(i32, u32)>,
    archive: HashMap<(i32, u32), Bill>,
    outgoing: Vec<Call>,
    incoming: Vec<Call>,
}

impl PhoneLine {
    /// Create a line for `number` billed under `contract`
    pub fn new(number: impl Into<String>, contract: Option<Box<dyn Contract>>) -> Self {
        Self {
            number: number.into(),
            contract,
            current_period: None,
            archive: HashMap::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Phone number of this line
    #[inline]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Whether a contract is bound to this line
    #[inline]
    pub fn has_contract(&self) -> bool {
        self.contract.is_some()
    }

    /// Open a new billing period
    ///
    /// The bill of the period being closed is archived before the contract
    /// receives a fresh one.
    pub fn new_month(&mut self, month: u32, year: i32) {
        let Some(contract) = self.contract.as_mut() else {
            return;
        };
        if let Some(period) = self.current_period.take() {
            if let Some(bill) = contract.current_bill() {
                self.archive.insert(period, bill.clone());
            }
        }
        contract.new_month(month, year, Bill::new());
        self.current_period = Some((year, month));
    }

    /// Record an outgoing call and bill it to the contract
    pub fn make_call(&mut self, call: &Call) -> AppResult<()> {
        self.outgoing.push(call.clone());
        match self.contract.as_mut() {
            Some(contract) => contract.bill_call(call),
            None => {
                debug!(line = %self.number, "call on a contract-less line; not billed");
                Ok(())
            }
        }
    }

    /// Record an incoming call (never billed)
    pub fn receive_call(&mut self, call: &Call) {
        self.incoming.push(call.clone());
    }

    /// Settle and close the line's contract
    pub fn cancel(&mut self) -> AppResult<Decimal> {
        match self.contract.as_mut() {
            Some(contract) => contract.cancel(),
            None => Ok(Decimal::ZERO),
        }
    }

    /// The bill of the currently open billing period
    pub fn current_bill(&self) -> Option<&Bill> {
        self.contract.as_ref().and_then(|c| c.current_bill())
    }

    /// The bill covering (year, month), archived or current
    pub fn bill_for(&self, year: i32, month: u32) -> Option<&Bill> {
        if self.current_period == Some((year, month)) {
            return self.current_bill();
        }
        self.archive.get(&(year, month))
    }

    /// Bills of every closed billing period, keyed by (year, month)
    pub fn archived_bills(&self) -> &HashMap<(i32, u32), Bill> {
        &self.archive
    }

    /// Outgoing call history
    pub fn outgoing_calls(&self) -> &[Call] {
        &self.outgoing
    }

    /// Incoming call history
    pub fn incoming_calls(&self) -> &[Call] {
        &self.incoming
    }
}

/// A customer owning one or more phone lines
pub struct Customer {
    id: u32,
    lines: Vec<PhoneLine>,
}

impl Customer {
    /// Create a customer with no lines yet
    pub fn new(id: u32) -> Self {
        Self {
            id,
            lines: Vec::new(),
        }
    }

    /// Customer identifier
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Register a phone line
    pub fn add_line(&mut self, line: PhoneLine) {
        self.lines.push(line);
    }

    /// Whether `number` belongs to one of this customer's lines
    pub fn owns_number(&self, number: &str) -> bool {
        self.lines.iter().any(|line| line.number() == number)
    }

    /// Registered lines
    pub fn lines(&self) -> &[PhoneLine] {
        &self.lines
    }

    /// Registered lines, mutably
    pub fn lines_mut(&mut self) -> impl Iterator<Item = &mut PhoneLine> {
        self.lines.iter_mut()
    }

    /// Advance every line to a new billing period
    pub fn new_month(&mut self, month: u32, year: i32) {
        for line in &mut self.lines {
            line.new_month(month, year);
        }
    }

    /// Dispatch an outgoing call to the line that placed it
    pub fn make_call(&mut self, call: &Call) -> AppResult<()> {
        for line in &mut self.lines {
            if line.number() == call.caller_number() {
                return line.make_call(call);
            }
        }
        Ok(())
    }

    /// Dispatch an incoming call to the line that received it
    pub fn receive_call(&mut self, call: &Call) {
        for line in &mut self.lines {
            if line.number() == call.callee_number() {
                line.receive_call(call);
                return;
            }
        }
    }

    /// Settle and close the line with `number`
    ///
    /// Returns `None` when this customer has no such line.
    pub fn cancel_line(&mut self, number: &str) -> AppResult<Option<Decimal>> {
        for line in &mut self.lines {
            if line.number() == number {
                return line.cancel().map(Some);
            }
        }
        Ok(None)
    }
}

/// All customers known to the simulation
#[derive(Default)]
pub struct CustomerRegistry {
    customers: Vec<Customer>,
}

impl CustomerRegistry {
    /// Build a registry from explicit customers
    pub fn new(customers: Vec<Customer>) -> Self {
        Self { customers }
    }

    /// Build the registry from a dataset snapshot
    ///
    /// Contract fees and rates come from `tariff`; start/end dates and the
    /// opening prepaid credit come from `contracts`. A line naming an
    /// unknown contract kind is reported to the operator and registered
    /// without a contract (its calls will not be billed).
    pub fn from_dataset(
        dataset: &Dataset,
        tariff: &Tariff,
        contracts: &ContractConfig,
    ) -> AppResult<Self> {
        let mut customers = Vec::with_capacity(dataset.customers.len());
        for record in &dataset.customers {
            let mut customer = Customer::new(record.id);
            for line in &record.lines {
                let contract: Option<Box<dyn Contract>> = match line.contract.parse() {
                    Ok(ContractKind::Prepaid) => Some(Box::new(PrepaidContract::new(
                        contracts.start_date,
                        contracts.initial_credit()?,
                        tariff,
                    ))),
                    Ok(ContractKind::Mtm) => {
                        Some(Box::new(MtmContract::new(contracts.start_date, tariff)))
                    }
                    Ok(ContractKind::Term) => Some(Box::new(TermContract::new(
                        contracts.start_date,
                        contracts.term_end_date,
                        tariff,
                    ))),
                    Err(err) => {
                        warn!(
                            code = err.error_code(),
                            customer = record.id,
                            line = %line.number,
                            "{err}; line proceeds without billing"
                        );
                        None
                    }
                };
                customer.add_line(PhoneLine::new(line.number.clone(), contract));
            }
            customers.push(customer);
        }
        Ok(Self { customers })
    }

    /// The customer owning `number`, if any
    pub fn find_by_number(&mut self, number: &str) -> Option<&mut Customer> {
        self.customers
            .iter_mut()
            .find(|customer| customer.owns_number(number))
    }

    /// Advance every customer to a new billing period
    pub fn new_month(&mut self, month: u32, year: i32) {
        for customer in &mut self.customers {
            customer.new_month(month, year);
        }
    }

    /// All customers
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// All customers, mutably
    pub fn customers_mut(&mut self) -> impl Iterator<Item = &mut Customer> {
        self.customers.iter_mut()
    }

    /// Number of registered customers
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}
