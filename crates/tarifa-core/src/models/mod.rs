//! Domain models for Tarifa
//!
//! This module contains the core domain models of the billing simulator.

pub mod bill;
pub mod call;
pub mod contract;

pub use bill::{Bill, RateKind};
pub use call::Call;
pub use contract::{Contract, ContractKind, MtmContract, PrepaidContract, TermContract};
