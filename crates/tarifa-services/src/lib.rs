//! Business logic services for Tarifa
//!
//! This crate orchestrates the billing simulation over the core contract
//! state machine:
//!
//! - `registry` - customers, phone lines, and number resolution
//! - `driver` - the chronological event loop: month-boundary detection,
//!   call dispatch, and line closure
//!
//! Everything here is strictly sequential; a bill is owned by exactly one
//! contract for the duration of one month and is never shared.

pub mod driver;
pub mod registry;

pub use driver::{BillingDriver, LineSettlement, SimulationReport};
pub use registry::{Customer, CustomerRegistry, PhoneLine};
