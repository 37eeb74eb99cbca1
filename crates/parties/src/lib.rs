//! Counterparty records managed next to invoices: suppliers, contracts and
//! accounts payable.
//!
//! Pure domain types only. Mutation goes through the remote API; these types
//! carry the state the safeguard rules need (activity flag, dependency
//! markers, settlement status).

pub mod contract;
pub mod payable;
pub mod supplier;

pub use contract::{Contract, ContractStatus};
pub use payable::{Payable, PayableStatus};
pub use supplier::{
    RegisterSupplier, Supplier, SupplierCommand, SupplierDependencies, SupplierEvent,
};
