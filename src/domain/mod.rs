//! Domain layer - pure types and rules, no I/O.

pub mod drafting;
pub mod foundation;
pub mod ledger;
pub mod messaging;
