//! lodge-domain
//!
//! Pure domain models for the lodge ledger (Stay, Charges, rooms, expenditures, summaries).
//! No I/O, no storage, no business rules beyond simple accessors.

pub mod calendar;
pub mod common;
pub mod expenditure;
pub mod room;
pub mod stay;
pub mod summary;

pub use calendar::*;
pub use common::*;
pub use expenditure::*;
pub use room::*;
pub use stay::*;
pub use summary::*;
