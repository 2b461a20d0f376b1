//! lodge-core
//!
//! Booking ledger and invoice engine for the lodge.
//! Depends on lodge-domain. No terminal I/O and no file access; persistence goes
//! through the [`storage::RecordStore`] trait.

pub mod calendar_service;
pub mod error;
pub mod expenditure_service;
pub mod invoice;
pub mod ledger_service;
pub mod memory;
pub mod occupancy;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod validation;

pub use calendar_service::*;
pub use error::CoreError;
pub use expenditure_service::*;
pub use invoice::*;
pub use ledger_service::*;
pub use memory::MemoryStore;
pub use occupancy::*;
pub use storage::{RecordFilter, RecordStore};
pub use summary_service::*;
pub use time::*;

#[cfg(test)]
mod tests;
