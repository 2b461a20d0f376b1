#![doc(test(attr(deny(warnings))))]

//! Lodge Ledger: guest stays, taxed invoices, room occupancy and monthly revenue for a
//! small lodge, persisted as JSON files.
//!
//! The domain, services, storage and configuration live in the `lodge-*` workspace
//! crates; this crate wires them together behind [`Lodge`].

pub mod app;
pub mod errors;
pub mod utils;

pub use app::{settings_from_config, Lodge};
pub use errors::LodgeError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Lodge ledger tracing initialized.");
    });
}
