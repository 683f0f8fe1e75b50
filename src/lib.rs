#![doc(test(attr(deny(warnings))))]

//! Bank Core offers the account, lending, and card ledger primitives that
//! power teller-facing banking menus and services.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod utils;

pub use crate::core::Bank;
pub use config::Config;
pub use errors::{BankError, BankResult};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bank Core tracing initialized.");
    });
}
