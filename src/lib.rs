#![doc(test(attr(deny(warnings))))]

//! Tally Core offers the invoice ledger, derived-statistics, and account
//! storage primitives that power the TallyAssist front ends.

pub mod auth;
pub mod errors;
pub mod invoice;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Tally Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
