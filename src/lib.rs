//! Expense sheet shell: a single working line item, named sheets of
//! committed items, and JSON persistence behind an interactive prompt.

pub mod cli;
pub mod errors;
pub mod ledger;
pub mod storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes the global tracing subscriber exactly once.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::from_default_env().add_directive("expenses=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
