use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};

use crate::errors::BankResult;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("bank_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Routes the audit log to an append-only file instead of stderr:
/// timestamped, ANSI-free, one line per event. Has no effect if a subscriber
/// was already installed.
pub fn init_file_log(path: &Path) -> BankResult<()> {
    if TRACING_INIT.is_completed() {
        return Ok(());
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("bank_core=info".parse().unwrap());

        fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    });
    Ok(())
}
