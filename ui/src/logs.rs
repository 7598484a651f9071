//! Logging to the javascript console.

use tracing_subscriber::{EnvFilter, prelude::*};
use tracing_web::MakeWebConsoleWriter;

use crate::config::config;

/// Initialize logging. Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let config = config();
    let env_filter = EnvFilter::new(config.log_filter());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_ansi(false) // Only partially supported across browsers
        .without_time() // std::time is not available in browsers
        .with_writer(MakeWebConsoleWriter::new().with_pretty_level())
        .with_level(false);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
    {
        tracing::info!(
            app = %config.app.name,
            version = %config.app.version,
            api = %config.api.base_url,
            "Initialized logs"
        );
    }
}
