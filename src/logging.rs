//! Logging setup for applications embedding the toolkit.

use {
    std::env,
    tracing_subscriber::{
        fmt::{self, time::uptime},
        prelude::*,
        EnvFilter, Registry,
    },
};

/// Default logging environment filter. Our crates are debug, everything else is warn.
pub const DEFAULT_FILTER: &str = "warn,dashr_ui=debug,dashr_ui_core=debug";

/// Builds the filter directive string: `base` (or [`DEFAULT_FILTER`]) extended
/// by `RUST_LOG`.
pub fn filter_directives(base: Option<&str>) -> String {
    let mut filter = base.unwrap_or(DEFAULT_FILTER).to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        if !env_filter.is_empty() {
            filter.push(',');
            filter.push_str(&env_filter);
        }
    }
    filter
}

/// Installs a compact stdout `tracing` subscriber with an uptime timer.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(base: Option<&str>) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let format = fmt::format().compact().with_timer(uptime()).with_line_number(true);
    let stdout_log = fmt::layer().event_format(format);

    let subscriber = Registry::default().with(EnvFilter::new(filter_directives(base))).with(stdout_log);
    tracing::subscriber::set_global_default(subscriber)?;
    tracing::debug!("logging initialized");
    Ok(())
}
