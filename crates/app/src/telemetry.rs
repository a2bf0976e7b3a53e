//! Tracing setup for the binary.
//!
//! - `QUIZ_LOG` sets the filter directives (default `info,services=debug`).
//! - `QUIZ_LOG_FORMAT=json` switches to JSON lines; anything else is the
//!   human-readable format.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,services=debug";

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("QUIZ_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match std::env::var("QUIZ_LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
