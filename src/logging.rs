// src/logging.rs
// =============================================================================
// Logger setup for the binary.
//
// RUST_LOG is read first, then the level from --log-level wins for our own
// crate. The HTTP stack is kept at info so debug runs stay readable.
//
// Example:
//   RUST_LOG=reqwest=debug linkcheckr scan example.com --log-level debug
// =============================================================================

use log::LevelFilter;

pub fn init_logger(level: LevelFilter) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Info.min(level));
    builder.filter_module("hyper", LevelFilter::Info.min(level));
    builder.filter_module("linkcheckr", level);
    builder.format_timestamp_millis();

    // A second call (e.g. from tests) keeps the first logger
    let _ = builder.try_init();
}
