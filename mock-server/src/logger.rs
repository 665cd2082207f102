//! Stderr logging for the mock server binary: Info and above, RFC 3339
//! timestamps, limited to this workspace's crates.

use log::LevelFilter;
use simplelog::{ConfigBuilder, SimpleLogger};

/// Install the global logger. Fails if a logger is already set.
pub fn setup_simple_logger() -> anyhow::Result<()> {
    let logger_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("mock_server")
        .add_filter_allow_str("vetclinic_core")
        .build();

    Ok(SimpleLogger::init(LevelFilter::Info, logger_config)?)
}
