//! Logging setup for the binaries.
//!
//! Library code logs through the `log` facade; this installs a
//! `tracing-subscriber` formatter on stderr that also receives `log`
//! records. Stdout stays free for command output.

use tracing_subscriber::filter::LevelFilter;

/// Install the stderr logger at `info`. Safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(LevelFilter::INFO)
        .with_target(false)
        .try_init();
}
