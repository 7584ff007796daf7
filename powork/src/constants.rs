/// An `info!` progress line is emitted every time this many attempts elapse.
pub const PROGRESS_LOG_INTERVAL: u64 = 1 << 20;

pub const DEFAULT_WORKERS: usize = 1;

/// Message proved when none is given on the command line.
pub const DEFAULT_PAYLOAD: &str = "holamundo";
