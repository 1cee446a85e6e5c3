use std::path::PathBuf;
use vheaderparse::HeaderError;

/// Fatal errors of a testbench generation run.
#[derive(Debug, thiserror::Error)]
pub enum FuzzbenchError {
    /// The module header could not be located or parsed.
    #[error(transparent)]
    Header(#[from] HeaderError),

    /// The clock half-period is zero, or its full period overflows.
    #[error("pulse {0} is out of range 1..={max}", max = crate::config::MAX_PULSE)]
    PulseOutOfRange(u64),

    /// A file could not be resolved, read or written.
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
