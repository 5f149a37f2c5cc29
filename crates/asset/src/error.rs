//! Error taxonomy shared by the asset parsers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the loaders. Partially built state (attribute
/// pools, pixel buffers) is never handed back alongside an error.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The file could not be opened at all.
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file opened but its contents violate the format: bad magic,
    /// unsupported channel depth, wrong face arity, non-integer index,
    /// truncated payload. A read failure mid-stream lands here too.
    #[error("format error: {0}")]
    Format(String),

    /// A face referenced an attribute outside its pool. Only produced
    /// under [`IndexPolicy::Strict`](crate::obj::IndexPolicy).
    #[error("{pool} index {index} out of range (pool has {len} entries) on line {line}")]
    Index {
        pool: &'static str,
        index: usize,
        len: usize,
        line: usize,
    },
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssetError>;
