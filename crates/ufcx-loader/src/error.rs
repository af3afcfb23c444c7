//! Error types for module loading and descriptor validation

use std::path::PathBuf;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors that can occur while loading a generated module or validating
/// its descriptors
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// Shared library could not be opened
    #[error("failed to load module {path}: {source}")]
    LibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// Required symbol missing from the module
    #[error("missing symbol {symbol}: {source}")]
    MissingSymbol {
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    /// Module was generated against an incompatible interface version
    #[error("incompatible interface version: module has {module:#010x}, host expects {host:#010x}")]
    VersionMismatch { module: u32, host: u32 },

    /// A count field that indexes an array is negative
    #[error("negative {field}: {value}")]
    NegativeCount { field: &'static str, value: i32 },

    /// A pointer field required by the count fields is null
    #[error("null pointer in required field {0}")]
    NullField(&'static str),

    /// Integral offsets decrease between two kinds
    #[error("integral offsets decrease at entry {index}: {previous} followed by {value}")]
    OffsetsNotMonotonic { index: usize, previous: i32, value: i32 },

    /// Integral offsets do not start at zero
    #[error("integral offsets must start at 0, found {0}")]
    OffsetsBadStart(i32),

    /// A name string is not valid UTF-8
    #[error("invalid UTF-8 in {field}: {source}")]
    InvalidString {
        field: &'static str,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Module directory could not be read
    #[error("failed to read module directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No module registered under the given name
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// Integral index past the end of its kind's partition
    #[error("no {kind} integral at index {index} (form has {len})")]
    IntegralOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    /// Metadata serialization failure
    #[error("metadata serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = LoaderError::OffsetsNotMonotonic {
            index: 2,
            previous: 5,
            value: 3,
        };
        assert_eq!(
            err.to_string(),
            "integral offsets decrease at entry 2: 5 followed by 3"
        );

        let err = LoaderError::NegativeCount {
            field: "num_coefficients",
            value: -1,
        };
        assert_eq!(err.to_string(), "negative num_coefficients: -1");
    }
}
