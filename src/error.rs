//! Error types for the wordpos engine.

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Engine error type.
///
/// A word that simply is not in the dictionary is a miss, not an error;
/// misses surface as `false` / empty results. These variants cover the
/// cases where the database itself, a caller-supplied offset, or the
/// machine underneath is wrong.
///
/// The whole enum is `Clone` because coalesced reads fan one outcome out
/// to every waiting caller; I/O failures are carried as rendered strings
/// for that reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `seek` offset was non-numeric, negative, or zero
    #[error("offset must be valid positive number.")]
    MalformedOffset(String),

    /// POS tag outside n/v/a/r (with s accepted as adjective)
    #[error("Incorrect POS - 2nd argument must be a, r, n or v.")]
    UnknownPos(String),

    /// Data-file read hit EOF or the per-POS line-length bound without a record
    #[error("no data at offset {0}")]
    NoDataAtOffset(u64),

    /// Data line exists but its own offset field disagrees with the request
    #[error("Bad data at location {0}")]
    BadDataAtLocation(u64),

    /// Fast-index sidecar missing or unreadable at engine construction
    #[error("Missing or unreadable fast-index file {path}: {detail}")]
    MissingFastIndex { path: String, detail: String },

    /// Index line matched but does not follow the index-line grammar
    #[error("Malformed index line for '{lemma}': {detail}")]
    IndexParse { lemma: String, detail: String },

    /// Data line read but does not follow the data-line grammar
    #[error("Malformed data line at offset {offset}: {detail}")]
    DataParse { offset: u64, detail: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Create a malformed-offset error from the raw caller input
    pub fn malformed_offset(input: impl Into<String>) -> Self {
        Error::MalformedOffset(input.into())
    }

    /// Create an unknown-POS error from the raw caller input
    pub fn unknown_pos(input: impl Into<String>) -> Self {
        Error::UnknownPos(input.into())
    }

    /// Create a missing-fast-index error
    pub fn missing_fast_index(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::MissingFastIndex {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Create an index-line parse error
    pub fn index_parse(lemma: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::IndexParse {
            lemma: lemma.into(),
            detail: detail.into(),
        }
    }

    /// Create a data-line parse error
    pub fn data_parse(offset: u64, detail: impl Into<String>) -> Self {
        Error::DataParse {
            offset,
            detail: detail.into(),
        }
    }

    /// Create an I/O error
    pub fn io(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Io(err.to_string())
    }
}
