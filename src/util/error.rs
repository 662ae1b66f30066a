// RosterSleuth - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation: every failure names the record, field,
// file, or line that caused it, and wrapped errors stay reachable through
// `source()` for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all RosterSleuth operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum RosterError {
    /// A roster operation was rejected (duplicate id, unknown id, range, no data).
    Record(RecordError),

    /// Saving or loading a roster file failed.
    Persist(PersistError),
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(e) => write!(f, "Roster error: {e}"),
            Self::Persist(e) => write!(f, "Persistence error: {e}"),
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Record(e) => Some(e),
            Self::Persist(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Record errors
// ---------------------------------------------------------------------------

/// Errors raised by roster operations on the in-memory manager.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A student with this id is already on the roster (case-sensitive match).
    DuplicateKey { id: String },

    /// No student with this id is on the roster.
    NotFound { id: String },

    /// A numeric value lies outside its permitted inclusive range.
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// An aggregate was requested over a course nobody has a score for.
    NoData { course_code: String },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey { id } => write!(f, "Student with ID '{id}' already exists"),
            Self::NotFound { id } => write!(f, "No student with ID '{id}'"),
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} {value} is out of range ({min}-{max})"),
            Self::NoData { course_code } => {
                write!(f, "No scores recorded for course '{course_code}'")
            }
        }
    }
}

impl std::error::Error for RecordError {}

impl From<RecordError> for RosterError {
    fn from(e: RecordError) -> Self {
        Self::Record(e)
    }
}

// ---------------------------------------------------------------------------
// Format errors
// ---------------------------------------------------------------------------

/// Errors decoding a single persisted row. Surfaces to callers wrapped in
/// `PersistError::Format` with the file and line attached.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The row has fewer top-level fields than the format requires.
    MissingFields {
        row: String,
        found: usize,
        expected: usize,
    },

    /// A field that must be numeric could not be parsed.
    InvalidNumber { field: &'static str, raw: String },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields {
                row,
                found,
                expected,
            } => write!(
                f,
                "expected at least {expected} fields, found {found} in row '{row}'"
            ),
            Self::InvalidNumber { field, raw } => {
                write!(f, "{field} '{raw}' is not a valid number")
            }
        }
    }
}

impl std::error::Error for FormatError {}

// ---------------------------------------------------------------------------
// Persistence errors
// ---------------------------------------------------------------------------

/// Errors saving or loading roster files.
///
/// Row-level failures carry the 1-based line number within the file,
/// counting the header as line 1.
#[derive(Debug)]
pub enum PersistError {
    /// I/O error opening, writing, or renaming the file.
    Io { path: PathBuf, source: io::Error },

    /// CSV reader/writer error.
    Csv { path: PathBuf, source: csv::Error },

    /// A row could not be decoded.
    Format {
        path: PathBuf,
        line: u64,
        source: FormatError,
    },

    /// A decoded row was rejected by the roster (duplicate, unknown id, range).
    Record {
        path: PathBuf,
        line: u64,
        source: RecordError,
    },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "I/O error on '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV error on '{}': {source}", path.display())
            }
            Self::Format { path, line, source } => {
                write!(f, "'{}' line {line}: {source}", path.display())
            }
            Self::Record { path, line, source } => {
                write!(f, "'{}' line {line}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Format { source, .. } => Some(source),
            Self::Record { source, .. } => Some(source),
        }
    }
}

impl From<PersistError> for RosterError {
    fn from(e: PersistError) -> Self {
        Self::Persist(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
///
/// Never fatal: `load_config` reports these as warnings alongside defaults.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for RosterSleuth results.
pub type Result<T> = std::result::Result<T, RosterError>;
