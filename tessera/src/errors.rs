use backtrace::Backtrace;
use serde::{de, ser};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for Tessera operations.
///
/// Each kind names one category of failure so callers can branch on it
/// without parsing messages.
///
/// # Examples
///
/// ```rust,ignore
/// use tessera::errors::{TesseraError, ErrorKind, TesseraResult};
///
/// fn example() -> TesseraResult<()> {
///     Err(TesseraError::new("No store connection", ErrorKind::StoreNotInitialized))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Filter Errors
    /// Error during filter evaluation or construction
    FilterError,

    // ID and Identity Errors
    /// The provided ID is invalid
    InvalidId,

    // Operation Errors
    /// The operation is not valid in the current context
    InvalidOperation,

    // Data Encoding Errors
    /// Error encoding or decoding the wire format
    EncodingError,
    /// Error mapping a typed value to or from a document
    ObjectMappingError,

    // Schema Errors
    /// A unique constraint was violated
    UniqueConstraintViolation,
    /// A declared field constraint was violated
    ValidationError,
    /// A present value cannot be coerced to the requested type
    InvalidDataType,
    /// Invalid field name
    InvalidFieldName,
    /// A required field is missing
    MissingRequiredField,
    /// A schema definition is malformed
    SchemaError,

    // Backend and Store Errors
    /// Error from the storage backend
    BackendError,
    /// No store connection has been established
    StoreNotInitialized,
    /// Store has already been closed
    StoreAlreadyClosed,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::UniqueConstraintViolation => write!(f, "Unique constraint violation"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidDataType => write!(f, "Invalid data type"),
            ErrorKind::InvalidFieldName => write!(f, "Invalid field name"),
            ErrorKind::MissingRequiredField => write!(f, "Missing required field"),
            ErrorKind::SchemaError => write!(f, "Schema error"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::StoreNotInitialized => write!(f, "Store not initialized"),
            ErrorKind::StoreAlreadyClosed => write!(f, "Store already closed"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// The error type of every fallible Tessera operation.
///
/// `TesseraError` carries a message, an [ErrorKind], an optional cause and the
/// backtrace captured at construction.
///
/// # Examples
///
/// ```rust,ignore
/// use tessera::errors::{TesseraError, ErrorKind};
///
/// let cause = TesseraError::new("bad json", ErrorKind::EncodingError);
/// let err = TesseraError::new_with_cause("Failed to decode record", ErrorKind::BackendError, cause);
/// ```
#[derive(Clone)]
pub struct TesseraError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<TesseraError>>,
    backtrace: Atomic<Backtrace>,
}

impl TesseraError {
    /// Creates a new `TesseraError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        TesseraError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `TesseraError` wrapping an underlying cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: TesseraError) -> Self {
        TesseraError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&TesseraError> {
        self.cause.as_deref()
    }
}

impl Display for TesseraError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for TesseraError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{} ({})\nCaused by: {:?}", self.message, self.error_kind, cause),
            None => write!(f, "{} ({})\n{:?}", self.message, self.error_kind, self.backtrace.read()),
        }
    }
}

impl Error for TesseraError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// Shorthand for `Result<T, TesseraError>`.
pub type TesseraResult<T> = Result<T, TesseraError>;

impl de::Error for TesseraError {
    fn custom<T: Display>(msg: T) -> Self {
        TesseraError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

impl ser::Error for TesseraError {
    fn custom<T: Display>(msg: T) -> Self {
        TesseraError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

impl From<serde_json::Error> for TesseraError {
    fn from(err: serde_json::Error) -> Self {
        TesseraError::new(&format!("JSON error: {}", err), ErrorKind::EncodingError)
    }
}

impl From<regex::Error> for TesseraError {
    fn from(err: regex::Error) -> Self {
        TesseraError::new(&format!("Invalid pattern: {}", err), ErrorKind::FilterError)
    }
}

impl From<chrono::ParseError> for TesseraError {
    fn from(err: chrono::ParseError) -> Self {
        TesseraError::new(
            &format!("Timestamp parsing error: {}", err),
            ErrorKind::InvalidDataType,
        )
    }
}

impl From<std::num::ParseIntError> for TesseraError {
    fn from(err: std::num::ParseIntError) -> Self {
        TesseraError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidDataType,
        )
    }
}

impl From<std::num::ParseFloatError> for TesseraError {
    fn from(err: std::num::ParseFloatError) -> Self {
        TesseraError::new(
            &format!("Float parsing error: {}", err),
            ErrorKind::InvalidDataType,
        )
    }
}

impl From<String> for TesseraError {
    fn from(msg: String) -> Self {
        TesseraError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for TesseraError {
    fn from(msg: &str) -> Self {
        TesseraError::new(msg, ErrorKind::InternalError)
    }
}
