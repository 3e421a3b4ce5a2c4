use crate::errors::{ErrorKind, TesseraError, TesseraResult};
use crate::ID_GENERATOR;
use once_cell::sync::Lazy;
use std::fmt::{Debug, Display};
use std::str::FromStr;

static MAX_VALUE: Lazy<u64> = Lazy::new(|| 10u64.pow(19));
static MIN_VALUE: Lazy<u64> = Lazy::new(|| 10u64.pow(18));

/// Generated document identifier.
///
/// A 64-bit value in `[10^18, 10^19)`, so its text form is always 19 digits.
/// Ids produced by [DocumentId::new] grow with time, which makes the natural
/// order of a collection follow insertion order.
///
/// Documents carry the identifier as a string under the `id` field; the store
/// encodes it as `{"$oid": "..."}`.
#[derive(PartialEq, Eq, Ord, PartialOrd, Hash, Clone, Copy, serde::Deserialize, serde::Serialize)]
pub struct DocumentId {
    id_value: u64,
}

impl DocumentId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        DocumentId {
            id_value: ID_GENERATOR.get_id(),
        }
    }

    /// Wraps an existing value. Fails with [ErrorKind::InvalidId] outside the
    /// valid range.
    pub fn create_id(id_value: u64) -> TesseraResult<DocumentId> {
        if id_value >= *MAX_VALUE {
            log::error!("Id value {} is too large", id_value);
            return Err(TesseraError::new(
                &format!("Id value must be less than {}", *MAX_VALUE),
                ErrorKind::InvalidId,
            ));
        }
        if id_value < *MIN_VALUE {
            log::error!("Id value {} is too small", id_value);
            return Err(TesseraError::new(
                &format!("Id value must be greater than or equal to {}", *MIN_VALUE),
                ErrorKind::InvalidId,
            ));
        }
        Ok(DocumentId { id_value })
    }

    /// Parses the 19-digit text form.
    pub fn parse(text: &str) -> TesseraResult<DocumentId> {
        let id_value = text.parse::<u64>().map_err(|err| {
            log::error!("'{}' is not a document id: {}", text, err);
            TesseraError::new(
                &format!("'{}' is not a document id", text),
                ErrorKind::InvalidId,
            )
        })?;
        DocumentId::create_id(id_value)
    }

    pub fn id_value(&self) -> u64 {
        self.id_value
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        DocumentId::new()
    }
}

impl FromStr for DocumentId {
    type Err = TesseraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentId::parse(s)
    }
}

impl Debug for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentId({})", self.id_value)
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id_value)
    }
}
