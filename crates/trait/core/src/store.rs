//! Persisted per-entity attribute bag.
//!
//! The store is the ground truth for trait state: nothing in this workspace
//! keeps an authoritative copy of it in memory, so state rebuilt after a
//! restart is whatever the store hands back.

use thiserror::Error;

/// A typed value held under a single attribute key.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    StringArray(Vec<String>),
    Int(i32),
    Long(i64),
}

impl AttributeValue {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StringArray(_) => "string array",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("attribute store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("attribute `{key}` holds {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Key/value store scoped to one entity.
///
/// Implementors provide the three untyped operations; the typed accessors are
/// derived from them and reject values of the wrong kind.
pub trait AttributeStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<AttributeValue>, StoreError>;

    fn set(&self, key: &str, value: AttributeValue) -> Result<(), StoreError>;

    /// Removes the attribute. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    fn get_string_array(&self, key: &str) -> Result<Option<Vec<String>>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(AttributeValue::StringArray(values)) => Ok(Some(values)),
            Some(other) => Err(mismatch(key, "string array", &other)),
        }
    }

    fn set_string_array(&self, key: &str, values: Vec<String>) -> Result<(), StoreError> {
        self.set(key, AttributeValue::StringArray(values))
    }

    fn get_int(&self, key: &str) -> Result<Option<i32>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(AttributeValue::Int(value)) => Ok(Some(value)),
            Some(other) => Err(mismatch(key, "int", &other)),
        }
    }

    fn set_int(&self, key: &str, value: i32) -> Result<(), StoreError> {
        self.set(key, AttributeValue::Int(value))
    }

    fn get_long(&self, key: &str) -> Result<Option<i64>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(AttributeValue::Long(value)) => Ok(Some(value)),
            Some(other) => Err(mismatch(key, "long", &other)),
        }
    }

    fn set_long(&self, key: &str, value: i64) -> Result<(), StoreError> {
        self.set(key, AttributeValue::Long(value))
    }
}

fn mismatch(key: &str, expected: &'static str, found: &AttributeValue) -> StoreError {
    StoreError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}
