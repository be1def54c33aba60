//! Client identifiers of the form `{client_type}-{sequence}`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_LENGTH: usize = 9;
const MAX_LENGTH: usize = 64;

/// Errors raised while validating a client identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The identifier is empty or blank.
    #[error("identifier cannot be blank")]
    Empty,

    /// The identifier length is out of bounds.
    #[error("identifier `{id}` has invalid length {length}, must be between {MIN_LENGTH} and {MAX_LENGTH}")]
    InvalidLength {
        /// The offending identifier
        id: String,
        /// Its length
        length: usize,
    },

    /// The identifier contains a character outside the allowed set.
    #[error("identifier `{id}` must contain only alphanumeric or the following characters: '.', '_', '+', '-', '#', '[', ']', '<', '>'")]
    InvalidCharacter {
        /// The offending identifier
        id: String,
    },

    /// The identifier is not `{client_type}-{sequence}`.
    #[error("identifier `{id}` is not in the format `{{client_type}}-{{sequence}}`")]
    InvalidFormat {
        /// The offending identifier
        id: String,
    },
}

/// A validated client identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// Formats the identifier for the given client type and sequence.
    ///
    /// # Errors
    /// Fails if the resulting identifier is invalid, e.g. the client type is empty.
    pub fn new(client_type: &str, sequence: u64) -> Result<Self, IdentifierError> {
        format!("{client_type}-{sequence}").parse()
    }

    /// The client type prefix.
    #[must_use]
    pub fn client_type(&self) -> &str {
        self.split().0
    }

    /// The sequence suffix.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.split().1
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(&self) -> (&str, u64) {
        // validated on construction
        self.0
            .rsplit_once('-')
            .and_then(|(client_type, sequence)| Some((client_type, sequence.parse().ok()?)))
            .unwrap_or((self.0.as_str(), 0))
    }
}

fn validate(id: &str) -> Result<(), IdentifierError> {
    if id.trim().is_empty() {
        return Err(IdentifierError::Empty);
    }
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&id.len()) {
        return Err(IdentifierError::InvalidLength {
            id: id.to_string(),
            length: id.len(),
        });
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-' | '#' | '[' | ']' | '<' | '>'))
    {
        return Err(IdentifierError::InvalidCharacter { id: id.to_string() });
    }
    match id.rsplit_once('-') {
        Some((client_type, sequence))
            if !client_type.is_empty()
                && !client_type.ends_with('-')
                && !sequence.is_empty()
                && sequence.bytes().all(|b| b.is_ascii_digit())
                && sequence.parse::<u64>().is_ok() =>
        {
            Ok(())
        }
        _ => Err(IdentifierError::InvalidFormat { id: id.to_string() }),
    }
}

impl FromStr for ClientId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ClientId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)?;
        Ok(Self(value))
    }
}

impl From<ClientId> for String {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
