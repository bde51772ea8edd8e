//! Taxpayer identification numbers.
//!
//! The registry keys every organization by its INN: 10 digits for legal
//! entities, 12 for individual entrepreneurs. Requests are only built from an
//! [`Inn`] that passed validation, so a malformed identifier never reaches the
//! network.

use super::error::{BfoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated taxpayer identification number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Inn(String);

impl Inn {
    /// Parses user input into an INN.
    ///
    /// Surrounding whitespace is ignored. The rest must be ASCII digits and
    /// exactly 10 or 12 characters long.
    ///
    /// # Errors
    ///
    /// Returns `BfoError::InvalidInn` carrying the trimmed input otherwise.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let digits_only = !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit());

        if digits_only && matches!(trimmed.len(), 10 | 12) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(BfoError::InvalidInn(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the 10-digit form used by legal entities.
    pub fn is_legal_entity(&self) -> bool {
        self.0.len() == 10
    }
}

impl FromStr for Inn {
    type Err = BfoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Inn {
    type Error = BfoError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Inn> for String {
    fn from(inn: Inn) -> Self {
        inn.0
    }
}

impl AsRef<str> for Inn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Inn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
