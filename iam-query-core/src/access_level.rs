//! Access levels and the user-token normalizer.
//!
//! The dataset stores one of five canonical labels per action (`Read`, `Write`,
//! `List`, `Tagging`, `Permissions management`). Users type lowercase, hyphenated
//! tokens instead; [`normalize`] maps one onto the other through a fixed table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{QueryError, Result};

/// Canonical IAM access level of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccessLevel {
    Read,
    Write,
    List,
    Tagging,
    #[serde(rename = "Permissions management")]
    PermissionsManagement,
}

/// User-facing tokens accepted on the command line, paired with their canonical level.
const ACCESS_LEVEL_TOKENS: [(&str, AccessLevel); 5] = [
    ("read", AccessLevel::Read),
    ("write", AccessLevel::Write),
    ("list", AccessLevel::List),
    ("tagging", AccessLevel::Tagging),
    ("permissions-management", AccessLevel::PermissionsManagement),
];

impl AccessLevel {
    /// All five levels, in the order AWS documentation lists them.
    pub const ALL: [Self; 5] = [
        Self::List,
        Self::Read,
        Self::Tagging,
        Self::Write,
        Self::PermissionsManagement,
    ];

    /// The label stored in the dataset.
    #[must_use]
    pub fn canonical(self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::List => "List",
            Self::Tagging => "Tagging",
            Self::PermissionsManagement => "Permissions management",
        }
    }

    /// The lowercase token a user types for this level.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::List => "list",
            Self::Tagging => "tagging",
            Self::PermissionsManagement => "permissions-management",
        }
    }

    /// Accepted user tokens, for help text and argument validation.
    pub fn tokens() -> impl Iterator<Item = &'static str> {
        ACCESS_LEVEL_TOKENS.iter().map(|(token, _)| *token)
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

/// Parses a canonical dataset label (`"Permissions management"`), not a user token.
impl FromStr for AccessLevel {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.canonical() == s)
            .ok_or_else(|| QueryError::InvalidAccessLevel(s.to_string()))
    }
}

/// Map a user-facing access-level token to its canonical level.
///
/// Total over the five accepted tokens; anything else is `InvalidAccessLevel`.
pub fn normalize(level_token: &str) -> Result<AccessLevel> {
    ACCESS_LEVEL_TOKENS
        .iter()
        .find(|(token, _)| *token == level_token)
        .map(|(_, level)| *level)
        .ok_or_else(|| QueryError::InvalidAccessLevel(level_token.to_string()))
}
