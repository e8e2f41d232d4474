use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;
use time::OffsetDateTime;

/// Error raised when a commit hash string is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitHashError {
    /// The string contained a non-hex character.
    #[error("commit hash contains non-hex character: {0}")]
    NotHex(char),
    /// The string was empty.
    #[error("commit hash must not be empty")]
    Empty,
}

/// Hex commit identifier, externally supplied by the version-control layer.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct CommitHash(String);

impl CommitHash {
    /// View the hash as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CommitHash {
    type Err = CommitHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CommitHashError::Empty);
        }
        if let Some(bad) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(CommitHashError::NotHex(bad));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl Serialize for CommitHash {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CommitHash {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One commit as reported by the version-control collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit identifier.
    pub hash: CommitHash,
    /// Full commit message.
    pub message: String,
    /// Author name.
    pub author: String,
    /// Author timestamp in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Paths touched by the commit.
    #[serde(default)]
    pub files: Vec<String>,
    /// Lines added.
    #[serde(default)]
    pub insertions: u32,
    /// Lines removed.
    #[serde(default)]
    pub deletions: u32,
}
