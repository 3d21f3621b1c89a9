// ABOUTME: Release tag parsing and increment.
// ABOUTME: Tags look like `v<N>` and every run moves to exactly `v<N+1>`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReleaseTagError {
    #[error("tag does not match v<digits>: '{0}'")]
    Malformed(String),

    #[error("release number overflows after {0}")]
    Overflow(String),
}

/// A strictly increasing release version shared by every module in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReleaseTag(u64);

impl ReleaseTag {
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    /// Parse a tag such as `v12`. Surrounding whitespace (as printed by
    /// `git describe`) is ignored; anything else is rejected.
    pub fn parse(input: &str) -> Result<Self, ReleaseTagError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('v')
            .filter(|d| !d.is_empty() && d.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| ReleaseTagError::Malformed(trimmed.to_string()))?;

        digits
            .parse()
            .map(Self)
            .map_err(|_| ReleaseTagError::Malformed(trimmed.to_string()))
    }

    pub fn number(&self) -> u64 {
        self.0
    }

    /// The tag for the following release: exactly one higher.
    pub fn next(&self) -> Result<Self, ReleaseTagError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| ReleaseTagError::Overflow(self.to_string()))
    }
}

impl FromStr for ReleaseTag {
    type Err = ReleaseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
