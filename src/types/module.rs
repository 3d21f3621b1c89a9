// ABOUTME: Module identifier parsing and validation.
// ABOUTME: Accepts `module_<digits>` and the shared `module_base` layer.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const PREFIX: &str = "module_";
const BASE: &str = "base";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModuleIdError {
    #[error("module name cannot be empty")]
    Empty,

    #[error("module name must start with '{PREFIX}': {0}")]
    MissingPrefix(String),

    #[error("module number must be digits or 'base': {0}")]
    InvalidNumber(String),
}

/// Identifier of one deployable unit, e.g. `module_3`.
///
/// The numeric part is kept in its string form so `module_007` round-trips
/// as written on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    number: String,
}

impl ModuleId {
    pub fn parse(input: &str) -> Result<Self, ModuleIdError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ModuleIdError::Empty);
        }

        let number = input
            .strip_prefix(PREFIX)
            .ok_or_else(|| ModuleIdError::MissingPrefix(input.to_string()))?;

        if number != BASE && (number.is_empty() || !number.chars().all(|c| c.is_ascii_digit())) {
            return Err(ModuleIdError::InvalidNumber(input.to_string()));
        }

        Ok(Self {
            number: number.to_string(),
        })
    }

    /// The shared base layer, copied into every other module's build context.
    pub fn base() -> Self {
        Self {
            number: BASE.to_string(),
        }
    }

    /// Numeric id in string form (`"3"`, or `"base"`).
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn is_base(&self) -> bool {
        self.number == BASE
    }

    /// Directory and local image name, e.g. `module_3`.
    pub fn name(&self) -> String {
        format!("{PREFIX}{}", self.number)
    }

    /// Cluster resource name, e.g. `module-3`. Underscores are not valid in
    /// Kubernetes object names.
    pub fn deployment_name(&self) -> String {
        format!("module-{}", self.number)
    }
}

impl FromStr for ModuleId {
    type Err = ModuleIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}", self.number)
    }
}
