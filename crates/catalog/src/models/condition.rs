use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// Physical condition of a copy, as recorded the last time a librarian
/// inspected it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Condition {
    /// Fit for lending (every new copy starts here)
    #[default]
    Good,
    /// Needs repair or withdrawal
    Damaged,
}
impl Condition {
    /// Returns the lowercase display string for the condition.
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Good => "good",
            Condition::Damaged => "damaged",
        }
    }
}
impl FromStr for Condition {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "good" | "g" => Self::Good,
            "damaged" | "d" => Self::Damaged,
            _ => exn::bail!(ErrorKind::ParseCondition(s.to_string())),
        })
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
