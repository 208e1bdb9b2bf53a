use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an eligibility statement includes or excludes patients.
///
/// Instance CSVs carry this in an `Incl/Excl` column. Only the exact value
/// `EXCL` marks an exclusion; everything else is treated as inclusion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Incl,
    Excl,
}

impl Direction {
    /// Lenient parse from the `Incl/Excl` CSV field.
    pub fn from_field(value: &str) -> Self {
        if value.trim() == "EXCL" {
            Direction::Excl
        } else {
            Direction::Incl
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Incl => "INCL",
            Direction::Excl => "EXCL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
