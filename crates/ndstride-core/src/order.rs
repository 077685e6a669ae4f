//! Order - Nested Iteration Conventions
//!
//! An order tells how a multi-dimensional index space is linearized:
//! row-major (`C`), column-major (`F`) or as the elements happen to be laid
//! out in storage (`S`).
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{Error, Result};

// =============================================================================
// Order Enum
// =============================================================================

/// Nested iteration order of a multi-dimensional index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Row-major: the last dimension varies fastest.
    C,
    /// Column-major: the first dimension varies fastest.
    F,
    /// Storage order: however the elements are physically laid out.
    S,
}

impl Order {
    /// Returns the order configured as default for new arrays.
    #[must_use]
    pub fn default_order() -> Self {
        config::current().default_order
    }

    /// Maps `S` to the default order, keeping `C` and `F`.
    #[must_use]
    pub fn auto_fc(order: Self) -> Self {
        match order {
            Self::S => Self::default_order(),
            other => other,
        }
    }

    /// Returns true for the canonical orders `C` and `F`.
    #[must_use]
    pub const fn is_canonical(self) -> bool {
        matches!(self, Self::C | Self::F)
    }

    /// Fails with `UnsupportedOrder` when the order is `S`.
    pub fn require_canonical(self, operation: &'static str) -> Result<Self> {
        if self.is_canonical() {
            Ok(self)
        } else {
            Err(Error::UnsupportedOrder {
                order: self,
                operation,
            })
        }
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::C
    }
}

impl core::fmt::Display for Order {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::C => "C",
            Self::F => "F",
            Self::S => "S",
        };
        write!(f, "{name}")
    }
}

impl core::str::FromStr for Order {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "C" | "c" => Ok(Self::C),
            "F" | "f" => Ok(Self::F),
            "S" | "s" => Ok(Self::S),
            other => Err(Error::config(format!("unknown order '{other}'"))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
