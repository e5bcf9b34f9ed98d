//! Engine configuration variables with safe defaults.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// How the engine orders the selection it reads from the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SelectionOrder {
    /// Every product attribute, in declaration order, including those with nothing chosen.
    #[default]
    Declared,
    /// Attributes in the order the user first chose a value, then the rest in declaration order.
    Touched,
}

impl SelectionOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionOrder::Declared => "declared",
            SelectionOrder::Touched => "touched",
        }
    }
}

impl fmt::Display for SelectionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionOrder {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "declared" => Ok(SelectionOrder::Declared),
            "touched" => Ok(SelectionOrder::Touched),
            _ => Err(CoreError::DomainOutOfRange("selection_order")),
        }
    }
}

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct EngineConfig {
    pub selection_order: SelectionOrder,
}
