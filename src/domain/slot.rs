//! Type-safe inventory slot index.
//!
//! [`Slot`] is a newtype wrapper around `u8` restricted to the 0–53 range
//! of a six-row chest grid. Menus of fewer rows simply never assign the
//! higher indices; the uniqueness invariant is enforced per menu in the
//! workspace, not here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Index into the 9×6 menu grid.
///
/// Valid values are `0..=53`. Used as the collision key for the
/// slot-uniqueness invariant on main-menu buttons and transaction-menu
/// buttons (the display item included).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(u8);

impl Slot {
    /// Highest valid slot index.
    pub const MAX: u8 = 53;

    /// Creates a `Slot`, rejecting values outside the grid.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidSlot`] if `value > 53`.
    pub fn new(value: u8) -> Result<Self, EditorError> {
        if value > Self::MAX {
            return Err(EditorError::InvalidSlot(i64::from(value)));
        }
        Ok(Self(value))
    }

    /// Parses a raw scalar from a YAML line, falling back to slot 0 on
    /// unparsable or out-of-range input (permissive parser contract).
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        raw.trim()
            .parse::<u8>()
            .ok()
            .and_then(|v| Self::new(v).ok())
            .unwrap_or_default()
    }

    /// Returns the inner index.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Slot {
    type Error = EditorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn accepts_grid_bounds() {
        assert!(Slot::new(0).is_ok());
        assert!(Slot::new(53).is_ok());
    }

    #[test]
    fn rejects_out_of_grid() {
        assert!(Slot::new(54).is_err());
        assert!(Slot::new(255).is_err());
    }

    #[test]
    fn parse_or_default_falls_back_to_zero() {
        assert_eq!(Slot::parse_or_default("22").get(), 22);
        assert_eq!(Slot::parse_or_default("not a number").get(), 0);
        assert_eq!(Slot::parse_or_default("99").get(), 0);
        assert_eq!(Slot::parse_or_default("-3").get(), 0);
    }

    #[test]
    fn display_is_plain_digits() {
        let Ok(slot) = Slot::new(49) else {
            panic!("valid slot");
        };
        assert_eq!(format!("{slot}"), "49");
    }

    #[test]
    fn serde_is_transparent() {
        let Ok(slot) = Slot::new(10) else {
            panic!("valid slot");
        };
        let json = serde_json::to_string(&slot).ok();
        assert_eq!(json.as_deref(), Some("10"));
    }
}
