//! Stable identifier for directory entries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric business identifier, serialized as a bare JSON number.
///
/// Ids are allocated as `max(existing) + 1`, so an id is never handed out
/// again while any higher id is still present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessId(pub u64);

impl BusinessId {
    /// The id that follows this one, or `None` at the top of the id space.
    pub fn next(self) -> Option<BusinessId> {
        self.0.checked_add(1).map(BusinessId)
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BusinessId {
    fn from(raw: u64) -> Self {
        BusinessId(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prints_inner_value() {
        assert_eq!(format!("{}", BusinessId(7)), "7");
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&BusinessId(42)).unwrap();
        assert_eq!(json, "42");

        let back: BusinessId = serde_json::from_str("42").unwrap();
        assert_eq!(back, BusinessId(42));
    }

    #[test]
    fn next_increments() {
        assert_eq!(BusinessId(0).next(), Some(BusinessId(1)));
        assert_eq!(BusinessId(9).next(), Some(BusinessId(10)));
    }

    #[test]
    fn next_stops_at_max() {
        assert_eq!(BusinessId(u64::MAX).next(), None);
    }
}
