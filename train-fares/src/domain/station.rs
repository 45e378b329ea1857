//! Station identifier type.

use std::fmt;

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station identifier: {reason}")]
pub struct InvalidStation {
    reason: &'static str,
}

/// A station identifier as typed into the provider's search form.
///
/// Providers match these against their own station lists, so the value is
/// kept verbatim apart from surrounding whitespace. It must not be empty and
/// must not contain the ledger's `|` delimiter or control characters.
///
/// # Examples
///
/// ```
/// use train_fares::domain::StationId;
///
/// let madrid = StationId::parse("Madrid").unwrap();
/// assert_eq!(madrid.as_str(), "Madrid");
///
/// // Surrounding whitespace is dropped
/// assert_eq!(StationId::parse("  Barcelona ").unwrap().as_str(), "Barcelona");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("Madrid|Atocha").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(String);

impl StationId {
    /// Parse a station identifier from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStation> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStation {
                reason: "must not be empty",
            });
        }

        if trimmed.contains('|') {
            return Err(InvalidStation {
                reason: "must not contain '|'",
            });
        }

        if trimmed.chars().any(char::is_control) {
            return Err(InvalidStation {
                reason: "must not contain control characters",
            });
        }

        Ok(StationId(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
