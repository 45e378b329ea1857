//! Train operator tag type.

use std::fmt;

/// Error returned when parsing an invalid operator tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid operator: {reason}")]
pub struct InvalidOperator {
    reason: &'static str,
}

/// Tag identifying the operator that sells a service (e.g. "AVLO", "OUIGO").
///
/// Operators are stored in the ledger's `company` column. Tags are ASCII
/// letters, digits, spaces or hyphens, and are normalised to uppercase.
///
/// # Examples
///
/// ```
/// use train_fares::domain::Operator;
///
/// let avlo = Operator::parse("avlo").unwrap();
/// assert_eq!(avlo.as_str(), "AVLO");
///
/// assert!(Operator::parse("").is_err());
/// assert!(Operator::parse("A|B").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Operator(String);

impl Operator {
    /// Parse an operator tag from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidOperator> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidOperator {
                reason: "must not be empty",
            });
        }

        for c in trimmed.chars() {
            if !(c.is_ascii_alphanumeric() || c == ' ' || c == '-') {
                return Err(InvalidOperator {
                    reason: "must be ASCII letters, digits, spaces or hyphens",
                });
            }
        }

        Ok(Operator(trimmed.to_ascii_uppercase()))
    }

    /// Returns the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Operator({})", self.0)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
