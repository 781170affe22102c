//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// The input string is empty or all whitespace.
    #[error("username cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside the allowed set.
    #[error("username may only contain letters, digits, '.', '-' and '_'")]
    InvalidCharacter,
}

/// A login name for a user account.
///
/// ## Constraints
///
/// - Length: 1-32 characters
/// - Allowed characters: ASCII letters, digits, `.`, `-`, `_`
/// - Surrounding whitespace is rejected (not trimmed silently)
///
/// ## Examples
///
/// ```
/// use greenbasket_core::Username;
///
/// assert!(Username::parse("alice").is_ok());
/// assert!(Username::parse("bob_42").is_ok());
///
/// assert!(Username::parse("").is_err());        // empty
/// assert!(Username::parse("has space").is_err()); // invalid character
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 32 characters
    /// - Contains characters outside `[A-Za-z0-9._-]`
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        {
            return Err(UsernameError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        for s in ["alice", "bob_42", "jo.hn-doe", "A1"] {
            assert!(Username::parse(s).is_ok(), "{s} should parse");
        }
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(Username::parse(""), Err(UsernameError::Empty)));
    }

    #[test]
    fn test_too_long_rejected() {
        let long = "a".repeat(Username::MAX_LENGTH + 1);
        assert!(matches!(
            Username::parse(&long),
            Err(UsernameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_invalid_characters_rejected() {
        for s in ["has space", "tab\there", "emoji🍍", " padded"] {
            assert!(
                matches!(Username::parse(s), Err(UsernameError::InvalidCharacter)),
                "{s:?} should be rejected"
            );
        }
    }
}
