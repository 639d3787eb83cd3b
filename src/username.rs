//! Functionality for validating usernames before they enter the protocol.
//!
//! # Background
//!
//! The `x` value that the password verifier is derived from binds the exact
//! byte representation of the username, see
//! [`calculate_x`](crate::srp_internal::calculate_x). If the registration
//! service, the authentication server and the client disagree about how a
//! username is represented, users either fail to log in or, worse, two
//! different spellings can end up mapped to the same credential record.
//!
//! Unicode makes agreement hard: combining characters, visually identical
//! code points and locale dependent case rules all mean that the only way to
//! know how a peer renders a given string is to test it.
//!
//! # Solution
//!
//! The only manageable solution is to stick to the printable ASCII character
//! set and reject everything else. Usernames are matched byte for byte and
//! case sensitively; no case folding is performed anywhere in the chain.
//!
//! This also provides the benefit of knowing exactly how large a username
//! can be.

use crate::error::UsernameError;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Represents a username containing only allowed characters.
///
/// See [`username`](`crate::username`) for more information.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Username {
    s: String,
}

/// The highest amount of bytes allowed in a username.
pub const MAXIMUM_USERNAME_LENGTH_IN_BYTES: usize = 64;

impl Username {
    /// Checks for non-ASCII characters, control characters, whitespace and
    /// too large of a string.
    ///
    /// Allowed characters are all printable ASCII characters except space.
    /// Case is preserved.
    ///
    /// # Errors
    ///
    /// [`UsernameError::Empty`] for the empty string,
    /// [`UsernameError::StringTooLong`] for strings over
    /// [`MAXIMUM_USERNAME_LENGTH_IN_BYTES`] and
    /// [`UsernameError::CharacterNotAllowed`] for anything outside the
    /// allowed set.
    pub fn new(s: impl Into<String>) -> Result<Self, UsernameError> {
        let s = s.into();

        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        if s.len() > MAXIMUM_USERNAME_LENGTH_IN_BYTES {
            return Err(UsernameError::StringTooLong);
        }

        for c in s.chars() {
            if !c.is_ascii_graphic() {
                return Err(UsernameError::CharacterNotAllowed(c));
            }
        }

        Ok(Self { s })
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.s
    }
}

#[cfg(test)]
mod test {
    use crate::username::{Username, MAXIMUM_USERNAME_LENGTH_IN_BYTES};

    #[test]
    fn allowed_usernames() {
        for name in ["alice", "Alice", "a", "user_01", "a.b-c@d"] {
            assert!(Username::new(name).is_ok());
        }
    }

    #[test]
    fn case_is_preserved() {
        let u = Username::new("Alice").unwrap();
        assert_eq!(u.as_ref(), "Alice");
    }

    #[test]
    fn empty_username_is_rejected() {
        assert!(Username::new("").is_err());
    }

    #[test]
    fn too_long_username_is_rejected() {
        let s = "a".repeat(MAXIMUM_USERNAME_LENGTH_IN_BYTES + 1);
        assert!(Username::new(s).is_err());
    }

    #[test]
    fn disallowed_characters_are_rejected() {
        for name in ["with space", "tab\there", "new\nline", "ünïcode", "héllo", "\u{0}"] {
            assert!(Username::new(name).is_err(), "accepted {:?}", name);
        }
    }
}
