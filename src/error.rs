//! The various errors that can happen during the SRP6a process.
//!
//! [`AuthError`] is the classified error returned by the orchestration layer
//! in [`auth`](crate::auth). Every variant maps to an HTTP-style status class
//! through [`AuthError::status_code`] so that a transport layer can translate
//! failures without inspecting internals.
//!
//! [`SrpProtocolError`] covers failures inside the protocol engine itself.
//!
//! The exact conditions for [`UsernameError`] are described in the
//! [`username`](`crate::username`) module.
//!
//! [`InvalidPublicKeyError`] is returned when an invalid value is attempted
//! used as a public key.
//!
//! [`MatchProofsError`] is returned when server and client proofs do not
//! match. Often because of a wrong password.

use std::error::Error;
use std::fmt::{Display, Formatter, Result};

/// Classified error returned by the [`Authenticator`](crate::auth::Authenticator) operations.
///
/// The three proof-related variants deliberately render the same message so
/// that a caller relaying [`Display`] output across the trust boundary does
/// not leak which sub-check failed.
#[derive(Debug)]
pub enum AuthError {
    /// The username is missing or malformed.
    InvalidUsername(UsernameError),
    /// A protocol value received from the client could not be decoded.
    MalformedValue(ParseError),
    /// No credential record exists for the username.
    UserNotFound,
    /// No challenge is pending for the username, or it has expired.
    SessionNotFound,
    /// The client proof did not match.
    AuthenticationFailed,
    /// The client public value was zero modulo the large safe prime.
    InvalidPublicValue,
    /// A derived protocol value was degenerate.
    ProtocolInvariant(SrpProtocolError),
    /// The credential store or session cache failed.
    Store(StoreError),
}

impl AuthError {
    /// The HTTP-style status class for this error.
    ///
    /// `400` for malformed input, `404` for unknown users and missing or
    /// expired sessions, `403` for anything proof-related and `500` for
    /// store failures.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidUsername(_) | AuthError::MalformedValue(_) => 400,
            AuthError::UserNotFound | AuthError::SessionNotFound => 404,
            AuthError::AuthenticationFailed
            | AuthError::InvalidPublicValue
            | AuthError::ProtocolInvariant(_) => 403,
            AuthError::Store(_) => 500,
        }
    }
}

impl Error for AuthError {}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            AuthError::InvalidUsername(e) => {
                write!(f, "{}", e)
            }
            AuthError::MalformedValue(e) => {
                write!(f, "{}", e)
            }
            AuthError::UserNotFound => {
                write!(f, "User not found")
            }
            AuthError::SessionNotFound => {
                write!(f, "Session not found")
            }
            AuthError::AuthenticationFailed
            | AuthError::InvalidPublicValue
            | AuthError::ProtocolInvariant(_) => {
                write!(f, "Authentication failed")
            }
            AuthError::Store(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

impl From<UsernameError> for AuthError {
    fn from(e: UsernameError) -> Self {
        Self::InvalidUsername(e)
    }
}

impl From<ParseError> for AuthError {
    fn from(e: ParseError) -> Self {
        Self::MalformedValue(e)
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

/// Enum that covers the protocol engine error types.
#[derive(Debug)]
pub enum SrpProtocolError {
    /// Password is invalid.
    ProofsDoNotMatch(MatchProofsError),
    /// Public key is either 0 or the public key modulus
    /// [the large safe prime](crate::LARGE_SAFE_PRIME_BIG_ENDIAN) is 0.
    InvalidPublicKey(InvalidPublicKeyError),
    /// The scrambling parameter `u = H(A | B)` hashed to zero.
    ///
    /// This is astronomically unlikely with honestly generated keys and is
    /// rejected outright instead of being retried with a biased value.
    ScramblingParameterZero,
}

impl Error for SrpProtocolError {}

impl Display for SrpProtocolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            SrpProtocolError::ProofsDoNotMatch(proofs) => {
                write!(f, "{}", proofs)
            }
            SrpProtocolError::InvalidPublicKey(error) => {
                write!(f, "{}", error)
            }
            SrpProtocolError::ScramblingParameterZero => {
                write!(f, "Scrambling parameter is zero.")
            }
        }
    }
}

impl From<InvalidPublicKeyError> for SrpProtocolError {
    fn from(i: InvalidPublicKeyError) -> Self {
        Self::InvalidPublicKey(i)
    }
}

impl From<MatchProofsError> for SrpProtocolError {
    fn from(m: MatchProofsError) -> Self {
        Self::ProofsDoNotMatch(m)
    }
}

/// Error for when server and client proofs do not match.
///
/// This is because the client has the wrong password.
///
/// The mismatching proof values are deliberately not carried here so that
/// they can not end up in a message that crosses the trust boundary.
#[derive(Debug)]
pub struct MatchProofsError {}

impl Error for MatchProofsError {}

impl Display for MatchProofsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "Proofs do not match.")
    }
}

/// A public key is invalid either if it is equal to 0, or the public key
/// modulus the [large safe prime](crate::LARGE_SAFE_PRIME_BIG_ENDIAN) is zero.
#[derive(Debug)]
pub enum InvalidPublicKeyError {
    /// The public key is zero.
    PublicKeyIsZero,
    /// The public key modulus the [large safe prime](crate::LARGE_SAFE_PRIME_BIG_ENDIAN) is zero.
    PublicKeyModLargeSafePrimeIsZero,
}

impl Error for InvalidPublicKeyError {}

impl Display for InvalidPublicKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            InvalidPublicKeyError::PublicKeyIsZero => {
                write!(f, "Public key is zero.")
            }
            InvalidPublicKeyError::PublicKeyModLargeSafePrimeIsZero => {
                write!(f, "Public key modulus the large safe prime is zero.")
            }
        }
    }
}

/// Error for malformed textual representations of protocol values.
#[derive(Debug)]
pub enum ParseError {
    /// The string contains characters that are not valid hexadecimal.
    InvalidHex,
    /// The string contains characters that are not valid decimal digits.
    InvalidDecimal,
    /// The value does not fit the fixed width of the field.
    InvalidLength {
        /// Maximum width of the field in bytes.
        maximum: usize,
        /// Width of the provided value in bytes.
        got: usize,
    },
    /// The value decoded but is not a valid protocol value.
    InvalidValue,
}

impl Error for ParseError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ParseError::InvalidHex => {
                write!(f, "Value is not valid hexadecimal.")
            }
            ParseError::InvalidDecimal => {
                write!(f, "Value is not valid decimal.")
            }
            ParseError::InvalidLength { maximum, got } => {
                write!(
                    f,
                    "Value is {} bytes, larger than the maximum of {}.",
                    got, maximum
                )
            }
            ParseError::InvalidValue => {
                write!(f, "Value is not a valid protocol value.")
            }
        }
    }
}

impl From<hex::FromHexError> for ParseError {
    fn from(_: hex::FromHexError) -> Self {
        Self::InvalidHex
    }
}

impl From<InvalidPublicKeyError> for ParseError {
    fn from(_: InvalidPublicKeyError) -> Self {
        Self::InvalidValue
    }
}

/// Error for the [`username`](`crate::username`) module.
#[derive(Debug)]
pub enum UsernameError {
    /// The username is empty.
    Empty,
    /// The specific character is not allowed.
    CharacterNotAllowed(char),
    /// The username is too long.
    StringTooLong,
}

impl Error for UsernameError {}

impl Display for UsernameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            UsernameError::Empty => {
                write!(f, "Username is empty.")
            }
            UsernameError::CharacterNotAllowed(c) => {
                write!(f, "Character is not allowed: '{}'", c)
            }
            UsernameError::StringTooLong => {
                write!(f, "Username is longer than allowed length.")
            }
        }
    }
}

/// Error for the durable credential store and the ephemeral session cache.
///
/// Failures are surfaced to the caller instead of being retried internally.
/// The caller decides retry policy.
#[derive(Debug)]
pub enum StoreError {
    /// Reading from the store failed.
    ReadFailed(String),
    /// Writing to the store failed.
    WriteFailed(String),
    /// A stored entry could not be decoded.
    CorruptEntry(String),
}

impl Error for StoreError {}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            StoreError::ReadFailed(msg) => {
                write!(f, "Store read failed: {}", msg)
            }
            StoreError::WriteFailed(msg) => {
                write!(f, "Store write failed: {}", msg)
            }
            StoreError::CorruptEntry(msg) => {
                write!(f, "Store entry is corrupt: {}", msg)
            }
        }
    }
}

/// Error for the [`password`](`crate::password`) module.
#[derive(Debug)]
pub enum TransformPasswordError {
    /// The password is empty.
    EmptyPassword,
    /// The underlying password hash computation failed.
    HashFailed(password_hash::Error),
}

impl Error for TransformPasswordError {}

impl Display for TransformPasswordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TransformPasswordError::EmptyPassword => {
                write!(f, "Password is empty.")
            }
            TransformPasswordError::HashFailed(e) => {
                write!(f, "Password hashing failed: {}", e)
            }
        }
    }
}

impl From<password_hash::Error> for TransformPasswordError {
    fn from(e: password_hash::Error) -> Self {
        Self::HashFailed(e)
    }
}
