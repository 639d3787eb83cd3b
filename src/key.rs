use crate::bigint;

use rand::{thread_rng, RngCore};
use subtle::ConstantTimeEq;

use crate::error::{InvalidPublicKeyError, ParseError};
use crate::primes::{LARGE_SAFE_PRIME_BIG_ENDIAN, LARGE_SAFE_PRIME_LENGTH};

macro_rules! key_bigint {
    ($name: ident) => {
        impl $name {
            pub(crate) fn to_bigint(&self) -> bigint::Integer {
                bigint::Integer::from_bytes_be(&self.key)
            }
        }
    };
}

macro_rules! key_new {
    ($name: ident; $size: expr) => {
        impl Default for $name {
            fn default() -> Self {
                let mut key = [0_u8; $size];
                thread_rng().fill_bytes(&mut key);
                Self::from_be_bytes(key)
            }
        }

        impl $name {
            pub(crate) fn randomized() -> Self {
                Self::default()
            }
        }
    };
}

fn check_public_key(key: &[u8; PUBLIC_KEY_LENGTH]) -> Result<(), InvalidPublicKeyError> {
    if key.iter().all(|b| *b == 0) {
        return Err(InvalidPublicKeyError::PublicKeyIsZero);
    }

    // Multiples of the large safe prime other than the prime itself are
    // unrepresentable in 256 bytes, so the mod check reduces to an equality
    // check. See the test `double_large_safe_prime_is_unrepresentable`.
    if key == &LARGE_SAFE_PRIME_BIG_ENDIAN {
        return Err(InvalidPublicKeyError::PublicKeyModLargeSafePrimeIsZero);
    }

    Ok(())
}

macro_rules! key_check_not_zero_initialization {
    ($name: ident; $size: expr) => {
        impl $name {
            /// Creates the struct from big endian bytes.
            ///
            /// Values are stored internally as big endian so no reversal occurs.
            ///
            /// # Errors
            ///
            /// Will error if the public key is invalid. See [`PublicKey`] for specifics.
            pub fn from_be_bytes(key: &[u8; $size]) -> Result<Self, InvalidPublicKeyError> {
                match check_public_key(key) {
                    Ok(_) => Ok(Self { key: *key }),
                    Err(e) => Err(e),
                }
            }

            /// Creates the struct from a big endian hex string.
            ///
            /// Values narrower than [the large safe prime width](crate::LARGE_SAFE_PRIME_LENGTH)
            /// are zero extended.
            ///
            /// # Errors
            ///
            /// [`ParseError::InvalidHex`] for malformed hex,
            /// [`ParseError::InvalidLength`] for values wider than the prime,
            /// and [`ParseError::InvalidValue`] if the decoded key is invalid.
            /// See [`PublicKey`] for specifics.
            pub fn from_be_hex_str(s: &str) -> Result<Self, ParseError> {
                let value = hex::decode(s)?;

                if value.len() > $size {
                    return Err(ParseError::InvalidLength {
                        maximum: $size,
                        got: value.len(),
                    });
                }

                let mut key = [0_u8; $size];
                key[$size - value.len()..].copy_from_slice(&value);

                Ok(Self::from_be_bytes(&key)?)
            }

            pub(crate) fn try_from_bigint(b: bigint::Integer) -> Result<Self, InvalidPublicKeyError> {
                let b = b.to_bytes_be();

                let mut key = [0_u8; $size];
                key[$size - b.len()..].copy_from_slice(&b);

                Self::from_be_bytes(&key)
            }
        }
    };
}

macro_rules! key_no_checks_initialization {
    ($name: ident; $size: expr) => {
        impl $name {
            #[allow(dead_code)]
            pub(crate) const fn from_be_bytes(key: [u8; $size]) -> Self {
                Self { key }
            }

            /// Creates the struct from a big endian hex string.
            ///
            /// Values narrower than the field are zero extended.
            ///
            /// # Errors
            ///
            /// [`ParseError::InvalidHex`] for malformed hex and
            /// [`ParseError::InvalidLength`] for values wider than the field.
            #[allow(dead_code)]
            pub fn from_be_hex_str(s: &str) -> Result<Self, ParseError> {
                let value = hex::decode(s)?;

                if value.len() > $size {
                    return Err(ParseError::InvalidLength {
                        maximum: $size,
                        got: value.len(),
                    });
                }

                let mut key = [0_u8; $size];
                key[$size - value.len()..].copy_from_slice(&value);

                Ok(Self { key })
            }
        }

        impl From<bigint::Integer> for $name {
            fn from(b: bigint::Integer) -> Self {
                let b = b.to_bytes_be();

                let mut key = [0_u8; $size];
                key[$size - b.len()..].copy_from_slice(&b);

                Self { key }
            }
        }
    };
}

macro_rules! key_wrapper {
    ($name: ident; $size: expr) => {
        /// Fixed width wrapper around a protocol value.
        ///
        /// This is used instead of a raw array in order to move validation and
        /// byte order handling out of the proof functions in order to increase
        /// readability.
        ///
        /// The array is always zero padded to the full field width, so hashing
        /// the array directly gives the padded hash input both peers agree on.
        #[derive(Debug, Clone)]
        pub struct $name {
            key: [u8; $size],
        }

        impl $name {
            /// Returns the value as big endian bytes.
            ///
            /// The bytes are stored internally as big endian, so this causes no reversal.
            pub const fn as_be(&self) -> &[u8; $size] {
                &self.key
            }

            /// Returns the value as a lowercase big endian hex string, zero
            /// padded to the full field width.
            #[allow(dead_code)]
            pub fn to_be_hex_string(&self) -> String {
                hex::encode(&self.key)
            }
        }

        impl Eq for $name {}
        // Comparison of received and calculated proof values must not leak
        // how many leading bytes matched.
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.key.ct_eq(&other.key).into()
            }
        }
    };
}

/// The salt is always 32 bytes.
///
/// It is generated freshly for every registration, sent to the client during
/// the challenge and used with leading zeros in the `x` calculation.
#[doc(alias = "s")]
#[doc(alias = "salt")]
pub const SALT_LENGTH: usize = 32;
key_wrapper!(Salt; SALT_LENGTH);
key_new!(Salt; SALT_LENGTH);
key_no_checks_initialization!(Salt; SALT_LENGTH);

/// The private ephemeral values are the full width of
/// [the large safe prime](LARGE_SAFE_PRIME_LENGTH).
///
/// They are single use, never sent anywhere and only exist inside the
/// protocol engine and the serialized challenge state.
#[doc(alias = "a")]
#[doc(alias = "b")]
pub const PRIVATE_KEY_LENGTH: usize = LARGE_SAFE_PRIME_LENGTH;
key_wrapper!(PrivateKey; PRIVATE_KEY_LENGTH);
key_new!(PrivateKey; PRIVATE_KEY_LENGTH);
key_bigint!(PrivateKey);
key_no_checks_initialization!(PrivateKey; PRIVATE_KEY_LENGTH);

/// Length in bytes for both client and server public key.
///
/// Public keys are generated modulo [the large safe prime](LARGE_SAFE_PRIME_LENGTH)
/// and are therefore the same width.
#[doc(alias = "A")]
#[doc(alias = "B")]
pub const PUBLIC_KEY_LENGTH: usize = LARGE_SAFE_PRIME_LENGTH;
key_wrapper!(PublicKey; PUBLIC_KEY_LENGTH);
key_bigint!(PublicKey);
key_check_not_zero_initialization!(PublicKey; PUBLIC_KEY_LENGTH);

/// A SHA-256 hash is always 32 bytes (256 bits) as specified in [RFC6234](https://tools.ietf.org/html/rfc6234).
pub const SHA256_HASH_LENGTH: usize = 32;
key_wrapper!(Sha256Hash; SHA256_HASH_LENGTH);
key_bigint!(Sha256Hash);
key_no_checks_initialization!(Sha256Hash; SHA256_HASH_LENGTH);

impl Sha256Hash {
    pub(crate) fn is_zero(&self) -> bool {
        self.key.iter().all(|b| *b == 0)
    }
}

/// Password verifier size in bytes.
///
/// Is always the same size as the [large safe prime](LARGE_SAFE_PRIME_LENGTH)
/// because the verifier is generated through modulo of the large safe prime.
#[doc(alias = "v")]
pub const PASSWORD_VERIFIER_LENGTH: usize = LARGE_SAFE_PRIME_LENGTH;
key_wrapper!(Verifier; PASSWORD_VERIFIER_LENGTH);
key_bigint!(Verifier);
key_no_checks_initialization!(Verifier; PASSWORD_VERIFIER_LENGTH);

/// Length of a proof in bytes.
///
/// Is always 32 bytes because proofs are SHA-256 hashes which have a fixed
/// output size.
#[doc(alias = "M1")]
#[doc(alias = "M2")]
#[doc(alias = "M")]
pub const PROOF_LENGTH: usize = SHA256_HASH_LENGTH;
key_wrapper!(Proof; PROOF_LENGTH);
key_no_checks_initialization!(Proof; PROOF_LENGTH);

/// The raw shared secret is a group element and therefore the width of
/// [the large safe prime](LARGE_SAFE_PRIME_LENGTH).
///
/// It never leaves the process. Both sides hash it into the
/// [session key](SESSION_KEY_LENGTH).
#[doc(alias = "S")]
pub const S_LENGTH: usize = LARGE_SAFE_PRIME_LENGTH;
key_wrapper!(SKey; S_LENGTH);
key_no_checks_initialization!(SKey; S_LENGTH);

/// Size of the session key in bytes.
///
/// Always 32 bytes since it is the SHA-256 hash of the padded shared secret.
#[doc(alias = "K")]
pub const SESSION_KEY_LENGTH: usize = SHA256_HASH_LENGTH;
key_wrapper!(SessionKey; SESSION_KEY_LENGTH);
key_no_checks_initialization!(SessionKey; SESSION_KEY_LENGTH);
