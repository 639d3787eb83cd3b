//! Contains all functionality related to the server part,
//! including the generation of values for the credential store.
//!
//! All arrays are **big endian**.
//!
//! # Generating credential store values
//!
//! When signing up a new user you want to take their username and transformed
//! password and convert them into the values stored in your credential store.
//! This is done with the [`SrpVerifier::from_username_and_password_hash`]
//! function. This allows you to get the username, password verifier and salt
//! values. The password goes through
//! [`transform_password`](crate::password::transform_password) first; the raw
//! password never reaches this module.
//!
//! # Authenticating on the server
//!
//! The [Typestate](https://yoric.github.io/post/rust-typestate/) pattern is
//! used in order to prevent incorrect use.
//! This means that whenever the next step of computation takes place, you call
//! a function taking `self`, consuming the old object, and returning the new
//! object.
//!
//! * First an [`SrpVerifier`] is created from the credential store values,
//! * Then [`SrpVerifier::into_challenge`] is called to convert it into an
//! [`SrpChallenge`], generating the ephemeral key pair,
//! * Finally [`SrpChallenge::verify`] is called with the client public key
//! and client proof to convert it into an [`SrpSession`] and a server proof.
//!
//! The state machine goes like this:
//! ```text
//! SrpVerifier -> SrpChallenge -> SrpSession
//!                     +              +
//!              ChallengeState   server_proof
//! ```
//!
//! The two protocol steps happen in different network round trips, possibly
//! on different server instances. In between, the [`SrpChallenge`] is
//! serialized into a [`ChallengeState`] and parked in an ephemeral session
//! cache, keyed by username. [`SrpChallenge::verify`] consumes `self`, so a
//! deserialized challenge can only ever be driven through verification once.
//!
//! ```
//! use srp_auth::server::{SrpChallenge, SrpVerifier};
//! use srp_auth::username::Username;
//! use srp_auth::error::SrpProtocolError;
//!
//! fn server() -> Result<(), SrpProtocolError> {
//!     let username = Username::new("alice").expect("static username");
//!     // Gotten from the transform_password step during sign up.
//!     let password_hash = "$scrypt$ln=15,r=8,p=1$YWJjZGVmZ2g$bm9wcXJzdHV2";
//!
//!     let verifier = SrpVerifier::from_username_and_password_hash(username, password_hash);
//!
//!     // First round trip: send salt and B to the client, park the state.
//!     let challenge = verifier.into_challenge();
//!     let state = challenge.state();
//!     let json = state.to_json().expect("state serializes");
//!
//!     // Second round trip: load the state and verify the client proof.
//!     let state = srp_auth::server::ChallengeState::from_json(&json).expect("state deserializes");
//!     let challenge = SrpChallenge::from_state(state).expect("state was written by us");
//! #   let _ = challenge;
//!     Ok(())
//! }
//! # server().unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{InvalidPublicKeyError, MatchProofsError, ParseError, SrpProtocolError};
use crate::key::{PrivateKey, Proof, PublicKey, Salt, SessionKey, Verifier};
use crate::srp_internal;
use crate::username::Username;

/// Creates and contains the username, password verifier, and salt values.
/// First step of the server, next is [`SrpChallenge`].
///
/// These are values that should be stored in the credential store.
/// Do **NOT** store raw passwords or password hashes in the credential store.
///
/// The salt is a randomly generated [32 byte](crate::SALT_LENGTH) array used
/// as salt for the password verifier.
/// The verifier is derived from the username, the transformed password and
/// the salt, see
/// [`calculate_password_verifier`](crate::srp_internal::calculate_password_verifier).
/// The salt is sent over the network for the client to use.
/// The password verifier is used for generating the server public key, and
/// should never leave the server.
///
/// All byte arrays are **big endian**.
#[doc(alias = "v")]
#[doc(alias = "salt")]
#[derive(Debug, Clone)]
pub struct SrpVerifier {
    username: Username,
    password_verifier: Verifier,
    salt: Salt,
}

impl SrpVerifier {
    /// The validated username, see [`username`](crate::username) for details.
    ///
    /// Called `U` and `<username>` in [RFC2945](https://tools.ietf.org/html/rfc2945).
    #[doc(alias = "U")]
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_ref()
    }

    /// The password verifier. Should not be used except for when saving to
    /// the credential store.
    ///
    /// Called `v` and `<password verifier>` in [RFC2945](https://tools.ietf.org/html/rfc2945).
    /// Always [256 bytes](crate::PASSWORD_VERIFIER_LENGTH) in length since
    /// the value is generated through the remainder of a
    /// [256 byte value](crate::LARGE_SAFE_PRIME_LENGTH).
    #[doc(alias = "v")]
    #[must_use]
    pub const fn password_verifier(&self) -> &Verifier {
        &self.password_verifier
    }

    /// Salt value used for calculating the verifier. Is sent to the client.
    ///
    /// Called `s`, `<salt from passwd file>` and `<salt>` in
    /// [RFC2945](https://tools.ietf.org/html/rfc2945).
    #[doc(alias = "s")]
    #[must_use]
    pub const fn salt(&self) -> &Salt {
        &self.salt
    }

    /// Creates a verifier with a freshly randomized salt.
    ///
    /// Only use this when registering a user or changing their password.
    /// `password_hash` is the output of
    /// [`transform_password`](crate::password::transform_password), never the
    /// raw password.
    #[must_use]
    pub fn from_username_and_password_hash(username: Username, password_hash: &str) -> Self {
        let salt = Salt::randomized();

        Self::with_specific_salt(username, password_hash, &salt)
    }

    /// Recreates the verifier from previously stored values.
    #[must_use]
    pub const fn from_database_values(
        username: Username,
        password_verifier: Verifier,
        salt: Salt,
    ) -> Self {
        Self {
            username,
            password_verifier,
            salt,
        }
    }

    /// Converts to an [`SrpChallenge`], consuming the [`SrpVerifier`].
    ///
    /// Generates the server private ephemeral key from OS randomness. In the
    /// astronomically unlikely case that the resulting public key is zero
    /// modulo the large safe prime, the private key is resampled, since a
    /// degenerate public value would leak that no entropy went into the
    /// exchange.
    #[doc(alias = "B")]
    #[doc(alias = "b")]
    #[must_use]
    pub fn into_challenge(self) -> SrpChallenge {
        let mut verifier = self;
        loop {
            let server_private_key = PrivateKey::randomized();

            match verifier.with_specific_private_key(server_private_key) {
                Ok(challenge) => return challenge,
                Err((v, _)) => {
                    tracing::warn!("server public key was degenerate, resampling private key");
                    verifier = v;
                }
            }
        }
    }

    pub(crate) fn with_specific_salt(
        username: Username,
        password_hash: &str,
        salt: &Salt,
    ) -> Self {
        let password_verifier =
            srp_internal::calculate_password_verifier(&username, password_hash, salt);

        Self::from_database_values(
            username,
            Verifier::from_be_bytes(password_verifier),
            salt.clone(),
        )
    }

    pub(crate) fn with_specific_private_key(
        self,
        server_private_key: PrivateKey,
    ) -> Result<SrpChallenge, (Self, InvalidPublicKeyError)> {
        let server_public_key = match srp_internal::calculate_server_public_key(
            &self.password_verifier,
            &server_private_key,
        ) {
            Ok(k) => k,
            Err(e) => return Err((self, e)),
        };

        Ok(SrpChallenge {
            username: self.username,
            salt: self.salt,
            password_verifier: self.password_verifier,
            server_private_key,
            server_public_key,
        })
    }
}

/// Contains the server ephemeral key pair and salt. Second step of the
/// server, next is [`SrpSession`].
///
/// This struct is created from the [`SrpVerifier::into_challenge`] method or
/// restored from a parked [`ChallengeState`].
///
/// The client also requires the
/// [large safe prime](crate::LARGE_SAFE_PRIME_BIG_ENDIAN) and the
/// [generator](crate::GENERATOR). These are static values that never change
/// and therefore they have their own const variables.
///
/// The private ephemeral key is single use. It exists only inside this
/// struct and its serialized [`ChallengeState`] and is destroyed together
/// with them when [`SrpChallenge::verify`] consumes `self`.
///
/// All byte arrays are **big endian**.
#[doc(alias = "B")]
#[doc(alias = "b")]
#[derive(Debug, Clone)]
pub struct SrpChallenge {
    username: Username,
    salt: Salt,
    password_verifier: Verifier,

    server_private_key: PrivateKey,

    server_public_key: PublicKey,
}

impl SrpChallenge {
    /// Server public key used in calculations by both the server and client.
    /// Is sent to the client.
    ///
    /// Called `B` in [RFC2945](https://tools.ietf.org/html/rfc2945).
    #[doc(alias = "B")]
    #[must_use]
    pub const fn server_public_key(&self) -> &PublicKey {
        &self.server_public_key
    }

    /// Salt value used for calculating the verifier. Is sent to the client.
    #[doc(alias = "s")]
    #[must_use]
    pub const fn salt(&self) -> &Salt {
        &self.salt
    }

    /// The username this challenge was created for.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_ref()
    }

    /// Verifies the client proof and converts to an [`SrpSession`] and server
    /// proof, consuming the [`SrpChallenge`].
    ///
    /// The server proof must be sent to the client in order to prove that the
    /// server knows the same session key as the client. The server proof is
    /// called `M2` in most literature, the client proof `M1`.
    ///
    /// The [`PublicKey`] is used instead of raw bytes in order to break the
    /// validation of the public key and the calculation of the proof into
    /// separate steps. An invalid [`PublicKey`] is more likely to be the
    /// result of the client deliberately sending known invalid data, while a
    /// proof mismatch usually just means that the entered password is
    /// incorrect.
    ///
    /// Proofs are compared in constant time, and the error carries no
    /// information about which internal check failed.
    ///
    /// # Errors
    ///
    /// [`SrpProtocolError::ProofsDoNotMatch`] if the `client_proof` does not
    /// match the internally calculated proof, and
    /// [`SrpProtocolError::ScramblingParameterZero`] if `H(A | B)` hashes to
    /// zero.
    #[doc(alias = "M1")]
    #[doc(alias = "M2")]
    pub fn verify(
        self,
        client_public_key: PublicKey,
        client_proof: Proof,
    ) -> Result<(SrpSession, Proof), SrpProtocolError> {
        let u = srp_internal::calculate_u(&client_public_key, &self.server_public_key);
        if u.is_zero() {
            return Err(SrpProtocolError::ScramblingParameterZero);
        }

        #[allow(non_snake_case)]
        let S = srp_internal::calculate_S(
            &client_public_key,
            &self.password_verifier,
            &u,
            &self.server_private_key,
        );

        let session_key = srp_internal::calculate_session_key(&S);

        let server_calculated_proof = srp_internal::calculate_client_proof(
            &client_public_key,
            &self.server_public_key,
            &session_key,
        );

        if client_proof != server_calculated_proof {
            return Err(SrpProtocolError::ProofsDoNotMatch(MatchProofsError {}));
        }

        let server_proof = srp_internal::calculate_server_proof(
            &client_public_key,
            &server_calculated_proof,
            &session_key,
        );

        Ok((
            SrpSession {
                username: self.username,
                session_key,
            },
            server_proof,
        ))
    }

    /// The serializable private state of this challenge.
    ///
    /// This is what gets parked in the ephemeral session cache between the
    /// two round trips. It contains the private ephemeral key and must never
    /// leave the server.
    #[must_use]
    pub fn state(&self) -> ChallengeState {
        ChallengeState {
            username: self.username.as_ref().to_string(),
            salt: self.salt.to_be_hex_string(),
            verifier: self.password_verifier.to_be_hex_string(),
            server_private_key: self.server_private_key.to_be_hex_string(),
            server_public_key: self.server_public_key.to_be_hex_string(),
        }
    }

    /// Restores a challenge from parked state.
    ///
    /// # Errors
    ///
    /// [`ParseError`] if any field does not decode to a valid value. This
    /// indicates the cache returned something this crate did not write.
    pub fn from_state(state: ChallengeState) -> Result<Self, ParseError> {
        let username = Username::new(state.username).map_err(|_| ParseError::InvalidValue)?;
        let salt = Salt::from_be_hex_str(&state.salt)?;
        let password_verifier = Verifier::from_be_hex_str(&state.verifier)?;
        let server_private_key = PrivateKey::from_be_hex_str(&state.server_private_key)?;
        let server_public_key = PublicKey::from_be_hex_str(&state.server_public_key)?;

        Ok(Self {
            username,
            salt,
            password_verifier,
            server_private_key,
            server_public_key,
        })
    }
}

/// Serialized private state of an [`SrpChallenge`].
///
/// All values are big endian hex strings, zero padded to their full field
/// width. The JSON form is what the ephemeral session cache stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeState {
    username: String,
    salt: String,
    verifier: String,
    server_private_key: String,
    server_public_key: String,
}

impl ChallengeState {
    /// Serializes to the JSON form stored in the session cache.
    ///
    /// # Errors
    ///
    /// Forwards the underlying serializer error.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes from the JSON form stored in the session cache.
    ///
    /// # Errors
    ///
    /// Forwards the underlying deserializer error.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// The final step of authentication. Contains the session key.
///
/// If this struct is constructed, the client is correctly authenticated and
/// the session key can be used for whatever the surrounding application
/// needs. The same key has been computed by the client without it ever having
/// been transmitted.
///
/// Created from [`SrpChallenge::verify`].
#[derive(Debug, Clone)]
pub struct SrpSession {
    username: Username,
    session_key: SessionKey,
}

impl SrpSession {
    /// The username this session belongs to.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_ref()
    }

    /// Called `K` in most literature.
    ///
    /// After successful authentication both client and server have the exact
    /// same session key without onlookers being able to figure it out.
    ///
    /// The session key is always
    /// [32 bytes](crate::SESSION_KEY_LENGTH) in length because it is the
    /// SHA-256 hash of the padded shared secret.
    #[doc(alias = "K")]
    #[must_use]
    pub const fn session_key(&self) -> &SessionKey {
        &self.session_key
    }
}
