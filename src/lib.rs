//! An implementation of SRP6a password authentication over the RFC 5054
//! 2048-bit group, as used for login against servers speaking the same
//! `H(A | B | K)` proof convention.
//!
//! A server can verify that a client knows a password without the password,
//! or anything it could be recovered from, ever crossing the network or being
//! stored. Registration stores a salt and verifier, a challenge hands out a
//! server ephemeral value, and a login checks the client proof against it.
//! After a successful login both sides hold the same session key without it
//! having been transmitted.
//!
//! This crate does not deal with the transport that carries the three calls.
//! All wire-shaped values convert to and from big endian hex strings; how
//! they travel is up to the caller.
//!
//! # Usage
//!
//! The crate is split into:
//! * An [`auth`] module containing the [`Authenticator`](auth::Authenticator)
//! front end that wires the protocol to the stores. Most servers only need
//! this.
//! * A [`server`] module containing the protocol state machine for the
//! server.
//! * A [`client`] module containing the protocol state machine for the
//! client.
//! * A [`store`] module with the credential store and session cache
//! interfaces and in-memory implementations of both.
//! * A [`password`] module with the adaptive password transform applied
//! before registration.
//! * A [`username`] module used by all modules to correctly handle
//! usernames.
//! * An [`error`] module for errors that are shared by all modules.
//! * An [`srp_internal`] module exposing the raw calculations for testing
//! and verification against other implementations.
//!
//! ```
//! use srp_auth::auth::Authenticator;
//! use srp_auth::client::SrpClientUser;
//! use srp_auth::server::SrpVerifier;
//! use srp_auth::store::{MemoryCredentialStore, MemorySessionCache};
//! use srp_auth::username::Username;
//!
//! # fn main() -> Result<(), srp_auth::error::AuthError> {
//! let auth = Authenticator::new(MemoryCredentialStore::new(), MemorySessionCache::new());
//!
//! // Sign up: transform the password, derive salt and verifier, store them.
//! // A real deployment gets this from srp_auth::password::transform_password,
//! // which is deliberately slow; a fixed hash keeps the doc test fast.
//! let password_hash = "$scrypt$ln=15,r=8,p=1$YWJjZGVmZ2g$bm9wcXJzdHV2";
//! let verifier = SrpVerifier::from_username_and_password_hash(
//!     Username::new("alice").expect("static username"),
//!     password_hash,
//! );
//! auth.register_user(
//!     "alice",
//!     verifier.salt().clone(),
//!     verifier.password_verifier().clone(),
//! )?;
//!
//! // First round trip: the client asks for a challenge.
//! let challenge = auth.challenge("alice")?;
//!
//! // Client side: compute the public key and proof from salt and B.
//! let client = SrpClientUser::new(
//!     Username::new("alice").expect("static username"),
//!     password_hash,
//! )
//! .into_challenge(challenge.salt().clone(), challenge.server_public_key().clone())
//! .expect("scrambling parameter is nonzero");
//!
//! // Second round trip: the client sends A and M1.
//! let login = auth.login_user(
//!     "alice",
//!     &client.client_public_key().to_be_hex_string(),
//!     &client.client_proof().to_be_hex_string(),
//! )?;
//!
//! // The client verifies M2 and both sides now share a session key.
//! let client = client
//!     .verify_server_proof(login.server_proof().clone())
//!     .expect("server knows the session key");
//! assert_eq!(client.session_key(), login.session_key());
//! # Ok(())
//! # }
//! ```
//!
//! # Group parameters
//!
//! The [large safe prime](LARGE_SAFE_PRIME_BIG_ENDIAN), the
//! [generator](GENERATOR) and the derived
//! [multiplier](MULTIPLIER_BIG_ENDIAN) are process-wide constants. They are
//! not secrets, but every client and server that interoperate must use the
//! same values and the same zero padding when hashing, see
//! [`srp_internal`].

#![doc(html_root_url = "https://docs.rs/srp_auth/0.1.0")]
#![forbid(unsafe_code)]
#![warn(
    clippy::perf,
    clippy::correctness,
    clippy::style,
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::unseparated_literal_suffix,
    missing_docs
)]

pub use key::PrivateKey;
pub use key::Proof;
pub use key::PublicKey;
pub use key::SKey;
pub use key::Salt;
pub use key::SessionKey;
pub use key::Sha256Hash;
pub use key::Verifier;
pub use key::PASSWORD_VERIFIER_LENGTH;
pub use key::PRIVATE_KEY_LENGTH;
pub use key::PROOF_LENGTH;
pub use key::PUBLIC_KEY_LENGTH;
pub use key::SALT_LENGTH;
pub use key::SESSION_KEY_LENGTH;
pub use key::SHA256_HASH_LENGTH;
pub use key::S_LENGTH;
pub use primes::GENERATOR;
pub use primes::LARGE_SAFE_PRIME_BIG_ENDIAN;
pub use primes::LARGE_SAFE_PRIME_LENGTH;
pub use primes::MULTIPLIER_BIG_ENDIAN;

pub mod auth;
pub(crate) mod bigint;
pub mod client;
pub mod error;
mod key;
pub mod password;
pub(crate) mod primes;
pub mod server;
pub mod srp_internal;
pub(crate) mod srp_internal_client;
pub mod store;
pub mod username;
