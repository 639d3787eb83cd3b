//! Contains all functionality related to the client part.
//!
//! This mirrors the [`server`](crate::server) module so that the crate can
//! authenticate against itself in tests, and so that Rust clients of the same
//! deployment do not need to reimplement the protocol mathematics.
//!
//! The [Typestate](https://yoric.github.io/post/rust-typestate/) pattern is
//! used in order to prevent incorrect use:
//!
//! ```text
//! SrpClientUser -> SrpClientChallenge -> SrpClientSession
//! ```
//!
//! * An [`SrpClientUser`] is created from the username and transformed
//! password,
//! * receiving the salt and server public key from the challenge converts it
//! into an [`SrpClientChallenge`] carrying the client public key and proof,
//! * verifying the server proof from the login response converts it into an
//! [`SrpClientSession`] holding the shared session key.
//!
//! All arrays are **big endian**.

use crate::error::{MatchProofsError, SrpProtocolError};
use crate::key::{PrivateKey, Proof, PublicKey, Salt, SessionKey};
use crate::srp_internal;
use crate::srp_internal_client;
use crate::username::Username;

/// Starting point of the client. Contains the username and transformed
/// password.
///
/// `password_hash` is the output of
/// [`transform_password`](crate::password::transform_password); the client
/// keeps or re-derives it, the raw password is not held here.
#[derive(Debug, Clone)]
pub struct SrpClientUser {
    username: Username,
    password_hash: String,
}

impl SrpClientUser {
    /// Creates a new [`SrpClientUser`] from the username and transformed
    /// password.
    #[must_use]
    pub fn new(username: Username, password_hash: impl Into<String>) -> Self {
        Self {
            username,
            password_hash: password_hash.into(),
        }
    }

    /// Processes the challenge response, consuming the [`SrpClientUser`].
    ///
    /// The salt and server public key are received from the server's
    /// challenge response.
    ///
    /// # Errors
    ///
    /// [`SrpProtocolError::ScramblingParameterZero`] if `H(A | B)` hashes to
    /// zero. The degenerate server public key values are already rejected by
    /// the [`PublicKey`] type.
    pub fn into_challenge(
        self,
        salt: Salt,
        server_public_key: PublicKey,
    ) -> Result<SrpClientChallenge, SrpProtocolError> {
        let x = srp_internal::calculate_x(&self.username, &self.password_hash, &salt);

        let (client_private_key, client_public_key) = loop {
            let client_private_key = PrivateKey::randomized();
            if let Ok(client_public_key) =
                srp_internal_client::calculate_client_public_key(&client_private_key)
            {
                break (client_private_key, client_public_key);
            }
        };

        let u = srp_internal::calculate_u(&client_public_key, &server_public_key);
        if u.is_zero() {
            return Err(SrpProtocolError::ScramblingParameterZero);
        }

        #[allow(non_snake_case)]
        let S = srp_internal_client::calculate_client_S(
            &server_public_key,
            &x,
            &client_private_key,
            &u,
        );
        let session_key = srp_internal::calculate_session_key(&S);

        let client_proof = srp_internal::calculate_client_proof(
            &client_public_key,
            &server_public_key,
            &session_key,
        );

        Ok(SrpClientChallenge {
            client_public_key,
            client_proof,
            session_key,
        })
    }
}

/// Contains the client public key and proof to send to the server, and
/// verifies the server proof from the login response.
#[doc(alias = "A")]
#[doc(alias = "M1")]
#[derive(Debug, Clone)]
pub struct SrpClientChallenge {
    client_public_key: PublicKey,
    client_proof: Proof,
    session_key: SessionKey,
}

impl SrpClientChallenge {
    /// Client public key to send to the server together with the proof.
    ///
    /// Called `A` in [RFC2945](https://tools.ietf.org/html/rfc2945) and most
    /// other literature. It is sometimes incorrectly called `a`, but that
    /// refers to the client private key, which is never sent anywhere.
    #[doc(alias = "A")]
    #[must_use]
    pub const fn client_public_key(&self) -> &PublicKey {
        &self.client_public_key
    }

    /// Client proof of the session key, called `M1` in most literature.
    #[doc(alias = "M1")]
    #[must_use]
    pub const fn client_proof(&self) -> &Proof {
        &self.client_proof
    }

    /// Verifies that the server proof from the login response matches the
    /// locally computed session key, consuming the [`SrpClientChallenge`].
    ///
    /// The comparison runs in constant time.
    ///
    /// # Errors
    ///
    /// [`SrpProtocolError::ProofsDoNotMatch`] if the server did not prove
    /// knowledge of the same session key.
    #[doc(alias = "M2")]
    pub fn verify_server_proof(
        self,
        server_proof: Proof,
    ) -> Result<SrpClientSession, SrpProtocolError> {
        let expected = srp_internal::calculate_server_proof(
            &self.client_public_key,
            &self.client_proof,
            &self.session_key,
        );

        if server_proof != expected {
            return Err(SrpProtocolError::ProofsDoNotMatch(MatchProofsError {}));
        }

        Ok(SrpClientSession {
            session_key: self.session_key,
        })
    }
}

/// Successfully authenticated client session.
///
/// Holds the session key shared with the server.
#[derive(Debug, Clone)]
pub struct SrpClientSession {
    session_key: SessionKey,
}

impl SrpClientSession {
    /// Called `K` in most literature. Identical to the server's session key.
    #[doc(alias = "K")]
    #[must_use]
    pub const fn session_key(&self) -> &SessionKey {
        &self.session_key
    }
}

#[cfg(test)]
mod test {
    use crate::client::SrpClientUser;
    use crate::key::Proof;
    use crate::server::SrpVerifier;
    use crate::username::Username;

    const PASSWORD_HASH: &str = "$scrypt$ln=15,r=8,p=1$YWJjZGVmZ2g$bm9wcXJzdHV2";

    #[test]
    fn authenticate_with_self() {
        let client = SrpClientUser::new(Username::new("alice").unwrap(), PASSWORD_HASH);

        let verifier = SrpVerifier::from_username_and_password_hash(
            Username::new("alice").unwrap(),
            PASSWORD_HASH,
        );
        let challenge = verifier.into_challenge();

        let client = client
            .into_challenge(
                challenge.salt().clone(),
                challenge.server_public_key().clone(),
            )
            .unwrap();

        let (session, server_proof) = challenge
            .verify(
                client.client_public_key().clone(),
                client.client_proof().clone(),
            )
            .unwrap();

        let client = client.verify_server_proof(server_proof).unwrap();

        assert_eq!(client.session_key(), session.session_key());
    }

    #[test]
    fn wrong_password_hash_is_rejected() {
        let client = SrpClientUser::new(Username::new("alice").unwrap(), "wrong-hash");

        let verifier = SrpVerifier::from_username_and_password_hash(
            Username::new("alice").unwrap(),
            PASSWORD_HASH,
        );
        let challenge = verifier.into_challenge();

        let client = client
            .into_challenge(
                challenge.salt().clone(),
                challenge.server_public_key().clone(),
            )
            .unwrap();

        assert!(challenge
            .verify(
                client.client_public_key().clone(),
                client.client_proof().clone(),
            )
            .is_err());
    }

    #[test]
    fn forged_server_proof_is_rejected() {
        let client = SrpClientUser::new(Username::new("alice").unwrap(), PASSWORD_HASH);

        let verifier = SrpVerifier::from_username_and_password_hash(
            Username::new("alice").unwrap(),
            PASSWORD_HASH,
        );
        let challenge = verifier.into_challenge();

        let client = client
            .into_challenge(
                challenge.salt().clone(),
                challenge.server_public_key().clone(),
            )
            .unwrap();

        let forged = Proof::from_be_hex_str(
            "00000000000000000000000000000000000000000000000000000000000000FF",
        )
        .unwrap();

        assert!(client.verify_server_proof(forged).is_err());
    }
}
