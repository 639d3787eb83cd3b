//! The orchestration layer wiring the protocol engine to the stores.
//!
//! An [`Authenticator`] owns a durable [`CredentialStore`] and an ephemeral
//! [`SessionCache`], both injected at construction, and exposes the three
//! public operations of the system:
//!
//! * [`register_user`](Authenticator::register_user) writes a credential
//! record,
//! * [`challenge`](Authenticator::challenge) reads the record, runs the
//! first protocol step and parks the private state in the cache,
//! * [`login_user`](Authenticator::login_user) consumes the parked state,
//! runs the second protocol step and returns the server proof.
//!
//! No operation partially mutates state on failure: `challenge` writes the
//! cache only after all computation has succeeded and never touches the
//! credential store, `login_user`'s only write is the consuming take of the
//! cache entry.
//!
//! Failures are classified into [`AuthError`], which maps onto HTTP-style
//! status classes. Proof mismatches, invalid public values and degenerate
//! protocol values all render the same external message so that callers
//! cannot be used as an oracle.

use std::time::Duration;

use crate::error::{AuthError, ParseError, SrpProtocolError, StoreError};
use crate::key::{Proof, PublicKey, Salt, SessionKey, Verifier};
use crate::server::{ChallengeState, SrpChallenge, SrpVerifier};
use crate::store::{CredentialRecord, CredentialStore, SessionCache};
use crate::username::Username;

/// How long a parked challenge stays claimable by default.
///
/// One client round trip is seconds, not minutes. A short TTL bounds both
/// the memory held by abandoned challenges and the window in which a stale
/// `B` value could be replayed.
pub const DEFAULT_CHALLENGE_TTL: Duration = Duration::from_secs(30);

/// Salt and server public key returned to the client by
/// [`Authenticator::challenge`].
#[derive(Debug, Clone)]
pub struct Challenge {
    salt: Salt,
    server_public_key: PublicKey,
}

impl Challenge {
    /// The salt stored at registration, needed by the client to recompute `x`.
    #[must_use]
    pub const fn salt(&self) -> &Salt {
        &self.salt
    }

    /// The server public ephemeral value `B`.
    #[doc(alias = "B")]
    #[must_use]
    pub const fn server_public_key(&self) -> &PublicKey {
        &self.server_public_key
    }
}

/// Successful login result returned by [`Authenticator::login_user`].
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    server_proof: Proof,
    session_key: SessionKey,
}

impl LoginSuccess {
    /// The server proof `M2`, to be returned to the client. Render it with
    /// [`Proof::to_be_hex_string`](crate::Proof::to_be_hex_string) for
    /// transport.
    #[doc(alias = "M2")]
    #[must_use]
    pub const fn server_proof(&self) -> &Proof {
        &self.server_proof
    }

    /// The shared session key. Never send this anywhere; the client has
    /// computed the identical value on its own.
    #[doc(alias = "K")]
    #[must_use]
    pub const fn session_key(&self) -> &SessionKey {
        &self.session_key
    }
}

/// The three-operation authentication front end.
///
/// Stateless between calls apart from the two injected stores, so a single
/// instance can be shared across threads, and separate instances on separate
/// hosts interoperate as long as they share the stores.
#[derive(Debug)]
pub struct Authenticator<S, C> {
    store: S,
    cache: C,
    challenge_ttl: Duration,
}

impl<S: CredentialStore, C: SessionCache> Authenticator<S, C> {
    /// Creates an authenticator over the given stores with the
    /// [default challenge TTL](DEFAULT_CHALLENGE_TTL).
    pub fn new(store: S, cache: C) -> Self {
        Self {
            store,
            cache,
            challenge_ttl: DEFAULT_CHALLENGE_TTL,
        }
    }

    /// Overrides how long a parked challenge stays claimable.
    #[must_use]
    pub fn with_challenge_ttl(mut self, challenge_ttl: Duration) -> Self {
        self.challenge_ttl = challenge_ttl;
        self
    }

    /// Stores the credentials for a user.
    ///
    /// The salt and verifier are produced by
    /// [`SrpVerifier::from_username_and_password_hash`] on whichever side
    /// performs registration; the password itself never reaches this call.
    ///
    /// Registering an existing username silently overwrites the old record,
    /// which is how password changes are performed.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidUsername`] for a malformed username and
    /// [`AuthError::Store`] if the credential store write fails.
    pub fn register_user(
        &self,
        username: &str,
        salt: Salt,
        verifier: Verifier,
    ) -> Result<CredentialRecord, AuthError> {
        let username = Username::new(username)?;

        let record = CredentialRecord { salt, verifier };
        self.store.put(username.as_ref(), record.clone())?;

        tracing::info!(username = %username, "registered user");

        Ok(record)
    }

    /// Starts a login attempt, returning the salt and server public key.
    ///
    /// The private half of the ephemeral key pair is parked in the session
    /// cache for [`challenge_ttl`](Authenticator::with_challenge_ttl).
    /// Issuing another challenge for the same username before the login
    /// arrives replaces the parked state, so only the most recent challenge
    /// can complete.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidUsername`] for a malformed username,
    /// [`AuthError::UserNotFound`] for an unregistered one and
    /// [`AuthError::Store`] if a store read or cache write fails.
    pub fn challenge(&self, username: &str) -> Result<Challenge, AuthError> {
        let username = Username::new(username)?;

        let record = match self.store.get(username.as_ref())? {
            Some(record) => record,
            None => {
                tracing::info!(username = %username, "challenge for unknown user");
                return Err(AuthError::UserNotFound);
            }
        };

        let verifier = SrpVerifier::from_database_values(
            username.clone(),
            record.verifier,
            record.salt.clone(),
        );
        let challenge = verifier.into_challenge();

        let state = challenge
            .state()
            .to_json()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        self.cache
            .put(username.as_ref(), state, self.challenge_ttl)?;

        tracing::info!(username = %username, "issued challenge");

        Ok(Challenge {
            salt: record.salt,
            server_public_key: challenge.server_public_key().clone(),
        })
    }

    /// Completes a login attempt with the client public key `A` and client
    /// proof `M1`, both as big endian hex strings.
    ///
    /// The parked challenge state is consumed no matter how verification
    /// turns out, so a second call always requires a fresh
    /// [`challenge`](Authenticator::challenge).
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidUsername`] and [`AuthError::MalformedValue`] for
    /// inputs that do not decode, [`AuthError::SessionNotFound`] when no
    /// unexpired challenge is parked, [`AuthError::InvalidPublicValue`] for
    /// a degenerate `A`, [`AuthError::AuthenticationFailed`] for a proof
    /// mismatch and [`AuthError::Store`] for store failures.
    pub fn login_user(
        &self,
        username: &str,
        client_public_key: &str,
        client_proof: &str,
    ) -> Result<LoginSuccess, AuthError> {
        let username = Username::new(username)?;

        // Values of the wrong shape are input errors and leave the parked
        // challenge alone. A well formed but degenerate public key is only
        // rejected after the parked state has been consumed, so it burns the
        // session like any other failed verification attempt.
        let client_public_key = match PublicKey::from_be_hex_str(client_public_key) {
            Ok(key) => Ok(key),
            Err(ParseError::InvalidValue) => Err(AuthError::InvalidPublicValue),
            Err(e) => return Err(e.into()),
        };
        let client_proof = Proof::from_be_hex_str(client_proof)?;

        let state = match self.cache.take(username.as_ref())? {
            Some(state) => state,
            None => {
                tracing::debug!(username = %username, "login without pending challenge");
                return Err(AuthError::SessionNotFound);
            }
        };

        let state = ChallengeState::from_json(&state)
            .map_err(|e| StoreError::CorruptEntry(e.to_string()))?;
        let challenge = SrpChallenge::from_state(state)
            .map_err(|e| StoreError::CorruptEntry(e.to_string()))?;

        if challenge.username() != username.as_ref() {
            return Err(StoreError::CorruptEntry(
                "parked state belongs to a different username".to_string(),
            )
            .into());
        }

        let client_public_key = match client_public_key {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(username = %username, "rejected degenerate client public key");
                return Err(e);
            }
        };

        match challenge.verify(client_public_key, client_proof) {
            Ok((session, server_proof)) => {
                tracing::info!(username = %username, "login verified");
                Ok(LoginSuccess {
                    server_proof,
                    session_key: session.session_key().clone(),
                })
            }
            Err(SrpProtocolError::ProofsDoNotMatch(_)) => {
                tracing::warn!(username = %username, "client proof mismatch");
                Err(AuthError::AuthenticationFailed)
            }
            Err(SrpProtocolError::InvalidPublicKey(_)) => {
                tracing::warn!(username = %username, "rejected degenerate client public key");
                Err(AuthError::InvalidPublicValue)
            }
            Err(e @ SrpProtocolError::ScramblingParameterZero) => {
                tracing::warn!(username = %username, "degenerate scrambling parameter");
                Err(AuthError::ProtocolInvariant(e))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::auth::Authenticator;
    use crate::client::SrpClientUser;
    use crate::error::AuthError;
    use crate::server::SrpVerifier;
    use crate::store::{MemoryCredentialStore, MemorySessionCache};
    use crate::username::Username;
    use std::time::Duration;

    const PASSWORD_HASH: &str = "$scrypt$ln=15,r=8,p=1$YWJjZGVmZ2g$bm9wcXJzdHV2";

    fn authenticator() -> Authenticator<MemoryCredentialStore, MemorySessionCache> {
        Authenticator::new(MemoryCredentialStore::new(), MemorySessionCache::new())
    }

    fn register(auth: &Authenticator<MemoryCredentialStore, MemorySessionCache>, username: &str) {
        let v = SrpVerifier::from_username_and_password_hash(
            Username::new(username).unwrap(),
            PASSWORD_HASH,
        );
        auth.register_user(username, v.salt().clone(), v.password_verifier().clone())
            .unwrap();
    }

    fn login(
        auth: &Authenticator<MemoryCredentialStore, MemorySessionCache>,
        username: &str,
        password_hash: &str,
    ) -> Result<crate::auth::LoginSuccess, AuthError> {
        let challenge = auth.challenge(username).unwrap();
        let client = SrpClientUser::new(Username::new(username).unwrap(), password_hash)
            .into_challenge(
                challenge.salt().clone(),
                challenge.server_public_key().clone(),
            )
            .unwrap();

        auth.login_user(
            username,
            &client.client_public_key().to_be_hex_string(),
            &client.client_proof().to_be_hex_string(),
        )
    }

    #[test]
    fn round_trip() {
        let auth = authenticator();
        register(&auth, "alice");

        assert!(login(&auth, "alice", PASSWORD_HASH).is_ok());
    }

    #[test]
    fn wrong_password_hash_fails_closed() {
        let auth = authenticator();
        register(&auth, "alice");

        let result = login(&auth, "alice", "wrong-hash");
        assert!(matches!(result, Err(AuthError::AuthenticationFailed)));
    }

    #[test]
    fn challenge_for_unknown_user() {
        let auth = authenticator();

        let result = auth.challenge("nobody");
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[test]
    fn login_without_challenge() {
        let auth = authenticator();
        register(&auth, "alice");

        let result = auth.login_user("alice", "02", &"00".repeat(32));
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[test]
    fn session_is_single_use() {
        let auth = authenticator();
        register(&auth, "alice");

        let challenge = auth.challenge("alice").unwrap();
        let client = SrpClientUser::new(Username::new("alice").unwrap(), PASSWORD_HASH)
            .into_challenge(
                challenge.salt().clone(),
                challenge.server_public_key().clone(),
            )
            .unwrap();

        let a = client.client_public_key().to_be_hex_string();
        let m1 = client.client_proof().to_be_hex_string();

        assert!(auth.login_user("alice", &a, &m1).is_ok());

        // Correct proof, but the parked state is gone.
        let result = auth.login_user("alice", &a, &m1);
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[test]
    fn failed_login_also_consumes_the_session() {
        let auth = authenticator();
        register(&auth, "alice");

        let challenge = auth.challenge("alice").unwrap();
        let client = SrpClientUser::new(Username::new("alice").unwrap(), PASSWORD_HASH)
            .into_challenge(
                challenge.salt().clone(),
                challenge.server_public_key().clone(),
            )
            .unwrap();

        let a = client.client_public_key().to_be_hex_string();

        let result = auth.login_user("alice", &a, &"00".repeat(32));
        assert!(matches!(result, Err(AuthError::AuthenticationFailed)));

        // Not even the correct proof can reuse the burned state.
        let result = auth.login_user("alice", &a, &client.client_proof().to_be_hex_string());
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[test]
    fn expired_challenge_is_not_claimable() {
        let auth = authenticator().with_challenge_ttl(Duration::from_secs(0));
        register(&auth, "alice");

        let challenge = auth.challenge("alice").unwrap();
        let client = SrpClientUser::new(Username::new("alice").unwrap(), PASSWORD_HASH)
            .into_challenge(
                challenge.salt().clone(),
                challenge.server_public_key().clone(),
            )
            .unwrap();

        std::thread::sleep(Duration::from_millis(5));

        let result = auth.login_user(
            "alice",
            &client.client_public_key().to_be_hex_string(),
            &client.client_proof().to_be_hex_string(),
        );
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[test]
    fn superseded_challenge_cannot_complete() {
        let auth = authenticator();
        register(&auth, "alice");

        let first = auth.challenge("alice").unwrap();
        // A retry from the client replaces the parked state.
        let _second = auth.challenge("alice").unwrap();

        let client = SrpClientUser::new(Username::new("alice").unwrap(), PASSWORD_HASH)
            .into_challenge(first.salt().clone(), first.server_public_key().clone())
            .unwrap();

        // The proof is valid against the first challenge's B, but the parked
        // private key belongs to the second challenge.
        let result = auth.login_user(
            "alice",
            &client.client_public_key().to_be_hex_string(),
            &client.client_proof().to_be_hex_string(),
        );
        assert!(matches!(result, Err(AuthError::AuthenticationFailed)));
    }

    #[test]
    fn degenerate_client_public_key_is_rejected() {
        let auth = authenticator();
        register(&auth, "alice");

        let _challenge = auth.challenge("alice").unwrap();

        let result = auth.login_user("alice", "00", &"11".repeat(32));
        assert!(matches!(result, Err(AuthError::InvalidPublicValue)));

        // The attempt consumed the parked state.
        let result = auth.login_user("alice", "02", &"11".repeat(32));
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[test]
    fn malformed_input_does_not_burn_the_session() {
        let auth = authenticator();
        register(&auth, "alice");

        let challenge = auth.challenge("alice").unwrap();

        let result = auth.login_user("alice", "not hex", &"11".repeat(32));
        assert!(matches!(&result, Err(AuthError::MalformedValue(_))));
        assert_eq!(result.unwrap_err().status_code(), 400);

        // The parked state is still there for a well formed attempt.
        let client = SrpClientUser::new(Username::new("alice").unwrap(), PASSWORD_HASH)
            .into_challenge(
                challenge.salt().clone(),
                challenge.server_public_key().clone(),
            )
            .unwrap();
        assert!(auth
            .login_user(
                "alice",
                &client.client_public_key().to_be_hex_string(),
                &client.client_proof().to_be_hex_string(),
            )
            .is_ok());
    }

    #[test]
    fn status_codes_classify_errors() {
        let auth = authenticator();

        assert_eq!(auth.challenge("nobody").unwrap_err().status_code(), 404);
        assert_eq!(auth.challenge("").unwrap_err().status_code(), 400);

        register(&auth, "alice");
        let failed = login(&auth, "alice", "wrong-hash").unwrap_err();
        assert_eq!(failed.status_code(), 403);
    }

    #[test]
    fn proof_failures_render_identically() {
        let auth = authenticator();
        register(&auth, "alice");

        let mismatch = login(&auth, "alice", "wrong-hash").unwrap_err();

        let _ = auth.challenge("alice").unwrap();
        let degenerate = auth
            .login_user("alice", "00", &"11".repeat(32))
            .unwrap_err();

        assert_eq!(mismatch.to_string(), degenerate.to_string());
    }
}
