use srp_auth::auth::Authenticator;
use srp_auth::client::SrpClientUser;
use srp_auth::error::AuthError;
use srp_auth::password::transform_password;
use srp_auth::server::SrpVerifier;
use srp_auth::store::{MemoryCredentialStore, MemorySessionCache};
use srp_auth::username::Username;
use std::sync::Arc;

#[test]
fn full_login_flow_with_transformed_password() {
    let auth = Authenticator::new(MemoryCredentialStore::new(), MemorySessionCache::new());

    // Sign up. The transform runs at full work factor here, like a real
    // registration would.
    let password_hash = transform_password("Str0ngP@ss!").unwrap();
    let verifier = SrpVerifier::from_username_and_password_hash(
        Username::new("alice").unwrap(),
        &password_hash,
    );
    auth.register_user(
        "alice",
        verifier.salt().clone(),
        verifier.password_verifier().clone(),
    )
    .unwrap();

    // First round trip.
    let challenge = auth.challenge("alice").unwrap();
    assert_ne!(challenge.server_public_key().as_be(), &[0_u8; 256]);

    // Client side.
    let client = SrpClientUser::new(Username::new("alice").unwrap(), &password_hash)
        .into_challenge(
            challenge.salt().clone(),
            challenge.server_public_key().clone(),
        )
        .unwrap();

    // Second round trip, with the values as they would appear on the wire.
    let login = auth
        .login_user(
            "alice",
            &client.client_public_key().to_be_hex_string(),
            &client.client_proof().to_be_hex_string(),
        )
        .unwrap();

    let server_proof_hex = login.server_proof().to_be_hex_string();
    assert_eq!(server_proof_hex.len(), 64);

    // The client independently verifies the server proof and ends up with a
    // bit-identical session key.
    let client = client
        .verify_server_proof(login.server_proof().clone())
        .unwrap();
    assert_eq!(client.session_key(), login.session_key());
}

#[test]
fn login_with_no_prior_challenge() {
    let auth = Authenticator::new(MemoryCredentialStore::new(), MemorySessionCache::new());

    let password_hash = "$scrypt$ln=15,r=8,p=1$YWJjZGVmZ2g$bm9wcXJzdHV2";
    let verifier = SrpVerifier::from_username_and_password_hash(
        Username::new("alice").unwrap(),
        password_hash,
    );
    auth.register_user(
        "alice",
        verifier.salt().clone(),
        verifier.password_verifier().clone(),
    )
    .unwrap();

    let result = auth.login_user("alice", "02", &"11".repeat(32));
    assert!(matches!(result, Err(AuthError::SessionNotFound)));
}

#[test]
fn concurrent_logins_for_different_usernames() {
    let auth = Arc::new(Authenticator::new(
        MemoryCredentialStore::new(),
        MemorySessionCache::new(),
    ));

    let password_hash = "$scrypt$ln=15,r=8,p=1$YWJjZGVmZ2g$bm9wcXJzdHV2";

    let mut handles = Vec::new();
    for i in 0..4 {
        let auth = Arc::clone(&auth);
        handles.push(std::thread::spawn(move || {
            let name = format!("user{}", i);

            let verifier = SrpVerifier::from_username_and_password_hash(
                Username::new(name.as_str()).unwrap(),
                password_hash,
            );
            auth.register_user(
                &name,
                verifier.salt().clone(),
                verifier.password_verifier().clone(),
            )
            .unwrap();

            let challenge = auth.challenge(&name).unwrap();
            let client = SrpClientUser::new(Username::new(name.as_str()).unwrap(), password_hash)
                .into_challenge(
                    challenge.salt().clone(),
                    challenge.server_public_key().clone(),
                )
                .unwrap();

            let login = auth
                .login_user(
                    &name,
                    &client.client_public_key().to_be_hex_string(),
                    &client.client_proof().to_be_hex_string(),
                )
                .unwrap();

            let client = client
                .verify_server_proof(login.server_proof().clone())
                .unwrap();
            assert_eq!(client.session_key(), login.session_key());
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
