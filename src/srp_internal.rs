//! Internal functions only exposed in order to help other implementations with testing and verification.
//! This module should not be used except for when verifying another implementation.
//!
//! All group elements are zero padded to [the width of the large safe
//! prime](crate::LARGE_SAFE_PRIME_LENGTH) before hashing. Getting this
//! padding wrong is the most common interoperability bug between SRP
//! implementations, which is why every function here goes through the fixed
//! width types from [`key`](crate::key).

use sha2::{Digest, Sha256};

use crate::error::InvalidPublicKeyError;
use crate::key::{
    PrivateKey, Proof, PublicKey, SKey, Salt, SessionKey, Sha256Hash, Verifier,
    PASSWORD_VERIFIER_LENGTH,
};
use crate::primes::{Generator, LargeSafePrime, Multiplier, LARGE_SAFE_PRIME_LENGTH};
use crate::username::Username;

/// Calculate the multiplier parameter `k`.
///
/// `k` is calculated as `H( N | PAD(g) )` as described on page 9 of
/// [RFC5054]. Since the group is statically determined the result is
/// precalculated into
/// [`MULTIPLIER_BIG_ENDIAN`](crate::primes::MULTIPLIER_BIG_ENDIAN); a test
/// asserts that the two agree.
///
/// [RFC5054]: https://tools.ietf.org/html/rfc5054
pub(crate) fn calculate_multiplier(
    large_safe_prime: &LargeSafePrime,
    generator: &Generator,
) -> Sha256Hash {
    let mut padded_generator = [0_u8; LARGE_SAFE_PRIME_LENGTH];
    padded_generator[LARGE_SAFE_PRIME_LENGTH - 1] = generator.as_u8();

    let k = Sha256::new()
        .chain_update(large_safe_prime.as_be_bytes())
        .chain_update(padded_generator)
        .finalize();

    Sha256Hash::from_be_bytes(k.into())
}

/// Calculate the `x` value which is used for generating the password verifier `v`.
/// See [`calculate_password_verifier`].
///
/// `x` is calculated as `H( salt | H( username | : | password_hash ) )` as
/// described on page 8 of [RFC5054].
///
/// `H()` is the SHA-256 hashing function.
/// `:` is the literal character `:`.
///
/// The `password_hash` is **not** the raw password but the output of
/// [`transform_password`](crate::password::transform_password). The raw
/// password never reaches the verifier calculation.
///
/// Notice that the `x` value should only be calculated when a user registers
/// an account or changes their password, since the database should never
/// contain anything the password can be recovered from.
///
/// [RFC5054]: https://tools.ietf.org/html/rfc5054
pub fn calculate_x(username: &Username, password_hash: &str, salt: &Salt) -> Sha256Hash {
    let p = Sha256::new()
        .chain_update(username.as_ref())
        .chain_update(":")
        .chain_update(password_hash)
        .finalize();

    let x = Sha256::new().chain_update(salt.as_be()).chain_update(p).finalize();

    Sha256Hash::from_be_bytes(x.into())
}

/// Calculate the password verifier `v` used for generating the server public
/// key `B` and the shared secret `S`.
/// See [`calculate_server_public_key`] and [`calculate_S`].
///
/// `v` is calculated as `g^x % N` as described on page 3 of [RFC2945].
/// For `x` see [`calculate_x`].
///
/// # Return value
///
/// A zero padded **big endian** array the [size of N][`LARGE_SAFE_PRIME_LENGTH`].
///
/// [RFC2945]: https://tools.ietf.org/html/rfc2945
pub fn calculate_password_verifier(
    username: &Username,
    password_hash: &str,
    salt: &Salt,
    // Return an array instead of Verifier because this is never directly used to create a Verifier
) -> [u8; PASSWORD_VERIFIER_LENGTH] {
    let x = calculate_x(username, password_hash, salt).to_bigint();

    let generator = Generator::default().to_bigint();
    let large_safe_prime = LargeSafePrime::default().to_bigint();

    let password_verifier = generator.modpow(&x, &large_safe_prime);

    *Verifier::from(password_verifier).as_be()
}

/// Calculate the server public key `B = (k * v + g^b) % N`.
///
/// # Errors
///
/// Errors if the computed key is zero modulo the large safe prime, in which
/// case the caller must resample the private key. A degenerate `B` would
/// leak that no entropy went into the exchange.
pub fn calculate_server_public_key(
    password_verifier: &Verifier,
    server_private_key: &PrivateKey,
) -> Result<PublicKey, InvalidPublicKeyError> {
    let generator = Generator::default().to_bigint();
    let large_safe_prime = LargeSafePrime::default().to_bigint();

    let server_public_key = (Multiplier::bigint() * password_verifier.to_bigint()
        + generator.modpow(&server_private_key.to_bigint(), &large_safe_prime))
        % large_safe_prime;

    PublicKey::try_from_bigint(server_public_key)
}

/// Calculate the scrambling parameter `u = H( PAD(A) | PAD(B) )`.
///
/// Must be recomputed identically by client and server. A `u` of zero is a
/// protocol failure that the state machines reject; it is not silently
/// retried with a biased value.
pub fn calculate_u(client_public_key: &PublicKey, server_public_key: &PublicKey) -> Sha256Hash {
    let s = Sha256::new()
        .chain_update(client_public_key.as_be())
        .chain_update(server_public_key.as_be())
        .finalize();
    Sha256Hash::from_be_bytes(s.into())
}

/// Calculate the raw shared secret `S = (A * v^u)^b % N`.
/// Return value is a zero padded N sized big endian array.
#[allow(non_snake_case)] // There is no better descriptor than 'S'
pub fn calculate_S(
    client_public_key: &PublicKey,
    password_verifier: &Verifier,
    u: &Sha256Hash,
    server_private_key: &PrivateKey,
) -> SKey {
    let large_safe_prime = LargeSafePrime::default().to_bigint();

    (client_public_key.to_bigint()
        * password_verifier
            .to_bigint()
            .modpow(&u.to_bigint(), &large_safe_prime))
    .modpow(&server_private_key.to_bigint(), &large_safe_prime)
    .into()
}

/// Calculate the session key `K = H( PAD(S) )`.
///
/// Both sides derive the same key from their independently computed `S`
/// without the key ever having been transmitted.
#[allow(non_snake_case)]
pub fn calculate_session_key(S: &SKey) -> SessionKey {
    let k = Sha256::new().chain_update(S.as_be()).finalize();

    SessionKey::from_be_bytes(k.into())
}

/// Calculate the client proof `M1 = H( PAD(A) | PAD(B) | K )`.
///
/// The server recomputes this value and compares it against the proof the
/// client sent.
pub fn calculate_client_proof(
    client_public_key: &PublicKey,
    server_public_key: &PublicKey,
    session_key: &SessionKey,
) -> Proof {
    let out = Sha256::new()
        .chain_update(client_public_key.as_be())
        .chain_update(server_public_key.as_be())
        .chain_update(session_key.as_be())
        .finalize();

    Proof::from_be_bytes(out.into())
}

/// Calculate the server proof `M2 = H( PAD(A) | M1 | K )`.
///
/// Sent to the client as proof that the server also arrived at the same
/// session key.
pub fn calculate_server_proof(
    client_public_key: &PublicKey,
    client_proof: &Proof,
    session_key: &SessionKey,
) -> Proof {
    let s = Sha256::new()
        .chain_update(client_public_key.as_be())
        .chain_update(client_proof.as_be())
        .chain_update(session_key.as_be())
        .finalize();

    Proof::from_be_bytes(s.into())
}
