//! The adaptive password transform applied before verifier generation.
//!
//! The raw password is never fed into the SRP calculations directly. It is
//! first run through scrypt, a deliberately slow memory hard hash, so that an
//! attacker who captures a verifier still has to pay the full work factor per
//! password guess. The output is a [PHC string] which embeds its own random
//! salt and work factor, so the same string can later be reproduced or
//! verified without any extra bookkeeping.
//!
//! This transform runs on the client or in the registration service, before
//! [`calculate_x`](crate::srp_internal::calculate_x) binds the result to the
//! username and the SRP salt. It is never invoked on the server during
//! challenge or login, where only the verifier is available.
//!
//! [PHC string]: https://github.com/P-H-C/phc-string-format/blob/master/phc-sf-spec.md

use password_hash::{PasswordHasher, SaltString};
use rand::{thread_rng, RngCore};
use scrypt::Scrypt;

use crate::error::TransformPasswordError;

/// Transforms a plaintext password into its adaptive hash.
///
/// Uses the scrypt recommended parameters, which target well over 100 ms per
/// hash on commodity hardware. Use [`transform_password_with_params`] to tune
/// the work factor.
///
/// # Errors
///
/// [`TransformPasswordError::EmptyPassword`] for an empty password, and
/// [`TransformPasswordError::HashFailed`] if the underlying hash fails.
pub fn transform_password(plaintext: &str) -> Result<String, TransformPasswordError> {
    transform_password_with_params(plaintext, scrypt::Params::recommended())
}

/// Transforms a plaintext password into its adaptive hash with a specific
/// work factor.
///
/// # Errors
///
/// Same as [`transform_password`].
pub fn transform_password_with_params(
    plaintext: &str,
    params: scrypt::Params,
) -> Result<String, TransformPasswordError> {
    if plaintext.is_empty() {
        return Err(TransformPasswordError::EmptyPassword);
    }

    let mut salt = [0_u8; 16];
    thread_rng().fill_bytes(&mut salt);
    let salt = SaltString::b64_encode(&salt)?;

    let hash = Scrypt.hash_password_customized(
        plaintext.as_bytes(),
        None,
        None,
        params,
        &salt,
    )?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod test {
    use crate::password::{transform_password_with_params, transform_password};
    use crate::error::TransformPasswordError;

    // The recommended parameters are deliberately slow, tests use the
    // cheapest valid ones.
    fn fast_params() -> scrypt::Params {
        scrypt::Params::new(5, 8, 1).unwrap()
    }

    #[test]
    fn output_embeds_salt_and_work_factor() {
        let hash = transform_password_with_params("Str0ngP@ss!", fast_params()).unwrap();

        assert!(hash.starts_with("$scrypt$"));
        // PHC format: $scrypt$<params>$<salt>$<hash>
        assert_eq!(hash.matches('$').count(), 4);
    }

    #[test]
    fn same_password_gives_different_hashes() {
        let first = transform_password_with_params("Str0ngP@ss!", fast_params()).unwrap();
        let second = transform_password_with_params("Str0ngP@ss!", fast_params()).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(matches!(
            transform_password(""),
            Err(TransformPasswordError::EmptyPassword)
        ));
    }
}
