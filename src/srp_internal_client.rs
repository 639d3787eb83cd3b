use crate::error::InvalidPublicKeyError;
use crate::key::{PrivateKey, PublicKey, SKey, Sha256Hash};
use crate::primes::{Generator, LargeSafePrime, Multiplier};

pub(crate) fn calculate_client_public_key(
    client_private_key: &PrivateKey,
) -> Result<PublicKey, InvalidPublicKeyError> {
    // `A = g^a % N`
    let client_public_key = Generator::default().to_bigint().modpow(
        &client_private_key.to_bigint(),
        &LargeSafePrime::default().to_bigint(),
    );

    PublicKey::try_from_bigint(client_public_key)
}

#[allow(non_snake_case)]
pub(crate) fn calculate_client_S(
    server_public_key: &PublicKey,
    x: &Sha256Hash,
    client_private_key: &PrivateKey,
    u: &Sha256Hash,
) -> SKey {
    let generator = Generator::default().to_bigint();
    let large_safe_prime = LargeSafePrime::default().to_bigint();

    // S = ((B - k * g^x) % N)^(a + u * x) % N
    //
    // The subtraction can go negative so the base is reduced with a
    // remainder that is always in the group.
    let base = (server_public_key.to_bigint()
        - Multiplier::bigint() * generator.modpow(&x.to_bigint(), &large_safe_prime))
    .pos_rem(&large_safe_prime);

    base.modpow(
        &(client_private_key.to_bigint() + u.to_bigint() * x.to_bigint()),
        &large_safe_prime,
    )
    .into()
}
