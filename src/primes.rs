use crate::bigint;

/// The size in bytes of the [large safe prime](LARGE_SAFE_PRIME_BIG_ENDIAN).
///
/// Every group element (`A`, `B`, `v`, `S`) is zero padded to this width
/// before hashing and before being placed in a fixed width array. Both peers
/// must pad identically or the derived proofs will not match.
#[doc(alias = "N")]
pub const LARGE_SAFE_PRIME_LENGTH: usize = 256;

/// Static large safe prime (`N`) value.
///
/// This is the 2048-bit group from appendix A of
/// [RFC5054](https://tools.ietf.org/html/rfc5054).
/// It is not a secret and must be identical between every client and server
/// instance that interoperate.
///
/// Always has the static size of [256 bytes](LARGE_SAFE_PRIME_LENGTH).
#[doc(alias = "N")]
pub const LARGE_SAFE_PRIME_BIG_ENDIAN: [u8; LARGE_SAFE_PRIME_LENGTH] = [
    0xac, 0x6b, 0xdb, 0x41, 0x32, 0x4a, 0x9a, 0x9b, 0xf1, 0x66, 0xde, 0x5e,
    0x13, 0x89, 0x58, 0x2f, 0xaf, 0x72, 0xb6, 0x65, 0x19, 0x87, 0xee, 0x07,
    0xfc, 0x31, 0x92, 0x94, 0x3d, 0xb5, 0x60, 0x50, 0xa3, 0x73, 0x29, 0xcb,
    0xb4, 0xa0, 0x99, 0xed, 0x81, 0x93, 0xe0, 0x75, 0x77, 0x67, 0xa1, 0x3d,
    0xd5, 0x23, 0x12, 0xab, 0x4b, 0x03, 0x31, 0x0d, 0xcd, 0x7f, 0x48, 0xa9,
    0xda, 0x04, 0xfd, 0x50, 0xe8, 0x08, 0x39, 0x69, 0xed, 0xb7, 0x67, 0xb0,
    0xcf, 0x60, 0x95, 0x17, 0x9a, 0x16, 0x3a, 0xb3, 0x66, 0x1a, 0x05, 0xfb,
    0xd5, 0xfa, 0xaa, 0xe8, 0x29, 0x18, 0xa9, 0x96, 0x2f, 0x0b, 0x93, 0xb8,
    0x55, 0xf9, 0x79, 0x93, 0xec, 0x97, 0x5e, 0xea, 0xa8, 0x0d, 0x74, 0x0a,
    0xdb, 0xf4, 0xff, 0x74, 0x73, 0x59, 0xd0, 0x41, 0xd5, 0xc3, 0x3e, 0xa7,
    0x1d, 0x28, 0x1e, 0x44, 0x6b, 0x14, 0x77, 0x3b, 0xca, 0x97, 0xb4, 0x3a,
    0x23, 0xfb, 0x80, 0x16, 0x76, 0xbd, 0x20, 0x7a, 0x43, 0x6c, 0x64, 0x81,
    0xf1, 0xd2, 0xb9, 0x07, 0x87, 0x17, 0x46, 0x1a, 0x5b, 0x9d, 0x32, 0xe6,
    0x88, 0xf8, 0x77, 0x48, 0x54, 0x45, 0x23, 0xb5, 0x24, 0xb0, 0xd5, 0x7d,
    0x5e, 0xa7, 0x7a, 0x27, 0x75, 0xd2, 0xec, 0xfa, 0x03, 0x2c, 0xfb, 0xdb,
    0xf5, 0x2f, 0xb3, 0x78, 0x61, 0x60, 0x27, 0x90, 0x04, 0xe5, 0x7a, 0xe6,
    0xaf, 0x87, 0x4e, 0x73, 0x03, 0xce, 0x53, 0x29, 0x9c, 0xcc, 0x04, 0x1c,
    0x7b, 0xc3, 0x08, 0xd8, 0x2a, 0x56, 0x98, 0xf3, 0xa8, 0xd0, 0xc3, 0x82,
    0x71, 0xae, 0x35, 0xf8, 0xe9, 0xdb, 0xfb, 0xb6, 0x94, 0xb5, 0xc8, 0x03,
    0xd8, 0x9f, 0x7a, 0xe4, 0x35, 0xde, 0x23, 0x6d, 0x52, 0x5f, 0x54, 0x75,
    0x9b, 0x65, 0xe3, 0x72, 0xfc, 0xd6, 0x8e, 0xf2, 0x0f, 0xa7, 0x11, 0x1f,
    0x9e, 0x4a, 0xff, 0x73,
];

pub(crate) struct LargeSafePrime {
    prime: [u8; LARGE_SAFE_PRIME_LENGTH],
}

impl Default for LargeSafePrime {
    fn default() -> Self {
        Self {
            prime: LARGE_SAFE_PRIME_BIG_ENDIAN,
        }
    }
}

impl LargeSafePrime {
    pub const fn as_be_bytes(&self) -> &[u8; LARGE_SAFE_PRIME_LENGTH] {
        &self.prime
    }

    pub fn to_bigint(&self) -> bigint::Integer {
        bigint::Integer::from_bytes_be(&self.prime)
    }
}

/// Called `g` in [RFC2945](https://tools.ietf.org/html/rfc2945).
/// Statically set to 2, the generator of the RFC 5054 2048-bit group.
/// Used for generating the public keys for both server and client, and the
/// password verifier.
#[doc(alias = "g")]
pub const GENERATOR: u8 = 2;

pub(crate) struct Generator {
    generator: u8,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            generator: GENERATOR,
        }
    }
}
impl Generator {
    pub fn to_bigint(&self) -> bigint::Integer {
        bigint::Integer::from(self.generator)
    }

    pub const fn as_u8(&self) -> u8 {
        self.generator
    }
}

/// The SRP6a multiplier parameter, `k = H( N | PAD(g) )`.
///
/// Since the large safe prime and generator are statically determined the
/// value is precalculated. The derivation lives in
/// [`srp_internal`](crate::srp_internal) and a test asserts that it matches
/// this constant.
#[doc(alias = "k")]
pub const MULTIPLIER_BIG_ENDIAN: [u8; 32] = [
    0x05, 0xb9, 0xe8, 0xef, 0x05, 0x9c, 0x6b, 0x32, 0xea, 0x59, 0xfc, 0x1d,
    0x32, 0x2d, 0x37, 0xf0, 0x4a, 0xa3, 0x0b, 0xae, 0x5a, 0xa9, 0x00, 0x3b,
    0x83, 0x21, 0xe2, 0x1d, 0xdb, 0x04, 0xe3, 0x00,
];

pub(crate) struct Multiplier {}
impl Multiplier {
    pub fn bigint() -> bigint::Integer {
        bigint::Integer::from_bytes_be(&MULTIPLIER_BIG_ENDIAN)
    }
}

#[cfg(test)]
mod test {
    use crate::bigint::Integer;
    use crate::primes::{LargeSafePrime, GENERATOR};

    // The deployment this crate interoperates with configures the group in
    // base 10. The byte array constant must describe the same integer.
    const LARGE_SAFE_PRIME_BASE_10: &str = "21766174458617435773191008891802753781907668374255538511144643224689886235383840957210909013086056401571399717235807266581649606472148410291413364152197364477180887395655483738115072677402235101762521901569820740293149529620419333266262073471054548368736039519702486226506248861060256971802984953561121442680157668000761429988222457090413873973970171927093992114751765168063614761119615476233422096442783117971236371647333871414335895773474667308967050807005509320424799678417036867928316761272274230314067548291133582479583061439577559347101961771406173684378522703483495337037655006751328447510550299250924469288819";

    #[test]
    fn large_safe_prime_matches_base_10_constant() {
        let from_dec = Integer::from_dec_str(LARGE_SAFE_PRIME_BASE_10).unwrap();
        let from_bytes = LargeSafePrime::default().to_bigint();

        assert_eq!(from_dec.to_bytes_be(), from_bytes.to_bytes_be());
    }

    #[test]
    fn generator_is_rfc5054_group_generator() {
        assert_eq!(GENERATOR, 2);
    }
}
