#[cfg(test)]
use crate::error::ParseError;
#[cfg(all(feature = "srp-default-math", not(feature = "srp-fast-math")))]
use num_bigint::{BigInt, Sign};
#[cfg(feature = "srp-fast-math")]
use rug::integer::Order;
#[cfg(feature = "srp-fast-math")]
use rug::Integer as RugInt;
use std::ops;

#[cfg(not(any(feature = "srp-fast-math", feature = "srp-default-math")))]
compile_error!("Either the 'srp-fast-math' feature or the 'srp-default-math' feature must be enabled.\n\n The features exclusively select an arbitrary integer library.\n Use 'srp-default-math' if you want no-dependency compilation, but slow execution speed. Use 'srp-fast-math' if you want exceptional execution speed but external dependencies.");

/// Exact arbitrary precision integer over the SRP group.
///
/// All byte conversions are **big endian**.
pub(crate) struct Integer {
    #[cfg(all(feature = "srp-default-math", not(feature = "srp-fast-math")))]
    value: BigInt,
    #[cfg(feature = "srp-fast-math")]
    value: RugInt,
}

impl Integer {
    #[cfg(feature = "srp-fast-math")]
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.value.to_digits(Order::MsfBe)
    }
    #[cfg(all(feature = "srp-default-math", not(feature = "srp-fast-math")))]
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.value.to_bytes_be().1
    }

    // The fast math backend uses an exponentiation that does not branch on
    // secret exponent bits. The default backend has no such guarantee.
    #[cfg(feature = "srp-fast-math")]
    pub fn modpow(&self, exponent: &Self, modulus: &Self) -> Self {
        Self::from_bigint(
            self.value
                .clone()
                .secure_pow_mod(&exponent.value, &modulus.value),
        )
    }
    #[cfg(all(feature = "srp-default-math", not(feature = "srp-fast-math")))]
    pub fn modpow(&self, exponent: &Self, modulus: &Self) -> Self {
        Self::from_bigint(self.value.modpow(&exponent.value, &modulus.value))
    }

    /// Remainder that is always in `0..modulus`, also for negative values.
    #[cfg(feature = "srp-fast-math")]
    pub fn pos_rem(&self, modulus: &Self) -> Self {
        let mut r = RugInt::from(&self.value % &modulus.value);
        if r < 0 {
            r += &modulus.value;
        }
        Self::from_bigint(r)
    }
    /// Remainder that is always in `0..modulus`, also for negative values.
    #[cfg(all(feature = "srp-default-math", not(feature = "srp-fast-math")))]
    pub fn pos_rem(&self, modulus: &Self) -> Self {
        let mut r = &self.value % &modulus.value;
        if r.sign() == Sign::Minus {
            r += &modulus.value;
        }
        Self::from_bigint(r)
    }

    #[cfg(feature = "srp-fast-math")]
    pub fn from_bytes_be(v: &[u8]) -> Self {
        Self::from_bigint(RugInt::from_digits(v, Order::MsfBe))
    }
    #[cfg(all(feature = "srp-default-math", not(feature = "srp-fast-math")))]
    pub fn from_bytes_be(v: &[u8]) -> Self {
        Self::from_bigint(BigInt::from_bytes_be(Sign::Plus, v))
    }

    #[cfg(test)]
    #[cfg(feature = "srp-fast-math")]
    pub fn from_dec_str(s: &str) -> Result<Self, ParseError> {
        RugInt::from_str_radix(s, 10)
            .map(Self::from_bigint)
            .map_err(|_| ParseError::InvalidDecimal)
    }
    #[cfg(test)]
    #[cfg(all(feature = "srp-default-math", not(feature = "srp-fast-math")))]
    pub fn from_dec_str(s: &str) -> Result<Self, ParseError> {
        BigInt::parse_bytes(s.as_bytes(), 10)
            .map(Self::from_bigint)
            .ok_or(ParseError::InvalidDecimal)
    }

    #[cfg(test)]
    pub fn from_hex_str(s: &str) -> Result<Self, ParseError> {
        let bytes = hex::decode(s)?;
        Ok(Self::from_bytes_be(&bytes))
    }

    #[cfg(feature = "srp-fast-math")]
    const fn from_bigint(bigint: RugInt) -> Self {
        Self { value: bigint }
    }
    #[cfg(all(feature = "srp-default-math", not(feature = "srp-fast-math")))]
    const fn from_bigint(bigint: BigInt) -> Self {
        Self { value: bigint }
    }
}

impl From<u8> for Integer {
    #[cfg(feature = "srp-fast-math")]
    fn from(v: u8) -> Self {
        Self::from_bigint(RugInt::from(v))
    }

    #[cfg(all(not(feature = "srp-fast-math"), feature = "srp-default-math"))]
    fn from(v: u8) -> Self {
        Self::from_bigint(BigInt::from(v))
    }
}

impl ops::Mul<Integer> for Integer {
    type Output = Self;

    fn mul(self, rhs: Integer) -> Self::Output {
        Self::from_bigint(self.value * rhs.value)
    }
}

impl ops::Add<Integer> for Integer {
    type Output = Self;

    fn add(self, rhs: Integer) -> Self::Output {
        Self::from_bigint(self.value + rhs.value)
    }
}

impl ops::Sub<Integer> for Integer {
    type Output = Self;

    fn sub(self, rhs: Integer) -> Self::Output {
        Self::from_bigint(self.value - rhs.value)
    }
}

impl ops::Rem<Integer> for Integer {
    type Output = Self;

    fn rem(self, rhs: Integer) -> Self::Output {
        Self::from_bigint(self.value % rhs.value)
    }
}
