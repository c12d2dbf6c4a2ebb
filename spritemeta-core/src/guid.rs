//! 128-bit asset identifiers, rendered as 32 lowercase hex digits.

use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guid(u128);

impl Guid {
    /// Fresh identifier from the thread-local generator.
    pub fn generate() -> Self { Self(fastrand::u128(..)) }

    pub fn from_rng(rng: &mut fastrand::Rng) -> Self { Self(rng.u128(..)) }

    pub const fn from_u128(v: u128) -> Self { Self(v) }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:032x}", self.0) }
}

impl Serialize for Guid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_32_hex_digits() {
        assert_eq!(Guid::from_u128(0xab).to_string(), "000000000000000000000000000000ab");
        let g = Guid::generate().to_string();
        assert_eq!(g.len(), 32);
        assert!(g.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let a = Guid::from_rng(&mut fastrand::Rng::with_seed(7));
        let b = Guid::from_rng(&mut fastrand::Rng::with_seed(7));
        assert_eq!(a, b);
        let mut rng = fastrand::Rng::with_seed(7);
        assert_ne!(Guid::from_rng(&mut rng), Guid::from_rng(&mut rng));
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Guid::from_u128(1)).unwrap();
        assert_eq!(json, "\"00000000000000000000000000000001\"");
    }
}
