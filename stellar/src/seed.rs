//! Deterministic seeds for drill identities.
//!
//! A [`BaseSeed`] shared by every identity is concatenated with a short
//! account label and copied into a 32 byte buffer. The mapping is only meant
//! to make test identities reproducible; it is not a key derivation function.

use crate::error::{Error, Result};
use log::debug;
use std::fmt;
use std::str::FromStr;
use stellar_base::crypto::KeyPair;

pub const BASE_SEED_LEN: usize = 24;
pub const MIN_BASE_SEED_LEN: usize = 8;
pub const MAX_LABEL_LEN: usize = 8;
pub const SEED_LEN: usize = 32;

/// Base secret normalized to exactly 24 bytes (space padded).
#[derive(Clone, PartialEq, Eq)]
pub struct BaseSeed([u8; BASE_SEED_LEN]);

impl BaseSeed {
    pub fn new(seed: &str) -> Result<Self> {
        let raw = seed.as_bytes();
        if raw.len() < MIN_BASE_SEED_LEN || raw.len() > BASE_SEED_LEN {
            return Err(Error::Configuration(raw.len()));
        }

        let mut bytes = [b' '; BASE_SEED_LEN];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(BaseSeed(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; BASE_SEED_LEN] {
        &self.0
    }
}

impl FromStr for BaseSeed {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BaseSeed::new(s)
    }
}

// never print the secret itself
impl fmt::Debug for BaseSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BaseSeed(..)")
    }
}

/// 32 bytes of seed material ready for the keypair library.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DerivedSeed([u8; SEED_LEN]);

impl DerivedSeed {
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; SEED_LEN] {
        self.0
    }
}

impl fmt::Debug for DerivedSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedSeed(..)")
    }
}

#[derive(Debug, Clone)]
pub struct SeedDeriver {
    base: BaseSeed,
}

impl SeedDeriver {
    pub fn new(base: BaseSeed) -> Self {
        Self { base }
    }

    /// Returns `None` when the label is empty or longer than 8 bytes.
    pub fn derive(&self, label: &str) -> Option<DerivedSeed> {
        let label = label.as_bytes();
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return None;
        }

        let mut seed = [0u8; SEED_LEN];
        seed[..BASE_SEED_LEN].copy_from_slice(self.base.as_bytes());
        seed[BASE_SEED_LEN..BASE_SEED_LEN + label.len()].copy_from_slice(label);
        Some(DerivedSeed(seed))
    }

    /// Keypair for the identity named by `label`.
    pub fn keypair(&self, label: &str) -> Option<KeyPair> {
        let seed = self.derive(label)?;
        match KeyPair::from_seed_bytes(seed.as_bytes()) {
            Ok(kp) => {
                debug!("derived {} for label {}", kp.public_key().account_id(), label);
                Some(kp)
            }
            Err(e) => {
                debug!("keypair from derived seed failed for {}: {}", label, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deriver() -> SeedDeriver {
        SeedDeriver::new(BaseSeed::new("drill seed").unwrap())
    }

    #[test]
    fn base_seed_is_space_padded() {
        for len in MIN_BASE_SEED_LEN..=BASE_SEED_LEN {
            let raw = "x".repeat(len);
            let seed = BaseSeed::new(&raw).unwrap();
            assert_eq!(seed.as_bytes().len(), BASE_SEED_LEN);
            assert!(seed.as_bytes()[..len].iter().all(|b| *b == b'x'));
            assert!(seed.as_bytes()[len..].iter().all(|b| *b == b' '));
        }
    }

    #[test]
    fn base_seed_length_bounds() {
        assert!(matches!(
            BaseSeed::new("1234567"),
            Err(Error::Configuration(7))
        ));
        assert!(matches!(
            BaseSeed::new(&"a".repeat(25)),
            Err(Error::Configuration(25))
        ));
        assert!("12345678".parse::<BaseSeed>().is_ok());
    }

    #[test]
    fn derive_layout() {
        let seed = deriver().derive("issuer").unwrap();
        let bytes = seed.as_bytes();
        assert_eq!(&bytes[..10], b"drill seed");
        assert!(bytes[10..24].iter().all(|b| *b == b' '));
        assert_eq!(&bytes[24..30], b"issuer");
        assert_eq!(&bytes[30..], &[0, 0]);
    }

    #[test]
    fn derive_is_deterministic() {
        let a = deriver().derive("distA").unwrap();
        let b = deriver().derive("distA").unwrap();
        assert_eq!(a.into_bytes(), b.into_bytes());
    }

    #[test]
    fn derive_label_bounds() {
        let d = deriver();
        assert!(d.derive("").is_none());
        assert!(d.derive("123456789").is_none());

        let full = d.derive("12345678").unwrap();
        assert_eq!(&full.as_bytes()[24..], b"12345678");
    }

    #[test]
    fn distinct_labels_give_distinct_seeds() {
        let d = deriver();
        assert_ne!(d.derive("A"), d.derive("B"));
        assert_ne!(d.derive("dist"), d.derive("distA"));
    }

    #[test]
    fn keypair_is_reproducible() {
        let d = deriver();
        let a = d.keypair("issuer").unwrap();
        let b = d.keypair("issuer").unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_ne!(d.keypair("holder").unwrap().public_key(), a.public_key());
        assert!(d.keypair("").is_none());
    }

    #[test]
    fn debug_hides_secret() {
        let seed = BaseSeed::new("drill seed").unwrap();
        assert_eq!(format!("{:?}", seed), "BaseSeed(..)");
    }
}
