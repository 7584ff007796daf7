use digest::Digest;
use hex::{decode, encode};
use sha2::Sha256;
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::HashError;

/// SHA-256 digest, read as a big-endian bit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hash {
    hash: [u8; Hash::LENGTH],
}

impl Hash {
    pub const LENGTH: usize = 32;
    pub const BITS: usize = Hash::LENGTH * 8;

    pub fn new(hash: [u8; Hash::LENGTH]) -> Self {
        Hash { hash }
    }

    pub fn hash<T: AsRef<[u8]>>(value: T) -> Self {
        Self::concat_and_hash(&[value.as_ref()])
    }

    /// Hashes the concatenation of `parts` without copying them into one buffer.
    pub fn concat_and_hash(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        let mut hash = [0u8; Hash::LENGTH];
        hash.copy_from_slice(&hasher.finalize());
        Hash { hash }
    }

    pub const fn zero() -> Self {
        Hash {
            hash: [0; Hash::LENGTH],
        }
    }

    /// Number of consecutive zero bits counted from the least significant end.
    /// An all-zero hash has `Hash::BITS` trailing zeros.
    pub fn trailing_zeros(&self) -> usize {
        let mut zeros = 0;
        for byte in self.hash.iter().rev() {
            if *byte != 0 {
                return zeros + byte.trailing_zeros() as usize;
            }
            zeros += 8;
        }
        zeros
    }

    pub fn to_hex(&self) -> String {
        encode(self.as_ref())
    }

    /// All `Hash::BITS` binary digits, leading zeros included.
    pub fn to_binary(&self) -> String {
        self.hash.iter().map(|byte| format!("{:08b}", byte)).collect()
    }
}

impl AsRef<[u8; Hash::LENGTH]> for Hash {
    fn as_ref(&self) -> &[u8; Hash::LENGTH] {
        &self.hash
    }
}

impl TryFrom<&[u8]> for Hash {
    type Error = HashError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != Hash::LENGTH {
            return Err(HashError::InvalidLength {
                expected: Hash::LENGTH,
                found: bytes.len(),
            });
        }
        let mut hash = [0u8; Hash::LENGTH];
        hash.copy_from_slice(bytes);
        Ok(Hash { hash })
    }
}

impl FromStr for Hash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = decode(s).map_err(|_| HashError::InvalidHex)?;
        Hash::try_from(bytes.as_slice())
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_vector() {
        assert_eq!(
            Hash::hash(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_concat_matches_single_buffer() {
        let joined = Hash::hash(b"11holamundo");
        let parts = Hash::concat_and_hash(&[&b"11"[..], &b"holamundo"[..]]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn test_trailing_zeros() {
        assert_eq!(Hash::zero().trailing_zeros(), Hash::BITS);

        let mut bytes = [0xffu8; Hash::LENGTH];
        assert_eq!(Hash::new(bytes).trailing_zeros(), 0);

        bytes[31] = 0b1000_0000;
        assert_eq!(Hash::new(bytes).trailing_zeros(), 7);

        bytes[31] = 0;
        bytes[30] = 0b0000_0100;
        assert_eq!(Hash::new(bytes).trailing_zeros(), 10);
    }

    #[test]
    fn test_binary_keeps_leading_zeros() {
        let mut bytes = [0u8; Hash::LENGTH];
        bytes[31] = 1;
        let binary = Hash::new(bytes).to_binary();
        assert_eq!(binary.len(), Hash::BITS);
        assert!(binary.starts_with("0000"));
        assert!(binary.ends_with("01"));
    }

    #[test]
    fn test_parse_hex() {
        let hash = Hash::hash(b"holamundo");
        assert_eq!(hash.to_hex().parse::<Hash>().unwrap(), hash);
        assert_eq!(hash.to_string().parse::<Hash>().unwrap(), hash);
        assert_eq!("zz".parse::<Hash>(), Err(HashError::InvalidHex));
        assert_eq!(
            "abcd".parse::<Hash>(),
            Err(HashError::InvalidLength {
                expected: 32,
                found: 2
            })
        );
    }
}
