use hashpuzzle_crypto::Hash;
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::PoWorkError;

/// Number of trailing zero bits a digest must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Difficulty(usize);

impl Difficulty {
    /// A digest cannot have more trailing zeros than it has bits.
    pub const MAX: usize = Hash::BITS;

    pub fn new(bits: i64) -> Result<Self, PoWorkError> {
        match usize::try_from(bits) {
            Ok(bits) if bits <= Self::MAX => Ok(Difficulty(bits)),
            _ => Err(PoWorkError::InvalidDifficulty(bits.to_string())),
        }
    }

    pub fn bits(&self) -> usize {
        self.0
    }

    /// Mean number of candidates needed to meet this difficulty.
    pub fn expected_attempts(&self) -> f64 {
        2f64.powi(self.0 as i32)
    }
}

impl FromStr for Difficulty {
    type Err = PoWorkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .trim()
            .parse::<i64>()
            .map_err(|_| PoWorkError::InvalidDifficulty(s.to_string()))?;
        Difficulty::new(bits)
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bits", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(Difficulty::new(0).unwrap().bits(), 0);
        assert_eq!(Difficulty::new(256).unwrap().bits(), 256);
        assert_eq!(
            Difficulty::new(-1),
            Err(PoWorkError::InvalidDifficulty("-1".to_string()))
        );
        assert_eq!(
            Difficulty::new(257),
            Err(PoWorkError::InvalidDifficulty("257".to_string()))
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(" 8 ".parse::<Difficulty>().unwrap().bits(), 8);
        assert_eq!(
            "2.5".parse::<Difficulty>(),
            Err(PoWorkError::InvalidDifficulty("2.5".to_string()))
        );
        assert_eq!(
            "-3".parse::<Difficulty>(),
            Err(PoWorkError::InvalidDifficulty("-3".to_string()))
        );
        assert!("eight".parse::<Difficulty>().is_err());
    }
}
