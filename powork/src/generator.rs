use log::trace;
use rand::Rng;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::bits::Nonce;
use crate::difficulty::Difficulty;
use crate::error::PoWorkError;

/// How candidates follow the initial random nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `initial + attempt`, on the minimal number of bits.
    Linear,
    /// A fresh random `d`-bit string prepended to the previous candidate.
    Accumulative,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Linear
    }
}

impl FromStr for Strategy {
    type Err = PoWorkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Strategy::Linear),
            "accumulative" => Ok(Strategy::Accumulative),
            _ => Err(PoWorkError::InvalidStrategy(s.to_string())),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Linear => f.write_str("linear"),
            Strategy::Accumulative => f.write_str("accumulative"),
        }
    }
}

/// Uniformly random nonce of exactly `difficulty` bits.
pub fn initial<R: Rng>(difficulty: Difficulty, rng: &mut R) -> Nonce {
    Nonce::random(difficulty.bits(), rng)
}

pub fn linear_next(base: &Nonce, attempt: u64) -> Nonce {
    base.add(attempt)
}

pub fn accumulative_next<R: Rng>(previous: &Nonce, difficulty: Difficulty, rng: &mut R) -> Nonce {
    previous.prepend(&Nonce::random(difficulty.bits(), rng))
}

#[derive(Debug)]
pub struct NonceGenerator<R> {
    strategy: Strategy,
    difficulty: Difficulty,
    rng: R,
    base: Option<Nonce>,
}

impl<R: Rng> NonceGenerator<R> {
    pub fn new(strategy: Strategy, difficulty: Difficulty, rng: R) -> Self {
        NonceGenerator {
            strategy,
            difficulty,
            rng,
            base: None,
        }
    }

    /// Draws the initial nonce, which Linear keeps as the base of every later candidate.
    pub fn initial(&mut self) -> Nonce {
        let nonce = initial(self.difficulty, &mut self.rng);
        trace!("Initial {} nonce: {}", self.strategy, nonce);
        self.base = Some(nonce.clone());
        nonce
    }

    pub fn next_candidate(&mut self, previous: &Nonce, attempt: u64) -> Nonce {
        match self.strategy {
            Strategy::Linear => linear_next(self.base.as_ref().unwrap_or(previous), attempt),
            Strategy::Accumulative => accumulative_next(previous, self.difficulty, &mut self.rng),
        }
    }

    /// The initial nonce followed by every later candidate, without end.
    pub fn candidates(self) -> Candidates<R> {
        Candidates {
            generator: self,
            previous: None,
            attempt: 0,
        }
    }
}

#[derive(Debug)]
pub struct Candidates<R> {
    generator: NonceGenerator<R>,
    previous: Option<Nonce>,
    attempt: u64,
}

impl<R: Rng> Iterator for Candidates<R> {
    type Item = Nonce;

    fn next(&mut self) -> Option<Nonce> {
        let nonce = match self.previous.take() {
            None => self.generator.initial(),
            Some(previous) => {
                self.attempt += 1;
                self.generator.next_candidate(&previous, self.attempt)
            }
        };
        self.previous = Some(nonce.clone());
        Some(nonce)
    }
}
