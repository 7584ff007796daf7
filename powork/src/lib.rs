//! Trailing-zero proof-of-work: find a nonce bit string such that
//! `SHA-256(binary(nonce) || payload)` ends with `d` zero bits.

pub mod bits;
pub mod config;
pub mod constants;
pub mod control;
pub mod difficulty;
pub mod error;
pub mod evaluator;
pub mod generator;
pub mod parallel;
pub mod search;

pub use bits::Nonce;
pub use config::SearchConfig;
pub use control::CancellationToken;
pub use difficulty::Difficulty;
pub use error::PoWorkError;
pub use evaluator::{digest, meets_difficulty, verify, DigestEvaluator};
pub use generator::{NonceGenerator, Strategy};
pub use hashpuzzle_crypto::Hash;
pub use parallel::search_parallel;
pub use search::{search, Attempt, ProofOfWorkSearch, SearchResult};
