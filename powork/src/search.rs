use hashpuzzle_crypto::Hash;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bits::Nonce;
use crate::config::SearchConfig;
use crate::constants::PROGRESS_LOG_INTERVAL;
use crate::control::{AttemptBudget, CancellationToken, Control};
use crate::difficulty::Difficulty;
use crate::error::PoWorkError;
use crate::evaluator::{self, DigestEvaluator};
use crate::generator::{NonceGenerator, Strategy};

/// A solved puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    nonce: Nonce,
    digest: Hash,
    attempts: u64,
}

impl SearchResult {
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    pub fn digest(&self) -> &Hash {
        &self.digest
    }

    pub fn digest_hex(&self) -> String {
        self.digest.to_hex()
    }

    /// Candidates tried after the initial one; zero when the initial nonce won.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn verify(&self, payload: &[u8], difficulty: Difficulty) -> bool {
        let digest = evaluator::digest(&self.nonce, payload);
        digest == self.digest && evaluator::meets_difficulty(&digest, difficulty)
    }
}

/// One evaluated candidate, as seen by an observer.
#[derive(Debug)]
pub struct Attempt<'a> {
    pub attempt: u64,
    pub nonce: &'a Nonce,
    pub digest: &'a Hash,
}

type Observer<'a> = Box<dyn FnMut(&Attempt<'_>) + 'a>;

/// Sequential search over the candidates of one strategy.
///
/// ```
/// use hashpuzzle_powork::{Difficulty, ProofOfWorkSearch, SearchConfig, Strategy};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let config = SearchConfig::new(Difficulty::new(4).unwrap(), Strategy::Linear);
/// let result = ProofOfWorkSearch::new(b"holamundo", config)
///     .run(StdRng::seed_from_u64(42))
///     .unwrap();
/// assert!(result.digest().trailing_zeros() >= 4);
/// ```
pub struct ProofOfWorkSearch<'a> {
    payload: &'a [u8],
    config: SearchConfig,
    cancel: Option<CancellationToken>,
    observer: Option<Observer<'a>>,
}

impl<'a> ProofOfWorkSearch<'a> {
    pub fn new(payload: &'a [u8], config: SearchConfig) -> Self {
        ProofOfWorkSearch {
            payload,
            config,
            cancel: None,
            observer: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Called once for every evaluated candidate, the initial one included.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&Attempt<'_>) + 'a,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn run<R: Rng>(self, rng: R) -> Result<SearchResult, PoWorkError> {
        let budget = AttemptBudget::new(self.config.max_attempts());
        let control = Control::new(&budget, self.cancel.as_ref());
        let mut observer = self.observer;
        let mut notify = |attempt: &Attempt<'_>| {
            if let Some(observer) = observer.as_mut() {
                observer(attempt);
            }
        };
        drive(self.payload, &self.config, rng, &control, &mut notify)
    }
}

/// Searches with a freshly seeded generator and no attempt limit.
pub fn search(
    payload: &[u8],
    difficulty: i64,
    strategy: Strategy,
) -> Result<SearchResult, PoWorkError> {
    let config = SearchConfig::new(Difficulty::new(difficulty)?, strategy);
    ProofOfWorkSearch::new(payload, config).run(StdRng::from_entropy())
}

/// The search loop shared by sequential and parallel searches.
pub(crate) fn drive<R: Rng>(
    payload: &[u8],
    config: &SearchConfig,
    rng: R,
    control: &Control<'_>,
    observer: &mut dyn FnMut(&Attempt<'_>),
) -> Result<SearchResult, PoWorkError> {
    let difficulty = config.difficulty();
    debug!(
        "Searching {} with {} strategy (~{} attempts expected)",
        difficulty,
        config.strategy(),
        difficulty.expected_attempts()
    );

    let mut evaluator = DigestEvaluator::new(payload, difficulty);
    let candidates = NonceGenerator::new(config.strategy(), difficulty, rng).candidates();
    let mut attempts = 0u64;

    for nonce in candidates {
        if control.should_stop() {
            debug!("Search stopped after {} attempts", attempts);
            return Err(PoWorkError::Cancelled { attempts });
        }

        let digest = evaluator.evaluate(&nonce);
        trace!("Attempt {}: nonce {} -> {}", attempts, nonce, digest);
        observer(&Attempt {
            attempt: attempts,
            nonce: &nonce,
            digest: &digest,
        });

        if evaluator.meets_difficulty(&digest) {
            control.mark_found();
            debug!("Found proof after {} attempts: {}", attempts, digest);
            return Ok(SearchResult {
                nonce,
                digest,
                attempts,
            });
        }

        if !control.budget.take() {
            debug!("Attempt budget spent after {} attempts", attempts);
            return Err(PoWorkError::SearchExhausted { attempts });
        }

        attempts += 1;
        if attempts % PROGRESS_LOG_INTERVAL == 0 {
            info!("{} attempts, last nonce was {} bits wide", attempts, nonce.width());
        }
    }

    // `Candidates` never ends.
    Err(PoWorkError::SearchExhausted { attempts })
}
