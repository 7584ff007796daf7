use crate::constants::DEFAULT_WORKERS;
use crate::difficulty::Difficulty;
use crate::generator::Strategy;

/// Parameters of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    difficulty: Difficulty,
    strategy: Strategy,
    max_attempts: Option<u64>,
    workers: usize,
}

impl SearchConfig {
    pub fn new(difficulty: Difficulty, strategy: Strategy) -> Self {
        SearchConfig {
            difficulty,
            strategy,
            max_attempts: None,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Candidates allowed after the initial one. `None` searches until success.
    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Only used by the parallel search.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn max_attempts(&self) -> Option<u64> {
        self.max_attempts
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}
