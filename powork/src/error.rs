use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoWorkError {
    #[error("Difficulty must be an integer between 0 and 256, found {0}")]
    InvalidDifficulty(String),

    #[error("No proof found after {attempts} attempts")]
    SearchExhausted { attempts: u64 },

    #[error("Search cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },

    #[error("Strategy must be linear or accumulative, found {0:?}")]
    InvalidStrategy(String),

    #[error("Nonce must only contain binary digits, found {0:?}")]
    InvalidNonce(char),

    #[error("Worker count must be greater than 0")]
    InvalidWorkers,

    #[error("Could not build the worker pool: {0}")]
    ThreadPool(String),
}
