use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::sync::atomic::AtomicBool;

use crate::config::SearchConfig;
use crate::control::{AttemptBudget, CancellationToken, Control};
use crate::error::PoWorkError;
use crate::search::{drive, Attempt, SearchResult};

/// Runs `config.workers()` independent searches, each seeded from `rng`, and
/// returns the first proof found. The others stop at their next attempt.
///
/// `max_attempts` is shared by all workers, and the winner's result counts
/// only its own attempts.
pub fn search_parallel<R: Rng>(
    payload: &[u8],
    config: &SearchConfig,
    rng: &mut R,
    cancel: Option<&CancellationToken>,
) -> Result<SearchResult, PoWorkError> {
    let workers = config.workers();
    if workers == 0 {
        return Err(PoWorkError::InvalidWorkers);
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| PoWorkError::ThreadPool(e.to_string()))?;

    let seeds: Vec<u64> = (0..workers).map(|_| rng.gen()).collect();
    let budget = AttemptBudget::new(config.max_attempts());
    let found = AtomicBool::new(false);

    debug!("Starting {} workers on {}", workers, config.difficulty());

    let winner = pool.install(|| {
        seeds
            .into_par_iter()
            .enumerate()
            .find_map_any(|(worker, seed)| {
                let control = Control::new(&budget, cancel).with_found(&found);
                let mut ignore = |_: &Attempt<'_>| {};
                match drive(
                    payload,
                    config,
                    StdRng::seed_from_u64(seed),
                    &control,
                    &mut ignore,
                ) {
                    Ok(result) => {
                        debug!(
                            "Worker {} found a proof after {} attempts",
                            worker,
                            result.attempts()
                        );
                        Some(result)
                    }
                    Err(e) => {
                        trace!("Worker {} stopped: {}", worker, e);
                        None
                    }
                }
            })
    });

    match winner {
        Some(result) => Ok(result),
        None if cancel.map_or(false, CancellationToken::is_cancelled) => {
            Err(PoWorkError::Cancelled {
                attempts: budget.spent(),
            })
        }
        None => Err(PoWorkError::SearchExhausted {
            attempts: budget.spent(),
        }),
    }
}
