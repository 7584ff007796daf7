use anyhow::{bail, Context, Result};
use log::{info, warn, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::io::{self, Write};
use structopt::StructOpt;

use hashpuzzle_powork::constants::DEFAULT_PAYLOAD;
use hashpuzzle_powork::{
    digest, meets_difficulty, search_parallel, Attempt, Difficulty, Hash, Nonce,
    ProofOfWorkSearch, SearchConfig, SearchResult, Strategy,
};

#[derive(Debug, StructOpt)]
#[structopt(about = "Trailing-zero proof-of-work solver")]
struct Opt {
    /// Log verbosity, repeat for more (-v info, -vv debug, -vvv trace)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Find a nonce whose digest ends with the required zero bits
    Solve(SolveArgs),
    /// Check a nonce against a payload and difficulty
    Verify(VerifyArgs),
}

#[derive(Debug, StructOpt)]
struct SolveArgs {
    /// Message to prove
    #[structopt(default_value = DEFAULT_PAYLOAD)]
    payload: String,

    /// Required trailing zero bits [0-256]
    #[structopt(short, long, allow_hyphen_values = true)]
    difficulty: Difficulty,

    #[structopt(
        short,
        long,
        default_value = "linear",
        possible_values = &["linear", "accumulative"]
    )]
    strategy: Strategy,

    /// Give up after this many candidates past the initial one
    #[structopt(short, long)]
    max_attempts: Option<u64>,

    /// Seed of the nonce generator, random when omitted
    #[structopt(long)]
    seed: Option<u64>,

    /// Independent search workers
    #[structopt(short, long, default_value = "1")]
    workers: usize,

    /// Print every candidate and its digest
    #[structopt(long)]
    show_attempts: bool,
}

#[derive(Debug, StructOpt)]
struct VerifyArgs {
    #[structopt(default_value = DEFAULT_PAYLOAD)]
    payload: String,

    #[structopt(short, long, allow_hyphen_values = true)]
    difficulty: Difficulty,

    /// Nonce as binary digits, leading zeros included
    #[structopt(short, long)]
    nonce: Nonce,

    /// Expected digest in hexadecimal
    #[structopt(long)]
    digest: Option<Hash>,
}

fn init_logger(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("could not initialize the logger")
}

fn print_result<W: Write>(out: &mut W, result: &SearchResult, payload: &str) -> io::Result<()> {
    writeln!(out, "Attempts: {}", result.attempts())?;
    writeln!(out, "Hash: {}", result.digest().to_binary())?;
    writeln!(out, "Id: {}{}", result.nonce(), payload)?;
    writeln!(out, "Nonce bits: {}", result.nonce())?;
    writeln!(out, "Digest: {}", result.digest_hex())
}

fn solve<W: Write>(args: SolveArgs, out: &mut W) -> Result<()> {
    let config = SearchConfig::new(args.difficulty, args.strategy)
        .with_max_attempts(args.max_attempts)
        .with_workers(args.workers);
    let payload = args.payload.as_bytes();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        "Solving {:?} at {} with the {} strategy",
        args.payload, args.difficulty, args.strategy
    );

    // Zero workers goes to the parallel search, which rejects it.
    let result = match args.workers {
        1 => {
            let mut search = ProofOfWorkSearch::new(payload, config);
            if args.show_attempts {
                let out = &mut *out;
                search = search.with_observer(move |attempt: &Attempt<'_>| {
                    let _ = writeln!(
                        out,
                        "{}: {} -> {}",
                        attempt.attempt,
                        attempt.nonce,
                        attempt.digest.to_hex()
                    );
                });
            }
            search.run(&mut rng)
        }
        _ => {
            if args.show_attempts {
                warn!("--show-attempts is ignored with several workers");
            }
            search_parallel(payload, &config, &mut rng, None)
        }
    }
    .context("search failed")?;

    print_result(out, &result, &args.payload).context("could not write the result")
}

fn verify(args: VerifyArgs) -> Result<()> {
    let computed = digest(&args.nonce, args.payload.as_bytes());
    println!("Digest: {}", computed.to_hex());

    if let Some(expected) = args.digest {
        if expected != computed {
            bail!(
                "digest mismatch: expected {}, computed {}",
                expected.to_hex(),
                computed.to_hex()
            );
        }
    }

    if !meets_difficulty(&computed, args.difficulty) {
        bail!(
            "digest has {} trailing zero bits, {} required",
            computed.trailing_zeros(),
            args.difficulty.bits()
        );
    }

    println!("Valid proof");
    Ok(())
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    init_logger(opt.verbose)?;

    match opt.command {
        Command::Solve(args) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            solve(args, &mut out)
        }
        Command::Verify(args) => verify(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashpuzzle_powork::constants::DEFAULT_WORKERS;

    fn parse(args: &[&str]) -> std::result::Result<Opt, structopt::clap::Error> {
        Opt::from_iter_safe(std::iter::once("hashpuzzle").chain(args.iter().cloned()))
    }

    fn solve_args(args: &[&str]) -> SolveArgs {
        match parse(args).unwrap().command {
            Command::Solve(args) => args,
            other => panic!("unexpected command {:?}", other),
        }
    }

    fn solve_output(args: &[&str]) -> Result<String> {
        let mut out = Vec::new();
        solve(solve_args(args), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_solve_defaults() {
        let opt = parse(&["solve", "-d", "8"]).unwrap();
        match opt.command {
            Command::Solve(args) => {
                assert_eq!(args.payload, DEFAULT_PAYLOAD);
                assert_eq!(args.difficulty.bits(), 8);
                assert_eq!(args.strategy, Strategy::Linear);
                assert_eq!(args.workers, DEFAULT_WORKERS);
                assert_eq!(args.max_attempts, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_invalid_difficulty() {
        assert!(parse(&["solve", "-d", "-3"]).is_err());
        assert!(parse(&["solve", "-d", "1.5"]).is_err());
        assert!(parse(&["solve", "-d", "300"]).is_err());
    }

    #[test]
    fn test_verify_args() {
        let opt = parse(&["-vv", "verify", "hello", "-d", "0", "--nonce", "0101"]).unwrap();
        assert_eq!(opt.verbose, 2);
        match opt.command {
            Command::Verify(args) => {
                assert_eq!(args.payload, "hello");
                assert_eq!(args.nonce.to_string(), "0101");
                assert!(args.digest.is_none());
                assert!(verify(args).is_ok());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_verify_rejects_wrong_digest() {
        let args = VerifyArgs {
            payload: "hello".to_string(),
            difficulty: Difficulty::new(0).unwrap(),
            nonce: "1".parse().unwrap(),
            digest: Some(Hash::zero()),
        };
        assert!(verify(args).is_err());
    }

    #[test]
    fn test_solve_prints_result() {
        let output = solve_output(&["solve", "-d", "4", "--seed", "7"]).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);

        assert!(lines[0].strip_prefix("Attempts: ").unwrap().parse::<u64>().is_ok());

        let binary = lines[1].strip_prefix("Hash: ").unwrap();
        assert_eq!(binary.len(), Hash::BITS);
        assert!(binary.ends_with("0000"));

        let nonce = lines[3].strip_prefix("Nonce bits: ").unwrap();
        assert_eq!(lines[2], format!("Id: {}{}", nonce, DEFAULT_PAYLOAD));

        let computed = digest(&nonce.parse().unwrap(), DEFAULT_PAYLOAD.as_bytes());
        assert_eq!(lines[4], format!("Digest: {}", computed.to_hex()));
        assert_eq!(binary, computed.to_binary());
    }

    #[test]
    fn test_solve_is_reproducible_with_seed() {
        let args = ["solve", "other", "-d", "6", "-s", "accumulative", "--seed", "3"];
        assert_eq!(solve_output(&args).unwrap(), solve_output(&args).unwrap());
    }

    #[test]
    fn test_solve_shows_attempts() {
        let output = solve_output(&["solve", "-d", "3", "--seed", "1", "--show-attempts"]).unwrap();
        let attempts: u64 = output
            .lines()
            .find_map(|line| line.strip_prefix("Attempts: "))
            .unwrap()
            .parse()
            .unwrap();
        assert!(output.starts_with("0: "));
        assert_eq!(output.lines().count() as u64, attempts + 1 + 5);
    }

    #[test]
    fn test_solve_exhausted_fails() {
        assert!(solve_output(&["solve", "-d", "256", "--max-attempts", "0"]).is_err());
    }

    #[test]
    fn test_solve_with_workers() {
        let output = solve_output(&["solve", "-d", "4", "--seed", "5", "-w", "2"]).unwrap();
        assert!(output.starts_with("Attempts: "));
        assert!(solve_output(&["solve", "-d", "4", "-w", "0"]).is_err());
    }
}
