use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use hex::encode as hex_encode;
use log::{LevelFilter, debug, info};
use rand::RngCore;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use strong_core::{StrongRand, StrongSource, chacha_from_source, new_source};

#[derive(Parser)]
#[command(
    name = "strong",
    author,
    version,
    about = "Draw cryptographically-secure random values"
)]
struct Cli {
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DrawKind {
    Uint64,
    Int63,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Dec,
    Hex,
}

#[derive(Subcommand)]
enum Commands {
    /// Print raw draws from the source.
    Draw {
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[arg(long, value_enum, default_value = "uint64")]
        kind: DrawKind,
        #[arg(long, value_enum, default_value = "dec")]
        format: OutputFormat,
    },
    /// Roll dice.
    Dice {
        #[arg(long, default_value_t = 6)]
        sides: u64,
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Sample bounded integers, floats, exponential and normal variates.
    Variates {
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Keep pulling the trigger while a Bernoulli(p) trial succeeds.
    Roulette {
        #[arg(long, default_value_t = 0.9)]
        p: f64,
        #[arg(long, value_name = "MS", default_value_t = 0)]
        delay_ms: u64,
        #[arg(long, value_name = "N", default_value_t = 1000)]
        max_rounds: u64,
    },
    /// Report how balanced the bits of many draws are.
    Bits {
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Draw from one shared source on several threads at once.
    Concurrency {
        #[arg(long, default_value_t = 8)]
        threads: usize,
        #[arg(long, default_value_t = 1000)]
        draws: usize,
    },
    /// Key a ChaCha20 stream from the source and print its output.
    Chacha {
        #[arg(long, default_value_t = 4)]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let source = new_source();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Draw {
            count,
            kind,
            format,
        } => cmd_draw(&mut out, &source, count, kind, format),
        Commands::Dice { sides, count } => cmd_dice(&mut out, &source, sides, count),
        Commands::Variates { count } => cmd_variates(&mut out, &source, count),
        Commands::Roulette {
            p,
            delay_ms,
            max_rounds,
        } => cmd_roulette(&mut out, &source, p, delay_ms, max_rounds),
        Commands::Bits { samples, out: path } => cmd_bits(&mut out, &source, samples, path),
        Commands::Concurrency { threads, draws } => {
            cmd_concurrency(&mut out, &source, threads, draws)
        }
        Commands::Chacha { count } => cmd_chacha(&mut out, &source, count),
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn cmd_draw<W: Write>(
    out: &mut W,
    source: &StrongSource,
    count: usize,
    kind: DrawKind,
    format: OutputFormat,
) -> Result<()> {
    for _ in 0..count {
        let value = match kind {
            DrawKind::Uint64 => source.uint64(),
            DrawKind::Int63 => source.int63() as u64,
        };
        let written = match format {
            OutputFormat::Dec => writeln!(out, "{value}"),
            OutputFormat::Hex => writeln!(out, "{}", hex_encode(value.to_be_bytes())),
        };
        written.context("writing draw")?;
    }
    debug!("printed {count} {kind:?} draws");
    Ok(())
}

fn cmd_dice<W: Write>(out: &mut W, source: &StrongSource, sides: u64, count: usize) -> Result<()> {
    if sides == 0 {
        bail!("A die needs at least one side.");
    }
    let mut rng = StrongRand::new(source);
    let rolls = (0..count)
        .map(|_| rng.intn(sides).map(|face| face + 1))
        .collect::<Result<Vec<_>, _>>()?;
    let line = rolls
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{line}")?;
    Ok(())
}

#[derive(Serialize)]
struct VariateSample {
    intn_6: u64,
    float64: f64,
    exp_float64: f64,
    norm_float64: f64,
}

fn cmd_variates<W: Write>(out: &mut W, source: &StrongSource, count: usize) -> Result<()> {
    let mut rng = StrongRand::new(source);
    for _ in 0..count {
        let sample = VariateSample {
            intn_6: 1 + rng.intn(6)?,
            float64: 1.0 + rng.float64() * 10.0,
            exp_float64: rng.exp_float64() * 1000.0,
            norm_float64: 100.0 + rng.norm_float64() * 15.0,
        };
        writeln!(out, "{}", serde_json::to_string(&sample)?)?;
    }
    Ok(())
}

fn cmd_roulette<W: Write>(
    out: &mut W,
    source: &StrongSource,
    p: f64,
    delay_ms: u64,
    max_rounds: u64,
) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        bail!("--p must be a probability in [0, 1], got {p}");
    }
    if max_rounds == 0 {
        bail!("--max-rounds must be positive.");
    }
    let mut rng = StrongRand::new(source);
    let mut rounds = 0;
    while rounds < max_rounds && rng.bernoulli(p) {
        write!(out, "Click. ")?;
        out.flush()?;
        rounds += 1;
        if delay_ms > 0 {
            thread::sleep(Duration::from_millis(delay_ms));
        }
    }
    if rounds == max_rounds {
        writeln!(out, "\n\nSurvived {rounds} rounds.")?;
    } else {
        writeln!(out, "\n\nGame over.")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct BitReport {
    samples: usize,
    ones: u64,
    ratio: f64,
    per_bit: Vec<f64>,
    distinct: usize,
}

fn cmd_bits<W: Write>(
    out: &mut W,
    source: &StrongSource,
    samples: usize,
    path: Option<PathBuf>,
) -> Result<()> {
    if samples == 0 {
        bail!("--samples must be positive.");
    }
    let draws: Vec<u64> = (0..samples).map(|_| source.uint64()).collect();
    let ones: u64 = draws.iter().map(|d| u64::from(d.count_ones())).sum();
    let per_bit = (0..64)
        .map(|bit| {
            let set = draws.iter().filter(|&&d| (d >> bit) & 1 == 1).count();
            set as f64 / samples as f64
        })
        .collect();
    let report = BitReport {
        samples,
        ones,
        ratio: ones as f64 / (samples as f64 * 64.0),
        per_bit,
        distinct: draws.iter().collect::<HashSet<_>>().len(),
    };
    info!("bit ratio {:.4} over {} draws", report.ratio, samples);
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    if let Some(path) = path {
        save_json(&path, "bit report", &report)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct ConcurrencyReport {
    threads: usize,
    draws_per_thread: usize,
    distinct: usize,
}

fn cmd_concurrency<W: Write>(
    out: &mut W,
    source: &StrongSource,
    threads: usize,
    draws: usize,
) -> Result<()> {
    if threads == 0 {
        bail!("--threads must be positive.");
    }
    let batches: Vec<Vec<u64>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                scope.spawn(move || {
                    let mut rng = StrongRand::new(source);
                    (0..draws).map(|_| rng.uint64()).collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().map_err(|_| anyhow::anyhow!("worker thread panicked")))
            .collect::<Result<_>>()
    })?;
    let distinct = batches.iter().flatten().collect::<HashSet<_>>().len();
    let report = ConcurrencyReport {
        threads,
        draws_per_thread: draws,
        distinct,
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}

fn cmd_chacha<W: Write>(out: &mut W, source: &StrongSource, count: usize) -> Result<()> {
    let mut rng = chacha_from_source(source);
    for _ in 0..count {
        writeln!(out, "{}", rng.next_u64())?;
    }
    Ok(())
}

fn save_json<T: ?Sized + Serialize>(path: &Path, label: &str, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value)?;
    fs::write(path, data).with_context(|| format!("writing {} to {}", label, path.display()))?;
    info!("wrote {} to {}", label, path.display());
    Ok(())
}
