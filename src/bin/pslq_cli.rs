//! Command-line front-end for the PSLQ integer-relation detector.
//!
//! Reads a list of high-precision decimal inputs, runs the detector, and
//! prints whichever of "relation found" / "no relation" / an error message
//! applies.

#![forbid(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::Parser;
use rug::Float;

use pslq::{pslq_with_config, PslqConfig, PslqOutcome};

/// Search for an integer relation among a list of real numbers.
#[derive(Parser)]
#[command(name = "pslq-cli")]
#[command(about = "Find an integer relation r such that sum(r_i * x_i) = 0", long_about = None)]
#[command(version)]
struct Cli {
    /// Input values, whitespace- or comma-separated high-precision decimals
    /// (e.g. "1.4142135623730951,2.2360679774997896").
    #[arg(required = true)]
    values: Vec<String>,

    /// Ceiling on the Euclidean norm of the relation's coefficient vector.
    #[arg(long, default_value = "1e12")]
    max_norm: String,

    /// Algorithm control parameter; must exceed 2/sqrt(3). Defaults to the
    /// crate's standard choice when omitted.
    #[arg(long)]
    gamma: Option<String>,

    /// Working precision, in bits of mantissa, for all internal arithmetic.
    #[arg(long, default_value_t = 256)]
    precision_bits: u32,

    /// Enable verbose (debug-level) logging of each round.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let prec = cli.precision_bits;
    let values = split_values(&cli.values);
    if values.len() < 2 {
        bail!("need at least 2 input values, got {}", values.len());
    }

    let x: Vec<Float> = values
        .iter()
        .map(|s| {
            Float::parse(s)
                .map(|parsed| Float::with_val(prec, parsed))
                .map_err(|e| anyhow::anyhow!("invalid decimal value `{s}`: {e}"))
        })
        .collect::<Result<_>>()?;

    let max_norm = Float::parse(&cli.max_norm)
        .map(|p| Float::with_val(prec, p))
        .with_context(|| format!("invalid --max-norm value `{}`", cli.max_norm))?;

    let gamma = match &cli.gamma {
        Some(g) => Some(
            Float::parse(g)
                .map(|p| Float::with_val(prec, p))
                .with_context(|| format!("invalid --gamma value `{g}`"))?,
        ),
        None => None,
    };
    let gamma = gamma.unwrap_or_else(|| pslq::default_gamma(prec));

    let config = PslqConfig {
        precision_bits: prec,
        ..Default::default()
    };

    let report = pslq_with_config(x.clone(), max_norm, gamma, &config, None)
        .context("PSLQ run failed")?;

    match report.outcome {
        PslqOutcome::Relation(relation) => {
            println!("relation found after {} round(s):", report.rounds);
            for (coeff, value) in &relation {
                println!("  {coeff} * {value}");
            }
            if let Some(warning) = &report.warning {
                eprintln!("warning: {warning:?}");
            }
        }
        PslqOutcome::NoRelation { reached_norm_bound } => {
            println!(
                "no relation found within {} round(s); certified norm bound reached {}",
                report.rounds, reached_norm_bound
            );
        }
    }

    Ok(())
}

/// Split the positional `values` arguments on commas and/or whitespace, so
/// both `pslq-cli 1.0 2.0` and `pslq-cli "1.0, 2.0"` work.
fn split_values(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|a| a.split(','))
        .flat_map(|a| a.split_whitespace())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
