use std::{fs, path::PathBuf, time::Instant};

use anyhow::{bail, Context, Result};
use boundsort::{BoundsFormat, PathOption, TimSortBuilder, DEFAULT_MANTISSA_WIDTH};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Bounds formats selectable from the command line
#[derive(Debug, Copy, Clone, ValueEnum)]
enum Format {
    Precise,
    Compressed,
    Opaque,
}

/// Sort a random chunk of integers with the bounded-reference timsort
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Number of elements to sort
    #[arg(short, long, default_value_t = 8192)]
    length: usize,

    /// Seed for the random data; a fresh seed is used when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file with sorter settings; other flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Length of the initial insertion-sorted runs
    #[arg(short, long)]
    run_length: Option<usize>,

    /// How bounds metadata is stored
    #[arg(short, long, value_enum)]
    bounds: Option<Format>,

    /// Mantissa width for the compressed bounds format [default: the
    /// config's width, or 14]
    #[arg(short, long)]
    mantissa_width: Option<u32>,

    /// Which primitives may be used: try-bounded, classic-only or bounded-only
    #[arg(short, long)]
    path: Option<PathOption>,

    /// Print the sort statistics as JSON
    #[arg(long)]
    json: bool,
}

/// Apply the bounds flags on top of the configured format.
///
/// A compressed format keeps the configured mantissa width unless
/// `--mantissa-width` is given.
fn resolve_bounds(
    configured: BoundsFormat,
    format: Option<Format>,
    mantissa_width: Option<u32>,
) -> BoundsFormat {
    let configured_width = match configured {
        BoundsFormat::Compressed { mantissa_width } => Some(mantissa_width),
        _ => None,
    };
    let compressed = || BoundsFormat::Compressed {
        mantissa_width: mantissa_width
            .or(configured_width)
            .unwrap_or(DEFAULT_MANTISSA_WIDTH),
    };
    match format {
        Some(Format::Precise) => BoundsFormat::Precise,
        Some(Format::Compressed) => compressed(),
        Some(Format::Opaque) => BoundsFormat::Opaque,
        None if configured_width.is_some() => compressed(),
        None => configured,
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // Settings from file first, then flags on top
    let mut builder = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<TimSortBuilder>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => TimSortBuilder::new(),
    };
    if let Some(run_length) = args.run_length {
        builder.run_length(run_length);
    }
    let configured = builder.build()?.bounds();
    builder.bounds(resolve_bounds(configured, args.bounds, args.mantissa_width));
    if let Some(path) = args.path {
        builder.path(path);
    }
    let sorter = builder.build()?;

    // Create test data
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);
    let mut array: Vec<i32> = (0..args.length).map(|_| rng.random()).collect();
    let mut reference = array.clone();
    info!(
        "sorting {} elements (seed {}) with {:?}",
        args.length, seed, sorter
    );

    // Sort
    let timer = Instant::now();
    let stats = sorter.sort(&mut array)?;
    info!("sorted in {} micros", timer.elapsed().as_micros());
    info!(
        "entry: {}, runs: {} bounded / {} classic, merges: {} bounded / {} classic",
        stats
            .entry()
            .map_or_else(|| "none".to_string(), |path| path.to_string()),
        stats.runs().bounded(),
        stats.runs().classic(),
        stats.merges().bounded(),
        stats.merges().classic()
    );

    // Check against the standard library
    reference.sort();
    if !boundsort::is_sorted(&array) {
        bail!("output is not sorted");
    }
    if array != reference {
        bail!("output differs from the reference sort");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{resolve_bounds, Format};
    use boundsort::{BoundsFormat, DEFAULT_MANTISSA_WIDTH};

    const CONFIGURED: BoundsFormat = BoundsFormat::Compressed { mantissa_width: 8 };

    #[test]
    fn config_width_survives_format_flag() {
        assert_eq!(
            resolve_bounds(CONFIGURED, Some(Format::Compressed), None),
            CONFIGURED
        );
        assert_eq!(resolve_bounds(CONFIGURED, None, None), CONFIGURED);
    }

    #[test]
    fn width_flag_overrides_config() {
        let expected = BoundsFormat::Compressed { mantissa_width: 10 };
        assert_eq!(resolve_bounds(CONFIGURED, None, Some(10)), expected);
        assert_eq!(
            resolve_bounds(CONFIGURED, Some(Format::Compressed), Some(10)),
            expected
        );
    }

    #[test]
    fn compressed_without_config_uses_default_width() {
        assert_eq!(
            resolve_bounds(BoundsFormat::Precise, Some(Format::Compressed), None),
            BoundsFormat::Compressed {
                mantissa_width: DEFAULT_MANTISSA_WIDTH
            }
        );
        assert_eq!(
            resolve_bounds(BoundsFormat::Precise, None, Some(10)),
            BoundsFormat::Precise
        );
        assert_eq!(
            resolve_bounds(CONFIGURED, Some(Format::Opaque), Some(10)),
            BoundsFormat::Opaque
        );
    }
}
