//! OCT simulator CLI
//!
//! Command-line front-end for the spectral-domain OCT pipeline.
//!
//! Usage:
//!   octsim ascan [--layer AMP:DEPTH ...] [--noise <σ>] [--seed <n>]
//!   octsim bscan [--lines <n>] [--policy <global|truncated|both>]
//!   octsim info
//!   octsim benchmark [--iterations <n>]

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use oct_core::analysis::{find_peaks, locate_layers};
use oct_core::{CompressionParams, Layer, LineMatrix, OctConfig, Pipeline, PipelineOutput};

/// Spectral-domain OCT simulator
#[derive(Parser)]
#[command(name = "octsim")]
#[command(version)]
#[command(about = "Synthesize OCT interferograms and reconstruct 8-bit depth images", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a single A-scan and report the detected layers
    Ascan {
        #[command(flatten)]
        sim: SimArgs,
    },

    /// Simulate a B-scan of independent lines
    Bscan {
        #[command(flatten)]
        sim: SimArgs,

        /// Number of scan lines
        #[arg(short, long, default_value = "100")]
        lines: usize,
    },

    /// Show derived axes and expected layer bins
    Info {
        #[command(flatten)]
        sim: SimArgs,
    },

    /// Time the full pipeline
    Benchmark {
        #[command(flatten)]
        sim: SimArgs,

        /// Number of scan lines
        #[arg(short, long, default_value = "100")]
        lines: usize,

        /// Number of iterations
        #[arg(short, long, default_value = "10")]
        iterations: u32,
    },
}

#[derive(Args, Clone)]
struct SimArgs {
    /// Samples per spectral line
    #[arg(short = 'n', long, default_value = "1024")]
    samples: usize,

    /// Shortest source wavelength
    #[arg(long, default_value = "820")]
    lambda_min: f64,

    /// Longest source wavelength
    #[arg(long, default_value = "880")]
    lambda_max: f64,

    /// Reflector as AMPLITUDE:DEPTH (repeatable)
    #[arg(long = "layer", value_parser = parse_layer, default_values = ["80:60000", "8:500000"])]
    layers: Vec<Layer>,

    /// Gaussian noise standard deviation
    #[arg(long, default_value = "10")]
    noise: f64,

    /// Base random seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// dB value mapped to pixel 0 by the truncation policy
    #[arg(long, default_value = "-10", allow_hyphen_values = true)]
    floor_db: f64,

    /// dB span mapped onto [0, 255] by the truncation policy
    #[arg(long, default_value = "38")]
    range_db: f64,

    /// Which 8-bit images to report
    #[arg(short, long, value_enum, default_value = "both")]
    policy: PolicyChoice,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PolicyChoice {
    /// Global min/max normalization
    Global,
    /// Fixed floor/range truncation
    Truncated,
    /// Both images
    Both,
}

fn parse_layer(s: &str) -> Result<Layer, String> {
    let (amp, depth) = s
        .split_once(':')
        .ok_or_else(|| format!("expected AMPLITUDE:DEPTH, got '{}'", s))?;
    let amplitude: f64 = amp
        .trim()
        .parse()
        .map_err(|e| format!("bad amplitude '{}': {}", amp, e))?;
    let depth: f64 = depth
        .trim()
        .parse()
        .map_err(|e| format!("bad depth '{}': {}", depth, e))?;
    Ok(Layer::new(amplitude, depth))
}

impl SimArgs {
    fn to_config(&self, n_lines: usize) -> OctConfig {
        OctConfig {
            n_samples: self.samples,
            lambda_min: self.lambda_min,
            lambda_max: self.lambda_max,
            layers: self.layers.clone(),
            noise_amp: self.noise,
            n_lines,
            seed: self.seed,
            compression: CompressionParams {
                floor_db: self.floor_db,
                range_db: self.range_db,
            },
        }
    }
}

// ============================================================================
// Reporting helpers
// ============================================================================

fn value_range(data: &[f64]) -> (f64, f64) {
    data.iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

fn print_image_stats(name: &str, image: &LineMatrix<u8>) {
    let px = image.as_slice();
    let zeros = px.iter().filter(|&&v| v == 0).count();
    let full = px.iter().filter(|&&v| v == 255).count();
    let mean = px.iter().map(|&v| v as f64).sum::<f64>() / px.len().max(1) as f64;
    println!(
        "  {:<10} {:?}  mean={:.1}  zeros={}  saturated={}",
        name,
        image.shape(),
        mean,
        zeros,
        full
    );
}

fn print_images(out: &PipelineOutput, policy: PolicyChoice) {
    if policy != PolicyChoice::Truncated {
        print_image_stats("global", &out.global_8bit);
    }
    if policy != PolicyChoice::Global {
        print_image_stats("truncated", &out.truncated_8bit);
    }
}

// ============================================================================
// Commands Implementation
// ============================================================================

fn cmd_ascan(sim: SimArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("OCT A-scan Simulator v{}", env!("CARGO_PKG_VERSION"));
    println!("==========================");

    let pipeline = Pipeline::new(sim.to_config(1))?;
    let out = pipeline.run()?;
    let profile = out.linear.row(0);

    println!("Samples: {}  Depth bins: {}", out.wavenumbers.len(), out.depths.len());
    println!("Noise: {}  Seed: {}", sim.noise, sim.seed);
    println!();

    println!("Layers:");
    let located = locate_layers(profile, &out.depths, &pipeline.config().layers, 2);
    for (layer, peak) in pipeline.config().layers.iter().zip(&located) {
        match peak {
            Some(p) => println!(
                "  amp={:<8} depth={:<10} -> bin {:>4}  z={:.1}  |A|={:.3}  ({:.1} dB)",
                layer.amplitude,
                layer.depth,
                p.bin,
                p.depth,
                p.magnitude,
                p.magnitude_db()
            ),
            None => println!(
                "  amp={:<8} depth={:<10} -> beyond measurable depth",
                layer.amplitude, layer.depth
            ),
        }
    }
    if let [Some(a), Some(b), ..] = located.as_slice() {
        println!("  Peak ratio (first/second): {:.2}", a.magnitude / b.magnitude);
    }

    println!("\nStrongest peaks:");
    for p in find_peaks(profile, &out.depths, 5) {
        println!("  bin {:>4}  z={:.1}  |A|={:.3}", p.bin, p.depth, p.magnitude);
    }

    let (lo, hi) = value_range(out.log.as_slice());
    println!("\nLog profile: {:.1} .. {:.1} dB", lo, hi);
    print_images(&out, sim.policy);
    Ok(())
}

fn cmd_bscan(sim: SimArgs, lines: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("OCT B-scan Simulator v{}", env!("CARGO_PKG_VERSION"));
    println!("==========================");

    let start = Instant::now();
    let out = Pipeline::new(sim.to_config(lines))?.run()?;
    let elapsed = start.elapsed();

    let (raw_lo, raw_hi) = value_range(out.raw.as_slice());
    let (lin_lo, lin_hi) = value_range(out.linear.as_slice());
    let (log_lo, log_hi) = value_range(out.log.as_slice());

    println!("Raw signal:    {:?}  {:.1} .. {:.1}", out.raw.shape(), raw_lo, raw_hi);
    print_image_stats("raw 8-bit", &out.raw_8bit);
    println!("Linear depth:  {:?}  {:.3} .. {:.3}", out.linear.shape(), lin_lo, lin_hi);
    println!("Log depth:     {:?}  {:.1} .. {:.1} dB", out.log.shape(), log_lo, log_hi);
    print_images(&out, sim.policy);
    println!("Time: {:.2}ms", elapsed.as_secs_f64() * 1000.0);
    Ok(())
}

fn cmd_info(sim: SimArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::new(sim.to_config(1))?;
    let k = pipeline.wavenumbers();
    let z = pipeline.depth_axis();

    println!("OCT Configuration");
    println!("=================");
    println!("Wavelengths: {} .. {}", sim.lambda_min, sim.lambda_max);
    println!(
        "Wavenumbers: {:.6e} .. {:.6e} ({} samples, dk={:.4e})",
        pipeline.config().k_min(),
        pipeline.config().k_max(),
        k.len(),
        k.spacing()
    );
    println!(
        "Depth axis:  0 .. {:.1} ({} bins, {:.2} per bin)",
        z.values().last().copied().unwrap_or(0.0),
        z.len(),
        z.resolution()
    );
    println!("Truncation:  floor={} dB range={} dB", sim.floor_db, sim.range_db);
    println!("Layers:");
    for layer in &pipeline.config().layers {
        match z.bin_for_depth(layer.depth) {
            Some(bin) => println!("  amp={} depth={} -> bin {}", layer.amplitude, layer.depth, bin),
            None => println!("  amp={} depth={} -> out of range", layer.amplitude, layer.depth),
        }
    }
    Ok(())
}

fn cmd_benchmark(sim: SimArgs, lines: usize, iterations: u32) -> Result<(), Box<dyn std::error::Error>> {
    println!("OCT Pipeline Benchmark v{}", env!("CARGO_PKG_VERSION"));
    println!("==========================");

    let pipeline = Pipeline::new(sim.to_config(lines))?;
    println!("Lines: {}  Samples: {}", lines, sim.samples);
    println!("Iterations: {}", iterations);

    let mut times = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations {
        let start = Instant::now();
        pipeline.run()?;
        times.push(start.elapsed());
    }

    let avg = times.iter().map(|d| d.as_secs_f64()).sum::<f64>() / iterations.max(1) as f64;
    let lines_per_sec = if avg > 0.0 { lines as f64 / avg } else { f64::INFINITY };
    println!("  Time: {:.2}ms avg", avg * 1000.0);
    println!("  Throughput: {:.0} lines/s", lines_per_sec);
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Ascan { sim } => cmd_ascan(sim),
        Commands::Bscan { sim, lines } => cmd_bscan(sim, lines),
        Commands::Info { sim } => cmd_info(sim),
        Commands::Benchmark { sim, lines, iterations } => cmd_benchmark(sim, lines, iterations),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
