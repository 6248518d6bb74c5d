//! Command-line front end for the stretch node.
//!
//! Inputs come from a YAML/JSON snapshot (`--file`), individual flags, or
//! both; flags win over file values and absent channels take their schema
//! defaults.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use glam::DVec3;
use log::{LevelFilter, info};
use rand::{SeedableRng, rngs::StdRng};
use stretch_core::{
    StretchError, StretchEvaluator, StretchInputs, VERSION, config,
    pose::random_pose,
    schema::{AttrValue, AttributeSpec, STRETCH_SCHEMA},
};

#[derive(Parser, Debug)]
#[command(name = "stretch-node", version = VERSION, about = "IK stretch/squash evaluator")]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate once and print the three output channels
    Eval {
        #[command(flatten)]
        inputs: InputArgs,
        /// Fail on undefined results instead of printing inf/NaN
        #[arg(long)]
        strict: bool,
    },
    /// Print every intermediate value of one evaluation
    Inspect {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Print the attribute table and dependency edges
    Schema,
    /// Evaluate random poses and report output ranges
    Sweep {
        #[arg(long, default_value_t = 1000)]
        count: usize,
        #[arg(long, default_value_t = 10.0)]
        half_range: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1.0)]
        enable: f64,
        #[arg(long, default_value_t = 1.0)]
        stretch_distance: f64,
        #[arg(long, default_value_t = 1.0)]
        volume: f64,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// YAML or JSON input snapshot
    #[arg(long)]
    file: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    enable: Option<f64>,
    /// Root joint position as X,Y,Z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    root: Option<DVec3>,
    /// End joint position as X,Y,Z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    end: Option<DVec3>,
    #[arg(long, allow_hyphen_values = true)]
    stretch_distance: Option<f64>,
    /// Volume preservation exponent
    #[arg(long, allow_hyphen_values = true)]
    volume: Option<f64>,
    /// Skip attribute range constraints
    #[arg(long)]
    raw: bool,
}

impl InputArgs {
    fn resolve(&self) -> Result<StretchInputs> {
        let mut inputs = match &self.file {
            Some(path) => config::load_from_path(path)
                .with_context(|| format!("failed to load inputs from {path}"))?,
            None => StretchInputs::default(),
        };

        if let Some(v) = self.enable {
            inputs.enable = v;
        }
        if let Some(v) = self.root {
            inputs.root_position = v;
        }
        if let Some(v) = self.end {
            inputs.end_position = v;
        }
        if let Some(v) = self.stretch_distance {
            inputs.stretch_distance = v;
        }
        if let Some(v) = self.volume {
            inputs.volume_preservation = v;
        }

        Ok(if self.raw {
            inputs
        } else {
            inputs.constrained()
        })
    }
}

fn parse_vec3(s: &str) -> Result<DVec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(DVec3::new(*x, *y, *z)),
        _ => Err(format!("expected X,Y,Z, got {} components", parts.len())),
    }
}

fn fmt_default(value: &AttrValue) -> String {
    match value {
        AttrValue::Float(v) => format!("{v}"),
        AttrValue::Double3(v) => format!("({}, {}, {})", v.x, v.y, v.z),
    }
}

fn fmt_bound(bound: Option<f64>) -> String {
    bound.map_or_else(|| "-".to_string(), |b| b.to_string())
}

/// Host flags as `krws`, with `-` for each flag that is off.
fn attr_flags(a: &AttributeSpec) -> String {
    [
        (a.keyable, 'k'),
        (a.readable, 'r'),
        (a.writable, 'w'),
        (a.storable, 's'),
    ]
    .iter()
    .map(|&(on, c)| if on { c } else { '-' })
    .collect()
}

fn rejection_kind(err: &StretchError) -> &'static str {
    match err {
        StretchError::InvalidDivisor(_) => "invalid divisor",
        StretchError::NonFiniteInput(_) => "non-finite input",
        StretchError::DomainError { .. } => "domain error",
        StretchError::SingularVolume(_) => "singular volume",
        _ => "other",
    }
}

#[derive(Debug, Default)]
struct SweepSummary {
    accepted: usize,
    stretch: Option<(f64, f64)>,
    volume: Option<(f64, f64)>,
    rejected: BTreeMap<&'static str, usize>,
}

fn widen(range: &mut Option<(f64, f64)>, v: f64) {
    *range = Some(match *range {
        Some((lo, hi)) => (lo.min(v), hi.max(v)),
        None => (v, v),
    });
}

fn sweep(
    count: usize,
    half_range: f64,
    seed: u64,
    enable: f64,
    stretch_distance: f64,
    volume: f64,
) -> SweepSummary {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut summary = SweepSummary::default();

    for _ in 0..count {
        let (root, end) = random_pose(&mut rng, half_range);
        match StretchEvaluator::try_evaluate(enable, root, end, stretch_distance, volume) {
            Ok(out) => {
                summary.accepted += 1;
                widen(&mut summary.stretch, out.stretch);
                widen(&mut summary.volume, out.volume);
            }
            Err(err) => *summary.rejected.entry(rejection_kind(&err)).or_default() += 1,
        }
    }
    summary
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match cli.cmd {
        Command::Eval { inputs, strict } => {
            let inputs = inputs.resolve()?;
            let out = if strict {
                inputs.try_evaluate()?
            } else {
                inputs.evaluate()
            };
            let c = out.channels();
            println!("{} {} {}", c.x, c.y, c.z);
        }
        Command::Inspect { inputs } => {
            let inputs = inputs.resolve()?;
            let e = inputs.breakdown();
            println!("inputs:");
            println!("  enable:             {}", inputs.enable);
            println!("  rootPosition:       {}", inputs.root_position);
            println!("  endPosition:        {}", inputs.end_position);
            println!("  stretchDistance:    {}", inputs.stretch_distance);
            println!("  volumePreservation: {}", inputs.volume_preservation);
            println!("distance:          {}", e.distance);
            println!("raw stretch:       {}", e.raw_stretch);
            println!("blend:             {}", e.blend);
            println!("pre-floor stretch: {}", e.pre_floor_stretch);
            println!("stretch:           {}", e.output.stretch);
            println!("volume:            {}", e.output.volume);
            if let Err(err) = inputs.try_evaluate() {
                println!("warning:           {err}");
            }
        }
        Command::Schema => {
            println!(
                "{:<20} {:<7} {:<8} {:<16} {:<6} {:<6} flags",
                "name", "short", "kind", "default", "min", "max"
            );
            for a in STRETCH_SCHEMA.attributes {
                println!(
                    "{:<20} {:<7} {:<8} {:<16} {:<6} {:<6} {}",
                    a.long_name,
                    a.short_name,
                    a.kind.name(),
                    fmt_default(&a.default),
                    fmt_bound(a.min),
                    fmt_bound(a.max),
                    attr_flags(a)
                );
            }
            println!();
            for (src, dst) in STRETCH_SCHEMA.affects {
                println!(
                    "{} -> {}",
                    STRETCH_SCHEMA.attribute(*src).long_name,
                    STRETCH_SCHEMA.attribute(*dst).long_name
                );
            }
        }
        Command::Sweep {
            count,
            half_range,
            seed,
            enable,
            stretch_distance,
            volume,
        } => {
            if count == 0 {
                bail!("--count must be at least 1");
            }
            if !(half_range > 0.0) {
                bail!("--half-range must be positive");
            }
            info!("sweeping {count} poses (seed {seed})");

            let summary = sweep(count, half_range, seed, enable, stretch_distance, volume);
            let rejected: usize = summary.rejected.values().sum();
            let reasons = summary
                .rejected
                .iter()
                .map(|(kind, n)| format!("{kind}: {n}"))
                .collect::<Vec<_>>()
                .join(", ");

            let (Some((s_min, s_max)), Some((v_min, v_max))) = (summary.stretch, summary.volume)
            else {
                bail!("no valid poses: all {count} rejected ({reasons})");
            };

            println!("poses:   {count} ({} accepted, {rejected} rejected)", summary.accepted);
            if rejected > 0 {
                println!("reasons: {reasons}");
            }
            println!("stretch: [{s_min}, {s_max}]");
            println!("volume:  [{v_min}, {v_max}]");
        }
    }
    Ok(())
}
