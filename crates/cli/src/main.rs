#![deny(unsafe_code)]
//! CLI binary for the attractors engine.
//!
//! Subcommands:
//! - `list`: print the catalog, grouped
//! - `trace <attractor>`: run a headless session and export its points
//! - `render <attractor>`: run a headless session and write a PNG snapshot
//! - `settings`: show the effective persisted settings
//!
//! Set `RUST_LOG=debug` to follow selection, bulk dispatch and divergence recovery.

mod error;

use attractors_catalog::{Catalog, DEFAULT_SEED};
use attractors_core::{
    AttractorError, AttractorKind, Color, DVec3, FileStorage, Settings, SimpleConstants,
};
use attractors_engine::{Session, SessionEvent};
use clap::{Args, Parser, Subcommand, ValueEnum};
use error::CliError;
use serde_json::{json, Value};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "attractors", about = "Strange attractor computation engine CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in attractors.
    List,
    /// Compute a trajectory and print or write its points.
    Trace {
        #[command(flatten)]
        run: RunArgs,

        /// Point output format.
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output file path (stdout when omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute a trajectory and write a PNG snapshot.
    Render {
        #[command(flatten)]
        run: RunArgs,

        /// Image width in pixels.
        #[arg(short = 'W', long, default_value_t = 512)]
        width: usize,

        /// Image height in pixels.
        #[arg(short = 'H', long, default_value_t = 512)]
        height: usize,

        /// Line color as hex (defaults to the persisted color).
        #[arg(long)]
        color: Option<String>,

        /// Output file path.
        #[arg(short, long, default_value = "attractor.png")]
        output: PathBuf,
    },
    /// Show the effective settings.
    Settings {
        /// Settings file (built-in defaults when omitted).
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Session configuration shared by `trace` and `render`.
#[derive(Args)]
struct RunArgs {
    /// Attractor id (see `list`).
    attractor: String,

    /// Euler steps for curve attractors. Point maps always compute `max-points` terms.
    #[arg(short, long, default_value_t = 2000)]
    steps: usize,

    /// Trajectory length bound.
    #[arg(short = 'n', long)]
    max_points: Option<usize>,

    /// Step multiplier (defaults to the attractor's own).
    #[arg(short, long)]
    multiplier: Option<f64>,

    /// PRNG seed for randomized constants.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Re-draw every randomized constant before running.
    #[arg(long)]
    reset: bool,

    /// Constant override `id=value`; may be repeated.
    #[arg(short = 'c', long = "constant", value_parser = parse_constant)]
    constants: Vec<(String, f64)>,

    /// Constant overrides as a JSON object, e.g. '{"alpha": 12}'.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Settings file to load and write back.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

fn parse_constant(s: &str) -> Result<(String, f64), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected id=value, got '{s}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value for '{id}': {e}"))?;
    Ok((id.trim().to_string(), value))
}

/// Merges `--params` JSON with `--constant` flags; flags win.
fn collect_overrides(params: &str, flags: &[(String, f64)]) -> Result<SimpleConstants, CliError> {
    let params: Value = serde_json::from_str(params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let object = params
        .as_object()
        .ok_or_else(|| CliError::Input("--params must be a JSON object".into()))?;
    let mut overrides = SimpleConstants::default();
    for (id, value) in object {
        let value = value
            .as_f64()
            .ok_or_else(|| CliError::Input(format!("--params: '{id}' is not a number")))?;
        overrides.insert(id, value);
    }
    for (id, value) in flags {
        overrides.insert(id, *value);
    }
    Ok(overrides)
}

/// Builds a session, applies the run configuration and drives it to completion.
fn run_session(run: &RunArgs) -> Result<Session, CliError> {
    let overrides = collect_overrides(&run.params, &run.constants)?;
    let catalog = Arc::new(Catalog::seeded(run.seed));
    let mut session = match &run.settings {
        Some(path) => Session::with_storage(catalog, Box::new(FileStorage::new(path)), run.seed)?,
        None => Session::new(catalog, Settings::default(), run.seed)?,
    };

    session.select(&run.attractor)?;
    if run.reset {
        session.reset_constants();
    }
    if !overrides.is_empty() {
        session.apply_constants(&overrides)?;
    }
    if let Some(m) = run.multiplier {
        session.set_multiplier(m);
    }
    if let Some(n) = run.max_points {
        session.set_max_points(n)?;
    }

    match session.active_attractor().kind() {
        AttractorKind::Curve => (0..run.steps).for_each(|_| session.tick()),
        AttractorKind::Point => {
            session.wait_for_bulk();
        }
    }

    for event in session.drain_events() {
        match event {
            SessionEvent::BulkFailed {
                error: AttractorError::Cancelled,
                ..
            } => {}
            SessionEvent::BulkFailed { error, .. } => return Err(error.into()),
            SessionEvent::Notification(n) => log::warn!("{}: {}", n.title, n.message),
            _ => {}
        }
    }
    Ok(session)
}

fn write_points(points: &[DVec3], format: Format, out: &mut dyn Write) -> Result<(), CliError> {
    match format {
        Format::Json => {
            serde_json::to_writer(&mut *out, points)?;
            writeln!(out)?;
        }
        Format::Csv => {
            writeln!(out, "x,y,z")?;
            for p in points {
                writeln!(out, "{},{},{}", p.x, p.y, p.z)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn summary(session: &Session, output: Option<&Path>) -> Value {
    let mut info = session.params();
    info["points"] = json!(session.buffer().len());
    if let Some(path) = output {
        info["output"] = json!(path.display().to_string());
    }
    info
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let entries = Catalog::builtin().entries();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                let mut group = "";
                for e in &entries {
                    if e.group != group {
                        println!("{}:", e.group);
                        group = e.group.as_str();
                    }
                    println!("  {:<12} {}", e.id, e.name);
                }
            }
        }
        Command::Trace {
            run,
            format,
            output,
        } => {
            let session = run_session(&run)?;
            let points = session.points();
            match &output {
                Some(path) => {
                    let file = File::create(path)
                        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
                    write_points(&points, format, &mut BufWriter::new(file))?;
                    if cli.json {
                        let info = summary(&session, Some(path));
                        println!("{}", serde_json::to_string_pretty(&info)?);
                    } else {
                        eprintln!(
                            "traced {} ({} points, multiplier {}) -> {}",
                            run.attractor,
                            points.len(),
                            session.multiplier(),
                            path.display()
                        );
                    }
                }
                None => write_points(&points, format, &mut io::stdout().lock())?,
            }
        }
        Command::Render {
            run,
            width,
            height,
            color,
            output,
        } => {
            let session = run_session(&run)?;
            let color = match color {
                Some(hex) => hex.parse::<Color>()?,
                None => session.settings().color,
            };
            attractors_engine::snapshot::write_png(
                &session.points(),
                session.active_attractor().options.rotation,
                width,
                height,
                color,
                &output,
            )?;
            if cli.json {
                let mut info = summary(&session, Some(&output));
                info["width"] = json!(width);
                info["height"] = json!(height);
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({width}x{height}, {} points) -> {}",
                    run.attractor,
                    session.buffer().len(),
                    output.display()
                );
            }
        }
        Command::Settings { file } => {
            let settings = match &file {
                Some(path) => Settings::load(&FileStorage::new(path)),
                None => Settings::default(),
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                println!("autoRotate:      {}", settings.auto_rotate);
                println!("autoRotateSpeed: {}", settings.auto_rotate_speed);
                println!("maxPoints:       {}", settings.max_points);
                println!("lineWidth:       {}", settings.line_width);
                println!("color:           {}", settings.color);
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
