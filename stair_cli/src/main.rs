//! # Stairwise CLI Application
//!
//! Terminal front end for stair_core: calculate a stair, convert dimensions
//! between real and drawing scale, and manage saved projects.
//!
//! Input validation, date handling and output formatting live here; the
//! core only computes and stores.

mod diagram;

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};

use stair_core::calculations::scale::{convert, ScaleDirection, ScaleRatio, SUPPORTED_SCALES};
use stair_core::calculations::stair::{compute, CalculationInput, CalculationResult};
use stair_core::config::{default_preferences_path, Preferences, StoreConfig};
use stair_core::project::StairProject;
use stair_core::store::ProjectStore;
use stair_core::units::LengthUnit;

#[derive(Parser)]
#[command(name = "stair-cli")]
#[command(about = "Stair riser/tread calculator with scale conversion and saved projects")]
struct Cli {
    /// Project store file (defaults to the preferences value, then the documents directory)
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Preferences file
    #[arg(long, global = true, value_name = "PATH")]
    preferences: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calculate riser count, riser height and total run
    Calc {
        /// Floor-to-floor height (cm)
        #[arg(long, default_value_t = 300.0)]
        height: f64,

        /// Ideal riser height (cm)
        #[arg(long, default_value_t = 16.5)]
        riser: f64,

        /// Tread depth (cm); defaults to the saved preference
        #[arg(long)]
        tread: Option<f64>,

        /// Include a landing of this depth (cm)
        #[arg(long, value_name = "DEPTH")]
        landing: Option<f64>,

        /// Save a snapshot to the project store
        #[arg(long)]
        save: bool,

        /// Project date (YYYY-MM-DD), defaults to today
        #[arg(long, value_name = "DATE", requires = "save")]
        date: Option<NaiveDate>,

        /// Store the tread depth as the new default
        #[arg(long)]
        remember_tread: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Convert a dimension between real and scaled size
    Scale {
        /// Value to convert (cm)
        value: f64,

        /// Scale denominator N in 1:N
        #[arg(long, default_value_t = 50)]
        ratio: u32,

        /// Convert a scaled dimension back to real size
        #[arg(long)]
        to_real: bool,

        /// Unit for the converted value (mm, cm, m)
        #[arg(long, default_value = "cm")]
        unit: LengthUnit,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List saved projects, newest first
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Delete saved projects by list position
    Delete {
        /// Positions as shown by `list`
        #[arg(required = true)]
        positions: Vec<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let preferences_path = cli.preferences.clone().unwrap_or_else(default_preferences_path);
    let mut preferences = Preferences::load(&preferences_path);
    let store_config = match &cli.store {
        Some(path) => StoreConfig::new(path.clone()),
        None => preferences.store_config(),
    }
    .with_lock(true);

    match cli.command {
        Command::Calc {
            height,
            riser,
            tread,
            landing,
            save,
            date,
            remember_tread,
            json,
        } => {
            let input = CalculationInput {
                total_height: height,
                ideal_riser_height: riser,
                tread_depth: tread.unwrap_or(preferences.default_tread_depth),
                include_landing: landing.is_some(),
                landing_depth: landing.unwrap_or(0.0),
            };
            input.validate().context("Input error")?;
            let result = compute(&input);

            if remember_tread && preferences.default_tread_depth != input.tread_depth {
                preferences.default_tread_depth = input.tread_depth;
                preferences
                    .save(&preferences_path)
                    .context("Could not save preferences")?;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_calculation(&input, &result);
            }

            if save {
                let mut store = open_store(&store_config)?;
                let project = StairProject::from_parts(input, result, project_date(date)?);
                store.save(project);
                report_sync(&store);
                if !json {
                    println!();
                    println!("Saved to {} ({} project(s))", store.path().display(), store.len());
                }
            }
        }

        Command::Scale {
            value,
            ratio,
            to_real,
            unit,
            json,
        } => {
            let ratio = ScaleRatio::new(ratio).context("Invalid scale")?;
            if !ratio.is_supported() {
                log::info!("Scale {} is not one of the standard scales {:?}", ratio, SUPPORTED_SCALES);
            }
            let direction = if to_real {
                ScaleDirection::ScaledToReal
            } else {
                ScaleDirection::RealToScaled
            };
            let result_cm = convert(value, ratio, direction);
            let shown = unit.cm_to_unit(result_cm);

            if json {
                let out = serde_json::json!({
                    "value": value,
                    "ratio": ratio,
                    "direction": direction,
                    "result": shown,
                    "unit": unit,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Scale {} ({})", ratio, direction);
                println!("  {}: {:.2} cm", direction.input_label(), value);
                println!("  {}: {:.2} {}", direction.output_label(), shown, unit);
            }
        }

        Command::List { json } => {
            let store = ProjectStore::load(store_config.path.clone());
            if json {
                println!("{}", serde_json::to_string_pretty(store.projects())?);
            } else if store.is_empty() {
                println!("No saved projects yet");
            } else {
                print_projects(store.projects());
            }
        }

        Command::Delete { positions } => {
            let mut store = open_store(&store_config)?;
            let removed = store.delete(positions.iter().copied());
            report_sync(&store);
            if removed.is_empty() {
                bail!("No project at position(s) {:?}", positions);
            }
            println!("Deleted {} project(s), {} remaining", removed.len(), store.len());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn open_store(config: &StoreConfig) -> anyhow::Result<ProjectStore> {
    ProjectStore::open(config).with_context(|| format!("Could not open {}", config.path.display()))
}

fn report_sync(store: &ProjectStore) {
    if let Some(e) = store.last_write_error() {
        eprintln!("Warning: changes were not written to disk: {}", e);
    }
}

/// The chosen day at the current local time of day, or now.
fn project_date(date: Option<NaiveDate>) -> anyhow::Result<DateTime<Utc>> {
    let Some(day) = date else {
        return Ok(Utc::now());
    };
    let local = day.and_time(Local::now().time());
    let resolved = Local
        .from_local_datetime(&local)
        .earliest()
        .with_context(|| format!("{} has no valid local time", day))?;
    Ok(resolved.with_timezone(&Utc))
}

fn format_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%b %-d, %Y %H:%M").to_string()
}

fn print_calculation(input: &CalculationInput, result: &CalculationResult) {
    println!("═══════════════════════════════════════");
    println!("  STAIR CALCULATION");
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!("  Total height:  {:.1} cm", input.total_height);
    println!("  Ideal riser:   {:.1} cm", input.ideal_riser_height);
    println!("  Tread depth:   {:.1} cm", input.tread_depth);
    if input.include_landing {
        println!("  Landing depth: {:.1} cm", input.landing_depth);
    } else {
        println!("  Landing:       none");
    }
    println!();
    println!("Results:");
    println!("  Number of risers:    {}", result.number_of_risers);
    println!("  Number of treads:    {}", result.tread_count());
    println!("  Actual riser height: {:.2} cm", result.actual_riser_height);
    println!("  Total run length:    {:.2} cm", result.total_run);

    let drawing = diagram::render(result.number_of_risers, input.include_landing);
    if !drawing.is_empty() {
        println!();
        println!("{}", drawing);
    }
}

fn print_projects(projects: &[StairProject]) {
    for (position, project) in projects.iter().enumerate() {
        let input = project.input();
        let result = project.result();
        println!("[{}] {}", position, format_date(project.date()));
        println!(
            "    Height: {:.1} cm   Risers: {}   Run: {:.1} cm   Riser height: {:.2} cm{}",
            input.total_height,
            result.number_of_risers,
            result.total_run,
            result.actual_riser_height,
            if input.include_landing { "   (landing)" } else { "" }
        );
    }
}
