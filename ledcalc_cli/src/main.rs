//! # LedCalc CLI
//!
//! Terminal front-end for the layout and rigging engine: create a project
//! file, list the module catalog, print the screen report or the cable
//! route of a project.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{debug, info};

use ledcalc_core::calculations::{CableKind, CableRoute};
use ledcalc_core::config::{InstallationType, TrussModel};
use ledcalc_core::file_io::{load_project_with_lock_check, save_project, FileLock};
use ledcalc_core::report::render_text;
use ledcalc_core::{CalcError, CalcResult, Project};

#[derive(Parser)]
#[command(name = "ledcalc")]
#[command(about = "LED video wall layout, rigging and cabling calculator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project file with default settings
    Init {
        /// Project file to create (.ledp)
        path: PathBuf,

        /// Event name
        #[arg(long, default_value = "")]
        event: String,

        /// Client name
        #[arg(long, default_value = "")]
        client: String,

        /// Lock owner recorded while writing
        #[arg(long, default_value = "ledcalc")]
        user: String,
    },
    /// List the modules available to a project (or the stock catalog)
    Modules {
        /// Project file; the stock catalog is used without one
        project: Option<PathBuf>,
    },
    /// Calculate a screen and print the report
    Report {
        #[command(flatten)]
        screen: ScreenArgs,

        /// Print the calculation result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the daisy-chain order of data or power cabling
    Route {
        #[command(flatten)]
        screen: ScreenArgs,

        /// Which cable route to print
        #[arg(short, long, value_enum, default_value = "data")]
        kind: RouteKind,
    },
}

/// Project selection plus ad-hoc overrides
#[derive(clap::Args)]
struct ScreenArgs {
    /// Project file; built-in defaults are used without one
    project: Option<PathBuf>,

    /// Target width in meters
    #[arg(long)]
    width: Option<f64>,

    /// Target height in meters
    #[arg(long)]
    height: Option<f64>,

    /// Module brand (together with --model)
    #[arg(long, requires = "model")]
    brand: Option<String>,

    /// Module model (together with --brand)
    #[arg(long, requires = "brand")]
    model: Option<String>,

    /// Ground-stacked instead of flown
    #[arg(long)]
    stacked: bool,

    /// Number of motors
    #[arg(long)]
    motors: Option<u32>,

    /// Safety factor on the lifted load
    #[arg(long)]
    safety_factor: Option<f64>,

    /// Truss profile (30x30, 40x40, 52x52; "40" works too)
    #[arg(long, value_parser = parse_truss)]
    truss: Option<TrussModel>,
}

fn parse_truss(s: &str) -> Result<TrussModel, String> {
    TrussModel::from_str_flexible(s).map_err(|e| e.to_string())
}

#[derive(Clone, Copy, ValueEnum)]
enum RouteKind {
    Data,
    Power,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let outcome = match cli.command {
        Commands::Init {
            path,
            event,
            client,
            user,
        } => init_project(&path, event, client, user),
        Commands::Modules { project } => list_modules(project.as_deref()),
        Commands::Report { screen, json } => print_report(&screen, json),
        Commands::Route { screen, kind } => print_route(&screen, kind),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error [{}]: {}", e.error_code(), e);
            if let Ok(json) = serde_json::to_string(&e) {
                debug!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_project(path: &Path, event: String, client: String, user: String) -> CalcResult<()> {
    if path.exists() {
        return Err(CalcError::file_error(
            "create",
            path.display().to_string(),
            "file already exists",
        ));
    }
    let project = Project::new(event, client);
    let _lock = FileLock::acquire(path, user)?;
    save_project(&project, path)?;
    info!("created {}", path.display());
    Ok(())
}

fn list_modules(path: Option<&Path>) -> CalcResult<()> {
    let project = open_project(path)?;
    for module in project.catalog.iter() {
        let marker = if module.id == project.config.module_id { "*" } else { " " };
        let pitch = module
            .pixel_pitch_mm()
            .map(|p| format!("P{:.2}", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {:<28} {:>5} x {:<5} mm {:>6.1} kg {:>5.0} W  {}",
            marker,
            module.display_name(),
            module.width_mm,
            module.height_mm,
            module.weight_kg,
            module.power_w,
            pitch
        );
    }
    Ok(())
}

fn print_report(args: &ScreenArgs, json: bool) -> CalcResult<()> {
    let project = screen_project(args)?;
    let module = project.selected_module()?;
    let result = project.calculate()?;

    if json {
        let text = serde_json::to_string_pretty(&result).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })?;
        println!("{}", text);
    } else {
        print!("{}", render_text(&project.config, module, &result));
    }
    Ok(())
}

fn print_route(args: &ScreenArgs, kind: RouteKind) -> CalcResult<()> {
    let project = screen_project(args)?;
    let plan = project.plan()?;
    let route: &CableRoute = match kind {
        RouteKind::Data => &plan.data_route,
        RouteKind::Power => &plan.power_route,
    };
    let noun = match route.kind {
        CableKind::Data => "data",
        CableKind::Power => "power",
    };

    println!(
        "{} route: {} tiles in {} lines of up to {}",
        noun,
        route.tiles.len(),
        route.group_count(),
        route.interval
    );
    for tile in &route.tiles {
        println!(
            "{:>4}  {:<4} col {:>2} row {:>2}  at ({:.2}, {:.2}) m",
            tile.sequence + 1,
            route.group_label(tile.group),
            tile.cell.col + 1,
            tile.cell.row + 1,
            tile.cell.center_x,
            tile.cell.center_y
        );
    }
    Ok(())
}

/// Load a project file, or start from defaults
fn open_project(path: Option<&Path>) -> CalcResult<Project> {
    match path {
        Some(path) => {
            let (project, lock) = load_project_with_lock_check(path)?;
            if let Some(lock) = lock {
                info!("{} is being edited by {}", path.display(), lock.holder());
            }
            Ok(project)
        }
        None => Ok(Project::default()),
    }
}

/// Open the project and apply command-line overrides
fn screen_project(args: &ScreenArgs) -> CalcResult<Project> {
    let mut project = open_project(args.project.as_deref())?;

    if let (Some(brand), Some(model)) = (&args.brand, &args.model) {
        let id = project
            .catalog
            .find(brand, model)
            .map(|m| m.id)
            .ok_or_else(|| CalcError::module_not_found(format!("{} {}", brand, model)))?;
        project.select_module(id)?;
    }

    let mut config = project.config.clone();
    if args.width.is_some() || args.height.is_some() {
        let width = args.width.unwrap_or(config.target_width_m);
        let height = args.height.unwrap_or(config.target_height_m);
        config = config.with_target(width, height);
    }
    if args.stacked {
        config = config.with_installation(InstallationType::Stacked);
    }
    if let Some(count) = args.motors {
        let mut motors = config.motors;
        motors.count = count;
        config = config.with_motors(motors);
    }
    if let Some(safety_factor) = args.safety_factor {
        config = config.with_safety_factor(safety_factor);
    }
    if let Some(model) = args.truss {
        config = config.with_truss_model(model);
    }
    project.config = config;

    debug!(
        "screen {} x {} m, module {}",
        project.config.target_width_m, project.config.target_height_m, project.config.module_id
    );
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_args(argv: &[&str]) -> ScreenArgs {
        let mut full = vec!["ledcalc", "report"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Report { screen, .. } => screen,
            _ => panic!("expected report command"),
        }
    }

    #[test]
    fn test_truss_option_sets_profile() {
        let args = screen_args(&["--truss", "52"]);
        assert_eq!(args.truss, Some(TrussModel::T52));
        let project = screen_project(&args).unwrap();
        assert_eq!(project.config.truss.model, TrussModel::T52);

        let project = screen_project(&screen_args(&["--truss", "30X30"])).unwrap();
        assert_eq!(project.config.truss.model, TrussModel::T30);
    }

    #[test]
    fn test_unknown_truss_is_rejected() {
        let err = Cli::try_parse_from(["ledcalc", "report", "--truss", "29x29"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("30x30, 40x40, 52x52"));
    }

    #[test]
    fn test_overrides_without_project() {
        let args = screen_args(&["--width", "6", "--stacked", "--motors", "4"]);
        let project = screen_project(&args).unwrap();
        assert_eq!(project.config.target_width_m, 6.0);
        assert_eq!(project.config.target_height_m, 2.5);
        assert_eq!(project.config.installation, InstallationType::Stacked);
        assert_eq!(project.config.motors.count, 4);
    }
}
