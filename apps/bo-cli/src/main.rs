use bo_core::units::{barsa, pa, to_bar};
use bo_fluids::{
    CompVec, PressureSweep, PvtError, PvtModel, PvtProps, SweepType, execute_pressure_sweep,
};
use bo_project::{FileFormatDef, ProjectError, cartesian_reservoir, pvt_tables_path};
use bo_sim::Grid;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "bo-cli")]
#[command(about = "Black-oil simulator CLI - configuration checks and PVT inspection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a run configuration and summarize what it sets up
    Validate {
        /// Path to the run configuration (YAML or JSON)
        config_path: PathBuf,
    },
    /// Inspect PVT tables
    #[command(subcommand)]
    Pvt(PvtCommands),
}

#[derive(Subcommand)]
enum PvtCommands {
    /// Evaluate properties at one pressure
    Eval {
        /// Path to the PVT table file (YAML or JSON)
        tables_path: PathBuf,
        /// Pressure in bar
        #[arg(long)]
        pressure_bar: f64,
        #[command(flatten)]
        point: PointArgs,
        /// Also print pressure derivatives
        #[arg(long)]
        derivatives: bool,
    },
    /// Evaluate properties over a pressure range
    Sweep {
        /// Path to the PVT table file (YAML or JSON)
        tables_path: PathBuf,
        /// First pressure in bar
        #[arg(long)]
        start_bar: f64,
        /// Last pressure in bar
        #[arg(long)]
        end_bar: f64,
        /// Number of pressures
        #[arg(long, default_value_t = 21)]
        points: usize,
        /// Space pressures logarithmically
        #[arg(long)]
        log: bool,
        #[command(flatten)]
        point: PointArgs,
    },
}

#[derive(Args)]
struct PointArgs {
    /// PVT region index
    #[arg(long, default_value_t = 0)]
    region: usize,
    /// Surface volume of water
    #[arg(long, default_value_t = 0.0)]
    water: f64,
    /// Surface volume of oil
    #[arg(long, default_value_t = 0.0)]
    oil: f64,
    /// Surface volume of gas
    #[arg(long, default_value_t = 1.0)]
    gas: f64,
}

impl PointArgs {
    fn surfvol(&self) -> CompVec {
        CompVec::new(self.water, self.oil, self.gas)
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Pvt(#[from] PvtError),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Pvt(pvt_cmd) => match pvt_cmd {
            PvtCommands::Eval {
                tables_path,
                pressure_bar,
                point,
                derivatives,
            } => cmd_pvt_eval(&tables_path, pressure_bar, &point, derivatives),
            PvtCommands::Sweep {
                tables_path,
                start_bar,
                end_bar,
                points,
                log,
                point,
            } => cmd_pvt_sweep(&tables_path, start_bar, end_bar, points, log, &point),
        },
    }
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let config = bo_project::load_config(config_path)?;
    let opts = bo_project::sim_options(&config)?;

    println!("  Total time:        {} days", config.simulation.total_time_days);
    println!("  Initial step size: {} days", config.simulation.initial_stepsize_days);
    println!("  Operating mode:    {:?}", opts.mode);
    println!("  Transport scheme:  {:?}", opts.scheme);
    println!("  Gravity test:      {}", opts.gravity_test);
    println!(
        "  Output directory:  {}",
        bo_project::file_output(&config).dir().display()
    );

    match &config.fileformat {
        FileFormatDef::Cartesian { .. } => {
            let (grid, _rock) = cartesian_reservoir(&config.fileformat)?;
            let [nx, ny, nz] = grid.dims();
            println!(
                "  Grid:              {nx} x {ny} x {nz} ({} cells, {} faces)",
                grid.num_cells(),
                grid.num_faces()
            );
        }
        FileFormatDef::Eclipse { filename, .. } => {
            println!("  Grid:              corner-point deck {filename}");
        }
    }

    if let Some(tables) = pvt_tables_path(config_path, &config) {
        let model = bo_project::load_pvt_model(&tables)?;
        println!(
            "  PVT:               {} ({} region(s)) from {}",
            model.name(),
            model.num_regions(),
            tables.display()
        );
    }

    println!("✓ Configuration is valid");
    Ok(())
}

fn load_model(path: &Path) -> CliResult<PvtModel> {
    info!(path = %path.display(), "loading PVT tables");
    Ok(bo_project::load_pvt_model(path)?)
}

fn cmd_pvt_eval(
    tables_path: &Path,
    pressure_bar: f64,
    point: &PointArgs,
    derivatives: bool,
) -> CliResult<()> {
    let model = load_model(tables_path)?;
    let surfvol = point.surfvol();
    let p = barsa(pressure_bar).value;
    let props = model.evaluate(point.region, p, &surfvol)?;

    println!("Model:     {} ({})", model.name(), model.phase().name());
    println!("Pressure:  {pressure_bar} bar");
    println!("Ratio:     {:.6e}", model.ratio(&surfvol));
    println!("State:     {:?}", props.state);
    println!("B:         {:.6e}", props.b);
    println!("R:         {:.6e}", props.r);
    println!("Viscosity: {:.6e} Pa·s", props.viscosity);
    if derivatives {
        // Per bar, to match the input unit
        let per_bar = barsa(1.0).value;
        println!("dB/dp:     {:.6e} 1/bar", props.db_dp * per_bar);
        println!("dR/dp:     {:.6e} 1/bar", props.dr_dp * per_bar);
        println!("dmu/dp:    {:.6e} Pa·s/bar", props.dviscosity_dp * per_bar);
    }
    Ok(())
}

fn sweep_row(p: f64, props: &PvtProps) -> String {
    format!(
        "{:>12.4} {:>14.6e} {:>14.6e} {:>14.6e}",
        to_bar(pa(p)),
        props.b,
        props.r,
        props.viscosity
    )
}

fn cmd_pvt_sweep(
    tables_path: &Path,
    start_bar: f64,
    end_bar: f64,
    points: usize,
    log: bool,
    point: &PointArgs,
) -> CliResult<()> {
    let model = load_model(tables_path)?;
    let sweep_type = if log {
        SweepType::Logarithmic
    } else {
        SweepType::Linear
    };
    let sweep = PressureSweep::new(
        barsa(start_bar).value,
        barsa(end_bar).value,
        points,
        sweep_type,
    )?;
    let rows = execute_pressure_sweep(&model, point.region, &point.surfvol(), &sweep)?;

    println!(
        "{:>12} {:>14} {:>14} {:>14}",
        "p_bar", "B", "R", "mu_Pa_s"
    );
    for (p, props) in &rows {
        println!("{}", sweep_row(*p, props));
    }
    Ok(())
}
