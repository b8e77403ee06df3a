use clap::{Parser, Subcommand, ValueEnum};
use pl_config::{ConfigError, PacingMode, RunConfig, ValidationError, validate_config};
use pl_controls::{
    ControlError, ControllerGains, StepMetrics, assess_stability, augment, closed_loop_poles,
    spectral_abscissa,
};
use pl_plant::{ConfigurationError, build};
use pl_sim::{Engine, SimError};
use pl_telemetry::{Session, TelemetryError, TelemetryWriter, inbox, spawn_reader};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pl-cli")]
#[command(about = "Closed-loop valve pressure simulator with JSON-lines telemetry", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine: telemetry on stdout, commands on stdin
    Run {
        /// Run configuration (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Pressure setpoint in bar
        #[arg(long)]
        setpoint: Option<f64>,
        /// Simulated seconds to run for
        #[arg(long)]
        duration: Option<f64>,
        #[arg(long, value_enum)]
        pacing: Option<PacingArg>,
        /// Wait for a start command before stepping
        #[arg(long)]
        idle: bool,
    },
    /// Print plant and closed-loop matrices, poles and warnings
    Matrices {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        kp: Option<f64>,
        #[arg(long)]
        ki: Option<f64>,
        #[arg(long)]
        kd: Option<f64>,
        /// Also simulate this many seconds offline and report step-response metrics
        #[arg(long)]
        step_response: Option<f64>,
    },
    /// Validate a configuration file
    Check {
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PacingArg {
    Realtime,
    Yield,
    Free,
}

impl From<PacingArg> for PacingMode {
    fn from(p: PacingArg) -> Self {
        match p {
            PacingArg::Realtime => PacingMode::RealTime,
            PacingArg::Yield => PacingMode::Yield,
            PacingArg::Free => PacingMode::Free,
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Plant(#[from] ConfigurationError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    // stdout carries telemetry only.
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    match cli.command {
        Commands::Run {
            config,
            setpoint,
            duration,
            pacing,
            idle,
        } => {
            let mut run = load_or_default(config.as_deref())?;
            if setpoint.is_some() {
                run.engine.setpoint_bar = setpoint;
            }
            if duration.is_some() {
                run.engine.duration_s = duration;
            }
            if let Some(p) = pacing {
                run.engine.pacing = p.into();
            }
            run.engine.start_idle |= idle;
            cmd_run(&run)
        }
        Commands::Matrices {
            config,
            kp,
            ki,
            kd,
            step_response,
        } => {
            let mut run = load_or_default(config.as_deref())?;
            let g = run.controller;
            run.controller = ControllerGains::new(
                kp.unwrap_or(g.kp),
                ki.unwrap_or(g.ki),
                kd.unwrap_or(g.kd),
            )?;
            cmd_matrices(&run, step_response)
        }
        Commands::Check { config } => cmd_check(&config),
    }
}

fn load_or_default(path: Option<&Path>) -> CliResult<RunConfig> {
    match path {
        Some(p) => {
            info!(path = %p.display(), "loading configuration");
            Ok(pl_config::load(p)?)
        }
        None => Ok(RunConfig::default()),
    }
}

fn cmd_run(run: &RunConfig) -> CliResult<()> {
    validate_config(run)?;
    let engine = Engine::new(&run.plant, run.controller, run.engine_options())?;

    let (tx, rx) = inbox();
    // Detached: a blocking read on stdin must not hold up shutdown.
    let _reader = spawn_reader(BufReader::new(io::stdin()), tx);

    let writer = TelemetryWriter::new(io::stdout());
    let mut session = Session::new(engine, rx, writer, run.session_options());
    let summary = session.run()?;
    info!(
        steps = summary.steps,
        samples = summary.samples,
        "run complete"
    );
    Ok(())
}

fn cmd_matrices(run: &RunConfig, step_response: Option<f64>) -> CliResult<()> {
    let model = build(&run.plant)?;
    let aug = augment(&model, &run.controller)?;
    let system = &aug.system;
    let (kp, ki, kd) = run.controller.as_tuple();

    println!("Plant (x = [i, w, theta_m, P], u = V, y = P)");
    println!("A ={}", model.a());
    println!("B ={}", model.b());
    println!("C ={}", model.c());
    println!("D = {}", model.d());
    println!();
    println!("Gains: Kp = {kp}, Ki = {ki}, Kd = {kd}");
    println!("  C*B = {}, 1 + Kd*C*B = {}", aug.cb, aug.denom);
    println!("  K_state ={}", aug.k_state);
    println!("  K_int = {}, K_ref = {}", aug.k_int, aug.k_ref);
    println!();
    println!("Closed loop (x = [i, w, theta_m, P, z])");
    println!("A_cl ={}", system.a_cl());
    println!("B_ref ={}", system.b_ref());
    println!("C_cl ={}", system.c_cl());

    println!("Poles:");
    for p in closed_loop_poles(system) {
        println!("  {:>14.6} {:+14.6}i", p.re, p.im);
    }
    println!("Spectral abscissa: {:.6}", spectral_abscissa(system));
    match assess_stability(&aug) {
        Some(w) => println!("Warning: {w}"),
        None => println!("Stable"),
    }

    if let Some(seconds) = step_response {
        let metrics = simulate_step(run, seconds)?;
        println!();
        println!("Step response over {seconds} s (saturated):");
        match metrics {
            Some(m) => {
                println!("  overshoot:          {:.3} %", m.overshoot_pct);
                println!("  rise time (10-90%): {}", fmt_opt(m.rise_time));
                println!("  settling time (2%): {}", fmt_opt(m.settling_time));
                println!("  steady-state error: {:.6} bar", m.steady_state_error);
            }
            None => println!("  no step: setpoint equals the initial output"),
        }
    }
    Ok(())
}

fn simulate_step(run: &RunConfig, seconds: f64) -> CliResult<Option<StepMetrics>> {
    let mut engine = Engine::new(&run.plant, run.controller, run.engine_options())?;
    engine.start()?;
    let mut response = vec![(0.0, 0.0)];
    let steps = (seconds / engine.options().dt).round() as u64;
    for _ in 0..steps {
        engine.step()?;
        let s = engine.sample();
        response.push((s.timestamp, s.pressure));
    }
    engine.stop();
    Ok(StepMetrics::from_response(&response, engine.setpoint()))
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "not reached".to_string(), |t| format!("{t:.3} s"))
}

fn cmd_check(path: &Path) -> CliResult<()> {
    println!("Checking configuration: {}", path.display());
    let run = pl_config::load(path)?;
    let model = build(&run.plant)?;
    let aug = augment(&model, &run.controller)?;
    match assess_stability(&aug) {
        Some(w) => {
            warn!("{w}");
            println!("✓ Configuration is valid (with warning: {w})");
        }
        None => println!("✓ Configuration is valid"),
    }
    Ok(())
}
