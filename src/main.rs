use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use thiserror::Error;

use parabolic_kinematics::core::inverse::round_to_tenth;
use parabolic_kinematics::plot::{PlotError, default_plot_path, render_trajectory_png};
use parabolic_kinematics::{
    BlockSimulation, Boundary, ForceSolution, GivenQuantity, GravityPreset, Incline, InverseQuery,
    InverseSolution, KinematicsError, LaunchConfig, RigidBodyState, SolveFor, SurfaceConfig, SurfacePreset,
    TrackBounds, TrajectorySolution, compute_trajectory, logging, solve,
};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error("Could not read input: {0}")]
    Io(#[from] io::Error),
    #[error("Could not encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Input ended unexpectedly (EOF).")]
    InputEnded,
}

/// Projectile trajectories, inverse launch solving and sliding blocks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show root-finder and solver debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time of flight, peak and range for a launch
    Trajectory(LaunchArgs),
    /// Recover velocity, angle or height from a target outcome
    Solve(SolveArgs),
    /// Simulate a block pushed along a flat track or incline
    Slide(SlideArgs),
    /// Render a launch to a PNG plot
    Plot {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Output file (defaults to a timestamped name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Planet {
    Earth,
    Moon,
    Mars,
    Jupiter,
}

impl From<Planet> for GravityPreset {
    fn from(planet: Planet) -> Self {
        match planet {
            Planet::Earth => Self::Earth,
            Planet::Moon => Self::Moon,
            Planet::Mars => Self::Mars,
            Planet::Jupiter => Self::Jupiter,
        }
    }
}

#[derive(Args, Clone, Copy, Debug)]
struct GravityArgs {
    /// Gravity preset
    #[arg(long, value_enum, default_value_t = Planet::Earth)]
    planet: Planet,

    /// Explicit gravity in m/s^2, overriding the preset
    #[arg(long)]
    gravity: Option<f64>,
}

impl GravityArgs {
    fn gravity_mps2(&self) -> f64 {
        self.gravity
            .unwrap_or_else(|| GravityPreset::from(self.planet).gravity_mps2())
    }
}

#[derive(Args, Clone, Copy, Debug)]
struct LaunchArgs {
    /// Launch angle in degrees, -90..90
    #[arg(long, default_value_t = 45.0, allow_negative_numbers = true)]
    angle: f64,

    /// Launch speed in m/s
    #[arg(long, default_value_t = 20.0)]
    speed: f64,

    /// Launch height in m
    #[arg(long, default_value_t = 0.0)]
    height: f64,

    /// Launch horizontally off a ledge (ignores the angle)
    #[arg(long)]
    horizontal: bool,

    #[command(flatten)]
    gravity: GravityArgs,
}

impl LaunchArgs {
    fn to_config(self) -> LaunchConfig {
        let g = self.gravity.gravity_mps2();
        if self.horizontal {
            LaunchConfig::horizontal(self.speed, self.height, g)
        } else {
            LaunchConfig::angled(self.speed, self.angle, self.height, g)
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Given {
    Range,
    MaxHeight,
    FlightTime,
    LaunchHeight,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Unknown {
    Velocity,
    Angle,
    Height,
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// Quantity whose target value is known
    #[arg(long, value_enum)]
    given: Given,

    /// Launch parameter to recover
    #[arg(long = "solve-for", value_enum)]
    solve_for: Unknown,

    /// Target value of the given quantity (m or s)
    #[arg(long)]
    target: f64,

    /// Range to hit when the launch height is given (default 100 m)
    #[arg(long)]
    constraint_range: Option<f64>,

    /// Fail instead of returning a best-effort estimate
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    launch: LaunchArgs,
}

impl SolveArgs {
    fn to_query(&self) -> InverseQuery {
        let given = match self.given {
            Given::Range => GivenQuantity::Range,
            Given::MaxHeight => GivenQuantity::MaxHeight,
            Given::FlightTime => GivenQuantity::FlightTime,
            Given::LaunchHeight => GivenQuantity::LaunchHeight,
        };
        let solve_for = match self.solve_for {
            Unknown::Velocity => SolveFor::Velocity,
            Unknown::Angle => SolveFor::Angle,
            Unknown::Height => SolveFor::Height,
        };
        let query = InverseQuery::new(given, solve_for, self.target, self.launch.to_config());
        match self.constraint_range {
            Some(range_m) => query.with_constraint_range(range_m),
            None => query,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Surface {
    Ice,
    Wood,
    Steel,
    Rubber,
}

impl From<Surface> for SurfacePreset {
    fn from(surface: Surface) -> Self {
        match surface {
            Surface::Ice => Self::Ice,
            Surface::Wood => Self::Wood,
            Surface::Steel => Self::Steel,
            Surface::Rubber => Self::Rubber,
        }
    }
}

#[derive(Args, Debug)]
struct SlideArgs {
    /// Block mass in kg
    #[arg(long, default_value_t = 5.0)]
    mass: f64,

    /// Applied force in N (positive right / up-slope)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    force: f64,

    /// Friction preset
    #[arg(long, value_enum, default_value_t = Surface::Wood)]
    surface: Surface,

    /// Static friction coefficient, overriding the preset
    #[arg(long)]
    mu_static: Option<f64>,

    /// Kinetic friction coefficient, overriding the preset
    #[arg(long)]
    mu_kinetic: Option<f64>,

    /// Incline angle in degrees (flat when omitted)
    #[arg(long)]
    incline: Option<f64>,

    /// Disable friction entirely
    #[arg(long)]
    no_friction: bool,

    /// Simulated time in s
    #[arg(long, default_value_t = 5.0)]
    duration: f64,

    /// Time step in s
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Track length in m
    #[arg(long, default_value_t = 50.0)]
    track_length: f64,

    /// Starting position along the track in m
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    #[command(flatten)]
    gravity: GravityArgs,
}

impl SlideArgs {
    fn to_config(&self) -> SurfaceConfig {
        let (preset_static, preset_kinetic) = SurfacePreset::from(self.surface).coefficients();
        SurfaceConfig {
            mass_kg: self.mass,
            applied_force_n: self.force,
            gravity_mps2: self.gravity.gravity_mps2(),
            friction_enabled: !self.no_friction,
            mu_static: self.mu_static.unwrap_or(preset_static),
            mu_kinetic: self.mu_kinetic.unwrap_or(preset_kinetic),
            incline: self.incline.map_or(Incline::Flat, Incline::Angle),
        }
    }
}

#[derive(Debug, Serialize)]
struct SlideSummary {
    elapsed_s: f64,
    state: RigidBodyState,
    forces: ForceSolution,
    stopped_at_s: Option<f64>,
    hit_boundary: Option<Boundary>,
}

fn read_f64(prompt: &str) -> Result<f64, CliError> {
    loop {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Err(CliError::InputEnded);
        }

        match line.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => eprintln!("Please enter a valid number (e.g., 45 or 12.5)."),
        }
    }
}

fn prompt_launch() -> Result<LaunchConfig, CliError> {
    Ok(LaunchConfig::angled(
        read_f64("Velocity (m/s): ")?,
        read_f64("Angle (degrees): ")?,
        read_f64("Height (m): ")?,
        GravityPreset::Earth.gravity_mps2(),
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_trajectory(solution: &TrajectorySolution) {
    println!("\nTime of flight: {:.4} s", solution.time_of_flight_s);
    println!("Max height: {:.4} m", solution.max_height_m);
    println!("Horizontal distance: {:.4} m", solution.range_m);
}

fn run_trajectory(config: LaunchConfig, json: bool) -> Result<(), CliError> {
    let solution = compute_trajectory(config)?;
    if json {
        print_json(&solution)
    } else {
        print_trajectory(&solution);
        Ok(())
    }
}

fn run_solve(args: &SolveArgs, json: bool) -> Result<(), CliError> {
    let query = args.to_query();
    let mut solution = solve(&query)?;
    if args.strict {
        solution = solution.require_converged()?;
    }

    let applied = solution.apply(query.fixed);
    let check = compute_trajectory(applied)?;
    if json {
        #[derive(Serialize)]
        struct Solved<'a> {
            solution: &'a InverseSolution,
            launch: LaunchConfig,
            trajectory: TrajectorySolution,
        }
        return print_json(&Solved {
            solution: &solution,
            launch: applied,
            trajectory: check,
        });
    }

    let unit = match solution.solve_for {
        SolveFor::Velocity => "m/s",
        SolveFor::Angle => "deg",
        SolveFor::Height => "m",
    };
    println!(
        "\n{:?}: {:.1} {unit}{}",
        solution.solve_for,
        solution.display_value(),
        if solution.converged {
            ""
        } else {
            " (approximate)"
        }
    );
    if let Some(alternate) = solution.alternate {
        println!("Lofted alternative: {:.1} {unit}", round_to_tenth(alternate));
    }
    print_trajectory(&check);
    Ok(())
}

fn run_slide(args: &SlideArgs, json: bool) -> Result<(), CliError> {
    let bounds = TrackBounds::new(0.0, args.track_length)?;
    let mut sim = BlockSimulation::new(args.to_config(), bounds, args.start)?;
    let dt = args.dt.max(1e-4);
    let steps = (args.duration.max(0.0) / dt).ceil() as usize;

    let mut stopped_at_s = None;
    let mut hit_boundary = None;
    for _ in 0..steps {
        let report = sim.tick(dt)?;
        if report.stopped && stopped_at_s.is_none() {
            stopped_at_s = Some(sim.elapsed_s());
        }
        if let Some(boundary) = report.hit_boundary {
            hit_boundary = Some(boundary);
            break;
        }
    }
    info!("slide finished after {:.3} s", sim.elapsed_s());

    let summary = SlideSummary {
        elapsed_s: sim.elapsed_s(),
        state: sim.state(),
        forces: *sim.forces(),
        stopped_at_s,
        hit_boundary,
    };
    if json {
        return print_json(&summary);
    }

    let forces = summary.forces;
    println!("\nState: {:?}", forces.state);
    println!("Normal force: {:.3} N", forces.normal_n);
    println!("Weight (parallel / perpendicular): {:.3} / {:.3} N", forces.weight_parallel_n, forces.weight_perp_n);
    println!("Friction: {:.3} N (static limit {:.3} N)", forces.friction_n, forces.max_static_friction_n);
    println!("Net force: {:.3} N", forces.net_force_n);
    println!("Acceleration: {:.3} m/s^2", forces.acceleration_mps2);
    println!(
        "After {:.2} s: position {:.3} m, velocity {:.3} m/s",
        summary.elapsed_s, summary.state.position_m, summary.state.velocity_mps
    );
    if let Some(t) = summary.stopped_at_s {
        println!("Came to rest at {t:.2} s");
    }
    if let Some(boundary) = summary.hit_boundary {
        println!("Reached the {boundary:?} end of the track");
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        None => run_trajectory(prompt_launch()?, cli.json),
        Some(Command::Trajectory(launch)) => run_trajectory(launch.to_config(), cli.json),
        Some(Command::Solve(args)) => run_solve(&args, cli.json),
        Some(Command::Slide(args)) => run_slide(&args, cli.json),
        Some(Command::Plot { launch, output }) => {
            let path = output.unwrap_or_else(default_plot_path);
            let solution = render_trajectory_png(launch.to_config(), &path)?;
            if cli.json {
                print_json(&solution)
            } else {
                print_trajectory(&solution);
                println!("Plot written to {}", path.display());
                Ok(())
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
