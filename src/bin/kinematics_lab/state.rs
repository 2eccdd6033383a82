use parabolic_kinematics::{
    BlockSimulation, Boundary, GivenQuantity, GravityPreset, Incline, InverseQuery,
    InverseSolution, KinematicsResult, LaunchConfig, LaunchMode, ProjectileFlight, SolveFor,
    SurfaceConfig, SurfacePreset, TrackBounds, TrajectoryPoint, solve,
};

use crate::controls::FrameActions;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Projectile,
    Incline,
}

pub(crate) const GIVEN_LABELS: [&str; 4] = ["Range", "Max height", "Flight time", "Launch height"];
pub(crate) const SOLVE_FOR_LABELS: [&str; 3] = ["Velocity", "Angle", "Height"];
const GIVEN_ORDER: [GivenQuantity; 4] = [
    GivenQuantity::Range,
    GivenQuantity::MaxHeight,
    GivenQuantity::FlightTime,
    GivenQuantity::LaunchHeight,
];
const SOLVE_FOR_ORDER: [SolveFor; 3] = [SolveFor::Velocity, SolveFor::Angle, SolveFor::Height];

/// Slider-backed launch parameters. Sliders edit `f32`; the engine works in `f64`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LaunchControls {
    pub(crate) angle_deg: f32,
    pub(crate) speed_mps: f32,
    pub(crate) height_m: f32,
    pub(crate) horizontal: bool,
}

impl LaunchControls {
    fn from_config(config: LaunchConfig) -> Self {
        Self {
            angle_deg: config.angle_deg as f32,
            speed_mps: config.speed_mps as f32,
            height_m: config.height_m as f32,
            horizontal: config.mode == LaunchMode::Horizontal,
        }
    }

    pub(crate) fn to_config(self, gravity_mps2: f64) -> LaunchConfig {
        if self.horizontal {
            LaunchConfig::horizontal(self.speed_mps as f64, self.height_m as f64, gravity_mps2)
        } else {
            LaunchConfig::angled(
                self.speed_mps as f64,
                self.angle_deg as f64,
                self.height_m as f64,
                gravity_mps2,
            )
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct SurfaceControls {
    pub(crate) mass_kg: f32,
    pub(crate) applied_force_n: f32,
    pub(crate) incline_deg: f32,
    pub(crate) friction_enabled: bool,
    pub(crate) surface_idx: usize,
}

impl SurfaceControls {
    fn new() -> Self {
        let defaults = SurfaceConfig::default();
        Self {
            mass_kg: defaults.mass_kg as f32,
            applied_force_n: defaults.applied_force_n as f32,
            incline_deg: defaults.incline.angle_deg() as f32,
            friction_enabled: defaults.friction_enabled,
            surface_idx: 1,
        }
    }

    pub(crate) fn preset(&self) -> SurfacePreset {
        SurfacePreset::ALL[self.surface_idx.min(SurfacePreset::ALL.len() - 1)]
    }

    pub(crate) fn to_config(self, gravity_mps2: f64) -> SurfaceConfig {
        let incline = if self.incline_deg > 0.0 {
            Incline::Angle(self.incline_deg as f64)
        } else {
            Incline::Flat
        };
        SurfaceConfig {
            mass_kg: self.mass_kg as f64,
            applied_force_n: self.applied_force_n as f64,
            gravity_mps2,
            friction_enabled: self.friction_enabled,
            incline,
            ..SurfaceConfig::default()
        }
        .with_surface(self.preset())
    }
}

/// Inverse "Calculate" panel; targets are typed, not slid.
#[derive(Clone, Debug)]
pub(crate) struct SolverPanel {
    pub(crate) given_idx: usize,
    pub(crate) solve_for_idx: usize,
    pub(crate) target_text: String,
    pub(crate) constraint_range_text: String,
}

impl SolverPanel {
    fn new() -> Self {
        Self {
            given_idx: 0,
            solve_for_idx: 0,
            target_text: "100".to_string(),
            constraint_range_text: String::new(),
        }
    }

    fn query(&self, fixed: LaunchConfig) -> Result<InverseQuery, String> {
        let target = parse_number(&self.target_text, "Target")?;
        let given = GIVEN_ORDER[self.given_idx.min(GIVEN_ORDER.len() - 1)];
        let solve_for = SOLVE_FOR_ORDER[self.solve_for_idx.min(SOLVE_FOR_ORDER.len() - 1)];
        let query = InverseQuery::new(given, solve_for, target, fixed);
        if self.constraint_range_text.trim().is_empty() {
            Ok(query)
        } else {
            let range_m = parse_number(&self.constraint_range_text, "Range to hit")?;
            Ok(query.with_constraint_range(range_m))
        }
    }
}

fn parse_number(text: &str, label: &str) -> Result<f64, String> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| format!("{label} must be a number (e.g., 45 or 12.5)."))
}

pub(crate) struct LabRuntime {
    pub(crate) scene: Scene,
    pub(crate) planet_idx: usize,
    pub(crate) sim_speed: f32,
    pub(crate) launch: LaunchControls,
    pub(crate) flight: Option<ProjectileFlight>,
    pub(crate) trail: Vec<TrajectoryPoint>,
    pub(crate) paused: bool,
    pub(crate) solver: SolverPanel,
    pub(crate) last_solution: Option<InverseSolution>,
    pub(crate) surface: SurfaceControls,
    pub(crate) block: BlockSimulation,
    pub(crate) block_running: bool,
    pub(crate) status_line: String,
}

impl LabRuntime {
    pub(crate) fn new() -> KinematicsResult<Self> {
        let surface = SurfaceControls::new();
        let gravity = GravityPreset::Earth.gravity_mps2();
        let bounds = TrackBounds::default();
        let block = BlockSimulation::new(surface.to_config(gravity), bounds, track_midpoint(bounds))?;
        Ok(Self {
            scene: Scene::Projectile,
            planet_idx: 0,
            sim_speed: 1.0,
            launch: LaunchControls::from_config(LaunchConfig::default()),
            flight: None,
            trail: Vec::new(),
            paused: false,
            solver: SolverPanel::new(),
            last_solution: None,
            surface,
            block,
            block_running: false,
            status_line: "Ready".to_string(),
        })
    }

    pub(crate) fn planet(&self) -> GravityPreset {
        GravityPreset::ALL[self.planet_idx.min(GravityPreset::ALL.len() - 1)]
    }

    pub(crate) fn launch_config(&self) -> LaunchConfig {
        self.launch.to_config(self.planet().gravity_mps2())
    }

    pub(crate) fn flying(&self) -> bool {
        self.flight.as_ref().is_some_and(|flight| !flight.landed())
    }

    pub(crate) fn apply(&mut self, actions: FrameActions) {
        if let Some(scene) = actions.switch_scene {
            if scene != self.scene {
                self.scene = scene;
                self.status_line = match scene {
                    Scene::Projectile => "Projectile scene".to_string(),
                    Scene::Incline => "Incline scene".to_string(),
                };
            }
        }
        if actions.calculate {
            self.calculate();
        }
        if actions.launch_pause {
            self.launch_or_pause();
        }
        if actions.reset {
            self.reset();
        }
    }

    fn launch_or_pause(&mut self) {
        match self.scene {
            Scene::Projectile if self.flying() => {
                self.paused = !self.paused;
                self.status_line = if self.paused { "Paused" } else { "Resumed" }.to_string();
            }
            Scene::Projectile => match ProjectileFlight::launch(self.launch_config()) {
                Ok(flight) => {
                    self.trail.clear();
                    self.trail.push(flight.current());
                    self.flight = Some(flight);
                    self.paused = false;
                    self.status_line = "Launched".to_string();
                }
                Err(err) => self.status_line = err.to_string(),
            },
            Scene::Incline => {
                self.block_running = !self.block_running;
                self.status_line = if self.block_running { "Running" } else { "Paused" }.to_string();
            }
        }
    }

    fn reset(&mut self) {
        match self.scene {
            Scene::Projectile => {
                self.flight = None;
                self.trail.clear();
                self.paused = false;
            }
            Scene::Incline => {
                self.block_running = false;
                if let Err(err) = self.block.reset(track_midpoint(self.block.bounds())) {
                    self.status_line = err.to_string();
                    return;
                }
            }
        }
        self.status_line = "Reset".to_string();
    }

    /// Pushes slider edits into the block simulation. A rejected surface
    /// keeps the previous one running.
    pub(crate) fn sync_surface(&mut self) {
        let config = self.surface.to_config(self.planet().gravity_mps2());
        if config == *self.block.config() {
            return;
        }
        if let Err(err) = self.block.set_config(config) {
            self.status_line = err.to_string();
        }
    }

    /// Runs the inverse solver against the current launch. Only a successful
    /// solve touches the launch controls.
    pub(crate) fn calculate(&mut self) {
        let fixed = self.launch_config();
        let query = match self.solver.query(fixed) {
            Ok(query) => query,
            Err(message) => {
                self.status_line = message;
                return;
            }
        };
        match solve(&query) {
            Ok(solution) => {
                self.launch = LaunchControls::from_config(solution.apply(fixed));
                self.flight = None;
                self.trail.clear();
                self.status_line = describe_solution(&solution);
                self.last_solution = Some(solution);
            }
            Err(err) => self.status_line = err.to_string(),
        }
    }

    pub(crate) fn advance(&mut self, dt: f64) {
        match self.scene {
            Scene::Projectile => self.advance_flight(dt),
            Scene::Incline => self.advance_block(dt),
        }
    }

    fn advance_flight(&mut self, dt: f64) {
        if self.paused {
            return;
        }
        let Some(flight) = self.flight.as_mut() else {
            return;
        };
        if flight.landed() {
            return;
        }
        let point = flight.tick(dt);
        self.trail.push(point);
        if point.landed {
            self.status_line = format!("Landed at {:.2} m after {:.2} s", point.x, point.time_s);
        }
    }

    fn advance_block(&mut self, dt: f64) {
        if !self.block_running {
            return;
        }
        match self.block.tick(dt) {
            Ok(report) => {
                if report.stopped {
                    self.status_line =
                        format!("Block came to rest at {:.2} m", report.state.position_m);
                }
                if let Some(boundary) = report.hit_boundary {
                    self.block_running = false;
                    self.status_line = match boundary {
                        Boundary::Min => "Block reached the bottom of the track",
                        Boundary::Max => "Block reached the top of the track",
                    }
                    .to_string();
                }
            }
            Err(err) => {
                self.block_running = false;
                self.status_line = err.to_string();
            }
        }
    }
}

fn track_midpoint(bounds: TrackBounds) -> f64 {
    bounds.min_m + bounds.length_m() * 0.5
}

fn describe_solution(solution: &InverseSolution) -> String {
    let (label, unit) = match solution.solve_for {
        SolveFor::Velocity => ("Velocity", "m/s"),
        SolveFor::Angle => ("Angle", "deg"),
        SolveFor::Height => ("Height", "m"),
    };
    let mut text = format!("{label} = {:.1} {unit}", solution.display_value());
    if let Some(alternate) = solution.alternate {
        text.push_str(&format!(" (or {alternate:.1} {unit})"));
    }
    if !solution.converged {
        text.push_str(" ~approximate");
    }
    text
}
