use serde::Serialize;

use crate::core::error::{
    KinematicsError, KinematicsResult, require_finite, require_non_negative, require_positive,
};
use crate::core::presets::EARTH_GRAVITY_MPS2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LaunchMode {
    /// Launched at `angle_deg` from the horizontal.
    Angled,
    /// Launched horizontally off a ledge; the angle is ignored.
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LaunchConfig {
    pub mode: LaunchMode,
    pub speed_mps: f64,
    pub angle_deg: f64,
    pub height_m: f64,
    pub gravity_mps2: f64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            mode: LaunchMode::Angled,
            speed_mps: 20.0,
            angle_deg: 45.0,
            height_m: 0.0,
            gravity_mps2: EARTH_GRAVITY_MPS2,
        }
    }
}

impl LaunchConfig {
    pub fn angled(speed_mps: f64, angle_deg: f64, height_m: f64, gravity_mps2: f64) -> Self {
        Self {
            mode: LaunchMode::Angled,
            speed_mps,
            angle_deg,
            height_m,
            gravity_mps2,
        }
    }

    pub fn horizontal(speed_mps: f64, height_m: f64, gravity_mps2: f64) -> Self {
        Self {
            mode: LaunchMode::Horizontal,
            speed_mps,
            angle_deg: 0.0,
            height_m,
            gravity_mps2,
        }
    }

    /// Rejects configurations the forward model cannot evaluate.
    pub fn validate(&self) -> KinematicsResult<()> {
        require_non_negative(self.speed_mps, "Velocity")?;
        require_non_negative(self.height_m, "Height")?;
        require_positive(self.gravity_mps2, "Gravity")?;
        let angle = require_finite(self.angle_deg, "Angle")?;
        if self.mode == LaunchMode::Angled && !(-90.0..=90.0).contains(&angle) {
            return Err(KinematicsError::InvalidInput(format!(
                "Angle must be within [-90, 90] degrees, got {angle}."
            )));
        }
        Ok(())
    }

    /// Initial velocity components; horizontal launches have no vertical part.
    pub fn velocity_components(&self) -> (f64, f64) {
        match self.mode {
            LaunchMode::Horizontal => (self.speed_mps, 0.0),
            LaunchMode::Angled => {
                let theta = self.angle_deg.to_radians();
                (self.speed_mps * theta.cos(), self.speed_mps * theta.sin())
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrajectorySolution {
    pub vx: f64,
    pub vy: f64,
    pub time_of_flight_s: f64,
    pub max_height_m: f64,
    pub range_m: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub time_s: f64,
    pub x: f64,
    /// Height clamped to the ground for display.
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// True once the unclamped height has reached the ground after launch.
    pub landed: bool,
}

pub fn compute_trajectory(config: LaunchConfig) -> KinematicsResult<TrajectorySolution> {
    config.validate()?;
    let g = config.gravity_mps2;
    let h = config.height_m;
    let (vx, vy) = config.velocity_components();

    let time_of_flight_s = match config.mode {
        LaunchMode::Horizontal => (2.0 * h / g).sqrt(),
        LaunchMode::Angled => {
            // 0.5*g*t^2 - vy*t - h = 0
            let disc = vy * vy + 2.0 * g * h;
            if disc < 0.0 {
                return Err(KinematicsError::Unreachable(format!(
                    "No real landing time: vy^2 + 2*g*h is negative ({disc})."
                )));
            }
            let t_land = (vy + disc.sqrt()) / g;
            if t_land < 0.0 {
                return Err(KinematicsError::Unreachable(format!(
                    "Landing time computed as negative ({t_land})."
                )));
            }
            t_land
        }
    };

    // A diving launch never rises above its starting height.
    let max_height_m = if vy > 0.0 { h + vy * vy / (2.0 * g) } else { h };

    Ok(TrajectorySolution {
        vx,
        vy,
        time_of_flight_s,
        max_height_m,
        range_m: vx * time_of_flight_s,
    })
}

/// Raw kinematic state at `time_s`; the height is not clamped.
fn raw_state_at(config: LaunchConfig, time_s: f64) -> (f64, f64, f64, f64) {
    let (vx, vy0) = config.velocity_components();
    let g = config.gravity_mps2;
    let x = vx * time_s;
    let y = config.height_m + vy0 * time_s - 0.5 * g * time_s * time_s;
    (x, y, vx, vy0 - g * time_s)
}

pub fn position_at(config: LaunchConfig, time_s: f64) -> TrajectoryPoint {
    let (x, y, vx, vy) = raw_state_at(config, time_s);
    TrajectoryPoint {
        time_s,
        x,
        y: y.max(0.0),
        vx,
        vy,
        landed: y <= 0.0 && time_s > 0.0,
    }
}

pub fn sample_trajectory(
    config: LaunchConfig,
    samples: usize,
) -> KinematicsResult<Vec<TrajectoryPoint>> {
    let solution = compute_trajectory(config)?;
    let sample_count = samples.max(2);
    Ok((0..=sample_count)
        .map(|i| {
            let t = (i as f64 * solution.time_of_flight_s) / sample_count as f64;
            position_at(config, t)
        })
        .collect())
}

/// Launch angle giving the longest range for this speed and height.
pub fn optimal_launch_angle_deg(speed_mps: f64, height_m: f64, gravity_mps2: f64) -> f64 {
    let denom = (speed_mps * speed_mps + 2.0 * gravity_mps2 * height_m).sqrt();
    if denom <= 0.0 {
        return 45.0;
    }
    (speed_mps / denom).atan().to_degrees()
}

/// Host-owned flight clock. The trajectory itself is closed-form, so the
/// only mutable state is elapsed time.
#[derive(Clone, Copy, Debug)]
pub struct ProjectileFlight {
    config: LaunchConfig,
    solution: TrajectorySolution,
    elapsed_s: f64,
}

impl ProjectileFlight {
    pub fn launch(config: LaunchConfig) -> KinematicsResult<Self> {
        let solution = compute_trajectory(config)?;
        Ok(Self {
            config,
            solution,
            elapsed_s: 0.0,
        })
    }

    pub fn config(&self) -> LaunchConfig {
        self.config
    }

    pub fn solution(&self) -> TrajectorySolution {
        self.solution
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn landed(&self) -> bool {
        self.elapsed_s >= self.solution.time_of_flight_s
    }

    pub fn current(&self) -> TrajectoryPoint {
        position_at(self.config, self.elapsed_s)
    }

    /// Advances the clock, stopping exactly at the landing time.
    pub fn tick(&mut self, dt: f64) -> TrajectoryPoint {
        if !self.landed() {
            self.elapsed_s = (self.elapsed_s + dt.max(0.0)).min(self.solution.time_of_flight_s);
        }
        let mut point = self.current();
        point.landed = self.landed();
        point
    }

    pub fn reset(&mut self) {
        self.elapsed_s = 0.0;
    }
}
