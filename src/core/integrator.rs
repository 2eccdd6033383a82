//! Semi-implicit Euler integration of a block along a bounded track.
//!
//! ```text
//! v' = v + a*dt
//! x' = x + v'*dt
//! ```
//!
//! A sliding block whose velocity would cross zero under kinetic friction
//! is snapped to rest when static friction can hold it; otherwise it keeps
//! going and friction flips on the next step.

use serde::Serialize;

use crate::core::error::{KinematicsError, KinematicsResult, require_finite};
use crate::core::forces::{ForceSolution, REST_SPEED_MPS, SurfaceConfig, compute_forces};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RigidBodyState {
    pub position_m: f64,
    pub velocity_mps: f64,
}

impl RigidBodyState {
    pub fn reset(initial_position_m: f64) -> Self {
        Self {
            position_m: initial_position_m,
            velocity_mps: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrackBounds {
    pub min_m: f64,
    pub max_m: f64,
}

impl Default for TrackBounds {
    fn default() -> Self {
        Self {
            min_m: 0.0,
            max_m: 50.0,
        }
    }
}

impl TrackBounds {
    pub fn new(min_m: f64, max_m: f64) -> KinematicsResult<Self> {
        require_finite(min_m, "Track start")?;
        require_finite(max_m, "Track end")?;
        if min_m >= max_m {
            return Err(KinematicsError::InvalidInput(format!(
                "Track start {min_m} m must be before its end {max_m} m."
            )));
        }
        Ok(Self { min_m, max_m })
    }

    pub fn clamp(&self, position_m: f64) -> f64 {
        position_m.clamp(self.min_m, self.max_m)
    }

    pub fn length_m(&self) -> f64 {
        self.max_m - self.min_m
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Boundary {
    Min,
    Max,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StepReport {
    pub state: RigidBodyState,
    /// Friction brought the block to rest during this step.
    pub stopped: bool,
    pub hit_boundary: Option<Boundary>,
}

pub fn step(
    state: &mut RigidBodyState,
    forces: &ForceSolution,
    dt: f64,
    bounds: TrackBounds,
) -> StepReport {
    let v0 = state.velocity_mps;
    let mut v1 = v0 + forces.acceleration_mps2 * dt;
    let mut stopped = false;

    let was_sliding = v0.abs() > REST_SPEED_MPS;
    let reversed = v1.abs() <= REST_SPEED_MPS || v1.signum() != v0.signum();
    let friction_opposes = forces.friction_n * v0 < 0.0;
    if was_sliding && reversed && friction_opposes && forces.can_hold() {
        v1 = 0.0;
        stopped = true;
    }

    let unclamped = state.position_m + v1 * dt;
    let position_m = bounds.clamp(unclamped);
    let hit_boundary = if unclamped < bounds.min_m {
        Some(Boundary::Min)
    } else if unclamped > bounds.max_m {
        Some(Boundary::Max)
    } else {
        None
    };
    if hit_boundary.is_some() {
        v1 = 0.0;
    }

    *state = RigidBodyState {
        position_m,
        velocity_mps: v1,
    };
    StepReport {
        state: *state,
        stopped,
        hit_boundary,
    }
}

/// One block on one track, advanced by the host's `tick(dt)`.
///
/// Separate simulations own separate state; nothing is shared.
#[derive(Clone, Debug)]
pub struct BlockSimulation {
    config: SurfaceConfig,
    bounds: TrackBounds,
    state: RigidBodyState,
    forces: ForceSolution,
    elapsed_s: f64,
}

impl BlockSimulation {
    pub fn new(
        config: SurfaceConfig,
        bounds: TrackBounds,
        initial_position_m: f64,
    ) -> KinematicsResult<Self> {
        config.validate()?;
        let state = RigidBodyState::reset(bounds.clamp(initial_position_m));
        let forces = compute_forces(&config, state.velocity_mps)?;
        Ok(Self {
            config,
            bounds,
            state,
            forces,
            elapsed_s: 0.0,
        })
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn bounds(&self) -> TrackBounds {
        self.bounds
    }

    pub fn state(&self) -> RigidBodyState {
        self.state
    }

    /// Forces at the current velocity, refreshed after every tick.
    pub fn forces(&self) -> &ForceSolution {
        &self.forces
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    /// Replaces position, velocity, forces and clock together.
    pub fn reset(&mut self, initial_position_m: f64) -> KinematicsResult<()> {
        let state = RigidBodyState::reset(self.bounds.clamp(initial_position_m));
        let forces = compute_forces(&self.config, state.velocity_mps)?;
        self.state = state;
        self.forces = forces;
        self.elapsed_s = 0.0;
        Ok(())
    }

    /// Swaps in new surface parameters, keeping the current motion. The old
    /// configuration stays in place if the new one is rejected.
    pub fn set_config(&mut self, config: SurfaceConfig) -> KinematicsResult<()> {
        config.validate()?;
        let forces = compute_forces(&config, self.state.velocity_mps)?;
        self.config = config;
        self.forces = forces;
        Ok(())
    }

    pub fn tick(&mut self, dt: f64) -> KinematicsResult<StepReport> {
        let dt = require_finite(dt, "Time step")?.max(0.0);
        let forces = compute_forces(&self.config, self.state.velocity_mps)?;
        let report = step(&mut self.state, &forces, dt, self.bounds);
        self.elapsed_s += dt;
        // Friction direction depends on the new velocity; a stopped block
        // must be reclassified at rest before the next frame.
        self.forces = compute_forces(&self.config, self.state.velocity_mps)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::forces::{Incline, MotionState};

    fn surface(force: f64, mu_static: f64, mu_kinetic: f64) -> SurfaceConfig {
        SurfaceConfig {
            mass_kg: 1.0,
            applied_force_n: force,
            gravity_mps2: 9.8,
            friction_enabled: true,
            mu_static,
            mu_kinetic,
            incline: Incline::Flat,
        }
    }

    fn wide_track() -> TrackBounds {
        TrackBounds::new(-1000.0, 1000.0).expect("bounds")
    }

    #[test]
    fn integrates_velocity_before_position() {
        let forces = compute_forces(&surface(2.0, 0.0, 0.0), 0.0).expect("forces");
        let mut state = RigidBodyState::reset(0.0);

        let report = step(&mut state, &forces, 0.5, wide_track());

        assert_eq!(report.state.velocity_mps, 1.0);
        assert_eq!(report.state.position_m, 0.5);
        assert!(!report.stopped);
        assert_eq!(report.hit_boundary, None);
    }

    #[test]
    fn clamps_to_track_end_and_zeroes_velocity() {
        let forces = compute_forces(&surface(2.0, 0.0, 0.0), 5.0).expect("forces");
        let mut state = RigidBodyState {
            position_m: 49.9,
            velocity_mps: 5.0,
        };

        let report = step(&mut state, &forces, 0.1, TrackBounds::default());

        assert_eq!(report.hit_boundary, Some(Boundary::Max));
        assert_eq!(state.position_m, 50.0);
        assert_eq!(state.velocity_mps, 0.0);
    }

    #[test]
    fn clamps_to_track_start() {
        let forces = compute_forces(&surface(-2.0, 0.0, 0.0), -1.0).expect("forces");
        let mut state = RigidBodyState {
            position_m: 0.05,
            velocity_mps: -1.0,
        };

        let report = step(&mut state, &forces, 0.1, TrackBounds::default());

        assert_eq!(report.hit_boundary, Some(Boundary::Min));
        assert_eq!(state.position_m, 0.0);
        assert_eq!(state.velocity_mps, 0.0);
    }

    #[test]
    fn coasting_block_comes_to_rest() {
        let mut sim = BlockSimulation::new(surface(0.0, 0.5, 0.3), wide_track(), 0.0)
            .expect("simulation");
        sim.state.velocity_mps = 3.0;

        let mut stopped_at = None;
        for frame in 0..200 {
            let report = sim.tick(1.0 / 60.0).expect("tick");
            if report.stopped {
                stopped_at = Some(frame);
                break;
            }
        }

        assert!(stopped_at.is_some(), "block never stopped");
        assert_eq!(sim.state().velocity_mps, 0.0);
        assert!(sim.forces().is_stationary());
        // v^2 / (2 * mu_k * g) with a little Euler overshoot allowance.
        assert_abs_diff_eq!(sim.state().position_m, 9.0 / (2.0 * 0.3 * 9.8), epsilon = 0.1);

        let rest = sim.state();
        sim.tick(1.0 / 60.0).expect("tick");
        assert_eq!(sim.state(), rest);
    }

    #[test]
    fn static_friction_decides_whether_a_reversing_block_stays_stopped() {
        // mu_k*N = 1.96 N < 3 N push < mu_s*N = 4.9 N: kinetic friction could
        // not hold the block, static friction can.
        let mut held = BlockSimulation::new(surface(3.0, 0.5, 0.2), wide_track(), 0.0)
            .expect("simulation");
        held.state.velocity_mps = -0.05;
        let report = held.tick(0.02).expect("tick");

        assert!(report.stopped);
        assert_eq!(held.state().velocity_mps, 0.0);
        assert_eq!(held.forces().state, MotionState::Stationary);
        assert_eq!(held.forces().friction_n, -3.0);

        // A push above the static limit carries the block through zero.
        let mut pushed = BlockSimulation::new(surface(6.0, 0.5, 0.2), wide_track(), 0.0)
            .expect("simulation");
        pushed.state.velocity_mps = -0.05;
        let report = pushed.tick(0.02).expect("tick");

        assert!(!report.stopped);
        assert!(pushed.state().velocity_mps > 0.0);
        assert_eq!(pushed.forces().state, MotionState::Moving);
        assert!(pushed.forces().friction_n < 0.0);
    }

    #[test]
    fn sliding_block_accelerates_down_a_steep_incline() {
        let config = SurfaceConfig {
            incline: Incline::Angle(40.0),
            ..surface(0.0, 0.5, 0.3)
        };
        let mut sim = BlockSimulation::new(config, TrackBounds::default(), 25.0).expect("simulation");

        for _ in 0..30 {
            sim.tick(1.0 / 60.0).expect("tick");
        }

        assert!(sim.state().velocity_mps < 0.0);
        assert!(sim.state().position_m < 25.0);
        assert_eq!(sim.forces().state, MotionState::Moving);
    }

    #[test]
    fn reset_replaces_state_and_forces_together() {
        let mut sim = BlockSimulation::new(surface(20.0, 0.3, 0.2), TrackBounds::default(), 0.0)
            .expect("simulation");
        for _ in 0..10 {
            sim.tick(0.05).expect("tick");
        }
        assert!(sim.state().velocity_mps > 0.0);

        sim.reset(80.0).expect("reset");
        assert_eq!(sim.state(), RigidBodyState::reset(50.0));
        assert_eq!(sim.elapsed_s(), 0.0);
        assert_eq!(sim.forces().state, MotionState::Moving);
    }

    #[test]
    fn rejected_config_leaves_simulation_untouched() {
        let mut sim = BlockSimulation::new(surface(1.0, 0.3, 0.2), TrackBounds::default(), 0.0)
            .expect("simulation");
        let before = *sim.config();

        let err = sim
            .set_config(SurfaceConfig {
                mass_kg: -1.0,
                ..before
            })
            .expect_err("invalid mass");

        assert!(matches!(err, KinematicsError::InvalidInput(_)));
        assert_eq!(*sim.config(), before);
    }

    #[test]
    fn rejects_inverted_track() {
        assert!(TrackBounds::new(10.0, 0.0).is_err());
        assert_eq!(TrackBounds::default().length_m(), 50.0);
    }
}
