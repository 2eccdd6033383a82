//! Projectile and sliding-block kinematics.
//!
//! - `core::trajectory`: closed-form launch model and a flight clock
//! - `core::root_finder`: bounded Newton-Raphson and bisection
//! - `core::inverse`: recover velocity, angle or height from an outcome
//! - `core::forces`: force balance and static/kinetic friction state
//! - `core::integrator`: per-frame block integration on a bounded track
//!
//! Everything is synchronous and allocation-light; hosts drive the
//! simulations with `tick(dt)` and keep their own state cells.

pub mod core;
pub mod logging;
pub mod plot;

pub use crate::core::error::{KinematicsError, KinematicsResult};
pub use crate::core::forces::{
    ForceSolution, Incline, MotionState, SurfaceConfig, compute_forces, critical_incline_deg,
};
pub use crate::core::integrator::{
    BlockSimulation, Boundary, RigidBodyState, StepReport, TrackBounds, step,
};
pub use crate::core::inverse::{GivenQuantity, InverseQuery, InverseSolution, SolveFor, solve};
pub use crate::core::presets::{EARTH_GRAVITY_MPS2, GravityPreset, SurfacePreset};
pub use crate::core::trajectory::{
    LaunchConfig, LaunchMode, ProjectileFlight, TrajectoryPoint, TrajectorySolution,
    compute_trajectory, position_at, sample_trajectory,
};
