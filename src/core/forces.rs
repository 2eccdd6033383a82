//! Newton's second law for a block on a flat track or an incline.
//!
//! Forces are measured along the surface, positive to the right on a flat
//! track and up-slope on an incline. The block is either held by static
//! friction ([`MotionState::Stationary`]) or sliding against kinetic
//! friction ([`MotionState::Moving`]).

use log::warn;
use serde::Serialize;

use crate::core::error::{KinematicsError, KinematicsResult, require_finite, require_positive};
use crate::core::presets::{EARTH_GRAVITY_MPS2, SurfacePreset};

/// Speeds at or below this count as at rest.
pub const REST_SPEED_MPS: f64 = 1e-6;
const FORCE_EPSILON_N: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Incline {
    Flat,
    /// Degrees above the horizontal, in `[0, 90)`.
    Angle(f64),
}

impl Incline {
    pub fn angle_deg(self) -> f64 {
        match self {
            Self::Flat => 0.0,
            Self::Angle(deg) => deg,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SurfaceConfig {
    pub mass_kg: f64,
    pub applied_force_n: f64,
    pub gravity_mps2: f64,
    pub friction_enabled: bool,
    pub mu_static: f64,
    pub mu_kinetic: f64,
    pub incline: Incline,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        let (mu_static, mu_kinetic) = SurfacePreset::Wood.coefficients();
        Self {
            mass_kg: 5.0,
            applied_force_n: 0.0,
            gravity_mps2: EARTH_GRAVITY_MPS2,
            friction_enabled: true,
            mu_static,
            mu_kinetic,
            incline: Incline::Flat,
        }
    }
}

impl SurfaceConfig {
    pub fn with_surface(mut self, preset: SurfacePreset) -> Self {
        (self.mu_static, self.mu_kinetic) = preset.coefficients();
        self
    }

    /// Range checks plus a warning for `mu_kinetic > mu_static`, which is
    /// unusual but allowed.
    pub fn validate(&self) -> KinematicsResult<()> {
        self.check_ranges()?;
        if self.friction_enabled && self.mu_kinetic > self.mu_static {
            warn!(
                "kinetic friction {} exceeds static friction {}; a started block may stall and restart",
                self.mu_kinetic, self.mu_static
            );
        }
        Ok(())
    }

    fn check_ranges(&self) -> KinematicsResult<()> {
        require_positive(self.mass_kg, "Mass")?;
        require_positive(self.gravity_mps2, "Gravity")?;
        require_finite(self.applied_force_n, "Applied force")?;
        for (mu, label) in [
            (self.mu_static, "Static friction coefficient"),
            (self.mu_kinetic, "Kinetic friction coefficient"),
        ] {
            if !(0.0..=1.0).contains(&require_finite(mu, label)?) {
                return Err(KinematicsError::InvalidInput(format!(
                    "{label} must be within [0, 1], got {mu}."
                )));
            }
        }
        let angle = require_finite(self.incline.angle_deg(), "Incline angle")?;
        if !(0.0..90.0).contains(&angle) {
            return Err(KinematicsError::InvalidInput(format!(
                "Incline angle must be within [0, 90) degrees, got {angle}."
            )));
        }
        Ok(())
    }

    fn effective_mu(&self) -> (f64, f64) {
        if self.friction_enabled {
            (self.mu_static, self.mu_kinetic)
        } else {
            (0.0, 0.0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MotionState {
    Stationary,
    Moving,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ForceSolution {
    pub normal_n: f64,
    pub weight_n: f64,
    /// Down-slope component of the weight, as a magnitude.
    pub weight_parallel_n: f64,
    pub weight_perp_n: f64,
    /// Applied force minus the down-slope weight.
    pub driving_force_n: f64,
    pub max_static_friction_n: f64,
    pub friction_n: f64,
    pub net_force_n: f64,
    pub acceleration_mps2: f64,
    pub state: MotionState,
}

impl ForceSolution {
    pub fn is_stationary(&self) -> bool {
        self.state == MotionState::Stationary
    }

    /// Whether static friction can hold the block against the driving force.
    pub fn can_hold(&self) -> bool {
        self.driving_force_n.abs() <= self.max_static_friction_n + FORCE_EPSILON_N
    }
}

pub fn compute_forces(config: &SurfaceConfig, velocity_mps: f64) -> KinematicsResult<ForceSolution> {
    config.check_ranges()?;
    require_finite(velocity_mps, "Velocity")?;

    let theta = config.incline.angle_deg().to_radians();
    let weight_n = config.mass_kg * config.gravity_mps2;
    let weight_parallel_n = weight_n * theta.sin();
    let weight_perp_n = weight_n * theta.cos();
    let normal_n = weight_perp_n;
    let driving_force_n = config.applied_force_n - weight_parallel_n;

    let (mu_static, mu_kinetic) = config.effective_mu();
    let max_static_friction_n = mu_static * normal_n;

    let mut solution = ForceSolution {
        normal_n,
        weight_n,
        weight_parallel_n,
        weight_perp_n,
        driving_force_n,
        max_static_friction_n,
        friction_n: -driving_force_n,
        net_force_n: 0.0,
        acceleration_mps2: 0.0,
        state: MotionState::Stationary,
    };

    let at_rest = velocity_mps.abs() <= REST_SPEED_MPS;
    if at_rest && solution.can_hold() {
        return Ok(solution);
    }

    // Friction opposes the motion, or the attempted motion when starting.
    let direction = if at_rest {
        driving_force_n.signum()
    } else {
        velocity_mps.signum()
    };
    solution.friction_n = -direction * mu_kinetic * normal_n;
    solution.net_force_n = driving_force_n + solution.friction_n;
    solution.acceleration_mps2 = solution.net_force_n / config.mass_kg;
    solution.state = MotionState::Moving;
    Ok(solution)
}

/// Steepest incline on which an unpowered block stays put.
pub fn critical_incline_deg(mu_static: f64) -> f64 {
    mu_static.atan().to_degrees()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::*;

    fn flat(mass: f64, force: f64, mu_static: f64, mu_kinetic: f64) -> SurfaceConfig {
        SurfaceConfig {
            mass_kg: mass,
            applied_force_n: force,
            gravity_mps2: 9.8,
            friction_enabled: true,
            mu_static,
            mu_kinetic,
            incline: Incline::Flat,
        }
    }

    #[test]
    fn static_friction_holds_small_push() {
        let forces = compute_forces(&flat(5.0, 5.0, 0.3, 0.2), 0.0).expect("forces");

        assert_abs_diff_eq!(forces.max_static_friction_n, 14.7, epsilon = 1e-9);
        assert!(forces.is_stationary());
        assert_eq!(forces.acceleration_mps2, 0.0);
        assert_eq!(forces.friction_n, -5.0);
        assert_eq!(forces.net_force_n, 0.0);
    }

    #[test]
    fn push_beyond_static_limit_slides_against_kinetic_friction() {
        let forces = compute_forces(&flat(5.0, 20.0, 0.3, 0.2), 0.0).expect("forces");

        assert_eq!(forces.state, MotionState::Moving);
        assert_abs_diff_eq!(forces.friction_n, -9.8, epsilon = 1e-9);
        assert_abs_diff_eq!(forces.net_force_n, 10.2, epsilon = 1e-9);
        assert_abs_diff_eq!(forces.acceleration_mps2, 2.04, epsilon = 1e-9);
    }

    #[test]
    fn coasting_block_is_slowed_by_friction() {
        let forces = compute_forces(&flat(2.0, 0.0, 0.4, 0.25), 3.0).expect("forces");

        assert_eq!(forces.state, MotionState::Moving);
        assert!(forces.friction_n < 0.0);
        assert_abs_diff_eq!(forces.acceleration_mps2, -0.25 * 9.8, epsilon = 1e-9);

        let leftward = compute_forces(&flat(2.0, 0.0, 0.4, 0.25), -3.0).expect("forces");
        assert_abs_diff_eq!(leftward.acceleration_mps2, 0.25 * 9.8, epsilon = 1e-9);
    }

    #[test]
    fn steep_incline_overcomes_static_friction() {
        let config = SurfaceConfig {
            incline: Incline::Angle(40.0),
            ..flat(5.0, 0.0, 0.5, 0.3)
        };
        let forces = compute_forces(&config, 0.0).expect("forces");

        assert_eq!(forces.state, MotionState::Moving);
        assert_abs_diff_eq!(forces.weight_parallel_n, 49.0 * 40f64.to_radians().sin(), epsilon = 1e-9);
        assert_eq!(forces.normal_n, forces.weight_perp_n);
        assert!(forces.friction_n > 0.0, "friction acts up-slope");
        assert!(forces.acceleration_mps2 < 0.0, "block slides down-slope");
    }

    #[test]
    fn gentle_incline_holds_with_exact_cancellation() {
        let config = SurfaceConfig {
            incline: Incline::Angle(20.0),
            ..flat(5.0, 0.0, 0.5, 0.3)
        };
        let forces = compute_forces(&config, 0.0).expect("forces");

        assert!(forces.is_stationary());
        assert_eq!(forces.friction_n, forces.weight_parallel_n);
        assert!(forces.friction_n <= forces.max_static_friction_n);
        assert_eq!(forces.acceleration_mps2, 0.0);
    }

    #[test]
    fn disabled_friction_removes_all_friction_terms() {
        let config = SurfaceConfig {
            friction_enabled: false,
            ..flat(4.0, 2.0, 0.9, 0.8)
        };
        let forces = compute_forces(&config, 0.0).expect("forces");

        assert_eq!(forces.state, MotionState::Moving);
        assert_eq!(forces.max_static_friction_n, 0.0);
        assert_eq!(forces.friction_n, 0.0);
        assert_abs_diff_eq!(forces.acceleration_mps2, 0.5, epsilon = 1e-12);

        let idle = compute_forces(&SurfaceConfig { applied_force_n: 0.0, ..config }, 0.0)
            .expect("forces");
        assert!(idle.is_stationary());
        assert_eq!(idle.friction_n, 0.0);
    }

    #[test]
    fn kinetic_above_static_is_permitted() {
        let config = flat(1.0, 5.0, 0.2, 0.6);
        assert!(config.validate().is_ok());
        let forces = compute_forces(&config, 0.0).expect("forces");
        assert_eq!(forces.state, MotionState::Moving);
    }

    #[rstest]
    #[case::zero_mass(SurfaceConfig { mass_kg: 0.0, ..SurfaceConfig::default() })]
    #[case::negative_gravity(SurfaceConfig { gravity_mps2: -9.8, ..SurfaceConfig::default() })]
    #[case::mu_above_one(SurfaceConfig { mu_static: 1.2, ..SurfaceConfig::default() })]
    #[case::negative_mu(SurfaceConfig { mu_kinetic: -0.1, ..SurfaceConfig::default() })]
    #[case::vertical_wall(SurfaceConfig { incline: Incline::Angle(90.0), ..SurfaceConfig::default() })]
    fn rejects_unphysical_surfaces(#[case] config: SurfaceConfig) {
        let err = compute_forces(&config, 0.0).expect_err("invalid surface");
        assert!(matches!(err, KinematicsError::InvalidInput(_)), "{err}");
    }

    #[test]
    fn critical_angle_matches_static_coefficient() {
        assert_abs_diff_eq!(critical_incline_deg(1.0), 45.0, epsilon = 1e-12);
        assert!(critical_incline_deg(0.5) < 40.0);
    }
}
