//! Recovering a launch parameter from a desired outcome.
//!
//! Closed-form inversions are used wherever the forward equation can be
//! solved for the unknown. Range-from-velocity and the angle searches go
//! through [`crate::core::root_finder`] with an objective built on
//! [`compute_trajectory`].

use log::debug;
use serde::Serialize;

use crate::core::error::{
    KinematicsError, KinematicsResult, require_finite, require_non_negative, require_positive,
};
use crate::core::root_finder::{
    BisectionOptions, NewtonOptions, RootEstimate, bisection, newton_raphson,
};
use crate::core::trajectory::{
    LaunchConfig, LaunchMode, compute_trajectory, optimal_launch_angle_deg,
};

/// Range assumed when the launch height is the given quantity and the host
/// has not supplied one.
pub const DEFAULT_CONSTRAINT_RANGE_M: f64 = 100.0;

const MAX_SEARCH_SPEED_MPS: f64 = 100_000.0;
const ALTERNATE_MIN_SEPARATION_DEG: f64 = 0.05;
const DEGENERATE_TRIG: f64 = 1e-9;
/// Flight time changes by only a few hundredths of a second per degree, so
/// the angle search needs a tighter residual than the default.
const FLIGHT_TIME_TOLERANCE_S: f64 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GivenQuantity {
    Range,
    MaxHeight,
    FlightTime,
    LaunchHeight,
}

impl GivenQuantity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Range => "Target range",
            Self::MaxHeight => "Target max height",
            Self::FlightTime => "Target flight time",
            Self::LaunchHeight => "Launch height",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SolveFor {
    Velocity,
    Angle,
    Height,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverseQuery {
    pub given: GivenQuantity,
    pub solve_for: SolveFor,
    pub target: f64,
    /// Known launch parameters. The field being solved for is ignored.
    pub fixed: LaunchConfig,
    /// Second constraint used when the launch height is the given quantity.
    pub constraint_range_m: Option<f64>,
}

impl InverseQuery {
    pub fn new(given: GivenQuantity, solve_for: SolveFor, target: f64, fixed: LaunchConfig) -> Self {
        Self {
            given,
            solve_for,
            target,
            fixed,
            constraint_range_m: None,
        }
    }

    pub fn with_constraint_range(mut self, range_m: f64) -> Self {
        self.constraint_range_m = Some(range_m);
        self
    }

    pub fn constraint_range(&self) -> f64 {
        self.constraint_range_m.unwrap_or(DEFAULT_CONSTRAINT_RANGE_M)
    }

    pub fn validate(&self) -> KinematicsResult<()> {
        if self.given == GivenQuantity::LaunchHeight && self.solve_for == SolveFor::Height {
            return Err(KinematicsError::InvalidQuery(
                "The launch height is already given; solving for it is self-referential."
                    .to_string(),
            ));
        }
        if self.solve_for == SolveFor::Angle && self.fixed.mode == LaunchMode::Horizontal {
            return Err(KinematicsError::InvalidQuery(
                "A horizontal launch has no angle to solve for.".to_string(),
            ));
        }
        require_non_negative(self.target, self.given.label())?;
        require_positive(self.fixed.gravity_mps2, "Gravity")?;
        if self.given == GivenQuantity::LaunchHeight {
            require_non_negative(self.constraint_range(), "Constraint range")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct InverseSolution {
    pub solve_for: SolveFor,
    /// Unrounded value; feed this back into the forward model.
    pub value: f64,
    /// Second angle reaching the same range (the lofted shot), if distinct.
    pub alternate: Option<f64>,
    pub converged: bool,
    pub residual: f64,
    pub iterations: usize,
    /// Launch height to apply alongside `value` when it was the given quantity.
    pub height_m: Option<f64>,
}

impl InverseSolution {
    fn closed_form(solve_for: SolveFor, value: f64) -> Self {
        Self {
            solve_for,
            value,
            alternate: None,
            converged: true,
            residual: 0.0,
            iterations: 0,
            height_m: None,
        }
    }

    fn from_estimate(solve_for: SolveFor, estimate: RootEstimate) -> Self {
        Self {
            solve_for,
            value: estimate.value,
            alternate: None,
            converged: estimate.converged,
            residual: estimate.residual,
            iterations: estimate.iterations,
            height_m: None,
        }
    }

    /// Best-effort estimates become [`KinematicsError::NoConvergence`].
    pub fn require_converged(self) -> KinematicsResult<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(KinematicsError::NoConvergence {
                value: self.value,
                residual: self.residual,
                iterations: self.iterations,
            })
        }
    }

    /// Value rounded to one decimal for readouts.
    pub fn display_value(&self) -> f64 {
        round_to_tenth(self.value)
    }

    /// Copy of `config` with the solved parameter written in.
    pub fn apply(&self, config: LaunchConfig) -> LaunchConfig {
        let mut next = config;
        match self.solve_for {
            SolveFor::Velocity => next.speed_mps = self.value,
            SolveFor::Angle => {
                next.mode = LaunchMode::Angled;
                next.angle_deg = self.value;
            }
            SolveFor::Height => next.height_m = self.value,
        }
        if let Some(height_m) = self.height_m {
            next.height_m = height_m;
        }
        next
    }
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn check_angle(angle_deg: f64) -> KinematicsResult<f64> {
    let angle = require_finite(angle_deg, "Angle")?;
    if (-90.0..=90.0).contains(&angle) {
        Ok(angle)
    } else {
        Err(KinematicsError::InvalidInput(format!(
            "Angle must be within [-90, 90] degrees, got {angle}."
        )))
    }
}

fn check_common(height_m: f64, gravity_mps2: f64) -> KinematicsResult<()> {
    require_non_negative(height_m, "Height")?;
    require_positive(gravity_mps2, "Gravity")?;
    Ok(())
}

fn range_of(config: LaunchConfig) -> Option<f64> {
    compute_trajectory(config).ok().map(|s| s.range_m)
}

fn flight_time_of(config: LaunchConfig) -> Option<f64> {
    compute_trajectory(config).ok().map(|s| s.time_of_flight_s)
}

/// Speed that carries an angled launch to `range_m`.
pub fn solve_velocity_from_range(
    range_m: f64,
    angle_deg: f64,
    height_m: f64,
    gravity_mps2: f64,
) -> KinematicsResult<InverseSolution> {
    require_non_negative(range_m, "Target range")?;
    let angle = check_angle(angle_deg)?;
    check_common(height_m, gravity_mps2)?;

    if range_m == 0.0 {
        return Ok(InverseSolution::closed_form(SolveFor::Velocity, 0.0));
    }
    let theta = angle.to_radians();
    if theta.cos().abs() < DEGENERATE_TRIG {
        return Err(KinematicsError::NotSolvable(
            "A vertical launch has zero range at any speed.".to_string(),
        ));
    }
    if theta <= 0.0 {
        if height_m == 0.0 {
            return Err(KinematicsError::NotSolvable(
                "A level or downward launch from the ground lands immediately at any speed."
                    .to_string(),
            ));
        }
        if theta < 0.0 {
            // At unbounded speed a diving shot follows its launch line.
            let line_limit = height_m / (-theta).tan();
            if range_m >= line_limit {
                return Err(KinematicsError::Domain(format!(
                    "A {angle} degree launch from {height_m} m cannot land beyond {line_limit:.2} m."
                )));
            }
        }
    }

    let sin_2theta = (2.0 * theta).sin().abs();
    let divisor = if sin_2theta > DEGENERATE_TRIG { sin_2theta } else { 0.1 };
    let guess = ((range_m * gravity_mps2).abs() / divisor).sqrt();

    let objective = |v: f64| {
        range_of(LaunchConfig::angled(v, angle, height_m, gravity_mps2)).map(|r| r - range_m)
    };
    let estimate = newton_raphson(
        objective,
        None,
        guess,
        NewtonOptions {
            clamp_min: 0.0,
            clamp_max: MAX_SEARCH_SPEED_MPS,
            ..NewtonOptions::default()
        },
    );
    Ok(InverseSolution::from_estimate(SolveFor::Velocity, estimate))
}

/// Speed of a horizontal launch off a ledge of `height_m` landing at `range_m`.
pub fn solve_horizontal_velocity_from_range(
    range_m: f64,
    height_m: f64,
    gravity_mps2: f64,
) -> KinematicsResult<InverseSolution> {
    require_non_negative(range_m, "Target range")?;
    check_common(height_m, gravity_mps2)?;
    if height_m <= 0.0 {
        return Err(KinematicsError::Domain(
            "A horizontal launch from the ground has no flight; its speed is undefined."
                .to_string(),
        ));
    }
    let fall_time = (2.0 * height_m / gravity_mps2).sqrt();
    Ok(InverseSolution::closed_form(
        SolveFor::Velocity,
        range_m / fall_time,
    ))
}

pub fn solve_velocity_from_max_height(
    max_height_m: f64,
    angle_deg: f64,
    height_m: f64,
    gravity_mps2: f64,
) -> KinematicsResult<InverseSolution> {
    require_non_negative(max_height_m, "Target max height")?;
    let angle = check_angle(angle_deg)?;
    check_common(height_m, gravity_mps2)?;

    if angle <= 0.0 {
        return Err(KinematicsError::NotSolvable(
            "A level or diving launch peaks at its launch height regardless of speed.".to_string(),
        ));
    }
    if max_height_m < height_m {
        return Err(KinematicsError::Domain(format!(
            "Target max height {max_height_m} m is below the launch height {height_m} m."
        )));
    }
    let vy = (2.0 * gravity_mps2 * (max_height_m - height_m)).sqrt();
    Ok(InverseSolution::closed_form(
        SolveFor::Velocity,
        vy / angle.to_radians().sin(),
    ))
}

pub fn solve_velocity_from_flight_time(
    flight_time_s: f64,
    angle_deg: f64,
    height_m: f64,
    gravity_mps2: f64,
) -> KinematicsResult<InverseSolution> {
    require_positive(flight_time_s, "Target flight time")?;
    let angle = check_angle(angle_deg)?;
    check_common(height_m, gravity_mps2)?;

    let sin_theta = angle.to_radians().sin();
    if sin_theta.abs() < DEGENERATE_TRIG {
        return Err(KinematicsError::NotSolvable(
            "A level launch takes the free-fall time from its height regardless of speed."
                .to_string(),
        ));
    }

    // h + vy*t - g*t^2/2 = 0, solved for vy.
    let vy = 0.5 * gravity_mps2 * flight_time_s - height_m / flight_time_s;
    let speed = vy / sin_theta;
    if speed < -DEGENERATE_TRIG {
        let fall_time = (2.0 * height_m / gravity_mps2).sqrt();
        let requirement = if sin_theta > 0.0 {
            "at least"
        } else {
            "at most"
        };
        return Err(KinematicsError::Domain(format!(
            "A {angle} degree launch from {height_m} m needs a flight time of {requirement} {fall_time:.2} s."
        )));
    }
    Ok(InverseSolution::closed_form(
        SolveFor::Velocity,
        speed.max(0.0),
    ))
}

/// Low-trajectory angle reaching `range_m`, with the lofted angle as the
/// alternate.
pub fn solve_angle_from_range(
    range_m: f64,
    speed_mps: f64,
    height_m: f64,
    gravity_mps2: f64,
) -> KinematicsResult<InverseSolution> {
    require_non_negative(range_m, "Target range")?;
    require_non_negative(speed_mps, "Velocity")?;
    check_common(height_m, gravity_mps2)?;

    if range_m == 0.0 {
        return Ok(InverseSolution::closed_form(SolveFor::Angle, 90.0));
    }
    if speed_mps == 0.0 {
        return Err(KinematicsError::NotSolvable(
            "At zero speed the range does not depend on the angle.".to_string(),
        ));
    }

    let options = BisectionOptions::default();
    let peak_angle = optimal_launch_angle_deg(speed_mps, height_m, gravity_mps2);
    let max_range = range_of(LaunchConfig::angled(
        speed_mps,
        peak_angle,
        height_m,
        gravity_mps2,
    ))
    .unwrap_or(0.0);
    if range_m > max_range + options.tolerance {
        return Err(KinematicsError::Domain(format!(
            "Target range {range_m} m exceeds the {max_range:.2} m reachable at {speed_mps} m/s."
        )));
    }

    let objective = |angle: f64| {
        range_of(LaunchConfig::angled(speed_mps, angle, height_m, gravity_mps2))
            .map(|r| r - range_m)
    };
    let low = bisection(objective, -90.0, peak_angle, options);
    let high = bisection(objective, peak_angle, 90.0, options);

    let mut solution = InverseSolution::from_estimate(SolveFor::Angle, low);
    solution.converged = low.converged && high.converged;
    solution.iterations = low.iterations + high.iterations;
    if (high.value - low.value).abs() > ALTERNATE_MIN_SEPARATION_DEG {
        solution.alternate = Some(high.value);
    }
    Ok(solution)
}

pub fn solve_angle_from_max_height(
    max_height_m: f64,
    speed_mps: f64,
    height_m: f64,
    gravity_mps2: f64,
) -> KinematicsResult<InverseSolution> {
    require_non_negative(max_height_m, "Target max height")?;
    require_non_negative(speed_mps, "Velocity")?;
    check_common(height_m, gravity_mps2)?;

    if max_height_m < height_m {
        return Err(KinematicsError::NotSolvable(format!(
            "A peak of {max_height_m} m below the {height_m} m launch height would need a diving launch, \
             whose angle the peak does not determine."
        )));
    }
    let rise = max_height_m - height_m;
    if rise == 0.0 {
        return Ok(InverseSolution::closed_form(SolveFor::Angle, 0.0));
    }
    if speed_mps == 0.0 {
        return Err(KinematicsError::Domain(format!(
            "At zero speed the projectile never rises above {height_m} m."
        )));
    }

    let ratio = 2.0 * gravity_mps2 * rise / (speed_mps * speed_mps);
    if ratio > 1.0 {
        let ceiling = height_m + speed_mps * speed_mps / (2.0 * gravity_mps2);
        return Err(KinematicsError::Domain(format!(
            "Target max height {max_height_m} m is above the {ceiling:.2} m a vertical launch reaches."
        )));
    }
    Ok(InverseSolution::closed_form(
        SolveFor::Angle,
        ratio.sqrt().asin().to_degrees(),
    ))
}

pub fn solve_angle_from_flight_time(
    flight_time_s: f64,
    speed_mps: f64,
    height_m: f64,
    gravity_mps2: f64,
) -> KinematicsResult<InverseSolution> {
    require_non_negative(flight_time_s, "Target flight time")?;
    require_non_negative(speed_mps, "Velocity")?;
    check_common(height_m, gravity_mps2)?;

    if speed_mps == 0.0 {
        return Err(KinematicsError::NotSolvable(
            "At zero speed the flight time does not depend on the angle.".to_string(),
        ));
    }

    let options = BisectionOptions {
        tolerance: FLIGHT_TIME_TOLERANCE_S,
        ..BisectionOptions::default()
    };
    let flight = |angle: f64| {
        flight_time_of(LaunchConfig::angled(speed_mps, angle, height_m, gravity_mps2))
    };
    // Flight time rises monotonically from a straight-down to a straight-up launch.
    let shortest = flight(-90.0).unwrap_or(0.0);
    let longest = flight(90.0).unwrap_or(0.0);
    if flight_time_s < shortest - 0.01 || flight_time_s > longest + 0.01 {
        return Err(KinematicsError::Domain(format!(
            "Target flight time {flight_time_s} s is outside the reachable {shortest:.2}..{longest:.2} s."
        )));
    }

    let estimate = bisection(
        |angle| flight(angle).map(|t| t - flight_time_s),
        -90.0,
        90.0,
        options,
    );
    Ok(InverseSolution::from_estimate(SolveFor::Angle, estimate))
}

/// Launch height at which the shot is at ground level `time_s` after launch.
fn height_landing_at(config: LaunchConfig, time_s: f64) -> f64 {
    let (_, vy) = config.velocity_components();
    (0.5 * config.gravity_mps2 * time_s * time_s - vy * time_s).max(0.0)
}

pub fn solve_height_from_range(
    range_m: f64,
    config: LaunchConfig,
) -> KinematicsResult<InverseSolution> {
    require_non_negative(range_m, "Target range")?;
    require_non_negative(config.speed_mps, "Velocity")?;
    require_positive(config.gravity_mps2, "Gravity")?;
    check_angle(config.angle_deg)?;

    let (vx, _) = config.velocity_components();
    if vx < DEGENERATE_TRIG {
        return Err(KinematicsError::NotSolvable(
            "Without horizontal velocity the range is zero from any height.".to_string(),
        ));
    }
    Ok(InverseSolution::closed_form(
        SolveFor::Height,
        height_landing_at(config, range_m / vx),
    ))
}

pub fn solve_height_from_max_height(
    max_height_m: f64,
    config: LaunchConfig,
) -> KinematicsResult<InverseSolution> {
    require_non_negative(max_height_m, "Target max height")?;
    require_non_negative(config.speed_mps, "Velocity")?;
    require_positive(config.gravity_mps2, "Gravity")?;
    check_angle(config.angle_deg)?;

    let (_, vy) = config.velocity_components();
    let rise = if vy > 0.0 {
        vy * vy / (2.0 * config.gravity_mps2)
    } else {
        0.0
    };
    Ok(InverseSolution::closed_form(
        SolveFor::Height,
        (max_height_m - rise).max(0.0),
    ))
}

pub fn solve_height_from_flight_time(
    flight_time_s: f64,
    config: LaunchConfig,
) -> KinematicsResult<InverseSolution> {
    require_non_negative(flight_time_s, "Target flight time")?;
    require_non_negative(config.speed_mps, "Velocity")?;
    require_positive(config.gravity_mps2, "Gravity")?;
    check_angle(config.angle_deg)?;

    Ok(InverseSolution::closed_form(
        SolveFor::Height,
        height_landing_at(config, flight_time_s),
    ))
}

fn solve_with_launch_height(query: &InverseQuery) -> KinematicsResult<InverseSolution> {
    let cfg = query.fixed;
    let height_m = query.target;
    let range_m = query.constraint_range();
    let mut solution = match (query.solve_for, cfg.mode) {
        (SolveFor::Velocity, LaunchMode::Angled) => {
            solve_velocity_from_range(range_m, cfg.angle_deg, height_m, cfg.gravity_mps2)?
        }
        (SolveFor::Velocity, LaunchMode::Horizontal) => {
            solve_horizontal_velocity_from_range(range_m, height_m, cfg.gravity_mps2)?
        }
        (SolveFor::Angle, _) => {
            solve_angle_from_range(range_m, cfg.speed_mps, height_m, cfg.gravity_mps2)?
        }
        (SolveFor::Height, _) => {
            return Err(KinematicsError::InvalidQuery(
                "The launch height is already given; solving for it is self-referential."
                    .to_string(),
            ));
        }
    };
    solution.height_m = Some(height_m);
    Ok(solution)
}

/// Answers any supported inverse query. Nothing is mutated: apply the
/// returned solution with [`InverseSolution::apply`] only on success.
pub fn solve(query: &InverseQuery) -> KinematicsResult<InverseSolution> {
    query.validate()?;
    debug!(
        "solving {:?} from {:?} = {} with {:?}",
        query.solve_for, query.given, query.target, query.fixed
    );

    let cfg = query.fixed;
    let g = cfg.gravity_mps2;
    let target = query.target;
    let angled = cfg.mode == LaunchMode::Angled;

    match (query.given, query.solve_for) {
        (GivenQuantity::LaunchHeight, _) => solve_with_launch_height(query),
        (GivenQuantity::Range, SolveFor::Velocity) if angled => {
            solve_velocity_from_range(target, cfg.angle_deg, cfg.height_m, g)
        }
        (GivenQuantity::Range, SolveFor::Velocity) => {
            solve_horizontal_velocity_from_range(target, cfg.height_m, g)
        }
        (GivenQuantity::MaxHeight, SolveFor::Velocity) if angled => {
            solve_velocity_from_max_height(target, cfg.angle_deg, cfg.height_m, g)
        }
        (GivenQuantity::FlightTime, SolveFor::Velocity) if angled => {
            solve_velocity_from_flight_time(target, cfg.angle_deg, cfg.height_m, g)
        }
        (GivenQuantity::MaxHeight | GivenQuantity::FlightTime, SolveFor::Velocity) => {
            Err(KinematicsError::NotSolvable(format!(
                "{} of a horizontal launch does not depend on its speed.",
                query.given.label().trim_start_matches("Target ")
            )))
        }
        (GivenQuantity::Range, SolveFor::Angle) => {
            solve_angle_from_range(target, cfg.speed_mps, cfg.height_m, g)
        }
        (GivenQuantity::MaxHeight, SolveFor::Angle) => {
            solve_angle_from_max_height(target, cfg.speed_mps, cfg.height_m, g)
        }
        (GivenQuantity::FlightTime, SolveFor::Angle) => {
            solve_angle_from_flight_time(target, cfg.speed_mps, cfg.height_m, g)
        }
        (GivenQuantity::Range, SolveFor::Height) => solve_height_from_range(target, cfg),
        (GivenQuantity::MaxHeight, SolveFor::Height) => solve_height_from_max_height(target, cfg),
        (GivenQuantity::FlightTime, SolveFor::Height) => {
            solve_height_from_flight_time(target, cfg)
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::*;

    fn angled(speed: f64, angle: f64, height: f64) -> LaunchConfig {
        LaunchConfig::angled(speed, angle, height, 9.8)
    }

    fn forward(config: LaunchConfig) -> crate::core::trajectory::TrajectorySolution {
        compute_trajectory(config).expect("forward model should succeed")
    }

    #[test]
    fn recovers_velocity_from_range() {
        let solution =
            solve_velocity_from_range(163.27, 45.0, 0.0, 9.8).expect("solve should succeed");

        assert!(solution.converged);
        assert_abs_diff_eq!(solution.value, 40.0, epsilon = 0.1);
        assert_eq!(solution.display_value(), 40.0);
    }

    #[rstest]
    #[case::elevated(25.0, 30.0, 12.0)]
    #[case::steep(18.0, 70.0, 3.0)]
    #[case::diving(30.0, -30.0, 20.0)]
    fn velocity_from_range_round_trips(#[case] speed: f64, #[case] angle: f64, #[case] height: f64) {
        let range = forward(angled(speed, angle, height)).range_m;
        let solution =
            solve_velocity_from_range(range, angle, height, 9.8).expect("solve should succeed");

        assert_abs_diff_eq!(solution.value, speed, epsilon = 0.1);
    }

    #[test]
    fn diving_launch_cannot_pass_its_launch_line() {
        // tan(30) puts the line of sight at ~34.64 m from a 20 m ledge.
        let err = solve_velocity_from_range(40.0, -30.0, 20.0, 9.8).expect_err("unreachable");
        assert!(matches!(err, KinematicsError::Domain(_)), "{err}");
    }

    #[rstest]
    #[case::vertical(90.0, 0.0)]
    #[case::level_from_ground(0.0, 0.0)]
    #[case::diving_from_ground(-20.0, 0.0)]
    fn velocity_from_range_rejects_range_independent_launches(
        #[case] angle: f64,
        #[case] height: f64,
    ) {
        let err = solve_velocity_from_range(10.0, angle, height, 9.8).expect_err("not solvable");
        assert!(matches!(err, KinematicsError::NotSolvable(_)), "{err}");
    }

    #[test]
    fn horizontal_velocity_from_range_is_closed_form() {
        let solution =
            solve_horizontal_velocity_from_range(30.0, 19.6, 9.8).expect("solve should succeed");
        assert_abs_diff_eq!(solution.value, 15.0, epsilon = 1e-9);
        assert_eq!(solution.iterations, 0);

        let err = solve_horizontal_velocity_from_range(30.0, 0.0, 9.8).expect_err("undefined");
        assert!(matches!(err, KinematicsError::Domain(_)));
    }

    #[test]
    fn velocity_from_max_height() {
        let peak = forward(angled(40.0, 45.0, 0.0)).max_height_m;
        let solution =
            solve_velocity_from_max_height(peak, 45.0, 0.0, 9.8).expect("solve should succeed");
        assert_abs_diff_eq!(solution.value, 40.0, epsilon = 1e-9);

        let err = solve_velocity_from_max_height(30.0, -10.0, 5.0, 9.8).expect_err("diving");
        assert!(matches!(err, KinematicsError::NotSolvable(_)));

        let err = solve_velocity_from_max_height(3.0, 30.0, 5.0, 9.8).expect_err("below launch");
        assert!(matches!(err, KinematicsError::Domain(_)));
    }

    #[rstest]
    #[case::ground(40.0, 45.0, 0.0)]
    #[case::ledge(25.0, 30.0, 20.0)]
    #[case::diving(30.0, -30.0, 20.0)]
    fn velocity_from_flight_time_round_trips(
        #[case] speed: f64,
        #[case] angle: f64,
        #[case] height: f64,
    ) {
        let time = forward(angled(speed, angle, height)).time_of_flight_s;
        let solution =
            solve_velocity_from_flight_time(time, angle, height, 9.8).expect("solve should succeed");
        assert_abs_diff_eq!(solution.value, speed, epsilon = 1e-6);
    }

    #[test]
    fn upward_launch_cannot_land_before_free_fall() {
        let err = solve_velocity_from_flight_time(1.0, 30.0, 20.0, 9.8).expect_err("too short");
        assert!(matches!(err, KinematicsError::Domain(_)), "{err}");
        assert!(err.to_string().contains("at least 2.02 s"));

        let err = solve_velocity_from_flight_time(2.0, 0.0, 20.0, 9.8).expect_err("level");
        assert!(matches!(err, KinematicsError::NotSolvable(_)));
    }

    #[test]
    fn angle_from_range_finds_both_branches() {
        // sin(2θ) = 30 * 9.8 / 400
        let low = 0.5 * (30.0f64 * 9.8 / 400.0).asin().to_degrees();
        let solution = solve_angle_from_range(30.0, 20.0, 0.0, 9.8).expect("solve should succeed");

        assert!(solution.converged);
        assert_abs_diff_eq!(solution.value, low, epsilon = 0.05);
        let lofted = solution.alternate.expect("lofted solution");
        assert_abs_diff_eq!(lofted, 90.0 - low, epsilon = 0.05);
    }

    #[test]
    fn angle_from_range_from_a_ledge_round_trips() {
        let range = forward(angled(22.0, 15.0, 10.0)).range_m;
        let solution = solve_angle_from_range(range, 22.0, 10.0, 9.8).expect("solve should succeed");
        assert_abs_diff_eq!(solution.value, 15.0, epsilon = 0.05);
    }

    #[test]
    fn angle_from_range_rejects_out_of_reach_target() {
        let err = solve_angle_from_range(500.0, 20.0, 0.0, 9.8).expect_err("too far");
        assert!(matches!(err, KinematicsError::Domain(_)), "{err}");
    }

    #[test]
    fn angle_at_peak_range_has_no_alternate() {
        let max_range = forward(angled(20.0, 45.0, 0.0)).range_m;
        let solution =
            solve_angle_from_range(max_range, 20.0, 0.0, 9.8).expect("solve should succeed");
        assert_abs_diff_eq!(solution.value, 45.0, epsilon = 0.05);
        assert_eq!(solution.alternate, None);
    }

    #[test]
    fn angle_from_max_height() {
        let peak = forward(angled(30.0, 60.0, 4.0)).max_height_m;
        let solution =
            solve_angle_from_max_height(peak, 30.0, 4.0, 9.8).expect("solve should succeed");
        assert_abs_diff_eq!(solution.value, 60.0, epsilon = 1e-9);

        let err = solve_angle_from_max_height(2.0, 30.0, 4.0, 9.8).expect_err("diving");
        assert!(matches!(err, KinematicsError::NotSolvable(_)));

        let err = solve_angle_from_max_height(100.0, 10.0, 0.0, 9.8).expect_err("too high");
        assert!(matches!(err, KinematicsError::Domain(_)));
    }

    #[rstest]
    #[case::rising(35.0)]
    #[case::level(0.0)]
    #[case::diving(-25.0)]
    fn angle_from_flight_time_round_trips(#[case] angle: f64) {
        let time = forward(angled(20.0, angle, 15.0)).time_of_flight_s;
        let solution =
            solve_angle_from_flight_time(time, 20.0, 15.0, 9.8).expect("solve should succeed");
        assert!(solution.converged);
        assert_abs_diff_eq!(solution.value, angle, epsilon = 0.1);
    }

    #[test]
    fn angle_from_flight_time_rejects_unreachable_time() {
        let err = solve_angle_from_flight_time(60.0, 20.0, 0.0, 9.8).expect_err("too long");
        assert!(matches!(err, KinematicsError::Domain(_)));
    }

    #[rstest]
    #[case::angled(angled(20.0, 30.0, 12.0))]
    #[case::diving(angled(15.0, -20.0, 30.0))]
    #[case::horizontal(LaunchConfig::horizontal(15.0, 19.6, 9.8))]
    fn height_inversions_round_trip(#[case] config: LaunchConfig) {
        let solution = forward(config);

        let from_range =
            solve_height_from_range(solution.range_m, config).expect("solve should succeed");
        assert_abs_diff_eq!(from_range.value, config.height_m, epsilon = 1e-6);

        let from_time = solve_height_from_flight_time(solution.time_of_flight_s, config)
            .expect("solve should succeed");
        assert_abs_diff_eq!(from_time.value, config.height_m, epsilon = 1e-6);

        let from_peak = solve_height_from_max_height(solution.max_height_m, config)
            .expect("solve should succeed");
        assert_abs_diff_eq!(from_peak.value, config.height_m, epsilon = 1e-6);
    }

    #[test]
    fn height_is_clamped_to_ground() {
        // Flat-ground range for 20 m/s at 45 degrees is ~40.8 m; a shorter
        // target would need a launch below ground.
        let solution =
            solve_height_from_range(10.0, angled(20.0, 45.0, 0.0)).expect("solve should succeed");
        assert_eq!(solution.value, 0.0);
    }

    #[test]
    fn dispatches_scenario_query() {
        let query = InverseQuery::new(
            GivenQuantity::Range,
            SolveFor::Velocity,
            163.27,
            angled(10.0, 45.0, 0.0),
        );
        let solution = solve(&query).expect("solve should succeed");
        assert_abs_diff_eq!(solution.value, 40.0, epsilon = 0.1);

        let updated = solution.apply(query.fixed);
        assert_eq!(updated.speed_mps, solution.value);
        assert_eq!(updated.angle_deg, 45.0);
    }

    #[test]
    fn launch_height_mode_uses_constraint_range() {
        let query = InverseQuery::new(
            GivenQuantity::LaunchHeight,
            SolveFor::Velocity,
            10.0,
            angled(5.0, 45.0, 0.0),
        );
        let solution = solve(&query).expect("solve should succeed");
        assert_eq!(solution.height_m, Some(10.0));

        let updated = solution.apply(query.fixed);
        assert_eq!(updated.height_m, 10.0);
        assert_abs_diff_eq!(forward(updated).range_m, DEFAULT_CONSTRAINT_RANGE_M, epsilon = 0.05);

        let angle_query = InverseQuery::new(
            GivenQuantity::LaunchHeight,
            SolveFor::Angle,
            10.0,
            angled(40.0, 0.0, 0.0),
        )
        .with_constraint_range(120.0);
        let angle = solve(&angle_query).expect("solve should succeed");
        let aimed = angle.apply(angle_query.fixed);
        assert_abs_diff_eq!(forward(aimed).range_m, 120.0, epsilon = 0.05);
    }

    #[rstest]
    #[case::self_referential(GivenQuantity::LaunchHeight, SolveFor::Height, angled(10.0, 45.0, 0.0))]
    #[case::horizontal_angle(
        GivenQuantity::Range,
        SolveFor::Angle,
        LaunchConfig::horizontal(10.0, 5.0, 9.8)
    )]
    fn rejects_invalid_queries(
        #[case] given: GivenQuantity,
        #[case] solve_for: SolveFor,
        #[case] fixed: LaunchConfig,
    ) {
        let err = solve(&InverseQuery::new(given, solve_for, 10.0, fixed)).expect_err("invalid");
        assert!(matches!(err, KinematicsError::InvalidQuery(_)), "{err}");
    }

    #[test]
    fn horizontal_peak_and_time_do_not_depend_on_speed() {
        let fixed = LaunchConfig::horizontal(10.0, 5.0, 9.8);
        for given in [GivenQuantity::MaxHeight, GivenQuantity::FlightTime] {
            let err = solve(&InverseQuery::new(given, SolveFor::Velocity, 5.0, fixed))
                .expect_err("not solvable");
            assert!(matches!(err, KinematicsError::NotSolvable(_)), "{err}");
        }
    }

    #[test]
    fn negative_target_is_rejected_before_solving() {
        let err = solve(&InverseQuery::new(
            GivenQuantity::Range,
            SolveFor::Velocity,
            -5.0,
            angled(10.0, 45.0, 0.0),
        ))
        .expect_err("negative");
        assert!(matches!(err, KinematicsError::InvalidInput(_)));
    }

    #[test]
    fn display_rounding() {
        assert_eq!(round_to_tenth(40.04), 40.0);
        assert_eq!(round_to_tenth(12.36), 12.4);
        assert_eq!(round_to_tenth(-3.26), -3.3);
    }

    #[test]
    fn strict_callers_reject_best_effort_estimates() {
        let converged = InverseSolution::closed_form(SolveFor::Height, 3.0);
        assert_eq!(converged.require_converged(), Ok(converged));

        let stalled = InverseSolution {
            converged: false,
            residual: 0.4,
            iterations: 20,
            ..converged
        };
        let err = stalled.require_converged().expect_err("not converged");
        assert!(matches!(err, KinematicsError::NoConvergence { iterations: 20, .. }));
    }
}
