//! Bounded numeric root finding.
//!
//! Objectives return `None` where they are undefined (for example a trial
//! launch whose discriminant goes negative). Both finders are best-effort:
//! they always hand back the closest estimate they reached, flagged with
//! whether it met the tolerance.

use log::{debug, warn};
use serde::Serialize;

use crate::core::error::{KinematicsError, KinematicsResult};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RootEstimate {
    pub value: f64,
    /// Objective value at `value`.
    pub residual: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl RootEstimate {
    pub fn require_converged(self) -> KinematicsResult<f64> {
        if self.converged {
            Ok(self.value)
        } else {
            Err(KinematicsError::NoConvergence {
                value: self.value,
                residual: self.residual,
                iterations: self.iterations,
            })
        }
    }

    fn report(self, method: &str) -> Self {
        if self.converged {
            debug!(
                "{method} converged to {:.6} in {} iterations (residual {:.2e})",
                self.value, self.iterations, self.residual
            );
        } else {
            warn!(
                "{method} stopped after {} iterations at {:.6} (residual {:.4})",
                self.iterations, self.value, self.residual
            );
        }
        self
    }
}

#[derive(Clone, Copy, Debug)]
pub struct NewtonOptions {
    pub max_iterations: usize,
    pub tolerance: f64,
    /// Forward-difference step used when no analytic derivative is given.
    pub derivative_step: f64,
    pub clamp_min: f64,
    pub clamp_max: f64,
    /// Fixed step applied instead of a Newton update that would leave the
    /// bounds or land on an undefined trial value.
    pub nudge: f64,
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            tolerance: 0.01,
            derivative_step: 0.1,
            clamp_min: f64::MIN,
            clamp_max: f64::MAX,
            nudge: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BisectionOptions {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for BisectionOptions {
    fn default() -> Self {
        Self {
            max_iterations: 60,
            tolerance: 0.01,
        }
    }
}

/// Newton-Raphson on `f`, estimating `f'` by forward difference when
/// `derivative` is `None`.
pub fn newton_raphson<F>(
    f: F,
    derivative: Option<&dyn Fn(f64) -> f64>,
    x0: f64,
    options: NewtonOptions,
) -> RootEstimate
where
    F: Fn(f64) -> Option<f64>,
{
    let mut x = x0.clamp(options.clamp_min, options.clamp_max);
    let mut best = RootEstimate {
        value: x,
        residual: f64::INFINITY,
        iterations: 0,
        converged: false,
    };

    for iteration in 1..=options.max_iterations {
        best.iterations = iteration;

        let Some(fx) = f(x) else {
            x = (x + options.nudge).min(options.clamp_max);
            continue;
        };
        if fx.abs() < best.residual.abs() {
            best.value = x;
            best.residual = fx;
        }
        if fx.abs() <= options.tolerance {
            best.converged = true;
            return best.report("newton-raphson");
        }

        let slope = match derivative {
            Some(d) => Some(d(x)),
            None => {
                let h = options.derivative_step;
                f(x + h).map(|fxh| (fxh - fx) / h)
            }
        };
        let Some(slope) = slope.filter(|s| s.is_finite() && s.abs() > f64::EPSILON) else {
            x = (x + options.nudge).min(options.clamp_max);
            continue;
        };

        let next = x - fx / slope;
        x = if !next.is_finite() {
            (x + options.nudge).min(options.clamp_max)
        } else if next < options.clamp_min {
            (x - options.nudge).max(options.clamp_min)
        } else if next > options.clamp_max {
            (x + options.nudge).min(options.clamp_max)
        } else {
            next
        };
    }

    best.report("newton-raphson")
}

fn same_sign(a: f64, b: f64) -> bool {
    (a >= 0.0) == (b >= 0.0)
}

/// Sign-bracketing bisection of `f` over `[lo, hi]`.
///
/// When `f` is undefined at the midpoint the interval shrinks from the side
/// whose endpoint is undefined (the high side if both ends are defined),
/// and the best guess is left untouched.
pub fn bisection<F>(f: F, lo: f64, hi: f64, options: BisectionOptions) -> RootEstimate
where
    F: Fn(f64) -> Option<f64>,
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut f_lo = f(lo);
    let mut f_hi = f(hi);

    for (endpoint, value) in [(lo, f_lo), (hi, f_hi)] {
        if let Some(v) = value.filter(|v| v.abs() <= options.tolerance) {
            return RootEstimate {
                value: endpoint,
                residual: v,
                iterations: 0,
                converged: true,
            }
            .report("bisection");
        }
    }

    let mut best = RootEstimate {
        value: 0.5 * (lo + hi),
        residual: f64::INFINITY,
        iterations: 0,
        converged: false,
    };

    for iteration in 1..=options.max_iterations {
        best.iterations = iteration;
        let mid = 0.5 * (lo + hi);

        let Some(v) = f(mid) else {
            if f_lo.is_none() {
                lo = mid;
            } else {
                hi = mid;
            }
            continue;
        };

        best.value = mid;
        best.residual = v;
        if v.abs() <= options.tolerance {
            best.converged = true;
            break;
        }

        let root_above = match (f_lo, f_hi) {
            (Some(fl), _) => same_sign(v, fl),
            (None, Some(fh)) => !same_sign(v, fh),
            (None, None) => v < 0.0,
        };
        if root_above {
            lo = mid;
            f_lo = Some(v);
        } else {
            hi = mid;
            f_hi = Some(v);
        }
    }

    best.report("bisection")
}
