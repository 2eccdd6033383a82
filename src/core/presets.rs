use serde::Serialize;

pub const EARTH_GRAVITY_MPS2: f64 = 9.8;
pub const MOON_GRAVITY_MPS2: f64 = 1.62;
pub const MARS_GRAVITY_MPS2: f64 = 3.71;
pub const JUPITER_GRAVITY_MPS2: f64 = 24.79;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GravityPreset {
    Earth,
    Moon,
    Mars,
    Jupiter,
}

impl GravityPreset {
    pub const ALL: [Self; 4] = [Self::Earth, Self::Moon, Self::Mars, Self::Jupiter];

    pub fn gravity_mps2(self) -> f64 {
        match self {
            Self::Earth => EARTH_GRAVITY_MPS2,
            Self::Moon => MOON_GRAVITY_MPS2,
            Self::Mars => MARS_GRAVITY_MPS2,
            Self::Jupiter => JUPITER_GRAVITY_MPS2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Earth => "Earth",
            Self::Moon => "Moon",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
        }
    }
}

/// Static/kinetic friction pairs for a block on a few common surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SurfacePreset {
    Ice,
    Wood,
    Steel,
    Rubber,
}

impl SurfacePreset {
    pub const ALL: [Self; 4] = [Self::Ice, Self::Wood, Self::Steel, Self::Rubber];

    /// `(mu_static, mu_kinetic)`
    pub fn coefficients(self) -> (f64, f64) {
        match self {
            Self::Ice => (0.10, 0.03),
            Self::Wood => (0.50, 0.30),
            Self::Steel => (0.74, 0.57),
            Self::Rubber => (1.00, 0.80),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ice => "Ice",
            Self::Wood => "Wood",
            Self::Steel => "Steel",
            Self::Rubber => "Rubber",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinetic_never_exceeds_static_for_presets() {
        for preset in SurfacePreset::ALL {
            let (mu_s, mu_k) = preset.coefficients();
            assert!(mu_k <= mu_s, "{}", preset.name());
            assert!((0.0..=1.0).contains(&mu_s));
        }
    }

    #[test]
    fn gravity_presets_are_positive() {
        for preset in GravityPreset::ALL {
            assert!(preset.gravity_mps2() > 0.0, "{}", preset.name());
        }
        assert_eq!(GravityPreset::Moon.gravity_mps2(), 1.62);
    }
}
