pub mod error;
pub mod forces;
pub mod integrator;
pub mod inverse;
pub mod presets;
pub mod root_finder;
pub mod trajectory;
pub mod window;
