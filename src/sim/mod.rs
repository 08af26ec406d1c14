pub mod integrator;
pub mod runner;
pub mod diagnostics;

pub use integrator::{EulerScheme, IntegrationState, Method, SamplePoint};
pub use runner::{compare_methods, Oscillator};
