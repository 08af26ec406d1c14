pub mod oscillator;
pub mod config;
pub mod sim;
pub mod io;

pub use config::{ConfigError, RunConfig, SequenceMode, SimConfig};
pub use oscillator::OscillatorParameters;
pub use sim::{EulerScheme, IntegrationState, Method, Oscillator, SamplePoint};
