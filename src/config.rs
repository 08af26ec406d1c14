use std::str::FromStr;

use thiserror::Error;

use crate::oscillator::OscillatorParameters;
use crate::sim::{EulerScheme, Method};

// ---------------------------------------------------------------------------
// Simulation configuration
// ---------------------------------------------------------------------------

/// How repeated calls to `Oscillator::generate` relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceMode {
    /// Every call resets state and recomputes a fresh window from t = 0.
    #[default]
    FixedWindow,
    /// Calls continue from the current state and append to the buffer, which
    /// is trimmed to `SimConfig::history_limit` (unbounded when `None`).
    Accumulating,
}

/// Newest samples kept by default in accumulating mode.
pub const DEFAULT_HISTORY_LIMIT: usize = 100_000;

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub dt: f64,                      // integration timestep, s
    pub sample_count: usize,          // points per frame
    pub mode: SequenceMode,
    pub euler: EulerScheme,
    pub history_limit: Option<usize>, // accumulating mode only: keep the newest N points
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            sample_count: 100,
            mode: SequenceMode::FixedWindow,
            euler: EulerScheme::Analytic,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

// ---------------------------------------------------------------------------
// Command-line run configuration
// ---------------------------------------------------------------------------

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("expected key=value, got `{0}`")]
    MalformedPair(String),

    #[error("unknown configuration key `{0}`")]
    UnknownKey(String),

    #[error("invalid number for `{key}`: `{value}`")]
    InvalidNumber { key: String, value: String },

    #[error("invalid choice for `{key}`: `{value}` (expected one of {expected})")]
    InvalidChoice {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Everything the binary needs for one run.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub params: OscillatorParameters,
    pub sim: SimConfig,
    /// `None` runs every method side by side.
    pub method: Option<Method>,
    pub csv_path: Option<String>,
    pub json_path: Option<String>,
}

impl RunConfig {
    /// Build a config from `key=value` arguments applied over the defaults.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = RunConfig::default();
        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedPair(arg.to_string()))?;
            cfg.set(key.trim(), value.trim())?;
        }
        Ok(cfg)
    }

    /// Apply a single override.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "amplitude" => self.params.amplitude = number(key, value)?,
            "omega" => self.params = self.params.with_angular_frequency(number(key, value)?),
            "phase" => self.params.phase_shift = number(key, value)?,
            "vertical" => self.params.vertical_shift = number(key, value)?,
            "horizontal" => self.params.horizontal_shift = number(key, value)?,
            "spring" => self.params = self.params.with_spring_constant(number(key, value)?),
            "dt" => self.sim.dt = number(key, value)?,
            "samples" => self.sim.sample_count = number(key, value)?,
            "history" => {
                self.sim.history_limit = match value {
                    "none" => None,
                    _ => Some(number(key, value)?),
                }
            }
            "mode" => {
                self.sim.mode = match value {
                    "fixed-window" => SequenceMode::FixedWindow,
                    "accumulating" => SequenceMode::Accumulating,
                    _ => return Err(choice(key, value, "fixed-window, accumulating")),
                }
            }
            "euler" => {
                self.sim.euler = match value {
                    "analytic" => EulerScheme::Analytic,
                    "forward" => EulerScheme::Forward,
                    _ => return Err(choice(key, value, "analytic, forward")),
                }
            }
            "method" => {
                self.method = match value {
                    "all" => None,
                    _ => Some(
                        value
                            .parse()
                            .map_err(|_| choice(key, value, "euler, verlet, rk4, all"))?,
                    ),
                }
            }
            "csv" => self.csv_path = Some(value.to_string()),
            "json" => self.json_path = Some(value.to_string()),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn choice(key: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidChoice {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
