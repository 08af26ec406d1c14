use std::fmt;
use std::str::FromStr;

use nalgebra::{Point2, Vector2};

use crate::oscillator::OscillatorParameters;

/// One emitted sample: x = elapsed time + horizontal shift, y = displacement.
pub type SamplePoint = Point2<f64>;

// ---------------------------------------------------------------------------
// Method selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Euler,
    Verlet,
    Rk4,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Euler, Method::Verlet, Method::Rk4];

    /// Cycle order used by the switch signal: Euler → Verlet → RK4 → Euler.
    pub fn next(self) -> Method {
        match self {
            Method::Euler => Method::Verlet,
            Method::Verlet => Method::Rk4,
            Method::Rk4 => Method::Euler,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Method::Euler => "Euler",
            Method::Verlet => "Verlet",
            Method::Rk4 => "RK4",
        }
    }

    /// Style tag for the renderer (RGB).
    pub fn color_rgb(self) -> [u8; 3] {
        match self {
            Method::Euler => [255, 0, 0],
            Method::Verlet => [0, 0, 255],
            Method::Rk4 => [0, 255, 0],
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euler" => Ok(Method::Euler),
            "verlet" => Ok(Method::Verlet),
            "rk4" => Ok(Method::Rk4),
            other => Err(format!("unknown integration method `{other}`")),
        }
    }
}

/// Which rule `Method::Euler` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EulerScheme {
    /// Closed-form evaluation per sample; exact for any dt.
    #[default]
    Analytic,
    /// Explicit forward Euler on position and velocity.
    Forward,
}

// ---------------------------------------------------------------------------
// Per-method integration state
// ---------------------------------------------------------------------------

/// Mutable state of the active method. `x` components carry elapsed time
/// from 0; the horizontal shift is only added when a sample is emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationState {
    Analytic { time: f64 },
    ForwardEuler { pos: Vector2<f64>, vel: Vector2<f64> },
    Verlet { previous: Vector2<f64>, current: Vector2<f64> },
    Rk4 { pos: Vector2<f64>, vel: Vector2<f64> },
}

impl IntegrationState {
    /// Fresh state for `method` seeded from the closed-form solution at t = 0
    /// (and t = −dt for the Verlet bootstrap).
    pub fn initial(method: Method, euler: EulerScheme, p: &OscillatorParameters, dt: f64) -> Self {
        let pos = Vector2::new(0.0, p.displacement(0.0));
        let vel = Vector2::new(0.0, p.velocity(0.0));
        match (method, euler) {
            (Method::Euler, EulerScheme::Analytic) => IntegrationState::Analytic { time: 0.0 },
            (Method::Euler, EulerScheme::Forward) => IntegrationState::ForwardEuler { pos, vel },
            (Method::Verlet, _) => IntegrationState::Verlet {
                previous: Vector2::new(-dt, p.displacement(-dt)),
                current: pos,
            },
            (Method::Rk4, _) => IntegrationState::Rk4 { pos, vel },
        }
    }

    /// Advance one step, returning the new state and the emitted sample.
    pub fn advance(&self, p: &OscillatorParameters, dt: f64) -> (IntegrationState, SamplePoint) {
        let next = match self {
            IntegrationState::Analytic { time } => {
                // Sample first, then move the clock.
                let sample = SamplePoint::new(time + p.horizontal_shift, p.displacement(*time));
                return (IntegrationState::Analytic { time: time + dt }, sample);
            }
            IntegrationState::ForwardEuler { pos, vel } => {
                let (pos, vel) = forward_euler_step(pos, vel, p, dt);
                IntegrationState::ForwardEuler { pos, vel }
            }
            IntegrationState::Verlet { previous, current } => IntegrationState::Verlet {
                previous: *current,
                current: verlet_step(previous, current, p, dt),
            },
            IntegrationState::Rk4 { pos, vel } => {
                let (pos, vel) = rk4_step(pos, vel, p, dt);
                IntegrationState::Rk4 { pos, vel }
            }
        };
        let sample = next.sample(p);
        (next, sample)
    }

    /// Current position as an emitted sample.
    pub fn sample(&self, p: &OscillatorParameters) -> SamplePoint {
        match self {
            IntegrationState::Analytic { time } => {
                SamplePoint::new(time + p.horizontal_shift, p.displacement(*time))
            }
            IntegrationState::ForwardEuler { pos, .. }
            | IntegrationState::Verlet { current: pos, .. }
            | IntegrationState::Rk4 { pos, .. } => {
                SamplePoint::new(pos.x + p.horizontal_shift, pos.y)
            }
        }
    }

    /// Simulated time the state has reached.
    pub fn time(&self) -> f64 {
        match self {
            IntegrationState::Analytic { time } => *time,
            IntegrationState::ForwardEuler { pos, .. }
            | IntegrationState::Verlet { current: pos, .. }
            | IntegrationState::Rk4 { pos, .. } => pos.x,
        }
    }
}

// ---------------------------------------------------------------------------
// Step rules
// ---------------------------------------------------------------------------

/// Explicit forward Euler: both updates use start-of-step values.
pub fn forward_euler_step(
    pos: &Vector2<f64>,
    vel: &Vector2<f64>,
    p: &OscillatorParameters,
    dt: f64,
) -> (Vector2<f64>, Vector2<f64>) {
    let acc = Vector2::new(0.0, p.acceleration(pos.y));
    let new_pos = Vector2::new(pos.x + dt, pos.y + vel.y * dt);
    (new_pos, vel + acc * dt)
}

/// Störmer–Verlet: y_{n+1} = 2y_n − y_{n−1} + a(y_n)·dt².
pub fn verlet_step(
    previous: &Vector2<f64>,
    current: &Vector2<f64>,
    p: &OscillatorParameters,
    dt: f64,
) -> Vector2<f64> {
    let acc = p.acceleration(current.y);
    Vector2::new(current.x + dt, 2.0 * current.y - previous.y + acc * dt * dt)
}

/// Classical RK4 on (y, v). Only y is integrated; x advances linearly by dt.
pub fn rk4_step(
    pos: &Vector2<f64>,
    vel: &Vector2<f64>,
    p: &OscillatorParameters,
    dt: f64,
) -> (Vector2<f64>, Vector2<f64>) {
    let accel = |y: f64| Vector2::new(0.0, p.acceleration(y));

    let k1 = vel * dt;
    let k1a = accel(pos.y) * dt;

    let k2 = (vel + k1a * 0.5) * dt;
    let k2a = accel(pos.y + k1.y * 0.5) * dt;

    let k3 = (vel + k2a * 0.5) * dt;
    let k3a = accel(pos.y + k2.y * 0.5) * dt;

    let k4 = (vel + k3a) * dt;
    let k4a = accel(pos.y + k3.y) * dt;

    let new_pos = Vector2::new(
        pos.x + dt,
        pos.y + (k1.y + 2.0 * k2.y + 2.0 * k3.y + k4.y) / 6.0,
    );
    let new_vel = vel + (k1a + 2.0 * k2a + 2.0 * k3a + k4a) / 6.0;
    (new_pos, new_vel)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
