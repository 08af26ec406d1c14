// ---------------------------------------------------------------------------
// Oscillator parameters
// ---------------------------------------------------------------------------

/// Single-mass, single-spring oscillator with closed form
/// `y(t) = A·cos(ω·(t − D)) + C`.
///
/// No range validation: zero or negative frequencies are allowed and simply
/// produce degenerate or divergent trajectories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParameters {
    pub amplitude: f64,         // A
    pub angular_frequency: f64, // ω, rad/s
    pub phase_shift: f64,       // D, s
    pub vertical_shift: f64,    // C
    pub horizontal_shift: f64,  // added to x of every emitted sample
    pub spring_constant: f64,   // k = ω², mass implicitly 1
}

impl Default for OscillatorParameters {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            angular_frequency: 1.0,
            phase_shift: 0.0,
            vertical_shift: 0.0,
            horizontal_shift: 0.0,
            spring_constant: 1.0,
        }
    }
}

impl OscillatorParameters {
    /// Set ω and keep the spring constant at k = ω².
    pub fn with_angular_frequency(mut self, omega: f64) -> Self {
        self.angular_frequency = omega;
        self.spring_constant = omega * omega;
        self
    }

    /// Set the spring constant and derive ω = sqrt(k) for a unit mass.
    pub fn with_spring_constant(mut self, k: f64) -> Self {
        self.spring_constant = k;
        self.angular_frequency = k.sqrt();
        self
    }

    /// Closed-form displacement at time `t`.
    pub fn displacement(&self, t: f64) -> f64 {
        self.amplitude * (self.angular_frequency * (t - self.phase_shift)).cos() + self.vertical_shift
    }

    /// Closed-form velocity dy/dt at time `t`.
    pub fn velocity(&self, t: f64) -> f64 {
        -self.amplitude * self.angular_frequency * (self.angular_frequency * (t - self.phase_shift)).sin()
    }

    /// Linear restoring acceleration a = −ω²·y, shared by every integrating scheme.
    pub fn acceleration(&self, y: f64) -> f64 {
        -self.angular_frequency.powi(2) * y
    }

    /// Total mechanical energy per unit mass: ½v² + ½ω²y².
    pub fn energy(&self, y: f64, v: f64) -> f64 {
        0.5 * v * v + 0.5 * self.angular_frequency.powi(2) * y * y
    }

    /// Oscillation period 2π/ω (infinite for ω = 0).
    pub fn period(&self) -> f64 {
        2.0 * std::f64::consts::PI / self.angular_frequency.abs()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
