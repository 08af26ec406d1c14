use crate::oscillator::OscillatorParameters;
use super::integrator::SamplePoint;

// ---------------------------------------------------------------------------
// Non-blocking numeric diagnostics over an emitted sequence
// ---------------------------------------------------------------------------

/// Index of the first sample with a NaN or infinite coordinate.
pub fn first_non_finite(samples: &[SamplePoint]) -> Option<usize> {
    samples
        .iter()
        .position(|s| !(s.x.is_finite() && s.y.is_finite()))
}

pub fn count_non_finite(samples: &[SamplePoint]) -> usize {
    samples
        .iter()
        .filter(|s| !(s.x.is_finite() && s.y.is_finite()))
        .count()
}

/// Largest |y − y_exact| over the sequence, evaluating the closed form at the
/// sample's own time (x minus the horizontal shift).
pub fn max_abs_error(samples: &[SamplePoint], params: &OscillatorParameters) -> f64 {
    samples
        .iter()
        .map(|s| (s.y - params.displacement(s.x - params.horizontal_shift)).abs())
        .fold(0.0_f64, f64::max)
}

/// Mechanical energy at each interior sample, with velocity reconstructed by
/// central differences. Returns `len − 2` values (empty below three samples).
pub fn energy_series(samples: &[SamplePoint], params: &OscillatorParameters, dt: f64) -> Vec<f64> {
    samples
        .windows(3)
        .map(|w| {
            let v = (w[2].y - w[0].y) / (2.0 * dt);
            params.energy(w[1].y, v)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
