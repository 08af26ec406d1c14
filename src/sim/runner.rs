use log::{debug, trace, warn};

use crate::config::{SequenceMode, SimConfig};
use crate::oscillator::OscillatorParameters;
use super::diagnostics::first_non_finite;
use super::integrator::{IntegrationState, Method, SamplePoint};

// ---------------------------------------------------------------------------
// Integrator core
// ---------------------------------------------------------------------------

/// Owns the oscillator parameters, the active method's state and the sample
/// buffer. Independent instances share nothing and can run side by side.
#[derive(Debug, Clone)]
pub struct Oscillator {
    params: OscillatorParameters,
    config: SimConfig,
    method: Method,
    state: IntegrationState,
    samples: Vec<SamplePoint>,
    diverged: bool, // non-finite output already reported since the last reset
}

impl Oscillator {
    pub fn new(params: OscillatorParameters, config: SimConfig, method: Method) -> Self {
        let state = IntegrationState::initial(method, config.euler, &params, config.dt);
        let cap = if config.mode == SequenceMode::FixedWindow {
            config.sample_count
        } else {
            0
        };
        Self {
            params,
            config,
            method,
            state,
            samples: Vec::with_capacity(cap),
            diverged: false,
        }
    }

    pub fn params(&self) -> &OscillatorParameters {
        &self.params
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Active method; the renderer derives its style from this.
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn state(&self) -> &IntegrationState {
        &self.state
    }

    /// Samples produced so far (the current window, or the accumulated trace).
    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    /// Replace the oscillator parameters. State is re-seeded so the next batch
    /// follows the new closed form.
    pub fn configure(&mut self, params: OscillatorParameters) {
        debug!("configure: {:?}", params);
        self.params = params;
        self.reset();
    }

    /// Replace the step size, window length, sequence mode or Euler scheme.
    pub fn set_config(&mut self, config: SimConfig) {
        debug!("config: {:?}", config);
        self.config = config;
        self.reset();
    }

    /// Switch the active method and fully re-seed its state.
    pub fn select_method(&mut self, method: Method) {
        debug!("method {} -> {}", self.method, method);
        self.method = method;
        self.reset();
    }

    /// Advance to the next method in cycle order, returning it.
    pub fn cycle_method(&mut self) -> Method {
        self.select_method(self.method.next());
        self.method
    }

    /// Whether a non-finite sample has been produced since the last reset.
    pub fn diverged(&self) -> bool {
        self.diverged
    }

    /// Re-seed state from the closed form at t = 0 and drop accumulated samples.
    pub fn reset(&mut self) {
        self.reseed();
        self.diverged = false;
    }

    fn reseed(&mut self) {
        self.state =
            IntegrationState::initial(self.method, self.config.euler, &self.params, self.config.dt);
        self.samples.clear();
    }

    /// Produce `step_count` samples with the active method.
    ///
    /// Fixed-window mode restarts from t = 0 and the result holds exactly
    /// `step_count` points. Accumulating mode continues from the current state
    /// and appends, trimming the oldest points beyond `history_limit`.
    pub fn generate(&mut self, step_count: usize) -> &[SamplePoint] {
        if self.config.mode == SequenceMode::FixedWindow {
            self.reseed();
        }

        let start = self.samples.len();
        self.samples.reserve(step_count);
        for _ in 0..step_count {
            let (next, sample) = self.state.advance(&self.params, self.config.dt);
            self.state = next;
            self.samples.push(sample);
        }

        if !self.diverged {
            if let Some(i) = first_non_finite(&self.samples[start..]) {
                self.diverged = true;
                warn!(
                    "{}: non-finite sample at index {} (omega={}, dt={})",
                    self.method,
                    start + i,
                    self.params.angular_frequency,
                    self.config.dt
                );
            }
        }

        if self.config.mode == SequenceMode::Accumulating {
            if let Some(limit) = self.config.history_limit {
                if self.samples.len() > limit {
                    let excess = self.samples.len() - limit;
                    self.samples.drain(..excess);
                }
            }
        }

        trace!(
            "{}: generated {} samples, buffer {}, t={:.4}",
            self.method,
            step_count,
            self.samples.len(),
            self.state.time()
        );
        &self.samples
    }

    /// One frame using the configured sample count.
    pub fn generate_frame(&mut self) -> &[SamplePoint] {
        self.generate(self.config.sample_count)
    }
}

/// Run every method once over a fixed window with shared parameters.
pub fn compare_methods(
    params: &OscillatorParameters,
    config: &SimConfig,
    step_count: usize,
) -> Vec<(Method, Vec<SamplePoint>)> {
    Method::ALL
        .iter()
        .map(|&m| {
            let mut osc = Oscillator::new(*params, config.clone(), m);
            (m, osc.generate(step_count).to_vec())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_HISTORY_LIMIT;
    use crate::sim::diagnostics::max_abs_error;
    use crate::sim::integrator::EulerScheme;
    use std::f64::consts::PI;

    fn unit() -> OscillatorParameters {
        OscillatorParameters::default()
    }

    fn config(dt: f64) -> SimConfig {
        SimConfig { dt, ..Default::default() }
    }

    #[test]
    fn euler_matches_worked_example() {
        let p = OscillatorParameters {
            angular_frequency: 2.0 * PI,
            ..unit()
        };
        let mut osc = Oscillator::new(p, config(0.01), Method::Euler);
        let pts = osc.generate(100);
        assert_eq!(pts.len(), 100);
        assert_eq!(pts[0], SamplePoint::new(0.0, 1.0));
        assert!((pts[50].x - 0.5).abs() < 1e-9);
        assert!((pts[50].y - (2.0 * PI * 0.5).cos()).abs() < 1e-6);
    }

    #[test]
    fn euler_agrees_with_closed_form() {
        let p = OscillatorParameters {
            amplitude: 2.0,
            angular_frequency: 3.0,
            phase_shift: 0.2,
            vertical_shift: 0.5,
            ..unit()
        };
        let mut osc = Oscillator::new(p, config(0.37), Method::Euler);
        for pt in osc.generate(500) {
            let expected = p.displacement(pt.x);
            assert!((pt.y - expected).abs() <= 1e-6 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn rk4_converges_at_fourth_order() {
        let p = OscillatorParameters {
            phase_shift: 0.3,
            ..unit()
        };
        let duration: f64 = 2.0;
        let errors: Vec<f64> = [0.1, 0.05, 0.025]
            .iter()
            .map(|&dt| {
                let n = (duration / dt).round() as usize;
                let mut osc = Oscillator::new(p, config(dt), Method::Rk4);
                let last = *osc.generate(n).last().unwrap();
                (last.y - p.displacement(last.x)).abs()
            })
            .collect();
        for pair in errors.windows(2) {
            let ratio = pair[0] / pair[1];
            assert!(ratio > 12.0 && ratio < 20.0, "error ratio {:.2} ({:?})", ratio, errors);
        }
    }

    #[test]
    fn verlet_and_rk4_energy_stays_bounded() {
        let p = unit();
        let dt = 0.01;
        for method in [Method::Verlet, Method::Rk4] {
            let mut osc = Oscillator::new(p, config(dt), method);
            let pts = osc.generate(10_000).to_vec();
            let energies = crate::sim::diagnostics::energy_series(&pts, &p, dt);
            let e0 = energies[0];
            let drift = energies.iter().map(|e| (e - e0).abs()).fold(0.0_f64, f64::max);
            assert!(drift / e0 < 1e-3, "{}: relative energy drift {:.2e}", method, drift / e0);
        }
    }

    #[test]
    fn forward_euler_energy_grows() {
        let p = unit();
        let dt = 0.01;
        let cfg = SimConfig {
            dt,
            euler: EulerScheme::Forward,
            ..Default::default()
        };
        let mut osc = Oscillator::new(p, cfg, Method::Euler);
        let pts = osc.generate(10_000).to_vec();
        let energies = crate::sim::diagnostics::energy_series(&pts, &p, dt);
        let first = energies[..100].iter().sum::<f64>() / 100.0;
        let last = energies[energies.len() - 100..].iter().sum::<f64>() / 100.0;
        assert!(last > first * 1.5, "forward Euler energy {first} -> {last}");
    }

    #[test]
    fn switching_methods_resets_state() {
        let p = OscillatorParameters {
            amplitude: 0.8,
            angular_frequency: 4.0,
            ..unit()
        };
        let cfg = SimConfig {
            dt: 0.01,
            mode: SequenceMode::Accumulating,
            ..Default::default()
        };
        for from in Method::ALL {
            for to in Method::ALL {
                let mut osc = Oscillator::new(p, cfg.clone(), from);
                osc.generate(137);
                osc.select_method(to);
                let pts = osc.generate(1);
                assert_eq!(pts.len(), 1, "{from} -> {to}");
                let pt = pts[0];
                let t = if to == Method::Euler { 0.0 } else { 0.01 };
                assert!((pt.x - t).abs() < 1e-12, "{from} -> {to}: x={}", pt.x);
                assert!((pt.y - p.displacement(t)).abs() < 1e-4, "{from} -> {to}: y={}", pt.y);
            }
        }
    }

    #[test]
    fn fixed_window_recomputes_from_zero() {
        let p = OscillatorParameters {
            horizontal_shift: 1.5,
            ..unit()
        };
        let dt = 0.02;
        let mut osc = Oscillator::new(p, config(dt), Method::Verlet);
        let first = osc.generate(64).to_vec();
        let second = osc.generate(64).to_vec();
        assert_eq!(first, second);
        assert_eq!(second.len(), 64);
        for (i, pt) in second.iter().enumerate() {
            let expected_x = (i + 1) as f64 * dt + 1.5;
            assert!((pt.x - expected_x).abs() < 1e-9);
        }
        for pair in second.windows(2) {
            assert!(((pair[1].x - pair[0].x) - dt).abs() < 1e-9);
        }
    }

    #[test]
    fn accumulating_appends_across_calls() {
        let dt = 0.05;
        let cfg = SimConfig {
            dt,
            mode: SequenceMode::Accumulating,
            ..Default::default()
        };
        let mut osc = Oscillator::new(unit(), cfg, Method::Rk4);
        osc.generate(10);
        let pts = osc.generate(15).to_vec();
        assert_eq!(pts.len(), 25);
        for pair in pts.windows(2) {
            assert!(((pair[1].x - pair[0].x) - dt).abs() < 1e-9);
        }

        osc.reset();
        assert!(osc.samples().is_empty());
        let pts = osc.generate(1);
        assert!((pts[0].x - dt).abs() < 1e-12);
    }

    #[test]
    fn accumulating_trims_to_history_limit() {
        let dt = 0.1;
        let cfg = SimConfig {
            dt,
            mode: SequenceMode::Accumulating,
            history_limit: Some(30),
            ..Default::default()
        };
        let mut osc = Oscillator::new(unit(), cfg, Method::Euler);
        for _ in 0..5 {
            osc.generate(20);
        }
        let pts = osc.samples();
        assert_eq!(pts.len(), 30);
        // Newest sample is index 99 of the analytic run.
        assert!((pts[29].x - 99.0 * dt).abs() < 1e-9);
        assert!((pts[0].x - 70.0 * dt).abs() < 1e-9);
    }

    #[test]
    fn accumulating_is_bounded_by_default() {
        let cfg = SimConfig {
            mode: SequenceMode::Accumulating,
            ..config(0.01)
        };
        let mut osc = Oscillator::new(unit(), cfg, Method::Euler);
        osc.generate(DEFAULT_HISTORY_LIMIT);
        osc.generate(50);
        assert_eq!(osc.samples().len(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn zero_steps_yields_empty_window() {
        let mut osc = Oscillator::new(unit(), config(0.01), Method::Rk4);
        assert!(osc.generate(0).is_empty());
    }

    #[test]
    fn cycle_method_follows_switch_order() {
        let mut osc = Oscillator::new(unit(), config(0.01), Method::Euler);
        assert_eq!(osc.cycle_method(), Method::Verlet);
        assert_eq!(osc.cycle_method(), Method::Rk4);
        assert_eq!(osc.cycle_method(), Method::Euler);
    }

    #[test]
    fn configure_reseeds_state() {
        let cfg = SimConfig {
            mode: SequenceMode::Accumulating,
            ..config(0.01)
        };
        let mut osc = Oscillator::new(unit(), cfg, Method::Verlet);
        osc.generate(50);
        let p = OscillatorParameters {
            amplitude: 3.0,
            ..unit()
        };
        osc.configure(p);
        assert!(osc.samples().is_empty());
        let pt = osc.generate(1)[0];
        assert!((pt.y - p.displacement(0.01)).abs() < 1e-4);
    }

    #[test]
    fn independent_instances_do_not_interfere() {
        let p = unit();
        let q = OscillatorParameters {
            amplitude: 4.0,
            angular_frequency: 7.0,
            ..unit()
        };
        let acc = SimConfig {
            mode: SequenceMode::Accumulating,
            ..config(0.01)
        };
        let solo_a = Oscillator::new(p, acc.clone(), Method::Verlet).generate(200).to_vec();
        let solo_b = Oscillator::new(q, acc.clone(), Method::Rk4).generate(200).to_vec();

        let mut a = Oscillator::new(p, acc.clone(), Method::Verlet);
        let mut b = Oscillator::new(q, acc, Method::Rk4);
        for _ in 0..20 {
            a.generate(10);
            b.generate(10);
        }
        assert_eq!(a.samples(), &solo_a[..]);
        assert_eq!(b.samples(), &solo_b[..]);
    }

    #[test]
    fn non_finite_output_does_not_halt() {
        let p = OscillatorParameters {
            angular_frequency: 1e200,
            ..unit()
        };
        let mut osc = Oscillator::new(p, config(1.0), Method::Rk4);
        let pts = osc.generate(20);
        assert_eq!(pts.len(), 20);
        assert!(pts.iter().any(|pt| !pt.y.is_finite()));
        assert!(osc.diverged());
    }

    #[test]
    fn divergence_flag_latches_until_reset() {
        let p = OscillatorParameters {
            angular_frequency: 1e200,
            ..unit()
        };
        let cfg = SimConfig {
            mode: SequenceMode::Accumulating,
            ..config(1.0)
        };
        let mut osc = Oscillator::new(p, cfg, Method::Verlet);
        assert!(!osc.diverged());
        osc.generate(5);
        assert!(osc.diverged());
        osc.generate(5);
        assert!(osc.diverged());

        osc.reset();
        assert!(!osc.diverged());
        osc.configure(unit());
        osc.generate(5);
        assert!(!osc.diverged());
    }

    #[test]
    fn divergence_flag_survives_fixed_window_frames() {
        let p = OscillatorParameters {
            angular_frequency: 1e200,
            ..unit()
        };
        let mut osc = Oscillator::new(p, config(1.0), Method::Rk4);
        osc.generate(5);
        osc.generate(5);
        assert!(osc.diverged());
        osc.select_method(Method::Euler);
        assert!(!osc.diverged());
    }

    #[test]
    fn comparison_covers_all_methods() {
        let p = unit();
        let results = compare_methods(&p, &config(0.01), 300);
        assert_eq!(results.len(), 3);
        for (m, pts) in &results {
            assert_eq!(pts.len(), 300);
            assert!(max_abs_error(pts, &p) < 1e-3, "{m} strayed from closed form");
        }
    }
}
