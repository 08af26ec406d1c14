use std::f64::consts::PI;

use sho_sim::sim::{self, diagnostics};
use sho_sim::{OscillatorParameters, SimConfig};

fn main() {
    let params = OscillatorParameters {
        amplitude: 1.0,
        angular_frequency: 2.0 * PI, // 1 Hz
        ..Default::default()
    };

    println!("One-second window, |y - y_exact| at the last sample");
    println!("{:>8}  {:>12}  {:>12}  {:>12}", "dt", "Euler", "Verlet", "RK4");

    for dt in [0.04, 0.02, 0.01, 0.005] {
        let config = SimConfig { dt, ..Default::default() };
        let n = (1.0 / dt).round() as usize;
        let errors: Vec<f64> = sim::compare_methods(&params, &config, n)
            .iter()
            .map(|(_, pts)| diagnostics::max_abs_error(&pts[pts.len() - 1..], &params))
            .collect();
        println!(
            "{:>8.3}  {:>12.3e}  {:>12.3e}  {:>12.3e}",
            dt, errors[0], errors[1], errors[2]
        );
    }
}
