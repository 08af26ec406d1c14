use sho_sim::io::csv;
use sho_sim::{EulerScheme, Method, Oscillator, OscillatorParameters, SequenceMode, SimConfig};

fn main() {
    let params = OscillatorParameters::default().with_spring_constant(4.0);
    let config = SimConfig {
        dt: 0.02,
        sample_count: 50,
        mode: SequenceMode::Accumulating,
        euler: EulerScheme::Forward,
        history_limit: Some(400),
    };

    // Ten frames per method, switching as a key press would. Each switch
    // clears the trace; the last method's samples are written out.
    let mut osc = Oscillator::new(params, config, Method::Euler);
    for i in 0..Method::ALL.len() {
        if i > 0 {
            osc.cycle_method();
        }
        for _ in 0..10 {
            osc.generate_frame();
        }
        eprintln!(
            "{:>6}: {} points, rgb {:?}, t = {:.2}",
            osc.method(),
            osc.samples().len(),
            osc.method().color_rgb(),
            osc.state().time()
        );
    }

    csv::write_samples(&mut std::io::stdout().lock(), osc.samples()).expect("Failed to write CSV");
}
