use std::process::ExitCode;

use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

use sho_sim::io::csv;
use sho_sim::io::json::{self, RunSummary};
use sho_sim::{Method, Oscillator, RunConfig, SamplePoint, SequenceMode};

fn main() -> ExitCode {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .ok();

    let cfg = match RunConfig::from_args(std::env::args().skip(1)) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            eprintln!(
                "usage: sho-sim [amplitude=A] [omega=W] [phase=D] [vertical=C] [horizontal=H] \
                 [spring=K] [dt=DT] [samples=N] [mode=fixed-window|accumulating] \
                 [euler=analytic|forward] [method=euler|verlet|rk4|all] [history=N|none] \
                 [csv=PATH] [json=PATH]"
            );
            return ExitCode::from(2);
        }
    };

    let methods: Vec<Method> = match cfg.method {
        Some(m) => vec![m],
        None => Method::ALL.to_vec(),
    };

    // -----------------------------------------------------------------------
    // Run each method
    // -----------------------------------------------------------------------
    let frames = if cfg.sim.mode == SequenceMode::Accumulating { 3 } else { 1 };
    let runs: Vec<(Method, Vec<SamplePoint>)> = methods
        .iter()
        .map(|&m| {
            let mut osc = Oscillator::new(cfg.params, cfg.sim.clone(), m);
            for _ in 0..frames {
                osc.generate_frame();
            }
            (m, osc.samples().to_vec())
        })
        .collect();

    let summaries: Vec<RunSummary> = runs
        .iter()
        .map(|(m, pts)| RunSummary::from_samples(*m, pts, &cfg.params, cfg.sim.dt))
        .collect();

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    let p = &cfg.params;
    println!();
    println!("====================================================================");
    println!("  SIMPLE HARMONIC OSCILLATOR");
    println!("====================================================================");
    println!();
    println!("  Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Amplitude:     {:>10.4}      Omega:        {:>10.4} rad/s",
        p.amplitude, p.angular_frequency
    );
    println!(
        "  Phase shift:   {:>10.4}      Vert. shift:  {:>10.4}",
        p.phase_shift, p.vertical_shift
    );
    println!(
        "  Horiz. shift:  {:>10.4}      Period:       {:>10.4} s",
        p.horizontal_shift,
        p.period()
    );
    println!(
        "  dt:            {:>10.5}      Samples:      {:>10}   ({:?}, {:?} Euler)",
        cfg.sim.dt, cfg.sim.sample_count, cfg.sim.mode, cfg.sim.euler
    );
    println!();

    println!("  Method Comparison");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>7}  {:>10}  {:>12}  {:>12}  {:>8}",
        "method", "points", "x_end", "max |err|", "E spread", "non-fin"
    );
    println!("  {}", "─".repeat(64));
    for s in &summaries {
        println!(
            "  {:>7}  {:>7}  {:>10.4}  {:>12.3e}  {:>12.3e}  {:>8}",
            s.method.name(),
            s.samples,
            s.x_end,
            s.max_error,
            s.energy_spread(),
            s.non_finite
        );
    }
    println!();

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------
    if let Some(path) = &cfg.csv_path {
        let labelled: Vec<(&str, &[SamplePoint])> =
            runs.iter().map(|(m, pts)| (m.name(), pts.as_slice())).collect();
        match csv::write_labelled_file(path, &labelled) {
            Ok(()) => info!("wrote samples to {}", path),
            Err(e) => {
                error!("failed to write {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(path) = &cfg.json_path {
        match json::write_summary_file(path, &cfg.params, cfg.sim.dt, &summaries) {
            Ok(()) => info!("wrote summary to {}", path),
            Err(e) => {
                error!("failed to write {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        }
    }

    println!("====================================================================");
    ExitCode::SUCCESS
}
