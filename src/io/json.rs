use std::io::{self, Write};

use crate::oscillator::OscillatorParameters;
use crate::sim::diagnostics::{count_non_finite, energy_series, max_abs_error};
use crate::sim::{Method, SamplePoint};

/// Summary statistics computed from one method's sample sequence.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub method: Method,
    pub samples: usize,
    pub x_start: f64,
    pub x_end: f64,
    pub max_error: f64,   // vs closed form
    pub energy_min: f64,  // central-difference velocity
    pub energy_max: f64,
    pub non_finite: usize,
}

impl RunSummary {
    /// Compute summary from sample data.
    pub fn from_samples(
        method: Method,
        samples: &[SamplePoint],
        params: &OscillatorParameters,
        dt: f64,
    ) -> Self {
        let energies = energy_series(samples, params, dt);
        let (energy_min, energy_max) = if energies.is_empty() {
            (f64::NAN, f64::NAN)
        } else {
            energies
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &e| {
                    (lo.min(e), hi.max(e))
                })
        };

        RunSummary {
            method,
            samples: samples.len(),
            x_start: samples.first().map_or(f64::NAN, |s| s.x),
            x_end: samples.last().map_or(f64::NAN, |s| s.x),
            max_error: max_abs_error(samples, params),
            energy_min,
            energy_max,
            non_finite: count_non_finite(samples),
        }
    }

    /// Relative spread of the energy series, (max − min) / min.
    pub fn energy_spread(&self) -> f64 {
        (self.energy_max - self.energy_min) / self.energy_min
    }
}

// Non-finite values have no JSON literal.
fn num(v: f64, precision: usize) -> String {
    if v.is_finite() {
        format!("{:.*}", precision, v)
    } else {
        "null".to_string()
    }
}

/// Write run summaries as JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    params: &OscillatorParameters,
    dt: f64,
    runs: &[RunSummary],
) -> io::Result<()> {
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"oscillator\": {{")?;
    writeln!(writer, "    \"amplitude\": {},", num(params.amplitude, 6))?;
    writeln!(writer, "    \"angular_frequency\": {},", num(params.angular_frequency, 6))?;
    writeln!(writer, "    \"phase_shift\": {},", num(params.phase_shift, 6))?;
    writeln!(writer, "    \"vertical_shift\": {},", num(params.vertical_shift, 6))?;
    writeln!(writer, "    \"horizontal_shift\": {},", num(params.horizontal_shift, 6))?;
    writeln!(writer, "    \"dt\": {}", num(dt, 6))?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"runs\": [")?;
    for (i, r) in runs.iter().enumerate() {
        writeln!(writer, "    {{")?;
        writeln!(writer, "      \"method\": \"{}\",", r.method)?;
        writeln!(writer, "      \"samples\": {},", r.samples)?;
        writeln!(writer, "      \"x_start\": {},", num(r.x_start, 6))?;
        writeln!(writer, "      \"x_end\": {},", num(r.x_end, 6))?;
        writeln!(writer, "      \"max_error\": {},", num(r.max_error, 12))?;
        writeln!(writer, "      \"energy_min\": {},", num(r.energy_min, 9))?;
        writeln!(writer, "      \"energy_max\": {},", num(r.energy_max, 9))?;
        writeln!(writer, "      \"non_finite\": {}", r.non_finite)?;
        let sep = if i + 1 < runs.len() { "," } else { "" };
        writeln!(writer, "    }}{}", sep)?;
    }
    writeln!(writer, "  ]")?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write run summary JSON to a file.
pub fn write_summary_file(
    path: &str,
    params: &OscillatorParameters,
    dt: f64,
    runs: &[RunSummary],
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, params, dt, runs)
}
