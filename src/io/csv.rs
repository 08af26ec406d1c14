use std::io::{self, Write};

use crate::sim::SamplePoint;

/// Write a sample sequence as CSV with columns `x,y`.
pub fn write_samples<W: Write>(writer: &mut W, samples: &[SamplePoint]) -> io::Result<()> {
    writeln!(writer, "x,y")?;
    for s in samples {
        writeln!(writer, "{:.6},{:.9}", s.x, s.y)?;
    }
    Ok(())
}

/// Write several labelled sequences in long format: `method,x,y`.
pub fn write_labelled<W: Write>(
    writer: &mut W,
    runs: &[(&str, &[SamplePoint])],
) -> io::Result<()> {
    writeln!(writer, "method,x,y")?;
    for (label, samples) in runs {
        for s in samples.iter() {
            writeln!(writer, "{},{:.6},{:.9}", label, s.x, s.y)?;
        }
    }
    Ok(())
}

/// Write labelled sequences to a CSV file at the given path.
pub fn write_labelled_file(path: &str, runs: &[(&str, &[SamplePoint])]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_labelled(&mut file, runs)
}
