//! Timing report for `mdpipe bench`
//!
//! Measures reading the input (a file, or stdin for `-`), building the
//! pipeline, the first render, and a number of repeated renders of the same
//! text.

use mdpipe::{Pipeline, PipelineOptions, WorkingDirectory};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct BenchReport {
    pub read: Duration,
    pub build: Duration,
    pub first: Duration,
    pub repeats: Vec<Duration>,
    /// Output of the first render
    pub output: String,
}

pub fn run_bench(
    input: &str,
    options: &PipelineOptions,
    directory: Arc<dyn WorkingDirectory>,
    iterations: usize,
) -> Result<BenchReport, String> {
    let started = Instant::now();
    let (source, path) = crate::read_input(input)?;
    let read = started.elapsed();

    let started = Instant::now();
    let pipeline = Pipeline::standard(options, directory);
    let build = started.elapsed();

    let render = |source: &str| -> Result<(String, Duration), String> {
        let started = Instant::now();
        let mut file = pipeline.file(source);
        if let Some(path) = &path {
            file = file.with_path(path.clone());
        }
        let file = pipeline
            .process(file)
            .map_err(|e| format!("Processing error: {e}"))?;
        Ok((file.value, started.elapsed()))
    };

    let (output, first) = render(&source)?;
    let mut repeats = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let (_, elapsed) = render(&source)?;
        repeats.push(elapsed);
    }

    tracing::debug!(iterations, bytes = source.len(), "bench finished");

    Ok(BenchReport {
        read,
        build,
        first,
        repeats,
        output,
    })
}

fn millis(duration: Duration) -> String {
    format!("{:.3}ms", duration.as_secs_f64() * 1000.0)
}

impl BenchReport {
    pub fn mean_repeat(&self) -> Option<Duration> {
        if self.repeats.is_empty() {
            return None;
        }
        let total: Duration = self.repeats.iter().sum();
        Some(total / self.repeats.len() as u32)
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reading file took:           | {}", millis(self.read))?;
        writeln!(f, "Building pipeline took:      | {}", millis(self.build))?;
        writeln!(f, "Parsing markdown took:       | {}", millis(self.first))?;
        for repeat in &self.repeats {
            writeln!(f, "Parsing markdown again took: | {}", millis(*repeat))?;
        }
        if let Some(mean) = self.mean_repeat() {
            writeln!(f, "Mean of repeated parses:     | {}", millis(mean))?;
        }
        Ok(())
    }
}
