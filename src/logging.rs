// src/logging.rs
//
// Queue-telemetry sinks.
// - TelemetrySink: trait used by the environment's periodic sampler
// - NoopSink:      discards all samples
// - MemoryLog:     accumulates samples in memory (default result surface)
// - JsonlSink:     writes one JSON line per sample for external tooling

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::SimTime;

/// Periodic snapshot of the checkout area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSample {
    /// Simulated minute of the sample.
    pub time: SimTime,
    /// Per-checkout wait-list lengths, in pool order.
    pub queue_lengths: Vec<usize>,
    /// Open checkouts at sample time.
    pub open_count: usize,
}

impl QueueSample {
    /// Total waiting customers in this sample.
    pub fn total_queue(&self) -> usize {
        self.queue_lengths.iter().sum()
    }
}

/// Abstract sink for periodic queue samples.
pub trait TelemetrySink {
    fn record(&mut self, sample: &QueueSample);
}

/// Sink that discards all samples.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl TelemetrySink for NoopSink {
    fn record(&mut self, _sample: &QueueSample) {
        // intentionally no-op
    }
}

/// Accumulating in-memory log.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryLog {
    samples: Vec<QueueSample>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[QueueSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_samples(self) -> Vec<QueueSample> {
        self.samples
    }
}

impl TelemetrySink for MemoryLog {
    fn record(&mut self, sample: &QueueSample) {
        self.samples.push(sample.clone());
    }
}

/// JSONL file sink: one sample object per line.
pub struct JsonlSink {
    writer: BufWriter<File>,
}

impl JsonlSink {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl TelemetrySink for JsonlSink {
    fn record(&mut self, sample: &QueueSample) {
        // Telemetry failures must not crash the simulation, so I/O
        // errors are deliberately ignored.
        if serde_json::to_writer(&mut self.writer, sample).is_ok() {
            let _ = self.writer.write_all(b"\n");
        }
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: SimTime) -> QueueSample {
        QueueSample {
            time,
            queue_lengths: vec![1, 0, 2],
            open_count: 3,
        }
    }

    #[test]
    fn memory_log_accumulates_in_order() {
        let mut log = MemoryLog::new();
        log.record(&sample(1.0));
        log.record(&sample(2.0));
        assert_eq!(log.len(), 2);
        assert_eq!(log.samples()[0].time, 1.0);
        assert_eq!(log.samples()[1].total_queue(), 3);
    }

    #[test]
    fn jsonl_sink_writes_one_line_per_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue_log.jsonl");
        {
            let mut sink = JsonlSink::create(&path).unwrap();
            sink.record(&sample(1.0));
            sink.record(&sample(2.0));
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: QueueSample = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, sample(1.0));
    }
}
