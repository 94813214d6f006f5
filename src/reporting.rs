//! Per-epoch training reports.
//!
//! The training driver emits one record per epoch into an `EpochSink`; the
//! file-backed sink writes a header row followed by one delimited record per
//! epoch, flushed immediately so a log is usable while a long run is still
//! in progress.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// One epoch's worth of reporting data.
#[derive(Clone, Debug, PartialEq)]
pub struct EpochRecord {
    pub epoch: usize,
    pub train_errors: usize,
    pub test_errors: usize,
    pub learning_rate: f64,
    pub momentum: f64,
    pub elapsed_secs: f64,
}

/// Consumer of per-epoch records.
pub trait EpochSink {
    fn record(&mut self, record: &EpochRecord) -> Result<()>;
}

/// CSV epoch log on disk.
pub struct CsvLogger {
    writer: BufWriter<File>,
}

impl CsvLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "epoch,train_errors,test_errors,learning_rate,momentum,elapsed_secs"
        )?;
        writer.flush()?;
        Ok(CsvLogger { writer })
    }
}

impl EpochSink for CsvLogger {
    fn record(&mut self, r: &EpochRecord) -> Result<()> {
        writeln!(
            self.writer,
            "{},{},{},{},{},{:.2}",
            r.epoch, r.train_errors, r.test_errors, r.learning_rate, r.momentum, r.elapsed_secs
        )?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects records in memory. Used by tests and short interactive runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<EpochRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EpochSink for MemorySink {
    fn record(&mut self, record: &EpochRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
