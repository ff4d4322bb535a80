//! Tab-separated measurement output.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::error::Result;
use crate::sampling::{Measurement, ObservableSink};

/// Writes one `step <x> <x²> action` row per measurement, without a header.
pub struct TsvWriter<W: Write> {
    writer: Writer<W>,
}

impl TsvWriter<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> TsvWriter<W> {
    pub fn new(inner: W) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(inner);
        Self { writer }
    }

    pub fn write(&mut self, m: &Measurement) -> Result<()> {
        self.writer.write_record(&[
            m.step.to_string(),
            m.x_average.to_string(),
            m.x_square_average.to_string(),
            m.action_average.to_string(),
        ])?;
        Ok(())
    }

    /// Flush buffered rows and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        let inner = self
            .writer
            .into_inner()
            .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()))?;
        Ok(inner)
    }
}

impl<W: Write> ObservableSink for TsvWriter<W> {
    fn record(&mut self, measurement: &Measurement) -> Result<()> {
        self.write(measurement)
    }
}
