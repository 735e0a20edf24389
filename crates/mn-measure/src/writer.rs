//! The `SampleSink` trait implemented by all sample backends.

use crate::{MeasureResult, SampleRecord};

/// Destination of the per-interval sample series.
pub trait SampleSink {
    /// Persist one sample.  An error ends the run.
    fn append(&mut self, record: &SampleRecord) -> MeasureResult<()>;

    /// Flush and close underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> MeasureResult<()>;
}

impl<S: SampleSink + ?Sized> SampleSink for Box<S> {
    fn append(&mut self, record: &SampleRecord) -> MeasureResult<()> {
        (**self).append(record)
    }

    fn finish(&mut self) -> MeasureResult<()> {
        (**self).finish()
    }
}

/// Keeps samples in memory.  Used by sweeps and tests.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    pub records:  Vec<SampleRecord>,
    pub finished: bool,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SampleSink for VecSink {
    fn append(&mut self, record: &SampleRecord) -> MeasureResult<()> {
        self.records.push(*record);
        Ok(())
    }

    fn finish(&mut self) -> MeasureResult<()> {
        self.finished = true;
        Ok(())
    }
}
