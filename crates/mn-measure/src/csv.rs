//! CSV sample backend.
//!
//! One file, header written at creation, one row per sampling interval:
//!
//! ```text
//! SimulationSecond,ReceiveRate,PacketsReceived,NumberOfSinks,RoutingProtocol,TransmissionPower
//! 1,2.4,3,15,AODV,7.5
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::writer::SampleSink;
use crate::{MeasureError, MeasureResult, SampleRecord};

pub const HEADER: [&str; 6] = [
    "SimulationSecond",
    "ReceiveRate",
    "PacketsReceived",
    "NumberOfSinks",
    "RoutingProtocol",
    "TransmissionPower",
];

/// Writes the throughput time series as CSV.
///
/// Each row is flushed as soon as it is written so an aborted run leaves a
/// readable prefix.
pub struct CsvSampleWriter<W: Write = File> {
    writer:   Writer<W>,
    finished: bool,
}

impl CsvSampleWriter<File> {
    /// Create (truncating) `path` and write the header row.
    pub fn create(path: &Path) -> MeasureResult<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvSampleWriter<W> {
    pub fn from_writer(inner: W) -> MeasureResult<Self> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(HEADER)?;
        writer.flush()?;
        Ok(Self { writer, finished: false })
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> MeasureResult<W> {
        self.writer.flush()?;
        self.writer.into_inner().map_err(|e| MeasureError::from(e.into_error()))
    }
}

impl<W: Write> SampleSink for CsvSampleWriter<W> {
    fn append(&mut self, record: &SampleRecord) -> MeasureResult<()> {
        self.writer.write_record(&[
            record.time.to_string(),
            record.rate_kbps().to_string(),
            record.packets.to_string(),
            record.sink_count.to_string(),
            record.protocol.as_str().to_owned(),
            record.tx_power_dbm.to_string(),
        ])?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> MeasureResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}
