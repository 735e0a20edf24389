//! SQLite sample backend (feature `sqlite`).
//!
//! One `samples` table keyed by simulation second.  Useful when many
//! replications are collected into a single database.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::SampleSink;
use crate::{MeasureResult, SampleRecord};

/// Writes the sample series to an SQLite database.
pub struct SqliteSampleWriter {
    conn:     Connection,
    run:      String,
    finished: bool,
}

impl SqliteSampleWriter {
    /// Open (or create) the database at `path` and initialise the schema.
    /// `run` labels every row written by this writer.
    pub fn open(path: &Path, run: &str) -> MeasureResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS samples (
                 run                TEXT    NOT NULL,
                 simulation_second  REAL    NOT NULL,
                 receive_rate_kbps  REAL    NOT NULL,
                 bytes_received     INTEGER NOT NULL,
                 packets_received   INTEGER NOT NULL,
                 number_of_sinks    INTEGER NOT NULL,
                 routing_protocol   TEXT    NOT NULL,
                 transmission_power REAL    NOT NULL,
                 PRIMARY KEY (run, simulation_second)
             );",
        )?;

        Ok(Self { conn, run: run.to_owned(), finished: false })
    }
}

impl SampleSink for SqliteSampleWriter {
    fn append(&mut self, record: &SampleRecord) -> MeasureResult<()> {
        self.conn.execute(
            "INSERT INTO samples \
             (run, simulation_second, receive_rate_kbps, bytes_received, packets_received, \
              number_of_sinks, routing_protocol, transmission_power) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                self.run,
                record.time.as_secs_f64(),
                record.rate_kbps(),
                record.bytes as i64,
                record.packets as i64,
                record.sink_count,
                record.protocol.as_str(),
                record.tx_power_dbm,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> MeasureResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
