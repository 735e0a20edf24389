//! Human-readable mobility trace (`<trace name>.mob`).
//!
//! One line per course change, in time order across all nodes:
//!
//! ```text
//! t=12.5 node=3 pos=731.20:88.04 vel=-4.17:9.80
//! ```
//!
//! The velocity is the one the node holds from that instant on.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mn_core::SimTime;
use mn_mobility::MobilityTrace;

use crate::MeasureResult;

pub struct MobilityTraceWriter<W: Write = BufWriter<File>> {
    out:      W,
    lines:    u64,
    finished: bool,
}

impl MobilityTraceWriter<BufWriter<File>> {
    pub fn create(path: &Path) -> MeasureResult<Self> {
        Ok(Self::from_writer(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> MobilityTraceWriter<W> {
    pub fn from_writer(out: W) -> Self {
        Self { out, lines: 0, finished: false }
    }

    /// Write every waypoint of `traces` (indexed by node id) up to and
    /// including `horizon`, merged into one time-ordered stream.  Ties are
    /// broken by node id.
    pub fn write_all<'a>(
        &mut self,
        traces:  impl IntoIterator<Item = &'a MobilityTrace>,
        horizon: SimTime,
    ) -> MeasureResult<()> {
        let traces: Vec<&MobilityTrace> = traces.into_iter().collect();
        let mut events: Vec<(SimTime, u32, usize)> = traces
            .iter()
            .enumerate()
            .flat_map(|(node, trace)| {
                trace
                    .waypoints()
                    .iter()
                    .enumerate()
                    .filter(move |(_, w)| w.time <= horizon)
                    .map(move |(i, w)| (w.time, node as u32, i))
            })
            .collect();
        events.sort_unstable();

        for (time, node, i) in events {
            let trace = traces[node as usize];
            let position = trace.waypoints()[i].position;
            let (vx, vy) = trace.velocity_at(time);
            writeln!(self.out, "t={time} node={node} pos={position} vel={vx:.2}:{vy:.2}")?;
            self.lines += 1;
        }
        Ok(())
    }

    /// Lines written so far.
    #[inline]
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush.  Idempotent.
    pub fn finish(&mut self) -> MeasureResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(mut self) -> MeasureResult<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
