//! Unit tests for mn-measure.

use mn_core::{AddressPlan, FlowId, NodeId, PacketId, RoutingProtocol, SimTime};
use mn_traffic::FlowSpec;

use crate::{MeasureError, MeasureResult, SampleRecord, SampleSink, ThroughputMonitor, VecSink};

fn secs(s: f64) -> SimTime {
    SimTime::from_secs_f64(s)
}

fn monitor() -> ThroughputMonitor {
    ThroughputMonitor::new(RoutingProtocol::Aodv, 15, 7.5)
}

fn sample(time: u64, bytes: u64, packets: u64) -> SampleRecord {
    SampleRecord {
        time: SimTime::from_secs(time),
        bytes,
        packets,
        sink_count: 15,
        protocol: RoutingProtocol::Aodv,
        tx_power_dbm: 7.5,
    }
}

/// A sink whose storage has gone away.
struct BrokenSink;

impl SampleSink for BrokenSink {
    fn append(&mut self, _record: &SampleRecord) -> MeasureResult<()> {
        Err(MeasureError::Io(std::io::Error::other("disk full")))
    }

    fn finish(&mut self) -> MeasureResult<()> {
        Ok(())
    }
}

// ── ThroughputMonitor ─────────────────────────────────────────────────────────

#[cfg(test)]
mod monitor_tests {
    use super::*;

    #[test]
    fn receptions_land_in_the_window_they_precede() {
        let mut m = monitor();
        let mut sink = VecSink::new();
        m.on_receive(secs(0.2), NodeId(0), Some(NodeId(15)), 100);
        m.on_receive(secs(0.5), NodeId(1), Some(NodeId(16)), 200);
        let first = m.tick(secs(1.0), &mut sink).unwrap();
        m.on_receive(secs(1.7), NodeId(0), Some(NodeId(15)), 50);
        let second = m.tick(secs(2.0), &mut sink).unwrap();

        assert_eq!((first.bytes, first.packets), (300, 2));
        assert!((first.rate_kbps() - 2.4).abs() < 1e-12);
        assert_eq!((second.bytes, second.packets), (50, 1));
        assert!((second.rate_kbps() - 0.4).abs() < 1e-12);
        assert_eq!(sink.records, [first, second]);
        assert_eq!(m.series(), &[first, second]);
    }

    #[test]
    fn quiet_interval_yields_zero_sample() {
        let mut m = monitor();
        let mut sink = VecSink::new();
        let rec = m.tick(secs(1.0), &mut sink).unwrap();
        assert_eq!(rec, sample(1, 0, 0));
        assert_eq!(rec.rate_kbps(), 0.0);
    }

    #[test]
    fn unknown_sender_still_counts() {
        let mut m = monitor();
        m.on_receive(secs(0.1), NodeId(3), None, 64);
        m.on_receive(secs(0.2), NodeId(3), Some(NodeId(900)), 64);
        assert_eq!(m.pending(), (128, 2));
    }

    #[test]
    fn counters_saturate() {
        let mut m = monitor();
        m.on_receive(secs(0.1), NodeId(0), None, u32::MAX);
        for _ in 0..3 {
            m.on_receive(secs(0.1), NodeId(0), None, u32::MAX);
        }
        assert_eq!(m.pending().0, 4 * u32::MAX as u64);
        assert_eq!(m.totals(), m.pending());
    }

    #[test]
    fn totals_survive_ticks() {
        let mut m = monitor();
        let mut sink = VecSink::new();
        m.on_receive(secs(0.5), NodeId(0), None, 10);
        m.tick(secs(1.0), &mut sink).unwrap();
        m.on_receive(secs(1.5), NodeId(0), None, 20);
        m.tick(secs(2.0), &mut sink).unwrap();
        assert_eq!(m.totals(), (30, 2));
        assert_eq!(m.pending(), (0, 0));
    }

    #[test]
    fn sink_failure_is_returned() {
        let mut m = monitor();
        m.on_receive(secs(0.5), NodeId(0), None, 10);
        let err = m.tick(secs(1.0), &mut BrokenSink).unwrap_err();
        assert!(matches!(err, MeasureError::Io(_)));
        assert_eq!(m.pending(), (0, 0));
        assert!(m.series().is_empty());
    }

    #[test]
    fn series_holds_only_persisted_samples() {
        let mut m = monitor();
        let mut sink = VecSink::new();
        m.on_receive(secs(0.5), NodeId(0), None, 10);
        m.tick(secs(1.0), &mut sink).unwrap();
        m.on_receive(secs(1.5), NodeId(0), None, 20);
        m.tick(secs(2.0), &mut BrokenSink).unwrap_err();
        assert_eq!(m.series(), sink.records.as_slice());
        assert_eq!(m.series().len(), 1);
    }

    #[test]
    fn boxed_sink_dispatch() {
        let mut m = monitor();
        let mut sink: Box<dyn SampleSink> = Box::new(VecSink::new());
        m.tick(secs(1.0), &mut sink).unwrap();
        sink.finish().unwrap();
    }
}

// ── CSV sink ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::CsvSampleWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn header_written_at_creation() {
        let dir = tmp();
        let path = dir.path().join("out.csv");
        let _w = CsvSampleWriter::create(&path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            [
                "SimulationSecond",
                "ReceiveRate",
                "PacketsReceived",
                "NumberOfSinks",
                "RoutingProtocol",
                "TransmissionPower"
            ]
        );
        assert_eq!(rdr.records().count(), 0);
    }

    #[test]
    fn rows_are_readable_without_finish() {
        let dir = tmp();
        let path = dir.path().join("out.csv");
        let mut w = CsvSampleWriter::create(&path).unwrap();
        w.append(&sample(1, 300, 2)).unwrap();
        w.append(&sample(2, 0, 0)).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], "2.4");
        assert_eq!(&rows[0][2], "2");
        assert_eq!(&rows[0][3], "15");
        assert_eq!(&rows[0][4], "AODV");
        assert_eq!(&rows[0][5], "7.5");
        assert_eq!(&rows[1][1], "0");
    }

    #[test]
    fn in_memory_writer() {
        let mut w = CsvSampleWriter::from_writer(Vec::new()).unwrap();
        w.append(&sample(3, 1000, 4)).unwrap();
        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("SimulationSecond,"));
        assert_eq!(lines.next(), Some("3,8,4,15,AODV,7.5"));
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvSampleWriter::create(&dir.path().join("out.csv")).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tmp();
        let path = dir.path().join("no-such-dir").join("out.csv");
        assert!(matches!(CsvSampleWriter::create(&path), Err(MeasureError::Io(_))));
    }
}

// ── SQLite sink ───────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::SqliteSampleWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn rows_persisted_per_run() {
        let dir = tmp();
        let path = dir.path().join("samples.db");
        let mut a = SqliteSampleWriter::open(&path, "seed-1").unwrap();
        a.append(&sample(1, 300, 2)).unwrap();
        a.append(&sample(2, 50, 1)).unwrap();
        a.finish().unwrap();
        let mut b = SqliteSampleWriter::open(&path, "seed-2").unwrap();
        b.append(&sample(1, 0, 0)).unwrap();
        b.finish().unwrap();

        let conn = rusqlite::Connection::open(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM samples WHERE run = 'seed-1'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);
        let (rate, proto): (f64, String) = conn
            .query_row(
                "SELECT receive_rate_kbps, routing_protocol FROM samples \
                 WHERE run = 'seed-1' AND simulation_second = 1.0",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert!((rate - 2.4).abs() < 1e-12);
        assert_eq!(proto, "AODV");
    }

    #[test]
    fn duplicate_second_is_an_error() {
        let dir = tmp();
        let mut w = SqliteSampleWriter::open(&dir.path().join("samples.db"), "r").unwrap();
        w.append(&sample(1, 0, 0)).unwrap();
        assert!(matches!(w.append(&sample(1, 0, 0)), Err(MeasureError::Sqlite(_))));
    }
}

// ── Flow statistics ───────────────────────────────────────────────────────────

#[cfg(test)]
mod flowstats_tests {
    use super::*;
    use crate::{DropReason, FlowStatsCollector};

    fn flows() -> Vec<FlowSpec> {
        (0..2)
            .map(|i| FlowSpec {
                id:            FlowId(i),
                source:        NodeId(2 + i),
                sink:          NodeId(i),
                sink_start:    SimTime::ZERO,
                start:         SimTime::from_secs(1),
                stop:          SimTime::from_secs(10),
                payload_bytes: 100,
                rate_bps:      800,
            })
            .collect()
    }

    #[test]
    fn delay_and_jitter() {
        let mut c = FlowStatsCollector::new(&flows(), AddressPlan::default());
        c.on_tx(FlowId(0), PacketId(0), secs(1.0), 100);
        c.on_tx(FlowId(0), PacketId(1), secs(2.0), 100);
        c.on_forward(PacketId(0));
        assert!(c.on_rx(PacketId(0), secs(1.25), 100, 2));
        assert!(c.on_rx(PacketId(1), secs(2.5), 100, 1));

        let stats = c.summarize(secs(10.0));
        let f = &stats.flows[0];
        assert_eq!((f.tx_packets, f.rx_packets, f.rx_bytes), (2, 2, 200));
        assert!((f.delay_sum_secs - 0.75).abs() < 1e-9);
        assert!((f.jitter_sum_secs - 0.25).abs() < 1e-9);
        assert_eq!(f.mean_jitter_secs, Some(f.jitter_sum_secs));
        assert_eq!(f.mean_hop_count, Some(1.5));
        assert_eq!(f.times_forwarded, 1);
        assert_eq!(f.first_tx_secs, Some(1.0));
        assert_eq!(f.last_rx_secs, Some(2.5));
        assert_eq!(f.source_address, Some("10.1.1.3".parse().unwrap()));
        // 1600 bits over 1.5 s.
        assert!((f.throughput_kbps - 1600.0 / 1.5 / 1000.0).abs() < 1e-9);
    }

    #[test]
    fn drops_are_counted_by_reason() {
        let mut c = FlowStatsCollector::new(&flows(), AddressPlan::default());
        for p in 0..4 {
            c.on_tx(FlowId(1), PacketId(p), secs(1.0 + p as f64), 100);
        }
        assert!(c.on_drop(PacketId(0), DropReason::NoRoute));
        assert!(c.on_drop(PacketId(1), DropReason::NoRoute));
        assert!(c.on_drop(PacketId(2), DropReason::TtlExpired));
        assert!(!c.on_drop(PacketId(2), DropReason::TtlExpired));
        assert_eq!(c.in_flight(), 1);

        let stats = c.summarize(secs(10.0));
        let f = &stats.flows[1];
        assert_eq!(f.lost_packets, 3);
        assert_eq!(f.drops[&DropReason::NoRoute], 2);
        assert_eq!(f.in_flight_at_end, 1);
        assert_eq!(f.mean_delay_secs, None);
        assert_eq!(stats.aggregate.lost_packets, 3);
        assert_eq!(stats.aggregate.in_flight_at_end, 1);
        assert_eq!(stats.aggregate.delivery_ratio, Some(0.0));
    }

    #[test]
    fn unknown_packets_are_ignored() {
        let mut c = FlowStatsCollector::new(&flows(), AddressPlan::default());
        assert!(!c.on_rx(PacketId(7), secs(1.0), 100, 1));
        c.on_tx(FlowId(9), PacketId(8), secs(1.0), 100);
        assert_eq!(c.in_flight(), 0);
        assert_eq!(c.summarize(secs(1.0)).aggregate.tx_packets, 0);
    }

    #[test]
    fn json_export() {
        let mut c = FlowStatsCollector::new(&flows(), AddressPlan::default());
        c.on_tx(FlowId(0), PacketId(0), secs(1.0), 100);
        c.on_drop(PacketId(0), DropReason::LinkBroken);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.flowmon.json");
        c.summarize(secs(3.0)).write_json(&path).unwrap();

        let value: serde_json::Value = serde_json::from_reader(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(value["end_time_secs"], 3.0);
        assert_eq!(value["flows"].as_array().unwrap().len(), 2);
        assert_eq!(value["flows"][0]["drops"]["link_broken"], 1);
        assert_eq!(value["flows"][0]["sink_address"], "10.1.1.1");
        assert_eq!(value["aggregate"]["lost_packets"], 1);

        let text = std::fs::read_to_string(&path).unwrap();
        let stats = c.summarize(secs(3.0));
        assert_eq!(text, format!("{}\n", stats.to_json_string().unwrap()));
    }
}

// ── Mobility trace ────────────────────────────────────────────────────────────

#[cfg(test)]
mod trace_tests {
    use mn_core::{Position, Region, StreamAllocator};
    use mn_mobility::{MobilityPatternGenerator, MobilityTrace};

    use super::*;
    use crate::MobilityTraceWriter;

    #[test]
    fn stationary_nodes_one_line_each() {
        let traces = vec![
            MobilityTrace::stationary(Position::new(0.0, 0.0)),
            MobilityTrace::stationary(Position::new(50.0, 200.0)),
        ];
        let mut w = MobilityTraceWriter::from_writer(Vec::new());
        w.write_all(&traces, SimTime::from_secs(10)).unwrap();
        assert_eq!(w.lines(), 2);
        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "t=0 node=0 pos=0.00:0.00 vel=0.00:0.00\nt=0 node=1 pos=50.00:200.00 vel=0.00:0.00\n"
        );
    }

    #[test]
    fn lines_are_time_ordered_across_nodes() {
        let generator =
            MobilityPatternGenerator::random_waypoint(Region::new(300.0, 300.0), 20.0, 0.0).unwrap();
        let horizon = SimTime::from_secs(60);
        let traces = generator.generate(3, horizon, &mut StreamAllocator::new(4));

        let mut w = MobilityTraceWriter::from_writer(Vec::new());
        w.write_all(&traces, horizon).unwrap();
        let expected: usize = traces
            .iter()
            .map(|t| t.waypoints().iter().filter(|wp| wp.time <= horizon).count())
            .sum();
        assert_eq!(w.lines() as usize, expected);

        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
        let times: Vec<f64> = text
            .lines()
            .map(|l| l.split_whitespace().next().unwrap()[2..].parse().unwrap())
            .collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn file_backed_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.mob");
        let mut w = MobilityTraceWriter::create(&path).unwrap();
        w.write_all(&[MobilityTrace::stationary(Position::new(1.0, 2.0))], SimTime::ZERO).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
    }
}
