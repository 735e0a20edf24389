//! Unit tests for mn-traffic.

use std::time::Duration;

use mn_core::{ConfigError, ExperimentConfig, FlowId, NodeId, SimTime, StreamAllocator, TimeWindow};

use crate::{FlowSpec, TrafficPatternGenerator};

fn small(sinks: u32) -> TrafficPatternGenerator {
    let cfg = ExperimentConfig { sinks, ..ExperimentConfig::default() };
    TrafficPatternGenerator::from_config(&cfg)
}

// ── Pairing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pairing {
    use super::*;

    #[test]
    fn three_sinks_in_fifteen_plus_fifteen() {
        let flows = small(3).generate(&mut StreamAllocator::new(1)).unwrap();
        let pairs: Vec<_> = flows.iter().map(|f| (f.sink, f.source)).collect();
        assert_eq!(
            pairs,
            [(NodeId(0), NodeId(15)), (NodeId(1), NodeId(16)), (NodeId(2), NodeId(17))]
        );
        assert!(flows.iter().enumerate().all(|(i, f)| f.id == FlowId(i as u32)));
    }

    #[test]
    fn start_offsets_fall_in_their_windows() {
        let flows = small(15).generate(&mut StreamAllocator::new(7)).unwrap();
        assert_eq!(flows.len(), 15);
        for f in &flows {
            assert!(f.sink_start <= SimTime::from_secs(1));
            assert!(f.start >= SimTime::from_secs(100) && f.start <= SimTime::from_secs(101));
            assert_eq!(f.stop, SimTime::from_secs(103));
            assert_eq!(f.payload_bytes, 512);
            assert_eq!(f.rate_bps, 2048);
        }
    }

    #[test]
    fn sinks_are_distinct_and_disjoint_from_sources() {
        let flows = small(15).generate(&mut StreamAllocator::new(3)).unwrap();
        let mut sinks: Vec<_> = flows.iter().map(|f| f.sink).collect();
        sinks.dedup();
        assert_eq!(sinks.len(), 15);
        assert!(flows.iter().all(|f| f.source.0 >= 15 && f.sink.0 < 15));
    }

    #[test]
    fn zero_sinks_is_an_empty_pattern() {
        let mut streams = StreamAllocator::new(1);
        let flows = small(0).generate(&mut streams).unwrap();
        assert!(flows.is_empty());
        assert_eq!(streams.next_offset(), TrafficPatternGenerator::STREAMS);
    }

    #[test]
    fn degenerate_window_pins_the_start() {
        let mut generator = small(2);
        generator.source_window = TimeWindow::new(50.0, 50.0);
        let flows = generator.generate(&mut StreamAllocator::new(1)).unwrap();
        assert!(flows.iter().all(|f| f.start == SimTime::from_secs(50)));
    }
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod determinism {
    use super::*;

    #[test]
    fn same_seed_same_pattern() {
        let a = small(15).generate(&mut StreamAllocator::new(42)).unwrap();
        let b = small(15).generate(&mut StreamAllocator::new(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_offsets() {
        let a = small(15).generate(&mut StreamAllocator::new(1)).unwrap();
        let b = small(15).generate(&mut StreamAllocator::new(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn pattern_depends_only_on_allocation_offset() {
        // Whatever was allocated before, traffic only sees its own stream.
        let mut first = StreamAllocator::new(9);
        first.allocate(15);
        let mut second = StreamAllocator::new(9);
        second.allocate(10);
        second.allocate(5);
        assert_eq!(first.next_offset(), second.next_offset());
        assert_eq!(small(4).generate(&mut first).unwrap(), small(4).generate(&mut second).unwrap());
    }

    #[test]
    fn more_sinks_extend_without_reshuffling() {
        let few = small(3).generate(&mut StreamAllocator::new(5)).unwrap();
        let many = small(10).generate(&mut StreamAllocator::new(5)).unwrap();
        assert_eq!(few[..], many[..3]);
    }
}

// ── Fail-fast validation ──────────────────────────────────────────────────────

#[cfg(test)]
mod validation {
    use super::*;

    #[test]
    fn too_many_sinks_consumes_nothing() {
        let mut streams = StreamAllocator::new(1);
        let err = small(16).generate(&mut streams).unwrap_err();
        assert_eq!(err, ConfigError::TooManySinks { requested: 16, available: 15 });
        assert_eq!(streams.next_offset(), 0);
    }

    #[test]
    fn window_past_end_of_run_is_rejected() {
        let mut generator = small(1);
        generator.source_window = TimeWindow::new(100.0, 103.0);
        assert!(matches!(
            generator.generate(&mut StreamAllocator::new(1)),
            Err(ConfigError::InvalidWindow { what: "source start", .. })
        ));
    }

    #[test]
    fn zero_rate_is_rejected() {
        let mut generator = small(1);
        generator.rate_bps = 0;
        assert!(matches!(
            generator.validate(),
            Err(ConfigError::Invalid { field: "data_rate_bps", .. })
        ));
    }

    #[test]
    fn zero_length_packet_interval_is_rejected() {
        let mut generator = small(1);
        generator.payload_bytes = 1;
        generator.rate_bps = 9_000_000_000;
        let mut streams = StreamAllocator::new(1);
        assert!(matches!(
            generator.generate(&mut streams),
            Err(ConfigError::Invalid { field: "data_rate_bps", .. })
        ));
        assert_eq!(streams.next_offset(), 0);
    }
}

// ── FlowSpec ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod flow_tests {
    use super::*;

    fn sample_flow() -> FlowSpec {
        FlowSpec {
            id:            FlowId(0),
            source:        NodeId(15),
            sink:          NodeId(0),
            sink_start:    SimTime::from_secs(1),
            start:         SimTime::from_secs(100),
            stop:          SimTime::from_secs(103),
            payload_bytes: 512,
            rate_bps:      2048,
        }
    }

    #[test]
    fn packet_interval_is_payload_bits_over_rate() {
        assert_eq!(sample_flow().packet_interval(), Duration::from_secs(2));
    }

    #[test]
    fn expected_packets_counts_partial_slots() {
        // Sends at 100 and 102; 104 is past the stop.
        assert_eq!(sample_flow().expected_packets(), 2);
    }

    #[test]
    fn sink_listening_window_is_half_open() {
        let f = sample_flow();
        assert!(!f.sink_listening(SimTime::from_secs_f64(0.5)));
        assert!(f.sink_listening(SimTime::from_secs(1)));
        assert!(f.sink_listening(SimTime::from_secs_f64(102.9)));
        assert!(!f.sink_listening(SimTime::from_secs(103)));
    }
}
