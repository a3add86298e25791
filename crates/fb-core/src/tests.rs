//! Unit tests for fb-core primitives.

#[cfg(test)]
mod ids {
    use crate::{LinkId, RequestId, VehicleId};

    #[test]
    fn index_roundtrip() {
        let id = LinkId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(LinkId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(VehicleId(0) < VehicleId(1));
        assert!(RequestId(100) > RequestId(99));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(VehicleId(7).to_string(), "7");
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(" 12 ".parse::<RequestId>().unwrap(), RequestId(12));
        assert!("veh_1".parse::<VehicleId>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialized_as_string() {
        let json = serde_json::to_string(&LinkId(5)).unwrap();
        assert_eq!(json, "\"5\"");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_from_string_or_number() {
        let a: RequestId = serde_json::from_str("\"17\"").unwrap();
        let b: RequestId = serde_json::from_str("17").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<RequestId>("\"abc\"").is_err());
        assert!(serde_json::from_str::<RequestId>("-3").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn usable_as_json_map_key() {
        use std::collections::BTreeMap;
        let m: BTreeMap<VehicleId, u8> = serde_json::from_str(r#"{"3": 1, "1": 2}"#).unwrap();
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![VehicleId(1), VehicleId(3)]);
    }
}

#[cfg(test)]
mod time {
    use crate::{StepClock, format_hms};

    #[test]
    fn clock_advances_by_step() {
        let mut clock = StepClock::new(0.0, 30.0, 90.0);
        assert_eq!(clock.steps_remaining(), 3);
        clock.advance();
        clock.advance();
        assert_eq!(clock.now, 60.0);
        assert!(!clock.is_finished());
        clock.advance();
        assert!(clock.is_finished());
        assert_eq!(clock.steps_remaining(), 0);
    }

    #[test]
    fn partial_step_rounds_up() {
        let clock = StepClock::new(0.0, 60.0, 61.0);
        assert_eq!(clock.steps_remaining(), 2);
    }

    #[test]
    fn hms_formatting() {
        assert_eq!(format_hms(0.0), "00:00:00");
        assert_eq!(format_hms(3_661.9), "01:01:01");
        assert_eq!(format_hms(90_000.0), "25:00:00");
        assert_eq!(format_hms(f64::INFINITY), "+inf");
        assert_eq!(format_hms(f64::NEG_INFINITY), "-inf");
    }
}

#[cfg(test)]
mod config {
    use crate::BridgeConfig;

    #[test]
    fn default_is_valid() {
        let cfg = BridgeConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.endpoint(), "127.0.0.1:9001");
    }

    #[test]
    fn rejects_non_positive_step() {
        let cfg = BridgeConfig { step_secs: 0.0, ..BridgeConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_inverted_range() {
        let cfg = BridgeConfig { start_time: 100.0, end_time: 10.0, ..BridgeConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn clock_matches_config() {
        let cfg = BridgeConfig { start_time: 10.0, end_time: 20.0, step_secs: 5.0, ..BridgeConfig::default() };
        let clock = cfg.make_clock();
        assert_eq!(clock.now, 10.0);
        assert_eq!(clock.steps_remaining(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn minimal_json_fills_defaults() {
        let cfg: BridgeConfig =
            serde_json::from_str(r#"{ "start_time": 0.0, "end_time": 3600.0 }"#).unwrap();
        assert_eq!(cfg.port, 9001);
        assert_eq!(cfg.step_secs, 1.0);
        assert_eq!(cfg.host, "127.0.0.1");
    }
}
