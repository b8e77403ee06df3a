//! Telemetry records survive the wire.

use pl_sim::Sample;
use pl_telemetry::{DisplayLimits, TelemetryRecord, decode_telemetry, encode_telemetry};
use proptest::prelude::*;

proptest! {
    #[test]
    fn round_trip_within_tolerance(
        timestamp in 0.0f64..1e5,
        pressure in -1e4f64..1e4,
        valve_angle in -1e3f64..1e3,
        motor_current in -1e3f64..1e3,
        setpoint in 0.0f64..1e3,
    ) {
        let sample = Sample { timestamp, pressure, valve_angle, motor_current, setpoint };
        let record = TelemetryRecord::from_sample(&sample, &DisplayLimits::default());

        let line = encode_telemetry(&record).unwrap();
        prop_assert!(!line.contains('\n'));
        let back = decode_telemetry(&line).unwrap();

        prop_assert!((back.timestamp - record.timestamp).abs() < 1e-3);
        prop_assert!((back.pressure - record.pressure).abs() < 1e-3);
        prop_assert!((back.valve_angle - record.valve_angle).abs() < 1e-3);
        prop_assert!((back.motor_current - record.motor_current).abs() < 1e-3);
        prop_assert!((back.setpoint - record.setpoint).abs() < 1e-3);

        prop_assert!((0.0..=700.0).contains(&back.pressure));
        prop_assert!((0.0..=180.0).contains(&back.valve_angle));
        prop_assert!((0.0..=25.0).contains(&back.motor_current));
    }
}
