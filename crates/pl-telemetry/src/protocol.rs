//! Wire records.
//!
//! Outgoing, one per output interval:
//!
//! ```text
//! {"timestamp":1.2,"pressure":498.1,"valve_angle":171.3,"motor_current":2.4,"setpoint":500.0}
//! ```
//!
//! Incoming, any of:
//!
//! ```text
//! {"Kp":1.2,"Ki":0.3,"Kd":0.5}
//! {"command_type":"set_setpoint","value":450}
//! {"command_type":"reset"}
//! {"command_type":"start"}
//! {"command_type":"stop"}
//! ```

use crate::error::{TelemetryError, TelemetryResult};
use pl_controls::ControllerGains;
use pl_core::Real;
use pl_sim::{Bounds, Sample};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One outgoing telemetry line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub timestamp: Real,
    pub pressure: Real,
    pub valve_angle: Real,
    pub motor_current: Real,
    pub setpoint: Real,
}

/// Ranges reported values are clamped to before they go on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayLimits {
    pub pressure_bar: Bounds,
    pub valve_angle_deg: Bounds,
    pub motor_current_a: Bounds,
}

impl Default for DisplayLimits {
    fn default() -> Self {
        Self {
            pressure_bar: Bounds::new(0.0, 700.0),
            valve_angle_deg: Bounds::new(0.0, 180.0),
            motor_current_a: Bounds::new(0.0, 25.0),
        }
    }
}

impl TelemetryRecord {
    pub fn from_sample(sample: &Sample, limits: &DisplayLimits) -> Self {
        Self {
            timestamp: sample.timestamp,
            pressure: limits.pressure_bar.clamp(sample.pressure),
            valve_angle: limits.valve_angle_deg.clamp(sample.valve_angle),
            motor_current: limits.motor_current_a.clamp(sample.motor_current),
            setpoint: sample.setpoint,
        }
    }
}

pub fn encode_telemetry(record: &TelemetryRecord) -> TelemetryResult<String> {
    Ok(serde_json::to_string(record)?)
}

pub fn decode_telemetry(line: &str) -> TelemetryResult<TelemetryRecord> {
    Ok(serde_json::from_str(line.trim())?)
}

/// A parsed incoming line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetGains(ControllerGains),
    SetSetpoint(Real),
    Reset,
    Start,
    Stop,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Incoming {
    Gains(GainRecord),
    Control(ControlRecord),
}

/// Extra keys are tolerated; all three gains are required.
#[derive(Deserialize)]
struct GainRecord {
    #[serde(rename = "Kp")]
    kp: Real,
    #[serde(rename = "Ki")]
    ki: Real,
    #[serde(rename = "Kd")]
    kd: Real,
}

#[derive(Deserialize)]
#[serde(tag = "command_type", rename_all = "snake_case")]
enum ControlRecord {
    SetSetpoint { value: Real },
    Reset,
    Start,
    Stop,
}

/// Parse one incoming line. Any shape other than the records above is an error.
///
/// Only objects are considered: derived structs would also accept a positional
/// array such as `[1, 2, 3]`.
pub fn parse_command(line: &str) -> TelemetryResult<Command> {
    let record = match serde_json::from_str::<Value>(line.trim())? {
        Value::Object(map) => Value::Object(map),
        _ => return Err(TelemetryError::NotAnObject),
    };
    let command = match serde_json::from_value::<Incoming>(record)? {
        Incoming::Gains(g) => Command::SetGains(ControllerGains {
            kp: g.kp,
            ki: g.ki,
            kd: g.kd,
        }),
        Incoming::Control(ControlRecord::SetSetpoint { value }) => Command::SetSetpoint(value),
        Incoming::Control(ControlRecord::Reset) => Command::Reset,
        Incoming::Control(ControlRecord::Start) => Command::Start,
        Incoming::Control(ControlRecord::Stop) => Command::Stop,
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keys_are_exact() {
        let r = TelemetryRecord {
            timestamp: 0.1,
            pressure: 1.0,
            valve_angle: 2.0,
            motor_current: 3.0,
            setpoint: 500.0,
        };
        let v: serde_json::Value = serde_json::from_str(&encode_telemetry(&r).unwrap()).unwrap();
        let mut keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            ["motor_current", "pressure", "setpoint", "timestamp", "valve_angle"]
        );
    }

    #[test]
    fn gains_record() {
        let c = parse_command(r#"{"Kp": 1.5, "Ki": 2, "Kd": 0.25}"#).unwrap();
        assert_eq!(
            c,
            Command::SetGains(ControllerGains {
                kp: 1.5,
                ki: 2.0,
                kd: 0.25
            })
        );
    }

    #[test]
    fn gains_record_with_extra_keys() {
        let c = parse_command(r#"{"Kp": 1, "Ki": 2, "Kd": 3, "source": "tuner"}"#).unwrap();
        assert!(matches!(c, Command::SetGains(_)));
    }

    #[test]
    fn control_records() {
        assert_eq!(
            parse_command(r#"{"command_type": "set_setpoint", "value": 450}"#).unwrap(),
            Command::SetSetpoint(450.0)
        );
        assert_eq!(
            parse_command(r#"{"command_type": "reset"}"#).unwrap(),
            Command::Reset
        );
        assert_eq!(
            parse_command(r#"{"command_type": "start"}"#).unwrap(),
            Command::Start
        );
        assert_eq!(
            parse_command(r#"{"command_type": "stop"}"#).unwrap(),
            Command::Stop
        );
    }

    #[test]
    fn malformed_records_are_errors() {
        for line in [
            r#"{"Kp": 1, "Ki": 2}"#,
            r#"{"Kp": "1", "Ki": 2, "Kd": 3}"#,
            r#"{"command_type": "explode"}"#,
            r#"{"command_type": "set_setpoint"}"#,
            r#"[1, 2, 3]"#,
            r#"[1.0, 0.5, 0.25, "extra"]"#,
            r#"["set_setpoint", 450]"#,
            "42",
            "null",
            "Kp=1 Ki=2 Kd=3",
            "",
        ] {
            assert!(parse_command(line).is_err(), "accepted {line:?}");
        }
    }

    #[test]
    fn positional_gains_are_not_a_record() {
        assert!(matches!(
            parse_command("[1, 2, 3]"),
            Err(TelemetryError::NotAnObject)
        ));
        assert!(matches!(
            parse_command(r#"{"Kp": 1, "Ki": 2, "Kd": 3}"#),
            Ok(Command::SetGains(_))
        ));
    }

    #[test]
    fn display_clamp() {
        let s = Sample {
            timestamp: 3.0,
            pressure: 900.0,
            valve_angle: 191.0,
            motor_current: -4.0,
            setpoint: 500.0,
        };
        let r = TelemetryRecord::from_sample(&s, &DisplayLimits::default());
        assert_eq!(r.pressure, 700.0);
        assert_eq!(r.valve_angle, 180.0);
        assert_eq!(r.motor_current, 0.0);
        assert_eq!(r.setpoint, 500.0);
    }
}
