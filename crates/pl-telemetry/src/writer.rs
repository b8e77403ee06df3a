//! Telemetry output: one flushed JSON line per sample.

use crate::error::TelemetryResult;
use crate::protocol::{DisplayLimits, TelemetryRecord, encode_telemetry};
use pl_sim::Sample;
use std::io::Write;

#[derive(Debug)]
pub struct TelemetryWriter<W: Write> {
    out: W,
    limits: DisplayLimits,
    written: u64,
}

impl<W: Write> TelemetryWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_limits(out, DisplayLimits::default())
    }

    pub fn with_limits(out: W, limits: DisplayLimits) -> Self {
        Self {
            out,
            limits,
            written: 0,
        }
    }

    /// Clamp, encode and write one sample, then flush so the consumer sees it now.
    pub fn write_sample(&mut self, sample: &Sample) -> TelemetryResult<TelemetryRecord> {
        let record = TelemetryRecord::from_sample(sample, &self.limits);
        let line = encode_telemetry(&record)?;
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        self.written += 1;
        Ok(record)
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::decode_telemetry;

    #[test]
    fn one_line_per_sample() {
        let mut w = TelemetryWriter::new(Vec::new());
        for k in 1..=3 {
            let s = Sample {
                timestamp: k as f64 * 0.1,
                pressure: 100.0 * k as f64,
                valve_angle: 10.0,
                motor_current: 1.0,
                setpoint: 500.0,
            };
            w.write_sample(&s).unwrap();
        }
        assert_eq!(w.written(), 3);
        let out = String::from_utf8(w.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(decode_telemetry(lines[2]).unwrap().pressure, 300.0);
    }
}
