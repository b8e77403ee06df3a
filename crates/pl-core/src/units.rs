// pl-core/src/units.rs

use uom::si::f64::Angle as UomAngle;

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;

#[inline]
pub fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

#[inline]
pub fn in_degrees(a: Angle) -> f64 {
    use uom::si::angle::degree;
    a.get::<degree>()
}

#[inline]
pub fn in_radians(a: Angle) -> f64 {
    use uom::si::angle::radian;
    a.get::<radian>()
}

/// Output-shaft angle in degrees for a motor-shaft angle in radians behind a reduction gear.
#[inline]
pub fn output_shaft_degrees(motor_angle_rad: f64, gear_ratio: f64) -> f64 {
    in_degrees(rad(motor_angle_rad / gear_ratio))
}

pub mod constants {
    /// Standard gravity as used by the documented valve load figures.
    pub const G_VALVE_MPS2: f64 = 9.81;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gear_reduction_to_degrees() {
        let motor = 40.0 * std::f64::consts::FRAC_PI_2;
        assert!((output_shaft_degrees(motor, 40.0) - 90.0).abs() < 1e-9);
        assert!((in_radians(rad(0.25)) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn half_turn() {
        assert!((in_degrees(rad(std::f64::consts::PI)) - 180.0).abs() < 1e-9);
    }
}
