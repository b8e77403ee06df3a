//! Documented physical constants of the actuator and pressure process.

use crate::error::{ConfigurationError, PlantResult};
use pl_core::units::constants::G_VALVE_MPS2;
use pl_core::{Real, ensure_finite, ensure_non_negative, ensure_positive};
use serde::{Deserialize, Serialize};

/// Physical parameters of the motor, gearbox, valve and pressure process.
///
/// This is a plain immutable value: construct it once (usually through
/// [`PlantParameters::documented`] or a config file) and pass it by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantParameters {
    /// Armature resistance (Ω).
    pub resistance_ohm: Real,
    /// Armature inductance (H).
    pub inductance_h: Real,
    /// Torque constant (N·m/A).
    pub torque_constant_nm_per_a: Real,
    /// Back-EMF constant (V·s/rad).
    pub back_emf_v_s_per_rad: Real,
    /// Drive supply voltage (V).
    pub supply_voltage_v: Real,
    /// Rotor inertia (kg·m²).
    pub motor_inertia_kg_m2: Real,
    /// Valve mass (kg).
    pub valve_mass_kg: Real,
    /// Valve radius (m).
    pub valve_radius_m: Real,
    /// Static friction torque at the valve (N·m).
    pub valve_friction_torque_nm: Real,
    /// Gear reduction ratio, motor turns per valve turn.
    pub gear_ratio: Real,
    /// Gearbox efficiency in (0, 1].
    pub gear_efficiency: Real,
    /// Linearised pressure gain (bar per rad of valve angle).
    pub pressure_gain_bar_per_rad: Real,
    /// Pressure process time constant (s).
    pub pressure_time_constant_s: Real,
    /// Pressure transducer gain (V/bar).
    pub sensor_gain_v_per_bar: Real,
    /// Lower end of the operating pressure range (bar).
    pub pressure_min_bar: Real,
    /// Upper end of the operating pressure range (bar).
    pub pressure_max_bar: Real,
    /// Nominal pressure setpoint (bar).
    pub setpoint_bar: Real,
}

impl Default for PlantParameters {
    fn default() -> Self {
        Self::documented()
    }
}

impl PlantParameters {
    /// The documented constant set.
    pub fn documented() -> Self {
        Self {
            resistance_ohm: 1.2,
            inductance_h: 0.005,
            torque_constant_nm_per_a: 0.8,
            back_emf_v_s_per_rad: 0.8,
            supply_voltage_v: 36.0,
            motor_inertia_kg_m2: 0.02,
            valve_mass_kg: 100.0,
            valve_radius_m: 0.35,
            valve_friction_torque_nm: 120.0,
            gear_ratio: 40.0,
            gear_efficiency: 0.85,
            pressure_gain_bar_per_rad: 150.0,
            pressure_time_constant_s: 0.5,
            sensor_gain_v_per_bar: 0.01,
            pressure_min_bar: 250.0,
            pressure_max_bar: 700.0,
            setpoint_bar: 500.0,
        }
    }

    /// Valve moment of inertia, solid disc: ½·m·r².
    pub fn valve_inertia(&self) -> Real {
        0.5 * self.valve_mass_kg * self.valve_radius_m.powi(2)
    }

    /// Valve inertia reflected to the motor shaft: J_valve / (η·N²).
    pub fn reflected_inertia(&self) -> Real {
        self.valve_inertia() / (self.gear_efficiency * self.gear_ratio.powi(2))
    }

    /// Total inertia seen by the motor.
    pub fn total_inertia(&self) -> Real {
        self.motor_inertia_kg_m2 + self.reflected_inertia()
    }

    /// Speed at which back-EMF cancels the full supply voltage (rad/s).
    pub fn no_load_speed(&self) -> Real {
        self.supply_voltage_v / self.back_emf_v_s_per_rad
    }

    /// Gravitational torque of the valve at its radius: m·g·r.
    pub fn gravity_torque(&self) -> Real {
        self.valve_mass_kg * G_VALVE_MPS2 * self.valve_radius_m
    }

    /// Static load torque at the valve: gravity plus friction.
    pub fn load_torque(&self) -> Real {
        self.gravity_torque() + self.valve_friction_torque_nm
    }

    /// Check every constant before any matrix is formed.
    pub fn validate(&self) -> PlantResult<()> {
        ensure_non_negative(self.resistance_ohm, "resistance_ohm")?;
        ensure_positive(self.inductance_h, "inductance_h")?;
        ensure_positive(self.torque_constant_nm_per_a, "torque_constant_nm_per_a")?;
        ensure_positive(self.back_emf_v_s_per_rad, "back_emf_v_s_per_rad")?;
        ensure_positive(self.supply_voltage_v, "supply_voltage_v")?;
        ensure_positive(self.motor_inertia_kg_m2, "motor_inertia_kg_m2")?;
        ensure_non_negative(self.valve_mass_kg, "valve_mass_kg")?;
        ensure_non_negative(self.valve_radius_m, "valve_radius_m")?;
        ensure_non_negative(self.valve_friction_torque_nm, "valve_friction_torque_nm")?;
        ensure_positive(self.gear_ratio, "gear_ratio")?;
        ensure_positive(self.gear_efficiency, "gear_efficiency")?;
        if self.gear_efficiency > 1.0 {
            return Err(ConfigurationError::OutOfRange {
                what: "gear_efficiency",
                value: self.gear_efficiency,
                min: 0.0,
                max: 1.0,
            });
        }
        ensure_finite(self.pressure_gain_bar_per_rad, "pressure_gain_bar_per_rad")?;
        ensure_positive(self.pressure_time_constant_s, "pressure_time_constant_s")?;
        ensure_finite(self.sensor_gain_v_per_bar, "sensor_gain_v_per_bar")?;
        ensure_non_negative(self.pressure_min_bar, "pressure_min_bar")?;
        ensure_positive(self.pressure_max_bar, "pressure_max_bar")?;
        if self.pressure_min_bar >= self.pressure_max_bar {
            return Err(ConfigurationError::OutOfRange {
                what: "pressure_min_bar",
                value: self.pressure_min_bar,
                min: 0.0,
                max: self.pressure_max_bar,
            });
        }
        ensure_finite(self.setpoint_bar, "setpoint_bar")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_values_match_documentation() {
        let p = PlantParameters::documented();
        assert!((p.valve_inertia() - 6.125).abs() < 1e-9);
        assert!((p.gravity_torque() - 343.35).abs() < 1e-9);
        assert!((p.load_torque() - 463.35).abs() < 1e-9);
        assert!((p.reflected_inertia() - 0.004_503_676).abs() < 1e-6);
        assert!((p.no_load_speed() - 45.0).abs() < 1e-12);
    }

    #[test]
    fn documented_set_is_valid() {
        assert!(PlantParameters::documented().validate().is_ok());
    }

    #[test]
    fn zero_inductance_is_rejected() {
        let p = PlantParameters {
            inductance_h: 0.0,
            ..PlantParameters::documented()
        };
        assert_eq!(
            p.validate().unwrap_err(),
            ConfigurationError::ZeroParameter {
                what: "inductance_h"
            }
        );
    }

    #[test]
    fn efficiency_above_one_is_rejected() {
        let p = PlantParameters {
            gear_efficiency: 1.2,
            ..PlantParameters::documented()
        };
        assert!(matches!(
            p.validate(),
            Err(ConfigurationError::OutOfRange { .. })
        ));
    }
}
