//! Plant construction against the documented constant set.

use pl_plant::{ConfigurationError, PlantParameters, build, state};
use proptest::prelude::*;

#[test]
fn build_is_repeatable() {
    let p = PlantParameters::documented();
    let first = build(&p).unwrap();
    let second = build(&p).unwrap();
    assert_eq!(first, second);
}

#[test]
fn zero_time_constant_is_configuration_error() {
    let p = PlantParameters {
        pressure_time_constant_s: 0.0,
        ..PlantParameters::documented()
    };
    let err = build(&p).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::ZeroParameter {
            what: "pressure_time_constant_s"
        }
    );
}

#[test]
fn zero_inductance_is_configuration_error() {
    let p = PlantParameters {
        inductance_h: 0.0,
        ..PlantParameters::documented()
    };
    assert!(matches!(
        build(&p),
        Err(ConfigurationError::ZeroParameter { .. })
    ));
}

#[test]
fn nan_parameter_is_configuration_error() {
    let p = PlantParameters {
        resistance_ohm: f64::NAN,
        ..PlantParameters::documented()
    };
    assert!(matches!(
        build(&p),
        Err(ConfigurationError::NonFinite { .. })
    ));
}

#[test]
fn input_reaches_output_only_through_dynamics() {
    let m = build(&PlantParameters::documented()).unwrap();
    // C·B = 0: the voltage has no instantaneous effect on pressure.
    assert_eq!((m.c() * m.b())[0], 0.0);
    assert_eq!(m.c()[state::PRESSURE], 1.0);
}

proptest! {
    #[test]
    fn positive_parameters_always_give_finite_matrices(
        l in 1e-4f64..1.0,
        tau in 1e-3f64..10.0,
        n in 1.0f64..200.0,
    ) {
        let p = PlantParameters {
            inductance_h: l,
            pressure_time_constant_s: tau,
            gear_ratio: n,
            ..PlantParameters::documented()
        };
        let m = build(&p).unwrap();
        prop_assert!(m.a().iter().all(|v| v.is_finite()));
        prop_assert!(m.b().iter().all(|v| v.is_finite()));
    }
}
