//! Augmentation of the documented plant and its stability diagnosis.

use pl_controls::{
    AUGMENTED_ORDER, ControllerGains, StabilityWarning, assess_stability, augment,
    closed_loop_poles, spectral_abscissa, state,
};
use pl_plant::{PLANT_ORDER, PlantParameters, build};
use proptest::prelude::*;

#[test]
fn documented_gains_give_unstable_linear_loop() {
    let model = build(&PlantParameters::documented()).unwrap();
    let aug = augment(&model, &ControllerGains::documented()).unwrap();

    assert_eq!(closed_loop_poles(&aug.system).len(), AUGMENTED_ORDER);
    assert!(spectral_abscissa(&aug.system) > 0.0);
    assert!(matches!(
        assess_stability(&aug),
        Some(StabilityWarning::UnstablePole { .. })
    ));
}

#[test]
fn sensor_referred_gains_are_stable() {
    let model = build(&PlantParameters::documented()).unwrap();
    let gains = ControllerGains::documented().scaled(0.01);
    let aug = augment(&model, &gains).unwrap();

    assert!(spectral_abscissa(&aug.system) < 0.0);
    assert_eq!(assess_stability(&aug), None);
}

#[test]
fn integral_row_tracks_pressure_error() {
    let model = build(&PlantParameters::documented()).unwrap();
    let aug = augment(&model, &ControllerGains::documented()).unwrap();
    let a_cl = aug.system.a_cl();

    for j in 0..PLANT_ORDER {
        let expected = if j == state::PRESSURE { -1.0 } else { 0.0 };
        assert_eq!(a_cl[(state::INTEGRAL, j)], expected);
    }
    assert_eq!(a_cl[(state::INTEGRAL, state::INTEGRAL)], 0.0);
}

proptest! {
    #[test]
    fn augmentation_is_pure_and_structured(
        kp in -500.0f64..500.0,
        ki in -100.0f64..100.0,
        kd in -100.0f64..100.0,
    ) {
        let model = build(&PlantParameters::documented()).unwrap();
        let gains = ControllerGains::new(kp, ki, kd).unwrap();

        let first = augment(&model, &gains).unwrap();
        let second = augment(&model, &gains).unwrap();
        prop_assert_eq!(&first, &second);

        let s = &first.system;
        prop_assert_eq!(first.denom, 1.0);
        prop_assert_eq!(s.b_ref()[state::INTEGRAL], 1.0);
        prop_assert_eq!(s.c_cl()[state::INTEGRAL], 0.0);

        let top_left = model.a() + model.b() * first.k_state;
        for i in 0..PLANT_ORDER {
            for j in 0..PLANT_ORDER {
                prop_assert_eq!(s.a_cl()[(i, j)], top_left[(i, j)]);
            }
            prop_assert_eq!(s.a_cl()[(i, state::INTEGRAL)], model.b()[i] * first.k_int);
            prop_assert_eq!(s.b_ref()[i], model.b()[i] * first.k_ref);
        }
        prop_assert!(s.a_cl().iter().all(|v| v.is_finite()));
    }
}
