use pl_config::{ConfigError, PacingMode, RunConfig, load, save_yaml};
use pl_controls::ControllerGains;
use pl_plant::PlantParameters;
use pl_sim::IntegratorType;
use std::path::{Path, PathBuf};

fn configs() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs")
}

fn temp(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pl_config_{}_{name}", std::process::id()))
}

#[test]
fn shipped_configs_load() {
    let documented = load(&configs().join("documented.yaml")).unwrap();
    assert_eq!(documented.plant, PlantParameters::documented());
    assert_eq!(documented.controller, ControllerGains::documented());
    assert_eq!(documented.engine.pacing, PacingMode::RealTime);

    let scaled = load(&configs().join("sensor_referred.json")).unwrap();
    assert_eq!(scaled.plant, PlantParameters::documented());
    assert_eq!(scaled.controller.kp, 1.152);
    assert_eq!(scaled.engine.integrator, IntegratorType::Rk4);
    assert_eq!(scaled.engine.duration_s, Some(30.0));
}

#[test]
fn partial_yaml_overrides_only_named_fields() {
    let path = temp("partial.yaml");
    std::fs::write(&path, "plant:\n  gear_ratio: 50.0\ncontroller:\n  kp: 2.0\n").unwrap();
    let c = load(&path).unwrap();
    assert_eq!(c.plant.gear_ratio, 50.0);
    assert_eq!(c.plant.resistance_ohm, 1.2);
    assert_eq!(c.controller.kp, 2.0);
    assert_eq!(c.controller.ki, 34.56);
    assert_eq!(c.engine.dt_s, 0.01);
}

#[test]
fn yaml_round_trip() {
    let path = temp("roundtrip.yml");
    let mut config = RunConfig::default();
    config.engine.setpoint_bar = Some(420.0);
    config.engine.pacing = PacingMode::Free;
    save_yaml(&path, &config).unwrap();
    assert_eq!(load(&path).unwrap(), config);
}

#[test]
fn invalid_plant_fails_validation() {
    let path = temp("bad_plant.json");
    std::fs::write(&path, r#"{"plant": {"inductance_h": 0.0}}"#).unwrap();
    assert!(matches!(load(&path), Err(ConfigError::Validation(_))));
}

#[test]
fn unknown_extension_rejected() {
    assert!(matches!(
        load(Path::new("run.toml")),
        Err(ConfigError::UnsupportedFormat { .. })
    ));
}

#[test]
fn missing_file_is_io_error() {
    assert!(matches!(
        load(&temp("does_not_exist.yaml")),
        Err(ConfigError::Io(_))
    ));
}
