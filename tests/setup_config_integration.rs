//! Integration tests for setup files and building systems from them

mod common;

use common::assert_configuration_error;
use common::builders::{setup_with, SystemConfigBuilder};
use spect_system::{ArfStage, DigiMode, Setup, SetupConfig, StageTarget, SystemContext, SystemLevel};
use tempfile::TempDir;

fn two_heads() -> SetupConfig {
    setup_with(
        DigiMode::Offline,
        vec![
            SystemConfigBuilder::new("head1")
                .with_detector()
                .stage("computeTables")
                .enable("projection")
                .output_file("projection", "head1.sin")
                .volumes("head1", "crystal1", "pixel1")
                .build(),
            SystemConfigBuilder::new("head2")
                .stage("useTables")
                .enable("interfile")
                .enable("spectGPU")
                .build(),
        ],
    )
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("setup.toml");

    two_heads().save(&path).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("digi_mode = \"offline\""));

    let loaded = SetupConfig::load(&path).unwrap();
    assert_eq!(loaded.digi_mode, DigiMode::Offline);
    assert_eq!(loaded.systems.len(), 2);
    assert_eq!(loaded.systems[0].stage.as_deref(), Some("computeTables"));
    assert_eq!(
        loaded.systems[0].output_files.get("projection").map(String::as_str),
        Some("head1.sin")
    );
    assert_eq!(loaded.systems[1].enable_outputs, vec!["interfile", "spectGPU"]);
}

#[test]
fn test_json_round_trip_in_nested_dir() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("configs").join("setup.json");

    two_heads().save(&path).unwrap();
    let loaded = SetupConfig::load(&path).unwrap();
    assert_eq!(loaded.systems[0].volumes.crystal.as_deref(), Some("crystal1"));
    assert!(loaded.systems[0].attach_detector);
    assert!(!loaded.systems[1].attach_detector);
}

#[test]
fn test_hand_written_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hand.toml");
    std::fs::write(
        &path,
        r#"
[diagnostics]
categories = { Geometry = 2 }

[[systems]]
name = "SPECThead"
attach_detector = true
stage = "generateData"
"#,
    )
    .unwrap();

    let config = SetupConfig::load(&path).unwrap();
    assert_eq!(config.digi_mode, DigiMode::Runtime);
    assert!(config.diagnostics.verbosity().enabled("Geometry", 2));

    let setup = Setup::build(&config).unwrap();
    let head = setup.system("SPECThead").unwrap();
    assert_eq!(head.stage(), ArfStage::GenerateData);
}

#[test]
fn test_load_rejects_unknown_output_tag() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    let config = setup_with(
        DigiMode::Runtime,
        vec![SystemConfigBuilder::new("head").enable("sinogram").build()],
    );
    config.save(&path).unwrap();

    let err = SetupConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("sinogram"));
}

#[test]
fn test_load_or_default_on_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = SetupConfig::load_or_default(dir.path().join("missing.toml"));
    assert!(config.systems.is_empty());
}

#[test]
fn test_build_wires_outputs_and_detectors() {
    let setup = Setup::build(&two_heads()).unwrap();
    let pipeline = &setup.context.pipeline;

    assert_eq!(pipeline.len(), 6);
    assert!(pipeline.iter().all(|m| m.digi_mode() == DigiMode::Offline));

    let enabled: Vec<_> = pipeline
        .enabled_modules()
        .map(|m| (m.owning_system().to_string(), m.name()))
        .collect();
    assert_eq!(
        enabled,
        vec![
            ("head1".to_string(), "projection"),
            ("head2".to_string(), "interfile"),
            ("head2".to_string(), "spectGPU"),
        ]
    );

    let projection = pipeline.find("projection", "head1").unwrap();
    assert_eq!(
        pipeline.get(projection).unwrap().file_name(),
        Some("head1.sin")
    );

    let registry = &setup.context.registry;
    assert_eq!(
        registry.lookup("head1").unwrap().stage(),
        ArfStage::ComputeTables
    );
    assert!(registry.lookup("head2").is_none());
    assert_eq!(registry.current_stage("head2"), Some(ArfStage::UseTables));

    let head1 = setup.system("head1").unwrap();
    assert_eq!(head1.level_for_volume("crystal1"), Some(SystemLevel::Crystal));
}

#[test]
fn test_bad_stage_stops_build() {
    let config = setup_with(
        DigiMode::Runtime,
        vec![
            SystemConfigBuilder::new("good").stage("useTables").build(),
            SystemConfigBuilder::new("bad").stage("useTable").build(),
            SystemConfigBuilder::new("never").build(),
        ],
    );

    let err = Setup::build(&config).unwrap_err();
    assert_configuration_error(&err, "useTable");
    assert_configuration_error(&err, "Failed to set up system 'bad'");
}

#[test]
fn test_build_with_shared_context() {
    let mut ctx = SystemContext::new(DigiMode::Runtime);
    ctx.registry.register_pending("existing", ArfStage::Unset).unwrap();

    let config = setup_with(
        DigiMode::Runtime,
        vec![SystemConfigBuilder::new("existing").build()],
    );
    assert!(Setup::build_with_context(&config, ctx).is_err());
}

#[test]
fn test_restage_after_build() {
    let mut setup = Setup::build(&two_heads()).unwrap();

    setup.set_stage("head1", "generateData").unwrap();
    assert_eq!(
        setup.context.registry.lookup("head1").unwrap().stage(),
        ArfStage::GenerateData
    );

    let err = setup.set_stage("head1", "generate").unwrap_err();
    assert_configuration_error(&err, "head1");
    assert!(setup.set_stage("head3", "useTables").is_err());

    let summary = setup.summary();
    assert_eq!(summary.len(), 2);
    assert!(summary[0].starts_with("head1: stage invalid (-2), detector attached"));
    assert!(summary[1].ends_with("outputs [interfile, spectGPU]"));
}
