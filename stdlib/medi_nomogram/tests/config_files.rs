use std::fs;

use medi_nomogram::{
    AgeBracket, CancerType, Nomogram, NomogramConfig, NomogramError, PulseRate, Selection, Sex,
};
use pretty_assertions::assert_eq;

fn sample_selection() -> Selection {
    Selection::new()
        .with(AgeBracket::UpTo6)
        .with(Sex::Female)
        .with(CancerType::BrainTumor)
        .with(PulseRate::AtLeast122)
}

#[test]
fn exported_tables_load_back_identically() {
    let _ = env_logger::builder().is_test(true).try_init();

    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("bacteremia.json");
    let json = NomogramConfig::default().to_json_pretty().unwrap();
    fs::write(&path, json).unwrap();

    let loaded = NomogramConfig::load(&path).unwrap().into_nomogram().unwrap();
    assert_eq!(loaded, Nomogram::bacteremia());

    let selection = sample_selection();
    assert_eq!(
        loaded.assess(&selection).unwrap(),
        Nomogram::bacteremia().assess(&selection).unwrap()
    );
}

#[test]
fn custom_tables_change_the_score() {
    let text = r#"{
        "title": "Flat nomogram",
        "points": {
            "age": { ">6": 1, "<=6": 2 },
            "sex": { "Male": 1, "Female": 2 },
            "cancer": { "ALL": 1, "AML": 1, "Brain tumor": 2, "Neuroblastoma": 1, "Lymphoma": 1, "Others": 1 },
            "pr": { "<122 beats/min": 1, ">=122 beats/min": 2 }
        },
        "calibration": { "4": 0.0, "8": 1.0 }
    }"#;
    let nomogram = NomogramConfig::from_json_str(text)
        .unwrap()
        .into_nomogram()
        .unwrap();
    assert_eq!(nomogram.title(), "Flat nomogram");
    assert_eq!(nomogram.caption(), None);

    let result = nomogram.assess(&sample_selection()).unwrap();
    assert_eq!(result.total_points, 8);
    assert_eq!(result.risk, 1.0);
}

#[test]
fn incomplete_point_table_is_rejected() {
    let mut config = NomogramConfig::default();
    config.points.get_mut("cancer").unwrap().remove("Others");
    match config.into_nomogram() {
        Err(NomogramError::InvalidPointTable { factor, reason }) => {
            assert_eq!(factor, "cancer");
            assert!(reason.contains("Others"));
        }
        other => panic!("expected InvalidPointTable, got {other:?}"),
    }
}

#[test]
fn decreasing_calibration_is_rejected() {
    let mut config = NomogramConfig::default();
    config.calibration.insert(232, 0.2);
    assert!(matches!(
        config.into_nomogram(),
        Err(NomogramError::NonMonotonicCalibration { points: 232, .. })
    ));
}

#[test]
fn missing_file_surfaces_io_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = NomogramConfig::load(tmp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, NomogramError::Io(_)));
}

#[test]
fn malformed_json_surfaces_parse_error() {
    let err = NomogramConfig::from_json_str("{ \"title\": 3 }").unwrap_err();
    assert!(matches!(err, NomogramError::Json(_)));
}

#[test]
fn tables_whose_totals_overflow_are_rejected() {
    let text = r#"{
        "title": "Oversized",
        "points": {
            "age": { ">6": 4294967295, "≤6": 4294967295 },
            "sex": { "Male": 1, "Female": 1 },
            "cancer": { "ALL": 1, "AML": 1, "Brain tumor": 1, "Neuroblastoma": 1, "Lymphoma": 1, "Others": 1 },
            "pr": { "<122 beats/min": 1, "≥122 beats/min": 1 }
        },
        "calibration": { "205": 0.001, "249": 0.99 }
    }"#;
    let err = NomogramConfig::from_json_str(text)
        .unwrap()
        .into_nomogram()
        .unwrap_err();
    assert!(matches!(err, NomogramError::PointOverflow));
}

#[test]
fn tables_reaching_exactly_u32_max_still_score() {
    let mut config = NomogramConfig::default();
    for levels in config.points.values_mut() {
        for value in levels.values_mut() {
            *value = 0;
        }
    }
    config.points.get_mut("age").unwrap().insert(">6".into(), u32::MAX);
    let nomogram = config.into_nomogram().unwrap();
    assert_eq!(nomogram.point_table().max_total(), u32::MAX);

    let result = nomogram
        .assess(
            &Selection::new()
                .with(AgeBracket::Over6)
                .with(Sex::Male)
                .with(CancerType::All)
                .with(PulseRate::Below122),
        )
        .unwrap();
    assert_eq!(result.total_points, u32::MAX);
    assert_eq!(result.risk, 0.99);
}
