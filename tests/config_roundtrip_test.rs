//! Round-trip and recovery tests for the config reader and writer.

use std::io::Write;
use std::path::Path;

use serde_yaml::Value;
use tempfile::{NamedTempFile, TempDir};
use vame::Error;
use vame::config::{
    ConfigDocument, ConfigTemplate, KeyDef, ReadOptions, ReadOutcome, SectionDef, build_template,
    read_config, read_config_with, render_config, write_config, write_config_with_template,
};

fn sample_values() -> ConfigDocument {
    let mut doc = ConfigDocument::new();
    doc.insert("Project", "mouse1");
    doc.insert("project_path", "/data/mouse1-Apr30-2020/");
    doc.insert(
        "video_sets",
        Value::Sequence(vec![Value::from("video-1"), Value::from("video-2")]),
    );
    doc.insert("zdims", 30);
    doc.insert("learning_rate", 0.0005);
    doc.insert("prediction_decoder", 1);
    doc.insert("beta", 1.0);
    doc.insert("transition_function", "GRU");
    doc.insert("scheduler", 1);
    doc
}

fn config_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("config.yaml")
}

fn read_text(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_write_read_write_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = config_path(&dir);
    let values = sample_values();

    write_config(&path, &values).unwrap();
    let first = read_text(&path);

    let loaded = read_config(&path).unwrap();
    assert_eq!(loaded.len(), values.len());
    for (key, value) in values.iter() {
        assert_eq!(loaded.get(key), Some(value), "value of {key}");
    }

    write_config(&path, &loaded).unwrap();
    assert_eq!(read_text(&path), first);
}

#[test]
fn test_key_order_independent_of_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let pairs: Vec<(String, Value)> = sample_values()
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();

    let forward: ConfigDocument = pairs.iter().cloned().collect();
    let reversed: ConfigDocument = pairs.iter().rev().cloned().collect();
    let mut rotated_pairs = pairs.clone();
    rotated_pairs.rotate_left(3);
    let rotated: ConfigDocument = rotated_pairs.into_iter().collect();

    let expected = render_config(build_template(), &forward).unwrap();
    for (name, doc) in [("reversed", &reversed), ("rotated", &rotated)] {
        let path = dir.path().join(format!("{name}.yaml"));
        write_config(&path, doc).unwrap();
        assert_eq!(read_text(&path), expected, "{name}");
    }

    let key_order: Vec<&str> = expected
        .lines()
        .filter(|line| !line.starts_with('#') && !line.starts_with('-') && !line.is_empty())
        .filter_map(|line| line.split(':').next())
        .collect();
    let template_order: Vec<&str> = build_template().iter().map(|e| e.key).collect();
    assert_eq!(key_order, template_order);
}

#[test]
fn test_unset_keys_are_never_filled() {
    let dir = tempfile::tempdir().unwrap();
    let path = config_path(&dir);

    let values: ConfigDocument = [("zdims", 30)].into_iter().collect();
    write_config(&path, &values).unwrap();

    let text = read_text(&path);
    for entry in build_template().iter() {
        if entry.key == "zdims" {
            assert!(text.contains("\nzdims: 30\n"));
        } else {
            let unset = format!("{}:", entry.key);
            assert!(text.lines().any(|l| l == unset), "{} not unset", entry.key);
        }
    }

    let loaded = read_config(&path).unwrap();
    assert_eq!(loaded.keys().collect::<Vec<_>>(), vec!["zdims"]);
}

#[test]
fn test_scenario_template() {
    const SCENARIO: &[SectionDef] = &[SectionDef {
        label: "Project",
        preamble: None,
        keys: &[
            KeyDef {
                name: "Project",
                comment: None,
            },
            KeyDef {
                name: "project_path",
                comment: None,
            },
            KeyDef {
                name: "zdims",
                comment: None,
            },
            KeyDef {
                name: "time_window",
                comment: None,
            },
        ],
    }];

    let template = ConfigTemplate::from_sections(SCENARIO).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = config_path(&dir);

    let mut values = ConfigDocument::new();
    values.insert("zdims", 30);
    values.insert("Project", "mouse1");
    write_config_with_template(&path, &values, &template).unwrap();

    let lines: Vec<String> = read_text(&path)
        .lines()
        .filter(|l| !l.starts_with('#'))
        .map(str::to_string)
        .collect();
    assert_eq!(
        lines,
        vec!["Project: mouse1", "project_path:", "zdims: 30", "time_window:"]
    );

    let loaded = read_config(&path).unwrap();
    assert_eq!(loaded.keys().collect::<Vec<_>>(), vec!["Project", "zdims"]);
    assert_eq!(loaded.get_str("Project"), Some("mouse1"));
    assert_eq!(loaded.get_u64("zdims"), Some(30));
}

#[test]
fn test_unrecognized_keys_survive_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = config_path(&dir);

    let mut values = ConfigDocument::new();
    values.insert("foo", 1);
    values.insert("Project", "mouse1");
    values.insert("egocentric_data", false);
    write_config(&path, &values).unwrap();

    let text = read_text(&path);
    let scheduler_at = text.find("\nscheduler:").unwrap();
    let foo_at = text.find("\nfoo: 1\n").unwrap();
    let ego_at = text.find("\negocentric_data: false\n").unwrap();
    assert!(scheduler_at < foo_at);
    assert!(foo_at < ego_at);

    let loaded = read_config(&path).unwrap();
    assert_eq!(build_template().unknown_keys(&loaded), vec!["foo", "egocentric_data"]);
    assert_eq!(loaded.get_u64("foo"), Some(1));
}

#[test]
fn test_legacy_flow_file_is_recovered_and_rewritten() {
    // Sorted keys, flow style and a tagged tuple, as older tooling wrote them
    let legacy = "Project: mouse1\nbeta: 1\nvideo_sets: !!python/tuple [video-1, video-2]\nzdims: 30\n";
    let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
    file.write_all(legacy.as_bytes()).unwrap();
    file.flush().unwrap();

    let report = read_config_with(file.path(), ReadOptions::default()).unwrap();
    assert!(matches!(report.outcome, ReadOutcome::Migrated { .. }));

    let doc = &report.document;
    let mut keys: Vec<_> = doc.keys().collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["Project", "beta", "video_sets", "zdims"]);

    let rewritten = read_text(file.path());
    assert!(rewritten.starts_with("# Project name\n"));
    assert!(rewritten.contains("video_sets:\n- video-1\n- video-2\n"));

    // The rewritten file now takes the canonical path and is stable
    let again = read_config_with(file.path(), ReadOptions::default()).unwrap();
    assert_eq!(again.outcome, ReadOutcome::Canonical);
    write_config(file.path(), &again.document).unwrap();
    assert_eq!(read_text(file.path()), rewritten);
}

#[test]
fn test_legacy_block_tuple_is_rewritten_without_tag() {
    let dir = tempfile::tempdir().unwrap();
    let path = config_path(&dir);
    std::fs::write(
        &path,
        "Project: mouse1\nvideo_sets: !!python/tuple\n- video-1\n- video-2\nzdims: 30\n",
    )
    .unwrap();

    let report = read_config_with(&path, ReadOptions::default()).unwrap();
    assert!(matches!(report.outcome, ReadOutcome::Migrated { .. }));

    let rewritten = read_text(&path);
    assert!(!rewritten.contains("python/tuple"));
    assert!(rewritten.contains("video_sets:\n- video-1\n- video-2\n"));
}

#[test]
fn test_unset_unrecognized_key_survives_write_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = config_path(&dir);
    std::fs::write(&path, "Project: m\nfoo:\n").unwrap();

    let loaded = read_config(&path).unwrap();
    write_config(&path, &loaded).unwrap();

    let text = read_text(&path);
    let tail_at = text.find("# Unrecognized keys\n").unwrap();
    assert!(text[tail_at..].ends_with("\nfoo:\n"));
    assert!(text.find("\nscheduler:\n").unwrap() < tail_at);

    // Stable on the next cycle
    let again = read_config(&path).unwrap();
    write_config(&path, &again).unwrap();
    assert_eq!(read_text(&path), text);
}

#[test]
fn test_missing_file_never_yields_default() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_config(&dir.path().join("nope").join("config.yaml")).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound { ref path } if path.ends_with("config.yaml")));
}

#[test]
fn test_caller_document_is_not_consumed_by_write() {
    let dir = tempfile::tempdir().unwrap();
    let values = sample_values();
    let before = values.clone();

    write_config(&config_path(&dir), &values).unwrap();
    assert_eq!(values, before);
}
