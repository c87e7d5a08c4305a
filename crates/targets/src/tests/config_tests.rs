use super::*;

use std::io::Write;

fn parse(raw: &str) -> Result<Vec<TargetConfig>, ConfigError> {
    parse_targets(raw.as_bytes())
}

#[test]
fn parses_rows_in_order() {
    let targets = parse("m1,AA:BB:CC:DD:EE:FF,2\nm2,11:22:33:44:55:66,0\n").expect("targets");
    assert_eq!(
        targets,
        vec![
            TargetConfig {
                id: TargetId::new("m1"),
                mac: "AA:BB:CC:DD:EE:FF".into(),
                settle: Duration::from_secs(2),
            },
            TargetConfig {
                id: TargetId::new("m2"),
                mac: "11:22:33:44:55:66".into(),
                settle: Duration::ZERO,
            },
        ]
    );
}

#[test]
fn skips_blank_and_comment_lines_and_trims_fields() {
    let targets = parse("# nas boxes\n\n nas , AA:BB:CC:DD:EE:FF , 30 \n").expect("targets");
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].id, TargetId::new("nas"));
    assert_eq!(targets[0].mac, "AA:BB:CC:DD:EE:FF");
    assert_eq!(targets[0].settle, Duration::from_secs(30));
}

#[test]
fn empty_input_yields_no_targets() {
    assert!(parse("").expect("targets").is_empty());
}

#[test]
fn rejects_wrong_field_count() {
    let err = parse("m1,AA:BB:CC:DD:EE:FF,2\nm2,11:22:33:44:55:66\n").expect_err("short row");
    assert!(matches!(err, ConfigError::FieldCount { line: 2, found: 2 }), "{err}");

    let err = parse("m1,AA:BB:CC:DD:EE:FF,2,extra\n").expect_err("long row");
    assert!(matches!(err, ConfigError::FieldCount { found: 4, .. }), "{err}");
}

#[test]
fn rejects_negative_or_non_numeric_timeout() {
    for raw in ["m1,AA:BB:CC:DD:EE:FF,-1", "m1,AA:BB:CC:DD:EE:FF,two", "m1,AA:BB:CC:DD:EE:FF,1.5"] {
        let err = parse(raw).expect_err(raw);
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }), "{raw}: {err}");
    }
}

#[test]
fn rejects_empty_id() {
    let err = parse(",AA:BB:CC:DD:EE:FF,1\n").expect_err("empty id");
    assert!(matches!(err, ConfigError::EmptyId { line: 1 }), "{err}");
}

#[test]
fn rejects_duplicate_ids() {
    let err = parse("m1,AA:BB:CC:DD:EE:FF,1\nm1,11:22:33:44:55:66,1\n").expect_err("duplicate");
    match err {
        ConfigError::DuplicateId { line, id } => {
            assert_eq!(line, 2);
            assert_eq!(id, TargetId::new("m1"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn loads_targets_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "m1,AA:BB:CC:DD:EE:FF,2").expect("write");
    let targets = load_targets(file.path()).expect("targets");
    assert_eq!(targets.len(), 1);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_targets(dir.path().join("absent.conf")).expect_err("missing");
    assert!(matches!(err, ConfigError::Io { .. }), "{err}");
}

#[test]
fn duplicate_line_counts_skipped_lines() {
    let raw = "# fleet\nm1,AA:BB:CC:DD:EE:FF,1\n\nm1,11:22:33:44:55:66,1\n";
    let err = parse(raw).expect_err("duplicate");
    assert!(matches!(err, ConfigError::DuplicateId { line: 4, .. }), "{err}");
}
