use super::*;

use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_match_legacy_sidecar_flags() {
    let settings = Settings::default();
    assert_eq!(settings.listen_addr(), "0.0.0.0:10000".parse::<SocketAddr>().expect("addr"));
    assert_eq!(settings.targets_path, PathBuf::from("sidecar.conf"));
    assert_eq!(settings.broadcast_addr, "255.255.255.255:9".parse::<SocketAddr>().expect("addr"));
}

#[test]
fn settings_file_overrides_defaults() {
    let mut settings = Settings::default();
    settings
        .apply_file(
            r#"
            bind_addr = "127.0.0.1"
            port = 8080
            targets_path = "/etc/wakeward/targets.conf"
            broadcast_addr = "192.168.1.255:7"
            "#,
        )
        .expect("file");
    assert_eq!(settings.listen_addr(), "127.0.0.1:8080".parse::<SocketAddr>().expect("addr"));
    assert_eq!(
        settings.targets_path,
        PathBuf::from("/etc/wakeward/targets.conf")
    );
    assert_eq!(settings.broadcast_addr, "192.168.1.255:7".parse::<SocketAddr>().expect("addr"));
}

#[test]
fn settings_file_rejects_unknown_keys() {
    let mut settings = Settings::default();
    assert!(settings.apply_file("listen = \"0.0.0.0\"").is_err());
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let mut settings = Settings::default();
    settings.apply_file("port = 8080").expect("file");
    settings
        .apply_env(env(&[
            ("SIDECAR_PORT", "9000"),
            ("APP__PORT", "9001"),
            ("SIDECAR_CONFIG", "targets.csv"),
        ]))
        .expect("env");
    assert_eq!(settings.port, 9001);
    assert_eq!(settings.targets_path, PathBuf::from("targets.csv"));
}

#[test]
fn invalid_env_value_is_an_error() {
    let mut settings = Settings::default();
    let err = settings
        .apply_env(env(&[("SIDECAR_PORT", "not-a-port")]))
        .expect_err("bad port");
    assert!(err.to_string().contains("not-a-port"));
}

#[test]
fn cli_flags_take_precedence() {
    let cli = Cli::parse_from([
        "wakeward",
        "--config",
        "fleet.conf",
        "--port",
        "10001",
        "--address",
        "::1",
        "--broadcast",
        "10.0.0.255:9",
    ]);
    let mut settings = Settings::default();
    settings
        .apply_env(env(&[("SIDECAR_PORT", "9000")]))
        .expect("env");
    settings.apply_cli(&cli);

    assert_eq!(settings.listen_addr(), "[::1]:10001".parse::<SocketAddr>().expect("addr"));
    assert_eq!(settings.targets_path, PathBuf::from("fleet.conf"));
    assert_eq!(settings.broadcast_addr, "10.0.0.255:9".parse::<SocketAddr>().expect("addr"));
}

#[test]
fn load_settings_reads_settings_file_when_present() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("sidecar.toml");
    fs::write(&path, "targets_path = \"from-file.conf\"\n").expect("write");

    let cli = Cli {
        settings: path,
        ..Cli::default()
    };
    let settings = load_settings(&cli).expect("settings");
    // Environment may set SIDECAR_CONFIG in CI, so only check the file was read.
    if std::env::var("SIDECAR_CONFIG").is_err() && std::env::var("APP__TARGETS_PATH").is_err() {
        assert_eq!(settings.targets_path, PathBuf::from("from-file.conf"));
    }
}

#[test]
fn missing_settings_file_is_not_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cli = Cli {
        settings: dir.path().join("absent.toml"),
        ..Cli::default()
    };
    assert!(read_optional(&cli.settings).expect("read").is_none());
}
