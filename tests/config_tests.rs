use cs_cli::config::{expand_env_placeholders, load_config};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_config_expands_credentials() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("profiles.yaml");
    std::env::set_var("CS_TEST_LOAD_KEY", "EXO123");
    fs::write(
        &path,
        r#"
defaultProfile: gva
profiles:
  - name: gva
    endpoint: https://api.example.com/compute
    key: ${CS_TEST_LOAD_KEY}
    secret: ${CS_TEST_LOAD_SECRET:-fallback}
    pollTimeout: 600
  - name: zrh
    endpoint: https://zrh.example.com/compute
"#,
    )
    .unwrap();

    let cfg = load_config(&path).unwrap();
    let profile = cfg.profile(None).unwrap();
    assert_eq!(profile.name, "gva");
    assert_eq!(profile.key, "EXO123");
    assert_eq!(profile.secret, "fallback");
    assert_eq!(profile.poll_timeout, Some(600));

    let zrh = cfg.profile(Some("zrh")).unwrap();
    assert!(zrh.key.is_empty());
    assert_eq!(zrh.poll_timeout, None);
}

#[test]
fn test_load_config_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.yaml");

    let err = load_config(&path).unwrap_err();
    assert!(format!("{err}").contains("missing.yaml"));
}

#[test]
fn test_alternate_placeholder() {
    std::env::set_var("CS_TEST_ALT_SET", "1");
    std::env::remove_var("CS_TEST_ALT_UNSET");
    assert_eq!(expand_env_placeholders("${CS_TEST_ALT_SET:+on}"), "on");
    assert_eq!(expand_env_placeholders("${CS_TEST_ALT_UNSET:+on}"), "");
    assert_eq!(expand_env_placeholders("${CS_TEST_ALT_UNSET-off}"), "off");
}
