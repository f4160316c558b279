// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogFormat, LogLevel};

#[test]
fn test_log_level_conversion() {
    let conversions = vec![
        ("from_int(-1)", LogLevel::from_int(-1).as_u8()),
        ("from_int(0)", LogLevel::from_int(0).as_u8()),
        ("from_int(3)", LogLevel::from_int(3).as_u8()),
        ("from_int(5)", LogLevel::from_int(5).as_u8()),
        ("from_int(100)", LogLevel::from_int(100).as_u8()),
    ];
    insta::assert_yaml_snapshot!(conversions, @r#"
    - - from_int(-1)
      - 0
    - - from_int(0)
      - 0
    - - from_int(3)
      - 3
    - - from_int(5)
      - 5
    - - from_int(100)
      - 6
    "#);
}

#[test]
fn test_log_level_rejects_out_of_range() {
    assert!(LogLevel::new(6).is_ok());
    let err = LogLevel::new(7).unwrap_err();
    assert!(err.to_string().contains("0-6"));
}

#[test]
fn test_filter_directives_quiet_dependencies() {
    assert_eq!(LogLevel::SILENT.filter_directives(), "off");
    assert_eq!(LogLevel::WARN.filter_directives(), "warn");
    assert_eq!(LogLevel::DUMP.filter_directives(), "trace");
    insta::assert_snapshot!(
        LogLevel::DEBUG.filter_directives(),
        @"debug,notify=warn,notify_debouncer_full=warn,ignore=warn,globset=warn,mio=warn"
    );
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert_eq!(config.file_format(), LogFormat::Text);
    assert!(config.log_file().is_none());
    assert!(config.show_timestamps());
    assert!(!config.show_target());
}

#[test]
fn test_log_level_deserialize() {
    let level: LogLevel = serde_json::from_str("4").unwrap();
    assert_eq!(level, LogLevel::DEBUG);
    assert!(serde_json::from_str::<LogLevel>("9").is_err());
}
