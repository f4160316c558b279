// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::tasks::{TaskKind, TaskSpec, builtin_task_specs};
use super::{Config, ConfigLoader};
use crate::logging::LogLevel;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = Config::default();
    insta::assert_yaml_snapshot!(
        serde_json::json!({
            "global.dry": config.global.dry,
            "global.output_log_level": config.global.output_log_level.as_u8(),
            "bundle.entry": config.bundle.entry,
            "bundle.output": config.bundle.output,
            "watch.debounce_ms": config.watch.debounce_ms,
            "serve.port": config.serve.port,
        }),
        @r#"
    bundle.entry: src/js/app.js
    bundle.output: www/js/app.js
    global.dry: false
    global.output_log_level: 3
    serve.port: 8000
    watch.debounce_ms: 300
    "#
    );
}

#[test]
fn test_builtin_tasks_cover_default_pipeline() {
    let specs = builtin_task_specs();
    let names: Vec<_> = specs.keys().map(String::as_str).collect();
    insta::assert_yaml_snapshot!(names, @r#"
    - android
    - build
    - clean
    - dev
    - fonts
    - html
    - images
    - less
    - prepare
    - scripts
    - serve
    - watch
    - watch-scripts
    "#);

    assert_eq!(
        specs["build"].deps,
        ["html", "images", "fonts", "less", "scripts"]
    );
    assert_eq!(specs["dev"].deps, ["watch", "serve"]);
    assert_eq!(specs["android"].deps, ["prepare"]);
    assert!(specs["watch-scripts"].kind.is_long_running());
}

#[test]
fn test_user_tasks_replace_builtins_by_name() {
    let config = Config::parse(
        r#"
        [tasks.build]
        kind = "group"
        deps = ["lint", "scripts"]

        [tasks.lint]
        kind = "command"
        program = "eslint"
        args = ["{source}/js"]
        "#,
    )
    .unwrap();

    let specs = config.task_specs();
    assert_eq!(specs["build"].deps, ["lint", "scripts"]);
    assert_eq!(specs["lint"].kind, TaskKind::Command);
    assert_eq!(specs["lint"].args, ["{source}/js"]);
    // Untouched builtins survive
    assert_eq!(specs["html"], TaskSpec::copy("{source}", "index.html", "{output}"));
}

#[test]
fn test_task_missing_required_field() {
    let err = Config::parse(
        r#"
        [tasks.deploy]
        kind = "command"
        "#,
    )
    .unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'program' in section '[tasks.deploy]': required for 'command' tasks"
    );
}

#[test]
fn test_unknown_field_rejected() {
    let result = Config::parse(
        r"
        [bundle]
        entrypoint = 'src/main.js'
        ",
    );
    assert!(result.is_err());
}

#[test]
fn test_set_overrides() {
    let config = ConfigLoader::new()
        .add_toml_str("[serve]\nport = 8000\n")
        .set_pair("serve.port=9001")
        .unwrap()
        .set("global.dry", true)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.serve.port, 9001);
    assert!(config.global.dry);
}

#[test]
fn test_set_pair_requires_equals() {
    let result = ConfigLoader::new().set_pair("serve.port");
    assert!(result.is_err());
}

#[test]
fn test_paths_resolved_against_root() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().to_path_buf();
    let config = Config::parse(&format!(
        "[paths]\nroot = '{}'\noutput = 'dist'\n",
        root.display()
    ))
    .unwrap();

    assert_eq!(config.paths.source, root.join("src"));
    assert_eq!(config.paths.output, root.join("dist"));
    assert_eq!(
        config.paths.under_root(&PathBuf::from("package.json")),
        root.join("package.json")
    );
}

#[test]
fn test_zero_debounce_rejected() {
    let err = Config::parse("[watch]\ndebounce_ms = 0\n").unwrap_err();
    assert!(err.to_string().contains("debounce_ms"));
}

#[test]
fn test_log_level_from_toml() {
    let config = Config::parse("[global]\noutput_log_level = 5\n").unwrap();
    assert_eq!(config.global.output_log_level, LogLevel::TRACE);
    assert!(Config::parse("[global]\noutput_log_level = 9\n").is_err());
}

#[test]
fn test_format_options_aligned() {
    let config = Config::default();
    let lines = config.format_options();

    assert!(lines.iter().any(|l| l.starts_with("serve.port")));
    assert!(
        lines
            .iter()
            .any(|l| l.contains("bundle.externals.xmlhttprequest")
                && l.ends_with("{XMLHttpRequest:XMLHttpRequest}"))
    );
    let column = lines[0].find(" = ").unwrap();
    assert!(lines.iter().all(|l| l.find(" = ") == Some(column)));
}

#[test]
fn test_loaded_files_listing() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("frontline.toml");
    std::fs::write(&file, "[serve]\nport = 1234\n").unwrap();

    let loader = ConfigLoader::new()
        .add_toml_file_optional(&file)
        .add_toml_file_optional(temp.path().join("missing.toml"));
    assert_eq!(loader.loaded_files().len(), 1);
    assert!(loader.format_loaded_files()[0].starts_with("1. [optional]"));

    let config = loader.build().unwrap();
    assert_eq!(config.serve.port, 1234);
}

#[test]
fn test_parse_error_names_loaded_files() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("broken.toml");
    std::fs::write(&path, "[serve]\nport = \"not a port\"\n").unwrap();

    let err = ConfigLoader::new()
        .add_toml_file(&path)
        .with_env_prefix("FRONTLINE_PARSE_TEST")
        .build()
        .unwrap_err();

    let config_err = err.downcast_ref::<crate::error::ConfigError>().unwrap();
    assert!(
        matches!(config_err, crate::error::ConfigError::ParseError { path: sources, .. } if sources == &path.display().to_string())
    );
}
