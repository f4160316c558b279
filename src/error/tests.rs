// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use super::{BundleError, ConfigError, CycleError, FrontlineError, FrontlineResult, TaskError};

#[test]
fn test_unknown_task_display() {
    let top_level = ConfigError::UnknownTask {
        name: "deploy".to_string(),
        required_by: None,
    };
    let nested = ConfigError::UnknownTask {
        name: "lint".to_string(),
        required_by: Some("build".to_string()),
    };
    insta::assert_snapshot!(top_level.to_string(), @"task 'deploy' is not registered");
    insta::assert_snapshot!(
        nested.to_string(),
        @"task 'lint' (required by 'build') is not registered"
    );
}

#[test]
fn test_cycle_error_display() {
    let err = CycleError {
        cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
    };
    insta::assert_snapshot!(err.to_string(), @"dependency cycle detected: a -> b -> a");
}

#[test]
fn test_task_error_names_failing_task() {
    let err = TaskError::Failed {
        name: "less".to_string(),
        source: anyhow::anyhow!("lessc exited with code 1"),
    };
    assert_eq!(err.task_name(), Some("less"));
    assert!(err.to_string().contains("'less'"));

    let cycle = TaskError::from(CycleError {
        cycle: vec!["x".to_string(), "x".to_string()],
    });
    assert_eq!(cycle.task_name(), None);
}

#[test]
fn test_bundle_error_module() {
    let err = BundleError::Unresolved {
        path: PathBuf::from("src/js/app.js"),
        specifier: "./missing".to_string(),
    };
    assert_eq!(err.module(), PathBuf::from("src/js/app.js"));
    insta::assert_snapshot!(
        err.to_string(),
        @"cannot resolve './missing' from module 'src/js/app.js'"
    );
}

#[test]
fn test_frontline_error_size() {
    // Box<str> variants are 16 bytes (fat pointer) plus discriminant
    let size = std::mem::size_of::<FrontlineError>();
    assert!(size <= 24, "FrontlineError is {size} bytes, expected <= 24");
}

#[test]
fn test_frontline_result_size() {
    let size = std::mem::size_of::<FrontlineResult<()>>();
    assert!(size <= 24, "FrontlineResult<()> is {size} bytes, expected <= 24");
}

#[test]
fn test_boxing_from_impls() {
    let err: FrontlineError = ConfigError::DuplicateTask("clean".to_string()).into();
    insta::assert_snapshot!(err.to_string(), @"config error: task 'clean' is already registered");
}
