// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use super::TaskRegistry;
use crate::config::Config;
use crate::error::{ConfigError, TaskError};
use crate::task::{Outcome, TaskContext};

type Log = Arc<Mutex<Vec<String>>>;

fn test_context() -> TaskContext {
    TaskContext::new(Arc::new(Config::default()), CancellationToken::new())
}

/// Registers a task whose action appends its name to `log`.
fn register_logged(registry: &mut TaskRegistry, log: &Log, name: &str, deps: &[&str]) {
    let log = Arc::clone(log);
    let owned = name.to_string();
    registry
        .register(name, deps.iter().copied(), move |_ctx: TaskContext| {
            let log = Arc::clone(&log);
            let name = owned.clone();
            async move {
                log.lock().unwrap().push(name);
                Ok::<_, anyhow::Error>(Outcome::Finished)
            }
        })
        .unwrap();
}

fn create_diamond(log: &Log) -> TaskRegistry {
    //      build
    //     /     \
    //   html   scripts
    //     \     /
    //      clean
    let mut registry = TaskRegistry::new();
    register_logged(&mut registry, log, "clean", &[]);
    register_logged(&mut registry, log, "html", &["clean"]);
    register_logged(&mut registry, log, "scripts", &["clean"]);
    registry.register_group("build", ["html", "scripts"]).unwrap();
    registry
}

#[test]
fn test_registry_register_and_query() {
    let log = Log::default();
    let registry = create_diamond(&log);

    assert!(registry.contains("html"));
    assert!(!registry.contains("fonts"));
    assert!(registry.is_group("build"));
    assert!(!registry.is_group("html"));
    assert_eq!(
        registry.dependencies("build"),
        Some(["html".to_string(), "scripts".to_string()].as_slice())
    );
    assert_eq!(registry.dependencies("fonts"), None);

    let names: Vec<_> = registry.names().collect();
    insta::assert_yaml_snapshot!(names, @r"
    - build
    - clean
    - html
    - scripts
    ");
}

#[test]
fn test_registry_duplicate_name() {
    let log = Log::default();
    let mut registry = create_diamond(&log);

    let err = registry.register_group("html", ["clean"]).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateTask(ref name) if name == "html"));
    insta::assert_snapshot!(err.to_string(), @"task 'html' is already registered");
}

#[test]
fn test_plan_diamond_shared_dependency_once() {
    let log = Log::default();
    let registry = create_diamond(&log);

    let order = registry.plan("build").unwrap();
    insta::assert_yaml_snapshot!(order, @r"
    - clean
    - html
    - scripts
    - build
    ");
}

#[test]
fn test_plan_is_deterministic() {
    let log = Log::default();
    let registry = create_diamond(&log);

    let first = registry.plan("build").unwrap();
    for _ in 0..5 {
        assert_eq!(registry.plan("build").unwrap(), first);
    }
}

#[test]
fn test_plan_unknown_target() {
    let registry = TaskRegistry::new();
    let err = registry.plan("deploy").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"task 'deploy' is not registered");
    assert_eq!(err.task_name(), Some("deploy"));
}

#[test]
fn test_plan_unknown_dependency_names_requirer() {
    let mut registry = TaskRegistry::new();
    registry.register_group("build", ["html", "lint"]).unwrap();
    registry.register_group("html", Vec::<String>::new()).unwrap();

    let err = registry.plan("build").unwrap_err();
    match &err {
        TaskError::Config(ConfigError::UnknownTask { name, required_by }) => {
            assert_eq!(name, "lint");
            assert_eq!(required_by.as_deref(), Some("build"));
        }
        other => panic!("expected UnknownTask, got {other:?}"),
    }
    insta::assert_snapshot!(
        err.to_string(),
        @"task 'lint' (required by 'build') is not registered"
    );
}

#[test]
fn test_plan_cycle_reports_path() {
    let mut registry = TaskRegistry::new();
    registry.register_group("a", ["b"]).unwrap();
    registry.register_group("b", ["c"]).unwrap();
    registry.register_group("c", ["a"]).unwrap();

    let err = registry.plan("a").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"dependency cycle detected: a -> b -> c -> a");
}

#[test]
fn test_plan_self_dependency_is_cycle() {
    let mut registry = TaskRegistry::new();
    registry.register_group("loop", ["loop"]).unwrap();

    let err = registry.plan("loop").unwrap_err();
    assert!(matches!(err, TaskError::Cycle(ref c) if c.cycle == ["loop", "loop"]));
}

#[tokio::test]
async fn test_run_executes_each_dependency_once_in_order() {
    let log = Log::default();
    let registry = create_diamond(&log);

    registry.run("build", &test_context()).await.unwrap();

    let executed = log.lock().unwrap().clone();
    insta::assert_yaml_snapshot!(executed, @r"
    - clean
    - html
    - scripts
    ");
}

#[tokio::test]
async fn test_run_cycle_fails_before_any_action() {
    let log = Log::default();
    let mut registry = TaskRegistry::new();
    register_logged(&mut registry, &log, "a", &["b"]);
    register_logged(&mut registry, &log, "b", &["a"]);
    register_logged(&mut registry, &log, "root", &[]);

    let err = registry.run("a", &test_context()).await.unwrap_err();
    assert!(matches!(err, TaskError::Cycle(_)));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_run_failure_aborts_remaining_tasks() {
    let log = Log::default();
    let mut registry = TaskRegistry::new();
    register_logged(&mut registry, &log, "clean", &[]);
    registry
        .register("less", ["clean"], |_ctx: TaskContext| async {
            Err::<Outcome, _>(anyhow::anyhow!("lessc exited with code 1"))
        })
        .unwrap();
    register_logged(&mut registry, &log, "scripts", &["less"]);

    let err = registry.run("scripts", &test_context()).await.unwrap_err();
    assert_eq!(err.task_name(), Some("less"));
    insta::assert_snapshot!(err.to_string(), @"task 'less' failed: lessc exited with code 1");
    assert_eq!(*log.lock().unwrap(), ["clean"]);
}

#[tokio::test]
async fn test_run_cancelled_before_start() {
    let log = Log::default();
    let registry = create_diamond(&log);
    let ctx = test_context();
    ctx.cancel_token().cancel();

    let err = registry.run("build", &ctx).await.unwrap_err();
    assert!(matches!(err, TaskError::Interrupted(ref name) if name == "clean"));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_run_awaits_detached_jobs_after_plan() {
    let log = Log::default();
    let mut registry = TaskRegistry::new();

    let job_log = Arc::clone(&log);
    registry
        .register("watch", Vec::<String>::new(), move |_ctx: TaskContext| {
            let log = Arc::clone(&job_log);
            async move {
                log.lock().unwrap().push("watch started".to_string());
                Ok::<_, anyhow::Error>(Outcome::detached(async move {
                    tokio::task::yield_now().await;
                    log.lock().unwrap().push("watch finished".to_string());
                    Ok(())
                }))
            }
        })
        .unwrap();
    register_logged(&mut registry, &log, "serve", &[]);
    registry.register_group("dev", ["watch", "serve"]).unwrap();

    registry.run("dev", &test_context()).await.unwrap();

    let executed = log.lock().unwrap().clone();
    assert_eq!(executed.first().map(String::as_str), Some("watch started"));
    assert!(executed.contains(&"serve".to_string()));
    assert_eq!(executed.last().map(String::as_str), Some("watch finished"));
}

#[tokio::test]
async fn test_run_detached_failure_carries_task_name() {
    let mut registry = TaskRegistry::new();
    registry
        .register("serve", Vec::<String>::new(), |_ctx: TaskContext| async {
            Ok::<_, anyhow::Error>(Outcome::detached(async {
                Err(anyhow::anyhow!("address already in use"))
            }))
        })
        .unwrap();
    registry
        .register("watch", Vec::<String>::new(), |ctx: TaskContext| async move {
            Ok::<_, anyhow::Error>(Outcome::detached(async move {
                ctx.cancel_token().cancelled().await;
                Ok(())
            }))
        })
        .unwrap();
    registry.register_group("dev", ["watch", "serve"]).unwrap();

    let err = registry.run("dev", &test_context()).await.unwrap_err();
    assert_eq!(err.task_name(), Some("serve"));
    insta::assert_snapshot!(err.to_string(), @"task 'serve' failed: address already in use");
}
