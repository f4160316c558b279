// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs;
use std::path::Path;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use super::test_utils::run_with_logs;
use super::{Step, StepExecutor, StepKind};
use crate::error::StepError;

fn touch(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn executor() -> StepExecutor {
    StepExecutor::new(false, CancellationToken::new())
}

fn dry_executor() -> StepExecutor {
    StepExecutor::new(true, CancellationToken::new())
}

#[test]
fn test_step_constructors() {
    let step = Step::command("less", "lessc", ["src/app.less", "www/app.css"])
        .with_cwd("/project")
        .with_dest("/project/www/css");

    assert_eq!(step.name(), "less");
    assert_eq!(step.dest(), Some(Path::new("/project/www/css")));
    assert!(step.source().is_none());
    insta::assert_debug_snapshot!(step.kind(), @r#"
    Command {
        program: "lessc",
        args: [
            "src/app.less",
            "www/app.css",
        ],
        cwd: Some(
            "/project",
        ),
    }
    "#);

    let clean = Step::clean("clean", "www").with_cwd("/ignored");
    assert_eq!(clean.kind(), &StepKind::Clean);
}

#[tokio::test]
async fn test_copy_preserves_structure() {
    let temp = tempfile::tempdir().unwrap();
    let src = temp.path().join("src/img");
    let dest = temp.path().join("www/img");
    touch(&src.join("logo.png"), "png");
    touch(&src.join("icons/menu.svg"), "svg");
    touch(&src.join("icons/deep/x.svg"), "svg");

    let report = executor()
        .run(&Step::copy("images", &src, "**/*", &dest))
        .await
        .unwrap();

    assert_eq!(report.name, "images");
    assert_eq!(report.count, 3);
    assert!(!report.dry_run);
    assert_eq!(fs::read_to_string(dest.join("logo.png")).unwrap(), "png");
    assert!(dest.join("icons/menu.svg").is_file());
    assert!(dest.join("icons/deep/x.svg").is_file());
}

#[tokio::test]
async fn test_copy_pattern_filters() {
    let temp = tempfile::tempdir().unwrap();
    let src = temp.path().join("src");
    let dest = temp.path().join("www");
    touch(&src.join("index.html"), "<html></html>");
    touch(&src.join("js/app.js"), "");

    let report = executor()
        .run(&Step::copy("html", &src, "index.html", &dest))
        .await
        .unwrap();

    assert_eq!(report.count, 1);
    assert!(dest.join("index.html").is_file());
    assert!(!dest.join("js").exists());
}

#[tokio::test]
async fn test_copy_missing_source_creates_dest() {
    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("www/fonts");

    let report = executor()
        .run(&Step::copy("fonts", temp.path().join("missing"), "**/*", &dest))
        .await
        .unwrap();

    assert_eq!(report.count, 0);
    assert!(dest.is_dir());
}

#[tokio::test]
async fn test_copy_invalid_glob() {
    let temp = tempfile::tempdir().unwrap();
    let err = executor()
        .run(&Step::copy("bad", temp.path(), "**/[", temp.path().join("out")))
        .await
        .unwrap_err();

    assert!(matches!(err, StepError::Glob { .. }), "{err:?}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_copy_dry_run_touches_nothing() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let src = temp.path().join("src/img");
    let dest = temp.path().join("www/img");
    touch(&src.join("logo.png"), "png");

    let step = Step::copy("images", &src, "**/*", &dest);
    let (report, logs) = run_with_logs(|| async { dry_executor().run(&step).await }).await?;

    let report = report?;
    assert!(report.dry_run);
    assert_eq!(report.count, 1);
    assert!(!dest.exists());
    assert!(logs.contains("[dry-run] Would copy **/*"), "{logs}");
    assert!(logs.contains("step=images"), "{logs}");
    Ok(())
}

#[tokio::test]
async fn test_clean_keeps_directory() {
    let temp = tempfile::tempdir().unwrap();
    let www = temp.path().join("www");
    touch(&www.join("index.html"), "");
    touch(&www.join("js/app.js"), "");
    touch(&www.join("css/app.css"), "");

    let report = executor().run(&Step::clean("clean", &www)).await.unwrap();

    assert_eq!(report.count, 3);
    assert!(www.is_dir());
    assert_eq!(fs::read_dir(&www).unwrap().count(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn test_clean_dry_run_keeps_files() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let www = temp.path().join("www");
    touch(&www.join("index.html"), "");

    let step = Step::clean("clean", &www);
    let (report, logs) = run_with_logs(|| async { dry_executor().run(&step).await }).await?;

    assert_eq!(report?.count, 0);
    assert!(www.join("index.html").is_file());
    assert!(logs.contains("[dry-run] Would clean"), "{logs}");
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn test_command_dry_run_spawns_nothing() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let dest = temp.path().join("www/css");

    let step = Step::command(
        "less",
        "frontline-no-such-compiler",
        ["src/css/app.less", "www/css/app.css"],
    )
    .with_dest(&dest);
    let (report, logs) = run_with_logs(|| async { dry_executor().run(&step).await }).await?;

    assert!(report?.dry_run);
    assert!(!dest.exists());
    assert!(
        logs.contains(
            "[dry-run] Would run: frontline-no-such-compiler src/css/app.less www/css/app.css"
        ),
        "{logs}"
    );
    Ok(())
}

#[tokio::test]
async fn test_command_not_found() {
    let err = executor()
        .run(&Step::command("lint", "frontline-no-such-linter", ["src"]))
        .await
        .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"executable not found: 'frontline-no-such-linter' (not in PATH)");
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_non_zero_exit() {
    let err = executor()
        .run(&Step::command("less", "sh", ["-c", "exit 3"]))
        .await
        .unwrap_err();

    match err {
        StepError::NonZeroExit { code, .. } => assert_eq!(code, 3),
        other => panic!("expected NonZeroExit, got {other:?}"),
    }
}

#[cfg(unix)]
#[tokio::test(flavor = "current_thread")]
async fn test_command_failure_logs_stderr() -> Result<()> {
    let step = Step::command("less", "sh", ["-c", "echo 'missing semicolon' >&2; exit 1"]);
    let (result, logs) = run_with_logs(|| async { executor().run(&step).await }).await?;

    assert!(matches!(result, Err(StepError::NonZeroExit { code: 1, .. })));
    assert!(logs.contains("process error output"), "{logs}");
    assert!(logs.contains("stderr=missing semicolon"), "{logs}");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_creates_dest_and_uses_cwd() {
    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("www/css");

    let step = Step::command("less", "sh", ["-c", "echo body > www/css/app.css"])
        .with_cwd(temp.path())
        .with_dest(&dest);
    let report = executor().run(&step).await.unwrap();

    assert_eq!(report.count, 0);
    assert_eq!(
        fs::read_to_string(dest.join("app.css")).unwrap().trim(),
        "body"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_cancelled_while_running() {
    let token = CancellationToken::new();
    let executor = StepExecutor::new(false, token.clone());

    let cancel = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        token.cancel();
    });

    let err = executor
        .run(&Step::command("serve", "sh", ["-c", "exec sleep 30"]))
        .await
        .unwrap_err();
    cancel.await.unwrap();

    assert!(matches!(err, StepError::Interrupted { .. }), "{err:?}");
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let token = CancellationToken::new();
    token.cancel();
    let temp = tempfile::tempdir().unwrap();
    let www = temp.path().join("www");
    touch(&www.join("keep.txt"), "");

    let err = StepExecutor::new(false, token)
        .run(&Step::clean("clean", &www))
        .await
        .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"'clean' was interrupted");
    assert!(www.join("keep.txt").is_file());
}
