// tests/hook_runner.rs

mod common;
use crate::common::builders::{EnvironmentBuilder, WorkerBuilder};
use crate::common::fakes::{Journal, RecordingRunner};
use crate::common::init_tracing;

use std::path::PathBuf;
use std::sync::Arc;

use drenv::config::{Script, Worker};
use drenv::errors::DrenvError;
use drenv::fs::mock::MockFileSystem;
use drenv::lifecycle::{HookOptions, HookRunner};
use drenv::types::HookStage;

fn worker(builder: WorkerBuilder) -> Arc<Worker> {
    let env = EnvironmentBuilder::new("env").with_worker(builder.build()).build();
    env.workers[0].clone()
}

fn hook_runner(runner: &RecordingRunner, fs: &MockFileSystem) -> HookRunner {
    HookRunner::new(Arc::new(runner.clone()), Arc::new(fs.clone()))
}

fn fs_with_hooks(hooks: &[&str]) -> MockFileSystem {
    let fs = MockFileSystem::new();
    for hook in hooks {
        fs.add_file(hook);
    }
    fs
}

#[tokio::test]
async fn scripts_run_in_declared_order() {
    init_tracing();

    let journal = Journal::new();
    let runner = RecordingRunner::new(journal.clone());
    let fs = fs_with_hooks(&["A/start", "B/start", "C/start"]);
    let w = worker(WorkerBuilder::new("w").script("A").script("B").script("C"));

    hook_runner(&runner, &fs)
        .run(&w, &HookOptions::new(vec![HookStage::Start], false, false).unwrap())
        .await
        .unwrap();

    assert_eq!(journal.entries(), vec!["run A/start", "run B/start", "run C/start"]);
}

#[tokio::test]
async fn reverse_runs_scripts_backwards() {
    let journal = Journal::new();
    let runner = RecordingRunner::new(journal.clone());
    let fs = fs_with_hooks(&["A/stop", "B/stop", "C/stop"]);
    let w = worker(WorkerBuilder::new("w").script("A").script("B").script("C"));

    hook_runner(&runner, &fs)
        .run(&w, &HookOptions::stop())
        .await
        .unwrap();

    assert_eq!(journal.entries(), vec!["run C/stop", "run B/stop", "run A/stop"]);
}

#[tokio::test]
async fn stages_run_in_requested_order_within_each_script() {
    let journal = Journal::new();
    let runner = RecordingRunner::new(journal.clone());
    let fs = fs_with_hooks(&["A/start", "A/test", "B/test"]);
    let w = worker(WorkerBuilder::new("w").script("A").script("B"));

    hook_runner(&runner, &fs)
        .run(&w, &HookOptions::start())
        .await
        .unwrap();

    assert_eq!(journal.entries(), vec!["run A/start", "run A/test", "run B/test"]);
}

#[tokio::test]
async fn absent_hooks_are_skipped_without_error() {
    let journal = Journal::new();
    let runner = RecordingRunner::new(journal.clone());
    let fs = fs_with_hooks(&["A/start", "B/start"]);
    let w = worker(WorkerBuilder::new("w").script("A").script("B"));

    let result = hook_runner(&runner, &fs).run(&w, &HookOptions::stop()).await;

    assert!(result.is_ok());
    assert!(journal.entries().is_empty());
}

#[tokio::test]
async fn directory_named_like_a_stage_is_not_a_hook() {
    let journal = Journal::new();
    let runner = RecordingRunner::new(journal.clone());
    let fs = MockFileSystem::new();
    fs.add_dir("A/start");
    let w = worker(WorkerBuilder::new("w").script("A"));

    hook_runner(&runner, &fs)
        .run(&w, &HookOptions::start())
        .await
        .unwrap();

    assert!(journal.entries().is_empty());
}

#[tokio::test]
async fn script_args_are_passed_to_hooks() {
    let journal = Journal::new();
    let runner = RecordingRunner::new(journal.clone());
    let fs = fs_with_hooks(&["mirror/start"]);
    let w = worker(WorkerBuilder::new("w").script_with_args("mirror", &["dr1", "dr2"]));

    hook_runner(&runner, &fs)
        .run(&w, &HookOptions::start())
        .await
        .unwrap();

    assert_eq!(journal.entries(), vec!["run mirror/start dr1 dr2"]);
}

#[tokio::test]
async fn failing_hook_is_a_hard_error_by_default() {
    init_tracing();

    let journal = Journal::new();
    let runner = RecordingRunner::new(journal.clone()).fail("B/start");
    let fs = fs_with_hooks(&["A/start", "B/start", "C/start"]);
    let w = worker(WorkerBuilder::new("w").script("A").script("B").script("C"));

    let result = hook_runner(&runner, &fs)
        .run(&w, &HookOptions::start())
        .await;

    match result {
        Err(DrenvError::HookError { worker, hook, source }) => {
            assert_eq!(worker, "w");
            assert_eq!(hook, PathBuf::from("B/start"));
            assert!(matches!(*source, DrenvError::CommandFailed { exit_code: 1, .. }));
        }
        other => panic!("expected HookError, got {other:?}"),
    }

    assert_eq!(journal.entries(), vec!["run A/start", "run B/start"]);
}

#[tokio::test]
async fn allow_failure_logs_and_continues() {
    init_tracing();

    let journal = Journal::new();
    let runner = RecordingRunner::new(journal.clone()).fail("B/stop");
    let fs = fs_with_hooks(&["A/stop", "B/stop", "C/stop"]);
    let w = worker(WorkerBuilder::new("w").script("A").script("B").script("C"));

    let result = hook_runner(&runner, &fs).run(&w, &HookOptions::stop()).await;

    assert!(result.is_ok());
    assert_eq!(journal.entries(), vec!["run C/stop", "run B/stop", "run A/stop"]);
}

#[test]
fn hook_options_reject_empty_and_duplicate_stages() {
    assert!(matches!(
        HookOptions::new(vec![], false, false),
        Err(DrenvError::ConfigError(_))
    ));
    assert!(matches!(
        HookOptions::new(vec![HookStage::Start, HookStage::Start], false, false),
        Err(DrenvError::ConfigError(_))
    ));

    let options = HookOptions::new(vec![HookStage::Test, HookStage::Start], true, true).unwrap();
    assert_eq!(options.stages(), &[HookStage::Test, HookStage::Start]);
    assert!(options.reverse());
    assert!(options.allow_failure());
}

#[test]
fn predefined_hook_options() {
    let start = HookOptions::start();
    assert_eq!(start.stages(), &[HookStage::Start, HookStage::Test]);
    assert!(!start.reverse());
    assert!(!start.allow_failure());

    let stop = HookOptions::stop();
    assert_eq!(stop.stages(), &[HookStage::Stop]);
    assert!(stop.reverse());
    assert!(stop.allow_failure());
}

#[test]
fn hook_path_is_stage_file_under_script() {
    let script = Script::new("addons/rook");
    assert_eq!(
        HookRunner::hook_path(&script, HookStage::Test),
        PathBuf::from("addons/rook/test")
    );
    assert_eq!("stop".parse::<HookStage>(), Ok(HookStage::Stop));
    assert!("restart".parse::<HookStage>().is_err());
}
