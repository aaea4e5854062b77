// tests/orchestrator.rs

mod common;
use crate::common::builders::{EnvironmentBuilder, ProfileBuilder, WorkerBuilder};
use crate::common::fakes::{test_context, test_options, FakeCluster, Journal, RecordingRunner};
use crate::common::init_tracing;

use std::time::Duration;

use drenv::cli::Command;
use drenv::config::Environment;
use drenv::engine::Orchestrator;
use drenv::errors::DrenvError;
use drenv::fs::mock::MockFileSystem;
use drenv::fs::FileSystem;
use drenv::types::ClusterStatus;

/// `p1` has one worker with script `s1` (start + test hooks); `p2` has no
/// workers.
fn two_profile_env() -> Environment {
    EnvironmentBuilder::new("e2e")
        .with_profile(
            ProfileBuilder::new("p1")
                .worker(WorkerBuilder::new("w1").script("s1").build())
                .build(),
        )
        .with_profile(ProfileBuilder::new("p2").build())
        .build()
}

fn two_profile_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("s1/start");
    fs.add_file("s1/test");
    fs
}

struct Harness {
    journal: Journal,
    cluster: FakeCluster,
    fs: MockFileSystem,
    orchestrator: Orchestrator,
}

fn harness(
    cluster: impl FnOnce(FakeCluster) -> FakeCluster,
    runner: impl FnOnce(RecordingRunner) -> RecordingRunner,
    fs: MockFileSystem,
) -> Harness {
    let journal = Journal::new();
    let cluster = cluster(FakeCluster::new(journal.clone()));
    let runner = runner(RecordingRunner::new(journal.clone()));
    let orchestrator = Orchestrator::new(test_context(&cluster, &runner, &fs, test_options()));
    Harness {
        journal,
        cluster,
        fs,
        orchestrator,
    }
}

fn before(journal: &Journal, first: &str, second: &str) -> bool {
    match (journal.position(first), journal.position(second)) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}

#[tokio::test(start_paused = true)]
async fn start_creates_clusters_and_runs_profile_hooks() {
    init_tracing();

    let h = harness(|c| c, |r| r, two_profile_fs());
    let env = two_profile_env();

    h.orchestrator.run(Command::Start, &env).await.unwrap();

    let j = &h.journal;
    assert_eq!(j.count("start p1"), 1);
    assert_eq!(j.count("start p2"), 1);
    assert_eq!(j.matching("run "), vec!["run s1/start", "run s1/test"]);
    assert!(before(j, "start p1", "run s1/start"));
    assert!(j.matching("wait ").is_empty(), "fresh clusters must not wait");

    let p1 = j.time_of("start p1").unwrap();
    let p2 = j.time_of("start p2").unwrap();
    assert!(p2 - p1 >= Duration::from_secs(1));

    assert_eq!(h.cluster.status_of("p1"), ClusterStatus::running());
    assert_eq!(h.cluster.status_of("p2"), ClusterStatus::running());
}

#[tokio::test(start_paused = true)]
async fn failing_cluster_does_not_block_siblings() {
    init_tracing();

    let h = harness(|c| c.fail("start", "p2"), |r| r, two_profile_fs());
    let env = two_profile_env();

    let result = h.orchestrator.run(Command::Start, &env).await;

    match result {
        Err(DrenvError::AggregateFailure { failed }) => assert_eq!(failed, vec!["p2".to_string()]),
        other => panic!("expected AggregateFailure, got {other:?}"),
    }

    assert_eq!(h.journal.matching("run "), vec!["run s1/start", "run s1/test"]);
    assert_eq!(h.cluster.status_of("p1"), ClusterStatus::running());
}

#[tokio::test(start_paused = true)]
async fn restart_waits_for_readiness_before_hooks() {
    init_tracing();

    let h = harness(
        |c| c.with_status("p1", ClusterStatus::running()),
        |r| r,
        two_profile_fs(),
    );
    let env = two_profile_env();

    h.orchestrator.run(Command::Start, &env).await.unwrap();

    let j = &h.journal;
    assert_eq!(j.matching("wait "), vec!["wait p1 deployments available"]);
    assert!(before(j, "start p1", "wait p1 deployments available"));
    assert!(before(j, "wait p1 deployments available", "run s1/start"));

    let started = j.time_of("start p1").unwrap();
    let waited = j.time_of("wait p1 deployments available").unwrap();
    assert!(waited - started >= Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn environment_workers_run_after_all_profiles() {
    let fs = two_profile_fs();
    fs.add_file("mirror/start");

    let h = harness(|c| c.start_latency(Duration::from_secs(20)), |r| r, fs);
    let env = EnvironmentBuilder::new("e2e")
        .with_profile(
            ProfileBuilder::new("p1")
                .worker(WorkerBuilder::new("w1").script("s1").build())
                .build(),
        )
        .with_profile(ProfileBuilder::new("p2").build())
        .with_worker(WorkerBuilder::anonymous().script_with_args("mirror", &["p1", "p2"]).build())
        .build();

    h.orchestrator.run(Command::Start, &env).await.unwrap();

    let j = &h.journal;
    assert!(before(j, "run s1/test", "run mirror/start p1 p2"));

    let p2_started = j.time_of("start p2").unwrap();
    let mirror = j.time_of("run mirror/start p1 p2").unwrap();
    assert!(mirror - p2_started >= Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn environment_workers_are_skipped_if_a_profile_failed() {
    let fs = two_profile_fs();
    fs.add_file("mirror/start");

    let h = harness(|c| c.fail("start", "p1"), |r| r, fs);
    let env = EnvironmentBuilder::new("e2e")
        .with_profile(
            ProfileBuilder::new("p1")
                .worker(WorkerBuilder::new("w1").script("s1").build())
                .build(),
        )
        .with_profile(ProfileBuilder::new("p2").build())
        .with_worker(WorkerBuilder::new("mirror").script("mirror").build())
        .build();

    let result = h.orchestrator.run(Command::Start, &env).await;

    match result {
        Err(DrenvError::AggregateFailure { failed }) => assert_eq!(failed, vec!["p1".to_string()]),
        other => panic!("expected AggregateFailure, got {other:?}"),
    }

    assert_eq!(h.journal.count("start p2"), 1);
    assert!(h.journal.matching("run s1/").is_empty());
    assert_eq!(h.journal.count("run mirror/start"), 0);
}

#[tokio::test]
async fn stop_runs_stop_hooks_in_reverse_then_stops_cluster() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("s1/stop");
    fs.add_file("s2/stop");

    let h = harness(|c| c.with_status("p1", ClusterStatus::running()), |r| r, fs);
    let env = EnvironmentBuilder::new("e2e")
        .with_profile(
            ProfileBuilder::new("p1")
                .worker(WorkerBuilder::new("w1").script("s1").script("s2").build())
                .build(),
        )
        .with_profile(ProfileBuilder::new("p2").build())
        .build();

    h.orchestrator.run(Command::Stop, &env).await.unwrap();

    let j = &h.journal;
    assert_eq!(j.matching("run "), vec!["run s2/stop", "run s1/stop"]);
    assert!(before(j, "run s1/stop", "stop p1"));
    assert_eq!(j.count("stop p2"), 0, "missing cluster must not be stopped");
    assert_eq!(h.cluster.status_of("p1"), ClusterStatus::stopped());
}

#[tokio::test]
async fn stop_skips_hooks_when_apiserver_is_down() {
    let fs = MockFileSystem::new();
    fs.add_file("s1/stop");

    let status = ClusterStatus {
        host: drenv::types::ComponentState::Running,
        apiserver: drenv::types::ComponentState::Stopped,
    };
    let h = harness(|c| c.with_status("p1", status), |r| r, fs);
    let env = two_profile_env();

    h.orchestrator.run(Command::Stop, &env).await.unwrap();

    assert!(h.journal.matching("run ").is_empty());
    assert_eq!(h.journal.count("stop p1"), 1);
}

#[tokio::test]
async fn stop_tolerates_hook_failures() {
    let fs = MockFileSystem::new();
    fs.add_file("s1/stop");
    fs.add_file("s2/stop");

    let h = harness(
        |c| c.with_status("p1", ClusterStatus::running()),
        |r| r.fail("s2/stop"),
        fs,
    );
    let env = EnvironmentBuilder::new("e2e")
        .with_profile(
            ProfileBuilder::new("p1")
                .worker(WorkerBuilder::new("w1").script("s1").script("s2").build())
                .build(),
        )
        .build();

    h.orchestrator.run(Command::Stop, &env).await.unwrap();

    assert_eq!(h.journal.matching("run "), vec!["run s2/stop", "run s1/stop"]);
    assert_eq!(h.journal.count("stop p1"), 1);
}

#[tokio::test]
async fn stop_driver_failure_fails_the_command() {
    let h = harness(
        |c| {
            c.with_status("p1", ClusterStatus::running())
                .with_status("p2", ClusterStatus::running())
                .fail("stop", "p1")
        },
        |r| r,
        MockFileSystem::new(),
    );
    let env = two_profile_env();

    let result = h.orchestrator.run(Command::Stop, &env).await;

    match result {
        Err(DrenvError::AggregateFailure { failed }) => assert_eq!(failed, vec!["p1".to_string()]),
        other => panic!("expected AggregateFailure, got {other:?}"),
    }
    assert_eq!(h.cluster.status_of("p2"), ClusterStatus::stopped());
}

#[tokio::test]
async fn delete_removes_clusters_and_config_dirs() {
    let fs = MockFileSystem::new();
    let config_dir = test_options().profile_config_dir("p1");
    fs.add_dir(&config_dir);
    fs.add_file(config_dir.join("config.json"));

    let h = harness(|c| c.with_status("p1", ClusterStatus::stopped()), |r| r, fs);
    let env = two_profile_env();

    h.orchestrator.run(Command::Delete, &env).await.unwrap();

    assert_eq!(h.journal.count("delete p1"), 1);
    assert_eq!(h.journal.count("delete p2"), 1);
    assert!(!h.fs.is_dir(&config_dir));
    assert_eq!(h.cluster.status_of("p1"), ClusterStatus::nonexistent());
}

#[tokio::test]
async fn delete_failure_keeps_config_dir() {
    let fs = MockFileSystem::new();
    let config_dir = test_options().profile_config_dir("p1");
    fs.add_dir(&config_dir);

    let h = harness(|c| c.fail("delete", "p1"), |r| r, fs);
    let env = two_profile_env();

    let result = h.orchestrator.run(Command::Delete, &env).await;

    assert!(matches!(result, Err(DrenvError::AggregateFailure { .. })));
    assert!(h.fs.is_dir(&config_dir));
    assert_eq!(h.journal.count("delete p2"), 1);
}

#[tokio::test]
async fn dump_does_not_touch_clusters() {
    let h = harness(|c| c, |r| r, MockFileSystem::new());

    h.orchestrator.run(Command::Dump, &two_profile_env()).await.unwrap();

    assert!(h.journal.entries().is_empty());
}
