//! Simulator state against a fake bridge

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dof_core::ClientConfig;
use dof_mcp::reply;
use dof_mcp::state::SimState;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Connection counters of the fake bridge
#[derive(Default)]
struct Counters {
    total: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
}

/// Bridge that serves connections concurrently, so overlapping clients would show up in `peak`
async fn fake_bridge(reply: &'static str) -> (ClientConfig, Arc<Counters>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let counters = Arc::new(Counters::default());

    let shared = counters.clone();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let counters = shared.clone();
            tokio::spawn(async move {
                counters.total.fetch_add(1, Ordering::SeqCst);
                let now = counters.active.fetch_add(1, Ordering::SeqCst) + 1;
                counters.peak.fetch_max(now, Ordering::SeqCst);

                let mut input = Vec::new();
                stream.read_to_end(&mut input).await.unwrap();
                tokio::time::sleep(Duration::from_millis(50)).await;

                counters.active.fetch_sub(1, Ordering::SeqCst);
                stream.write_all(reply.as_bytes()).await.unwrap();
            });
        }
    });

    (ClientConfig::new("127.0.0.1", port), counters)
}

const JOINT_REPLY: &str = r#"{"status":"ok","output":"{\"status\": \"success\", \"message\": \"Set joint positions for franka\"}"}"#;

#[tokio::test]
async fn concurrent_commands_reach_bridge_one_at_a_time() {
    let (config, counters) = fake_bridge(JOINT_REPLY).await;
    let state = SimState::spawn(config);

    let calls = (0..4).map(|i| {
        let state = state.clone();
        tokio::spawn(async move {
            state
                .set_joint_positions("franka", &[f64::from(i), 0.0])
                .await
        })
    });
    for call in calls.collect::<Vec<_>>() {
        let raw = call.await.unwrap().unwrap();
        assert_eq!(
            reply::joints_set(&raw, "franka", "Positions").unwrap(),
            "Set joint positions for franka"
        );
    }

    assert_eq!(counters.total.load(Ordering::SeqCst), 4);
    assert_eq!(counters.peak.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_robot_never_reaches_bridge() {
    let (config, counters) = fake_bridge(JOINT_REPLY).await;
    let state = SimState::spawn(config);

    let err = state.add_robot("nonexistent-bot").await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("nonexistent-bot"));
    assert!(message.contains("franka"));
    assert!(message.contains("digit"));

    let err = state.set_joint_velocities("franka", &[f64::NAN]).await.unwrap_err();
    assert!(err.to_string().starts_with("Invalid parameter"));

    assert_eq!(counters.total.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn add_robot_returns_registry_entry() {
    let (config, _) = fake_bridge(r#"{"status":"ok","output":""}"#).await;
    let state = SimState::spawn(config);

    let (robot, raw) = state.add_robot("UR5").await.unwrap();
    assert_eq!(robot.name, "Universal Robots UR5");
    let text = reply::confirm(&raw, "added", "Unknown error adding robot").unwrap();
    assert_eq!(text, "added");
}

#[tokio::test]
async fn bridge_failure_surfaces_and_state_keeps_working() {
    let (config, _) = fake_bridge(r#"{"status":"error","error":"boom"}"#).await;
    let state = SimState::spawn(config);

    let err = state.list_robots().await.unwrap_err();
    assert!(err.to_string().contains("boom"));

    // The worker is still alive for the next command
    let err = state.joint_states("franka").await.unwrap_err();
    assert!(err.to_string().contains("boom"));
}
