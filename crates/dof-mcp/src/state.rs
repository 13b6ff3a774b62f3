//! Simulator access for the MCP server
//!
//! Isaac Sim runs one injected script at a time, so all exchanges go through a
//! single worker task that owns the [`ExchangeClient`]. Tool calls render their
//! script up front and then wait on a oneshot reply, which keeps concurrent tool
//! calls from interleaving on the bridge.

use anyhow::Result;
use dof_core::script::{self, BallSpec};
use dof_core::{ClientConfig, ExchangeClient, RobotConfig, robots};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// A rendered script waiting for the bridge
struct Job {
    label: &'static str,
    payload: String,
    respond: oneshot::Sender<dof_core::Result<String>>,
}

/// Handle to the exchange worker
///
/// This is Send + Sync and can be cloned and shared between tasks.
#[derive(Clone)]
pub struct SimState {
    sender: mpsc::UnboundedSender<Job>,
}

impl SimState {
    /// Spawn the exchange worker on the current tokio runtime
    pub fn spawn(config: ClientConfig) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let client = ExchangeClient::new(config);

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                debug!("Running {} on {}", job.label, client.config().addr());
                let result = client.exchange(&job.payload).await;
                let _ = job.respond.send(result);
            }
        });

        Self { sender: tx }
    }

    async fn run(&self, label: &'static str, payload: String) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(Job {
            label,
            payload,
            respond: tx,
        })?;
        Ok(rx.await??)
    }

    /// Add or replace the ground plane
    pub async fn add_ground(&self, size: f64) -> Result<String> {
        self.run("add_ground", script::add_ground(size)?).await
    }

    /// Add or resize a sphere
    pub async fn add_ball(&self, spec: &BallSpec) -> Result<String> {
        self.run("add_ball", script::add_ball(spec)?).await
    }

    /// Reference a registered robot into the stage
    ///
    /// The identifier is checked against the registry before anything is sent.
    pub async fn add_robot(&self, name: &str) -> Result<(&'static RobotConfig, String)> {
        let robot = robots::lookup(name)?;
        let reply = self.run("add_robot", script::add_robot(robot)).await?;
        Ok((robot, reply))
    }

    /// Drive joint position targets
    pub async fn set_joint_positions(&self, name: &str, positions: &[f64]) -> Result<String> {
        let robot = robots::lookup(name)?;
        self.run("set_joint_positions", script::set_joint_positions(robot, positions)?)
            .await
    }

    /// Drive joint velocity targets
    pub async fn set_joint_velocities(&self, name: &str, velocities: &[f64]) -> Result<String> {
        let robot = robots::lookup(name)?;
        self.run("set_joint_velocities", script::set_joint_velocities(robot, velocities)?)
            .await
    }

    /// Query joint positions and velocities
    pub async fn joint_states(&self, name: &str) -> Result<String> {
        let robot = robots::lookup(name)?;
        self.run("get_joint_states", script::get_joint_states(robot)).await
    }

    /// List articulation roots on the stage
    pub async fn list_robots(&self) -> Result<String> {
        self.run("list_robots", script::list_robots()).await
    }
}
