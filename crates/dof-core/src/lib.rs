//! DOF Core - talking to a running Isaac Sim instance
//!
//! Isaac Sim exposes a code-injection bridge on a TCP port: a client writes a
//! Python script, half-closes the connection and reads back one JSON envelope.
//! This crate provides:
//!
//! - [`ExchangeClient`] - the request/response exchange and reply normalization
//! - [`robots`] - the static registry of robots that can be placed on the stage
//! - [`script`] - script templates for ground, ball, robot and joint operations
//!
//! ## Example
//!
//! ```ignore
//! use dof_core::{ClientConfig, ExchangeClient, robots, script};
//!
//! let client = ExchangeClient::new(ClientConfig::default());
//! client.exchange(&script::add_ground(script::DEFAULT_GROUND_SIZE)?).await?;
//! client.exchange(&script::add_robot(robots::lookup("franka")?)).await?;
//! ```

#[cfg(feature = "cli")]
pub mod args;
pub mod config;
pub mod envelope;
pub mod error;
pub mod exchange;
pub mod robots;
pub mod script;

pub use config::{ClientConfig, DecodePolicy};
pub use envelope::Decoded;
pub use error::{Error, Result};
pub use exchange::ExchangeClient;
pub use robots::RobotConfig;
