//! Error types for the DOF bridge

use std::time::Duration;

use thiserror::Error;

/// Result type alias using the bridge's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the simulator
#[derive(Error, Debug)]
pub enum Error {
    /// The simulator could not be reached
    #[error("Failed to connect to Isaac Sim at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The connection broke while sending the script or reading the reply
    #[error("Transport error: {0}")]
    Io(#[from] std::io::Error),

    /// The exchange did not finish within the configured timeout
    #[error("Timed out after {0:?} waiting for Isaac Sim")]
    Timeout(Duration),

    /// The simulator replied with a non-ok status
    #[error("Isaac Sim error: {0}")]
    Protocol(String),

    /// The reply was empty or not JSON and the client runs with strict decoding
    #[error("Undecodable reply from Isaac Sim: {0}")]
    Decode(String),

    /// Robot identifier is not in the registry
    #[error("Robot '{name}' not found. Available robots: {available}")]
    UnknownRobot { name: String, available: String },

    /// Invalid parameter for a script template
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
