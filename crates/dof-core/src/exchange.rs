//! One-shot script exchange with the Isaac Sim code-injection bridge
//!
//! Every call opens a fresh TCP connection, writes the script, half-closes the
//! write side and reads until the bridge closes the connection. The reply is
//! then normalized by [`crate::envelope::decode`].

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, error, warn};

use crate::config::{ClientConfig, DecodePolicy};
use crate::envelope::{self, Decoded};
use crate::error::{Error, Result};

/// Client for the script exchange
///
/// Holds only configuration; no connection outlives a call.
#[derive(Debug, Clone, Default)]
pub struct ExchangeClient {
    config: ClientConfig,
}

impl ExchangeClient {
    /// Create a client for the given configuration
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Configuration this client connects with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a script and return the normalized reply text
    ///
    /// # Errors
    /// - [`Error::Connect`] if the bridge is unreachable
    /// - [`Error::Io`] if the connection breaks mid-exchange
    /// - [`Error::Timeout`] if a configured timeout elapses
    /// - [`Error::Protocol`] if the bridge reports a non-ok status
    /// - [`Error::Decode`] for empty or non-JSON replies under [`DecodePolicy::Strict`]
    pub async fn exchange(&self, payload: &str) -> Result<String> {
        let payload = envelope::normalize_payload(payload);
        debug!("Sending script to Isaac Sim:\n{payload}");

        let raw = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.round_trip(&payload))
                .await
                .map_err(|_| Error::Timeout(limit))??,
            None => self.round_trip(&payload).await?,
        };
        debug!("Raw response from Isaac Sim:\n{raw}");

        self.finish(envelope::decode(&raw), &raw)
    }

    /// Connect, send, half-close and read to EOF
    async fn round_trip(&self, payload: &str) -> Result<String> {
        let addr = self.config.addr();
        let mut stream = match TcpStream::connect(&addr).await {
            Ok(stream) => stream,
            Err(source) => return Err(Error::Connect { addr, source }),
        };

        stream.write_all(payload.as_bytes()).await?;
        stream.shutdown().await?;

        let mut data = Vec::new();
        stream.read_to_end(&mut data).await?;

        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    fn finish(&self, decoded: Decoded, raw: &str) -> Result<String> {
        match decoded {
            Decoded::Success(text) | Decoded::SynthesizedSuccess { text, anomaly: None } => Ok(text),
            Decoded::SynthesizedSuccess {
                text,
                anomaly: Some(anomaly),
            } => {
                warn!("Isaac Sim reply needed a synthesized envelope ({anomaly:?}): {raw:?}");
                match self.config.decode {
                    DecodePolicy::Lenient => Ok(text),
                    DecodePolicy::Strict => Err(Error::Decode(match anomaly {
                        envelope::Anomaly::Empty => "empty reply".to_string(),
                        envelope::Anomaly::NotJson => raw.to_string(),
                    })),
                }
            }
            Decoded::ProtocolFailure(message) => {
                error!("Error from Isaac Sim: {message}");
                Err(Error::Protocol(message))
            }
        }
    }
}

/// Send one script with the given configuration
pub async fn exchange(config: &ClientConfig, payload: &str) -> Result<String> {
    ExchangeClient::new(config.clone()).exchange(payload).await
}

