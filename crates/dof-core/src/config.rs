//! Connection settings for the simulator bridge

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default host of the Isaac Sim code-injection bridge
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port of the Isaac Sim code-injection bridge
pub const DEFAULT_PORT: u16 = 8226;

/// How replies that are empty or not JSON are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Substitute a synthesized success envelope
    #[default]
    Lenient,
    /// Fail the call with a decode error
    Strict,
}

/// Where and how to reach the simulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Host name or address of the bridge
    pub host: String,
    /// TCP port of the bridge
    pub port: u16,
    /// Upper bound for one whole exchange, `None` waits indefinitely
    #[serde(with = "timeout_secs")]
    pub timeout: Option<Duration>,
    /// Handling of empty or non-JSON replies
    pub decode: DecodePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: None,
            decode: DecodePolicy::Lenient,
        }
    }
}

impl ClientConfig {
    /// Config for the given host and port, other settings default
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Set the exchange timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the decode policy
    pub fn with_decode(mut self, decode: DecodePolicy) -> Self {
        self.decode = decode;
        self
    }

    /// `host:port` string used for connecting and in messages
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

mod timeout_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}
