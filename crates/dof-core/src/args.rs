//! Command-line connection options shared by the binaries

use std::time::Duration;

use clap::Args;

use crate::config::{ClientConfig, DEFAULT_HOST, DEFAULT_PORT, DecodePolicy};

/// Options for reaching the Isaac Sim bridge
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Host of the Isaac Sim code-injection bridge
    #[arg(long, env = "DOF_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port of the Isaac Sim code-injection bridge
    #[arg(long, env = "DOF_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Give up on a command after this many seconds (default: wait indefinitely)
    #[arg(long = "timeout-secs", env = "DOF_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Treat empty or non-JSON replies as errors instead of successes
    #[arg(long, env = "DOF_STRICT_REPLIES")]
    pub strict_replies: bool,
}

impl From<ConnectionArgs> for ClientConfig {
    fn from(args: ConnectionArgs) -> Self {
        let decode = if args.strict_replies {
            DecodePolicy::Strict
        } else {
            DecodePolicy::Lenient
        };
        ClientConfig::new(args.host, args.port)
            .with_timeout(args.timeout_secs.map(Duration::from_secs))
            .with_decode(decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        connection: ConnectionArgs,
    }

    #[test]
    fn test_flags_to_config() {
        let cli = TestCli::parse_from([
            "test",
            "--host",
            "10.0.0.5",
            "--port",
            "9000",
            "--timeout-secs",
            "30",
            "--strict-replies",
        ]);
        let config = ClientConfig::from(cli.connection);
        assert_eq!(config.addr(), "10.0.0.5:9000");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.decode, DecodePolicy::Strict);
    }
}
