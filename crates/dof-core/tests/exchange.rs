//! Exchange client against a fake bridge on a local socket

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use dof_core::{ClientConfig, DecodePolicy, Error, ExchangeClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// What the fake bridge saw
#[derive(Default)]
struct Seen {
    connections: usize,
    payloads: Vec<String>,
}

/// Start a bridge that answers every connection with `reply` after reading to EOF
async fn fake_bridge(reply: &'static str) -> (ClientConfig, Arc<Mutex<Seen>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let seen = Arc::new(Mutex::new(Seen::default()));

    let record = seen.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let mut input = Vec::new();
            // Only returns once the client half-closes
            stream.read_to_end(&mut input).await.unwrap();
            {
                let mut seen = record.lock().await;
                seen.connections += 1;
                seen.payloads.push(String::from_utf8(input).unwrap());
            }
            stream.write_all(reply.as_bytes()).await.unwrap();
        }
    });

    (ClientConfig::new("127.0.0.1", port), seen)
}

fn message_of(text: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(text).expect("reply should be JSON");
    assert_eq!(value["status"], "success");
    value["message"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn ok_output_returned_verbatim() {
    let (config, seen) = fake_bridge(r#"{"status":"ok","output":"X"}"#).await;
    let client = ExchangeClient::new(config);

    let reply = client.exchange("print('X')\n\n\n").await.unwrap();
    assert_eq!(reply, "X");

    let seen = seen.lock().await;
    assert_eq!(seen.payloads, vec!["print('X')\n".to_string()]);
}

#[tokio::test]
async fn ok_without_output_is_synthesized() {
    let (config, _) = fake_bridge(r#"{"status":"ok","output":""}"#).await;
    let reply = ExchangeClient::new(config).exchange("pass").await.unwrap();
    assert_eq!(message_of(&reply), "Operation completed successfully");

    let (config, _) = fake_bridge(r#"{"status":"ok"}"#).await;
    let reply = ExchangeClient::new(config).exchange("pass").await.unwrap();
    assert!(!reply.is_empty());
    assert_eq!(message_of(&reply), "Operation completed successfully");
}

#[tokio::test]
async fn error_status_is_protocol_error() {
    let (config, _) = fake_bridge(r#"{"status":"error","error":"boom"}"#).await;
    let err = ExchangeClient::new(config).exchange("raise").await.unwrap_err();
    assert!(matches!(err, Error::Protocol(_)));
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn empty_reply_is_synthesized() {
    let (config, _) = fake_bridge("").await;
    let reply = dof_core::exchange::exchange(&config, "pass").await.unwrap();
    assert_eq!(message_of(&reply), "Operation completed (no output)");
}

#[tokio::test]
async fn non_json_reply_is_wrapped() {
    let (config, _) = fake_bridge("hello world").await;
    let reply = ExchangeClient::new(config).exchange("pass").await.unwrap();
    assert_eq!(message_of(&reply), "hello world");
}

#[tokio::test]
async fn strict_policy_rejects_anomalies() {
    let (config, _) = fake_bridge("hello world").await;
    let client = ExchangeClient::new(config.with_decode(DecodePolicy::Strict));
    let err = client.exchange("pass").await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(err.to_string().contains("hello world"));

    let (config, _) = fake_bridge("").await;
    let client = ExchangeClient::new(config.with_decode(DecodePolicy::Strict));
    assert!(matches!(client.exchange("pass").await, Err(Error::Decode(_))));
}

#[tokio::test]
async fn each_call_uses_its_own_connection() {
    let (config, seen) = fake_bridge(r#"{"status":"ok","output":"done"}"#).await;
    let client = ExchangeClient::new(config);

    assert_eq!(client.exchange("first").await.unwrap(), "done");
    assert_eq!(client.exchange("second").await.unwrap(), "done");

    let seen = seen.lock().await;
    assert_eq!(seen.connections, 2);
    assert_eq!(seen.payloads, vec!["first\n".to_string(), "second\n".to_string()]);
}

#[tokio::test]
async fn unreachable_bridge_is_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = ExchangeClient::new(ClientConfig::new("127.0.0.1", port))
        .exchange("pass")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Connect { .. }));
    assert!(err.to_string().contains(&port.to_string()));
}

#[tokio::test]
async fn silent_bridge_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        // Hold the connection open without replying
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(stream);
    });

    let config = ClientConfig::new("127.0.0.1", port).with_timeout(Some(Duration::from_millis(200)));
    let err = ExchangeClient::new(config).exchange("pass").await.unwrap_err();
    assert!(matches!(err, Error::Timeout(_)));
}
