//! Turning script replies into messages for the agent
//!
//! Scripts print `{"status": "success" | "error", ...}`. The exchange already
//! handled transport and bridge failures; what is left here is the script-level
//! status and the data some commands return.

use anyhow::{Result, anyhow, bail};
use serde_json::{Map, Value};

const DECODE_FAILED: &str = "Failed to decode response from Isaac Sim";

fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn is_success(obj: &Map<String, Value>) -> bool {
    obj.get("status").and_then(Value::as_str) == Some("success")
}

fn message(obj: &Map<String, Value>) -> Option<&str> {
    obj.get("message").and_then(Value::as_str)
}

/// Script failure text, or `fallback` if the script gave none
fn script_error(obj: &Map<String, Value>, fallback: &str) -> anyhow::Error {
    anyhow!(message(obj).unwrap_or(fallback).to_string())
}

/// Reply of a command whose only interesting outcome is success
///
/// Non-JSON or empty replies count as success. A script that reported an
/// error fails with its message.
pub fn confirm(raw: &str, success: &str, unknown_error: &str) -> Result<String> {
    match parse_object(raw) {
        Some(obj) if obj.get("status").and_then(Value::as_str) == Some("error") => {
            Err(script_error(&obj, unknown_error))
        }
        _ => Ok(success.to_string()),
    }
}

/// Reply of `list_robots`
pub fn robot_listing(raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Ok("No robots found in simulation".to_string());
    }
    let obj = parse_object(raw).ok_or_else(|| anyhow!(DECODE_FAILED))?;
    if !is_success(&obj) {
        return Err(script_error(&obj, "Unknown error listing robots"));
    }

    match obj.get("data") {
        Some(Value::Array(paths)) => {
            let paths: Vec<&str> = paths.iter().filter_map(Value::as_str).collect();
            if paths.is_empty() {
                Ok("No robots found in simulation".to_string())
            } else {
                Ok(format!("Robots in simulation:\n{}", paths.join("\n")))
            }
        }
        _ => Ok(message(&obj)
            .unwrap_or("No robots found in simulation")
            .to_string()),
    }
}

/// Reply of `set_robot_positions` / `set_robot_velocities`
///
/// `noun` is "Positions" or "Velocities" and only used in fallback texts.
pub fn joints_set(raw: &str, robot: &str, noun: &str) -> Result<String> {
    let fallback = format!("{noun} set for {robot}");
    let Some(obj) = parse_object(raw) else {
        return Ok(fallback);
    };
    if !is_success(&obj) {
        let unknown = format!("Unknown error setting {}", noun.to_lowercase());
        return Err(script_error(&obj, &unknown));
    }
    Ok(message(&obj).map_or(fallback, str::to_string))
}

fn format_list(values: &Value) -> String {
    match values {
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(Value::to_string).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.to_string(),
    }
}

/// Reply of `get_robot_state`
pub fn robot_state(raw: &str, robot: &str) -> Result<String> {
    let obj = parse_object(raw).ok_or_else(|| anyhow!(DECODE_FAILED))?;
    if !is_success(&obj) {
        return Err(script_error(&obj, "Unknown error getting state"));
    }
    let Some(state) = obj.get("data").and_then(Value::as_object) else {
        bail!("No response received from Isaac Sim");
    };
    let positions = state.get("positions").map_or_else(String::new, format_list);
    let velocities = state.get("velocities").map_or_else(String::new, format_list);
    Ok(format!(
        "Robot {robot} state:\nPositions: {positions}\nVelocities: {velocities}"
    ))
}
