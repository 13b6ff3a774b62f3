//! Scene tools for the MCP server
//!
//! Provides request types for adding static objects to the stage.

use dof_core::script::{BallSpec, DEFAULT_GROUND_SIZE};
use schemars::JsonSchema;
use serde::Deserialize;

fn default_ground_size() -> f64 {
    DEFAULT_GROUND_SIZE
}

fn default_prim_path() -> String {
    BallSpec::default().prim_path
}

fn default_radius() -> f64 {
    BallSpec::default().radius
}

fn default_height() -> f64 {
    BallSpec::default().translate[2]
}

/// Request for adding the ground plane
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddGroundRequest {
    /// Edge length of the square plane in metres (default: 400)
    #[serde(default = "default_ground_size")]
    pub size: f64,
}

/// Request for adding a ball
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddBallRequest {
    /// Prim path of the sphere (default: "/World/InjectedSphere").
    /// If the prim already exists only its radius is updated.
    #[serde(default = "default_prim_path")]
    pub prim_path: String,

    /// Sphere radius (default: 6)
    #[serde(default = "default_radius")]
    pub radius: f64,

    /// Initial X position (default: 0)
    #[serde(default)]
    pub x: f64,

    /// Initial Y position (default: 0)
    #[serde(default)]
    pub y: f64,

    /// Initial Z position (default: 20)
    #[serde(default = "default_height")]
    pub z: f64,
}

impl From<AddBallRequest> for BallSpec {
    fn from(request: AddBallRequest) -> Self {
        Self {
            prim_path: request.prim_path,
            radius: request.radius,
            translate: [request.x, request.y, request.z],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_arguments_use_defaults() {
        let ground: AddGroundRequest = serde_json::from_str("{}").unwrap();
        assert!((ground.size - 400.0).abs() < f64::EPSILON);

        let ball: AddBallRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(BallSpec::from(ball), BallSpec::default());
    }

    #[test]
    fn test_partial_ball_arguments() {
        let ball: AddBallRequest = serde_json::from_str(r#"{"radius": 2.5, "x": 1}"#).unwrap();
        let spec = BallSpec::from(ball);
        assert!((spec.radius - 2.5).abs() < f64::EPSILON);
        assert_eq!(spec.translate, [1.0, 0.0, 20.0]);
    }
}
