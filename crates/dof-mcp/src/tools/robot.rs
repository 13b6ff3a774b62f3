//! Robot tools for the MCP server
//!
//! Provides request types for placing robots and driving their joints.

use dof_core::robots;
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::Deserialize;

/// Request naming a registered robot
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RobotRequest {
    /// Robot identifier: franka, ur5, kinova, flexiv, carter, jetbot or digit
    #[schemars(schema_with = "robot_id_schema")]
    pub robot_name: String,
}

/// String schema listing the registry ids, with display names as titles
///
/// Lookup stays case-insensitive; the enum only advertises the canonical ids.
fn robot_id_schema(_generator: &mut SchemaGenerator) -> Schema {
    let titles: Vec<&str> = robots::all().iter().map(|robot| robot.name).collect();
    json_schema!({
        "type": "string",
        "description": "Robot identifier from the registry",
        "enum": robots::ids(),
        "enumTitles": titles,
    })
}

/// Request for setting joint position targets
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetPositionsRequest {
    /// Name of the robot to control (must have been added with add_robot)
    pub robot_name: String,

    /// Target joint positions in radians, one per joint
    pub positions: Vec<f64>,
}

/// Request for setting joint velocity targets
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetVelocitiesRequest {
    /// Name of the robot to control (must have been added with add_robot)
    pub robot_name: String,

    /// Target joint velocities in radians/second, one per joint
    pub velocities: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_name_schema_lists_registry() {
        let schema = schemars::schema_for!(RobotRequest);
        let field = &schema.as_value()["properties"]["robot_name"];

        assert_eq!(field["type"], "string");
        let ids: Vec<&str> = field["enum"]
            .as_array()
            .unwrap()
            .iter()
            .map(|id| id.as_str().unwrap())
            .collect();
        assert_eq!(ids, robots::ids());
        assert_eq!(field["enumTitles"][0], "Franka Emika Panda");
    }

    #[test]
    fn test_robot_name_accepts_any_case() {
        let request: RobotRequest = serde_json::from_str(r#"{"robot_name":"Franka"}"#).unwrap();
        assert_eq!(robots::lookup(&request.robot_name).unwrap().id, "franka");
    }
}
