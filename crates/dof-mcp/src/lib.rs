//! DOF MCP Server - Model Context Protocol server for Isaac Sim
//!
//! This crate exposes a running Isaac Sim instance to AI agents. Every tool
//! renders a Python snippet, sends it to the simulator's code-injection bridge
//! and turns the JSON reply into a short message. Agents can:
//!
//! - Add a ground plane and balls to the stage
//! - Reference robots from the registry into the stage
//! - Set joint position and velocity targets
//! - Query joint state and list the robots on the stage
//!
//! Failures never end the session: they come back as `Error: ...` text so the
//! agent can correct itself and continue.

pub mod reply;
pub mod state;
pub mod tools;

use dof_core::robots;
use dof_core::script::BallSpec;
use rmcp::{
    ErrorData as McpError,
    ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde_json::json;
use tracing::{error, info};

use crate::state::SimState;
use crate::tools::{
    robot::{RobotRequest, SetPositionsRequest, SetVelocitiesRequest},
    scene::{AddBallRequest, AddGroundRequest},
};

// Re-export for binary
pub use rmcp;
pub use state::SimState as State;

/// Name the server reports to clients
pub const SERVER_NAME: &str = "dof-sim";

/// Wrap a command outcome as tool output
///
/// Errors are reported as text rather than as protocol errors so the agent
/// sees them and the server keeps serving.
fn respond(tool: &str, result: anyhow::Result<String>) -> CallToolResult {
    match result {
        Ok(text) => {
            info!("{tool}: {text}");
            CallToolResult::success(vec![Content::text(text)])
        }
        Err(e) => {
            error!("Error in {tool}: {e:#}");
            CallToolResult::success(vec![Content::text(format!("Error: {e}"))])
        }
    }
}

/// The DOF MCP service
///
/// Implements the MCP ServerHandler to expose simulator commands as MCP tools.
/// All commands share one [`SimState`], so the simulator only ever sees one
/// script at a time.
#[derive(Clone)]
pub struct DofMcpService {
    state: SimState,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl DofMcpService {
    /// Create a new MCP service with the given state
    pub fn new(state: SimState) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    // ========================================================================
    // Scene Tools
    // ========================================================================

    #[tool(description = "Add a square ground plane at Z = 0 to the Isaac Sim DOF simulation. Replaces an existing ground plane.")]
    async fn add_ground(
        &self,
        params: Parameters<AddGroundRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request = params.0;
        info!("Adding ground plane...");
        let result = self.state.add_ground(request.size).await.and_then(|raw| {
            reply::confirm(&raw, "Ground added to DOF simulation", "Unknown error adding ground")
        });
        Ok(respond("add_ground", result))
    }

    #[tool(description = "Add a ball (sphere) to the Isaac Sim DOF simulation. If a sphere already exists at the prim path its radius is updated.")]
    async fn add_ball(
        &self,
        params: Parameters<AddBallRequest>,
    ) -> Result<CallToolResult, McpError> {
        let spec = BallSpec::from(params.0);
        info!("Adding ball at {}...", spec.prim_path);
        let result = self.state.add_ball(&spec).await.and_then(|raw| {
            reply::confirm(&raw, "Ball added to DOF simulation", "Unknown error adding ball")
        });
        Ok(respond("add_ball", result))
    }

    // ========================================================================
    // Robot Tools
    // ========================================================================

    #[tool(description = "Add a robot to the Isaac Sim DOF simulation. Available robots: franka, ur5, kinova, flexiv (arms), carter, jetbot (mobile), digit (humanoid). Replaces a robot of the same kind.")]
    async fn add_robot(&self, params: Parameters<RobotRequest>) -> Result<CallToolResult, McpError> {
        let request = params.0;
        info!("Adding robot {}...", request.robot_name);
        let result = self
            .state
            .add_robot(&request.robot_name)
            .await
            .and_then(|(robot, raw)| {
                reply::confirm(
                    &raw,
                    &format!("{} added to DOF simulation", robot.name),
                    "Unknown error adding robot",
                )
            });
        Ok(respond("add_robot", result))
    }

    #[tool(description = "List all robots (articulation roots) currently in the simulation.")]
    async fn list_robots(&self) -> Result<CallToolResult, McpError> {
        info!("Listing robots...");
        let result = self
            .state
            .list_robots()
            .await
            .and_then(|raw| reply::robot_listing(&raw));
        Ok(respond("list_robots", result))
    }

    #[tool(description = "Set joint position targets (radians) for a robot. Provide one value per joint.")]
    async fn set_robot_positions(
        &self,
        params: Parameters<SetPositionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request = params.0;
        info!("Setting positions for robot {}: {:?}", request.robot_name, request.positions);
        let result = self
            .state
            .set_joint_positions(&request.robot_name, &request.positions)
            .await
            .and_then(|raw| reply::joints_set(&raw, &request.robot_name, "Positions"));
        Ok(respond("set_robot_positions", result))
    }

    #[tool(description = "Set joint velocity targets (radians/second) for a robot. Provide one value per joint.")]
    async fn set_robot_velocities(
        &self,
        params: Parameters<SetVelocitiesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request = params.0;
        info!("Setting velocities for robot {}: {:?}", request.robot_name, request.velocities);
        let result = self
            .state
            .set_joint_velocities(&request.robot_name, &request.velocities)
            .await
            .and_then(|raw| reply::joints_set(&raw, &request.robot_name, "Velocities"));
        Ok(respond("set_robot_velocities", result))
    }

    #[tool(description = "Get current joint positions and velocities of a robot.")]
    async fn get_robot_state(
        &self,
        params: Parameters<RobotRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request = params.0;
        info!("Getting state for robot {}", request.robot_name);
        let result = self
            .state
            .joint_states(&request.robot_name)
            .await
            .and_then(|raw| reply::robot_state(&raw, &request.robot_name));
        Ok(respond("get_robot_state", result))
    }

    // ========================================================================
    // Discovery Tools
    // ========================================================================

    #[tool(description = "List the robot types that can be added with add_robot, with display names, descriptions and asset locations.")]
    async fn list_robot_types(&self) -> Result<CallToolResult, McpError> {
        let types: Vec<_> = robots::all()
            .iter()
            .map(|robot| {
                json!({
                    "robot_name": robot.id,
                    "name": robot.name,
                    "category": robot.category,
                    "description": robot.description,
                    "prim_path": robot.prim_path,
                    "usd_path": robot.usd_path(),
                })
            })
            .collect();
        let result = serde_json::to_string_pretty(&types).map_err(Into::into);
        Ok(respond("list_robot_types", result))
    }
}

#[tool_handler]
impl ServerHandler for DofMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: Some("Isaac Sim DOF Simulation".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Controls a running Isaac Sim instance through its code-injection bridge. \
                 \n\nWorkflow:\n\
                 1. add_ground() - Add a ground plane\n\
                 2. add_robot(robot_name) - Place a robot (see list_robot_types)\n\
                 3. set_robot_positions() / set_robot_velocities() - Drive its joints\n\
                 4. get_robot_state() - Read joint positions and velocities back\n\n\
                 Use list_robots() to see which robots are on the stage."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use dof_core::ClientConfig;
    use tokio::net::TcpListener;

    use super::*;

    fn text_of(result: &CallToolResult) -> &str {
        result.content[0].raw.as_text().map(|t| t.text.as_str()).unwrap()
    }

    /// Address on which nothing is listening
    async fn closed_port() -> ClientConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        ClientConfig::new("127.0.0.1", port)
    }

    #[tokio::test]
    async fn test_unknown_robot_is_error_text() {
        let service = DofMcpService::new(SimState::spawn(closed_port().await));
        let request = RobotRequest {
            robot_name: "nonexistent-bot".to_string(),
        };

        let result = service.add_robot(Parameters(request)).await.unwrap();
        assert_ne!(result.is_error, Some(true));
        let text = text_of(&result);
        assert!(text.starts_with("Error: "), "{text}");
        assert!(text.contains("Robot 'nonexistent-bot' not found"), "{text}");
    }

    #[tokio::test]
    async fn test_unreachable_bridge_is_error_text() {
        let config = closed_port().await;
        let port = config.port;
        let service = DofMcpService::new(SimState::spawn(config));

        let result = service.list_robots().await.unwrap();
        assert_ne!(result.is_error, Some(true));
        let text = text_of(&result);
        assert!(text.starts_with("Error: "), "{text}");
        assert!(text.contains(&port.to_string()), "{text}");
    }

    #[tokio::test]
    async fn test_robot_types_listing() {
        let service = DofMcpService::new(SimState::spawn(closed_port().await));

        let result = service.list_robot_types().await.unwrap();
        let listing: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(listing.as_array().unwrap().len(), robots::all().len());
        assert_eq!(listing[0]["robot_name"], "franka");
    }
}
