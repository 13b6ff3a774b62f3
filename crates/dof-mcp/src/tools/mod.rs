//! MCP tool request types for the DOF server
//!
//! - Scene (add_ground, add_ball)
//! - Robots (add_robot, set_robot_positions, set_robot_velocities, get_robot_state)

pub mod robot;
pub mod scene;
