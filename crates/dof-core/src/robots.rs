//! Registry of robots that can be referenced into the stage
//!
//! Maps short identifiers ("franka", "ur5", ...) to the remote USD asset and
//! the prim path the robot is placed under.

use serde::Serialize;

use crate::error::{Error, Result};

const ASSET_ROOT: &str =
    "https://omniverse-content-production.s3-us-west-2.amazonaws.com/Assets/Isaac/4.5/Isaac/Robots";

/// Broad robot family, used for grouping in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotCategory {
    Manipulator,
    Mobile,
    Humanoid,
}

/// Static description of one robot asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RobotConfig {
    /// Short identifier used by tools
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Asset path relative to the Isaac robots root
    #[serde(skip)]
    asset: &'static str,
    /// Prim the robot is referenced under
    pub prim_path: &'static str,
    /// One-line description
    pub description: &'static str,
    pub category: RobotCategory,
}

impl RobotConfig {
    /// Full URL of the USD asset
    pub fn usd_path(&self) -> String {
        format!("{ASSET_ROOT}/{}", self.asset)
    }
}

static ROBOTS: &[RobotConfig] = &[
    RobotConfig {
        id: "franka",
        name: "Franka Emika Panda",
        asset: "Franka/franka.usd",
        prim_path: "/World/Franka",
        description: "7-DOF robotic arm with parallel gripper",
        category: RobotCategory::Manipulator,
    },
    RobotConfig {
        id: "ur5",
        name: "Universal Robots UR5",
        asset: "UniversalRobots/ur5/ur5.usd",
        prim_path: "/World/UR5",
        description: "6-DOF collaborative robot arm",
        category: RobotCategory::Manipulator,
    },
    RobotConfig {
        id: "kinova",
        name: "Kinova Gen3",
        asset: "Kinova/Gen3/gen3n7_instanceable.usd",
        prim_path: "/World/Kinova",
        description: "7-DOF lightweight robotic arm",
        category: RobotCategory::Manipulator,
    },
    RobotConfig {
        id: "flexiv",
        name: "Flexiv Rizon 4",
        asset: "Flexiv/Rizon4/flexiv_rizon4.usd",
        prim_path: "/World/FlexivRizon4",
        description: "7-DOF adaptive robotic arm",
        category: RobotCategory::Manipulator,
    },
    RobotConfig {
        id: "carter",
        name: "NVIDIA Carter",
        asset: "Carter/carter_v1.usd",
        prim_path: "/World/Carter",
        description: "Differential drive mobile robot",
        category: RobotCategory::Mobile,
    },
    RobotConfig {
        id: "jetbot",
        name: "NVIDIA JetBot",
        asset: "Jetbot/jetbot.usd",
        prim_path: "/World/JetBot",
        description: "Educational AI robot platform",
        category: RobotCategory::Mobile,
    },
    RobotConfig {
        id: "digit",
        name: "Agility Robotics Digit",
        asset: "Agility/Digit/digit_v4.usd",
        prim_path: "/World/Digit",
        description: "Bipedal humanoid robot",
        category: RobotCategory::Humanoid,
    },
];

/// All registered robots, in listing order
pub fn all() -> &'static [RobotConfig] {
    ROBOTS
}

/// Identifiers of all registered robots
pub fn ids() -> Vec<&'static str> {
    ROBOTS.iter().map(|r| r.id).collect()
}

/// Find a robot by identifier (case-insensitive)
///
/// # Errors
/// Returns [`Error::UnknownRobot`] listing the valid identifiers.
pub fn lookup(name: &str) -> Result<&'static RobotConfig> {
    let wanted = name.trim().to_lowercase();
    ROBOTS.iter().find(|r| r.id == wanted).ok_or_else(|| Error::UnknownRobot {
        name: wanted,
        available: ids().join(", "),
    })
}
