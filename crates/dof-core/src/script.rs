//! Python snippets executed inside Isaac Sim
//!
//! Each function renders a complete script for one high-level operation. All
//! peer-side syntax lives here; the exchange client treats the result as an
//! opaque payload. Every script prints exactly one JSON line of the form
//! `{"status": "success" | "error", ...}` which the bridge returns as `output`.

use crate::error::{Error, Result};
use crate::robots::RobotConfig;

/// Default edge length of the ground plane in metres
pub const DEFAULT_GROUND_SIZE: f64 = 400.0;

/// Prim path of the ground plane
pub const GROUND_PRIM_PATH: &str = "/World/GroundPlane";

/// Parameters for [`add_ball`]
#[derive(Debug, Clone, PartialEq)]
pub struct BallSpec {
    /// Prim path of the sphere
    pub prim_path: String,
    /// Sphere radius
    pub radius: f64,
    /// Initial translation, applied only when the sphere is created
    pub translate: [f64; 3],
}

impl Default for BallSpec {
    fn default() -> Self {
        Self {
            prim_path: "/World/InjectedSphere".to_string(),
            radius: 6.0,
            translate: [0.0, 0.0, 20.0],
        }
    }
}

/// Render a float as a Python literal
fn py_float(name: &str, value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    Ok(format!("{value:?}"))
}

fn py_positive(name: &str, value: f64) -> Result<String> {
    if value <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "{name} must be greater than zero, got {value}"
        )));
    }
    py_float(name, value)
}

fn py_list(name: &str, values: &[f64]) -> Result<String> {
    let items = values
        .iter()
        .map(|v| py_float(name, *v))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("[{}]", items.join(", ")))
}

/// Render a string as a Python literal; JSON string syntax is valid Python
fn py_str(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Ground plane: a square mesh of `size` x `size` metres at Z = 0
///
/// Any existing plane at [`GROUND_PRIM_PATH`] is replaced.
pub fn add_ground(size: f64) -> Result<String> {
    py_positive("size", size)?;
    let extent = format!("{:.4}", size / 2.0);
    let path = py_str(GROUND_PRIM_PATH);

    Ok(format!(
        r#"import omni.usd
from pxr import UsdGeom
import json

try:
    ctx = omni.usd.get_context()
    stage = ctx.get_stage() or ctx.new_stage()

    path = {path}
    if stage.GetPrimAtPath(path):
        stage.RemovePrim(path)

    plane = UsdGeom.Mesh.Define(stage, path)
    extent = {extent}
    plane.CreatePointsAttr([
        (-extent, -extent, 0), (extent, -extent, 0),
        (extent, extent, 0), (-extent, extent, 0)
    ])
    plane.CreateFaceVertexCountsAttr([4])
    plane.CreateFaceVertexIndicesAttr([0, 1, 2, 3])
    omni.usd.get_context().wait_for_idle()

    result = {{"status": "success", "message": "Ground plane added successfully"}}
except Exception as e:
    result = {{"status": "error", "message": str(e)}}

print(json.dumps(result))
"#
    ))
}

/// Sphere prim, created at `translate` or resized if it already exists
pub fn add_ball(spec: &BallSpec) -> Result<String> {
    if spec.prim_path.trim().is_empty() || !spec.prim_path.starts_with('/') {
        return Err(Error::InvalidParameter(format!(
            "prim_path must be an absolute prim path, got '{}'",
            spec.prim_path
        )));
    }
    let path = py_str(&spec.prim_path);
    let radius = py_positive("radius", spec.radius)?;
    let [x, y, z] = spec.translate;
    let (x, y, z) = (py_float("x", x)?, py_float("y", y)?, py_float("z", z)?);

    Ok(format!(
        r#"import omni.usd, omni.timeline, omni.kit.app
from pxr import UsdGeom, Gf
import json

try:
    ctx = omni.usd.get_context()
    stage = ctx.get_stage() or ctx.new_stage()

    path = {path}
    if not stage.GetPrimAtPath(path):
        sphere = UsdGeom.Sphere.Define(stage, path)
        sphere.GetRadiusAttr().Set({radius})
        sphere.AddTranslateOp().Set(Gf.Vec3f({x}, {y}, {z}))
    else:
        sphere = UsdGeom.Sphere(stage.GetPrimAtPath(path))
        sphere.GetRadiusAttr().Set({radius})

    omni.timeline.get_timeline_interface().play()
    omni.kit.app.get_app().update()
    omni.timeline.get_timeline_interface().stop()
    omni.usd.get_context().wait_for_idle()

    result = {{"status": "success", "message": "Ball added/updated successfully at " + path}}
except Exception as e:
    result = {{"status": "error", "message": str(e)}}

print(json.dumps(result))
"#
    ))
}

/// Reference a registered robot into the stage, replacing any previous prim
pub fn add_robot(robot: &RobotConfig) -> String {
    let path = py_str(robot.prim_path);
    let usd = py_str(&robot.usd_path());
    let name = py_str(robot.name);

    format!(
        r#"import omni.usd
import json

try:
    ctx = omni.usd.get_context()
    stage = ctx.get_stage() or ctx.new_stage()

    path = {path}
    if stage.GetPrimAtPath(path):
        stage.RemovePrim(path)

    stage.DefinePrim(path, "Xform").GetReferences().AddReference({usd})
    omni.usd.get_context().wait_for_idle()

    result = {{"status": "success", "message": "Robot " + {name} + " referenced from " + {usd}}}
except Exception as e:
    result = {{"status": "error", "message": str(e)}}

print(json.dumps(result))
"#
    )
}

/// Which joint quantity a command drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointTarget {
    Positions,
    Velocities,
}

impl JointTarget {
    fn noun(self) -> &'static str {
        match self {
            Self::Positions => "positions",
            Self::Velocities => "velocities",
        }
    }
}

fn articulation_header(robot: &RobotConfig) -> String {
    format!(
        r#"from omni.isaac.core.articulations import ArticulationView
import json

try:
    robot = ArticulationView(prim_paths_expr={path}, name={id})
    robot.initialize()
"#,
        path = py_str(robot.prim_path),
        id = py_str(robot.id),
    )
}

fn set_joints(robot: &RobotConfig, target: JointTarget, values: &[f64]) -> Result<String> {
    if values.is_empty() {
        return Err(Error::InvalidParameter(format!(
            "at least one joint {} value is required",
            target.noun()
        )));
    }
    let noun = target.noun();
    let list = py_list(noun, values)?;
    let header = articulation_header(robot);
    let id = py_str(robot.id);

    Ok(format!(
        r#"{header}
    robot.set_joint_{noun}({noun}={list})

    result = {{"status": "success", "message": "Set joint {noun} for " + {id}}}
except Exception as e:
    result = {{"status": "error", "message": str(e)}}

print(json.dumps(result))
"#
    ))
}

/// Set target joint positions in radians
pub fn set_joint_positions(robot: &RobotConfig, positions: &[f64]) -> Result<String> {
    set_joints(robot, JointTarget::Positions, positions)
}

/// Set target joint velocities in radians per second
pub fn set_joint_velocities(robot: &RobotConfig, velocities: &[f64]) -> Result<String> {
    set_joints(robot, JointTarget::Velocities, velocities)
}

/// Query current joint positions and velocities
///
/// Prints `{"status": "success", "data": {"positions": [...], "velocities": [...]}}`.
pub fn get_joint_states(robot: &RobotConfig) -> String {
    let header = articulation_header(robot);

    format!(
        r#"{header}
    positions = robot.get_joint_positions().tolist()
    velocities = robot.get_joint_velocities().tolist()

    result = {{
        "status": "success",
        "data": {{"positions": positions, "velocities": velocities}}
    }}
except Exception as e:
    result = {{"status": "error", "message": str(e)}}

print(json.dumps(result))
"#
    )
}

/// List prim paths of all articulation roots on the stage
///
/// Prints `{"status": "success", "data": ["/World/...", ...]}`.
pub fn list_robots() -> String {
    r#"import omni.usd
import omni.kit.app
from pxr import UsdPhysics
import json
import sys

try:
    omni.kit.app.get_app().update()

    stage = omni.usd.get_context().get_stage()
    robots = []
    if stage:
        for prim in stage.Traverse():
            if prim.HasAPI(UsdPhysics.ArticulationRootAPI):
                robots.append(prim.GetPath().pathString)

    result = {"status": "success", "data": robots}
except Exception as e:
    result = {"status": "error", "message": str(e)}

print(json.dumps(result))
sys.stdout.flush()
"#
    .to_string()
}
