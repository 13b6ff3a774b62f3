//! DOF CLI - Drive Isaac Sim from the terminal

mod repl;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dof_core::args::ConnectionArgs;
use dof_core::script::{self, BallSpec};
use dof_core::{ClientConfig, ExchangeClient, robots};
use tokio::runtime::Runtime;

#[derive(Parser)]
#[command(name = "dof")]
#[command(about = "Send commands and scripts to a running Isaac Sim", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a Python script file and print the reply
    Exec {
        /// Script file to send
        script: PathBuf,
    },

    /// Add or replace the ground plane
    Ground {
        /// Edge length in metres
        #[arg(long, default_value_t = script::DEFAULT_GROUND_SIZE)]
        size: f64,
    },

    /// Add a ball, or resize it if it exists
    Ball {
        /// Prim path of the sphere
        #[arg(long, default_value = "/World/InjectedSphere")]
        prim_path: String,

        /// Sphere radius
        #[arg(long, default_value = "6.0")]
        radius: f64,

        /// Initial position
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
        at: Option<Vec<f64>>,
    },

    /// Reference a robot from the registry into the stage
    Robot {
        /// Robot identifier (see `dof robots`)
        name: String,
    },

    /// Set joint position targets (radians)
    Positions {
        /// Robot identifier
        name: String,

        /// One value per joint
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Set joint velocity targets (radians/second)
    Velocities {
        /// Robot identifier
        name: String,

        /// One value per joint
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Print joint positions and velocities of a robot
    State {
        /// Robot identifier
        name: String,
    },

    /// List robots on the stage
    List,

    /// List robots that can be added (no connection needed)
    Robots,

    /// Interactive console that sends each snippet to Isaac Sim
    Repl,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so replies on stdout can be piped
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = ClientConfig::from(cli.connection);
    let client = ExchangeClient::new(config);
    let runtime = Runtime::new()?;

    let payload = match cli.command {
        Commands::Robots => {
            print_registry();
            return Ok(());
        }
        Commands::Repl => return repl::run_repl(&client, &runtime),
        Commands::Exec { script } => std::fs::read_to_string(&script)
            .with_context(|| format!("Failed to read {}", script.display()))?,
        Commands::Ground { size } => script::add_ground(size)?,
        Commands::Ball {
            prim_path,
            radius,
            at,
        } => {
            let translate = match at.as_deref() {
                Some(&[x, y, z]) => [x, y, z],
                _ => BallSpec::default().translate,
            };
            script::add_ball(&BallSpec {
                prim_path,
                radius,
                translate,
            })?
        }
        Commands::Robot { name } => script::add_robot(robots::lookup(&name)?),
        Commands::Positions { name, values } => {
            script::set_joint_positions(robots::lookup(&name)?, &values)?
        }
        Commands::Velocities { name, values } => {
            script::set_joint_velocities(robots::lookup(&name)?, &values)?
        }
        Commands::State { name } => script::get_joint_states(robots::lookup(&name)?),
        Commands::List => script::list_robots(),
    };

    let reply = runtime.block_on(client.exchange(&payload))?;
    println!("{}", reply.trim_end());
    Ok(())
}

fn print_registry() {
    println!("Available robots:");
    for robot in robots::all() {
        println!(
            "  {:<8} {:<24} {}",
            robot.id, robot.name, robot.description
        );
    }
}
