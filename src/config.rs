//! CLI surface. Grounded on the teacher's `config.rs`: a `clap::Parser` `Cli`
//! that mirrors the flags a user types, and a separate `Config` built (and
//! validated) from it that the rest of the crate actually consumes.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "cbs-mapf",
    about = "Conflict-Based Search planner for multi-agent pathfinding on a 2D grid",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub mode: CliMode,

    #[arg(
        long,
        global = true,
        help = "Wall-clock budget for one solve, in seconds",
        default_value_t = 60
    )]
    pub time_limit_seconds: u64,

    #[arg(
        long,
        global = true,
        help = "Maximum time-expanded search depth per agent",
        default_value_t = 30_000
    )]
    pub search_depth_limit: u32,

    #[arg(
        long,
        global = true,
        help = "Repair agent searches with PCA* instead of restarting them from scratch",
        default_value_t = true
    )]
    pub use_pca_star: bool,
}

#[derive(Subcommand, Debug)]
pub enum CliMode {
    /// Solve one grid/agent-file instance and write the solution file.
    Run {
        #[arg(long)]
        grid_path: PathBuf,
        #[arg(long)]
        agent_path: PathBuf,
        #[arg(long)]
        solution_path: PathBuf,
    },
    /// Run the in-repo smoke scenarios and report pass/fail to stdout.
    Test,
    /// Generate random cases and aggregate solve-time statistics.
    Benchmark {
        #[arg(long, default_value_t = 0.2)]
        obstacle_probability: f64,
        #[arg(long, default_value_t = 20)]
        grid_rows: usize,
        #[arg(long, default_value_t = 20)]
        grid_cols: usize,
        #[arg(long, default_value_t = 10)]
        agents_per_case: usize,
        #[arg(long, default_value_t = 25)]
        num_cases: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        output_path: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub enum ConfigMode {
    Run {
        grid_path: PathBuf,
        agent_path: PathBuf,
        solution_path: PathBuf,
    },
    Test,
    Benchmark {
        obstacle_probability: f64,
        grid_rows: usize,
        grid_cols: usize,
        agents_per_case: usize,
        num_cases: usize,
        seed: u64,
        output_path: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: ConfigMode,
    pub time_limit: Duration,
    pub search_depth_limit: u32,
    pub use_pca_star: bool,
}

impl Config {
    pub fn new(cli: Cli) -> Self {
        let mode = match cli.mode {
            CliMode::Run {
                grid_path,
                agent_path,
                solution_path,
            } => ConfigMode::Run {
                grid_path,
                agent_path,
                solution_path,
            },
            CliMode::Test => ConfigMode::Test,
            CliMode::Benchmark {
                obstacle_probability,
                grid_rows,
                grid_cols,
                agents_per_case,
                num_cases,
                seed,
                output_path,
            } => ConfigMode::Benchmark {
                obstacle_probability,
                grid_rows,
                grid_cols,
                agents_per_case,
                num_cases,
                seed,
                output_path,
            },
        };

        Config {
            mode,
            time_limit: Duration::from_secs(cli.time_limit_seconds),
            search_depth_limit: cli.search_depth_limit,
            use_pca_star: cli.use_pca_star,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let ConfigMode::Benchmark {
            obstacle_probability,
            ..
        } = &self.mode
        {
            if !(0.0..=1.0).contains(obstacle_probability) {
                return Err(anyhow!(
                    "obstacle probability must be within [0, 1], got {obstacle_probability}"
                ));
            }
        }
        if self.search_depth_limit == 0 {
            return Err(anyhow!("search depth limit must be at least 1"));
        }
        Ok(())
    }
}
