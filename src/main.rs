use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cbs_mapf::config::{Cli, Config, ConfigMode};
use cbs_mapf::error::PlannerError;
use cbs_mapf::generator::generate_case;
use cbs_mapf::highlevel::cbs_tree::CbsTree;
use cbs_mapf::io::{agent_file, grid_file, solution_file};
use cbs_mapf::stat::BenchmarkStats;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli);
    config.validate()?;

    match &config.mode {
        ConfigMode::Run { .. } => run_mode(&config),
        ConfigMode::Test => test_mode(&config),
        ConfigMode::Benchmark { .. } => benchmark_mode(&config),
    }
}

fn run_mode(config: &Config) -> Result<()> {
    let ConfigMode::Run {
        grid_path,
        agent_path,
        solution_path,
    } = &config.mode
    else {
        unreachable!("run_mode called with a non-Run config");
    };

    let grid = grid_file::load_grid(grid_path)
        .with_context(|| format!("loading grid file {}", grid_path.display()))?;
    let agents = agent_file::load_agents(agent_path)
        .with_context(|| format!("loading agent file {}", agent_path.display()))?;

    info!(agents = agents.len(), "solving instance");
    let tree = CbsTree::new(
        &agents,
        grid,
        config.search_depth_limit,
        config.use_pca_star,
        config.time_limit,
    )?;
    let solution = tree.solve()?;
    let paths = solution.paths();

    solution_file::write_solution(solution_path, &agents, &paths)
        .with_context(|| format!("writing solution file {}", solution_path.display()))?;
    info!(makespan = solution.cost, "solved");
    Ok(())
}

/// A fixed battery of small scenarios exercising the cases in SPEC_FULL.md
/// §8: a straight line, a constrained detour, a head-on swap, and a
/// three-agent crossing. Prints one PASS/FAIL line per scenario.
fn test_mode(config: &Config) -> Result<()> {
    use cbs_mapf::agent::{Agent, Coord};
    use cbs_mapf::io::grid_file::parse_grid;

    let scenarios: Vec<(&str, &str, Vec<Agent>)> = vec![
        (
            "straight line",
            "1111\n1111",
            vec![Agent {
                id: 0,
                name: "a".to_string(),
                start: Coord::new(0, 0),
                goal: Coord::new(3, 0),
            }],
        ),
        (
            "head-on swap",
            "111\n111",
            vec![
                Agent {
                    id: 0,
                    name: "a".to_string(),
                    start: Coord::new(0, 0),
                    goal: Coord::new(2, 0),
                },
                Agent {
                    id: 1,
                    name: "b".to_string(),
                    start: Coord::new(2, 0),
                    goal: Coord::new(0, 0),
                },
            ],
        ),
        (
            "three-agent crossing",
            "111\n111\n111",
            vec![
                Agent {
                    id: 0,
                    name: "a".to_string(),
                    start: Coord::new(0, 1),
                    goal: Coord::new(2, 1),
                },
                Agent {
                    id: 1,
                    name: "b".to_string(),
                    start: Coord::new(1, 0),
                    goal: Coord::new(1, 2),
                },
                Agent {
                    id: 2,
                    name: "c".to_string(),
                    start: Coord::new(2, 1),
                    goal: Coord::new(0, 1),
                },
            ],
        ),
    ];

    let mut all_passed = true;
    for (name, grid_text, agents) in scenarios {
        let grid = parse_grid(grid_text)?;
        let result = CbsTree::new(
            &agents,
            grid,
            config.search_depth_limit,
            config.use_pca_star,
            config.time_limit,
        )
        .and_then(CbsTree::solve);

        match result {
            Ok(_) => println!("[PASS] {name}"),
            Err(e) => {
                println!("[FAIL] {name}: {e}");
                all_passed = false;
            }
        }
    }

    if all_passed {
        Ok(())
    } else {
        Err(anyhow::anyhow!("one or more smoke scenarios failed"))
    }
}

fn benchmark_mode(config: &Config) -> Result<()> {
    let ConfigMode::Benchmark {
        obstacle_probability,
        grid_rows,
        grid_cols,
        agents_per_case,
        num_cases,
        seed,
        output_path,
    } = &config.mode
    else {
        unreachable!("benchmark_mode called with a non-Benchmark config");
    };

    let mut rng = StdRng::seed_from_u64(*seed);
    let mut stats = BenchmarkStats::default();

    for case_num in 0..*num_cases {
        let case = generate_case(
            *grid_rows,
            *grid_cols,
            *obstacle_probability,
            *agents_per_case,
            &mut rng,
        );

        let started = Instant::now();
        let result = CbsTree::new(
            &case.agents,
            case.grid,
            config.search_depth_limit,
            config.use_pca_star,
            config.time_limit,
        )
        .and_then(CbsTree::solve);

        match result {
            Ok(solution) => {
                stats.record_success(started.elapsed());
                info!(case_num, makespan = solution.cost, "case solved");
            }
            Err(ref e @ PlannerError::TimeLimitExceeded) => {
                println!("case {case_num} failed: time limit exceeded");
                stats.record_failure(e);
            }
            Err(ref e) => {
                println!("case {case_num} failed: {e}");
                stats.record_failure(e);
            }
        }
    }

    stats.write_report(output_path);
    Ok(())
}
