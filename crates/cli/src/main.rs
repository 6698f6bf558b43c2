//! Pit-stop strategy planner.
//!
//! Plans single decisions or whole races with Monte Carlo Tree Search over
//! the tyre-strategy model, and trains a tabular Q-learning baseline on the
//! same race for comparison.

mod planner;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use pitwall_core::WorldModel;
use pitwall_mcts::SearchResult;
use pitwall_qlearn::{QLearningAgent, QLearningConfig};
use pitwall_race::{Compound, RaceAction, RaceConfig, RaceModel, RaceState, TyreKey};
use planner::{plan, PlannerArgs};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Pit-stop strategy planning with tree search and Q-learning.
#[derive(Parser)]
#[command(name = "pitwall")]
#[command(about = "Plan tyre strategy with MCTS or train a Q-learning baseline")]
struct Cli {
    /// Race configuration as JSON; missing fields take their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the race length from the config.
    #[arg(long, global = true)]
    laps: Option<u32>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend the next action from a given race position.
    Plan {
        #[command(flatten)]
        planner: PlannerArgs,

        /// Laps already completed.
        #[arg(long, default_value = "0")]
        lap: u32,

        /// Fitted compound (soft, medium, hard).
        #[arg(long)]
        tyre: Option<Compound>,

        /// Laps already run on the fitted tyre.
        #[arg(long, default_value = "0")]
        tyre_age: u32,

        /// Stops already made.
        #[arg(long, default_value = "0")]
        pit_stops: u32,
    },

    /// Drive a whole race, replanning before every lap.
    Race {
        #[command(flatten)]
        planner: PlannerArgs,
    },

    /// Train a Q-learning agent and show its greedy race.
    Train {
        /// Number of training episodes.
        #[arg(short = 'n', long, default_value = "5000")]
        episodes: usize,

        /// Learning rate (alpha).
        #[arg(long, default_value = "0.1")]
        learning_rate: f64,

        /// Discount factor (gamma).
        #[arg(long, default_value = "1.0")]
        discount: f64,

        /// Initial exploration rate.
        #[arg(long, default_value = "0.3")]
        epsilon: f64,

        /// Multiplicative exploration decay per episode.
        #[arg(long, default_value = "0.999")]
        epsilon_decay: f64,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Also print the learned Q-table.
        #[arg(long)]
        show_table: bool,
    },
}

/// One lap-by-lap decision in a planned race.
#[derive(Debug, Clone, Serialize)]
struct LapDecision {
    lap: u32,
    action: RaceAction,
    visits: u64,
    mean_reward: f64,
    lap_reward: f64,
}

/// Summary of a race driven by the planner.
#[derive(Debug, Clone, Serialize)]
struct RaceReport {
    total_laps: u32,
    total_reward: f64,
    ideal_reward: f64,
    pit_stops: u32,
    decisions: Vec<LapDecision>,
    elapsed_ms: u128,
}

impl RaceReport {
    fn pit_laps(&self) -> impl Iterator<Item = &LapDecision> {
        self.decisions.iter().filter(|d| d.action.is_pit())
    }
}

/// Result of Q-learning training.
#[derive(Debug, Clone, Serialize)]
struct TrainReport {
    episodes: usize,
    final_epsilon: f64,
    mean_training_reward: f64,
    greedy_reward: f64,
    greedy_stops: Vec<(u32, RaceAction)>,
    table_size: usize,
}

fn load_race_config(path: Option<&Path>, laps: Option<u32>) -> Result<RaceConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read race config {:?}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse race config {:?}", path))?
        }
        None => RaceConfig::default(),
    };
    if let Some(laps) = laps {
        config.total_laps = laps;
    }
    Ok(config)
}

fn build_model(config: RaceConfig) -> Result<RaceModel> {
    RaceModel::new(config).context("Invalid race configuration")
}

fn print_search(state: &RaceState, result: &SearchResult<RaceAction>) {
    println!("Position: {}", state);
    println!(
        "Recommendation: {} ({} simulations, {} nodes{})",
        result.best_action,
        result.simulations_run,
        result.tree_size,
        if result.stopped_early {
            ", time limit hit"
        } else {
            ""
        }
    );
    println!();
    println!("{:<12} {:>8} {:>10}", "action", "visits", "mean");
    for child in &result.children {
        let marker = if child.action == result.best_action {
            "*"
        } else {
            ""
        };
        println!(
            "{:<12} {:>8} {:>10.4}{}",
            child.action.to_string(),
            child.visit_count,
            child.mean_reward(),
            marker
        );
    }
}

fn cmd_plan(
    model: &RaceModel,
    args: &PlannerArgs,
    lap: u32,
    tyre: Option<Compound>,
    tyre_age: u32,
    pit_stops: u32,
    json: bool,
) -> Result<()> {
    let config = model.config();
    if lap >= config.total_laps {
        bail!(
            "Lap {} is past the end of a {}-lap race",
            lap,
            config.total_laps
        );
    }
    let state = RaceState::new(config.total_laps, tyre.unwrap_or(config.starting_tyre))
        .at_lap(lap)
        .with_tyre_age(tyre_age)
        .with_pit_stops(pit_stops);

    let result = plan(model, &state, args, args.seed)
        .context("Search failed")?;
    info!("Recommended {} at {}", result.best_action, state);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_search(&state, &result);
    }
    Ok(())
}

fn drive_race(model: &RaceModel, args: &PlannerArgs) -> Result<RaceReport> {
    let start = Instant::now();
    // Lap noise is drawn from its own stream so planning seeds stay independent.
    let mut race_rng = ChaCha8Rng::seed_from_u64(args.seed ^ 0x5eed);
    let mut state = model.start();
    let mut decisions = Vec::new();

    while !model.legal_actions(&state)?.is_empty() {
        let seed = args.seed.wrapping_add(u64::from(state.lap()));
        let result = plan(model, &state, args, seed)
            .with_context(|| format!("Search failed at {}", state))?;
        let action = result.best_action;
        let chosen = result
            .child(action)
            .context("Recommended action has no statistics")?;

        let next = model.transition(&state, action, &mut race_rng)?;
        debug!("{} -> {}", state, action);
        decisions.push(LapDecision {
            lap: state.lap(),
            action,
            visits: u64::from(chosen.visit_count),
            mean_reward: chosen.mean_reward(),
            lap_reward: next.total_reward() - state.total_reward(),
        });
        state = next;
    }

    Ok(RaceReport {
        total_laps: state.total_laps(),
        total_reward: state.total_reward(),
        ideal_reward: model.ideal_reward(),
        pit_stops: state.pit_stops(),
        decisions,
        elapsed_ms: start.elapsed().as_millis(),
    })
}

fn cmd_race(model: &RaceModel, args: &PlannerArgs, json: bool) -> Result<()> {
    info!(
        "Planning a {}-lap race with {} simulations per lap",
        model.config().total_laps,
        args.simulations
    );
    let report = drive_race(model, args)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Starting tyre: {}", model.config().starting_tyre);
    for decision in report.pit_laps() {
        println!("Lap {:>3}: {}", decision.lap + 1, decision.action);
    }
    if report.pit_stops == 0 {
        println!("No stops");
    }
    println!(
        "Total reward: {:.1} / {:.1} ({:.1}%)",
        report.total_reward,
        report.ideal_reward,
        report.total_reward / report.ideal_reward * 100.0
    );
    println!("Time: {:.2}s", report.elapsed_ms as f64 / 1000.0);
    Ok(())
}

fn train(
    model: &RaceModel,
    config: QLearningConfig,
    episodes: usize,
    seed: u64,
) -> Result<(QLearningAgent<TyreKey, RaceAction>, TrainReport)> {
    let mut agent = QLearningAgent::new(config, seed)
        .context("Invalid Q-learning configuration")?;
    let progress_every = (episodes / 10).max(1);
    let mut reward_sum = 0.0;

    for episode in 1..=episodes {
        let summary = agent.train_episode(model)?;
        reward_sum += summary.total_reward;
        if episode % progress_every == 0 {
            info!(
                "Episode {}/{}: reward {:.1}, epsilon {:.4}",
                episode,
                episodes,
                summary.total_reward,
                agent.epsilon()
            );
        }
    }

    let greedy = agent.greedy_episode(model)?;
    let greedy_stops = greedy
        .actions
        .iter()
        .enumerate()
        .filter(|(_, a)| a.is_pit())
        .map(|(lap, &a)| (lap as u32, a))
        .collect();

    let report = TrainReport {
        episodes,
        final_epsilon: agent.epsilon(),
        mean_training_reward: if episodes == 0 {
            0.0
        } else {
            reward_sum / episodes as f64
        },
        greedy_reward: greedy.total_reward,
        greedy_stops,
        table_size: agent.q_table().size(),
    };
    Ok((agent, report))
}

fn print_q_table(agent: &QLearningAgent<TyreKey, RaceAction>) {
    print!("{:<6}", "key");
    for action in RaceAction::ALL {
        print!(" {:>10}", action.to_string());
    }
    println!();
    for key in TyreKey::all() {
        print!("{:<6}", key.to_string());
        for action in RaceAction::ALL {
            print!(" {:>10.2}", agent.q_table().get(&key, action));
        }
        println!();
    }
}

fn main() -> Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();
    let cli = Cli::parse();

    let race_config = load_race_config(cli.config.as_deref(), cli.laps)?;
    let model = build_model(race_config)?;

    match cli.command {
        Commands::Plan {
            planner,
            lap,
            tyre,
            tyre_age,
            pit_stops,
        } => cmd_plan(&model, &planner, lap, tyre, tyre_age, pit_stops, cli.json),

        Commands::Race { planner } => cmd_race(&model, &planner, cli.json),

        Commands::Train {
            episodes,
            learning_rate,
            discount,
            epsilon,
            epsilon_decay,
            seed,
            show_table,
        } => {
            let config = QLearningConfig {
                learning_rate,
                discount_factor: discount,
                epsilon,
                epsilon_decay,
                ..Default::default()
            };
            info!("Training Q-learning for {} episodes", episodes);
            let (agent, report) = train(&model, config, episodes, seed)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("Episodes:        {}", report.episodes);
            println!("Final epsilon:   {:.4}", report.final_epsilon);
            println!("Mean reward:     {:.1}", report.mean_training_reward);
            println!(
                "Greedy reward:   {:.1} / {:.1}",
                report.greedy_reward,
                model.ideal_reward()
            );
            for (lap, action) in &report.greedy_stops {
                println!("Lap {:>3}: {}", lap + 1, action);
            }
            if show_table {
                println!();
                print_q_table(&agent);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner::EvaluatorKind;

    fn planner_args(simulations: usize) -> PlannerArgs {
        PlannerArgs {
            simulations,
            exploration: 2.0,
            seed: 42,
            workers: 1,
            time_limit_ms: None,
            evaluator: EvaluatorKind::Model,
            rollout_depth: 20,
        }
    }

    #[test]
    fn test_cli_parses_plan() {
        let cli = Cli::try_parse_from([
            "pitwall",
            "plan",
            "--lap",
            "5",
            "--tyre",
            "medium",
            "--tyre-age",
            "3",
            "--laps",
            "20",
        ])
        .unwrap();
        assert_eq!(cli.laps, Some(20));
        match cli.command {
            Commands::Plan {
                lap,
                tyre,
                tyre_age,
                planner,
                ..
            } => {
                assert_eq!(lap, 5);
                assert_eq!(tyre, Some(Compound::Medium));
                assert_eq!(tyre_age, 3);
                assert_eq!(planner.simulations, 1000);
            }
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_tyre() {
        let parsed = Cli::try_parse_from(["pitwall", "plan", "--tyre", "wet"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_load_race_config_defaults_and_override() {
        let config = load_race_config(None, Some(12)).unwrap();
        assert_eq!(config.total_laps, 12);
        assert_eq!(config.max_pit_stops, RaceConfig::default().max_pit_stops);
    }

    #[test]
    fn test_plan_accepts_worn_out_set() {
        let cli = Cli::try_parse_from([
            "pitwall",
            "plan",
            "--laps",
            "20",
            "--lap",
            "5",
            "--tyre-age",
            "4294967295",
        ])
        .unwrap();
        let Commands::Plan { tyre_age, .. } = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(tyre_age, u32::MAX);

        let model = build_model(RaceConfig::with_laps(20)).unwrap();
        let planned = cmd_plan(&model, &planner_args(10), 5, None, tyre_age, 0, true);
        assert!(planned.is_ok());
    }

    #[test]
    fn test_drive_race_finishes() {
        let model = build_model(RaceConfig::with_laps(12)).unwrap();
        let report = drive_race(&model, &planner_args(100)).unwrap();

        assert_eq!(report.decisions.len(), 12);
        assert!(report.pit_stops <= model.config().max_pit_stops);
        assert_eq!(report.pit_laps().count() as u32, report.pit_stops);
        let summed: f64 = report.decisions.iter().map(|d| d.lap_reward).sum();
        assert!((summed - report.total_reward).abs() < 1e-9);
    }

    #[test]
    fn test_train_reports_greedy_race() {
        let model = build_model(RaceConfig::with_laps(8)).unwrap();
        let (agent, report) = train(&model, QLearningConfig::default(), 20, 1).unwrap();
        assert_eq!(agent.episodes(), 20);
        assert_eq!(report.episodes, 20);
        assert!(report.table_size > 0);
    }
}
