//! End-to-end planning scenarios.

use pitwall_core::{Outcome, PlanError, WorldModel, WorldModelError};
use pitwall_mcts::{
    run, search_parallel, CoinFlipEvaluator, Mcts, MctsConfig, ModelEvaluator, RolloutEvaluator,
};
use pitwall_race::{Compound, RaceAction, RaceConfig, RaceModel};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Root offers a fixed set of moves; every move ends the episode.
/// Only the `winner` move is scored as a win.
struct Pick {
    moves: Vec<char>,
    winner: Option<char>,
}

#[derive(Clone, Debug, PartialEq)]
enum Spot {
    Start,
    Done(char),
}

impl WorldModel for Pick {
    type State = Spot;
    type Action = char;

    fn legal_actions(&self, state: &Spot) -> Result<Vec<char>, WorldModelError> {
        Ok(match state {
            Spot::Start => self.moves.clone(),
            Spot::Done(_) => Vec::new(),
        })
    }

    fn transition<R: Rng + ?Sized>(
        &self,
        _state: &Spot,
        action: char,
        _rng: &mut R,
    ) -> Result<Spot, WorldModelError> {
        Ok(Spot::Done(action))
    }

    fn evaluate<R: Rng + ?Sized>(
        &self,
        state: &Spot,
        _rng: &mut R,
    ) -> Result<Outcome, WorldModelError> {
        let won = matches!(state, Spot::Done(m) if Some(*m) == self.winner);
        Ok(Outcome::from(won))
    }
}

/// Model whose transitions always fail.
struct Broken;

impl WorldModel for Broken {
    type State = ();
    type Action = u8;

    fn legal_actions(&self, _state: &()) -> Result<Vec<u8>, WorldModelError> {
        Ok(vec![1, 2])
    }

    fn transition<R: Rng + ?Sized>(
        &self,
        _state: &(),
        _action: u8,
        _rng: &mut R,
    ) -> Result<(), WorldModelError> {
        Err(WorldModelError::Other("sensor offline".into()))
    }

    fn evaluate<R: Rng + ?Sized>(
        &self,
        _state: &(),
        _rng: &mut R,
    ) -> Result<Outcome, WorldModelError> {
        Ok(Outcome::Loss)
    }
}

#[test]
fn test_winning_move_is_found() {
    let model = Pick {
        moves: vec!['A', 'B'],
        winner: Some('A'),
    };
    assert_eq!(run(&model, &Spot::Start, 50, 2.0, 42).unwrap(), 'A');
}

#[test]
fn test_single_simulation_creates_one_child() {
    let model = Pick {
        moves: vec!['a', 'b', 'c', 'd'],
        winner: Some('d'),
    };
    let mut mcts = Mcts::new(
        MctsConfig::with_simulations(1),
        ModelEvaluator,
        ChaCha8Rng::seed_from_u64(0),
    );
    let grown = mcts.grow(&model, &Spot::Start).unwrap();
    let children = grown.root_children();

    assert_eq!(children.len(), 1);
    assert_eq!(children[0].visit_count, 1);
    assert_eq!(grown.tree.root().untried_actions().len(), 3);

    let result = grown.into_result().unwrap();
    assert_eq!(result.best_action, children[0].action);
}

#[test]
fn test_single_losing_simulation_still_recommends_its_child() {
    let model = Pick {
        moves: vec!['a', 'b', 'c', 'd'],
        winner: None,
    };
    // Unvisited actions are not candidates; the only explored child wins the tie.
    assert_eq!(run(&model, &Spot::Start, 1, 2.0, 0).unwrap(), 'd');
}

#[test]
fn test_no_legal_actions_at_root() {
    let model = Pick {
        moves: Vec::new(),
        winner: None,
    };
    assert!(matches!(
        run(&model, &Spot::Start, 10, 2.0, 0),
        Err(PlanError::InvalidInitialState)
    ));
}

#[test]
fn test_world_model_error_is_propagated_unchanged() {
    let err = run(&Broken, &(), 10, 2.0, 0).unwrap_err();
    assert_eq!(
        err,
        PlanError::WorldModel(WorldModelError::Other("sensor offline".into()))
    );
}

#[test]
fn test_invalid_configuration_rejected() {
    let model = Pick {
        moves: vec!['a'],
        winner: None,
    };
    assert!(matches!(
        run(&model, &Spot::Start, 0, 2.0, 0),
        Err(PlanError::InvalidBudget)
    ));
    assert!(matches!(
        run(&model, &Spot::Start, 10, -1.0, 0),
        Err(PlanError::InvalidExplorationConstant(_))
    ));
}

#[test]
fn test_dead_tyres_trigger_a_stop() {
    let mut config = RaceConfig::with_laps(30);
    config.pit_loss = 2.0;
    let model = RaceModel::new(config).unwrap();
    // Softs give nothing past ten laps and a stop is cheap.
    let state = model.start().at_lap(10).with_tyre_age(12);
    let action = run(&model, &state, 2000, 1.0, 7).unwrap();
    assert!(action.is_pit(), "expected a stop, got {}", action);
}

#[test]
fn test_plans_from_worn_out_set() {
    let model = RaceModel::new(RaceConfig::with_laps(20)).unwrap();
    let state = model.start().at_lap(5).with_tyre_age(u32::MAX);
    let action = run(&model, &state, 10, 2.0, 1).unwrap();
    assert!(model.legal_actions(&state).unwrap().contains(&action));
}

#[test]
fn test_last_lap_on_fresh_tyres_stays_out() {
    let model = RaceModel::new(RaceConfig::with_laps(20)).unwrap();
    let state = model.start().at_lap(19).with_tyre_age(1);
    let action = run(&model, &state, 200, 2.0, 1).unwrap();
    assert_eq!(action, RaceAction::StayOut);
}

#[test]
fn test_parallel_search_is_reproducible() {
    let model = RaceModel::new(RaceConfig::with_laps(15)).unwrap();
    let state = model.start();
    let config = MctsConfig::with_simulations(301);

    let search = || search_parallel(&model, &state, &config, &ModelEvaluator, 9, 4);
    let a = search().unwrap();
    let b = search().unwrap();

    assert_eq!(a.total_visits(), 301);
    assert_eq!(a.simulations_run, 301);
    assert_eq!(a.children, b.children);
    assert_eq!(a.best_action, b.best_action);
}

#[test]
fn test_parallel_search_reports_errors() {
    let config = MctsConfig::with_simulations(20);
    assert!(matches!(
        search_parallel(&Broken, &(), &config, &ModelEvaluator, 0, 3),
        Err(PlanError::WorldModel(_))
    ));
}

#[test]
fn test_time_limit_stops_early_but_runs_once() {
    let mut config = RaceConfig::with_laps(200);
    config.starting_tyre = Compound::Hard;
    let model = RaceModel::new(config).unwrap();

    let mcts_config = MctsConfig::with_simulations(usize::MAX / 2)
        .time_limit(Duration::ZERO);
    let mut mcts = Mcts::new(
        mcts_config,
        RolloutEvaluator::new(200),
        ChaCha8Rng::seed_from_u64(3),
    );
    let result = mcts.search(&model, &model.start()).unwrap();

    assert!(result.stopped_early);
    assert_eq!(result.simulations_run, 1);
    assert_eq!(result.total_visits(), 1);
}

#[test]
fn test_alternative_evaluators_conserve_budget() {
    let model = RaceModel::new(RaceConfig::with_laps(10)).unwrap();
    let state = model.start();

    let mut coin = Mcts::new(
        MctsConfig::with_simulations(80),
        CoinFlipEvaluator::new(0.5),
        ChaCha8Rng::seed_from_u64(5),
    );
    assert_eq!(coin.search(&model, &state).unwrap().total_visits(), 80);

    let mut rollout = Mcts::new(
        MctsConfig::with_simulations(80),
        RolloutEvaluator::new(10),
        ChaCha8Rng::seed_from_u64(5),
    );
    assert_eq!(rollout.search(&model, &state).unwrap().total_visits(), 80);
}
