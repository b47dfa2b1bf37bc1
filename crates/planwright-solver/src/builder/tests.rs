//! Tests for the configuration builders.

use std::time::Duration;

use planwright_config::{
    AcceptorConfig, ChangeMoveSelectorConfig, CompositionStyle, EnvironmentMode, ForagerConfig,
    LocalSearchConfig, MoveSelectorConfig, NearbySelectionConfig, PhaseConfig, PickEarlyType,
    SelectionCacheType, SelectionOrder, SelectorConfig, SolverConfig, SortOrder,
    SubChainChangeMoveSelectorConfig, TerminationConfig, UnionMoveSelectorConfig,
};
use planwright_core::domain::{Handle, PlanningSolution};
use planwright_core::score::{HardSoftScore, SimpleScore};
use planwright_core::{PlanwrightError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::heuristic::selector::{SelectionContext, Selector};
use crate::heuristic::{BoxedSelector, ChangeVariable, Move};
use crate::phase::localsearch::Acceptor;
use crate::termination::Termination;
use crate::test_utils::{
    calculate_conflicts, calculate_route_score, manhattan, previous_variable, queen_count,
    routing_director, row_count, row_variable, stop_handles, two_routes, unassigned_routes,
    uninitialized_nqueens_director, NQueensDirector, NQueensSolution, RoutingDirector,
    RoutingSolution,
};

fn queens_registry() -> SelectorRegistry<NQueensSolution> {
    let mut registry = SelectorRegistry::new();
    registry.register_plain_variable(row_variable(), queen_count, row_count);
    registry
}

fn customer_count(s: &RoutingSolution) -> usize {
    s.customers.len()
}

fn customer_at(s: &RoutingSolution, i: usize) -> Handle {
    s.customers[i]
}

fn stop_count(s: &RoutingSolution) -> usize {
    s.depots.len() + s.customers.len()
}

fn stop_at(s: &RoutingSolution, i: usize) -> Handle {
    stop_handles(s)[i]
}

fn routing_registry() -> SelectorRegistry<RoutingSolution> {
    let mut registry = SelectorRegistry::new();
    registry
        .register_chained_variable(
            previous_variable(),
            Source {
                count: customer_count,
                at: customer_at,
            },
            Source {
                count: stop_count,
                at: stop_at,
            },
        )
        .register_distance_meter::<Handle, _>(
            "manhattan",
            |s: &RoutingSolution, a: &Handle, b: &Handle| manhattan(s, *a, *b) as f64,
        );
    registry
}

fn config_message<T>(result: Result<T>) -> String {
    match result {
        Err(PlanwrightError::Config(message)) => message,
        Err(other) => panic!("expected a configuration error, got {other}"),
        Ok(_) => panic!("expected a configuration error"),
    }
}

fn drain<S, X: Selector<S> + ?Sized>(
    selector: &mut X,
    ctx: &mut SelectionContext<'_, S>,
) -> Vec<X::Item> {
    selector.phase_started(ctx);
    selector.step_started(ctx);
    selector.restart(ctx);
    std::iter::from_fn(|| selector.select_next(ctx)).collect()
}

fn values_of(moves: &[Move<NQueensSolution>]) -> Vec<Option<usize>> {
    moves
        .iter()
        .map(|m| match m {
            Move::Change { to, .. } => *to,
            other => panic!("unexpected move {other:?}"),
        })
        .collect()
}

mod termination {
    use super::*;

    #[test]
    fn empty_config_builds_nothing() {
        let built = TerminationBuilder::build::<SimpleScore>(&TerminationConfig::new()).unwrap();
        assert_eq!(built, None);
    }

    #[test]
    fn single_limit_is_not_wrapped() {
        let config = TerminationConfig::new().with_step_count_limit(40);
        assert_eq!(
            TerminationBuilder::build::<SimpleScore>(&config).unwrap(),
            Some(Termination::StepCount { limit: 40 })
        );
    }

    #[test]
    fn limits_and_children_are_combined() {
        let config = TerminationConfig::new()
            .with_seconds_spent_limit(2)
            .with_milliseconds_spent_limit(500)
            .with_best_score_limit("0hard/-10soft")
            .with_termination(
                TerminationConfig::new()
                    .with_composition_style(CompositionStyle::And)
                    .with_step_count_limit(100)
                    .with_unimproved_step_count_limit(10),
            )
            .with_termination(TerminationConfig::new());

        let built = TerminationBuilder::build::<HardSoftScore>(&config).unwrap();

        assert_eq!(
            built,
            Some(Termination::Or(vec![
                Termination::TimeSpent {
                    limit: Duration::from_millis(2500)
                },
                Termination::ScoreAttained {
                    target: HardSoftScore::of(0, -10)
                },
                Termination::And(vec![
                    Termination::StepCount { limit: 100 },
                    Termination::UnimprovedStepCount { limit: 10 },
                ]),
            ]))
        );
    }

    #[test]
    fn bad_score_literal_is_a_config_error() {
        let config = TerminationConfig::new().with_best_score_limit("zero");
        let message = config_message(TerminationBuilder::build::<SimpleScore>(&config));
        assert!(message.contains("best_score_limit (zero)"));

        let blank = TerminationConfig::new().with_best_score_limit("  ");
        assert!(TerminationBuilder::build::<SimpleScore>(&blank).is_err());
    }
}

mod acceptor {
    use super::*;

    #[test]
    fn nothing_configured_is_hill_climbing() {
        let acceptor = AcceptorBuilder::build::<NQueensSolution>(&AcceptorConfig::default()).unwrap();
        assert!(matches!(acceptor, Acceptor::HillClimbing));
    }

    #[test]
    fn every_option_adds_an_acceptor() {
        let mut config = AcceptorConfig::default()
            .with_entity_tabu_size(7)
            .with_undo_move_tabu_size(3)
            .with_late_acceptance_size(50);
        config.aspiration_enabled = Some(false);
        config.late_acceptance_hill_climbing = Some(false);

        let Acceptor::Composite(parts) = AcceptorBuilder::build::<NQueensSolution>(&config).unwrap()
        else {
            panic!("expected a composite acceptor");
        };
        assert_eq!(parts.len(), 3);
        match &parts[0] {
            Acceptor::EntityTabu(tabu) => {
                assert_eq!(tabu.tabu_size(), 7);
                assert!(!tabu.aspiration_enabled());
            }
            _ => panic!("expected entity tabu first"),
        }
        assert!(matches!(&parts[1], Acceptor::UndoMoveTabu(tabu) if tabu.tabu_size() == 3));
        assert!(matches!(
            &parts[2],
            Acceptor::LateAcceptance(la) if la.late_acceptance_size() == 50
        ));
    }

    #[test]
    fn simulated_annealing_parses_the_temperature() {
        let config = AcceptorConfig::default().with_simulated_annealing("0hard/20soft");
        let acceptor = AcceptorBuilder::build::<RoutingSolution>(&config).unwrap();
        match acceptor {
            Acceptor::SimulatedAnnealing(annealing) => {
                assert_eq!(annealing.temperatures(), &[0.0, 20.0]);
            }
            _ => panic!("expected simulated annealing"),
        }
    }

    #[test]
    fn bad_temperatures_are_config_errors() {
        for literal in ["warm", "-3", "0"] {
            let config = AcceptorConfig::default().with_simulated_annealing(literal);
            config_message(AcceptorBuilder::build::<NQueensSolution>(&config));
        }
        let zero_tabu = AcceptorConfig::default().with_value_tabu_size(0);
        let message = config_message(AcceptorBuilder::build::<NQueensSolution>(&zero_tabu));
        assert!(message.contains("value_tabu_size"));
    }

    #[test]
    fn forager_limit_depends_on_tabu() {
        let tabu = Acceptor::<NQueensSolution>::EntityTabu(crate::phase::localsearch::TabuAcceptor::new(5, true));
        let forager = ForagerBuilder::build(&ForagerConfig::default(), &tabu).unwrap();
        assert_eq!(forager.accepted_count_limit(), 1000);
        assert_eq!(forager.pick_early_type(), PickEarlyType::Never);

        let hill_climbing = Acceptor::<NQueensSolution>::HillClimbing;
        let forager = ForagerBuilder::build(&ForagerConfig::default(), &hill_climbing).unwrap();
        assert_eq!(forager.accepted_count_limit(), 1);

        let config = ForagerConfig {
            accepted_count_limit: Some(4),
            pick_early_type: Some(PickEarlyType::FirstBestScoreImproving),
        };
        let forager = ForagerBuilder::build(&config, &tabu).unwrap();
        assert_eq!(forager.accepted_count_limit(), 4);
        assert_eq!(forager.pick_early_type(), PickEarlyType::FirstBestScoreImproving);
    }
}

mod registry {
    use super::*;

    #[test]
    fn variables_resolve_by_name() {
        let mut registry = queens_registry();
        assert_eq!(registry.variable(None).unwrap().name(), "row");

        registry.register_plain_variable(
            crate::heuristic::PlainVariable::new("column", 0, |_, _| None, |_, _, _| {}),
            queen_count,
            row_count,
        );
        assert_eq!(registry.variable(Some("column")).unwrap().name(), "column");
        assert!(config_message(registry.variable(None)).contains("variable_name is required"));
        assert!(config_message(registry.variable(Some("diagonal"))).contains("'diagonal'"));
    }

    #[test]
    fn empty_registry_has_no_variable() {
        let registry = SelectorRegistry::<NQueensSolution>::new();
        assert!(config_message(registry.variable(None)).contains("no planning variable"));
    }

    #[test]
    fn plugins_are_typed_by_candidate() {
        let mut registry = routing_registry();
        registry.register_filter::<usize>("even", |_: &RoutingSolution, i: &usize| i % 2 == 0);

        assert!(registry.plugins::<usize>().filter("even").is_ok());
        assert!(registry.plugins::<Handle>().filter("even").is_err());
        assert!(registry.plugins::<Handle>().distance_meter("manhattan").is_ok());
        assert!(registry.plugins::<usize>().sorter("even").is_err());
    }
}

mod selector {
    use super::*;

    fn original() -> SelectorConfig {
        SelectorConfig::new().with_selection_order(SelectionOrder::Original)
    }

    fn change(
        entity_selector: Option<SelectorConfig>,
        value_selector: Option<SelectorConfig>,
    ) -> MoveSelectorConfig {
        MoveSelectorConfig::ChangeMoveSelector(ChangeMoveSelectorConfig {
            variable_name: Some("row".to_string()),
            entity_selector,
            value_selector,
        })
    }

    fn queen_moves(
        registry: &SelectorRegistry<NQueensSolution>,
        config: &MoveSelectorConfig,
    ) -> Result<BoxedSelector<NQueensSolution, Move<NQueensSolution>>> {
        MoveSelectorBuilder::new(registry).build(config, SelectionOrder::Original)
    }

    #[test]
    fn original_change_moves_cover_every_pair() {
        let solution = NQueensSolution::with_rows(&[0, 1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);

        let mut moves = queen_moves(&queens_registry(), &change(None, None)).unwrap();

        assert!(!moves.is_never_ending());
        let drawn = drain(&mut moves, &mut ctx);
        assert_eq!(drawn.len(), 16);
        assert_eq!(drawn[5], row_variable().change_move(1, 1));
    }

    #[test]
    fn filter_and_sorter_come_from_the_registry() {
        let mut registry = queens_registry();
        registry
            .register_filter::<usize>("not_zero", |_: &NQueensSolution, row: &usize| *row != 0)
            .register_sorter::<usize>("row", |_: &NQueensSolution, row: &usize| *row as f64);
        let values = original()
            .with_cache_type(SelectionCacheType::Phase)
            .with_selection_order(SelectionOrder::Sorted)
            .with_sorter("row", SortOrder::Descending)
            .with_filter("not_zero");
        let config = change(Some(original()), Some(values));

        let solution = NQueensSolution::with_rows(&[0, 1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);
        let drawn = drain(&mut queen_moves(&registry, &config).unwrap(), &mut ctx);

        assert_eq!(drawn.len(), 12);
        assert_eq!(values_of(&drawn[..3]), vec![Some(3), Some(2), Some(1)]);
    }

    #[test]
    fn unknown_plugins_fail_the_build() {
        let config = change(None, Some(original().with_filter("missing")));
        let message = config_message(queen_moves(&queens_registry(), &config));
        assert!(message.contains("no filter registered under 'missing'"));
    }

    #[test]
    fn shuffling_without_cache_fails_fast() {
        let config = change(
            None,
            Some(SelectorConfig::new().with_selection_order(SelectionOrder::Shuffled)),
        );
        let message = config_message(queen_moves(&queens_registry(), &config));
        assert!(message.contains("needs a cached selector"));
    }

    #[test]
    fn count_limit_caps_each_pass() {
        let config = change(Some(original().with_selected_count_limit(2)), None);
        let solution = NQueensSolution::with_rows(&[0, 1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);

        let drawn = drain(&mut queen_moves(&queens_registry(), &config).unwrap(), &mut ctx);
        assert_eq!(drawn.len(), 8);
    }

    #[test]
    fn mimic_ids_must_exist_and_be_unique() {
        let unknown = change(None, Some(SelectorConfig::mimic("ghost")));
        assert!(config_message(queen_moves(&queens_registry(), &unknown)).contains("'ghost'"));

        let duplicate = change(
            Some(original().with_id("queen")),
            Some(original().with_id("queen")),
        );
        assert!(config_message(queen_moves(&queens_registry(), &duplicate))
            .contains("more than one selector"));
    }

    #[test]
    fn nearby_values_follow_the_moving_customer() {
        let config = MoveSelectorConfig::ChangeMoveSelector(ChangeMoveSelectorConfig {
            variable_name: None,
            entity_selector: Some(original().with_id("customer")),
            value_selector: Some(
                original().with_nearby_selection(NearbySelectionConfig::new("customer", "manhattan")),
            ),
        });
        let registry = routing_registry();
        let solution = two_routes();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);

        let mut moves = MoveSelectorBuilder::new(&registry)
            .build(&config, SelectionOrder::Original)
            .unwrap();
        let drawn = drain(&mut moves, &mut ctx);

        assert_eq!(drawn.len(), 5 * 7);
        let variable = previous_variable();
        assert_eq!(
            drawn[..3].to_vec(),
            vec![
                variable.change_move(Handle::new(2), Handle::new(2)),
                variable.change_move(Handle::new(2), Handle::new(0)),
                variable.change_move(Handle::new(2), Handle::new(3)),
            ]
        );
    }

    #[test]
    fn random_nearby_values_never_end() {
        let config = MoveSelectorConfig::ChangeMoveSelector(ChangeMoveSelectorConfig {
            variable_name: None,
            entity_selector: Some(SelectorConfig::new().with_id("customer")),
            value_selector: Some(SelectorConfig::new().with_nearby_selection(
                NearbySelectionConfig::new("customer", "manhattan").with_linear_distribution(2),
            )),
        });
        let registry = routing_registry();
        let solution = two_routes();
        let mut rng = StdRng::seed_from_u64(4);
        let mut ctx = SelectionContext::new(&solution, &mut rng);

        let mut moves = MoveSelectorBuilder::new(&registry)
            .build(&config, SelectionOrder::Random)
            .unwrap();
        assert!(moves.is_never_ending());
        moves.phase_started(&mut ctx);
        moves.step_started(&mut ctx);
        moves.restart(&mut ctx);
        for _ in 0..50 {
            match moves.select_next(&mut ctx) {
                // With two ranks per origin, a customer pairs with itself or
                // its nearest stop.
                Some(Move::ChainedChange { entity, to, .. }) => {
                    let to = to.unwrap();
                    let distance = manhattan(&solution, entity, to);
                    assert!(distance <= 1, "{entity:?} -> {to:?} at {distance}");
                }
                other => panic!("unexpected draw {other:?}"),
            }
        }
    }

    #[test]
    fn sub_chain_moves_need_a_chained_variable() {
        let config = MoveSelectorConfig::SubChainChangeMoveSelector(SubChainChangeMoveSelectorConfig {
            maximum_sub_chain_size: Some(2),
            select_reversing_move_too: Some(false),
            ..SubChainChangeMoveSelectorConfig::default()
        });

        let registry = routing_registry();
        let solution = two_routes();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);
        let mut moves = MoveSelectorBuilder::new(&registry)
            .build(&config, SelectionOrder::Original)
            .unwrap();
        // 8 sub-chains of at most two customers times 7 stops.
        assert_eq!(drain(&mut moves, &mut ctx).len(), 56);

        let message = config_message(queen_moves(&queens_registry(), &config));
        assert!(message.contains("needs a chained variable"));
    }

    #[test]
    fn union_joins_every_child() {
        let config = MoveSelectorConfig::UnionMoveSelector(UnionMoveSelectorConfig {
            selectors: vec![
                change(None, None),
                change(Some(original().with_selected_count_limit(1)), None),
            ],
        });
        let solution = NQueensSolution::with_rows(&[0, 1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);

        let drawn = drain(&mut queen_moves(&queens_registry(), &config).unwrap(), &mut ctx);
        assert_eq!(drawn.len(), 16 + 4);
    }

    #[test]
    fn default_selector_changes_every_variable() {
        let registry = queens_registry();
        let moves = MoveSelectorBuilder::new(&registry)
            .build_default(SelectionOrder::Random)
            .unwrap();
        assert!(moves.is_never_ending());
        assert_eq!(moves.size(&NQueensSolution::with_rows(&[0, 1, 2])), 9);
    }
}

mod phase {
    use super::*;

    fn annealing(termination: Option<TerminationConfig>) -> LocalSearchConfig {
        LocalSearchConfig {
            acceptor: Some(AcceptorConfig::default().with_simulated_annealing("10")),
            termination,
            ..LocalSearchConfig::default()
        }
    }

    #[test]
    fn annealing_needs_a_time_gradient() {
        let registry = queens_registry();

        let message = config_message(PhaseBuilder::local_search(&annealing(None), &registry, None));
        assert!(message.contains("time gradient"));

        let unimproved = TerminationConfig::new().with_unimproved_step_count_limit(5);
        assert!(PhaseBuilder::local_search(&annealing(Some(unimproved)), &registry, None).is_err());

        let steps = TerminationConfig::new().with_step_count_limit(50);
        assert!(PhaseBuilder::local_search(&annealing(Some(steps)), &registry, None).is_ok());

        let solver = Termination::TimeSpent {
            limit: Duration::from_secs(1),
        };
        assert!(PhaseBuilder::local_search(&annealing(None), &registry, Some(&solver)).is_ok());
    }

    #[test]
    fn local_search_settings_reach_the_decider() {
        let config = LocalSearchConfig {
            acceptor: Some(AcceptorConfig::default().with_move_tabu_size(4)),
            selected_count_limit: Some(10),
            ..LocalSearchConfig::default()
        };
        let phase = PhaseBuilder::local_search(&config, &queens_registry(), None).unwrap();

        assert!(matches!(phase.decider().acceptor(), Acceptor::MoveTabu(_)));
        assert_eq!(phase.decider().forager().accepted_count_limit(), 1000);
    }

    #[test]
    fn construction_targets_the_named_variable() {
        let config = planwright_config::ConstructionHeuristicConfig {
            variable_name: Some("row".to_string()),
            ..Default::default()
        };
        let phase = PhaseBuilder::construction_heuristic(&config, &queens_registry()).unwrap();
        assert_eq!(phase.placer().variable_name(), "row");

        let missing = planwright_config::ConstructionHeuristicConfig {
            variable_name: Some("column".to_string()),
            ..Default::default()
        };
        assert!(PhaseBuilder::construction_heuristic(&missing, &queens_registry()).is_err());
    }
}

mod solver {
    use super::*;

    const NQUEENS_TOML: &str = r#"
        environment_mode = "full_assert"
        random_seed = 11

        [termination]
        step_count_limit = 300
        best_score_limit = "0"

        [[phases]]
        type = "construction_heuristic"

        [[phases]]
        type = "local_search"
        [phases.acceptor]
        entity_tabu_size = 3
        late_acceptance_size = 20
        [phases.forager]
        accepted_count_limit = 30
    "#;

    #[test]
    fn toml_config_solves_queens() {
        let config = SolverConfig::from_toml_str(NQUEENS_TOML).unwrap();
        let mut solver =
            SolverBuilder::build::<NQueensSolution, NQueensDirector>(&config, &queens_registry())
                .unwrap();

        assert_eq!(solver.phase_type_names(), vec!["construction_heuristic", "local_search"]);
        assert_eq!(solver.environment_mode(), EnvironmentMode::FullAssert);
        assert_eq!(solver.random_seed(), Some(11));

        let best = solver.solve(uninitialized_nqueens_director(6)).unwrap();
        assert!(best.is_initialized());
        assert_eq!(best.score, Some(calculate_conflicts(&best)));
    }

    #[test]
    fn no_phases_means_construction_then_local_search() {
        let config = SolverConfig::new()
            .with_environment_mode(EnvironmentMode::Reproducible)
            .with_termination(TerminationConfig::new().with_step_count_limit(20));
        let solver =
            SolverBuilder::build::<NQueensSolution, NQueensDirector>(&config, &queens_registry())
                .unwrap();

        assert_eq!(solver.phase_type_names(), vec!["construction_heuristic", "local_search"]);
        assert_eq!(solver.random_seed(), Some(0));
        assert_eq!(solver.termination(), Some(&Termination::StepCount { limit: 20 }));
    }

    #[test]
    fn invalid_config_is_rejected_before_building() {
        let config = SolverConfig::new().with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
            acceptor: Some(AcceptorConfig::default().with_late_acceptance_size(0)),
            ..LocalSearchConfig::default()
        }));
        let result =
            SolverBuilder::build::<NQueensSolution, NQueensDirector>(&config, &queens_registry());
        assert!(config_message(result).contains("late_acceptance_size"));
    }

    #[test]
    fn yaml_config_builds_routes() {
        let config = SolverConfig::from_yaml_str(
            r#"
environment_mode: reproducible
random_seed: 5
termination:
  step_count_limit: 40
phases:
  - type: construction_heuristic
  - type: local_search
    acceptor:
      late_acceptance_size: 10
    move_selector:
      type: union_move_selector
      selectors:
        - type: change_move_selector
        - type: sub_chain_change_move_selector
          maximum_sub_chain_size: 3
"#,
        )
        .unwrap();
        let mut solver =
            SolverBuilder::build::<RoutingSolution, RoutingDirector>(&config, &routing_registry())
                .unwrap();

        let best = solver.solve(routing_director(unassigned_routes())).unwrap();

        assert!(best.is_initialized());
        assert!(best.graph.validate().is_ok());
        assert_eq!(best.score, Some(calculate_route_score(&best)));
        assert_eq!(best.score.map(|score| score.hard()), Some(0));
    }
}
