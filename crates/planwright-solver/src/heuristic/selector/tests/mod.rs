//! Tests for move selectors over the N-Queens and routing fixtures.

use std::collections::HashSet;
use std::sync::Arc;

use planwright_core::domain::{Handle, SubChain};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::heuristic::{ChangeVariable, Move};
use crate::test_utils::{
    manhattan, previous_variable, queen_count, row_count, row_variable, stop_handles, two_routes,
    NQueensSolution, RoutingSolution,
};

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

fn drain<S, X: Selector<S>>(selector: &mut X, ctx: &mut SelectionContext<'_, S>) -> Vec<X::Item> {
    selector.restart(ctx);
    std::iter::from_fn(|| selector.select_next(ctx)).collect()
}

fn handles(sub_chain: &SubChain) -> Vec<usize> {
    sub_chain.iter().map(Handle::index).collect()
}

mod sub_chain {
    use super::*;
    use crate::heuristic::selector::sub_chain::sub_chain_count;

    #[test]
    fn count_formula() {
        assert_eq!(sub_chain_count(3, 1, usize::MAX), 6);
        assert_eq!(sub_chain_count(3, 1, 2), 5);
        assert_eq!(sub_chain_count(3, 2, 2), 2);
        assert_eq!(sub_chain_count(5, 2, 3), 7);
        assert_eq!(sub_chain_count(1, 2, 4), 0);
    }

    #[test]
    fn original_order_walks_every_sub_chain() {
        let solution = two_routes();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);
        let mut selector =
            SubChainSelector::new(previous_variable(), 1, 2, SelectionCacheType::JustInTime, false)
                .unwrap();

        assert_eq!(selector.size(&solution), 8);
        let all: Vec<Vec<usize>> = drain(&mut selector, &mut ctx).iter().map(handles).collect();
        assert_eq!(
            all,
            vec![
                vec![2],
                vec![2, 3],
                vec![3],
                vec![3, 4],
                vec![4],
                vec![5],
                vec![5, 6],
                vec![6],
            ]
        );
    }

    #[test]
    fn minimum_skips_short_chains() {
        let solution = two_routes();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);
        let mut selector = SubChainSelector::new(
            previous_variable(),
            3,
            usize::MAX,
            SelectionCacheType::Step,
            false,
        )
        .unwrap();
        selector.phase_started(&mut ctx);
        selector.step_started(&mut ctx);
        let all: Vec<Vec<usize>> = drain(&mut selector, &mut ctx).iter().map(handles).collect();
        assert_eq!(all, vec![vec![2, 3, 4]]);
        assert_eq!(selector.size(&solution), 1);
    }

    #[test]
    fn random_order_draws_valid_sub_chains() {
        let solution = two_routes();
        let mut rng = StdRng::seed_from_u64(11);
        let mut ctx = SelectionContext::new(&solution, &mut rng);
        let mut selector =
            SubChainSelector::new(previous_variable(), 2, 3, SelectionCacheType::JustInTime, true)
                .unwrap();
        assert!(selector.is_never_ending());
        selector.restart(&mut ctx);

        let valid: HashSet<Vec<usize>> = [
            vec![2, 3],
            vec![2, 3, 4],
            vec![3, 4],
            vec![5, 6],
        ]
        .into_iter()
        .collect();
        let mut seen = HashSet::new();
        for _ in 0..400 {
            let sub_chain = selector.select_next(&mut ctx).unwrap();
            let drawn = handles(&sub_chain);
            assert!(valid.contains(&drawn), "{drawn:?}");
            seen.insert(drawn);
        }
        assert_eq!(seen, valid);
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        let low = SubChainSelector::new(previous_variable(), 0, 2, SelectionCacheType::Step, false);
        assert!(matches!(low, Err(SelectorError::Invalid(_))));
        let inverted =
            SubChainSelector::new(previous_variable(), 3, 2, SelectionCacheType::Step, false);
        assert!(matches!(inverted, Err(SelectorError::Invalid(_))));
    }
}

mod change {
    use super::*;

    use crate::heuristic::PlainVariable;

    fn queens(random: bool) -> ChangeMoveSelector<NQueensSolution, PlainVariable<NQueensSolution>> {
        ChangeMoveSelector::new(
            row_variable(),
            Box::new(FromSolutionSelector::indices(queen_count, random)),
            Box::new(FromSolutionSelector::indices(row_count, random)),
            random,
        )
    }

    #[test]
    fn original_order_is_the_cartesian_product() {
        let solution = NQueensSolution::with_rows(&[0, 1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);
        let mut selector = queens(false);

        assert_eq!(selector.size(&solution), 16);
        assert!(!selector.is_never_ending());
        let moves = drain(&mut selector, &mut ctx);
        assert_eq!(moves.len(), 16);
        assert_eq!(moves[0], row_variable().change_move(0, 0));
        assert_eq!(moves[5], row_variable().change_move(1, 1));
        assert_eq!(moves[15], row_variable().change_move(3, 3));

        // A second pass starts over.
        assert_eq!(drain(&mut selector, &mut ctx).len(), 16);
    }

    #[test]
    fn random_order_never_ends() {
        let solution = NQueensSolution::with_rows(&[0, 1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);
        let mut selector = queens(true);
        assert!(selector.is_never_ending());
        selector.restart(&mut ctx);
        for _ in 0..100 {
            match selector.select_next(&mut ctx) {
                Some(Move::Change { entity, to: Some(row), .. }) => {
                    assert!(entity < 4 && row < 4);
                }
                other => panic!("unexpected move {other:?}"),
            }
        }
    }

    #[test]
    fn nearby_values_follow_the_recorded_entity() {
        let solution = two_routes();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);

        let recorder = MimicRecorder::new("customer");
        let entities = MimicRecordingSelector::new(
            FromSolutionSelector::new(customer_count, customer_at, false),
            recorder.clone(),
        );
        let meter = |s: &RoutingSolution, a: &Handle, b: &Handle| manhattan(s, *a, *b) as f64;
        let values = NearbySelector::new(
            Box::new(FromSolutionSelector::new(stop_count, stop_at, false)),
            recorder,
            Arc::new(meter),
            None,
            Some(3),
        )
        .unwrap();
        let mut selector =
            ChangeMoveSelector::new(previous_variable(), Box::new(entities), Box::new(values), false);
        selector.phase_started(&mut ctx);

        let moves = drain(&mut selector, &mut ctx);
        assert_eq!(moves.len(), 5 * 3);
        let first_three: Vec<Move<RoutingSolution>> = moves[..3].to_vec();
        let variable = previous_variable();
        assert_eq!(
            first_three,
            vec![
                variable.change_move(Handle::new(2), Handle::new(2)),
                variable.change_move(Handle::new(2), Handle::new(0)),
                variable.change_move(Handle::new(2), Handle::new(3)),
            ]
        );
        // Customer 3 at (1, 10): itself, then depot 1 and customer 4 at distance 1.
        assert_eq!(
            moves[9..12].to_vec(),
            vec![
                variable.change_move(Handle::new(5), Handle::new(5)),
                variable.change_move(Handle::new(5), Handle::new(1)),
                variable.change_move(Handle::new(5), Handle::new(6)),
            ]
        );
    }
}

mod sub_chain_change {
    use super::*;

    fn selector(reversing: bool) -> SubChainChangeMoveSelector<RoutingSolution> {
        let sub_chains =
            SubChainSelector::new(previous_variable(), 1, 2, SelectionCacheType::JustInTime, false)
                .unwrap();
        let depots: BoxedSelector<RoutingSolution, Handle> = Box::new(FromSolutionSelector::new(
            |s: &RoutingSolution| s.depots.len(),
            |s: &RoutingSolution, i: usize| s.depots[i],
            false,
        ));
        SubChainChangeMoveSelector::new(
            previous_variable(),
            Box::new(sub_chains),
            depots,
            reversing,
            false,
        )
    }

    #[test]
    fn plain_and_reversing_moves() {
        let solution = two_routes();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);

        // 8 sub-chains, 3 of them with two entities, times 2 depots.
        let without = drain(&mut selector(false), &mut ctx);
        assert_eq!(without.len(), 16);
        let with = drain(&mut selector(true), &mut ctx);
        assert_eq!(with.len(), 16 + 6);

        let variable = previous_variable();
        let pair = SubChain::new(vec![Handle::new(2), Handle::new(3)]).unwrap();
        assert_eq!(with[2], variable.change_part_move(pair.clone(), Handle::new(0), false));
        assert_eq!(with[3], variable.change_part_move(pair, Handle::new(0), true));
    }

    #[test]
    fn single_entity_sub_chains_never_reverse() {
        let solution = two_routes();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = SelectionContext::new(&solution, &mut rng);
        for m in drain(&mut selector(true), &mut ctx) {
            if let Move::ReverseChangePart { sub_chain, .. } = m {
                assert!(sub_chain.len() > 1);
            }
        }
    }
}
