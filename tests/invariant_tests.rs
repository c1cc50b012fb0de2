//! Property tests over random seeded playouts.

use long_backgammon::{
    backgammon::{Board, CHECKERS_PER_SIDE, Color, DiceGenerator, Game},
    simulation::{Step, simulate_game, step},
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn assert_board_consistent(board: &Board) -> Result<(), TestCaseError> {
    prop_assert!(board.checker_count(Color::White) <= CHECKERS_PER_SIDE as u32);
    prop_assert!(board.checker_count(Color::Black) <= CHECKERS_PER_SIDE as u32);
    for cell in board.cells() {
        prop_assert_eq!(cell.count() == 0, cell.owner() == Color::Neutral);
    }
    prop_assert!(board.current_turn().is_player());
    Ok(())
}

fn assert_destinations_stay_on_course(board: &Board) -> Result<(), TestCaseError> {
    if board.awaiting_roll() {
        return Ok(());
    }
    for from in 0..24 {
        let color = board.cells()[from].owner();
        let destinations = board.legal_destinations(from).unwrap();
        for to in destinations.iter() {
            prop_assert!(to < 24);
            match color {
                Color::White if from >= 12 => prop_assert!(to >= 12),
                Color::Black if from < 12 => prop_assert!(to < 12),
                _ => {}
            }
            prop_assert!(board.cells()[to].accepts(color));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_playout_keeps_board_consistent(seed in any::<u64>(), plies in 1usize..400) {
        let mut game = Game::new(Board::new(DiceGenerator::seeded(seed)));
        let mut rng = ChaCha8Rng::seed_from_u64(seed.rotate_left(17));

        for _ in 0..plies {
            if game.is_over() {
                break;
            }
            let turn_before = game.board().current_turn();
            let head_before = game.board().head_move_count();
            let result = step(&mut game, &mut rng);
            prop_assert!(result.is_ok(), "engine error: {:?}", result);

            let board = game.board();
            assert_board_consistent(board)?;
            assert_destinations_stay_on_course(board)?;

            if let Ok(Step::Played(_)) = result {
                if board.current_turn() == turn_before && !board.awaiting_roll() {
                    // Same turn continues: the head counter never decreases.
                    prop_assert!(board.head_move_count() >= head_before);
                }
            }
            if board.current_turn() != turn_before {
                prop_assert_eq!(board.head_move_count(), 0);
            }
        }
    }

    #[test]
    fn simulation_is_reproducible(seed in any::<u64>()) {
        prop_assert_eq!(simulate_game(seed, 150), simulate_game(seed, 150));
    }
}

#[test]
fn test_winner_is_the_side_that_left_the_track() {
    for seed in 0..5 {
        let mut game = Game::seeded(seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut plies = 0;
        while !game.is_over() && plies < 5000 {
            step(&mut game, &mut rng).unwrap();
            plies += 1;
        }
        let winner = game.winner().unwrap();
        let board = game.board();
        assert_eq!(board.checker_count(winner), 0);
        assert!(board.checker_count(winner.opposite()) > 0);
    }
}
