//! Random streams of move requests, legal and illegal, checking the board
//! invariants after every request.

use rand::prelude::*;

use mini_chess::game::Game;
use mini_chess::types::{PawnCaptures, PieceId, RuleSet};

const GAMES: u64 = 40;
const REQUESTS_PER_GAME: usize = 200;

fn play_random_game(seed: u64, rules: RuleSet) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new(rules);

    for _ in 0..REQUESTS_PER_GAME {
        let before = game.board().occupancy();
        let live_before = game.board().live_count();

        // mostly real moves, sometimes arbitrary (often illegal) requests
        let legal: Vec<_> = game.board().all_legal_moves();
        let (id, file, rank) = if !legal.is_empty() && rng.gen_bool(0.7) {
            let (id, m) = legal[rng.gen_range(0..legal.len())];
            (id, m.to.file() as i64, m.to.rank() as i64)
        } else {
            (
                PieceId::from(rng.gen_range(0..24)),
                rng.gen_range(-1..9),
                rng.gen_range(-1..9),
            )
        };

        match game.submit(id, file, rank) {
            Ok(outcome) => {
                let expected_live = live_before - outcome.record.captured.iter().count();
                assert_eq!(game.board().live_count(), expected_live);
                if let Some((victim, _)) = outcome.record.captured {
                    assert!(game.board().piece_at(victim).is_err());
                    assert!(game.board().all_live().all(|(id, _)| id != victim));
                }
            }
            Err(_) => {
                assert_eq!(game.board().occupancy(), before, "seed {seed}");
                assert_eq!(game.board().live_count(), live_before);
            }
        }
        assert!(game.board().occupancy_is_consistent(), "seed {seed}");
    }
}

#[test]
fn random_requests_keep_board_consistent() {
    for seed in 0..GAMES {
        play_random_game(seed, RuleSet::default());
    }
}

#[test]
fn random_requests_with_any_occupant_captures() {
    let rules = RuleSet {
        pawn_captures: PawnCaptures::AnyOccupant,
    };
    for seed in 0..GAMES {
        play_random_game(seed, rules);
    }
}

#[test]
fn history_matches_successful_requests() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut game = Game::default();
    let mut successes = 0;
    for _ in 0..REQUESTS_PER_GAME {
        let legal = game.board().all_legal_moves();
        let Some(&(id, m)) = legal.choose(&mut rng) else {
            break;
        };
        game.submit(id, m.to.file() as i64, m.to.rank() as i64).unwrap();
        successes += 1;
    }
    assert_eq!(game.history().len(), successes);
}
