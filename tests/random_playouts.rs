use checkers_engine::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

const MAX_TURNS: usize = 400;

fn piece_count(board: &Board) -> usize {
    board.pieces_of(Owner::Player1).len() + board.pieces_of(Owner::Player2).len()
}

/// Light squares must stay empty whatever happens on the dark ones
fn assert_checkerboard(board: &Board) {
    for coord in board.coordinates() {
        if !board.is_dark(coord) {
            assert_eq!(board.piece_at(coord), Some(PieceKind::EmptyLight));
        }
    }
}

fn movable_pieces(board: &Board, owner: Owner) -> Vec<Coordinate> {
    let forced = capturing_pieces(board, owner);
    if !forced.is_empty() {
        return forced.into_iter().collect();
    }
    let none = BTreeSet::new();
    board
        .pieces_of(owner)
        .into_iter()
        .filter(|&at| {
            let piece = board.piece_at(at).unwrap();
            !legal_destinations(board, piece, at, false, &none).is_empty()
        })
        .collect()
}

/// Play random legal moves, checking the engine's guarantees after every
/// action. Returns the round once it ends or the turn limit is hit.
fn play_out(seed: u64, settings: &GameSettings) -> GameRound {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut round = GameRound::from_settings(settings).unwrap();
    let none = BTreeSet::new();

    for _ in 0..MAX_TURNS {
        if round.is_game_over() {
            break;
        }
        assert_checkerboard(round.board());
        let owner = round.current_player();
        let pieces_before = piece_count(round.board());

        if round.must_continue_capture() {
            let selection = round.selected().unwrap();
            let other = round
                .board()
                .pieces_of(owner)
                .into_iter()
                .find(|&c| c != selection.at);
            if let Some(other) = other {
                assert!(!round.action(other), "other piece accepted mid multi-jump");
                assert_eq!(round.selected(), Some(selection));
            }

            let targets: Vec<Coordinate> = round.selected_destinations().into_iter().collect();
            assert!(!targets.is_empty());
            let to = *targets.choose(&mut rng).unwrap();
            assert!(round.action(to));
            assert!(piece_count(round.board()) <= pieces_before);
            continue;
        }

        let forced = capturing_pieces(round.board(), owner);
        if !forced.is_empty() {
            let idle = round
                .board()
                .pieces_of(owner)
                .into_iter()
                .find(|c| !forced.contains(c));
            if let Some(idle) = idle {
                let before = round.selected();
                assert!(!round.action(idle), "non-capturing piece accepted");
                assert_eq!(round.selected(), before);
            }
        }

        let candidates = movable_pieces(round.board(), owner);
        assert!(!candidates.is_empty(), "player to move has no move");
        let from = *candidates.choose(&mut rng).unwrap();
        round.action(from);
        assert_eq!(round.selected().map(|s| s.at), Some(from));

        let piece = round.board().piece_at(from).unwrap();
        let destinations = legal_destinations(round.board(), piece, from, false, &none);
        assert_eq!(
            destinations.is_capture(),
            !forced.is_empty(),
            "simple move offered while a capture exists"
        );
        let targets: Vec<Coordinate> = round.selected_destinations().into_iter().collect();
        assert_eq!(&targets.iter().copied().collect::<BTreeSet<_>>(), destinations.targets());

        if rng.gen_bool(0.2) {
            let stray = round.board().coordinates().find(|&c| {
                round.board().piece_at(c) == Some(PieceKind::EmptyDark) && !destinations.contains(c)
            });
            if let Some(stray) = stray {
                assert!(!round.action(stray), "illegal destination accepted");
                assert_eq!(round.selected().map(|s| s.at), Some(from));
            }
        }

        let to = *targets.choose(&mut rng).unwrap();
        assert!(round.action(to));
        let moved = round.board().piece_at(to).unwrap();
        assert!(moved.belongs_to(owner));
        if round.board().is_far_row(to, owner) {
            assert!(moved.is_king(), "man reached the far row without crowning");
        }
        assert!(piece_count(round.board()) <= pieces_before);
    }

    round
}

fn assert_consistent_result(round: &GameRound) {
    if let Some(winner) = round.winner() {
        let loser = winner.opponent();
        let board = round.board();
        assert!(
            !board.any_pieces_left(loser) || !has_any_move(board, loser),
            "winner declared while the loser could still play"
        );
        assert_eq!(round.current_player(), loser);
    }
}

#[test]
fn test_random_games_on_classic_board() {
    let settings = GameSettings::default();
    for seed in 0..30 {
        let round = play_out(seed, &settings);
        assert_consistent_result(&round);
    }
}

#[test]
fn test_random_games_on_irregular_boards() {
    let boards = [(6, 6, None), (7, 9, None), (10, 10, Some(2)), (8, 8, Some(4))];
    for (width, height, center_gap) in boards {
        let settings = GameSettings {
            width,
            height,
            center_gap,
            ..GameSettings::default()
        };
        for seed in 0..10 {
            let round = play_out(seed, &settings);
            assert_consistent_result(&round);
        }
    }
}

#[test]
fn test_random_games_with_player2_starting() {
    let settings = GameSettings {
        starting_player: Owner::Player2,
        ..GameSettings::default()
    };
    for seed in 100..110 {
        let round = play_out(seed, &settings);
        assert_consistent_result(&round);
    }
}

#[test]
fn test_most_random_games_finish() {
    let settings = GameSettings {
        width: 6,
        height: 6,
        ..GameSettings::default()
    };
    let finished = (0..20)
        .map(|seed| play_out(seed, &settings))
        .filter(|round| round.is_game_over())
        .count();
    assert!(finished > 0, "no random game reached a result");
}
