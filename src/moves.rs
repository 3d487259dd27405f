use crate::board::{Board, Coordinate};
use crate::piece::{Owner, PieceKind};
use std::collections::{BTreeMap, BTreeSet};

/// Legal destinations of one piece, and the enemies each one captures.
///
/// When any capture is available the set only holds capture landings
/// (forced capture); otherwise it holds the simple moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destinations {
    targets: BTreeSet<Coordinate>,
    captures: BTreeMap<Coordinate, Vec<Coordinate>>,
}

impl Destinations {
    pub fn targets(&self) -> &BTreeSet<Coordinate> {
        &self.targets
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.targets.contains(&coord)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True if these destinations are captures.
    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }

    /// Enemies jumped when landing on `to`, in the order they are passed.
    pub fn captured_by(&self, to: Coordinate) -> &[Coordinate] {
        self.captures.get(&to).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Compute where `piece` standing on `origin` may go.
///
/// Simple moves and captures are collected in separate passes; if any
/// capture exists the simple moves are discarded. With `jump_only` set only
/// captures are considered. Enemies in `jumped` were already captured
/// earlier in the current multi-jump and can be neither jumped again nor
/// passed by a king.
pub fn legal_destinations(
    board: &Board,
    piece: PieceKind,
    origin: Coordinate,
    jump_only: bool,
    jumped: &BTreeSet<Coordinate>,
) -> Destinations {
    let Some(owner) = piece.owner() else {
        return Destinations::default();
    };

    let (simple, captures) = if piece.is_king() {
        king_moves(board, owner, origin, jumped)
    } else {
        man_moves(board, owner, origin, jumped)
    };

    if !captures.is_empty() {
        Destinations {
            targets: captures.keys().copied().collect(),
            captures,
        }
    } else if jump_only {
        Destinations::default()
    } else {
        Destinations {
            targets: simple,
            captures,
        }
    }
}

type Candidates = (BTreeSet<Coordinate>, BTreeMap<Coordinate, Vec<Coordinate>>);

fn is_empty_dark(board: &Board, coord: Coordinate) -> bool {
    board.piece_at(coord).is_some_and(|p| p.is_empty_dark())
}

/// Men step one square forward and capture by jumping an adjacent enemy,
/// backwards included.
fn man_moves(
    board: &Board,
    owner: Owner,
    origin: Coordinate,
    jumped: &BTreeSet<Coordinate>,
) -> Candidates {
    let neighbors = board.neighbors_diagonal(origin);

    let simple = Board::forward_squares(origin, neighbors.iter().copied(), owner)
        .into_iter()
        .filter(|&c| is_empty_dark(board, c))
        .collect();

    let mut captures: BTreeMap<Coordinate, Vec<Coordinate>> = BTreeMap::new();
    for enemy in neighbors {
        let is_target = board.piece_at(enemy).is_some_and(|p| p.is_enemy_of(owner));
        if !is_target || jumped.contains(&enemy) {
            continue;
        }
        let dr = enemy.row as isize - origin.row as isize;
        let dc = enemy.col as isize - origin.col as isize;
        if let Some(landing) = board.offset(enemy, dr, dc) {
            if is_empty_dark(board, landing) {
                captures.entry(landing).or_default().push(enemy);
            }
        }
    }

    (simple, captures)
}

/// Kings slide along each diagonal until blocked. Every empty square past
/// one or more enemies is a capture landing that takes all enemies passed
/// so far in that direction; two enemies in a row, an own piece, or an
/// enemy already jumped this turn end the ray.
fn king_moves(
    board: &Board,
    owner: Owner,
    origin: Coordinate,
    jumped: &BTreeSet<Coordinate>,
) -> Candidates {
    let mut simple = BTreeSet::new();
    let mut captures = BTreeMap::new();

    for (dr, dc) in Board::directions() {
        let mut passed: Vec<Coordinate> = Vec::new();
        let mut enemy_last = false;
        let mut current = origin;

        while let Some(next) = board.offset(current, dr, dc) {
            if board.is_out_of_bounds_or_own_piece(next, owner) {
                break;
            }
            current = next;

            let Some(square) = board.piece_at(next) else {
                break;
            };
            if square.is_enemy_of(owner) {
                if enemy_last || jumped.contains(&next) {
                    break;
                }
                enemy_last = true;
                passed.push(next);
                continue;
            }
            if !square.is_empty_dark() {
                break;
            }

            enemy_last = false;
            if passed.is_empty() {
                simple.insert(next);
            } else {
                captures.insert(next, passed.clone());
            }
        }
    }

    (simple, captures)
}

/// Pieces of `owner` that have at least one capture available.
pub fn capturing_pieces(board: &Board, owner: Owner) -> BTreeSet<Coordinate> {
    let none = BTreeSet::new();
    board
        .pieces_of(owner)
        .into_iter()
        .filter(|&at| {
            board
                .piece_at(at)
                .is_some_and(|piece| !legal_destinations(board, piece, at, true, &none).is_empty())
        })
        .collect()
}

/// True if any piece of `owner` has a legal destination.
pub fn has_any_move(board: &Board, owner: Owner) -> bool {
    let none = BTreeSet::new();
    board.pieces_of(owner).into_iter().any(|at| {
        board
            .piece_at(at)
            .is_some_and(|piece| !legal_destinations(board, piece, at, false, &none).is_empty())
    })
}
