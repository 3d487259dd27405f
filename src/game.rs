use crate::board::{Board, BoardError, Coordinate};
use crate::moves::{self, Destinations, legal_destinations};
use crate::piece::{Owner, PieceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Starting player {0} is not in the turn order")]
    StartingPlayerNotInTurnOrder(Owner),
    #[error("Player {0} appears twice in the turn order")]
    DuplicatePlayer(Owner),
    #[error("Invalid board: {0}")]
    Board(#[from] BoardError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Unknown,
    Won(Owner),
}

/// Fixed two-player rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOrder {
    players: [Owner; 2],
    index: usize,
}

impl TurnOrder {
    pub fn new(players: [Owner; 2], starting: Owner) -> Result<Self, GameError> {
        let index = players
            .iter()
            .position(|&p| p == starting)
            .ok_or(GameError::StartingPlayerNotInTurnOrder(starting))?;
        if players[0] == players[1] {
            return Err(GameError::DuplicatePlayer(players[0]));
        }
        Ok(TurnOrder { players, index })
    }

    pub fn current(&self) -> Owner {
        self.players[self.index]
    }

    /// Pass the turn and return the new current player.
    pub fn advance(&mut self) -> Owner {
        self.index = 1 - self.index;
        self.current()
    }
}

/// The piece a player has picked, and where it stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub at: Coordinate,
    pub piece: PieceKind,
}

/// Board, turn and result: everything a transition may mutate.
#[derive(Debug, Clone)]
struct Table {
    board: Board,
    turn: TurnOrder,
    status: GameStatus,
}

impl Table {
    fn declare_winner(&mut self, winner: Owner) {
        info!(%winner, "game over");
        self.status = GameStatus::Won(winner);
    }
}

/// A move underway: the chosen piece, where it may go, and the enemies
/// already jumped in the current multi-jump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveInProgress {
    selection: Selection,
    destinations: Destinations,
    pending_captures: BTreeSet<Coordinate>,
    restricted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameState {
    SelectingPiece { selection: Option<Selection> },
    MakingMove(MoveInProgress),
}

impl GameState {
    fn selecting() -> Self {
        GameState::SelectingPiece { selection: None }
    }

    pub fn selection(&self) -> Option<Selection> {
        match self {
            GameState::SelectingPiece { selection } => *selection,
            GameState::MakingMove(mv) => Some(mv.selection),
        }
    }

    /// True while a multi-jump must be continued with the selected piece.
    pub fn is_restricted(&self) -> bool {
        matches!(self, GameState::MakingMove(mv) if mv.restricted)
    }

    /// Feed one submitted square through the state machine. Returns the
    /// next state and whether the board view changed.
    fn action(self, square: Coordinate, table: &mut Table) -> (GameState, bool) {
        match self {
            GameState::SelectingPiece { selection } => select_piece(selection, square, table),
            GameState::MakingMove(mv) => mv.action(square, table),
        }
    }
}

fn select_piece(
    selection: Option<Selection>,
    square: Coordinate,
    table: &mut Table,
) -> (GameState, bool) {
    let unchanged = GameState::SelectingPiece { selection };
    let Some(piece) = table.board.piece_at(square) else {
        debug!(%square, "square off the board ignored");
        return (unchanged, false);
    };
    let player = table.turn.current();

    if piece.belongs_to(player) {
        if selection.is_some_and(|s| s.at == square) {
            return (unchanged, false);
        }
        let threatening = moves::capturing_pieces(&table.board, player);
        if !threatening.is_empty() && !threatening.contains(&square) {
            debug!(%square, "selection rejected, another piece must capture");
            return (unchanged, false);
        }
        debug!(%square, %player, "piece selected");
        let selection = Some(Selection { at: square, piece });
        return (GameState::SelectingPiece { selection }, true);
    }

    match selection {
        Some(selection) if piece.is_empty_dark() => {
            MoveInProgress::new(selection, &table.board).action(square, table)
        }
        _ => {
            debug!(%square, "nothing to do with this square");
            (unchanged, false)
        }
    }
}

impl MoveInProgress {
    fn new(selection: Selection, board: &Board) -> Self {
        let destinations =
            legal_destinations(board, selection.piece, selection.at, false, &BTreeSet::new());
        MoveInProgress {
            selection,
            destinations,
            pending_captures: BTreeSet::new(),
            restricted: false,
        }
    }

    /// Enemies jumped so far; they leave the board when the move completes.
    pub fn pending_captures(&self) -> &BTreeSet<Coordinate> {
        &self.pending_captures
    }

    fn action(self, square: Coordinate, table: &mut Table) -> (GameState, bool) {
        if self.destinations.contains(square) {
            return (self.make_move(square, table), true);
        }

        let empty_dark = table
            .board
            .piece_at(square)
            .is_none_or(|p| p.is_empty_dark());
        if self.restricted || empty_dark {
            debug!(%square, restricted = self.restricted, "not a legal destination");
            return (GameState::MakingMove(self), false);
        }

        // Any other square is a fresh selection attempt
        select_piece(Some(self.selection), square, table)
    }

    fn make_move(mut self, to: Coordinate, table: &mut Table) -> GameState {
        let from = self.selection.at;
        let mut piece = self.selection.piece;
        let owner = table.turn.current();

        if table.board.is_far_row(to, owner) && !piece.is_king() {
            piece = piece.promote();
            info!(%to, %owner, "man crowned");
        }
        table.board.set(from, PieceKind::EmptyDark);
        table.board.set(to, piece);
        self.selection = Selection { at: to, piece };
        info!(%from, %to, %owner, "move executed");

        let captured = self.destinations.captured_by(to).to_vec();
        if !captured.is_empty() {
            self.pending_captures.extend(captured);
            self.destinations =
                legal_destinations(&table.board, piece, to, true, &self.pending_captures);
            if !self.destinations.is_empty() {
                info!(at = %to, "capture must continue");
                self.restricted = true;
                return GameState::MakingMove(self);
            }
        }

        self.finish(table)
    }

    /// Complete the turn: pass it on, remove everything jumped, then check
    /// for elimination before checking whether the next player can move.
    fn finish(self, table: &mut Table) -> GameState {
        let previous = table.turn.current();
        let next = table.turn.advance();

        if !self.pending_captures.is_empty() {
            table.board.remove_pieces(&self.pending_captures);
            if !table.board.any_pieces_left(next) {
                table.declare_winner(previous);
                return GameState::selecting();
            }
        }

        if !moves::has_any_move(&table.board, next) {
            table.declare_winner(previous);
        }
        GameState::selecting()
    }
}

/// One game from setup to result, driven one submitted square at a time.
#[derive(Debug, Clone)]
pub struct GameRound {
    table: Table,
    state: GameState,
    view_updates: Vec<bool>,
}

impl GameRound {
    /// Start a game on `board` with Player1 moving first.
    pub fn new(board: Board) -> Self {
        let turn = TurnOrder {
            players: [Owner::Player1, Owner::Player2],
            index: 0,
        };
        Self::with_turn(board, turn)
    }

    /// Start a game with an explicit rotation and first player.
    pub fn with_turn_order(
        board: Board,
        players: [Owner; 2],
        starting: Owner,
    ) -> Result<Self, GameError> {
        Ok(Self::with_turn(board, TurnOrder::new(players, starting)?))
    }

    fn with_turn(board: Board, turn: TurnOrder) -> Self {
        let mut table = Table {
            board,
            turn,
            status: GameStatus::Unknown,
        };
        let first = table.turn.current();
        if !moves::has_any_move(&table.board, first) {
            debug!(%first, "first player cannot move");
            table.declare_winner(first.opponent());
        }
        GameRound {
            table,
            state: GameState::selecting(),
            view_updates: Vec::new(),
        }
    }

    /// Submit one selected square. Returns true if the board view changed.
    ///
    /// Illegal or meaningless squares are absorbed and return false; once
    /// the game is decided every action is a no-op.
    pub fn action(&mut self, square: Coordinate) -> bool {
        if self.is_game_over() {
            debug!(%square, "game already over");
            self.view_updates.push(false);
            return false;
        }

        let state = std::mem::replace(&mut self.state, GameState::selecting());
        let (next, changed) = state.action(square, &mut self.table);
        self.state = next;
        self.view_updates.push(changed);
        changed
    }

    pub fn board(&self) -> &Board {
        &self.table.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn turn_order(&self) -> &TurnOrder {
        &self.table.turn
    }

    pub fn current_player(&self) -> Owner {
        self.table.turn.current()
    }

    pub fn status(&self) -> GameStatus {
        self.table.status
    }

    pub fn winner(&self) -> Option<Owner> {
        match self.table.status {
            GameStatus::Won(owner) => Some(owner),
            GameStatus::Unknown => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.table.status != GameStatus::Unknown
    }

    pub fn selected(&self) -> Option<Selection> {
        self.state.selection()
    }

    pub fn must_continue_capture(&self) -> bool {
        self.state.is_restricted()
    }

    /// Where the selected piece may go next; empty without a selection.
    pub fn selected_destinations(&self) -> BTreeSet<Coordinate> {
        match &self.state {
            GameState::MakingMove(mv) => mv.destinations.targets().clone(),
            GameState::SelectingPiece {
                selection: Some(selection),
            } => legal_destinations(
                &self.table.board,
                selection.piece,
                selection.at,
                false,
                &BTreeSet::new(),
            )
            .targets()
            .clone(),
            GameState::SelectingPiece { selection: None } => BTreeSet::new(),
        }
    }

    /// Enemies jumped by the multi-jump underway, still on the board.
    pub fn pending_captures(&self) -> BTreeSet<Coordinate> {
        match &self.state {
            GameState::MakingMove(mv) => mv.pending_captures().clone(),
            GameState::SelectingPiece { .. } => BTreeSet::new(),
        }
    }

    /// Pieces of the current player that are obliged to capture.
    pub fn capturing_pieces(&self) -> BTreeSet<Coordinate> {
        moves::capturing_pieces(&self.table.board, self.current_player())
    }

    /// Board codes for rendering, with the selected piece marked.
    pub fn board_view(&self) -> Vec<Vec<u8>> {
        let mut view = self.table.board.to_codes();
        if let Some(selection) = self.selected() {
            if let Some(piece) = self.table.board.piece_at(selection.at) {
                view[selection.at.row][selection.at.col] = piece.selected_code();
            }
        }
        view
    }

    /// One entry per submitted action: whether it changed the view.
    pub fn view_updates(&self) -> &[bool] {
        &self.view_updates
    }

    pub fn last_action_changed(&self) -> bool {
        self.view_updates.last().copied().unwrap_or(false)
    }
}

impl Default for GameRound {
    fn default() -> Self {
        Self::new(Board::default())
    }
}
