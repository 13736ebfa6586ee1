use chrono::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::board::Board;
use crate::error::BoardResult;
use crate::types::*;

/// Result of a committed move request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    /// Description of the matched move, e.g. `Move to x:0 y:5 and make a kill`
    pub description: String,
}

/// One game: owns the board and the list of committed moves.
///
/// There are no turns. Either side may move any of its pieces at any time.
pub struct Game {
    board: Board,
    moves: Vec<MoveRecord>,
    game_start_time: DateTime<Local>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

impl Game {
    pub fn new(rules: RuleSet) -> Self {
        Game::from_board(Board::new().with_rules(rules))
    }

    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            moves: Vec::new(),
            game_start_time: Local::now(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Live pieces with their identity, kind, side and position
    pub fn live_pieces(&self) -> Vec<(PieceId, Piece)> {
        self.board.all_live().map(|(id, p)| (id, *p)).collect()
    }

    pub fn legal_moves(&self, id: PieceId) -> BoardResult<Vec<MoveCandidate>> {
        self.board.legal_moves(id)
    }

    /// Request a move from raw coordinates, rejecting off-board ones up front
    pub fn submit(&mut self, id: PieceId, file: i64, rank: i64) -> BoardResult<MoveOutcome> {
        let to = Position::new(file, rank)?;
        self.request_move(id, to)
    }

    pub fn request_move(&mut self, id: PieceId, to: Position) -> BoardResult<MoveOutcome> {
        let record = self.board.apply_move(id, to)?;
        self.moves.push(record);
        Ok(MoveOutcome {
            record,
            description: record.candidate().to_human(),
        })
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn transcript(&self) -> String {
        let mut transcript = String::new();
        transcript.push_str("[Event \"Rooks and pawns\"]\n");
        transcript.push_str(
            format!("[Date \"{}\"]\n", self.game_start_time.format("%Y.%m.%d")).as_str(),
        );
        transcript.push_str(format!("[Moves \"{}\"]\n", self.moves.len()).as_str());
        transcript.push('\n');

        for (i, m) in self.moves.iter().enumerate() {
            transcript.push_str(&format!("{}. {}\n", i + 1, m.to_human()));
        }
        transcript
    }
}

/// A game that can be handed to several threads.
///
/// Each request holds the game's lock from move generation to commit, so two
/// requests can never validate against the same board state.
#[derive(Clone, Default)]
pub struct SharedGame {
    inner: Arc<Mutex<Game>>,
}

impl SharedGame {
    pub fn new(game: Game) -> Self {
        Self {
            inner: Arc::new(Mutex::new(game)),
        }
    }

    // a panic mid-request cannot leave the board half updated, so a poisoned
    // lock still guards a consistent game
    fn lock(&self) -> MutexGuard<'_, Game> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn submit(&self, id: PieceId, file: i64, rank: i64) -> BoardResult<MoveOutcome> {
        self.lock().submit(id, file, rank)
    }

    pub fn legal_moves(&self, id: PieceId) -> BoardResult<Vec<MoveCandidate>> {
        self.lock().legal_moves(id)
    }

    pub fn with_game<R>(&self, f: impl FnOnce(&Game) -> R) -> R {
        f(&self.lock())
    }
}
