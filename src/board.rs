use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::error::{BoardError, BoardResult};
use crate::movegen::MoveGenerator;
use crate::types::*;

/// Rank the pawns of each side start on
fn pawn_home_rank(side: Side) -> u8 {
    match side {
        Side::First => 6,
        Side::Second => 1,
    }
}

/// Rank the rooks of each side start on
fn back_rank(side: Side) -> u8 {
    match side {
        Side::First => 7,
        Side::Second => 0,
    }
}

/// A registered piece. Captured pieces keep their slot so identities stay stable.
#[derive(Debug, Clone)]
struct Slot {
    piece: Piece,
    live: bool,
}

#[derive(Debug, Clone)]
pub struct Board {
    slots: Vec<Slot>,
    rules: RuleSet,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The starting setup: a row of pawns and two corner rooks per side
    pub fn new() -> Board {
        let mut board = Board::empty();
        for side in [Side::First, Side::Second] {
            for file in 0..BOARD_SIZE {
                board.place(PieceKind::Pawn, side, file, pawn_home_rank(side));
            }
        }
        for side in [Side::First, Side::Second] {
            for file in [0, BOARD_SIZE - 1] {
                board.place(PieceKind::Rook, side, file, back_rank(side));
            }
        }
        board
    }

    pub fn empty() -> Board {
        Board {
            slots: vec![],
            rules: RuleSet::default(),
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Board {
        self.rules = rules;
        self
    }

    /// Parse a board from eight rows of eight cells, rank 0 first.
    ///
    /// `.` is an empty cell, letters are pieces as drawn by [`Board::draw_board`]
    /// (uppercase for the first side). Whitespace inside a row is ignored, and
    /// pieces are registered in reading order.
    pub fn from_layout(layout: &str) -> BoardResult<Board> {
        let rows: Vec<(usize, &str)> = layout
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        if rows.len() != BOARD_SIZE as usize {
            // point at the first extra row, or just past the last row given
            let line = match rows.get(BOARD_SIZE as usize) {
                Some((line, _)) => *line,
                None => rows.last().map_or(1, |(line, _)| line + 1),
            };
            return Err(BoardError::Layout {
                line,
                reason: format!("expected {} rows, found {}", BOARD_SIZE, rows.len()),
            });
        }

        let mut board = Board::empty();
        for (rank, (line, row)) in rows.into_iter().enumerate() {
            let cells: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != BOARD_SIZE as usize {
                return Err(BoardError::Layout {
                    line,
                    reason: format!("expected {} cells, found {}", BOARD_SIZE, cells.len()),
                });
            }
            for (file, cell) in cells.into_iter().enumerate() {
                if cell == '.' {
                    continue;
                }
                let position = Position::new(file as i64, rank as i64)?;
                let piece = Piece::from_char(cell, position).ok_or_else(|| BoardError::Layout {
                    line,
                    reason: format!("unknown piece letter `{}`", cell),
                })?;
                board.add_piece(piece)?;
            }
        }
        Ok(board)
    }

    fn place(&mut self, kind: PieceKind, side: Side, file: u8, rank: u8) {
        // setup squares are distinct
        self.slots.push(Slot {
            piece: Piece::new(kind, side, Position::on_board(file, rank)),
            live: true,
        });
    }

    /// Register a new live piece, refusing squares that are already taken
    pub fn add_piece(&mut self, piece: Piece) -> BoardResult<PieceId> {
        if let Some(occupant) = self.occupant_at(piece.position) {
            return Err(BoardError::SquareTaken {
                position: piece.position,
                occupant,
            });
        }
        self.slots.push(Slot { piece, live: true });
        Ok(PieceId(self.slots.len() - 1))
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    /// All live pieces, in registration order
    pub fn all_live(&self) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.live)
            .map(|(index, slot)| (PieceId(index), &slot.piece))
    }

    pub fn live_count(&self) -> usize {
        self.all_live().count()
    }

    pub fn piece_at(&self, id: PieceId) -> BoardResult<&Piece> {
        match self.slots.get(id.0) {
            Some(slot) if slot.live => Ok(&slot.piece),
            _ => Err(BoardError::InvalidIdentity { id }),
        }
    }

    /// The live piece standing on `pos`.
    ///
    /// Should two live pieces ever share a square, the one registered last wins.
    pub fn piece_on(&self, pos: Position) -> Option<(PieceId, &Piece)> {
        let mut found: Option<(PieceId, &Piece)> = None;
        for (id, piece) in self.all_live() {
            if piece.position == pos {
                if let Some((previous, _)) = found {
                    warn!(%pos, %previous, %id, "two live pieces share a square");
                }
                found = Some((id, piece));
            }
        }
        found
    }

    pub fn occupant_at(&self, pos: Position) -> Option<PieceId> {
        self.piece_on(pos).map(|(id, _)| id)
    }

    /// Occupancy map indexed by [`Position::to_linear`]
    pub fn occupancy(&self) -> [Option<PieceId>; BOARD_CELLS] {
        let mut cells = [None; BOARD_CELLS];
        for (id, piece) in self.all_live() {
            cells[piece.position.to_linear()] = Some(id);
        }
        cells
    }

    /// No two live pieces share a square
    pub fn occupancy_is_consistent(&self) -> bool {
        self.all_live().map(|(_, p)| p.position).all_unique()
    }

    pub fn legal_moves(&self, id: PieceId) -> BoardResult<Vec<MoveCandidate>> {
        let piece = self.piece_at(id)?;
        let moves = MoveGenerator::new(self, *piece).collect();
        debug!(%id, kind = piece.kind.to_human(), count = moves.len(), "generated moves");
        Ok(moves)
    }

    /// Every move of every live piece, grouped by piece in registration order
    pub fn all_legal_moves(&self) -> Vec<(PieceId, MoveCandidate)> {
        self.all_live()
            .flat_map(|(id, piece)| {
                MoveGenerator::new(self, *piece)
                    .collect()
                    .into_iter()
                    .map(move |m| (id, m))
            })
            .collect()
    }

    /// Move piece `id` to `to`, capturing whatever the matching move captures.
    ///
    /// The move must be one of [`Board::legal_moves`]; otherwise nothing on the
    /// board changes and `IllegalMove` is returned.
    pub fn apply_move(&mut self, id: PieceId, to: Position) -> BoardResult<MoveRecord> {
        let Some(selected_move) = self.legal_moves(id)?.into_iter().find(|m| m.to == to) else {
            debug!(%id, %to, "rejected move");
            return Err(BoardError::IllegalMove { id, to });
        };
        Ok(self.commit(id, selected_move))
    }

    /// Commit a move produced by the generator for `id` on this very board.
    pub(crate) fn commit(&mut self, id: PieceId, selected_move: MoveCandidate) -> MoveRecord {
        let piece = self.slots[id.0].piece;

        // the captured piece leaves the board before the mover arrives
        let captured = selected_move.captured.map(|victim| {
            let slot = &mut self.slots[victim.0];
            slot.live = false;
            info!(%victim, at = %slot.piece.position, "captured piece");
            (victim, slot.piece)
        });

        self.slots[id.0].piece.position = selected_move.to;
        info!(%id, from = %piece.position, to = %selected_move.to, "moved piece");
        debug_assert!(self.occupancy_is_consistent());

        MoveRecord {
            id,
            piece,
            to: selected_move.to,
            captured,
        }
    }

    pub fn draw_board(&self) -> String {
        let mut cells = [' '; BOARD_CELLS];
        for (_, piece) in self.all_live() {
            cells[piece.position.to_linear()] = piece.to_char();
        }

        let separator = "-".repeat(2 * BOARD_SIZE as usize + 1);
        let mut string = format!("{}\n", separator);
        for row in cells.chunks(BOARD_SIZE as usize) {
            string.push_str(&format!("|{}|\n", row.iter().join("|")));
            string.push_str(&format!("{}\n", separator));
        }
        string
    }

    pub fn draw_to_terminal(&self) {
        println!("{}", self.draw_board());
    }

    /// Grid of the moves of one piece: `O` for a quiet move, `X` for a capture
    pub fn display_piece_moves(&self, id: PieceId) -> BoardResult<String> {
        let piece = self.piece_at(id)?;
        let moves = self.legal_moves(id)?;

        let mut string = String::new();
        for pos in Position::all() {
            let cell = if pos == piece.position {
                piece.to_char()
            } else {
                match moves.iter().find(|m| m.to == pos) {
                    Some(m) if m.is_capture() => 'X',
                    Some(_) => 'O',
                    None => '.',
                }
            };
            string.push(cell);
            string.push(if pos.file() == BOARD_SIZE - 1 { '\n' } else { ' ' });
        }
        Ok(string)
    }
}
