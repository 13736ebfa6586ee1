use itertools::iproduct;
use once_cell::sync::Lazy;

use crate::board::Board;
use crate::types::*;

/// Right, left, down the ranks, up the ranks
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// On-board targets of a jump pattern, per square, indexed by `Position::to_linear`
fn jump_table(jumps: &[(i8, i8)]) -> Vec<Vec<Position>> {
    Position::all()
        .map(|from| {
            jumps
                .iter()
                .filter_map(|&(file_delta, rank_delta)| from.offset(file_delta, rank_delta))
                .collect::<Vec<_>>()
        })
        .collect()
}

static KNIGHT_TARGETS: Lazy<Vec<Vec<Position>>> = Lazy::new(|| jump_table(&KNIGHT_JUMPS));

static KING_TARGETS: Lazy<Vec<Vec<Position>>> = Lazy::new(|| {
    let steps: Vec<(i8, i8)> = iproduct!(-1..=1, -1..=1)
        .filter(|&step| step != (0, 0))
        .collect();
    jump_table(&steps)
});

/// Potential move, either valid, in which case it carries the piece it would
/// capture, or invalid
enum PotentialMove {
    Valid(Option<PieceId>),
    Invalid,
}

impl PotentialMove {
    fn continue_search_in_direction(&self) -> bool {
        match self {
            PotentialMove::Invalid => false,
            PotentialMove::Valid(Some(_)) => false,
            PotentialMove::Valid(None) => true,
        }
    }
}

/// Generates the moves of a single piece against a read-only board.
///
/// Moves come out in a fixed order for a given board, so callers can rely on
/// it in tests.
pub struct MoveGenerator<'a> {
    board: &'a Board,
    piece: Piece,
    moves: Vec<MoveCandidate>,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(board: &'a Board, piece: Piece) -> Self {
        Self {
            board,
            piece,
            moves: Vec::with_capacity(28),
        }
    }

    pub fn collect(mut self) -> Vec<MoveCandidate> {
        match self.piece.kind {
            PieceKind::Pawn => self.generate_pawn_moves(),
            PieceKind::Rook => self.generate_sliding_moves(&ROOK_DIRECTIONS),
            PieceKind::Bishop => self.generate_sliding_moves(&BISHOP_DIRECTIONS),
            PieceKind::Queen => {
                self.generate_sliding_moves(&ROOK_DIRECTIONS);
                self.generate_sliding_moves(&BISHOP_DIRECTIONS);
            }
            PieceKind::Knight => {
                self.generate_jump_moves(&KNIGHT_TARGETS[self.piece.position.to_linear()])
            }
            PieceKind::King => {
                self.generate_jump_moves(&KING_TARGETS[self.piece.position.to_linear()])
            }
        }
        self.moves
    }

    /// One step forward onto an empty square, and diagonal captures
    fn generate_pawn_moves(&mut self) {
        let pos = self.piece.position;
        let step = self.piece.side.pawn_direction();

        // a pawn on the far edge has nowhere to go
        let Some(ahead) = pos.offset(0, step) else {
            return;
        };
        if self.board.occupant_at(ahead).is_none() {
            self.moves.push(MoveCandidate::quiet(ahead));
        }

        for file_delta in [-1, 1] {
            let Some(diagonal) = pos.offset(file_delta, step) else {
                continue;
            };
            if let Some((other_id, other_piece)) = self.board.piece_on(diagonal) {
                if self.pawn_can_capture(other_piece) {
                    self.moves.push(MoveCandidate::capture(diagonal, other_id));
                }
            }
        }
    }

    fn pawn_can_capture(&self, other_piece: &Piece) -> bool {
        match self.board.rules().pawn_captures {
            PawnCaptures::OpponentOnly => other_piece.side != self.piece.side,
            PawnCaptures::AnyOccupant => true,
        }
    }

    /// Walk each direction until the edge, a friendly piece, or a capture
    fn generate_sliding_moves(&mut self, directions: &[(i8, i8)]) {
        for &(file_delta, rank_delta) in directions {
            let mut candidate = self.piece.position;
            while let Some(next) = candidate.offset(file_delta, rank_delta) {
                candidate = next;
                let potential_move = self.check_move_target(&candidate);
                if let PotentialMove::Valid(maybe_other) = potential_move {
                    self.moves.push(MoveCandidate {
                        to: candidate,
                        captured: maybe_other,
                    });
                }
                if !potential_move.continue_search_in_direction() {
                    break;
                }
            }
        }
    }

    fn generate_jump_moves(&mut self, targets: &[Position]) {
        for candidate in targets {
            if let PotentialMove::Valid(maybe_other) = self.check_move_target(candidate) {
                self.moves.push(MoveCandidate {
                    to: *candidate,
                    captured: maybe_other,
                });
            }
        }
    }

    // Empty squares are valid quiet moves, squares held by the other side are
    // captures, and our own pieces block.
    fn check_move_target(&self, candidate_pos: &Position) -> PotentialMove {
        match self.board.piece_on(*candidate_pos) {
            Some((other_id, other_piece)) => {
                if other_piece.side == self.piece.side {
                    PotentialMove::Invalid
                } else {
                    PotentialMove::Valid(Some(other_id))
                }
            }
            None => PotentialMove::Valid(None),
        }
    }
}
