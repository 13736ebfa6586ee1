use rayon::prelude::*;

use crate::board::Board;

/// Number of move sequences of length `depth` from `board`.
///
/// There are no turns, so every live piece of either side may move at every
/// ply.
pub fn run_perft_test(board: &Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for (id, m) in board.all_legal_moves() {
        let mut b = board.clone();
        b.commit(id, m);
        nodes += run_perft_test(&b, depth - 1);
    }
    nodes
}

/// Same count as [`run_perft_test`], with the first ply split across threads
pub fn run_perft_parallel(board: &Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    board
        .all_legal_moves()
        .into_par_iter()
        .map(|(id, m)| {
            let mut b = board.clone();
            b.commit(id, m);
            run_perft_test(&b, depth - 1)
        })
        .sum()
}
