use crate::{board::Board, history::LastMove, movelist::MoveList, piece::Color, r#move::Move};

/// Generates every legal move of `side`, pieces in board order and each
/// piece's destinations in the order `Board::valid_moves` returns them
pub fn generate(board: &Board, side: Color, last_move: Option<&LastMove>) -> MoveList {
    let mut move_list = MoveList::default();
    for piece in board.pieces_of(side) {
        for target in board.valid_moves(piece, last_move) {
            move_list.push(Move::new(board, piece, target));
        }
    }
    move_list
}

/// Plays `mv` on a copy of `board`, passing the special move flags through
pub fn play_on_copy(board: &Board, mv: &Move) -> Option<Board> {
    let mut copy = board.clone();
    match copy.move_piece(mv.from, mv.to, mv.en_passant, mv.is_castling()) {
        Ok(()) => Some(copy),
        Err(e) => {
            log::warn!("generated move {} could not be replayed: {}", mv, e);
            None
        }
    }
}

/// Counts leaf nodes of the legal move tree, `depth` plies deep
pub fn perft(board: &Board, side: Color, last_move: Option<&LastMove>, depth: u32) -> u128 {
    if depth == 0 {
        return 1;
    }
    let moves = generate(board, side, last_move);
    if depth == 1 {
        return moves.len() as u128;
    }
    let mut nodes = 0u128;
    for mv in &moves {
        if let Some(child) = play_on_copy(board, mv) {
            nodes += perft(&child, side.opposite(), Some(&mv.to_last_move()), depth - 1);
        }
    }
    nodes
}
