// Positional bonuses, indexed [y][x] from White's side of the board (White's
// home row is y = 7). Black pieces are looked up on mirrored coordinates.
// Values come from TSCP's eval.c, except the rook table which is PeSTO's
// midgame rook table.
use crate::evaluation::Score;
use crate::piece::{Color, Piece, PieceType};

pub const PAWN_TABLE: [[Score; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 10, 15, 20, 20, 15, 10, 5],
    [4, 8, 12, 16, 16, 12, 8, 4],
    [3, 6, 9, 12, 12, 9, 6, 3],
    [2, 4, 6, 8, 8, 6, 4, 2],
    [1, 2, 3, -10, -10, 3, 2, 1],
    [0, 0, 0, -40, -40, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

pub const KNIGHT_TABLE: [[Score; 8]; 8] = [
    [-10, -10, -10, -10, -10, -10, -10, -10],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-10, 0, 5, 10, 10, 5, 0, -10],
    [-10, 0, 5, 10, 10, 5, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, -30, -10, -10, -10, -10, -30, -10],
];

pub const BISHOP_TABLE: [[Score; 8]; 8] = [
    [-10, -10, -10, -10, -10, -10, -10, -10],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-10, 0, 5, 10, 10, 5, 0, -10],
    [-10, 0, 5, 10, 10, 5, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, -10, -20, -10, -10, -20, -10, -10],
];

pub const ROOK_TABLE: [[Score; 8]; 8] = [
    [32, 42, 32, 51, 63, 9, 31, 43],
    [27, 32, 58, 62, 80, 67, 26, 44],
    [-5, 19, 26, 36, 17, 45, 61, 16],
    [-24, -11, 7, 26, 24, 35, -8, -20],
    [-36, -26, -12, -1, 9, -7, 6, -23],
    [-45, -25, -16, -17, 3, 0, -5, -33],
    [-44, -16, -20, -9, -1, 11, -6, -71],
    [-19, -13, 1, 17, 16, 7, -37, -26],
];

pub const QUEEN_TABLE: [[Score; 8]; 8] = [
    [-20, -10, -10, -5, -5, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-5, 0, 5, 5, 5, 5, 0, -5],
    [0, 0, 5, 5, 5, 5, 0, 0],
    [-10, 5, 5, 5, 5, 5, 0, -10],
    [-10, 0, 5, 0, 0, 0, 0, -10],
    [-20, -10, -10, -5, -5, -10, -10, -20],
];

pub const KING_TABLE: [[Score; 8]; 8] = [
    [-40, -40, -40, -40, -40, -40, -40, -40],
    [-40, -40, -40, -40, -40, -40, -40, -40],
    [-40, -40, -40, -40, -40, -40, -40, -40],
    [-40, -40, -40, -40, -40, -40, -40, -40],
    [-40, -40, -40, -40, -40, -40, -40, -40],
    [-40, -40, -40, -40, -40, -40, -40, -40],
    [-20, -20, -20, -20, -20, -20, -20, -20],
    [0, 20, 40, -20, 0, -20, 40, 20],
];

fn table(piece_type: PieceType) -> &'static [[Score; 8]; 8] {
    match piece_type {
        PieceType::Pawn => &PAWN_TABLE,
        PieceType::Knight => &KNIGHT_TABLE,
        PieceType::Bishop => &BISHOP_TABLE,
        PieceType::Rook => &ROOK_TABLE,
        PieceType::Queen => &QUEEN_TABLE,
        PieceType::King => &KING_TABLE,
    }
}

/// Positional bonus of a piece where it stands
pub fn square_bonus(piece: &Piece) -> Score {
    let (x, y) = match piece.color {
        Color::White => (piece.x, piece.y),
        Color::Black => (7 - piece.x, 7 - piece.y),
    };
    table(piece.piece_type)[y as usize][x as usize]
}
