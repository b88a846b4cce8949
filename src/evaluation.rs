use crate::board::Board;
use crate::piece::{Color, Piece, PieceType};
use crate::piece_square_tables::square_bonus;

pub type Score = i32;

/// Static evaluation of a position, always read from one side's point of
/// view: positive is good for `perspective`.
pub struct Evaluation;
impl Evaluation {
    /// Indexed by `PieceType as usize`
    pub const PIECE_VALUE: [Score; 6] = [100, 320, 330, 500, 900, 20_000];
    pub const MATE_SCORE: Score = 100_000;
    pub const DRAW_SCORE: Score = 0;
    /// Larger than any score a search can return, mates included
    pub const INFINITY: Score = 1_000_000;

    const UNMOVED_KING_PENALTY: Score = 30;
    const UNCASTLED_KING_PENALTY: Score = 50;
    const CASTLED_KING_BONUS: Score = 50;
    const KING_SHELTER: Score = 20;

    /// Material, piece-square bonuses and king safety of both sides, the
    /// opponent's terms being subtracted. Swapping `perspective` negates the
    /// result.
    pub fn evaluate(board: &Board, perspective: Color) -> Score {
        let mut score = 0;
        for piece in board.pieces() {
            let value = Self::piece_score(piece);
            if piece.color == perspective {
                score += value
            } else {
                score -= value
            }
        }
        score + Self::king_safety(board, perspective) - Self::king_safety(board, perspective.opposite())
    }

    fn piece_score(piece: &Piece) -> Score {
        piece.piece_type.value() + square_bonus(piece)
    }

    /// An unmoved king has not castled yet and is penalised for it, a king
    /// standing on a castling square gets a flat bonus, and a king away from
    /// the two outer rows of either edge is exposed.
    fn king_safety(board: &Board, color: Color) -> Score {
        let king = match board.king(color) {
            Some(k) => k,
            None => return 0,
        };

        let mut score = 0;
        if !king.has_moved {
            score -= Self::UNMOVED_KING_PENALTY + Self::UNCASTLED_KING_PENALTY;
        } else if (king.x == 6 || king.x == 2) && (king.y == 0 || king.y == 7) {
            score += Self::CASTLED_KING_BONUS;
        }
        if king.y < 2 || king.y > 5 {
            score += Self::KING_SHELTER;
        } else {
            score -= Self::KING_SHELTER;
        }
        score
    }

    pub fn is_mate_score(score: Score) -> bool {
        score.abs() >= Self::MATE_SCORE
    }
}

impl PieceType {
    pub fn value(&self) -> Score {
        Evaluation::PIECE_VALUE[*self as usize]
    }
}
