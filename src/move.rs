use crate::board::Board;
use crate::history::LastMove;
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;
use std::fmt::{Display, Formatter};

/// A move descriptor, detached from any board. The flags are filled when the
/// move is built and only serve move ordering and special move replay.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece_type: PieceType,
    pub color: Color,
    pub capture: bool,
    pub promotion: bool,
    pub en_passant: bool,
}

impl Move {
    /// Describes `piece` moving to `to` on `board`. En passant is inferred
    /// from a pawn moving diagonally onto an empty cell.
    pub fn new(board: &Board, piece: &Piece, to: Square) -> Move {
        let is_pawn = piece.piece_type == PieceType::Pawn;
        let en_passant = is_pawn && to.x != piece.x && !board.is_occupied(to);
        Move {
            from: piece.square(),
            to,
            piece_type: piece.piece_type,
            color: piece.color,
            capture: en_passant || board.is_occupied_by_opponent(to, piece.color),
            promotion: is_pawn && to.y == piece.color.promotion_row(),
            en_passant,
        }
    }

    /// A king moving two files is castling
    pub fn is_castling(&self) -> bool {
        self.piece_type == PieceType::King && (self.to.x - self.from.x).abs() == 2
    }

    pub fn to_last_move(&self) -> LastMove {
        LastMove {
            piece_type: self.piece_type,
            color: self.color,
            from: self.from,
            to: self.to,
        }
    }

    /// Parses a move formatted in long algebraic notation.
    /// Pawns always promote to a queen, so a trailing promotion letter is
    /// accepted and ignored.
    /// ```
    /// use gambit::r#move::Move;
    /// use gambit::square::Square;
    /// assert_eq!(Move::parse("e2e4"), Some((Square::new(4, 6), Square::new(4, 4))));
    /// assert_eq!(Move::parse("a7a8q"), Some((Square::new(0, 1), Square::new(0, 0))));
    /// assert_eq!(Move::parse("e2"), None);
    /// ```
    pub fn parse(mv: &str) -> Option<(Square, Square)> {
        let origin = Square::parse(mv.get(0..2)?)?;
        let target = Square::parse(mv.get(2..4)?)?;
        Some((origin, target))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.promotion {
            write!(f, "{}{}q", self.from, self.to)
        } else {
            write!(f, "{}{}", self.from, self.to)
        }
    }
}
