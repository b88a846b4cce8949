use crate::piece::{Color, PieceType};
use crate::square::Square;

/// The most recent move applied to a board. Only en passant legality
/// depends on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LastMove {
    pub piece_type: PieceType,
    pub color: Color,
    pub from: Square,
    pub to: Square,
}

impl LastMove {
    /// A pawn that advanced two rows in one go
    pub fn is_double_step(&self) -> bool {
        self.piece_type == PieceType::Pawn
            && self.from.x == self.to.x
            && (self.to.y - self.from.y).abs() == 2
    }
}
