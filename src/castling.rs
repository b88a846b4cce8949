use crate::board::Board;
use crate::error::BoardError;
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;
use log::trace;
use std::fmt::{Display, Formatter};

const KING_FILE: i8 = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    /// Direction the king walks in
    pub fn direction(&self) -> i8 {
        match self {
            CastleSide::KingSide => 1,
            CastleSide::QueenSide => -1,
        }
    }
    pub fn rook_file(&self) -> i8 {
        match self {
            CastleSide::KingSide => 7,
            CastleSide::QueenSide => 0,
        }
    }
    pub fn rook_target_file(&self) -> i8 {
        match self {
            CastleSide::KingSide => 5,
            CastleSide::QueenSide => 3,
        }
    }
    pub fn king_target_file(&self) -> i8 {
        KING_FILE + 2 * self.direction()
    }
}

impl Display for CastleSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CastleSide::KingSide => "king-side",
                CastleSide::QueenSide => "queen-side",
            }
        )
    }
}

impl Board {
    /// Castling needs an unmoved king on its home square, an unmoved rook in
    /// the matching corner, empty cells between them, and a king that is
    /// neither in check nor crossing or landing on an attacked cell.
    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        let row = color.home_row();
        let king = match self.king(color) {
            Some(k) if !k.has_moved && k.x == KING_FILE && k.y == row => k,
            _ => return false,
        };

        let rook_square = Square::new(side.rook_file(), row);
        match self.get_piece_at(rook_square) {
            Some(r) if r.piece_type == PieceType::Rook && r.color == color && !r.has_moved => (),
            _ => {
                trace!("cannot castle {} for {:?}: no unmoved rook on {}", side, color, rook_square);
                return false;
            }
        }

        if !self.is_path_clear(king.square(), rook_square) {
            trace!("cannot castle {} for {:?}: path is not clear", side, color);
            return false;
        }

        // The king's own cell counts as the first transit cell, which also
        // covers the "not in check" requirement
        let transit_attacked = (0..=2)
            .map(|i| Square::new(KING_FILE + i * side.direction(), row))
            .any(|sq| self.is_square_under_attack(sq, color));
        if transit_attacked {
            trace!("cannot castle {} for {:?}: king path is attacked", side, color);
            return false;
        }
        true
    }

    /// Checks a castling request and returns where the rook goes
    pub(crate) fn castling_rook(&self, king: &Piece, target: Square) -> Result<(Square, Square), BoardError> {
        let dx = target.x - king.x;
        if king.piece_type != PieceType::King || target.y != king.y || dx.abs() != 2 {
            return Err(BoardError::NotACastlingMove {
                from: king.square(),
                to: target,
            });
        }
        let side = if dx > 0 { CastleSide::KingSide } else { CastleSide::QueenSide };
        let rook_from = Square::new(side.rook_file(), king.y);
        match self.get_piece_at(rook_from) {
            Some(r) if r.piece_type == PieceType::Rook && r.color == king.color && !r.has_moved => {
                Ok((rook_from, Square::new(side.rook_target_file(), king.y)))
            }
            _ => Err(BoardError::CastlingRookUnavailable(rook_from)),
        }
    }
}
