use crate::board::Board;
use crate::castling::CastleSide;
use crate::error::FenError;
use crate::history::LastMove;
use crate::piece::Color::{Black, White};
use crate::piece::PieceType::{King, Pawn, Rook};
use crate::piece::{Color, Piece};
use crate::square::Square;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Everything a FEN string describes that matters to the rules
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub board: Board,
    pub side_to_move: Color,
    pub last_move: Option<LastMove>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Position {
    /// Parses a FEN string. Castling rights decide which kings and rooks
    /// count as unmoved, and the en passant square is turned back into the
    /// double step that produced it.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let sections: Vec<&str> = fen.split_whitespace().collect();
        if sections.len() < 4 {
            return Err(FenError::TooFewFields(sections.len()));
        }
        let (placement, side, castling, ep_target) = (sections[0], sections[1], sections[2], sections[3]);

        let side_to_move = match side {
            "w" => White,
            "b" => Black,
            _ => return Err(FenError::InvalidSideToMove(side.to_string())),
        };

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadRankCount(ranks.len()));
        }
        let mut board = Board::empty();
        for (y, rank) in ranks.iter().enumerate() {
            let mut x = 0i8;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    x += skip as i8;
                    continue;
                }
                if x >= 8 {
                    return Err(FenError::BadRankLength(8 - y));
                }
                let mut piece = Piece::from_char(c, Square::new(x, y as i8)).ok_or(FenError::InvalidPiece(c))?;
                piece.has_moved = match piece.piece_type {
                    Pawn => piece.y != piece.color.pawn_row(),
                    King => !Self::may_castle(castling, piece.color, None),
                    Rook => !CastleSide::ALL.iter().any(|side| {
                        piece.x == side.rook_file()
                            && piece.y == piece.color.home_row()
                            && Self::may_castle(castling, piece.color, Some(*side))
                    }),
                    _ => false,
                };
                board.add_piece(piece)?;
                x += 1;
            }
            if x != 8 {
                return Err(FenError::BadRankLength(8 - y));
            }
        }

        let last_move = if ep_target == "-" {
            None
        } else {
            let target = Square::parse(ep_target).ok_or_else(|| FenError::InvalidEnPassant(ep_target.to_string()))?;
            // The pawn that just double-stepped belongs to the side not to move
            let mover = side_to_move.opposite();
            Some(LastMove {
                piece_type: Pawn,
                color: mover,
                from: Square::new(target.x, target.y - mover.forward()),
                to: Square::new(target.x, target.y + mover.forward()),
            })
        };

        Ok(Position {
            board,
            side_to_move,
            last_move,
            halfmove_clock: sections.get(4).and_then(|s| s.parse().ok()).unwrap_or(0),
            fullmove_number: sections.get(5).and_then(|s| s.parse().ok()).unwrap_or(1),
        })
    }

    fn may_castle(rights: &str, color: Color, side: Option<CastleSide>) -> bool {
        let letters = match (color, side) {
            (White, Some(CastleSide::KingSide)) => "K",
            (White, Some(CastleSide::QueenSide)) => "Q",
            (White, None) => "KQ",
            (Black, Some(CastleSide::KingSide)) => "k",
            (Black, Some(CastleSide::QueenSide)) => "q",
            (Black, None) => "kq",
        };
        letters.chars().any(|c| rights.contains(c))
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for y in 0..8 {
            let mut empty_counter = 0;
            for x in 0..8 {
                match self.board.get_piece_at(Square::new(x, y)) {
                    Some(p) => {
                        if empty_counter != 0 {
                            fen.push_str(&empty_counter.to_string());
                        }
                        empty_counter = 0;
                        fen.push_str(&p.to_string())
                    }
                    None => empty_counter += 1,
                }
            }
            if empty_counter != 0 {
                fen.push_str(&empty_counter.to_string());
            }
            if y != 7 {
                fen.push('/');
            }
        }

        fen.push_str(if self.side_to_move == White { " w " } else { " b " });
        let mut rights = String::new();
        for (color, letters) in [(White, ['K', 'Q']), (Black, ['k', 'q'])] {
            for (side, letter) in CastleSide::ALL.iter().zip(letters) {
                if self.castling_available(color, *side) {
                    rights.push(letter);
                }
            }
        }
        fen.push_str(if rights.is_empty() { "-" } else { &rights });

        match self.last_move {
            Some(last) if last.is_double_step() => {
                let target = Square::new(last.to.x, (last.from.y + last.to.y) / 2);
                fen.push_str(&format!(" {} ", target));
            }
            _ => fen.push_str(" - "),
        }
        fen.push_str(&format!("{} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    /// Castling rights in the FEN sense: nothing has moved yet, attacks and
    /// blockers are not considered
    fn castling_available(&self, color: Color, side: CastleSide) -> bool {
        let row = color.home_row();
        let king_ready = matches!(self.board.king(color), Some(k) if !k.has_moved && k.x == 4 && k.y == row);
        let rook_ready = matches!(
            self.board.get_piece_at(Square::new(side.rook_file(), row)),
            Some(r) if r.piece_type == Rook && r.color == color && !r.has_moved
        );
        king_ready && rook_ready
    }
}
