use std::fmt::{Display, Formatter};

use log::debug;

use crate::castling::CastleSide;
use crate::error::BoardError;
use crate::history::LastMove;
use crate::piece::Color::{Black, White};
use crate::piece::PieceType::{Bishop, King, Knight, Pawn, Queen, Rook};
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;

const BACK_RANK: [PieceType; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

/// A position as a flat set of piece records. Cloning the board copies every
/// piece, which is how moves are tried out without touching the original.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pieces: Vec<Piece>,
}

impl Board {
    /// Creates a board holding the standard starting position
    pub fn new() -> Board {
        let mut pieces = Vec::with_capacity(32);
        for color in [White, Black] {
            for (x, piece_type) in BACK_RANK.iter().enumerate() {
                pieces.push(Piece::new(*piece_type, color, x as i8, color.home_row()));
            }
            for x in 0..8 {
                pieces.push(Piece::new(Pawn, color, x, color.pawn_row()));
            }
        }
        Board { pieces }
    }

    pub fn empty() -> Board {
        Board { pieces: Vec::with_capacity(32) }
    }

    /// Places a new piece, refusing cells that are off the board or taken
    pub fn add_piece(&mut self, piece: Piece) -> Result<(), BoardError> {
        let square = piece.square();
        if !square.is_valid() {
            return Err(BoardError::OutOfBounds { x: piece.x, y: piece.y });
        }
        if self.is_occupied(square) {
            return Err(BoardError::SquareOccupied(square));
        }
        self.pieces.push(piece);
        Ok(())
    }

    /*
    QUERIES
     */
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(move |p| p.color == color)
    }

    pub fn get_piece_at(&self, sq: Square) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.x == sq.x && p.y == sq.y)
    }

    pub fn king(&self, color: Color) -> Option<&Piece> {
        self.pieces
            .iter()
            .find(|p| p.piece_type == King && p.color == color)
    }

    pub fn is_occupied(&self, sq: Square) -> bool {
        self.get_piece_at(sq).is_some()
    }

    pub fn is_occupied_by_opponent(&self, sq: Square, color: Color) -> bool {
        matches!(self.get_piece_at(sq), Some(p) if p.color != color)
    }

    /// True when every cell strictly between two aligned squares is empty.
    /// Squares that share no rank, file or diagonal are never "clear".
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        if dx != 0 && dy != 0 && dx.abs() != dy.abs() {
            return false;
        }
        let (step_x, step_y) = (dx.signum(), dy.signum());
        let mut current = from.offset(step_x, step_y);
        while current != to {
            if self.is_occupied(current) {
                return false;
            }
            current = current.offset(step_x, step_y);
        }
        true
    }

    /*
    LEGALITY
     */

    /// Legal destinations for `piece`: its potential moves, castling and en
    /// passant when available, minus anything that would leave its own king
    /// in check. Each candidate is played on a copy of the board and the copy
    /// is inspected for check.
    pub fn valid_moves(&self, piece: &Piece, last_move: Option<&LastMove>) -> Vec<Square> {
        // Work from the board's own record, the caller's copy may be stale
        let piece = match self.get_piece_at(piece.square()) {
            Some(p) if p.piece_type == piece.piece_type && p.color == piece.color => *p,
            _ => return vec![],
        };

        // (destination, en passant, castling)
        let mut candidates: Vec<(Square, bool, bool)> = piece
            .potential_moves(self)
            .into_iter()
            .filter(|target| target.is_valid())
            .filter(|target| !matches!(self.get_piece_at(*target), Some(p) if p.color == piece.color))
            .filter(|target| !piece.is_sliding() || self.is_path_clear(piece.square(), *target))
            .map(|target| (target, false, false))
            .collect();

        if piece.piece_type == King && !piece.has_moved {
            for side in CastleSide::ALL {
                if self.can_castle(piece.color, side) {
                    candidates.push((Square::new(side.king_target_file(), piece.y), false, true));
                }
            }
        }
        if piece.piece_type == Pawn {
            if let Some(target) = self.en_passant_target(&piece, last_move) {
                candidates.push((target, true, false));
            }
        }

        candidates
            .into_iter()
            .filter(|&(target, en_passant, castling)| {
                let mut temp_board = self.clone();
                temp_board
                    .move_piece(piece.square(), target, en_passant, castling)
                    .is_ok()
                    && !temp_board.is_king_in_check(piece.color)
            })
            .map(|(target, _, _)| target)
            .collect()
    }

    /// The cell a pawn may capture onto en passant, if the last move was an
    /// opposing pawn's double step landing right beside it
    fn en_passant_target(&self, pawn: &Piece, last_move: Option<&LastMove>) -> Option<Square> {
        let last = last_move?;
        if pawn.y != pawn.color.en_passant_row()
            || last.color == pawn.color
            || !last.is_double_step()
            || last.to.y != pawn.y
            || (last.to.x - pawn.x).abs() != 1
        {
            return None;
        }
        match self.get_piece_at(last.to) {
            Some(p) if p.piece_type == Pawn && p.color == last.color => (),
            _ => return None,
        }
        let target = Square::new(last.to.x, pawn.y + pawn.color.forward());
        if self.is_occupied(target) {
            None
        } else {
            Some(target)
        }
    }

    /// Any opposing piece controls `sq`
    pub fn is_square_under_attack(&self, sq: Square, color: Color) -> bool {
        self.pieces
            .iter()
            .filter(|p| p.color != color)
            .any(|p| p.attacks(self, sq))
    }

    /// A board without a king of that colour is never in check
    pub fn is_king_in_check(&self, color: Color) -> bool {
        match self.king(color) {
            Some(king) => self.is_square_under_attack(king.square(), color),
            None => false,
        }
    }

    pub fn has_valid_moves(&self, color: Color, last_move: Option<&LastMove>) -> bool {
        self.pieces_of(color)
            .any(|p| !self.valid_moves(p, last_move).is_empty())
    }

    /// King against king, a lone minor piece, or one bishop each standing on
    /// squares of the same colour
    pub fn is_insufficient_material(&self) -> bool {
        let white: Vec<&Piece> = self.pieces_of(White).filter(|p| p.piece_type != King).collect();
        let black: Vec<&Piece> = self.pieces_of(Black).filter(|p| p.piece_type != King).collect();
        let is_minor = |p: &&Piece| matches!(p.piece_type, Bishop | Knight);

        match (white.as_slice(), black.as_slice()) {
            ([], []) => true,
            ([lone], []) | ([], [lone]) => is_minor(lone),
            ([w], [b]) if w.piece_type == Bishop && b.piece_type == Bishop => {
                w.square().is_light() == b.square().is_light()
            }
            _ => false,
        }
    }

    /*
    MUTATION
     */

    /// Plays a move: removes the captured piece (the pawn behind `to` for en
    /// passant), brings the rook over when castling, relocates the piece and
    /// promotes a pawn reaching the far row to a queen. Nothing is touched
    /// unless every check passes.
    pub fn move_piece(
        &mut self,
        from: Square,
        to: Square,
        en_passant: bool,
        castling: bool,
    ) -> Result<(), BoardError> {
        if !to.is_valid() {
            return Err(BoardError::OutOfBounds { x: to.x, y: to.y });
        }
        let mover = *self.get_piece_at(from).ok_or(BoardError::NoPieceAt(from))?;

        let captured = if en_passant {
            let square = Square::new(to.x, to.y - mover.color.forward());
            match self.get_piece_at(square) {
                Some(p) if p.piece_type == Pawn && p.color != mover.color => Some(square),
                _ => return Err(BoardError::EnPassantTargetMissing(to)),
            }
        } else {
            match self.get_piece_at(to) {
                Some(p) if p.color == mover.color => return Err(BoardError::DestinationOccupied(to)),
                Some(_) => Some(to),
                None => None,
            }
        };
        let rook_move = if castling {
            Some(self.castling_rook(&mover, to)?)
        } else {
            None
        };

        if let Some(square) = captured {
            self.pieces.retain(|p| p.square() != square);
            if en_passant {
                debug!("en passant capture on {}", square);
            }
        }
        for piece in self.pieces.iter_mut() {
            if piece.square() == from {
                piece.move_to(to);
            } else if let Some((rook_from, rook_to)) = rook_move {
                if piece.square() == rook_from {
                    piece.move_to(rook_to);
                    debug!("castling: rook {} -> {}", rook_from, rook_to);
                }
            }
        }

        if mover.piece_type == Pawn && to.y == mover.color.promotion_row() {
            self.promote(to);
        }
        Ok(())
    }

    /// Replaces the pawn on `sq` with a fresh queen of the same colour
    fn promote(&mut self, sq: Square) {
        if let Some(pawn) = self.pieces.iter_mut().find(|p| p.square() == sq) {
            *pawn = Piece::new(Queen, pawn.color, sq.x, sq.y);
            debug!("pawn promoted to queen on {}", sq);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for y in 0..8 {
            let mut line = format!("{} ", 8 - y);
            for x in 0..8 {
                match self.get_piece_at(Square::new(x, y)) {
                    None => line.push_str(". "),
                    Some(p) => line.push_str(&(p.to_string() + " ")),
                }
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    fn board_with(pieces: &[(PieceType, Color, &str)]) -> Board {
        let mut board = Board::empty();
        for &(piece_type, color, square) in pieces {
            let square = sq(square);
            board.add_piece(Piece::new(piece_type, color, square.x, square.y)).unwrap();
        }
        board
    }

    fn sorted(mut squares: Vec<Square>) -> Vec<Square> {
        squares.sort();
        squares
    }

    fn moves_of(board: &Board, square: &str, last_move: Option<&LastMove>) -> Vec<Square> {
        let piece = *board.get_piece_at(sq(square)).unwrap();
        sorted(board.valid_moves(&piece, last_move))
    }

    #[test]
    fn starting_position_layout() {
        let board = Board::new();
        assert_eq!(board.pieces().len(), 32);
        assert_eq!(board.get_piece_at(sq("e1")).unwrap().piece_type, King);
        assert_eq!(board.get_piece_at(sq("d8")).unwrap().piece_type, Queen);
        assert_eq!(board.get_piece_at(sq("d8")).unwrap().color, Black);
        assert!(board.get_piece_at(sq("e4")).is_none());
        assert_eq!(
            board.to_string().lines().next(),
            Some("8 r n b q k b n r")
        );
    }

    #[test]
    fn add_piece_keeps_cells_unique() {
        let mut board = Board::empty();
        board.add_piece(Piece::new(Rook, White, 0, 0)).unwrap();
        assert_eq!(
            board.add_piece(Piece::new(Knight, Black, 0, 0)),
            Err(BoardError::SquareOccupied(Square::new(0, 0)))
        );
        assert_eq!(
            board.add_piece(Piece::new(Knight, Black, 8, 0)),
            Err(BoardError::OutOfBounds { x: 8, y: 0 })
        );
    }

    #[test]
    fn e4_opening_scenario() {
        let mut board = Board::new();
        board.move_piece(sq("e2"), sq("e4"), false, false).unwrap();
        let last = LastMove {
            piece_type: Pawn,
            color: White,
            from: sq("e2"),
            to: sq("e4"),
        };

        assert!(board.has_valid_moves(Black, Some(&last)));
        assert!(!board.is_king_in_check(White));
        assert!(!board.is_king_in_check(Black));
        assert_eq!(moves_of(&board, "e7", Some(&last)), sorted(vec![sq("e6"), sq("e5")]));
        assert_eq!(moves_of(&board, "g8", Some(&last)), sorted(vec![sq("f6"), sq("h6")]));
    }

    #[test]
    fn path_clear() {
        let board = board_with(&[(Rook, White, "a1"), (Pawn, White, "a4")]);
        assert!(board.is_path_clear(sq("a1"), sq("a4")));
        assert!(!board.is_path_clear(sq("a1"), sq("a5")));
        assert!(board.is_path_clear(sq("a1"), sq("h8")));
        assert!(!board.is_path_clear(sq("a1"), sq("b3")));
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let board = board_with(&[
            (King, White, "e1"),
            (Bishop, White, "e2"),
            (Rook, Black, "e8"),
            (King, Black, "a8"),
        ]);
        assert!(moves_of(&board, "e2", None).is_empty());
    }

    #[test]
    fn check_must_be_answered() {
        let board = board_with(&[
            (King, White, "e1"),
            (Rook, White, "a2"),
            (Rook, Black, "e8"),
            (King, Black, "a8"),
        ]);
        assert!(board.is_king_in_check(White));
        // The rook can only interpose on e2
        assert_eq!(moves_of(&board, "a2", None), vec![sq("e2")]);
        // The king may not step along the checking file
        let king_moves = moves_of(&board, "e1", None);
        assert!(!king_moves.contains(&sq("e2")));
        assert!(king_moves.contains(&sq("d1")));
    }

    #[test]
    fn sliding_moves_stop_at_blockers() {
        let board = board_with(&[
            (King, White, "h1"),
            (Bishop, White, "c1"),
            (Pawn, White, "e3"),
            (Knight, Black, "a3"),
            (King, Black, "h8"),
        ]);
        assert_eq!(moves_of(&board, "c1", None), sorted(vec![sq("d2"), sq("b2"), sq("a3")]));
    }

    #[test]
    fn castling_destinations() {
        let mut board = board_with(&[
            (King, White, "e1"),
            (Rook, White, "a1"),
            (Rook, White, "h1"),
            (King, Black, "e8"),
        ]);
        let king_moves = moves_of(&board, "e1", None);
        assert!(king_moves.contains(&sq("g1")));
        assert!(king_moves.contains(&sq("c1")));

        board.move_piece(sq("e1"), sq("g1"), false, true).unwrap();
        assert_eq!(board.get_piece_at(sq("f1")).unwrap().piece_type, Rook);
        assert!(board.get_piece_at(sq("h1")).is_none());
        assert!(board.get_piece_at(sq("g1")).unwrap().has_moved);
    }

    #[test]
    fn moving_the_rook_disables_castling_for_good() {
        let mut board = board_with(&[
            (King, White, "e1"),
            (Rook, White, "a1"),
            (Rook, White, "h1"),
            (King, Black, "e8"),
        ]);
        board.move_piece(sq("h1"), sq("h2"), false, false).unwrap();
        board.move_piece(sq("h2"), sq("h1"), false, false).unwrap();
        let king_moves = moves_of(&board, "e1", None);
        assert!(!king_moves.contains(&sq("g1")));
        assert!(king_moves.contains(&sq("c1")));

        board.move_piece(sq("e1"), sq("d1"), false, false).unwrap();
        board.move_piece(sq("d1"), sq("e1"), false, false).unwrap();
        assert!(!moves_of(&board, "e1", None).contains(&sq("c1")));
    }

    #[test]
    fn castling_through_an_attacked_square_is_refused() {
        let board = board_with(&[
            (King, White, "e1"),
            (Rook, White, "h1"),
            (King, Black, "e8"),
            (Bishop, Black, "c4"),
        ]);
        // The bishop covers f1
        assert!(!moves_of(&board, "e1", None).contains(&sq("g1")));
    }

    #[test]
    fn en_passant_capture() {
        let mut board = board_with(&[
            (King, White, "e1"),
            (Pawn, White, "e5"),
            (Pawn, Black, "d7"),
            (Knight, Black, "c6"),
            (King, Black, "e8"),
        ]);
        board.move_piece(sq("d7"), sq("d5"), false, false).unwrap();
        let last = LastMove {
            piece_type: Pawn,
            color: Black,
            from: sq("d7"),
            to: sq("d5"),
        };
        assert!(moves_of(&board, "e5", Some(&last)).contains(&sq("d6")));
        // Without the double step context there is no en passant
        assert!(!moves_of(&board, "e5", None).contains(&sq("d6")));

        board.move_piece(sq("e5"), sq("d6"), true, false).unwrap();
        assert!(board.get_piece_at(sq("d5")).is_none());
        assert_eq!(board.get_piece_at(sq("d6")).unwrap().color, White);
        assert_eq!(board.get_piece_at(sq("c6")).unwrap().piece_type, Knight);
        assert_eq!(board.pieces_of(Black).count(), 2);
    }

    #[test]
    fn en_passant_needs_a_double_step() {
        let board = board_with(&[
            (King, White, "e1"),
            (Pawn, White, "e5"),
            (Pawn, Black, "d5"),
            (King, Black, "e8"),
        ]);
        let single_step = LastMove {
            piece_type: Pawn,
            color: Black,
            from: sq("d6"),
            to: sq("d5"),
        };
        assert!(!moves_of(&board, "e5", Some(&single_step)).contains(&sq("d6")));
    }

    #[test]
    fn en_passant_without_a_pawn_is_rejected() {
        let mut board = board_with(&[(King, White, "e1"), (Pawn, White, "e5"), (King, Black, "e8")]);
        let before = board.clone();
        assert_eq!(
            board.move_piece(sq("e5"), sq("d6"), true, false),
            Err(BoardError::EnPassantTargetMissing(sq("d6")))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn invalid_moves_leave_the_board_untouched() {
        let mut board = board_with(&[(King, White, "e1"), (Rook, White, "h1"), (King, Black, "e8")]);
        let before = board.clone();
        assert_eq!(
            board.move_piece(sq("d4"), sq("d5"), false, false),
            Err(BoardError::NoPieceAt(sq("d4")))
        );
        assert_eq!(
            board.move_piece(sq("e1"), sq("c1"), false, true),
            Err(BoardError::CastlingRookUnavailable(sq("a1")))
        );
        assert_eq!(
            board.move_piece(sq("e1"), sq("h1"), false, false),
            Err(BoardError::DestinationOccupied(sq("h1")))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn promotion_to_queen() {
        let mut board = board_with(&[(King, White, "e1"), (Pawn, White, "b7"), (Rook, Black, "a8"), (King, Black, "h8")]);
        board.move_piece(sq("b7"), sq("a8"), false, false).unwrap();
        let promoted = board.get_piece_at(sq("a8")).unwrap();
        assert_eq!((promoted.piece_type, promoted.color), (Queen, White));
        assert!(board.pieces().iter().all(|p| p.piece_type != Pawn));
        assert_eq!(board.pieces().len(), 3);

        let mut board = board_with(&[(King, White, "e1"), (Pawn, Black, "c2"), (King, Black, "h8")]);
        board.move_piece(sq("c2"), sq("c1"), false, false).unwrap();
        assert_eq!(board.get_piece_at(sq("c1")).unwrap().piece_type, Queen);
        assert_eq!(board.get_piece_at(sq("c1")).unwrap().color, Black);
    }

    #[test]
    fn insufficient_material() {
        let kings = [(King, White, "e1"), (King, Black, "e8")];
        let with = |extra: &[(PieceType, Color, &'static str)]| {
            let mut all = kings.to_vec();
            all.extend_from_slice(extra);
            board_with(&all)
        };

        assert!(with(&[]).is_insufficient_material());
        assert!(with(&[(Bishop, White, "c1")]).is_insufficient_material());
        assert!(with(&[(Knight, Black, "g8")]).is_insufficient_material());
        // c1 and f8 are both dark squares
        assert!(with(&[(Bishop, White, "c1"), (Bishop, Black, "f8")]).is_insufficient_material());
        // c1 is dark, c8 is light
        assert!(!with(&[(Bishop, White, "c1"), (Bishop, Black, "c8")]).is_insufficient_material());
        assert!(!with(&[(Pawn, White, "a2"), (Pawn, White, "b2")]).is_insufficient_material());
        assert!(!with(&[(Rook, White, "a1")]).is_insufficient_material());
        assert!(!with(&[(Knight, White, "b1"), (Knight, Black, "b8")]).is_insufficient_material());
        assert!(!Board::new().is_insufficient_material());
    }

    #[test]
    fn missing_king_is_never_in_check() {
        let board = board_with(&[(Rook, Black, "e8"), (King, Black, "a8")]);
        assert!(!board.is_king_in_check(White));
    }

    #[test]
    fn stalemate_and_checkmate_predicates() {
        // Black king cornered by a queen, not in check
        let stalemate = board_with(&[(King, White, "f7"), (Queen, White, "g6"), (King, Black, "h8")]);
        assert!(!stalemate.is_king_in_check(Black));
        assert!(!stalemate.has_valid_moves(Black, None));

        let mate = board_with(&[(King, White, "f6"), (Queen, White, "g7"), (King, Black, "h8")]);
        assert!(mate.is_king_in_check(Black));
        assert!(!mate.has_valid_moves(Black, None));
    }
}
