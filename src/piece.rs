use crate::board::Board;
use crate::piece::Color::{Black, White};
use crate::piece::PieceType::{Bishop, King, Knight, Pawn, Queen, Rook};
use crate::square::Square;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceType {
    /// Sliding pieces see their movement blocked by the first occupied cell
    /// along a ray
    pub fn can_slide(&self) -> bool {
        matches!(self, Bishop | Queen | Rook)
    }
}
impl Display for PieceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Pawn => "p",
                Knight => "n",
                Bishop => "b",
                Rook => "r",
                Queen => "q",
                King => "k",
            }
        )
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            White => Black,
            Black => White,
        }
    }
    /// Row delta of a pawn push
    pub fn forward(&self) -> i8 {
        match self {
            White => -1,
            Black => 1,
        }
    }
    pub fn home_row(&self) -> i8 {
        match self {
            White => 7,
            Black => 0,
        }
    }
    pub fn pawn_row(&self) -> i8 {
        match self {
            White => 6,
            Black => 1,
        }
    }
    pub fn promotion_row(&self) -> i8 {
        match self {
            White => 0,
            Black => 7,
        }
    }
    /// Row a pawn must stand on to capture en passant
    pub fn en_passant_row(&self) -> i8 {
        match self {
            White => 3,
            Black => 4,
        }
    }
}
impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self == &Black { "b" } else { "w" })
    }
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// A piece record. Pieces hold no reference to anything else, so a board
/// is copied by copying its pieces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    pub x: i8,
    pub y: i8,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color, x: i8, y: i8) -> Piece {
        Piece {
            piece_type,
            color,
            x,
            y,
            has_moved: false,
        }
    }

    /// Builds an unmoved piece from its FEN letter (upper case is White)
    pub fn from_char(c: char, square: Square) -> Option<Piece> {
        let piece_type = match c.to_ascii_lowercase() {
            'p' => Pawn,
            'n' => Knight,
            'b' => Bishop,
            'r' => Rook,
            'q' => Queen,
            'k' => King,
            _ => return None,
        };
        let color = if c.is_ascii_lowercase() { Black } else { White };
        Some(Piece::new(piece_type, color, square.x, square.y))
    }

    pub fn square(&self) -> Square {
        Square::new(self.x, self.y)
    }

    pub fn is_sliding(&self) -> bool {
        self.piece_type.can_slide()
    }

    /// Relocates the piece. A piece that moved once stays marked as moved
    pub fn move_to(&mut self, target: Square) {
        self.x = target.x;
        self.y = target.y;
        self.has_moved = true;
    }

    /// Every square the piece could reach on `board`, without caring about
    /// its own king's safety. Castling and en passant are not generated here.
    pub fn potential_moves(&self, board: &Board) -> Vec<Square> {
        match self.piece_type {
            Pawn => self.pawn_moves(board),
            Knight => self.leaper_moves(board, &KNIGHT_OFFSETS),
            King => self.leaper_moves(board, &KING_OFFSETS),
            Bishop => self.slider_moves(board, &BISHOP_DIRECTIONS),
            Rook => self.slider_moves(board, &ROOK_DIRECTIONS),
            Queen => self.slider_moves(board, &QUEEN_DIRECTIONS),
        }
    }

    fn pawn_moves(&self, board: &Board) -> Vec<Square> {
        let mut moves = Vec::with_capacity(4);
        let forward = self.color.forward();

        let one_step = self.square().offset(0, forward);
        if one_step.is_valid() && !board.is_occupied(one_step) {
            moves.push(one_step);

            let two_steps = one_step.offset(0, forward);
            if self.y == self.color.pawn_row() && two_steps.is_valid() && !board.is_occupied(two_steps)
            {
                moves.push(two_steps);
            }
        }

        for dx in [-1, 1] {
            let target = self.square().offset(dx, forward);
            if target.is_valid() && board.is_occupied_by_opponent(target, self.color) {
                moves.push(target);
            }
        }
        moves
    }

    fn leaper_moves(&self, board: &Board, offsets: &[(i8, i8)]) -> Vec<Square> {
        offsets
            .iter()
            .map(|&(dx, dy)| self.square().offset(dx, dy))
            .filter(|target| target.is_valid())
            .filter(|target| match board.get_piece_at(*target) {
                Some(p) => p.color != self.color,
                None => true,
            })
            .collect()
    }

    fn slider_moves(&self, board: &Board, directions: &[(i8, i8)]) -> Vec<Square> {
        let mut moves = Vec::with_capacity(27);
        for &(dx, dy) in directions {
            let mut target = self.square().offset(dx, dy);
            while target.is_valid() {
                if let Some(occupant) = board.get_piece_at(target) {
                    if occupant.color != self.color {
                        moves.push(target);
                    }
                    break;
                }
                moves.push(target);
                target = target.offset(dx, dy);
            }
        }
        moves
    }

    /// Whether this piece controls `target`. Pawns control their forward
    /// diagonals whether or not something stands there, and never control
    /// the cells they push to. Sliders need a clear path.
    pub fn attacks(&self, board: &Board, target: Square) -> bool {
        let (dx, dy) = (target.x - self.x, target.y - self.y);
        if dx == 0 && dy == 0 {
            return false;
        }
        let aligned = match self.piece_type {
            Pawn => return dy == self.color.forward() && dx.abs() == 1,
            Knight => return KNIGHT_OFFSETS.contains(&(dx, dy)),
            King => return dx.abs() <= 1 && dy.abs() <= 1,
            Bishop => dx.abs() == dy.abs(),
            Rook => dx == 0 || dy == 0,
            Queen => dx.abs() == dy.abs() || dx == 0 || dy == 0,
        };
        aligned && board.is_path_clear(self.square(), target)
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = self.piece_type.to_string();
        write!(
            f,
            "{}",
            if self.color == White {
                s.to_uppercase()
            } else {
                s
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut squares: Vec<Square>) -> Vec<Square> {
        squares.sort();
        squares
    }

    #[test]
    fn pawn_pushes_and_double_step() {
        let mut board = Board::empty();
        board.add_piece(Piece::new(Pawn, White, 4, 6)).unwrap();
        let pawn = *board.get_piece_at(Square::new(4, 6)).unwrap();
        assert_eq!(
            sorted(pawn.potential_moves(&board)),
            sorted(vec![Square::new(4, 5), Square::new(4, 4)])
        );

        // Blocked two squares ahead: only the single step remains
        board.add_piece(Piece::new(Knight, Black, 4, 4)).unwrap();
        assert_eq!(pawn.potential_moves(&board), vec![Square::new(4, 5)]);

        // Blocked right in front: nothing at all
        board.add_piece(Piece::new(Knight, Black, 4, 5)).unwrap();
        assert!(pawn.potential_moves(&board).is_empty());
    }

    #[test]
    fn pawn_only_captures_opponents_diagonally() {
        let mut board = Board::empty();
        board.add_piece(Piece::new(Pawn, Black, 3, 3)).unwrap();
        board.add_piece(Piece::new(Rook, White, 2, 4)).unwrap();
        board.add_piece(Piece::new(Rook, Black, 4, 4)).unwrap();
        let pawn = *board.get_piece_at(Square::new(3, 3)).unwrap();
        assert_eq!(
            sorted(pawn.potential_moves(&board)),
            sorted(vec![Square::new(3, 4), Square::new(2, 4)])
        );
        assert!(pawn.attacks(&board, Square::new(4, 4)));
        assert!(!pawn.attacks(&board, Square::new(3, 4)));
    }

    #[test]
    fn knight_in_the_corner() {
        let mut board = Board::empty();
        board.add_piece(Piece::new(Knight, White, 0, 7)).unwrap();
        board.add_piece(Piece::new(Pawn, White, 2, 6)).unwrap();
        let knight = *board.get_piece_at(Square::new(0, 7)).unwrap();
        assert_eq!(knight.potential_moves(&board), vec![Square::new(1, 5)]);
    }

    #[test]
    fn king_has_eight_neighbours_in_the_open() {
        let mut board = Board::empty();
        board.add_piece(Piece::new(King, Black, 3, 3)).unwrap();
        let king = *board.get_piece_at(Square::new(3, 3)).unwrap();
        assert_eq!(king.potential_moves(&board).len(), 8);
    }

    #[test]
    fn sliders_stop_at_the_first_obstruction() {
        let mut board = Board::empty();
        board.add_piece(Piece::new(Rook, White, 0, 7)).unwrap();
        board.add_piece(Piece::new(Pawn, White, 0, 4)).unwrap();
        board.add_piece(Piece::new(Knight, Black, 3, 7)).unwrap();
        let rook = *board.get_piece_at(Square::new(0, 7)).unwrap();
        assert_eq!(
            sorted(rook.potential_moves(&board)),
            sorted(vec![
                Square::new(0, 6),
                Square::new(0, 5),
                Square::new(1, 7),
                Square::new(2, 7),
                Square::new(3, 7),
            ])
        );
        assert!(rook.attacks(&board, Square::new(3, 7)));
        assert!(!rook.attacks(&board, Square::new(4, 7)));
        assert!(!rook.attacks(&board, Square::new(0, 3)));
    }

    #[test]
    fn queen_covers_both_ray_sets() {
        let mut board = Board::empty();
        board.add_piece(Piece::new(Queen, White, 3, 4)).unwrap();
        let queen = *board.get_piece_at(Square::new(3, 4)).unwrap();
        assert_eq!(queen.potential_moves(&board).len(), 27);
    }

    #[test]
    fn moving_marks_the_piece() {
        let mut piece = Piece::new(Rook, Black, 7, 0);
        assert!(!piece.has_moved);
        piece.move_to(Square::new(7, 3));
        assert_eq!(piece.square(), Square::new(7, 3));
        assert!(piece.has_moved);
    }

    #[test]
    fn fen_letters() {
        let p = Piece::from_char('N', Square::new(1, 7)).unwrap();
        assert_eq!((p.piece_type, p.color), (Knight, White));
        assert_eq!(p.to_string(), "N");
        assert_eq!(Piece::from_char('q', Square::new(3, 0)).unwrap().to_string(), "q");
        assert!(Piece::from_char('x', Square::new(0, 0)).is_none());
    }
}
