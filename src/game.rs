use std::fmt::{Display, Formatter};

use log::{debug, info};

use crate::board::Board;
use crate::error::{FenError, GameError};
use crate::fen::Position;
use crate::history::LastMove;
use crate::piece::{Color, PieceType};
use crate::r#move::Move;
use crate::square::Square;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameResult {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
}
impl Display for GameResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::Checkmate { winner: Color::White } => write!(f, "checkmate, white wins"),
            GameResult::Checkmate { winner: Color::Black } => write!(f, "checkmate, black wins"),
            GameResult::Stalemate => write!(f, "stalemate, draw"),
            GameResult::InsufficientMaterial => write!(f, "insufficient material, draw"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameState {
    Playing,
    GameOver(GameResult),
}

/// One game: the authoritative board, whose turn it is and the move that
/// led here. Moves only reach the board through `play`, which checks them
/// against the legal moves first.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    last_move: Option<LastMove>,
    state: GameState,
    history: Vec<Move>,
    /// Plies since the last pawn move or capture, kept for FEN only
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Game {
        Game {
            board: Board::new(),
            side_to_move: Color::White,
            last_move: None,
            state: GameState::Playing,
            history: vec![],
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Starts from an arbitrary position. The position may already be over.
    pub fn from_fen(fen: &str) -> Result<Game, FenError> {
        let position = Position::from_fen(fen)?;
        let mut game = Game {
            board: position.board,
            side_to_move: position.side_to_move,
            last_move: position.last_move,
            state: GameState::Playing,
            history: vec![],
            halfmove_clock: position.halfmove_clock,
            fullmove_number: position.fullmove_number,
        };
        game.update_state();
        Ok(game)
    }

    pub fn reset(&mut self) {
        *self = Game::new();
        info!("game has been reset");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn last_move(&self) -> Option<&LastMove> {
        self.last_move.as_ref()
    }
    pub fn state(&self) -> GameState {
        self.state
    }
    pub fn history(&self) -> &[Move] {
        &self.history
    }
    pub fn is_over(&self) -> bool {
        self.state != GameState::Playing
    }

    pub fn to_position(&self) -> Position {
        Position {
            board: self.board.clone(),
            side_to_move: self.side_to_move,
            last_move: self.last_move,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Legal destinations of the piece on `sq`, empty unless it belongs to
    /// the side to move
    pub fn valid_moves_from(&self, sq: Square) -> Vec<Square> {
        match self.board.get_piece_at(sq) {
            Some(piece) if piece.color == self.side_to_move && !self.is_over() => {
                self.board.valid_moves(piece, self.last_move.as_ref())
            }
            _ => vec![],
        }
    }

    /// Plays the piece on `from` to `to`. En passant and castling are
    /// recognised from the shape of the move.
    pub fn play(&mut self, from: Square, to: Square) -> Result<Move, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let piece = *self.board.get_piece_at(from).ok_or(GameError::NoPieceAt(from))?;
        if piece.color != self.side_to_move {
            return Err(GameError::WrongSide(from));
        }
        if !self.board.valid_moves(&piece, self.last_move.as_ref()).contains(&to) {
            return Err(GameError::IllegalMove { from, to });
        }

        let mv = Move::new(&self.board, &piece, to);
        self.board.move_piece(from, to, mv.en_passant, mv.is_castling())?;
        debug!("{:?} played {}", self.side_to_move, mv);

        if mv.piece_type == PieceType::Pawn || mv.capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.last_move = Some(mv.to_last_move());
        self.history.push(mv);
        self.side_to_move = self.side_to_move.opposite();
        self.update_state();
        Ok(mv)
    }

    /// Plays a move coming from the search through the same checks as a
    /// human move
    pub fn apply(&mut self, mv: &Move) -> Result<Move, GameError> {
        self.play(mv.from, mv.to)
    }

    /// Looks for the end of the game from the point of view of the side
    /// about to move
    fn update_state(&mut self) {
        let side = self.side_to_move;
        let result = if self.board.is_insufficient_material() {
            Some(GameResult::InsufficientMaterial)
        } else if !self.board.has_valid_moves(side, self.last_move.as_ref()) {
            if self.board.is_king_in_check(side) {
                Some(GameResult::Checkmate {
                    winner: side.opposite(),
                })
            } else {
                Some(GameResult::Stalemate)
            }
        } else {
            None
        };

        if let Some(result) = result {
            info!("game over: {}", result);
            self.state = GameState::GameOver(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceType::{Pawn, Rook};
    use crate::search::{best_move, SearchOptions};

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    fn play_all(game: &mut Game, moves: &[&str]) {
        for mv in moves {
            let (from, to) = Move::parse(mv).unwrap();
            game.play(from, to).unwrap();
        }
    }

    #[test]
    fn fools_mate() {
        let mut game = Game::new();
        play_all(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(
            game.state(),
            GameState::GameOver(GameResult::Checkmate { winner: Color::Black })
        );
        assert_eq!(game.play(sq("a2"), sq("a3")), Err(GameError::GameOver));
        assert!(game.valid_moves_from(sq("a2")).is_empty());
        assert_eq!(game.history().len(), 4);
    }

    #[test]
    fn rejected_moves_leave_the_game_untouched() {
        let mut game = Game::new();
        assert_eq!(game.play(sq("e7"), sq("e5")), Err(GameError::WrongSide(sq("e7"))));
        assert_eq!(game.play(sq("e4"), sq("e5")), Err(GameError::NoPieceAt(sq("e4"))));
        assert_eq!(
            game.play(sq("e2"), sq("e5")),
            Err(GameError::IllegalMove { from: sq("e2"), to: sq("e5") })
        );
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.side_to_move(), Color::White);
        assert!(game.history().is_empty());
    }

    #[test]
    fn stalemate_ends_the_game() {
        let mut game = Game::from_fen("k7/8/1K6/2Q5/8/8/8/8 w - - 0 1").unwrap();
        play_all(&mut game, &["c5c7"]);
        assert_eq!(game.state(), GameState::GameOver(GameResult::Stalemate));
    }

    #[test]
    fn capturing_the_last_piece_draws() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1").unwrap();
        play_all(&mut game, &["e1d2"]);
        assert_eq!(game.state(), GameState::GameOver(GameResult::InsufficientMaterial));
    }

    #[test]
    fn en_passant_is_recognised() {
        let mut game = Game::new();
        play_all(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);
        assert!(game.valid_moves_from(sq("e5")).contains(&sq("d6")));
        let mv = game.play(sq("e5"), sq("d6")).unwrap();
        assert!(mv.en_passant && mv.capture);
        assert!(game.board().get_piece_at(sq("d5")).is_none());
        assert_eq!(game.board().get_piece_at(sq("d6")).unwrap().piece_type, Pawn);
        assert_eq!(game.board().pieces_of(Color::Black).count(), 15);
    }

    #[test]
    fn castling_is_recognised() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play_all(&mut game, &["e1g1", "e8c8"]);
        assert_eq!(game.board().get_piece_at(sq("f1")).unwrap().piece_type, Rook);
        assert_eq!(game.board().get_piece_at(sq("d8")).unwrap().piece_type, Rook);
        assert!(game.board().get_piece_at(sq("h1")).is_none());
        assert!(game.board().get_piece_at(sq("a8")).is_none());
    }

    #[test]
    fn move_counters_survive_a_fen_round_trip() {
        let fen = "4k3/8/8/8/8/8/8/Q3K3 b - - 4 40";
        let mut game = Game::from_fen(fen).unwrap();
        assert_eq!(game.to_position().to_fen(), fen);

        // Black's quiet move ticks both counters
        play_all(&mut game, &["e8d7"]);
        assert_eq!(game.to_position().to_fen(), "8/3k4/8/8/8/8/8/Q3K3 w - - 5 41");
        // White's quiet move only ticks the halfmove clock
        play_all(&mut game, &["a1a2"]);
        assert_eq!(game.to_position().to_fen(), "8/3k4/8/8/8/8/Q7/4K3 b - - 6 41");
    }

    #[test]
    fn pawn_moves_and_captures_reset_the_halfmove_clock() {
        let mut game = Game::new();
        play_all(&mut game, &["g1f3", "b8c6"]);
        assert_eq!(game.to_position().halfmove_clock, 2);
        assert_eq!(game.to_position().fullmove_number, 2);
        play_all(&mut game, &["e2e4"]);
        assert_eq!(game.to_position().halfmove_clock, 0);
        play_all(&mut game, &["c6d4", "f3d4"]);
        assert_eq!(game.to_position().halfmove_clock, 0);
        assert_eq!(game.to_position().fullmove_number, 3);
    }

    #[test]
    fn reset_starts_over() {
        let mut game = Game::new();
        play_all(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        game.reset();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.last_move(), None);
        assert_eq!(game.to_position().to_fen(), crate::fen::STARTING_FEN);
    }

    #[test]
    fn engine_moves_go_through_the_game() {
        let mut game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut options = SearchOptions::default();
        options.set_color(Color::White).set_depth(2);
        let search = best_move(game.board(), game.last_move(), &options);
        game.apply(&search.best_move.unwrap()).unwrap();
        assert_eq!(
            game.state(),
            GameState::GameOver(GameResult::Checkmate { winner: Color::White })
        );
    }
}
