use crate::square::Square;
use thiserror::Error;

/// Errors raised by board mutations. Every check happens before the board
/// is touched, so a failed move leaves the position unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("no piece on {0}")]
    NoPieceAt(Square),

    #[error("square ({x}, {y}) is off the board")]
    OutOfBounds { x: i8, y: i8 },

    #[error("{0} is already occupied")]
    SquareOccupied(Square),

    #[error("{0} is occupied by a piece of the moving side")]
    DestinationOccupied(Square),

    #[error("en passant capture onto {0} failed: no opposing pawn to take")]
    EnPassantTargetMissing(Square),

    #[error("castling towards {0} failed: rook missing or already moved")]
    CastlingRookUnavailable(Square),

    #[error("{from}{to} is not a castling move")]
    NotACastlingMove { from: Square, to: Square },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN must have at least 4 fields, found {0}")]
    TooFewFields(usize),

    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),

    #[error("rank {0} does not describe exactly 8 files")]
    BadRankLength(usize),

    #[error("expected 8 ranks, found {0}")]
    BadRankCount(usize),

    #[error("invalid side to move '{0}'")]
    InvalidSideToMove(String),

    #[error("invalid en passant square '{0}'")]
    InvalidEnPassant(String),

    #[error(transparent)]
    Board(#[from] BoardError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("the game is over")]
    GameOver,

    #[error("no piece on {0}")]
    NoPieceAt(Square),

    #[error("the piece on {0} does not belong to the side to move")]
    WrongSide(Square),

    #[error("illegal move {from}{to}")]
    IllegalMove { from: Square, to: Square },

    #[error(transparent)]
    Board(#[from] BoardError),
}
