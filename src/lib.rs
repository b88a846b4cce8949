use std::time::Instant;

use crate::error::FenError;
use crate::fen::{Position, STARTING_FEN};
use crate::move_generator::perft as count_nodes;

pub mod board;
pub mod castling;
pub mod error;
pub mod evaluation;
pub mod fen;
pub mod game;
pub mod history;
pub mod r#move;
pub mod move_generator;
pub mod movelist;
pub mod piece;
pub mod piece_square_tables;
pub mod search;
pub mod square;
pub mod uci;

pub use board::Board;
pub use game::{Game, GameResult, GameState};
pub use piece::{Color, Piece, PieceType};
pub use r#move::Move;
pub use search::{best_move, Search, SearchFramework, SearchOptions};
pub use square::Square;

/// Prints the node counts of every depth up to `depth`, starting from `fen`
/// or the standard starting position
pub fn perft(depth: u32, fen: Option<String>) -> Result<(), FenError> {
    println!("perft");
    let position = Position::from_fen(fen.as_deref().unwrap_or(STARTING_FEN))?;
    println!("{}\n", position.board);
    println!("depth nodes\n--------");
    for d in 0..depth + 1 {
        let start = Instant::now();
        let nodes = count_nodes(
            &position.board,
            position.side_to_move,
            position.last_move.as_ref(),
            d,
        );
        let elapsed = start.elapsed();
        println!(
            "{}     {} ({}s, {} nps)",
            d,
            nodes,
            elapsed.as_secs_f32(),
            nodes as f32 / elapsed.as_secs_f32()
        );
    }
    Ok(())
}
