use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};

use crate::board::Board;
use crate::evaluation::{Evaluation, Score};
use crate::history::LastMove;
use crate::move_generator::{generate, play_on_copy};
use crate::piece::Color;
use crate::r#move::Move;
use crate::uci::{UCICommand, UCI};

pub const MAX_DEPTH: i8 = 6;

/// Groups together what a search needs to know besides the position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    pub depth: i8,
    pub color: Color,
}
impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            depth: 3,
            color: Color::Black,
        }
    }
}
impl SearchOptions {
    /// Depth is kept within `1..=MAX_DEPTH`
    pub fn set_depth(&mut self, value: i8) -> &mut Self {
        self.depth = value.clamp(1, MAX_DEPTH);
        self
    }
    pub fn set_color(&mut self, value: Color) -> &mut Self {
        self.color = value;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Search {
    pub finished: bool,
    /// `None` when the searching side has no legal move
    pub best_move: Option<Move>,
    pub score: Score,
    pub nodes_searched: u128,
    pub time: Duration,
    pub depth: i8,
}
impl Display for Search {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nps = if self.time.is_zero() {
            self.nodes_searched as u64
        } else {
            ((self.nodes_searched as f64) / self.time.as_secs_f64()) as u64
        };
        write!(
            f,
            "depth {} time {} nodes {} nps {} score ",
            self.depth,
            self.time.as_millis(),
            self.nodes_searched,
            nps
        )?;
        if Evaluation::is_mate_score(self.score) {
            // The score carries the depth left when the mate was found
            let plies = Score::from(self.depth) - (self.score.abs() - Evaluation::MATE_SCORE);
            let moves = (plies + 1) / 2;
            write!(f, "mate {}", if self.score < 0 { -moves } else { moves })?;
        } else {
            write!(f, "cp {}", self.score)?;
        }
        if let Some(mv) = self.best_move {
            write!(f, " pv {}", mv)?;
        }
        Ok(())
    }
}
impl Default for Search {
    fn default() -> Self {
        Search {
            finished: false,
            best_move: None,
            score: -Evaluation::INFINITY,
            nodes_searched: 0,
            time: Duration::ZERO,
            depth: 0,
        }
    }
}

/// Searches `board` for the move of `options.color`, to `options.depth` plies.
/// The board is only read, every line is explored on copies.
pub fn best_move(board: &Board, last_move: Option<&LastMove>, options: &SearchOptions) -> Search {
    let never_stop = AtomicBool::new(false);
    search_root(board, last_move, options, &never_stop)
}

pub struct SearchFramework {
    result: Option<Arc<Mutex<Search>>>,
    worker: Option<Worker>,
    report: bool,
}
impl Default for SearchFramework {
    fn default() -> Self {
        Self::new()
    }
}
impl SearchFramework {
    pub fn new() -> SearchFramework {
        SearchFramework {
            result: None,
            worker: None,
            report: false,
        }
    }

    /// When set, a finished search prints its `info` and `bestmove` lines
    /// from the worker thread
    pub fn set_reporting(&mut self, value: bool) -> &mut Self {
        self.report = value;
        self
    }

    pub fn is_searching(&self) -> bool {
        self.result.is_some()
    }

    /// Starts a search on a snapshot of `board` in a background thread.
    /// Does nothing if a search is already running.
    pub fn run_search(&mut self, board: &Board, last_move: Option<&LastMove>, options: &SearchOptions) {
        // A search is currently running
        if self.result.is_some() {
            debug!("a search is already running, ignoring the request");
            return;
        }
        let result = Arc::new(Mutex::new(Search::default()));
        self.worker = Some(new_worker(board, last_move, options, &result, self.report));
        self.result = Some(result);
    }

    /// Returns a result if and only if the current search is finished
    pub fn probe_search(&mut self) -> Option<Search> {
        let is_finished = match &self.result {
            Some(result_lock) => result_lock.lock().map(|r| r.finished).unwrap_or(false),
            None => false,
        };

        if is_finished {
            self.take_result()
        } else {
            None
        }
    }

    /// Blocks until the current search is over
    pub fn wait_search(&mut self) -> Option<Search> {
        self.take_result()
    }

    /// Interrupts the current search. An interrupted search has no usable
    /// result; only a search that had already finished is returned.
    pub fn stop_search(&mut self) -> Option<Search> {
        if let Some(worker) = &self.worker {
            worker.stop_handle.store(true, Ordering::SeqCst);
        }
        self.wait_search().filter(|search| search.finished)
    }

    /// Joins the worker, then hands out its result
    fn take_result(&mut self) -> Option<Search> {
        if let Some(worker) = self.worker.take() {
            if worker.handle.join().is_err() {
                warn!("search thread panicked");
            }
        }
        let result_lock = self.result.take()?;
        let search = match result_lock.lock() {
            Ok(result_ptr) => result_ptr.clone(),
            Err(_) => return None,
        };
        Some(search)
    }
}

/// A thread running one search, with an atomic handle to stop it
struct Worker {
    pub handle: JoinHandle<()>,
    pub stop_handle: Arc<AtomicBool>,
}
fn new_worker(
    board: &Board,
    last_move: Option<&LastMove>,
    options: &SearchOptions,
    result: &Arc<Mutex<Search>>,
    report: bool,
) -> Worker {
    let stop_handle = Arc::new(AtomicBool::new(false));

    let internal_board = board.clone();
    let internal_last_move = last_move.copied();
    let internal_options = options.clone();
    let thread_result = Arc::clone(result);
    let stop_signal = Arc::clone(&stop_handle);
    let handle = thread::spawn(move || {
        let search = search_root(
            &internal_board,
            internal_last_move.as_ref(),
            &internal_options,
            &stop_signal,
        );
        if report && search.finished {
            UCI::send(UCICommand::Info(&search));
            UCI::send(UCICommand::BestMove(search.best_move.as_ref()));
        }
        if let Ok(mut res) = thread_result.lock() {
            *res = search;
        }
    });

    Worker { handle, stop_handle }
}

struct SearchContext<'a> {
    pub nodes_searched: u128,
    pub stop_signal: &'a AtomicBool,
}
impl SearchContext<'_> {
    fn should_stop(&self) -> bool {
        self.stop_signal.load(Ordering::Relaxed)
    }
}

fn search_root(
    board: &Board,
    last_move: Option<&LastMove>,
    options: &SearchOptions,
    stop_signal: &AtomicBool,
) -> Search {
    let start = Instant::now();
    let depth = options.depth.clamp(1, MAX_DEPTH);
    let mut context = SearchContext {
        nodes_searched: 0,
        stop_signal,
    };

    let root_moves = generate(board, options.color, last_move);
    if root_moves.is_empty() {
        let score = if board.is_king_in_check(options.color) {
            -(Evaluation::MATE_SCORE + Score::from(depth))
        } else {
            Evaluation::DRAW_SCORE
        };
        debug!("{:?} has no legal move, score {}", options.color, score);
        return Search {
            finished: true,
            score,
            time: start.elapsed(),
            depth,
            ..Default::default()
        };
    }

    let (mut alpha, beta) = (-Evaluation::INFINITY, Evaluation::INFINITY);
    let mut best = None;
    for mv in root_moves.best_first_iter(&order_moves) {
        let child = match play_on_copy(board, mv) {
            Some(child) => child,
            None => continue,
        };
        let score = -negamax(
            &child,
            options.color.opposite(),
            Some(&mv.to_last_move()),
            depth - 1,
            -beta,
            -alpha,
            &mut context,
        );
        if context.should_stop() {
            debug!("search stopped after {} nodes", context.nodes_searched);
            return Search {
                nodes_searched: context.nodes_searched,
                time: start.elapsed(),
                depth,
                ..Default::default()
            };
        }
        trace!("root move {} scored {}", mv, score);
        // Strict comparison, the first move found wins ties
        if score > alpha {
            alpha = score;
            best = Some(*mv);
        }
    }

    let search = Search {
        finished: true,
        best_move: best,
        score: alpha,
        nodes_searched: context.nodes_searched,
        time: start.elapsed(),
        depth,
    };
    info!("{}", search);
    search
}

/// Negamax with alpha-beta pruning. Scores are from the point of view of
/// `color`, the side to move on `board`.
fn negamax(
    board: &Board,
    color: Color,
    last_move: Option<&LastMove>,
    depth: i8,
    mut alpha: Score,
    beta: Score,
    context: &mut SearchContext,
) -> Score {
    context.nodes_searched += 1;
    if context.should_stop() {
        return 0;
    }

    if depth <= 0 || board.is_insufficient_material() {
        return Evaluation::evaluate(board, color);
    }

    let moves = generate(board, color, last_move);
    if moves.is_empty() {
        return if board.is_king_in_check(color) {
            // Mates closer to the root keep more depth, hence score further
            -(Evaluation::MATE_SCORE + Score::from(depth))
        } else {
            Evaluation::DRAW_SCORE
        };
    }

    let mut best_score = -Evaluation::INFINITY;
    for mv in moves.best_first_iter(&order_moves) {
        let child = match play_on_copy(board, mv) {
            Some(child) => child,
            None => continue,
        };
        let score = -negamax(
            &child,
            color.opposite(),
            Some(&mv.to_last_move()),
            depth - 1,
            -beta,
            -alpha,
            context,
        );
        if score > best_score {
            best_score = score;
        }
        if best_score > alpha {
            alpha = best_score;
        }
        if alpha >= beta {
            break;
        }
    }
    best_score
}

/// Captures, then castling, then promotions; everything else keeps its
/// generation order
fn order_moves(mv: &Move) -> Score {
    let mut score = 0;
    if mv.capture {
        score += 1000;
    }
    if mv.is_castling() {
        score += 900;
    }
    if mv.promotion {
        score += 800;
    }
    score
}
