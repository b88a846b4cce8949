use crate::error::{FenError, GameError};
use crate::game::{Game, GameState};
use crate::piece::Color;
use crate::r#move::Move;
use crate::search::{best_move, Search, SearchFramework, SearchOptions, MAX_DEPTH};
use crate::square::Square;

use log::{info, warn};
use regex::Regex;
use rustyline::config::Configurer;
use rustyline::Editor;
use std::collections::HashMap;
use std::fmt::{Display, Error, Formatter};

const ARGS_PATTERN: &str = r#"(".*?"|[^"\s]+)"#;

/// A line oriented console speaking a subset of UCI, plus a few commands to
/// play a game against the engine from a terminal
pub struct UCI {
    game: Game,
    search_framework: SearchFramework,
    options: HashMap<String, UCIOption>,
}
impl Default for UCI {
    fn default() -> Self {
        let mut search_framework = SearchFramework::new();
        search_framework.set_reporting(true);
        UCI {
            game: Game::new(),
            search_framework,
            options: HashMap::from([
                (
                    "Depth".to_string(),
                    UCIOption::IntValue {
                        name: "Depth".to_string(),
                        value: 3,
                        default: 3,
                        min: 1,
                        max: MAX_DEPTH as i32,
                    },
                ),
                (
                    "EngineColor".to_string(),
                    UCIOption::StringChoice {
                        name: "EngineColor".to_string(),
                        value: "black".to_string(),
                        default: "black".to_string(),
                        possible_values: vec!["white".to_string(), "black".to_string()],
                    },
                ),
            ]),
        }
    }
}

impl UCI {
    pub fn run(&mut self) {
        let mut editor = Editor::<()>::new();
        editor.set_auto_add_history(true);
        editor.set_check_cursor_position(true);

        while let Ok(line) = editor.readline("gambit> ") {
            match self.handle_command(&line) {
                Ok(UCIOkCode::ShouldQuit) => break,
                Err(UCIErrCode::BadCommand(cmd)) => {
                    eprintln!("Unknown or badly formed command: {}", cmd)
                }
                Err(UCIErrCode::BadMove(mv)) => {
                    eprintln!("Badly formatted or illegal move: {}", mv)
                }
                Err(UCIErrCode::MissingArg(arg)) => {
                    eprintln!("Missing an argument: {} {} <- here", line.trim(), arg)
                }
                Err(UCIErrCode::BadFen(e)) => eprintln!("Invalid position: {}", e),
                Err(UCIErrCode::Game(e)) => eprintln!("{}", e),
                Err(UCIErrCode::Internal(e)) => eprintln!("Internal error: {}", e),
                _ => (),
            }
        }
        self.search_framework.stop_search();
    }

    fn handle_command(&mut self, line: &str) -> Result<UCIOkCode, UCIErrCode> {
        let args_regex = Regex::new(ARGS_PATTERN).map_err(|e| UCIErrCode::Internal(e.to_string()))?;
        let mut args = args_regex.find_iter(line).map(|m| m.as_str());
        let cmd = if let Some(c) = args.next() {
            c
        } else {
            return Err(UCIErrCode::NoCommand);
        };
        // Releases a search that finished since the last command
        self.search_framework.probe_search();

        match cmd {
            "uci" => {
                Self::send(UCICommand::Id);
                let mut names: Vec<&String> = self.options.keys().collect();
                names.sort();
                for name in names {
                    if let Some(option) = self.options.get(name) {
                        Self::send(UCICommand::UciOption(option));
                    }
                }
                Self::send(UCICommand::UciOk);
            }
            "isready" => Self::send(UCICommand::ReadyOk),
            "setoption" => {
                let option_name = if let Some("name") = args.next() {
                    args.next().unwrap_or("")
                } else {
                    ""
                };
                let option_value = match args.nth(1) {
                    Some(v) => v,
                    None => return Err(UCIErrCode::MissingArg(String::from("value <value>"))),
                };
                match self.options.get_mut(option_name) {
                    Some(option) => option.set_value(option_value),
                    None => return Err(UCIErrCode::BadCommand(format!("setoption {}", option_name))),
                }
            }
            "ucinewgame" => {
                self.search_framework.stop_search();
                self.game.reset();
            }
            "position" => {
                let mut game = match args.next() {
                    Some("startpos") => Game::new(),
                    Some("fen") => {
                        let fen: Vec<&str> = args.by_ref().take_while(|a| *a != "moves").collect();
                        Game::from_fen(&fen.join(" ").replace('"', ""))?
                    }
                    Some(fen) => Game::from_fen(&fen.replace('"', ""))?,
                    None => return Err(UCIErrCode::MissingArg(String::from("<startpos | fen>"))),
                };
                for mv in args.filter(|a| *a != "moves") {
                    let (from, to) = Move::parse(mv).ok_or_else(|| UCIErrCode::BadMove(mv.to_string()))?;
                    if game.play(from, to).is_err() {
                        return Err(UCIErrCode::BadMove(String::from(mv)));
                    }
                }
                self.game = game;
            }
            "go" => {
                let mut options = self.search_options(self.game.side_to_move());
                if let Some("depth") = args.next() {
                    let depth = args
                        .next()
                        .and_then(|d| d.parse::<i8>().ok())
                        .ok_or_else(|| UCIErrCode::MissingArg(String::from("<depth>")))?;
                    options.set_depth(depth);
                }
                self.search_framework
                    .run_search(self.game.board(), self.game.last_move(), &options);
            }
            "stop" => {
                if self.search_framework.stop_search().is_none() {
                    info!("search interrupted, no move to report");
                }
            }
            // Commands that are not part of the UCI protocol
            "play" => {
                let mv = args.next().ok_or_else(|| UCIErrCode::MissingArg(String::from("<move>")))?;
                let (from, to) = Move::parse(mv).ok_or_else(|| UCIErrCode::BadMove(mv.to_string()))?;
                self.search_framework.stop_search();
                self.game.play(from, to)?;
                if !self.game.is_over() && self.game.side_to_move() == self.engine_color() {
                    self.engine_reply()?;
                }
                self.print_status();
            }
            "moves" => {
                let sq = args
                    .next()
                    .and_then(Square::parse)
                    .ok_or_else(|| UCIErrCode::MissingArg(String::from("<square>")))?;
                let destinations: Vec<String> = self
                    .game
                    .valid_moves_from(sq)
                    .iter()
                    .map(|target| target.to_string())
                    .collect();
                println!("{}", destinations.join(" "));
            }
            "status" => self.print_status(),
            "show" => {
                println!("{}", self.game.board());
                println!("{}", self.game.to_position().to_fen());
            }
            "quit" => return Ok(UCIOkCode::ShouldQuit),
            _ => return Err(UCIErrCode::BadCommand(String::from(cmd))),
        }

        Ok(UCIOkCode::OkCommand)
    }

    /// Searches the engine's move in the foreground and plays it
    fn engine_reply(&mut self) -> Result<(), UCIErrCode> {
        let options = self.search_options(self.engine_color());
        let search = best_move(self.game.board(), self.game.last_move(), &options);
        Self::send(UCICommand::Info(&search));
        if let Some(mv) = search.best_move {
            self.game.apply(&mv)?;
        }
        Self::send(UCICommand::BestMove(search.best_move.as_ref()));
        Ok(())
    }

    fn print_status(&self) {
        match self.game.state() {
            GameState::Playing => {
                let side = self.game.side_to_move();
                let check = if self.game.board().is_king_in_check(side) {
                    ", in check"
                } else {
                    ""
                };
                println!("{:?} to move{}", side, check)
            }
            GameState::GameOver(result) => println!("game over: {}", result),
        }
    }

    fn search_options(&self, color: Color) -> SearchOptions {
        let mut options = SearchOptions::default();
        if let Some(UCIOption::IntValue { value, .. }) = self.options.get("Depth") {
            options.set_depth(*value as i8);
        }
        options.set_color(color);
        options
    }

    fn engine_color(&self) -> Color {
        match self.options.get("EngineColor") {
            Some(UCIOption::StringChoice { value, .. }) if value == "white" => Color::White,
            _ => Color::Black,
        }
    }

    pub fn send(command: UCICommand) {
        match command {
            UCICommand::Id => println!(
                "id name Gambit {}\nid author {}",
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_AUTHORS")
            ),
            UCICommand::UciOk => println!("uciok"),
            UCICommand::ReadyOk => println!("readyok"),
            UCICommand::BestMove(Some(mv)) => println!("bestmove {}", mv),
            UCICommand::BestMove(None) => println!("bestmove 0000"),
            UCICommand::Info(search_state) => println!("info {}", search_state),
            UCICommand::UciOption(option) => println!("option {}", option),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum UCIOkCode {
    OkCommand,
    ShouldQuit,
}

#[derive(Debug, PartialEq, Eq)]
enum UCIErrCode {
    MissingArg(String),
    NoCommand,
    BadCommand(String),
    BadMove(String),
    BadFen(FenError),
    Game(GameError),
    Internal(String),
}
impl From<FenError> for UCIErrCode {
    fn from(e: FenError) -> Self {
        UCIErrCode::BadFen(e)
    }
}
impl From<GameError> for UCIErrCode {
    fn from(e: GameError) -> Self {
        warn!("move rejected: {}", e);
        UCIErrCode::Game(e)
    }
}

pub enum UCICommand<'a> {
    Id,
    UciOk,
    ReadyOk,
    BestMove(Option<&'a Move>),
    Info(&'a Search),
    UciOption(&'a UCIOption),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UCIOption {
    IntValue {
        name: String,
        value: i32,
        default: i32,
        min: i32,
        max: i32,
    },
    StringChoice {
        name: String,
        value: String,
        default: String,
        possible_values: Vec<String>,
    },
}
impl UCIOption {
    /// Out of range numbers are clamped, unknown choices are ignored
    pub fn set_value(&mut self, v: &str) {
        match self {
            Self::IntValue { value, min, max, .. } => {
                let parsed = v.parse::<i32>().unwrap_or(*value);
                *value = parsed.clamp(*min, *max)
            }
            Self::StringChoice {
                value,
                possible_values,
                ..
            } => {
                let v = v.to_lowercase();
                if let Some(set_to) = possible_values.iter().find(|x| **x == v) {
                    *value = set_to.to_string();
                }
            }
        }
    }
}
impl Display for UCIOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Self::IntValue {
                name,
                default,
                min,
                max,
                ..
            } => write!(f, "name {} type spin default {} min {} max {}", name, default, min, max),
            Self::StringChoice {
                name,
                default,
                possible_values,
                ..
            } => write!(
                f,
                "name {} type combo default {}{}",
                name,
                default,
                possible_values
                    .iter()
                    .fold(String::new(), |acc, x| format!("{} var {}", acc, x))
            ),
        }
    }
}
