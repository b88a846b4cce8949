use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    println!("gambit v{}, by {}", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_AUTHORS"));

    let args: Vec<String> = std::env::args().collect();

    // Launches a perft test
    if args.get(1).map(String::as_str) == Some("perft") {
        let expected_format = "Expected : perft <depth> [<FEN>]";
        let depth = match args.get(2).and_then(|d| d.parse::<u32>().ok()) {
            Some(d) => d,
            None => {
                eprintln!("{}", expected_format);
                return ExitCode::FAILURE;
            }
        };
        // The FEN may come quoted or spread over several arguments
        let fen = if args.len() > 3 { Some(args[3..].join(" ")) } else { None };

        if let Err(e) = gambit::perft(depth, fen) {
            eprintln!("Invalid FEN: {}", e);
            return ExitCode::FAILURE;
        }
    } else {
        // Console
        gambit::uci::UCI::default().run()
    }
    ExitCode::SUCCESS
}
