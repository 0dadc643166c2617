use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use chess_tree::board::MoveRecord;
use chess_tree::game::GameController;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(path) = args.first() else {
        eprintln!("usage: pgn_status <file.pgn | -> [--option NAME=VALUE ...]");
        return ExitCode::FAILURE;
    };

    let mut game = GameController::new();
    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        if arg != "--option" {
            eprintln!("unexpected argument '{arg}'");
            return ExitCode::FAILURE;
        }
        let Some((name, value)) = rest.next().and_then(|kv| kv.split_once('=')) else {
            eprintln!("--option needs NAME=VALUE");
            return ExitCode::FAILURE;
        };
        if let Err(err) = game.set_option(name, value) {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }

    let text = if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        fs::read_to_string(path)
    };
    let text = match text {
        Ok(text) => text,
        Err(err) => {
            eprintln!("cannot read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = game.import_notation(&text) {
        eprintln!("import failed: {err}");
        return ExitCode::FAILURE;
    }

    let state = game.current_state();
    let turn = state.turn();
    let legal = state.legal_moves(turn);
    let board = state.board();
    let moves: Vec<MoveRecord> = legal
        .iter()
        .filter_map(|(&id, targets)| board.square_of(id).map(|from| (from, targets)))
        .flat_map(|(from, targets)| targets.iter().map(move |&to| MoveRecord::new(from, to, None)))
        .collect();

    println!("fen: {}", state.to_fen());
    println!("side_to_move: {turn}");
    println!("last_move: {}", state.notation().unwrap_or("-"));
    println!("legal_moves: {}", moves.len());
    println!("check: {}", state.is_check());
    println!("checkmate: {}", state.is_checkmate());
    println!("stalemate: {}", state.is_stalemate());
    for mv in &moves {
        println!("{mv}");
    }
    ExitCode::SUCCESS
}
