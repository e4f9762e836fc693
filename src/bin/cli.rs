//! Line-oriented request/response front end.
//!
//! Every request is `<request-id> <command> [args]`; every response starts
//! with the same request id. Failures come back as
//! `<request-id> error: <reason>`.

use indicatif::ProgressBar;
use outpost::engine::Engine;
use outpost::logger::init_logging;
use outpost::moves::movegen::generate_legal;
use outpost::moves::perft::perft;
use std::io::{self, BufRead, Write};

fn main() {
    init_logging("logs/outpost.log", "outpost=info");

    let mut engine = Engine::new();
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let mut parts = line.split_whitespace();
        let Some(request_id) = parts.next() else {
            continue;
        };
        let command = parts.next().unwrap_or("");

        match command {
            "quit" => break,

            "reset" => {
                engine.reset();
                println!("{} ok", request_id);
            }

            "position" => println!("{} {}", request_id, engine.position()),

            "print" => {
                println!("{} ok", request_id);
                print!("{}", engine.print());
            }

            "move" => match parts.next() {
                Some(move_str) => match engine.play_move(move_str) {
                    Ok(fen) => println!("{} {}", request_id, fen),
                    Err(err) => println!("{} error: {}", request_id, err),
                },
                None => println!("{} error: invalid move string", request_id),
            },

            "state" => println!("{} {}", request_id, engine.state().as_str()),

            "eval" => println!("{} {}", request_id, engine.eval()),

            "best" => {
                let time_limit_ms = parts.next().and_then(|s| s.parse::<u64>().ok());
                println!("{} {}", request_id, engine.best(time_limit_ms));
            }

            "perft" => match parts.next().and_then(|s| s.parse::<u32>().ok()) {
                Some(depth) => {
                    let total = run_perft_divide(&engine, depth);
                    println!("{} {}", request_id, total);
                }
                None => println!("{} error: invalid depth", request_id),
            },

            _ => println!("{} error: unknown command", request_id),
        }

        let _ = io::stdout().flush();
    }
}

/// Perft split by root move, with a progress bar across the root moves.
fn run_perft_divide(engine: &Engine, depth: u32) -> u64 {
    let board = engine.board();
    let moves = generate_legal(board, false);
    let bar = ProgressBar::new(moves.len() as u64);

    let mut total = 0;
    for &mv in moves.iter() {
        let nodes = if depth <= 1 {
            1
        } else {
            perft(&board.child(mv), depth - 1)
        };
        bar.println(format!("{}: {}", mv, nodes));
        bar.inc(1);
        total += nodes;
    }
    bar.finish_and_clear();
    total
}
