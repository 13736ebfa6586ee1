use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::Level;

use mini_chess::board::Board;
use mini_chess::game::Game;
use mini_chess::types::{PawnCaptures, PieceId, RuleSet};

#[derive(Parser, Debug)]
#[command(name = "mini_chess")]
#[command(about = "Move rooks and pawns around an 8x8 board")]
struct Args {
    /// Start from a text layout (8 rows of 8 cells, `.` for empty) instead of the usual setup
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Let pawns capture pieces of their own side
    #[arg(long)]
    any_occupant_pawn_captures: bool,

    /// Pause after each request, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Print the move transcript when the game ends
    #[arg(long)]
    transcript: bool,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

enum Input {
    Number(i64),
    Invalid,
    Quit,
}

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, text: &str) -> Result<Input> {
    print!("{}", text);
    io::stdout().flush()?;
    let Some(line) = lines.next() else {
        return Ok(Input::Quit);
    };
    let line = line?;
    let line = line.trim();
    if line == "q" || line == "quit" {
        return Ok(Input::Quit);
    }
    Ok(line.parse().map(Input::Number).unwrap_or(Input::Invalid))
}

/// One request: pick a piece, show its moves, pick a target. Returns `false`
/// once the player quits.
fn play_request(game: &mut Game, lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<bool> {
    println!("Choose a piece to move (index), or `q` to quit:");
    for (id, piece) in game.live_pieces() {
        println!("{}: {} at {}", id, piece.kind, piece.position);
    }

    let id = match prompt(lines, "Select piece index: ")? {
        Input::Quit => return Ok(false),
        Input::Invalid => {
            println!("Invalid input, please enter a number.");
            return Ok(true);
        }
        Input::Number(n) => match usize::try_from(n) {
            Ok(index) => PieceId::from(index),
            Err(_) => {
                println!("Invalid piece selection.");
                return Ok(true);
            }
        },
    };

    let piece = match game.board().piece_at(id) {
        Ok(piece) => *piece,
        Err(e) => {
            println!("Invalid piece selection: {}", e);
            return Ok(true);
        }
    };

    println!("Available moves for {} at {}:", piece.kind, piece.position);
    for m in game.legal_moves(id)? {
        println!("{}", m.to_human());
    }
    println!("{}", game.board().display_piece_moves(id)?);

    let mut coordinates = [0i64; 2];
    for (coordinate, text) in coordinates.iter_mut().zip([
        "Enter target x coordinate (0-7): ",
        "Enter target y coordinate (0-7): ",
    ]) {
        *coordinate = match prompt(lines, text)? {
            Input::Number(n) => n,
            Input::Quit => return Ok(false),
            Input::Invalid => {
                println!("Invalid input, please enter a number.");
                return Ok(true);
            }
        };
    }

    match game.submit(id, coordinates[0], coordinates[1]) {
        Ok(outcome) => {
            if let Some((_, captured)) = outcome.record.captured {
                println!("Captured piece at {}", captured.position);
            }
            println!("{}", outcome.description);
            println!("Move successful.");
        }
        Err(e) => println!("Move failed: {}. Try again.", e),
    }
    Ok(true)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.verbose);

    let rules = RuleSet {
        pawn_captures: if args.any_occupant_pawn_captures {
            PawnCaptures::AnyOccupant
        } else {
            PawnCaptures::OpponentOnly
        },
    };

    let board = match &args.layout {
        Some(path) => {
            let layout = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("Could not read layout {}", path.display()))?;
            Board::from_layout(&layout)
                .wrap_err_with(|| format!("Could not parse layout {}", path.display()))?
        }
        None => Board::new(),
    };
    let mut game = Game::from_board(board.with_rules(rules));

    let mut lines = io::stdin().lines();
    loop {
        game.board().draw_to_terminal();
        if !play_request(&mut game, &mut lines)? {
            break;
        }
        thread::sleep(Duration::from_millis(args.delay_ms));
    }

    if args.transcript {
        println!("{}", game.transcript());
    }
    Ok(())
}
