use std::io::{self, Write};

use shakmaty::Color;

use super::TerminalDisplay;
use crate::BoardDisplay;
use crate::board::{Board, Square};
use crate::client::{GameClient, Phase};
use crate::config::{Config, SyncBackend};
use crate::feedback::compute_feedback;
use crate::session::GameSession;
use crate::sync::{MemoryStore, Offline, SyncAdapter};

/// Clears the screen and moves cursor to top-left.
#[inline]
fn clear_screen() {
    print!("\x1B[2J\x1B[H");
}

/// Runs the interactive terminal game with the configured backend.
///
/// With the in-memory backend two seats share one store, so a game created
/// from seat 1 can be joined from seat 2.
pub fn run_interactive_terminal(config: &Config) {
    let start = match config.placement.as_deref().map(parse_position).transpose() {
        Ok(start) => start,
        Err(e) => {
            eprintln!("Invalid placement: {e}");
            return;
        }
    };

    match config.sync {
        SyncBackend::Offline => run(vec![GameClient::new(Offline::new())], start),
        SyncBackend::Memory => {
            let store = MemoryStore::new();
            run(
                vec![GameClient::new(store.clone()), GameClient::new(store)],
                start,
            )
        }
    }
}

/// Parse `<placement> [w|b]` into a local session.
fn parse_position(input: &str) -> Result<GameSession, crate::board::PlacementError> {
    let mut fields = input.split_whitespace();
    let board: Board = fields.next().unwrap_or_default().parse()?;
    let turn = match fields.next() {
        Some("b") => Color::Black,
        _ => Color::White,
    };
    Ok(GameSession::with_board(board, turn))
}

fn run<A: SyncAdapter>(mut seats: Vec<GameClient<A>>, start: Option<GameSession>) {
    let mut display = TerminalDisplay::new();
    let mut active = 0usize;
    if let Some(session) = start {
        seats[active].load_local(session);
    }

    redraw(&mut display, &mut seats, active);

    loop {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            eprintln!("Failed to flush stdout: {}", e);
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        let client = &mut seats[active];
        match parts[0] {
            "c" => match parts.get(1).map(|s| s.parse::<Square>()) {
                Some(Ok(square)) => {
                    client.click(square);
                }
                Some(Err(e)) => {
                    println!("Invalid square: {}", e);
                    continue;
                }
                None => {
                    println!("Usage: c <square>");
                    continue;
                }
            },
            "new" => {
                // Failure is shown through the client's notice.
                let _ = client.create_game();
            }
            "join" => {
                let _ = client.join_game(parts.get(1).copied().unwrap_or_default());
            }
            "seat" => {
                match parts.get(1).and_then(|s| s.parse::<usize>().ok()) {
                    Some(n) if (1..=seats.len()).contains(&n) => active = n - 1,
                    _ => {
                        println!("Usage: seat <1..={}>", seats.len());
                        continue;
                    }
                }
            }
            "load" => {
                let rest = input.trim_start()[4..].trim();
                match parse_position(rest) {
                    Ok(session) => {
                        if !client.load_local(session) {
                            println!("❌ Positions can only be loaded in a local game");
                            continue;
                        }
                    }
                    Err(e) => {
                        println!("❌ Invalid placement: {}", e);
                        continue;
                    }
                }
            }
            "r" => client.reset(),
            "p" => {}
            "q" => break,
            _ => {
                println!("Unknown command");
                continue;
            }
        }

        redraw(&mut display, &mut seats, active);
    }
}

/// Applies pending remote updates on every seat and draws the active one.
fn redraw<A: SyncAdapter>(display: &mut TerminalDisplay, seats: &mut [GameClient<A>], active: usize) {
    for seat in seats.iter_mut() {
        seat.pump();
    }
    let client = &seats[active];

    clear_screen();
    println!("♟️  Chess");
    println!();
    println!("Commands: c <square> | new | join <id> | load <placement> [w|b] | r (reset) | p (refresh) | q (quit)");
    if seats.len() > 1 {
        println!("          seat <1..={}>  (active: seat {})", seats.len(), active + 1);
    }
    match client.phase() {
        Phase::Local => println!("Local game"),
        Phase::Waiting(id) => println!("Game ID: {id}  (share it with your opponent)"),
        Phase::Online(id) => println!(
            "Game ID: {id}  |  You play {}",
            client
                .session()
                .player_color()
                .map_or("both sides", |c| if c == Color::White { "White" } else { "Black" })
        ),
    }
    println!();

    let session = client.session();
    if let Err(e) = display.show(session, &compute_feedback(session), client.notice()) {
        eprintln!("Failed to draw board: {}", e);
    }
}
