use std::io::{self, Write};

use shakmaty::Color;

use crate::BoardDisplay;
use crate::board::Square;
use crate::feedback::{BoardFeedback, SquareFeedback};
use crate::session::{GameSession, Notice};

/// Terminal-based board display.
///
/// Renders the board as an 8×8 grid of piece letters with ANSI color-coded
/// highlights for the selection and its legal destinations, followed by a
/// status line.
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl BoardDisplay for TerminalDisplay {
    type Error = DisplayError;

    fn show(
        &mut self,
        session: &GameSession,
        feedback: &BoardFeedback,
        notice: Option<&Notice>,
    ) -> Result<(), Self::Error> {
        render(&mut io::stdout(), session, feedback, notice)
    }
}

/// Render the game to any writer. Extracted for testability.
fn render(
    w: &mut impl Write,
    session: &GameSession,
    feedback: &BoardFeedback,
    notice: Option<&Notice>,
) -> Result<(), DisplayError> {
    for row in 0..8u8 {
        write!(w, " {} ", 8 - row)?;
        for col in 0..8u8 {
            let Some(square) = Square::new(row, col) else {
                continue;
            };
            let symbol = session.board().get(square).map_or('·', |p| p.char());
            write!(w, "{}", format_square(symbol, feedback.get(square)))?;
        }
        writeln!(w)?;
    }
    writeln!(w, "    a  b  c  d  e  f  g  h")?;
    writeln!(w)?;
    writeln!(w, "{}", status_line(session, notice))?;
    w.flush()?;
    Ok(())
}

/// Map a square to an ANSI-colored cell string.
fn format_square(symbol: char, feedback: Option<SquareFeedback>) -> String {
    match feedback {
        Some(SquareFeedback::Destination) => format!("\x1b[44m {symbol} \x1b[0m"),
        Some(SquareFeedback::Capture) => format!("\x1b[41m {symbol} \x1b[0m"),
        Some(SquareFeedback::Origin) => format!("\x1b[42m {symbol} \x1b[0m"),
        None => format!(" {symbol} "),
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

/// Status text: the pending notice if any, otherwise whose turn it is.
pub fn status_line(session: &GameSession, notice: Option<&Notice>) -> String {
    if let Some(notice) = notice {
        return notice.to_string();
    }
    match session.player_color() {
        Some(_) if session.is_my_turn() => "Your turn".to_string(),
        Some(_) => "Opponent's turn".to_string(),
        None => format!("{}'s turn", color_name(session.current_player())),
    }
}
