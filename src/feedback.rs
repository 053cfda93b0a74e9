use crate::board::{Board, Square};
use crate::session::GameSession;

/// Type of visual feedback for an individual square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareFeedback {
    /// Empty legal destination of the selected piece
    Destination,
    /// Legal destination holding an opponent piece
    Capture,
    /// The selected piece
    Origin,
}

/// Squares to highlight for the current selection.
///
/// `BoardFeedback` is computed by [`compute_feedback()`] and consumed by the
/// renderer. It maps squares to their highlight and is the only thing a
/// display needs beyond the board itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardFeedback {
    squares: Vec<(Square, SquareFeedback)>,
}

impl BoardFeedback {
    /// Create empty feedback (no highlights)
    #[inline]
    pub const fn new() -> Self {
        Self {
            squares: Vec::new(),
        }
    }

    #[inline]
    pub fn squares(&self) -> &[(Square, SquareFeedback)] {
        &self.squares
    }

    /// Get feedback for a specific square, if any
    #[inline]
    pub fn get(&self, square: Square) -> Option<SquareFeedback> {
        self.squares
            .iter()
            .find(|(sq, _)| *sq == square)
            .map(|(_, feedback)| *feedback)
    }

    /// Set feedback for a square, replacing any previous entry.
    pub fn set(&mut self, square: Square, feedback: SquareFeedback) {
        match self.squares.iter_mut().find(|(sq, _)| *sq == square) {
            Some(entry) => entry.1 = feedback,
            None => self.squares.push((square, feedback)),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }
}

impl From<Vec<(Square, SquareFeedback)>> for BoardFeedback {
    fn from(squares: Vec<(Square, SquareFeedback)>) -> Self {
        Self { squares }
    }
}

/// Game state information needed to compute feedback
pub trait FeedbackSource {
    fn board(&self) -> &Board;

    /// Currently selected origin square
    fn selection(&self) -> Option<Square>;

    /// Legal destinations of the selected piece
    fn legal_destinations(&self) -> &[Square];
}

impl FeedbackSource for GameSession {
    fn board(&self) -> &Board {
        GameSession::board(self)
    }

    fn selection(&self) -> Option<Square> {
        GameSession::selection(self)
    }

    fn legal_destinations(&self) -> &[Square] {
        GameSession::legal_destinations(self)
    }
}

/// Compute highlights for the current selection.
///
/// Nothing selected gives empty feedback. Otherwise the origin is marked and
/// each legal destination is marked as a capture or a quiet move.
pub fn compute_feedback(source: &impl FeedbackSource) -> BoardFeedback {
    let Some(from) = source.selection() else {
        return BoardFeedback::default();
    };

    std::iter::once((from, SquareFeedback::Origin))
        .chain(
            source
                .legal_destinations()
                .iter()
                .map(|&to| classify_destination(source.board(), to)),
        )
        .collect::<Vec<_>>()
        .into()
}

/// Classify a destination as either a capture or regular destination
fn classify_destination(board: &Board, to: Square) -> (Square, SquareFeedback) {
    if board.get(to).is_some() {
        (to, SquareFeedback::Capture)
    } else {
        (to, SquareFeedback::Destination)
    }
}
