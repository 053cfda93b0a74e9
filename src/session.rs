use std::fmt;

use log::{debug, info};
use shakmaty::{Color, Piece};

use crate::board::{Board, Square};
use crate::rules;
use crate::sync::{GameId, GameIdError};

/// A committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.captured.is_some() { 'x' } else { '-' };
        write!(f, "{}{}{sep}{}", self.piece.char(), self.from, self.to)
    }
}

/// Advisory message for the player. Never consumed by other components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NotYourTurn,
    WaitingForOpponent,
    GameNotFound(GameId),
    GameFull(GameId),
    MultiplayerUnavailable,
    EmptyGameId,
    InvalidGameId(GameIdError),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NotYourTurn => f.write_str("It's not your turn!"),
            Notice::WaitingForOpponent => f.write_str("Waiting for an opponent to join"),
            Notice::GameNotFound(id) => write!(f, "Game {id} not found! Check the Game ID."),
            Notice::GameFull(id) => write!(f, "Game {id} is already full!"),
            Notice::MultiplayerUnavailable => {
                f.write_str("Multiplayer not configured, playing locally")
            }
            Notice::EmptyGameId => f.write_str("Please enter a game ID"),
            Notice::InvalidGameId(err) => write!(f, "Invalid game ID: {err}"),
        }
    }
}

/// What a single click did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Rejected before touching any state.
    Rejected(Notice),
    /// Nothing selectable was clicked while idle.
    Ignored,
    /// A piece of the side to move is now selected.
    Selected(Square),
    /// The selected square was clicked again.
    Deselected,
    /// The selected piece moved; the turn has passed.
    Moved(Move),
    /// An illegal target was clicked; the selection is dropped.
    Cancelled,
}

/// Board, side to move and the current selection of one game.
///
/// All input arrives through [`GameSession::on_square_selected`]; everything a
/// renderer needs is available through the accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    board: Board,
    current_player: Color,
    selection: Option<Square>,
    destinations: Vec<Square>,
    /// Seat bound to this participant in multiplayer; `None` plays both sides.
    player_color: Option<Color>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Starting position, white to move, no seat bound.
    #[inline]
    pub fn new() -> Self {
        Self::with_board(Board::new(), Color::White)
    }

    pub fn with_board(board: Board, current_player: Color) -> Self {
        Self {
            board,
            current_player,
            selection: None,
            destinations: Vec::new(),
            player_color: None,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    #[inline]
    pub fn selection(&self) -> Option<Square> {
        self.selection
    }

    /// Legal targets of the selected piece; empty while nothing is selected.
    #[inline]
    pub fn legal_destinations(&self) -> &[Square] {
        &self.destinations
    }

    #[inline]
    pub fn player_color(&self) -> Option<Color> {
        self.player_color
    }

    pub fn set_player_color(&mut self, color: Option<Color>) {
        self.player_color = color;
    }

    /// Whether this participant may act now.
    pub fn is_my_turn(&self) -> bool {
        self.player_color.is_none_or(|c| c == self.current_player)
    }

    /// Handle a click on `square`.
    pub fn on_square_selected(&mut self, square: Square) -> ClickOutcome {
        if !self.is_my_turn() {
            debug!("click on {square} rejected, {:?} to move", self.current_player);
            return ClickOutcome::Rejected(Notice::NotYourTurn);
        }

        let own_piece = self
            .board
            .get(square)
            .is_some_and(|p| p.color == self.current_player);

        let Some(origin) = self.selection else {
            if own_piece {
                self.select(square);
                return ClickOutcome::Selected(square);
            }
            return ClickOutcome::Ignored;
        };

        if square == origin {
            self.clear_selection();
            return ClickOutcome::Deselected;
        }

        if own_piece {
            self.select(square);
            return ClickOutcome::Selected(square);
        }

        self.clear_selection();
        let piece = match self.board.get(origin) {
            Some(piece) if rules::is_legal_move(&self.board, origin, square) => piece,
            _ => {
                debug!("illegal move {origin}-{square}, selection dropped");
                return ClickOutcome::Cancelled;
            }
        };

        ClickOutcome::Moved(self.commit(piece, origin, square))
    }

    /// Replace board and side to move with a remote snapshot.
    ///
    /// Any selection is dropped, since the selected square may no longer hold
    /// the same piece.
    pub fn apply_remote(&mut self, board: Board, current_player: Color) {
        self.board = board;
        self.current_player = current_player;
        self.clear_selection();
    }

    fn select(&mut self, square: Square) {
        self.selection = Some(square);
        self.destinations = rules::legal_destinations(&self.board, square);
        debug!(
            "selected {square} with {} legal destinations",
            self.destinations.len()
        );
    }

    fn clear_selection(&mut self) {
        self.selection = None;
        self.destinations.clear();
    }

    fn commit(&mut self, piece: Piece, from: Square, to: Square) -> Move {
        let captured = self.board.apply_move(from, to);
        self.current_player = self.current_player.other();

        let mv = Move {
            from,
            to,
            piece,
            captured,
        };
        info!("{mv}, {:?} to move", self.current_player);
        mv
    }
}
