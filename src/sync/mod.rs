//! Shared-state synchronization between the two participants of a game.
//!
//! The session never talks to a store directly; everything goes through
//! [`SyncAdapter`], so a real remote backend, the in-process [`memory::MemoryStore`]
//! and the [`offline::Offline`] stub are interchangeable.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use shakmaty::Color;
use thiserror::Error;

use crate::board::Board;

pub mod memory;
pub mod offline;

pub use memory::MemoryStore;
pub use offline::Offline;

const GAME_ID_LEN: usize = 6;
const GAME_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Six-character session code drawn from `A-Z0-9`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameId(String);

impl GameId {
    /// Random id using the thread-local generator. Not guaranteed unique.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    pub fn generate_with(rng: &mut impl Rng) -> Self {
        let code = (0..GAME_ID_LEN)
            .map(|_| GAME_ID_CHARSET[rng.random_range(0..GAME_ID_CHARSET.len())] as char)
            .collect();
        Self(code)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses user input: surrounding whitespace is trimmed and letters uppercased.
impl FromStr for GameId {
    type Err = GameIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(GameIdError::Empty);
        }
        if code.len() != GAME_ID_LEN {
            return Err(GameIdError::WrongLength(code.len()));
        }
        if let Some(ch) = code.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(GameIdError::BadChar(ch));
        }
        Ok(Self(code))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameIdError {
    #[error("game id is empty")]
    Empty,
    #[error("game id must be 6 characters, got {0}")]
    WrongLength(usize),
    #[error("game id may only contain A-Z and 0-9, found '{0}'")]
    BadChar(char),
}

/// Which seats of a session are taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seats {
    pub white: bool,
    pub black: bool,
}

/// Full remote state of one session, as stored and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(with = "placement")]
    pub board: Board,
    #[serde(with = "color_name")]
    pub current_player: Color,
    pub players: Seats,
}

impl Snapshot {
    /// Starting position with only the white seat taken.
    pub fn initial() -> Self {
        Self {
            board: Board::new(),
            current_player: Color::White,
            players: Seats {
                white: true,
                black: false,
            },
        }
    }

    /// Whether both seats are taken and play can begin.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.players.white && self.players.black
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("game {0} not found")]
    NotFound(GameId),
    #[error("game {0} is already full")]
    Full(GameId),
    #[error("synchronization unavailable: {0}")]
    Unavailable(String),
    #[error("malformed game document: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Handle for one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Callback invoked with every new remote snapshot.
pub type UpdateListener = Box<dyn FnMut(&Snapshot)>;

/// Shared state store holding one [`Snapshot`] per session.
pub trait SyncAdapter {
    /// Allocate a new session initialised to [`Snapshot::initial`].
    fn create_game(&mut self) -> Result<GameId, SyncError>;

    /// Claim the black seat of an existing session.
    ///
    /// Returns the assigned color, [`SyncError::NotFound`] for unknown ids and
    /// [`SyncError::Full`] when the seat is taken.
    fn join_game(&mut self, id: &GameId) -> Result<Color, SyncError>;

    /// Register a listener for every change of the session's state.
    fn subscribe(
        &mut self,
        id: &GameId,
        on_update: UpdateListener,
    ) -> Result<SubscriptionId, SyncError>;

    /// Write board and side to move. Seat flags are left as they are.
    fn push(&mut self, id: &GameId, board: &Board, current_player: Color)
    -> Result<(), SyncError>;

    /// Drop a subscription. Unknown handles are ignored.
    fn teardown(&mut self, id: &GameId, subscription: SubscriptionId);
}

mod placement {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::board::Board;

    pub fn serialize<S: Serializer>(board: &Board, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(board)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Board, D::Error> {
        let placement = String::deserialize(d)?;
        placement.parse().map_err(D::Error::custom)
    }
}

mod color_name {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use shakmaty::Color;

    pub fn serialize<S: Serializer>(color: &Color, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(match color {
            Color::White => "white",
            Color::Black => "black",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Color, D::Error> {
        match String::deserialize(d)?.as_str() {
            "white" => Ok(Color::White),
            "black" => Ok(Color::Black),
            other => Err(D::Error::unknown_variant(other, &["white", "black"])),
        }
    }
}
