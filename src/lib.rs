pub mod board;
pub mod client;
pub mod config;
pub mod feedback;
pub mod rules;
pub mod session;
pub mod sync;

pub mod mock;

/// Trait for presenting the game to the player.
///
/// Implementations receive the session for pieces, turn and selection, the
/// highlight set derived from it, and an optional advisory notice. The core
/// never renders anything itself.
pub trait BoardDisplay {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Show the current state.
    fn show(
        &mut self,
        session: &session::GameSession,
        feedback: &feedback::BoardFeedback,
        notice: Option<&session::Notice>,
    ) -> Result<(), Self::Error>;
}
