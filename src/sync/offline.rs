use shakmaty::Color;

use super::{GameId, SubscriptionId, SyncAdapter, SyncError, UpdateListener};
use crate::board::Board;

/// Adapter for single-device play: no store is configured.
///
/// Creating or joining a game fails with [`SyncError::Unavailable`], which the
/// client reports once and then keeps playing locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl Offline {
    pub fn new() -> Self {
        Self
    }

    fn unavailable() -> SyncError {
        SyncError::Unavailable("no shared store configured".to_string())
    }
}

impl SyncAdapter for Offline {
    fn create_game(&mut self) -> Result<GameId, SyncError> {
        Err(Self::unavailable())
    }

    fn join_game(&mut self, _id: &GameId) -> Result<Color, SyncError> {
        Err(Self::unavailable())
    }

    fn subscribe(
        &mut self,
        _id: &GameId,
        _on_update: UpdateListener,
    ) -> Result<SubscriptionId, SyncError> {
        Err(Self::unavailable())
    }

    fn push(
        &mut self,
        _id: &GameId,
        _board: &Board,
        _current_player: Color,
    ) -> Result<(), SyncError> {
        Ok(())
    }

    fn teardown(&mut self, _id: &GameId, _subscription: SubscriptionId) {}
}
