use std::sync::mpsc::{self, Receiver};

use log::{info, warn};
use shakmaty::Color;

use crate::board::Square;
use crate::session::{ClickOutcome, GameSession, Notice};
use crate::sync::{GameId, GameIdError, Snapshot, SubscriptionId, SyncAdapter, SyncError};

/// Where this participant's game lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Both sides play on this device.
    Local,
    /// Game created and shared; the black seat is still free.
    Waiting(GameId),
    /// Both seats taken; moves are synchronized.
    Online(GameId),
}

impl Phase {
    pub fn game_id(&self) -> Option<&GameId> {
        match self {
            Phase::Local => None,
            Phase::Waiting(id) | Phase::Online(id) => Some(id),
        }
    }
}

/// One participant: a [`GameSession`] bound to a [`SyncAdapter`].
///
/// Local clicks go through [`GameClient::click`], which pushes every committed
/// move. Remote snapshots are queued by the subscription and applied by
/// [`GameClient::pump`], so the session is only ever touched from the caller's
/// event loop.
#[derive(Debug)]
pub struct GameClient<A> {
    adapter: A,
    session: GameSession,
    phase: Phase,
    subscription: Option<SubscriptionId>,
    updates: Option<Receiver<Snapshot>>,
    notice: Option<Notice>,
}

impl<A: SyncAdapter> GameClient<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            session: GameSession::new(),
            phase: Phase::Local,
            subscription: None,
            updates: None,
            notice: None,
        }
    }

    #[inline]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[inline]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Last advisory message, cleared by the next accepted click.
    #[inline]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    #[inline]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Feed a click on `square` into the session.
    pub fn click(&mut self, square: Square) -> ClickOutcome {
        if matches!(self.phase, Phase::Waiting(_)) {
            self.notice = Some(Notice::WaitingForOpponent);
            return ClickOutcome::Rejected(Notice::WaitingForOpponent);
        }

        let outcome = self.session.on_square_selected(square);
        match &outcome {
            ClickOutcome::Rejected(notice) => self.notice = Some(notice.clone()),
            ClickOutcome::Moved(_) => {
                self.notice = None;
                self.push_state();
            }
            _ => self.notice = None,
        }
        outcome
    }

    /// Share a new game and take the white seat.
    ///
    /// On failure the current game is left untouched and a notice is set.
    pub fn create_game(&mut self) -> Result<GameId, Notice> {
        let id = match self.adapter.create_game() {
            Ok(id) => id,
            Err(err) => return Err(self.report(err)),
        };
        let (subscription, updates) = match self.listen(&id) {
            Ok(listening) => listening,
            Err(err) => return Err(self.report(err)),
        };

        self.enter(Phase::Waiting(id.clone()), subscription, updates, Color::White);
        info!("hosting game {id} as white");
        Ok(id)
    }

    /// Join the game with the given code as black.
    ///
    /// `input` is user text: it is trimmed and uppercased before the lookup.
    /// The subscription is opened before the seat is claimed, so a failure at
    /// any step leaves both the local game and the remote seat as they were.
    pub fn join_game(&mut self, input: &str) -> Result<Color, Notice> {
        let id = match input.parse::<GameId>() {
            Ok(id) => id,
            Err(GameIdError::Empty) => return Err(self.set_notice(Notice::EmptyGameId)),
            Err(err) => return Err(self.set_notice(Notice::InvalidGameId(err))),
        };
        let (subscription, updates) = match self.listen(&id) {
            Ok(listening) => listening,
            Err(err) => return Err(self.report(err)),
        };
        let color = match self.adapter.join_game(&id) {
            Ok(color) => color,
            Err(err) => {
                self.adapter.teardown(&id, subscription);
                return Err(self.report(err));
            }
        };

        self.enter(Phase::Online(id.clone()), subscription, updates, color);
        info!("joined game {id} as {color:?}");
        Ok(color)
    }

    /// Apply every remote snapshot received since the last call.
    ///
    /// Returns how many snapshots were applied.
    pub fn pump(&mut self) -> usize {
        let Some(updates) = &self.updates else {
            return 0;
        };
        let snapshots: Vec<Snapshot> = updates.try_iter().collect();

        for snapshot in &snapshots {
            if let Phase::Waiting(id) = &self.phase {
                if snapshot.is_active() {
                    info!("opponent joined game {id}");
                    self.phase = Phase::Online(id.clone());
                    self.notice = None;
                }
            }
            self.session
                .apply_remote(snapshot.board.clone(), snapshot.current_player);
        }
        snapshots.len()
    }

    /// Drop any shared game and start over locally.
    pub fn reset(&mut self) {
        self.leave();
        self.notice = None;
    }

    /// Replace the local position, e.g. from a loaded placement.
    ///
    /// Only allowed in local play; returns false otherwise.
    pub fn load_local(&mut self, session: GameSession) -> bool {
        if self.phase != Phase::Local {
            return false;
        }
        self.session = session;
        true
    }

    fn listen(
        &mut self,
        id: &GameId,
    ) -> Result<(SubscriptionId, Receiver<Snapshot>), SyncError> {
        let (tx, rx) = mpsc::channel();
        let subscription = self.adapter.subscribe(
            id,
            Box::new(move |snapshot: &Snapshot| {
                // Receiver gone means the client already left the game.
                let _ = tx.send(snapshot.clone());
            }),
        )?;
        Ok((subscription, rx))
    }

    /// Drop the current game and bind to a shared one.
    fn enter(
        &mut self,
        phase: Phase,
        subscription: SubscriptionId,
        updates: Receiver<Snapshot>,
        color: Color,
    ) {
        self.leave();
        self.subscription = Some(subscription);
        self.updates = Some(updates);
        self.session.set_player_color(Some(color));
        self.phase = phase;
        self.notice = None;
    }

    fn leave(&mut self) {
        if let (Some(id), Some(subscription)) = (self.phase.game_id(), self.subscription.take()) {
            self.adapter.teardown(id, subscription);
            info!("left game {id}");
        }
        self.updates = None;
        self.phase = Phase::Local;
        self.session = GameSession::new();
    }

    fn push_state(&mut self) {
        let Phase::Online(id) = &self.phase else {
            return;
        };
        let board = self.session.board();
        if let Err(err) = self
            .adapter
            .push(id, board, self.session.current_player())
        {
            warn!("failed to push game {id}: {err}");
        }
    }

    fn report(&mut self, err: SyncError) -> Notice {
        warn!("{err}");
        let notice = match err {
            SyncError::NotFound(id) => Notice::GameNotFound(id),
            SyncError::Full(id) => Notice::GameFull(id),
            SyncError::Unavailable(_) | SyncError::Codec(_) => Notice::MultiplayerUnavailable,
        };
        self.set_notice(notice)
    }

    fn set_notice(&mut self, notice: Notice) -> Notice {
        self.notice = Some(notice.clone());
        notice
    }
}
