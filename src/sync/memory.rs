use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, info, warn};
use shakmaty::Color;

use super::{GameId, Snapshot, SubscriptionId, SyncAdapter, SyncError, UpdateListener};
use crate::board::Board;

/// In-process shared state store.
///
/// Clones share the same games, so two [`crate::client::GameClient`]s holding
/// clones of one store behave like two devices on one remote database. Games are
/// kept as JSON documents, the same shape a remote backend would hold.
///
/// Listeners run synchronously inside the write that triggered them and must
/// not call back into the store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Default)]
struct Inner {
    games: HashMap<GameId, Record>,
    next_subscription: u64,
    offline: bool,
}

struct Record {
    document: String,
    listeners: Vec<(SubscriptionId, UpdateListener)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate losing (or regaining) the connection to the store.
    pub fn set_offline(&self, offline: bool) {
        self.inner.borrow_mut().offline = offline;
    }

    /// Current document of a game, decoded.
    pub fn snapshot(&self, id: &GameId) -> Result<Snapshot, SyncError> {
        let inner = self.inner.borrow();
        let record = inner
            .games
            .get(id)
            .ok_or_else(|| SyncError::NotFound(id.clone()))?;
        Ok(serde_json::from_str(&record.document)?)
    }

    /// Number of live listeners on a game.
    pub fn listener_count(&self, id: &GameId) -> usize {
        self.inner
            .borrow()
            .games
            .get(id)
            .map_or(0, |record| record.listeners.len())
    }

    fn ensure_online(&self) -> Result<(), SyncError> {
        if self.inner.borrow().offline {
            return Err(SyncError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }

    /// Read-modify-write a game document, then notify its listeners.
    fn update(
        &self,
        id: &GameId,
        modify: impl FnOnce(&mut Snapshot) -> Result<(), SyncError>,
    ) -> Result<Snapshot, SyncError> {
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            let record = inner
                .games
                .get_mut(id)
                .ok_or_else(|| SyncError::NotFound(id.clone()))?;
            let mut snapshot: Snapshot = serde_json::from_str(&record.document)?;
            modify(&mut snapshot)?;
            record.document = serde_json::to_string(&snapshot)?;
            snapshot
        };
        self.notify(id, &snapshot);
        Ok(snapshot)
    }

    fn notify(&self, id: &GameId, snapshot: &Snapshot) {
        // Listeners are taken out so none of them runs under a borrow.
        let mut listeners = match self.inner.borrow_mut().games.get_mut(id) {
            Some(record) => std::mem::take(&mut record.listeners),
            None => return,
        };
        debug!("notifying {} listeners of game {id}", listeners.len());
        for (_, listener) in listeners.iter_mut() {
            listener(snapshot);
        }
        if let Some(record) = self.inner.borrow_mut().games.get_mut(id) {
            listeners.append(&mut record.listeners);
            record.listeners = listeners;
        }
    }
}

impl SyncAdapter for MemoryStore {
    fn create_game(&mut self) -> Result<GameId, SyncError> {
        self.ensure_online()?;
        let document = serde_json::to_string(&Snapshot::initial())?;

        let mut inner = self.inner.borrow_mut();
        let id = loop {
            let id = GameId::generate();
            if !inner.games.contains_key(&id) {
                break id;
            }
        };
        inner.games.insert(
            id.clone(),
            Record {
                document,
                listeners: Vec::new(),
            },
        );
        info!("created game {id}");
        Ok(id)
    }

    fn join_game(&mut self, id: &GameId) -> Result<Color, SyncError> {
        self.ensure_online()?;
        self.update(id, |snapshot| {
            if snapshot.players.black {
                warn!("game {id} is full");
                return Err(SyncError::Full(id.clone()));
            }
            snapshot.players.black = true;
            Ok(())
        })?;
        info!("black joined game {id}");
        Ok(Color::Black)
    }

    fn subscribe(
        &mut self,
        id: &GameId,
        mut on_update: UpdateListener,
    ) -> Result<SubscriptionId, SyncError> {
        self.ensure_online()?;
        let current = self.snapshot(id)?;
        on_update(&current);

        let mut inner = self.inner.borrow_mut();
        inner.next_subscription += 1;
        let subscription = SubscriptionId(inner.next_subscription);
        inner
            .games
            .get_mut(id)
            .ok_or_else(|| SyncError::NotFound(id.clone()))?
            .listeners
            .push((subscription, on_update));
        debug!("subscription {subscription:?} on game {id}");
        Ok(subscription)
    }

    fn push(
        &mut self,
        id: &GameId,
        board: &Board,
        current_player: Color,
    ) -> Result<(), SyncError> {
        self.ensure_online()?;
        self.update(id, |snapshot| {
            snapshot.board = board.clone();
            snapshot.current_player = current_player;
            Ok(())
        })?;
        Ok(())
    }

    fn teardown(&mut self, id: &GameId, subscription: SubscriptionId) {
        if let Some(record) = self.inner.borrow_mut().games.get_mut(id) {
            record.listeners.retain(|(sub, _)| *sub != subscription);
            debug!("subscription {subscription:?} on game {id} removed");
        }
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryStore")
            .field("games", &inner.games.keys().collect::<Vec<_>>())
            .field("offline", &inner.offline)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Listener that records every snapshot it sees.
    fn recorder() -> (Rc<RefCell<Vec<Snapshot>>>, UpdateListener) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let listener: UpdateListener = Box::new(move |s| sink.borrow_mut().push(s.clone()));
        (seen, listener)
    }

    #[test]
    fn test_create_game_writes_initial_document() {
        let mut store = MemoryStore::new();
        let id = store.create_game().unwrap();

        assert_eq!(store.snapshot(&id).unwrap(), Snapshot::initial());
    }

    #[test]
    fn test_join_claims_black_seat_once() {
        let mut store = MemoryStore::new();
        let id = store.create_game().unwrap();

        assert_eq!(store.join_game(&id).unwrap(), Color::Black);
        assert!(store.snapshot(&id).unwrap().is_active());
        assert!(matches!(store.join_game(&id), Err(SyncError::Full(_))));
    }

    #[test]
    fn test_join_unknown_game() {
        let mut store = MemoryStore::new();
        let id: GameId = "NOPE00".parse().unwrap();
        assert!(matches!(store.join_game(&id), Err(SyncError::NotFound(_))));
    }

    #[test]
    fn test_subscribe_delivers_current_then_changes() {
        let mut store = MemoryStore::new();
        let id = store.create_game().unwrap();
        let (seen, listener) = recorder();

        store.subscribe(&id, listener).unwrap();
        assert_eq!(seen.borrow().len(), 1);

        store.join_game(&id).unwrap();
        assert_eq!(seen.borrow().len(), 2);
        assert!(seen.borrow()[1].is_active());
    }

    #[test]
    fn test_push_preserves_seats() {
        let mut store = MemoryStore::new();
        let id = store.create_game().unwrap();
        store.join_game(&id).unwrap();

        let mut board = Board::new();
        board.apply_move("e2".parse().unwrap(), "e4".parse().unwrap());
        store.push(&id, &board, Color::Black).unwrap();

        let snapshot = store.snapshot(&id).unwrap();
        assert_eq!(snapshot.board, board);
        assert_eq!(snapshot.current_player, Color::Black);
        assert!(snapshot.is_active());
    }

    #[test]
    fn test_clones_share_games() {
        let mut host = MemoryStore::new();
        let mut guest = host.clone();
        let id = host.create_game().unwrap();

        let (seen, listener) = recorder();
        host.subscribe(&id, listener).unwrap();
        guest.join_game(&id).unwrap();

        assert!(seen.borrow().last().unwrap().is_active());
    }

    #[test]
    fn test_teardown_stops_delivery() {
        let mut store = MemoryStore::new();
        let id = store.create_game().unwrap();
        let (seen, listener) = recorder();

        let sub = store.subscribe(&id, listener).unwrap();
        assert_eq!(store.listener_count(&id), 1);
        store.teardown(&id, sub);
        assert_eq!(store.listener_count(&id), 0);

        store.join_game(&id).unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_offline_store_is_unavailable() {
        let mut store = MemoryStore::new();
        let id = store.create_game().unwrap();
        store.set_offline(true);

        assert!(matches!(store.create_game(), Err(SyncError::Unavailable(_))));
        assert!(matches!(
            store.push(&id, &Board::new(), Color::Black),
            Err(SyncError::Unavailable(_))
        ));

        store.set_offline(false);
        assert!(store.push(&id, &Board::new(), Color::Black).is_ok());
    }
}
