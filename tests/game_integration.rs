use duo_chess::board::{Board, Square};
use duo_chess::client::{GameClient, Phase};
use duo_chess::feedback::{SquareFeedback, compute_feedback};
use duo_chess::mock::ClickScript;
use duo_chess::rules::is_legal_move;
use duo_chess::session::{ClickOutcome, GameSession, Notice};
use duo_chess::sync::{MemoryStore, Offline, SyncAdapter};
use shakmaty::{Color, Role};

fn sq(s: &str) -> Square {
    s.parse().expect("test square is invalid")
}

/// Helper: run a click script against one client, pumping after each batch.
fn play<A: SyncAdapter>(client: &mut GameClient<A>, script: &str) -> Vec<ClickOutcome> {
    let mut clicks = ClickScript::new();
    clicks.push_script(script).expect("valid script");
    let mut outcomes = Vec::new();
    while let Some(batch) = clicks.tick() {
        for square in batch {
            outcomes.push(client.click(square));
        }
        client.pump();
    }
    outcomes
}

/// Helper: host and guest clients on one shared store, both seats taken.
fn connected() -> (GameClient<MemoryStore>, GameClient<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    let mut host = GameClient::new(store.clone());
    let mut guest = GameClient::new(store.clone());

    let id = host.create_game().expect("store is online");
    assert_eq!(guest.join_game(id.as_str()), Ok(Color::Black));
    host.pump();
    guest.pump();
    assert_eq!(host.phase(), &Phase::Online(id));
    (host, guest, store)
}

// ---------------------------------------------------------------
// Local play
// ---------------------------------------------------------------

#[test]
fn opening_sequence_on_one_device() {
    let mut client = GameClient::new(Offline::new());

    play(&mut client, "e2 e4.");
    let session = client.session();
    assert_eq!(session.board().get(sq("e2")), None);
    assert_eq!(session.board().get(sq("e4")), Some(Role::Pawn.of(Color::White)));
    assert_eq!(session.current_player(), Color::Black);

    play(&mut client, "e7 e5.");
    assert_eq!(client.session().current_player(), Color::White);

    let outcomes = play(&mut client, "b1 a3.");
    assert!(matches!(outcomes[1], ClickOutcome::Moved(_)));
    assert_eq!(
        client.session().board().get(sq("a3")),
        Some(Role::Knight.of(Color::White))
    );
    assert_eq!(client.session().current_player(), Color::Black);

    // Black rook a8 towards d8 runs into its own pieces
    let board = client.session().board();
    assert!(!is_legal_move(board, sq("a8"), sq("d8")));
    // White rook onto its own pawn
    assert!(!is_legal_move(board, sq("a1"), sq("a2")));
}

#[test]
fn illegal_attempt_leaves_board_and_turn() {
    let mut client = GameClient::new(Offline::new());

    let outcomes = play(&mut client, "e2 e5.");
    assert_eq!(outcomes[1], ClickOutcome::Cancelled);
    assert_eq!(client.session().board(), &Board::new());
    assert_eq!(client.session().current_player(), Color::White);
    assert_eq!(client.session().selection(), None);
}

#[test]
fn selection_drives_feedback() {
    let mut client = GameClient::new(Offline::new());
    play(&mut client, "e2 e4. d7 d5. e4.");

    let fb = compute_feedback(client.session());
    assert_eq!(fb.get(sq("e4")), Some(SquareFeedback::Origin));
    assert_eq!(fb.get(sq("e5")), Some(SquareFeedback::Destination));
    assert_eq!(fb.get(sq("d5")), Some(SquareFeedback::Capture));
    assert_eq!(fb.get(sq("f5")), None);

    play(&mut client, "d5.");
    assert!(compute_feedback(client.session()).is_empty());
    assert_eq!(
        client.session().board().get(sq("d5")),
        Some(Role::Pawn.of(Color::White))
    );
}

// ---------------------------------------------------------------
// Multiplayer over a shared store
// ---------------------------------------------------------------

#[test]
fn moves_propagate_between_participants() {
    let (mut host, mut guest, _store) = connected();

    play(&mut host, "e2 e4.");
    guest.pump();
    assert_eq!(guest.session().board(), host.session().board());
    assert_eq!(guest.session().current_player(), Color::Black);

    play(&mut guest, "e7 e5.");
    host.pump();
    assert_eq!(host.session().board(), guest.session().board());
    assert_eq!(host.session().current_player(), Color::White);
    assert_eq!(
        host.session().board().get(sq("e5")),
        Some(Role::Pawn.of(Color::Black))
    );
}

#[test]
fn turn_violation_is_reported_without_mutation() {
    let (mut host, mut guest, _store) = connected();

    let outcomes = play(&mut guest, "e7 e5.");
    assert_eq!(
        outcomes,
        vec![
            ClickOutcome::Rejected(Notice::NotYourTurn),
            ClickOutcome::Rejected(Notice::NotYourTurn),
        ]
    );
    assert_eq!(guest.notice(), Some(&Notice::NotYourTurn));
    assert_eq!(guest.session().board(), &Board::new());

    host.pump();
    assert_eq!(host.session().board(), &Board::new());
}

#[test]
fn remote_update_clears_stale_selection() {
    let (mut host, mut guest, _store) = connected();

    play(&mut host, "e2 e4.");
    guest.pump();
    play(&mut guest, "e7.");
    assert_eq!(guest.session().selection(), Some(sq("e7")));

    // A second snapshot lands while black still has a piece selected
    host.pump();
    let mut remote = guest.session().board().clone();
    remote.apply_move(sq("e7"), sq("e6"));
    let mut writer = host.adapter().clone();
    let id = guest.phase().game_id().cloned().expect("online");
    writer.push(&id, &remote, Color::White).expect("store is online");

    guest.pump();
    assert_eq!(guest.session().selection(), None);
    assert_eq!(guest.session().board(), &remote);
    assert_eq!(guest.session().current_player(), Color::White);
}

#[test]
fn failed_push_keeps_local_move() {
    let (mut host, mut guest, store) = connected();
    store.set_offline(true);

    play(&mut host, "d2 d4.");
    assert_eq!(host.session().current_player(), Color::Black);
    assert_eq!(
        host.session().board().get(sq("d4")),
        Some(Role::Pawn.of(Color::White))
    );

    guest.pump();
    assert_eq!(guest.session().board(), &Board::new());
}

#[test]
fn reset_returns_to_local_play() {
    let (mut host, _guest, store) = connected();
    let id = host.phase().game_id().cloned().expect("online");
    play(&mut host, "e2 e4.");

    host.reset();
    assert_eq!(host.phase(), &Phase::Local);
    assert_eq!(host.session(), &GameSession::new());
    assert_eq!(store.listener_count(&id), 1, "only the guest still listens");

    // Both colors are playable again on this device
    play(&mut host, "e2 e4. e7 e5.");
    assert_eq!(host.session().current_player(), Color::White);
}
