//! Tests for the per-connection session protocol.

use strictly_gomoku::{
    ClientMessage, GameEvent, Highlight, JoinReply, Orientation, Participant, ServerMessage, Slot,
};
use strictly_server::{Flow, Lobby, SessionGateway, SessionState};
use tokio::sync::mpsc;

/// A connected client: its gateway and the messages pushed to it.
struct Client {
    gateway: SessionGateway,
    rx: mpsc::UnboundedReceiver<ServerMessage>,
}

impl Client {
    fn connect(lobby: &Lobby) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = lobby.connect(tx);
        Self {
            gateway: SessionGateway::new(lobby.clone(), connection_id),
            rx,
        }
    }

    fn send(&mut self, message: ClientMessage) -> Flow {
        self.gateway.handle(message)
    }

    fn join(&mut self, room: &str, username: &str, spectate: bool) -> Flow {
        self.send(ClientMessage::Join {
            room: room.to_string(),
            username: username.to_string(),
            spectate,
        })
    }

    fn play(&mut self, x: i64, y: i64) {
        assert_eq!(self.send(ClientMessage::Move { x, y }), Flow::Continue);
    }

    fn participant(&self, username: &str) -> Participant {
        Participant::new(self.gateway.connection_id().to_string(), username.to_string())
    }

    fn drain(&mut self) -> Vec<ServerMessage> {
        std::iter::from_fn(|| self.rx.try_recv().ok()).collect()
    }
}

fn join_error(message: &str) -> ServerMessage {
    JoinReply::Error {
        message: message.to_string(),
    }
    .into()
}

/// Lobby with room "r1", alice and bob seated and the match started.
fn started_match() -> (Lobby, Client, Client) {
    let lobby = Lobby::new();
    lobby.create_room("r1").expect("create");
    let mut alice = Client::connect(&lobby);
    let mut bob = Client::connect(&lobby);
    alice.join("r1", "alice", false);
    bob.join("r1", "bob", false);
    alice.send(ClientMessage::Start);
    alice.drain();
    bob.drain();
    (lobby, alice, bob)
}

#[test]
fn test_two_players_receive_start() {
    let lobby = Lobby::new();
    lobby.create_room("r1").expect("create");
    let mut alice = Client::connect(&lobby);
    let mut bob = Client::connect(&lobby);

    assert_eq!(alice.join("r1", "alice", false), Flow::Continue);
    assert_eq!(alice.drain(), vec![ServerMessage::from(JoinReply::Success)]);

    assert_eq!(bob.join("r1", "bob", false), Flow::Continue);
    assert_eq!(
        alice.drain(),
        vec![ServerMessage::from(JoinReply::Start {
            slot: Slot::First,
            opponent: bob.participant("bob"),
        })]
    );
    assert_eq!(
        bob.drain(),
        vec![ServerMessage::from(JoinReply::Start {
            slot: Slot::Second,
            opponent: alice.participant("alice"),
        })]
    );
    assert!(matches!(
        bob.gateway.state(),
        SessionState::Player { slot: Slot::Second, .. }
    ));
}

#[test]
fn test_join_missing_room_closes() {
    let lobby = Lobby::new();
    let mut client = Client::connect(&lobby);
    assert_eq!(client.join("ghost", "alice", false), Flow::Close);
    assert_eq!(client.drain(), vec![join_error("target room does not exist")]);
    assert_eq!(client.gateway.state(), &SessionState::Closed);
    assert_eq!(lobby.room_count(), 0);
}

#[test]
fn test_third_player_refused() {
    let (lobby, _alice, _bob) = started_match();
    let mut carol = Client::connect(&lobby);
    assert_eq!(carol.join("r1", "carol", false), Flow::Close);
    assert_eq!(carol.drain(), vec![join_error("game already in progress")]);
}

#[test]
fn test_spectating_a_half_empty_room_refused() {
    let lobby = Lobby::new();
    lobby.create_room("r1").expect("create");
    let mut alice = Client::connect(&lobby);
    alice.join("r1", "alice", false);

    let mut sam = Client::connect(&lobby);
    assert_eq!(sam.join("r1", "sam", true), Flow::Close);
    assert_eq!(sam.drain(), vec![join_error("spectated game has not started")]);
}

#[test]
fn test_second_join_is_ignored() {
    let lobby = Lobby::new();
    lobby.create_room("r1").expect("create");
    lobby.create_room("r2").expect("create");
    let mut alice = Client::connect(&lobby);
    alice.join("r1", "alice", false);
    alice.drain();

    assert_eq!(alice.join("r2", "alice", false), Flow::Continue);
    assert!(alice.drain().is_empty());
    let rooms = lobby.list_rooms();
    assert_eq!(rooms[0].players, vec!["alice".to_string()]);
    assert!(rooms[1].players.is_empty());
}

#[test]
fn test_moves_are_broadcast_and_collisions_dropped() {
    let (_lobby, mut alice, mut bob) = started_match();

    alice.play(7, 7);
    let place = ServerMessage::from(GameEvent::Place { x: 7, y: 7, slot: Slot::First });
    assert_eq!(alice.drain(), vec![place.clone()]);
    assert_eq!(bob.drain(), vec![place]);

    bob.play(7, 7);
    assert!(alice.drain().is_empty());
    assert!(bob.drain().is_empty());

    alice.play(8, 8);
    assert!(bob.drain().is_empty(), "alice moved out of turn");
}

#[test]
fn test_moves_before_start_are_dropped() {
    let lobby = Lobby::new();
    lobby.create_room("r1").expect("create");
    let mut alice = Client::connect(&lobby);
    let mut bob = Client::connect(&lobby);
    alice.join("r1", "alice", false);
    bob.join("r1", "bob", false);
    alice.drain();
    bob.drain();

    alice.play(0, 0);
    assert!(bob.drain().is_empty());

    bob.send(ClientMessage::Start);
    alice.play(0, 0);
    assert_eq!(bob.drain().len(), 1);
}

#[test]
fn test_start_is_single_use_per_connection() {
    let lobby = Lobby::new();
    let handle = lobby.create_room("r1").expect("create");
    let mut alice = Client::connect(&lobby);
    let mut bob = Client::connect(&lobby);
    alice.join("r1", "alice", false);
    bob.join("r1", "bob", false);

    alice.send(ClientMessage::Start);
    match alice.gateway.state() {
        SessionState::Player { started, .. } => assert!(*started),
        other => panic!("expected player, got {other:?}"),
    }
    assert!(!lobby.start(&handle, alice.gateway.connection_id()));
}

#[test]
fn test_five_in_a_row_ends_match() {
    let (lobby, mut alice, mut bob) = started_match();

    for x in 0..4 {
        alice.play(x, 0);
        bob.play(x, 1);
    }
    alice.drain();
    bob.drain();
    alice.play(4, 0);

    let win = ServerMessage::from(GameEvent::Win {
        winner: Some(alice.participant("alice")),
        highlight: Some(Highlight::new(Orientation::Horizontal, 0, 0)),
    });
    let place = ServerMessage::from(GameEvent::Place { x: 4, y: 0, slot: Slot::First });
    assert_eq!(alice.drain(), vec![place.clone(), win.clone()]);
    assert_eq!(bob.drain(), vec![place, win]);
    assert_eq!(lobby.room_count(), 0);

    bob.play(9, 9);
    assert!(alice.drain().is_empty());
}

#[test]
fn test_spectator_join_and_leave() {
    let (lobby, mut alice, mut bob) = started_match();
    alice.play(2, 2);
    alice.drain();
    bob.drain();

    let mut sam = Client::connect(&lobby);
    assert_eq!(sam.join("r1", "sam", true), Flow::Continue);
    assert_eq!(alice.drain(), vec![ServerMessage::from(GameEvent::SpectatorJoined)]);
    assert_eq!(bob.drain(), vec![ServerMessage::from(GameEvent::SpectatorJoined)]);
    match sam.drain().as_slice() {
        [ServerMessage::Join(JoinReply::RoomInfo { room })] => {
            assert_eq!(room.name, "r1");
            assert_eq!(room.turn, Slot::Second);
        }
        other => panic!("expected room info, got {other:?}"),
    }

    sam.play(3, 3);
    assert!(alice.drain().is_empty());

    bob.play(3, 3);
    assert_eq!(sam.drain().len(), 1);
    alice.drain();
    bob.drain();

    sam.gateway.disconnect();
    assert_eq!(alice.drain(), vec![ServerMessage::from(GameEvent::SpectatorLeft)]);
    assert_eq!(bob.drain(), vec![ServerMessage::from(GameEvent::SpectatorLeft)]);
    assert_eq!(lobby.room_count(), 1);
}

#[test]
fn test_player_disconnect_closes_room() {
    let (lobby, mut alice, mut bob) = started_match();
    let mut sam = Client::connect(&lobby);
    sam.join("r1", "sam", true);
    sam.drain();
    alice.drain();

    bob.gateway.disconnect();
    let notice = ServerMessage::from(GameEvent::PlayerDisconnected {
        user: bob.participant("bob"),
    });
    assert_eq!(alice.drain(), vec![notice.clone()]);
    assert_eq!(sam.drain(), vec![notice]);
    assert_eq!(lobby.room_count(), 0);

    // Cleanup after the room is gone is a no-op.
    alice.gateway.disconnect();
    sam.gateway.disconnect();
    assert!(sam.drain().is_empty());
}

#[test]
fn test_stale_session_does_not_touch_recreated_room() {
    let (lobby, mut alice, mut bob) = started_match();
    alice.gateway.disconnect();
    bob.drain();
    assert_eq!(lobby.room_count(), 0);

    lobby.create_room("r1").expect("recreate");
    let mut carol = Client::connect(&lobby);
    carol.join("r1", "carol", false);
    carol.drain();

    bob.play(0, 0);
    bob.gateway.disconnect();
    assert_eq!(lobby.room_count(), 1);
    assert!(carol.drain().is_empty());
    assert_eq!(lobby.list_rooms()[0].players, vec!["carol".to_string()]);
}

#[test]
fn test_malformed_frames_are_ignored() {
    let lobby = Lobby::new();
    lobby.create_room("r1").expect("create");
    let mut client = Client::connect(&lobby);
    assert_eq!(client.gateway.handle_text("not json"), Flow::Continue);
    assert_eq!(client.gateway.handle_text(r#"{"type":"dance"}"#), Flow::Continue);
    assert_eq!(
        client
            .gateway
            .handle_text(r#"{"type":"join","room":"r1","username":"alice","spectate":false}"#),
        Flow::Continue
    );
    assert_eq!(client.drain(), vec![ServerMessage::from(JoinReply::Success)]);
}
