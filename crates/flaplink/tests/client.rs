//! Integration tests for the full client: a real WebSocket connection
//! against an in-process authority, driven end to end.

use std::time::Duration;

use flaplink::prelude::*;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;

// =========================================================================
// In-process authority
// =========================================================================

/// Handles to a scripted authority: push frames down, observe what the
/// client sends up, and get notified on each accepted connection.
struct Authority {
    url: String,
    opened: mpsc::UnboundedReceiver<()>,
    outbound: mpsc::UnboundedSender<String>,
    received: mpsc::UnboundedReceiver<Message>,
    kick: mpsc::UnboundedSender<()>,
}

impl Authority {
    fn push(&self, msg: &Message) {
        self.push_raw(serde_json::to_string(msg).expect("encode"));
    }

    fn push_raw(&self, frame: impl Into<String>) {
        self.outbound.send(frame.into()).expect("authority task alive");
    }

    /// Drops the current connection from the server side.
    fn kick(&self) {
        self.kick.send(()).expect("authority task alive");
    }
}

/// Starts a WebSocket authority on a random port. Accepts connections
/// one at a time (a dropped connection makes room for the next), which
/// is exactly the shape a restart produces.
async fn start_authority() -> Authority {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let url = format!("ws://{}/ws", listener.local_addr().expect("addr"));

    let (opened_tx, opened_rx) = mpsc::unbounded_channel();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let (recv_tx, recv_rx) = mpsc::unbounded_channel::<Message>();
    let (kick_tx, mut kick_rx) = mpsc::unbounded_channel::<()>();

    tokio::spawn(async move {
        loop {
            let Ok((tcp, _)) = listener.accept().await else {
                return;
            };
            let Ok(mut ws) = tokio_tungstenite::accept_async(tcp).await
            else {
                continue;
            };
            if opened_tx.send(()).is_err() {
                return;
            }

            loop {
                tokio::select! {
                    _ = kick_rx.recv() => {
                        let _ = ws.close(None).await;
                        break;
                    }
                    frame = out_rx.recv() => match frame {
                        Some(frame) => {
                            if ws
                                .send(WsMessage::Text(frame.into()))
                                .await
                                .is_err()
                            {
                                break;
                            }
                        }
                        None => return,
                    },
                    frame = ws.next() => match frame {
                        Some(Ok(WsMessage::Text(text))) => {
                            let msg = serde_json::from_str(text.as_str())
                                .expect("client sent a well-formed message");
                            if recv_tx.send(msg).is_err() {
                                return;
                            }
                        }
                        Some(Ok(_)) => {}
                        _ => break,
                    },
                }
            }
        }
    });

    Authority {
        url,
        opened: opened_rx,
        outbound: out_tx,
        received: recv_rx,
        kick: kick_tx,
    }
}

// =========================================================================
// Dispatcher observation
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Connected(PlayerId),
    Joined(PlayerId),
    Roster(Vec<PlayerId>),
    Countdown(u32),
    Playing,
    Jumped(PlayerId),
    Died(PlayerId),
    GameOver,
    LocalDeath(DeathCause),
}

/// A dispatcher whose handlers forward every event into a channel.
fn observing_dispatcher() -> (Dispatcher, mpsc::UnboundedReceiver<Seen>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut dispatcher = Dispatcher::new();

    let t = tx.clone();
    dispatcher.on_connected(move |id| {
        let _ = t.send(Seen::Connected(id));
    });
    let t = tx.clone();
    dispatcher.on_player_joined(move |id| {
        let _ = t.send(Seen::Joined(id));
    });
    let t = tx.clone();
    dispatcher.on_roster(move |players| {
        let _ = t.send(Seen::Roster(players));
    });
    let t = tx.clone();
    dispatcher.on_countdown(move |n| {
        let _ = t.send(Seen::Countdown(n));
    });
    let t = tx.clone();
    dispatcher.on_playing(move |()| {
        let _ = t.send(Seen::Playing);
    });
    let t = tx.clone();
    dispatcher.on_player_jumped(move |id| {
        let _ = t.send(Seen::Jumped(id));
    });
    let t = tx.clone();
    dispatcher.on_player_died(move |id| {
        let _ = t.send(Seen::Died(id));
    });
    let t = tx.clone();
    dispatcher.on_game_over(move |()| {
        let _ = t.send(Seen::GameOver);
    });
    dispatcher.on_local_death(move |cause| {
        let _ = tx.send(Seen::LocalDeath(cause));
    });

    (dispatcher, rx)
}

async fn next_seen(rx: &mut mpsc::UnboundedReceiver<Seen>) -> Seen {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a dispatched event")
        .expect("client gone")
}

async fn next_sent(rx: &mut mpsc::UnboundedReceiver<Message>) -> Message {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a client message")
        .expect("authority gone")
}

/// Asserts that nothing reaches the authority for a short while.
async fn assert_nothing_sent(rx: &mut mpsc::UnboundedReceiver<Message>) {
    let result = timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(result.is_err(), "unexpected message: {result:?}");
}

/// A simulation the local actor cannot die in: bounds and obstacles
/// are pushed out of reach so tests control the session, not gravity.
fn no_death_config() -> ClientConfig {
    ClientConfig {
        sim: SimConfig {
            viewport_height: 1_000_000_000.0,
            level: LevelConfig {
                gap: 1_000_000_000.0,
                ..LevelConfig::default()
            },
            ..SimConfig::default()
        },
        ..ClientConfig::default()
    }
}

fn connect_msg(id: &str, roster: Option<&[&str]>) -> Message {
    Message::Connect {
        player_id: PlayerId::new(id),
        all_player_ids: roster
            .map(|ids| ids.iter().map(|s| PlayerId::new(*s)).collect()),
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_session_reaches_playing_and_reports_a_jump() {
    let mut authority = start_authority().await;
    let (dispatcher, mut seen) = observing_dispatcher();
    let handle = Client::spawn(
        WebSocketConnector::new(authority.url.as_str()),
        no_death_config(),
        dispatcher,
    );
    authority.opened.recv().await.expect("client connects");

    authority.push(&connect_msg("p1", Some(&["p1"])));
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Connected(PlayerId::new("p1"))
    );

    authority.push(&Message::Countdown { countdown: 1 });
    assert_eq!(next_seen(&mut seen).await, Seen::Countdown(1));

    authority.push(&Message::Playing);
    assert_eq!(next_seen(&mut seen).await, Seen::Playing);

    handle.jump();
    assert_eq!(
        next_sent(&mut authority.received).await,
        Message::Jump {
            player_id: PlayerId::new("p1")
        }
    );

    handle.shutdown();
}

#[tokio::test]
async fn test_actions_without_identity_are_suppressed() {
    let mut authority = start_authority().await;
    let (dispatcher, mut seen) = observing_dispatcher();
    let handle = Client::spawn(
        WebSocketConnector::new(authority.url.as_str()),
        no_death_config(),
        dispatcher,
    );
    authority.opened.recv().await.expect("client connects");

    // Play begins before any identity was assigned.
    authority.push(&Message::Playing);
    assert_eq!(next_seen(&mut seen).await, Seen::Playing);

    handle.jump();
    assert_nothing_sent(&mut authority.received).await;

    // Once the identity lands, the same action goes through, tagged.
    authority.push(&connect_msg("p1", None));
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Connected(PlayerId::new("p1"))
    );

    handle.jump();
    assert_eq!(
        next_sent(&mut authority.received).await,
        Message::Jump {
            player_id: PlayerId::new("p1")
        }
    );

    handle.shutdown();
}

#[tokio::test]
async fn test_local_death_is_reported_then_confirmed() {
    let mut authority = start_authority().await;
    let (dispatcher, mut seen) = observing_dispatcher();

    // Default-size viewport with the obstacles out of reach: the actor
    // falls out of the bottom in under a second of play.
    let config = ClientConfig {
        sim: SimConfig {
            level: LevelConfig {
                gap: 1_000_000_000.0,
                ..LevelConfig::default()
            },
            ..SimConfig::default()
        },
        ..ClientConfig::default()
    };
    let handle = Client::spawn(
        WebSocketConnector::new(authority.url.as_str()),
        config,
        dispatcher,
    );
    authority.opened.recv().await.expect("client connects");

    authority.push(&connect_msg("p1", Some(&["p1"])));
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Connected(PlayerId::new("p1"))
    );
    authority.push(&Message::Playing);
    assert_eq!(next_seen(&mut seen).await, Seen::Playing);

    // Gravity does its work; the death is reported with our identity.
    assert_eq!(
        next_sent(&mut authority.received).await,
        Message::Die {
            player_id: PlayerId::new("p1")
        }
    );
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::LocalDeath(DeathCause::OutOfBoundsBottom)
    );

    // Provisionally over: no further actions until the authority rules.
    handle.jump();
    assert_nothing_sent(&mut authority.received).await;

    authority.push(&Message::GameOver);
    assert_eq!(next_seen(&mut seen).await, Seen::GameOver);

    handle.shutdown();
}

#[tokio::test]
async fn test_peer_events_are_dispatched() {
    let mut authority = start_authority().await;
    let (dispatcher, mut seen) = observing_dispatcher();
    let handle = Client::spawn(
        WebSocketConnector::new(authority.url.as_str()),
        no_death_config(),
        dispatcher,
    );
    authority.opened.recv().await.expect("client connects");

    authority.push(&connect_msg("p1", Some(&["p1"])));
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Connected(PlayerId::new("p1"))
    );

    // A later `connect` is a peer joining, not a reassignment.
    authority.push(&connect_msg("p2", None));
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Joined(PlayerId::new("p2"))
    );

    authority.push(&Message::Players {
        players: vec![
            PlayerId::new("p1"),
            PlayerId::new("p2"),
            PlayerId::new("p3"),
        ],
    });
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Roster(vec![
            PlayerId::new("p1"),
            PlayerId::new("p2"),
            PlayerId::new("p3"),
        ])
    );

    // Our own jump echoed back is swallowed; a peer's is dispatched.
    authority.push(&Message::Jump {
        player_id: PlayerId::new("p1"),
    });
    authority.push(&Message::Jump {
        player_id: PlayerId::new("p2"),
    });
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Jumped(PlayerId::new("p2"))
    );

    authority.push(&Message::PlayerDie {
        player_id: PlayerId::new("p2"),
    });
    assert_eq!(next_seen(&mut seen).await, Seen::Died(PlayerId::new("p2")));

    handle.shutdown();
}

#[tokio::test]
async fn test_restart_rejoins_with_a_fresh_identity() {
    let mut authority = start_authority().await;
    let (dispatcher, mut seen) = observing_dispatcher();
    let handle = Client::spawn(
        WebSocketConnector::new(authority.url.as_str()),
        no_death_config(),
        dispatcher,
    );
    authority.opened.recv().await.expect("client connects");

    authority.push(&connect_msg("p1", None));
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Connected(PlayerId::new("p1"))
    );

    // Restart tears the connection down and rejoins immediately.
    handle.restart();
    authority.opened.recv().await.expect("client reconnects");

    // The authority assigns a new identity; the old one must be gone,
    // so this `connect` is adopted as our own, not a peer.
    authority.push(&connect_msg("p2", None));
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Connected(PlayerId::new("p2"))
    );

    handle.jump();
    assert_nothing_sent(&mut authority.received).await; // not playing yet

    authority.push(&Message::Playing);
    assert_eq!(next_seen(&mut seen).await, Seen::Playing);
    handle.jump();
    assert_eq!(
        next_sent(&mut authority.received).await,
        Message::Jump {
            player_id: PlayerId::new("p2")
        }
    );

    handle.shutdown();
}

#[tokio::test]
async fn test_undecodable_frames_are_dropped_not_fatal() {
    let mut authority = start_authority().await;
    let (dispatcher, mut seen) = observing_dispatcher();
    let handle = Client::spawn(
        WebSocketConnector::new(authority.url.as_str()),
        no_death_config(),
        dispatcher,
    );
    authority.opened.recv().await.expect("client connects");

    // Unknown kinds and outright garbage must not kill the session.
    authority.push_raw(r#"{"type":"leaderboard","top":[]}"#);
    authority.push_raw("not json at all");
    authority.push(&connect_msg("p1", None));
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Connected(PlayerId::new("p1"))
    );

    authority.push(&Message::Countdown { countdown: 3 });
    assert_eq!(next_seen(&mut seen).await, Seen::Countdown(3));

    handle.shutdown();
}

#[tokio::test]
async fn test_mid_play_reconnect_resumes_simulation_frames() {
    let mut authority = start_authority().await;
    let (mut dispatcher, mut seen) = observing_dispatcher();
    let (frame_tx, mut frames) = mpsc::unbounded_channel();
    dispatcher.on_frame(move |snapshot| {
        let _ = frame_tx.send(snapshot);
    });

    let config = ClientConfig {
        transport: TransportConfig {
            reconnect_delay: Duration::from_millis(50),
            ..TransportConfig::default()
        },
        ..no_death_config()
    };
    let handle = Client::spawn(
        WebSocketConnector::new(authority.url.as_str()),
        config,
        dispatcher,
    );
    authority.opened.recv().await.expect("client connects");

    authority.push(&connect_msg("p1", None));
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Connected(PlayerId::new("p1"))
    );
    authority.push(&Message::Playing);
    assert_eq!(next_seen(&mut seen).await, Seen::Playing);

    // The round is live: simulation frames flow.
    timeout(Duration::from_secs(5), frames.recv())
        .await
        .expect("frames while playing")
        .expect("client alive");

    // The connection drops mid-play; the client reconnects and the
    // fresh identity starts a fresh session even though the machine
    // never saw a game-over.
    authority.kick();
    authority.opened.recv().await.expect("client reconnects");

    authority.push(&connect_msg("p2", None));
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Connected(PlayerId::new("p2"))
    );
    authority.push(&Message::Playing);
    assert_eq!(next_seen(&mut seen).await, Seen::Playing);

    // Drain frames buffered before the drop, then require new ones:
    // the resumed round must actually tick.
    while frames.try_recv().is_ok() {}
    timeout(Duration::from_secs(5), frames.recv())
        .await
        .expect("frames must resume after the mid-play reconnect")
        .expect("client alive");

    // And actions go out under the new identity.
    handle.jump();
    assert_eq!(
        next_sent(&mut authority.received).await,
        Message::Jump {
            player_id: PlayerId::new("p2")
        }
    );

    handle.shutdown();
}

#[tokio::test]
async fn test_reconnect_after_loss_starts_a_fresh_session() {
    let mut authority = start_authority().await;
    let (dispatcher, mut seen) = observing_dispatcher();

    // Short reconnect delay so the test doesn't sit out the default 3 s.
    let config = ClientConfig {
        transport: TransportConfig {
            reconnect_delay: Duration::from_millis(50),
            ..TransportConfig::default()
        },
        ..no_death_config()
    };
    let handle = Client::spawn(
        WebSocketConnector::new(authority.url.as_str()),
        config,
        dispatcher,
    );
    authority.opened.recv().await.expect("client connects");

    authority.push(&connect_msg("p1", None));
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Connected(PlayerId::new("p1"))
    );
    authority.push(&Message::Playing);
    assert_eq!(next_seen(&mut seen).await, Seen::Playing);
    authority.push(&Message::GameOver);
    assert_eq!(next_seen(&mut seen).await, Seen::GameOver);

    // The authority drops the connection; the client reconnects on its
    // own and must treat the new identity as a fresh session.
    authority.kick();
    authority.opened.recv().await.expect("client reconnects");

    authority.push(&connect_msg("p2", None));
    assert_eq!(
        next_seen(&mut seen).await,
        Seen::Connected(PlayerId::new("p2"))
    );

    // The finished round did not carry over: play starts again and
    // actions go out tagged with the new identity.
    authority.push(&Message::Playing);
    assert_eq!(next_seen(&mut seen).await, Seen::Playing);
    handle.jump();
    assert_eq!(
        next_sent(&mut authority.received).await,
        Message::Jump {
            player_id: PlayerId::new("p2")
        }
    );

    handle.shutdown();
}
