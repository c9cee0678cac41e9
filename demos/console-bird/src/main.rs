//! A console client: joins a session, prints what happens, and maps
//! stdin to actions. Press Enter to jump, `r` + Enter to restart,
//! `q` + Enter to quit.
//!
//! Run against a local authority:
//!
//! ```text
//! console-bird ws://127.0.0.1:1337/ws
//! ```

use flaplink::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ws://127.0.0.1:1337/ws".to_string());
    info!(%url, "joining session");

    let mut dispatcher = Dispatcher::new();
    dispatcher.on_connected(|id| println!("* you are {id}"));
    dispatcher.on_player_joined(|id| println!("* {id} joined"));
    dispatcher.on_roster(|players| {
        let names: Vec<_> =
            players.iter().map(|p| p.as_str().to_owned()).collect();
        println!("* players: {}", names.join(", "));
    });
    dispatcher.on_countdown(|n| println!("* starting in {n}..."));
    dispatcher.on_playing(|()| println!("* go! (Enter to jump)"));
    dispatcher.on_player_jumped(|id| println!("* {id} jumped"));
    dispatcher.on_player_died(|id| println!("* {id} died"));
    dispatcher.on_local_death(|cause| println!("* you died: {cause:?}"));
    dispatcher.on_game_over(|()| {
        println!("* game over (r to restart, q to quit)");
    });

    let handle = Client::spawn(
        WebSocketConnector::new(url),
        ClientConfig::default(),
        dispatcher,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match line.trim() {
            "q" => break,
            "r" => handle.restart(),
            _ => handle.jump(),
        }
    }

    handle.shutdown();
}
