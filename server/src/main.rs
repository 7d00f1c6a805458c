use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::{
    net::TcpListener,
    signal::unix::{signal, SignalKind},
    sync::broadcast,
    task::JoinSet,
};
use tracing::{error, info};

use crate::{config::Config, room_manager::RoomManagerBuilder};

mod config;
mod room_manager;
mod session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::parse();
    let room_manager = Arc::new(
        config
            .rooms
            .iter()
            .map(|room| room.trim())
            .filter(|room| !room.is_empty())
            .fold(RoomManagerBuilder::new(), |builder, room| {
                builder.create_room(room)
            })
            .history_limit(config.history_limit)
            .build(),
    );

    let mut join_set: JoinSet<anyhow::Result<()>> = JoinSet::new();
    let mut interrupt =
        signal(SignalKind::interrupt()).context("failed to create interrupt signal stream")?;
    let server = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("could not bind to {}", config.listen_addr()))?;
    let (quit_tx, quit_rx) = broadcast::channel::<()>(1);

    info!(addr = %config.listen_addr(), rooms = ?config.rooms, "listening");
    loop {
        tokio::select! {
            _ = interrupt.recv() => {
                info!("server interrupted, gracefully shutting down");
                // no receivers left means no sessions to notify
                let _ = quit_tx.send(());
                break;
            }
            Ok((socket, peer)) = server.accept() => {
                info!(%peer, "accepted connection");
                join_set.spawn(session::handle_user_session(room_manager.clone(), quit_rx.resubscribe(), socket));
            }
            Some(result) = join_set.join_next(), if !join_set.is_empty() => {
                log_session_result(result);
            }
        }
    }

    while let Some(result) = join_set.join_next().await {
        log_session_result(result);
    }
    info!("server shut down");

    Ok(())
}

fn log_session_result(result: Result<anyhow::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => error!("session ended with an error: {:#}", err),
        Err(err) => error!("session task failed: {}", err),
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
