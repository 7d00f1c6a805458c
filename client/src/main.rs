use clap::Parser;
use tracing::info;

use crate::{
    config::Config,
    state_store::{State, StateStore},
    termination::{create_termination, Interrupted, Terminator},
    ui_management::UiManager,
};

mod config;
mod session;
mod state_store;
mod termination;
mod ui_management;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let _log_guard = init_tracing(&config)?;

    let (terminator, mut interrupt_rx) = create_termination();
    let (state_store, state_rx) = StateStore::new();
    let (ui_manager, action_rx) = UiManager::new();
    let store_interrupt_rx = terminator.subscribe();
    let ui_interrupt_rx = terminator.subscribe();

    tokio::try_join!(
        state_store.main_loop(
            terminator,
            State::new(&config.server, &config.username),
            action_rx,
            store_interrupt_rx,
        ),
        ui_manager.main_loop(state_rx, ui_interrupt_rx),
    )?;

    if let Ok(reason) = interrupt_rx.recv().await {
        match reason {
            Interrupted::UserInt => info!("exited per user request"),
            Interrupted::OsSigInt => info!("exited because of an os sig int"),
        }
    } else {
        info!("exited because of an unexpected error");
    }

    Ok(())
}

// the terminal belongs to the UI, so logs go to a file
fn init_tracing(config: &Config) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    let directory = match config.log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    let file_name = config
        .log_file
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("log file path has no file name"))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
