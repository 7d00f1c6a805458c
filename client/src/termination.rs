use tokio::sync::broadcast;
use tracing::{info, warn};

/// Why the client is shutting down
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interrupted {
    OsSigInt,
    UserInt,
}

/// [Terminator] lets any task ask every other task to stop
#[derive(Debug, Clone)]
pub struct Terminator {
    interrupt_tx: broadcast::Sender<Interrupted>,
}

impl Terminator {
    pub fn new(interrupt_tx: broadcast::Sender<Interrupted>) -> Self {
        Self { interrupt_tx }
    }

    pub fn terminate(&mut self, interrupted: Interrupted) -> anyhow::Result<()> {
        self.interrupt_tx.send(interrupted)?;

        Ok(())
    }

    /// A receiver that sees every interrupt sent from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Interrupted> {
        self.interrupt_tx.subscribe()
    }
}

// raw mode swallows Ctrl-C as a key press, so this mostly catches `kill -INT`
async fn terminate_on_sigint(mut terminator: Terminator) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("could not listen for the interrupt signal: {}", err);
        return;
    }
    info!("received interrupt signal");

    let _ = terminator.terminate(Interrupted::OsSigInt);
}

/// Create the [Terminator] and the first receiver of the shutdown broadcast
pub fn create_termination() -> (Terminator, broadcast::Receiver<Interrupted>) {
    let (tx, rx) = broadcast::channel(1);
    let terminator = Terminator::new(tx);

    tokio::spawn(terminate_on_sigint(terminator.clone()));

    (terminator, rx)
}
