use std::collections::VecDeque;

use comms::command::UserCommand;

/// Commands emitted by the session, waiting to be written to the server.
///
/// Handlers run synchronously and only queue commands here; the caller
/// flushes them afterwards in emission order.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: VecDeque<UserCommand>,
}

impl Outbox {
    pub fn emit(&mut self, command: UserCommand) {
        self.queue.push_back(command);
    }

    /// Take every queued command, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = UserCommand> + '_ {
        self.queue.drain(..)
    }
}
