use crossterm::event::KeyEvent;
use ratatui::{prelude::Backend, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, ServerConnectionStatus, State};

use self::{chat_page::ChatPage, connect_page::ConnectPage};

use super::components::{Component, ComponentRender};

mod chat_page;
mod connect_page;

/// The page currently on screen, only the visible one is kept alive
enum Page {
    Connect(ConnectPage),
    Chat(ChatPage),
}

impl Page {
    /// The chat page needs a live session, everything else goes through the connect page
    fn wants_chat(status: &ServerConnectionStatus) -> bool {
        matches!(status, ServerConnectionStatus::Connected { .. })
    }

    fn for_state(state: &State, action_tx: UnboundedSender<Action>) -> Self {
        if Self::wants_chat(&state.server_connection_status) {
            Page::Chat(ChatPage::new(state, action_tx))
        } else {
            Page::Connect(ConnectPage::new(state, action_tx))
        }
    }

    fn is_chat(&self) -> bool {
        matches!(self, Page::Chat(_))
    }
}

/// [AppRouter] swaps between the connect and chat pages as the connection comes and goes.
///
/// A page is built from scratch whenever the route changes, so a reconnect starts
/// with a clean chat page and a dropped connection lands on a connect page that is
/// prefilled with the last address and username and shows why the session ended.
pub struct AppRouter {
    action_tx: UnboundedSender<Action>,
    page: Page,
}

impl Component for AppRouter {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        AppRouter {
            page: Page::for_state(state, action_tx.clone()),
            action_tx,
        }
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        let page = if Page::wants_chat(&state.server_connection_status) == self.page.is_chat() {
            match self.page {
                Page::Connect(page) => Page::Connect(page.move_with_state(state)),
                Page::Chat(page) => Page::Chat(page.move_with_state(state)),
            }
        } else {
            Page::for_state(state, self.action_tx.clone())
        };

        AppRouter { page, ..self }
    }

    fn name(&self) -> &str {
        match &self.page {
            Page::Connect(page) => page.name(),
            Page::Chat(page) => page.name(),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match &mut self.page {
            Page::Connect(page) => page.handle_key_event(key),
            Page::Chat(page) => page.handle_key_event(key),
        }
    }
}

impl ComponentRender<()> for AppRouter {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: ()) {
        match &self.page {
            Page::Connect(page) => page.render(frame, props),
            Page::Chat(page) => page.render(frame, props),
        }
    }
}
