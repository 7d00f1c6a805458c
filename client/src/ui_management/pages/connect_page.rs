use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, ServerConnectionStatus, State};
use crate::ui_management::components::{
    input_box::{self, InputBox},
    Component, ComponentRender,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ServerAddr,
    Username,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::ServerAddr => Field::Username,
            Field::Username => Field::ServerAddr,
        }
    }
}

struct Props {
    connection_status: ServerConnectionStatus,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            connection_status: state.server_connection_status.clone(),
        }
    }
}

/// ConnectPage asks for the server address and the username, then connects
pub struct ConnectPage {
    /// Action sender
    pub action_tx: UnboundedSender<Action>,
    props: Props,
    //
    addr_input: InputBox,
    username_input: InputBox,
    focus: Field,
}

impl ConnectPage {
    fn focused_input_mut(&mut self) -> &mut InputBox {
        match self.focus {
            Field::ServerAddr => &mut self.addr_input,
            Field::Username => &mut self.username_input,
        }
    }

    fn connect(&mut self) {
        if self.props.connection_status == ServerConnectionStatus::Connecting {
            return;
        }

        let addr = self.addr_input.text().trim();
        let username = self.username_input.text().trim();

        // both fields are required, jump to the first empty one
        if addr.is_empty() {
            self.focus = Field::ServerAddr;
            return;
        }
        if username.is_empty() {
            self.focus = Field::Username;
            return;
        }

        let _ = self.action_tx.send(Action::ConnectToServerRequest {
            addr: addr.to_string(),
            username: username.to_string(),
        });
    }

    fn status_line(&self) -> Line {
        match &self.props.connection_status {
            ServerConnectionStatus::Uninitalized => Line::from(vec![
                "Press ".into(),
                "<Enter>".bold(),
                " to connect, ".into(),
                "<Tab>".bold(),
                " to switch fields.".into(),
            ]),
            ServerConnectionStatus::Connecting => Line::from("Connecting...".italic()),
            ServerConnectionStatus::Connected { addr } => Line::from(format!("Connected to {}", addr)),
            ServerConnectionStatus::Errored { err } => {
                Line::from(Span::styled(err.clone(), Style::default().fg(Color::Red)))
            }
        }
    }
}

impl Component for ConnectPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        ConnectPage {
            action_tx: action_tx.clone(),
            props: Props::from(state),
            //
            addr_input: InputBox::with_text(&state.server_addr),
            username_input: InputBox::with_text(&state.username),
            // skip straight to the missing piece
            focus: if state.username.is_empty() {
                Field::Username
            } else {
                Field::ServerAddr
            },
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        ConnectPage {
            props: Props::from(state),
            ..self
        }
    }

    fn name(&self) -> &str {
        "Connect Page"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Enter => self.connect(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = self.focus.next();
            }
            KeyCode::Esc => {
                let _ = self.action_tx.send(Action::Exit);
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let _ = self.action_tx.send(Action::Exit);
            }
            _ => self.focused_input_mut().handle_key_event(key),
        }
    }
}

impl ComponentRender<()> for ConnectPage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        let [_, vertical_centered, _] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Ratio(1, 3),
                    Constraint::Min(1),
                    Constraint::Ratio(1, 3),
                ]
                .as_ref(),
            )
            .split(frame.size())
        else {
            panic!("The main layout should have 3 chunks")
        };

        let [_, both_centered, _] = *Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                [
                    Constraint::Ratio(1, 3),
                    Constraint::Min(1),
                    Constraint::Ratio(1, 3),
                ]
                .as_ref(),
            )
            .split(vertical_centered)
        else {
            panic!("The horizontal layout should have 3 chunks")
        };

        let [container_addr_input, container_username_input, container_help_text] =
            *Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Length(3),
                    ]
                    .as_ref(),
                )
                .split(both_centered)
        else {
            panic!("The centered layout should have 3 chunks")
        };

        let border_color = |field: Field| {
            if self.focus == field {
                Color::Yellow
            } else {
                Color::Reset
            }
        };

        self.addr_input.render(
            frame,
            input_box::RenderProps {
                title: "Server Host and Port".into(),
                area: container_addr_input,
                border_color: border_color(Field::ServerAddr),
                show_cursor: self.focus == Field::ServerAddr,
            },
        );
        self.username_input.render(
            frame,
            input_box::RenderProps {
                title: "Username".into(),
                area: container_username_input,
                border_color: border_color(Field::Username),
                show_cursor: self.focus == Field::Username,
            },
        );

        let help_text = Paragraph::new(Text::from(self.status_line())).wrap(Wrap { trim: true });
        frame.render_widget(help_text, container_help_text);
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn press(page: &mut ConnectPage, code: KeyCode) {
        page.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_enter_requires_a_username() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let state = State::new("localhost:8080", "");
        let mut page = ConnectPage::new(&state, action_tx);

        press(&mut page, KeyCode::Enter);
        assert!(action_rx.try_recv().is_err());

        for c in " bob ".chars() {
            press(&mut page, KeyCode::Char(c));
        }
        press(&mut page, KeyCode::Enter);

        match action_rx.try_recv() {
            Ok(Action::ConnectToServerRequest { addr, username }) => {
                assert_eq!(addr, "localhost:8080");
                assert_eq!(username, "bob");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_tab_switches_the_edited_field() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let state = State::new("", "alice");
        let mut page = ConnectPage::new(&state, action_tx);
        assert_eq!(page.focus, Field::ServerAddr);

        for c in "host:1".chars() {
            press(&mut page, KeyCode::Char(c));
        }
        press(&mut page, KeyCode::Tab);
        press(&mut page, KeyCode::Char('!'));
        press(&mut page, KeyCode::Enter);

        match action_rx.try_recv() {
            Ok(Action::ConnectToServerRequest { addr, username }) => {
                assert_eq!(addr, "host:1");
                assert_eq!(username, "alice!");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_escape_exits() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut page = ConnectPage::new(&State::new("localhost:8080", "alice"), action_tx);

        press(&mut page, KeyCode::Esc);

        assert!(matches!(action_rx.try_recv(), Ok(Action::Exit)));
    }
}
