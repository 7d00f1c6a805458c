use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    prelude::{Backend, Rect},
    style::Color,
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use super::super::section::{
    usage::{HasUsageInfo, UsageInfo, UsageInfoLine},
    SectionActivation,
};
use crate::{
    session::Panel,
    state_store::{action::Action, State},
    ui_management::components::{
        input_box::{self, InputBox},
        Component, ComponentRender,
    },
};

struct Props {
    /// Active room that the user is chatting in
    active_room: Option<String>,
    /// Changes whenever the session accepted a message and the input has to be emptied
    clear_generation: u64,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Self {
            active_room: match &state.document.panel {
                Panel::Chat { room } => Some(room.clone()),
                Panel::Welcome => None,
            },
            clear_generation: state.document.message_input_generation,
        }
    }
}

pub struct MessageInputBox {
    action_tx: UnboundedSender<Action>,
    /// State Mapped MessageInputBox Props
    props: Props,
    // Internal State for the Component
    pub input_box: InputBox,
}

impl MessageInputBox {
    // the input is emptied once the session accepts the message
    fn submit_message(&mut self) {
        if self.input_box.text().trim().is_empty() {
            return;
        }

        let _ = self.action_tx.send(Action::SendMessage {
            content: String::from(self.input_box.text()),
        });
    }
}

impl Component for MessageInputBox {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self {
        Self {
            action_tx,
            props: Props::from(state),
            //
            input_box: InputBox::default(),
        }
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        let props = Props::from(state);
        let mut input_box = self.input_box;
        if props.clear_generation != self.props.clear_generation {
            input_box.reset();
        }

        Self {
            props,
            input_box,
            ..self
        }
    }

    fn name(&self) -> &str {
        "Message Input"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.props.active_room.is_none() {
            return;
        }

        match key.code {
            KeyCode::Enter => self.submit_message(),
            _ => self.input_box.handle_key_event(key),
        }
    }
}

impl SectionActivation for MessageInputBox {
    fn activate(&mut self) {}

    fn deactivate(&mut self) {}
}

pub struct RenderProps {
    pub area: Rect,
    pub border_color: Color,
    pub show_cursor: bool,
}

impl ComponentRender<RenderProps> for MessageInputBox {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        self.input_box.render(
            frame,
            input_box::RenderProps {
                title: "Message Input".into(),
                area: props.area,
                border_color: props.border_color,
                show_cursor: props.show_cursor,
            },
        )
    }
}

impl HasUsageInfo for MessageInputBox {
    fn usage_info(&self) -> UsageInfo {
        if self.props.active_room.is_none() {
            UsageInfo {
                description: Some("You can not send a message until you enter a room.".into()),
                lines: vec![UsageInfoLine {
                    keys: vec!["Esc".into()],
                    description: "to cancel".into(),
                }],
            }
        } else {
            UsageInfo {
                description: Some("Type your message to send a message to the active room".into()),
                lines: vec![
                    UsageInfoLine {
                        keys: vec!["Esc".into()],
                        description: "to cancel".into(),
                    },
                    UsageInfoLine {
                        keys: vec!["Enter".into()],
                        description: "to send your message".into(),
                    },
                ],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    use super::*;
    use crate::session::SessionController;

    fn type_text(message_input_box: &mut MessageInputBox, text: &str) {
        for c in text.chars() {
            message_input_box.handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn enter(message_input_box: &mut MessageInputBox) {
        message_input_box.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    }

    #[test]
    fn test_input_is_kept_until_the_session_accepts_it() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut session = SessionController::new("alice");
        session.join_room("General");
        let mut state = State::new("localhost:8080", "alice");
        state.sync_with_session(&session);
        let mut message_input_box = MessageInputBox::new(&state, action_tx);

        type_text(&mut message_input_box, "hello");
        enter(&mut message_input_box);
        assert_eq!(message_input_box.input_box.text(), "hello");

        let Ok(Action::SendMessage { content }) = action_rx.try_recv() else {
            panic!("expected a message to be sent");
        };
        session.send_message(&content);
        state.sync_with_session(&session);
        let message_input_box = message_input_box.move_with_state(&state);

        assert!(message_input_box.input_box.is_empty());
    }

    #[test]
    fn test_typing_is_ignored_without_a_room() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut message_input_box =
            MessageInputBox::new(&State::new("localhost:8080", "alice"), action_tx);

        type_text(&mut message_input_box, "hello");
        enter(&mut message_input_box);

        assert!(message_input_box.input_box.is_empty());
        assert!(action_rx.try_recv().is_err());
    }
}
