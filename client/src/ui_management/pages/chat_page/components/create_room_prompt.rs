use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    prelude::{Backend, Constraint, Direction, Layout},
    style::{Color, Stylize},
    text::{Line, Text},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    session::document::CreateRoomPrompt as PromptState,
    state_store::{action::Action, State},
    ui_management::components::{
        input_box::{self, InputBox},
        popup::centered_rect,
        Component, ComponentRender,
    },
};

struct Props {
    prompt: PromptState,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Self {
            prompt: state.document.create_room_prompt.clone(),
        }
    }
}

/// Modal asking for the name of a new room
pub struct CreateRoomPrompt {
    action_tx: UnboundedSender<Action>,
    props: Props,
    //
    input_box: InputBox,
}

impl CreateRoomPrompt {
    pub fn is_open(&self) -> bool {
        self.props.prompt.open
    }

    fn submit(&mut self) {
        // one request at a time
        if self.props.prompt.pending {
            return;
        }

        let name = self.input_box.text().trim();
        if name.is_empty() {
            return;
        }

        let _ = self.action_tx.send(Action::CreateRoom {
            name: String::from(name),
        });
    }
}

impl Component for CreateRoomPrompt {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
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
        if props.prompt.clear_generation != self.props.prompt.clear_generation {
            input_box.reset();
        }

        Self {
            props,
            input_box,
            ..self
        }
    }

    fn name(&self) -> &str {
        "Create Room"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => {
                let _ = self.action_tx.send(Action::CancelCreateRoomPrompt);
            }
            _ => self.input_box.handle_key_event(key),
        }
    }
}

impl ComponentRender<()> for CreateRoomPrompt {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        let area = centered_rect(40, 5, frame.size());
        let [input_area, help_area] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
            .split(area)
        else {
            panic!("The prompt layout should have 2 chunks")
        };

        frame.render_widget(Clear, area);
        self.input_box.render(
            frame,
            input_box::RenderProps {
                title: "New Room Name".into(),
                area: input_area,
                border_color: Color::Yellow,
                show_cursor: true,
            },
        );

        let help = if self.props.prompt.pending {
            Line::from("Creating room...".italic())
        } else {
            Line::from(vec![
                "<Enter>".bold(),
                " to create, ".into(),
                "<Esc>".bold(),
                " to cancel.".into(),
            ])
        };
        frame.render_widget(
            Paragraph::new(Text::from(help)).wrap(Wrap { trim: true }),
            help_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    use super::*;
    use crate::session::SessionController;

    fn press(prompt: &mut CreateRoomPrompt, code: KeyCode) {
        prompt.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_name_is_kept_until_the_room_is_created() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut session = SessionController::new("alice");
        session.open_create_room_prompt();
        let mut state = State::new("localhost:8080", "alice");
        state.sync_with_session(&session);
        let mut prompt = CreateRoomPrompt::new(&state, action_tx);
        assert!(prompt.is_open());

        for c in "rust".chars() {
            press(&mut prompt, KeyCode::Char(c));
        }
        press(&mut prompt, KeyCode::Enter);

        let Ok(Action::CreateRoom { name }) = action_rx.try_recv() else {
            panic!("expected a create room request");
        };
        assert_eq!(name, "rust");

        // a pending request blocks resubmission
        session.create_room(&name);
        state.sync_with_session(&session);
        let mut prompt = prompt.move_with_state(&state);
        press(&mut prompt, KeyCode::Enter);
        assert!(action_rx.try_recv().is_err());
        assert_eq!(prompt.input_box.text(), "rust");

        session.cancel_create_room_prompt();
        state.sync_with_session(&session);
        let prompt = prompt.move_with_state(&state);
        assert!(!prompt.is_open());
        assert!(prompt.input_box.is_empty());
    }

    #[test]
    fn test_escape_cancels() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut prompt = CreateRoomPrompt::new(&State::new("localhost:8080", "alice"), action_tx);

        press(&mut prompt, KeyCode::Esc);

        assert!(matches!(
            action_rx.try_recv(),
            Ok(Action::CancelCreateRoomPrompt)
        ));
    }
}
