use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    prelude::{Backend, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use super::super::section::{
    usage::{HasUsageInfo, UsageInfo, UsageInfoLine},
    SectionActivation,
};
use crate::{
    session::RoomListItem,
    state_store::{action::Action, State},
    ui_management::components::{Component, ComponentRender},
};

struct Props {
    /// Known rooms in the order they became known, the active one flagged
    rooms: Vec<RoomListItem>,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Self {
            rooms: state.document.room_list.clone(),
        }
    }
}

pub struct RoomList {
    /// Sending actions to the state store
    action_tx: UnboundedSender<Action>,
    /// State Mapped RoomList Props
    props: Props,
    // Internal Component State
    /// List with optional selection and current offset
    pub list_state: ListState,
}

impl RoomList {
    fn next(&mut self) {
        if self.props.rooms.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.props.rooms.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        if self.props.rooms.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) | None => self.props.rooms.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn active_room_idx(&self) -> Option<usize> {
        self.props.rooms.iter().position(|room| room.active)
    }

    fn selected_room(&self) -> Option<&RoomListItem> {
        self.list_state
            .selected()
            .and_then(|idx| self.props.rooms.get(idx))
    }
}

impl Component for RoomList {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self {
        Self {
            action_tx,
            props: Props::from(state),
            //
            list_state: ListState::default(),
        }
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        let mut room_list = Self {
            props: Props::from(state),
            ..self
        };

        // the list may have shrunk after a reconnect
        if let Some(selected) = room_list.list_state.selected() {
            if selected >= room_list.props.rooms.len() {
                room_list.list_state.select(None);
            }
        }

        room_list
    }

    fn name(&self) -> &str {
        "Room List"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Up => self.previous(),
            KeyCode::Down => self.next(),
            KeyCode::Enter => {
                if let Some(room) = self.selected_room() {
                    let _ = self.action_tx.send(Action::SelectRoom {
                        room: room.name.clone(),
                    });
                }
            }
            _ => (),
        }
    }
}

impl SectionActivation for RoomList {
    fn activate(&mut self) {
        let idx = self.active_room_idx().unwrap_or(0);

        *self.list_state.offset_mut() = 0;
        if !self.props.rooms.is_empty() {
            self.list_state.select(Some(idx));
        }
    }

    fn deactivate(&mut self) {
        *self.list_state.offset_mut() = 0;
        self.list_state.select(None);
    }
}

pub struct RenderProps {
    pub border_color: Color,
    pub area: Rect,
}

impl ComponentRender<RenderProps> for RoomList {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        let room_list: Vec<ListItem> = self
            .props
            .rooms
            .iter()
            .map(|room| {
                let content = Line::from(Span::raw(format!("#{}", room.name)));

                let style = if room.active {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                ListItem::new(content).style(style.bg(Color::Reset))
            })
            .collect();

        let room_list = List::new(room_list)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::new().fg(props.border_color))
                    .title("Rooms"),
            )
            .highlight_style(
                Style::default()
                    // yellow that would work for both dark / light modes
                    .bg(Color::Rgb(255, 223, 102))
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">");

        let mut app_room_list_state = self.list_state.clone();
        frame.render_stateful_widget(room_list, props.area, &mut app_room_list_state);
    }
}

impl HasUsageInfo for RoomList {
    fn usage_info(&self) -> UsageInfo {
        UsageInfo {
            description: Some("Select the room to talk in".into()),
            lines: vec![
                UsageInfoLine {
                    keys: vec!["Esc".into()],
                    description: "to cancel".into(),
                },
                UsageInfoLine {
                    keys: vec!["↑".into(), "↓".into()],
                    description: "to navigate".into(),
                },
                UsageInfoLine {
                    keys: vec!["Enter".into()],
                    description: "to join room".into(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    use super::*;
    use crate::session::SessionController;

    fn state_with_rooms() -> State {
        let mut session = SessionController::new("alice");
        session.join_room("General");
        session.join_room("rust");
        let mut state = State::new("localhost:8080", "alice");
        state.sync_with_session(&session);

        state
    }

    fn press(room_list: &mut RoomList, code: KeyCode) {
        room_list.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_activation_starts_on_the_active_room() {
        let (action_tx, _action_rx) = mpsc::unbounded_channel();
        let mut room_list = RoomList::new(&state_with_rooms(), action_tx);

        room_list.activate();

        assert_eq!(room_list.selected_room().map(|r| r.name.as_str()), Some("rust"));
    }

    #[test]
    fn test_enter_selects_the_highlighted_room() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut room_list = RoomList::new(&state_with_rooms(), action_tx);

        room_list.activate();
        press(&mut room_list, KeyCode::Down);
        press(&mut room_list, KeyCode::Enter);

        match action_rx.try_recv() {
            Ok(Action::SelectRoom { room }) => assert_eq!(room, "General"),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_enter_without_selection_does_nothing() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut room_list = RoomList::new(&state_with_rooms(), action_tx);

        press(&mut room_list, KeyCode::Enter);

        assert!(action_rx.try_recv().is_err());
    }
}
