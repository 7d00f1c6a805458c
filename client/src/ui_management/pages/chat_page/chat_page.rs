use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    session::{Document, LogEntry, Panel},
    state_store::{action::Action, State},
    ui_management::components::{popup, Component, ComponentRender},
};

use super::{
    components::{
        create_room_prompt::CreateRoomPrompt,
        message_input_box::{self, MessageInputBox},
        room_list::{self, RoomList},
    },
    section::{
        usage::{widget_usage_to_text, HasUsageInfo, UsageInfo, UsageInfoLine},
        SectionActivation,
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Section {
    MessageInput,
    RoomList,
}

impl Section {
    const ALL: [Section; 2] = [Section::MessageInput, Section::RoomList];

    fn to_usize(self) -> usize {
        match self {
            Section::MessageInput => 0,
            Section::RoomList => 1,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.to_usize() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.to_usize() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

struct Props {
    /// The logged in user
    username: String,
    /// The timer for the chat page
    timer: usize,
    /// Everything the session rendered
    document: Document,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            username: state.username.clone(),
            timer: state.timer,
            document: state.document.clone(),
        }
    }
}

const DEFAULT_HOVERED_SECTION: Section = Section::MessageInput;

/// ChatPage handles the UI and the state of the chat page
pub struct ChatPage {
    /// Action sender
    pub action_tx: UnboundedSender<Action>,
    /// State Mapped ChatPage Props
    props: Props,
    // Internal State
    /// Currently active section, handling input
    pub active_section: Option<Section>,
    /// Section that is currently hovered
    pub last_hovered_section: Section,
    // Child Components
    /// The room list widget that handles the listing of the rooms
    pub room_list: RoomList,
    /// The input box widget that handles the message input
    pub message_input_box: MessageInputBox,
    /// Modal for naming a new room
    pub create_room_prompt: CreateRoomPrompt,
}

impl ChatPage {
    fn get_component_for_section(&self, section: Section) -> &dyn Component {
        match section {
            Section::MessageInput => &self.message_input_box,
            Section::RoomList => &self.room_list,
        }
    }

    fn get_component_for_section_mut(&mut self, section: Section) -> &mut dyn Component {
        match section {
            Section::MessageInput => &mut self.message_input_box,
            Section::RoomList => &mut self.room_list,
        }
    }

    fn get_section_activation_for_section(
        &mut self,
        section: Section,
    ) -> &mut dyn SectionActivation {
        match section {
            Section::MessageInput => &mut self.message_input_box,
            Section::RoomList => &mut self.room_list,
        }
    }

    fn calculate_border_color(&self, section: Section) -> Color {
        match (self.active_section, self.last_hovered_section) {
            (Some(active_section), _) if active_section == section => Color::Yellow,
            (_, last_hovered_section) if last_hovered_section == section => Color::Blue,
            _ => Color::Reset,
        }
    }

    fn activate_section(&mut self, section: Section) {
        self.active_section = Some(section);
        self.get_section_activation_for_section(section).activate();
    }

    fn disable_section(&mut self, section: Section) {
        self.get_section_activation_for_section(section)
            .deactivate();

        self.active_section = None;
    }

    fn send(&self, action: Action) {
        let _ = self.action_tx.send(action);
    }

    fn handle_navigation_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('e') => self.activate_section(self.last_hovered_section),
            KeyCode::Left => self.last_hovered_section = self.last_hovered_section.previous(),
            KeyCode::Right => self.last_hovered_section = self.last_hovered_section.next(),
            KeyCode::Char('n') => self.send(Action::OpenCreateRoomPrompt),
            KeyCode::Char('l') => self.send(Action::LeaveRoom),
            KeyCode::Char('q') => self.send(Action::Exit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.send(Action::Exit)
            }
            _ => {}
        }
    }
}

impl Component for ChatPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        ChatPage {
            action_tx: action_tx.clone(),
            // set the props
            props: Props::from(state),
            // internal component state
            active_section: Option::None,
            last_hovered_section: DEFAULT_HOVERED_SECTION,
            // child components
            room_list: RoomList::new(state, action_tx.clone()),
            message_input_box: MessageInputBox::new(state, action_tx.clone()),
            create_room_prompt: CreateRoomPrompt::new(state, action_tx),
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        ChatPage {
            props: Props::from(state),
            // propogate the update to the child components
            room_list: self.room_list.move_with_state(state),
            message_input_box: self.message_input_box.move_with_state(state),
            create_room_prompt: self.create_room_prompt.move_with_state(state),
            ..self
        }
    }

    fn name(&self) -> &str {
        if self.create_room_prompt.is_open() {
            self.create_room_prompt.name()
        } else {
            "Chat Page"
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // alerts block every other interaction until dismissed
        if self.props.document.active_alert().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.send(Action::DismissAlert);
            }
            return;
        }

        if self.create_room_prompt.is_open() {
            self.create_room_prompt.handle_key_event(key);
            return;
        }

        match self.active_section {
            None => self.handle_navigation_key(key),
            Some(section) => {
                self.get_component_for_section_mut(section)
                    .handle_key_event(key);

                // disable the section according to the action taken
                // the section is disabled when escape is pressed
                // or when enter is pressed on the room list
                match section {
                    Section::RoomList if key.code == KeyCode::Enter => {
                        self.disable_section(section)
                    }
                    _ if key.code == KeyCode::Esc => self.disable_section(section),
                    _ => (),
                }
            }
        }
    }
}

const NO_ROOM_SELECTED_MESSAGE: &str = "Join at least one room to start chatting!";

fn calculate_list_offset(height: u16, items_len: usize) -> usize {
    // go back by (container height - 2 for borders) to get the offset
    items_len.saturating_sub((height as usize).saturating_sub(2))
}

fn log_entry_to_list_item(entry: &LogEntry) -> ListItem {
    let line = match entry {
        LogEntry::Message { message, own } => {
            let sender = Span::from(format!("@{}", message.username));
            Line::from(vec![
                Span::from(format!("[{}] ", message.timestamp)).dim(),
                if *own {
                    sender.fg(Color::Cyan).bold()
                } else {
                    sender.bold()
                },
                Span::raw(format!(": {}", message.message)),
            ])
        }
        LogEntry::Notice(content) => Line::from(Span::raw(content.clone()).italic()),
    };

    ListItem::new(line)
}

impl ComponentRender<()> for ChatPage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        let [left, middle, right] = *Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                [
                    Constraint::Percentage(20),
                    Constraint::Percentage(60),
                    Constraint::Percentage(20),
                ]
                .as_ref(),
            )
            .split(frame.size())
        else {
            panic!("The main layout should have 3 chunks")
        };

        let [container_room_list, container_user_info] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(4)].as_ref())
            .split(left)
        else {
            panic!("The left layout should have 2 chunks")
        };

        self.room_list.render(
            frame,
            room_list::RenderProps {
                border_color: self.calculate_border_color(Section::RoomList),
                area: container_room_list,
            },
        );

        let user_info = Paragraph::new(Text::from(vec![
            Line::from(format!("User: @{}", self.props.username)),
            Line::from(format!("Chatting for: {} secs", self.props.timer)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("User Information"),
        );
        frame.render_widget(user_info, container_user_info);

        let [container_highlight, container_messages, container_input] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(3),
                    Constraint::Min(1),
                    Constraint::Length(3),
                ]
                .as_ref(),
            )
            .split(middle)
        else {
            panic!("The middle layout should have 3 chunks")
        };

        let top_line = match &self.props.document.panel {
            Panel::Chat { room } => Line::from(vec![
                "on ".into(),
                Span::from(format!("#{}", room)).bold(),
            ]),
            Panel::Welcome => Line::from(vec![
                Span::from(format!("Welcome, @{}! ", self.props.username)),
                Span::from(NO_ROOM_SELECTED_MESSAGE).italic(),
            ]),
        };

        let help_message = Paragraph::new(Text::from(top_line)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Active Room Information"),
        );
        frame.render_widget(help_message, container_highlight);

        let messages = match self.props.document.panel {
            Panel::Chat { .. } => {
                let message_offset = calculate_list_offset(
                    container_messages.height,
                    self.props.document.messages.len(),
                );

                self.props
                    .document
                    .messages
                    .iter()
                    .skip(message_offset)
                    .map(log_entry_to_list_item)
                    .collect::<Vec<ListItem>>()
            }
            Panel::Welcome => vec![ListItem::new(Line::from(NO_ROOM_SELECTED_MESSAGE))],
        };

        let messages =
            List::new(messages).block(Block::default().borders(Borders::ALL).title("Messages"));
        frame.render_widget(messages, container_messages);

        self.message_input_box.render(
            frame,
            message_input_box::RenderProps {
                border_color: self.calculate_border_color(Section::MessageInput),
                area: container_input,
                show_cursor: self.active_section == Some(Section::MessageInput)
                    && !self.create_room_prompt.is_open(),
            },
        );

        let [container_room_users, container_usage] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(10)].as_ref())
            .split(right)
        else {
            panic!("The right layout should have 2 chunks")
        };

        let room_users = Paragraph::new(self.props.document.roster.as_str())
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Room Users"));
        frame.render_widget(room_users, container_room_users);

        let mut usage_text: Text = widget_usage_to_text(self.usage_info());
        usage_text.patch_style(Style::default());
        let usage = Paragraph::new(usage_text)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Usage"));
        frame.render_widget(usage, container_usage);

        // modals go last so they cover the page
        if self.create_room_prompt.is_open() {
            self.create_room_prompt.render(frame, ());
        }

        if let Some(alert) = self.props.document.active_alert() {
            popup::render_alert(frame, alert);
        }
    }
}

impl HasUsageInfo for ChatPage {
    fn usage_info(&self) -> UsageInfo {
        if self.create_room_prompt.is_open() {
            return UsageInfo {
                description: Some("Name the new room".into()),
                lines: vec![
                    UsageInfoLine {
                        keys: vec!["Esc".into()],
                        description: "to cancel".into(),
                    },
                    UsageInfoLine {
                        keys: vec!["Enter".into()],
                        description: "to create".into(),
                    },
                ],
            };
        }

        if let Some(section) = self.active_section {
            let handler: &dyn HasUsageInfo = match section {
                Section::RoomList => &self.room_list,
                Section::MessageInput => &self.message_input_box,
            };

            handler.usage_info()
        } else {
            UsageInfo {
                description: Some("Select a widget".into()),
                lines: vec![
                    UsageInfoLine {
                        keys: vec!["q".into()],
                        description: "to exit".into(),
                    },
                    UsageInfoLine {
                        keys: vec!["←".into(), "→".into()],
                        description: "to hover widgets".into(),
                    },
                    UsageInfoLine {
                        keys: vec!["e".into()],
                        description: format!(
                            "to activate {}",
                            self.get_component_for_section(self.last_hovered_section)
                                .name()
                        ),
                    },
                    UsageInfoLine {
                        keys: vec!["n".into()],
                        description: "to create a room".into(),
                    },
                    UsageInfoLine {
                        keys: vec!["l".into()],
                        description: "to leave the room".into(),
                    },
                ],
            }
        }
    }
}
