use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    prelude::{Backend, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::ComponentRender;

/// Single line text editor. The cursor position counts chars, not bytes.
#[derive(Debug, Default)]
pub struct InputBox {
    /// Current value of the input box
    text: String,
    /// Position of cursor in the editor area.
    cursor_position: usize,
}

impl InputBox {
    pub fn with_text(text: &str) -> Self {
        let mut input_box = InputBox::default();
        input_box.set_text(text);

        input_box
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, new_text: &str) {
        self.text = String::from(new_text);
        self.cursor_position = self.char_count();
    }

    pub fn reset(&mut self) {
        self.cursor_position = 0;
        self.text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    // byte offset of the char the cursor sits on
    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .map(|(idx, _)| idx)
            .nth(self.cursor_position)
            .unwrap_or(self.text.len())
    }

    fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    fn move_cursor_right(&mut self) {
        self.cursor_position = self.cursor_position.saturating_add(1).min(self.char_count());
    }

    fn enter_char(&mut self, new_char: char) {
        let idx = self.byte_index();
        self.text.insert(idx, new_char);

        self.move_cursor_right();
    }

    fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }

        self.move_cursor_left();
        let idx = self.byte_index();
        self.text.remove(idx);
    }

    /// Apply an editing key. Keys that do not edit text are ignored.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {}
            KeyCode::Char(to_insert) => self.enter_char(to_insert),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.char_count(),
            _ => {}
        }
    }
}

pub struct RenderProps {
    pub title: String,
    pub area: Rect,
    pub border_color: Color,
    pub show_cursor: bool,
}

impl ComponentRender<RenderProps> for InputBox {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        let input = Paragraph::new(self.text.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .fg(props.border_color)
                    .title(props.title),
            );
        frame.render_widget(input, props.area);

        // Cursor is hidden by default, so we need to make it visible if the input box is selected
        if props.show_cursor {
            // Draw the cursor at the current position in the input field,
            // one line down from the border to the input line
            frame.set_cursor(
                props.area.x + self.cursor_position as u16 + 1,
                props.area.y + 1,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input_box: &mut InputBox, code: KeyCode) {
        input_box.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(input_box: &mut InputBox, text: &str) {
        for c in text.chars() {
            press(input_box, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_and_deleting() {
        let mut input_box = InputBox::default();

        type_text(&mut input_box, "helo");
        press(&mut input_box, KeyCode::Left);
        type_text(&mut input_box, "l");
        press(&mut input_box, KeyCode::End);
        press(&mut input_box, KeyCode::Backspace);

        assert_eq!(input_box.text(), "hell");
    }

    #[test]
    fn test_multibyte_chars_do_not_split() {
        let mut input_box = InputBox::default();

        type_text(&mut input_box, "çağ");
        press(&mut input_box, KeyCode::Left);
        press(&mut input_box, KeyCode::Backspace);
        press(&mut input_box, KeyCode::Home);
        type_text(&mut input_box, "ü");

        assert_eq!(input_box.text(), "üçğ");
    }

    #[test]
    fn test_control_chords_are_not_inserted() {
        let mut input_box = InputBox::with_text("ab");

        input_box.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));

        assert_eq!(input_box.text(), "ab");
    }

    #[test]
    fn test_reset() {
        let mut input_box = InputBox::with_text("general");

        input_box.reset();

        assert!(input_box.is_empty());
        type_text(&mut input_box, "x");
        assert_eq!(input_box.text(), "x");
    }
}
