use ratatui::{prelude::*, widgets::*};

/// Area of `width_percent` of `area`'s width and `height` rows, centered in `area`
pub fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_percent.min(100)) / 100) as u16;
    let height = height.min(area.height);

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Draw a modal message box over whatever was rendered before
pub fn render_alert<B: Backend>(frame: &mut Frame<B>, message: &str) {
    let area = centered_rect(50, 6, frame.size());

    let text = Text::from(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(vec![
            "Press ".into(),
            "<Enter>".bold(),
            " to dismiss.".into(),
        ]),
    ]);
    let alert = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::new().fg(Color::Red))
            .title("Alert"),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(alert, area);
}
