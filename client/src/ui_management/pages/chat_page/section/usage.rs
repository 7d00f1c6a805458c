use ratatui::{
    style::Stylize,
    text::{Line, Span, Text},
};

/// One key binding hint, e.g. `(Esc) to cancel`
#[derive(Debug, Clone)]
pub struct UsageInfoLine {
    pub keys: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct UsageInfo {
    pub description: Option<String>,
    pub lines: Vec<UsageInfoLine>,
}

/// Implemented by everything that can explain its key bindings in the usage box
pub trait HasUsageInfo {
    fn usage_info(&self) -> UsageInfo;
}

fn key_to_span<'a>(key: &str) -> Span<'a> {
    Span::from(format!("({})", key)).bold()
}

// "(a)", "(a) or (b)", "(a), (b), or (c)"
fn keys_to_spans<'a>(keys: &[String]) -> Vec<Span<'a>> {
    let Some((last, rest)) = keys.split_last() else {
        return vec![];
    };

    let separator = if rest.len() == 1 { " or " } else { ", " };
    let mut bindings: Vec<Span> = Vec::with_capacity(keys.len() * 2);
    for key in rest {
        bindings.push(key_to_span(key));
        bindings.push(Span::from(separator));
    }
    if rest.len() > 1 {
        bindings.push("or ".into());
    }
    bindings.push(key_to_span(last));

    bindings
}

pub fn widget_usage_to_text<'a>(usage: UsageInfo) -> Text<'a> {
    let mut lines: Vec<Line> = vec![];
    if let Some(description) = usage.description {
        lines.push(Line::from(description));
    }

    for usage_line in usage.lines {
        let mut bindings = keys_to_spans(&usage_line.keys);
        bindings.push(Span::from(format!(" {}", usage_line.description)));

        lines.push(Line::from(bindings));
    }

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(keys: &[&str]) -> String {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();

        keys_to_spans(&keys)
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn test_key_lists() {
        assert_eq!(rendered(&[]), "");
        assert_eq!(rendered(&["q"]), "(q)");
        assert_eq!(rendered(&["←", "→"]), "(←) or (→)");
        assert_eq!(rendered(&["a", "b", "c"]), "(a), (b), or (c)");
    }

    #[test]
    fn test_description_comes_first() {
        let text = widget_usage_to_text(UsageInfo {
            description: Some("Select a widget".into()),
            lines: vec![UsageInfoLine {
                keys: vec!["q".into()],
                description: "to exit".into(),
            }],
        });

        assert_eq!(text.lines.len(), 2);
    }
}
