//! Drawing the model with ratatui. Styles arrive as raw SGR parameters and
//! are translated here, nowhere else.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::Model;

/// Translate SGR parameters such as `"1;38;5;208"` into a style.
/// Unknown codes are skipped.
pub fn style(params: &str) -> Style {
    let codes: Vec<u16> = params
        .split(';')
        .filter_map(|code| code.parse().ok())
        .collect();

    let mut style = Style::default();
    let mut i = 0;
    while i < codes.len() {
        let code = codes[i];
        i += 1;
        style = match code {
            0 => Style::default(),
            1 => style.add_modifier(Modifier::BOLD),
            2 => style.add_modifier(Modifier::DIM),
            3 => style.add_modifier(Modifier::ITALIC),
            4 => style.add_modifier(Modifier::UNDERLINED),
            7 => style.add_modifier(Modifier::REVERSED),
            9 => style.add_modifier(Modifier::CROSSED_OUT),
            22 => style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            23 => style.remove_modifier(Modifier::ITALIC),
            24 => style.remove_modifier(Modifier::UNDERLINED),
            27 => style.remove_modifier(Modifier::REVERSED),
            30..=37 => style.fg(Color::Indexed((code - 30) as u8)),
            39 => style.fg(Color::Reset),
            40..=47 => style.bg(Color::Indexed((code - 40) as u8)),
            49 => style.bg(Color::Reset),
            90..=97 => style.fg(Color::Indexed((code - 90 + 8) as u8)),
            100..=107 => style.bg(Color::Indexed((code - 100 + 8) as u8)),
            38 | 48 => {
                let (color, used) = extended_color(&codes[i..]);
                i += used;
                match (code, color) {
                    (38, Some(color)) => style.fg(color),
                    (_, Some(color)) => style.bg(color),
                    (_, None) => style,
                }
            }
            _ => style,
        };
    }
    style
}

/// `5;n` or `2;r;g;b` following a 38/48, with how many codes it took
fn extended_color(codes: &[u16]) -> (Option<Color>, usize) {
    let byte = |i: usize| codes.get(i).and_then(|&c| u8::try_from(c).ok());
    match codes.first() {
        Some(5) => (byte(1).map(Color::Indexed), 2),
        Some(2) => match (byte(1), byte(2), byte(3)) {
            (Some(r), Some(g), Some(b)) => (Some(Color::Rgb(r, g, b)), 4),
            _ => (None, codes.len()),
        },
        _ => (None, 0),
    }
}

pub fn line(line: &graph::Line) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .segments
        .iter()
        .filter(|segment| segment.text != "\n")
        .map(|segment| {
            let mut style = style(&segment.params);
            if segment.reversed {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Span::styled(segment.text.clone(), style)
        })
        .collect();
    Line::from(spans)
}

fn lines<'a>(lines: impl IntoIterator<Item = &'a graph::Line>) -> Vec<Line<'static>> {
    lines.into_iter().map(line).collect()
}

/// Prompt and menus on top, graph (and preview) in the middle, status and
/// hints at the bottom
pub fn draw(frame: &mut Frame, model: &Model) {
    let top = model.top_lines();
    let bottom = model.bottom_lines();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top.len() as u16),
            Constraint::Min(1),
            Constraint::Length(bottom.len() as u16),
        ])
        .split(frame.size());

    frame.render_widget(Paragraph::new(lines(&top)), chunks[0]);
    draw_main(frame, model, chunks[1]);
    frame.render_widget(Paragraph::new(lines(&bottom)), chunks[2]);
}

fn draw_main(frame: &mut Frame, model: &Model, area: Rect) {
    let graph = Paragraph::new(lines(&model.graph_lines()));
    if !model.preview_visible() {
        frame.render_widget(graph, area);
        return;
    }

    let percent = model.config().preview.width_percent.min(90);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(100 - percent),
            Constraint::Percentage(percent),
        ])
        .split(area);

    frame.render_widget(graph, chunks[0]);
    let preview = Paragraph::new(lines(model.preview_lines())).block(Block::default().borders(Borders::LEFT));
    frame.render_widget(preview, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph::Segment;
    use pretty_assertions::assert_eq;

    #[test]
    fn basic_and_bright_colors() {
        assert_eq!(
            style("1;35"),
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Indexed(5))
        );
        assert_eq!(style("90"), Style::default().fg(Color::Indexed(8)));
        assert_eq!(style(""), Style::default());
    }

    #[test]
    fn extended_colors() {
        assert_eq!(
            style("38;5;208;48;5;238"),
            Style::default().fg(Color::Indexed(208)).bg(Color::Indexed(238))
        );
        assert_eq!(style("48;2;1;2;3"), Style::default().bg(Color::Rgb(1, 2, 3)));
    }

    #[test]
    fn reversed_segments_invert() {
        let graph_line = graph::Line::new(vec![
            Segment::plain("fix "),
            Segment {
                text: "parser".to_string(),
                params: "33".to_string(),
                reversed: true,
            },
        ]);
        let rendered = line(&graph_line);
        assert_eq!(rendered.spans.len(), 2);
        assert_eq!(
            rendered.spans[1].style,
            Style::default().fg(Color::Indexed(3)).add_modifier(Modifier::REVERSED)
        );
    }
}
