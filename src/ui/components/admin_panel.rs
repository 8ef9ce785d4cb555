use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::admin::ImportPreview;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Import tab of the admin panel: a free-text editor, or the parsed preview
/// awaiting confirmation.
pub struct ImportEditor<'a> {
    pub input: &'a LineInput,
    pub preview: Option<&'a ImportPreview>,
    pub theme: &'a Theme,
}

impl Widget for ImportEditor<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(3)])
            .split(area);

        let hint = match self.preview {
            Some(p) => format!(
                "  {} words ready, {} lines skipped. [Enter] Confirm  [Esc] Edit",
                p.words.len(),
                p.rejected
            ),
            None => "  One word per line: year/english/chinese. [Tab] Preview".to_string(),
        };
        Paragraph::new(Line::from(Span::styled(hint, Style::default().fg(colors.muted()))))
            .render(layout[0], buf);

        let block = Block::bordered()
            .title(if self.preview.is_some() { " Preview " } else { " Paste words " })
            .border_style(Style::default().fg(colors.border_focused()));
        let inner = block.inner(layout[1]);
        block.render(layout[1], buf);

        if let Some(preview) = self.preview {
            let lines: Vec<Line> = preview
                .words
                .iter()
                .map(|w| {
                    Line::from(vec![
                        Span::styled(format!("  {:>4}  ", w.year), Style::default().fg(colors.muted())),
                        Span::styled(w.en.clone(), Style::default().fg(colors.fg())),
                        Span::styled(format!("  {}", w.zh), Style::default().fg(colors.accent())),
                    ])
                })
                .collect();
            Paragraph::new(lines).render(inner, buf);
            return;
        }

        let (before, cursor, after) = self.input.render_parts();
        let cursor_style = Style::default()
            .fg(colors.bg())
            .bg(colors.fg())
            .add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(colors.fg());

        // Split on newlines so the cursor lands on the right row.
        let mut lines: Vec<Line<'static>> = vec![Line::default()];
        push_text(&mut lines, before, text_style);
        match cursor {
            Some('\n') => {
                if let Some(last) = lines.last_mut() {
                    last.spans.push(Span::styled(" ", cursor_style));
                }
                lines.push(Line::default());
            }
            Some(ch) => {
                if let Some(last) = lines.last_mut() {
                    last.spans.push(Span::styled(ch.to_string(), cursor_style));
                }
            }
            None => {
                if let Some(last) = lines.last_mut() {
                    last.spans.push(Span::styled(" ", cursor_style));
                }
            }
        }
        push_text(&mut lines, after, text_style);

        let visible = inner.height as usize;
        let skip = lines.len().saturating_sub(visible);
        Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>())
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

fn push_text(lines: &mut Vec<Line<'static>>, text: &str, style: Style) {
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        if !part.is_empty()
            && let Some(last) = lines.last_mut()
        {
            last.spans.push(Span::styled(part.to_string(), style));
        }
    }
}

/// Passcode prompt. Input is masked.
pub struct PasscodePrompt<'a> {
    pub input: &'a LineInput,
    pub theme: &'a Theme,
}

impl Widget for PasscodePrompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Admin Login ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let masked = "*".repeat(self.input.len());
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("  Passcode:", Style::default().fg(colors.fg()))),
            Line::from(vec![
                Span::styled(format!("  {masked}"), Style::default().fg(colors.accent())),
                Span::styled(
                    " ",
                    Style::default().bg(colors.fg()),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  [Enter] Unlock  [Esc] Back",
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}
