use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;
use crate::vocab::Word;

/// Scrollable word list. With `selected` set, the row under the cursor is
/// highlighted (used by the admin delete list).
pub struct VocabList<'a> {
    pub title: String,
    pub words: &'a [Word],
    pub scroll: usize,
    pub selected: Option<usize>,
    pub theme: &'a Theme,
}

impl<'a> VocabList<'a> {
    pub fn new(title: &str, words: &'a [Word], scroll: usize, theme: &'a Theme) -> Self {
        Self {
            title: title.to_string(),
            words,
            scroll,
            selected: None,
            theme,
        }
    }

    pub fn with_selected(mut self, selected: usize) -> Self {
        self.selected = Some(selected);
        self
    }
}

/// First row to draw so that `cursor` stays within a window of `height` rows.
pub fn scroll_offset(cursor: usize, height: usize, len: usize) -> usize {
    if height == 0 || len <= height {
        return 0;
    }
    let max_offset = len - height;
    cursor.saturating_sub(height - 1).min(max_offset)
}

impl Widget for VocabList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ({}) ", self.title, self.words.len()))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.words.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "  No words yet. Import some from the admin panel.",
                Style::default().fg(colors.muted()),
            )))
            .render(inner, buf);
            return;
        }

        let height = inner.height as usize;
        let cursor = self.selected.unwrap_or(self.scroll);
        let offset = scroll_offset(cursor, height, self.words.len());

        let en_width = self
            .words
            .iter()
            .map(|w| w.en.chars().count())
            .max()
            .unwrap_or(0)
            .min(24);

        let lines: Vec<Line> = self
            .words
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, w)| {
                let highlighted = self.selected == Some(i);
                let base = if highlighted {
                    Style::default()
                        .fg(colors.selection_fg())
                        .bg(colors.selection_bg())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                let mut spans = vec![
                    Span::styled(format!("  {:<en_width$}", w.en), base),
                    Span::styled(format!("  {:>4}", w.year), base.fg(colors.muted())),
                    Span::styled(format!("  {}", w.zh), base.fg(colors.accent())),
                ];
                if w.wrong_count > 0 {
                    spans.push(Span::styled(
                        format!("  \u{2717}{}", w.wrong_count),
                        base.fg(colors.error()),
                    ));
                }
                Line::from(spans)
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_keeps_cursor_visible() {
        assert_eq!(scroll_offset(0, 5, 3), 0);
        assert_eq!(scroll_offset(4, 5, 20), 0);
        assert_eq!(scroll_offset(5, 5, 20), 1);
        assert_eq!(scroll_offset(19, 5, 20), 15);
        assert_eq!(scroll_offset(3, 0, 20), 0);
    }
}
