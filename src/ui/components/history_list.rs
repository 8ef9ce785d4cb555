use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::history::HistoryRecord;
use crate::ui::components::vocab_list::scroll_offset;
use crate::ui::theme::Theme;

pub struct HistoryList<'a> {
    pub records: &'a [HistoryRecord],
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> HistoryList<'a> {
    pub fn new(records: &'a [HistoryRecord], selected: usize, theme: &'a Theme) -> Self {
        Self {
            records,
            selected,
            theme,
        }
    }
}

impl Widget for HistoryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Quiz History ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.records.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "  No quizzes yet.",
                Style::default().fg(colors.muted()),
            )))
            .render(inner, buf);
            return;
        }

        let header = Line::from(Span::styled(
            "   #  Time              Type     Score  Correct",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ));
        let rule = Line::from(Span::styled(
            "  ───────────────────────────────────────────────",
            Style::default().fg(colors.border()),
        ));
        let mut lines = vec![header, rule];

        let body_height = inner.height.saturating_sub(2) as usize;
        let offset = scroll_offset(self.selected, body_height, self.records.len());

        for (i, r) in self.records.iter().enumerate().skip(offset).take(body_height) {
            let score_color = if r.score >= 90 {
                colors.success()
            } else if r.score >= 60 {
                colors.warning()
            } else {
                colors.error()
            };
            let mut row_style = Style::default().fg(colors.fg());
            if i == self.selected {
                row_style = row_style.bg(colors.selection_bg());
            }
            let time_str = r.time.format("%Y-%m-%d %H:%M").to_string();
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {:>3}  {time_str:<16}  {:<7}  ", i + 1, r.quiz_type),
                    row_style,
                ),
                Span::styled(format!("{:>4}%", r.score), row_style.fg(score_color)),
                Span::styled(format!("  {:>7}", r.detail), row_style),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
