use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::quiz::QuizType;
use crate::ui::theme::Theme;
use crate::vocab::pool::{CountMode, CountSetting, FilterMode, YearSelection};

/// Year checkboxes plus the filter, count and direction settings.
pub struct QuizSetup<'a> {
    pub quiz_type: QuizType,
    pub years: &'a YearSelection,
    pub year_cursor: usize,
    pub filter_mode: FilterMode,
    pub count: &'a CountSetting,
    pub pool_size: usize,
    pub theme: &'a Theme,
}

impl Widget for QuizSetup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" New Quiz \u{00b7} {} ", self.quiz_type.label()))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(inner);

        let mut year_lines = vec![
            Line::from(Span::styled(
                " Years",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        if self.years.years.is_empty() {
            year_lines.push(Line::from(Span::styled(
                "  (no words yet)",
                Style::default().fg(colors.muted()),
            )));
        }
        for (i, year) in self.years.years.iter().enumerate() {
            let mark = if self.years.is_checked(i) { "[x]" } else { "[ ]" };
            let is_cursor = i == self.year_cursor;
            let style = if is_cursor {
                Style::default()
                    .fg(colors.selection_fg())
                    .bg(colors.selection_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            let indicator = if is_cursor { ">" } else { " " };
            year_lines.push(Line::from(Span::styled(format!(" {indicator} {mark} {year}"), style)));
        }
        Paragraph::new(year_lines).render(layout[0], buf);

        let label = Style::default().fg(colors.fg());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);

        let count_value = match self.count.mode {
            CountMode::Auto => format!("{} (whole pool)", self.pool_size),
            CountMode::Manual => format!("{}_", self.count.input),
        };
        let pool_style = if self.pool_size == 0 {
            Style::default()
                .fg(colors.error())
                .add_modifier(Modifier::BOLD)
        } else {
            value
        };

        let settings = vec![
            Line::from(Span::styled(
                " Settings",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Direction: ", label),
                Span::styled(self.quiz_type.label(), value),
            ]),
            Line::from(vec![
                Span::styled("  Words:     ", label),
                Span::styled(self.filter_mode.label(), value),
            ]),
            Line::from(vec![
                Span::styled("  Count:     ", label),
                Span::styled(self.count.mode.label(), value),
            ]),
            Line::from(vec![
                Span::styled("  Questions: ", label),
                Span::styled(count_value, value),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Pool size: ", label),
                Span::styled(self.pool_size.to_string(), pool_style),
            ]),
        ];
        Paragraph::new(settings).render(layout[1], buf);
    }
}
