use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::quiz::{QuizSummary, QuizType};
use crate::ui::theme::Theme;
use crate::vocab::Word;

/// End-of-quiz summary: score, tally and the words that were missed.
pub struct Dashboard<'a> {
    pub summary: QuizSummary,
    pub quiz_type: QuizType,
    pub missed: &'a [Word],
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        summary: QuizSummary,
        quiz_type: QuizType,
        missed: &'a [Word],
        theme: &'a Theme,
    ) -> Self {
        Self {
            summary,
            quiz_type,
            missed,
            theme,
        }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Quiz Complete \u{00b7} {} ", self.quiz_type.label()))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            "Results",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let score = self.summary.score_percent;
        let score_color = if score >= 90 {
            colors.success()
        } else if score >= 60 {
            colors.warning()
        } else {
            colors.error()
        };
        let score_line = Line::from(vec![
            Span::styled("  Score:   ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{score}%"),
                Style::default().fg(score_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({}/{} correct)", self.summary.correct, self.summary.total),
                Style::default().fg(colors.muted()),
            ),
        ]);
        Paragraph::new(score_line).render(layout[1], buf);

        let missed_count = self.missed.len();
        let missed_line = Line::from(vec![
            Span::styled("  Missed:  ", Style::default().fg(colors.fg())),
            Span::styled(
                missed_count.to_string(),
                Style::default().fg(if missed_count == 0 {
                    colors.success()
                } else {
                    colors.error()
                }),
            ),
        ]);
        Paragraph::new(missed_line).render(layout[2], buf);

        let missed_lines: Vec<Line> = self
            .missed
            .iter()
            .map(|w| {
                Line::from(vec![
                    Span::styled(format!("    {}", w.en), Style::default().fg(colors.fg())),
                    Span::styled(format!("  {}", w.zh), Style::default().fg(colors.accent())),
                    Span::styled(format!("  [{}]", w.year), Style::default().fg(colors.muted())),
                ])
            })
            .collect();
        Paragraph::new(missed_lines)
            .wrap(Wrap { trim: false })
            .render(layout[3], buf);

        let mut help = vec![Span::styled("  [n] New quiz  ", Style::default().fg(colors.accent()))];
        if missed_count > 0 {
            help.push(Span::styled("[r] Retry missed  ", Style::default().fg(colors.accent())));
        }
        help.push(Span::styled("[h] History  ", Style::default().fg(colors.accent())));
        help.push(Span::styled("[q] Menu", Style::default().fg(colors.accent())));
        Paragraph::new(Line::from(help)).render(layout[4], buf);
    }
}
