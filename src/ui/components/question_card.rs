use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::question::Question;
use crate::session::quiz::AnswerFeedback;
use crate::ui::theme::Theme;

/// The prompt and its answer options. Once an answer is in, the correct
/// option turns green and a wrong pick turns red.
pub struct QuestionCard<'a> {
    pub question: &'a Question,
    pub feedback: Option<&'a AnswerFeedback>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(
        question: &'a Question,
        feedback: Option<&'a AnswerFeedback>,
        selected: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            question,
            feedback,
            selected,
            theme,
        }
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.question.prompt.as_str(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        let option_lines: Vec<Line> = self
            .question
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let is_cursor = i == self.selected;
                let mut style = Style::default().fg(colors.fg());
                if let Some(fb) = self.feedback {
                    if *option == fb.correct_answer {
                        style = style.fg(colors.answer_correct()).add_modifier(Modifier::BOLD);
                    } else if *option == fb.selected {
                        style = style.fg(colors.answer_wrong()).add_modifier(Modifier::BOLD);
                    } else {
                        style = style.fg(colors.muted());
                    }
                } else if is_cursor {
                    style = style
                        .fg(colors.selection_fg())
                        .bg(colors.selection_bg())
                        .add_modifier(Modifier::BOLD);
                }
                let indicator = if is_cursor { ">" } else { " " };
                Line::from(Span::styled(format!("  {indicator} {}. {option}", i + 1), style))
            })
            .collect();
        Paragraph::new(option_lines).render(layout[3], buf);

        let verdict = match self.feedback {
            Some(fb) if fb.is_correct => Line::from(Span::styled(
                "  Correct!",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )),
            Some(fb) => Line::from(vec![
                Span::styled(
                    "  Wrong. ",
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("Answer: {}", fb.correct_answer),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            None => Line::from(""),
        };
        Paragraph::new(verdict).render(layout[4], buf);
    }
}
