use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Vocab,
    QuizEnToZh,
    QuizZhToEn,
    History,
    Admin,
    Quit,
}

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
    pub action: MenuAction,
}

/// Footer hints for the menu screen.
pub const MENU_HINTS: &[&str] = &["[1] Browse", "[2/3] Quiz", "[h] History", "[a] Admin", "[q] Quit"];

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        let item = |key: &str, label: &str, description: &str, action| MenuItem {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            action,
        };
        Self {
            items: vec![
                item("1", "Browse Words", "Scroll the word list with counters", MenuAction::Vocab),
                item("2", "Quiz: EN \u{2192} ZH", "See English, pick the Chinese", MenuAction::QuizEnToZh),
                item("3", "Quiz: ZH \u{2192} EN", "See Chinese, pick the English", MenuAction::QuizZhToEn),
                item("h", "History", "Your last 20 quiz results", MenuAction::History),
                item("a", "Admin", "Import or delete words", MenuAction::Admin),
                item("q", "Quit", "Leave wordquiz", MenuAction::Quit),
            ],
            selected: 0,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> Option<MenuAction> {
        self.items.get(self.selected).map(|i| i.action)
    }

    pub fn action_for_key(&self, ch: char) -> Option<MenuAction> {
        self.items
            .iter()
            .find(|i| i.key.chars().eq(std::iter::once(ch)))
            .map(|i| i.action)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "wordquiz",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "English \u{2194} Chinese vocabulary drills",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];

        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let desc_text = format!("     {}", item.description);

            let lines = vec![
                Line::from(Span::styled(
                    label_text,
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(desc_text, Style::default().fg(colors.muted()))),
            ];

            if let Some(slot) = menu_layout.get(i) {
                Paragraph::new(lines).render(*slot, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_wraps() {
        let theme = Theme::default();
        let mut menu = Menu::new(&theme);
        menu.prev();
        assert_eq!(menu.selected_action(), Some(MenuAction::Quit));
        menu.next();
        assert_eq!(menu.selected_action(), Some(MenuAction::Vocab));
    }

    #[test]
    fn shortcut_keys_map_to_actions() {
        let theme = Theme::default();
        let menu = Menu::new(&theme);
        assert_eq!(menu.action_for_key('3'), Some(MenuAction::QuizZhToEn));
        assert_eq!(menu.action_for_key('a'), Some(MenuAction::Admin));
        assert_eq!(menu.action_for_key('z'), None);
    }

    #[test]
    fn footer_hints_match_shortcut_keys() {
        let theme = Theme::default();
        let menu = Menu::new(&theme);
        assert!(MENU_HINTS.contains(&"[1] Browse"));
        assert_eq!(menu.action_for_key('1'), Some(MenuAction::Vocab));
        assert!(MENU_HINTS.contains(&"[2/3] Quiz"));
        assert_eq!(menu.action_for_key('2'), Some(MenuAction::QuizEnToZh));
        for hint in MENU_HINTS {
            let key = hint.trim_start_matches('[').chars().next().unwrap();
            assert!(menu.action_for_key(key).is_some(), "dead hint {hint}");
        }
    }
}
