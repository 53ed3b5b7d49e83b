use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::step::Step;

pub struct WelcomeProps<'a> {
    /// Name remembered from an earlier run, if any
    pub player_name: &'a str,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct Welcome;

impl Component<Action> for Welcome {
    type Props<'a> = WelcomeProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Enter | KeyCode::Char('s') => Some(Action::StepEnter(Step::Details)),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let [_, body, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(7),
            Constraint::Fill(1),
        ])
        .areas(area);

        let greeting = if props.player_name.is_empty() {
            "Build a team of seven and get ready for your journey.".to_string()
        } else {
            format!("Welcome back, {}!", props.player_name)
        };
        let text = Text::from(vec![
            Line::from(Span::styled(
                Step::Welcome.title(),
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(greeting, Style::default().fg(TEXT_MAIN))),
            Line::default(),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(TEXT_DIM)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(ACCENT_GOLD)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(TEXT_DIM)),
            ]),
        ]);
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), body);
    }
}
