use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{format_name, Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::step::Step;
use crate::wizard::WizardState;

pub struct OverviewProps<'a> {
    pub wizard: &'a WizardState,
    /// Display name of the chosen type, when the type list is loaded
    pub type_name: Option<&'a str>,
    pub is_focused: bool,
}

/// Final screen with the confirmed team.
#[derive(Default)]
pub struct Overview;

impl Component<Action> for Overview {
    type Props<'a> = OverviewProps<'a>;

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
                KeyCode::Enter | KeyCode::Char('h') => Some(Action::StepEnter(Step::Welcome)),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let wizard = props.wizard;
        let [message_area, team_area] =
            Layout::vertical([Constraint::Length(4), Constraint::Min(3)]).areas(area);

        let message = Text::from(vec![
            Line::from(Span::styled(
                "Congratulations, you are now ready to start your Pokémon journey!",
                Style::default()
                    .fg(ACCENT_GOLD)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("Trainer ", Style::default().fg(TEXT_DIM)),
                Span::styled(wizard.player_name.clone(), Style::default().fg(TEXT_MAIN)),
                Span::styled("  Team ", Style::default().fg(TEXT_DIM)),
                Span::styled(wizard.team_name.clone(), Style::default().fg(TEXT_MAIN)),
                Span::styled("  Type ", Style::default().fg(TEXT_DIM)),
                Span::styled(
                    props.type_name.map(format_name).unwrap_or_else(|| "-".to_string()),
                    Style::default().fg(ACCENT_TEAL),
                ),
            ]),
        ]);
        frame.render_widget(
            Paragraph::new(message).alignment(Alignment::Center),
            message_area,
        );

        let members: Vec<Line> = wizard
            .selected
            .iter()
            .enumerate()
            .map(|(slot, member)| {
                Line::from(vec![
                    Span::styled(format!("{}. ", slot + 1), Style::default().fg(TEXT_DIM)),
                    Span::styled(
                        format_name(&member.name),
                        Style::default()
                            .fg(TEXT_MAIN)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", member.type_names().join(", ")),
                        Style::default().fg(ACCENT_TEAL),
                    ),
                ])
            })
            .collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT_TEAL))
            .style(Style::default().bg(BG_PANEL))
            .title(format!(" {} ", wizard.team_name));
        frame.render_widget(Paragraph::new(members).block(block), team_area);
    }
}
