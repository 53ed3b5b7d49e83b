use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, TEXT_DIM};
use crate::action::Action;
use crate::step::Step;

pub struct StepperProps {
    pub current: Step,
}

/// Step indicator over the wizard steps.
#[derive(Default)]
pub struct Stepper;

impl Component<Action> for Stepper {
    type Props<'a> = StepperProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let current = props.current.wizard_index();
        let mut spans = Vec::new();
        for (index, step) in Step::WIZARD.iter().enumerate() {
            if index > 0 {
                spans.push(Span::styled("  ──  ", Style::default().fg(TEXT_DIM)));
            }
            let style = match current {
                Some(active) if active == index => Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
                Some(active) if index < active => Style::default().fg(ACCENT_GOLD),
                _ => Style::default().fg(TEXT_DIM),
            };
            spans.push(Span::styled(
                format!("{} {}", index + 1, step.title()),
                style,
            ));
        }
        let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}
