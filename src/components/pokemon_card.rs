use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{
    format_name, Component, ACCENT_GOLD, ACCENT_TEAL, BG_HIGHLIGHT, BG_PANEL, BG_PANEL_ALT,
    TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::state::Pokemon;

/// Rows taken by one card, borders included.
pub const CARD_HEIGHT: u16 = 4;

pub struct PokemonCardProps<'a> {
    /// `None` draws a loading placeholder
    pub pokemon: Option<&'a Pokemon>,
    pub picked: bool,
    pub highlighted: bool,
    /// A pick control is only offered while the team has room
    pub can_pick: bool,
}

#[derive(Default)]
pub struct PokemonCard;

impl Component<Action> for PokemonCard {
    type Props<'a> = PokemonCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let Some(pokemon) = props.pokemon else {
            render_skeleton(frame, area);
            return;
        };

        let border = if props.highlighted {
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD)
        } else if props.picked {
            Style::default().fg(ACCENT_GOLD)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        let bg = if props.highlighted {
            BG_HIGHLIGHT
        } else {
            BG_PANEL
        };

        let control = if props.picked {
            Span::styled("[x] picked", Style::default().fg(ACCENT_GOLD))
        } else if props.can_pick {
            Span::styled("[ ] pick", Style::default().fg(TEXT_DIM))
        } else {
            Span::raw("")
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .style(Style::default().bg(bg).fg(TEXT_MAIN))
            .title(format!(" #{} {} ", pokemon.id, format_name(&pokemon.name)))
            .title_bottom(Line::from(control).right_aligned());

        let text = Text::from(vec![
            Line::from(vec![
                Span::styled("Types: ", Style::default().fg(TEXT_DIM)),
                Span::styled(
                    pokemon.type_names().join(", "),
                    Style::default().fg(ACCENT_TEAL),
                ),
            ]),
            Line::from(vec![
                Span::styled("Moves: ", Style::default().fg(TEXT_DIM)),
                Span::raw(pokemon.move_count.to_string()),
            ]),
        ]);
        frame.render_widget(Paragraph::new(text).block(block), area);
    }
}

fn render_skeleton(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(TEXT_DIM))
        .style(Style::default().bg(BG_PANEL_ALT));
    let bar = "░".repeat(area.width.saturating_sub(4) as usize);
    let short = "░".repeat((area.width.saturating_sub(4) / 2) as usize);
    let text = Text::from(vec![
        Line::styled(bar, Style::default().fg(TEXT_DIM)),
        Line::styled(short, Style::default().fg(TEXT_DIM)),
    ]);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

/// Everything the detail dialog shows about one pokemon.
pub fn detail_text(pokemon: &Pokemon) -> Text<'static> {
    let label = Style::default().fg(TEXT_DIM);
    let value = Style::default().fg(TEXT_MAIN);
    let sprite = |url: &Option<String>| url.clone().unwrap_or_else(|| "-".to_string());
    let join = |names: Vec<String>| {
        if names.is_empty() {
            "-".to_string()
        } else {
            names.join(", ")
        }
    };

    Text::from(vec![
        Line::from(Span::styled(
            format!("#{} {}", pokemon.id, format_name(&pokemon.name)),
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("Sprite: ", label),
            Span::styled(sprite(&pokemon.sprites.front_default), value),
        ]),
        Line::from(vec![
            Span::styled("Shiny: ", label),
            Span::styled(sprite(&pokemon.sprites.front_shiny), value),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("Types: ", label),
            Span::styled(
                join(pokemon.types.iter().map(|kind| format_name(&kind.name)).collect()),
                Style::default().fg(ACCENT_GOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Forms: ", label),
            Span::styled(
                join(pokemon.forms.iter().map(|form| format_name(&form.name)).collect()),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("Species: ", label),
            Span::styled(format_name(&pokemon.species.name), value),
        ]),
        Line::from(vec![
            Span::styled("Total number of moves: ", label),
            Span::styled(pokemon.move_count.to_string(), value),
        ]),
    ])
}
