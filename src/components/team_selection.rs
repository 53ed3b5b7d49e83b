use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::{
    detail_text, focus_border, format_name, spinner, Component, PokemonCard, PokemonCardProps,
    ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, CARD_HEIGHT, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::pagination::{PageCursor, Stream};
use crate::state::SelectionStep;
use crate::wizard::{WizardState, MAX_TEAM_SIZE};

pub struct TeamSelectionProps<'a> {
    pub selection: &'a SelectionStep,
    pub wizard: &'a WizardState,
    /// Number of placeholder cards shown while a page is in flight
    pub page_size: u32,
    pub tick: u64,
    pub is_focused: bool,
}

/// Two paged card columns plus the picked team.
pub struct TeamSelection {
    modal: Modal,
}

impl Default for TeamSelection {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl TeamSelection {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        selection: &SelectionStep,
        wizard: &WizardState,
    ) -> Vec<Action> {
        let mut noop_render = |_frame: &mut Frame, _area: Rect| {};
        let modal_props = ModalProps {
            is_open: true,
            is_focused: true,
            area: Rect::default(),
            style: detail_modal_style(),
            behavior: ModalBehavior {
                close_on_esc: true,
                close_on_backdrop: false,
            },
            on_close: || Action::SelectionDetailClose,
            render_content: &mut noop_render,
        };
        let actions: Vec<_> = self
            .modal
            .handle_event(event, modal_props)
            .into_iter()
            .collect();
        if !actions.is_empty() {
            return actions;
        }

        match event {
            EventKind::Key(key) => match key.code {
                // Pick or remove the pokemon on display
                KeyCode::Char(' ') => match selection.highlighted() {
                    Some(pokemon) if wizard.is_picked(pokemon.id) => {
                        vec![Action::TeamRemove(pokemon.id)]
                    }
                    Some(pokemon) => vec![Action::TeamPick(pokemon.clone())],
                    None => Vec::new(),
                },
                KeyCode::Enter | KeyCode::Char('q') => vec![Action::SelectionDetailClose],
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

impl Component<Action> for TeamSelection {
    type Props<'a> = TeamSelectionProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        if let EventKind::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return Vec::new();
            }
        }
        let selection = props.selection;
        if selection.detail_open {
            return self.handle_detail_event(event, selection, props.wizard);
        }

        let page = i16::try_from(props.page_size).unwrap_or(i16::MAX);
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Tab | KeyCode::BackTab => {
                    vec![Action::SelectionFocusStream(selection.focus.other())]
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    vec![Action::SelectionFocusStream(Stream::SameType)]
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    vec![Action::SelectionFocusStream(Stream::OtherType)]
                }
                KeyCode::Up | KeyCode::Char('k') => vec![Action::SelectionMove(-1)],
                KeyCode::Down | KeyCode::Char('j') => vec![Action::SelectionMove(1)],
                KeyCode::PageUp => vec![Action::SelectionMove(-page)],
                KeyCode::PageDown => vec![Action::SelectionMove(page)],
                KeyCode::Char(' ') => vec![Action::TeamToggle],
                KeyCode::Enter => vec![Action::SelectionDetailOpen],
                KeyCode::Char('m') => vec![Action::PageLoadMore(selection.focus)],
                KeyCode::Char('n') => vec![Action::SelectionNext],
                KeyCode::Char('p') | KeyCode::Backspace => vec![Action::SelectionPrev],
                KeyCode::Char('q') => vec![Action::Quit],
                _ => Vec::new(),
            },
            EventKind::Scroll { delta, .. } => {
                let step = i16::try_from(*delta)
                    .unwrap_or(if *delta < 0 { i16::MIN } else { i16::MAX });
                vec![Action::SelectionMove(step)]
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let selection = props.selection;
        let [header_area, body_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(CARD_HEIGHT + 3)])
                .areas(area);

        render_team_header(frame, header_area, &props);

        let [same_area, other_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(body_area);
        for (stream, column) in [(Stream::SameType, same_area), (Stream::OtherType, other_area)] {
            render_column(frame, column, stream, &props);
        }

        if !selection.detail_open {
            return;
        }
        let Some(pokemon) = selection.highlighted() else {
            return;
        };
        let modal_area = centered_rect(64, 16, area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let paragraph = Paragraph::new(detail_text(pokemon))
                .style(Style::default().fg(TEXT_MAIN))
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, content_area);
        };
        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: detail_modal_style(),
                behavior: ModalBehavior {
                    close_on_esc: true,
                    close_on_backdrop: false,
                },
                on_close: || Action::SelectionDetailClose,
                render_content: &mut render_content,
            },
        );
    }
}

fn render_team_header(frame: &mut Frame, area: Rect, props: &TeamSelectionProps<'_>) {
    let picked = props.wizard.selected.len();
    let count_style = if picked == MAX_TEAM_SIZE {
        Style::default()
            .fg(ACCENT_GOLD)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ACCENT_TEAL)
    };
    let mut summary = vec![
        Span::styled("You have picked ", Style::default().fg(TEXT_DIM)),
        Span::styled(picked.to_string(), count_style),
        Span::styled(
            format!(" pokémons out of {MAX_TEAM_SIZE}"),
            Style::default().fg(TEXT_DIM),
        ),
    ];
    if props.selection.confirming {
        summary.push(Span::styled(
            format!("   {} Getting your team ready...", spinner(props.tick)),
            Style::default().fg(ACCENT_GOLD),
        ));
    }

    let team = props
        .wizard
        .selected
        .iter()
        .map(|member| format_name(&member.name))
        .collect::<Vec<_>>()
        .join(", ");
    let lines = vec![
        Line::from(summary),
        Line::from(Span::styled(team, Style::default().fg(TEXT_MAIN))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_column(frame: &mut Frame, area: Rect, stream: Stream, props: &TeamSelectionProps<'_>) {
    let selection = props.selection;
    let cursor = selection.cursor(stream);
    let is_focused = props.is_focused && selection.focus == stream;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(is_focused))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .title(format!(" {} ", stream.label()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [cards_area, footer_area] =
        Layout::vertical([Constraint::Min(CARD_HEIGHT), Constraint::Length(1)]).areas(inner);

    let skeletons = if cursor.is_loading {
        props.page_size as usize
    } else {
        0
    };
    let total = cursor.items.len() + skeletons;
    let visible = (cards_area.height / CARD_HEIGHT).max(1) as usize;
    let highlight = selection.highlight(stream);
    let start = (highlight + 1).saturating_sub(visible);

    let team_has_room = !props.wizard.team_is_full();
    let mut card = PokemonCard;
    for (row, index) in (start..total).take(visible).enumerate() {
        let card_area = Rect {
            x: cards_area.x,
            y: cards_area.y + row as u16 * CARD_HEIGHT,
            width: cards_area.width,
            height: CARD_HEIGHT,
        };
        let pokemon = cursor.items.get(index);
        let picked = pokemon.is_some_and(|pokemon| props.wizard.is_picked(pokemon.id));
        card.render(
            frame,
            card_area,
            PokemonCardProps {
                pokemon,
                picked,
                highlighted: is_focused && pokemon.is_some() && index == highlight,
                can_pick: team_has_room && !selection.confirming,
            },
        );
    }

    frame.render_widget(column_footer(cursor, props.tick, is_focused), footer_area);
}

fn column_footer(cursor: &PageCursor, tick: u64, is_focused: bool) -> Paragraph<'static> {
    let line = if cursor.is_loading {
        Line::from(Span::styled(
            format!("{} Loading more pokemons...", spinner(tick)),
            Style::default().fg(ACCENT_GOLD),
        ))
    } else if cursor.is_exhausted {
        Line::from(Span::styled(
            "no more pokemon to load",
            Style::default().fg(TEXT_DIM),
        ))
    } else {
        let key_style = if is_focused {
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        Line::from(vec![
            Span::styled("m", key_style),
            Span::styled(" Load more pokemons", Style::default().fg(TEXT_DIM)),
        ])
    };
    Paragraph::new(line.centered())
}

fn detail_modal_style() -> ModalStyle {
    ModalStyle {
        base: BaseStyle {
            bg: Some(Color::Rgb(35, 35, 45)),
            padding: Padding::xy(2, 1),
            border: None,
            fg: None,
        },
        ..Default::default()
    }
}
