use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, TextInput, TextInputProps, TextInputStyle,
};

use super::{
    focus_border, format_name, spinner, Component, ACCENT_GOLD, ACCENT_RED, BG_HIGHLIGHT,
    BG_PANEL, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::state::{DetailsField, DetailsForm, PokemonType};
use crate::step::Step;
use crate::validation::FieldError;

const PLAYER_PLACEHOLDER: &str = "Insert player name";
const TEAM_PLACEHOLDER: &str = "Insert team name";

pub struct DetailsScreenProps<'a> {
    pub form: &'a DetailsForm,
    pub types: &'a DataResource<Vec<PokemonType>>,
    pub tick: u64,
    pub is_focused: bool,
}

/// The trainer details form: two names and a type.
pub struct DetailsScreen {
    player_input: TextInput,
    team_input: TextInput,
    type_list: SelectList,
}

impl Default for DetailsScreen {
    fn default() -> Self {
        Self {
            player_input: TextInput::new(),
            team_input: TextInput::new(),
            type_list: SelectList::new(),
        }
    }
}

impl DetailsScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for DetailsScreen {
    type Props<'a> = DetailsScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Tab => return vec![Action::DetailsFocusNext],
            KeyCode::BackTab => return vec![Action::DetailsFocusPrev],
            KeyCode::Esc => return vec![Action::StepEnter(Step::Welcome)],
            _ => {}
        }

        let form = props.form;
        match form.focus {
            DetailsField::PlayerName => {
                let input_props = TextInputProps {
                    value: &form.player_name,
                    placeholder: PLAYER_PLACEHOLDER,
                    is_focused: true,
                    style: name_input_style(),
                    on_change: Action::DetailsPlayerNameChange,
                    on_submit: |_| Action::DetailsFocusNext,
                    on_cursor_move: Some(|_| Action::Render),
                };
                self.player_input
                    .handle_event(event, input_props)
                    .into_iter()
                    .collect()
            }
            DetailsField::TeamName => {
                let input_props = TextInputProps {
                    value: &form.team_name,
                    placeholder: TEAM_PLACEHOLDER,
                    is_focused: true,
                    style: name_input_style(),
                    on_change: Action::DetailsTeamNameChange,
                    on_submit: |_| Action::DetailsFocusNext,
                    on_cursor_move: Some(|_| Action::Render),
                };
                self.team_input
                    .handle_event(event, input_props)
                    .into_iter()
                    .collect()
            }
            DetailsField::Type => match (key.code, props.types) {
                // Enter and Space confirm the highlighted row
                (KeyCode::Enter, DataResource::Loaded(types)) if !types.is_empty() => vec![
                    Action::DetailsTypeSelect(form.type_cursor.min(types.len() - 1)),
                    Action::DetailsFocusNext,
                ],
                (KeyCode::Char(' '), DataResource::Loaded(types)) if !types.is_empty() => {
                    vec![Action::DetailsTypeSelect(
                        form.type_cursor.min(types.len() - 1),
                    )]
                }
                (KeyCode::Enter, _) => vec![Action::DetailsFocusNext],
                (KeyCode::Char('r'), DataResource::Failed(_)) => vec![Action::TypesFetch],
                (_, DataResource::Loaded(types)) => {
                    let items = type_items(types);
                    let list_props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: form.type_cursor.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: type_list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::DetailsTypeSelect,
                        render_item: &|item| item.clone(),
                    };
                    self.type_list
                        .handle_event(event, list_props)
                        .into_iter()
                        .collect()
                }
                _ => Vec::new(),
            },
            DetailsField::Submit => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => vec![Action::DetailsSubmit],
                _ => Vec::new(),
            },
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let form = props.form;
        let [player_area, team_area, type_area, submit_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .areas(area);

        let field_focused = |field: DetailsField| props.is_focused && form.focus == field;

        let player_focused = field_focused(DetailsField::PlayerName);
        let inner = name_field_frame(
            frame,
            player_area,
            "Player name",
            form.errors.player_name,
            player_focused,
        );
        self.player_input.render(
            frame,
            inner,
            TextInputProps {
                value: &form.player_name,
                placeholder: PLAYER_PLACEHOLDER,
                is_focused: player_focused,
                style: name_input_style(),
                on_change: Action::DetailsPlayerNameChange,
                on_submit: |_| Action::DetailsFocusNext,
                on_cursor_move: Some(|_| Action::Render),
            },
        );

        let team_focused = field_focused(DetailsField::TeamName);
        let inner = name_field_frame(
            frame,
            team_area,
            "Team name",
            form.errors.team_name,
            team_focused,
        );
        self.team_input.render(
            frame,
            inner,
            TextInputProps {
                value: &form.team_name,
                placeholder: TEAM_PLACEHOLDER,
                is_focused: team_focused,
                style: name_input_style(),
                on_change: Action::DetailsTeamNameChange,
                on_submit: |_| Action::DetailsFocusNext,
                on_cursor_move: Some(|_| Action::Render),
            },
        );

        let type_focused = field_focused(DetailsField::Type);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(focus_border(type_focused))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .title(" Pokemon type ");
        let block = match form.errors.type_id {
            Some(error) => block.title_bottom(error_line(error)),
            None => block,
        };
        let inner = block.inner(type_area);
        frame.render_widget(block, type_area);
        match props.types {
            DataResource::Loaded(types) => {
                let items = type_items(types);
                self.type_list.render(
                    frame,
                    inner,
                    SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: form.type_cursor.min(items.len().saturating_sub(1)),
                        is_focused: type_focused,
                        style: type_list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::DetailsTypeSelect,
                        render_item: &|item| item.clone(),
                    },
                );
            }
            DataResource::Failed(_) => {
                let line = Line::from(vec![
                    Span::styled(
                        "Could not load pokemon types. ",
                        Style::default().fg(ACCENT_RED),
                    ),
                    Span::styled("r", Style::default().fg(ACCENT_GOLD)),
                    Span::styled(" to retry", Style::default().fg(TEXT_DIM)),
                ]);
                frame.render_widget(Paragraph::new(line), inner);
            }
            DataResource::Loading | DataResource::Empty => {
                let line = format!("{} Retrieving pokemon types...", spinner(props.tick));
                frame.render_widget(
                    Paragraph::new(line).style(Style::default().fg(TEXT_DIM)),
                    inner,
                );
            }
        }

        let submit_focused = field_focused(DetailsField::Submit);
        let label = if submit_focused {
            Style::default()
                .fg(ACCENT_GOLD)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        let button = Paragraph::new(Line::from(Span::styled("Continue", label)).centered()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_border(submit_focused)),
        );
        frame.render_widget(button, submit_area);
    }
}

/// Draw the titled frame of a name input and return the area inside it.
fn name_field_frame(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    error: Option<FieldError>,
    is_focused: bool,
) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(is_focused))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .title(format!(" {title} "));
    let block = match error {
        Some(error) => block.title_bottom(error_line(error)),
        None => block,
    };
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

fn error_line(error: FieldError) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {error} "),
        Style::default().fg(ACCENT_RED),
    ))
}

fn name_input_style() -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        placeholder_style: Some(Style::default().fg(TEXT_DIM)),
        cursor_style: None,
    }
}

fn type_items(types: &[PokemonType]) -> Vec<Line<'static>> {
    types
        .iter()
        .map(|kind| Line::from(format_name(&kind.name)))
        .collect()
}

fn type_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}
