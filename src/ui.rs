//! Screen composition and event routing for the wizard

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::{EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::components::{
    spinner, Component, DetailsScreen, DetailsScreenProps, NoticeToast, NoticeToastProps,
    Overview, OverviewProps, Stepper, StepperProps, TeamSelection, TeamSelectionProps, Welcome,
    WelcomeProps, ACCENT_GOLD, ACCENT_TEAL, BG_BASE, BG_PANEL, TEXT_DIM, TEXT_MAIN,
};
use crate::state::AppState;
use crate::step::Step;

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum WizardComponentId {
    Welcome,
    Details,
    Selection,
    Overview,
}

impl WizardComponentId {
    pub const SCREENS: [WizardComponentId; 4] = [
        WizardComponentId::Welcome,
        WizardComponentId::Details,
        WizardComponentId::Selection,
        WizardComponentId::Overview,
    ];

    pub fn for_step(step: Step) -> Self {
        match step {
            Step::Welcome => WizardComponentId::Welcome,
            Step::Details => WizardComponentId::Details,
            Step::Selection => WizardComponentId::Selection,
            Step::Overview => WizardComponentId::Overview,
        }
    }
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardContext {
    Main,
    Form,
    Dialog,
}

impl EventRoutingState<WizardComponentId, WizardContext> for AppState {
    fn focused(&self) -> Option<WizardComponentId> {
        Some(WizardComponentId::for_step(self.step))
    }

    fn modal(&self) -> Option<WizardComponentId> {
        self.selection
            .as_ref()
            .filter(|selection| selection.detail_open)
            .map(|_| WizardComponentId::Selection)
    }

    fn binding_context(&self, id: WizardComponentId) -> WizardContext {
        match id {
            WizardComponentId::Details => WizardContext::Form,
            WizardComponentId::Selection if self.modal().is_some() => WizardContext::Dialog,
            _ => WizardContext::Main,
        }
    }

    fn default_context(&self) -> WizardContext {
        WizardContext::Main
    }
}

pub struct WizardUi {
    stepper: Stepper,
    welcome: Welcome,
    details: DetailsScreen,
    selection: TeamSelection,
    overview: Overview,
    notice: NoticeToast,
    status_bar: StatusBar,
}

impl Default for WizardUi {
    fn default() -> Self {
        Self {
            stepper: Stepper,
            welcome: Welcome,
            details: DetailsScreen::new(),
            selection: TeamSelection::new(),
            overview: Overview,
            notice: NoticeToast,
            status_bar: StatusBar::new(),
        }
    }
}

impl WizardUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<WizardComponentId>,
    ) {
        let active = WizardComponentId::for_step(state.step);
        for id in WizardComponentId::SCREENS {
            if id != active {
                event_ctx.component_areas.remove(&id);
            }
        }
        event_ctx.set_component_area(active, area);
        self.draw(frame, area, state, render_ctx.is_focused());
    }

    /// Render without an event context, as a focused frame.
    pub fn render_screen(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.draw(frame, area, state, true);
    }

    pub fn handle_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        handler_response(self.screen_actions(event, state))
    }

    /// Actions the current screen produces for one event.
    pub fn screen_actions(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        let dialog_open = state
            .selection
            .as_ref()
            .is_some_and(|selection| selection.detail_open);
        if let EventKind::Key(key) = event {
            if key.code == KeyCode::Esc && state.notice.is_some() && !dialog_open {
                return vec![Action::NoticeDismiss];
            }
        }

        match state.step {
            Step::Welcome => self
                .welcome
                .handle_event(
                    event,
                    WelcomeProps {
                        player_name: &state.wizard.player_name,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect(),
            Step::Details => self
                .details
                .handle_event(
                    event,
                    DetailsScreenProps {
                        form: &state.details,
                        types: &state.types,
                        tick: state.tick,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect(),
            Step::Selection => match state.selection.as_ref() {
                Some(selection) => self
                    .selection
                    .handle_event(
                        event,
                        TeamSelectionProps {
                            selection,
                            wizard: &state.wizard,
                            page_size: state.config.page_size,
                            tick: state.tick,
                            is_focused: true,
                        },
                    )
                    .into_iter()
                    .collect(),
                None => Vec::new(),
            },
            Step::Overview => self
                .overview
                .handle_event(
                    event,
                    OverviewProps {
                        wizard: &state.wizard,
                        type_name: state.wizard.type_id.and_then(|id| state.type_name(id)),
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect(),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState, is_focused: bool) {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);

        let [title_area, stepper_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .areas(area);

        render_title(frame, title_area, state);
        if state.step.wizard_index().is_some() {
            self.stepper.render(
                frame,
                stepper_area,
                StepperProps {
                    current: state.step,
                },
            );
        }

        let body = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(TEXT_DIM))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let inner = body.inner(body_area);
        frame.render_widget(body, body_area);

        match state.step {
            Step::Welcome => self.welcome.render(
                frame,
                inner,
                WelcomeProps {
                    player_name: &state.wizard.player_name,
                    is_focused,
                },
            ),
            Step::Details => self.details.render(
                frame,
                inner,
                DetailsScreenProps {
                    form: &state.details,
                    types: &state.types,
                    tick: state.tick,
                    is_focused,
                },
            ),
            Step::Selection => {
                if let Some(selection) = state.selection.as_ref() {
                    self.selection.render(
                        frame,
                        inner,
                        TeamSelectionProps {
                            selection,
                            wizard: &state.wizard,
                            page_size: state.config.page_size,
                            tick: state.tick,
                            is_focused,
                        },
                    );
                }
            }
            Step::Overview => self.overview.render(
                frame,
                inner,
                OverviewProps {
                    wizard: &state.wizard,
                    type_name: state.wizard.type_id.and_then(|id| state.type_name(id)),
                    is_focused,
                },
            ),
        }

        self.render_status(frame, status_area, state);

        if let Some(notice) = state.notice.as_ref() {
            self.notice
                .render(frame, area, NoticeToastProps { notice });
        }
    }

    fn render_status(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let hints = status_hints(state);
        let status = if state.is_busy() {
            format!("{} working", spinner(state.tick))
        } else {
            String::new()
        };
        let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
        let status_items = [StatusBarItem::span(status_span)];

        let style = StatusBarStyle {
            base: BaseStyle {
                border: Some(BorderStyle {
                    borders: Borders::ALL,
                    style: Style::default().fg(TEXT_DIM),
                    focused_style: Some(Style::default().fg(ACCENT_TEAL)),
                }),
                padding: Padding::xy(1, 0),
                bg: Some(BG_PANEL),
                fg: Some(TEXT_MAIN),
            },
            text: Style::default().fg(TEXT_DIM),
            hint_key: Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(TEXT_DIM),
            separator: Style::default().fg(TEXT_DIM),
        };

        let props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items).with_separator("  "),
            style,
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, props);
    }
}

fn render_title(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled(
        Step::Welcome.title(),
        Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
    )];
    if state.step != Step::Welcome {
        spans.push(Span::styled(
            format!("  ·  {}", state.step.title()),
            Style::default().fg(TEXT_DIM),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    let mut hints = match state.step {
        Step::Welcome => vec![
            StatusBarHint::new("Enter", "Start"),
            StatusBarHint::new("q", "Quit"),
        ],
        Step::Details => vec![
            StatusBarHint::new("Tab", "Next field"),
            StatusBarHint::new("↑↓", "Type"),
            StatusBarHint::new("Enter", "Continue"),
            StatusBarHint::new("Esc", "Back"),
        ],
        Step::Selection if state.selection.as_ref().is_some_and(|s| s.detail_open) => vec![
            StatusBarHint::new("Space", "Pick"),
            StatusBarHint::new("Esc", "Close"),
        ],
        Step::Selection => vec![
            StatusBarHint::new("Tab", "Column"),
            StatusBarHint::new("↑↓", "Move"),
            StatusBarHint::new("Space", "Pick"),
            StatusBarHint::new("Enter", "Details"),
            StatusBarHint::new("m", "More"),
            StatusBarHint::new("n", "Next"),
            StatusBarHint::new("p", "Previous"),
        ],
        Step::Overview => vec![
            StatusBarHint::new("Enter", "Home"),
            StatusBarHint::new("q", "Quit"),
        ],
    };
    if state.notice.is_some() {
        hints.push(StatusBarHint::new("Esc", "Dismiss"));
    }
    hints
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}
