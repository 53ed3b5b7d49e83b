use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{Component, ACCENT_GOLD, ACCENT_RED, BG_PANEL_ALT, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::{Notice, NoticeTone};

const TOAST_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 5;

pub struct NoticeToastProps<'a> {
    pub notice: &'a Notice,
}

/// Transient message in the top right corner.
#[derive(Default)]
pub struct NoticeToast;

impl NoticeToast {
    /// Where the toast lands inside `area`.
    pub fn area(area: Rect) -> Rect {
        let width = TOAST_WIDTH.min(area.width);
        let height = TOAST_HEIGHT.min(area.height);
        Rect {
            x: area.x + area.width - width,
            y: area.y,
            width,
            height,
        }
    }
}

impl Component<Action> for NoticeToast {
    type Props<'a> = NoticeToastProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let notice = props.notice;
        let accent = match notice.tone {
            NoticeTone::Guidance => ACCENT_GOLD,
            NoticeTone::Failure => ACCENT_RED,
        };
        let toast = Self::area(area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(BG_PANEL_ALT).fg(TEXT_MAIN))
            .title_bottom(
                Line::from(Span::styled(" esc dismiss ", Style::default().fg(TEXT_DIM)))
                    .right_aligned(),
            );
        let text = Text::from(vec![
            Line::from(Span::styled(
                notice.title.clone(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(notice.description.clone()),
        ]);
        frame.render_widget(Clear, toast);
        frame.render_widget(
            Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
            toast,
        );
    }
}
