pub mod details_form;
pub mod notice;
pub mod overview;
pub mod pokemon_card;
pub mod stepper;
pub mod team_selection;
pub mod welcome;

use ratatui::style::{Color, Modifier, Style};

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use details_form::{DetailsScreen, DetailsScreenProps};
pub use notice::{NoticeToast, NoticeToastProps};
pub use overview::{Overview, OverviewProps};
pub use pokemon_card::{detail_text, PokemonCard, PokemonCardProps, CARD_HEIGHT};
pub use stepper::{Stepper, StepperProps};
pub use team_selection::{TeamSelection, TeamSelectionProps};
pub use welcome::{Welcome, WelcomeProps};

pub const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub const BG_PANEL_ALT: Color = Color::Rgb(26, 40, 58);
pub const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
pub const ACCENT_RED: Color = Color::Rgb(226, 96, 96);

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub fn spinner(tick: u64) -> char {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}

pub fn focus_border(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    }
}

/// `mr-mime` -> `Mr Mime`
pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                None => "".to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
