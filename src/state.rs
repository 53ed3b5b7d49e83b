//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::pagination::{PageCursor, Stream};
use crate::step::{GateError, Step};
use crate::validation::FieldErrors;
use crate::wizard::{WizardState, MAX_TEAM_SIZE};

/// Tick interval for the spinner and notice expiry.
pub const TICK_MS: u64 = 100;
/// Notices disappear on their own after this many ticks.
pub const NOTICE_TTL_TICKS: u32 = 50;
pub const DEFAULT_PAGE_SIZE: u32 = 4;
pub const DEFAULT_CONFIRM_DELAY_MS: u64 = 2000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NamedRef {
    pub id: u32,
    pub name: String,
}

/// Sprite URLs of a pokemon; any of them may be missing in the catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteVariants {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_default: Option<String>,
    pub back_shiny: Option<String>,
}

/// One catalog entry. Identity is `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub sprites: SpriteVariants,
    pub types: Vec<NamedRef>,
    pub forms: Vec<NamedRef>,
    pub species: NamedRef,
    pub move_count: u32,
}

impl Pokemon {
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|kind| kind.name.as_str()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonType {
    pub id: u32,
    pub name: String,
}

/// Values the reducer needs from the command line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WizardConfig {
    pub page_size: u32,
    pub confirm_delay_ms: u64,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            confirm_delay_ms: DEFAULT_CONFIRM_DELAY_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum NoticeTone {
    /// Validation and gating guidance
    Guidance,
    /// Something failed (network, missing data)
    Failure,
}

/// A transient, dismissible message shown on top of the current screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub tone: NoticeTone,
    pub ttl_ticks: u32,
}

impl Notice {
    pub fn guidance(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tone: NoticeTone::Guidance,
            ttl_ticks: NOTICE_TTL_TICKS,
        }
    }

    pub fn failure(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tone: NoticeTone::Failure,
            ttl_ticks: NOTICE_TTL_TICKS,
        }
    }

    pub fn api_failure() -> Self {
        Self::failure(
            "Uh oh! Something went wrong.",
            "There was a problem with the Pokemon API. Please try again later.",
        )
    }

    pub fn missing_type() -> Self {
        Self::failure(
            "Uh oh! Something went wrong.",
            "It seems that the Pokemon type ID is not defined :(",
        )
    }

    pub fn team_full() -> Self {
        Self::guidance(
            "Your team is full.",
            format!("You already picked {MAX_TEAM_SIZE} pokémons. Remove one to pick another."),
        )
    }

    pub fn is_failure(&self) -> bool {
        self.tone == NoticeTone::Failure
    }
}

impl From<GateError> for Notice {
    fn from(error: GateError) -> Self {
        match error {
            GateError::IncompleteTeam { .. } => {
                Self::guidance("Uh oh! Please complete your team.", error.to_string())
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DetailsField {
    #[default]
    PlayerName,
    TeamName,
    Type,
    Submit,
}

impl DetailsField {
    pub fn next(self) -> Self {
        match self {
            DetailsField::PlayerName => DetailsField::TeamName,
            DetailsField::TeamName => DetailsField::Type,
            DetailsField::Type => DetailsField::Submit,
            DetailsField::Submit => DetailsField::PlayerName,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DetailsField::PlayerName => DetailsField::Submit,
            DetailsField::TeamName => DetailsField::PlayerName,
            DetailsField::Type => DetailsField::TeamName,
            DetailsField::Submit => DetailsField::Type,
        }
    }
}

/// Draft values of the trainer details form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DetailsForm {
    pub player_name: String,
    pub team_name: String,
    pub type_id: Option<u32>,
    pub type_cursor: usize,
    pub focus: DetailsField,
    pub errors: FieldErrors,
}

impl DetailsForm {
    /// Start the form from whatever the wizard already holds.
    pub fn prefill(wizard: &WizardState, types: Option<&[PokemonType]>) -> Self {
        let mut form = Self {
            player_name: wizard.player_name.clone(),
            team_name: wizard.team_name.clone(),
            type_id: wizard.type_id,
            ..Self::default()
        };
        if let Some(types) = types {
            form.sync_type_cursor(types);
        }
        form
    }

    pub fn sync_type_cursor(&mut self, types: &[PokemonType]) {
        let position = self
            .type_id
            .and_then(|id| types.iter().position(|kind| kind.id == id));
        self.type_cursor = position.unwrap_or(0);
    }
}

/// Per-visit state of the team selection step. Dropped when the step is left.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelectionStep {
    /// Identifies this visit; results tagged with another visit are stale.
    pub visit: u64,
    pub same: PageCursor,
    pub other: PageCursor,
    pub focus: Stream,
    /// Highlighted card index, per stream.
    pub highlights: [usize; 2],
    pub detail_open: bool,
    /// The artificial delay before the overview is running.
    pub confirming: bool,
}

impl SelectionStep {
    pub fn new(visit: u64) -> Self {
        Self {
            visit,
            same: PageCursor::new(Stream::SameType),
            other: PageCursor::new(Stream::OtherType),
            focus: Stream::SameType,
            highlights: [0, 0],
            detail_open: false,
            confirming: false,
        }
    }

    pub fn cursor(&self, stream: Stream) -> &PageCursor {
        match stream {
            Stream::SameType => &self.same,
            Stream::OtherType => &self.other,
        }
    }

    pub fn cursor_mut(&mut self, stream: Stream) -> &mut PageCursor {
        match stream {
            Stream::SameType => &mut self.same,
            Stream::OtherType => &mut self.other,
        }
    }

    pub fn highlight(&self, stream: Stream) -> usize {
        self.highlights[stream.index()]
    }

    pub fn highlighted(&self) -> Option<&Pokemon> {
        self.cursor(self.focus).items.get(self.highlight(self.focus))
    }

    /// Move the highlight of the focused stream, clamped to its items.
    pub fn move_highlight(&mut self, delta: i32) -> bool {
        let len = self.cursor(self.focus).items.len();
        if len == 0 {
            return false;
        }
        let current = self.highlight(self.focus) as i64;
        let next = (current + i64::from(delta)).clamp(0, len as i64 - 1) as usize;
        let slot = &mut self.highlights[self.focus.index()];
        if *slot == next {
            return false;
        }
        *slot = next;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.same.is_loading || self.other.is_loading
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "Wizard", label = "Step", debug_fmt)]
    pub step: Step,

    /// Trainer identity and picked team, shared by every step
    #[debug(section = "Wizard", label = "Trainer", debug_fmt)]
    pub wizard: WizardState,

    /// Filter keys for the details form: Empty → Loading → Loaded/Failed
    #[debug(section = "Catalog", label = "Types", debug_fmt)]
    pub types: DataResource<Vec<PokemonType>>,

    #[debug(section = "Selection", label = "Visit", debug_fmt)]
    pub selection: Option<SelectionStep>,

    #[debug(section = "Status", label = "Notice", debug_fmt)]
    pub notice: Option<Notice>,

    #[debug(skip)]
    pub details: DetailsForm,

    #[debug(skip)]
    pub config: WizardConfig,

    /// Visit id handed to the next selection step
    #[debug(skip)]
    pub next_visit: u64,

    #[debug(skip)]
    pub tick: u64,
}

impl AppState {
    pub fn new(config: WizardConfig) -> Self {
        Self {
            step: Step::Welcome,
            wizard: WizardState::default(),
            types: DataResource::Empty,
            selection: None,
            notice: None,
            details: DetailsForm::default(),
            config,
            next_visit: 1,
            tick: 0,
        }
    }

    pub fn type_name(&self, id: u32) -> Option<&str> {
        self.types
            .data()?
            .iter()
            .find(|kind| kind.id == id)
            .map(|kind| kind.name.as_str())
    }

    /// Something is in flight that the spinner should reflect.
    pub fn is_busy(&self) -> bool {
        match self.step {
            Step::Details => self.types.is_loading(),
            Step::Selection => self
                .selection
                .as_ref()
                .is_some_and(|selection| selection.is_loading() || selection.confirming),
            Step::Welcome | Step::Overview => false,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(WizardConfig::default())
    }
}
