//! Actions of the team builder wizard

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::pagination::Stream;
use crate::state::{Pokemon, PokemonType};
use crate::step::Step;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Step category =====
    /// Intent: enter a step; the guard may land somewhere else
    StepEnter(Step),

    // ===== Types category =====
    /// Intent: load the pokemon type list (no-op while loading or loaded)
    TypesFetch,

    TypesDidLoad(Vec<PokemonType>),

    TypesDidError(String),

    // ===== Details category =====
    DetailsPlayerNameChange(String),

    DetailsTeamNameChange(String),

    /// Highlight a type in the type list (by index)
    DetailsTypeSelect(usize),

    DetailsFocusNext,

    DetailsFocusPrev,

    /// Validate the form and continue to the selection step
    DetailsSubmit,

    // ===== Page category =====
    /// Intent: fetch the next page of a stream
    PageLoadMore(Stream),

    /// Result: a page arrived for the given selection visit
    PageDidLoad {
        stream: Stream,
        visit: u64,
        items: Vec<Pokemon>,
    },

    /// Result: a page request failed
    PageDidError {
        stream: Stream,
        visit: u64,
        error: String,
    },

    // ===== Selection category =====
    SelectionFocusStream(Stream),

    /// Move the highlighted card by a signed amount
    SelectionMove(i16),

    SelectionDetailOpen,

    SelectionDetailClose,

    /// Back to the details form
    SelectionPrev,

    /// Forward to the overview, gated on a full team
    SelectionNext,

    /// Result: the confirm delay elapsed
    SelectionConfirmDidFinish { visit: u64 },

    // ===== Team category =====
    /// Add a pokemon to the team (sent by the detail dialog)
    TeamPick(Pokemon),

    /// Remove a team member by id (sent by the detail dialog)
    TeamRemove(u32),

    /// Pick or remove the highlighted card
    TeamToggle,

    // ===== Notice category =====
    NoticeDismiss,

    // ===== Uncategorized (global) =====
    /// Force a re-render (cursor movement in text inputs)
    Render,

    /// Periodic tick for the spinner and notice expiry
    Tick,

    Quit,
}
