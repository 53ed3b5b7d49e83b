//! Trainer identity and the picked team, shared across wizard steps.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::Pokemon;
use crate::validation::TrainerDetails;

pub const MAX_TEAM_SIZE: usize = 7;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WizardState {
    pub player_name: String,
    pub team_name: String,
    pub type_id: Option<u32>,
    /// Picked pokemon in pick order, unique by id
    pub selected: Vec<Pokemon>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    Added,
    AlreadyPicked,
    TeamFull,
}

impl WizardState {
    /// All fields the selection step depends on are set.
    pub fn has_identity(&self) -> bool {
        !self.player_name.is_empty() && !self.team_name.is_empty() && self.type_id.is_some()
    }

    pub fn apply_details(&mut self, details: TrainerDetails) {
        self.player_name = details.player_name;
        self.team_name = details.team_name;
        self.type_id = Some(details.type_id);
    }

    pub fn is_picked(&self, id: u32) -> bool {
        self.selected.iter().any(|member| member.id == id)
    }

    pub fn team_is_full(&self) -> bool {
        self.selected.len() >= MAX_TEAM_SIZE
    }

    pub fn pick(&mut self, pokemon: Pokemon) -> PickOutcome {
        if self.is_picked(pokemon.id) {
            return PickOutcome::AlreadyPicked;
        }
        if self.team_is_full() {
            return PickOutcome::TeamFull;
        }
        self.selected.push(pokemon);
        PickOutcome::Added
    }

    pub fn unpick(&mut self, id: u32) -> bool {
        let before = self.selected.len();
        self.selected.retain(|member| member.id != id);
        self.selected.len() != before
    }

    pub fn clear_team(&mut self) {
        self.selected.clear();
    }
}
