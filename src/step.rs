//! Wizard steps and the rules for moving between them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::wizard::{WizardState, MAX_TEAM_SIZE};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Step {
    #[default]
    Welcome,
    Details,
    Selection,
    Overview,
}

impl Step {
    /// Steps shown in the stepper, in order.
    pub const WIZARD: [Step; 2] = [Step::Details, Step::Selection];

    pub fn title(self) -> &'static str {
        match self {
            Step::Welcome => "Pokémon Team Builder",
            Step::Details => "Trainer details",
            Step::Selection => "Pick your team",
            Step::Overview => "Team overview",
        }
    }

    pub fn wizard_index(self) -> Option<usize> {
        Self::WIZARD.iter().position(|step| *step == self)
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum GateError {
    #[error("You need to pick {required} pokémons in order to continue.")]
    IncompleteTeam { picked: usize, required: usize },
}

/// Resolve where a request to enter `requested` actually lands.
///
/// Selection needs a full identity and the overview additionally a full
/// team; anything missing sends the user back to the details form.
pub fn entry_target(requested: Step, wizard: &WizardState) -> Step {
    match requested {
        Step::Selection if !wizard.has_identity() => Step::Details,
        Step::Overview if !wizard.has_identity() || !wizard.team_is_full() => Step::Details,
        step => step,
    }
}

/// The team must be exactly full before leaving the selection step forward.
pub fn selection_gate(wizard: &WizardState) -> Result<(), GateError> {
    let picked = wizard.selected.len();
    if picked == MAX_TEAM_SIZE {
        Ok(())
    } else {
        Err(GateError::IncompleteTeam {
            picked,
            required: MAX_TEAM_SIZE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{NamedRef, Pokemon, SpriteVariants};

    fn trainer() -> WizardState {
        WizardState {
            player_name: "Ash".into(),
            team_name: "Thunder".into(),
            type_id: Some(13),
            selected: Vec::new(),
        }
    }

    fn fill(wizard: &mut WizardState, count: u32) {
        for id in 0..count {
            wizard.pick(Pokemon {
                id,
                name: format!("mon-{id}"),
                sprites: SpriteVariants::default(),
                types: Vec::new(),
                forms: Vec::new(),
                species: NamedRef {
                    id,
                    name: format!("mon-{id}"),
                },
                move_count: 0,
            });
        }
    }

    #[test]
    fn selection_without_identity_redirects_to_details() {
        let mut wizard = trainer();
        wizard.team_name.clear();
        assert_eq!(entry_target(Step::Selection, &wizard), Step::Details);

        let wizard = trainer();
        assert_eq!(entry_target(Step::Selection, &wizard), Step::Selection);
    }

    #[test]
    fn overview_requires_full_team() {
        let mut wizard = trainer();
        fill(&mut wizard, 6);
        assert_eq!(entry_target(Step::Overview, &wizard), Step::Details);

        fill(&mut wizard, 7);
        assert_eq!(entry_target(Step::Overview, &wizard), Step::Overview);
    }

    #[test]
    fn welcome_and_details_are_always_reachable() {
        let wizard = WizardState::default();
        assert_eq!(entry_target(Step::Welcome, &wizard), Step::Welcome);
        assert_eq!(entry_target(Step::Details, &wizard), Step::Details);
    }

    #[test]
    fn gate_reports_missing_members() {
        let mut wizard = trainer();
        fill(&mut wizard, 6);
        let error = selection_gate(&wizard).unwrap_err();
        assert_eq!(
            error,
            GateError::IncompleteTeam {
                picked: 6,
                required: 7
            }
        );
        assert_eq!(
            error.to_string(),
            "You need to pick 7 pokémons in order to continue."
        );

        fill(&mut wizard, 7);
        assert_eq!(selection_gate(&wizard), Ok(()));
    }

    #[test]
    fn stepper_only_lists_wizard_steps() {
        assert_eq!(Step::Details.wizard_index(), Some(0));
        assert_eq!(Step::Selection.wizard_index(), Some(1));
        assert_eq!(Step::Welcome.wizard_index(), None);
        assert_eq!(Step::Overview.wizard_index(), None);
    }
}
