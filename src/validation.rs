//! Field rules of the trainer details form.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const NAME_MAX_CHARS: usize = 100;

#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FieldError {
    #[error("The player name is required")]
    PlayerNameRequired,
    #[error("The player name must be 100 or less characters long")]
    PlayerNameTooLong,
    #[error("The team name is required")]
    TeamNameRequired,
    #[error("The team name must be 100 or less characters long")]
    TeamNameTooLong,
    #[error("The pokemon type is required")]
    TypeRequired,
}

/// Inline errors, one slot per field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldErrors {
    pub player_name: Option<FieldError>,
    pub team_name: Option<FieldError>,
    pub type_id: Option<FieldError>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.player_name.is_none() && self.team_name.is_none() && self.type_id.is_none()
    }
}

/// Details that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainerDetails {
    pub player_name: String,
    pub team_name: String,
    pub type_id: u32,
}

pub fn validate_details(
    player_name: &str,
    team_name: &str,
    type_id: Option<u32>,
) -> Result<TrainerDetails, FieldErrors> {
    let player_name = player_name.trim();
    let team_name = team_name.trim();
    let errors = FieldErrors {
        player_name: check_name(
            player_name,
            FieldError::PlayerNameRequired,
            FieldError::PlayerNameTooLong,
        ),
        team_name: check_name(
            team_name,
            FieldError::TeamNameRequired,
            FieldError::TeamNameTooLong,
        ),
        type_id: type_id.is_none().then_some(FieldError::TypeRequired),
    };

    match type_id {
        Some(type_id) if errors.is_empty() => Ok(TrainerDetails {
            player_name: player_name.to_string(),
            team_name: team_name.to_string(),
            type_id,
        }),
        _ => Err(errors),
    }
}

fn check_name(value: &str, required: FieldError, too_long: FieldError) -> Option<FieldError> {
    if value.is_empty() {
        Some(required)
    } else if value.chars().count() > NAME_MAX_CHARS {
        Some(too_long)
    } else {
        None
    }
}
