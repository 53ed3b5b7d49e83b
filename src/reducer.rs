//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::{Effect, TeamSummary};
use crate::pagination::{PageQuery, Stream};
use crate::state::{AppState, DetailsField, DetailsForm, Notice, Pokemon, SelectionStep};
use crate::step::{entry_target, selection_gate, Step};
use crate::validation::validate_details;
use crate::wizard::PickOutcome;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Step actions =====
        Action::StepEnter(step) => enter_step(state, step),

        // ===== Types actions =====
        Action::TypesFetch => {
            if state.types.is_loading() || state.types.is_loaded() {
                return DispatchResult::unchanged();
            }
            state.types = DataResource::Loading;
            DispatchResult::changed_with(Effect::LoadTypes)
        }

        Action::TypesDidLoad(types) => {
            state.details.sync_type_cursor(&types);
            state.types = DataResource::Loaded(types);
            DispatchResult::changed()
        }

        Action::TypesDidError(error) => {
            tracing::warn!(%error, "pokemon types failed to load");
            state.types = DataResource::Failed(error);
            state.notice = Some(Notice::api_failure());
            DispatchResult::changed()
        }

        // ===== Details actions =====
        Action::DetailsPlayerNameChange(value) => {
            state.details.player_name = value;
            state.details.errors.player_name = None;
            DispatchResult::changed()
        }

        Action::DetailsTeamNameChange(value) => {
            state.details.team_name = value;
            state.details.errors.team_name = None;
            DispatchResult::changed()
        }

        Action::DetailsTypeSelect(index) => {
            let Some(kind) = state.types.data().and_then(|types| types.get(index)) else {
                return DispatchResult::unchanged();
            };
            let type_id = kind.id;
            if state.details.type_id == Some(type_id) && state.details.type_cursor == index {
                return DispatchResult::unchanged();
            }
            state.details.type_cursor = index;
            state.details.type_id = Some(type_id);
            state.details.errors.type_id = None;
            DispatchResult::changed()
        }

        Action::DetailsFocusNext => {
            state.details.focus = state.details.focus.next();
            DispatchResult::changed()
        }

        Action::DetailsFocusPrev => {
            state.details.focus = state.details.focus.prev();
            DispatchResult::changed()
        }

        Action::DetailsSubmit => submit_details(state),

        // ===== Page actions =====
        Action::PageLoadMore(stream) => load_more(state, stream),

        Action::PageDidLoad {
            stream,
            visit,
            items,
        } => {
            let page_size = state.config.page_size;
            let Some(selection) = current_visit(state, visit) else {
                tracing::debug!(visit, stream = stream.key(), "dropping stale page");
                return DispatchResult::unchanged();
            };
            let cursor = selection.cursor_mut(stream);
            let received = items.len();
            let appended = cursor.complete(items, page_size);
            tracing::debug!(
                stream = stream.key(),
                received,
                appended,
                offset = cursor.offset,
                exhausted = cursor.is_exhausted,
                "page merged"
            );
            DispatchResult::changed()
        }

        Action::PageDidError {
            stream,
            visit,
            error,
        } => {
            let Some(selection) = current_visit(state, visit) else {
                tracing::debug!(visit, stream = stream.key(), "dropping stale page error");
                return DispatchResult::unchanged();
            };
            selection.cursor_mut(stream).fail();
            tracing::warn!(stream = stream.key(), %error, "page fetch failed");
            state.notice = Some(Notice::api_failure());
            DispatchResult::changed()
        }

        // ===== Selection actions =====
        Action::SelectionFocusStream(stream) => match state.selection.as_mut() {
            Some(selection) if selection.focus != stream && !selection.detail_open => {
                selection.focus = stream;
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::SelectionMove(delta) => match state.selection.as_mut() {
            Some(selection) if !selection.detail_open => {
                if selection.move_highlight(i32::from(delta)) {
                    DispatchResult::changed()
                } else {
                    DispatchResult::unchanged()
                }
            }
            _ => DispatchResult::unchanged(),
        },

        Action::SelectionDetailOpen => match state.selection.as_mut() {
            Some(selection) if !selection.detail_open && selection.highlighted().is_some() => {
                selection.detail_open = true;
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::SelectionDetailClose => match state.selection.as_mut() {
            Some(selection) if selection.detail_open => {
                selection.detail_open = false;
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::SelectionPrev => {
            if state.step != Step::Selection {
                return DispatchResult::unchanged();
            }
            state.wizard.clear_team();
            enter_step(state, Step::Details)
        }

        Action::SelectionNext => {
            let Some(selection) = state.selection.as_mut() else {
                return DispatchResult::unchanged();
            };
            if selection.confirming {
                return DispatchResult::unchanged();
            }
            match selection_gate(&state.wizard) {
                Ok(()) => {
                    selection.confirming = true;
                    selection.detail_open = false;
                    DispatchResult::changed_with(Effect::ConfirmTeam {
                        visit: selection.visit,
                        delay_ms: state.config.confirm_delay_ms,
                    })
                }
                Err(error) => {
                    state.notice = Some(error.into());
                    DispatchResult::changed()
                }
            }
        }

        Action::SelectionConfirmDidFinish { visit } => {
            let confirming =
                current_visit(state, visit).is_some_and(|selection| selection.confirming);
            if !confirming {
                tracing::debug!(visit, "dropping stale team confirmation");
                return DispatchResult::unchanged();
            }
            enter_step(state, Step::Overview)
        }

        // ===== Team actions =====
        Action::TeamPick(pokemon) => {
            if !team_editable(state) {
                return DispatchResult::unchanged();
            }
            pick(state, pokemon)
        }

        Action::TeamRemove(id) => {
            if team_editable(state) && state.wizard.unpick(id) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::TeamToggle => {
            if !team_editable(state) {
                return DispatchResult::unchanged();
            }
            let Some(pokemon) = state
                .selection
                .as_ref()
                .and_then(|selection| selection.highlighted())
                .cloned()
            else {
                return DispatchResult::unchanged();
            };
            if state.wizard.unpick(pokemon.id) {
                DispatchResult::changed()
            } else {
                pick(state, pokemon)
            }
        }

        // ===== Notice actions =====
        Action::NoticeDismiss => {
            if state.notice.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Global actions =====
        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            let mut changed = false;
            if let Some(notice) = state.notice.as_mut() {
                notice.ttl_ticks = notice.ttl_ticks.saturating_sub(1);
                if notice.ttl_ticks == 0 {
                    state.notice = None;
                }
                changed = true;
            }
            if state.is_busy() {
                state.tick = state.tick.wrapping_add(1);
                changed = true;
            }
            if changed {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Move to `requested`, or wherever the entry guard sends it.
fn enter_step(state: &mut AppState, requested: Step) -> DispatchResult<Effect> {
    let target = entry_target(requested, &state.wizard);
    if target != requested {
        tracing::info!(?requested, ?target, "step entry redirected");
    }

    let mut effects = Vec::new();
    if let Some(selection) = state.selection.take() {
        effects.push(Effect::ReleaseSelectionScope {
            visit: selection.visit,
        });
    }

    match target {
        Step::Welcome => {}
        Step::Details => {
            let types = state.types.data().map(Vec::as_slice);
            state.details = DetailsForm::prefill(&state.wizard, types);
            if state.types.is_empty() || state.types.is_failed() {
                state.types = DataResource::Loading;
                effects.push(Effect::LoadTypes);
            }
        }
        Step::Selection => {
            state.wizard.clear_team();
            let visit = state.next_visit;
            state.next_visit += 1;
            let mut selection = SelectionStep::new(visit);
            if let Some(type_id) = state.wizard.type_id {
                for stream in Stream::ALL {
                    let cursor = selection.cursor_mut(stream);
                    if let Some(offset) = cursor.begin_fetch() {
                        effects.push(Effect::FetchPage {
                            stream,
                            visit,
                            query: PageQuery {
                                filter: stream.filter(type_id),
                                limit: state.config.page_size,
                                offset,
                            },
                            initial: true,
                        });
                    }
                }
            }
            state.selection = Some(selection);
        }
        Step::Overview => {
            if let Some(type_id) = state.wizard.type_id {
                effects.push(Effect::RecordTeam(TeamSummary {
                    player_name: state.wizard.player_name.clone(),
                    team_name: state.wizard.team_name.clone(),
                    type_id,
                    members: state
                        .wizard
                        .selected
                        .iter()
                        .map(|member| member.name.clone())
                        .collect(),
                }));
            }
        }
    }

    state.step = target;
    DispatchResult::changed_with_many(effects)
}

fn submit_details(state: &mut AppState) -> DispatchResult<Effect> {
    if state.step != Step::Details {
        return DispatchResult::unchanged();
    }
    let form = &state.details;
    match validate_details(&form.player_name, &form.team_name, form.type_id) {
        Ok(details) => {
            state.wizard.apply_details(details);
            state.details.errors = Default::default();
            enter_step(state, Step::Selection)
        }
        Err(errors) => {
            state.details.focus = if errors.player_name.is_some() {
                DetailsField::PlayerName
            } else if errors.team_name.is_some() {
                DetailsField::TeamName
            } else {
                DetailsField::Type
            };
            state.details.errors = errors;
            DispatchResult::changed()
        }
    }
}

fn load_more(state: &mut AppState, stream: Stream) -> DispatchResult<Effect> {
    let page_size = state.config.page_size;
    let Some(selection) = state.selection.as_mut() else {
        return DispatchResult::unchanged();
    };
    let Some(type_id) = state.wizard.type_id else {
        state.notice = Some(Notice::missing_type());
        return DispatchResult::changed();
    };
    let visit = selection.visit;
    let Some(offset) = selection.cursor_mut(stream).begin_fetch() else {
        return DispatchResult::unchanged();
    };
    DispatchResult::changed_with(Effect::FetchPage {
        stream,
        visit,
        query: PageQuery {
            filter: stream.filter(type_id),
            limit: page_size,
            offset,
        },
        initial: false,
    })
}

fn pick(state: &mut AppState, pokemon: Pokemon) -> DispatchResult<Effect> {
    match state.wizard.pick(pokemon) {
        PickOutcome::Added => DispatchResult::changed(),
        PickOutcome::AlreadyPicked => DispatchResult::unchanged(),
        PickOutcome::TeamFull => {
            state.notice = Some(Notice::team_full());
            DispatchResult::changed()
        }
    }
}

fn current_visit(state: &mut AppState, visit: u64) -> Option<&mut SelectionStep> {
    state
        .selection
        .as_mut()
        .filter(|selection| selection.visit == visit)
}

fn team_editable(state: &AppState) -> bool {
    state.step == Step::Selection
        && state
            .selection
            .as_ref()
            .is_some_and(|selection| !selection.confirming)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{NamedRef, PokemonType, SpriteVariants};
    use crate::validation::FieldError;
    use crate::wizard::MAX_TEAM_SIZE;

    fn pokemon(id: u32) -> Pokemon {
        Pokemon {
            id,
            name: format!("mon-{id}"),
            sprites: SpriteVariants::default(),
            types: Vec::new(),
            forms: Vec::new(),
            species: NamedRef {
                id,
                name: format!("mon-{id}"),
            },
            move_count: 1,
        }
    }

    fn trainer_state() -> AppState {
        let mut state = AppState::default();
        state.wizard.player_name = "Ash".into();
        state.wizard.team_name = "Thunder".into();
        state.wizard.type_id = Some(13);
        state
    }

    fn in_selection() -> AppState {
        let mut state = trainer_state();
        reducer(&mut state, Action::StepEnter(Step::Selection));
        state
    }

    #[test]
    fn test_entering_selection_fetches_both_streams() {
        let mut state = trainer_state();

        let result = reducer(&mut state, Action::StepEnter(Step::Selection));

        assert!(result.changed);
        assert_eq!(state.step, Step::Selection);
        assert_eq!(result.effects.len(), 2);
        let selection = state.selection.as_ref().unwrap();
        assert!(selection.same.is_loading);
        assert!(selection.other.is_loading);
        assert_eq!(
            result.effects[0],
            Effect::FetchPage {
                stream: Stream::SameType,
                visit: selection.visit,
                query: PageQuery {
                    filter: crate::pagination::TypeFilter::Matching(13),
                    limit: 4,
                    offset: 0,
                },
                initial: true,
            }
        );
    }

    #[test]
    fn test_missing_type_redirects_without_fetch() {
        let mut state = trainer_state();
        state.wizard.type_id = None;

        let result = reducer(&mut state, Action::StepEnter(Step::Selection));

        assert_eq!(state.step, Step::Details);
        assert!(state.selection.is_none());
        assert!(!result
            .effects
            .iter()
            .any(|effect| matches!(effect, Effect::FetchPage { .. })));
    }

    #[test]
    fn test_types_fetch_is_idempotent_while_loading() {
        let mut state = AppState::default();

        let first = reducer(&mut state, Action::TypesFetch);
        let second = reducer(&mut state, Action::TypesFetch);

        assert_eq!(first.effects, vec![Effect::LoadTypes]);
        assert!(!second.changed);
        assert!(second.effects.is_empty());
    }

    #[test]
    fn test_type_select_uses_loaded_ids() {
        let mut state = AppState {
            types: DataResource::Loaded(vec![
                PokemonType {
                    id: 1,
                    name: "normal".into(),
                },
                PokemonType {
                    id: 13,
                    name: "electric".into(),
                },
            ]),
            ..Default::default()
        };

        assert!(reducer(&mut state, Action::DetailsTypeSelect(1)).changed);
        assert_eq!(state.details.type_id, Some(13));
        assert!(!reducer(&mut state, Action::DetailsTypeSelect(5)).changed);
        assert_eq!(state.details.type_id, Some(13));
    }

    #[test]
    fn test_invalid_submit_keeps_details_step() {
        let mut state = AppState::default();
        reducer(&mut state, Action::StepEnter(Step::Details));
        state.details.player_name = "Ash".into();

        let result = reducer(&mut state, Action::DetailsSubmit);

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.step, Step::Details);
        assert_eq!(
            state.details.errors.team_name,
            Some(FieldError::TeamNameRequired)
        );
        assert_eq!(state.details.focus, DetailsField::TeamName);
        assert!(state.wizard.player_name.is_empty());
    }

    #[test]
    fn test_page_error_raises_notice_and_keeps_items() {
        let mut state = in_selection();
        let visit = state.selection.as_ref().unwrap().visit;
        reducer(
            &mut state,
            Action::PageDidLoad {
                stream: Stream::SameType,
                visit,
                items: (0..4).map(pokemon).collect(),
            },
        );
        reducer(&mut state, Action::PageLoadMore(Stream::SameType));

        let result = reducer(
            &mut state,
            Action::PageDidError {
                stream: Stream::SameType,
                visit,
                error: "boom".into(),
            },
        );

        assert!(result.changed);
        let cursor = &state.selection.as_ref().unwrap().same;
        assert_eq!(cursor.items.len(), 4);
        assert_eq!(cursor.offset, 4);
        assert!(!cursor.is_loading);
        assert!(state.notice.as_ref().unwrap().is_failure());
    }

    #[test]
    fn test_load_more_while_loading_is_ignored() {
        let mut state = in_selection();

        let result = reducer(&mut state, Action::PageLoadMore(Stream::OtherType));

        assert!(!result.changed);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_load_more_without_type_raises_notice() {
        let mut state = in_selection();
        state.wizard.type_id = None;

        let result = reducer(&mut state, Action::PageLoadMore(Stream::SameType));

        assert!(result.effects.is_empty());
        assert_eq!(state.notice, Some(Notice::missing_type()));
    }

    #[test]
    fn test_pick_beyond_team_size_is_refused() {
        let mut state = in_selection();
        for id in 0..MAX_TEAM_SIZE as u32 {
            reducer(&mut state, Action::TeamPick(pokemon(id)));
        }

        reducer(&mut state, Action::TeamPick(pokemon(99)));

        assert_eq!(state.wizard.selected.len(), MAX_TEAM_SIZE);
        assert!(!state.wizard.is_picked(99));
        assert_eq!(state.notice, Some(Notice::team_full()));
    }

    #[test]
    fn test_toggle_picks_and_removes_highlighted() {
        let mut state = in_selection();
        let visit = state.selection.as_ref().unwrap().visit;
        reducer(
            &mut state,
            Action::PageDidLoad {
                stream: Stream::SameType,
                visit,
                items: (0..4).map(pokemon).collect(),
            },
        );
        reducer(&mut state, Action::SelectionMove(2));

        reducer(&mut state, Action::TeamToggle);
        assert!(state.wizard.is_picked(2));

        reducer(&mut state, Action::TeamToggle);
        assert!(state.wizard.selected.is_empty());
    }

    #[test]
    fn test_next_with_full_team_starts_confirm() {
        let mut state = in_selection();
        for id in 0..MAX_TEAM_SIZE as u32 {
            reducer(&mut state, Action::TeamPick(pokemon(id)));
        }
        let visit = state.selection.as_ref().unwrap().visit;

        let result = reducer(&mut state, Action::SelectionNext);

        assert_eq!(
            result.effects,
            vec![Effect::ConfirmTeam {
                visit,
                delay_ms: 2000
            }]
        );
        assert!(state.selection.as_ref().unwrap().confirming);

        reducer(&mut state, Action::TeamRemove(0));
        assert_eq!(state.wizard.selected.len(), MAX_TEAM_SIZE);
    }

    #[test]
    fn test_prev_clears_team_and_releases_scope() {
        let mut state = in_selection();
        let visit = state.selection.as_ref().unwrap().visit;
        reducer(&mut state, Action::TeamPick(pokemon(1)));

        let result = reducer(&mut state, Action::SelectionPrev);

        assert_eq!(state.step, Step::Details);
        assert!(state.wizard.selected.is_empty());
        assert!(state.selection.is_none());
        assert!(result
            .effects
            .contains(&Effect::ReleaseSelectionScope { visit }));
        assert_eq!(state.details.player_name, "Ash");
        assert_eq!(state.details.type_id, Some(13));
    }

    #[test]
    fn test_notice_expires_after_ttl() {
        let mut state = AppState {
            notice: Some(Notice::api_failure()),
            ..Default::default()
        };
        state.notice.as_mut().unwrap().ttl_ticks = 2;

        assert!(reducer(&mut state, Action::Tick).changed);
        assert!(state.notice.is_some());
        assert!(reducer(&mut state, Action::Tick).changed);
        assert!(state.notice.is_none());
        assert!(!reducer(&mut state, Action::Tick).changed);
    }
}
