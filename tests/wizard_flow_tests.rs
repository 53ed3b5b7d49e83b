//! End-to-end wizard flows through the store
//!
//! Async completions are simulated by dispatching the `*Did*` actions the
//! effect handler would send.

use pretty_assertions::assert_eq;
use teambuilder::{
    action::Action,
    effect::Effect,
    pagination::{PageQuery, Stream, TypeFilter},
    reducer::reducer,
    state::{AppState, NamedRef, Notice, Pokemon, PokemonType, SpriteVariants},
    step::Step,
    wizard::MAX_TEAM_SIZE,
};
use tui_dispatch::testing::*;
use tui_dispatch::{DataResource, EffectStore};

fn pokemon(id: u32) -> Pokemon {
    Pokemon {
        id,
        name: format!("mon-{id}"),
        sprites: SpriteVariants::default(),
        types: vec![NamedRef {
            id: 13,
            name: "electric".into(),
        }],
        forms: Vec::new(),
        species: NamedRef {
            id,
            name: format!("mon-{id}"),
        },
        move_count: 42,
    }
}

fn page(ids: std::ops::Range<u32>) -> Vec<Pokemon> {
    ids.map(pokemon).collect()
}

fn electric_types() -> Vec<PokemonType> {
    vec![
        PokemonType {
            id: 1,
            name: "normal".into(),
        },
        PokemonType {
            id: 13,
            name: "electric".into(),
        },
    ]
}

/// Walk the details form the way a user would and land on the selection step.
fn submit_ash(store: &mut EffectStore<AppState, Action, Effect>) -> u64 {
    store.dispatch(Action::StepEnter(Step::Details));
    store.dispatch(Action::TypesDidLoad(electric_types()));
    store.dispatch(Action::DetailsPlayerNameChange("Ash".into()));
    store.dispatch(Action::DetailsTeamNameChange("Thunder".into()));
    store.dispatch(Action::DetailsTypeSelect(1));
    let result = store.dispatch(Action::DetailsSubmit);
    assert_eq!(result.effects.len(), 2, "both streams fetch on entry");
    store
        .state()
        .selection
        .as_ref()
        .map(|selection| selection.visit)
        .unwrap()
}

#[test]
fn test_full_team_reaches_overview() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let visit = submit_ash(&mut store);

    store.dispatch(Action::PageDidLoad {
        stream: Stream::SameType,
        visit,
        items: page(0..4),
    });
    store.dispatch(Action::PageDidLoad {
        stream: Stream::OtherType,
        visit,
        items: page(100..104),
    });
    for member in page(0..4).into_iter().chain(page(100..103)) {
        store.dispatch(Action::TeamPick(member));
    }
    assert_eq!(store.state().wizard.selected.len(), MAX_TEAM_SIZE);

    let result = store.dispatch(Action::SelectionNext);
    assert_eq!(
        result.effects,
        vec![Effect::ConfirmTeam {
            visit,
            delay_ms: 2000
        }]
    );
    assert_eq!(store.state().step, Step::Selection);

    let result = store.dispatch(Action::SelectionConfirmDidFinish { visit });
    assert_eq!(store.state().step, Step::Overview);
    assert!(result
        .effects
        .iter()
        .any(|effect| matches!(effect, Effect::RecordTeam(summary) if summary.members.len() == 7)));
    assert!(result
        .effects
        .contains(&Effect::ReleaseSelectionScope { visit }));
    assert_eq!(store.state().wizard.player_name, "Ash");
    assert_eq!(store.state().wizard.team_name, "Thunder");
    assert_eq!(store.state().wizard.type_id, Some(13));
}

#[test]
fn test_six_picks_stay_on_selection() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    submit_ash(&mut store);

    for id in 0..6 {
        store.dispatch(Action::TeamPick(pokemon(id)));
    }
    let result = store.dispatch(Action::SelectionNext);

    assert!(result.effects.is_empty());
    assert_eq!(store.state().step, Step::Selection);
    let notice = store.state().notice.clone().unwrap();
    assert_eq!(notice.title, "Uh oh! Please complete your team.");
    assert_eq!(
        notice.description,
        "You need to pick 7 pokémons in order to continue."
    );
}

#[test]
fn test_offset_tracks_non_empty_pages() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let visit = submit_ash(&mut store);

    store.dispatch(Action::PageDidLoad {
        stream: Stream::SameType,
        visit,
        items: page(0..4),
    });
    let result = store.dispatch(Action::PageLoadMore(Stream::SameType));
    assert_eq!(
        result.effects,
        vec![Effect::FetchPage {
            stream: Stream::SameType,
            visit,
            query: PageQuery {
                filter: TypeFilter::Matching(13),
                limit: 4,
                offset: 4,
            },
            initial: false,
        }]
    );
    store.dispatch(Action::PageDidLoad {
        stream: Stream::SameType,
        visit,
        items: page(4..8),
    });

    let cursor = &store.state().selection.as_ref().unwrap().same;
    assert_eq!(cursor.offset, 8);
    assert_eq!(cursor.items.len(), 8);
    assert!(!cursor.is_loading);

    // The other stream is untouched by the first one's progress
    let other = &store.state().selection.as_ref().unwrap().other;
    assert_eq!(other.offset, 0);
    assert!(other.is_loading);
}

#[test]
fn test_exhaustion_is_sticky() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let visit = submit_ash(&mut store);

    store.dispatch(Action::PageDidLoad {
        stream: Stream::OtherType,
        visit,
        items: Vec::new(),
    });
    let result = store.dispatch(Action::PageLoadMore(Stream::OtherType));

    assert!(result.effects.is_empty());
    let cursor = &store.state().selection.as_ref().unwrap().other;
    assert!(cursor.is_exhausted);
    assert_eq!(cursor.offset, 0);
}

#[test]
fn test_late_results_after_leaving_are_dropped() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let visit = submit_ash(&mut store);

    let result = store.dispatch(Action::SelectionPrev);
    assert!(result
        .effects
        .contains(&Effect::ReleaseSelectionScope { visit }));
    let before = store.state().clone();

    let result = store.dispatch(Action::PageDidLoad {
        stream: Stream::SameType,
        visit,
        items: page(0..4),
    });
    assert!(!result.changed);
    let result = store.dispatch(Action::PageDidError {
        stream: Stream::OtherType,
        visit,
        error: "timeout".into(),
    });
    assert!(!result.changed);
    assert!(store.state().notice.is_none());
    assert_eq!(store.state().step, before.step);
    assert!(store.state().selection.is_none());
}

#[test]
fn test_reentry_ignores_previous_visit() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let first = submit_ash(&mut store);

    store.dispatch(Action::SelectionPrev);
    store.dispatch(Action::DetailsSubmit);
    let second = store.state().selection.as_ref().unwrap().visit;
    assert_ne!(first, second);

    store.dispatch(Action::PageDidLoad {
        stream: Stream::SameType,
        visit: first,
        items: page(0..4),
    });
    assert!(store
        .state()
        .selection
        .as_ref()
        .unwrap()
        .same
        .items
        .is_empty());
}

#[test]
fn test_selection_without_type_redirects_without_fetch() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::TypesDidLoad(electric_types()));

    let result = store.dispatch(Action::StepEnter(Step::Selection));

    assert_eq!(store.state().step, Step::Details);
    assert!(result
        .effects
        .iter()
        .all(|effect| !matches!(effect, Effect::FetchPage { .. })));
}

#[test]
fn test_overview_needs_full_team() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    submit_ash(&mut store);
    store.dispatch(Action::TeamPick(pokemon(1)));

    store.dispatch(Action::StepEnter(Step::Overview));

    assert_eq!(store.state().step, Step::Details);
}

#[test]
fn test_types_flow_with_harness() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::TypesFetch);
    harness.assert_state(|s| s.types.is_loading());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadTypes));

    harness.complete_action(Action::TypesDidError("offline".into()));
    harness.process_emitted();
    harness.assert_state(|s| s.types.is_failed());
    harness.assert_state(|s| s.notice == Some(Notice::api_failure()));

    harness.dispatch_collect(Action::TypesFetch);
    harness.complete_action(Action::TypesDidLoad(electric_types()));
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (1, 1));
    harness.assert_state(|s| s.types.data().map(Vec::len) == Some(2));
}

#[test]
fn test_details_prefilled_on_return() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    submit_ash(&mut store);

    store.dispatch(Action::SelectionPrev);

    let details = &store.state().details;
    assert_eq!(details.player_name, "Ash");
    assert_eq!(details.team_name, "Thunder");
    assert_eq!(details.type_id, Some(13));
    assert_eq!(details.type_cursor, 1);
    assert!(matches!(store.state().types, DataResource::Loaded(_)));
}
