use analysis_core::{update, AppState, Msg};

#[test]
fn deactivating_an_inactive_view_is_noop() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::HealthViewDeactivated);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn clearing_with_nothing_to_clear_does_not_mark_dirty() {
    let (mut next, effects) = update(AppState::new(), Msg::ResultCleared);

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
