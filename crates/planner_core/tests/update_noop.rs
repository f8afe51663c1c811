use chrono::NaiveDate;
use planner_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());

    let (next, effects) = update(next, Msg::Tick);
    assert_eq!(state, next);
    assert!(effects.is_empty());
}
