//! Queue policy, next instance admitted after the current one is Closed.

use modal_core::{AppearanceMode, LifecyclePolicy, LifecycleState};
use modal_harness::{DEBUG_KEY, DebugApp, DebugProps, StateRecorder, debug_manager};

fn policy() -> LifecyclePolicy {
    LifecyclePolicy::queue(AppearanceMode::AfterClose)
}

#[test]
fn second_waits_until_first_closed() {
    let manager = debug_manager(policy());
    let recorder = StateRecorder::attach(&manager.states());

    let a = manager.open_with(DEBUG_KEY, DebugProps::new("first")).unwrap();
    let b = manager.open_with(DEBUG_KEY, DebugProps::new("second")).unwrap();
    let state = |id| manager.get_instance_by_id(id).map(|i| i.lifecycle_state());

    assert_eq!(state(a), Some(LifecycleState::Opened));
    assert_eq!(state(b), Some(LifecycleState::Pending));
    assert_eq!(manager.current_states().len(), 1);

    manager.close(Some(a));
    assert_eq!(state(a), None);
    assert_eq!(state(b), Some(LifecycleState::Opened));
    assert_eq!(recorder.max_opened(), 1);
    assert_eq!(
        recorder.frames().last().cloned(),
        Some(vec![(b, LifecycleState::Opened)])
    );
}

#[test]
fn delayed_close_holds_queue() {
    let manager = debug_manager(policy());
    let a = manager.open_with(DEBUG_KEY, DebugProps::new("first")).unwrap();
    let b = manager.open_with(DEBUG_KEY, DebugProps::new("second")).unwrap();

    let first = manager.get_instance_by_id(a).unwrap();
    let token = first.add_close_delayer();
    manager.close(Some(a));
    assert_eq!(first.lifecycle_state(), LifecycleState::Closing);
    assert_eq!(
        manager.get_instance_by_id(b).unwrap().lifecycle_state(),
        LifecycleState::Pending
    );

    first.remove_close_delayer(token);
    assert_eq!(first.lifecycle_state(), LifecycleState::Closed);
    assert_eq!(
        manager.get_instance_by_id(b).unwrap().lifecycle_state(),
        LifecycleState::Opened
    );
}

#[test]
fn queue_drains_in_request_order() {
    let manager = debug_manager(policy());
    let ids: Vec<_> = (0..4)
        .map(|n| manager.open_with(DEBUG_KEY, DebugProps::new(format!("m{n}"))).unwrap())
        .collect();

    for expected in &ids {
        assert_eq!(manager.active_id(), Some(*expected));
        manager.close(None);
    }
    assert!(manager.is_empty());
    assert!(manager.current_states().is_empty());
}

#[test]
fn rendered_queue_scenario() {
    let app = DebugApp::new(policy());
    app.open(DebugProps::new("first-modal")).unwrap();
    app.open(DebugProps::new("second-modal")).unwrap();

    assert!(app.is_mounted("first-modal"));
    assert!(!app.is_mounted("second-modal"));

    assert!(app.click_close("first-modal"));
    assert!(!app.is_mounted("first-modal"));
    assert!(app.is_mounted("second-modal"));
}

#[test]
fn releasing_delayer_directly_advances_queue() {
    let manager = debug_manager(policy());
    let a = manager.open_with(DEBUG_KEY, DebugProps::new("first")).unwrap();
    let b = manager.open_with(DEBUG_KEY, DebugProps::new("second")).unwrap();

    let first = manager.get_instance_by_id(a).unwrap();
    let token = first.close_delayer().add();
    manager.close(Some(a));
    assert_eq!(first.lifecycle_state(), LifecycleState::Closing);

    assert!(first.close_delayer().remove(token));
    assert_eq!(first.lifecycle_state(), LifecycleState::Closed);
    assert_eq!(
        manager.get_instance_by_id(b).unwrap().lifecycle_state(),
        LifecycleState::Opened
    );
    assert_eq!(manager.current_states().len(), 1);
    assert_eq!(manager.active_id(), Some(b));
}

#[test]
fn arming_delayer_before_close_still_reaches_closed() {
    let manager = debug_manager(policy());
    let a = manager.open_with(DEBUG_KEY, DebugProps::new("first")).unwrap();
    let b = manager.open_with(DEBUG_KEY, DebugProps::new("second")).unwrap();

    let first = manager.get_instance_by_id(a).unwrap();
    first.close_delayer().arm();
    manager.close(Some(a));

    assert_eq!(first.lifecycle_state(), LifecycleState::Closed);
    assert!(manager.get_instance_by_id(a).is_none());
    assert_eq!(manager.active_id(), Some(b));
}
