//! Per-instance capability handed to rendered elements.

use std::cell::Cell;
use std::rc::Rc;

use modal_core::{AppearanceMode, LifecyclePolicy, LifecycleState, ModalError};
use modal_harness::{DEBUG_KEY, DebugProps, debug_manager};

#[test]
fn handle_reads_live_state() {
    let manager = debug_manager(LifecyclePolicy::Multiple);
    let id = manager.open_with(DEBUG_KEY, DebugProps::new("x")).unwrap();
    let handle = manager.handle(id).unwrap();

    assert_eq!(handle.id(), id);
    assert_eq!(handle.key().as_str(), DEBUG_KEY);
    assert_eq!(handle.props().identifier, "x");
    assert_eq!(handle.lifecycle_state(), LifecycleState::Opened);
    assert!(handle.is_active());
    assert!(!handle.is_closing());

    let _capture = handle.capture();
    handle.close_self().unwrap();
    assert!(handle.is_closing());
    assert_eq!(handle.lifecycle_state(), LifecycleState::Closing);
}

#[test]
fn capture_release_completes_close_once() {
    let manager = debug_manager(LifecyclePolicy::Multiple);
    let id = manager.open_with(DEBUG_KEY, DebugProps::new("x")).unwrap();
    let handle = manager.handle(id).unwrap();

    let mut first = handle.capture();
    let second = handle.capture();
    handle.close_self().unwrap();

    first.release();
    assert!(!first.is_held());
    first.release();
    assert_eq!(handle.lifecycle_state(), LifecycleState::Closing);

    drop(second);
    assert_eq!(handle.lifecycle_state(), LifecycleState::Closed);
    assert!(manager.handle(id).is_none());
}

#[test]
fn close_start_guard_fires_and_unregisters() {
    let manager = debug_manager(LifecyclePolicy::Multiple);
    let a = manager.open_with(DEBUG_KEY, DebugProps::new("a")).unwrap();
    let b = manager.open_with(DEBUG_KEY, DebugProps::new("b")).unwrap();

    let fired = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&fired);
    let guard = manager
        .handle(a)
        .unwrap()
        .on_close_start(move || counter.set(counter.get() + 1));
    manager.close(Some(a));
    assert_eq!(fired.get(), 1);
    drop(guard);

    let counter = Rc::clone(&fired);
    let guard = manager
        .handle(b)
        .unwrap()
        .on_close_start(move || counter.set(counter.get() + 10));
    drop(guard);
    manager.close(Some(b));
    assert_eq!(fired.get(), 1);
}

#[test]
fn close_start_listener_may_capture() {
    let manager = debug_manager(LifecyclePolicy::Multiple);
    let id = manager.open_with(DEBUG_KEY, DebugProps::new("anim")).unwrap();
    let handle = manager.handle(id).unwrap();

    let token = Rc::new(Cell::new(None));
    let slot = Rc::clone(&token);
    let inner = handle.clone();
    let _guard = handle.on_close_start(move || slot.set(Some(inner.add_close_delayer())));

    manager.close(None);
    assert_eq!(handle.lifecycle_state(), LifecycleState::Closing);

    handle.remove_close_delayer(token.get().unwrap());
    assert_eq!(handle.lifecycle_state(), LifecycleState::Closed);
}

#[test]
fn pending_handle_is_not_active() {
    let manager = debug_manager(LifecyclePolicy::queue(AppearanceMode::AfterClose));
    let a = manager.open_with(DEBUG_KEY, DebugProps::new("a")).unwrap();
    let b = manager.open_with(DEBUG_KEY, DebugProps::new("b")).unwrap();

    assert!(manager.handle(a).unwrap().is_active());
    let pending = manager.handle(b).unwrap();
    assert!(!pending.is_active());
    assert_eq!(pending.lifecycle_state(), LifecycleState::Pending);

    let visible = manager.visible_handles();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id(), a);
}

#[test]
fn detached_handle_reports_error() {
    let manager = debug_manager(LifecyclePolicy::Multiple);
    let id = manager.open_with(DEBUG_KEY, DebugProps::new("x")).unwrap();
    let handle = manager.handle(id).unwrap();
    drop(manager);

    assert_eq!(handle.close_self(), Err(ModalError::Detached { id }));
    assert!(!handle.is_active());
    assert_eq!(handle.lifecycle_state(), LifecycleState::Opened);
}
