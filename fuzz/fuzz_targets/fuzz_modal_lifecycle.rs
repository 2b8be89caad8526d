#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use modal_core::{
    AppearanceMode, DelayToken, LifecyclePolicy, LifecycleState, ModalId, ModalManager,
    ModalWindows, OpenOptions,
};

#[derive(Debug, Arbitrary)]
enum Policy {
    Multiple,
    AfterClose,
    DuringClose,
}

#[derive(Debug, Arbitrary)]
enum Op {
    Open(bool),
    Close(u8),
    CloseTop,
    Hold(u8),
    Release(u8),
    EndClose(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    policy: Policy,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let policy = match input.policy {
        Policy::Multiple => LifecyclePolicy::Multiple,
        Policy::AfterClose => LifecyclePolicy::queue(AppearanceMode::AfterClose),
        Policy::DuringClose => LifecyclePolicy::queue(AppearanceMode::DuringClose),
    };
    let windows = ModalWindows::builder().register("a", 1u8).register("b", 2u8).build();
    let manager: ModalManager<u8> = ModalManager::new(windows, policy);

    let mut ids: Vec<ModalId> = Vec::new();
    let mut held: BTreeMap<ModalId, Vec<DelayToken>> = BTreeMap::new();
    let mut seen: BTreeMap<ModalId, LifecycleState> = BTreeMap::new();
    let pick = |ids: &[ModalId], n: u8| (!ids.is_empty()).then(|| ids[n as usize % ids.len()]);

    for op in input.ops.into_iter().take(256) {
        match op {
            Op::Open(first) => {
                let key = if first { "a" } else { "b" };
                if let Ok(id) = manager.open(key, OpenOptions::new()) {
                    ids.push(id);
                }
            }
            Op::Close(n) => {
                if let Some(id) = pick(&ids, n) {
                    manager.close(Some(id));
                }
            }
            Op::CloseTop => manager.close(None),
            Op::Hold(n) => {
                if let Some(instance) = pick(&ids, n).and_then(|id| manager.get_instance_by_id(id)) {
                    held.entry(instance.id()).or_default().push(instance.add_close_delayer());
                }
            }
            Op::Release(n) => {
                if let Some(id) = pick(&ids, n) {
                    let token = held.get_mut(&id).and_then(Vec::pop);
                    if let (Some(token), Some(instance)) = (token, manager.get_instance_by_id(id)) {
                        instance.remove_close_delayer(token);
                    }
                }
            }
            Op::EndClose(n) => {
                // Force-finish a close in progress.
                if let Some(instance) = pick(&ids, n).and_then(|id| manager.get_instance_by_id(id)) {
                    if instance.lifecycle_state() == LifecycleState::Closing {
                        instance.end_close();
                    }
                }
            }
        }

        // Post-conditions that must always hold:
        let states = manager.current_states();
        for state in states.iter() {
            assert!(state.lifecycle_state.is_visible(), "invisible entry published");
            let live = manager
                .get_instance_by_id(state.id)
                .expect("published entry not tracked");
            assert!(live.lifecycle_state().is_visible(), "published entry no longer visible");
        }
        if policy.is_queue() {
            let opened = states
                .iter()
                .filter(|s| s.lifecycle_state == LifecycleState::Opened)
                .count();
            assert!(opened <= 1, "queue policy published {opened} opened entries");
        }
        for id in &ids {
            let now = manager
                .get_instance_by_id(*id)
                .map_or(LifecycleState::Closed, |i| i.lifecycle_state());
            if let Some(before) = seen.insert(*id, now) {
                assert!(now >= before, "state moved backwards: {before} -> {now}");
            }
        }
    }
});
