//! The scheduler (spec §4.1): repeatedly scans every `(machine, port,
//! tree)` tuple in a fixed order, applying whichever machine's
//! `check_conditions` fires, until a full pass produces no more
//! transitions — a "settled" bridge.
//!
//! Every public [`crate::Bridge`] entry point funnels into
//! [`run_state_machines`] exactly once, matching spec §5's concurrency
//! model: the host serializes all calls into the engine, and the engine
//! itself runs every machine to quiescence before returning control.

use super::{
    port_information, port_receive, port_timers, protocol_migration, role_selection,
    role_transitions, state_transition, topology_change, transmit,
};
use crate::{model::Bridge, time::Timestamp, Callbacks};

/// Ticks every timer by one second, then runs the machines to a fixed
/// point. The only entry point that also touches [`port_timers`] (spec
/// §4.10's periodic action lives outside the `check_conditions`/`init_state`
/// scan other machines use).
pub fn run_one_second_tick<C: Callbacks>(bridge: &mut Bridge<C>, timestamp: Timestamp) {
    port_timers::tick(bridge);
    run_state_machines(bridge, timestamp);
}

/// Runs every state machine to quiescence (spec §4.1).
///
/// `BEGIN` (`bridge.begin`) takes precedence over every other condition in
/// each machine's `check_conditions` (mirrored in each machine module by
/// checking it first); it is cleared here, once, after the first pass that
/// settles — not by any individual machine, so that every machine sees it
/// true for at least one full scan after bridge creation or an admin reset.
pub fn run_state_machines<C: Callbacks>(bridge: &mut Bridge<C>, timestamp: Timestamp) {
    debug_assert!(
        !bridge.in_entry_point,
        "a Callbacks method re-entered the engine (spec §5 precondition)"
    );
    bridge.in_entry_point = true;

    let mut passes = 0u32;
    loop {
        let mut changed = false;
        passes += 1;

        for port in 0..bridge.port_count() {
            if let Some(state) = port_receive::check_conditions(bridge, port) {
                port_receive::init_state(bridge, port, state);
                changed = true;
            }
            if let Some(state) = protocol_migration::check_conditions(bridge, port) {
                protocol_migration::init_state(bridge, port, state);
                changed = true;
            }
        }

        for tree in 0..bridge.tree_count() {
            if role_selection::any_reselect(bridge, tree) {
                role_selection::update_roles_tree(bridge, tree, timestamp);
                changed = true;
            }
        }

        for port in 0..bridge.port_count() {
            for tree in 0..bridge.tree_count() {
                if let Some(state) = port_information::check_conditions(bridge, port, tree) {
                    port_information::init_state(bridge, port, tree, state);
                    changed = true;
                }
                if let Some(state) = role_transitions::check_conditions(bridge, port, tree) {
                    role_transitions::init_state(bridge, port, tree, state);
                    changed = true;
                }
                if let Some(state) = state_transition::check_conditions(bridge, port, tree) {
                    state_transition::init_state(bridge, port, tree, state, timestamp);
                    changed = true;
                }
                if let Some(state) = topology_change::check_conditions(bridge, port, tree) {
                    topology_change::init_state(bridge, port, tree, state, timestamp);
                    changed = true;
                }
            }
        }

        for port in 0..bridge.port_count() {
            if let Some(state) = transmit::check_conditions(bridge, port) {
                transmit::init_state(bridge, port, state, timestamp);
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    log::trace!("state machines settled after {passes} pass(es)");
    bridge.begin = false;
    bridge.in_entry_point = false;
}
