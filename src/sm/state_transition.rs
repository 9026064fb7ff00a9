//! Port State Transition (spec §4.7): the only machine that actually calls
//! [`crate::Callbacks::enable_learning`]/[`crate::Callbacks::enable_forwarding`].
//! The state lives directly on [`crate::model::PortTree::state`] rather than
//! a dedicated field, since it's exactly the three-valued forwarding state
//! spec §3 already names there.

use crate::{
    model::{Bridge, PortIndex, PortStpState, TreeIndex},
    time::Timestamp,
    Callbacks,
};

pub fn check_conditions<C: Callbacks>(
    bridge: &Bridge<C>,
    port: PortIndex,
    tree: TreeIndex,
) -> Option<PortStpState> {
    let pt = bridge.port(port).tree(tree);

    match pt.state {
        PortStpState::Discarding if !pt.learn && pt.learning => None,
        PortStpState::Discarding if pt.learn => Some(PortStpState::Learning),
        PortStpState::Learning if !pt.learn => Some(PortStpState::Discarding),
        PortStpState::Learning if pt.forward => Some(PortStpState::Forwarding),
        PortStpState::Forwarding if !pt.forward => Some(PortStpState::Discarding),
        _ => None,
    }
}

pub fn init_state<C: Callbacks>(
    bridge: &mut Bridge<C>,
    port: PortIndex,
    tree: TreeIndex,
    state: PortStpState,
    timestamp: Timestamp,
) {
    let previous = bridge.port(port).tree(tree).state;
    if previous != state {
        log::info!("new state for port {port} tree {tree}: {previous:?} -> {state:?}");
    }

    match state {
        PortStpState::Discarding => {
            bridge.callbacks.enable_forwarding(port, tree, false, timestamp);
            bridge.callbacks.enable_learning(port, tree, false, timestamp);
            let pt = bridge.port_mut(port).tree_mut(tree);
            pt.forwarding = false;
            pt.learning = false;
        }
        PortStpState::Learning => {
            bridge.callbacks.enable_learning(port, tree, true, timestamp);
            bridge.port_mut(port).tree_mut(tree).learning = true;
        }
        PortStpState::Forwarding => {
            bridge.callbacks.enable_forwarding(port, tree, true, timestamp);
            let pt = bridge.port_mut(port).tree_mut(tree);
            pt.forwarding = true;
        }
    }

    bridge.port_mut(port).tree_mut(tree).state = state;
}
