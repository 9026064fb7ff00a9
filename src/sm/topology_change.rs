//! Topology Change (spec §4.8): detects, floods, and acknowledges topology
//! change notifications, driving [`crate::Callbacks::flush_fdb`] and the
//! topology-change flag carried in outgoing BPDUs.

use crate::{
    callbacks::FlushType,
    model::{Bridge, PortIndex, Role, TreeIndex},
    time::{Countdown, Timestamp},
    Callbacks,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Inactive,
    Learning,
    Detected,
    Active,
    NotifiedTcn,
    NotifiedTc,
    Propagating,
    Acknowledged,
}

pub fn check_conditions<C: Callbacks>(
    bridge: &Bridge<C>,
    port: PortIndex,
    tree: TreeIndex,
) -> Option<State> {
    let pt = bridge.port(port).tree(tree);

    match pt.topology_change_state {
        State::Inactive => {
            if pt.rcvd_tcn {
                Some(State::NotifiedTcn)
            } else if pt.rcvd_tc {
                Some(State::NotifiedTc)
            } else if pt.learning {
                Some(State::Learning)
            } else {
                None
            }
        }
        State::Learning => {
            if matches!(pt.role, Role::Root | Role::Designated | Role::Master) && pt.forwarding {
                Some(State::Detected)
            } else if !pt.learning {
                Some(State::Inactive)
            } else {
                None
            }
        }
        State::Detected => Some(State::Active),
        State::Active => {
            if pt.rcvd_tcn {
                Some(State::NotifiedTcn)
            } else if pt.rcvd_tc {
                Some(State::NotifiedTc)
            } else if !pt.forwarding {
                Some(State::Inactive)
            } else if pt.rcvd_tc_ack {
                Some(State::Acknowledged)
            } else if pt.tc_while.get() == 0 {
                Some(State::Inactive)
            } else {
                None
            }
        }
        State::NotifiedTcn | State::NotifiedTc => Some(State::Propagating),
        State::Propagating => Some(State::Active),
        State::Acknowledged => Some(State::Active),
    }
}

pub fn init_state<C: Callbacks>(
    bridge: &mut Bridge<C>,
    port: PortIndex,
    tree: TreeIndex,
    state: State,
    timestamp: Timestamp,
) {
    match state {
        State::Inactive => {
            let pt = bridge.port_mut(port).tree_mut(tree);
            pt.tc_while = Countdown::default();
            pt.rcvd_tc = false;
            pt.rcvd_tcn = false;
            pt.rcvd_tc_ack = false;
        }
        State::Learning => {}
        State::Detected => {
            log::debug!("port {port} tree {tree}: topology change detected");
            set_tc_while(bridge, port, tree);
            bridge.callbacks.flush_fdb(port, tree, FlushType::AllPorts);
            bridge.callbacks.on_topology_change(tree, timestamp);
            bridge.port_mut(port).new_info = true;
        }
        State::Active => {}
        State::NotifiedTcn => {
            set_tc_while(bridge, port, tree);
            bridge.port_mut(port).tree_mut(tree).rcvd_tcn = false;
        }
        State::NotifiedTc => {
            bridge.callbacks.on_notified_topology_change(port, tree, timestamp);
            bridge.port_mut(port).tree_mut(tree).rcvd_tc = false;
        }
        State::Propagating => {
            set_tc_while(bridge, port, tree);
            bridge.callbacks.flush_fdb(port, tree, FlushType::OnlyThisPort);
            let pt = bridge.port_mut(port).tree_mut(tree);
            pt.fdb_flush = false;
            bridge.port_mut(port).new_info = true;
        }
        State::Acknowledged => {
            bridge.port_mut(port).tree_mut(tree).rcvd_tc_ack = false;
        }
    }

    bridge.port_mut(port).tree_mut(tree).topology_change_state = state;
}

/// `tcWhile := HelloTime + 1` rounded up (802.1Q §13.30, simplified to whole
/// seconds since `Countdown` only ever ticks once per second).
fn set_tc_while<C: Callbacks>(bridge: &mut Bridge<C>, port: PortIndex, tree: TreeIndex) {
    let seconds = bridge.config.hello_time as u16 + 1;
    bridge.port_mut(port).tree_mut(tree).tc_while = Countdown::new(seconds);
}
