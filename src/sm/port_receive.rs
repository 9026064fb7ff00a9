//! Port Receive (spec §4.2): decodes a staged BPDU into the per-tree
//! `rcvd_*` flags and message priority vectors Port Information and
//! Topology Change consume, then discards it.
//!
//! Grounded on the `DISCARD`/`RECEIVE` pair in
//! `examples/original_source/mstp-lib/internal/stp_sm_port_protocol_migration.cpp`'s
//! sibling `stp_sm_port_receive.cpp` structure: a port with nothing staged
//! sits in `Discard`, a staged frame flips it to `Receive` for exactly one
//! pass, and it falls back to `Discard` once consumed.

use crate::{
    bpdu::Bpdu,
    model::{Bridge, PortIndex, Role, TreeIndex},
    Callbacks,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Discard,
    Receive,
}

pub fn check_conditions<C: Callbacks>(bridge: &Bridge<C>, port: PortIndex) -> Option<State> {
    let p = bridge.port(port);
    if !p.port_enabled && p.rx_buffer.is_some() {
        return Some(State::Discard);
    }
    match p.receive_state {
        State::Discard if p.rx_buffer.is_some() => Some(State::Receive),
        State::Receive => Some(State::Discard),
        _ => None,
    }
}

pub fn init_state<C: Callbacks>(bridge: &mut Bridge<C>, port: PortIndex, state: State) {
    if state == State::Receive {
        receive(bridge, port);
    }
    bridge.port_mut(port).receive_state = state;
}

/// Decode the staged BPDU, if any, into the affected tree records.
fn receive<C: Callbacks>(bridge: &mut Bridge<C>, port: PortIndex) {
    let Some(staged) = bridge.port_mut(port).rx_buffer.take() else {
        return;
    };

    match &staged.bpdu {
        Bpdu::Tcn(_) => {
            bridge.port_mut(port).rcvd_stp = true;
            bridge.port_mut(port).tree_mut(0).rcvd_tcn = true;
        }
        Bpdu::Config(config) => {
            bridge.port_mut(port).rcvd_stp = true;
            apply_cist(bridge, port, 0, config.vector, config.times);
            let tree = bridge.port_mut(port).tree_mut(0);
            tree.rcvd_tc = config.topology_change;
            tree.rcvd_tc_ack = config.topology_change_ack;
        }
        Bpdu::Rst(rst) => {
            bridge.port_mut(port).rcvd_rstp = true;
            apply_cist(bridge, port, 0, rst.vector, rst.times);
            record_proposal(bridge, port, 0, rst.role, rst.proposal);
            record_agreement(bridge, port, 0, rst.agreement);
            let tree = bridge.port_mut(port).tree_mut(0);
            tree.rcvd_tc = rst.topology_change;
            tree.rcvd_tc_ack = rst.topology_change_ack;
        }
        Bpdu::Mst(mst) => {
            bridge.port_mut(port).rcvd_rstp = true;
            apply_cist(bridge, port, 0, mst.cist_vector, mst.cist_times);
            record_proposal(bridge, port, 0, mst.role, mst.proposal);
            record_agreement(bridge, port, 0, mst.agreement);
            {
                let tree = bridge.port_mut(port).tree_mut(0);
                tree.rcvd_tc = mst.topology_change;
                tree.rcvd_tc_ack = mst.topology_change_ack;
            }
            // The wire format doesn't carry an MSTID per MSTI record (it
            // relies on both ends sharing the same MST configuration, per
            // 802.1Q §14.6): the Nth record maps to the Nth configured MSTI,
            // i.e. `Bridge::trees[1..]` in ascending MSTID order, the order
            // `Bridge::new` builds them in.
            for (tree_index, msti) in (1..bridge.tree_count()).zip(mst.mstis.iter()) {
                let vector = msti.priority_vector(
                    mst.cist_vector.designated_bridge.address,
                    mst.cist_vector.designated_port.number,
                );
                let times = crate::vector::Times {
                    message_age: mst.cist_times.message_age,
                    max_age: mst.cist_times.max_age,
                    hello_time: mst.cist_times.hello_time,
                    forward_delay: mst.cist_times.forward_delay,
                    remaining_hops: msti.remaining_hops,
                };
                apply_cist(bridge, port, tree_index, vector, times);
                record_proposal(bridge, port, tree_index, msti.role, msti.proposal);
                record_agreement(bridge, port, tree_index, msti.agreement);
                let tree = bridge.port_mut(port).tree_mut(tree_index);
                tree.rcvd_tc = msti.topology_change;
            }
        }
    }
}

fn apply_cist<C: Callbacks>(
    bridge: &mut Bridge<C>,
    port: PortIndex,
    tree: TreeIndex,
    vector: crate::vector::PriorityVector,
    times: crate::vector::Times,
) {
    let pt = bridge.port_mut(port).tree_mut(tree);
    pt.msg_priority = vector;
    pt.msg_times = times;
    pt.rcvd_msg = true;
}

/// `recordProposal` (802.1Q §13.26): a proposal from a peer claiming to be
/// Designated latches `proposed`, which Role Transitions (§4.6) consumes to
/// force synchronization of this bridge's other ports before agreeing. Only
/// ever latches true here; every place that should clear it does so itself.
fn record_proposal<C: Callbacks>(
    bridge: &mut Bridge<C>,
    port: PortIndex,
    tree: TreeIndex,
    sender_role: Role,
    proposal: bool,
) {
    if bridge.port(port).send_rstp && sender_role == Role::Designated && proposal {
        bridge.port_mut(port).tree_mut(tree).proposed = true;
    }
}

/// `recordAgreement` (802.1Q §13.28): reflects the peer's agreement bit
/// straight into `agree`, which both Role Transitions (to drive
/// `DESIGNATED_AGREE`) and Port Transmit (to echo it onward) read. Only
/// meaningful on a point-to-point link running RSTP/MSTP; anywhere else the
/// peer can't safely rapid-transition, so agreement never latches.
fn record_agreement<C: Callbacks>(bridge: &mut Bridge<C>, port: PortIndex, tree: TreeIndex, agreement: bool) {
    let p = bridge.port(port);
    let agree = p.send_rstp && p.resolve_point_to_point() && agreement;
    bridge.port_mut(port).tree_mut(tree).agree = agree;
}
