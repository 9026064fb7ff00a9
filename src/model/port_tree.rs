use super::{InfoIs, PortStpState, Role};
use crate::{
    time::Countdown,
    vector::{PortId, PriorityVector, Times},
};

/// One per (port, tree) pair: spec §3 `PortTree`.
///
/// All the flags the eleven state machines read and set live here rather
/// than on [`super::Port`] or [`super::Bridge`], since every one of them is
/// scoped to a single tree on a single port — this is the record the
/// engine's `(machine, port, tree)` scan indexes into for the
/// per-port-per-tree machines (spec §4.1).
#[derive(Debug, Clone)]
pub struct PortTree {
    pub role: Role,
    pub selected_role: Role,
    pub state: PortStpState,
    pub info_is: InfoIs,

    // RSTP proposal/agreement handshake (spec §4.6).
    pub proposed: bool,
    pub proposing: bool,
    pub agreed: bool,
    pub agree: bool,
    pub sync: bool,
    pub synced: bool,

    // Port State Transition drivers (spec §4.7).
    pub forward: bool,
    pub forwarding: bool,
    pub learn: bool,
    pub learning: bool,

    pub re_root: bool,
    pub reselect: bool,
    pub selected: bool,
    pub updt_info: bool,
    pub fdb_flush: bool,
    /// Set when a superior agreement was received on a port already
    /// agreed/synced without going through the normal proposal handshake —
    /// 802.1Q's loop-protection signal (spec §3).
    pub disputed: bool,

    pub fd_while: Countdown,
    pub rr_while: Countdown,
    pub rb_while: Countdown,
    pub tc_while: Countdown,

    /// This port's own priority vector for this tree — what it would
    /// advertise if Designated (spec §3 `the port's priority vector`).
    pub port_priority: PriorityVector,
    pub port_times: Times,

    /// The last received message priority vector stored for this
    /// port/tree, valid when `info_is == Received` (spec §3 invariant).
    pub msg_priority: PriorityVector,
    pub msg_times: Times,

    pub port_id: PortId,
    pub port_path_cost: u32,

    /// Set by Port Receive when a decoded message carries information for
    /// this tree; consumed and cleared by Port Information's `Receive`
    /// state (spec §4.2, §4.4).
    pub rcvd_msg: bool,
    /// Set by Port Receive when the decoded message's topology-change flag
    /// was set for this tree; consumed by Topology Change (spec §4.8).
    pub rcvd_tc: bool,
    /// Set by Port Receive on a TCN BPDU (CIST only); consumed by Topology
    /// Change (spec §4.8).
    pub rcvd_tcn: bool,
    /// Set by Port Receive when the decoded message's topology-change-ack
    /// flag was set; consumed by Topology Change (spec §4.8).
    pub rcvd_tc_ack: bool,

    /// Current state of this port-tree's Port Information machine (spec
    /// §4.4).
    pub info_state: crate::sm::port_information::State,
    /// Current state of this port-tree's Port Role Transitions machine
    /// (spec §4.6). Which variants are reachable depends on `selected_role`;
    /// switching roles reinitializes it through `Init`.
    pub role_trans_state: crate::sm::role_transitions::State,
    /// Current state of this port-tree's Topology Change machine (spec
    /// §4.8).
    pub topology_change_state: crate::sm::topology_change::State,
}

impl PortTree {
    pub fn new(port_id: PortId, port_path_cost: u32) -> Self {
        let zero_vector = PriorityVector {
            root: crate::vector::BridgeId::new(0, [0; 6]),
            external_root_path_cost: 0,
            regional_root: crate::vector::BridgeId::new(0, [0; 6]),
            internal_root_path_cost: 0,
            designated_bridge: crate::vector::BridgeId::new(0, [0; 6]),
            designated_port: PortId::new(0, 0),
        };
        let zero_times = Times {
            message_age: 0,
            max_age: 0,
            hello_time: 0,
            forward_delay: 0,
            remaining_hops: 0,
        };

        PortTree {
            role: Role::Disabled,
            selected_role: Role::Disabled,
            state: PortStpState::Discarding,
            info_is: InfoIs::Disabled,
            proposed: false,
            proposing: false,
            agreed: false,
            agree: false,
            sync: true,
            synced: false,
            forward: false,
            forwarding: false,
            learn: false,
            learning: false,
            re_root: false,
            reselect: true,
            selected: false,
            updt_info: false,
            fdb_flush: false,
            disputed: false,
            fd_while: Countdown::default(),
            rr_while: Countdown::default(),
            rb_while: Countdown::default(),
            tc_while: Countdown::default(),
            port_priority: zero_vector,
            port_times: zero_times,
            msg_priority: zero_vector,
            msg_times: zero_times,
            port_id,
            port_path_cost,
            rcvd_msg: false,
            rcvd_tc: false,
            rcvd_tcn: false,
            rcvd_tc_ack: false,
            info_state: crate::sm::port_information::State::Disabled,
            role_trans_state: crate::sm::role_transitions::State::Init,
            topology_change_state: crate::sm::topology_change::State::Inactive,
        }
    }

    /// Invariant from spec §3: `forwarding ⇒ learning`. Checked by the
    /// property tests in `tests/invariants.rs`, exposed here so those tests
    /// don't reimplement it.
    pub fn forwarding_implies_learning(&self) -> bool {
        !self.forwarding || self.learning
    }
}
