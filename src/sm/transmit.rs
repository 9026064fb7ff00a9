//! Port Transmit (spec §4.9): builds and hands off one outgoing BPDU per
//! port per opportunity, rate-limited by `txHoldCount` (802.1Q §13.25.14)
//! and the per-port `helloWhen` keepalive timer.
//!
//! Unlike the byte-level detail in [`crate::bpdu`], this machine only
//! decides *whether* and *what kind* of BPDU to send; [`crate::bpdu::Bpdu`]
//! does the actual encoding, the same split the teacher crate keeps between
//! its port state machine and `datastructures::messages`.

use crate::{
    bpdu::{
        Bpdu, BpduHeader, BpduType, ConfigBpdu, MstBpdu, MstiConfigMessage, RstBpdu, MAX_BPDU_LEN,
        ProtocolVersion as WireVersion,
    },
    config::ProtocolVersion,
    model::{Bridge, PortIndex},
    time::{Countdown, Timestamp},
    Callbacks,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Idle,
    Pending,
}

pub fn check_conditions<C: Callbacks>(bridge: &Bridge<C>, port: PortIndex) -> Option<State> {
    let p = bridge.port(port);
    if !p.port_enabled {
        return if p.transmit_state != State::Idle {
            Some(State::Idle)
        } else {
            None
        };
    }

    match p.transmit_state {
        State::Idle if should_transmit(bridge, port) => Some(State::Pending),
        State::Pending => Some(State::Idle),
        _ => None,
    }
}

fn should_transmit<C: Callbacks>(bridge: &Bridge<C>, port: PortIndex) -> bool {
    let p = bridge.port(port);
    let new_info = p.new_info || p.new_info_msti;
    let periodic = p.hello_when.get() == 0;
    (new_info && p.tx_count < bridge.config.tx_hold_count) || periodic
}

pub fn init_state<C: Callbacks>(bridge: &mut Bridge<C>, port: PortIndex, state: State, timestamp: Timestamp) {
    if state == State::Pending {
        transmit(bridge, port, timestamp);
    }
    bridge.port_mut(port).transmit_state = state;
}

fn transmit<C: Callbacks>(bridge: &mut Bridge<C>, port: PortIndex, timestamp: Timestamp) {
    let bpdu = build_bpdu(bridge, port);

    let mut scratch = [0u8; MAX_BPDU_LEN];
    let Ok(len) = bpdu.serialize(&mut scratch) else {
        return;
    };

    let Some(mut buffer) = bridge.callbacks.transmit_get_buffer(port, len, timestamp) else {
        // Leave `newInfo`/`newInfoMsti` set so the next tick retries (spec
        // §7: a `None` buffer must not be treated as a successful send).
        log::warn!("port {port}: no transmit buffer available, deferring BPDU");
        return;
    };
    buffer.bytes[..len].copy_from_slice(&scratch[..len]);
    buffer.len = len;
    bridge.callbacks.transmit_release_buffer(buffer);

    let hello_time = bridge.config.hello_time as u16;
    let p = bridge.port_mut(port);
    p.new_info = false;
    p.new_info_msti = false;
    p.tx_count = p.tx_count.saturating_add(1);
    p.hello_when = Countdown::new(hello_time);
}

fn build_bpdu<C: Callbacks>(bridge: &Bridge<C>, port: PortIndex) -> Bpdu {
    let p = bridge.port(port);
    let cist = p.tree(0);

    if !p.send_rstp {
        return Bpdu::Config(ConfigBpdu {
            header: BpduHeader {
                protocol_version: WireVersion::Stp,
                bpdu_type: BpduType::Config,
            },
            topology_change: cist.topology_change_state != crate::sm::topology_change::State::Inactive,
            topology_change_ack: cist.rcvd_tc_ack,
            vector: cist.port_priority,
            times: cist.port_times,
        });
    }

    let role_bits = cist.role;
    let common = RstBpdu {
        header: BpduHeader {
            protocol_version: WireVersion::Rstp,
            bpdu_type: BpduType::Config,
        },
        topology_change: cist.topology_change_state != crate::sm::topology_change::State::Inactive,
        topology_change_ack: cist.rcvd_tc_ack,
        proposal: cist.proposing,
        agreement: cist.agree,
        learning: cist.learning,
        forwarding: cist.forwarding,
        role: role_bits,
        vector: cist.port_priority,
        times: cist.port_times,
    };

    if bridge.config.protocol_version != ProtocolVersion::Mstp {
        return Bpdu::Rst(common);
    }

    let mut mstis = arrayvec::ArrayVec::new();
    for tree in 1..bridge.tree_count() {
        let pt = p.tree(tree);
        mstis.push(MstiConfigMessage {
            topology_change: pt.topology_change_state != crate::sm::topology_change::State::Inactive,
            proposal: pt.proposing,
            agreement: pt.agree,
            learning: pt.learning,
            forwarding: pt.forwarding,
            role: pt.role,
            regional_root_priority: pt.port_priority.regional_root.priority,
            regional_root_address: pt.port_priority.regional_root.address,
            internal_root_path_cost: pt.port_priority.internal_root_path_cost,
            bridge_priority: (bridge.config.bridge_priority >> 8) as u8,
            port_priority: pt.port_id.priority,
            remaining_hops: pt.port_times.remaining_hops,
        });
    }

    Bpdu::Mst(MstBpdu {
        header: BpduHeader {
            protocol_version: WireVersion::Mstp,
            bpdu_type: BpduType::Config,
        },
        topology_change: common.topology_change,
        topology_change_ack: common.topology_change_ack,
        proposal: common.proposal,
        agreement: common.agreement,
        learning: common.learning,
        forwarding: common.forwarding,
        role: role_bits,
        cist_vector: cist.port_priority,
        cist_times: cist.port_times,
        config_id: bridge.config.mst_config_id,
        mstis,
    })
}
