use alloc::vec::Vec;

use super::{PortIndex, PortTree, TreeIndex};
use crate::{
    bpdu::Bpdu,
    config::{AdminPointToPointMac, PortConfig},
    time::Countdown,
};

/// One per physical interface (spec §3 `Port`).
#[derive(Debug)]
pub struct Port {
    pub index: PortIndex,
    pub config: PortConfig,

    // Administrative / link state.
    pub port_enabled: bool,
    pub oper_point_to_point_mac: bool,
    pub speed_mbps: u32,

    // Port Protocol Migration variables (spec §4.3).
    pub mcheck: bool,
    pub send_rstp: bool,
    pub rcvd_stp: bool,
    pub rcvd_rstp: bool,
    pub m_delay_while: Countdown,

    // Topology Change variables that are per-port but tree-independent on
    // the wire side (spec §3 `Port`): `tcWhile`/`rcvdTc`/`tcAck` are
    // actually per-port-per-tree in the full 802.1Q state machine, but
    // `newInfo`/`newInfoMsti` and the edge-port timer are genuinely
    // per-port.
    pub new_info: bool,
    pub new_info_msti: bool,
    pub edge_delay_while: Countdown,

    // Port Transmit bookkeeping (spec §4.9).
    pub tx_count: u8,
    pub hello_when: Countdown,

    /// Latest-wins receive staging buffer (spec §4.2, §9 open question).
    pub rx_buffer: Option<ReceivedBpdu>,

    /// Current state of the per-port Port Receive machine (spec §4.2).
    pub receive_state: crate::sm::port_receive::State,
    /// Current state of the per-port Port Protocol Migration machine
    /// (spec §4.3).
    pub migration_state: crate::sm::protocol_migration::State,
    /// Current state of the per-port Port Transmit machine (spec §4.9).
    pub transmit_state: crate::sm::transmit::State,

    pub per_tree: Vec<PortTree>,
}

/// A BPDU staged for processing by Port Receive. Only one is ever held per
/// port: a second `on_bpdu_received` call before the scheduler drains the
/// first overwrites it (spec §9, "latest wins").
#[derive(Debug, Clone)]
pub struct ReceivedBpdu {
    pub bpdu: Bpdu,
    pub len: usize,
}

impl Port {
    pub fn new(index: PortIndex, tree_count: usize, port_path_costs: &[u32]) -> Self {
        let per_tree = (0..tree_count)
            .map(|tree| {
                let port_id = crate::vector::PortId::new(
                    PortConfig::default().port_priority,
                    (index + 1) as u16,
                );
                PortTree::new(port_id, port_path_costs[tree])
            })
            .collect();

        Port {
            index,
            config: PortConfig::default(),
            port_enabled: false,
            oper_point_to_point_mac: false,
            speed_mbps: 0,
            mcheck: false,
            send_rstp: true,
            rcvd_stp: false,
            rcvd_rstp: false,
            m_delay_while: Countdown::default(),
            new_info: false,
            new_info_msti: false,
            edge_delay_while: Countdown::default(),
            tx_count: 0,
            hello_when: Countdown::default(),
            rx_buffer: None,
            receive_state: crate::sm::port_receive::State::Discard,
            migration_state: crate::sm::protocol_migration::State::CheckingRstp,
            transmit_state: crate::sm::transmit::State::Idle,
            per_tree,
        }
    }

    pub fn tree(&self, tree: TreeIndex) -> &PortTree {
        &self.per_tree[tree]
    }

    pub fn tree_mut(&mut self, tree: TreeIndex) -> &mut PortTree {
        &mut self.per_tree[tree]
    }

    /// Whether the operational point-to-point status should be treated as
    /// true, resolving `AdminPointToPointMAC` per 802.1Q Table 13-6.
    pub fn resolve_point_to_point(&self) -> bool {
        match self.config.admin_point_to_point {
            AdminPointToPointMac::ForceTrue => true,
            AdminPointToPointMac::ForceFalse => false,
            AdminPointToPointMac::Auto => self.oper_point_to_point_mac,
        }
    }

    pub fn effective_path_cost(&self, speed_mbps: u32) -> u32 {
        self.config
            .admin_path_cost
            .unwrap_or_else(|| PortConfig::auto_path_cost(speed_mbps))
    }
}
