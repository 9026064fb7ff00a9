use alloc::vec::Vec;
use core::ptr::NonNull;

use super::{Port, PortIndex, TreeIndex};
use crate::{
    callbacks::Callbacks,
    config::{vlan_table_digest, BridgeConfig, ProtocolVersion},
    error::ConfigError,
    time::Timestamp,
};

/// Number of VLANs the 802.1Q VID space supports; the size of the
/// VID-to-MSTID table (spec §3).
pub const MAX_VLAN_COUNT: usize = 4096;

/// One per tree: the CIST (index 0) or an MSTI (spec §3 `Bridge.trees`).
/// Holds nothing but an identity — the actual per-port-per-tree state
/// lives in `Port::per_tree`, and the bridge-wide root vector for a tree is
/// derived on demand by `sm::role_selection` rather than cached here, so
/// there is no staleness to manage between the two.
#[derive(Debug, Clone, Copy)]
pub struct Tree {
    pub index: TreeIndex,
    /// 0 for the CIST; the MSTID (1..=4094) for an MSTI.
    pub mstid: u16,
}

/// The central bridge instance (spec §3 `Bridge`).
///
/// `C: Callbacks` is baked in at construction, matching
/// `CreateBridge(..., callbacks, ...)` in spec §6 — the host supplies one
/// callback table per bridge for its whole lifetime, not per call.
pub struct Bridge<C: Callbacks> {
    pub callbacks: C,
    pub address: [u8; 6],
    pub config: BridgeConfig,
    pub ports: Vec<Port>,
    pub trees: Vec<Tree>,
    pub external_port_path_cost: Vec<u32>,

    /// True only during the reset window right after construction, and
    /// during an explicit `EnableStp`/admin reset (spec §3, §4.1 "Global
    /// condition precedence"). Cleared by the scheduler after the first
    /// settled pass, never by an individual state machine (spec §9).
    pub begin: bool,

    /// Reentrancy guard for the host contract in spec §5: set for the
    /// duration of every public entry point, checked (debug builds only)
    /// at the top of each one.
    pub(crate) in_entry_point: bool,

    vlan_to_mstid: NonNull<u16>,
    max_vlan_count: usize,
}

impl<C: Callbacks> Bridge<C> {
    /// `CreateBridge` (spec §6). Returns `None` only on allocation failure
    /// (spec §7, "construction returns nil; no bridge is created").
    pub fn new(
        port_count: usize,
        msti_count: usize,
        max_vlan_count: usize,
        mut callbacks: C,
        mac_address: [u8; 6],
        force_version: ProtocolVersion,
    ) -> Option<Self> {
        let vlan_bytes = max_vlan_count.checked_mul(2)?;
        let raw = callbacks.alloc_and_zero(vlan_bytes)?;
        let vlan_to_mstid = NonNull::new(raw as *mut u16)?;

        let trees: Vec<Tree> = (0..=msti_count)
            .map(|index| Tree {
                index,
                mstid: if index == 0 { 0 } else { index as u16 },
            })
            .collect();

        let port_path_costs: Vec<u32> = alloc::vec![0; trees.len()];
        let ports: Vec<Port> = (0..port_count)
            .map(|index| Port::new(index, trees.len(), &port_path_costs))
            .collect();

        Some(Bridge {
            callbacks,
            address: mac_address,
            config: BridgeConfig::new(mac_address, force_version),
            external_port_path_cost: alloc::vec![0; port_count],
            ports,
            trees,
            begin: true,
            in_entry_point: false,
            vlan_to_mstid,
            max_vlan_count,
        })
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn port(&self, index: PortIndex) -> &Port {
        &self.ports[index]
    }

    pub fn port_mut(&mut self, index: PortIndex) -> &mut Port {
        &mut self.ports[index]
    }

    /// Raw view of the VID-to-MSTID table (spec §3). Safe because the
    /// slice's lifetime never outlives `self` and nothing else holds a
    /// pointer into the allocation.
    pub fn vlan_to_mstid(&self) -> &[u16] {
        unsafe { core::slice::from_raw_parts(self.vlan_to_mstid.as_ptr(), self.max_vlan_count) }
    }

    fn vlan_to_mstid_mut(&mut self) -> &mut [u16] {
        unsafe { core::slice::from_raw_parts_mut(self.vlan_to_mstid.as_ptr(), self.max_vlan_count) }
    }

    /// `SetVlanToMstid` (spec §6): remaps a VLAN to an MSTI and recomputes
    /// the MST configuration digest.
    pub fn set_vlan_to_mstid(&mut self, vlan_id: u16, mstid: u16) -> Result<(), ConfigError> {
        if vlan_id as usize >= self.max_vlan_count {
            return Err(ConfigError::BadVlanId);
        }
        self.vlan_to_mstid_mut()[vlan_id as usize] = mstid;

        let mut table = [0u16; MAX_VLAN_COUNT];
        let live = self.vlan_to_mstid();
        table[..live.len().min(MAX_VLAN_COUNT)].copy_from_slice(&live[..live.len().min(MAX_VLAN_COUNT)]);
        self.config.mst_config_id.digest = vlan_table_digest(&table);
        Ok(())
    }

    /// `SetBridgePriority` (spec §6).
    pub fn set_bridge_priority(&mut self, priority: u16) -> Result<(), ConfigError> {
        BridgeConfig::validate_priority(priority)?;
        self.config.bridge_priority = priority;
        for tree in 0..self.tree_count() {
            for port in &mut self.ports {
                port.tree_mut(tree).reselect = true;
            }
        }
        crate::sm::run_state_machines(self, Timestamp::default());
        Ok(())
    }
}

/// Host-facing entry points (spec §6). Every method here runs the engine to
/// quiescence before returning (spec §5) — none leave a half-applied
/// transition visible to the host.
impl<C: Callbacks> Bridge<C> {
    /// `OnPortEnabled` (spec §6): link came up. `speed_mbps` feeds the
    /// auto path cost table (802.1Q Table 13-3); `oper_point_to_point_mac`
    /// is the link layer's own point-to-point detection, consulted only
    /// when the port's `AdminPointToPointMAC` is `Auto`.
    pub fn on_port_enabled(
        &mut self,
        port: PortIndex,
        speed_mbps: u32,
        oper_point_to_point_mac: bool,
        timestamp: Timestamp,
    ) {
        {
            let p = self.port_mut(port);
            p.port_enabled = true;
            p.speed_mbps = speed_mbps;
            p.oper_point_to_point_mac = oper_point_to_point_mac;
        }
        for tree in 0..self.tree_count() {
            let cost = self.port(port).effective_path_cost(speed_mbps);
            let pt = self.port_mut(port).tree_mut(tree);
            pt.port_path_cost = cost;
            pt.reselect = true;
        }
        crate::sm::run_state_machines(self, timestamp);
    }

    /// `OnPortDisabled` (spec §6): link went down, or the host is shutting
    /// the port down administratively.
    pub fn on_port_disabled(&mut self, port: PortIndex, timestamp: Timestamp) {
        {
            let p = self.port_mut(port);
            p.port_enabled = false;
            p.rx_buffer = None;
        }
        for tree in 0..self.tree_count() {
            self.port_mut(port).tree_mut(tree).reselect = true;
        }
        crate::sm::run_state_machines(self, timestamp);
    }

    /// `OnBpduReceived` (spec §6). Decoding happens here so a malformed
    /// frame is rejected before it ever reaches [`crate::sm::port_receive`]
    /// (spec §7); a well-formed one is staged and consumed on this same
    /// call, "latest wins" if a previous one was staged but not yet
    /// processed (spec §9).
    pub fn on_bpdu_received(
        &mut self,
        port: PortIndex,
        bytes: &[u8],
        timestamp: Timestamp,
    ) -> Result<(), crate::error::BpduError> {
        let bpdu = crate::bpdu::Bpdu::deserialize(bytes)?;
        self.port_mut(port).rx_buffer = Some(crate::model::port::ReceivedBpdu {
            bpdu,
            len: bytes.len(),
        });
        crate::sm::run_state_machines(self, timestamp);
        Ok(())
    }

    /// `OnOneSecondTick` (spec §6): the host's one-second heartbeat.
    pub fn on_one_second_tick(&mut self, timestamp: Timestamp) {
        crate::sm::run_one_second_tick(self, timestamp);
    }

    /// `SetPortPriority` (spec §6).
    pub fn set_port_priority(&mut self, port: PortIndex, priority: u8) -> Result<(), ConfigError> {
        crate::config::PortConfig::validate_priority(priority)?;
        self.port_mut(port).config.port_priority = priority;
        for tree in 0..self.tree_count() {
            let pt = self.port_mut(port).tree_mut(tree);
            pt.port_id = crate::vector::PortId::new(priority, pt.port_id.number);
            pt.reselect = true;
        }
        crate::sm::run_state_machines(self, Timestamp::default());
        Ok(())
    }

    /// `SetPortAdminPathCost` (spec §6). `None` restores the automatic cost
    /// derived from link speed.
    pub fn set_port_admin_path_cost(&mut self, port: PortIndex, cost: Option<u32>) {
        self.port_mut(port).config.admin_path_cost = cost;
        let speed = self.port(port).speed_mbps;
        let effective = self.port(port).effective_path_cost(speed);
        for tree in 0..self.tree_count() {
            let pt = self.port_mut(port).tree_mut(tree);
            pt.port_path_cost = effective;
            pt.reselect = true;
        }
        crate::sm::run_state_machines(self, Timestamp::default());
    }

    /// `SetPortAdminEdge` (spec §6).
    pub fn set_port_admin_edge(&mut self, port: PortIndex, admin_edge: bool) {
        self.port_mut(port).config.admin_edge = admin_edge;
    }

    /// `SetPortAutoEdge` (spec §6).
    pub fn set_port_auto_edge(&mut self, port: PortIndex, auto_edge: bool) {
        self.port_mut(port).config.auto_edge = auto_edge;
    }

    /// `SetMstConfigName` (spec §6). Truncates/zero-pads to the wire's
    /// 32-byte field; longer names are rejected rather than silently cut
    /// (spec §7).
    pub fn set_mst_config_name(&mut self, name: &[u8]) -> Result<(), ConfigError> {
        if name.len() > 32 {
            return Err(ConfigError::NameTooLong);
        }
        let mut padded = [0u8; 32];
        padded[..name.len()].copy_from_slice(name);
        self.config.mst_config_id.name = padded;
        Ok(())
    }

    /// `SetMstConfigRevision` (spec §6).
    pub fn set_mst_config_revision(&mut self, revision: u16) {
        self.config.mst_config_id.revision = revision;
    }

    /// `SetForceProtocolVersion` (spec §6): restricts this bridge to
    /// speaking no better than the given protocol version, even toward
    /// peers that would support more.
    pub fn set_force_protocol_version(&mut self, version: ProtocolVersion, timestamp: Timestamp) {
        self.config.protocol_version = version;
        for port in &mut self.ports {
            port.send_rstp = version != ProtocolVersion::Stp;
        }
        crate::sm::run_state_machines(self, timestamp);
    }

    /// `Mcheck` (spec §6): forces one port back to sending RSTP/MSTP BPDUs,
    /// the host-triggered escape from Port Protocol Migration's STP
    /// fallback (spec §4.3).
    pub fn set_mcheck(&mut self, port: PortIndex, timestamp: Timestamp) {
        self.port_mut(port).mcheck = true;
        crate::sm::run_state_machines(self, timestamp);
    }

    /// `EnableStp`/`DisableStp` (spec §6) share one implementation: the
    /// `begin` reset window this bridge started in at construction (spec
    /// §3) is simply re-entered, same as the teacher crate's instances
    /// accepting a fresh `BEGIN` after any configuration discontinuity.
    pub fn enable_stp(&mut self, timestamp: Timestamp) {
        self.begin = true;
        crate::sm::run_state_machines(self, timestamp);
    }

    pub fn disable_stp(&mut self, timestamp: Timestamp) {
        for port in &mut self.ports {
            port.port_enabled = false;
        }
        self.begin = true;
        crate::sm::run_state_machines(self, timestamp);
    }

    /// `GetPortRole` (spec §6 reportable variables).
    pub fn port_role(&self, port: PortIndex, tree: TreeIndex) -> crate::model::Role {
        self.port(port).tree(tree).role
    }

    /// `GetPortState` (spec §6 reportable variables).
    pub fn port_state(&self, port: PortIndex, tree: TreeIndex) -> crate::model::PortStpState {
        self.port(port).tree(tree).state
    }
}

impl<C: Callbacks> Drop for Bridge<C> {
    fn drop(&mut self) {
        // Safety: `vlan_to_mstid` was returned by this same `callbacks`
        // instance's `alloc_and_zero` in `Bridge::new` and is freed exactly
        // once, here.
        unsafe {
            self.callbacks.free_memory(self.vlan_to_mstid.as_ptr() as *mut u8);
        }
    }
}
