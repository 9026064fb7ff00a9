//! Shared test support: a recording `Callbacks` double and a small
//! point-to-point link simulator, used by every scenario test to drive
//! two or three independent [`stp_rs::Bridge`] instances against each
//! other the way a real link layer would.

use std::alloc::{alloc_zeroed, dealloc, Layout};

use stp_rs::{
    callbacks::{FlushType, TransmitBuffer},
    model::{PortIndex, Role, TreeIndex},
    time::Timestamp,
    Bridge, Callbacks, ProtocolVersion,
};

/// Records every callback invocation a test might want to assert on, and
/// answers the allocator/transmit-buffer callbacks with a real (if
/// trivial) host-side implementation so `Bridge::new` and Port Transmit
/// both work end to end.
pub struct RecordingCallbacks {
    pub transmitted: Vec<(PortIndex, Vec<u8>)>,
    pub learning: Vec<(PortIndex, TreeIndex, bool)>,
    pub forwarding: Vec<(PortIndex, TreeIndex, bool)>,
    pub role_changes: Vec<(PortIndex, TreeIndex, Role)>,
    pub topology_changes: Vec<TreeIndex>,
    pub notified_topology_changes: Vec<(PortIndex, TreeIndex)>,
    pub flushes: Vec<(PortIndex, TreeIndex, FlushType)>,

    pending_tx_port: Option<PortIndex>,
    alloc_layout: Option<Layout>,
}

impl RecordingCallbacks {
    pub fn new() -> Self {
        RecordingCallbacks {
            transmitted: Vec::new(),
            learning: Vec::new(),
            forwarding: Vec::new(),
            role_changes: Vec::new(),
            topology_changes: Vec::new(),
            notified_topology_changes: Vec::new(),
            flushes: Vec::new(),
            pending_tx_port: None,
            alloc_layout: None,
        }
    }

    /// Whether `(port, tree)` is currently forwarding, per the last
    /// `enable_forwarding` call recorded for it.
    pub fn is_forwarding(&self, port: PortIndex, tree: TreeIndex) -> bool {
        self.forwarding
            .iter()
            .rev()
            .find(|(p, t, _)| *p == port && *t == tree)
            .map(|(_, _, enabled)| *enabled)
            .unwrap_or(false)
    }

    pub fn is_learning(&self, port: PortIndex, tree: TreeIndex) -> bool {
        self.learning
            .iter()
            .rev()
            .find(|(p, t, _)| *p == port && *t == tree)
            .map(|(_, _, enabled)| *enabled)
            .unwrap_or(false)
    }
}

impl Default for RecordingCallbacks {
    fn default() -> Self {
        Self::new()
    }
}

impl Callbacks for RecordingCallbacks {
    fn enable_bpdu_trapping(&mut self, _enable: bool, _timestamp: Timestamp) {}

    fn enable_learning(&mut self, port: PortIndex, tree: TreeIndex, enable: bool, _timestamp: Timestamp) {
        self.learning.push((port, tree, enable));
    }

    fn enable_forwarding(&mut self, port: PortIndex, tree: TreeIndex, enable: bool, _timestamp: Timestamp) {
        self.forwarding.push((port, tree, enable));
    }

    fn transmit_get_buffer(
        &mut self,
        port: PortIndex,
        bpdu_size: usize,
        _timestamp: Timestamp,
    ) -> Option<TransmitBuffer> {
        self.pending_tx_port = Some(port);
        Some(TransmitBuffer {
            bytes: [0u8; stp_rs::bpdu::MAX_BPDU_LEN],
            len: bpdu_size,
        })
    }

    fn transmit_release_buffer(&mut self, buffer: TransmitBuffer) {
        let port = self
            .pending_tx_port
            .take()
            .expect("transmit_release_buffer without a matching transmit_get_buffer");
        self.transmitted.push((port, buffer.bytes[..buffer.len].to_vec()));
    }

    fn flush_fdb(&mut self, port: PortIndex, tree: TreeIndex, flush_type: FlushType) {
        self.flushes.push((port, tree, flush_type));
    }

    fn debug_str_out(&mut self, _port: Option<PortIndex>, _tree: Option<TreeIndex>, _message: &str, _flush: bool) {}

    fn on_topology_change(&mut self, tree: TreeIndex, _timestamp: Timestamp) {
        self.topology_changes.push(tree);
    }

    fn on_notified_topology_change(&mut self, port: PortIndex, tree: TreeIndex, _timestamp: Timestamp) {
        self.notified_topology_changes.push((port, tree));
    }

    fn on_port_role_changed(&mut self, port: PortIndex, tree: TreeIndex, new_role: Role, _timestamp: Timestamp) {
        self.role_changes.push((port, tree, new_role));
    }

    fn alloc_and_zero(&mut self, size: usize) -> Option<*mut u8> {
        let layout = Layout::array::<u8>(size).ok()?;
        let ptr = if layout.size() == 0 {
            layout.align() as *mut u8
        } else {
            unsafe { alloc_zeroed(layout) }
        };
        if ptr.is_null() {
            return None;
        }
        self.alloc_layout = Some(layout);
        Some(ptr)
    }

    unsafe fn free_memory(&mut self, ptr: *mut u8) {
        if let Some(layout) = self.alloc_layout.take() {
            if layout.size() != 0 {
                dealloc(ptr, layout);
            }
        }
    }
}

/// One simulated point-to-point link between two bridges in a [`Network`].
pub struct Link {
    pub bridge_a: usize,
    pub port_a: PortIndex,
    pub bridge_b: usize,
    pub port_b: PortIndex,
}

/// A handful of bridges wired together by [`Link`]s, driven one simulated
/// second at a time: every `tick` advances every bridge's clock, then
/// ferries whatever each bridge transmitted across to its link partner.
pub struct Network {
    pub bridges: Vec<Bridge<RecordingCallbacks>>,
    pub links: Vec<Link>,
    clock: u32,
}

impl Network {
    pub fn new(bridges: Vec<Bridge<RecordingCallbacks>>, links: Vec<Link>) -> Self {
        Network { bridges, links, clock: 0 }
    }

    fn peer_of(&self, bridge: usize, port: PortIndex) -> Option<(usize, PortIndex)> {
        self.links.iter().find_map(|link| {
            if link.bridge_a == bridge && link.port_a == port {
                Some((link.bridge_b, link.port_b))
            } else if link.bridge_b == bridge && link.port_b == port {
                Some((link.bridge_a, link.port_a))
            } else {
                None
            }
        })
    }

    /// Brings up every linked port on every bridge (100 Mb/s, point-to-point
    /// known from the simulated link), as if the host's link layer had just
    /// reported carrier.
    pub fn enable_all_links(&mut self) {
        self.clock += 1;
        let timestamp = Timestamp::new(self.clock);
        for i in 0..self.bridges.len() {
            let ports: Vec<PortIndex> = self.links.iter().flat_map(|link| {
                let mut p = Vec::new();
                if link.bridge_a == i {
                    p.push(link.port_a);
                }
                if link.bridge_b == i {
                    p.push(link.port_b);
                }
                p
            }).collect();
            for port in ports {
                self.bridges[i].on_port_enabled(port, 100, true, timestamp);
            }
        }
    }

    /// Advances the simulated clock by one second on every bridge, then
    /// delivers whatever each bridge transmitted this tick to its link
    /// partner. Call repeatedly until the property under test holds or a
    /// round budget is exhausted.
    pub fn tick(&mut self) {
        self.clock += 1;
        let timestamp = Timestamp::new(self.clock);

        for bridge in &mut self.bridges {
            bridge.on_one_second_tick(timestamp);
        }

        let mut deliveries: Vec<(usize, PortIndex, Vec<u8>)> = Vec::new();
        for i in 0..self.bridges.len() {
            let frames: Vec<(PortIndex, Vec<u8>)> = self.bridges[i].callbacks.transmitted.drain(..).collect();
            for (port, bytes) in frames {
                if let Some((peer_bridge, peer_port)) = self.peer_of(i, port) {
                    deliveries.push((peer_bridge, peer_port, bytes));
                }
            }
        }
        for (bridge, port, bytes) in deliveries {
            let _ = self.bridges[bridge].on_bpdu_received(port, &bytes, timestamp);
        }
    }

    pub fn run(&mut self, seconds: u32) {
        for _ in 0..seconds {
            self.tick();
        }
    }
}

/// Builds a bridge with `port_count` ports, no MSTIs, default RSTP
/// operation, and the given MAC address (used as the tie-breaker in bridge
/// id comparisons, so tests can control who wins root election).
pub fn new_bridge(port_count: usize, mac: [u8; 6]) -> Bridge<RecordingCallbacks> {
    Bridge::new(port_count, 0, 64, RecordingCallbacks::new(), mac, ProtocolVersion::Rstp)
        .expect("test allocator never fails")
}

/// Same as [`new_bridge`] but with `msti_count` MSTIs configured, forced to
/// speak MSTP.
pub fn new_mstp_bridge(port_count: usize, msti_count: usize, mac: [u8; 6]) -> Bridge<RecordingCallbacks> {
    Bridge::new(port_count, msti_count, 64, RecordingCallbacks::new(), mac, ProtocolVersion::Mstp)
        .expect("test allocator never fails")
}
