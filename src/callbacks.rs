//! The host-supplied callback table (spec §6).
//!
//! All twelve methods are required — unlike `crate::Clock`-style traits in
//! the teacher crate that provide default bodies for genuinely optional
//! behavior, every method here is load-bearing for a specific entry action
//! and has no sensible default, so none get one (spec §6, "all 12 must be
//! provided; none may be elided").
//!
//! Host callbacks invoked from inside a state machine's `InitState` MUST
//! NOT call back into the [`crate::Bridge`] that invoked them (spec §5).
//! In debug builds [`crate::sm::engine`] enforces this with a reentrancy
//! guard; in release builds violating it is undefined behavior, per spec §7
//! ("Precondition violation by host").

use crate::{
    bpdu::MAX_BPDU_LEN,
    model::{PortIndex, Role, TreeIndex},
    time::Timestamp,
};

/// A flush request's scope, passed to [`Callbacks::flush_fdb`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushType {
    /// Flush only entries learned on this port for this tree.
    OnlyThisPort,
    /// Flush every entry for this tree, on every port.
    AllPorts,
}

/// A host transmit buffer, handed to the engine for the duration of one
/// Port Transmit entry action (spec §5, "its lifetime extends only from
/// [`Callbacks::transmit_get_buffer`] to
/// [`Callbacks::transmit_release_buffer`]").
///
/// Owned rather than borrowed from `Callbacks`: a borrow tied to the
/// `&mut self` of `transmit_get_buffer` can't also be live across the
/// second `&mut self` call `transmit_release_buffer` needs, so the engine
/// takes the buffer by value instead. `len` is the size the host sized it
/// to when asked for at least `bpdu_size` bytes in
/// [`Callbacks::transmit_get_buffer`]; only `bytes[..len]` is meaningful.
#[derive(Debug, Clone)]
pub struct TransmitBuffer {
    pub bytes: [u8; MAX_BPDU_LEN],
    pub len: usize,
}

/// The twelve callbacks a host must provide to [`crate::Bridge::new`].
pub trait Callbacks {
    /// Request the link layer start or stop trapping inbound BPDUs to this
    /// engine (callback 1).
    fn enable_bpdu_trapping(&mut self, enable: bool, timestamp: Timestamp);

    /// Program the forwarding hardware's learning state for `(port, tree)`
    /// (callback 2). Invoked by Port State Transition (spec §4.7).
    fn enable_learning(&mut self, port: PortIndex, tree: TreeIndex, enable: bool, timestamp: Timestamp);

    /// Program the forwarding hardware's forwarding state for `(port,
    /// tree)` (callback 3).
    fn enable_forwarding(&mut self, port: PortIndex, tree: TreeIndex, enable: bool, timestamp: Timestamp);

    /// Borrow a transmit buffer of at least `bpdu_size` bytes for `port`, or
    /// `None` if none is currently available (callback 4). A `None` here
    /// causes Port Transmit to skip this cycle without resetting
    /// `helloWhen`, per spec §7.
    fn transmit_get_buffer(
        &mut self,
        port: PortIndex,
        bpdu_size: usize,
        timestamp: Timestamp,
    ) -> Option<TransmitBuffer>;

    /// Hand a populated transmit buffer back to the host for sending
    /// (callback 5).
    fn transmit_release_buffer(&mut self, buffer: TransmitBuffer);

    /// Request the forwarding database be flushed for `(port, tree)`
    /// (callback 6). Invoked by Topology Change (spec §4.8).
    fn flush_fdb(&mut self, port: PortIndex, tree: TreeIndex, flush_type: FlushType);

    /// Emit a debug trace line (callback 7). `flush` mirrors the original
    /// API's hint that the host may want to flush its log sink now (e.g.
    /// before a state transition that will itself be logged by the host).
    fn debug_str_out(&mut self, port: Option<PortIndex>, tree: Option<TreeIndex>, message: &str, flush: bool);

    /// A topology change was detected or propagated for `tree` (callback
    /// 8).
    fn on_topology_change(&mut self, tree: TreeIndex, timestamp: Timestamp);

    /// A topology change notification was received on `port` for `tree`
    /// (callback 9). Kept distinct from `on_topology_change` per the
    /// Design Notes (spec §9) rather than collapsed, since a host may
    /// reasonably want to log "who told us" separately from "what changed".
    fn on_notified_topology_change(&mut self, port: PortIndex, tree: TreeIndex, timestamp: Timestamp);

    /// `port`'s role on `tree` changed to `new_role` (callback 10).
    fn on_port_role_changed(&mut self, port: PortIndex, tree: TreeIndex, new_role: Role, timestamp: Timestamp);

    /// Allocate `size` bytes, zeroed (callback 11). Used exactly once, at
    /// [`crate::Bridge::new`], to size the VLAN-to-MSTID table (spec §3
    /// SPEC_FULL addition) — every other allocation happens once at
    /// construction through ordinary Rust collections sized from
    /// `port_count`/`msti_count` and never resized afterward (spec §9,
    /// "owned contiguous arenas sized at bridge creation").
    fn alloc_and_zero(&mut self, size: usize) -> Option<*mut u8>;

    /// Free a pointer previously returned by `alloc_and_zero` (callback
    /// 12). Called exactly once, when the owning [`crate::Bridge`] is
    /// dropped.
    ///
    /// # Safety
    /// `ptr` must be a pointer this same `Callbacks` instance's
    /// `alloc_and_zero` returned, not yet freed.
    unsafe fn free_memory(&mut self, ptr: *mut u8);
}
