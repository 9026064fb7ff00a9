//! The bridge/port/tree data model (spec §3).
//!
//! Mirrors the split the teacher crate uses for its own instance-wide vs.
//! per-port state (`ptp_instance::PtpInstanceState` vs. `port::Port`): one
//! struct per spec entity, plain data plus the handful of small enums that
//! tag it, no behavior beyond simple accessors. The state machines in
//! `crate::sm` are the only code that mutates these structs.

mod bridge;
mod port;
mod port_tree;

pub use bridge::Bridge;
pub use port::Port;
pub use port_tree::PortTree;

/// Index of a port within [`Bridge::ports`]. A bare `usize` newtype rather
/// than a raw index so call sites read as intent, mirroring
/// `PortIdentity.port_number` in the teacher crate.
pub type PortIndex = usize;

/// Index of a tree within [`Bridge::trees`]: `0` is always the CIST, `1..=N`
/// are the configured MSTIs (spec §3, "1 + N for MSTP").
pub type TreeIndex = usize;

/// A port's role on a given tree (spec §3 `PortTree.role`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Disabled,
    Root,
    Designated,
    Alternate,
    Backup,
    Master,
    /// Not a real 802.1Q role: the zero value used by the BPDU codec's
    /// 2-bit role field when decoding a value with no assigned meaning.
    /// Never assigned to a [`PortTree::role`] by the engine itself.
    Unknown,
}

/// A port's forwarding state on a given tree (spec §3 `PortTree.state`,
/// §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortStpState {
    #[default]
    Discarding,
    Learning,
    Forwarding,
}

/// How a port-tree's stored priority vector relates to the most recent
/// information received or computed for it (spec §3 `PortTree.infoIs`,
/// §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfoIs {
    #[default]
    Disabled,
    /// This bridge originated the stored vector (it is the Designated
    /// bridge for this port/tree and the vector reflects that).
    Mine,
    /// The stored vector used to be `Received` but its originator's
    /// information has timed out (`messageAge` reached `maxAge`).
    Aged,
    /// The stored vector was received from a peer and is still current.
    Received,
}
