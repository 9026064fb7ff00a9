//! Error types.
//!
//! Follows the split used by the teacher crate's
//! `datastructures::WireFormatError`: a plain enum with `Debug, Clone, Copy,
//! PartialEq, Eq`, and a `std`-gated `thiserror::Error` impl for `Display`
//! so the crate stays usable under `no_std`.

/// Reasons a received BPDU was rejected.
///
/// Per spec §7, a malformed BPDU is never surfaced across the public API —
/// [`crate::Bridge::on_bpdu_received`] discards it silently and increments a
/// per-port counter. This type exists so that discard path is testable in
/// isolation (see `bpdu::decode` unit tests) without threading it through
/// the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum BpduError {
    #[cfg_attr(feature = "std", error("BPDU shorter than its minimum encoded size"))]
    TooShort,
    #[cfg_attr(feature = "std", error("unrecognized protocol identifier"))]
    BadProtocolIdentifier,
    #[cfg_attr(feature = "std", error("unrecognized BPDU type/version combination"))]
    UnknownType,
    #[cfg_attr(feature = "std", error("MST BPDU length shorter than its declared v3 length"))]
    BadMstLength,
}

/// Reasons a host-requested configuration change was rejected.
///
/// Returned from the `Set*` setters in [`crate::Bridge`] so a host can
/// reject a bad administrative change before it is ever applied to engine
/// state, rather than the engine asserting on bad input the way it does for
/// true programming errors (spec §7, "Precondition violation by host").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum ConfigError {
    #[cfg_attr(feature = "std", error("bridge priority must be a multiple of 4096 in 0..=61440"))]
    BadBridgePriority,
    #[cfg_attr(feature = "std", error("port priority must be a multiple of 16 in 0..=240"))]
    BadPortPriority,
    #[cfg_attr(feature = "std", error("port index out of range"))]
    BadPortIndex,
    #[cfg_attr(feature = "std", error("MSTI index out of range"))]
    BadMstiIndex,
    #[cfg_attr(feature = "std", error("VLAN id out of range for this bridge's maxVlanCount"))]
    BadVlanId,
    #[cfg_attr(feature = "std", error("MST configuration name longer than 32 bytes"))]
    NameTooLong,
}
