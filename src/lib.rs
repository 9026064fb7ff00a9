//! An IEEE 802.1Q-2018 Spanning Tree Protocol engine: STP, RSTP and MSTP
//! all implemented as one set of per-port-per-tree state machines (802.1Q
//! §13), driven entirely by a host that owns the link layer, the forwarding
//! database, and the clock.
//!
//! This crate is `no_std` (it still needs `alloc`): it never touches a
//! socket, a thread, or a wall clock. A host constructs one [`Bridge`] per
//! bridge instance, supplying a [`Callbacks`] implementation and enough
//! memory for the port/tree/VLAN tables up front, then drives it entirely
//! through [`Bridge`]'s public methods — one call in, the engine runs every
//! affected state machine to a fixed point, one call returns. There is no
//! background task and no internal timer; [`Bridge::on_one_second_tick`]
//! must be called by the host once a second.
//!
//! Mirrors the shape of the teacher crate's own top level: a plain
//! `no_std`-with-`alloc` library, one umbrella `Bridge`/`Port`-style API
//! surface, and the protocol-specific pieces (here: [`bpdu`], [`vector`],
//! [`sm`]) kept as separate modules the top-level type composes rather than
//! inlines.

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(clippy::all)]

extern crate alloc;

pub mod bpdu;
pub mod callbacks;
pub mod config;
pub mod error;
pub mod model;
pub mod sm;
pub mod time;
pub mod vector;

pub use callbacks::Callbacks;
pub use config::{BridgeConfig, PortConfig, ProtocolVersion};
pub use error::{BpduError, ConfigError};
pub use model::{Bridge, InfoIs, Port, PortIndex, PortStpState, PortTree, Role, TreeIndex};
pub use time::{Countdown, Timestamp};
