//! The eleven 802.1Q §13 state machines and the scheduler that drives them
//! to a fixed point (spec §4.1–§4.10).
//!
//! Each machine is a `State` enum plus a pair of free functions,
//! `check_conditions`/`init_state`, mirroring the `CheckConditions`/
//! `InitState` split the original implementation uses throughout
//! (`examples/original_source/mstp-lib/internal/stp_sm_port_protocol_migration.cpp`
//! is the clearest example): `check_conditions` is a pure predicate over the
//! current `Bridge`/`Port`/`PortTree` state that decides whether a
//! transition is due, `init_state` performs the entry actions of the state
//! being transitioned into and returns the new `State`. Neither function
//! owns a trait object or vtable — the scheduler in [`engine`] matches on
//! which machine it is currently scanning and calls the matching pair
//! directly, the same "no dynamic dispatch, plain tagged state" shape the
//! teacher crate uses for `statime::port::state::PortState`.

pub mod engine;
pub mod port_information;
pub mod port_receive;
pub mod port_timers;
pub mod protocol_migration;
pub mod role_selection;
pub mod role_transitions;
pub mod state_transition;
pub mod topology_change;
pub mod transmit;

pub use engine::{run_one_second_tick, run_state_machines};
