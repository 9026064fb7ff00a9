//! Port Protocol Migration (spec §4.3): decides whether a port sends
//! RSTP/MSTP or legacy STP BPDUs, based on what it has actually heard.
//!
//! Grounded directly on
//! `examples/original_source/mstp-lib/internal/stp_sm_port_protocol_migration.cpp`:
//! the same three states (`CHECKING_RSTP`/`SELECTING_STP`/`SENSING`), the
//! same `mcheck`/`mdelayWhile`/`sendRSTP` variables, and the same
//! `BEGIN`-takes-precedence-over-everything-else ordering in
//! `check_conditions`.

use crate::{
    model::{Bridge, PortIndex},
    time::Countdown,
    Callbacks,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    CheckingRstp,
    SelectingStp,
    Sensing,
}

/// `migrateTime` (spec §3 `BridgeConfig`), in one-second ticks.
fn migrate_time<C: Callbacks>(bridge: &Bridge<C>) -> u16 {
    bridge.config.migrate_time as u16
}

pub fn check_conditions<C: Callbacks>(bridge: &Bridge<C>, port: PortIndex) -> Option<State> {
    if bridge.begin {
        return Some(State::CheckingRstp);
    }

    let p = bridge.port(port);
    if !p.port_enabled {
        return Some(State::CheckingRstp);
    }

    match p.migration_state {
        State::CheckingRstp if !p.m_delay_while.is_active() => Some(State::Sensing),
        State::SelectingStp if !p.m_delay_while.is_active() => Some(State::Sensing),
        State::Sensing => {
            if p.mcheck {
                Some(State::CheckingRstp)
            } else if p.rcvd_stp && p.send_rstp {
                Some(State::SelectingStp)
            } else {
                None
            }
        }
        _ => None,
    }
}

pub fn init_state<C: Callbacks>(bridge: &mut Bridge<C>, port: PortIndex, state: State) {
    let migrate_time = migrate_time(bridge);
    let p = bridge.port_mut(port);
    match state {
        State::CheckingRstp => {
            p.send_rstp = true;
            p.m_delay_while = Countdown::new(migrate_time);
            p.rcvd_rstp = false;
            p.rcvd_stp = false;
            p.mcheck = false;
        }
        State::SelectingStp => {
            p.send_rstp = false;
            p.m_delay_while = Countdown::new(migrate_time);
            p.rcvd_stp = false;
        }
        State::Sensing => {
            p.rcvd_rstp = false;
            p.rcvd_stp = false;
        }
    }
    bridge.port_mut(port).migration_state = state;
}
