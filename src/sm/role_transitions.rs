//! Port Role Transitions (spec §4.6): the per-role sub-machines that turn a
//! `selected_role` into `role`, drive the RSTP proposal/agreement handshake,
//! and ultimately set `forward`/`learn` for Port State Transition to act on.
//!
//! 802.1Q describes five separate sub-state-machines (one each for the
//! Disabled, Root, Designated, Alternate/Backup, and Master roles) that
//! share one mutual-exclusion rule: exactly one is active per port-tree,
//! selected by `role`. This module folds them into a single `State` enum
//! the same way [`super::port_information`] folds its ten states into one
//! enum — only the states reachable from the current `role` are ever
//! produced by [`check_conditions`]. The Master role (an MSTI boundary
//! port behaving like a root port towards the rest of the region) reuses
//! the Root sub-machine's states rather than duplicating them, since its
//! rapid-transition mechanics are identical; see `DESIGN.md`.

use crate::{
    model::{Bridge, PortIndex, Role, TreeIndex},
    time::Countdown,
    Callbacks,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Init,
    DisabledPort,
    RootProposed,
    RootAgreed,
    ReRoot,
    RootPort,
    ReRootPort,
    DesignatedPropose,
    DesignatedAgree,
    DesignatedSynced,
    DesignatedRetired,
    DesignatedPort,
    BlockPort,
    BackupPort,
}

fn is_root_like(role: Role) -> bool {
    matches!(role, Role::Root | Role::Master)
}

pub fn check_conditions<C: Callbacks>(
    bridge: &Bridge<C>,
    port: PortIndex,
    tree: TreeIndex,
) -> Option<State> {
    let pt = bridge.port(port).tree(tree);

    if pt.selected && pt.role != pt.selected_role {
        return Some(State::Init);
    }
    if !pt.selected {
        return None;
    }

    match pt.role {
        Role::Disabled | Role::Unknown => {
            if pt.role_trans_state != State::DisabledPort {
                Some(State::DisabledPort)
            } else {
                None
            }
        }
        role if is_root_like(role) => check_root_like(bridge, port, tree),
        Role::Designated => check_designated(pt),
        Role::Alternate | Role::Backup => check_alternate_backup(pt),
    }
}

fn check_root_like<C: Callbacks>(bridge: &Bridge<C>, port: PortIndex, tree: TreeIndex) -> Option<State> {
    use State::*;
    let pt = bridge.port(port).tree(tree);
    match pt.role_trans_state {
        Init | DisabledPort | DesignatedPropose | DesignatedAgree | DesignatedSynced
        | DesignatedRetired | DesignatedPort | BlockPort | BackupPort => Some(RootPort),
        RootPort => {
            if pt.re_root && !pt.forward {
                Some(ReRoot)
            } else if pt.proposed && !pt.agree {
                Some(RootProposed)
            } else if all_synced(bridge, port, tree) {
                Some(RootAgreed)
            } else if !pt.synced {
                Some(ReRootPort)
            } else if pt.fd_while.get() == 0 && !pt.forward {
                Some(ReRootPort)
            } else {
                None
            }
        }
        RootProposed | RootAgreed | ReRoot | ReRootPort => Some(RootPort),
    }
}

/// `allSynced` (spec §4.6): true once every other port-tree on this bridge
/// has finished synchronizing, letting a Root port complete the agreement
/// handshake as soon as the rest of the bridge has caught up rather than
/// waiting indefinitely on a round trip the peer may never complete (a
/// plain-STP peer, for instance, never sends an agreement bit at all).
fn all_synced<C: Callbacks>(bridge: &Bridge<C>, this_port: PortIndex, tree: TreeIndex) -> bool {
    (0..bridge.port_count()).all(|index| index == this_port || bridge.port(index).tree(tree).synced)
}

fn check_designated(pt: &crate::model::PortTree) -> Option<State> {
    use State::*;
    match pt.role_trans_state {
        Init | DisabledPort | RootProposed | RootAgreed | ReRoot | RootPort | ReRootPort
        | BlockPort | BackupPort => Some(DesignatedPort),
        DesignatedPort => {
            if !pt.proposing && !pt.agreed && !pt.synced {
                Some(DesignatedPropose)
            } else if pt.agree && !pt.agreed {
                Some(DesignatedAgree)
            } else if !pt.synced {
                Some(DesignatedSynced)
            } else if pt.disputed {
                Some(DesignatedRetired)
            } else {
                None
            }
        }
        DesignatedPropose | DesignatedAgree | DesignatedSynced | DesignatedRetired => {
            Some(DesignatedPort)
        }
    }
}

fn check_alternate_backup(pt: &crate::model::PortTree) -> Option<State> {
    use State::*;
    match pt.role_trans_state {
        Init | DisabledPort | RootProposed | RootAgreed | ReRoot | RootPort | ReRootPort
        | DesignatedPropose | DesignatedAgree | DesignatedSynced | DesignatedRetired
        | DesignatedPort => Some(BlockPort),
        BlockPort => {
            if !pt.forward && !pt.learn {
                Some(BackupPort)
            } else {
                None
            }
        }
        BackupPort => None,
    }
}

pub fn init_state<C: Callbacks>(bridge: &mut Bridge<C>, port: PortIndex, tree: TreeIndex, state: State) {
    let forward_delay = bridge.config.forward_delay as u16;
    let hello_time = bridge.config.hello_time as u16;
    let admin_edge = bridge.port(port).config.admin_edge;
    let pt = bridge.port_mut(port).tree_mut(tree);

    match state {
        State::Init => {
            pt.role = pt.selected_role;
            pt.proposed = false;
            pt.proposing = false;
            pt.agree = false;
            pt.agreed = false;
            pt.synced = pt.role == Role::Disabled;
            pt.sync = true;
            pt.forward = false;
            pt.learn = false;
        }
        State::DisabledPort => {
            pt.forward = false;
            pt.learn = false;
            pt.synced = true;
            pt.sync = false;
            pt.re_root = false;
        }
        State::RootPort => {
            pt.re_root = false;
        }
        State::RootProposed => {
            pt.proposed = false;
            pt.sync = true;
        }
        State::RootAgreed => {
            pt.proposed = false;
            pt.sync = false;
            pt.agree = true;
            pt.agreed = true;
            pt.synced = true;
        }
        State::ReRoot => {
            pt.re_root = true;
        }
        State::ReRootPort => {
            // Rapid transition blocked: fall back to the forward-delay timer
            // (spec §4.7, §4.10 interaction).
            if pt.fd_while.get() == 0 {
                pt.fd_while = Countdown::new(forward_delay);
            }
            pt.synced = pt.agreed || !pt.sync;
            pt.learn = pt.fd_while.get() == 0;
            pt.forward = pt.learn;
        }
        State::DesignatedPort => {}
        State::DesignatedPropose => {
            pt.proposing = true;
        }
        State::DesignatedAgree => {
            pt.proposed = false;
            pt.sync = false;
            pt.agreed = true;
            pt.synced = true;
        }
        State::DesignatedSynced => {
            pt.agree = pt.agree && pt.agreed;
            pt.synced = true;
            // Edge ports (spec §8 scenario 3) skip the forward-delay wait
            // entirely; operEdge auto-detection via `auto_edge` is not
            // modeled, only the admin-configured case.
            if admin_edge {
                pt.fd_while = Countdown::new(0);
            } else if pt.fd_while.get() == 0 {
                pt.fd_while = Countdown::new(forward_delay);
            }
            pt.learn = pt.fd_while.get() == 0;
            pt.forward = pt.learn;
        }
        State::DesignatedRetired => {
            pt.disputed = false;
        }
        State::BlockPort => {
            pt.learn = false;
            pt.forward = false;
        }
        State::BackupPort => {
            pt.rb_while = Countdown::new(2 * hello_time);
        }
    }

    bridge.port_mut(port).tree_mut(tree).role_trans_state = state;
}
