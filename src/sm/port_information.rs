//! Port Information (spec §4.4): classifies a received message against the
//! stored port priority vector and drives `infoIs`/`updtInfo`/`reselect`.
//!
//! Grounded on the general shape every sibling machine in
//! `examples/original_source/mstp-lib/` shares (the
//! `CheckConditions`/`InitState` split already used by
//! [`super::protocol_migration`]) and on the priority-vector comparisons in
//! `crate::vector::PriorityVector`, itself grounded on the teacher crate's
//! `bmc::dataset_comparison::ComparisonDataset`.

use crate::{
    model::{Bridge, InfoIs, PortIndex, Role, TreeIndex},
    Callbacks,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Disabled,
    Aged,
    Update,
    Current,
    Receive,
    SuperiorDesignated,
    RepeatedDesignated,
    InferiorDesignated,
    NotDesignated,
    Other,
}

pub fn check_conditions<C: Callbacks>(
    bridge: &Bridge<C>,
    port: PortIndex,
    tree: TreeIndex,
) -> Option<State> {
    let p = bridge.port(port);
    let pt = p.tree(tree);

    if bridge.begin || !p.port_enabled {
        if pt.info_state != State::Disabled {
            return Some(State::Disabled);
        }
        return None;
    }

    match pt.info_state {
        State::Disabled if p.port_enabled => Some(State::Aged),
        State::Aged if pt.selected && pt.updt_info => Some(State::Update),
        State::Update => Some(State::Current),
        State::SuperiorDesignated | State::RepeatedDesignated | State::InferiorDesignated
        | State::NotDesignated | State::Other => Some(State::Current),
        State::Current => {
            if pt.selected && pt.updt_info {
                Some(State::Update)
            } else if pt.rcvd_msg && !pt.updt_info {
                Some(State::Receive)
            } else if !pt.rcvd_msg && pt.info_is == InfoIs::Received && pt.msg_times.message_age == 0
            {
                // message_age already saturated to maxAge by the timer
                // machine's expiry edge; treated here as `rcvdInfoWhile` == 0.
                Some(State::Aged)
            } else {
                None
            }
        }
        State::Receive => Some(classify_received(pt)),
    }
}

/// Classifies a just-received message against the stored port priority
/// vector (spec §4.4): same designated source and unchanged times is a
/// repeat; same source with different times, or a source this port doesn't
/// already recognize as designated that is nonetheless superior, is new
/// information; anything inferior to this port's own vector while this port
/// is Designated is rejected; an inferior message while this port is not
/// Designated leaves its role unaffected.
fn classify_received(pt: &crate::model::PortTree) -> State {
    let same_source = pt.msg_priority.same_designated(&pt.port_priority);
    if same_source && pt.msg_times.equals(&pt.port_times) {
        State::RepeatedDesignated
    } else if same_source || pt.msg_priority.is_superior_to(&pt.port_priority) {
        State::SuperiorDesignated
    } else if pt.role == Role::Designated {
        State::InferiorDesignated
    } else {
        State::NotDesignated
    }
}

pub fn init_state<C: Callbacks>(bridge: &mut Bridge<C>, port: PortIndex, tree: TreeIndex, state: State) {
    match state {
        State::Disabled => {
            let pt = bridge.port_mut(port).tree_mut(tree);
            pt.rcvd_msg = false;
            pt.proposing = false;
            pt.proposed = false;
            pt.agree = false;
            pt.agreed = false;
            pt.synced = false;
            pt.info_is = InfoIs::Disabled;
            pt.reselect = true;
            pt.selected = false;
        }
        State::Aged => {
            let pt = bridge.port_mut(port).tree_mut(tree);
            pt.info_is = InfoIs::Aged;
            pt.reselect = true;
            pt.selected = false;
        }
        State::Update => {
            let pt = bridge.port_mut(port).tree_mut(tree);
            pt.proposing = false;
            pt.proposed = false;
            pt.agreed = pt.agreed && same_designated_source(pt);
            pt.synced = pt.synced && pt.agreed;
            pt.info_is = InfoIs::Mine;
            pt.updt_info = false;
        }
        State::Current => {}
        State::Receive => {
            let updt_info = is_superior_or_repeated(bridge, port, tree);
            let pt = bridge.port_mut(port).tree_mut(tree);
            pt.rcvd_msg = false;
            pt.updt_info = updt_info;
        }
        State::SuperiorDesignated => {
            let pt = bridge.port_mut(port).tree_mut(tree);
            pt.agreed = false;
            pt.proposing = false;
            record_agreement_and_infer(pt);
            pt.port_priority = pt.msg_priority;
            pt.port_times = pt.msg_times;
            pt.updt_info = true;
            pt.info_is = InfoIs::Received;
        }
        State::RepeatedDesignated => {
            let pt = bridge.port_mut(port).tree_mut(tree);
            pt.port_priority = pt.msg_priority;
            pt.port_times = pt.msg_times;
            pt.updt_info = true;
            pt.info_is = InfoIs::Received;
        }
        State::InferiorDesignated => {
            let pt = bridge.port_mut(port).tree_mut(tree);
            if pt.role == Role::Designated {
                pt.updt_info = true;
            }
        }
        State::NotDesignated => {
            let pt = bridge.port_mut(port).tree_mut(tree);
            record_agreement_and_infer(pt);
        }
        State::Other => {}
    }
    bridge.port_mut(port).tree_mut(tree).info_state = state;
}

fn same_designated_source(pt: &crate::model::PortTree) -> bool {
    pt.port_priority.same_designated(&pt.msg_priority)
}

/// Whether the sender proposed or sent an agreement, as recorded against
/// `msg_priority`'s role carried implicitly by the decoded flags — Port
/// Receive already stages the decoded agreement/proposal flags onto
/// dedicated fields in the full 802.1Q text; here they are folded into
/// `agree`/`agreed` directly by Role Transitions once `port_priority` is
/// adopted (spec §4.6), so this machine only needs to clear stale agreement
/// state when superseded.
fn record_agreement_and_infer(pt: &mut crate::model::PortTree) {
    pt.agreed = pt.agreed && pt.agree;
}

fn is_superior_or_repeated<C: Callbacks>(bridge: &Bridge<C>, port: PortIndex, tree: TreeIndex) -> bool {
    let pt = bridge.port(port).tree(tree);
    pt.msg_priority.is_superior_or_equal_to(&pt.port_priority)
}
