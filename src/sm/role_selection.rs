//! Port Role Selection (spec §4.5): recomputes every port's role for one
//! tree from the priority vectors Port Information has collected.
//!
//! Unlike the other machines this isn't modeled as a tagged `State` —
//! 802.1Q's own text describes it as a single procedure (`updtRolesTree`)
//! gated by the `reselect`/`selected` flags already on [`crate::model::PortTree`]
//! rather than a state set of its own, so those flags serve as its state.
//! Grounded on the six-field comparison in `crate::vector::PriorityVector`,
//! itself modeled on the teacher crate's
//! `bmc::dataset_comparison::ComparisonDataset::compare`.

use crate::{
    model::{Bridge, InfoIs, PortIndex, Role, TreeIndex},
    time::Timestamp,
    vector::{BridgeId, PortId, PriorityVector},
    Callbacks,
};

pub fn any_reselect<C: Callbacks>(bridge: &Bridge<C>, tree: TreeIndex) -> bool {
    bridge.ports.iter().any(|p| p.tree(tree).reselect)
}

fn bridge_id<C: Callbacks>(bridge: &Bridge<C>, tree: TreeIndex) -> BridgeId {
    let mstid = bridge.trees[tree].mstid;
    BridgeId::new(bridge.config.bridge_priority | mstid, bridge.address)
}

/// This bridge's own candidate vector: what it would advertise if it turns
/// out to be the (regional) root for this tree.
fn own_candidate<C: Callbacks>(bridge: &Bridge<C>, tree: TreeIndex) -> PriorityVector {
    let id = bridge_id(bridge, tree);
    PriorityVector {
        root: id,
        external_root_path_cost: 0,
        regional_root: id,
        internal_root_path_cost: 0,
        designated_bridge: id,
        designated_port: PortId::new(0, 0),
    }
}

/// Adds one port's path cost to a received vector, as if it had just been
/// forwarded across that port (spec §4.5, "root path cost accumulation").
/// A CIST vector accumulates both the external and internal cost; an MSTI
/// vector, having no external root, only accumulates the internal one.
fn accumulate(mut vector: PriorityVector, path_cost: u32, is_msti: bool) -> PriorityVector {
    vector.internal_root_path_cost = vector.internal_root_path_cost.saturating_add(path_cost);
    if !is_msti {
        vector.external_root_path_cost = vector.external_root_path_cost.saturating_add(path_cost);
    }
    vector
}

/// Recomputes every port's role and stored priority vector/times for
/// `tree`, then clears `reselect` and sets `selected` on each one. Call only
/// when [`any_reselect`] is true for `tree` (spec §4.1, "a tree is settled
/// once no port-tree on it has `reselect` set").
pub fn update_roles_tree<C: Callbacks>(bridge: &mut Bridge<C>, tree: TreeIndex, timestamp: Timestamp) {
    let is_msti = tree != 0;
    let own_id = bridge_id(bridge, tree);
    let own_vector = own_candidate(bridge, tree);
    let own_times = bridge.config.root_times();

    let mut root_vector = own_vector;
    let mut root_times = own_times;
    let mut root_port: Option<PortIndex> = None;

    for index in 0..bridge.port_count() {
        let port = bridge.port(index);
        if !port.port_enabled {
            continue;
        }
        let pt = port.tree(tree);
        if pt.info_is != InfoIs::Received {
            continue;
        }
        let candidate = accumulate(pt.msg_priority, pt.port_path_cost, is_msti);
        if candidate.is_superior_to(&root_vector) {
            root_vector = candidate;
            root_times = pt.msg_times;
            root_port = Some(index);
        }
    }

    for index in 0..bridge.port_count() {
        let port = bridge.port(index);
        let enabled = port.port_enabled;
        let pt = port.tree(tree);

        let (role, vector, times) = if !enabled {
            (Role::Disabled, pt.port_priority, pt.port_times)
        } else if is_msti && bridge.port(index).tree(0).role == Role::Root {
            // 802.1Q §13.27: a Master Port is any port whose CIST role is
            // Root, for every spanning tree instance other than the CIST —
            // it's this region's single boundary towards the common root,
            // so no MSTI-internal root computation applies to it.
            (Role::Master, pt.msg_priority, pt.msg_times)
        } else if Some(index) == root_port {
            (Role::Root, root_vector, root_times)
        } else if pt.info_is != InfoIs::Received || root_vector.is_superior_to(&pt.msg_priority) {
            let vector = PriorityVector {
                root: root_vector.root,
                external_root_path_cost: root_vector.external_root_path_cost,
                regional_root: root_vector.regional_root,
                internal_root_path_cost: root_vector.internal_root_path_cost,
                designated_bridge: own_id,
                designated_port: pt.port_id,
            };
            (Role::Designated, vector, root_times)
        } else if pt.msg_priority.designates(&own_id) {
            (Role::Backup, pt.msg_priority, pt.msg_times)
        } else {
            (Role::Alternate, pt.msg_priority, pt.msg_times)
        };

        let changed = {
            let pt = bridge.port_mut(index).tree_mut(tree);
            let changed = pt.selected_role != role;
            if changed {
                log::info!("new role for port {index} tree {tree}: {:?} -> {:?}", pt.selected_role, role);
            }
            pt.selected_role = role;
            pt.port_priority = vector;
            pt.port_times = times;
            pt.selected = true;
            pt.reselect = false;
            changed
        };
        if changed {
            bridge.callbacks.on_port_role_changed(index, tree, role, timestamp);
        }
    }
}
