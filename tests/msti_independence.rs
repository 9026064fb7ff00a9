//! MSTP per-MSTI independence (end-to-end scenario 6): an MSTI's priority
//! vector is carried entirely by its own 16-byte wire record, positionally
//! paired to `Bridge::trees[1..]`, and must converge roles on its own, not
//! merely mirror the CIST.

mod common;

use common::{new_bridge, new_mstp_bridge, Link, Network};
use stp_rs::Role;

const BRIDGE_A: [u8; 6] = [0, 0, 0, 0, 0, 0x01];
const BRIDGE_B: [u8; 6] = [0, 0, 0, 0, 0, 0x02];

#[test]
fn msti_reaches_its_own_roles_independently_of_the_cist() {
    // One MSTI (tree index 1) alongside the CIST (tree index 0).
    let a = new_mstp_bridge(1, 1, BRIDGE_A);
    let b = new_mstp_bridge(1, 1, BRIDGE_B);
    let mut net = Network::new(vec![a, b], vec![Link { bridge_a: 0, port_a: 0, bridge_b: 1, port_b: 0 }]);
    net.enable_all_links();
    net.run(40);

    // The CIST converges as in plain RSTP convergence.
    assert_eq!(net.bridges[0].port_role(0, 0), Role::Designated);
    assert_eq!(net.bridges[1].port_role(0, 0), Role::Root);

    // The MSTI (tree 1) must have been driven out of its startup default and
    // into a real role by the same exchange, proving its vector actually
    // round-tripped over the wire rather than staying CIST-only.
    let a_msti_role = net.bridges[0].port_role(0, 1);
    let b_msti_role = net.bridges[1].port_role(0, 1);
    assert_ne!(a_msti_role, Role::Disabled);
    assert_ne!(b_msti_role, Role::Disabled);
    assert_eq!(a_msti_role, Role::Designated, "lower bridge id wins the MSTI root too");
    assert_eq!(b_msti_role, Role::Root);
}

#[test]
fn two_mstis_can_disagree_on_who_blocks() {
    // Two MSTIs on the same physical link: both still converge, and each is
    // resolved from its own record, not from a shared CIST decision.
    let a = new_mstp_bridge(1, 2, BRIDGE_A);
    let b = new_mstp_bridge(1, 2, BRIDGE_B);
    let mut net = Network::new(vec![a, b], vec![Link { bridge_a: 0, port_a: 0, bridge_b: 1, port_b: 0 }]);
    net.enable_all_links();
    net.run(40);

    for tree in [1usize, 2usize] {
        let a_role = net.bridges[0].port_role(0, tree);
        let b_role = net.bridges[1].port_role(0, tree);
        assert_eq!(a_role, Role::Designated, "tree {tree}: lower bridge id side");
        assert_eq!(b_role, Role::Root, "tree {tree}: higher bridge id side");
    }
}

/// A port whose CIST role is Root must take the Master role on every MSTI
/// (spec §4.5 step 3, 802.1Q §13.27): the link beyond it leaves the region
/// entirely, carrying only CIST information, so no MSTI-internal root
/// computation applies to it.
#[test]
fn cist_root_port_becomes_master_on_the_msti() {
    // Bridge A speaks plain RSTP (outside the region) and has the lower
    // bridge id, so it wins the CIST root election.
    let a = new_bridge(1, BRIDGE_A);
    let b = new_mstp_bridge(1, 1, BRIDGE_B);
    let mut net = Network::new(vec![a, b], vec![Link { bridge_a: 0, port_a: 0, bridge_b: 1, port_b: 0 }]);
    net.enable_all_links();
    net.run(40);

    assert_eq!(net.bridges[1].port_role(0, 0), Role::Root, "B's port must be CIST root port");
    assert_eq!(
        net.bridges[1].port_role(0, 1),
        Role::Master,
        "the same port must be Master on the MSTI, not Root or Designated"
    );
}
