//! Root port failure and failover (end-to-end scenario 5): when a triangle's
//! root port goes down, the previously blocked port must take over and start
//! forwarding, with no gap where every port is blocked.

mod common;

use common::{new_bridge, Link, Network};
use stp_rs::{PortStpState, Role};

const BRIDGE_A: [u8; 6] = [0, 0, 0, 0, 0, 0x01]; // root
const BRIDGE_B: [u8; 6] = [0, 0, 0, 0, 0, 0x02];
const BRIDGE_C: [u8; 6] = [0, 0, 0, 0, 0, 0x03];

#[test]
fn alternate_port_takes_over_when_root_port_fails() {
    let a = new_bridge(2, BRIDGE_A);
    let b = new_bridge(2, BRIDGE_B);
    let c = new_bridge(2, BRIDGE_C);

    let mut net = Network::new(
        vec![a, b, c],
        vec![
            Link { bridge_a: 0, port_a: 0, bridge_b: 1, port_b: 0 },
            Link { bridge_a: 1, port_a: 1, bridge_b: 2, port_b: 1 },
            Link { bridge_a: 0, port_a: 1, bridge_b: 2, port_b: 0 },
        ],
    );
    net.enable_all_links();
    net.run(40);

    // Sanity: C's port1 (facing B) is blocked, as established by the
    // triangle convergence scenario, and C's root port is port0 (facing A).
    assert_eq!(net.bridges[2].port_role(0, 0), Role::Root);
    let blocked_role = net.bridges[2].port_role(1, 0);
    assert!(matches!(blocked_role, Role::Alternate | Role::Backup));

    // A's link to C drops: C loses its root port entirely.
    net.bridges[0].on_port_disabled(1, stp_rs::Timestamp::new(100));
    net.bridges[2].on_port_disabled(0, stp_rs::Timestamp::new(100));

    net.run(40);

    // C's surviving port (to B) must now be the new root port and must
    // reach forwarding; there is no steady state in which C ends up with
    // every port blocked while still attached to the network.
    assert_eq!(net.bridges[2].port_role(1, 0), Role::Root, "the alternate port must be promoted to root");
    assert_eq!(net.bridges[2].port_state(1, 0), PortStpState::Forwarding);

    // B's port facing C is still designated, now forwarding to C's new root.
    assert_eq!(net.bridges[1].port_role(1, 0), Role::Designated);
    assert_eq!(net.bridges[1].port_state(1, 0), PortStpState::Forwarding);
}
