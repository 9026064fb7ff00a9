//! Cross-cutting invariants from spec §8, checked against converged
//! networks rather than any single state machine in isolation.

mod common;

use common::{new_bridge, Link, Network};
use stp_rs::bpdu::{Bpdu, BpduHeader, BpduType, ConfigBpdu, ProtocolVersion as WireVersion};
use stp_rs::vector::{BridgeId, PortId, PriorityVector, Times};
use stp_rs::Role;

fn triangle() -> Network {
    let a = new_bridge(2, [0, 0, 0, 0, 0, 0x01]);
    let b = new_bridge(2, [0, 0, 0, 0, 0, 0x02]);
    let c = new_bridge(2, [0, 0, 0, 0, 0, 0x03]);
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
    net
}

/// forwarding ⇒ learning, across every port and tree of a converged network.
#[test]
fn forwarding_implies_learning_holds_after_convergence() {
    let net = triangle();
    for bridge in &net.bridges {
        for port in 0..bridge.port_count() {
            for tree in 0..bridge.tree_count() {
                assert!(
                    bridge.port(port).tree(tree).forwarding_implies_learning(),
                    "port {port} tree {tree} is forwarding without learning"
                );
            }
        }
    }
}

/// Running the scheduler again on an already-settled network must not
/// change any port's role or state (spec §9, `RunStateMachines` is
/// idempotent at a fixed point).
#[test]
fn run_state_machines_is_idempotent_at_a_fixed_point() {
    let mut net = triangle();

    let snapshot = |net: &Network| -> Vec<(Role, stp_rs::PortStpState)> {
        net.bridges
            .iter()
            .flat_map(|b| (0..b.port_count()).map(move |p| (b.port_role(p, 0), b.port_state(p, 0))))
            .collect()
    };

    let before = snapshot(&net);
    net.run(10);
    let after = snapshot(&net);

    assert_eq!(before, after, "a settled network must not keep reassigning roles or states");
}

/// The same topology, built and converged twice independently, reaches the
/// same outcome (spec §9 determinism).
#[test]
fn convergence_is_deterministic_across_independent_runs() {
    let net1 = triangle();
    let net2 = triangle();

    for i in 0..net1.bridges.len() {
        for p in 0..net1.bridges[i].port_count() {
            assert_eq!(net1.bridges[i].port_role(p, 0), net2.bridges[i].port_role(p, 0));
            assert_eq!(net1.bridges[i].port_state(p, 0), net2.bridges[i].port_state(p, 0));
        }
    }
}

/// At most one bridge in a converged network is root: every other bridge
/// has at least one non-designated port pointing back toward it.
#[test]
fn at_most_one_root_bridge() {
    let net = triangle();

    let is_root_bridge = |idx: usize| -> bool {
        let bridge = &net.bridges[idx];
        (0..bridge.port_count()).all(|p| bridge.port_role(p, 0) == Role::Designated)
    };

    let root_count = (0..net.bridges.len()).filter(|&i| is_root_bridge(i)).count();
    assert_eq!(root_count, 1, "exactly one bridge must have every port designated");
}

/// Lexicographic priority-vector monotonicity: a vector is never superior
/// to itself, and superiority is a strict (irreflexive, antisymmetric)
/// order over the six-tuple (spec §4.12).
#[test]
fn priority_vector_ordering_is_a_strict_order() {
    let worse = PriorityVector {
        root: BridgeId::new(0x9000, [9, 9, 9, 9, 9, 9]),
        external_root_path_cost: 100,
        regional_root: BridgeId::new(0x9000, [9, 9, 9, 9, 9, 9]),
        internal_root_path_cost: 100,
        designated_bridge: BridgeId::new(0x9000, [9, 9, 9, 9, 9, 9]),
        designated_port: PortId::new(0x80, 2),
    };
    let better = PriorityVector {
        root: BridgeId::new(0x1000, [1, 1, 1, 1, 1, 1]),
        external_root_path_cost: 4,
        regional_root: BridgeId::new(0x1000, [1, 1, 1, 1, 1, 1]),
        internal_root_path_cost: 4,
        designated_bridge: BridgeId::new(0x1000, [1, 1, 1, 1, 1, 1]),
        designated_port: PortId::new(0x80, 1),
    };

    assert!(better.is_superior_to(&worse));
    assert!(!worse.is_superior_to(&better));
    assert!(!better.is_superior_to(&better), "a vector is never strictly superior to itself");
    assert!(better.is_superior_or_equal_to(&better));
}

/// Round-trip of a Configuration BPDU through the wire codec (the MST and
/// RST shapes each already have a dedicated round-trip test next to their
/// codecs).
#[test]
fn config_bpdu_round_trips_through_the_wire_codec() {
    let bpdu = Bpdu::Config(ConfigBpdu {
        header: BpduHeader { protocol_version: WireVersion::Stp, bpdu_type: BpduType::Config },
        topology_change: true,
        topology_change_ack: false,
        vector: PriorityVector {
            root: BridgeId::new(0x8000, [1, 2, 3, 4, 5, 6]),
            external_root_path_cost: 19,
            regional_root: BridgeId::new(0x8000, [1, 2, 3, 4, 5, 6]),
            internal_root_path_cost: 0,
            designated_bridge: BridgeId::new(0x8000, [7, 8, 9, 10, 11, 12]),
            designated_port: PortId::new(0x80, 3),
        },
        times: Times { message_age: 1, max_age: 20, hello_time: 2, forward_delay: 15, remaining_hops: 0 },
    });

    let mut buf = [0u8; 64];
    let len = bpdu.serialize(&mut buf).unwrap();
    let decoded = Bpdu::deserialize(&buf[..len]).unwrap();
    assert_eq!(decoded, bpdu);
}
