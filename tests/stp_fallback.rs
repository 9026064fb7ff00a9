//! STP fallback on a legacy BPDU (end-to-end scenario 4): a port speaking
//! RSTP must drop back to plain Configuration BPDUs the moment it hears a
//! legacy peer, per Port Protocol Migration (spec §4.3).

mod common;

use common::new_bridge;
use stp_rs::{
    bpdu::{Bpdu, BpduHeader, BpduType, ConfigBpdu, ProtocolVersion as WireVersion},
    vector::{BridgeId, PortId, PriorityVector, Times},
    Timestamp,
};

fn legacy_config_bpdu() -> Vec<u8> {
    let bpdu = Bpdu::Config(ConfigBpdu {
        header: BpduHeader { protocol_version: WireVersion::Stp, bpdu_type: BpduType::Config },
        topology_change: false,
        topology_change_ack: false,
        vector: PriorityVector {
            root: BridgeId::new(0x9000, [9, 9, 9, 9, 9, 9]),
            external_root_path_cost: 10,
            regional_root: BridgeId::new(0x9000, [9, 9, 9, 9, 9, 9]),
            internal_root_path_cost: 10,
            designated_bridge: BridgeId::new(0x9000, [9, 9, 9, 9, 9, 9]),
            designated_port: PortId::new(0x80, 1),
        },
        times: Times { message_age: 0, max_age: 20, hello_time: 2, forward_delay: 15, remaining_hops: 0 },
    });
    let mut buf = [0u8; 35];
    let len = bpdu.serialize(&mut buf).unwrap();
    buf[..len].to_vec()
}

#[test]
fn legacy_bpdu_forces_stp_fallback() {
    let mut bridge = new_bridge(1, [0, 0, 0, 0, 0, 0x20]);
    bridge.on_port_enabled(0, 100, true, Timestamp::new(1));

    // Freshly enabled and never having heard a legacy peer, the port sends
    // RSTP.
    assert!(bridge.port(0).send_rstp);

    let frame = legacy_config_bpdu();
    bridge.on_bpdu_received(0, &frame, Timestamp::new(2)).unwrap();

    assert!(!bridge.port(0).send_rstp, "hearing a legacy Config BPDU must flip send_rstp off");

    // The next BPDU this port actually transmits must be a plain
    // Configuration BPDU, not RST/MST.
    bridge.callbacks.transmitted.clear();
    for s in 0..3 {
        bridge.on_one_second_tick(Timestamp::new(3 + s));
        if let Some((_, bytes)) = bridge.callbacks.transmitted.first() {
            let decoded = Bpdu::deserialize(bytes).expect("engine never emits malformed BPDUs");
            assert!(decoded.is_stp(), "expected a legacy-shaped BPDU after fallback, got {decoded:?}");
            return;
        }
    }
    panic!("port never retransmitted after falling back to STP");
}
