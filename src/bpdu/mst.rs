use super::{config_bpdu_seconds_to_ticks, config_bpdu_ticks_to_seconds, BpduHeader};
use crate::{
    config::MstConfigId,
    error::BpduError,
    model::Role,
    vector::{BridgeId, PortId, PriorityVector, Times},
};

const FLAG_TOPOLOGY_CHANGE: u8 = 1 << 0;
const FLAG_PROPOSAL: u8 = 1 << 1;
const FLAG_ROLE_MASK: u8 = 0b11 << 2;
const FLAG_LEARNING: u8 = 1 << 4;
const FLAG_FORWARDING: u8 = 1 << 5;
const FLAG_AGREEMENT: u8 = 1 << 6;
const FLAG_TOPOLOGY_CHANGE_ACK: u8 = 1 << 7;

/// Fixed portion of an MST BPDU before the per-MSTI records: the RST-shaped
/// common part (with the Root/Bridge Identifier fields reinterpreted per
/// 802.1Q §14.6 as the CIST *regional* root and internal path cost), the
/// MST Configuration Identifier, and the external CIST root/cost/remaining
/// hops. Exactly 102 bytes, matching spec §3's "MST (>=102 bytes)".
const FIXED_SIZE: usize = 102;

/// Maximum number of MSTI Configuration Messages a BPDU we construct may
/// carry. Bounds [`MAX_BPDU_LEN`](super::MAX_BPDU_LEN); the bridge's actual
/// MSTI count (spec §3, `CreateBridge(mstiCount, ...)`) is a runtime value
/// that may be smaller.
pub const MAX_MSTI_COUNT: usize = 64;

/// One 16-byte MSTI Configuration Message (802.1Q §14.7).
///
/// The MSTI regional root's address and the designated port number are not
/// repeated per-MSTI on the wire: every tree on a bridge shares the same
/// bridge address, and the designated port is the same physical port as
/// the CIST's, so only the 4-bit priority nibbles travel here. The full
/// [`PriorityVector`] is reassembled by [`MstiConfigMessage::priority_vector`]
/// given the sender's address (from the CIST designated bridge field) and
/// the CIST's designated port number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MstiConfigMessage {
    pub topology_change: bool,
    pub proposal: bool,
    pub agreement: bool,
    pub learning: bool,
    pub forwarding: bool,
    pub role: Role,
    pub regional_root_priority: u16,
    pub regional_root_address: [u8; 6],
    pub internal_root_path_cost: u32,
    pub bridge_priority: u8,
    pub port_priority: u8,
    pub remaining_hops: u8,
}

impl MstiConfigMessage {
    pub const WIRE_SIZE: usize = 16;

    pub fn priority_vector(
        &self,
        designated_bridge_address: [u8; 6],
        designated_port_number: u16,
    ) -> PriorityVector {
        PriorityVector {
            // MSTIs have no concept of an external root; the region-internal
            // comparison only ever looks at the last four fields (spec
            // §4.12), so root/external cost are held fixed at the regional
            // root's own identity and zero.
            root: BridgeId::new(self.regional_root_priority, self.regional_root_address),
            external_root_path_cost: 0,
            regional_root: BridgeId::new(self.regional_root_priority, self.regional_root_address),
            internal_root_path_cost: self.internal_root_path_cost,
            designated_bridge: BridgeId::new(
                ((self.bridge_priority as u16) << 8) | 0,
                designated_bridge_address,
            ),
            designated_port: PortId::new(self.port_priority, designated_port_number),
        }
    }

    fn deserialize(buffer: &[u8]) -> Self {
        let flags = buffer[0];
        let role = super::rst_role_from_bits((flags & FLAG_ROLE_MASK) >> 2);
        MstiConfigMessage {
            topology_change: flags & FLAG_TOPOLOGY_CHANGE != 0,
            proposal: flags & FLAG_PROPOSAL != 0,
            agreement: flags & FLAG_AGREEMENT != 0,
            learning: flags & FLAG_LEARNING != 0,
            forwarding: flags & FLAG_FORWARDING != 0,
            role,
            regional_root_priority: u16::from_be_bytes([buffer[1], buffer[2]]),
            regional_root_address: buffer[3..9].try_into().unwrap(),
            internal_root_path_cost: u32::from_be_bytes(buffer[9..13].try_into().unwrap()),
            bridge_priority: buffer[13],
            port_priority: buffer[14],
            remaining_hops: buffer[15],
        }
    }

    fn serialize(&self, buffer: &mut [u8]) {
        let mut flags = super::rst_role_to_bits(self.role) << 2;
        if self.topology_change {
            flags |= FLAG_TOPOLOGY_CHANGE;
        }
        if self.proposal {
            flags |= FLAG_PROPOSAL;
        }
        if self.agreement {
            flags |= FLAG_AGREEMENT;
        }
        if self.learning {
            flags |= FLAG_LEARNING;
        }
        if self.forwarding {
            flags |= FLAG_FORWARDING;
        }
        buffer[0] = flags;
        buffer[1..3].copy_from_slice(&self.regional_root_priority.to_be_bytes());
        buffer[3..9].copy_from_slice(&self.regional_root_address);
        buffer[9..13].copy_from_slice(&self.internal_root_path_cost.to_be_bytes());
        buffer[13] = self.bridge_priority;
        buffer[14] = self.port_priority;
        buffer[15] = self.remaining_hops;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MstBpdu {
    pub header: BpduHeader,
    pub topology_change: bool,
    pub topology_change_ack: bool,
    pub proposal: bool,
    pub agreement: bool,
    pub learning: bool,
    pub forwarding: bool,
    pub role: Role,
    /// CIST regional-internal vector: `root`/`external_root_path_cost` are
    /// populated from the trailing CIST Root Identifier/Root Path Cost
    /// fields so [`Bpdu::message_priority`] can hand back a full six-tuple.
    pub cist_vector: PriorityVector,
    pub cist_times: Times,
    pub config_id: MstConfigId,
    pub mstis: arrayvec::ArrayVec<MstiConfigMessage, MAX_MSTI_COUNT>,
}

impl MstBpdu {
    pub fn cist_priority_vector(&self) -> PriorityVector {
        self.cist_vector
    }

    pub fn times(&self) -> Times {
        self.cist_times
    }

    fn wire_size(&self) -> usize {
        FIXED_SIZE + self.mstis.len() * MstiConfigMessage::WIRE_SIZE
    }

    pub fn deserialize(header: BpduHeader, buffer: &[u8]) -> Result<Self, BpduError> {
        if buffer.len() < FIXED_SIZE {
            return Err(BpduError::BadMstLength);
        }

        let flags = buffer[4];
        let role = super::rst_role_from_bits((flags & FLAG_ROLE_MASK) >> 2);

        let regional_root = BridgeId::new(
            u16::from_be_bytes([buffer[5], buffer[6]]),
            buffer[7..13].try_into().unwrap(),
        );
        let internal_root_path_cost = u32::from_be_bytes(buffer[13..17].try_into().unwrap());
        let designated_bridge = BridgeId::new(
            u16::from_be_bytes([buffer[17], buffer[18]]),
            buffer[19..25].try_into().unwrap(),
        );
        let designated_port = PortId::from_u16(u16::from_be_bytes([buffer[25], buffer[26]]));

        let cist_times = Times {
            message_age: config_bpdu_ticks_to_seconds(u16::from_be_bytes([buffer[27], buffer[28]])),
            max_age: config_bpdu_ticks_to_seconds(u16::from_be_bytes([buffer[29], buffer[30]])),
            hello_time: config_bpdu_ticks_to_seconds(u16::from_be_bytes([buffer[31], buffer[32]])),
            forward_delay: config_bpdu_ticks_to_seconds(u16::from_be_bytes([buffer[33], buffer[34]])),
            remaining_hops: buffer[101],
        };

        // buffer[35] is the version 1 length (always 0), buffer[36..38] the
        // version 3 length; we don't validate it against the remaining
        // buffer length beyond checking FIXED_SIZE + N*16 fits.
        let version3_length = u16::from_be_bytes([buffer[36], buffer[37]]) as usize;

        let config_id = MstConfigId {
            name: buffer[39..71].try_into().unwrap(),
            revision: u16::from_be_bytes([buffer[71], buffer[72]]),
            digest: buffer[73..89].try_into().unwrap(),
        };

        let cist_root = BridgeId::new(
            u16::from_be_bytes([buffer[89], buffer[90]]),
            buffer[91..97].try_into().unwrap(),
        );
        let external_root_path_cost = u32::from_be_bytes(buffer[97..101].try_into().unwrap());

        let cist_vector = PriorityVector {
            root: cist_root,
            external_root_path_cost,
            regional_root,
            internal_root_path_cost,
            designated_bridge,
            designated_port,
        };

        // version3_length covers everything from byte 38 (config id start)
        // onward; the MSTI records begin at FIXED_SIZE.
        let msti_bytes_declared = version3_length.saturating_sub(FIXED_SIZE - 38);
        let msti_count_declared = msti_bytes_declared / MstiConfigMessage::WIRE_SIZE;

        let available = (buffer.len() - FIXED_SIZE) / MstiConfigMessage::WIRE_SIZE;
        let msti_count = msti_count_declared.min(available).min(MAX_MSTI_COUNT);

        let mut mstis = arrayvec::ArrayVec::new();
        for i in 0..msti_count {
            let start = FIXED_SIZE + i * MstiConfigMessage::WIRE_SIZE;
            let record = &buffer[start..start + MstiConfigMessage::WIRE_SIZE];
            mstis.push(MstiConfigMessage::deserialize(record));
        }

        Ok(MstBpdu {
            header,
            topology_change: flags & FLAG_TOPOLOGY_CHANGE != 0,
            topology_change_ack: flags & FLAG_TOPOLOGY_CHANGE_ACK != 0,
            proposal: flags & FLAG_PROPOSAL != 0,
            agreement: flags & FLAG_AGREEMENT != 0,
            learning: flags & FLAG_LEARNING != 0,
            forwarding: flags & FLAG_FORWARDING != 0,
            role,
            cist_vector,
            cist_times,
            config_id,
            mstis,
        })
    }

    pub fn serialize(&self, buffer: &mut [u8]) -> Result<usize, BpduError> {
        let size = self.wire_size();
        if buffer.len() < size {
            return Err(BpduError::TooShort);
        }

        self.header.serialize(buffer);

        let mut flags = super::rst_role_to_bits(self.role) << 2;
        if self.topology_change {
            flags |= FLAG_TOPOLOGY_CHANGE;
        }
        if self.topology_change_ack {
            flags |= FLAG_TOPOLOGY_CHANGE_ACK;
        }
        if self.proposal {
            flags |= FLAG_PROPOSAL;
        }
        if self.agreement {
            flags |= FLAG_AGREEMENT;
        }
        if self.learning {
            flags |= FLAG_LEARNING;
        }
        if self.forwarding {
            flags |= FLAG_FORWARDING;
        }
        buffer[4] = flags;

        buffer[5..7].copy_from_slice(&self.cist_vector.regional_root.priority.to_be_bytes());
        buffer[7..13].copy_from_slice(&self.cist_vector.regional_root.address);
        buffer[13..17].copy_from_slice(&self.cist_vector.internal_root_path_cost.to_be_bytes());
        buffer[17..19].copy_from_slice(&self.cist_vector.designated_bridge.priority.to_be_bytes());
        buffer[19..25].copy_from_slice(&self.cist_vector.designated_bridge.address);
        buffer[25..27].copy_from_slice(&self.cist_vector.designated_port.to_u16().to_be_bytes());
        buffer[27..29]
            .copy_from_slice(&config_bpdu_seconds_to_ticks(self.cist_times.message_age).to_be_bytes());
        buffer[29..31]
            .copy_from_slice(&config_bpdu_seconds_to_ticks(self.cist_times.max_age).to_be_bytes());
        buffer[31..33]
            .copy_from_slice(&config_bpdu_seconds_to_ticks(self.cist_times.hello_time).to_be_bytes());
        buffer[33..35].copy_from_slice(
            &config_bpdu_seconds_to_ticks(self.cist_times.forward_delay).to_be_bytes(),
        );
        buffer[35] = 0;

        let version3_length = (FIXED_SIZE - 38) + self.mstis.len() * MstiConfigMessage::WIRE_SIZE;
        buffer[36..38].copy_from_slice(&(version3_length as u16).to_be_bytes());

        buffer[38] = 0;
        buffer[39..71].copy_from_slice(&self.config_id.name);
        buffer[71..73].copy_from_slice(&self.config_id.revision.to_be_bytes());
        buffer[73..89].copy_from_slice(&self.config_id.digest);

        buffer[89..91].copy_from_slice(&self.cist_vector.root.priority.to_be_bytes());
        buffer[91..97].copy_from_slice(&self.cist_vector.root.address);
        buffer[97..101].copy_from_slice(&self.cist_vector.external_root_path_cost.to_be_bytes());
        buffer[101] = self.cist_times.remaining_hops;

        for (i, msti) in self.mstis.iter().enumerate() {
            let start = FIXED_SIZE + i * MstiConfigMessage::WIRE_SIZE;
            msti.serialize(&mut buffer[start..start + MstiConfigMessage::WIRE_SIZE]);
        }

        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bpdu::{BpduType, ProtocolVersion};

    fn sample() -> MstBpdu {
        let mut mstis = arrayvec::ArrayVec::new();
        mstis.push(MstiConfigMessage {
            topology_change: false,
            proposal: false,
            agreement: true,
            learning: true,
            forwarding: true,
            role: Role::Designated,
            regional_root_priority: 0x8001,
            regional_root_address: [9, 9, 9, 9, 9, 9],
            internal_root_path_cost: 4,
            bridge_priority: 0x80,
            port_priority: 0x80,
            remaining_hops: 19,
        });

        MstBpdu {
            header: BpduHeader {
                protocol_version: ProtocolVersion::Mstp,
                bpdu_type: BpduType::Config,
            },
            topology_change: false,
            topology_change_ack: false,
            proposal: true,
            agreement: true,
            learning: true,
            forwarding: true,
            role: Role::Designated,
            cist_vector: PriorityVector {
                root: BridgeId::new(0x8000, [1, 1, 1, 1, 1, 1]),
                external_root_path_cost: 0,
                regional_root: BridgeId::new(0x8000, [1, 1, 1, 1, 1, 1]),
                internal_root_path_cost: 0,
                designated_bridge: BridgeId::new(0x8000, [1, 1, 1, 1, 1, 1]),
                designated_port: PortId::new(0x80, 1),
            },
            cist_times: Times {
                message_age: 0,
                max_age: 20,
                hello_time: 2,
                forward_delay: 15,
                remaining_hops: 20,
            },
            config_id: MstConfigId {
                name: [0; 32],
                revision: 1,
                digest: [7; 16],
            },
            mstis,
        }
    }

    #[test]
    fn round_trips_with_one_msti() {
        let bpdu = sample();
        let mut buf = [0u8; super::FIXED_SIZE + MstiConfigMessage::WIRE_SIZE];
        let len = bpdu.serialize(&mut buf).unwrap();
        assert_eq!(len, buf.len());
        let decoded = MstBpdu::deserialize(bpdu.header, &buf).unwrap();
        assert_eq!(decoded, bpdu);
    }

    #[test]
    fn msti_vector_uses_shared_address_and_port() {
        let bpdu = sample();
        let shared_address = bpdu.cist_vector.designated_bridge.address;
        let shared_port = bpdu.cist_vector.designated_port.number;
        let vector = bpdu.mstis[0].priority_vector(shared_address, shared_port);
        assert_eq!(vector.designated_bridge.address, shared_address);
        assert_eq!(vector.designated_port.number, shared_port);
    }

    #[test]
    fn truncated_mst_falls_back_to_fewer_mstis() {
        let bpdu = sample();
        let mut buf = [0u8; super::FIXED_SIZE + MstiConfigMessage::WIRE_SIZE];
        bpdu.serialize(&mut buf).unwrap();
        let short = &buf[..super::FIXED_SIZE];
        let decoded = MstBpdu::deserialize(bpdu.header, short).unwrap();
        assert!(decoded.mstis.is_empty());
    }
}
