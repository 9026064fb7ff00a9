use super::BpduHeader;
use crate::{
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

/// RST BPDU (RSTP, protocol version 2): 36 bytes on the wire — the 35
/// Configuration-shaped bytes plus the trailing "version 1 length" byte,
/// always 0, required so an STP-only bridge sees a Configuration BPDU of
/// the length it expects and keeps parsing past the part it understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RstBpdu {
    pub header: BpduHeader,
    pub topology_change: bool,
    pub topology_change_ack: bool,
    pub proposal: bool,
    pub agreement: bool,
    pub learning: bool,
    pub forwarding: bool,
    pub role: Role,
    pub vector: PriorityVector,
    pub times: Times,
}

impl RstBpdu {
    pub const WIRE_SIZE: usize = 36;

    pub fn priority_vector(&self) -> PriorityVector {
        self.vector
    }

    pub fn times(&self) -> Times {
        self.times
    }

    pub fn deserialize(header: BpduHeader, buffer: &[u8]) -> Result<Self, BpduError> {
        if buffer.len() < Self::WIRE_SIZE {
            return Err(BpduError::TooShort);
        }

        let flags = buffer[4];
        let role = super::rst_role_from_bits((flags & FLAG_ROLE_MASK) >> 2);

        let vector = PriorityVector {
            root: BridgeId::new(
                u16::from_be_bytes([buffer[5], buffer[6]]),
                buffer[7..13].try_into().unwrap(),
            ),
            external_root_path_cost: u32::from_be_bytes(buffer[13..17].try_into().unwrap()),
            regional_root: BridgeId::new(
                u16::from_be_bytes([buffer[5], buffer[6]]),
                buffer[7..13].try_into().unwrap(),
            ),
            internal_root_path_cost: 0,
            designated_bridge: BridgeId::new(
                u16::from_be_bytes([buffer[17], buffer[18]]),
                buffer[19..25].try_into().unwrap(),
            ),
            designated_port: PortId::from_u16(u16::from_be_bytes([buffer[25], buffer[26]])),
        };

        let times = Times {
            message_age: super::config_bpdu_ticks_to_seconds(u16::from_be_bytes([
                buffer[27], buffer[28],
            ])),
            max_age: super::config_bpdu_ticks_to_seconds(u16::from_be_bytes([
                buffer[29], buffer[30],
            ])),
            hello_time: super::config_bpdu_ticks_to_seconds(u16::from_be_bytes([
                buffer[31], buffer[32],
            ])),
            forward_delay: super::config_bpdu_ticks_to_seconds(u16::from_be_bytes([
                buffer[33], buffer[34],
            ])),
            remaining_hops: 0,
        };

        Ok(RstBpdu {
            header,
            topology_change: flags & FLAG_TOPOLOGY_CHANGE != 0,
            topology_change_ack: flags & FLAG_TOPOLOGY_CHANGE_ACK != 0,
            proposal: flags & FLAG_PROPOSAL != 0,
            agreement: flags & FLAG_AGREEMENT != 0,
            learning: flags & FLAG_LEARNING != 0,
            forwarding: flags & FLAG_FORWARDING != 0,
            role,
            vector,
            times,
        })
    }

    pub fn serialize(&self, buffer: &mut [u8]) -> Result<usize, BpduError> {
        if buffer.len() < Self::WIRE_SIZE {
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

        buffer[5..7].copy_from_slice(&self.vector.root.priority.to_be_bytes());
        buffer[7..13].copy_from_slice(&self.vector.root.address);
        buffer[13..17].copy_from_slice(&self.vector.external_root_path_cost.to_be_bytes());
        buffer[17..19].copy_from_slice(&self.vector.designated_bridge.priority.to_be_bytes());
        buffer[19..25].copy_from_slice(&self.vector.designated_bridge.address);
        buffer[25..27].copy_from_slice(&self.vector.designated_port.to_u16().to_be_bytes());
        buffer[27..29]
            .copy_from_slice(&super::config_bpdu_seconds_to_ticks(self.times.message_age).to_be_bytes());
        buffer[29..31]
            .copy_from_slice(&super::config_bpdu_seconds_to_ticks(self.times.max_age).to_be_bytes());
        buffer[31..33]
            .copy_from_slice(&super::config_bpdu_seconds_to_ticks(self.times.hello_time).to_be_bytes());
        buffer[33..35].copy_from_slice(
            &super::config_bpdu_seconds_to_ticks(self.times.forward_delay).to_be_bytes(),
        );
        buffer[35] = 0;

        Ok(Self::WIRE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bpdu::{BpduType, ProtocolVersion};

    fn sample() -> RstBpdu {
        RstBpdu {
            header: BpduHeader {
                protocol_version: ProtocolVersion::Rstp,
                bpdu_type: BpduType::Config,
            },
            topology_change: false,
            topology_change_ack: false,
            proposal: true,
            agreement: true,
            learning: true,
            forwarding: false,
            role: Role::Designated,
            vector: PriorityVector {
                root: BridgeId::new(0x8000, [1, 1, 1, 1, 1, 1]),
                external_root_path_cost: 0,
                regional_root: BridgeId::new(0x8000, [1, 1, 1, 1, 1, 1]),
                internal_root_path_cost: 0,
                designated_bridge: BridgeId::new(0x8000, [1, 1, 1, 1, 1, 1]),
                designated_port: PortId::new(0x80, 1),
            },
            times: Times {
                message_age: 0,
                max_age: 20,
                hello_time: 2,
                forward_delay: 15,
                remaining_hops: 0,
            },
        }
    }

    #[test]
    fn round_trips_role_and_flags() {
        let bpdu = sample();
        let mut buf = [0u8; RstBpdu::WIRE_SIZE];
        let len = bpdu.serialize(&mut buf).unwrap();
        assert_eq!(len, RstBpdu::WIRE_SIZE);
        assert_eq!(buf[35], 0, "version 1 length byte must be zero");
        let decoded = RstBpdu::deserialize(bpdu.header, &buf).unwrap();
        assert_eq!(decoded, bpdu);
    }

    #[test]
    fn all_roles_round_trip() {
        for role in [Role::Alternate, Role::Root, Role::Designated] {
            let mut bpdu = sample();
            bpdu.role = role;
            let mut buf = [0u8; RstBpdu::WIRE_SIZE];
            bpdu.serialize(&mut buf).unwrap();
            let decoded = RstBpdu::deserialize(bpdu.header, &buf).unwrap();
            assert_eq!(decoded.role, role);
        }
    }
}
