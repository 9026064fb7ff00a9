use super::BpduHeader;
use crate::{
    error::BpduError,
    vector::{BridgeId, PortId, PriorityVector, Times},
};

const FLAG_TOPOLOGY_CHANGE: u8 = 1 << 0;
const FLAG_TOPOLOGY_CHANGE_ACK: u8 = 1 << 7;

/// Configuration BPDU (STP, protocol version 0): 35 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigBpdu {
    pub header: BpduHeader,
    pub topology_change: bool,
    pub topology_change_ack: bool,
    pub vector: PriorityVector,
    pub times: Times,
}

impl ConfigBpdu {
    pub const WIRE_SIZE: usize = 35;

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
        let vector = PriorityVector {
            root: BridgeId::new(
                u16::from_be_bytes([buffer[5], buffer[6]]),
                buffer[7..13].try_into().unwrap(),
            ),
            external_root_path_cost: u32::from_be_bytes(buffer[13..17].try_into().unwrap()),
            // STP has no region concept: regional root/internal cost mirror
            // the external ones so PriorityVector::compare degenerates
            // cleanly to the classic four-field STP comparison.
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

        Ok(ConfigBpdu {
            header,
            topology_change: flags & FLAG_TOPOLOGY_CHANGE != 0,
            topology_change_ack: flags & FLAG_TOPOLOGY_CHANGE_ACK != 0,
            vector,
            times,
        })
    }

    pub fn serialize(&self, buffer: &mut [u8]) -> Result<usize, BpduError> {
        if buffer.len() < Self::WIRE_SIZE {
            return Err(BpduError::TooShort);
        }

        self.header.serialize(buffer);

        let mut flags = 0u8;
        if self.topology_change {
            flags |= FLAG_TOPOLOGY_CHANGE;
        }
        if self.topology_change_ack {
            flags |= FLAG_TOPOLOGY_CHANGE_ACK;
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

        Ok(Self::WIRE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bpdu::{BpduType, ProtocolVersion};

    fn sample() -> ConfigBpdu {
        ConfigBpdu {
            header: BpduHeader {
                protocol_version: ProtocolVersion::Stp,
                bpdu_type: BpduType::Config,
            },
            topology_change: true,
            topology_change_ack: false,
            vector: PriorityVector {
                root: BridgeId::new(0x8000, [1, 2, 3, 4, 5, 6]),
                external_root_path_cost: 19,
                regional_root: BridgeId::new(0x8000, [1, 2, 3, 4, 5, 6]),
                internal_root_path_cost: 0,
                designated_bridge: BridgeId::new(0x8000, [7, 8, 9, 10, 11, 12]),
                designated_port: PortId::new(8, 3),
            },
            times: Times {
                message_age: 1,
                max_age: 20,
                hello_time: 2,
                forward_delay: 15,
                remaining_hops: 0,
            },
        }
    }

    #[test]
    fn round_trips() {
        let bpdu = sample();
        let mut buf = [0u8; ConfigBpdu::WIRE_SIZE];
        let len = bpdu.serialize(&mut buf).unwrap();
        assert_eq!(len, ConfigBpdu::WIRE_SIZE);
        let decoded = ConfigBpdu::deserialize(bpdu.header, &buf).unwrap();
        assert_eq!(decoded, bpdu);
    }

    #[test]
    fn flags_are_independent() {
        let mut bpdu = sample();
        bpdu.topology_change = false;
        bpdu.topology_change_ack = true;
        let mut buf = [0u8; ConfigBpdu::WIRE_SIZE];
        bpdu.serialize(&mut buf).unwrap();
        assert_eq!(buf[4], FLAG_TOPOLOGY_CHANGE_ACK);
    }
}
