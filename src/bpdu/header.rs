//! The 4-byte prefix common to every BPDU shape: protocol identifier,
//! protocol version identifier, and BPDU type.

use num_enum::TryFromPrimitive;

use crate::error::BpduError;

const PROTOCOL_IDENTIFIER: u16 = 0x0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ProtocolVersion {
    Stp = 0x00,
    Rstp = 0x02,
    Mstp = 0x03,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum BpduType {
    Config = 0x00,
    Tcn = 0x80,
}

/// The decoded common prefix, shared by all four BPDU shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BpduHeader {
    pub protocol_version: ProtocolVersion,
    pub bpdu_type: BpduType,
}

impl BpduHeader {
    pub const WIRE_SIZE: usize = 4;

    pub fn deserialize(buffer: &[u8]) -> Result<Self, BpduError> {
        if buffer.len() < Self::WIRE_SIZE {
            return Err(BpduError::TooShort);
        }

        let protocol_identifier = u16::from_be_bytes([buffer[0], buffer[1]]);
        if protocol_identifier != PROTOCOL_IDENTIFIER {
            return Err(BpduError::BadProtocolIdentifier);
        }

        let protocol_version = ProtocolVersion::try_from_primitive(buffer[2])
            .map_err(|_| BpduError::UnknownType)?;
        let bpdu_type =
            BpduType::try_from_primitive(buffer[3]).map_err(|_| BpduError::UnknownType)?;

        Ok(BpduHeader {
            protocol_version,
            bpdu_type,
        })
    }

    pub fn serialize(&self, buffer: &mut [u8]) {
        buffer[0..2].copy_from_slice(&PROTOCOL_IDENTIFIER.to_be_bytes());
        buffer[2] = self.protocol_version as u8;
        buffer[3] = self.bpdu_type as u8;
    }
}
