use super::BpduHeader;
use crate::error::BpduError;

/// Topology Change Notification BPDU: just the common 4-byte header, no
/// body (spec §3, "BPDU ... TCN (4 bytes)").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcnBpdu {
    pub header: BpduHeader,
}

impl TcnBpdu {
    pub const WIRE_SIZE: usize = BpduHeader::WIRE_SIZE;

    pub fn serialize(&self, buffer: &mut [u8]) -> Result<usize, BpduError> {
        if buffer.len() < Self::WIRE_SIZE {
            return Err(BpduError::TooShort);
        }
        self.header.serialize(buffer);
        Ok(Self::WIRE_SIZE)
    }
}
