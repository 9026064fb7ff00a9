//! BPDU wire format (spec §4.11, IEEE 802.1Q-2018 §14).
//!
//! All integer fields are big-endian. Four shapes exist on the wire: TCN
//! (4 bytes), Configuration (35 bytes), RST (36 bytes) and MST (>=102 bytes
//! plus 16 bytes per carried MSTI). [`Bpdu::deserialize`] dispatches on the
//! protocol identifier/version/BPDU type octets; [`Bpdu::serialize`] always
//! emits the exact byte count §14 mandates for the variant being sent.
//!
//! Mirrors the `datastructures::messages` split in the teacher crate: one
//! file per wire shape, a `Message`-like enum tying them together, and
//! `serialize`/`deserialize` free of any state-machine knowledge so they
//! stay testable in isolation (spec §4.11, last sentence).

mod config_bpdu;
mod header;
mod mst;
mod rst;
mod tcn;

pub use config_bpdu::ConfigBpdu;
pub use header::{BpduHeader, BpduType, ProtocolVersion};
pub use mst::{MstBpdu, MstiConfigMessage, MAX_MSTI_COUNT};
pub use rst::RstBpdu;
pub use tcn::TcnBpdu;

use crate::error::BpduError;

/// Upper bound on the encoded size of any BPDU this crate emits or accepts:
/// a full MST BPDU with the maximum number of MSTI messages.
pub const MAX_BPDU_LEN: usize = 102 + MAX_MSTI_COUNT * 16;

/// The decoded content of a received or to-be-sent BPDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bpdu {
    Tcn(TcnBpdu),
    Config(ConfigBpdu),
    Rst(RstBpdu),
    Mst(MstBpdu),
}

impl Bpdu {
    /// True for a Configuration or TCN BPDU (protocol version 0) — the
    /// shapes an STP speaker sends and the sole signal `rcvdSTP` is set
    /// from (spec §4.2).
    pub fn is_stp(&self) -> bool {
        matches!(self, Bpdu::Tcn(_) | Bpdu::Config(_))
    }

    /// True for an RST or MST BPDU (protocol version >= 2) — the signal
    /// `rcvdRSTP` is set from.
    pub fn is_rstp_or_mstp(&self) -> bool {
        matches!(self, Bpdu::Rst(_) | Bpdu::Mst(_))
    }

    pub fn message_priority(&self) -> crate::vector::PriorityVector {
        match self {
            Bpdu::Tcn(_) => unreachable!("TCN BPDUs carry no priority vector"),
            Bpdu::Config(c) => c.priority_vector(),
            Bpdu::Rst(r) => r.priority_vector(),
            Bpdu::Mst(m) => m.cist_priority_vector(),
        }
    }

    pub fn times(&self) -> crate::vector::Times {
        match self {
            Bpdu::Tcn(_) => unreachable!("TCN BPDUs carry no times"),
            Bpdu::Config(c) => c.times(),
            Bpdu::Rst(r) => r.times(),
            Bpdu::Mst(m) => m.times(),
        }
    }

    /// Decode a BPDU from its on-wire bytes.
    ///
    /// Malformed BPDUs return an error for the caller to count and discard
    /// (spec §7); the engine itself never sees a `BpduError`.
    pub fn deserialize(buffer: &[u8]) -> Result<Self, BpduError> {
        let header = BpduHeader::deserialize(buffer)?;

        match (header.protocol_version, header.bpdu_type) {
            (_, BpduType::Tcn) => Ok(Bpdu::Tcn(TcnBpdu { header })),
            (ProtocolVersion::Stp, BpduType::Config) => {
                Ok(Bpdu::Config(ConfigBpdu::deserialize(header, buffer)?))
            }
            (ProtocolVersion::Rstp, BpduType::Config) => {
                Ok(Bpdu::Rst(RstBpdu::deserialize(header, buffer)?))
            }
            (ProtocolVersion::Mstp, BpduType::Config) => {
                match MstBpdu::deserialize(header, buffer) {
                    Ok(mst) => Ok(Bpdu::Mst(mst)),
                    // A region mismatch or truncated v3 length is treated as
                    // plain RSTP (CIST-only), per spec §4.11.
                    Err(BpduError::BadMstLength) => {
                        Ok(Bpdu::Rst(RstBpdu::deserialize(header, buffer)?))
                    }
                    Err(e) => Err(e),
                }
            }
            _ => Err(BpduError::UnknownType),
        }
    }

    pub fn serialize(&self, buffer: &mut [u8]) -> Result<usize, BpduError> {
        match self {
            Bpdu::Tcn(b) => b.serialize(buffer),
            Bpdu::Config(b) => b.serialize(buffer),
            Bpdu::Rst(b) => b.serialize(buffer),
            Bpdu::Mst(b) => b.serialize(buffer),
        }
    }
}

/// Shared 2-bit port role encoding used by the RST and MST flag bytes
/// (802.1Q §14.3): `00` unknown/disabled, `01` alternate/backup, `10` root,
/// `11` designated/master.
pub(crate) fn rst_role_from_bits(bits: u8) -> crate::model::Role {
    use crate::model::Role;
    match bits {
        0b00 => Role::Unknown,
        0b01 => Role::Alternate,
        0b10 => Role::Root,
        0b11 => Role::Designated,
        _ => unreachable!("2-bit field"),
    }
}

pub(crate) fn rst_role_to_bits(role: crate::model::Role) -> u8 {
    use crate::model::Role;
    match role {
        Role::Disabled | Role::Unknown => 0b00,
        Role::Alternate | Role::Backup => 0b01,
        Role::Root => 0b10,
        Role::Designated | Role::Master => 0b11,
    }
}

/// The wire format counts time fields in 1/256s ticks; the engine only
/// needs whole-second granularity (spec §4.10, "usually 1s granularity").
/// Shared by the Configuration, RST and MST wire shapes.
pub(crate) fn config_bpdu_seconds_to_ticks(seconds: u8) -> u16 {
    (seconds as u16) << 8
}

pub(crate) fn config_bpdu_ticks_to_seconds(ticks: u16) -> u8 {
    (ticks >> 8) as u8
}

/// Destination MAC address all BPDUs are sent to: the Bridge Group Address.
pub const BPDU_DESTINATION_MAC: [u8; 6] = [0x01, 0x80, 0xC2, 0x00, 0x00, 0x00];

/// 802.2 LLC header prefixed to every BPDU frame (spec §6).
pub const BPDU_LLC_HEADER: [u8; 3] = [0x42, 0x42, 0x03];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tcn_round_trips() {
        let bpdu = Bpdu::Tcn(TcnBpdu {
            header: BpduHeader {
                protocol_version: ProtocolVersion::Stp,
                bpdu_type: BpduType::Tcn,
            },
        });
        let mut buf = [0u8; MAX_BPDU_LEN];
        let len = bpdu.serialize(&mut buf).unwrap();
        assert_eq!(len, 4);
        let decoded = Bpdu::deserialize(&buf[..len]).unwrap();
        assert_eq!(decoded, bpdu);
    }

    #[test]
    fn unknown_protocol_identifier_is_rejected() {
        let mut buf = [0u8; 35];
        buf[0] = 0xff;
        buf[1] = 0xff;
        assert_eq!(
            Bpdu::deserialize(&buf),
            Err(BpduError::BadProtocolIdentifier)
        );
    }

    #[test]
    fn truncated_buffer_is_rejected() {
        let buf = [0u8; 2];
        assert_eq!(Bpdu::deserialize(&buf), Err(BpduError::TooShort));
    }
}
