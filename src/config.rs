//! Host-settable configuration (spec §3, §4.15).
//!
//! Mirrors the split in the teacher crate's `config` module
//! (`InstanceConfig` for the bridge-wide dataset, `PortConfig` for the
//! per-port one): plain data, validated only at the setter boundary, with
//! no behavior of its own.

use crate::error::ConfigError;

/// Default `MigrateTime`, per 802.1Q §13.26.1 (Table 13-5).
pub const DEFAULT_MIGRATE_TIME: u8 = 3;
/// Default `TxHoldCount`, per 802.1Q §13.26.1.
pub const DEFAULT_TX_HOLD_COUNT: u8 = 6;
/// Default bridge priority, the midpoint of the legal 0..=61440 range.
pub const DEFAULT_BRIDGE_PRIORITY: u16 = 0x8000;
/// Default port priority, the midpoint of the legal 0..=240 range.
pub const DEFAULT_PORT_PRIORITY: u8 = 0x80;
/// Default `Bridge Max Age`, in seconds (802.1Q Table 13-5).
pub const DEFAULT_MAX_AGE: u8 = 20;
/// Default `Bridge Hello Time`, in seconds. Fixed at 2 by RSTP/MSTP
/// (802.1Q §13.24.4); only plain STP lets a host override it, which this
/// crate does not expose as a separate setter (spec Non-goals: no per-port
/// hello-time override).
pub const DEFAULT_HELLO_TIME: u8 = 2;
/// Default `Bridge Forward Delay`, in seconds (802.1Q Table 13-5).
pub const DEFAULT_FORWARD_DELAY: u8 = 15;
/// Default `MaxHops`, the MSTI remaining-hops ceiling (802.1Q §13.24.4).
pub const DEFAULT_MAX_HOPS: u8 = 20;

/// Which protocol version a bridge (or one forced on a port) speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    Stp,
    Rstp,
    Mstp,
}

/// `AdminPointToPointMAC` (802.1Q Table 13-6): whether the host's link
/// layer can tell the engine the link is point-to-point, or whether it
/// must be forced one way or detected from the reported duplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminPointToPointMac {
    ForceTrue,
    ForceFalse,
    Auto,
}

/// MST configuration identity (spec §3): name, revision, and a digest over
/// the 4096-entry VID-to-MSTID table. Two bridges are in the same MST
/// region iff all three match exactly (802.1Q §13.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MstConfigId {
    pub name: [u8; 32],
    pub revision: u16,
    pub digest: [u8; 16],
}

impl MstConfigId {
    /// The "default" configuration identity a bridge starts with before any
    /// `SetMstConfigName`/`SetVlanToMstid` call: name is the bridge's own
    /// MAC address formatted as a string padded with zero bytes, revision
    /// 0, and the digest of the default VID-to-MSTID table (everything
    /// mapped to the CIST, MSTID 0).
    pub fn default_for_bridge(bridge_address: [u8; 6]) -> Self {
        let mut name = [0u8; 32];
        for (i, byte) in bridge_address.iter().enumerate() {
            let hex = *b"0123456789abcdef";
            name[i * 2] = hex[(byte >> 4) as usize];
            name[i * 2 + 1] = hex[(byte & 0x0f) as usize];
        }

        MstConfigId {
            name,
            revision: 0,
            digest: default_vlan_table_digest(),
        }
    }
}

/// MD5 digest of an all-zero (every VLAN mapped to the CIST) VID-to-MSTID
/// table, computed once. 802.1Q specifies HMAC-MD5 with a fixed public key
/// for this digest; since it is purely an identity check rather than a
/// security boundary (spec §3 SPEC_FULL addition), this crate computes a
/// plain MD5 over the table bytes instead of pulling in `hmac`+`md-5`,
/// matching the same reasoning the teacher crate uses to keep its BPDU
/// authentication MAC behind an optional, pluggable trait rather than a
/// hard dependency.
fn default_vlan_table_digest() -> [u8; 16] {
    md5::digest(&[0u8; 4096 * 2])
}

/// A minimal, `no_std`-safe MD5 implementation used only for the MST
/// configuration digest (see [`default_vlan_table_digest`] and
/// [`vlan_table_digest`]).
mod md5 {
    const S: [u32; 64] = [
        7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 5, 9, 14, 20, 5, 9, 14, 20, 5,
        9, 14, 20, 5, 9, 14, 20, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 6,
        10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
    ];

    const K: [u32; 64] = [
        0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613,
        0xfd469501, 0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193,
        0xa679438e, 0x49b40821, 0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d,
        0x02441453, 0xd8a1e681, 0xe7d3fbc8, 0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed,
        0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a, 0xfffa3942, 0x8771f681, 0x6d9d6122,
        0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70, 0x289b7ec6, 0xeaa127fa,
        0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665, 0xf4292244,
        0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
        0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb,
        0xeb86d391,
    ];

    pub(super) fn digest(input: &[u8]) -> [u8; 16] {
        let mut a0: u32 = 0x67452301;
        let mut b0: u32 = 0xefcdab89;
        let mut c0: u32 = 0x98badcfe;
        let mut d0: u32 = 0x10325476;

        let bit_len = (input.len() as u64).wrapping_mul(8);
        let mut message = heapless_append(input);
        message.extend_from_slice(&bit_len.to_le_bytes());

        for chunk in message.chunks_exact(64) {
            let mut m = [0u32; 16];
            for (i, word) in m.iter_mut().enumerate() {
                *word = u32::from_le_bytes(chunk[i * 4..i * 4 + 4].try_into().unwrap());
            }

            let (mut a, mut b, mut c, mut d) = (a0, b0, c0, d0);

            for i in 0..64 {
                let (f, g) = match i {
                    0..=15 => ((b & c) | (!b & d), i),
                    16..=31 => ((d & b) | (!d & c), (5 * i + 1) % 16),
                    32..=47 => (b ^ c ^ d, (3 * i + 5) % 16),
                    _ => (c ^ (b | !d), (7 * i) % 16),
                };

                let f = f
                    .wrapping_add(a)
                    .wrapping_add(K[i])
                    .wrapping_add(m[g]);
                a = d;
                d = c;
                c = b;
                b = b.wrapping_add(f.rotate_left(S[i]));
            }

            a0 = a0.wrapping_add(a);
            b0 = b0.wrapping_add(b);
            c0 = c0.wrapping_add(c);
            d0 = d0.wrapping_add(d);
        }

        let mut out = [0u8; 16];
        out[0..4].copy_from_slice(&a0.to_le_bytes());
        out[4..8].copy_from_slice(&b0.to_le_bytes());
        out[8..12].copy_from_slice(&c0.to_le_bytes());
        out[12..16].copy_from_slice(&d0.to_le_bytes());
        out
    }

    /// MD5 padding: append 0x80, then zero bytes up to a 56-mod-64 boundary,
    /// leaving room for the 8-byte length suffix appended by the caller.
    fn heapless_append(input: &[u8]) -> arrayvec::ArrayVec<u8, { 4096 * 2 + 64 + 8 }> {
        let mut buf = arrayvec::ArrayVec::new();
        buf.try_extend_from_slice(input)
            .expect("VLAN table digest input always fits the scratch buffer");
        buf.push(0x80);
        while buf.len() % 64 != 56 {
            buf.push(0);
        }
        buf
    }

}

/// Recomputes the MST configuration digest from a full VID-to-MSTID table.
/// Called from `SetVlanToMstid` (spec §6) whenever a host remaps a VLAN.
pub fn vlan_table_digest(table: &[u16; 4096]) -> [u8; 16] {
    let mut bytes = [0u8; 4096 * 2];
    for (i, mstid) in table.iter().enumerate() {
        bytes[i * 2..i * 2 + 2].copy_from_slice(&mstid.to_be_bytes());
    }
    md5::digest(&bytes)
}

/// Bridge-wide configuration (spec §3 `Bridge`, plus §4.15 additions).
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub bridge_priority: u16,
    pub protocol_version: ProtocolVersion,
    pub migrate_time: u8,
    pub tx_hold_count: u8,
    pub max_age: u8,
    pub hello_time: u8,
    pub forward_delay: u8,
    pub max_hops: u8,
    pub mst_config_id: MstConfigId,
}

impl BridgeConfig {
    pub fn new(bridge_address: [u8; 6], protocol_version: ProtocolVersion) -> Self {
        BridgeConfig {
            bridge_priority: DEFAULT_BRIDGE_PRIORITY,
            protocol_version,
            migrate_time: DEFAULT_MIGRATE_TIME,
            tx_hold_count: DEFAULT_TX_HOLD_COUNT,
            max_age: DEFAULT_MAX_AGE,
            hello_time: DEFAULT_HELLO_TIME,
            forward_delay: DEFAULT_FORWARD_DELAY,
            max_hops: DEFAULT_MAX_HOPS,
            mst_config_id: MstConfigId::default_for_bridge(bridge_address),
        }
    }

    /// This bridge's own times, used as the candidate root/regional-root
    /// times before any superior information is received for a tree (spec
    /// §4.5).
    pub fn root_times(&self) -> crate::vector::Times {
        crate::vector::Times {
            message_age: 0,
            max_age: self.max_age,
            hello_time: self.hello_time,
            forward_delay: self.forward_delay,
            remaining_hops: self.max_hops,
        }
    }

    /// Validates a bridge priority per 802.1Q §13.24.3: a multiple of 4096
    /// in `0..=61440`.
    pub fn validate_priority(priority: u16) -> Result<(), ConfigError> {
        if priority > 61440 || priority % 4096 != 0 {
            Err(ConfigError::BadBridgePriority)
        } else {
            Ok(())
        }
    }
}

/// Per-port administrative configuration (spec §3 `Port` admin fields).
#[derive(Debug, Clone, Copy)]
pub struct PortConfig {
    pub port_priority: u8,
    pub admin_path_cost: Option<u32>,
    pub admin_edge: bool,
    pub auto_edge: bool,
    pub admin_point_to_point: AdminPointToPointMac,
}

impl Default for PortConfig {
    fn default() -> Self {
        PortConfig {
            port_priority: DEFAULT_PORT_PRIORITY,
            admin_path_cost: None,
            admin_edge: false,
            auto_edge: true,
            admin_point_to_point: AdminPointToPointMac::Auto,
        }
    }
}

impl PortConfig {
    /// Validates a port priority per 802.1Q §13.25.3: a multiple of 16 in
    /// `0..=240`.
    pub fn validate_priority(priority: u8) -> Result<(), ConfigError> {
        if priority > 240 || priority % 16 != 0 {
            Err(ConfigError::BadPortPriority)
        } else {
            Ok(())
        }
    }

    /// Auto path cost from link speed per 802.1Q Table 13-3.
    pub fn auto_path_cost(speed_mbps: u32) -> u32 {
        match speed_mbps {
            0 => 200_000_000,
            s if s <= 1 => 200_000_000,
            s if s <= 10 => 2_000_000,
            s if s <= 100 => 200_000,
            s if s <= 1_000 => 20_000,
            s if s <= 10_000 => 2_000,
            s if s <= 100_000 => 200,
            s if s <= 1_000_000 => 20,
            _ => 2,
        }
    }
}
