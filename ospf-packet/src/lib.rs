pub mod bits;
mod checksum;
pub mod constant;
pub mod lsa;
pub mod packet;

pub use bits::{FromBuf, ToBytesMut};
pub use checksum::{fletcher_checksum, fletcher_valid};
pub use packet::{message_type_string, PacketBody};

use std::net::Ipv4Addr;

use bytes::{BufMut, BytesMut};
use internet_checksum::Checksum;

/// OSPF protocol version: 2 runs over IPv4, 3 over IPv6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    V2,
    V3,
}

impl Version {
    pub const fn number(self) -> u8 {
        match self {
            Version::V2 => 2,
            Version::V3 => 3,
        }
    }

    /// Length of the common OSPF packet header.
    pub const fn header_len(self) -> usize {
        match self {
            Version::V2 => 24,
            Version::V3 => 16,
        }
    }
}

impl TryFrom<u8> for Version {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Version::V2),
            3 => Ok(Version::V3),
            x => Err(DecodeError::Version(x)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("truncated: need {need} more bytes, {left} left")]
    Truncated { need: usize, left: usize },
    #[error("unsupported OSPF version {0}")]
    Version(u8),
    #[error("unknown packet type {0}")]
    PacketType(u8),
    #[error("length field {0} does not fit the packet")]
    Length(u16),
    #[error("packet checksum mismatch")]
    Checksum,
    #[error("LSA length {0} is shorter than its header")]
    LsaLength(u16),
}

/// A complete OSPF packet: the common header plus one typed body.
///
/// Authentication is not supported, so the OSPFv2 AuType and authentication
/// fields are always emitted as zero. The OSPFv3 checksum covers an IPv6
/// pseudo-header and is left to the transport (`IPV6_CHECKSUM`).
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub version: Version,
    pub router_id: Ipv4Addr,
    pub area_id: Ipv4Addr,
    /// OSPFv3 only.
    pub instance_id: u8,
    pub body: PacketBody,
}

const CHECKSUM_RANGE: std::ops::Range<usize> = 12..14;
const AUTH_RANGE: std::ops::Range<usize> = 16..24;

impl Packet {
    pub fn encode(&self) -> BytesMut {
        let version = self.version;
        let mut buf = BytesMut::with_capacity(version.header_len() + 64);
        buf.put_u8(version.number());
        buf.put_u8(self.body.packet_type());
        buf.put_u16(0); // length, assigned below
        buf.put_slice(&self.router_id.octets());
        buf.put_slice(&self.area_id.octets());
        buf.put_u16(0); // checksum, assigned below
        match version {
            Version::V2 => {
                buf.put_u16(0);
                buf.put_u64(0);
            }
            Version::V3 => {
                buf.put_u8(self.instance_id);
                buf.put_u8(0);
            }
        }
        self.body.emit(&mut buf, version);
        let len = buf.len() as u16;
        buf[2..4].copy_from_slice(&len.to_be_bytes());
        if version == Version::V2 {
            let mut cksum = Checksum::new();
            cksum.add_bytes(&buf[..AUTH_RANGE.start]);
            cksum.add_bytes(&buf[AUTH_RANGE.end..]);
            buf[CHECKSUM_RANGE].copy_from_slice(&cksum.checksum());
        }
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        bits::need(data.len(), 1)?;
        let version = Version::try_from(data[0])?;
        let header_len = version.header_len();
        bits::need(data.len(), header_len)?;
        let length = u16::from_be_bytes([data[2], data[3]]);
        if (length as usize) < header_len || length as usize > data.len() {
            return Err(DecodeError::Length(length));
        }
        let data = &data[..length as usize];
        if version == Version::V2 {
            let mut cksum = Checksum::new();
            cksum.add_bytes(&data[..AUTH_RANGE.start]);
            cksum.add_bytes(&data[AUTH_RANGE.end..]);
            if cksum.checksum() != [0; 2] {
                return Err(DecodeError::Checksum);
            }
        }
        let router_id = Ipv4Addr::new(data[4], data[5], data[6], data[7]);
        let area_id = Ipv4Addr::new(data[8], data[9], data[10], data[11]);
        let instance_id = match version {
            Version::V2 => 0,
            Version::V3 => data[14],
        };
        let body = PacketBody::decode(data[1], &mut &data[header_len..], version)?;
        Ok(Self {
            version,
            router_id,
            area_id,
            instance_id,
            body,
        })
    }
}
