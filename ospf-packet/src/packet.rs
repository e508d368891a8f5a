use std::net::Ipv4Addr;

use bitflags::bitflags;
use bytes::{BufMut, BytesMut};

use crate::bits::*;
use crate::lsa::{Lsa, LsaHeader, LsaIdentifier};
use crate::{DecodeError, Version};

#[allow(non_upper_case_globals)]
pub mod types {
    pub const Hello: u8 = 1;
    pub const DBDescription: u8 = 2;
    pub const LSRequest: u8 = 3;
    pub const LSUpdate: u8 = 4;
    pub const LSAcknowledge: u8 = 5;
}

pub fn message_type_string(packet_type: u8) -> &'static str {
    match packet_type {
        types::Hello => "Hello",
        types::DBDescription => "Database Description",
        types::LSRequest => "Link State Request",
        types::LSUpdate => "Link State Update",
        types::LSAcknowledge => "Link State Acknowledgment",
        _ => "Unknown",
    }
}

/// Option bits. OSPFv2 carries the low byte only, OSPFv3 a 24-bit field.
pub mod options {
    pub const V6: u32 = 0x01;
    pub const E: u32 = 0x02;
    pub const MC: u32 = 0x04;
    pub const NP: u32 = 0x08;
    pub const R: u32 = 0x10;
    pub const DC: u32 = 0x20;
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DdFlags: u8 {
        const MS = 0x01;
        const M = 0x02;
        const I = 0x04;
    }
}

fn put_options(buf: &mut BytesMut, options: u32, version: Version) {
    match version {
        Version::V2 => buf.put_u8(options as u8),
        Version::V3 => buf.put_uint(options as u64 & 0xFF_FFFF, 3),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hello {
    /// OSPFv2 only.
    pub network_mask: Ipv4Addr,
    /// OSPFv3 only.
    pub interface_id: u32,
    pub hello_interval: u16,
    pub options: u32,
    pub router_priority: u8,
    pub router_dead_interval: u32,
    pub designated_router: Ipv4Addr,
    pub backup_designated_router: Ipv4Addr,
    pub neighbors: Vec<Ipv4Addr>,
}

impl FromBuf for Hello {
    fn from_buf(buf: &mut &[u8], version: Version) -> Result<Self, DecodeError> {
        let (network_mask, interface_id, hello_interval, options, router_priority, dead) =
            match version {
                Version::V2 => {
                    let mask = get_ipv4(buf)?;
                    let hello = get_u16(buf)?;
                    let options = get_u8(buf)? as u32;
                    let priority = get_u8(buf)?;
                    let dead = get_u32(buf)?;
                    (mask, 0, hello, options, priority, dead)
                }
                Version::V3 => {
                    let interface_id = get_u32(buf)?;
                    let priority = get_u8(buf)?;
                    let options = get_u24(buf)?;
                    let hello = get_u16(buf)?;
                    let dead = get_u16(buf)? as u32;
                    (Ipv4Addr::UNSPECIFIED, interface_id, hello, options, priority, dead)
                }
            };
        let designated_router = get_ipv4(buf)?;
        let backup_designated_router = get_ipv4(buf)?;
        let mut neighbors = Vec::with_capacity(buf.len() / 4);
        while !buf.is_empty() {
            neighbors.push(get_ipv4(buf)?);
        }
        Ok(Self {
            network_mask,
            interface_id,
            hello_interval,
            options,
            router_priority,
            router_dead_interval: dead,
            designated_router,
            backup_designated_router,
            neighbors,
        })
    }
}

impl ToBytesMut for Hello {
    fn emit(&self, buf: &mut BytesMut, version: Version) {
        match version {
            Version::V2 => {
                buf.put_slice(&self.network_mask.octets());
                buf.put_u16(self.hello_interval);
                put_options(buf, self.options, version);
                buf.put_u8(self.router_priority);
                buf.put_u32(self.router_dead_interval);
            }
            Version::V3 => {
                buf.put_u32(self.interface_id);
                buf.put_u8(self.router_priority);
                put_options(buf, self.options, version);
                buf.put_u16(self.hello_interval);
                buf.put_u16(self.router_dead_interval as u16);
            }
        }
        buf.put_slice(&self.designated_router.octets());
        buf.put_slice(&self.backup_designated_router.octets());
        for neighbor in &self.neighbors {
            buf.put_slice(&neighbor.octets());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbDescription {
    pub interface_mtu: u16,
    pub options: u32,
    pub flags: DdFlags,
    pub dd_sequence_number: u32,
    pub lsa_headers: Vec<LsaHeader>,
}

impl DbDescription {
    pub fn is_init(&self) -> bool {
        self.flags.contains(DdFlags::I)
    }

    pub fn is_more(&self) -> bool {
        self.flags.contains(DdFlags::M)
    }

    pub fn is_master(&self) -> bool {
        self.flags.contains(DdFlags::MS)
    }

    /// Duplicate detection only looks at the fields that identify a DD
    /// packet within one exchange.
    pub fn same_as(&self, other: &Self) -> bool {
        self.flags == other.flags
            && self.options == other.options
            && self.dd_sequence_number == other.dd_sequence_number
    }
}

impl FromBuf for DbDescription {
    fn from_buf(buf: &mut &[u8], version: Version) -> Result<Self, DecodeError> {
        let (interface_mtu, options) = match version {
            Version::V2 => {
                let mtu = get_u16(buf)?;
                (mtu, get_u8(buf)? as u32)
            }
            Version::V3 => {
                get_u8(buf)?;
                let options = get_u24(buf)?;
                let mtu = get_u16(buf)?;
                get_u8(buf)?;
                (mtu, options)
            }
        };
        let flags = DdFlags::from_bits_truncate(get_u8(buf)?);
        let dd_sequence_number = get_u32(buf)?;
        let mut lsa_headers = Vec::with_capacity(buf.len() / LsaHeader::LENGTH);
        while !buf.is_empty() {
            lsa_headers.push(LsaHeader::from_buf(buf, version)?);
        }
        Ok(Self {
            interface_mtu,
            options,
            flags,
            dd_sequence_number,
            lsa_headers,
        })
    }
}

impl ToBytesMut for DbDescription {
    fn emit(&self, buf: &mut BytesMut, version: Version) {
        match version {
            Version::V2 => {
                buf.put_u16(self.interface_mtu);
                put_options(buf, self.options, version);
            }
            Version::V3 => {
                buf.put_u8(0);
                put_options(buf, self.options, version);
                buf.put_u16(self.interface_mtu);
                buf.put_u8(0);
            }
        }
        buf.put_u8(self.flags.bits());
        buf.put_u32(self.dd_sequence_number);
        for header in &self.lsa_headers {
            header.emit(buf, version);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsRequest {
    pub requests: Vec<LsaIdentifier>,
}

impl FromBuf for LsRequest {
    fn from_buf(buf: &mut &[u8], _version: Version) -> Result<Self, DecodeError> {
        let mut requests = Vec::with_capacity(buf.len() / 12);
        while !buf.is_empty() {
            // OSPFv2 uses a 32-bit type, OSPFv3 16 reserved bits and a 16-bit type
            let ls_type = (get_u32(buf)? & 0xFFFF) as u16;
            let link_state_id = get_ipv4(buf)?;
            let advertising_router = get_ipv4(buf)?;
            requests.push(LsaIdentifier::new(ls_type, link_state_id, advertising_router));
        }
        Ok(Self { requests })
    }
}

impl ToBytesMut for LsRequest {
    fn emit(&self, buf: &mut BytesMut, _version: Version) {
        for id in &self.requests {
            buf.put_u32(id.ls_type as u32);
            buf.put_slice(&id.link_state_id.octets());
            buf.put_slice(&id.advertising_router.octets());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsUpdate {
    pub lsas: Vec<Lsa>,
}

impl FromBuf for LsUpdate {
    fn from_buf(buf: &mut &[u8], version: Version) -> Result<Self, DecodeError> {
        let count = get_u32(buf)?;
        let mut lsas = Vec::new();
        for _ in 0..count {
            lsas.push(Lsa::from_buf(buf, version)?);
        }
        Ok(Self { lsas })
    }
}

impl ToBytesMut for LsUpdate {
    fn emit(&self, buf: &mut BytesMut, version: Version) {
        buf.put_u32(self.lsas.len() as u32);
        for lsa in &self.lsas {
            lsa.emit(buf, version);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsAcknowledge {
    pub lsa_headers: Vec<LsaHeader>,
}

impl FromBuf for LsAcknowledge {
    fn from_buf(buf: &mut &[u8], version: Version) -> Result<Self, DecodeError> {
        let mut lsa_headers = Vec::with_capacity(buf.len() / LsaHeader::LENGTH);
        while !buf.is_empty() {
            lsa_headers.push(LsaHeader::from_buf(buf, version)?);
        }
        Ok(Self { lsa_headers })
    }
}

impl ToBytesMut for LsAcknowledge {
    fn emit(&self, buf: &mut BytesMut, version: Version) {
        for header in &self.lsa_headers {
            header.emit(buf, version);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PacketBody {
    Hello(Hello),
    DbDescription(DbDescription),
    LsRequest(LsRequest),
    LsUpdate(LsUpdate),
    LsAcknowledge(LsAcknowledge),
}

impl PacketBody {
    pub fn packet_type(&self) -> u8 {
        match self {
            PacketBody::Hello(_) => types::Hello,
            PacketBody::DbDescription(_) => types::DBDescription,
            PacketBody::LsRequest(_) => types::LSRequest,
            PacketBody::LsUpdate(_) => types::LSUpdate,
            PacketBody::LsAcknowledge(_) => types::LSAcknowledge,
        }
    }

    pub fn decode(
        packet_type: u8,
        buf: &mut &[u8],
        version: Version,
    ) -> Result<Self, DecodeError> {
        Ok(match packet_type {
            types::Hello => PacketBody::Hello(Hello::from_buf(buf, version)?),
            types::DBDescription => PacketBody::DbDescription(DbDescription::from_buf(buf, version)?),
            types::LSRequest => PacketBody::LsRequest(LsRequest::from_buf(buf, version)?),
            types::LSUpdate => PacketBody::LsUpdate(LsUpdate::from_buf(buf, version)?),
            types::LSAcknowledge => PacketBody::LsAcknowledge(LsAcknowledge::from_buf(buf, version)?),
            x => return Err(DecodeError::PacketType(x)),
        })
    }
}

impl ToBytesMut for PacketBody {
    fn emit(&self, buf: &mut BytesMut, version: Version) {
        match self {
            PacketBody::Hello(p) => p.emit(buf, version),
            PacketBody::DbDescription(p) => p.emit(buf, version),
            PacketBody::LsRequest(p) => p.emit(buf, version),
            PacketBody::LsUpdate(p) => p.emit(buf, version),
            PacketBody::LsAcknowledge(p) => p.emit(buf, version),
        }
    }
}
