use std::cmp::Ordering;
use std::net::Ipv4Addr;

use bytes::{BufMut, Bytes, BytesMut};

use crate::bits::*;
use crate::constant::{LsaMaxAge, MaxAgeDiff};
use crate::{fletcher_checksum, fletcher_valid, DecodeError, Version};

#[allow(non_upper_case_globals)]
pub mod types {
    pub const RouterLSA: u16 = 1;
    pub const NetworkLSA: u16 = 2;
    pub const SummaryIpLSA: u16 = 3;
    pub const SummaryAsbrLSA: u16 = 4;
    pub const ASExternalLSA: u16 = 5;

    pub const V3RouterLSA: u16 = 0x2001;
    pub const V3NetworkLSA: u16 = 0x2002;
    pub const V3InterAreaPrefixLSA: u16 = 0x2003;
    pub const V3InterAreaRouterLSA: u16 = 0x2004;
    pub const V3ASExternalLSA: u16 = 0x4005;
    pub const V3LinkLSA: u16 = 0x0008;
    pub const V3IntraAreaPrefixLSA: u16 = 0x2009;

    pub fn router(version: crate::Version) -> u16 {
        match version {
            crate::Version::V2 => RouterLSA,
            crate::Version::V3 => V3RouterLSA,
        }
    }

    pub fn network(version: crate::Version) -> u16 {
        match version {
            crate::Version::V2 => NetworkLSA,
            crate::Version::V3 => V3NetworkLSA,
        }
    }
}

/// Where an LSA is flooded and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FloodScope {
    Link,
    Area,
    As,
}

/// Flooding scope of an LS type, or `None` if the type is not handled.
pub fn flood_scope(version: Version, ls_type: u16) -> Option<FloodScope> {
    match version {
        Version::V2 => match ls_type {
            1..=4 => Some(FloodScope::Area),
            5 => Some(FloodScope::As),
            _ => None,
        },
        Version::V3 => match (ls_type >> 13) & 0x3 {
            0 => Some(FloodScope::Link),
            1 => Some(FloodScope::Area),
            2 => Some(FloodScope::As),
            _ => None,
        },
    }
}

/// Identifies one LSA independent of its instance. OSPFv3 scope and U bits
/// do not take part in comparisons.
#[derive(Debug, Clone, Copy)]
pub struct LsaIdentifier {
    pub ls_type: u16,
    pub link_state_id: Ipv4Addr,
    pub advertising_router: Ipv4Addr,
}

impl LsaIdentifier {
    pub const fn new(ls_type: u16, link_state_id: Ipv4Addr, advertising_router: Ipv4Addr) -> Self {
        Self {
            ls_type,
            link_state_id,
            advertising_router,
        }
    }

    fn key(&self) -> (u16, Ipv4Addr, Ipv4Addr) {
        (self.ls_type & 0x1FFF, self.link_state_id, self.advertising_router)
    }
}

impl PartialEq for LsaIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for LsaIdentifier {}

impl std::hash::Hash for LsaIdentifier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state)
    }
}

impl PartialOrd for LsaIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LsaIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl std::fmt::Display for LsaIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:#x},{},{}]",
            self.ls_type, self.link_state_id, self.advertising_router
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsaHeader {
    pub ls_age: u16,
    /// OSPFv2 only.
    pub options: u8,
    pub ls_type: u16,
    pub link_state_id: Ipv4Addr,
    pub advertising_router: Ipv4Addr,
    pub ls_sequence_number: u32,
    pub ls_checksum: u16,
    pub length: u16,
}

/// Result of comparing two instances of the same LSA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fresher {
    First,
    Second,
    Both,
}

impl LsaHeader {
    pub const LENGTH: usize = 20;

    pub fn identifier(&self) -> LsaIdentifier {
        LsaIdentifier::new(self.ls_type, self.link_state_id, self.advertising_router)
    }

    pub fn is_max_age(&self) -> bool {
        self.ls_age >= LsaMaxAge
    }

    /// Which instance is more recent, following the ordering of sequence
    /// number, checksum, MaxAge and age difference.
    pub fn fresher(&self, other: &Self) -> Fresher {
        let (a, b) = (
            self.ls_sequence_number as i32,
            other.ls_sequence_number as i32,
        );
        if a != b {
            return if a > b { Fresher::First } else { Fresher::Second };
        }
        if self.ls_checksum != other.ls_checksum {
            return if self.ls_checksum > other.ls_checksum {
                Fresher::First
            } else {
                Fresher::Second
            };
        }
        match (self.is_max_age(), other.is_max_age()) {
            (true, false) => return Fresher::First,
            (false, true) => return Fresher::Second,
            _ => {}
        }
        if self.ls_age.abs_diff(other.ls_age) > MaxAgeDiff {
            return if self.ls_age < other.ls_age {
                Fresher::First
            } else {
                Fresher::Second
            };
        }
        Fresher::Both
    }
}

impl FromBuf for LsaHeader {
    fn from_buf(buf: &mut &[u8], version: Version) -> Result<Self, DecodeError> {
        need(buf.len(), Self::LENGTH)?;
        let ls_age = get_u16(buf)?;
        let (options, ls_type) = match version {
            Version::V2 => (get_u8(buf)?, get_u8(buf)? as u16),
            Version::V3 => (0, get_u16(buf)?),
        };
        Ok(Self {
            ls_age,
            options,
            ls_type,
            link_state_id: get_ipv4(buf)?,
            advertising_router: get_ipv4(buf)?,
            ls_sequence_number: get_u32(buf)?,
            ls_checksum: get_u16(buf)?,
            length: get_u16(buf)?,
        })
    }
}

impl ToBytesMut for LsaHeader {
    fn emit(&self, buf: &mut BytesMut, version: Version) {
        buf.put_u16(self.ls_age);
        match version {
            Version::V2 => {
                buf.put_u8(self.options);
                buf.put_u8(self.ls_type as u8);
            }
            Version::V3 => buf.put_u16(self.ls_type),
        }
        buf.put_slice(&self.link_state_id.octets());
        buf.put_slice(&self.advertising_router.octets());
        buf.put_u32(self.ls_sequence_number);
        buf.put_u16(self.ls_checksum);
        buf.put_u16(self.length);
    }
}

/// An LSA instance. Values are never modified once installed; a new instance
/// is built instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lsa {
    pub header: LsaHeader,
    pub body: Bytes,
}

impl Lsa {
    /// Builds an instance with length and checksum filled in.
    pub fn new(header: LsaHeader, body: Bytes, version: Version) -> Self {
        let mut lsa = Self { header, body };
        lsa.header.length = (LsaHeader::LENGTH + lsa.body.len()) as u16;
        lsa.header.ls_checksum = fletcher_checksum(&lsa.to_bytes_mut(version));
        lsa
    }

    pub fn identifier(&self) -> LsaIdentifier {
        self.header.identifier()
    }

    pub fn checksum_valid(&self, version: Version) -> bool {
        fletcher_valid(&self.to_bytes_mut(version))
    }

    /// Same instance with a different age, the checksum is unaffected.
    pub fn with_age(&self, ls_age: u16) -> Self {
        let mut lsa = self.clone();
        lsa.header.ls_age = ls_age;
        lsa
    }
}

impl FromBuf for Lsa {
    fn from_buf(buf: &mut &[u8], version: Version) -> Result<Self, DecodeError> {
        let header = LsaHeader::from_buf(buf, version)?;
        let length = header.length as usize;
        if length < LsaHeader::LENGTH {
            return Err(DecodeError::LsaLength(header.length));
        }
        let body_len = length - LsaHeader::LENGTH;
        need(buf.len(), body_len)?;
        let body = Bytes::copy_from_slice(&buf[..body_len]);
        *buf = &buf[body_len..];
        Ok(Self { header, body })
    }
}

impl ToBytesMut for Lsa {
    fn emit(&self, buf: &mut BytesMut, version: Version) {
        self.header.emit(buf, version);
        buf.put_slice(&self.body);
    }
}

/// Body of a Network-LSA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkLsa {
    /// OSPFv2 only.
    pub network_mask: Ipv4Addr,
    /// OSPFv3 only.
    pub options: u32,
    pub attached_routers: Vec<Ipv4Addr>,
}

impl FromBuf for NetworkLsa {
    fn from_buf(buf: &mut &[u8], version: Version) -> Result<Self, DecodeError> {
        let (network_mask, options) = match version {
            Version::V2 => (get_ipv4(buf)?, 0),
            Version::V3 => {
                get_u8(buf)?;
                (Ipv4Addr::UNSPECIFIED, get_u24(buf)?)
            }
        };
        let mut attached_routers = Vec::with_capacity(buf.len() / 4);
        while !buf.is_empty() {
            attached_routers.push(get_ipv4(buf)?);
        }
        Ok(Self {
            network_mask,
            options,
            attached_routers,
        })
    }
}

impl ToBytesMut for NetworkLsa {
    fn emit(&self, buf: &mut BytesMut, version: Version) {
        match version {
            Version::V2 => buf.put_slice(&self.network_mask.octets()),
            Version::V3 => {
                buf.put_u8(0);
                buf.put_uint(self.options as u64 & 0xFF_FFFF, 3);
            }
        }
        for router in &self.attached_routers {
            buf.put_slice(&router.octets());
        }
    }
}
