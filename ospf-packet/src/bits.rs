use std::net::Ipv4Addr;

use bytes::{Buf, BytesMut};

use crate::{DecodeError, Version};

/// Decoding of a wire structure whose layout depends on the OSPF version.
pub trait FromBuf: Sized {
    fn from_buf(buf: &mut &[u8], version: Version) -> Result<Self, DecodeError>;
}

/// Encoding counterpart of [`FromBuf`].
pub trait ToBytesMut {
    fn emit(&self, buf: &mut BytesMut, version: Version);

    fn to_bytes_mut(&self, version: Version) -> BytesMut {
        let mut buf = BytesMut::new();
        self.emit(&mut buf, version);
        buf
    }
}

pub(crate) fn need(left: usize, need: usize) -> Result<(), DecodeError> {
    if left < need {
        Err(DecodeError::Truncated { need, left })
    } else {
        Ok(())
    }
}

pub(crate) fn get_u8(buf: &mut &[u8]) -> Result<u8, DecodeError> {
    need(buf.remaining(), 1)?;
    Ok(buf.get_u8())
}

pub(crate) fn get_u16(buf: &mut &[u8]) -> Result<u16, DecodeError> {
    need(buf.remaining(), 2)?;
    Ok(buf.get_u16())
}

pub(crate) fn get_u24(buf: &mut &[u8]) -> Result<u32, DecodeError> {
    need(buf.remaining(), 3)?;
    Ok(buf.get_uint(3) as u32)
}

pub(crate) fn get_u32(buf: &mut &[u8]) -> Result<u32, DecodeError> {
    need(buf.remaining(), 4)?;
    Ok(buf.get_u32())
}

pub(crate) fn get_ipv4(buf: &mut &[u8]) -> Result<Ipv4Addr, DecodeError> {
    get_u32(buf).map(Ipv4Addr::from)
}
