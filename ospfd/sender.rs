use std::io;
use std::net::IpAddr;

use ospf_packet::{message_type_string, Packet, PacketBody};

use crate::interface::Interface;
use crate::{log, log_error};

/// Outgoing side of a link. Sending is fire-and-forget.
pub trait Transport: Send {
    fn send(&mut self, data: &[u8], destination: IpAddr) -> io::Result<()>;
}

impl Interface {
    pub(crate) fn send_packet(&mut self, body: PacketBody, destination: IpAddr) {
        let packet = Packet {
            version: self.version,
            router_id: self.router_id,
            area_id: self.area_id,
            instance_id: self.instance_id,
            body,
        };
        let kind = message_type_string(packet.body.packet_type());
        let raw = packet.encode();
        match self.transport.send(&raw, destination) {
            Ok(()) => log!(
                "{}: sent packet to {}: {}({} bytes)",
                self.name,
                destination,
                kind,
                raw.len()
            ),
            Err(e) => log_error!("{}: failed to send {} to {}: {}", self.name, kind, destination, e),
        }
    }
}

/// Records every packet instead of putting it on a wire.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport(std::sync::Arc<std::sync::Mutex<Vec<(Vec<u8>, IpAddr)>>>);

#[cfg(test)]
impl MemoryTransport {
    /// Drains the recorded packets.
    pub fn take_raw(&self) -> Vec<(Vec<u8>, IpAddr)> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    pub fn take(&self) -> Vec<(Packet, IpAddr)> {
        self.take_raw()
            .into_iter()
            .map(|(raw, dest)| (Packet::decode(&raw).unwrap(), dest))
            .collect()
    }
}

#[cfg(test)]
impl Transport for MemoryTransport {
    fn send(&mut self, data: &[u8], destination: IpAddr) -> io::Result<()> {
        self.0.lock().unwrap().push((data.to_vec(), destination));
        Ok(())
    }
}
