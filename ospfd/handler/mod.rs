mod ack;
mod dd;
mod hello;
mod lsr;
mod lsu;

use std::net::IpAddr;

use ospf_packet::{message_type_string, Packet, PacketBody, Version};

use crate::interface::{Incoming, Interface};
use crate::{log, must};

impl Interface {
    /// Checks the common header of a received packet, then hands the body to
    /// its handler.
    pub fn handle_packet(&mut self, incoming: Incoming) {
        let packet = match Packet::decode(&incoming.data) {
            Ok(packet) => packet,
            Err(e) => {
                log!("{}: dropped packet from {}: {}", self.name, incoming.source, e);
                return;
            }
        };
        must!(packet.version == self.version;
            debug: "{}: dropped OSPFv{} packet", self.name, packet.version.number());
        must!(source_family_ok(self.version, incoming.source);
            debug: "{}: dropped packet from bad source {}", self.name, incoming.source);
        must!(packet.area_id == self.area_id;
            debug: "{}: dropped packet for area {}", self.name, packet.area_id);
        must!(packet.router_id != self.router_id;
            debug: "{}: dropped own packet", self.name);
        must!(self.version == Version::V2 || packet.instance_id == self.instance_id;
            debug: "{}: dropped packet for instance {}", self.name, packet.instance_id);
        must!(incoming.destination != self.all_d_routers() || self.is_dr() || self.is_bdr();
            debug: "{}: dropped packet sent to AllDRouters", self.name);

        let router_id = packet.router_id;
        log!(
            "{}: recv {} from {}({})",
            self.name,
            message_type_string(packet.body.packet_type()),
            router_id,
            incoming.source
        );
        match packet.body {
            PacketBody::Hello(hello) => self.handle_hello(router_id, incoming.source, hello),
            PacketBody::DbDescription(dd) => self.handle_dd(router_id, dd),
            PacketBody::LsRequest(lsr) => self.handle_lsr(router_id, lsr),
            PacketBody::LsUpdate(lsu) => self.handle_lsu(router_id, lsu),
            PacketBody::LsAcknowledge(ack) => self.handle_ack(router_id, ack),
        }
    }
}

/// Whether `addr` can source OSPF packets of `version`.
fn source_family_ok(version: Version, addr: IpAddr) -> bool {
    match (version, addr) {
        (Version::V2, IpAddr::V4(_)) => true,
        (Version::V3, IpAddr::V6(v6)) => v6.segments()[0] & 0xffc0 == 0xfe80,
        _ => false,
    }
}
